use std::io::{ErrorKind, Read};

use crc32fast::Hasher as Crc32Hasher;

use crate::engine::core::column::compression::CompressionKind;
use crate::engine::errors::SegmentReadError;

pub const MAGIC_STRING: &[u8; 11] = b"COLUMN DATA";
pub const CURRENT_COLUMN_DATA_VERSION: u16 = 1;

const FLAG_NULL_SUPPORTED: u8 = 0b0000_0001;
// Upper bound on per-header list lengths; anything larger is a corrupt header.
const MAX_HEADER_ENTRIES: u32 = 1 << 20;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StreamKind {
    RowIndex = 0,
    BloomFilter = 1,
    Data = 2,
}

impl StreamKind {
    pub fn is_index(&self) -> bool {
        matches!(self, StreamKind::RowIndex | StreamKind::BloomFilter)
    }
}

impl TryFrom<u8> for StreamKind {
    type Error = SegmentReadError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(StreamKind::RowIndex),
            1 => Ok(StreamKind::BloomFilter),
            2 => Ok(StreamKind::Data),
            other => Err(SegmentReadError::FileFormat(format!(
                "unknown stream kind {other}"
            ))),
        }
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnEncoding {
    Direct = 0,
}

impl TryFrom<u8> for ColumnEncoding {
    type Error = SegmentReadError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(ColumnEncoding::Direct),
            other => Err(SegmentReadError::FileFormat(format!(
                "unknown column encoding {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamDescriptor {
    pub column_unique_id: u32,
    pub kind: StreamKind,
    pub length: u64,
}

/// A stream descriptor with its absolute file offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamSpan {
    pub descriptor: StreamDescriptor,
    pub offset: u64,
}

impl StreamSpan {
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.descriptor.length)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentColumn {
    pub unique_id: u32,
    pub encoding: ColumnEncoding,
}

/// Parsed, immutable segment header.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentHeader {
    pub version: u16,
    pub compress_kind: CompressionKind,
    pub null_supported: bool,
    pub stream_buffer_size: u32,
    pub num_rows_per_block: u32,
    pub number_of_rows: u64,
    pub bf_hash_function_num: u32,
    pub bf_bit_num: u32,
    /// Columns physically present, in segment-local column id order.
    pub columns: Vec<SegmentColumn>,
    pub streams: Vec<StreamDescriptor>,
}

impl SegmentHeader {
    /// Walks the descriptors in header order; only lengths are stored, so every
    /// offset is the running sum of the lengths before it.
    pub fn stream_layout(
        &self,
        header_length: u64,
    ) -> Result<Vec<StreamSpan>, SegmentReadError> {
        let mut offset = header_length;
        let mut spans = Vec::with_capacity(self.streams.len());
        for descriptor in &self.streams {
            spans.push(StreamSpan {
                descriptor: *descriptor,
                offset,
            });
            offset = offset.checked_add(descriptor.length).ok_or_else(|| {
                SegmentReadError::FileFormat(format!(
                    "stream of column {} ({:?}) with length {} overflows the file offset",
                    descriptor.column_unique_id, descriptor.kind, descriptor.length
                ))
            })?;
        }
        Ok(spans)
    }

    #[cfg(test)]
    pub fn write_to<W: std::io::Write>(&self, mut w: W) -> std::io::Result<usize> {
        let mut buf = Vec::new();
        buf.extend_from_slice(MAGIC_STRING);
        buf.extend_from_slice(&self.version.to_le_bytes());
        buf.push(self.compress_kind.into());
        buf.push(if self.null_supported {
            FLAG_NULL_SUPPORTED
        } else {
            0
        });
        buf.extend_from_slice(&self.stream_buffer_size.to_le_bytes());
        buf.extend_from_slice(&self.num_rows_per_block.to_le_bytes());
        buf.extend_from_slice(&self.number_of_rows.to_le_bytes());
        buf.extend_from_slice(&self.bf_hash_function_num.to_le_bytes());
        buf.extend_from_slice(&self.bf_bit_num.to_le_bytes());
        buf.extend_from_slice(&(self.columns.len() as u32).to_le_bytes());
        for c in &self.columns {
            buf.extend_from_slice(&c.unique_id.to_le_bytes());
            buf.push(c.encoding as u8);
        }
        buf.extend_from_slice(&(self.streams.len() as u32).to_le_bytes());
        for s in &self.streams {
            buf.extend_from_slice(&s.column_unique_id.to_le_bytes());
            buf.push(s.kind as u8);
            buf.extend_from_slice(&s.length.to_le_bytes());
        }
        let mut hasher = Crc32Hasher::new();
        hasher.update(&buf);
        buf.extend_from_slice(&hasher.finalize().to_le_bytes());
        w.write_all(&buf)?;
        Ok(buf.len())
    }

    /// Parses a header and returns it with the number of bytes it occupied.
    pub fn read_from<R: Read>(r: R) -> Result<(Self, u64), SegmentReadError> {
        let mut r = CrcReader::new(r);

        let mut magic = [0u8; MAGIC_STRING.len()];
        r.read_exact(&mut magic)?;
        if &magic != MAGIC_STRING {
            return Err(SegmentReadError::FileFormat(format!(
                "not a valid column data file, magic_string={:?}",
                String::from_utf8_lossy(&magic)
            )));
        }

        let version = r.read_u16()?;
        let compress_kind = CompressionKind::try_from(r.read_u8()?)?;
        let flags = r.read_u8()?;
        let stream_buffer_size = r.read_u32()?;
        let num_rows_per_block = r.read_u32()?;
        let number_of_rows = r.read_u64()?;
        let bf_hash_function_num = r.read_u32()?;
        let bf_bit_num = r.read_u32()?;

        let column_count = bounded_count(r.read_u32()?, "column")?;
        let mut columns = Vec::with_capacity(column_count);
        for _ in 0..column_count {
            let unique_id = r.read_u32()?;
            let encoding = ColumnEncoding::try_from(r.read_u8()?)?;
            columns.push(SegmentColumn {
                unique_id,
                encoding,
            });
        }

        let stream_count = bounded_count(r.read_u32()?, "stream")?;
        let mut streams = Vec::with_capacity(stream_count);
        for _ in 0..stream_count {
            let column_unique_id = r.read_u32()?;
            let kind = StreamKind::try_from(r.read_u8()?)?;
            let length = r.read_u64()?;
            streams.push(StreamDescriptor {
                column_unique_id,
                kind,
                length,
            });
        }

        let expected_crc = r.crc();
        let stored_crc = r.read_u32()?;
        if expected_crc != stored_crc {
            return Err(SegmentReadError::FileFormat(format!(
                "header CRC mismatch: stored={stored_crc:#010x} computed={expected_crc:#010x}"
            )));
        }

        let header = Self {
            version,
            compress_kind,
            null_supported: flags & FLAG_NULL_SUPPORTED != 0,
            stream_buffer_size,
            num_rows_per_block,
            number_of_rows,
            bf_hash_function_num,
            bf_bit_num,
            columns,
            streams,
        };
        Ok((header, r.consumed()))
    }
}

fn bounded_count(n: u32, what: &str) -> Result<usize, SegmentReadError> {
    if n > MAX_HEADER_ENTRIES {
        return Err(SegmentReadError::FileFormat(format!(
            "implausible {what} count {n} in header"
        )));
    }
    Ok(n as usize)
}

/// Reader that checksums and counts every byte pulled through it.
struct CrcReader<R> {
    inner: R,
    hasher: Crc32Hasher,
    consumed: u64,
}

impl<R: Read> CrcReader<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: Crc32Hasher::new(),
            consumed: 0,
        }
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), SegmentReadError> {
        self.inner.read_exact(buf).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                SegmentReadError::FileFormat("segment header truncated".into())
            } else {
                SegmentReadError::Io(e)
            }
        })?;
        self.hasher.update(buf);
        self.consumed += buf.len() as u64;
        Ok(())
    }

    fn read_u8(&mut self) -> Result<u8, SegmentReadError> {
        let mut b = [0u8; 1];
        self.read_exact(&mut b)?;
        Ok(b[0])
    }

    fn read_u16(&mut self) -> Result<u16, SegmentReadError> {
        let mut b = [0u8; 2];
        self.read_exact(&mut b)?;
        Ok(u16::from_le_bytes(b))
    }

    fn read_u32(&mut self) -> Result<u32, SegmentReadError> {
        let mut b = [0u8; 4];
        self.read_exact(&mut b)?;
        Ok(u32::from_le_bytes(b))
    }

    fn read_u64(&mut self) -> Result<u64, SegmentReadError> {
        let mut b = [0u8; 8];
        self.read_exact(&mut b)?;
        Ok(u64::from_le_bytes(b))
    }

    fn crc(&self) -> u32 {
        self.hasher.clone().finalize()
    }

    fn consumed(&self) -> u64 {
        self.consumed
    }
}
