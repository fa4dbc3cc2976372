use crate::engine::core::column::compression::CompressionKind;
use crate::engine::errors::SegmentReadError;

pub trait CompressionCodec: Send + Sync {
    fn kind(&self) -> CompressionKind;
    #[cfg(test)]
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>, SegmentReadError>;
    /// Decodes one chunk whose decoded size is known from the chunk header.
    fn decompress(&self, input: &[u8], uncompressed_len: usize)
    -> Result<Vec<u8>, SegmentReadError>;
}

fn check_len(out: Vec<u8>, expected: usize, kind: CompressionKind) -> Result<Vec<u8>, SegmentReadError> {
    if out.len() != expected {
        return Err(SegmentReadError::FileFormat(format!(
            "{:?} chunk decoded to {} bytes, header says {}",
            kind,
            out.len(),
            expected
        )));
    }
    Ok(out)
}

pub struct NoneCodec;

impl CompressionCodec for NoneCodec {
    fn kind(&self) -> CompressionKind {
        CompressionKind::None
    }
    #[cfg(test)]
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>, SegmentReadError> {
        Ok(input.to_vec())
    }
    fn decompress(&self, input: &[u8], uncompressed_len: usize) -> Result<Vec<u8>, SegmentReadError> {
        check_len(input.to_vec(), uncompressed_len, self.kind())
    }
}

pub struct Lz4Codec;

impl CompressionCodec for Lz4Codec {
    fn kind(&self) -> CompressionKind {
        CompressionKind::Lz4
    }
    #[cfg(test)]
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>, SegmentReadError> {
        Ok(lz4_flex::block::compress(input))
    }
    fn decompress(&self, input: &[u8], uncompressed_len: usize) -> Result<Vec<u8>, SegmentReadError> {
        let out = lz4_flex::block::decompress(input, uncompressed_len)
            .map_err(|e| SegmentReadError::FileFormat(format!("lz4 decompress: {e}")))?;
        check_len(out, uncompressed_len, self.kind())
    }
}

pub struct ZstdCodec {
    pub level: i32,
}

impl Default for ZstdCodec {
    fn default() -> Self {
        Self { level: 3 }
    }
}

impl CompressionCodec for ZstdCodec {
    fn kind(&self) -> CompressionKind {
        CompressionKind::Zstd
    }
    #[cfg(test)]
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>, SegmentReadError> {
        zstd::bulk::compress(input, self.level).map_err(SegmentReadError::Io)
    }
    fn decompress(&self, input: &[u8], uncompressed_len: usize) -> Result<Vec<u8>, SegmentReadError> {
        let out = zstd::bulk::decompress(input, uncompressed_len)
            .map_err(|e| SegmentReadError::FileFormat(format!("zstd decompress: {e}")))?;
        check_len(out, uncompressed_len, self.kind())
    }
}
