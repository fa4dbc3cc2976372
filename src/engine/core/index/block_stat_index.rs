use crate::engine::core::column::{LeSliceReader, StreamPosition};
use crate::engine::errors::SegmentReadError;
use crate::engine::types::{Datum, FieldType};

/// Min/max summary of one block and where its rows start in the data stream.
#[derive(Debug, Clone, PartialEq)]
pub struct StatEntry {
    pub position: StreamPosition,
    pub min: Datum,
    pub max: Datum,
}

impl StatEntry {
    pub fn has_nulls(&self) -> bool {
        self.min.is_null()
    }

    #[cfg(test)]
    pub fn encode_into(&self, field_type: FieldType, null_supported: bool, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.position.chunk_offset.to_le_bytes());
        buf.extend_from_slice(&self.position.offset_in_chunk.to_le_bytes());
        self.min.encode_into(field_type, null_supported, buf);
        self.max.encode_into(field_type, null_supported, buf);
    }
}

/// Per-block statistics of one column, in block order.
#[derive(Debug, Clone, Default)]
pub struct BlockStatIndex {
    entries: Vec<StatEntry>,
}

impl BlockStatIndex {
    pub fn parse(
        bytes: &[u8],
        field_type: FieldType,
        null_supported: bool,
    ) -> Result<Self, SegmentReadError> {
        let mut reader = LeSliceReader::new(bytes);
        let mut entries = Vec::new();
        while reader.remaining() > 0 {
            let entry = Self::parse_entry(&mut reader, field_type, null_supported).ok_or_else(
                || {
                    SegmentReadError::FileFormat(format!(
                        "row index entry {} truncated at byte {}",
                        entries.len(),
                        reader.position()
                    ))
                },
            )?;
            entries.push(entry);
        }
        Ok(Self { entries })
    }

    fn parse_entry(
        reader: &mut LeSliceReader<'_>,
        field_type: FieldType,
        null_supported: bool,
    ) -> Option<StatEntry> {
        let chunk_offset = reader.read_u64()?;
        let offset_in_chunk = reader.read_u32()?;
        let min = Datum::decode(reader, field_type, null_supported)?;
        let max = Datum::decode(reader, field_type, null_supported)?;
        Some(StatEntry {
            position: StreamPosition {
                chunk_offset,
                offset_in_chunk,
            },
            min,
            max,
        })
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn entry(&self, block_id: u32) -> Option<&StatEntry> {
        self.entries.get(block_id as usize)
    }

    pub fn entries(&self) -> &[StatEntry] {
        &self.entries
    }
}
