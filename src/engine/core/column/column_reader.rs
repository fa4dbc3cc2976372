use bytes::BytesMut;

use crate::engine::core::column::{ChunkedStream, LeSliceReader, StreamPosition};
use crate::engine::core::read::row_batch::ColumnVector;
use crate::engine::errors::SegmentReadError;
use crate::engine::types::{Datum, FieldType};

enum ColumnSource {
    Stream(ChunkedStream),
    /// Column has no physical data in this segment; every row reads as this value.
    Default(Datum),
}

/// Sequential cursor over one column's decoded values.
pub struct ColumnReader {
    column_unique_id: u32,
    field_type: FieldType,
    null_supported: bool,
    source: ColumnSource,
}

impl ColumnReader {
    pub fn from_stream(
        column_unique_id: u32,
        field_type: FieldType,
        null_supported: bool,
        stream: ChunkedStream,
    ) -> Self {
        Self {
            column_unique_id,
            field_type,
            null_supported,
            source: ColumnSource::Stream(stream),
        }
    }

    pub fn with_default(column_unique_id: u32, field_type: FieldType, value: Datum) -> Self {
        Self {
            column_unique_id,
            field_type,
            null_supported: true,
            source: ColumnSource::Default(value),
        }
    }

    pub fn column_unique_id(&self) -> u32 {
        self.column_unique_id
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn is_default(&self) -> bool {
        matches!(self.source, ColumnSource::Default(_))
    }

    pub fn seek(&mut self, position: StreamPosition) -> Result<(), SegmentReadError> {
        match &mut self.source {
            ColumnSource::Stream(stream) => stream.seek(position),
            ColumnSource::Default(_) => Ok(()),
        }
    }

    /// Decodes the next `n` values into `vector`, variable-length bytes into `arena`.
    pub fn next_vector(
        &mut self,
        vector: &mut ColumnVector,
        arena: &mut BytesMut,
        n: usize,
    ) -> Result<(), SegmentReadError> {
        match &mut self.source {
            ColumnSource::Default(value) => {
                for _ in 0..n {
                    vector.push(value, arena);
                }
                Ok(())
            }
            ColumnSource::Stream(stream) => {
                for row in 0..n {
                    let (datum, consumed) = {
                        let Some(buf) = stream.current()? else {
                            return Err(SegmentReadError::FileFormat(format!(
                                "column {} data ended after {} of {} rows",
                                self.column_unique_id, row, n
                            )));
                        };
                        let mut reader = LeSliceReader::new(buf);
                        let datum = Datum::decode(&mut reader, self.field_type, self.null_supported)
                            .ok_or_else(|| {
                                SegmentReadError::FileFormat(format!(
                                    "column {} value crosses a chunk boundary",
                                    self.column_unique_id
                                ))
                            })?;
                        (datum, reader.position())
                    };
                    stream.advance(consumed);
                    vector.push(&datum, arena);
                }
                Ok(())
            }
        }
    }
}
