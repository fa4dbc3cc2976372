use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::engine::core::column::compression::DecompressorRegistry;
use crate::engine::core::column::{ChunkedStream, ColumnReader};
use crate::engine::core::index::LoadedIndexes;
use crate::engine::core::read::RowBatch;
use crate::engine::core::segment::{ColumnIdMapping, OpenedSegment, StreamKind};
use crate::engine::errors::SegmentReadError;
use crate::engine::schema::TabletSchema;
use crate::engine::types::{ColumnId, Datum};

/// One reader per decoded column, keyed by query column id.
pub struct ColumnReaderSet {
    readers: BTreeMap<ColumnId, ColumnReader>,
}

impl ColumnReaderSet {
    pub fn create(
        segment: &OpenedSegment,
        schema: &TabletSchema,
        mapping: &ColumnIdMapping,
        columns: &[ColumnId],
        decompressors: &DecompressorRegistry,
    ) -> Result<Self, SegmentReadError> {
        let header = &segment.header;
        let codec = decompressors.get(header.compress_kind)?;
        let mut readers = BTreeMap::new();

        for &table_id in columns {
            let column = schema.column(table_id).ok_or_else(|| {
                SegmentReadError::InputParameter(format!(
                    "column {table_id} is not part of the tablet schema"
                ))
            })?;
            let unique_id = column.unique_id;

            let reader = if mapping.in_segment(unique_id) {
                let span = segment
                    .streams
                    .iter()
                    .find(|s| {
                        s.descriptor.column_unique_id == unique_id
                            && s.descriptor.kind == StreamKind::Data
                    })
                    .ok_or_else(|| {
                        SegmentReadError::FileFormat(format!(
                            "column {unique_id} has no data stream"
                        ))
                    })?;
                let stream = ChunkedStream::new(
                    segment.file.clone(),
                    *span,
                    codec.clone(),
                    header.stream_buffer_size as usize,
                );
                ColumnReader::from_stream(unique_id, column.field_type, header.null_supported, stream)
            } else {
                debug!(
                    target: "colseg::reader",
                    column = %column.name,
                    unique_id,
                    "Column missing from segment, reading default value"
                );
                let value = column.default_value.clone().unwrap_or(Datum::Null);
                ColumnReader::with_default(unique_id, column.field_type, value)
            };
            readers.insert(table_id, reader);
        }

        Ok(Self { readers })
    }

    pub fn len(&self) -> usize {
        self.readers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readers.is_empty()
    }

    pub fn reader(&self, column: ColumnId) -> Option<&ColumnReader> {
        self.readers.get(&column)
    }

    /// Positions the readers of `columns` at the start of `block`. Columns
    /// without an index entry have no physical data to position and are left
    /// alone. End of stream comes back as `DataEof`.
    pub fn seek_to_block(
        &mut self,
        block: u32,
        columns: &[ColumnId],
        indexes: &LoadedIndexes,
    ) -> Result<(), SegmentReadError> {
        for column in columns {
            let Some(reader) = self.readers.get_mut(column) else {
                continue;
            };
            let unique_id = reader.column_unique_id();
            let Some(entry) = indexes
                .stat_index(unique_id)
                .and_then(|index| index.entry(block))
            else {
                continue;
            };
            if let Err(e) = reader.seek(entry.position) {
                if e.is_data_eof() {
                    debug!(
                        target: "colseg::reader",
                        column_unique_id = unique_id,
                        block,
                        "Column stream reached end of data"
                    );
                    return Err(SegmentReadError::DataEof);
                }
                warn!(
                    target: "colseg::reader",
                    column_unique_id = unique_id,
                    block,
                    error = %e,
                    "Failed to seek column"
                );
                return Err(SegmentReadError::ColumnSeek {
                    column_unique_id: unique_id,
                    block_id: block,
                    reason: e.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Decodes `rows` values of every batch column into the batch.
    pub fn load(&mut self, batch: &mut RowBatch, rows: usize) -> Result<(), SegmentReadError> {
        let columns = batch.columns().to_vec();
        for column in columns {
            let reader = self.readers.get_mut(&column).ok_or_else(|| {
                SegmentReadError::InputParameter(format!(
                    "batch column {column} was not opened by the reader"
                ))
            })?;
            let (vector, arena) = batch.column_mut(column, reader.field_type());
            reader.next_vector(vector, arena, rows)?;
        }
        batch.set_size(rows);
        Ok(())
    }
}
