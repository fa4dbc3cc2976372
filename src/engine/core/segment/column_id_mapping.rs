use std::collections::{BTreeSet, HashMap};

use crate::engine::core::segment::{ColumnEncoding, SegmentHeader};
use crate::engine::errors::SegmentReadError;
use crate::engine::schema::TabletSchema;
use crate::engine::types::ColumnId;

/// Lookup between query column ids, storage unique ids and segment-local ids.
///
/// Rebuilt on every open from the caller's requested and bloom-filter column
/// sets; header columns nobody asked for are left unmapped.
#[derive(Debug, Default, Clone)]
pub struct ColumnIdMapping {
    table_to_unique: HashMap<ColumnId, u32>,
    unique_to_table: HashMap<u32, ColumnId>,
    unique_to_segment: HashMap<u32, u32>,
    encodings: HashMap<u32, ColumnEncoding>,
}

impl ColumnIdMapping {
    pub fn build(
        schema: &TabletSchema,
        used_columns: &[ColumnId],
        bf_columns: &BTreeSet<ColumnId>,
        header: &SegmentHeader,
    ) -> Result<Self, SegmentReadError> {
        let mut mapping = Self::default();

        for &table_id in used_columns.iter().chain(bf_columns.iter()) {
            let column = schema.column(table_id).ok_or_else(|| {
                SegmentReadError::InputParameter(format!(
                    "column {table_id} is not part of the tablet schema"
                ))
            })?;
            mapping.table_to_unique.insert(table_id, column.unique_id);
            mapping.unique_to_table.insert(column.unique_id, table_id);
        }

        for (segment_id, column) in header.columns.iter().enumerate() {
            if mapping.unique_to_table.contains_key(&column.unique_id) {
                mapping
                    .unique_to_segment
                    .insert(column.unique_id, segment_id as u32);
                mapping.encodings.insert(column.unique_id, column.encoding);
            }
        }

        Ok(mapping)
    }

    pub fn unique_id(&self, table_id: ColumnId) -> Option<u32> {
        self.table_to_unique.get(&table_id).copied()
    }

    pub fn table_id(&self, unique_id: u32) -> Option<ColumnId> {
        self.unique_to_table.get(&unique_id).copied()
    }

    pub fn segment_id(&self, unique_id: u32) -> Option<u32> {
        self.unique_to_segment.get(&unique_id).copied()
    }

    /// True when the column has physical data in this segment.
    pub fn in_segment(&self, unique_id: u32) -> bool {
        self.unique_to_segment.contains_key(&unique_id)
    }

    pub fn encoding(&self, unique_id: u32) -> Option<ColumnEncoding> {
        self.encodings.get(&unique_id).copied()
    }

    pub fn mapped_in_segment(&self) -> usize {
        self.unique_to_segment.len()
    }
}
