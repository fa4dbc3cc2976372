use std::collections::HashMap;

use bytes::BytesMut;

use crate::engine::core::filter::BlockState;
use crate::engine::errors::SegmentReadError;
use crate::engine::types::{ColumnId, Datum, FieldType};

#[derive(Debug, Clone)]
enum VectorData {
    Int(Vec<i64>),
    Double(Vec<f64>),
    /// `(start, len)` ranges into the owning batch's arena.
    Bytes(Vec<(usize, usize)>),
}

/// Decoded values of one column for the rows of a batch.
#[derive(Debug, Clone)]
pub struct ColumnVector {
    field_type: FieldType,
    nulls: Vec<bool>,
    data: VectorData,
}

impl ColumnVector {
    pub fn new(field_type: FieldType, capacity: usize) -> Self {
        let data = match field_type {
            FieldType::Int32 | FieldType::Int64 => VectorData::Int(Vec::with_capacity(capacity)),
            FieldType::Double => VectorData::Double(Vec::with_capacity(capacity)),
            FieldType::Varchar => VectorData::Bytes(Vec::with_capacity(capacity)),
        };
        Self {
            field_type,
            nulls: Vec::with_capacity(capacity),
            data,
        }
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn len(&self) -> usize {
        self.nulls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nulls.is_empty()
    }

    pub fn has_nulls(&self) -> bool {
        self.nulls.iter().any(|n| *n)
    }

    pub fn push(&mut self, value: &Datum, arena: &mut BytesMut) {
        self.nulls.push(value.is_null());
        match (&mut self.data, value) {
            (VectorData::Int(v), Datum::Int(x)) => v.push(*x),
            (VectorData::Double(v), Datum::Double(x)) => v.push(*x),
            (VectorData::Bytes(v), Datum::Bytes(b)) => {
                let start = arena.len();
                arena.extend_from_slice(b);
                v.push((start, b.len()));
            }
            (VectorData::Int(v), _) => v.push(0),
            (VectorData::Double(v), _) => v.push(0.0),
            (VectorData::Bytes(v), _) => v.push((arena.len(), 0)),
        }
    }

    fn get(&self, row: usize, arena: &[u8]) -> Option<Datum> {
        if *self.nulls.get(row)? {
            return Some(Datum::Null);
        }
        match &self.data {
            VectorData::Int(v) => v.get(row).map(|x| Datum::Int(*x)),
            VectorData::Double(v) => v.get(row).map(|x| Datum::Double(*x)),
            VectorData::Bytes(v) => v
                .get(row)
                .and_then(|(start, len)| arena.get(*start..*start + *len))
                .map(|b| Datum::Bytes(b.to_vec())),
        }
    }

    fn clear(&mut self) {
        self.nulls.clear();
        match &mut self.data {
            VectorData::Int(v) => v.clear(),
            VectorData::Double(v) => v.clear(),
            VectorData::Bytes(v) => v.clear(),
        }
    }
}

/// Caller-owned output of `get_block`: one vector per requested column plus an
/// arena holding variable-length bytes. Reset releases nothing but lengths.
#[derive(Debug)]
pub struct RowBatch {
    columns: Vec<ColumnId>,
    capacity: usize,
    size: usize,
    vectors: HashMap<ColumnId, ColumnVector>,
    arena: BytesMut,
    block_state: BlockState,
}

impl RowBatch {
    pub fn new(columns: Vec<ColumnId>, capacity: usize) -> Self {
        Self {
            columns,
            capacity,
            size: 0,
            vectors: HashMap::new(),
            arena: BytesMut::new(),
            block_state: BlockState::Partial,
        }
    }

    pub fn columns(&self) -> &[ColumnId] {
        &self.columns
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn set_size(&mut self, size: usize) {
        self.size = size;
    }

    pub fn block_state(&self) -> BlockState {
        self.block_state
    }

    pub fn set_block_state(&mut self, state: BlockState) {
        self.block_state = state;
    }

    pub fn reset(&mut self) {
        self.size = 0;
        self.arena.clear();
        for vector in self.vectors.values_mut() {
            vector.clear();
        }
        self.block_state = BlockState::Partial;
    }

    /// Vector for `column` together with the arena, created on first use.
    pub fn column_mut(
        &mut self,
        column: ColumnId,
        field_type: FieldType,
    ) -> (&mut ColumnVector, &mut BytesMut) {
        let capacity = self.capacity;
        let vector = self
            .vectors
            .entry(column)
            .or_insert_with(|| ColumnVector::new(field_type, capacity));
        (vector, &mut self.arena)
    }

    pub fn column(&self, column: ColumnId) -> Option<&ColumnVector> {
        self.vectors.get(&column)
    }

    pub fn value(&self, column: ColumnId, row: usize) -> Result<Datum, SegmentReadError> {
        if row >= self.size {
            return Err(SegmentReadError::InputParameter(format!(
                "row {row} outside batch of {} rows",
                self.size
            )));
        }
        self.vectors
            .get(&column)
            .and_then(|v| v.get(row, &self.arena))
            .ok_or_else(|| {
                SegmentReadError::InputParameter(format!("column {column} not loaded in batch"))
            })
    }

    /// Materializes one column of the batch.
    pub fn values(&self, column: ColumnId) -> Result<Vec<Datum>, SegmentReadError> {
        (0..self.size).map(|row| self.value(column, row)).collect()
    }
}
