use serde::Deserialize;

use crate::engine::types::{ColumnId, Datum, FieldType};

/// How rows with equal keys are merged. Only `None` columns carry statistics
/// that reflect the final merged value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldAggregation {
    #[default]
    None,
    Sum,
    Min,
    Max,
    Replace,
    ReplaceIfNotNull,
}

#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub name: String,
    pub unique_id: u32,
    pub field_type: FieldType,
    pub aggregation: FieldAggregation,
    pub is_nullable: bool,
    /// Value produced for segments written before the column existed.
    pub default_value: Option<Datum>,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, unique_id: u32, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            unique_id,
            field_type,
            aggregation: FieldAggregation::None,
            is_nullable: true,
            default_value: None,
        }
    }

    pub fn with_aggregation(mut self, aggregation: FieldAggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    pub fn with_default(mut self, value: Datum) -> Self {
        self.default_value = Some(value);
        self
    }
}

/// Column definitions of a tablet, indexed by query-visible column id.
#[derive(Debug, Clone, Default)]
pub struct TabletSchema {
    columns: Vec<ColumnDef>,
}

impl TabletSchema {
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        Self { columns }
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, id: ColumnId) -> Option<&ColumnDef> {
        self.columns.get(id as usize)
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn aggregation(&self, id: ColumnId) -> FieldAggregation {
        self.column(id)
            .map(|c| c.aggregation)
            .unwrap_or(FieldAggregation::None)
    }

    pub fn column_by_name(&self, name: &str) -> Option<(ColumnId, &ColumnDef)> {
        self.columns
            .iter()
            .enumerate()
            .find(|(_, c)| c.name == name)
            .map(|(i, c)| (i as ColumnId, c))
    }
}
