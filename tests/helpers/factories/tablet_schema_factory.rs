use crate::engine::schema::{ColumnDef, FieldAggregation, TabletSchema};
use crate::engine::types::{Datum, FieldType};

/// Builds tablet schemas; unique ids default to `100 + position`.
pub struct TabletSchemaFactory {
    columns: Vec<ColumnDef>,
}

impl TabletSchemaFactory {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    pub fn with_column(mut self, name: &str, field_type: FieldType) -> Self {
        let unique_id = 100 + self.columns.len() as u32;
        self.columns.push(ColumnDef::new(name, unique_id, field_type));
        self
    }

    pub fn with_aggregated_column(
        mut self,
        name: &str,
        field_type: FieldType,
        aggregation: FieldAggregation,
    ) -> Self {
        let unique_id = 100 + self.columns.len() as u32;
        self.columns
            .push(ColumnDef::new(name, unique_id, field_type).with_aggregation(aggregation));
        self
    }

    pub fn with_default(mut self, value: Datum) -> Self {
        if let Some(last) = self.columns.pop() {
            self.columns.push(last.with_default(value));
        }
        self
    }

    /// Two columns: `id` (int64) and `name` (varchar).
    pub fn id_and_name(self) -> Self {
        self.with_column("id", FieldType::Int64)
            .with_column("name", FieldType::Varchar)
    }

    pub fn create(self) -> TabletSchema {
        TabletSchema::new(self.columns)
    }
}
