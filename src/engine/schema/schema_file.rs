use serde::Deserialize;

use crate::engine::schema::{ColumnDef, FieldAggregation, TabletSchema};
use crate::engine::types::{Datum, FieldType};

/// On-disk TOML description of a tablet schema, one `[[columns]]` table per
/// column in query column id order.
#[derive(Debug, Deserialize)]
pub struct SchemaFile {
    pub columns: Vec<ColumnEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ColumnEntry {
    pub name: String,
    pub unique_id: u32,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub aggregation: FieldAggregation,
    #[serde(default)]
    pub default: Option<toml::Value>,
}

impl SchemaFile {
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn into_schema(self) -> TabletSchema {
        let columns = self
            .columns
            .into_iter()
            .map(|entry| {
                let mut column = ColumnDef::new(entry.name, entry.unique_id, entry.field_type)
                    .with_aggregation(entry.aggregation);
                if let Some(value) = entry.default.as_ref().and_then(default_datum) {
                    column = column.with_default(value);
                }
                column
            })
            .collect();
        TabletSchema::new(columns)
    }
}

fn default_datum(value: &toml::Value) -> Option<Datum> {
    match value {
        toml::Value::Integer(v) => Some(Datum::Int(*v)),
        toml::Value::Float(v) => Some(Datum::Double(*v)),
        toml::Value::String(s) => Some(Datum::from(s.as_str())),
        _ => None,
    }
}
