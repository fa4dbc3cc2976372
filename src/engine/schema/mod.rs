pub mod schema_file;
pub mod tablet_schema;

pub use schema_file::{ColumnEntry, SchemaFile};
pub use tablet_schema::{ColumnDef, FieldAggregation, TabletSchema};

#[cfg(test)]
mod schema_file_test;
