pub mod datum;
pub mod field_type;

pub use datum::Datum;
pub use field_type::FieldType;

/// Query-visible (tablet schema) column id.
pub type ColumnId = u32;

#[cfg(test)]
mod datum_test;
