use serde::Deserialize;

/// Physical type of a column as declared by the tablet schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Int32,
    Int64,
    Double,
    Varchar,
}

impl FieldType {
    /// Parse one primitive/alias (e.g., "int" -> Int32, "string" -> Varchar).
    pub fn from_primitive_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "int" | "int32" | "integer" => Some(FieldType::Int32),
            "bigint" | "int64" | "i64" => Some(FieldType::Int64),
            "double" | "float" | "f64" => Some(FieldType::Double),
            "varchar" | "string" | "text" => Some(FieldType::Varchar),
            _ => None,
        }
    }

    /// Encoded width of a non-null value, `None` for variable-length types.
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            FieldType::Int32 => Some(4),
            FieldType::Int64 | FieldType::Double => Some(8),
            FieldType::Varchar => None,
        }
    }
}
