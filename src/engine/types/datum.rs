use std::cmp::Ordering;

use crate::engine::core::column::LeSliceReader;
use crate::engine::types::FieldType;

pub const NULL_FLAG: u8 = 1;

/// A single typed value as it appears in column data and block statistics.
///
/// Ordering places `Null` before every non-null value, which is how block
/// statistics report the presence of nulls in `min`.
#[derive(Debug, Clone)]
pub enum Datum {
    Null,
    Int(i64),
    Double(f64),
    Bytes(Vec<u8>),
}

impl Datum {
    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }

    pub fn from_str_value(s: &str) -> Self {
        Datum::Bytes(s.as_bytes().to_vec())
    }

    /// Bytes hashed into bloom filters.
    pub fn key_bytes(&self) -> Option<Vec<u8>> {
        match self {
            Datum::Null => None,
            Datum::Int(v) => Some(v.to_le_bytes().to_vec()),
            Datum::Double(v) => Some(v.to_bits().to_le_bytes().to_vec()),
            Datum::Bytes(b) => Some(b.clone()),
        }
    }

    /// This value as a column of `field_type` would store it, so that it hashes
    /// like the stored values. `None` when no single stored value is its equal.
    pub fn coerce_to(&self, field_type: FieldType) -> Option<Datum> {
        match (field_type, self) {
            (FieldType::Int32, Datum::Int(v)) => i32::try_from(*v).ok().map(|_| Datum::Int(*v)),
            (FieldType::Int64, Datum::Int(v)) => Some(Datum::Int(*v)),
            (FieldType::Int32, Datum::Double(v)) => exact_int(*v)
                .filter(|i| i32::try_from(*i).is_ok())
                .map(Datum::Int),
            (FieldType::Int64, Datum::Double(v)) => exact_int(*v).map(Datum::Int),
            (FieldType::Double, Datum::Int(v)) => Some(Datum::Double(*v as f64)),
            (FieldType::Double, Datum::Double(_)) | (FieldType::Varchar, Datum::Bytes(_)) => {
                Some(self.clone())
            }
            _ => None,
        }
    }

    /// Appends the DIRECT encoding of this value.
    #[cfg(test)]
    pub fn encode_into(&self, field_type: FieldType, null_supported: bool, buf: &mut Vec<u8>) {
        if null_supported {
            buf.push(if self.is_null() { NULL_FLAG } else { 0 });
            if self.is_null() {
                return;
            }
        }
        match (field_type, self) {
            (FieldType::Int32, Datum::Int(v)) => buf.extend_from_slice(&(*v as i32).to_le_bytes()),
            (FieldType::Int64, Datum::Int(v)) => buf.extend_from_slice(&v.to_le_bytes()),
            (FieldType::Double, Datum::Double(v)) => {
                buf.extend_from_slice(&v.to_bits().to_le_bytes())
            }
            (FieldType::Varchar, Datum::Bytes(b)) => {
                buf.extend_from_slice(&(b.len() as u32).to_le_bytes());
                buf.extend_from_slice(b);
            }
            // Type mismatch or null without null support: write the zero value.
            (FieldType::Int32, _) => buf.extend_from_slice(&0i32.to_le_bytes()),
            (FieldType::Int64, _) | (FieldType::Double, _) => {
                buf.extend_from_slice(&0u64.to_le_bytes())
            }
            (FieldType::Varchar, _) => buf.extend_from_slice(&0u32.to_le_bytes()),
        }
    }

    /// Decodes one value; `None` means the input was truncated.
    pub fn decode(
        reader: &mut LeSliceReader<'_>,
        field_type: FieldType,
        null_supported: bool,
    ) -> Option<Datum> {
        if null_supported && reader.read_u8()? == NULL_FLAG {
            return Some(Datum::Null);
        }
        let datum = match field_type {
            FieldType::Int32 => Datum::Int(reader.read_i32()? as i64),
            FieldType::Int64 => Datum::Int(reader.read_i64()?),
            FieldType::Double => Datum::Double(f64::from_bits(reader.read_u64()?)),
            FieldType::Varchar => {
                let len = reader.read_u32()? as usize;
                Datum::Bytes(reader.read_bytes(len)?.to_vec())
            }
        };
        Some(datum)
    }

    fn rank(&self) -> u8 {
        match self {
            Datum::Null => 0,
            Datum::Int(_) => 1,
            Datum::Double(_) => 2,
            Datum::Bytes(_) => 3,
        }
    }
}

/// The only integer equal to `v`; above 2^53 several integers share one double.
fn exact_int(v: f64) -> Option<i64> {
    const EXACT_LIMIT: f64 = (1u64 << 53) as f64;
    (v.fract() == 0.0 && v.abs() < EXACT_LIMIT).then_some(v as i64)
}

impl PartialEq for Datum {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Datum {}

impl PartialOrd for Datum {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Datum {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Datum::Int(a), Datum::Int(b)) => a.cmp(b),
            (Datum::Double(a), Datum::Double(b)) => a.total_cmp(b),
            (Datum::Int(a), Datum::Double(b)) => (*a as f64).total_cmp(b),
            (Datum::Double(a), Datum::Int(b)) => a.total_cmp(&(*b as f64)),
            (Datum::Bytes(a), Datum::Bytes(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl From<i64> for Datum {
    fn from(v: i64) -> Self {
        Datum::Int(v)
    }
}

impl From<i32> for Datum {
    fn from(v: i32) -> Self {
        Datum::Int(v as i64)
    }
}

impl From<f64> for Datum {
    fn from(v: f64) -> Self {
        Datum::Double(v)
    }
}

impl From<&str> for Datum {
    fn from(v: &str) -> Self {
        Datum::from_str_value(v)
    }
}
