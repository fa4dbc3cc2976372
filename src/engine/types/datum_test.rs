use crate::engine::core::column::LeSliceReader;
use crate::engine::types::{Datum, FieldType};

#[test]
fn null_sorts_before_every_value() {
    assert!(Datum::Null < Datum::Int(i64::MIN));
    assert!(Datum::Null < Datum::Double(f64::NEG_INFINITY));
    assert!(Datum::Null < Datum::from(""));
    assert_eq!(Datum::Null, Datum::Null);
}

#[test]
fn mixed_numeric_comparison_uses_numeric_value() {
    assert!(Datum::Int(2) > Datum::Double(1.5));
    assert_eq!(Datum::Int(3), Datum::Double(3.0));
}

#[test]
fn varchar_decodes_after_nullable_encoding() {
    let mut buf = Vec::new();
    Datum::from("abc").encode_into(FieldType::Varchar, true, &mut buf);
    Datum::Null.encode_into(FieldType::Varchar, true, &mut buf);
    Datum::from(7i32).encode_into(FieldType::Int32, true, &mut buf);

    let mut reader = LeSliceReader::new(&buf);
    assert_eq!(
        Datum::decode(&mut reader, FieldType::Varchar, true),
        Some(Datum::from("abc"))
    );
    assert_eq!(Datum::decode(&mut reader, FieldType::Varchar, true), Some(Datum::Null));
    assert_eq!(Datum::decode(&mut reader, FieldType::Int32, true), Some(Datum::Int(7)));
    assert_eq!(reader.remaining(), 0);
}

#[test]
fn truncated_value_decodes_to_none() {
    let mut buf = Vec::new();
    Datum::Int(1234).encode_into(FieldType::Int64, false, &mut buf);
    let mut reader = LeSliceReader::new(&buf[..5]);
    assert_eq!(Datum::decode(&mut reader, FieldType::Int64, false), None);
}

#[test]
fn key_bytes_distinguish_int_and_double() {
    assert_ne!(Datum::Int(1).key_bytes(), Datum::Double(1.0).key_bytes());
    assert_eq!(Datum::Null.key_bytes(), None);
}

#[test]
fn coerce_to_matches_the_column_representation() {
    assert_eq!(
        Datum::Int(57).coerce_to(FieldType::Double),
        Some(Datum::Double(57.0))
    );
    assert_eq!(
        Datum::Int(57).coerce_to(FieldType::Double).unwrap().key_bytes(),
        Datum::Double(57.0).key_bytes()
    );
    assert_eq!(Datum::Double(12.0).coerce_to(FieldType::Int64), Some(Datum::Int(12)));
    assert_eq!(
        Datum::from("x").coerce_to(FieldType::Varchar),
        Some(Datum::from("x"))
    );
}

#[test]
fn coerce_to_gives_up_without_a_single_equal_value() {
    assert_eq!(Datum::Double(1.5).coerce_to(FieldType::Int64), None);
    assert_eq!(Datum::Double(1.0e16).coerce_to(FieldType::Int64), None);
    assert_eq!(Datum::Int(i64::MAX).coerce_to(FieldType::Int32), None);
    assert_eq!(Datum::Int(1).coerce_to(FieldType::Varchar), None);
    assert_eq!(Datum::Null.coerce_to(FieldType::Int64), None);
}
