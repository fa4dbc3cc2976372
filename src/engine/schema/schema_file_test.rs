use crate::engine::schema::{FieldAggregation, SchemaFile};
use crate::engine::types::{Datum, FieldType};

#[test]
fn parses_columns_in_order_with_defaults() {
    let schema = SchemaFile::parse(
        r#"
        [[columns]]
        name = "id"
        unique_id = 100
        type = "int64"

        [[columns]]
        name = "amount"
        unique_id = 102
        type = "double"
        aggregation = "sum"

        [[columns]]
        name = "region"
        unique_id = 105
        type = "varchar"
        default = "eu"
        "#,
    )
    .expect("parse")
    .into_schema();

    assert_eq!(schema.num_columns(), 3);
    let id = schema.column(0).unwrap();
    assert_eq!(id.unique_id, 100);
    assert_eq!(id.field_type, FieldType::Int64);
    assert_eq!(schema.aggregation(1), FieldAggregation::Sum);
    assert_eq!(
        schema.column(2).unwrap().default_value,
        Some(Datum::from("eu"))
    );
}

#[test]
fn unknown_type_is_rejected() {
    let err = SchemaFile::parse(
        r#"
        [[columns]]
        name = "x"
        unique_id = 1
        type = "decimal"
        "#,
    );
    assert!(err.is_err());
}
