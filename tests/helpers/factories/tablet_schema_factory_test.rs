use crate::engine::schema::FieldAggregation;
use crate::engine::types::{Datum, FieldType};
use crate::test_helpers::factory::Factory;

#[test]
fn assigns_unique_ids_by_position() {
    let schema = Factory::tablet_schema()
        .with_column("a", FieldType::Int32)
        .with_aggregated_column("b", FieldType::Int64, FieldAggregation::Sum)
        .with_default(Datum::Int(0))
        .create();
    assert_eq!(schema.num_columns(), 2);
    assert_eq!(schema.column(0).unwrap().unique_id, 100);
    assert_eq!(schema.column(1).unwrap().unique_id, 101);
    assert_eq!(schema.aggregation(1), FieldAggregation::Sum);
    assert_eq!(schema.column(1).unwrap().default_value, Some(Datum::Int(0)));
}
