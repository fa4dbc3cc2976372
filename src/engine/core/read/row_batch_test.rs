use crate::engine::core::filter::BlockState;
use crate::engine::core::read::RowBatch;
use crate::engine::types::{Datum, FieldType};

#[test]
fn values_round_trip_through_vectors_and_arena() {
    let mut batch = RowBatch::new(vec![0, 1], 4);
    {
        let (vector, arena) = batch.column_mut(0, FieldType::Int64);
        vector.push(&Datum::Int(5), arena);
        vector.push(&Datum::Null, arena);
    }
    {
        let (vector, arena) = batch.column_mut(1, FieldType::Varchar);
        vector.push(&Datum::from("ab"), arena);
        vector.push(&Datum::from("cde"), arena);
    }
    batch.set_size(2);

    assert_eq!(batch.values(0).unwrap(), vec![Datum::Int(5), Datum::Null]);
    assert_eq!(
        batch.values(1).unwrap(),
        vec![Datum::from("ab"), Datum::from("cde")]
    );
    assert!(batch.column(0).unwrap().has_nulls());
}

#[test]
fn reset_clears_rows_and_state() {
    let mut batch = RowBatch::new(vec![0], 2);
    {
        let (vector, arena) = batch.column_mut(0, FieldType::Double);
        vector.push(&Datum::Double(1.5), arena);
    }
    batch.set_size(1);
    batch.set_block_state(BlockState::Included);

    batch.reset();
    assert_eq!(batch.size(), 0);
    assert_eq!(batch.block_state(), BlockState::Partial);
    assert!(batch.column(0).unwrap().is_empty());
    assert!(batch.value(0, 0).is_err());
}

#[test]
fn unknown_column_is_an_input_error() {
    let mut batch = RowBatch::new(vec![0], 1);
    batch.set_size(1);
    assert!(batch.value(3, 0).is_err());
}
