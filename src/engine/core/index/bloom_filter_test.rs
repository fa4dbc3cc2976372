use crate::engine::core::index::{BloomFilter, BloomFilterBuilder};
use crate::engine::types::Datum;

#[test]
fn added_values_are_always_reported_present() {
    let mut builder = BloomFilterBuilder::new(1024, 3);
    for v in 0..50i64 {
        builder.add(&Datum::Int(v));
    }
    builder.add(&Datum::from("alpha"));
    let bits = builder.finish();
    let filter = BloomFilter::new(&bits, 3);

    for v in 0..50i64 {
        assert!(filter.test(&Datum::Int(v)));
    }
    assert!(filter.test(&Datum::from("alpha")));
}

#[test]
fn empty_filter_rejects_values() {
    let bits = BloomFilterBuilder::new(512, 2).finish();
    let filter = BloomFilter::new(&bits, 2);
    assert!(!filter.test(&Datum::Int(7)));
    assert!(!filter.test(&Datum::from("x")));
    assert!(filter.test(&Datum::Null));
}

#[test]
fn zero_sized_filter_cannot_prune() {
    let filter = BloomFilter::new(&[], 3);
    assert!(filter.test(&Datum::Int(1)));
}

#[test]
fn false_positive_rate_is_bounded_for_sparse_filter() {
    let mut builder = BloomFilterBuilder::new(8192, 4);
    for v in 0..100i64 {
        builder.add(&Datum::Int(v));
    }
    let bits = builder.finish();
    let filter = BloomFilter::new(&bits, 4);
    let false_positives = (10_000..11_000i64)
        .filter(|v| filter.test(&Datum::Int(*v)))
        .count();
    assert!(false_positives < 100, "too many false positives: {false_positives}");
}
