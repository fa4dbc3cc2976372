use crate::engine::core::segment::{SegmentHeader, StreamKind};
use crate::engine::types::{Datum, FieldType};
use crate::test_helpers::factory::Factory;

#[test]
fn writes_header_and_streams_per_column() {
    let schema = Factory::tablet_schema()
        .with_column("id", FieldType::Int64)
        .create();
    let bytes = Factory::segment_file()
        .with_schema(schema)
        .with_values(100, (0..10).map(Datum::Int).collect())
        .with_rows_per_block(4)
        .with_bloom_filter(100)
        .build_bytes();

    let (header, header_len) = SegmentHeader::read_from(&bytes[..]).expect("header");
    assert_eq!(header.number_of_rows, 10);
    assert_eq!(header.num_rows_per_block, 4);
    let kinds: Vec<_> = header.streams.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![StreamKind::RowIndex, StreamKind::BloomFilter, StreamKind::Data]
    );
    let body: u64 = header.streams.iter().map(|s| s.length).sum();
    assert_eq!(header_len + body, bytes.len() as u64);
}
