use crate::engine::core::index::{BloomFilterBuilder, BloomFilterIndex, IndexStreamBuffer};
use crate::engine::core::read::cache::{IndexStreamCache, IndexStreamCacheKey};
use crate::engine::core::segment::StreamKind;
use crate::engine::errors::SegmentReadError;
use crate::engine::types::Datum;

fn two_block_stream() -> Vec<u8> {
    let mut out = Vec::new();
    for block in 0..2i64 {
        let mut builder = BloomFilterBuilder::new(256, 3);
        for v in 0..10 {
            builder.add(&Datum::Int(block * 1000 + v));
        }
        out.extend(builder.finish());
    }
    out
}

#[test]
fn entries_follow_block_order() {
    let index =
        BloomFilterIndex::new(IndexStreamBuffer::Local(two_block_stream()), 256, 3).unwrap();
    assert_eq!(index.entry_count(), 2);
    assert!(index.entry(0).unwrap().test(&Datum::Int(5)));
    assert!(index.entry(1).unwrap().test(&Datum::Int(1005)));
    assert!(index.entry(2).is_none());
    assert!(!index.is_cached());
}

#[test]
fn reads_through_cache_handle() {
    let cache = IndexStreamCache::new(4096);
    let handle = cache
        .insert(
            IndexStreamCacheKey::new("seg", 1, StreamKind::BloomFilter),
            two_block_stream(),
        )
        .unwrap();
    let index = BloomFilterIndex::new(IndexStreamBuffer::Cached(handle), 256, 3).unwrap();
    assert!(index.is_cached());
    assert!(index.entry(1).unwrap().test(&Datum::Int(1009)));
}

#[test]
fn rejects_bit_count_not_multiple_of_eight() {
    let err = BloomFilterIndex::new(IndexStreamBuffer::Local(vec![0; 8]), 60, 3).unwrap_err();
    assert!(matches!(err, SegmentReadError::FileFormat(_)));
}

#[test]
fn rejects_ragged_stream_length() {
    let err = BloomFilterIndex::new(IndexStreamBuffer::Local(vec![0; 33]), 256, 3).unwrap_err();
    assert!(matches!(err, SegmentReadError::FileFormat(_)));
}
