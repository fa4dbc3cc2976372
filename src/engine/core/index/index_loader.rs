use std::collections::{BTreeSet, HashMap};
use std::time::Instant;

use tracing::{debug, info};

use crate::engine::core::column::ChunkedStream;
use crate::engine::core::column::compression::DecompressorRegistry;
use crate::engine::core::index::{BlockStatIndex, BloomFilterIndex, IndexStreamBuffer};
use crate::engine::core::read::ReaderStatistics;
use crate::engine::core::read::cache::{IndexStreamCache, IndexStreamCacheKey};
use crate::engine::core::read::reader_stats::elapsed_ns;
use crate::engine::core::segment::{ColumnIdMapping, OpenedSegment, StreamKind, StreamSpan};
use crate::engine::errors::SegmentReadError;
use crate::engine::schema::TabletSchema;
use crate::engine::types::ColumnId;

/// Indexes of one segment, keyed by column unique id.
#[derive(Debug, Default)]
pub struct LoadedIndexes {
    pub stat_indices: HashMap<u32, BlockStatIndex>,
    pub bloom_filters: HashMap<u32, BloomFilterIndex>,
    pub block_count: u32,
}

impl LoadedIndexes {
    pub fn stat_index(&self, unique_id: u32) -> Option<&BlockStatIndex> {
        self.stat_indices.get(&unique_id)
    }

    pub fn bloom_filter(&self, unique_id: u32) -> Option<&BloomFilterIndex> {
        self.bloom_filters.get(&unique_id)
    }
}

/// Loads the row-index and bloom-filter streams of the mapped columns.
pub struct IndexLoader<'a> {
    segment: &'a OpenedSegment,
    schema: &'a TabletSchema,
    mapping: &'a ColumnIdMapping,
    bf_columns: &'a BTreeSet<ColumnId>,
    decompressors: &'a DecompressorRegistry,
    cache: Option<&'a IndexStreamCache>,
}

impl<'a> IndexLoader<'a> {
    pub fn new(
        segment: &'a OpenedSegment,
        schema: &'a TabletSchema,
        mapping: &'a ColumnIdMapping,
        bf_columns: &'a BTreeSet<ColumnId>,
        decompressors: &'a DecompressorRegistry,
    ) -> Self {
        Self {
            segment,
            schema,
            mapping,
            bf_columns,
            decompressors,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: Option<&'a IndexStreamCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Loads every relevant index stream and checks that each one describes
    /// exactly `expected_blocks` blocks. Freshly read streams are inserted into
    /// the cache only when `use_cache` is set.
    pub fn load(
        &self,
        expected_blocks: u32,
        use_cache: bool,
        stats: &mut ReaderStatistics,
    ) -> Result<LoadedIndexes, SegmentReadError> {
        let start = Instant::now();
        let mut loaded = LoadedIndexes {
            block_count: expected_blocks,
            ..Default::default()
        };

        for span in &self.segment.streams {
            let unique_id = span.descriptor.column_unique_id;
            let Some(table_id) = self.mapping.table_id(unique_id) else {
                continue;
            };
            if !self.mapping.in_segment(unique_id) {
                continue;
            }
            match span.descriptor.kind {
                StreamKind::RowIndex => {
                    let Some(column) = self.schema.column(table_id) else {
                        continue;
                    };
                    let buffer = self.fetch(span, use_cache, stats)?;
                    let index = BlockStatIndex::parse(
                        buffer.bytes(),
                        column.field_type,
                        self.segment.header.null_supported,
                    )?;
                    check_entry_count(
                        unique_id,
                        span.descriptor.kind,
                        index.entry_count(),
                        expected_blocks,
                    )?;
                    loaded.stat_indices.insert(unique_id, index);
                }
                StreamKind::BloomFilter if self.bf_columns.contains(&table_id) => {
                    let buffer = self.fetch(span, use_cache, stats)?;
                    let index = BloomFilterIndex::new(
                        buffer,
                        self.segment.header.bf_bit_num,
                        self.segment.header.bf_hash_function_num,
                    )?;
                    check_entry_count(
                        unique_id,
                        span.descriptor.kind,
                        index.entry_count(),
                        expected_blocks,
                    )?;
                    loaded.bloom_filters.insert(unique_id, index);
                }
                StreamKind::BloomFilter | StreamKind::Data => {}
            }
        }

        stats.index_load_ns += elapsed_ns(start);
        debug!(
            target: "colseg::index",
            file = %self.segment.file.path().display(),
            stat_indices = loaded.stat_indices.len(),
            bloom_filters = loaded.bloom_filters.len(),
            block_count = expected_blocks,
            "Loaded segment indexes"
        );
        Ok(loaded)
    }

    fn fetch(
        &self,
        span: &StreamSpan,
        use_cache: bool,
        stats: &mut ReaderStatistics,
    ) -> Result<IndexStreamBuffer, SegmentReadError> {
        let key = IndexStreamCacheKey::new(
            self.segment.file.identity(),
            span.descriptor.column_unique_id,
            span.descriptor.kind,
        );
        if let Some(cache) = self.cache {
            if let Some(handle) = cache.lookup(&key) {
                stats.index_cache_hits += 1;
                return Ok(IndexStreamBuffer::Cached(handle));
            }
        }

        let codec = self.decompressors.get(self.segment.header.compress_kind)?;
        let before = self.segment.file.bytes_read();
        let mut stream = ChunkedStream::new(
            self.segment.file.clone(),
            *span,
            codec,
            self.segment.header.stream_buffer_size as usize,
        );
        let bytes = stream.read_to_end()?;
        stats.index_stream_reads += 1;
        stats.bytes_read += self.segment.file.bytes_read() - before;

        match self.cache {
            Some(cache) if use_cache => match cache.insert(key, bytes) {
                Ok(handle) => Ok(IndexStreamBuffer::Cached(handle)),
                Err(e) => {
                    let err = SegmentReadError::from(e);
                    err.log_error();
                    Err(err)
                }
            },
            _ => Ok(IndexStreamBuffer::Local(bytes)),
        }
    }
}

fn check_entry_count(
    unique_id: u32,
    kind: StreamKind,
    entry_count: usize,
    expected_blocks: u32,
) -> Result<(), SegmentReadError> {
    if entry_count != expected_blocks as usize {
        info!(
            target: "colseg::index",
            column_unique_id = unique_id,
            ?kind,
            entry_count,
            expected_blocks,
            "Index entry count disagrees with block count"
        );
        return Err(SegmentReadError::FileFormat(format!(
            "{kind:?} stream of column {unique_id} has {entry_count} entries, expected {expected_blocks}"
        )));
    }
    Ok(())
}
