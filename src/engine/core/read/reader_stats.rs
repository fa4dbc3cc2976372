use std::time::{Duration, Instant};

/// Counters accumulated by one segment reader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderStatistics {
    pub index_load_ns: u64,
    pub block_seek_ns: u64,
    pub block_load_ns: u64,
    pub blocks_load: u64,
    pub raw_rows_read: u64,
    pub rows_del_filtered: u64,
    pub rows_stats_filtered: u64,
    /// Rows left unread because the batch was smaller than the block.
    pub rows_batch_truncated: u64,
    pub index_stream_reads: u64,
    pub index_cache_hits: u64,
    pub bloom_filter_evals: u64,
    pub bytes_read: u64,
}

impl ReaderStatistics {
    pub fn merge(&mut self, other: &ReaderStatistics) {
        self.index_load_ns += other.index_load_ns;
        self.block_seek_ns += other.block_seek_ns;
        self.block_load_ns += other.block_load_ns;
        self.blocks_load += other.blocks_load;
        self.raw_rows_read += other.raw_rows_read;
        self.rows_del_filtered += other.rows_del_filtered;
        self.rows_stats_filtered += other.rows_stats_filtered;
        self.rows_batch_truncated += other.rows_batch_truncated;
        self.index_stream_reads += other.index_stream_reads;
        self.index_cache_hits += other.index_cache_hits;
        self.bloom_filter_evals += other.bloom_filter_evals;
        self.bytes_read += other.bytes_read;
    }
}

/// Elapsed wall time since `start`, saturated into nanoseconds.
pub(crate) fn elapsed_ns(start: Instant) -> u64 {
    let elapsed: Duration = start.elapsed();
    u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX)
}
