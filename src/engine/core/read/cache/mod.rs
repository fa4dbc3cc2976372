pub mod index_stream_cache;
pub mod index_stream_cache_key;
pub mod index_stream_cache_stats;
pub mod index_stream_handle;

pub use index_stream_cache::IndexStreamCache;
pub use index_stream_cache_key::IndexStreamCacheKey;
pub use index_stream_cache_stats::IndexStreamCacheStats;
pub use index_stream_handle::IndexStreamHandle;
