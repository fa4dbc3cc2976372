pub mod cache;
pub mod column_reader_set;
pub mod lazy_seek;
pub mod reader_options;
pub mod reader_stats;
pub mod row_batch;
pub mod segment_reader;

pub use column_reader_set::ColumnReaderSet;
pub use lazy_seek::{CursorState, LazySeekCursor, SeekOutcome};
pub use reader_options::ReaderOptions;
pub use reader_stats::ReaderStatistics;
pub use row_batch::{ColumnVector, RowBatch};
pub use segment_reader::{ScanPosition, SegmentReader};

#[cfg(test)]
mod lazy_seek_test;
#[cfg(test)]
mod row_batch_test;
