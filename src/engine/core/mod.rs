pub mod column;
pub mod filter;
pub mod index;
pub mod prune;
pub mod read;
pub mod segment;

pub use filter::{BlockState, Conditions, DeleteCondition, DeleteHandler, DeleteMatch};
pub use prune::{BlockPruner, InclusionBitmap, PruneOutcome};
pub use read::{ReaderOptions, ReaderStatistics, RowBatch, ScanPosition, SegmentReader};
pub use segment::{ColumnIdMapping, SegmentFileLoader, SegmentHeader, StreamKind};
