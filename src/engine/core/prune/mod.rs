pub mod block_pruner;
pub mod inclusion_bitmap;

pub use block_pruner::{BlockPruner, MIN_FILTER_BLOCK_NUM, PruneOutcome, PruneRequest};
pub use inclusion_bitmap::InclusionBitmap;
