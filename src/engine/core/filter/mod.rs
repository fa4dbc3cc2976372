pub mod block_state;
pub mod condition;
pub mod conditions;

pub use block_state::{BlockState, DeleteMatch};
pub use condition::{ColumnPredicate, CompareOp, Cond, CondColumn, DeletePredicate};
pub use conditions::{Conditions, DeleteCondition, DeleteHandler};
