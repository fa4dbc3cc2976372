use std::collections::BTreeMap;
use std::sync::Arc;

use crate::engine::core::filter::{ColumnPredicate, DeletePredicate};
use crate::engine::types::ColumnId;

/// Active query predicates keyed by query column id.
#[derive(Debug, Clone, Default)]
pub struct Conditions {
    columns: BTreeMap<ColumnId, Arc<dyn ColumnPredicate>>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column(mut self, column: ColumnId, predicate: Arc<dyn ColumnPredicate>) -> Self {
        self.columns.insert(column, predicate);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, column: ColumnId) -> Option<&Arc<dyn ColumnPredicate>> {
        self.columns.get(&column)
    }

    pub fn columns(&self) -> impl Iterator<Item = (ColumnId, &Arc<dyn ColumnPredicate>)> {
        self.columns.iter().map(|(id, p)| (*id, p))
    }
}

/// Rows deleted as of `filter_version`, described per column.
///
/// A condition without any column predicate deletes every row it applies to.
#[derive(Debug, Clone)]
pub struct DeleteCondition {
    pub filter_version: i64,
    columns: BTreeMap<ColumnId, Arc<dyn DeletePredicate>>,
}

impl DeleteCondition {
    pub fn new(filter_version: i64) -> Self {
        Self {
            filter_version,
            columns: BTreeMap::new(),
        }
    }

    pub fn with_column(mut self, column: ColumnId, predicate: Arc<dyn DeletePredicate>) -> Self {
        self.columns.insert(column, predicate);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = (ColumnId, &Arc<dyn DeletePredicate>)> {
        self.columns.iter().map(|(id, p)| (*id, p))
    }
}

/// Ordered delete conditions applicable to a tablet.
#[derive(Debug, Clone, Default)]
pub struct DeleteHandler {
    conditions: Vec<DeleteCondition>,
}

impl DeleteHandler {
    pub fn new(conditions: Vec<DeleteCondition>) -> Self {
        Self { conditions }
    }

    pub fn push(&mut self, condition: DeleteCondition) {
        self.conditions.push(condition);
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> &[DeleteCondition] {
        &self.conditions
    }
}
