use std::collections::BTreeSet;
use std::sync::Arc;

use crate::engine::core::column::compression::DecompressorRegistry;
use crate::engine::core::filter::{Conditions, DeleteHandler, DeleteMatch};
use crate::engine::core::read::cache::IndexStreamCache;
use crate::engine::types::ColumnId;
use crate::shared::config::CONFIG;

/// Everything a segment reader needs besides the file and schema.
#[derive(Clone)]
pub struct ReaderOptions {
    /// Columns decoded into row batches.
    pub used_columns: Vec<ColumnId>,
    /// Columns whose bloom filter streams are loaded and consulted.
    pub load_bf_columns: BTreeSet<ColumnId>,
    pub conditions: Conditions,
    pub delete_handler: DeleteHandler,
    /// Segment-wide delete verdict; `NotMatched` skips delete pruning.
    pub delete_status: DeleteMatch,
    pub segment_version: i64,
    /// Shared index stream cache. `None` reads every index stream from disk.
    pub cache: Option<Arc<IndexStreamCache>>,
    pub decompressors: Arc<DecompressorRegistry>,
    pub max_supported_version: u16,
    pub default_rows_per_block: u32,
}

impl ReaderOptions {
    pub fn new(used_columns: Vec<ColumnId>) -> Self {
        Self {
            used_columns,
            load_bf_columns: BTreeSet::new(),
            conditions: Conditions::new(),
            delete_handler: DeleteHandler::default(),
            delete_status: DeleteMatch::Partial,
            segment_version: 0,
            cache: None,
            decompressors: DecompressorRegistry::builtin(),
            max_supported_version: CONFIG.reader.max_supported_version,
            default_rows_per_block: CONFIG.reader.default_rows_per_block,
        }
    }

    pub fn with_bloom_filter_columns(mut self, columns: impl IntoIterator<Item = ColumnId>) -> Self {
        self.load_bf_columns = columns.into_iter().collect();
        self
    }

    pub fn with_conditions(mut self, conditions: Conditions) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn with_delete_handler(mut self, handler: DeleteHandler) -> Self {
        self.delete_handler = handler;
        self
    }

    pub fn with_delete_status(mut self, status: DeleteMatch) -> Self {
        self.delete_status = status;
        self
    }

    pub fn with_segment_version(mut self, version: i64) -> Self {
        self.segment_version = version;
        self
    }

    pub fn with_cache(mut self, cache: Arc<IndexStreamCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Uses the process-wide cache sized from configuration.
    pub fn with_global_cache(self) -> Self {
        self.with_cache(IndexStreamCache::global())
    }

    pub fn with_decompressors(mut self, registry: Arc<DecompressorRegistry>) -> Self {
        self.decompressors = registry;
        self
    }

    pub fn with_default_rows_per_block(mut self, rows: u32) -> Self {
        self.default_rows_per_block = rows;
        self
    }

    /// Every column whose ids must be mapped: decoded columns plus those
    /// referenced by conditions or delete conditions.
    pub fn mapped_columns(&self) -> Vec<ColumnId> {
        let mut columns: BTreeSet<ColumnId> = self.used_columns.iter().copied().collect();
        columns.extend(self.conditions.columns().map(|(id, _)| id));
        for condition in self.delete_handler.conditions() {
            columns.extend(condition.columns().map(|(id, _)| id));
        }
        columns.into_iter().collect()
    }
}
