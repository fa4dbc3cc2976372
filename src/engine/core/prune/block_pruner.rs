use std::time::Instant;

use tracing::{debug, trace};

use crate::engine::core::filter::{
    BlockState, Conditions, DeleteCondition, DeleteHandler, DeleteMatch,
};
use crate::engine::core::index::LoadedIndexes;
use crate::engine::core::prune::InclusionBitmap;
use crate::engine::core::read::ReaderStatistics;
use crate::engine::core::read::reader_stats::elapsed_ns;
use crate::engine::core::segment::ColumnIdMapping;
use crate::engine::schema::{FieldAggregation, TabletSchema};

/// Below this many surviving blocks bloom filters are not consulted.
pub const MIN_FILTER_BLOCK_NUM: u32 = 10;

/// Filters applied by one pruning pass.
#[derive(Debug, Clone, Copy)]
pub struct PruneRequest<'a> {
    pub first_block: u32,
    pub end_block: u32,
    pub conditions: &'a Conditions,
    pub delete_handler: &'a DeleteHandler,
    /// Segment-wide verdict of the delete handler, computed upstream.
    pub delete_status: DeleteMatch,
    /// Version the segment was written at; older delete conditions are already applied.
    pub segment_version: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PruneOutcome {
    pub bitmap: InclusionBitmap,
    pub remaining_block_count: u32,
}

/// Computes the inclusion state of the blocks in a requested range.
pub struct BlockPruner<'a> {
    schema: &'a TabletSchema,
    mapping: &'a ColumnIdMapping,
    indexes: &'a LoadedIndexes,
    bf_columns: &'a [u32],
    rows_per_block: u32,
    number_of_rows: u64,
}

impl<'a> BlockPruner<'a> {
    pub fn new(
        schema: &'a TabletSchema,
        mapping: &'a ColumnIdMapping,
        indexes: &'a LoadedIndexes,
        bf_columns: &'a [u32],
        rows_per_block: u32,
        number_of_rows: u64,
    ) -> Self {
        Self {
            schema,
            mapping,
            indexes,
            bf_columns,
            rows_per_block,
            number_of_rows,
        }
    }

    pub fn prune(&self, request: &PruneRequest<'_>, stats: &mut ReaderStatistics) -> PruneOutcome {
        let start = Instant::now();
        let first = request.first_block;
        let end = request.end_block;
        let mut outcome = PruneOutcome {
            bitmap: InclusionBitmap::for_range(self.indexes.block_count, first, end),
            remaining_block_count: end.saturating_sub(first) + 1,
        };

        self.prune_by_delete_conditions(request, &mut outcome, stats);

        if request.conditions.is_empty() {
            self.log_finished(&outcome, start);
            return outcome;
        }

        self.prune_by_stats(request, &mut outcome, stats);

        if outcome.remaining_block_count < MIN_FILTER_BLOCK_NUM {
            debug!(
                target: "colseg::prune",
                remaining = outcome.remaining_block_count,
                "Bloom filters skipped, too few blocks remain"
            );
            self.log_finished(&outcome, start);
            return outcome;
        }

        self.prune_by_bloom_filters(request, &mut outcome, stats);
        self.log_finished(&outcome, start);
        outcome
    }

    fn prune_by_delete_conditions(
        &self,
        request: &PruneRequest<'_>,
        outcome: &mut PruneOutcome,
        stats: &mut ReaderStatistics,
    ) {
        if request.delete_handler.is_empty() {
            return;
        }
        if request.delete_status == DeleteMatch::NotMatched {
            trace!(target: "colseg::prune", "Segment does not match any delete condition");
            return;
        }

        for condition in request.delete_handler.conditions() {
            if condition.filter_version <= request.segment_version {
                continue;
            }
            for block in request.first_block..=request.end_block {
                let Some(state) = outcome.bitmap.get(block) else {
                    continue;
                };
                if state.is_excluded() {
                    continue;
                }
                let verdict = self.delete_verdict(condition, block);
                let next = state.apply_delete(verdict);
                outcome.bitmap.set(block, next);
                if next.is_excluded() {
                    outcome.remaining_block_count -= 1;
                    stats.rows_del_filtered += self.rows_in_block(block);
                    trace!(target: "colseg::prune", block, "Block deleted");
                }
            }
        }
    }

    /// Conjunction of the condition's column verdicts for one block. Columns
    /// without data in this segment do not take part.
    fn delete_verdict(&self, condition: &DeleteCondition, block: u32) -> DeleteMatch {
        if condition.is_empty() {
            return DeleteMatch::Excluded;
        }
        let mut verdict = DeleteMatch::Excluded;
        for (column, predicate) in condition.columns() {
            let Some(unique_id) = self.mapping.unique_id(column) else {
                continue;
            };
            if !self.mapping.in_segment(unique_id) {
                continue;
            }
            let Some(entry) = self
                .indexes
                .stat_index(unique_id)
                .and_then(|index| index.entry(block))
            else {
                return DeleteMatch::NotMatched;
            };
            verdict = verdict.and(predicate.del_eval(&entry.min, &entry.max));
            if verdict == DeleteMatch::NotMatched {
                break;
            }
        }
        verdict
    }

    fn prune_by_stats(
        &self,
        request: &PruneRequest<'_>,
        outcome: &mut PruneOutcome,
        stats: &mut ReaderStatistics,
    ) {
        for (column, predicate) in request.conditions.columns() {
            if self.schema.aggregation(column) != FieldAggregation::None {
                continue;
            }
            let Some(index) = self
                .mapping
                .unique_id(column)
                .filter(|uid| self.mapping.in_segment(*uid))
                .and_then(|uid| self.indexes.stat_index(uid))
            else {
                continue;
            };
            for block in request.first_block..=request.end_block {
                if outcome.bitmap.is_excluded(block) {
                    continue;
                }
                let Some(entry) = index.entry(block) else {
                    continue;
                };
                if !predicate.eval_stats(&entry.min, &entry.max) {
                    self.exclude(outcome, block, stats);
                }
            }
        }
    }

    fn prune_by_bloom_filters(
        &self,
        request: &PruneRequest<'_>,
        outcome: &mut PruneOutcome,
        stats: &mut ReaderStatistics,
    ) {
        for &column in self.bf_columns {
            if self.schema.aggregation(column) != FieldAggregation::None {
                continue;
            }
            let Some(predicate) = request.conditions.get(column) else {
                continue;
            };
            let Some(field_type) = self.schema.column(column).map(|c| c.field_type) else {
                continue;
            };
            let Some(index) = self
                .mapping
                .unique_id(column)
                .filter(|uid| self.mapping.in_segment(*uid))
                .and_then(|uid| self.indexes.bloom_filter(uid))
            else {
                continue;
            };
            for block in request.first_block..=request.end_block {
                if outcome.bitmap.is_excluded(block) {
                    continue;
                }
                let Some(bloom) = index.entry(block) else {
                    continue;
                };
                stats.bloom_filter_evals += 1;
                if !predicate.eval_bloom(&bloom, field_type) {
                    self.exclude(outcome, block, stats);
                }
            }
        }
    }

    fn exclude(&self, outcome: &mut PruneOutcome, block: u32, stats: &mut ReaderStatistics) {
        outcome.bitmap.set(block, BlockState::Excluded);
        outcome.remaining_block_count -= 1;
        stats.rows_stats_filtered += self.rows_in_block(block);
    }

    /// Real row count of `block`; only the last block may be short.
    fn rows_in_block(&self, block: u32) -> u64 {
        let rows_per_block = self.rows_per_block as u64;
        if block + 1 < self.indexes.block_count {
            rows_per_block
        } else {
            self.number_of_rows
                .saturating_sub(block as u64 * rows_per_block)
        }
    }

    fn log_finished(&self, outcome: &PruneOutcome, start: Instant) {
        debug!(
            target: "colseg::prune",
            remaining = outcome.remaining_block_count,
            elapsed_ns = elapsed_ns(start),
            "Block pruning finished"
        );
    }
}
