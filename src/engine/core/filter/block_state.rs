/// Inclusion state of one block after pruning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockState {
    /// Every row provably fails the query or is provably deleted.
    Excluded,
    /// Rows must be evaluated one by one.
    Partial,
    /// Nothing known excludes the block.
    Included,
}

impl BlockState {
    pub fn is_excluded(&self) -> bool {
        matches!(self, BlockState::Excluded)
    }

    /// Folds one delete condition's verdict into the block's state.
    ///
    /// A block that is already `Partial` stays `Partial` even when a later
    /// condition matches it fully: rows that survived the earlier partial match
    /// still need row-level evaluation.
    pub fn apply_delete(self, verdict: DeleteMatch) -> BlockState {
        match (self, verdict) {
            (BlockState::Excluded, _) => BlockState::Excluded,
            (BlockState::Partial, DeleteMatch::Excluded) => BlockState::Partial,
            (_, DeleteMatch::Excluded) => BlockState::Excluded,
            (_, DeleteMatch::Partial) => BlockState::Partial,
            (state, DeleteMatch::NotMatched) => state,
        }
    }
}

/// How a delete predicate relates to the rows of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeleteMatch {
    /// Every row matches the delete, so the block is dropped.
    Excluded,
    /// Some rows may match.
    Partial,
    /// No row matches.
    NotMatched,
}

impl DeleteMatch {
    /// Conjunction of two column verdicts within one condition.
    pub fn and(self, other: DeleteMatch) -> DeleteMatch {
        match (self, other) {
            (DeleteMatch::NotMatched, _) | (_, DeleteMatch::NotMatched) => DeleteMatch::NotMatched,
            (DeleteMatch::Partial, _) | (_, DeleteMatch::Partial) => DeleteMatch::Partial,
            (DeleteMatch::Excluded, DeleteMatch::Excluded) => DeleteMatch::Excluded,
        }
    }
}
