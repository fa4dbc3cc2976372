use crate::engine::core::filter::BlockState;

/// Inclusion state of every block of a segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InclusionBitmap {
    states: Vec<BlockState>,
}

impl InclusionBitmap {
    pub fn new(block_count: u32, initial: BlockState) -> Self {
        Self {
            states: vec![initial; block_count as usize],
        }
    }

    /// All blocks excluded except `[first, end]`, which start out included.
    pub fn for_range(block_count: u32, first: u32, end: u32) -> Self {
        let mut bitmap = Self::new(block_count, BlockState::Excluded);
        for block in first..=end.min(block_count.saturating_sub(1)) {
            bitmap.set(block, BlockState::Included);
        }
        bitmap
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, block: u32) -> Option<BlockState> {
        self.states.get(block as usize).copied()
    }

    pub fn set(&mut self, block: u32, state: BlockState) {
        if let Some(slot) = self.states.get_mut(block as usize) {
            *slot = state;
        }
    }

    pub fn is_excluded(&self, block: u32) -> bool {
        self.get(block).is_none_or(|s| s.is_excluded())
    }

    /// First block in `[start, end]` that is not excluded.
    pub fn next_candidate(&self, start: u32, end: u32) -> Option<u32> {
        (start..=end).find(|b| !self.is_excluded(*b))
    }

    pub fn count(&self, state: BlockState) -> usize {
        self.states.iter().filter(|s| **s == state).count()
    }

    pub fn states(&self) -> &[BlockState] {
        &self.states
    }
}
