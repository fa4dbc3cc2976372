/// Where the column readers stand relative to block boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    NeedsSeek,
    Positioned(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekOutcome {
    /// Readers were already at the target block.
    Skipped,
    Seeked,
}

/// Defers physical column seeks until the target block differs from where
/// the readers already are.
#[derive(Debug, Clone)]
pub struct LazySeekCursor {
    state: CursorState,
    seeks: u64,
}

impl Default for LazySeekCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl LazySeekCursor {
    pub fn new() -> Self {
        Self {
            state: CursorState::NeedsSeek,
            seeks: 0,
        }
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn current_block(&self) -> Option<u32> {
        match self.state {
            CursorState::Positioned(block) => Some(block),
            CursorState::NeedsSeek => None,
        }
    }

    /// Number of physical seeks issued so far.
    pub fn seek_count(&self) -> u64 {
        self.seeks
    }

    /// Runs `seek` unless the readers already sit at `target`. The cursor only
    /// moves when `seek` succeeds.
    pub fn advance_to<F, E>(&mut self, target: u32, seek: F) -> Result<SeekOutcome, E>
    where
        F: FnOnce(u32) -> Result<(), E>,
    {
        if self.state == CursorState::Positioned(target) {
            return Ok(SeekOutcome::Skipped);
        }
        seek(target)?;
        self.seeks += 1;
        self.state = CursorState::Positioned(target);
        Ok(SeekOutcome::Seeked)
    }

    pub fn invalidate(&mut self) {
        self.state = CursorState::NeedsSeek;
    }

    /// A full block leaves the readers at the start of the next one; anything
    /// shorter breaks alignment.
    pub fn on_rows_read(&mut self, rows: usize, rows_per_block: u32) {
        self.state = match self.state {
            CursorState::Positioned(block) if rows == rows_per_block as usize => {
                CursorState::Positioned(block + 1)
            }
            _ => CursorState::NeedsSeek,
        };
    }
}
