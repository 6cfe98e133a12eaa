//! Swipe recognition for mouse drags.
//!
//! A drag counts as a swipe when the button is released at least
//! `threshold` columns away from where it was pressed and the movement is
//! mostly horizontal. Dragging leftwards is a left swipe.

use crate::lines::Swipe;

/// Default minimum horizontal travel, in columns.
pub const DEFAULT_SWIPE_THRESHOLD: u16 = 6;

/// Tracks a single pointer press and classifies the release.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: u16,
    origin: Option<(u16, u16)>,
}

impl SwipeTracker {
    pub fn new(threshold: u16) -> Self {
        Self {
            threshold: threshold.max(1),
            origin: None,
        }
    }

    /// Pointer pressed at (`column`, `row`).
    pub fn press(&mut self, column: u16, row: u16) {
        self.origin = Some((column, row));
    }

    /// Pointer released at (`column`, `row`). Returns the recognised swipe.
    pub fn release(&mut self, column: u16, row: u16) -> Option<Swipe> {
        let (start_col, start_row) = self.origin.take()?;

        let dx = i32::from(column) - i32::from(start_col);
        let dy = i32::from(row) - i32::from(start_row);

        if dx.unsigned_abs() < u32::from(self.threshold) || dx.abs() <= dy.abs() {
            return None;
        }

        if dx < 0 {
            Some(Swipe::TowardLower)
        } else {
            Some(Swipe::TowardHigher)
        }
    }

    /// Forget an in-progress press.
    pub fn cancel(&mut self) {
        self.origin = None;
    }

    pub fn is_tracking(&self) -> bool {
        self.origin.is_some()
    }
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD)
    }
}
