//! Display state shared between the poll loop and the renderer.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use super::Reading;
use crate::lines::LineId;

/// The in-memory snapshot currently shown to the user.
///
/// `line` and `line_name` always belong together: they are only ever written
/// in the same [`SharedState::apply`] call, with the name taken from the
/// registry entry for `line`.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    /// Line the readings are displayed under.
    pub line: LineId,
    /// Registry name of `line`.
    pub line_name: String,
    /// Readings from the most recent applied poll, in payload order.
    pub readings: Vec<Reading>,
    /// When the last poll was applied. `None` until the first success.
    pub last_updated: Option<Instant>,
    /// Incremented on every apply.
    pub revision: u64,
}

impl DisplayState {
    /// Empty state for the initially selected line.
    pub fn new(line: LineId, line_name: impl Into<String>) -> Self {
        Self {
            line,
            line_name: line_name.into(),
            readings: Vec::new(),
            last_updated: None,
            revision: 0,
        }
    }

    /// Whether a poll has ever been applied.
    pub fn is_loaded(&self) -> bool {
        self.last_updated.is_some()
    }
}

/// Shared ownership of the [`DisplayState`].
///
/// The poll loop writes through [`apply`](Self::apply); the renderer reads
/// via [`snapshot`](Self::snapshot). Both hold the lock only long enough to
/// copy or replace fields.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<Mutex<DisplayState>>,
}

impl SharedState {
    pub fn new(initial: DisplayState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(initial)),
        }
    }

    /// Replace line, name and readings in one step.
    pub fn apply(&self, line: LineId, line_name: &str, readings: Vec<Reading>) {
        let mut state = self.inner.lock();
        state.line = line;
        state.line_name.clear();
        state.line_name.push_str(line_name);
        state.readings = readings;
        state.last_updated = Some(Instant::now());
        state.revision += 1;
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> DisplayState {
        self.inner.lock().clone()
    }

    pub fn revision(&self) -> u64 {
        self.inner.lock().revision
    }
}

impl fmt::Debug for SharedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("SharedState")
            .field("line", &state.line)
            .field("readings", &state.readings.len())
            .field("revision", &state.revision)
            .finish()
    }
}
