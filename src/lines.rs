//! Line registry and selection state.
//!
//! A deployment watches a small, fixed set of production lines. Each line is
//! identified by an integer and carries a display name. The [`LineSelector`]
//! holds the currently selected line and only ever moves to identifiers that
//! exist in the [`LineRegistry`]; requests for anything else are ignored.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::ConfigError;

/// Identifier of a production line, as sent in the `id` query parameter.
pub type LineId = i64;

/// Static mapping of line identifiers to display names.
///
/// Fixed at construction. Identifiers are kept ordered so that tabs and
/// position indicators render in a stable order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRegistry {
    lines: BTreeMap<LineId, String>,
}

impl LineRegistry {
    /// Build a registry from `(id, name)` pairs.
    ///
    /// Fails if no lines are given. A repeated identifier keeps the last name.
    pub fn new<I, S>(lines: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (LineId, S)>,
        S: Into<String>,
    {
        let lines: BTreeMap<LineId, String> =
            lines.into_iter().map(|(id, name)| (id, name.into())).collect();
        if lines.is_empty() {
            return Err(ConfigError::NoLines);
        }
        Ok(Self { lines })
    }

    /// Display name for a line, if registered.
    pub fn name(&self, id: LineId) -> Option<&str> {
        self.lines.get(&id).map(String::as_str)
    }

    pub fn contains(&self, id: LineId) -> bool {
        self.lines.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Iterate over `(id, name)` in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (LineId, &str)> {
        self.lines.iter().map(|(id, name)| (*id, name.as_str()))
    }

    /// Zero-based position of a line in identifier order.
    pub fn position(&self, id: LineId) -> Option<usize> {
        self.lines.keys().position(|k| *k == id)
    }
}

/// Direction of a horizontal swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    /// Left swipe: request the line one identifier below the current one.
    TowardLower,
    /// Right swipe: request the line one identifier above the current one.
    TowardHigher,
}

impl Swipe {
    /// Target identifier for this swipe, starting from `current`.
    ///
    /// Saturates at the integer bounds; such targets are never registered
    /// and are rejected by [`LineSelector::transition`].
    pub fn target(self, current: LineId) -> LineId {
        match self {
            Swipe::TowardLower => current.saturating_sub(1),
            Swipe::TowardHigher => current.saturating_add(1),
        }
    }
}

/// Current line selection, validated against a [`LineRegistry`].
#[derive(Debug, Clone)]
pub struct LineSelector {
    registry: Arc<LineRegistry>,
    current: LineId,
}

impl LineSelector {
    /// Create a selector starting at `initial`, which must be registered.
    pub fn new(registry: Arc<LineRegistry>, initial: LineId) -> Result<Self, ConfigError> {
        if !registry.contains(initial) {
            return Err(ConfigError::UnknownInitialLine(initial));
        }
        Ok(Self {
            registry,
            current: initial,
        })
    }

    pub fn current(&self) -> LineId {
        self.current
    }

    /// Display name of the current line.
    pub fn current_name(&self) -> &str {
        // `current` is only ever set to registered identifiers
        self.registry.name(self.current).unwrap_or_default()
    }

    pub fn registry(&self) -> &Arc<LineRegistry> {
        &self.registry
    }

    /// Move the selection to `target`.
    ///
    /// Selecting the current line or an unregistered identifier is a silent
    /// no-op. There is no wraparound at either end of the registry.
    /// Returns `true` if the selection changed.
    pub fn transition(&mut self, target: LineId) -> bool {
        if target == self.current || !self.registry.contains(target) {
            return false;
        }
        self.current = target;
        true
    }

    /// Apply a swipe gesture. Returns `true` if the selection changed.
    pub fn swipe(&mut self, swipe: Swipe) -> bool {
        self.transition(swipe.target(self.current))
    }
}

/// Shared handle to a [`LineSelector`].
///
/// Cloned into the poll loop (reader) and the input handler (writer). The
/// lock is only held for the duration of a read or a transition.
#[derive(Clone)]
pub struct Selection {
    inner: Arc<Mutex<LineSelector>>,
}

impl Selection {
    pub fn new(selector: LineSelector) -> Self {
        Self {
            inner: Arc::new(Mutex::new(selector)),
        }
    }

    pub fn current(&self) -> LineId {
        self.inner.lock().current()
    }

    pub fn registry(&self) -> Arc<LineRegistry> {
        self.inner.lock().registry().clone()
    }

    pub fn transition(&self, target: LineId) -> bool {
        let changed = self.inner.lock().transition(target);
        if changed {
            tracing::debug!(line = target, "line selected");
        }
        changed
    }

    pub fn swipe(&self, swipe: Swipe) -> bool {
        let mut selector = self.inner.lock();
        let changed = selector.swipe(swipe);
        if changed {
            tracing::debug!(line = selector.current(), ?swipe, "line selected by swipe");
        }
        changed
    }
}

impl fmt::Debug for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selection")
            .field("current", &self.current())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Arc<LineRegistry> {
        Arc::new(LineRegistry::new([(1, "Line A"), (2, "Line B"), (3, "Line C")]).unwrap())
    }

    #[test]
    fn test_registry_rejects_empty() {
        let empty: Vec<(LineId, String)> = Vec::new();
        assert!(matches!(LineRegistry::new(empty), Err(ConfigError::NoLines)));
    }

    #[test]
    fn test_registry_lookup_and_order() {
        let registry = LineRegistry::new([(3, "C"), (1, "A"), (7, "G")]).unwrap();
        assert_eq!(registry.name(7), Some("G"));
        assert_eq!(registry.name(2), None);
        let ids: Vec<LineId> = registry.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![1, 3, 7]);
        assert_eq!(registry.position(3), Some(1));
        assert_eq!(registry.position(4), None);
    }

    #[test]
    fn test_selector_requires_registered_initial_line() {
        let err = LineSelector::new(registry(), 9).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownInitialLine(9)));
    }

    #[test]
    fn test_transition_to_every_registered_line() {
        let mut selector = LineSelector::new(registry(), 1).unwrap();
        for id in [2, 3, 1, 3] {
            selector.transition(id);
            assert_eq!(selector.current(), id);
        }
    }

    #[test]
    fn test_transition_to_unknown_line_is_ignored() {
        let mut selector = LineSelector::new(registry(), 2).unwrap();
        for target in [0, 4, -1, 100, LineId::MIN, LineId::MAX] {
            assert!(!selector.transition(target));
            assert_eq!(selector.current(), 2);
        }
    }

    #[test]
    fn test_transition_to_current_reports_no_change() {
        let mut selector = LineSelector::new(registry(), 2).unwrap();
        assert!(!selector.transition(2));
        assert_eq!(selector.current(), 2);
        assert_eq!(selector.current_name(), "Line B");
    }

    #[test]
    fn test_left_swipes_stop_at_lowest_line() {
        let mut selector = LineSelector::new(registry(), 2).unwrap();

        assert!(selector.swipe(Swipe::TowardLower));
        assert_eq!(selector.current(), 1);
        assert_eq!(selector.current_name(), "Line A");

        // id 0 is not registered, no wraparound to 3
        assert!(!selector.swipe(Swipe::TowardLower));
        assert_eq!(selector.current(), 1);
    }

    #[test]
    fn test_right_swipes_stop_at_highest_line() {
        let mut selector = LineSelector::new(registry(), 2).unwrap();
        assert!(selector.swipe(Swipe::TowardHigher));
        assert!(!selector.swipe(Swipe::TowardHigher));
        assert_eq!(selector.current(), 3);
    }

    #[test]
    fn test_swipe_does_not_skip_gaps() {
        let registry = Arc::new(LineRegistry::new([(1, "A"), (3, "C")]).unwrap());
        let mut selector = LineSelector::new(registry, 1).unwrap();
        // 2 is missing, so the swipe is a no-op rather than a jump to 3
        assert!(!selector.swipe(Swipe::TowardHigher));
        assert_eq!(selector.current(), 1);
    }

    #[test]
    fn test_swipe_target_saturates() {
        assert_eq!(Swipe::TowardHigher.target(LineId::MAX), LineId::MAX);
        assert_eq!(Swipe::TowardLower.target(LineId::MIN), LineId::MIN);
    }

    #[test]
    fn test_selection_shared_between_clones() {
        let selection = Selection::new(LineSelector::new(registry(), 1).unwrap());
        let reader = selection.clone();

        assert!(selection.swipe(Swipe::TowardHigher));
        assert_eq!(reader.current(), 2);

        assert!(selection.transition(3));
        assert_eq!(reader.current(), 3);
        assert_eq!(reader.registry().len(), 3);
    }
}
