//! Application state and navigation logic.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::data::{DisplayState, SharedState};
use crate::gesture::SwipeTracker;
use crate::lines::{LineId, LineRegistry, Selection, Swipe};
use crate::ui::Theme;

/// How long a status message stays in the status bar.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Main application state.
///
/// The app never writes the display state; it reads a snapshot each frame
/// and forwards navigation to the shared [`Selection`], which the poll loop
/// picks up on its next cycle.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    selection: Selection,
    registry: Arc<LineRegistry>,
    state: SharedState,
    view: DisplayState,
    source_description: String,

    pub swipe_tracker: SwipeTracker,
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App reading from `state` and navigating `selection`.
    pub fn new(
        selection: Selection,
        state: SharedState,
        source_description: impl Into<String>,
        theme: Theme,
    ) -> Self {
        let registry = selection.registry();
        let view = state.snapshot();
        Self {
            running: true,
            show_help: false,
            selection,
            registry,
            state,
            view,
            source_description: source_description.into(),
            swipe_tracker: SwipeTracker::default(),
            theme,
            status_message: None,
        }
    }

    /// Use a different drag distance for mouse swipes.
    pub fn with_swipe_threshold(mut self, threshold: u16) -> Self {
        self.swipe_tracker = SwipeTracker::new(threshold);
        self
    }

    /// Take a fresh snapshot of the display state. Called once per frame.
    pub fn refresh(&mut self) {
        if self.state.revision() != self.view.revision {
            self.view = self.state.snapshot();
        }
    }

    /// The snapshot being rendered.
    pub fn display(&self) -> &DisplayState {
        &self.view
    }

    pub fn registry(&self) -> &LineRegistry {
        &self.registry
    }

    /// Line currently selected by the user.
    pub fn selected_line(&self) -> LineId {
        self.selection.current()
    }

    /// Whether the selection moved and the poll loop has not caught up yet.
    pub fn is_switching(&self) -> bool {
        self.selected_line() != self.view.line
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        &self.source_description
    }

    /// Apply a swipe. Swipes past the first or last line do nothing.
    pub fn swipe(&mut self, swipe: Swipe) {
        if self.selection.swipe(swipe) {
            self.announce_selection();
        }
    }

    /// Select a line directly. Unknown identifiers are ignored.
    pub fn select_line(&mut self, line: LineId) {
        if self.selection.transition(line) {
            self.announce_selection();
        }
    }

    fn announce_selection(&mut self) {
        let line = self.selected_line();
        let name = self.registry.name(line).unwrap_or_default().to_string();
        self.set_status_message(format!("Switched to {}", name));
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < STATUS_MESSAGE_TTL {
                return Some(msg);
            }
        }
        None
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }
}
