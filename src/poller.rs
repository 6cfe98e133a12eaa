//! The poll loop.
//!
//! Keeps the [`SharedState`] in sync with the source for whichever line is
//! currently selected. Each cycle reads the selection, fetches readings and
//! applies them. The next cycle starts a fixed delay after the previous one
//! *completes*, so a slow endpoint spaces out requests instead of stacking
//! them and there is never more than one request in flight.
//!
//! ```text
//!   ┌──────────────┐  fetch(line)  ┌──────────────┐
//!   │ run_cycle()  │──────────────▶│ ParamsSource │
//!   └──────┬───────┘               └──────────────┘
//!          │ apply / log failure
//!          ▼
//!   sleep(delay) ──▶ next cycle        (until PollHandle::stop)
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::data::SharedState;
use crate::lines::{LineId, Selection};
use crate::source::{FetchError, ParamsSource};

/// Delay between the end of one cycle and the start of the next.
pub const DEFAULT_POLL_DELAY: Duration = Duration::from_millis(500);

/// What to do with a response whose line is no longer selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StalePolicy {
    /// Apply it to whatever line is selected when it arrives.
    #[default]
    Apply,
    /// Drop it and keep the previous state.
    Discard,
}

/// Result of a single poll cycle.
#[derive(Debug)]
pub enum CycleOutcome {
    /// Readings were applied to `line`.
    Applied { line: LineId, count: usize },
    /// The selection moved away from `requested` while the request was in
    /// flight and the response was dropped.
    Discarded { requested: LineId, current: LineId },
    /// The fetch failed; the display state was left untouched.
    Failed(FetchError),
}

impl CycleOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, CycleOutcome::Applied { .. })
    }
}

/// Polls a [`ParamsSource`] for the selected line.
#[derive(Debug)]
pub struct Poller {
    source: Arc<dyn ParamsSource>,
    selection: Selection,
    state: SharedState,
    delay: Duration,
    stale_policy: StalePolicy,
}

impl Poller {
    /// Create a poller with the default delay and stale policy.
    pub fn new(source: Arc<dyn ParamsSource>, selection: Selection, state: SharedState) -> Self {
        Self {
            source,
            selection,
            state,
            delay: DEFAULT_POLL_DELAY,
            stale_policy: StalePolicy::default(),
        }
    }

    /// Set the delay between cycles.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set how responses for an abandoned selection are handled.
    pub fn with_stale_policy(mut self, policy: StalePolicy) -> Self {
        self.stale_policy = policy;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run one fetch-and-apply round trip.
    ///
    /// Failures are logged and leave the display state unchanged.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let requested = self.selection.current();

        let readings = match self.source.fetch(requested).await {
            Ok(readings) => readings,
            Err(e) => {
                tracing::warn!(line = requested, error = %e, "poll cycle failed");
                return CycleOutcome::Failed(e);
            }
        };

        let current = self.selection.current();
        if current != requested && self.stale_policy == StalePolicy::Discard {
            tracing::debug!(requested, current, "discarding response for deselected line");
            return CycleOutcome::Discarded { requested, current };
        }

        let registry = self.selection.registry();
        let name = registry.name(current).unwrap_or_default();
        let count = readings.len();
        self.state.apply(current, name, readings);

        CycleOutcome::Applied {
            line: current,
            count,
        }
    }

    /// Start the loop on a tokio task.
    ///
    /// Must be called from within a tokio runtime. The loop runs until the
    /// returned handle is stopped or dropped.
    pub fn spawn(self) -> PollHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);

        tracing::info!(
            source = self.source.description(),
            delay_ms = self.delay.as_millis() as u64,
            "poll loop started"
        );

        let task = tokio::spawn(async move {
            loop {
                let outcome = tokio::select! {
                    outcome = self.run_cycle() => outcome,
                    _ = stop_requested(&mut stop_rx) => break,
                };

                match outcome {
                    CycleOutcome::Applied { line, count } => {
                        tracing::debug!(line, count, "poll cycle applied");
                    }
                    CycleOutcome::Discarded { .. } | CycleOutcome::Failed(_) => {}
                }

                tokio::select! {
                    _ = tokio::time::sleep(self.delay) => {}
                    _ = stop_requested(&mut stop_rx) => break,
                }
            }
            tracing::info!("poll loop stopped");
        });

        PollHandle { stop_tx, task }
    }
}

/// Resolves once a stop was signalled or the handle was dropped.
async fn stop_requested(stop_rx: &mut watch::Receiver<bool>) {
    loop {
        if *stop_rx.borrow_and_update() {
            return;
        }
        if stop_rx.changed().await.is_err() {
            return;
        }
    }
}

/// Handle for controlling the poll loop.
///
/// Drop this handle to stop polling, or call `stop()` explicitly.
#[derive(Debug)]
pub struct PollHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Signal the loop to stop. An in-flight request is abandoned.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    /// Stop the loop and wait for its task to finish.
    pub async fn shutdown(self) {
        self.stop();
        let _ = self.task.await;
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DisplayState;
    use crate::lines::{LineRegistry, LineSelector};
    use crate::source::scripted::{reading, ScriptedSource};

    struct Fixture {
        source: Arc<ScriptedSource>,
        selection: Selection,
        state: SharedState,
    }

    impl Fixture {
        fn new(source: ScriptedSource, initial: LineId) -> Self {
            let registry = Arc::new(
                LineRegistry::new([(1, "Line A"), (2, "Line B"), (3, "Line C")]).unwrap(),
            );
            let selector = LineSelector::new(registry, initial).unwrap();
            let state = SharedState::new(DisplayState::new(initial, selector.current_name()));
            Self {
                source: Arc::new(source),
                selection: Selection::new(selector),
                state,
            }
        }

        fn poller(&self) -> Poller {
            Poller::new(
                self.source.clone(),
                self.selection.clone(),
                self.state.clone(),
            )
        }
    }

    #[tokio::test]
    async fn test_successful_cycle_replaces_readings() {
        let fx = Fixture::new(ScriptedSource::new(), 2);
        fx.source.push_ok(vec![reading("a", 1, "OK"), reading("b", 2, "OK")]);
        fx.source.push_ok(vec![reading("temp", 42, "OK")]);

        let poller = fx.poller();
        assert!(poller.run_cycle().await.is_applied());
        assert_eq!(fx.state.snapshot().readings.len(), 2);

        let outcome = poller.run_cycle().await;
        assert!(matches!(outcome, CycleOutcome::Applied { line: 2, count: 1 }));

        let state = fx.state.snapshot();
        assert_eq!(state.readings, vec![reading("temp", 42, "OK")]);
        assert_eq!(state.line, 2);
        assert_eq!(state.line_name, "Line B");
        assert_eq!(fx.source.calls()[0].line, 2);
    }

    #[tokio::test]
    async fn test_failed_cycle_leaves_state_unchanged() {
        let fx = Fixture::new(ScriptedSource::new(), 1);
        fx.source.push_ok(vec![reading("temp", 42, "OK")]);
        fx.source.push_err(FetchError::Status(500));
        fx.source.push_err(FetchError::Parse("expected value".to_string()));
        fx.source.push_err(FetchError::Connection("refused".to_string()));

        let poller = fx.poller();
        poller.run_cycle().await;
        let before = fx.state.snapshot();

        for _ in 0..3 {
            assert!(matches!(poller.run_cycle().await, CycleOutcome::Failed(_)));
            assert_eq!(fx.state.snapshot(), before);
        }
    }

    #[tokio::test]
    async fn test_cycle_follows_selection() {
        let fx = Fixture::new(ScriptedSource::new(), 1);
        fx.source.push_ok(vec![reading("x", 1, "OK")]);
        fx.source.push_ok(vec![reading("y", 2, "OK")]);

        let poller = fx.poller();
        poller.run_cycle().await;
        fx.selection.transition(3);
        poller.run_cycle().await;

        let lines: Vec<LineId> = fx.source.calls().iter().map(|c| c.line).collect();
        assert_eq!(lines, vec![1, 3]);
        let state = fx.state.snapshot();
        assert_eq!(state.line, 3);
        assert_eq!(state.line_name, "Line C");
    }

    #[tokio::test]
    async fn test_transition_to_current_line_changes_nothing() {
        let fx = Fixture::new(ScriptedSource::new(), 2);
        fx.source.push_ok(vec![reading("temp", 42, "OK")]);
        fx.poller().run_cycle().await;
        let before = fx.state.snapshot();

        assert!(!fx.selection.transition(2));
        assert_eq!(fx.state.snapshot(), before);
    }

    #[tokio::test]
    async fn test_stale_response_applied_to_current_line() {
        let fx = Fixture::new(ScriptedSource::new(), 1);
        fx.source.switch_during_next_fetch(fx.selection.clone(), 2);
        fx.source.push_ok(vec![reading("from-line-1", 1, "OK")]);

        let outcome = fx.poller().run_cycle().await;
        assert!(matches!(outcome, CycleOutcome::Applied { line: 2, count: 1 }));

        let state = fx.state.snapshot();
        assert_eq!(state.line, 2);
        assert_eq!(state.line_name, "Line B");
        assert_eq!(state.readings[0].name, "from-line-1");
    }

    #[tokio::test]
    async fn test_stale_response_discarded() {
        let fx = Fixture::new(ScriptedSource::new(), 1);
        let before = fx.state.snapshot();
        fx.source.switch_during_next_fetch(fx.selection.clone(), 2);
        fx.source.push_ok(vec![reading("from-line-1", 1, "OK")]);

        let poller = fx.poller().with_stale_policy(StalePolicy::Discard);
        let outcome = poller.run_cycle().await;
        assert!(matches!(
            outcome,
            CycleOutcome::Discarded {
                requested: 1,
                current: 2
            }
        ));
        assert_eq!(fx.state.snapshot(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_cycle_waits_for_delay_after_completion() {
        let fx = Fixture::new(
            ScriptedSource::new().with_latency(Duration::from_millis(300)),
            1,
        );
        for i in 0..10 {
            fx.source.push_ok(vec![reading("n", i, "OK")]);
        }

        let handle = fx.poller().spawn();
        tokio::time::sleep(Duration::from_secs(4)).await;
        handle.shutdown().await;

        let calls = fx.source.calls();
        assert!(calls.len() >= 3, "only {} cycles ran", calls.len());
        for pair in calls.windows(2) {
            let gap = pair[1].started - pair[0].finished;
            assert!(gap >= DEFAULT_POLL_DELAY, "cycle started after {:?}", gap);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_error_still_schedules_next_cycle() {
        let fx = Fixture::new(ScriptedSource::new(), 2);
        fx.source.push_ok(vec![reading("temp", 42, "OK")]);
        fx.source.push_err(FetchError::Status(500));
        fx.source.push_ok(vec![reading("temp", 43, "OK")]);

        let handle = fx.poller().spawn();

        // first cycle runs immediately, the failing one after 500ms
        tokio::time::sleep(Duration::from_millis(750)).await;
        assert_eq!(fx.source.calls().len(), 2);
        assert_eq!(fx.state.snapshot().readings, vec![reading("temp", 42, "OK")]);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(fx.source.calls().len(), 3);
        assert_eq!(fx.state.snapshot().readings, vec![reading("temp", 43, "OK")]);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_ends_loop() {
        let fx = Fixture::new(ScriptedSource::new(), 1);
        let handle = fx.poller().with_delay(Duration::from_millis(100)).spawn();

        tokio::time::sleep(Duration::from_millis(250)).await;
        handle.stop();
        tokio::time::sleep(Duration::from_millis(50)).await;
        let calls = fx.source.calls().len();
        assert!(handle.is_finished());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fx.source.calls().len(), calls);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_ends_loop() {
        let fx = Fixture::new(ScriptedSource::new(), 1);
        let handle = fx.poller().spawn();
        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(handle);

        tokio::time::sleep(Duration::from_millis(20)).await;
        let calls = fx.source.calls().len();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fx.source.calls().len(), calls);
    }
}
