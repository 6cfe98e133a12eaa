//! Scripted source for tests.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;

use super::{FetchError, ParamsSource};
use crate::data::{ParamStatus, ParamValue, Reading};
use crate::lines::{LineId, Selection};

/// Returns queued responses in order and records every call.
#[derive(Debug, Default)]
pub(crate) struct ScriptedSource {
    responses: Mutex<VecDeque<Result<Vec<Reading>, FetchError>>>,
    calls: Mutex<Vec<Call>>,
    latency: Duration,
    switch_during_fetch: Mutex<Option<(Selection, LineId)>>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Call {
    pub line: LineId,
    pub started: Instant,
    pub finished: Instant,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Each fetch sleeps this long before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn push_ok(&self, readings: Vec<Reading>) {
        self.responses.lock().push_back(Ok(readings));
    }

    pub fn push_err(&self, err: FetchError) {
        self.responses.lock().push_back(Err(err));
    }

    /// Select `target` while the next fetch is in flight.
    pub fn switch_during_next_fetch(&self, selection: Selection, target: LineId) {
        *self.switch_during_fetch.lock() = Some((selection, target));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ParamsSource for ScriptedSource {
    async fn fetch(&self, line: LineId) -> Result<Vec<Reading>, FetchError> {
        let started = Instant::now();
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if let Some((selection, target)) = self.switch_during_fetch.lock().take() {
            selection.transition(target);
        }
        let response = self
            .responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Http("script exhausted".to_string())));
        self.calls.lock().push(Call {
            line,
            started,
            finished: Instant::now(),
        });
        response
    }

    fn description(&self) -> &str {
        "scripted"
    }
}

pub(crate) fn reading(name: &str, value: i64, status: &str) -> Reading {
    Reading {
        name: name.to_string(),
        value: ParamValue::Int(value),
        status: ParamStatus::Label(status.to_string()),
    }
}
