// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # linewatch
//!
//! A terminal dashboard that polls a parameter endpoint for the currently
//! selected production line and displays the returned readings.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐   swipe    ┌───────────┐                       │
//! │  │  app    │──────────▶│ Selection │                       │
//! │  │ (input) │            └─────┬─────┘                       │
//! │  └────┬────┘                  │ current line                │
//! │       │ snapshot              ▼                             │
//! │  ┌────┴────────┐  apply  ┌─────────┐  fetch  ┌───────────┐ │
//! │  │ SharedState │◀────────│ Poller  │────────▶│  source   │ │
//! │  └─────────────┘         └─────────┘         └───────────┘ │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`lines`]**: Line registry, the selector state machine and swipes
//! - **[`poller`]**: The poll loop: fetch, apply, wait, repeat
//! - **[`source`]**: Where readings come from ([`ParamsSource`] trait), over
//!   HTTP or from fixture files
//! - **[`data`]**: Readings and the shared display state
//! - **[`app`]**, **[`events`]**, **[`gesture`]**, **[`ui`]**: The terminal front end
//! - **[`config`]**, **[`logging`]**: Layered settings and file logging
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Poll the default endpoint (http://127.0.0.1:8000/api/get-params)
//! linewatch
//!
//! # Poll another service, starting on line 2
//! linewatch --endpoint http://plant:8000/api/get-params --line 2
//!
//! # Replay fixture files (<dir>/<line>.json) instead of HTTP
//! linewatch --fixtures ./fixtures
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use std::sync::Arc;
//! use linewatch::{
//!     DisplayState, FileSource, LineRegistry, LineSelector, Poller, Selection, SharedState,
//! };
//!
//! # tokio_test::block_on(async {
//! let registry = Arc::new(LineRegistry::new([(1, "Line 4"), (2, "Line 5")]).unwrap());
//! let selector = LineSelector::new(registry, 1).unwrap();
//! let state = SharedState::new(DisplayState::new(1, selector.current_name()));
//! let selection = Selection::new(selector);
//!
//! let source = Arc::new(FileSource::new("fixtures"));
//! let handle = Poller::new(source, selection.clone(), state.clone()).spawn();
//!
//! selection.transition(2);
//! // ... render state.snapshot() ...
//! handle.shutdown().await;
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod gesture;
pub mod lines;
pub mod logging;
pub mod poller;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use config::{ConfigError, Settings};
pub use data::{DisplayState, HealthStatus, ParamStatus, ParamValue, Reading, SharedState};
pub use lines::{LineId, LineRegistry, LineSelector, Selection, Swipe};
pub use poller::{CycleOutcome, PollHandle, Poller, StalePolicy};
pub use source::{FetchError, FileSource, HttpSource, ParamsSource};
