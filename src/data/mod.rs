//! Data models for parameter readings and the display state.
//!
//! ## Submodules
//!
//! - [`duration`]: Parsing and formatting of duration strings (e.g., "500ms", "2s")
//! - [`reading`]: Payload model ([`Reading`], [`ParamValue`], [`ParamStatus`])
//! - [`state`]: The shared [`DisplayState`] written by the poll loop
//!
//! ## Data Flow
//!
//! ```text
//! GET <endpoint>?id=<line>  (JSON array)
//!        │
//!        ▼
//! Vec<Reading>  (field-for-field)
//!        │
//!        ▼
//! SharedState::apply()  ──▶  ui::render()
//! ```

pub mod duration;
pub mod reading;
pub mod state;

pub use reading::{HealthStatus, ParamStatus, ParamValue, Reading};
pub use state::{DisplayState, SharedState};
