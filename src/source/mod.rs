//! Sources of parameter readings.
//!
//! The poll loop talks to a [`ParamsSource`], which fetches the current
//! readings for one line. [`HttpSource`] queries the parameter endpoint;
//! [`FileSource`] reads JSON fixtures from a directory.

mod error;
mod file;
mod http;

pub use error::FetchError;
pub use file::FileSource;
pub use http::HttpSource;

use std::fmt::Debug;

use async_trait::async_trait;

use crate::data::Reading;
use crate::lines::LineId;

/// Fetches the current readings of a line.
///
/// # Example
///
/// ```no_run
/// use linewatch::{HttpSource, ParamsSource};
///
/// # tokio_test::block_on(async {
/// let source = HttpSource::new("http://127.0.0.1:8000/api/get-params").unwrap();
/// match source.fetch(1).await {
///     Ok(readings) => println!("Got {} readings", readings.len()),
///     Err(e) => eprintln!("poll failed: {}", e),
/// }
/// # });
/// ```
#[async_trait]
pub trait ParamsSource: Send + Sync + Debug {
    /// Fetch all readings for `line`, in the order the source lists them.
    async fn fetch(&self, line: LineId) -> Result<Vec<Reading>, FetchError>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;
}

#[cfg(test)]
pub(crate) mod scripted;
