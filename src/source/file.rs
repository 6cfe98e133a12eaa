//! Fixture directory source.
//!
//! Reads `<dir>/<line>.json` on every fetch. Useful for running the
//! dashboard without the parameter service.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{FetchError, ParamsSource};
use crate::data::Reading;
use crate::lines::LineId;

/// A data source that reads readings from per-line JSON files.
///
/// Each file holds the same JSON array the HTTP endpoint returns. Files are
/// re-read on every poll, so editing a fixture updates the display.
#[derive(Debug)]
pub struct FileSource {
    dir: PathBuf,
    description: String,
}

impl FileSource {
    /// Create a new file source for the given directory.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let description = format!("fixtures: {}", dir.display());
        Self { dir, description }
    }

    /// Returns the directory being read.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the fixture for `line`.
    pub fn path_for(&self, line: LineId) -> PathBuf {
        self.dir.join(format!("{}.json", line))
    }
}

#[async_trait]
impl ParamsSource for FileSource {
    async fn fetch(&self, line: LineId) -> Result<Vec<Reading>, FetchError> {
        let content = tokio::fs::read(self.path_for(line)).await?;
        let readings = serde_json::from_slice(&content)?;
        Ok(readings)
    }

    fn description(&self) -> &str {
        &self.description
    }
}
