//! Diagnostic logging.
//!
//! The terminal belongs to the TUI, so log output goes to a file. `RUST_LOG`
//! takes precedence over the configured level. The file is rotated by size
//! and only a fixed number of old files is kept, so a long outage of the
//! endpoint cannot fill the disk with poll failures.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use file_rotate::compression::Compression;
use file_rotate::suffix::AppendCount;
use file_rotate::{ContentLimit, FileRotate};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// When to roll the log file over and how many old files to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Rotation {
    /// Size in bytes at which the current file is rotated.
    pub max_bytes: usize,
    /// Rotated files kept next to the current one (`<file>.1` is the newest).
    pub backups: usize,
}

impl Default for Rotation {
    fn default() -> Self {
        Self {
            max_bytes: 30 * 1024 * 1024,
            backups: 5,
        }
    }
}

/// Install the global subscriber writing to `path`.
///
/// Parent directories are created as needed. Calling this twice is harmless;
/// the first subscriber stays installed.
pub fn init(path: &Path, default_level: &str, rotation: Rotation) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    // Surface permission problems here rather than as silently dropped lines
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(rotating_writer(path, rotation)))
        .with_ansi(false)
        .with_target(true)
        .try_init();

    Ok(())
}

/// Size-rotated writer for `path`.
fn rotating_writer(path: &Path, rotation: Rotation) -> FileRotate<AppendCount> {
    FileRotate::new(
        path,
        AppendCount::new(rotation.backups),
        ContentLimit::Bytes(rotation.max_bytes.max(1)),
        Compression::None,
        #[cfg(unix)]
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn backup(path: &Path, n: usize) -> PathBuf {
        PathBuf::from(format!("{}.{}", path.display(), n))
    }

    #[test]
    fn test_init_creates_log_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("linewatch.log");

        init(&path, "debug", Rotation::default()).unwrap();
        assert!(path.exists());

        // A second call keeps the first subscriber and still succeeds
        init(&path, "info", Rotation::default()).unwrap();
    }

    #[test]
    fn test_init_reports_unwritable_path() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        let err = init(&blocker.join("linewatch.log"), "info", Rotation::default()).unwrap_err();
        assert!(err.to_string().contains("creating log directory"));
    }

    #[test]
    fn test_rotation_keeps_only_configured_backups() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("linewatch.log");
        let rotation = Rotation {
            max_bytes: 100,
            backups: 3,
        };

        let mut writer = rotating_writer(&path, rotation);
        let line = [b'x'; 64];
        for _ in 0..10 {
            writer.write_all(&line).unwrap();
            writer.write_all(b"\n").unwrap();
        }
        writer.flush().unwrap();

        assert!(path.exists());
        for n in 1..=3 {
            assert!(backup(&path, n).exists(), "missing backup {}", n);
        }
        assert!(!backup(&path, 4).exists());
    }

    #[test]
    fn test_default_rotation() {
        let rotation = Rotation::default();
        assert_eq!(rotation.max_bytes, 30 * 1024 * 1024);
        assert_eq!(rotation.backups, 5);
    }
}
