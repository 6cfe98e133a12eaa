//! Settings loading and validation.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `LINEWATCH_*` environment variables (`__` separates nested keys). The
//! binary applies command line flags on top.
//!
//! ```toml
//! endpoint = "http://192.168.0.10:8000/api/get-params"
//! poll_delay = "500ms"
//! initial_line = 1
//! stale_policy = "apply"
//!
//! [log_rotation]
//! max_bytes = 31457280
//! backups = 5
//!
//! [lines]
//! 1 = "Line 4"
//! 2 = "Line 5"
//! 3 = "Line X"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;

use crate::data::duration::parse_duration;
use crate::lines::{LineId, LineRegistry};
use crate::logging::Rotation;
use crate::poller::StalePolicy;

/// Prefix of environment variables read by [`Settings::load`].
pub const ENV_PREFIX: &str = "LINEWATCH";

/// Errors in the settings. These are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no lines configured")]
    NoLines,

    #[error("initial line {0} is not a configured line")]
    UnknownInitialLine(LineId),

    #[error("line id must be an integer, got {0:?}")]
    InvalidLineId(String),

    #[error("invalid duration for {key}: {value:?}")]
    InvalidDuration { key: &'static str, value: String },

    #[error("poll delay must be greater than zero")]
    ZeroDelay,

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error(transparent)]
    Load(#[from] config::ConfigError),
}

/// Settings as they appear in files and the environment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawSettings {
    endpoint: String,
    poll_delay: String,
    request_timeout: Option<String>,
    initial_line: LineId,
    stale_policy: StalePolicy,
    swipe_threshold: u16,
    log_file: PathBuf,
    log_level: String,
    log_rotation: Rotation,
    lines: BTreeMap<String, String>,
}

impl Default for RawSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8000/api/get-params".to_string(),
            poll_delay: "500ms".to_string(),
            request_timeout: None,
            initial_line: 1,
            stale_policy: StalePolicy::Apply,
            swipe_threshold: 6,
            log_file: PathBuf::from("logs/linewatch.log"),
            log_level: "info".to_string(),
            log_rotation: Rotation::default(),
            lines: BTreeMap::from([
                ("1".to_string(), "Line 4".to_string()),
                ("2".to_string(), "Line 5".to_string()),
                ("3".to_string(), "Line X".to_string()),
            ]),
        }
    }
}

/// Validated settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the parameter endpoint.
    pub endpoint: String,
    /// Delay between the end of a poll cycle and the start of the next.
    pub poll_delay: Duration,
    /// Optional transport timeout for a single request.
    pub request_timeout: Option<Duration>,
    /// Line selected at startup.
    pub initial_line: LineId,
    /// Handling of responses for a line that is no longer selected.
    pub stale_policy: StalePolicy,
    /// Minimum horizontal drag, in columns, recognised as a swipe.
    pub swipe_threshold: u16,
    /// Diagnostic log destination.
    pub log_file: PathBuf,
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Size limit and retained backups of the log file.
    pub log_rotation: Rotation,
    /// Static line registry.
    pub lines: LineRegistry,
}

impl Settings {
    /// Load settings from an optional file and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, environment())
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let raw: RawSettings = builder.add_source(env).build()?.try_deserialize()?;
        raw.validate()
    }
}

impl RawSettings {
    fn validate(self) -> Result<Settings, ConfigError> {
        let poll_delay = duration("poll_delay", &self.poll_delay)?;
        if poll_delay.is_zero() {
            return Err(ConfigError::ZeroDelay);
        }

        let request_timeout = self
            .request_timeout
            .as_deref()
            .map(|value| duration("request_timeout", value))
            .transpose()?;

        let lines = self
            .lines
            .into_iter()
            .map(|(id, name)| {
                id.trim()
                    .parse::<LineId>()
                    .map(|id| (id, name))
                    .map_err(|_| ConfigError::InvalidLineId(id))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let lines = LineRegistry::new(lines)?;

        if !lines.contains(self.initial_line) {
            return Err(ConfigError::UnknownInitialLine(self.initial_line));
        }

        Ok(Settings {
            endpoint: self.endpoint,
            poll_delay,
            request_timeout,
            initial_line: self.initial_line,
            stale_policy: self.stale_policy,
            swipe_threshold: self.swipe_threshold,
            log_file: self.log_file,
            log_level: self.log_level,
            log_rotation: self.log_rotation,
            lines,
        })
    }
}

/// `LINEWATCH_POLL_DELAY` maps to `poll_delay`; `__` separates nested keys.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

fn duration(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    parse_duration(value).map_err(|_| ConfigError::InvalidDuration {
        key,
        value: value.to_string(),
    })
}
