//! Parameter readings as delivered by the parameter endpoint.
//!
//! The endpoint returns a JSON array of objects with `name`, `value` and
//! `status`. Readings are copied field-for-field; the status is only
//! interpreted when choosing how to display it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One named, valued, status-tagged measurement belonging to a line.
///
/// Unknown fields in the payload are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub name: String,
    pub value: ParamValue,
    pub status: ParamStatus,
}

/// Scalar value of a reading.
///
/// The service decides the type; formatted values (e.g. `"12.5"`) arrive as
/// text and are shown verbatim. A `null` value is kept and shown empty rather
/// than failing the whole payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Null => Ok(()),
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Float(x) => write!(f, "{}", x),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

/// Health indicator of a reading, in whatever form the service sends it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamStatus {
    Flag(bool),
    Code(i64),
    Label(String),
}

impl ParamStatus {
    /// Classify the raw status for display.
    ///
    /// Code `1` means the value is fresh and `0` that it went stale.
    pub fn health(&self) -> HealthStatus {
        match self {
            ParamStatus::Flag(true) | ParamStatus::Code(1) => HealthStatus::Healthy,
            ParamStatus::Flag(false) | ParamStatus::Code(0) => HealthStatus::Warning,
            ParamStatus::Code(_) => HealthStatus::Unknown,
            ParamStatus::Label(label) => match label.trim().to_ascii_uppercase().as_str() {
                "OK" | "GOOD" => HealthStatus::Healthy,
                "WARN" | "WARNING" | "STALE" => HealthStatus::Warning,
                "ERROR" | "ERR" | "CRIT" | "CRITICAL" | "FAIL" => HealthStatus::Critical,
                _ => HealthStatus::Unknown,
            },
        }
    }
}

impl fmt::Display for ParamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamStatus::Flag(b) => write!(f, "{}", b),
            ParamStatus::Code(c) => write!(f, "{}", c),
            ParamStatus::Label(s) => f.write_str(s),
        }
    }
}

/// Display classification of a reading's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HealthStatus {
    Healthy,
    Unknown,
    Warning,
    Critical,
}

impl HealthStatus {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "OK",
            HealthStatus::Unknown => "?",
            HealthStatus::Warning => "WARN",
            HealthStatus::Critical => "CRIT",
        }
    }
}
