//! Frontend-facing log capture.
//!
//! Frontends show the controller's `tracing` output next to the form. The
//! [`tracing::UiTracingLayer`] turns events into [`LogLine`]s and parks them
//! in a [`tracing::LogBuffer`]; the frontend drains that buffer at its own
//! pace.
//!
//! ```text
//! controller ──tracing──▶ UiTracingLayer ──▶ LogBuffer ◀──drain── frontend
//! ```

pub mod tracing;

use serde::{Deserialize, Serialize};

/// Maximum log lines kept in memory.
pub const MAX_LOG_LINES: usize = 2000;
/// Trim to this many when the cap is exceeded.
pub const LOG_TRIM_TO: usize = 1200;

/// A single log line captured from tracing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub time: String,
    pub level: LogLevel,
    pub message: String,
}

/// Log severity level (mirrors tracing levels).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Short fixed-width label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO ",
            Self::Warn => "WARN ",
            Self::Error => "ERROR",
        }
    }
}

/// Append `lines` to `logs`, trimming the oldest entries past the cap.
pub fn append_capped(logs: &mut Vec<LogLine>, lines: Vec<LogLine>) {
    logs.extend(lines);
    if logs.len() > MAX_LOG_LINES {
        let drain = logs.len() - LOG_TRIM_TO;
        logs.drain(..drain);
    }
}
