//! Tracing subscriber layer that captures log events into a [`LogBuffer`].
//!
//! The buffer has its own mutex, separate from the controller's form state,
//! so a log call from a tokio worker never waits on the render thread.

use std::sync::{Arc, Mutex};

use chrono::Local;
use tracing::Subscriber;
use tracing_subscriber::layer::Layer;
use tracing_subscriber::registry::LookupSpan;

use super::{LOG_TRIM_TO, LogLevel, LogLine, MAX_LOG_LINES, append_capped};

/// A shared buffer of pending log lines.
#[derive(Clone)]
pub struct LogBuffer(Arc<Mutex<Vec<LogLine>>>);

impl LogBuffer {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(Vec::with_capacity(128))))
    }

    /// Drain all pending log lines from the buffer, returning them.
    pub fn drain(&self) -> Vec<LogLine> {
        let mut buf = self.0.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *buf)
    }

    /// Drain pending log lines into a frontend's log list, respecting the
    /// trim limits.
    pub fn flush_into(&self, logs: &mut Vec<LogLine>) {
        let lines = self.drain();
        if !lines.is_empty() {
            append_capped(logs, lines);
        }
    }
}

/// A [`tracing_subscriber::Layer`] that captures log events into
/// a [`LogBuffer`].
pub struct UiTracingLayer {
    buffer: LogBuffer,
    min_level: LogLevel,
}

impl UiTracingLayer {
    /// Create a layer capturing `INFO` and above, and its [`LogBuffer`].
    pub fn new() -> (Self, LogBuffer) {
        Self::with_min_level(LogLevel::Info)
    }

    /// Create a layer capturing `min_level` and above.
    pub fn with_min_level(min_level: LogLevel) -> (Self, LogBuffer) {
        let buffer = LogBuffer::new();
        (
            Self {
                buffer: buffer.clone(),
                min_level,
            },
            buffer,
        )
    }
}

impl<S: Subscriber + for<'a> LookupSpan<'a>> Layer<S> for UiTracingLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let level = match *event.metadata().level() {
            tracing::Level::TRACE => LogLevel::Trace,
            tracing::Level::DEBUG => LogLevel::Debug,
            tracing::Level::INFO => LogLevel::Info,
            tracing::Level::WARN => LogLevel::Warn,
            tracing::Level::ERROR => LogLevel::Error,
        };
        if level < self.min_level {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let mut message = visitor.message;
        if !visitor.fields.is_empty() {
            let extras: Vec<String> = visitor
                .fields
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            if message.is_empty() {
                message = extras.join(" ");
            } else {
                message = format!("{message} {{{}}}", extras.join(", "));
            }
        }

        let line = LogLine {
            time: Local::now().format("%H:%M:%S").to_string(),
            level,
            message,
        };

        if let Ok(mut buf) = self.buffer.0.lock() {
            buf.push(line);
            // Bound the backlog between drains.
            if buf.len() > MAX_LOG_LINES {
                let trim_to = buf.len() - LOG_TRIM_TO;
                buf.drain(..trim_to);
            }
        }
    }
}

/// Visitor that extracts the message and extra fields from a tracing event.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields
                .push((field.name().to_string(), format!("{value:?}")));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields
                .push((field.name().to_string(), value.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn captures_events_at_or_above_min_level() {
        let (layer, buffer) = UiTracingLayer::new();
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("hidden");
            tracing::info!("Generating UI for prompt (3 chars)");
            tracing::warn!(status = 500, "request failed");
        });

        let lines = buffer.drain();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].level, LogLevel::Info);
        assert_eq!(lines[0].message, "Generating UI for prompt (3 chars)");
        assert_eq!(lines[1].level, LogLevel::Warn);
        assert_eq!(lines[1].message, "request failed {status=500}");
        assert!(buffer.drain().is_empty());
    }

    #[test]
    fn flush_into_appends() {
        let (layer, buffer) = UiTracingLayer::with_min_level(LogLevel::Debug);
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("one");
        });

        let mut logs = Vec::new();
        buffer.flush_into(&mut logs);
        buffer.flush_into(&mut logs);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].message, "one");
    }
}
