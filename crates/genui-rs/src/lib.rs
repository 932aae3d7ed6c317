//! Prompt-to-UI client: submit a text prompt to a generation endpoint and
//! render the component tree it returns.
//!
//! `genui-rs` is the library behind the `genui` CLI and the `genui-tui`
//! terminal form. The core abstraction is the
//! [`PromptController`](controller::PromptController). It holds the current
//! prompt and a [`GenerateResult`](controller::GenerateResult) state machine
//! (`Idle → Loading → Success | Error`). Each submission is one request
//! through a [`Transport`](transport::Transport); every failure ends up as an
//! `Error` result the frontend can display.
//!
//! # Getting started
//!
//! ```ignore
//! use genui_rs::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), String> {
//!     let config = ClientConfig::from_env();
//!     let controller = PromptController::new(HttpTransport::new(&config)?);
//!
//!     controller.update_prompt("a login form");
//!     controller.submit().await;
//!
//!     let registry = Registry::builtin();
//!     match controller.result() {
//!         GenerateResult::Success { tree } => match ValidatedRenderer::new(&registry).render(&tree) {
//!             RenderOutcome::Rendered(lines) => print!("{}", render_plain(&lines)),
//!             RenderOutcome::Invalid(issues) => eprintln!("{} issue(s)", issues.len()),
//!         },
//!         GenerateResult::Error { message, .. } => eprintln!("{message}"),
//!         _ => {}
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`controller`] | Prompt submission controller and the result state machine |
//! | [`transport`] | [`Transport`](transport::Transport) seam, reqwest-backed [`HttpTransport`](transport::HttpTransport), closure-based [`FnTransport`](transport::FnTransport) |
//! | [`render`] | Component [`Registry`](render::Registry), tree validation, [`ValidatedRenderer`](render::ValidatedRenderer) |
//! | [`config`] | [`ClientConfig`](config::ClientConfig): endpoint, user agent, optional timeout |
//! | [`ui`] | Tracing capture layer and log line types for frontends |

pub mod config;
pub mod controller;
pub mod prelude;
pub mod render;
pub mod transport;
pub mod ui;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Re-export schemars for downstream crates.
pub use schemars;

// ── Constants ──────────────────────────────────────────────────────

/// Generation endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:3000/api/generate";

/// Environment variable that overrides the endpoint.
pub const ENDPOINT_ENV_VAR: &str = "GENUI_ENDPOINT";

/// Error message when the request never reached the server.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error \u{2014} could not reach the server.";

/// Error message when the response body is not valid JSON.
pub const INVALID_RESPONSE_MESSAGE: &str = "Server returned an invalid response.";

/// Message used for a failed response whose body carries no `error` field.
pub fn fallback_error_message(status: u16) -> String {
    format!("Request failed ({status})")
}

/// Whether an HTTP status counts as success (2xx).
pub fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}

// ── Schema generation ──────────────────────────────────────────────

/// Generate a JSON Schema `serde_json::Value` for a wire type.
///
/// ```
/// use genui_rs::{GenerateRequest, json_schema_for};
///
/// let schema = json_schema_for::<GenerateRequest>();
/// assert_eq!(schema["type"], "object");
/// assert!(schema["required"].as_array().unwrap().contains(&"prompt".into()));
/// ```
pub fn json_schema_for<T: JsonSchema>() -> serde_json::Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(schema)
        .unwrap_or_else(|_| serde_json::json!({"type": "object", "properties": {}}))
}

// ── Wire types ─────────────────────────────────────────────────────

/// Request body POSTed to the generation endpoint.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq, Eq)]
pub struct GenerateRequest {
    /// The trimmed user prompt.
    pub prompt: String,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

/// A `{path, message}` pair describing why a tree or request failed
/// validation.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Dotted location of the problem, e.g. `root.children[0]`.
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Body of a successful (2xx) response. Only `tree` is read; it is kept
/// opaque until a renderer validates it.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
pub struct SuccessBody {
    pub tree: serde_json::Value,
}

/// Body of a failed (non-2xx) response. Both fields are optional.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<ValidationIssue>>,
}
