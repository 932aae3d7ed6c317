//! Convenience re-exports for common `genui-rs` types.
//!
//! ```ignore
//! use genui_rs::prelude::*;
//! ```

// ── Wire types ──────────────────────────────────────────────────────
pub use crate::{ErrorBody, GenerateRequest, SuccessBody, ValidationIssue, json_schema_for};

// ── Controller ──────────────────────────────────────────────────────
pub use crate::config::ClientConfig;
pub use crate::controller::{
    FormState, GenerateResult, PendingSubmission, PromptController, interpret_response,
};

// ── Transport ───────────────────────────────────────────────────────
pub use crate::transport::{FnTransport, HttpTransport, Transport, TransportResponse};

// ── Rendering ───────────────────────────────────────────────────────
pub use crate::render::{
    FnRenderer, Node, NodeRenderer, Registry, RenderOutcome, RenderedLine, ValidatedRenderer,
    render_plain, validate_tree,
};

// ── Logging ─────────────────────────────────────────────────────────
pub use crate::ui::tracing::{LogBuffer, UiTracingLayer};
pub use crate::ui::{LogLevel, LogLine};
