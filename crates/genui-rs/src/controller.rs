//! Prompt submission controller and the result state machine.
//!
//! ```text
//! Idle ──submit──▶ Loading ──resolve──▶ Success | Error ──submit──▶ Loading ...
//! ```
//!
//! The controller owns a [`FormState`] (prompt + result) behind a mutex.
//! Frontends read it with [`PromptController::snapshot`] and drive it with
//! [`update_prompt`](PromptController::update_prompt) and
//! [`submit`](PromptController::submit). The lock is held only while a
//! transition is applied, never across an await.
//!
//! Submitting is split in two so a render loop on another thread can hand
//! the network part to an async runtime:
//!
//! - [`PromptController::begin_submit`] trims the prompt, refuses an empty
//!   one, and switches the result to `Loading`.
//! - [`PendingSubmission::resolve`] sends the request, reads the body, and
//!   applies the terminal `Success` or `Error` transition.
//!
//! `begin_submit` does not look at the current result. Keeping a second
//! submission out while one is `Loading` is the frontend's job: it disables
//! its submit control whenever [`PromptController::can_submit`] is false.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::transport::Transport;
use crate::{
    GenerateRequest, INVALID_RESPONSE_MESSAGE, NETWORK_ERROR_MESSAGE, ValidationIssue,
    fallback_error_message, is_success_status,
};

// ── Result state ──────────────────────────────────────────────────────

/// Outcome of the latest submission.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum GenerateResult {
    /// No request issued yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The endpoint returned a tree. Its shape is not checked here.
    Success { tree: Value },
    /// The submission failed. `issues` is `None` unless the server sent them.
    Error {
        message: String,
        issues: Option<Vec<ValidationIssue>>,
    },
}

impl GenerateResult {
    /// An `Error` without validation issues.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            issues: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Short status name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success { .. } => "success",
            Self::Error { .. } => "error",
        }
    }
}

/// Everything a frontend needs to draw the form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormState {
    /// The prompt exactly as typed.
    pub prompt: String,
    pub result: GenerateResult,
}

impl FormState {
    pub fn trimmed_prompt(&self) -> &str {
        self.prompt.trim()
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.result.is_loading() && !self.trimmed_prompt().is_empty()
    }

    /// Whether the prompt input is disabled.
    pub fn input_disabled(&self) -> bool {
        self.result.is_loading()
    }
}

// ── Controller ────────────────────────────────────────────────────────

/// Converts a prompt into a request and exposes the result for rendering.
///
/// The controller holds the only strong reference to its state. Dropping
/// it while a [`PendingSubmission`] is in flight turns that submission's
/// final transition into a no-op.
pub struct PromptController {
    state: Arc<Mutex<FormState>>,
    transport: Arc<dyn Transport>,
}

impl PromptController {
    /// Create a controller in the `Idle` state.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::with_shared_transport(Arc::new(transport))
    }

    /// Create a controller that shares an existing transport.
    pub fn with_shared_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            state: Arc::new(Mutex::new(FormState::default())),
            transport,
        }
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> FormState {
        self.lock().clone()
    }

    pub fn prompt(&self) -> String {
        self.lock().prompt.clone()
    }

    pub fn result(&self) -> GenerateResult {
        self.lock().result.clone()
    }

    /// Replace the stored prompt verbatim.
    pub fn update_prompt(&self, text: impl Into<String>) {
        self.lock().prompt = text.into();
    }

    pub fn can_submit(&self) -> bool {
        self.lock().can_submit()
    }

    pub fn input_disabled(&self) -> bool {
        self.lock().input_disabled()
    }

    /// Start a submission.
    ///
    /// Returns `None` and leaves the state untouched when the trimmed prompt
    /// is empty. Otherwise the result becomes `Loading` and the returned
    /// [`PendingSubmission`] carries the trimmed prompt.
    pub fn begin_submit(&self) -> Option<PendingSubmission> {
        let prompt = {
            let mut s = self.lock();
            let trimmed = s.trimmed_prompt().to_string();
            if trimmed.is_empty() {
                debug!("submit ignored: prompt is empty");
                return None;
            }
            s.result = GenerateResult::Loading;
            trimmed
        };
        info!("Generating UI for prompt ({} chars)", prompt.chars().count());
        Some(PendingSubmission {
            prompt,
            state: Arc::downgrade(&self.state),
            transport: Arc::clone(&self.transport),
        })
    }

    /// Submit the current prompt and wait for the result.
    ///
    /// Returns `false` when nothing was sent because the prompt was empty.
    pub async fn submit(&self) -> bool {
        match self.begin_submit() {
            Some(pending) => {
                pending.resolve().await;
                true
            }
            None => false,
        }
    }
}

// ── Pending submission ────────────────────────────────────────────────

/// The in-flight half of a submission, created by
/// [`PromptController::begin_submit`].
pub struct PendingSubmission {
    prompt: String,
    state: Weak<Mutex<FormState>>,
    transport: Arc<dyn Transport>,
}

impl PendingSubmission {
    /// The trimmed prompt being sent.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Send the request and apply the terminal transition.
    ///
    /// Returns the result that was (or, after the controller was dropped,
    /// would have been) applied.
    pub async fn resolve(self) -> GenerateResult {
        let result = request_result(self.transport.as_ref(), self.prompt).await;

        match self.state.upgrade() {
            Some(state) => {
                let mut s = state.lock().unwrap_or_else(|e| e.into_inner());
                s.result = result.clone();
                debug!("result -> {}", result.label());
            }
            None => debug!(
                "controller dropped before the response arrived; discarding {} result",
                result.label()
            ),
        }
        result
    }
}

impl std::fmt::Debug for PendingSubmission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingSubmission")
            .field("prompt", &self.prompt)
            .finish_non_exhaustive()
    }
}

/// One request, mapped to a terminal result. Never fails.
async fn request_result(transport: &dyn Transport, prompt: String) -> GenerateResult {
    let response = match transport.generate(GenerateRequest::new(prompt)).await {
        Ok(r) => r,
        Err(e) => {
            warn!("generation endpoint unreachable: {e}");
            return GenerateResult::error(NETWORK_ERROR_MESSAGE);
        }
    };

    let status = response.status();
    match response.text().await {
        Ok(body) => interpret_response(status, &body),
        Err(e) => {
            warn!("HTTP {status}: {e}");
            GenerateResult::error(INVALID_RESPONSE_MESSAGE)
        }
    }
}

// ── Response interpretation ───────────────────────────────────────────

/// Map a received response to a terminal result.
///
/// - body not JSON → `Error` with [`INVALID_RESPONSE_MESSAGE`];
/// - non-2xx → `Error` with the body's `error` (or a fallback naming the
///   status) and the body's `issues` when present;
/// - 2xx → `Success` with the body's `tree` (`null` when absent).
pub fn interpret_response(status: u16, body: &str) -> GenerateResult {
    let data: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            warn!("HTTP {status}: response body is not JSON: {e}");
            return GenerateResult::error(INVALID_RESPONSE_MESSAGE);
        }
    };

    if !is_success_status(status) {
        let message = match data.get("error") {
            None | Some(Value::Null) => fallback_error_message(status),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };
        let issues = parse_issues(data.get("issues"));
        info!(
            "Generation failed: HTTP {status}: {message} ({} issue(s))",
            issues.as_ref().map_or(0, |i| i.len())
        );
        return GenerateResult::Error { message, issues };
    }

    let tree = data.get("tree").cloned().unwrap_or(Value::Null);
    if tree.is_null() {
        warn!("HTTP {status}: response has no tree");
    }
    GenerateResult::Success { tree }
}

/// Keep every `{path, message}` entry of an `issues` array, in order.
///
/// A non-string `path` or `message` (e.g. a `["root", 0]` path) is kept in
/// its JSON text form. Entries that are not objects, or lack either field,
/// are dropped one by one. `None` only when `issues` is absent, null, or not
/// an array.
fn parse_issues(value: Option<&Value>) -> Option<Vec<ValidationIssue>> {
    let items = match value {
        None | Some(Value::Null) => return None,
        Some(Value::Array(items)) => items,
        Some(other) => {
            warn!("ignoring issues field that is not an array: {other}");
            return None;
        }
    };

    let issues = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let issue = item.as_object().and_then(|obj| {
                Some(ValidationIssue::new(
                    field_text(obj.get("path")?),
                    field_text(obj.get("message")?),
                ))
            });
            if issue.is_none() {
                warn!("dropping malformed issue #{i}: {item}");
            }
            issue
        })
        .collect();
    Some(issues)
}

fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{FnTransport, TransportResponse};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Transport that records every prompt and answers with a fixed response.
    fn canned(
        status: u16,
        body: &'static str,
    ) -> (FnTransport, Arc<Mutex<Vec<String>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&sent);
        let transport = FnTransport::new(move |req: GenerateRequest| {
            log.lock().unwrap().push(req.prompt);
            async move { Ok::<_, String>(TransportResponse::ready(status, body)) }
        });
        (transport, sent)
    }

    #[tokio::test]
    async fn whitespace_prompt_sends_nothing() {
        let (transport, sent) = canned(200, r#"{"tree":{}}"#);
        let controller = PromptController::new(transport);
        controller.update_prompt("  ");

        assert!(!controller.can_submit());
        assert!(!controller.submit().await);
        assert!(sent.lock().unwrap().is_empty());
        assert_eq!(controller.result(), GenerateResult::Idle);
    }

    #[tokio::test]
    async fn empty_prompt_keeps_previous_result() {
        let (transport, _sent) = canned(500, "{}");
        let controller = PromptController::new(transport);
        controller.update_prompt("first");
        controller.submit().await;
        let before = controller.result();
        assert!(matches!(before, GenerateResult::Error { .. }));

        controller.update_prompt("\n\t ");
        assert!(controller.begin_submit().is_none());
        assert_eq!(controller.result(), before);
    }

    #[tokio::test]
    async fn login_form_scenario_succeeds() {
        let (transport, sent) = canned(200, r#"{"tree":{"type":"form"}}"#);
        let controller = PromptController::new(transport);
        controller.update_prompt("  a login form ");

        assert!(controller.submit().await);
        assert_eq!(sent.lock().unwrap().as_slice(), ["a login form"]);
        assert_eq!(
            controller.result(),
            GenerateResult::Success {
                tree: json!({"type": "form"})
            }
        );
    }

    #[tokio::test]
    async fn prompt_is_stored_verbatim() {
        let (transport, _sent) = canned(200, "{}");
        let controller = PromptController::new(transport);
        controller.update_prompt("  padded  ");
        assert_eq!(controller.prompt(), "  padded  ");
        assert_eq!(controller.snapshot().trimmed_prompt(), "padded");
    }

    #[tokio::test]
    async fn validation_failure_keeps_message_and_issues() {
        let (transport, _sent) = canned(
            422,
            r#"{"error":"invalid node","issues":[{"path":"root.children[0]","message":"unknown type"}]}"#,
        );
        let controller = PromptController::new(transport);
        controller.update_prompt("a dashboard");
        controller.submit().await;

        assert_eq!(
            controller.result(),
            GenerateResult::Error {
                message: "invalid node".into(),
                issues: Some(vec![ValidationIssue::new(
                    "root.children[0]",
                    "unknown type"
                )]),
            }
        );
    }

    #[tokio::test]
    async fn failure_without_error_field_uses_fallback() {
        let (transport, _sent) = canned(500, r#"{"detail":"boom"}"#);
        let controller = PromptController::new(transport);
        controller.update_prompt("x");
        controller.submit().await;

        match controller.result() {
            GenerateResult::Error { message, issues } => {
                assert!(message.contains("500"), "message={message}");
                assert!(issues.is_none());
            }
            other => panic!("expected Error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_failure_is_network_error() {
        let transport =
            FnTransport::new(|_req| async {
                Err::<TransportResponse, String>("request failed: connection refused".into())
            });
        let controller = PromptController::new(transport);
        controller.update_prompt("x");
        controller.submit().await;

        assert_eq!(
            controller.result(),
            GenerateResult::Error {
                message: NETWORK_ERROR_MESSAGE.into(),
                issues: None,
            }
        );
    }

    #[tokio::test]
    async fn unparsable_body_is_invalid_response() {
        let (transport, _sent) = canned(200, "<html>oops</html>");
        let controller = PromptController::new(transport);
        controller.update_prompt("x");
        controller.submit().await;

        assert_eq!(
            controller.result(),
            GenerateResult::error(INVALID_RESPONSE_MESSAGE)
        );
    }

    #[tokio::test]
    async fn unreadable_body_is_invalid_response() {
        let transport = FnTransport::new(|_req| async {
            Ok::<_, String>(TransportResponse::new(200, async {
                Err::<String, String>("failed to read response: connection reset".into())
            }))
        });
        let controller = PromptController::new(transport);
        controller.update_prompt("x");
        controller.submit().await;

        assert_eq!(
            controller.result(),
            GenerateResult::error(INVALID_RESPONSE_MESSAGE)
        );
    }

    #[tokio::test]
    async fn loading_disables_submit_until_resolved() {
        let (transport, _sent) = canned(200, r#"{"tree":1}"#);
        let controller = PromptController::new(transport);
        controller.update_prompt("x");

        let pending = controller.begin_submit().unwrap();
        assert_eq!(pending.prompt(), "x");
        assert_eq!(controller.result(), GenerateResult::Loading);
        assert!(!controller.can_submit());
        assert!(controller.input_disabled());

        pending.resolve().await;
        assert!(controller.can_submit());
        assert!(!controller.input_disabled());
    }

    #[tokio::test]
    async fn error_then_resubmit_goes_back_to_loading() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let transport = FnTransport::new(move |_req| {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err("request failed: timed out".to_string())
                } else {
                    Ok(TransportResponse::ready(
                        200,
                        r#"{"tree":{"type":"text"}}"#,
                    ))
                }
            }
        });
        let controller = PromptController::new(transport);
        controller.update_prompt("retry me");

        controller.submit().await;
        assert!(matches!(controller.result(), GenerateResult::Error { .. }));

        let pending = controller.begin_submit().unwrap();
        assert_eq!(controller.result(), GenerateResult::Loading);
        pending.resolve().await;
        assert_eq!(
            controller.result(),
            GenerateResult::Success {
                tree: json!({"type": "text"})
            }
        );
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn late_result_after_drop_is_ignored() {
        let (transport, _sent) = canned(200, r#"{"tree":{"type":"card"}}"#);
        let controller = PromptController::new(transport);
        controller.update_prompt("x");

        let pending = controller.begin_submit().unwrap();
        drop(controller);

        let result = pending.resolve().await;
        assert!(matches!(result, GenerateResult::Success { .. }));
    }

    /// Nothing inside the controller serializes submissions: when the
    /// frontend guard is bypassed both requests run and the last one to
    /// resolve wins.
    #[tokio::test]
    async fn bypassed_guard_lets_last_resolution_win() {
        let transport = FnTransport::new(|req: GenerateRequest| async move {
            let body = json!({"tree": {"type": "text", "props": {"text": req.prompt}}});
            Ok::<_, String>(TransportResponse::ready(200, body.to_string()))
        });
        let controller = PromptController::new(transport);

        controller.update_prompt("first");
        let first = controller.begin_submit().unwrap();
        controller.update_prompt("second");
        let second = controller.begin_submit().unwrap();
        assert_eq!(controller.result(), GenerateResult::Loading);

        second.resolve().await;
        first.resolve().await;

        assert_eq!(
            controller.result(),
            GenerateResult::Success {
                tree: json!({"type": "text", "props": {"text": "first"}})
            }
        );
    }

    #[test]
    fn success_without_tree_holds_null() {
        assert_eq!(
            interpret_response(200, r#"{"other":true}"#),
            GenerateResult::Success { tree: Value::Null }
        );
        assert_eq!(
            interpret_response(200, "[1,2]"),
            GenerateResult::Success { tree: Value::Null }
        );
    }

    #[test]
    fn null_error_field_uses_fallback() {
        assert_eq!(
            interpret_response(404, r#"{"error":null,"issues":null}"#),
            GenerateResult::error("Request failed (404)")
        );
    }

    #[test]
    fn non_string_error_is_stringified() {
        assert_eq!(
            interpret_response(400, r#"{"error":42}"#),
            GenerateResult::error("42")
        );
    }

    #[test]
    fn malformed_issues_are_dropped() {
        assert_eq!(
            interpret_response(422, r#"{"error":"bad","issues":"nope"}"#),
            GenerateResult::error("bad")
        );
    }

    #[test]
    fn mixed_issue_list_keeps_valid_entries() {
        let body = r#"{"error":"bad","issues":[
            {"path":"root.a","message":"m"},
            {"path":["root",0],"message":"x"},
            "not an issue",
            {"path":"root.b"},
            {"path":"root.c","message":{"code":"too_small"}}
        ]}"#;
        assert_eq!(
            interpret_response(422, body),
            GenerateResult::Error {
                message: "bad".into(),
                issues: Some(vec![
                    ValidationIssue::new("root.a", "m"),
                    ValidationIssue::new(r#"["root",0]"#, "x"),
                    ValidationIssue::new("root.c", r#"{"code":"too_small"}"#),
                ]),
            }
        );
    }

    #[test]
    fn empty_issue_list_is_kept() {
        assert_eq!(
            interpret_response(422, r#"{"error":"bad","issues":[]}"#),
            GenerateResult::Error {
                message: "bad".into(),
                issues: Some(Vec::new()),
            }
        );
    }

    #[test]
    fn issue_order_is_preserved() {
        let body = r#"{"error":"bad","issues":[
            {"path":"root.b","message":"second"},
            {"path":"root.a","message":"first"}
        ]}"#;
        match interpret_response(422, body) {
            GenerateResult::Error {
                issues: Some(issues),
                ..
            } => {
                let paths: Vec<&str> = issues.iter().map(|i| i.path.as_str()).collect();
                assert_eq!(paths, ["root.b", "root.a"]);
            }
            other => panic!("expected Error with issues, got {other:?}"),
        }
    }

    #[test]
    fn empty_body_is_invalid_even_on_failure_status() {
        assert_eq!(
            interpret_response(502, ""),
            GenerateResult::error(INVALID_RESPONSE_MESSAGE)
        );
    }

    #[test]
    fn result_labels() {
        assert_eq!(GenerateResult::Idle.label(), "idle");
        assert_eq!(GenerateResult::Loading.label(), "loading");
        assert_eq!(GenerateResult::error("x").label(), "error");
        assert_eq!(
            GenerateResult::Success { tree: Value::Null }.label(),
            "success"
        );
    }
}
