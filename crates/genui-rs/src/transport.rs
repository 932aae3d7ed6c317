//! The network seam between the controller and the generation endpoint.
//!
//! A [`Transport`] sends one [`GenerateRequest`] and yields a
//! [`TransportResponse`]: the HTTP status plus a body that is read lazily.
//! Sending and reading are separate awaits so the controller can tell a
//! transport failure ("could not reach the server") from an unreadable body
//! ("invalid response").

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

use tracing::{debug, trace};

use crate::GenerateRequest;
use crate::config::ClientConfig;

/// Boxed future returned by [`Transport::generate`].
///
/// `Err` means the request could not be sent or no response arrived.
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<TransportResponse, String>> + Send + 'a>>;

/// Boxed future that reads a response body to text.
pub type BodyFuture = Pin<Box<dyn Future<Output = Result<String, String>> + Send>>;

// ── Transport trait ────────────────────────────────────────────────

/// Sends generation requests.
///
/// Uses a boxed future so that the trait is dyn-compatible.
pub trait Transport: Send + Sync {
    fn generate(&self, request: GenerateRequest) -> TransportFuture<'_>;
}

// ── TransportResponse ──────────────────────────────────────────────

/// A received response whose body has not been read yet.
pub struct TransportResponse {
    status: u16,
    body: BodyFuture,
}

impl TransportResponse {
    /// Wrap a status and a future that reads the body.
    pub fn new<F>(status: u16, body: F) -> Self
    where
        F: Future<Output = Result<String, String>> + Send + 'static,
    {
        Self {
            status,
            body: Box::pin(body),
        }
    }

    /// A response whose body is already in memory.
    pub fn ready(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        Self::new(status, async move { Ok(body) })
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        crate::is_success_status(self.status)
    }

    /// Read the body to text.
    pub async fn text(self) -> Result<String, String> {
        self.body.await
    }
}

impl fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

// ── HttpTransport ──────────────────────────────────────────────────

/// Async HTTP transport for the generation endpoint.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// Build a transport from the client configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, String> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| format!("failed to build HTTP client: {e}"))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    fn generate(&self, request: GenerateRequest) -> TransportFuture<'_> {
        Box::pin(async move {
            debug!(
                "generate request: endpoint={}, prompt_chars={}",
                self.endpoint,
                request.prompt.chars().count()
            );
            let start = Instant::now();

            let resp = self
                .client
                .post(&self.endpoint)
                .json(&request)
                .send()
                .await
                .map_err(|e| format!("request failed: {e}"))?;

            let status = resp.status();
            debug!(
                "generate response: HTTP {} in {:.1}s",
                status,
                start.elapsed().as_secs_f64()
            );

            Ok(TransportResponse::new(status.as_u16(), async move {
                let bytes = resp
                    .bytes()
                    .await
                    .map_err(|e| format!("failed to read response: {e}"))?;
                trace!("response body: {} bytes", bytes.len());
                String::from_utf8(bytes.to_vec())
                    .map_err(|e| format!("response is not valid UTF-8: {e}"))
            }))
        })
    }
}

// ── FnTransport ────────────────────────────────────────────────────

/// Type-erased async handler for [`FnTransport`].
type ErasedTransportHandler = Box<
    dyn Fn(GenerateRequest) -> Pin<Box<dyn Future<Output = Result<TransportResponse, String>> + Send>>
        + Send
        + Sync,
>;

/// A closure-based transport, for offline frontends and tests.
///
/// ```
/// use genui_rs::transport::{FnTransport, TransportResponse};
///
/// let transport = FnTransport::new(|req| async move {
///     let body = serde_json::json!({"tree": {"type": "text", "props": {"text": req.prompt}}});
///     Ok(TransportResponse::ready(200, body.to_string()))
/// });
/// # let _ = transport;
/// ```
pub struct FnTransport {
    handler: ErasedTransportHandler,
}

impl FnTransport {
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(GenerateRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<TransportResponse, String>> + Send + 'static,
    {
        let erased = move |req: GenerateRequest| -> Pin<
            Box<dyn Future<Output = Result<TransportResponse, String>> + Send>,
        > { Box::pin(handler(req)) };
        Self {
            handler: Box::new(erased),
        }
    }
}

impl Transport for FnTransport {
    fn generate(&self, request: GenerateRequest) -> TransportFuture<'_> {
        (self.handler)(request)
    }
}

impl fmt::Debug for FnTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTransport").finish_non_exhaustive()
    }
}
