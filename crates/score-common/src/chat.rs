/// HTTP client for the external chat completion service.
///
/// The service answers a single-turn natural-language question: the caller sends a
/// message plus an instruction preamble and gets free text back. Requests carry an
/// explicit timeout; transient failures (timeouts, connect errors, 429, 5xx) are
/// retried with exponential backoff and jitter up to a bounded attempt count.
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Clone, Debug)]
pub struct ChatClientConfig {
    pub base_url: String,
    pub default_timeout: Duration,
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub max_error_body_bytes: usize,
}

impl ChatClientConfig {
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("CHAT_BASE_URL").unwrap_or_else(|_| "http://ai:8001".to_string());

        let default_timeout = std::env::var("CHAT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(30));

        let max_retries = std::env::var("CHAT_MAX_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(3);

        let initial_backoff = std::env::var("CHAT_RETRY_INITIAL_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or_else(|| Duration::from_millis(200));

        let max_backoff = std::env::var("CHAT_RETRY_MAX_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or_else(|| Duration::from_millis(5_000));

        let max_error_body_bytes = std::env::var("CHAT_MAX_ERROR_BODY_BYTES")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(8 * 1024);

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            default_timeout,
            max_retries,
            initial_backoff,
            max_backoff,
            max_error_body_bytes,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChatClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid response JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("upstream returned error: status={status} message={message}")]
    Upstream { status: StatusCode, message: String },

    #[error("upstream returned non-JSON error: status={status} body={body}")]
    UpstreamBody { status: StatusCode, body: String },

    #[error("upstream envelope had no response text")]
    MissingResponse,
}

/// A single scoring question for the chat service.
///
/// `instructions` is the evaluation preamble, `message` the content under review.
/// The option flags mirror the service's request parameters: `use_public_knowledge`
/// lets the model draw on general knowledge, `skip_context_retrieval` disables the
/// service's auxiliary document lookup (the content is already in the message).
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub instructions: String,
    pub use_public_knowledge: bool,
    pub skip_context_retrieval: bool,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Clone)]
pub struct ChatClient {
    config: ChatClientConfig,
    http: reqwest::Client,
}

impl ChatClient {
    pub fn new(config: ChatClientConfig) -> Result<Self, ChatClientError> {
        let http = reqwest::Client::builder()
            .user_agent("page-score/chat-client")
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ChatClientConfig {
        &self.config
    }

    /// Send one chat request and return the response text.
    pub async fn ask(
        &self,
        request: ChatRequest,
        timeout_override: Option<Duration>,
    ) -> Result<String, ChatClientError> {
        let url = format!("{}/v1/chat", self.config.base_url);
        let timeout = timeout_override.unwrap_or(self.config.default_timeout);
        self.request_with_retry(|| {
            let req = request.clone();
            let url = url.clone();
            async move {
                let resp = self
                    .http
                    .post(&url)
                    .timeout(timeout)
                    .json(&req)
                    .send()
                    .await?;
                let envelope: ChatResponseEnvelope =
                    Self::parse_json_response(resp, self.config.max_error_body_bytes).await?;
                envelope.response.ok_or(ChatClientError::MissingResponse)
            }
        })
        .await
    }

    async fn parse_json_response<T: for<'de> Deserialize<'de>>(
        resp: reqwest::Response,
        max_error_body_bytes: usize,
    ) -> Result<T, ChatClientError> {
        if resp.status().is_success() {
            let json = resp.json::<T>().await?;
            return Ok(json);
        }
        Err(Self::to_upstream_error(resp, max_error_body_bytes).await)
    }

    async fn to_upstream_error(
        resp: reqwest::Response,
        max_error_body_bytes: usize,
    ) -> ChatClientError {
        let status = resp.status();
        let body = read_limited_text(resp, max_error_body_bytes).await;
        if let Ok(parsed) = serde_json::from_str::<ChatErrorEnvelope>(&body) {
            let message = parsed
                .error
                .message
                .unwrap_or_else(|| "unknown upstream error".to_string());
            return ChatClientError::Upstream { status, message };
        }
        ChatClientError::UpstreamBody { status, body }
    }

    async fn request_with_retry<T, Fut, F>(&self, mut f: F) -> Result<T, ChatClientError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, ChatClientError>>,
    {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let result = f().await;
            match result {
                Ok(v) => return Ok(v),
                Err(e) => {
                    if attempt > self.config.max_retries || !should_retry(&e) {
                        return Err(e);
                    }
                    let delay = backoff_delay(
                        self.config.initial_backoff,
                        self.config.max_backoff,
                        attempt - 1,
                    );
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis(),
                        error = %e,
                        "chat request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

fn should_retry(err: &ChatClientError) -> bool {
    match err {
        ChatClientError::Request(e) => {
            e.is_timeout() || e.is_connect() || e.is_request() || e.is_body() || e.is_decode()
        }
        ChatClientError::Upstream { status, .. }
        | ChatClientError::UpstreamBody { status, .. } => {
            *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
        }
        ChatClientError::InvalidJson(_) | ChatClientError::MissingResponse => false,
    }
}

fn backoff_delay(initial: Duration, max: Duration, exponent: u32) -> Duration {
    let mult = 1u128.checked_shl(exponent).unwrap_or(u128::MAX);
    let base_ms = initial.as_millis().saturating_mul(mult);
    let capped_ms = std::cmp::min(base_ms, max.as_millis()) as u64;
    let jitter_cap = std::cmp::max(1, capped_ms / 4);
    let jitter_ms = pseudo_jitter_ms(jitter_cap);
    Duration::from_millis(capped_ms.saturating_add(jitter_ms))
}

fn pseudo_jitter_ms(max_inclusive: u64) -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0));
    let nanos = now.subsec_nanos() as u64;
    nanos % (max_inclusive + 1)
}

async fn read_limited_text(resp: reqwest::Response, max_bytes: usize) -> String {
    match resp.bytes().await {
        Ok(mut b) => {
            if b.len() > max_bytes {
                b.truncate(max_bytes);
            }
            String::from_utf8_lossy(&b).to_string()
        }
        Err(e) => {
            warn!(error = %e, "failed to read upstream error body");
            "<failed to read error body>".to_string()
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponseEnvelope {
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatErrorEnvelope {
    error: ChatErrorObject,
}

#[derive(Debug, Deserialize)]
struct ChatErrorObject {
    message: Option<String>,
    #[allow(dead_code)]
    r#type: Option<String>,
    #[allow(dead_code)]
    code: Option<serde_json::Value>,
}
