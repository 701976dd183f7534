/// Error types shared across the scoring service crates.
///
/// These errors represent failures in infrastructure components (Redis, the chat
/// completion service) that the server crate wraps via `#[from]`. Per-factor query
/// failures never travel through here — they are absorbed at the call site with a
/// default-score substitution.

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("redis unavailable, degrading gracefully")]
    RedisUnavailable,

    #[error("chat service error: {0}")]
    Chat(#[from] crate::chat::ChatClientError),
}
