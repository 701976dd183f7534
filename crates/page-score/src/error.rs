use score_common::error::CommonError;

/// Page-level failures that cross the core boundary. Factor-query failures and
/// corrupt cache entries are absorbed at their call sites (default-score
/// substitution and miss-on-corrupt) and never appear here.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("page not found: {0}")]
    PageNotFound(String),

    #[error("page has no content: {0}")]
    NoContent(String),

    #[error("score generation failed: {0}")]
    GenerationFailed(String),

    #[error("content source error: {0}")]
    Content(String),

    #[error("config error: {0}")]
    Config(String),
}
