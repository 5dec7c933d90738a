use thiserror::Error;

/// Failures while constructing a client. Requests themselves never fail with
/// this type; they resolve to an `ActionOutcome`.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid base url {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to build http client: {0}")]
    Build(#[from] reqwest::Error),
}
