use thiserror::Error;

/// Failures inside a single strategy attempt. Never returned from the
/// orchestrator: every variant is folded into a [`crate::MissReason`].
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("empty response body from {url}")]
    EmptyBody { url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },
}
