use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("failed to decode completion response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CompletionError>;
