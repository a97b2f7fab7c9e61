//! `completion-agent` — typed client for the external text-completion API.
//!
//! The rest of the workspace treats the provider as a black box: one
//! request/response round trip per user-initiated "generate" action, no
//! streaming, no retries. This crate owns the wire types, the error
//! taxonomy, and the defensive extraction of the response's `text` field
//! (missing or null `text` is a valid, empty generation).
//!
//! ```text
//! CompletionRequest
//!     │
//!     ▼
//! CompletionClient   ← POST <base_url>/v1/completions (reqwest, rustls)
//!     │
//!     ▼
//! CompletionResponse ← { text, model?, usage? }
//! ```

pub mod client;
pub mod error;
pub mod types;

pub use client::CompletionClient;
pub use error::CompletionError;
pub use types::{CompletionRequest, CompletionResponse, Usage};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, CompletionError>;

/// Environment variable holding the provider API key.
pub const API_KEY_ENV: &str = "DEVFLOW_API_KEY";

/// Build a client for `base_url`, picking the API key up from
/// [`API_KEY_ENV`] when set. Keys never live in config files.
pub fn client_from_env(base_url: impl Into<String>) -> CompletionClient {
    let api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
    CompletionClient::new(base_url, api_key)
}
