// Error types for the HFS query layer.
// Covers transport failures, envelope failures, and URL resolution errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HfsError {
    #[error("HFS request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("HTTP {status} from {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    /// The backend answered with `ok: false`. Holds `errMsg` or the
    /// operation's fallback message.
    #[error("{0}")]
    Envelope(String),

    #[error("Unresolved placeholder ${{{placeholder}}} in {endpoint} URL")]
    UnresolvedPlaceholder {
        endpoint: &'static str,
        placeholder: String,
    },

    #[error("Malformed URL template for {endpoint}")]
    MalformedTemplate { endpoint: &'static str },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing HFS_TOKEN environment variable")]
    MissingToken,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, HfsError>;
