//! Error type shared by every Slack operation.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single send or upload operation.
#[derive(Debug, Error)]
pub enum SendError {
    /// The client was built without a token.
    #[error("slack client is not ready")]
    NotReady,

    /// A local file or directory could not be read.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Slack answered but rejected the call.
    #[error("{method} failed: {error}")]
    Api { method: String, error: String },

    /// The request never completed.
    #[error("failed to send HTTP request: {0}")]
    Http(#[from] reqwest::Error),

    /// A request payload could not be encoded.
    #[error("failed to encode payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl SendError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn api(method: &str, error: impl Into<String>) -> Self {
        Self::Api {
            method: method.to_string(),
            error: error.into(),
        }
    }

    /// Whether this error means the client had no token.
    #[must_use]
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady)
    }
}
