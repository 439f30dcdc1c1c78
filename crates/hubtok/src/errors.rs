//! # Error Types

/// Errors from hubtok operations.
#[derive(Debug, thiserror::Error)]
pub enum HubtokError {
    /// The model identifier is not a valid hub repository id.
    #[error("invalid model id {id:?}: {reason}")]
    InvalidModelId {
        /// The rejected identifier.
        id: String,

        /// Why it was rejected.
        reason: &'static str,
    },

    /// The revision is not usable.
    #[error("invalid revision {revision:?}: {reason}")]
    InvalidRevision {
        /// The rejected revision.
        revision: String,

        /// Why it was rejected.
        reason: &'static str,
    },

    /// The repository has no tokenizer artifacts at this revision.
    #[error("no tokenizer files found for {model}@{revision}")]
    EmptyBundle {
        /// The model id.
        model: String,

        /// The revision.
        revision: String,
    },

    /// A required artifact is not present.
    #[error("missing artifact: {0}")]
    MissingArtifact(String),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from the `tokenizers` crate.
    #[error("tokenizer: {0}")]
    Tokenizer(String),

    /// Error from the download cache.
    #[error("download: {0}")]
    Download(String),
}

impl From<tokenizers::Error> for HubtokError {
    fn from(error: tokenizers::Error) -> Self {
        HubtokError::Tokenizer(error.to_string())
    }
}

impl From<anyhow::Error> for HubtokError {
    fn from(error: anyhow::Error) -> Self {
        HubtokError::Download(format!("{error:#}"))
    }
}

/// Result type for hubtok operations.
pub type HubtokResult<T> = core::result::Result<T, HubtokError>;
