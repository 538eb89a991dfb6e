use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

use crate::category::ResolutionMode;

/// Failure while talking to the remote platform.
///
/// Kept apart from [`GnossApiError`] so callers can tell infrastructure
/// failures from caller-input errors without matching on messages.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP {status} from {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Request to {url} failed: {message}")]
    Connection { url: String, message: String },

    #[error("Malformed response body from {url}: {message}")]
    MalformedBody { url: String, message: String },
}

impl TransportError {
    /// HTTP status code, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum GnossApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Community not found: {scope}")]
    ScopeNotFound { scope: String },

    #[error(
        "Some of the introduced categories do not belong to the thesaurus ({mode} resolution): \
         {unresolved:?}. Most likely they do not exist in the community thesaurus"
    )]
    CategoryResolution {
        mode: ResolutionMode,
        unresolved: Vec<String>,
    },

    #[error("Could not acquire lock on resource {resource_id}")]
    LockNotAcquired { resource_id: Uuid },

    #[error("Missing OAuth credential: {field}")]
    MissingCredentials { field: &'static str },

    #[error("Invalid API base URL: {url}")]
    InvalidBaseUrl { url: String },

    #[error("Invalid resource: {reason}")]
    InvalidResource { reason: String },

    #[error("{failed} of {total} items failed")]
    BulkIncomplete { failed: usize, total: usize },

    #[error("Massive load error: {message}")]
    MassiveLoad { message: String },

    #[error("Failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Unknown config key: {key}")]
    ConfigKeyNotFound { key: String },

    #[error("Invalid value for {key}: '{value}'")]
    InvalidConfigValue { key: String, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, GnossApiError>;

impl GnossApiError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ScopeNotFound { .. } => 2,
            Self::CategoryResolution { .. } => 3,
            Self::Transport(_) => 4,
            Self::LockNotAcquired { .. } => 5,
            Self::MissingCredentials { .. }
            | Self::InvalidBaseUrl { .. }
            | Self::ConfigParse { .. }
            | Self::ConfigKeyNotFound { .. }
            | Self::InvalidConfigValue { .. } => 6,
            _ => 1,
        }
    }

    /// Whether repeating the same call may succeed.
    ///
    /// Only infrastructure failures qualify; 4xx answers and bad category
    /// text will fail the same way every time. A malformed body came with a
    /// 2xx status, so the platform already applied the call.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(TransportError::Status { status, .. }) => *status >= 500,
            Self::Transport(TransportError::Connection { .. }) => true,
            Self::Transport(TransportError::MalformedBody { .. }) => false,
            _ => false,
        }
    }
}
