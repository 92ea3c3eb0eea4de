//! Error types for roster operations.
//!
//! Errors are categorized so the caller can tell a flaky network from a
//! broken snapshot and give the right advice.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias for roster operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of roster errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Network-related errors (transient, retryable).
    Network,
    /// Rejected credentials or missing scopes.
    Auth,
    /// Snapshot or cache storage failures.
    Storage,
    /// Unparseable payloads or stored content.
    Format,
    /// Missing or invalid configuration, including an empty roster.
    Config,
    /// Other/unknown errors.
    Other,
}

impl ErrorCategory {
    /// Whether this error category is typically transient and worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network)
    }

    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network connectivity issue",
            Self::Auth => "Authentication failed",
            Self::Storage => "Storage failure",
            Self::Format => "Invalid data format",
            Self::Config => "Configuration problem",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check connectivity to Teamkatalog and Slack and run again",
            Self::Auth => "Verify the API tokens and their scopes",
            Self::Storage => "Check the snapshot location and its permissions",
            Self::Format => {
                "Inspect the stored snapshot; delete it to start over from the current roster"
            }
            Self::Config => "Check the role name and channel settings",
            Self::Other => "Check the error details for more information",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while syncing a roster.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP request failed: {message}")]
    HttpError {
        /// Error message.
        message: String,
        /// HTTP status code if available.
        status: Option<u16>,
    },

    /// A service answered, but reported a failure in its payload.
    #[error("{service} API error: {message}")]
    Api {
        /// Service name ("slack", "teamkatalog").
        service: &'static str,
        /// Error code or message returned by the service.
        message: String,
    },

    /// Invalid response from an API.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),

    /// The persisted snapshot could not be parsed.
    #[error("snapshot {key} is corrupt: {source}")]
    CorruptSnapshot {
        /// Blob key of the snapshot.
        key: String,
        /// Parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The cached chat user list could not be parsed.
    #[error("user cache {key} is corrupt: {source}")]
    CorruptCache {
        /// Blob key of the cache.
        key: String,
        /// Parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The directory returned nobody holding the role.
    #[error("no members found with role {role}")]
    EmptyRoster {
        /// Role that was queried.
        role: String,
    },

    /// Blob key rejected by the store.
    #[error("invalid blob key: {0}")]
    InvalidKey(String),

    /// Blob missing from the store.
    #[error("blob not found: {0}")]
    BlobNotFound(String),

    /// IO error during file operations.
    #[error("IO error at {path}: {source}")]
    Io {
        /// Path involved in the error.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Generic error.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an IO error with path context.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an HTTP error.
    pub fn http(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::HttpError {
            message: message.into(),
            status,
        }
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::HttpError {
                status: Some(401 | 403),
                ..
            } => ErrorCategory::Auth,
            Error::HttpError { .. } => ErrorCategory::Network,
            Error::Api { message, .. } => {
                if matches!(
                    message.as_str(),
                    "invalid_auth" | "not_authed" | "token_revoked" | "missing_scope"
                ) {
                    ErrorCategory::Auth
                } else {
                    ErrorCategory::Other
                }
            }
            Error::InvalidResponse(_) => ErrorCategory::Format,
            Error::CorruptSnapshot { .. } | Error::CorruptCache { .. } => ErrorCategory::Format,
            Error::EmptyRoster { .. } => ErrorCategory::Config,
            Error::InvalidKey(_) => ErrorCategory::Config,
            Error::BlobNotFound(_) | Error::Io { .. } => ErrorCategory::Storage,
            Error::Other(_) => ErrorCategory::Other,
        }
    }

    /// Whether this error is typically transient and worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::HttpError {
                message: format!("HTTP {}", code),
                status: Some(code),
            },
            other => Self::HttpError {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
