//! Error types for pagesmith.
//!
//! Library crates use [`PagesmithError`] via `thiserror`.
//! The app crate (cli) wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all pagesmith operations.
#[derive(Debug, thiserror::Error)]
pub enum PagesmithError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while talking to a backend (unreachable host,
    /// timeout, non-2xx status).
    #[error("network error: {0}")]
    Network(String),

    /// The backend response parsed but lacks the expected shape,
    /// or is not valid JSON at all.
    #[error("malformed response: {message}")]
    MalformedResponse { message: String },

    /// The configured backend kind matches no registered adapter.
    #[error("unsupported backend kind: {kind}")]
    UnsupportedBackend { kind: String },

    /// HTML sanitizing or rendering error.
    #[error("render error: {0}")]
    Render(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PagesmithError>;

impl PagesmithError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a malformed-response error from any displayable message.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: msg.into(),
        }
    }

    /// Create an unsupported-backend error for the given kind.
    pub fn unsupported_backend(kind: impl Into<String>) -> Self {
        Self::UnsupportedBackend { kind: kind.into() }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether a retry could plausibly succeed.
    ///
    /// Transport failures are transient; a shape mismatch or a
    /// misconfiguration will not heal on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = PagesmithError::config("missing base_url");
        assert_eq!(err.to_string(), "config error: missing base_url");

        let err = PagesmithError::unsupported_backend("contentful");
        assert_eq!(err.to_string(), "unsupported backend kind: contentful");
    }

    #[test]
    fn only_network_errors_are_retryable() {
        assert!(PagesmithError::Network("connection reset".into()).is_retryable());
        assert!(!PagesmithError::malformed("missing data key").is_retryable());
        assert!(!PagesmithError::unsupported_backend("ghost").is_retryable());
    }
}
