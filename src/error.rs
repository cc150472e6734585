use std::path::PathBuf;
use thiserror::Error;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Pricing catalog missing or invalid. Fatal: no report is possible without prices.
    #[error("Malformed pricing catalog: {0}")]
    MalformedCatalog(String),

    /// Invalid runtime settings (missing event path, repository, token, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system error with the offending path
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// GitHub event payload could not be used
    #[error("Event error: {0}")]
    Event(String),

    /// Non-success response from the GitHub REST API
    #[error("GitHub API error ({status}): {message}")]
    Github { status: u16, message: String },

    /// HTTP transport error (connect, timeout, body decode)
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error should abort the whole run.
    ///
    /// Only catalog and settings problems are fatal; everything downstream of
    /// them narrows the report instead.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MalformedCatalog(_) | Self::Config(_) | Self::Event(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = AppError::MalformedCatalog("missing field `models`".to_string());
        assert_eq!(
            error.to_string(),
            "Malformed pricing catalog: missing field `models`"
        );

        let error = AppError::Github {
            status: 403,
            message: "Resource not accessible by integration".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "GitHub API error (403): Resource not accessible by integration"
        );
    }

    #[test]
    fn test_io_error_includes_path() {
        let error = AppError::io(
            "/tmp/usage.jsonl",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert!(error.to_string().contains("/tmp/usage.jsonl"));
    }

    #[test]
    fn test_fatal_classification() {
        assert!(AppError::MalformedCatalog("x".to_string()).is_fatal());
        assert!(AppError::Config("x".to_string()).is_fatal());
        assert!(!AppError::Github {
            status: 500,
            message: "x".to_string()
        }
        .is_fatal());
    }
}
