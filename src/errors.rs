use axum::http::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Why a document could not be loaded. Every variant means the same thing to
/// callers: the dataset is unavailable and the page shows its placeholder.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{0} not found")]
    Missing(String),

    #[error("failed to read {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("request for {name} failed: {source}")]
    Http {
        name: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{name} answered HTTP {status}")]
    Status { name: String, status: u16 },

    #[error("{name} is not valid JSON: {source}")]
    Json {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} is empty")]
    Empty(String),

    #[error("{name} timed out after {elapsed:?}")]
    Timeout { name: String, elapsed: Duration },
}

impl LoadError {
    /// Absence is expected for per-year documents and is not worth a warning.
    pub fn is_missing(&self) -> bool {
        matches!(self, LoadError::Missing(_))
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<crate::query::InvalidYear> for AppError {
    fn from(err: crate::query::InvalidYear) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_errors_name_the_document() {
        assert_eq!(LoadError::Empty("stats.json".into()).to_string(), "stats.json is empty");
        assert_eq!(LoadError::Missing("lider.json".into()).to_string(), "lider.json not found");
        assert!(LoadError::Missing("lider.json".into()).is_missing());
        assert!(!LoadError::Empty("stats.json".into()).is_missing());
    }
}
