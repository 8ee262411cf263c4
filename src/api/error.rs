//! API client error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure (connect, timeout, TLS, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Missing or expired bearer token
    #[error("authentication required")]
    Unauthorized,

    #[error("permission denied: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Backend refused the request; message is passed through verbatim
    #[error("{0}")]
    Rejected(String),

    #[error("server error: {0}")]
    Server(String),

    /// Body did not match the expected shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Http(_) => "http",
            ApiError::Unauthorized => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Rejected(_) => "rejected",
            ApiError::Server(_) => "server",
            ApiError::InvalidResponse(_) => "invalid_response",
            ApiError::Serialization(_) => "serialization",
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
