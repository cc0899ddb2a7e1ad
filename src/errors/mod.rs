//! Unified error handling module
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failures raised by the storage accessor
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StorageError {
    #[error("Read error: {0}")]
    Read(String),

    #[error("Write error: {0}")]
    Write(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

/// Failures raised by the query engine
#[derive(Debug, Error)]
pub enum QueryError {
    /// Caller-supplied parameter failed a precondition; storage is never hit
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{message}")]
    StorageOperationFailure {
        message: String,
        #[source]
        source: StorageError,
    },
}

impl QueryError {
    pub fn invalid(message: impl Into<String>) -> Self {
        QueryError::InvalidArgument(message.into())
    }

    pub fn storage(message: impl Into<String>, source: StorageError) -> Self {
        QueryError::StorageOperationFailure {
            message: message.into(),
            source,
        }
    }
}

pub type QueryResult<T> = Result<T, QueryError>;

/// Failures talking to the SpaceX API
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("External API error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External API returned {status} for {url}")]
    Status { status: u16, url: String },
}

/// Failures of the ingest job
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Failed to fetch launches: {0}")]
    Fetch(#[from] ClientError),

    #[error("Failed to store launches: {0}")]
    Storage(#[from] StorageError),
}

/// Unified error response format
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// Errors surfaced at the HTTP boundary
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Query(QueryError::InvalidArgument(msg)) => {
                (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT", msg.clone())
            }
            ApiError::Query(QueryError::StorageOperationFailure { message, source }) => {
                tracing::error!(error = %source, "{}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "Launch storage is unavailable".to_string(),
                )
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
        };

        let error_response = ErrorResponse {
            ok: false,
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(error_response)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        assert_eq!(
            StorageError::Read("timeout".to_string()).to_string(),
            "Read error: timeout"
        );
        assert_eq!(
            StorageError::Decode("missing launch_id".to_string()).to_string(),
            "Decode error: missing launch_id"
        );
    }

    #[test]
    fn test_storage_failure_keeps_cause() {
        let err = QueryError::storage(
            "Error retrieving all launches",
            StorageError::Read("connection reset".to_string()),
        );
        assert_eq!(err.to_string(), "Error retrieving all launches");
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "Read error: connection reset");
    }

    #[test]
    fn test_invalid_argument_maps_to_bad_request() {
        let response = ApiError::from(QueryError::invalid("Status cannot be null or empty"))
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_storage_failure_maps_to_server_error() {
        let response = ApiError::from(QueryError::storage(
            "Error retrieving all launches",
            StorageError::Read("boom".to_string()),
        ))
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = ApiError::NotFound("launch abc".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
