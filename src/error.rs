use std::fmt;

use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;
use tracing::debug;
use validator::ValidationErrors;

use crate::{
    dao::storage::StorageError,
    dto::response::{StatusResponse, validation_message},
};

/// Message returned when a title collides with an existing game.
pub const ALREADY_EXISTS_MESSAGE: &str = "game title already exists";
/// Message returned when a request body or query string cannot be decoded.
pub const DECODE_FAILURE_MESSAGE: &str = "failed to decode request";

/// The three storage-backed operations exposed over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOperation {
    /// `POST /game`.
    Save,
    /// `DELETE /game`.
    Delete,
    /// `GET /game`.
    GetScore,
}

impl GameOperation {
    /// Stable name used as the `op` field in logs.
    pub fn name(self) -> &'static str {
        match self {
            GameOperation::Save => "save_game",
            GameOperation::Delete => "delete_game",
            GameOperation::GetScore => "get_game_score",
        }
    }

    /// Generic message surfaced to clients when the operation fails in storage.
    pub fn failure_message(self) -> &'static str {
        match self {
            GameOperation::Save => "failed to add game",
            GameOperation::Delete => "failed to delete game",
            GameOperation::GetScore => "failed to get game score",
        }
    }
}

impl fmt::Display for GameOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Request fields violate their declared rules.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// Storage rejected the arguments before running a statement.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Conflict sentinel raised when a title is already taken.
    #[error("{operation}: game title already exists")]
    AlreadyExists {
        /// Operation that failed.
        operation: GameOperation,
        /// Storage error that was classified.
        #[source]
        source: StorageError,
    },
    /// No game matched the requested title.
    #[error("{operation}: game not found")]
    NotFound {
        /// Operation that failed.
        operation: GameOperation,
        /// Storage error that was classified.
        #[source]
        source: StorageError,
    },
    /// Any other storage failure.
    #[error("{operation}: storage failure")]
    Storage {
        /// Operation that failed.
        operation: GameOperation,
        /// Storage error that was classified.
        #[source]
        source: StorageError,
    },
}

impl ServiceError {
    /// Classify a storage failure raised while running `operation`.
    pub fn storage(operation: GameOperation, source: StorageError) -> Self {
        match source {
            StorageError::InvalidInput(message) => ServiceError::InvalidInput(message),
            source @ StorageError::AlreadyExists { .. } => {
                ServiceError::AlreadyExists { operation, source }
            }
            source @ StorageError::NotFound { .. } => ServiceError::NotFound { operation, source },
            source => ServiceError::Storage { operation, source },
        }
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Body or query string could not be decoded.
    #[error("failed to decode request")]
    Decode {
        /// Extractor rejection, logged but never sent to the client.
        detail: String,
    },
    /// One or more request fields failed validation.
    #[error("{}", validation_message(.0))]
    Validation(ValidationErrors),
    /// Bad request with invalid input.
    #[error("{0}")]
    BadRequest(String),
    /// Requested resource not found.
    #[error("{0}")]
    NotFound(String),
    /// Conflict with current state.
    #[error("{0}")]
    Conflict(String),
    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Wrap an extractor rejection as a decode failure.
    pub fn decode(detail: impl fmt::Display) -> Self {
        AppError::Decode {
            detail: detail.to_string(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Decode { .. } | AppError::Validation(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => AppError::Validation(errors),
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::AlreadyExists { .. } => AppError::Conflict(ALREADY_EXISTS_MESSAGE.into()),
            ServiceError::NotFound { operation, .. } => {
                AppError::NotFound(operation.failure_message().into())
            }
            ServiceError::Storage { operation, .. } => {
                AppError::Internal(operation.failure_message().into())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        if let AppError::Decode { detail } = &self {
            debug!(%detail, "rejecting undecodable request");
        }
        let payload = match &self {
            AppError::Validation(errors) => Json(StatusResponse::validation_error(errors)),
            _ => Json(StatusResponse::error(self.to_string())),
        };
        (self.status(), payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_are_classified_by_kind() {
        let not_found = ServiceError::storage(
            GameOperation::Delete,
            StorageError::NotFound {
                title: "Chess".into(),
            },
        );
        assert!(matches!(
            AppError::from(not_found),
            AppError::NotFound(message) if message == "failed to delete game"
        ));

        let conflict = ServiceError::storage(
            GameOperation::Save,
            StorageError::AlreadyExists {
                title: "Chess".into(),
            },
        );
        assert!(matches!(
            AppError::from(conflict),
            AppError::Conflict(message) if message == ALREADY_EXISTS_MESSAGE
        ));

        let other = ServiceError::storage(
            GameOperation::GetScore,
            StorageError::unavailable("boom".into(), std::io::Error::other("boom")),
        );
        assert!(matches!(
            AppError::from(other),
            AppError::Internal(message) if message == "failed to get game score"
        ));
    }

    #[test]
    fn status_codes_follow_error_class() {
        assert_eq!(
            AppError::decode("eof").into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("x".into()).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Internal("x".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
