//! HTTP error responses.

use crate::render::RenderError;
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tictactoe_engine::{GameId, MoveError, RegistryError};
use tracing::{error, warn};

/// Error kinds reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Missing or malformed input.
    Validation,
    /// Unknown game id.
    NotFound,
    /// Occupied square or finished game.
    InvalidMove,
    /// Image generation failed.
    Render,
}

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable description.
    pub error: String,
    /// Error category.
    pub kind: ErrorKind,
}

/// Failure of a single request. Never fatal to the server.
#[derive(Debug, derive_more::Display)]
pub enum ApiError {
    /// Missing fields, malformed body or out-of-range position.
    #[display("{}", _0)]
    Validation(String),
    /// Unknown game.
    #[display("Game {} not found", _0)]
    NotFound(GameId),
    /// Move broke the rules.
    #[display("{}", _0)]
    InvalidMove(MoveError),
    /// Image generation failed.
    #[display("{}", _0)]
    Render(RenderError),
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Category reported to the client.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::InvalidMove(_) => ErrorKind::InvalidMove,
            ApiError::Render(_) => ErrorKind::Render,
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidMove(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(error = %self, status = %status, "Request rejected");
        }
        let body = ErrorBody {
            error: self.to_string(),
            kind: self.kind(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(id) => ApiError::NotFound(id),
        }
    }
}

impl From<MoveError> for ApiError {
    fn from(err: MoveError) -> Self {
        if err.is_validation() {
            ApiError::Validation(err.to_string())
        } else {
            ApiError::InvalidMove(err)
        }
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        ApiError::Render(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(format!("Malformed request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(format!("Malformed query string: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(format!("Malformed game id: {}", rejection.body_text()))
    }
}
