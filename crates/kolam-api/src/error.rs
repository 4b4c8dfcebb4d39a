use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use kolam_codec::DecodeFailure;
use kolam_db::StoreError;
use kolam_types::api::ErrorResponse;

/// Every failure a service call or handler can report. All of them end up as
/// a JSON `{ "error": ... }` body; none of them stop the server.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("username already exists: {0}")]
    DuplicateUsername(String),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("login required")]
    Unauthorized,

    #[error("artwork {0} not found")]
    ArtworkNotFound(i64),

    #[error("user {0} not found")]
    UnknownOwner(i64),

    #[error("storage unavailable")]
    StorageUnavailable(#[source] StoreError),

    #[error("image not available: {0}")]
    DecodeFailure(#[from] DecodeFailure),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error")]
    Internal,
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername(name) => AppError::DuplicateUsername(name),
            StoreError::UnknownOwner(id) => AppError::UnknownOwner(id),
            StoreError::ArtworkNotFound(id) => AppError::ArtworkNotFound(id),
            other => AppError::StorageUnavailable(other),
        }
    }
}

// Extractor rejections become 400s with the JSON error body.

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::DuplicateUsername(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::ArtworkNotFound(_) | AppError::UnknownOwner(_) => StatusCode::NOT_FOUND,
            AppError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::DecodeFailure(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::StorageUnavailable(source) => error!("storage failure: {}", source),
            AppError::DecodeFailure(source) => warn!("image decode failure: {}", source),
            _ => {}
        }

        let status = self.status();
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

/// Run a blocking store call off the async runtime.
pub(crate) async fn blocking<F, T>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        AppError::Internal
    })?
}
