use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::auth::{AppState, session_from_token};
use crate::error::AppError;

/// Extract and validate the session token from the Authorization header and
/// attach the resulting `Session` to the request.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)?;

    let session = session_from_token(&state.jwt_secret, token)?;

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}
