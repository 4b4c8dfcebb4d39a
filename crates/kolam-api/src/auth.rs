use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::error;

use kolam_db::Database;
use kolam_types::api::{Claims, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use kolam_types::models::Session;

use crate::accounts::AccountService;
use crate::error::{AppError, blocking};
use crate::gallery::GalleryService;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub accounts: AccountService,
    pub gallery: GalleryService,
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
}

impl AppStateInner {
    pub fn new(db: Arc<Database>, jwt_secret: String, token_ttl: chrono::Duration) -> AppState {
        Arc::new(Self {
            accounts: AccountService::new(db.clone()),
            gallery: GalleryService::new(db),
            jwt_secret,
            token_ttl,
        })
    }
}

pub async fn register(
    State(state): State<AppState>,
    req: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = req?;
    let accounts = state.accounts.clone();
    let user_id =
        blocking(move || accounts.create_account(&req.username, &req.password)).await?;

    Ok((StatusCode::CREATED, Json(RegisterResponse { user_id })))
}

pub async fn login(
    State(state): State<AppState>,
    req: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = req?;
    let accounts = state.accounts.clone();
    let session = blocking(move || accounts.login(&req.username, &req.password)).await?;

    let token = create_token(&state.jwt_secret, &session, state.token_ttl)?;

    Ok(Json(LoginResponse {
        user_id: session.user_id,
        username: session.username,
        token,
    }))
}

/// Sign a session token for `session`.
pub fn create_token(
    secret: &str,
    session: &Session,
    ttl: chrono::Duration,
) -> Result<String, AppError> {
    let claims = Claims {
        sub: session.user_id.to_string(),
        username: session.username.clone(),
        exp: (chrono::Utc::now() + ttl).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        error!("token signing failed: {}", e);
        AppError::Internal
    })
}

/// Validate a session token and recover the session it was issued for.
pub fn session_from_token(secret: &str, token: &str) -> Result<Session, AppError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized)?;

    let user_id = data.claims.sub.parse().map_err(|_| AppError::Unauthorized)?;

    Ok(Session {
        user_id,
        username: data.claims.username,
    })
}
