//! Auth API routes

use axum::{
    extract::{FromRequestParts, State},
    http::{header, request::Parts},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tally_core::{
    auth::{
        bearer_token, login_user, register_user, verify_token, LoginRequest, LoginResponse,
        RegisterRequest, RegisterResponse, SqliteUserRepository, UserRepository,
    },
    Claims, Error, UserResponse,
};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Auth routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/user/me", get(me))
}

/// Claims of the bearer token on the request
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> &str {
        &self.0.sub
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| Error::auth("Token is missing"))?;

        let token = bearer_token(header_value).ok_or_else(|| Error::auth("Token is invalid"))?;
        let claims = verify_token(token, state.jwt_secret()).map_err(Error::from)?;

        Ok(AuthUser(claims))
    }
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub status: String,
    pub message: String,
}

/// Register a new user
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<RegisterResponse>> {
    let repo = SqliteUserRepository::new(&state.db.pool);
    let response = register_user(&repo, req).await?;
    Ok(Json(response))
}

/// Login and get token
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let repo = SqliteUserRepository::new(&state.db.pool);
    let response = login_user(&repo, req, state.jwt_secret()).await?;
    log::info!("User {} logged in", response.user_id);
    Ok(Json(response))
}

/// Tokens are stateless; logout only checks the caller is authenticated
async fn logout(auth: AuthUser) -> Json<LogoutResponse> {
    log::info!("User {} logged out", auth.user_id());
    Json(LogoutResponse {
        status: "success".to_string(),
        message: "Logged out successfully".to_string(),
    })
}

/// Profile of the authenticated user
async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<UserResponse>> {
    let repo = SqliteUserRepository::new(&state.db.pool);
    let user = repo
        .find_by_id(auth.user_id())
        .await?
        .ok_or_else(|| Error::not_found("User not found"))?;
    Ok(Json(UserResponse::from(user)))
}
