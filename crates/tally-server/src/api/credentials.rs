//! Third-party API credential routes (`/user/api`)

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use tally_core::{
    services::{create_credential, delete_credential, list_credentials, update_credential},
    ApiCredential, CredentialRequest,
};

use super::AuthUser;
use crate::{error::ApiResult, state::AppState};

/// Credential routes
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(list)
            .post(create)
            .put(update)
            .delete(remove),
    )
}

/// One stored credential as returned to its owner
#[derive(Debug, Serialize)]
pub struct CredentialView {
    pub id: i64,
    #[serde(rename = "type")]
    pub api_type: String,
    pub api_id: String,
    pub api_key: String,
}

impl From<ApiCredential> for CredentialView {
    fn from(c: ApiCredential) -> Self {
        Self {
            id: c.id,
            api_type: c.api_type,
            api_id: c.api_id,
            api_key: c.api_key,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateCredentialRequest {
    pub id: i64,
    #[serde(flatten)]
    pub credential: CredentialRequest,
}

#[derive(Debug, Deserialize)]
pub struct DeleteCredentialRequest {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i64,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

async fn list(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<Vec<CredentialView>>> {
    let records = list_credentials(&state.db.pool, auth.user_id()).await?;
    Ok(Json(records.into_iter().map(CredentialView::from).collect()))
}

async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CredentialRequest>,
) -> ApiResult<Json<CreatedResponse>> {
    let id = create_credential(&state.db.pool, auth.user_id(), &req).await?;
    log::info!("Stored {} credential {} for user {}", req.api_type, id, auth.user_id());
    Ok(Json(CreatedResponse {
        id,
        message: "API record created successfully".to_string(),
    }))
}

async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateCredentialRequest>,
) -> ApiResult<Json<MessageResponse>> {
    update_credential(&state.db.pool, auth.user_id(), req.id, &req.credential).await?;
    Ok(Json(MessageResponse {
        message: "API record updated successfully".to_string(),
    }))
}

async fn remove(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<DeleteCredentialRequest>,
) -> ApiResult<Json<MessageResponse>> {
    delete_credential(&state.db.pool, auth.user_id(), req.id).await?;
    Ok(Json(MessageResponse {
        message: "API record deleted successfully".to_string(),
    }))
}
