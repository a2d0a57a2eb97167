//! Auth business logic
//!
//! Register and login, written against `UserRepository` so they can be
//! tested without a database.

use uuid::Uuid;

use super::repository::{username_taken, UserRepository};
use super::types::{LoginRequest, LoginResponse, NewUser, RegisterRequest, RegisterResponse};
use super::{create_token, hash_password, verify_password};
use crate::error::{Error, Result};

/// Register a new user
pub async fn register_user<R: UserRepository>(
    repo: &R,
    request: RegisterRequest,
) -> Result<RegisterResponse> {
    let username = request.username.trim().to_string();
    if username.is_empty() || request.password.is_empty() {
        return Err(Error::validation("Username and password are required"));
    }

    if repo.username_exists(&username).await? {
        return Err(Error::conflict(username_taken(&username)));
    }

    let password_hash = hash_password(&request.password)?;
    let email = request.email.filter(|e| !e.trim().is_empty());

    let user = repo
        .create_user(NewUser {
            id: Uuid::new_v4().to_string(),
            username,
            email,
            password_hash,
        })
        .await?;

    log::info!("Registered user {}", user.username);

    Ok(RegisterResponse {
        status: "success".to_string(),
        message: "Registration successful".to_string(),
    })
}

/// Verify credentials and issue a token
pub async fn login_user<R: UserRepository>(
    repo: &R,
    request: LoginRequest,
    secret: &[u8],
) -> Result<LoginResponse> {
    let user = repo
        .find_by_username(request.username.trim())
        .await?
        .ok_or_else(|| Error::auth("Invalid username or password"))?;

    if !verify_password(&request.password, &user.password_hash)? {
        return Err(Error::auth("Invalid username or password"));
    }

    let token = create_token(&user, secret)?;

    Ok(LoginResponse {
        status: "success".to_string(),
        message: "Login successful".to_string(),
        user_id: user.id,
        token,
    })
}
