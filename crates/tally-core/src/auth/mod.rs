//! Authentication module - JWT tokens, password hashing and user accounts
//!
//! ## Structure
//! - `types.rs` - Request/response data types
//! - `repository.rs` - UserRepository trait and SQLite implementation
//! - `service.rs` - Register/login logic, independent of the HTTP layer

pub mod repository;
pub mod service;
pub mod types;


use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::error::{Error, Result};
use crate::models::{Claims, User};

pub use repository::{SqliteUserRepository, UserRepository};
pub use service::{login_user, register_user};
pub use types::{LoginRequest, LoginResponse, NewUser, RegisterRequest, RegisterResponse};

pub const TOKEN_EXPIRY_HOURS: i64 = 24;

const MIN_SECRET_LEN: usize = 32;

/// Check a configured JWT secret before the server starts using it
pub fn validate_jwt_secret(secret: &str) -> Result<()> {
    if secret.is_empty() {
        return Err(Error::config("TALLY_JWT_SECRET must be set"));
    }
    if secret.len() < MIN_SECRET_LEN {
        log::warn!(
            "TALLY_JWT_SECRET is shorter than {} characters. Consider using a longer secret.",
            MIN_SECRET_LEN
        );
    }
    Ok(())
}

/// Create a JWT token for a user
pub fn create_token(user: &User, secret: &[u8]) -> std::result::Result<String, jsonwebtoken::errors::Error> {
    let expiration = (Utc::now() + Duration::hours(TOKEN_EXPIRY_HOURS)).timestamp();

    let claims = Claims {
        sub: user.id.clone(),
        username: user.username.clone(),
        exp: expiration,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
}

/// Verify and decode a JWT token
pub fn verify_token(token: &str, secret: &[u8]) -> std::result::Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let mut parts = header_value.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("bearer") => Some(token),
        _ => None,
    }
}

/// Hash a password
pub fn hash_password(password: &str) -> std::result::Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> std::result::Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(password, hash)
}
