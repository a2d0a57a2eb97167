//! Auth request/response types

use serde::{Deserialize, Serialize};

/// Request for user registration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub email: Option<String>,
}

/// Request for user login
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RegisterResponse {
    pub status: String,
    pub message: String,
}

/// Successful login, carrying the bearer token
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LoginResponse {
    pub status: String,
    pub message: String,
    pub user_id: String,
    pub token: String,
}

/// Data for creating a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
}
