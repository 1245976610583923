//! Authentication-related Data Transfer Objects

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::utils::validate::not_blank;

/// Login request payload
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    /// Email of the account holder
    #[validate(custom(function = "not_blank", message = "Login is required"))]
    #[schema(example = "user@example.com")]
    pub login: String,
    /// Plain text password
    #[validate(custom(function = "not_blank", message = "Password is required"))]
    #[schema(example = "password123", format = "password")]
    pub password: String,
}

/// Signed bearer token returned on successful login
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub token: String,
}
