//! Login and bearer token resolution.

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::services::UserService;
use crate::utils::jwt::{generate_token, validate_token};
use crate::utils::password::verify_password;

const BAD_CREDENTIALS: &str = "Invalid login or password";

#[derive(Clone)]
pub struct AuthService {
    users: UserService,
    jwt: JwtConfig,
}

impl AuthService {
    pub fn new(users: UserService, jwt: JwtConfig) -> Self {
        Self { users, jwt }
    }

    /// Verifies credentials and issues a signed token.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, login: &str, password: &str) -> AppResult<String> {
        let Some(user) = self.users.find_by_email(login).await? else {
            tracing::warn!("Login attempt for unknown email");
            return Err(AppError::unauthorized(BAD_CREDENTIALS));
        };

        if !verify_password(password, &user.password)? {
            tracing::warn!(user_id = user.id, "Login attempt with wrong password");
            return Err(AppError::unauthorized(BAD_CREDENTIALS));
        }

        let token = generate_token(&user, &self.jwt)?;
        tracing::info!(user_id = user.id, "User logged in");
        Ok(token)
    }

    /// Resolves a bearer token to a current user.
    pub async fn authenticate(&self, token: &str) -> AppResult<User> {
        let claims = validate_token(token, &self.jwt)?;

        match self.users.find_by_email(&claims.sub).await? {
            Some(user) if user.id == claims.id => Ok(user),
            _ => Err(AppError::unauthorized("Token subject no longer exists")),
        }
    }
}
