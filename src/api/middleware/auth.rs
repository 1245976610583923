//! Bearer token authentication middleware.
//!
//! Resolves `Authorization: Bearer <token>` to a current user and exposes it to
//! handlers as `Extension<AuthUser>`.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use serde::Serialize;

use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;

/// The authenticated principal for the current request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// Extracts the token part of an `Authorization` header value.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// JWT authentication middleware
///
/// # Errors
/// Returns 401 Unauthorized if:
/// - Authorization header is missing or not a bearer credential
/// - Token signature, issuer or expiry is invalid
/// - The token subject no longer exists
///
/// # Example
/// ```ignore
/// Router::new()
///     .route("/protected", get(handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
/// ```
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

    let token = bearer_token(header_value).ok_or_else(|| {
        AppError::unauthorized("Invalid authorization header format. Expected: Bearer <token>")
    })?;

    let user = state.services.auth.authenticate(token).await?;
    tracing::debug!(user_id = user.id, "Request authenticated");
    request.extensions_mut().insert(AuthUser::from(user));

    Ok(next.run(request).await)
}
