//! Error handler for converting AppError to HTTP responses.
//!
//! `AppError` renders itself without request context, stashing the
//! `ErrorResponse` in the response extensions. `error_context_middleware`
//! then completes it with the request path and request ID, and reshapes
//! non-JSON error responses produced by axum itself (404, 405, path
//! rejections) into the same format.

use axum::{
    Json,
    body::{Body, to_bytes},
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::RequestId;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;

/// Largest plain-text error body read back when reshaping a response.
const MAX_ERROR_BODY: usize = 64 * 1024;

/// Maps an AppError variant to its corresponding HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::AlreadyExists { .. } | AppError::NotArchived { .. } => {
            StatusCode::PRECONDITION_FAILED
        }
        AppError::Validation { .. }
        | AppError::ValidationErrors { .. }
        | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        AppError::Database { .. }
        | AppError::Configuration { .. }
        | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Message safe to show to clients. Server-side failures are not described.
fn public_message(error: &AppError) -> String {
    match error {
        AppError::Unauthorized { message } | AppError::BadRequest { message } => message.clone(),
        AppError::Validation { field, reason } => format!("{}: {}", field, reason),
        AppError::ConnectionPool { .. } => "Database connection unavailable".to_string(),
        AppError::Database { .. } | AppError::Configuration { .. } | AppError::Internal { .. } => {
            "An internal error occurred".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = ?self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        if let AppError::ValidationErrors { errors } = self {
            return (status, Json(errors)).into_response();
        }

        let body = ErrorResponse::new(status, public_message(&self));
        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

/// Completes error responses with the request path and request ID.
///
/// Must run inside `request_id_middleware`.
pub async fn error_context_middleware(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let request_id = request.extensions().get::<RequestId>().map(|r| r.0.clone());

    let mut response = next.run(request).await;
    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let stashed = response.extensions_mut().remove::<ErrorResponse>();
    let body = match stashed {
        Some(body) => body,
        None if is_json(&response) => return response,
        None => {
            let (parts, body) = response.into_parts();
            let text = to_bytes(body, MAX_ERROR_BODY)
                .await
                .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string())
                .unwrap_or_default();
            let message = if text.is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                text
            };
            response = Response::from_parts(parts, Body::empty());
            ErrorResponse::new(status, message)
        }
    };

    let mut body = body.with_path(&path);
    if let Some(id) = &request_id {
        body = body.with_request_id(id);
    }

    let (parts, _) = response.into_parts();
    let mut rebuilt = (status, Json(body)).into_response();
    for (name, value) in parts.headers.iter() {
        if name != header::CONTENT_TYPE && name != header::CONTENT_LENGTH {
            rebuilt.headers_mut().append(name.clone(), value.clone());
        }
    }
    rebuilt
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::middleware::request_id_middleware;
    use crate::error::ValidationFieldError;
    use axum::{Router, middleware, routing::get};
    use serde_json::Value;
    use tower::ServiceExt;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn app() -> Router {
        Router::new()
            .route(
                "/accounts/{id}",
                get(|| async { Err::<(), _>(AppError::not_found("Account", 7)) }),
            )
            .route(
                "/invalid",
                get(|| async {
                    Err::<(), _>(AppError::ValidationErrors {
                        errors: vec![ValidationFieldError::new("email", "Email must be a valid address")],
                    })
                }),
            )
            .route(
                "/boom",
                get(|| async {
                    Err::<(), _>(AppError::Internal {
                        source: anyhow::anyhow!("secret connection string"),
                    })
                }),
            )
            .layer(middleware::from_fn(error_context_middleware))
            .layer(middleware::from_fn(request_id_middleware))
    }

    fn get_request(uri: &str) -> Request {
        Request::builder()
            .uri(uri)
            .header("x-request-id", "req-1")
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            error_to_status_code(&AppError::already_exists("User", "email", "a@b.c")),
            StatusCode::PRECONDITION_FAILED
        );
        assert_eq!(
            error_to_status_code(&AppError::NotArchived {
                entity: "account".to_string(),
                id: 1
            }),
            StatusCode::PRECONDITION_FAILED
        );
        assert_eq!(
            error_to_status_code(&AppError::unauthorized("nope")),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            error_to_status_code(&AppError::ConnectionPool {
                source: anyhow::anyhow!("timeout")
            }),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_error_body_carries_path_and_request_id() {
        let response = app().oneshot(get_request("/accounts/7")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert_eq!(json["status"], 404);
        assert_eq!(json["error"], "Not Found");
        assert_eq!(json["message"], "Account not found with id: 7");
        assert_eq!(json["path"], "/accounts/7");
        assert_eq!(json["requestId"], "req-1");
    }

    #[tokio::test]
    async fn test_validation_errors_are_a_bare_array() {
        let response = app().oneshot(get_request("/invalid")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json[0]["field"], "email");
        assert_eq!(json[0]["message"], "Email must be a valid address");
    }

    #[tokio::test]
    async fn test_internal_detail_is_not_leaked() {
        let response = app().oneshot(get_request("/boom")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn test_router_fallback_is_reshaped() {
        let response = app().oneshot(get_request("/missing")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["x-request-id"], "req-1");

        let json = body_json(response).await;
        assert_eq!(json["error"], "Not Found");
        assert_eq!(json["path"], "/missing");
    }
}
