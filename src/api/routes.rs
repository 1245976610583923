//! Router configuration for the API.
//!
//! This module provides centralized route registration and middleware
//! configuration for the application.

use axum::{Router, middleware};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{
    auth_middleware, error_context_middleware, logging_middleware, request_id_middleware,
};
use crate::state::AppState;

pub const SWAGGER_UI_PATH: &str = "/swagger-ui";
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. Request ID middleware - generates/propagates request IDs
/// 2. Logging middleware - logs requests with request IDs
/// 3. Error context middleware - completes error bodies with path and request ID
/// 4. Auth middleware, on protected routes only
///
/// # Routes
/// - `/api/auth` and `POST /api/users/me` are public
/// - everything else under `/api/users/me` requires a bearer token
pub fn create_router(state: AppState, api_docs: bool) -> Router {
    let (public, mut doc) = public_routes().split_for_parts();
    let (protected, protected_doc) = protected_routes().split_for_parts();
    let protected =
        protected.route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let mut router = public.merge(protected);
    if api_docs {
        doc.merge(protected_doc);
        router = router.merge(SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, doc));
    }

    router
        // Middleware is applied in reverse order - last added runs first
        .layer(middleware::from_fn(error_context_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// The assembled OpenAPI document, as served at [`OPENAPI_JSON_PATH`].
pub fn openapi() -> utoipa::openapi::OpenApi {
    let (_, mut doc) = public_routes().split_for_parts();
    let (_, protected_doc) = protected_routes().split_for_parts();
    doc.merge(protected_doc);
    doc
}

fn public_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api/auth", handlers::auth::auth_routes())
        .nest("/api/users/me", handlers::users::registration_routes())
}

fn protected_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/api/users/me", handlers::users::me_routes())
        .nest("/api/users/me/accounts", handlers::accounts::account_routes())
        .nest("/api/users/me/categories", handlers::categories::category_routes())
        .nest("/api/users/me/credit-cards", handlers::credit_cards::credit_card_routes())
}
