//! Category endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::CATEGORY_TAG;
use crate::api::dto::{
    CategoryRequest, CategoryResponse, ErrorResponse, PagedResponse, PaginationParams,
};
use crate::api::middleware::AuthUser;
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};

pub fn category_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_categories, create_category))
        .routes(routes!(get_category, update_category, delete_category))
}

#[utoipa::path(
    get,
    path = "/",
    tag = CATEGORY_TAG,
    params(PaginationParams),
    responses(
        (status = 200, description = "Caller's categories ordered by id", body = PagedResponse<CategoryResponse>),
        (status = 400, description = "Invalid pagination parameters")
    ),
    security(("bearerAuth" = []))
)]
async fn list_categories(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedQuery(params): ValidatedQuery<PaginationParams>,
) -> AppResult<Json<PagedResponse<CategoryResponse>>> {
    let (categories, total) = state
        .services
        .categories
        .list_categories(auth_user.user_id, params.offset(), params.limit())
        .await?;

    let page = PagedResponse::new(categories, &params, total as u64).map(CategoryResponse::from);
    Ok(Json(page))
}

#[utoipa::path(
    post,
    path = "/",
    tag = CATEGORY_TAG,
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Invalid request data"),
        (status = 412, description = "Category name already in use", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn create_category(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<CategoryRequest>,
) -> AppResult<(StatusCode, Json<CategoryResponse>)> {
    let category = state
        .services
        .categories
        .create_category(payload.into_new_category(auth_user.user_id))
        .await?;
    Ok((StatusCode::CREATED, Json(CategoryResponse::from(category))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = CATEGORY_TAG,
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category found", body = CategoryResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn get_category(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<CategoryResponse>> {
    let category = state.services.categories.get_category(auth_user.user_id, id).await?;
    Ok(Json(CategoryResponse::from(category)))
}

/// PUT replaces the whole category; omitted `color`/`icon` are cleared.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = CATEGORY_TAG,
    params(("id" = i64, Path, description = "Category id")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category replaced", body = CategoryResponse),
        (status = 400, description = "Invalid request data"),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 412, description = "Category name already in use", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn update_category(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<CategoryRequest>,
) -> AppResult<Json<CategoryResponse>> {
    let category = state
        .services
        .categories
        .update_category(auth_user.user_id, id, payload.into_update_category())
        .await?;
    Ok(Json(CategoryResponse::from(category)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = CATEGORY_TAG,
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn delete_category(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.categories.delete_category(auth_user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
