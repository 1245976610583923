//! Account endpoints, all scoped to the authenticated user.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::ACCOUNT_TAG;
use crate::api::dto::{
    AccountResponse, CreateAccountRequest, ErrorResponse, PagedResponse, PaginationParams,
    UpdateAccountRequest,
};
use crate::api::middleware::AuthUser;
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};

/// # Routes
/// - `GET /`, `POST /`
/// - `GET /{id}`, `PUT /{id}`, `DELETE /{id}`
/// - `POST /{id}/archive`
pub fn account_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_accounts, create_account))
        .routes(routes!(get_account, update_account, delete_account))
        .routes(routes!(archive_account))
}

#[utoipa::path(
    get,
    path = "/",
    tag = ACCOUNT_TAG,
    params(PaginationParams),
    responses(
        (status = 200, description = "Caller's accounts ordered by id", body = PagedResponse<AccountResponse>),
        (status = 400, description = "Invalid pagination parameters")
    ),
    security(("bearerAuth" = []))
)]
async fn list_accounts(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedQuery(params): ValidatedQuery<PaginationParams>,
) -> AppResult<Json<PagedResponse<AccountResponse>>> {
    let (accounts, total) = state
        .services
        .accounts
        .list_accounts(auth_user.user_id, params.offset(), params.limit())
        .await?;

    let page = PagedResponse::new(accounts, &params, total as u64).map(AccountResponse::from);
    Ok(Json(page))
}

#[utoipa::path(
    post,
    path = "/",
    tag = ACCOUNT_TAG,
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created, not archived", body = AccountResponse),
        (status = 400, description = "Invalid request data")
    ),
    security(("bearerAuth" = []))
)]
async fn create_account(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<CreateAccountRequest>,
) -> AppResult<(StatusCode, Json<AccountResponse>)> {
    let account = state
        .services
        .accounts
        .create_account(payload.into_new_account(auth_user.user_id))
        .await?;
    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = ACCOUNT_TAG,
    params(("id" = i64, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account found", body = AccountResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn get_account(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<AccountResponse>> {
    let account = state.services.accounts.get_account(auth_user.user_id, id).await?;
    Ok(Json(AccountResponse::from(account)))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = ACCOUNT_TAG,
    params(("id" = i64, Path, description = "Account id")),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated", body = AccountResponse),
        (status = 400, description = "Invalid request data"),
        (status = 404, description = "Account not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn update_account(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateAccountRequest>,
) -> AppResult<Json<AccountResponse>> {
    let account = state
        .services
        .accounts
        .update_account(auth_user.user_id, id, payload.into_update_account())
        .await?;
    Ok(Json(AccountResponse::from(account)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = ACCOUNT_TAG,
    params(("id" = i64, Path, description = "Account id")),
    responses(
        (status = 204, description = "Account and its credit cards deleted"),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 412, description = "Account is not archived", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn delete_account(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.accounts.delete_account(auth_user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/{id}/archive",
    tag = ACCOUNT_TAG,
    params(("id" = i64, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account archived", body = AccountResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn archive_account(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<AccountResponse>> {
    let account = state
        .services
        .accounts
        .archive_account(auth_user.user_id, id)
        .await?;
    Ok(Json(AccountResponse::from(account)))
}
