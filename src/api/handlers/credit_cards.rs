//! Credit card endpoints. Cards are reachable through accounts the caller owns.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::CREDIT_CARD_TAG;
use crate::api::dto::{
    CreateCreditCardRequest, CreditCardResponse, ErrorResponse, PagedResponse, PaginationParams,
    UpdateCreditCardRequest,
};
use crate::api::middleware::AuthUser;
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};

pub fn credit_card_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_credit_cards, create_credit_card))
        .routes(routes!(get_credit_card, update_credit_card, delete_credit_card))
        .routes(routes!(archive_credit_card))
}

#[utoipa::path(
    get,
    path = "/",
    tag = CREDIT_CARD_TAG,
    params(PaginationParams),
    responses(
        (status = 200, description = "Caller's credit cards ordered by id", body = PagedResponse<CreditCardResponse>),
        (status = 400, description = "Invalid pagination parameters")
    ),
    security(("bearerAuth" = []))
)]
async fn list_credit_cards(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedQuery(params): ValidatedQuery<PaginationParams>,
) -> AppResult<Json<PagedResponse<CreditCardResponse>>> {
    let (cards, total) = state
        .services
        .credit_cards
        .list_credit_cards(auth_user.user_id, params.offset(), params.limit())
        .await?;

    let page = PagedResponse::new(cards, &params, total as u64).map(CreditCardResponse::from);
    Ok(Json(page))
}

#[utoipa::path(
    post,
    path = "/",
    tag = CREDIT_CARD_TAG,
    request_body = CreateCreditCardRequest,
    responses(
        (status = 201, description = "Credit card created, not archived", body = CreditCardResponse),
        (status = 400, description = "Invalid request data"),
        (status = 404, description = "Account not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn create_credit_card(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<CreateCreditCardRequest>,
) -> AppResult<(StatusCode, Json<CreditCardResponse>)> {
    let card = state
        .services
        .credit_cards
        .create_credit_card(auth_user.user_id, payload.into_new_credit_card())
        .await?;
    Ok((StatusCode::CREATED, Json(CreditCardResponse::from(card))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = CREDIT_CARD_TAG,
    params(("id" = i64, Path, description = "Credit card id")),
    responses(
        (status = 200, description = "Credit card found", body = CreditCardResponse),
        (status = 404, description = "Credit card not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn get_credit_card(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<CreditCardResponse>> {
    let card = state
        .services
        .credit_cards
        .get_credit_card(auth_user.user_id, id)
        .await?;
    Ok(Json(CreditCardResponse::from(card)))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = CREDIT_CARD_TAG,
    params(("id" = i64, Path, description = "Credit card id")),
    request_body = UpdateCreditCardRequest,
    responses(
        (status = 200, description = "Credit card updated", body = CreditCardResponse),
        (status = 400, description = "Invalid request data"),
        (status = 404, description = "Credit card or target account not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn update_credit_card(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateCreditCardRequest>,
) -> AppResult<Json<CreditCardResponse>> {
    let card = state
        .services
        .credit_cards
        .update_credit_card(auth_user.user_id, id, payload.into_update_credit_card())
        .await?;
    Ok(Json(CreditCardResponse::from(card)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = CREDIT_CARD_TAG,
    params(("id" = i64, Path, description = "Credit card id")),
    responses(
        (status = 204, description = "Credit card deleted"),
        (status = 404, description = "Credit card not found", body = ErrorResponse),
        (status = 412, description = "Credit card is not archived", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn delete_credit_card(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state
        .services
        .credit_cards
        .delete_credit_card(auth_user.user_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/{id}/archive",
    tag = CREDIT_CARD_TAG,
    params(("id" = i64, Path, description = "Credit card id")),
    responses(
        (status = 200, description = "Credit card archived", body = CreditCardResponse),
        (status = 404, description = "Credit card not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn archive_credit_card(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<CreditCardResponse>> {
    let card = state
        .services
        .credit_cards
        .archive_credit_card(auth_user.user_id, id)
        .await?;
    Ok(Json(CreditCardResponse::from(card)))
}
