//! Credit card DTOs. The credit limit travels as the JSON field `limit`.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{CreditCard, CreditCardBrand, NewCreditCard, UpdateCreditCard};
use crate::utils::validate::{not_blank, positive_amount};

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCreditCardRequest {
    #[validate(custom(function = "positive_amount"))]
    #[schema(value_type = String, example = "3000.00")]
    pub limit: BigDecimal,
    #[validate(
        custom(function = "not_blank", message = "Description is required"),
        length(max = 255, message = "Description must be at most 255 characters")
    )]
    #[schema(max_length = 255)]
    pub description: String,
    pub brand: CreditCardBrand,
    #[validate(range(min = 1, max = 31, message = "Closing day must be between 1 and 31"))]
    #[schema(minimum = 1, maximum = 31, example = 3)]
    pub closing_day: i32,
    #[validate(range(min = 1, max = 31, message = "Due date must be between 1 and 31"))]
    #[schema(minimum = 1, maximum = 31, example = 10)]
    pub due_date: i32,
    /// Account the card is billed to; must belong to the caller
    pub account_id: i64,
}

impl CreateCreditCardRequest {
    pub fn into_new_credit_card(self) -> NewCreditCard {
        NewCreditCard {
            credit_limit: self.limit,
            description: self.description,
            brand: self.brand,
            closing_day: self.closing_day,
            due_date: self.due_date,
            account_id: self.account_id,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCreditCardRequest {
    #[validate(custom(function = "positive_amount"))]
    #[schema(value_type = Option<String>)]
    pub limit: Option<BigDecimal>,
    #[validate(
        custom(function = "not_blank", message = "Description must not be blank"),
        length(max = 255, message = "Description must be at most 255 characters")
    )]
    pub description: Option<String>,
    pub brand: Option<CreditCardBrand>,
    #[validate(range(min = 1, max = 31, message = "Closing day must be between 1 and 31"))]
    pub closing_day: Option<i32>,
    #[validate(range(min = 1, max = 31, message = "Due date must be between 1 and 31"))]
    pub due_date: Option<i32>,
    pub account_id: Option<i64>,
}

impl UpdateCreditCardRequest {
    pub fn into_update_credit_card(self) -> UpdateCreditCard {
        UpdateCreditCard {
            credit_limit: self.limit,
            description: self.description,
            brand: self.brand,
            closing_day: self.closing_day,
            due_date: self.due_date,
            archived: None,
            account_id: self.account_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreditCardResponse {
    pub id: i64,
    #[schema(value_type = String, example = "3000.00")]
    pub limit: BigDecimal,
    pub description: String,
    pub brand: CreditCardBrand,
    pub closing_day: i32,
    pub due_date: i32,
    pub archived: bool,
    pub account_id: i64,
}

impl From<CreditCard> for CreditCardResponse {
    fn from(card: CreditCard) -> Self {
        Self {
            id: card.id,
            limit: card.credit_limit,
            description: card.description,
            brand: card.brand,
            closing_day: card.closing_day,
            due_date: card.due_date,
            archived: card.archived,
            account_id: card.account_id,
        }
    }
}
