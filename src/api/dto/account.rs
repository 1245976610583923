//! Account DTOs.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Account, AccountType, NewAccount, UpdateAccount};
use crate::utils::validate::{not_blank, positive_amount};

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    #[validate(custom(function = "positive_amount"))]
    #[schema(value_type = String, example = "1000.00")]
    pub initial_amount: BigDecimal,
    #[validate(
        custom(function = "not_blank", message = "Financial institution is required"),
        length(max = 255, message = "Financial institution must be at most 255 characters")
    )]
    #[schema(example = "Nubank", max_length = 255)]
    pub financial_institution: String,
    #[validate(
        custom(function = "not_blank", message = "Description is required"),
        length(max = 255, message = "Description must be at most 255 characters")
    )]
    #[schema(max_length = 255)]
    pub description: String,
    pub account_type: AccountType,
    #[validate(
        custom(function = "not_blank", message = "Color is required"),
        length(max = 32, message = "Color must be at most 32 characters")
    )]
    #[schema(example = "#820AD1", max_length = 32)]
    pub color: String,
    #[validate(
        custom(function = "not_blank", message = "Icon is required"),
        length(max = 64, message = "Icon must be at most 64 characters")
    )]
    #[schema(max_length = 64)]
    pub icon: String,
}

impl CreateAccountRequest {
    pub fn into_new_account(self, user_id: i64) -> NewAccount {
        NewAccount {
            initial_amount: self.initial_amount,
            financial_institution: self.financial_institution,
            description: self.description,
            account_type: self.account_type,
            color: self.color,
            icon: self.icon,
            user_id,
        }
    }
}

/// Partial update. The initial amount cannot be changed.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    #[validate(
        custom(function = "not_blank", message = "Financial institution must not be blank"),
        length(max = 255, message = "Financial institution must be at most 255 characters")
    )]
    pub financial_institution: Option<String>,
    #[validate(
        custom(function = "not_blank", message = "Description must not be blank"),
        length(max = 255, message = "Description must be at most 255 characters")
    )]
    pub description: Option<String>,
    pub account_type: Option<AccountType>,
    #[validate(
        custom(function = "not_blank", message = "Color must not be blank"),
        length(max = 32, message = "Color must be at most 32 characters")
    )]
    pub color: Option<String>,
    #[validate(
        custom(function = "not_blank", message = "Icon must not be blank"),
        length(max = 64, message = "Icon must be at most 64 characters")
    )]
    pub icon: Option<String>,
}

impl UpdateAccountRequest {
    pub fn into_update_account(self) -> UpdateAccount {
        UpdateAccount {
            financial_institution: self.financial_institution,
            description: self.description,
            account_type: self.account_type,
            color: self.color,
            icon: self.icon,
            archived: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: i64,
    #[schema(value_type = String, example = "1000.00")]
    pub initial_amount: BigDecimal,
    pub financial_institution: String,
    pub description: String,
    pub account_type: AccountType,
    pub color: String,
    pub icon: String,
    pub archived: bool,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            initial_amount: account.initial_amount,
            financial_institution: account.financial_institution,
            description: account.description,
            account_type: account.account_type,
            color: account.color,
            icon: account.icon,
            archived: account.archived,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateAccountRequest {
        serde_json::from_str(
            r##"{"initialAmount":1000,"financialInstitution":"Nubank","description":"Savings",
                "accountType":"SAVING_ACCOUNT","color":"#820AD1","icon":"piggy-bank"}"##,
        )
        .unwrap()
    }

    #[test]
    fn test_create_request_parses_enum_and_amount() {
        let request = create_request();

        assert!(request.validate().is_ok());
        let new_account = request.into_new_account(9);
        assert_eq!(new_account.account_type, AccountType::SavingAccount);
        assert_eq!(new_account.initial_amount, BigDecimal::from(1000));
        assert_eq!(new_account.user_id, 9);
    }

    #[test]
    fn test_snake_case_body_is_rejected() {
        let result = serde_json::from_str::<CreateAccountRequest>(
            r##"{"initial_amount":1000,"financial_institution":"Nubank","description":"Savings",
                "account_type":"SAVING_ACCOUNT","color":"#820AD1","icon":"piggy-bank"}"##,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_non_positive_amount_is_rejected() {
        let mut request = create_request();
        request.initial_amount = BigDecimal::from(-5);

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("initial_amount"));
    }

    #[test]
    fn test_values_wider_than_columns_are_rejected() {
        let mut request = create_request();
        request.color = "c".repeat(33);
        request.icon = "i".repeat(65);
        request.financial_institution = "x".repeat(256);
        request.description = "d".repeat(256);
        request.initial_amount = "1e23".parse().unwrap();

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        for field in ["color", "icon", "financial_institution", "description", "initial_amount"] {
            assert!(fields.contains_key(field), "{field} should be rejected");
        }
    }

    #[test]
    fn test_values_at_column_width_are_accepted() {
        let mut request = create_request();
        request.color = "c".repeat(32);
        request.icon = "i".repeat(64);
        request.financial_institution = "x".repeat(255);
        request.initial_amount = "99999999999999999.99".parse().unwrap();

        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_update_request_limits_apply_to_present_fields() {
        let request: UpdateAccountRequest =
            serde_json::from_str(&format!(r#"{{"icon":"{}"}}"#, "i".repeat(65))).unwrap();
        assert!(request.validate().unwrap_err().field_errors().contains_key("icon"));
    }

    #[test]
    fn test_update_request_never_archives() {
        let request: UpdateAccountRequest =
            serde_json::from_str(r#"{"description":"Renamed","accountType":"OTHER"}"#).unwrap();
        let changes = request.into_update_account();

        assert_eq!(changes.description.as_deref(), Some("Renamed"));
        assert_eq!(changes.account_type, Some(AccountType::Other));
        assert!(changes.archived.is_none());
    }

    #[test]
    fn test_response_uses_camel_case() {
        let response = AccountResponse::from(Account {
            id: 1,
            initial_amount: BigDecimal::from(1000),
            financial_institution: "Nubank".to_string(),
            description: "Savings".to_string(),
            account_type: AccountType::SavingAccount,
            color: "#820AD1".to_string(),
            icon: "piggy-bank".to_string(),
            archived: false,
            user_id: 3,
        });
        let json = serde_json::to_value(response).unwrap();

        assert_eq!(json["accountType"], "SAVING_ACCOUNT");
        assert_eq!(json["financialInstitution"], "Nubank");
        assert!(json.get("initialAmount").is_some());
        assert!(json.get("userId").is_none());
    }
}
