//! User-related DTOs for API requests and responses.

use crate::models::{NewUser, UpdateUser, User};
use crate::utils::validate::not_blank;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for registering a new user.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(
        custom(function = "not_blank", message = "First name is required"),
        length(max = 100, message = "First name must be at most 100 characters")
    )]
    #[schema(example = "Ada", max_length = 100)]
    pub first_name: String,
    #[validate(
        custom(function = "not_blank", message = "Last name is required"),
        length(max = 100, message = "Last name must be at most 100 characters")
    )]
    #[schema(example = "Lovelace", max_length = 100)]
    pub last_name: String,
    #[validate(
        email(message = "Email must be a valid address"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    #[schema(format = "email", example = "ada@example.com")]
    pub email: String,
    #[validate(length(min = 6, max = 64, message = "Password must be between 6 and 64 characters"))]
    #[schema(format = "password", min_length = 6, max_length = 64)]
    pub password: String,
}

impl CreateUserRequest {
    /// Converts the request into a NewUser; the password is still plain text here.
    pub fn into_new_user(self) -> NewUser {
        NewUser {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password: self.password,
        }
    }
}

/// Request body for updating a user. Absent fields are left unchanged.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(
        custom(function = "not_blank", message = "First name must not be blank"),
        length(max = 100, message = "First name must be at most 100 characters")
    )]
    pub first_name: Option<String>,
    #[validate(
        custom(function = "not_blank", message = "Last name must not be blank"),
        length(max = 100, message = "Last name must be at most 100 characters")
    )]
    pub last_name: Option<String>,
    #[validate(
        email(message = "Email must be a valid address"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    #[schema(format = "email")]
    pub email: Option<String>,
    #[validate(length(min = 6, max = 64, message = "Password must be between 6 and 64 characters"))]
    #[schema(format = "password")]
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn into_update_user(self) -> UpdateUser {
        UpdateUser {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password: self.password,
        }
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Response body for user data (the password hash is never exposed).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_has_no_password() {
        let user = User {
            id: 4,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "$argon2id$v=19$...".to_string(),
        };
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();

        assert_eq!(json["id"], 4);
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["lastName"], "Lovelace");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_create_request_reports_each_bad_field() {
        let request = CreateUserRequest {
            first_name: " ".to_string(),
            last_name: "Lovelace".to_string(),
            email: "not-an-email".to_string(),
            password: "123".to_string(),
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("first_name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(!fields.contains_key("last_name"));
    }

    #[test]
    fn test_names_wider_than_columns_are_rejected() {
        let request: CreateUserRequest = serde_json::from_str(&format!(
            r#"{{"firstName":"{}","lastName":"{}","email":"ada@example.com","password":"secret-pass"}}"#,
            "f".repeat(101),
            "l".repeat(100)
        ))
        .unwrap();

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("first_name"));
        assert!(!fields.contains_key("last_name"));
    }
}
