use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::config::error::ConfigError;
use crate::error::DatabaseErrorConverter;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationFieldError {
    /// Name of the offending request field
    #[schema(example = "email")]
    pub field: String,
    /// Human readable reason
    #[schema(example = "Email must be a valid address")]
    pub message: String,
}

impl ValidationFieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Application-wide error type that represents all possible errors in the system.
///
/// Domain kinds (`NotFound`, `AlreadyExists`, `NotArchived`, validation) are raised
/// by services; infrastructure kinds wrap their source with `anyhow`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource is absent, or exists but belongs to another user
    #[error("{entity} not found with {field}: {value}")]
    NotFound {
        entity: String,
        field: String,
        value: String,
    },

    /// Unique business key already taken (user email, category name)
    #[error("{entity} with {field} '{value}' already exists")]
    AlreadyExists {
        entity: String,
        field: String,
        value: String,
    },

    /// Deletion attempted on a resource that still has `archived == false`
    #[error("Cannot delete {entity}. Archive it first.")]
    NotArchived { entity: String, id: i64 },

    /// Validation error for a single field
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Validation errors collected from a request body or query
    #[error("Validation failed: {} field error(s)", errors.len())]
    ValidationErrors { errors: Vec<ValidationFieldError> },

    /// Malformed request (unparseable JSON, bad path or query parameters)
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Missing, invalid or expired credentials
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Database operation error with operation context
    #[error("Database operation failed: {operation}")]
    Database {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Connection pool error
    #[error("Connection pool error")]
    ConnectionPool {
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Shorthand for the not-found error of an entity looked up by id.
    pub fn not_found(entity: &str, id: i64) -> Self {
        AppError::NotFound {
            entity: entity.to_string(),
            field: "id".to_string(),
            value: id.to_string(),
        }
    }

    pub fn already_exists(entity: &str, field: &str, value: impl Into<String>) -> Self {
        AppError::AlreadyExists {
            entity: entity.to_string(),
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Unauthorized {
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(error: diesel::result::Error) -> Self {
        DatabaseErrorConverter::convert_diesel_error(error, "database operation")
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let key = match &error {
            ConfigError::ValidationError { field, .. } => field.clone(),
            _ => "configuration".to_string(),
        };
        AppError::Configuration {
            key,
            source: anyhow::Error::from(error),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut field_errors: Vec<ValidationFieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid ({})", field, error.code));
                    ValidationFieldError::new(camel_case(&field), message)
                })
            })
            .collect();
        field_errors.sort_by(|a, b| a.field.cmp(&b.field).then(a.message.cmp(&b.message)));
        AppError::ValidationErrors {
            errors: field_errors,
        }
    }
}

/// Request bodies are camelCase on the wire; `validator` reports Rust field names.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(range(min = 1, max = 31))]
        day: i32,
    }

    #[test]
    fn test_not_found_display() {
        let error = AppError::not_found("Account", 7);
        assert_eq!(error.to_string(), "Account not found with id: 7");
    }

    #[test]
    fn test_not_archived_display() {
        let error = AppError::NotArchived {
            entity: "credit card".to_string(),
            id: 1,
        };
        assert_eq!(error.to_string(), "Cannot delete credit card. Archive it first.");
    }

    #[test]
    fn test_validation_errors_are_sorted_by_field() {
        let sample = Sample {
            name: String::new(),
            day: 40,
        };
        let error = AppError::from(sample.validate().unwrap_err());
        match error {
            AppError::ValidationErrors { errors } => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].field, "day");
                assert!(errors[0].message.contains("day"));
                assert_eq!(errors[1], ValidationFieldError::new("name", "Name is required"));
            }
            other => panic!("Expected ValidationErrors, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_fields_use_wire_names() {
        #[derive(Validate)]
        struct Body {
            #[validate(length(max = 3, message = "too long"))]
            financial_institution: String,
        }

        let error = AppError::from(
            Body {
                financial_institution: "Nubank".to_string(),
            }
            .validate()
            .unwrap_err(),
        );
        match error {
            AppError::ValidationErrors { errors } => {
                assert_eq!(errors, vec![ValidationFieldError::new("financialInstitution", "too long")]);
            }
            other => panic!("Expected ValidationErrors, got {:?}", other),
        }

        assert_eq!(camel_case("initial_amount"), "initialAmount");
        assert_eq!(camel_case("closing_day"), "closingDay");
        assert_eq!(camel_case("limit"), "limit");
    }

    #[test]
    fn test_config_error_keeps_field_as_key() {
        let error = AppError::from(ConfigError::validation("jwt.secret", "too short"));
        match error {
            AppError::Configuration { key, .. } => assert_eq!(key, "jwt.secret"),
            other => panic!("Expected Configuration, got {:?}", other),
        }
    }
}
