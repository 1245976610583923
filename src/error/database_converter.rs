use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

use crate::error::{AppError, ConstraintParser};

/// Utility for converting database errors to structured AppError variants.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    /// Converts a Diesel error to an appropriate AppError variant.
    ///
    /// Unique violations become `AlreadyExists`, foreign key violations a
    /// field-level `Validation`, and everything else a `Database` error that
    /// keeps the original as its source.
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info.as_ref(), operation)
                    .unwrap_or_else(|| AppError::Database {
                        operation: operation.to_string(),
                        source: anyhow::Error::from(DieselError::DatabaseError(kind, info)),
                    })
            }
            DieselError::NotFound => AppError::NotFound {
                entity: "Resource".to_string(),
                field: "id".to_string(),
                value: "unknown".to_string(),
            },
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: &(dyn DatabaseErrorInformation + Send + Sync),
        operation: &str,
    ) -> Option<AppError> {
        let text = match info.details() {
            Some(details) => format!("{} {}", info.message(), details),
            None => info.message().to_string(),
        };

        match kind {
            DatabaseErrorKind::UniqueViolation => {
                let (table, field, value) =
                    ConstraintParser::parse_unique_violation(&text, info.constraint_name())?;
                tracing::debug!(table = %table, field = %field, operation, "Unique constraint violated");
                Some(AppError::AlreadyExists {
                    entity: Self::entity_label(&table),
                    field,
                    value,
                })
            }
            DatabaseErrorKind::ForeignKeyViolation => {
                let (table, field) =
                    ConstraintParser::parse_foreign_key_violation(&text, info.constraint_name())?;
                Some(AppError::Validation {
                    field,
                    reason: format!("Invalid reference from {}", Self::entity_label(&table)),
                })
            }
            _ => None,
        }
    }

    /// Maps a table name to the entity name used in error messages.
    fn entity_label(table: &str) -> String {
        match table {
            "users" => "User",
            "accounts" => "Account",
            "categories" => "Category",
            "credit_cards" => "Credit card",
            other => other,
        }
        .to_string()
    }
}
