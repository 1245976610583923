use std::sync::OnceLock;

use regex::Regex;

/// Extracts structured information from PostgreSQL constraint violations.
///
/// PostgreSQL reports the offending key in the error detail as
/// `Key (email)=(someone@example.com) already exists.`; constraint names
/// follow the `{table}_{column}_{suffix}` convention used by the migrations.
pub struct ConstraintParser;

fn key_value_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").expect("key/value pattern is valid")
    })
}

/// Suffixes PostgreSQL and our migrations append to constraint names.
const CONSTRAINT_SUFFIXES: [&str; 4] = ["_key", "_fkey", "_check", "_idx"];

impl ConstraintParser {
    /// Parses a unique violation into `(table, column, value)`.
    ///
    /// `text` should contain both the message and the detail of the database
    /// error, since the key/value pair only appears in the detail.
    ///
    /// ```
    /// use finance_tracker::error::ConstraintParser;
    ///
    /// let text = "duplicate key value violates unique constraint \"users_email_key\" \
    ///             Key (email)=(ana@example.com) already exists.";
    /// let parsed = ConstraintParser::parse_unique_violation(text, Some("users_email_key"));
    /// assert_eq!(
    ///     parsed,
    ///     Some(("users".to_string(), "email".to_string(), "ana@example.com".to_string()))
    /// );
    /// ```
    pub fn parse_unique_violation(
        text: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let from_constraint = constraint_name.and_then(Self::parse_constraint_name);
        let from_text = Self::extract_key_value(text);

        match (from_constraint, from_text) {
            (Some((table, column)), Some((_, value))) => Some((table, column, value)),
            (Some((table, column)), None) => Some((table, column, "duplicate value".to_string())),
            (None, Some((column, value))) => Some(("resource".to_string(), column, value)),
            (None, None) => None,
        }
    }

    /// Parses a foreign key violation into `(table, column)`.
    pub fn parse_foreign_key_violation(
        text: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        constraint_name
            .and_then(Self::parse_constraint_name)
            .or_else(|| {
                Self::extract_key_value(text).map(|(column, _)| ("resource".to_string(), column))
            })
    }

    /// Splits a constraint name such as `credit_cards_account_id_fkey` into
    /// `("credit_cards", "account_id")`.
    ///
    /// Table names may contain underscores, so the split point is the first
    /// known table prefix; unknown tables fall back to the first segment.
    pub fn parse_constraint_name(constraint_name: &str) -> Option<(String, String)> {
        let stem = CONSTRAINT_SUFFIXES
            .iter()
            .find_map(|suffix| constraint_name.strip_suffix(suffix))
            .unwrap_or(constraint_name);

        for table in ["credit_cards", "categories", "accounts", "users"] {
            if let Some(column) = stem.strip_prefix(table).and_then(|rest| rest.strip_prefix('_'))
                && !column.is_empty()
            {
                return Some((table.to_string(), column.to_string()));
            }
        }

        let (table, column) = stem.split_once('_')?;
        if table.is_empty() || column.is_empty() {
            return None;
        }
        Some((table.to_string(), column.to_string()))
    }

    /// Extracts `(column, value)` from a `Key (column)=(value)` fragment.
    pub fn extract_key_value(text: &str) -> Option<(String, String)> {
        key_value_pattern().captures(text).and_then(|caps| {
            let column = caps.get(1)?.as_str().to_string();
            let value = caps.get(2)?.as_str().to_string();
            Some((column, value))
        })
    }
}
