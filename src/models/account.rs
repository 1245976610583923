//! Account models for database operations.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use diesel::AsExpression;
use diesel::FromSqlRow;
use diesel::deserialize::{self, FromSql};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::Text;
use serde::{Deserialize, Serialize};

// ============================================================================
// Enums
// ============================================================================

/// Kind of bank account
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    utoipa::ToSchema,
    AsExpression,
    FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    CheckingAccount,
    SavingAccount,
    InvestmentAccount,
    Other,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::CheckingAccount => "CHECKING_ACCOUNT",
            AccountType::SavingAccount => "SAVING_ACCOUNT",
            AccountType::InvestmentAccount => "INVESTMENT_ACCOUNT",
            AccountType::Other => "OTHER",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CHECKING_ACCOUNT" => Ok(AccountType::CheckingAccount),
            "SAVING_ACCOUNT" => Ok(AccountType::SavingAccount),
            "INVESTMENT_ACCOUNT" => Ok(AccountType::InvestmentAccount),
            "OTHER" => Ok(AccountType::Other),
            _ => Err(format!("Unrecognized account_type: {}", s)),
        }
    }
}

impl ToSql<Text, Pg> for AccountType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<Text, Pg> for AccountType {
    fn from_sql(
        bytes: <Pg as diesel::backend::Backend>::RawValue<'_>,
    ) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        Ok(s.parse::<AccountType>()?)
    }
}

// ============================================================================
// Models
// ============================================================================

/// Account row
#[derive(Debug, Queryable, Selectable, Clone, PartialEq)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Account {
    pub id: i64,
    pub initial_amount: BigDecimal,
    pub financial_institution: String,
    pub description: String,
    pub account_type: AccountType,
    pub color: String,
    pub icon: String,
    pub archived: bool,
    pub user_id: i64,
}

/// Insert payload; `archived` is left to the column default (false).
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::accounts)]
pub struct NewAccount {
    pub initial_amount: BigDecimal,
    pub financial_institution: String,
    pub description: String,
    pub account_type: AccountType,
    pub color: String,
    pub icon: String,
    pub user_id: i64,
}

/// Partial update. `initial_amount` and `user_id` are immutable after creation.
#[derive(Debug, AsChangeset, Clone, Default)]
#[diesel(table_name = crate::schema::accounts)]
pub struct UpdateAccount {
    pub financial_institution: Option<String>,
    pub description: Option<String>,
    pub account_type: Option<AccountType>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub archived: Option<bool>,
}

impl UpdateAccount {
    /// Changeset that only flips the archived flag on.
    pub fn archive() -> Self {
        Self {
            archived: Some(true),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.financial_institution.is_none()
            && self.description.is_none()
            && self.account_type.is_none()
            && self.color.is_none()
            && self.icon.is_none()
            && self.archived.is_none()
    }

    /// Applies the changeset to an in-memory account.
    pub fn apply_to(self, account: &mut Account) {
        if let Some(value) = self.financial_institution {
            account.financial_institution = value;
        }
        if let Some(value) = self.description {
            account.description = value;
        }
        if let Some(value) = self.account_type {
            account.account_type = value;
        }
        if let Some(value) = self.color {
            account.color = value;
        }
        if let Some(value) = self.icon {
            account.icon = value;
        }
        if let Some(value) = self.archived {
            account.archived = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_type_round_trips_through_str() {
        for account_type in [
            AccountType::CheckingAccount,
            AccountType::SavingAccount,
            AccountType::InvestmentAccount,
            AccountType::Other,
        ] {
            assert_eq!(account_type.as_str().parse::<AccountType>(), Ok(account_type));
        }
        assert!("checking".parse::<AccountType>().is_err());
    }

    #[test]
    fn test_account_type_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&AccountType::SavingAccount).unwrap();
        assert_eq!(json, "\"SAVING_ACCOUNT\"");
    }

    #[test]
    fn test_update_account_archive_only_touches_flag() {
        let changes = UpdateAccount::archive();
        assert_eq!(changes.archived, Some(true));
        assert!(changes.description.is_none());
        assert!(!changes.is_empty());
        assert!(UpdateAccount::default().is_empty());
    }
}
