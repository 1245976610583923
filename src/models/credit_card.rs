//! Credit card models for database operations.

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

/// Card network
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
pub enum CreditCardBrand {
    Visa,
    Mastercard,
    AmericanExpress,
    Elo,
    Hipercard,
    Other,
}

impl CreditCardBrand {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreditCardBrand::Visa => "VISA",
            CreditCardBrand::Mastercard => "MASTERCARD",
            CreditCardBrand::AmericanExpress => "AMERICAN_EXPRESS",
            CreditCardBrand::Elo => "ELO",
            CreditCardBrand::Hipercard => "HIPERCARD",
            CreditCardBrand::Other => "OTHER",
        }
    }
}

impl fmt::Display for CreditCardBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CreditCardBrand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VISA" => Ok(CreditCardBrand::Visa),
            "MASTERCARD" => Ok(CreditCardBrand::Mastercard),
            "AMERICAN_EXPRESS" => Ok(CreditCardBrand::AmericanExpress),
            "ELO" => Ok(CreditCardBrand::Elo),
            "HIPERCARD" => Ok(CreditCardBrand::Hipercard),
            "OTHER" => Ok(CreditCardBrand::Other),
            _ => Err(format!("Unrecognized brand: {}", s)),
        }
    }
}

impl ToSql<Text, Pg> for CreditCardBrand {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<Text, Pg> for CreditCardBrand {
    fn from_sql(
        bytes: <Pg as diesel::backend::Backend>::RawValue<'_>,
    ) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        Ok(s.parse::<CreditCardBrand>()?)
    }
}

/// Credit card row. Ownership is derived through `account_id`.
#[derive(Debug, Queryable, Selectable, Clone, PartialEq)]
#[diesel(table_name = crate::schema::credit_cards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CreditCard {
    pub id: i64,
    pub credit_limit: BigDecimal,
    pub description: String,
    pub brand: CreditCardBrand,
    pub closing_day: i32,
    pub due_date: i32,
    pub archived: bool,
    pub account_id: i64,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::credit_cards)]
pub struct NewCreditCard {
    pub credit_limit: BigDecimal,
    pub description: String,
    pub brand: CreditCardBrand,
    pub closing_day: i32,
    pub due_date: i32,
    pub account_id: i64,
}

#[derive(Debug, AsChangeset, Clone, Default)]
#[diesel(table_name = crate::schema::credit_cards)]
pub struct UpdateCreditCard {
    pub credit_limit: Option<BigDecimal>,
    pub description: Option<String>,
    pub brand: Option<CreditCardBrand>,
    pub closing_day: Option<i32>,
    pub due_date: Option<i32>,
    pub archived: Option<bool>,
    pub account_id: Option<i64>,
}

impl UpdateCreditCard {
    pub fn archive() -> Self {
        Self {
            archived: Some(true),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.credit_limit.is_none()
            && self.description.is_none()
            && self.brand.is_none()
            && self.closing_day.is_none()
            && self.due_date.is_none()
            && self.archived.is_none()
            && self.account_id.is_none()
    }

    pub fn apply_to(self, card: &mut CreditCard) {
        if let Some(value) = self.credit_limit {
            card.credit_limit = value;
        }
        if let Some(value) = self.description {
            card.description = value;
        }
        if let Some(value) = self.brand {
            card.brand = value;
        }
        if let Some(value) = self.closing_day {
            card.closing_day = value;
        }
        if let Some(value) = self.due_date {
            card.due_date = value;
        }
        if let Some(value) = self.archived {
            card.archived = value;
        }
        if let Some(value) = self.account_id {
            card.account_id = value;
        }
    }
}
