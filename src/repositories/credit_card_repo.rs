//! Credit card repository for async database operations.
//!
//! Cards carry no user column; ownership is resolved by joining `accounts`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::{AsyncDbPool, get_connection};
use crate::error::{AppResult, DatabaseErrorConverter};
use crate::models::{CreditCard, NewCreditCard, UpdateCreditCard};
use crate::schema::{accounts, credit_cards};

#[async_trait]
pub trait CreditCardRepository: Send + Sync {
    async fn create(&self, new_card: NewCreditCard) -> AppResult<CreditCard>;

    /// Finds a card whose account is owned by `owner_id`.
    async fn find_for_user(&self, card_id: i64, owner_id: i64) -> AppResult<Option<CreditCard>>;

    async fn list_for_user(
        &self,
        owner_id: i64,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<CreditCard>, i64)>;

    async fn update(&self, card_id: i64, changes: UpdateCreditCard) -> AppResult<CreditCard>;

    async fn delete(&self, card_id: i64) -> AppResult<usize>;
}

#[derive(Clone)]
pub struct PgCreditCardRepository {
    pool: AsyncDbPool,
}

impl PgCreditCardRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CreditCardRepository for PgCreditCardRepository {
    async fn create(&self, new_card: NewCreditCard) -> AppResult<CreditCard> {
        let mut conn = get_connection(&self.pool).await?;

        diesel::insert_into(credit_cards::table)
            .values(&new_card)
            .returning(CreditCard::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "insert credit card"))
    }

    async fn find_for_user(&self, card_id: i64, owner_id: i64) -> AppResult<Option<CreditCard>> {
        let mut conn = get_connection(&self.pool).await?;

        credit_cards::table
            .inner_join(accounts::table)
            .filter(credit_cards::id.eq(card_id))
            .filter(accounts::user_id.eq(owner_id))
            .select(CreditCard::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "find credit card"))
    }

    async fn list_for_user(
        &self,
        owner_id: i64,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<CreditCard>, i64)> {
        let mut conn = get_connection(&self.pool).await?;

        let page = credit_cards::table
            .inner_join(accounts::table)
            .filter(accounts::user_id.eq(owner_id))
            .order(credit_cards::id.asc())
            .offset(offset)
            .limit(limit)
            .select(CreditCard::as_select())
            .load(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "list credit cards"))?;

        let total = credit_cards::table
            .inner_join(accounts::table)
            .filter(accounts::user_id.eq(owner_id))
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "count credit cards"))?;

        Ok((page, total))
    }

    async fn update(&self, card_id: i64, changes: UpdateCreditCard) -> AppResult<CreditCard> {
        let mut conn = get_connection(&self.pool).await?;

        diesel::update(credit_cards::table.filter(credit_cards::id.eq(card_id)))
            .set(&changes)
            .returning(CreditCard::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "update credit card"))
    }

    async fn delete(&self, card_id: i64) -> AppResult<usize> {
        let mut conn = get_connection(&self.pool).await?;

        diesel::delete(credit_cards::table.filter(credit_cards::id.eq(card_id)))
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "delete credit card"))
    }
}
