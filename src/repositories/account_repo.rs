//! Account repository for async database operations.
//!
//! Lookups are always filtered by the owning user.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::{AsyncDbPool, get_connection};
use crate::error::{AppResult, DatabaseErrorConverter};
use crate::models::{Account, NewAccount, UpdateAccount};

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn create(&self, new_account: NewAccount) -> AppResult<Account>;

    /// Finds an account by id only if `owner_id` owns it.
    async fn find_for_user(&self, account_id: i64, owner_id: i64) -> AppResult<Option<Account>>;

    /// Returns one page ordered by id plus the owner's total count.
    async fn list_for_user(
        &self,
        owner_id: i64,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Account>, i64)>;

    async fn update(&self, account_id: i64, changes: UpdateAccount) -> AppResult<Account>;

    async fn delete(&self, account_id: i64) -> AppResult<usize>;
}

#[derive(Clone)]
pub struct PgAccountRepository {
    pool: AsyncDbPool,
}

impl PgAccountRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn create(&self, new_account: NewAccount) -> AppResult<Account> {
        use crate::schema::accounts::dsl::*;
        let mut conn = get_connection(&self.pool).await?;

        diesel::insert_into(accounts)
            .values(&new_account)
            .returning(Account::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "insert account"))
    }

    async fn find_for_user(&self, account_id: i64, owner_id: i64) -> AppResult<Option<Account>> {
        use crate::schema::accounts::dsl::*;
        let mut conn = get_connection(&self.pool).await?;

        accounts
            .filter(id.eq(account_id))
            .filter(user_id.eq(owner_id))
            .select(Account::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "find account"))
    }

    async fn list_for_user(
        &self,
        owner_id: i64,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Account>, i64)> {
        use crate::schema::accounts::dsl::*;
        let mut conn = get_connection(&self.pool).await?;

        let page = accounts
            .filter(user_id.eq(owner_id))
            .order(id.asc())
            .offset(offset)
            .limit(limit)
            .select(Account::as_select())
            .load(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "list accounts"))?;

        let total = accounts
            .filter(user_id.eq(owner_id))
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "count accounts"))?;

        Ok((page, total))
    }

    async fn update(&self, account_id: i64, changes: UpdateAccount) -> AppResult<Account> {
        use crate::schema::accounts::dsl::*;
        let mut conn = get_connection(&self.pool).await?;

        diesel::update(accounts.filter(id.eq(account_id)))
            .set(&changes)
            .returning(Account::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "update account"))
    }

    async fn delete(&self, account_id: i64) -> AppResult<usize> {
        use crate::schema::accounts::dsl::*;
        let mut conn = get_connection(&self.pool).await?;

        diesel::delete(accounts.filter(id.eq(account_id)))
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "delete account"))
    }
}
