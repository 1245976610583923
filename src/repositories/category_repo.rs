//! Category repository for async database operations.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::{AsyncDbPool, get_connection};
use crate::error::{AppResult, DatabaseErrorConverter};
use crate::models::{Category, NewCategory, UpdateCategory};

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, new_category: NewCategory) -> AppResult<Category>;

    async fn find_for_user(&self, category_id: i64, owner_id: i64)
    -> AppResult<Option<Category>>;

    /// Category names are unique across all users.
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>>;

    async fn list_for_user(
        &self,
        owner_id: i64,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Category>, i64)>;

    async fn update(&self, category_id: i64, changes: UpdateCategory) -> AppResult<Category>;

    async fn delete(&self, category_id: i64) -> AppResult<usize>;
}

#[derive(Clone)]
pub struct PgCategoryRepository {
    pool: AsyncDbPool,
}

impl PgCategoryRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn create(&self, new_category: NewCategory) -> AppResult<Category> {
        use crate::schema::categories::dsl::*;
        let mut conn = get_connection(&self.pool).await?;

        diesel::insert_into(categories)
            .values(&new_category)
            .returning(Category::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "insert category"))
    }

    async fn find_for_user(
        &self,
        category_id: i64,
        owner_id: i64,
    ) -> AppResult<Option<Category>> {
        use crate::schema::categories::dsl::*;
        let mut conn = get_connection(&self.pool).await?;

        categories
            .filter(id.eq(category_id))
            .filter(user_id.eq(owner_id))
            .select(Category::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "find category"))
    }

    async fn find_by_name(&self, category_name: &str) -> AppResult<Option<Category>> {
        use crate::schema::categories::dsl::*;
        let mut conn = get_connection(&self.pool).await?;

        categories
            .filter(name.eq(category_name))
            .select(Category::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "find category by name"))
    }

    async fn list_for_user(
        &self,
        owner_id: i64,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Category>, i64)> {
        use crate::schema::categories::dsl::*;
        let mut conn = get_connection(&self.pool).await?;

        let page = categories
            .filter(user_id.eq(owner_id))
            .order(id.asc())
            .offset(offset)
            .limit(limit)
            .select(Category::as_select())
            .load(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "list categories"))?;

        let total = categories
            .filter(user_id.eq(owner_id))
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "count categories"))?;

        Ok((page, total))
    }

    async fn update(&self, category_id: i64, changes: UpdateCategory) -> AppResult<Category> {
        use crate::schema::categories::dsl::*;
        let mut conn = get_connection(&self.pool).await?;

        diesel::update(categories.filter(id.eq(category_id)))
            .set(&changes)
            .returning(Category::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "update category"))
    }

    async fn delete(&self, category_id: i64) -> AppResult<usize> {
        use crate::schema::categories::dsl::*;
        let mut conn = get_connection(&self.pool).await?;

        diesel::delete(categories.filter(id.eq(category_id)))
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "delete category"))
    }
}
