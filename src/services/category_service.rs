//! Category service. Names are unique across all users.

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{Category, NewCategory, UpdateCategory};
use crate::repositories::CategoryRepository;

#[derive(Clone)]
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_category(&self, new_category: NewCategory) -> AppResult<Category> {
        if self.repo.find_by_name(&new_category.name).await?.is_some() {
            return Err(AppError::already_exists("Category", "name", new_category.name));
        }

        let category = self.repo.create(new_category).await?;
        tracing::info!(category_id = category.id, user_id = category.user_id, "Category created");
        Ok(category)
    }

    pub async fn get_category(&self, user_id: i64, id: i64) -> AppResult<Category> {
        self.repo
            .find_for_user(id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Category", id))
    }

    pub async fn list_categories(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Category>, i64)> {
        self.repo.list_for_user(user_id, offset, limit).await
    }

    /// Replaces name, type, color and icon. Renaming to a taken name fails.
    pub async fn update_category(
        &self,
        user_id: i64,
        id: i64,
        changes: UpdateCategory,
    ) -> AppResult<Category> {
        let current = self.get_category(user_id, id).await?;

        if changes.name != current.name && self.repo.find_by_name(&changes.name).await?.is_some() {
            return Err(AppError::already_exists("Category", "name", changes.name));
        }

        if changes.name == current.name
            && changes.color == current.color
            && changes.icon == current.icon
            && changes.category_type == current.category_type
        {
            return Ok(current);
        }

        self.repo.update(id, changes).await
    }

    pub async fn delete_category(&self, user_id: i64, id: i64) -> AppResult<()> {
        self.get_category(user_id, id).await?;
        self.repo.delete(id).await?;
        tracing::info!(category_id = id, user_id, "Category deleted");
        Ok(())
    }
}
