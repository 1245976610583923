//! Category DTOs. The category kind travels as the JSON field `type`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Category, CategoryType, NewCategory, UpdateCategory};
use crate::utils::validate::not_blank;

/// Body for both create and update; an update replaces every field.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    #[validate(
        custom(function = "not_blank", message = "Name is required"),
        length(max = 100, message = "Name must be at most 100 characters")
    )]
    #[schema(example = "Groceries", max_length = 100)]
    pub name: String,
    #[validate(length(max = 32, message = "Color must be at most 32 characters"))]
    #[schema(example = "#FF0000", max_length = 32)]
    pub color: Option<String>,
    #[validate(length(max = 64, message = "Icon must be at most 64 characters"))]
    #[schema(example = "cart", max_length = 64)]
    pub icon: Option<String>,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
}

impl CategoryRequest {
    pub fn into_new_category(self, user_id: i64) -> NewCategory {
        NewCategory {
            name: self.name,
            color: self.color,
            icon: self.icon,
            category_type: self.category_type,
            user_id,
        }
    }

    pub fn into_update_category(self) -> UpdateCategory {
        UpdateCategory {
            name: self.name,
            color: self.color,
            icon: self.icon,
            category_type: self.category_type,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            color: category.color,
            icon: category.icon,
            category_type: category.category_type,
        }
    }
}
