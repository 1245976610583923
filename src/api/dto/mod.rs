//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain and own the conversions to and from the
//! persistence models, so handlers never touch model fields directly.

mod account;
mod auth;
mod category;
mod credit_card;
mod error;
mod pagination;
mod user;

pub use account::{AccountResponse, CreateAccountRequest, UpdateAccountRequest};
pub use auth::{LoginRequest, TokenResponse};
pub use category::{CategoryRequest, CategoryResponse};
pub use credit_card::{CreateCreditCardRequest, CreditCardResponse, UpdateCreditCardRequest};
pub use error::ErrorResponse;
pub use pagination::{PagedResponse, PaginationMeta, PaginationParams};
pub use user::{CreateUserRequest, UpdateUserRequest, UserResponse};
