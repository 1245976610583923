//! Service layer for business logic operations.
//!
//! Services enforce ownership scoping and lifecycle rules; every scoped
//! method takes the principal's `user_id` explicitly.

mod account_service;
mod auth_service;
mod category_service;
mod credit_card_service;
mod user_service;

pub use account_service::AccountService;
pub use auth_service::AuthService;
pub use category_service::CategoryService;
pub use credit_card_service::CreditCardService;
pub use user_service::UserService;

use crate::config::JwtConfig;
use crate::repositories::Repositories;

/// Aggregates all services. Cloning only bumps reference counts.
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub accounts: AccountService,
    pub categories: CategoryService,
    pub credit_cards: CreditCardService,
    pub auth: AuthService,
}

impl Services {
    pub fn new(repos: Repositories, jwt: JwtConfig) -> Self {
        let users = UserService::new(repos.users);
        let accounts = AccountService::new(repos.accounts);
        Self {
            categories: CategoryService::new(repos.categories),
            credit_cards: CreditCardService::new(repos.credit_cards, accounts.clone()),
            auth: AuthService::new(users.clone(), jwt),
            users,
            accounts,
        }
    }
}
