mod account;
mod category;
mod credit_card;
mod user;

pub use account::{Account, AccountType, NewAccount, UpdateAccount};
pub use category::{Category, CategoryType, NewCategory, UpdateCategory};
pub use credit_card::{CreditCard, CreditCardBrand, NewCreditCard, UpdateCreditCard};
pub use user::{NewUser, UpdateUser, User};
