//! HTTP request handlers for API endpoints.
//!
//! This module contains all request handlers organized by resource type.

pub mod accounts;
pub mod auth;
pub mod categories;
pub mod credit_cards;
pub mod users;
