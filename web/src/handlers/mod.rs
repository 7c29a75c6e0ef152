//! HTTP request handlers.
//!
//! This module contains all HTTP handlers organized by domain.

pub mod banking;
pub mod health;

pub use banking::{balance, login, logout, transactions, transfer};
pub use health::{health_check, metrics, root};
