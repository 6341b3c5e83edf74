//! Turncoat Commerce
//!
//! Storefront extensions running beside the commerce platform.
//!
//! ## Features
//! - Category bundle requirements on promotions
//! - Cart promotion guard (`cart.updated`)
//! - SumUp hosted-checkout payment provider
//! - SumUp webhook receiver
//! - Order confirmation and admin notification emails (`order.placed`)

pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod modules;
pub mod payment;
pub mod subscribers;
pub mod workflows;

use thiserror::Error;

pub use config::Config;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum CommerceError {
    #[error("Order not found")]
    OrderNotFound,

    #[error("Category bundle config not found: {0}")]
    BundleConfigNotFound(String),

    #[error("Promotion {0} is already linked to a category bundle config")]
    AlreadyLinked(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Payment error: {0}")]
    Payment(#[from] payment::sumup::SumUpError),

    #[error("Event bus error: {0}")]
    EventBus(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl From<sqlx::Error> for CommerceError {
    fn from(e: sqlx::Error) -> Self {
        Self::StorageError(e.to_string())
    }
}

impl From<validator::ValidationErrors> for CommerceError {
    fn from(e: validator::ValidationErrors) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CommerceError>;
