//! Account error types.

use thiserror::Error;

use crate::shopify::ShopifyError;
use crate::storage::StorageError;

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] shopfront_core::EmailError),

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Wrong email or password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The email is already registered.
    #[error("customer already exists")]
    CustomerAlreadyExists,

    /// The token was accepted but no customer came back.
    #[error("customer not found")]
    CustomerNotFound,

    /// Shopify request failed.
    #[error("shopify error: {0}")]
    Remote(#[from] ShopifyError),

    /// Reading or writing the session failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
