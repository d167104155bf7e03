//! Unified error handling with Sentry integration.
//!
//! Every service has its own error enum; `AppError` aggregates them for the
//! front end. Server-class errors are captured to Sentry before they are
//! shown, and [`AppError::user_message`] never exposes internal details.

use thiserror::Error;

use crate::config::ConfigError;
use crate::services::auth::AuthError;
use crate::services::cart::CartError;
use crate::services::orders::OrderError;
use crate::services::wishlist::WishlistError;
use crate::shopify::ShopifyError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration is missing or invalid.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Shopify API operation failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// Local store operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Wishlist operation failed.
    #[error("Wishlist error: {0}")]
    Wishlist(#[from] WishlistError),

    /// Account operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Order or address lookup failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

const REMOTE_MESSAGE: &str = "The store is unavailable right now, please try again";
const INTERNAL_MESSAGE: &str = "Something went wrong";

impl AppError {
    /// Whether this error points at a fault on our side or Shopify's rather
    /// than at the user's input.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        match self {
            Self::Config(_) | Self::Shopify(_) | Self::Storage(_) => true,
            Self::Cart(err) => matches!(
                err,
                CartError::Remote(_) | CartError::Storage(_) | CartError::MissingVariant
            ),
            Self::Wishlist(WishlistError::Storage(_)) => true,
            Self::Auth(err) => matches!(err, AuthError::Remote(_) | AuthError::Storage(_)),
            Self::Order(err) => matches!(err, OrderError::Remote(_) | OrderError::Storage(_)),
            Self::NotFound(_) | Self::BadRequest(_) => false,
        }
    }

    /// Message safe to show the shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(err) => format!("Configuration problem: {err}"),
            Self::Shopify(err) => shopify_message(err),
            Self::Storage(_) | Self::Wishlist(WishlistError::Storage(_)) => {
                INTERNAL_MESSAGE.to_string()
            }
            Self::Cart(err) => match err {
                CartError::MissingVariant => {
                    "This product is not available to add to the cart".to_string()
                }
                CartError::InvalidQuantity(_) => "Quantity must be at least 1".to_string(),
                CartError::LineNotFound(_) => "That item is not in your cart".to_string(),
                CartError::CartVanished(_) => {
                    "Your cart has expired, a new one will be started".to_string()
                }
                CartError::Remote(err) => shopify_message(err),
                CartError::Storage(_) => INTERNAL_MESSAGE.to_string(),
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::CustomerNotFound => {
                    "Invalid email or password".to_string()
                }
                AuthError::CustomerAlreadyExists => {
                    "An account with this email already exists".to_string()
                }
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
                AuthError::Remote(err) => shopify_message(err),
                AuthError::Storage(_) => INTERNAL_MESSAGE.to_string(),
            },
            Self::Order(err) => match err {
                OrderError::SessionRequired => "Please log in to view your orders".to_string(),
                OrderError::SessionExpired => {
                    "Your session has expired, please log in again".to_string()
                }
                OrderError::OrderNotFound(reference) => format!("Order {reference} not found"),
                OrderError::Remote(err) => shopify_message(err),
                OrderError::Storage(_) => INTERNAL_MESSAGE.to_string(),
            },
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::BadRequest(msg) => msg.clone(),
        }
    }

    /// Log the error and capture server-class errors to Sentry.
    pub fn report(&self) {
        if self.is_server_error() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Command error"
            );
        } else {
            tracing::debug!(error = %self, "Command rejected");
        }
    }
}

fn shopify_message(err: &ShopifyError) -> String {
    match err {
        ShopifyError::RateLimited(secs) => {
            format!("The store is busy, please try again in {secs} seconds")
        }
        ShopifyError::NotFound(what) => format!("Not found: {what}"),
        ShopifyError::UserError(msg) => msg.clone(),
        ShopifyError::Unauthorized(_) => "Please log in again".to_string(),
        ShopifyError::Conflict(msg) => msg.clone(),
        ShopifyError::Http(_) | ShopifyError::GraphQL(_) | ShopifyError::Parse(_) => {
            REMOTE_MESSAGE.to_string()
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a customer ID.
///
/// Call this after a successful login to associate errors with customers.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("variant_id", "gid://shopify/ProductVariant/1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use shopfront_core::CartLineId;

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_server_errors() {
        assert!(AppError::Shopify(ShopifyError::message("boom")).is_server_error());
        assert!(AppError::Cart(CartError::MissingVariant).is_server_error());
        assert!(!AppError::Cart(CartError::InvalidQuantity(0)).is_server_error());
        assert!(!AppError::Order(OrderError::SessionRequired).is_server_error());
        assert!(!AppError::Auth(AuthError::InvalidCredentials).is_server_error());
    }

    #[test]
    fn test_user_message_hides_internals() {
        let err = AppError::Shopify(ShopifyError::message("secret upstream detail"));
        assert!(!err.user_message().contains("secret"));

        let err = AppError::Cart(CartError::Remote(ShopifyError::RateLimited(2)));
        assert_eq!(
            err.user_message(),
            "The store is busy, please try again in 2 seconds"
        );
    }

    #[test]
    fn test_session_messages_are_distinct() {
        let required = AppError::Order(OrderError::SessionRequired).user_message();
        let expired = AppError::Order(OrderError::SessionExpired).user_message();
        assert_ne!(required, expired);
        assert!(expired.contains("expired"));
    }

    #[test]
    fn test_cart_messages() {
        let err = AppError::Cart(CartError::LineNotFound(CartLineId::new("gid://shopify/CartLine/1")));
        assert_eq!(err.user_message(), "That item is not in your cart");
    }

    #[test]
    fn test_report_does_not_panic_without_client() {
        AppError::Shopify(ShopifyError::message("boom")).report();
        AppError::BadRequest("nope".to_string()).report();
    }
}
