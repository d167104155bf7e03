//! Customer account service.
//!
//! Signs customers in and out with Storefront API customer access tokens.
//! The session record is persisted in the key-value store and every change
//! is announced on the auth-changed signal.

mod error;

pub use error::AuthError;

use std::sync::Arc;

use tracing::{info, instrument, warn};

use shopfront_core::{Email, ShopperKey};

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::events::AuthEvents;
use crate::session::{CurrentUser, SessionStore};
use crate::shopify::{CustomerApi, CustomerCreateInput, ShopifyError};
use crate::storage::KeyValueStore;

/// Minimum password length accepted by Shopify.
const MIN_PASSWORD_LENGTH: usize = 5;

/// Details for a new customer account.
#[derive(Clone, Default)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub accepts_marketing: bool,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("accepts_marketing", &self.accepts_marketing)
            .finish()
    }
}

/// Login, logout and registration against the Storefront API.
#[derive(Clone)]
pub struct AccountService {
    customers: Arc<dyn CustomerApi>,
    session: SessionStore,
    events: AuthEvents,
}

impl AccountService {
    /// Create a new account service.
    #[must_use]
    pub fn new(
        customers: Arc<dyn CustomerApi>,
        store: Arc<dyn KeyValueStore>,
        events: AuthEvents,
    ) -> Self {
        Self {
            customers,
            session: SessionStore::new(store),
            events,
        }
    }

    /// Sign in with email and password.
    ///
    /// On success the session is persisted and the auth change published.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::InvalidCredentials` if Shopify rejects the credentials.
    #[instrument(skip(self, email, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentUser, AuthError> {
        let email = Email::parse(email)?;
        if password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self
            .customers
            .create_access_token(&email, password)
            .await
            .map_err(|e| match e {
                ShopifyError::Unauthorized(_) => AuthError::InvalidCredentials,
                other => AuthError::Remote(other),
            })?;

        let customer = self
            .customers
            .customer(&token.access_token)
            .await?
            .ok_or(AuthError::CustomerNotFound)?;

        let user = CurrentUser {
            customer_id: customer.id,
            email: customer.email.unwrap_or(email),
            first_name: customer.first_name,
            last_name: customer.last_name,
            access_token: token.access_token,
            expires_at: token.expires_at,
        };

        self.session.set_current_user(&user)?;
        set_sentry_user(&user.customer_id, Some(user.email.as_str()));
        self.events.publish(user.shopper_key());

        info!(customer_id = %user.customer_id, "Customer logged in");
        Ok(user)
    }

    /// Sign out.
    ///
    /// The access token is revoked on a best-effort basis; the local session
    /// is cleared regardless.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be cleared.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), AuthError> {
        if let Some(user) = self.session.current_user()? {
            if let Err(e) = self.customers.delete_access_token(&user.access_token).await {
                warn!(error = %e, "Failed to revoke customer access token");
            }
            info!(customer_id = %user.customer_id, "Customer logged out");
        }

        self.session.clear()?;
        clear_sentry_user();
        self.events.publish(ShopperKey::Guest);
        Ok(())
    }

    /// Create an account, then sign in with it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password is too short.
    /// Returns `AuthError::CustomerAlreadyExists` if the email is already registered.
    #[instrument(skip(self, registration))]
    pub async fn register(&self, registration: &Registration) -> Result<CurrentUser, AuthError> {
        let email = Email::parse(&registration.email)?;
        validate_password(&registration.password)?;

        let input = CustomerCreateInput {
            email: email.clone(),
            password: registration.password.clone(),
            first_name: non_empty(registration.first_name.as_deref()),
            last_name: non_empty(registration.last_name.as_deref()),
            accepts_marketing: Some(registration.accepts_marketing),
        };

        let customer = self
            .customers
            .create_customer(&input)
            .await
            .map_err(|e| match e {
                ShopifyError::Conflict(_) => AuthError::CustomerAlreadyExists,
                other => AuthError::Remote(other),
            })?;
        info!(customer_id = %customer.id, "Customer registered");

        self.login(email.as_str(), &registration.password).await
    }

    /// The persisted session, if any. May be expired.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read.
    pub fn current_user(&self) -> Result<Option<CurrentUser>, AuthError> {
        Ok(self.session.current_user()?)
    }
}

/// Validate password requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if password.trim() != password {
        return Err(AuthError::WeakPassword(
            "password cannot start or end with whitespace".to_string(),
        ));
    }
    Ok(())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::testing::FakeCommerce;

    struct Fixture {
        fake: Arc<FakeCommerce>,
        events: AuthEvents,
        accounts: AccountService,
    }

    fn fixture() -> Fixture {
        let fake = Arc::new(FakeCommerce::new());
        let events = AuthEvents::new();
        let accounts = AccountService::new(fake.clone(), Arc::new(MemoryStore::new()), events.clone());
        Fixture {
            fake,
            events,
            accounts,
        }
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("12345").is_ok());
        assert!(matches!(
            validate_password("1234"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(matches!(
            validate_password(" secret"),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[tokio::test]
    async fn test_login_persists_session_and_publishes() {
        let f = fixture();
        let email = Email::parse("ada@example.com").unwrap();
        let customer_id = f.fake.add_customer(&email, "hunter22", Some("Ada"));
        let mut subscription = f.events.subscribe();

        let user = f.accounts.login("ada@example.com", "hunter22").await.unwrap();

        assert_eq!(user.customer_id, customer_id);
        assert_eq!(user.first_name.as_deref(), Some("Ada"));
        assert_eq!(f.accounts.current_user().unwrap(), Some(user));
        assert!(subscription.drain());
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let f = fixture();
        let email = Email::parse("ada@example.com").unwrap();
        f.fake.add_customer(&email, "hunter22", None);

        let result = f.accounts.login("ada@example.com", "wrong").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        assert!(f.accounts.current_user().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_invalid_email_skips_remote() {
        let f = fixture();
        let result = f.accounts.login("not-an-email", "hunter22").await;
        assert!(matches!(result, Err(AuthError::InvalidEmail(_))));
        assert_eq!(f.fake.calls("create_access_token"), 0);
    }

    #[tokio::test]
    async fn test_logout_revokes_token_and_clears_session() {
        let f = fixture();
        let email = Email::parse("ada@example.com").unwrap();
        f.fake.add_customer(&email, "hunter22", None);
        let user = f.accounts.login("ada@example.com", "hunter22").await.unwrap();
        let mut subscription = f.events.subscribe();

        f.accounts.logout().await.unwrap();

        assert!(f.accounts.current_user().unwrap().is_none());
        assert_eq!(f.fake.deleted_tokens(), vec![user.access_token]);
        assert!(subscription.drain());
    }

    #[tokio::test]
    async fn test_logout_survives_revocation_failure() {
        let f = fixture();
        let email = Email::parse("ada@example.com").unwrap();
        f.fake.add_customer(&email, "hunter22", None);
        f.accounts.login("ada@example.com", "hunter22").await.unwrap();

        f.fake.fail_next("Service unavailable");
        f.accounts.logout().await.unwrap();
        assert!(f.accounts.current_user().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_register_then_logged_in() {
        let f = fixture();
        let registration = Registration {
            email: "grace@example.com".to_string(),
            password: "cobol1959".to_string(),
            first_name: Some("Grace".to_string()),
            last_name: Some("  ".to_string()),
            accepts_marketing: false,
        };

        let user = f.accounts.register(&registration).await.unwrap();
        assert_eq!(user.email.as_str(), "grace@example.com");
        assert_eq!(user.last_name, None);

        let again = f.accounts.register(&registration).await;
        assert!(matches!(again, Err(AuthError::CustomerAlreadyExists)));
    }

    #[tokio::test]
    async fn test_register_weak_password() {
        let f = fixture();
        let registration = Registration {
            email: "grace@example.com".to_string(),
            password: "abc".to_string(),
            ..Registration::default()
        };
        let result = f.accounts.register(&registration).await;
        assert!(matches!(result, Err(AuthError::WeakPassword(_))));
        assert_eq!(f.fake.calls("create_customer"), 0);
    }

    #[test]
    fn test_registration_debug_redacts_password() {
        let registration = Registration {
            email: "grace@example.com".to_string(),
            password: "cobol1959".to_string(),
            ..Registration::default()
        };
        let output = format!("{registration:?}");
        assert!(!output.contains("cobol1959"));
    }
}
