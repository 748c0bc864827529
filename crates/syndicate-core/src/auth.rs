//! Login-or-register bookkeeping on the local store.
//!
//! Passwords are stored and compared as plaintext. This is a convenience
//! gate on a shared machine, not a security boundary.
//!
//! # Keys
//!
//! | Key | Value |
//! |-----|-------|
//! | `tno_user` | Logged-in user of the saved session |
//! | `tno_pass` | Password of the saved session |
//! | `tno_pass_{name}` | Registered password for `name` |

use syndicate_store::{LocalStore, StoreError};

/// Key holding the saved session's user name.
pub const USER_KEY: &str = "tno_user";

/// Key holding the saved session's password.
pub const PASS_KEY: &str = "tno_pass";

/// Key holding the registered password for `name`.
pub fn password_key(name: &str) -> String {
    format!("tno_pass_{name}")
}

/// Why a login was refused.
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// User name or password was blank.
    #[error("Enter both username and password.")]
    MissingFields,

    /// The name is registered with a different password.
    #[error("Incorrect password.")]
    WrongPassword,

    /// The credentials could not be saved.
    #[error("Could not save login: {0}")]
    Store(#[from] StoreError),
}

/// Registered users and the saved session.
#[derive(Debug, Clone)]
pub struct Credentials {
    store: LocalStore,
}

impl Credentials {
    /// Keep credentials in `store`.
    pub const fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// The user of the saved session, when both its keys are present.
    pub fn saved_session(&self) -> Option<String> {
        let user = self.store.get_item(USER_KEY).filter(|u| !u.is_empty())?;
        self.store
            .get_item(PASS_KEY)
            .filter(|p| !p.is_empty())
            .map(|_| user)
    }

    /// Log `name` in, registering it on first use, and save the session.
    ///
    /// The name is trimmed; the password is taken as given. Returns the
    /// trimmed name.
    pub async fn login_or_register(&self, name: &str, password: &str) -> Result<String, LoginError> {
        let name = name.trim();
        if name.is_empty() || password.is_empty() {
            return Err(LoginError::MissingFields);
        }

        let key = password_key(name);
        match self.store.get_item(&key) {
            Some(stored) if !stored.is_empty() && stored != password => {
                return Err(LoginError::WrongPassword);
            }
            Some(stored) if !stored.is_empty() => {}
            _ => {
                self.store.set_item(&key, password).await?;
                tracing::info!(user = name, "Registered new user");
            }
        }

        self.store.set_item(USER_KEY, name).await?;
        self.store.set_item(PASS_KEY, password).await?;
        Ok(name.to_owned())
    }

    /// Forget the saved session. Registered passwords are kept.
    pub async fn forget_session(&self) -> Result<(), StoreError> {
        self.store.remove_item(USER_KEY).await?;
        self.store.remove_item(PASS_KEY).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_login_registers() {
        let creds = Credentials::new(LocalStore::in_memory());
        let name = creds.login_or_register("  alice ", "pw").await.unwrap();
        assert_eq!(name, "alice");
        assert_eq!(creds.store.get_item("tno_pass_alice").as_deref(), Some("pw"));
        assert_eq!(creds.saved_session().as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn wrong_password_is_refused() {
        let creds = Credentials::new(LocalStore::in_memory());
        creds.login_or_register("bob", "right").await.unwrap();
        creds.forget_session().await.unwrap();

        let err = creds.login_or_register("bob", "wrong").await.unwrap_err();
        assert!(matches!(err, LoginError::WrongPassword));
        assert!(creds.saved_session().is_none());

        assert!(creds.login_or_register("bob", "right").await.is_ok());
    }

    #[tokio::test]
    async fn blank_fields_are_refused() {
        let creds = Credentials::new(LocalStore::in_memory());
        assert!(matches!(
            creds.login_or_register("   ", "pw").await,
            Err(LoginError::MissingFields)
        ));
        assert!(matches!(
            creds.login_or_register("carol", "").await,
            Err(LoginError::MissingFields)
        ));
    }

    #[tokio::test]
    async fn saved_session_needs_both_keys() {
        let store = LocalStore::in_memory();
        let creds = Credentials::new(store.clone());
        store.set_item(USER_KEY, "dave").await.unwrap();
        assert!(creds.saved_session().is_none());
        store.set_item(PASS_KEY, "x").await.unwrap();
        assert_eq!(creds.saved_session().as_deref(), Some("dave"));
    }
}
