//! Fake authentication over the key-value store.
//!
//! Registration stores the credentials locally and login compares against
//! them. Nothing here is secure, and that is the point: the login state only
//! exists to gate history persistence.

mod validation;

pub use validation::{PasswordCheck, verify_email, verify_password};

use crate::storage::{KeyValueStore, keys};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// The fixed marker written on successful login.
const AUTH_TOKEN: &str = "1234567890abcdef";

/// Locally stored user record.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct StoredUser {
    pub email: String,
    pub password: String,
}

/// Authentication failures.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("the email address is invalid")]
    InvalidEmail,
    #[error("the password does not meet the requirements")]
    InvalidPassword(PasswordCheck),
    #[error("the credentials are invalid")]
    InvalidCredentials,
    #[error("failed to store credentials: {0}")]
    Storage(String),
}

/// Registration and login over a shared store.
#[derive(Clone)]
pub struct AuthManager {
    store: Arc<dyn KeyValueStore>,
}

impl AuthManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Register a user, validating the email and password first. The failed
    /// password checks are carried in the error so callers can list them.
    pub fn register(&self, email: &str, password: &str) -> Result<(), AuthError> {
        if !verify_email(email) {
            return Err(AuthError::InvalidEmail);
        }
        let check = verify_password(password);
        if !check.pass {
            return Err(AuthError::InvalidPassword(check));
        }

        let user = StoredUser {
            email: email.to_string(),
            password: password.to_string(),
        };
        let json = serde_json::to_string(&user).map_err(|e| AuthError::Storage(e.to_string()))?;
        self.store.set(keys::USER, &json);
        debug!(email, "user registered");
        Ok(())
    }

    /// Compare credentials against the stored record and mark the session
    /// logged in. An absent record and a mismatch are indistinguishable.
    pub fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let stored = self
            .store
            .get(keys::USER)
            .and_then(|json| serde_json::from_str::<StoredUser>(&json).ok())
            .ok_or(AuthError::InvalidCredentials)?;

        if stored.email != email || stored.password != password {
            return Err(AuthError::InvalidCredentials);
        }
        self.store.set(keys::TOKEN, AUTH_TOKEN);
        debug!(email, "user logged in");
        Ok(())
    }

    /// Drop the login marker.
    pub fn logout(&self) {
        self.store.remove(keys::TOKEN);
        debug!("user logged out");
    }

    /// Remove the user record along with the session and its history.
    pub fn unregister(&self) {
        self.store.remove(keys::USER);
        self.store.remove(keys::TOKEN);
        self.store.remove(keys::HISTORY);
        debug!("user unregistered");
    }

    pub fn is_registered(&self) -> bool {
        self.store.get(keys::USER).is_some()
    }

    pub fn is_logged_in(&self) -> bool {
        self.store.get(keys::TOKEN).is_some()
    }
}
