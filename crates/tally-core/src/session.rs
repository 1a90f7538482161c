//! Session guard: tracks the authenticated identity for the process
//!
//! The guard is an explicit value owned by the server state and handed to
//! every tool invocation; there is no module-level global. One identity is
//! active at a time: `login` replaces it, `logout` clears it, `register`
//! never touches it.

use std::sync::Mutex;

use sha2::{Digest, Sha256};
use tracing::info;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::Identity;

/// SHA-256 hex digest of a password
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

#[derive(Debug, Default)]
pub struct SessionGuard {
    current: Mutex<Option<Identity>>,
}

impl SessionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a user account. Does not authenticate.
    pub fn register(&self, db: &Database, username: &str, password: &str) -> Result<()> {
        db.create_user(username, &hash_password(password))?;
        info!(username, "user registered");
        Ok(())
    }

    /// Authenticate and set the current identity
    pub fn login(&self, db: &Database, username: &str, password: &str) -> Result<Identity> {
        let user = db
            .find_user(username)?
            .filter(|u| u.password_hash == hash_password(password))
            .ok_or(Error::InvalidCredentials)?;

        let identity = Identity {
            user_id: user.id,
            username: user.username,
        };
        *self.current.lock().unwrap() = Some(identity.clone());
        info!(username, "logged in");
        Ok(identity)
    }

    /// Clear the current identity; always succeeds
    pub fn logout(&self) {
        *self.current.lock().unwrap() = None;
        info!("logged out");
    }

    /// The current identity, or `NotAuthenticated`
    ///
    /// Every ledger operation calls this before touching the store.
    pub fn require(&self) -> Result<Identity> {
        self.current
            .lock()
            .unwrap()
            .clone()
            .ok_or(Error::NotAuthenticated)
    }
}
