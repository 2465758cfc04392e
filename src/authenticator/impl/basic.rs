//! Basic authenticator implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::authenticator::Authenticator;
use crate::error::{Error, Result};
use crate::session_context::SessionContext;
use crate::storage::Storage;
use crate::types::*;

struct Account {
    password: String,
    storage: Arc<dyn Storage>,
}

/// Authenticator backed by a static table of accounts
///
/// Each account carries its own storage, which is bound to the session on a
/// successful login.
#[derive(Default)]
pub struct BasicAuthenticator {
    accounts: HashMap<Username, Account>,
}

impl BasicAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account
    pub fn add_user(&mut self, username: &str, password: &str, storage: Arc<dyn Storage>) {
        self.accounts.insert(
            username.to_string(),
            Account {
                password: password.to_string(),
                storage,
            },
        );
    }

    /// Builder-style variant of `add_user`
    pub fn with_user(mut self, username: &str, password: &str, storage: Arc<dyn Storage>) -> Self {
        self.add_user(username, password, storage);
        self
    }
}

#[async_trait]
impl Authenticator for BasicAuthenticator {
    async fn login(&self, context: &mut SessionContext, credentials: &Credentials) -> Result<()> {
        let account = self
            .accounts
            .get(&credentials.username)
            .filter(|account| account.password == credentials.password)
            .ok_or_else(|| Error::AuthenticationFailed("invalid credentials".to_string()))?;

        account.storage.set_username(&credentials.username).await;
        context.bind(&credentials.username, Arc::clone(&account.storage));
        Ok(())
    }
}
