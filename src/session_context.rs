//! Session context for command handlers

use std::sync::Arc;

use crate::authenticator::Authenticator;
use crate::error::{Error, Result};
use crate::storage::Storage;
use crate::types::*;

/// Authentication stage of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotAuthenticated,
    Authenticated,
}

/// Per-connection state handed to every command handler
///
/// Owned by exactly one session loop and never shared. A selected mailbox
/// implies an authenticated session.
pub struct SessionContext {
    pub hostname: Arc<str>,
    pub authenticator: Arc<dyn Authenticator>,
    state: SessionState,
    username: Username,
    selected_mailbox: MailboxName,
    storage: Option<Arc<dyn Storage>>,
}

impl SessionContext {
    pub fn new(hostname: Arc<str>, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            hostname,
            authenticator,
            state: SessionState::NotAuthenticated,
            username: String::new(),
            selected_mailbox: String::new(),
            storage: None,
        }
    }

    /// Get the current session state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Check if the session is authenticated
    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    /// Bind an identity and its storage. Called by login providers.
    pub fn bind(&mut self, username: &str, storage: Arc<dyn Storage>) {
        self.username = username.to_string();
        self.storage = Some(storage);
    }

    /// The bound identity, empty until a login provider succeeds
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Move to the authenticated stage.
    ///
    /// Fails unless a login provider has bound a non-empty identity.
    pub fn authenticate(&mut self) -> Result<()> {
        if self.username.is_empty() || self.storage.is_none() {
            return Err(Error::AuthenticationFailed(
                "no identity was bound".to_string(),
            ));
        }
        self.state = SessionState::Authenticated;
        Ok(())
    }

    /// The selected mailbox, if any
    pub fn selected_mailbox(&self) -> Option<&str> {
        if self.selected_mailbox.is_empty() {
            None
        } else {
            Some(&self.selected_mailbox)
        }
    }

    pub fn select(&mut self, mailbox: &str) {
        debug_assert!(self.is_authenticated(), "selecting before authentication");
        self.selected_mailbox = mailbox.to_string();
    }

    pub fn deselect(&mut self) {
        self.selected_mailbox.clear();
    }

    /// The storage bound at login
    pub fn storage(&self) -> Result<Arc<dyn Storage>> {
        self.storage
            .clone()
            .ok_or_else(|| Error::Storage("no storage bound to session".to_string()))
    }

    /// The selected mailbox, or `NoMailboxSelected`
    pub fn require_selected(&self) -> Result<MailboxName> {
        self.selected_mailbox()
            .map(str::to_string)
            .ok_or(Error::NoMailboxSelected)
    }
}
