//! Login provider trait and implementations
//!
//! A login provider verifies LOGIN credentials. On success it binds an
//! identity and a storage handle onto the session; the LOGIN handler treats
//! a bound identity as proof of success.

use async_trait::async_trait;

use crate::error::Result;
use crate::session_context::SessionContext;
use crate::types::Credentials;

pub mod r#impl;

/// Trait for authenticating IMAP connections
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Verify `credentials` and bind the user's identity and storage onto
    /// `context`. Any error leaves the session unauthenticated.
    async fn login(&self, context: &mut SessionContext, credentials: &Credentials) -> Result<()>;
}
