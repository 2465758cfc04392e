//! LOGIN command handler

use async_trait::async_trait;
use std::sync::Arc;

use crate::command_handler::{CommandHandler, CommandTier, Outcome};
use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::grammar::{next_token, unquote};
use crate::protocol::Response;
use crate::session_context::SessionContext;
use crate::types::Credentials;

/// Handler for the LOGIN command
///
/// Authenticates a user with username and password.
pub struct LoginHandler;

impl LoginHandler {
    pub fn new() -> Self {
        Self
    }

    /// Parse LOGIN command arguments
    ///
    /// Format: LOGIN username password, either of which may be quoted
    fn parse_args(args: &str) -> Result<Credentials> {
        let invalid = || Error::BadArguments(format!("LOGIN expects user and password: {:?}", args));

        let (username, rest) = next_token(args).map_err(|_| invalid())?;
        let (password, rest) = next_token(rest).map_err(|_| invalid())?;
        if !rest.is_empty() {
            return Err(invalid());
        }

        Ok(Credentials {
            username: unquote(username),
            password: unquote(password),
        })
    }
}

impl Default for LoginHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for LoginHandler {
    fn command_name(&self) -> &str {
        "LOGIN"
    }

    fn tier(&self) -> CommandTier {
        CommandTier::NotAuthenticated
    }

    async fn handle(
        &self,
        tag: &str,
        args: &str,
        _connection: &mut Connection,
        context: &mut SessionContext,
    ) -> Result<Outcome> {
        let credentials = Self::parse_args(args)?;

        let authenticator = Arc::clone(&context.authenticator);
        if let Err(e) = authenticator.login(context, &credentials).await {
            log::warn!("LOGIN failed for {:?}: {}", credentials.username, e);
            return Err(match e {
                Error::AuthenticationFailed(_) => e,
                other => Error::AuthenticationFailed(other.to_string()),
            });
        }

        context.authenticate()?;
        log::info!("Logged in: {:?}", context.username());
        Ok(Outcome::Continue(Response::ok(tag, "LOGIN")))
    }
}
