//! Command handler trait for IMAP commands

use async_trait::async_trait;

use crate::connection::Connection;
use crate::error::Result;
use crate::protocol::Response;
use crate::session_context::{SessionContext, SessionState};

/// The session stages in which a command may run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandTier {
    /// CAPABILITY, NOOP, LOGOUT
    AnyState,
    /// LOGIN
    NotAuthenticated,
    /// Everything that touches storage
    Authenticated,
}

impl CommandTier {
    pub fn allows(&self, state: SessionState) -> bool {
        match self {
            CommandTier::AnyState => true,
            CommandTier::NotAuthenticated => state == SessionState::NotAuthenticated,
            CommandTier::Authenticated => state == SessionState::Authenticated,
        }
    }
}

/// What the session loop does after a handler returns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Send the tagged completion and read the next command
    Continue(Response),
    /// Send the tagged completion and close the connection
    Close(Response),
}

impl Outcome {
    pub fn response(&self) -> &Response {
        match self {
            Outcome::Continue(response) | Outcome::Close(response) => response,
        }
    }
}

/// Trait for handling IMAP commands
///
/// A handler writes any untagged data lines itself and returns the tagged
/// completion. Recoverable errors are answered by the session loop with the
/// command's tag, so a handler never has to send one on the error path.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// The verb this handler processes (e.g., "CAPABILITY")
    fn command_name(&self) -> &str;

    /// The session stages in which the command is legal
    fn tier(&self) -> CommandTier {
        CommandTier::Authenticated
    }

    /// Handle the command
    ///
    /// # Arguments
    /// * `tag` - The command tag from the client
    /// * `args` - Everything after the verb, untokenized
    /// * `connection` - For untagged response lines
    /// * `context` - The session state
    async fn handle(
        &self,
        tag: &str,
        args: &str,
        connection: &mut Connection,
        context: &mut SessionContext,
    ) -> Result<Outcome>;
}
