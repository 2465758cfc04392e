//! NOOP command handler

use async_trait::async_trait;

use crate::command_handler::{CommandHandler, CommandTier, Outcome};
use crate::connection::Connection;
use crate::error::Result;
use crate::protocol::Response;
use crate::session_context::SessionContext;

/// Handler for the NOOP command
///
/// Does nothing successfully. Can be used as a keepalive.
pub struct NoopHandler;

impl NoopHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoopHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for NoopHandler {
    fn command_name(&self) -> &str {
        "NOOP"
    }

    fn tier(&self) -> CommandTier {
        CommandTier::AnyState
    }

    async fn handle(
        &self,
        tag: &str,
        _args: &str,
        _connection: &mut Connection,
        _context: &mut SessionContext,
    ) -> Result<Outcome> {
        Ok(Outcome::Continue(Response::ok(tag, "NOOP")))
    }
}
