//! CLOSE command handler

use async_trait::async_trait;

use crate::command_handler::{CommandHandler, Outcome};
use crate::connection::Connection;
use crate::error::Result;
use crate::protocol::Response;
use crate::session_context::SessionContext;

/// Handler for the CLOSE command
///
/// Releases the selected mailbox and ends the connection.
pub struct CloseHandler;

impl CloseHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CloseHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for CloseHandler {
    fn command_name(&self) -> &str {
        "CLOSE"
    }

    async fn handle(
        &self,
        tag: &str,
        _args: &str,
        _connection: &mut Connection,
        context: &mut SessionContext,
    ) -> Result<Outcome> {
        // TODO: expunge \Deleted messages once storage can remove them
        context.deselect();
        Ok(Outcome::Close(Response::ok(tag, "CLOSING")))
    }
}
