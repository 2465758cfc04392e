//! CAPABILITY command handler

use async_trait::async_trait;

use crate::command_handler::{CommandHandler, CommandTier, Outcome};
use crate::connection::Connection;
use crate::error::Result;
use crate::protocol::Response;
use crate::session_context::SessionContext;

/// Capabilities advertised by the server
pub const CAPABILITIES: &[&str] = &["IMAP4rev1"];

/// Handler for the CAPABILITY command
///
/// Returns the list of capabilities supported by the server.
pub struct CapabilityHandler;

impl CapabilityHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CapabilityHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for CapabilityHandler {
    fn command_name(&self) -> &str {
        "CAPABILITY"
    }

    fn tier(&self) -> CommandTier {
        CommandTier::AnyState
    }

    async fn handle(
        &self,
        tag: &str,
        _args: &str,
        connection: &mut Connection,
        _context: &mut SessionContext,
    ) -> Result<Outcome> {
        connection
            .write_response(&Response::untagged(format!(
                "CAPABILITY {}",
                CAPABILITIES.join(" ")
            )))
            .await?;
        Ok(Outcome::Continue(Response::ok(tag, "CAPABILITY")))
    }
}
