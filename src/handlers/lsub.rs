//! LSUB command handler

use async_trait::async_trait;

use crate::command_handler::{CommandHandler, Outcome};
use crate::connection::Connection;
use crate::error::Result;
use crate::handlers::list::write_mailboxes;
use crate::protocol::Response;
use crate::session_context::SessionContext;

/// Handler for the LSUB command
///
/// There is no subscription model; every mailbox counts as subscribed.
pub struct LsubHandler;

impl LsubHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LsubHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for LsubHandler {
    fn command_name(&self) -> &str {
        "LSUB"
    }

    async fn handle(
        &self,
        tag: &str,
        _args: &str,
        connection: &mut Connection,
        context: &mut SessionContext,
    ) -> Result<Outcome> {
        let storage = context.storage()?;
        write_mailboxes("LSUB", &storage, connection, |_| true).await?;
        Ok(Outcome::Continue(Response::ok(tag, "LSUB")))
    }
}
