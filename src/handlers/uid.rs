//! UID command handler

use async_trait::async_trait;

use crate::command_handler::{CommandHandler, Outcome};
use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::handlers::fetch::run_fetch;
use crate::protocol::Response;
use crate::session_context::SessionContext;

/// Handler for the UID command
///
/// Only `UID FETCH` is supported; it shares the FETCH machinery with UIDs
/// in place of sequence numbers.
pub struct UidHandler;

impl UidHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UidHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for UidHandler {
    fn command_name(&self) -> &str {
        "UID"
    }

    async fn handle(
        &self,
        tag: &str,
        args: &str,
        connection: &mut Connection,
        context: &mut SessionContext,
    ) -> Result<Outcome> {
        let (subcommand, rest) = args.trim_start().split_once(' ').unwrap_or((args.trim(), ""));

        if !subcommand.eq_ignore_ascii_case("FETCH") {
            return Err(Error::BadArguments(format!(
                "Invalid command: UID {}",
                subcommand
            )));
        }

        run_fetch(tag, rest, connection, context, true).await
    }
}
