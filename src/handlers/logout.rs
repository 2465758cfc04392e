//! LOGOUT command handler

use async_trait::async_trait;

use crate::command_handler::{CommandHandler, CommandTier, Outcome};
use crate::connection::Connection;
use crate::error::Result;
use crate::protocol::Response;
use crate::session_context::SessionContext;

/// Handler for the LOGOUT command
///
/// Sends BYE and closes the connection gracefully, whatever the stage.
pub struct LogoutHandler;

impl LogoutHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogoutHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for LogoutHandler {
    fn command_name(&self) -> &str {
        "LOGOUT"
    }

    fn tier(&self) -> CommandTier {
        CommandTier::AnyState
    }

    async fn handle(
        &self,
        tag: &str,
        _args: &str,
        connection: &mut Connection,
        context: &mut SessionContext,
    ) -> Result<Outcome> {
        connection
            .write_response(&Response::Bye {
                message: format!("{} logging out", context.hostname),
            })
            .await?;
        context.deselect();
        Ok(Outcome::Close(Response::ok(tag, "LOGOUT")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::Harness;

    #[tokio::test]
    async fn test_logout_handler() {
        let handler = LogoutHandler::new();
        assert_eq!(handler.command_name(), "LOGOUT");
        assert_eq!(handler.tier(), CommandTier::AnyState);

        let mut harness = Harness::new();
        let outcome = harness.run(&handler, "").await.unwrap();
        assert_eq!(outcome, Outcome::Close(Response::ok("A1", "LOGOUT")));
        assert_eq!(harness.lines().await, vec!["* BYE localhost logging out"]);
    }
}
