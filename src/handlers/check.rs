//! CHECK command handler

use async_trait::async_trait;

use crate::command_handler::{CommandHandler, Outcome};
use crate::connection::Connection;
use crate::error::Result;
use crate::protocol::Response;
use crate::session_context::SessionContext;

/// Handler for the CHECK command
///
/// Storage persists every change as it happens, so there is nothing to
/// checkpoint.
pub struct CheckHandler;

impl CheckHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CheckHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for CheckHandler {
    fn command_name(&self) -> &str {
        "CHECK"
    }

    async fn handle(
        &self,
        tag: &str,
        _args: &str,
        _connection: &mut Connection,
        _context: &mut SessionContext,
    ) -> Result<Outcome> {
        Ok(Outcome::Continue(Response::ok(tag, "CHECK")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_handler::CommandTier;
    use crate::handlers::test_support::Harness;

    #[tokio::test]
    async fn test_check_handler() {
        let handler = CheckHandler::new();
        assert_eq!(handler.command_name(), "CHECK");
        assert_eq!(handler.tier(), CommandTier::Authenticated);

        let mut harness = Harness::authenticated();
        let outcome = harness.run(&handler, "").await.unwrap();
        assert_eq!(outcome, Outcome::Continue(Response::ok("A1", "CHECK")));
    }
}
