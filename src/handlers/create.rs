//! CREATE command handler

use async_trait::async_trait;

use crate::command_handler::{CommandHandler, Outcome};
use crate::connection::Connection;
use crate::error::Result;
use crate::handlers::select::mailbox_arg;
use crate::protocol::Response;
use crate::session_context::SessionContext;

/// Handler for the CREATE command
///
/// Creates a new mailbox.
pub struct CreateHandler;

impl CreateHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CreateHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for CreateHandler {
    fn command_name(&self) -> &str {
        "CREATE"
    }

    async fn handle(
        &self,
        tag: &str,
        args: &str,
        _connection: &mut Connection,
        context: &mut SessionContext,
    ) -> Result<Outcome> {
        let name = mailbox_arg("CREATE", args)?;

        if name.eq_ignore_ascii_case("INBOX") {
            return Ok(Outcome::Continue(Response::no(tag, "Can't CREATE an INBOX")));
        }

        let storage = context.storage()?;
        match storage.new_mailbox(&name).await {
            Ok(_) => {
                log::info!("Created mailbox {:?} for {:?}", name, context.username());
                Ok(Outcome::Continue(Response::ok(
                    tag,
                    format!("CREATE completed for {}", name),
                )))
            }
            Err(e) => {
                log::warn!("CREATE {:?} failed: {}", name, e);
                Ok(Outcome::Continue(Response::no(
                    tag,
                    format!("CREATE failed: {}", e),
                )))
            }
        }
    }
}
