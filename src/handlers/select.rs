//! SELECT command handler

use async_trait::async_trait;

use crate::command_handler::{CommandHandler, Outcome};
use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::grammar::{next_token, unquote};
use crate::protocol::Response;
use crate::session_context::SessionContext;
use crate::types::{flag_list, MessageFlag};

/// UIDVALIDITY reported for every mailbox; storage does not track one.
/// STATUS answers UIDVALIDITY 0 for the same mailbox, and the two differ
/// on purpose.
pub const UID_VALIDITY: u32 = 1;

/// Handler for the SELECT command
///
/// Selects a mailbox for access.
pub struct SelectHandler;

impl SelectHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SelectHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract a single mailbox-name argument.
pub(crate) fn mailbox_arg(command: &str, args: &str) -> Result<String> {
    let (name, rest) = next_token(args)
        .map_err(|_| Error::BadArguments(format!("{} requires a mailbox name", command)))?;
    if !rest.is_empty() {
        return Err(Error::BadArguments(format!(
            "{} takes a single mailbox name",
            command
        )));
    }
    Ok(unquote(name))
}

#[async_trait]
impl CommandHandler for SelectHandler {
    fn command_name(&self) -> &str {
        "SELECT"
    }

    async fn handle(
        &self,
        tag: &str,
        args: &str,
        connection: &mut Connection,
        context: &mut SessionContext,
    ) -> Result<Outcome> {
        // A failed SELECT must leave no mailbox selected
        context.deselect();

        let name = mailbox_arg("SELECT", args)?;
        let storage = context.storage()?;

        let mailbox = storage
            .get_mailbox(&name)
            .await
            .map_err(|e| {
                log::warn!("SELECT {:?}: {}", name, e);
                Error::Storage(e.to_string())
            })?
            .ok_or_else(|| Error::MailboxNotFound(name.clone()))?;
        let name = mailbox.name().to_string();

        let exists = storage
            .mailbox_count_all_messages(&name)
            .await
            .unwrap_or_else(|e| {
                log::warn!("SELECT {:?}: counting messages failed: {}", name, e);
                0
            });

        connection
            .write_response(&Response::untagged(format!(
                "FLAGS {}",
                flag_list(&MessageFlag::SYSTEM)
            )))
            .await?;
        connection
            .write_response(&Response::untagged(format!("{} EXISTS", exists)))
            .await?;
        connection
            .write_response(&Response::untagged("0 RECENT"))
            .await?;
        match storage.get_uid().await {
            Ok(uid_next) => {
                connection
                    .write_response(&Response::Ok {
                        tag: None,
                        message: format!("[UIDNEXT {}] Predicted next UID", uid_next),
                    })
                    .await?
            }
            Err(e) => log::warn!("SELECT {:?}: next UID unavailable: {}", name, e),
        }
        connection
            .write_response(&Response::Ok {
                tag: None,
                message: format!("[UIDVALIDITY {}] UIDs valid", UID_VALIDITY),
            })
            .await?;

        context.select(&name);
        Ok(Outcome::Continue(Response::ok(tag, "[READ-WRITE] SELECT")))
    }
}
