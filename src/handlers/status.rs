//! STATUS command handler

use async_trait::async_trait;

use crate::command_handler::{CommandHandler, Outcome};
use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::grammar::{astring, next_token, remove_parentheses_strict, unquote};
use crate::protocol::Response;
use crate::session_context::SessionContext;

/// A STATUS data item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusItem {
    Messages,
    Recent,
    Uidnext,
    Uidvalidity,
    Unseen,
}

impl StatusItem {
    fn parse(item: &str) -> Result<Self> {
        match item.to_ascii_uppercase().as_str() {
            "MESSAGES" => Ok(StatusItem::Messages),
            "RECENT" => Ok(StatusItem::Recent),
            "UIDNEXT" => Ok(StatusItem::Uidnext),
            "UIDVALIDITY" => Ok(StatusItem::Uidvalidity),
            "UNSEEN" => Ok(StatusItem::Unseen),
            _ => Err(Error::BadArguments(format!("Unknown STATUS item {}", item))),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            StatusItem::Messages => "MESSAGES",
            StatusItem::Recent => "RECENT",
            StatusItem::Uidnext => "UIDNEXT",
            StatusItem::Uidvalidity => "UIDVALIDITY",
            StatusItem::Unseen => "UNSEEN",
        }
    }
}

/// Handler for the STATUS command
///
/// Reports counters of a mailbox without selecting it. RECENT, UIDVALIDITY
/// and UNSEEN are not tracked by storage and always report 0.
pub struct StatusHandler;

impl StatusHandler {
    pub fn new() -> Self {
        Self
    }

    /// Parse STATUS command arguments
    ///
    /// Format: STATUS mailbox (item ...)
    fn parse_args(args: &str) -> Result<(String, Vec<StatusItem>)> {
        let (name, rest) = next_token(args)
            .map_err(|_| Error::BadArguments("STATUS requires a mailbox name".to_string()))?;
        let items = remove_parentheses_strict(rest.trim())?;

        let items = items
            .split_whitespace()
            .map(StatusItem::parse)
            .collect::<Result<Vec<_>>>()?;
        if items.is_empty() {
            return Err(Error::BadArguments("STATUS requires data items".to_string()));
        }

        Ok((unquote(name), items))
    }
}

impl Default for StatusHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for StatusHandler {
    fn command_name(&self) -> &str {
        "STATUS"
    }

    async fn handle(
        &self,
        tag: &str,
        args: &str,
        connection: &mut Connection,
        context: &mut SessionContext,
    ) -> Result<Outcome> {
        let (name, items) = Self::parse_args(args)?;
        let storage = context.storage()?;

        let mailbox = storage
            .get_mailbox(&name)
            .await
            .map_err(|e| {
                log::warn!("STATUS {:?}: {}", name, e);
                Error::Storage(e.to_string())
            })?
            .ok_or_else(|| Error::MailboxNotFound(name.clone()))?;
        let name = mailbox.name().to_string();

        let mut values = Vec::with_capacity(items.len());
        for item in items {
            let value = match item {
                StatusItem::Messages => storage.mailbox_count_all_messages(&name).await,
                StatusItem::Uidnext => storage.get_uid().await,
                StatusItem::Recent | StatusItem::Uidvalidity | StatusItem::Unseen => Ok(0),
            };
            match value {
                Ok(value) => values.push(format!("{} {}", item.name(), value)),
                Err(e) => log::warn!("STATUS {:?}: {} unavailable: {}", name, item.name(), e),
            }
        }

        connection
            .write_response(&Response::untagged(format!(
                "STATUS {} ({})",
                astring(&name),
                values.join(" ")
            )))
            .await?;
        Ok(Outcome::Continue(Response::ok(tag, "STATUS completed")))
    }
}
