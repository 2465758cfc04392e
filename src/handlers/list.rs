//! LIST command handler

use async_trait::async_trait;
use std::sync::Arc;

use crate::command_handler::{CommandHandler, Outcome};
use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::grammar::{astring, next_token, quote, unquote};
use crate::protocol::Response;
use crate::session_context::SessionContext;
use crate::storage::Storage;
use crate::types::HIERARCHY_DELIMITER;

/// Handler for the LIST command
///
/// Lists mailboxes matching a pattern. Only the empty reference name is
/// supported.
pub struct ListHandler;

impl ListHandler {
    pub fn new() -> Self {
        Self
    }

    /// Parse LIST command arguments
    ///
    /// Format: LIST reference mailbox-pattern
    fn parse_args(args: &str) -> Option<(String, String)> {
        let (reference, rest) = next_token(args).ok()?;
        let (pattern, rest) = next_token(rest).ok()?;
        if !rest.is_empty() {
            return None;
        }
        Some((unquote(reference), unquote(pattern)))
    }
}

impl Default for ListHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// One `* LIST`/`* LSUB` line for `name`.
pub(crate) fn mailbox_line(kind: &str, name: &str) -> Response {
    Response::untagged(format!(
        "{} () {} {}",
        kind,
        quote(HIERARCHY_DELIMITER),
        astring(name)
    ))
}

/// Write one line per mailbox whose name satisfies `filter`.
pub(crate) async fn write_mailboxes(
    kind: &str,
    storage: &Arc<dyn Storage>,
    connection: &mut Connection,
    filter: impl Fn(&str) -> bool + Send,
) -> Result<()> {
    let mailboxes = storage.get_mailboxes().await.map_err(|e| {
        log::warn!("{}: listing mailboxes failed: {}", kind, e);
        Error::Storage(e.to_string())
    })?;

    for mailbox in mailboxes.iter().filter(|mb| filter(mb.name())) {
        connection
            .write_response(&mailbox_line(kind, mailbox.name()))
            .await?;
    }
    Ok(())
}

/// Match a mailbox name against a LIST pattern.
///
/// `*` matches any run of characters; `%` matches any run that does not
/// cross the hierarchy delimiter.
pub(crate) fn pattern_matches(pattern: &str, name: &str) -> bool {
    let name: Vec<char> = name.chars().collect();

    // row[j]: the pattern consumed so far matches the first j name characters
    let mut row = vec![false; name.len() + 1];
    row[0] = true;
    for p in pattern.chars() {
        let mut next = vec![false; name.len() + 1];
        match p {
            '*' | '%' => {
                next[0] = row[0];
                for j in 1..=name.len() {
                    let crosses = p == '%' && HIERARCHY_DELIMITER.starts_with(name[j - 1]);
                    next[j] = row[j] || (next[j - 1] && !crosses);
                }
            }
            c => {
                for j in 1..=name.len() {
                    next[j] = row[j - 1] && name[j - 1] == c;
                }
            }
        }
        row = next;
    }
    row[name.len()]
}

#[async_trait]
impl CommandHandler for ListHandler {
    fn command_name(&self) -> &str {
        "LIST"
    }

    async fn handle(
        &self,
        tag: &str,
        args: &str,
        connection: &mut Connection,
        context: &mut SessionContext,
    ) -> Result<Outcome> {
        let (reference, pattern) = Self::parse_args(args)
            .ok_or_else(|| Error::BadArguments("LIST expects reference and pattern".to_string()))?;

        if !reference.is_empty() {
            return Ok(Outcome::Continue(Response::bad(
                tag,
                "Reference names not allowed",
            )));
        }

        let storage = context.storage()?;

        if pattern.is_empty() {
            connection
                .write_response(&Response::untagged(format!(
                    "LIST (\\Noselect) {} \"\"",
                    quote(HIERARCHY_DELIMITER)
                )))
                .await?;
        } else if pattern == "*" {
            write_mailboxes("LIST", &storage, connection, |_| true).await?;
        } else if pattern.eq_ignore_ascii_case("INBOX") {
            connection
                .write_response(&mailbox_line("LIST", "INBOX"))
                .await?;
        } else if pattern.contains(['*', '%']) {
            write_mailboxes("LIST", &storage, connection, |name| {
                pattern_matches(&pattern, name)
            })
            .await?;
        } else {
            let mailbox = storage
                .get_mailbox(&pattern)
                .await
                .map_err(|e| {
                    log::warn!("LIST {:?}: {}", pattern, e);
                    Error::Storage(e.to_string())
                })?
                .ok_or_else(|| Error::MailboxNotFound(pattern.clone()))?;
            connection
                .write_response(&mailbox_line("LIST", mailbox.name()))
                .await?;
        }

        Ok(Outcome::Continue(Response::ok(tag, "LIST")))
    }
}
