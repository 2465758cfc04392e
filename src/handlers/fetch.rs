//! FETCH command handler

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::command_handler::{CommandHandler, Outcome};
use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::fetch_data;
use crate::grammar::{next_token, parse_fetch_items, parse_sequence_set, SequenceSpecifier};
use crate::protocol::Response;
use crate::session_context::SessionContext;
use crate::storage::{Message, Storage};
use crate::types::{SequenceNumber, Uid};

/// Handler for the FETCH command
///
/// Addresses messages by sequence number within the selected mailbox.
pub struct FetchHandler;

impl FetchHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FetchHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for FetchHandler {
    fn command_name(&self) -> &str {
        "FETCH"
    }

    async fn handle(
        &self,
        tag: &str,
        args: &str,
        connection: &mut Connection,
        context: &mut SessionContext,
    ) -> Result<Outcome> {
        run_fetch(tag, args, connection, context, false).await
    }
}

fn storage_error(mailbox: &str) -> impl Fn(Error) -> Error + '_ {
    move |e| {
        log::warn!("FETCH in {:?}: {}", mailbox, e);
        Error::Storage(e.to_string())
    }
}

/// Resolve a sequence set of UIDs through the storage range queries.
async fn messages_by_uid(
    storage: &Arc<dyn Storage>,
    mailbox: &str,
    set: &[SequenceSpecifier],
) -> Result<Vec<Arc<dyn Message>>> {
    let mut found: BTreeMap<Uid, Arc<dyn Message>> = BTreeMap::new();

    for spec in set {
        let messages = match *spec {
            SequenceSpecifier::RangeToEnd(start) => {
                storage.mailbox_find_messages_after_uid(mailbox, start).await
            }
            SequenceSpecifier::Range(start, end) => {
                storage
                    .mailbox_find_messages_from_to_uid(mailbox, start, end)
                    .await
            }
            SequenceSpecifier::All => storage.mailbox_find_all_messages(mailbox).await,
            SequenceSpecifier::Single(uid) => storage
                .mailbox_find_message_by_uid(mailbox, uid)
                .await
                .map(|m| m.into_iter().collect()),
        }
        .map_err(storage_error(mailbox))?;

        for message in messages {
            found.entry(message.uid()).or_insert(message);
        }
    }

    Ok(found.into_values().collect())
}

/// Shared body of FETCH and UID FETCH.
///
/// With `by_uid` the sequence set names UIDs and every response carries the
/// UID item; otherwise it names 1-based positions in the mailbox.
pub(crate) async fn run_fetch(
    tag: &str,
    args: &str,
    connection: &mut Connection,
    context: &mut SessionContext,
    by_uid: bool,
) -> Result<Outcome> {
    let command = if by_uid { "UID FETCH" } else { "FETCH" };
    let mailbox = context.require_selected()?;

    let (set, items) = next_token(args)
        .map_err(|_| Error::BadArguments(format!("{} requires a sequence set", command)))?;
    let set = parse_sequence_set(set)?;
    let options = parse_fetch_items(items)?;

    let storage = context.storage()?;
    let all = storage
        .mailbox_find_all_messages(&mailbox)
        .await
        .map_err(storage_error(&mailbox))?;

    let selected: Vec<(SequenceNumber, Arc<dyn Message>)> = if by_uid {
        let positions: BTreeMap<Uid, SequenceNumber> = all
            .iter()
            .enumerate()
            .map(|(i, m)| (m.uid(), i as SequenceNumber + 1))
            .collect();
        messages_by_uid(&storage, &mailbox, &set)
            .await?
            .into_iter()
            .filter_map(|m| positions.get(&m.uid()).map(|&seq| (seq, m)))
            .collect()
    } else {
        all.into_iter()
            .enumerate()
            .map(|(i, m)| (i as SequenceNumber + 1, m))
            .filter(|(seq, _)| set.iter().any(|spec| spec.contains(*seq)))
            .collect()
    };

    for (seq, message) in &selected {
        let line = fetch_data::render(*seq, message.as_ref(), &options, by_uid);
        log::debug!("S: {}", String::from_utf8_lossy(&line).trim_end());
        connection.write_all(&line).await?;
    }

    Ok(Outcome::Continue(Response::ok(
        tag,
        format!("{} completed", command),
    )))
}
