//! In-memory storage implementation
//!
//! Backs the demo binary and the test suite. Mailboxes live in a single
//! lock-protected state; the UID counter is shared by all mailboxes of the
//! user so UIDs never repeat.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::headers;
use crate::storage::{Mailbox, Message, Storage};
use crate::types::*;

const INBOX: &str = "INBOX";

#[derive(Debug)]
struct MemoryMailbox {
    name: MailboxName,
}

impl Mailbox for MemoryMailbox {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A message held entirely in memory
#[derive(Debug, Clone)]
pub struct MemoryMessage {
    uid: Uid,
    flags: Vec<MessageFlag>,
    date: DateTime<FixedOffset>,
    header: Vec<u8>,
    text: Vec<u8>,
}

impl MemoryMessage {
    /// Split a raw RFC 5322 message into header and body.
    pub fn parse(uid: Uid, raw: &[u8], flags: Vec<MessageFlag>, date: DateTime<FixedOffset>) -> Self {
        let split = find_header_end(raw).unwrap_or(raw.len());
        Self {
            uid,
            flags,
            date,
            header: raw[..split].to_vec(),
            text: raw[split..].to_vec(),
        }
    }
}

fn find_header_end(raw: &[u8]) -> Option<usize> {
    if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
        return Some(pos + 4);
    }
    raw.windows(2).position(|w| w == b"\n\n").map(|pos| pos + 2)
}

impl Message for MemoryMessage {
    fn uid(&self) -> Uid {
        self.uid
    }

    fn flags(&self) -> Vec<MessageFlag> {
        self.flags.clone()
    }

    fn from(&self) -> Option<Address> {
        headers::value(&self.header, "From").and_then(|v| Address::parse_mailbox(&v))
    }

    fn date(&self) -> DateTime<FixedOffset> {
        self.date
    }

    fn header_size(&self) -> u32 {
        self.header.len() as u32
    }

    fn body_size(&self) -> u32 {
        self.text.len() as u32
    }

    fn header(&self) -> &[u8] {
        &self.header
    }

    fn text(&self) -> &[u8] {
        &self.text
    }
}

struct State {
    mailboxes: Vec<(Arc<MemoryMailbox>, Vec<Arc<MemoryMessage>>)>,
    next_uid: Uid,
}

impl State {
    fn canonical_name(name: &str) -> &str {
        if name.eq_ignore_ascii_case(INBOX) {
            INBOX
        } else {
            name
        }
    }

    fn find(&self, name: &str) -> Option<&(Arc<MemoryMailbox>, Vec<Arc<MemoryMessage>>)> {
        let name = Self::canonical_name(name);
        self.mailboxes.iter().find(|(mb, _)| mb.name == name)
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut (Arc<MemoryMailbox>, Vec<Arc<MemoryMessage>>)> {
        let name = Self::canonical_name(name);
        self.mailboxes.iter_mut().find(|(mb, _)| mb.name == name)
    }

    fn messages(&self, name: &str) -> Result<&[Arc<MemoryMessage>]> {
        self.find(name)
            .map(|(_, messages)| messages.as_slice())
            .ok_or_else(|| Error::MailboxNotFound(name.to_string()))
    }
}

/// In-memory storage for a single user
pub struct InMemoryStorage {
    username: RwLock<Username>,
    state: RwLock<State>,
}

impl InMemoryStorage {
    /// Create a storage holding only an empty INBOX
    pub fn new() -> Self {
        Self {
            username: RwLock::new(String::new()),
            state: RwLock::new(State {
                mailboxes: vec![(
                    Arc::new(MemoryMailbox {
                        name: INBOX.to_string(),
                    }),
                    Vec::new(),
                )],
                next_uid: 1,
            }),
        }
    }

    /// Store a raw message in `mailbox`, returning its UID
    pub async fn append(&self, mailbox: &str, raw: &[u8], flags: Vec<MessageFlag>) -> Result<Uid> {
        self.append_dated(mailbox, raw, flags, Utc::now().into()).await
    }

    /// Store a raw message with an explicit internal date
    pub async fn append_dated(
        &self,
        mailbox: &str,
        raw: &[u8],
        flags: Vec<MessageFlag>,
        date: DateTime<FixedOffset>,
    ) -> Result<Uid> {
        let mut state = self.state.write().await;
        let uid = state.next_uid;
        let (_, messages) = state
            .find_mut(mailbox)
            .ok_or_else(|| Error::MailboxNotFound(mailbox.to_string()))?;
        messages.push(Arc::new(MemoryMessage::parse(uid, raw, flags, date)));
        state.next_uid += 1;
        Ok(uid)
    }

    fn collect<'a>(
        messages: impl Iterator<Item = &'a Arc<MemoryMessage>>,
    ) -> Vec<Arc<dyn Message>> {
        messages
            .map(|m| Arc::clone(m) as Arc<dyn Message>)
            .collect()
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn set_username(&self, username: &str) {
        *self.username.write().await = username.to_string();
    }

    async fn username(&self) -> Username {
        self.username.read().await.clone()
    }

    async fn new_mailbox(&self, name: &str) -> Result<Arc<dyn Mailbox>> {
        if name.is_empty() {
            return Err(Error::Storage("empty mailbox name".to_string()));
        }

        let mut state = self.state.write().await;
        if state.find(name).is_some() {
            return Err(Error::Storage(format!("mailbox {:?} already exists", name)));
        }

        let mailbox = Arc::new(MemoryMailbox {
            name: name.to_string(),
        });
        state.mailboxes.push((Arc::clone(&mailbox), Vec::new()));
        Ok(mailbox)
    }

    async fn get_mailboxes(&self) -> Result<Vec<Arc<dyn Mailbox>>> {
        let state = self.state.read().await;
        Ok(state
            .mailboxes
            .iter()
            .map(|(mb, _)| Arc::clone(mb) as Arc<dyn Mailbox>)
            .collect())
    }

    async fn get_mailbox(&self, name: &str) -> Result<Option<Arc<dyn Mailbox>>> {
        let state = self.state.read().await;
        Ok(state
            .find(name)
            .map(|(mb, _)| Arc::clone(mb) as Arc<dyn Mailbox>))
    }

    async fn mailbox_count_all_messages(&self, mailbox: &str) -> Result<u32> {
        let state = self.state.read().await;
        Ok(state.messages(mailbox)?.len() as u32)
    }

    async fn mailbox_find_messages_after_uid(
        &self,
        mailbox: &str,
        start_uid: Uid,
    ) -> Result<Vec<Arc<dyn Message>>> {
        let state = self.state.read().await;
        let messages = state.messages(mailbox)?;
        Ok(Self::collect(messages.iter().filter(|m| m.uid >= start_uid)))
    }

    async fn mailbox_find_messages_from_to_uid(
        &self,
        mailbox: &str,
        start_uid: Uid,
        end_uid: Uid,
    ) -> Result<Vec<Arc<dyn Message>>> {
        let state = self.state.read().await;
        let messages = state.messages(mailbox)?;
        Ok(Self::collect(
            messages
                .iter()
                .filter(|m| m.uid >= start_uid && m.uid <= end_uid),
        ))
    }

    async fn mailbox_find_all_messages(&self, mailbox: &str) -> Result<Vec<Arc<dyn Message>>> {
        let state = self.state.read().await;
        Ok(Self::collect(state.messages(mailbox)?.iter()))
    }

    async fn mailbox_find_message_by_uid(
        &self,
        mailbox: &str,
        uid: Uid,
    ) -> Result<Option<Arc<dyn Message>>> {
        let state = self.state.read().await;
        Ok(state
            .messages(mailbox)?
            .iter()
            .find(|m| m.uid == uid)
            .map(|m| Arc::clone(m) as Arc<dyn Message>))
    }

    async fn get_uid(&self) -> Result<Uid> {
        Ok(self.state.read().await.next_uid)
    }

    async fn next_uid(&self) -> Result<Uid> {
        let mut state = self.state.write().await;
        let uid = state.next_uid;
        state.next_uid += 1;
        Ok(uid)
    }
}
