//! Storage capability consumed by the protocol engine
//!
//! The engine holds no message data. Everything it reports about mailboxes
//! and messages comes through these traits, and every failure is an opaque
//! error the handlers turn into a NO or BAD reply.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use std::sync::Arc;

use crate::error::Result;
use crate::types::*;

pub mod r#impl;

/// A mailbox as seen by the protocol engine
pub trait Mailbox: Send + Sync {
    fn name(&self) -> &str;
}

/// A stored message
pub trait Message: Send + Sync {
    fn uid(&self) -> Uid;

    fn flags(&self) -> Vec<MessageFlag>;

    /// Sender address, if the message has one
    fn from(&self) -> Option<Address>;

    /// Internal date of the message
    fn date(&self) -> DateTime<FixedOffset>;

    /// Total size in octets (header plus body)
    fn size(&self) -> u32 {
        self.header_size() + self.body_size()
    }

    fn header_size(&self) -> u32;

    fn body_size(&self) -> u32;

    /// Raw header block, including the blank line that ends it
    fn header(&self) -> &[u8];

    /// Raw body following the header block
    fn text(&self) -> &[u8];
}

/// Per-user mail storage
///
/// Implementations must be safe to share between sessions; the engine does
/// no locking of its own.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn set_username(&self, username: &str);

    async fn username(&self) -> Username;

    /// Create a new mailbox
    async fn new_mailbox(&self, name: &str) -> Result<Arc<dyn Mailbox>>;

    /// All mailboxes of the bound user
    async fn get_mailboxes(&self) -> Result<Vec<Arc<dyn Mailbox>>>;

    /// Look up a mailbox; `Ok(None)` if it does not exist
    async fn get_mailbox(&self, name: &str) -> Result<Option<Arc<dyn Mailbox>>>;

    async fn mailbox_count_all_messages(&self, mailbox: &str) -> Result<u32>;

    /// Messages with a UID of at least `start_uid`, in UID order
    async fn mailbox_find_messages_after_uid(
        &self,
        mailbox: &str,
        start_uid: Uid,
    ) -> Result<Vec<Arc<dyn Message>>>;

    /// Messages with `start_uid <= UID <= end_uid`, in UID order
    async fn mailbox_find_messages_from_to_uid(
        &self,
        mailbox: &str,
        start_uid: Uid,
        end_uid: Uid,
    ) -> Result<Vec<Arc<dyn Message>>>;

    /// Every message in the mailbox, in UID order
    async fn mailbox_find_all_messages(&self, mailbox: &str) -> Result<Vec<Arc<dyn Message>>>;

    async fn mailbox_find_message_by_uid(
        &self,
        mailbox: &str,
        uid: Uid,
    ) -> Result<Option<Arc<dyn Message>>>;

    /// The UID the next stored message will receive
    async fn get_uid(&self) -> Result<Uid>;

    /// Allocate and return the next UID
    async fn next_uid(&self) -> Result<Uid>;
}
