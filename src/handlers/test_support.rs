//! Harness for driving a single handler against an in-memory session

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, DuplexStream};

use crate::authenticator::r#impl::BasicAuthenticator;
use crate::command_handler::{CommandHandler, Outcome};
use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::session_context::SessionContext;
use crate::storage::r#impl::InMemoryStorage;
use crate::storage::{Mailbox, Message, Storage};
use crate::types::{Uid, Username};

pub const SAMPLE: &[u8] = b"From: Alice <alice@example.com>\r\n\
To: bob@example.com\r\n\
Subject: Lunch\r\n\
Message-ID: <1@example.com>\r\n\
\r\n\
Noon at the usual place?\r\n";

pub struct Harness {
    pub connection: Connection,
    pub client: BufReader<DuplexStream>,
    pub context: SessionContext,
    pub storage: Arc<InMemoryStorage>,
}

impl Harness {
    /// A session that has not logged in yet
    pub fn new() -> Self {
        Self::with_storage(Arc::new(InMemoryStorage::new()))
    }

    fn with_storage(storage: Arc<InMemoryStorage>) -> Self {
        let (server, client) = tokio::io::duplex(64 * 1024);
        let (r, w) = tokio::io::split(server);
        let authenticator = BasicAuthenticator::new().with_user("bob", "pw", storage.clone());
        Self {
            connection: Connection::new(r, w, Duration::from_secs(5)),
            client: BufReader::new(client),
            context: SessionContext::new(Arc::from("localhost"), Arc::new(authenticator)),
            storage,
        }
    }

    /// A session logged in as `bob`
    pub fn authenticated() -> Self {
        let mut harness = Self::new();
        harness.bind(harness.storage.clone());
        harness
    }

    /// A session logged in as `bob` against an arbitrary storage
    pub fn authenticated_with(storage: Arc<dyn Storage>) -> Self {
        let mut harness = Self::new();
        harness.bind(storage);
        harness
    }

    fn bind(&mut self, storage: Arc<dyn Storage>) {
        self.context.bind("bob", storage);
        self.context.authenticate().unwrap();
    }

    /// Run `handler` with tag `A1`
    pub async fn run(&mut self, handler: &dyn CommandHandler, args: &str) -> Result<Outcome> {
        handler
            .handle("A1", args, &mut self.connection, &mut self.context)
            .await
    }

    /// Every line written so far, without terminators
    pub async fn lines(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        loop {
            let mut line = String::new();
            match tokio::time::timeout(Duration::from_millis(50), self.client.read_line(&mut line))
                .await
            {
                Ok(Ok(n)) if n > 0 => lines.push(line.trim_end_matches("\r\n").to_string()),
                _ => return lines,
            }
        }
    }
}

/// Storage whose counters fail while lookups still work
pub struct BrokenCounters(pub InMemoryStorage);

#[async_trait]
impl Storage for BrokenCounters {
    async fn set_username(&self, username: &str) {
        self.0.set_username(username).await
    }

    async fn username(&self) -> Username {
        self.0.username().await
    }

    async fn new_mailbox(&self, name: &str) -> Result<Arc<dyn Mailbox>> {
        self.0.new_mailbox(name).await
    }

    async fn get_mailboxes(&self) -> Result<Vec<Arc<dyn Mailbox>>> {
        self.0.get_mailboxes().await
    }

    async fn get_mailbox(&self, name: &str) -> Result<Option<Arc<dyn Mailbox>>> {
        self.0.get_mailbox(name).await
    }

    async fn mailbox_count_all_messages(&self, _mailbox: &str) -> Result<u32> {
        Err(Error::Storage("count unavailable".to_string()))
    }

    async fn mailbox_find_messages_after_uid(
        &self,
        mailbox: &str,
        start_uid: Uid,
    ) -> Result<Vec<Arc<dyn Message>>> {
        self.0.mailbox_find_messages_after_uid(mailbox, start_uid).await
    }

    async fn mailbox_find_messages_from_to_uid(
        &self,
        mailbox: &str,
        start_uid: Uid,
        end_uid: Uid,
    ) -> Result<Vec<Arc<dyn Message>>> {
        self.0
            .mailbox_find_messages_from_to_uid(mailbox, start_uid, end_uid)
            .await
    }

    async fn mailbox_find_all_messages(&self, mailbox: &str) -> Result<Vec<Arc<dyn Message>>> {
        self.0.mailbox_find_all_messages(mailbox).await
    }

    async fn mailbox_find_message_by_uid(
        &self,
        mailbox: &str,
        uid: Uid,
    ) -> Result<Option<Arc<dyn Message>>> {
        self.0.mailbox_find_message_by_uid(mailbox, uid).await
    }

    async fn get_uid(&self) -> Result<Uid> {
        Err(Error::Storage("UID counter unavailable".to_string()))
    }

    async fn next_uid(&self) -> Result<Uid> {
        self.0.next_uid().await
    }
}
