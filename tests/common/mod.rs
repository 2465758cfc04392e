//! Shared harness for the integration tests: a server on a random port and
//! a line-oriented client

#![allow(dead_code)]

use postimap::authenticator::r#impl::BasicAuthenticator;
use postimap::server::ImapServer;
use postimap::storage::r#impl::InMemoryStorage;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

pub const HOSTNAME: &str = "imap.test";

pub const MESSAGE: &[u8] = b"Date: Mon, 7 Feb 1994 21:52:25 -0800\r\n\
From: Fred Foobar <foobar@blurdybloop.example>\r\n\
Subject: afternoon meeting\r\n\
To: mooch@owatagu.siam.edu.example\r\n\
Message-Id: <B27397-0100000@blurdybloop.example>\r\n\
\r\n\
Hello Joe, do you think we can meet at 3:30 tomorrow?\r\n";

/// Set up a test server with user `bob`/`pw` and return its storage and address
pub async fn setup_test_server() -> (Arc<InMemoryStorage>, String) {
    let storage = Arc::new(InMemoryStorage::new());
    let authenticator = BasicAuthenticator::new().with_user("bob", "pw", storage.clone());
    let server = ImapServer::new(HOSTNAME, authenticator);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let actual_addr = listener.local_addr().unwrap().to_string();

    tokio::spawn(async move {
        if let Err(e) = server.listen_on(listener).await {
            eprintln!("Server error: {}", e);
        }
    });

    (storage, actual_addr)
}

pub struct TestClient {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
    pub greeting: String,
}

impl TestClient {
    pub async fn connect(addr: &str) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read, writer) = stream.into_split();
        let mut client = Self {
            lines: BufReader::new(read).lines(),
            writer,
            greeting: String::new(),
        };
        client.greeting = client.read_line().await.expect("no greeting");
        client
    }

    /// Connect and log in as `bob`
    pub async fn logged_in(addr: &str) -> Self {
        let mut client = Self::connect(addr).await;
        let reply = client.command("L0", "LOGIN bob pw").await;
        assert_eq!(reply.last().unwrap(), "L0 OK LOGIN");
        client
    }

    pub async fn send(&mut self, line: &str) {
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.write_all(b"\r\n").await.unwrap();
    }

    /// Next line from the server, `None` once it has closed the connection
    pub async fn read_line(&mut self) -> Option<String> {
        tokio::time::timeout(Duration::from_secs(5), self.lines.next_line())
            .await
            .expect("timed out waiting for the server")
            .ok()
            .flatten()
    }

    /// Send `tag command` and collect every line up to and including the
    /// tagged completion
    pub async fn command(&mut self, tag: &str, command: &str) -> Vec<String> {
        self.send(&format!("{} {}", tag, command)).await;
        let prefix = format!("{} ", tag);
        let mut lines = Vec::new();
        while let Some(line) = self.read_line().await {
            let done = line.starts_with(&prefix);
            lines.push(line);
            if done {
                break;
            }
        }
        lines
    }
}
