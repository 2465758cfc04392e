//! postimap - An async IMAP4rev1 protocol engine in Rust
//!
//! This library provides the session state machine, command grammar and
//! command handlers of an IMAP server. Mail storage and credential checks
//! are reached through the `Storage` and `Authenticator` traits; in-memory
//! implementations of both are bundled for the demo binary and tests.

pub mod authenticator;
pub mod command_handler;
pub mod command_handlers;
pub mod config;
pub mod connection;
pub mod error;
pub mod fetch_data;
pub mod grammar;
pub mod handlers;
pub mod headers;
pub mod protocol;
pub mod server;
pub mod session;
pub mod session_context;
pub mod storage;
pub mod types;

pub use authenticator::Authenticator;
pub use command_handler::{CommandHandler, CommandTier, Outcome};
pub use command_handlers::CommandHandlers;
pub use config::ServerConfig;
pub use error::{Error, Result};
pub use server::ImapServer;
pub use session::{Session, SessionEnd};
pub use session_context::{SessionContext, SessionState};
pub use storage::{Mailbox, Message, Storage};
pub use types::*;
