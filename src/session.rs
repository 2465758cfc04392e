//! Per-connection session loop
//!
//! One `Session` owns one connection and its `SessionContext`. It reads a
//! line, parses it, dispatches through the handler registry and writes the
//! tagged completion, strictly one command at a time.

use std::sync::Arc;

use crate::command_handler::Outcome;
use crate::command_handlers::CommandHandlers;
use crate::connection::Connection;
use crate::error::Result;
use crate::protocol::{parse_command, Response};
use crate::session_context::SessionContext;

/// How a session ended without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// LOGOUT or CLOSE completed
    Closed,
    /// The client hung up
    ClientClosed,
}

/// IMAP session state and connection handler
pub struct Session {
    connection: Connection,
    context: SessionContext,
    handlers: Arc<CommandHandlers>,
}

impl Session {
    pub fn new(
        connection: Connection,
        context: SessionContext,
        handlers: Arc<CommandHandlers>,
    ) -> Self {
        Self {
            connection,
            context,
            handlers,
        }
    }

    /// Send the greeting and process commands until the session ends.
    ///
    /// Fatal conditions (I/O failure, read timeout, an oversized or unparseable line)
    /// come back as `Err` after which the connection is simply dropped.
    pub async fn run(mut self) -> Result<SessionEnd> {
        let greeting = Response::Ok {
            tag: None,
            message: format!("{} IMAP4rev1", self.context.hostname),
        };
        self.send(&greeting).await?;

        loop {
            let line = match self.connection.read_line().await? {
                Some(line) => line,
                None => {
                    log::info!("Client {:?} closed the connection", self.connection.peer_addr());
                    return Ok(SessionEnd::ClientClosed);
                }
            };
            log::debug!("C: {}", line);

            let command = parse_command(&line)?;

            let outcome = match self
                .handlers
                .dispatch(&command, &mut self.connection, &mut self.context)
                .await
            {
                Ok(outcome) => outcome,
                Err(e) => match e.to_response(&command.tag) {
                    Some(response) => {
                        log::debug!("{} {} failed: {}", command.tag, command.verb, e);
                        Outcome::Continue(response)
                    }
                    None => return Err(e),
                },
            };

            self.send(outcome.response()).await?;

            if let Outcome::Close(_) = outcome {
                self.connection.shutdown().await?;
                return Ok(SessionEnd::Closed);
            }
        }
    }

    async fn send(&mut self, response: &Response) -> Result<()> {
        log::debug!("S: {}", response.to_string().trim_end());
        self.connection.write_response(response).await
    }
}
