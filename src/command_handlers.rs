//! Command handler registry for IMAP commands
//!
//! Maps verbs to their handlers and gates each dispatch on the session's
//! authentication stage.

use std::collections::HashMap;
use std::sync::Arc;

use crate::command_handler::{CommandHandler, CommandTier, Outcome};
use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::handlers::*;
use crate::protocol::Command;
use crate::session_context::SessionContext;

/// Registry of command handlers
#[derive(Clone)]
pub struct CommandHandlers {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandHandlers {
    /// Create a new empty command handler registry
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// A registry holding every built-in command
    pub fn with_defaults() -> Self {
        let builtins: Vec<Arc<dyn CommandHandler>> = vec![
            Arc::new(CapabilityHandler::new()),
            Arc::new(NoopHandler::new()),
            Arc::new(LogoutHandler::new()),
            Arc::new(LoginHandler::new()),
            Arc::new(SelectHandler::new()),
            Arc::new(ListHandler::new()),
            Arc::new(LsubHandler::new()),
            Arc::new(CreateHandler::new()),
            Arc::new(StatusHandler::new()),
            Arc::new(FetchHandler::new()),
            Arc::new(UidHandler::new()),
            Arc::new(CloseHandler::new()),
            Arc::new(CheckHandler::new()),
        ];

        let mut registry = Self::new();
        for handler in builtins {
            registry.handlers.insert(handler.command_name().to_string(), handler);
        }
        registry
    }

    /// Register a command handler
    ///
    /// Fails if a handler with the same name is already registered.
    pub fn register(&mut self, handler: Arc<dyn CommandHandler>) -> Result<()> {
        let name = handler.command_name().to_uppercase();

        if self.handlers.contains_key(&name) {
            return Err(Error::Config(format!(
                "Command handler already registered: {}",
                name
            )));
        }

        self.handlers.insert(name, handler);
        Ok(())
    }

    /// Get a handler by command name (case-insensitive)
    pub fn get(&self, command_name: &str) -> Option<Arc<dyn CommandHandler>> {
        self.handlers.get(&command_name.to_uppercase()).cloned()
    }

    /// Dispatch a parsed command to its handler.
    ///
    /// Any-state commands are tried first. A verb that is unknown or not
    /// legal in the current stage yields `CommandNotApplicable`.
    pub async fn dispatch(
        &self,
        command: &Command,
        connection: &mut Connection,
        context: &mut SessionContext,
    ) -> Result<Outcome> {
        let handler = self
            .get(&command.verb)
            .filter(|handler| {
                handler.tier() == CommandTier::AnyState || handler.tier().allows(context.state())
            })
            .ok_or_else(|| Error::CommandNotApplicable(command.verb.clone()))?;

        handler
            .handle(&command.tag, &command.arguments, connection, context)
            .await
    }

    /// List all registered command names
    pub fn list_commands(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }

    /// Check if a command is registered
    pub fn has_command(&self, command_name: &str) -> bool {
        self.handlers.contains_key(&command_name.to_uppercase())
    }
}

impl Default for CommandHandlers {
    fn default() -> Self {
        Self::with_defaults()
    }
}
