//! IMAP server implementation

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinSet;

use crate::authenticator::Authenticator;
use crate::command_handler::CommandHandler;
use crate::command_handlers::CommandHandlers;
use crate::config::ServerConfig;
use crate::connection::Connection;
use crate::error::Result;
use crate::session::Session;
use crate::session_context::SessionContext;

/// Inactivity limit applied to every client read
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// IMAP server with support for custom command handlers
#[derive(Clone)]
pub struct ImapServer {
    hostname: Arc<str>,
    read_timeout: Duration,
    authenticator: Arc<dyn Authenticator>,
    handlers: Arc<CommandHandlers>,
    sessions: Arc<Mutex<JoinSet<()>>>,
}

impl ImapServer {
    /// Create a server using the built-in command set
    pub fn new<A>(hostname: &str, authenticator: A) -> Self
    where
        A: Authenticator + 'static,
    {
        Self {
            hostname: Arc::from(hostname),
            read_timeout: DEFAULT_READ_TIMEOUT,
            authenticator: Arc::new(authenticator),
            handlers: Arc::new(CommandHandlers::with_defaults()),
            sessions: Arc::new(Mutex::new(JoinSet::new())),
        }
    }

    /// Create a server for `config`, with its users on in-memory storage
    pub async fn from_config(config: &ServerConfig) -> Self {
        Self::new(&config.hostname, config.build_authenticator().await)
            .with_read_timeout(config.read_timeout())
    }

    /// Replace the inactivity timeout
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// Register a custom command handler
    ///
    /// This allows library users to extend the server with custom IMAP
    /// commands. Fails if the verb is already taken.
    pub fn register_handler(&mut self, handler: Arc<dyn CommandHandler>) -> Result<()> {
        Arc::make_mut(&mut self.handlers).register(handler)
    }

    /// Start the IMAP server on the specified address
    pub async fn listen(&self, addr: &str) -> Result<()> {
        let listener = TcpListener::bind(addr).await?;
        log::info!("IMAP server listening on {}", addr);
        self.listen_on(listener).await
    }

    /// Listen on an existing TcpListener (useful for testing)
    pub async fn listen_on(&self, listener: TcpListener) -> Result<()> {
        loop {
            let (stream, peer) = listener.accept().await?;
            log::info!("Accepted connection from {}", peer);

            let connection = match Connection::plain(stream, self.read_timeout) {
                Ok(connection) => connection,
                Err(e) => {
                    log::error!("Failed to set up connection from {}: {}", peer, e);
                    continue;
                }
            };
            let context = SessionContext::new(
                Arc::clone(&self.hostname),
                Arc::clone(&self.authenticator),
            );
            let session = Session::new(connection, context, Arc::clone(&self.handlers));

            let mut sessions = self.sessions.lock().await;
            while sessions.try_join_next().is_some() {}
            sessions.spawn(async move {
                match session.run().await {
                    Ok(end) => log::info!("Session with {} ended: {:?}", peer, end),
                    Err(e) => log::error!("Session with {} failed: {}", peer, e),
                }
            });
        }
    }

    /// Wait until every accepted session has ended
    pub async fn wait_for_sessions(&self) {
        let mut sessions = self.sessions.lock().await;
        if !sessions.is_empty() {
            log::info!("Waiting for {} open session(s)", sessions.len());
        }
        while sessions.join_next().await.is_some() {}
    }

    /// Accept connections until `shutdown` resolves, then close the
    /// listener and wait for the sessions already accepted to end.
    pub async fn serve_with_shutdown<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let result = tokio::select! {
            result = self.listen_on(listener) => result,
            _ = shutdown => {
                log::info!("IMAP listener shutting down");
                Ok(())
            }
        };
        self.wait_for_sessions().await;
        result
    }
}
