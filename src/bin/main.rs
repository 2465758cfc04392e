//! postimap IMAP server binary
//!
//! Usage: `postimap [config.toml]`. Without a config file the server runs
//! with defaults and a single demo account `test`/`test`.

use futures::prelude::*;
use postimap::config::{ServerConfig, UserConfig};
use postimap::server::ImapServer;
use signal_hook::consts::signal::*;
use signal_hook_tokio::Signals;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading configuration from {}", path);
            ServerConfig::load(&path)?
        }
        None => {
            log::info!("No configuration given, using defaults");
            ServerConfig {
                users: vec![UserConfig {
                    username: "test".to_string(),
                    password: "test".to_string(),
                    mailboxes: Vec::new(),
                }],
                ..ServerConfig::default()
            }
        }
    };

    let server = ImapServer::from_config(&config).await;
    let listener = TcpListener::bind(&config.listen_addr).await?;
    log::info!(
        "IMAP server {} listening on {}",
        config.hostname,
        config.listen_addr
    );

    // Set up signal handling for graceful shutdown
    let signals = Signals::new([SIGTERM, SIGINT, SIGHUP])?;
    let handle = signals.handle();
    let mut signals = signals.fuse();

    let shutdown = async move {
        if let Some(signal) = signals.next().await {
            let signal_name = match signal {
                SIGTERM => "SIGTERM",
                SIGINT => "SIGINT",
                SIGHUP => "SIGHUP",
                _ => "unknown signal",
            };
            log::info!(
                "Received {} signal, initiating graceful shutdown...",
                signal_name
            );
        }
    };

    if let Err(e) = server.serve_with_shutdown(listener, shutdown).await {
        log::error!("IMAP server error: {}", e);
    }

    // Clean up signal handler
    handle.close();

    log::info!("Shutdown complete");
    Ok(())
}
