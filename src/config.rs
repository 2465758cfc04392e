//! Server configuration loaded from TOML

use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::authenticator::r#impl::BasicAuthenticator;
use crate::error::{Error, Result};
use crate::storage::r#impl::InMemoryStorage;
use crate::storage::Storage;

fn default_hostname() -> String {
    "localhost".to_string()
}

fn default_listen_addr() -> String {
    "127.0.0.1:1143".to_string()
}

fn default_read_timeout_secs() -> u64 {
    30 * 60
}

/// A demo account served from in-memory storage
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UserConfig {
    pub username: String,
    pub password: String,
    /// Mailboxes created in addition to INBOX
    #[serde(default)]
    pub mailboxes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "default_hostname")]
    pub hostname: String,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
    #[serde(default)]
    pub users: Vec<UserConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            listen_addr: default_listen_addr(),
            read_timeout_secs: default_read_timeout_secs(),
            users: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Read and parse a TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("reading {}: {}", path.display(), e)))?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Build an authenticator holding every configured user, each with its
    /// own in-memory storage.
    ///
    /// A mailbox that cannot be created is logged and skipped.
    pub async fn build_authenticator(&self) -> BasicAuthenticator {
        let mut authenticator = BasicAuthenticator::new();
        for user in &self.users {
            let storage = Arc::new(InMemoryStorage::new());
            for name in &user.mailboxes {
                if let Err(e) = storage.new_mailbox(name).await {
                    log::warn!("Skipping mailbox {:?} for {}: {}", name, user.username, e);
                }
            }
            authenticator.add_user(&user.username, &user.password, storage);
        }
        authenticator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authenticator::Authenticator;
    use crate::session_context::SessionContext;
    use crate::types::Credentials;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::parse("").unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.hostname, "localhost");
        assert_eq!(config.listen_addr, "127.0.0.1:1143");
        assert_eq!(config.read_timeout(), Duration::from_secs(1800));
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
hostname = "mail.example.com"
read_timeout_secs = 60

[[users]]
username = "bob"
password = "pw"
mailboxes = ["Archive", "Sent"]
"#
        )
        .unwrap();

        let config = ServerConfig::load(file.path()).unwrap();
        assert_eq!(config.hostname, "mail.example.com");
        assert_eq!(config.listen_addr, "127.0.0.1:1143");
        assert_eq!(config.read_timeout(), Duration::from_secs(60));
        assert_eq!(
            config.users,
            vec![UserConfig {
                username: "bob".to_string(),
                password: "pw".to_string(),
                mailboxes: vec!["Archive".to_string(), "Sent".to_string()],
            }]
        );
    }

    #[tokio::test]
    async fn test_build_authenticator() {
        let config = ServerConfig::parse(
            r#"
[[users]]
username = "bob"
password = "pw"
mailboxes = ["Archive", "INBOX"]
"#,
        )
        .unwrap();
        let authenticator: Arc<dyn Authenticator> = Arc::new(config.build_authenticator().await);
        let mut context = SessionContext::new(Arc::from("localhost"), Arc::clone(&authenticator));

        let wrong = Credentials {
            username: "bob".to_string(),
            password: "nope".to_string(),
        };
        assert!(authenticator.login(&mut context, &wrong).await.is_err());

        let right = Credentials {
            username: "bob".to_string(),
            password: "pw".to_string(),
        };
        authenticator.login(&mut context, &right).await.unwrap();
        let mailboxes = context.storage().unwrap().get_mailboxes().await.unwrap();
        let names: Vec<&str> = mailboxes.iter().map(|mb| mb.name()).collect();
        assert_eq!(names, vec!["INBOX", "Archive"]);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            ServerConfig::parse("read_timeout_secs = \"soon\""),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ServerConfig::load("/nonexistent/postimap.toml"),
            Err(Error::Config(_))
        ));
    }
}
