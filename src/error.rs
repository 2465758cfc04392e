//! Error types for the IMAP server

use thiserror::Error;

use crate::protocol::Response;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Read timed out")]
    Timeout,

    #[error("Command line longer than {0} bytes")]
    LineTooLong(usize),

    #[error("Malformed command: {0}")]
    MalformedCommand(String),

    #[error("Invalid command: {0}")]
    CommandNotApplicable(String),

    #[error("Invalid arguments: {0}")]
    GrammarError(String),

    #[error("Invalid sequence set: {0}")]
    InvalidSequenceSet(String),

    #[error("Invalid fetch item: {0}")]
    InvalidFetchItem(String),

    #[error("Invalid arguments: {0}")]
    BadArguments(String),

    #[error("No mailbox selected")]
    NoMailboxSelected,

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Mailbox {0:?} not found")]
    MailboxNotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Errors that end the connection without a tagged reply.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Io(_)
                | Error::Timeout
                | Error::LineTooLong(_)
                | Error::MalformedCommand(_)
                | Error::Config(_)
        )
    }

    /// Translate a recoverable error into the tagged completion for `tag`.
    ///
    /// Faults in the shape of the request are answered BAD, everything the
    /// client could not have known in advance is answered NO. Fatal errors
    /// yield `None`.
    pub fn to_response(&self, tag: &str) -> Option<Response> {
        let tag = Some(tag.to_string());
        let message = self.to_string();
        match self {
            Error::CommandNotApplicable(_)
            | Error::GrammarError(_)
            | Error::InvalidSequenceSet(_)
            | Error::InvalidFetchItem(_)
            | Error::BadArguments(_) => Some(Response::Bad { tag, message }),
            Error::NoMailboxSelected
            | Error::AuthenticationFailed(_)
            | Error::MailboxNotFound(_)
            | Error::Storage(_) => Some(Response::No { tag, message }),
            Error::Io(_)
            | Error::Timeout
            | Error::LineTooLong(_)
            | Error::MalformedCommand(_)
            | Error::Config(_) => None,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}
