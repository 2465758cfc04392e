//! Core types used throughout the IMAP server

use mailparse::{MailAddr, SingleInfo};
use std::fmt;

/// Message UID (unique within a mailbox, assigned by storage)
pub type Uid = u32;

/// Message sequence number (position within the selected mailbox)
pub type SequenceNumber = u32;

/// Mailbox name
pub type MailboxName = String;

/// Username
pub type Username = String;

/// Hierarchy delimiter reported in LIST responses
pub const HIERARCHY_DELIMITER: &str = "/";

/// Message flags as defined by IMAP
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageFlag {
    Seen,
    Answered,
    Flagged,
    Deleted,
    Draft,
    Recent,
    Custom(String),
}

impl MessageFlag {
    /// The flags announced by SELECT
    pub const SYSTEM: [MessageFlag; 5] = [
        MessageFlag::Answered,
        MessageFlag::Flagged,
        MessageFlag::Deleted,
        MessageFlag::Seen,
        MessageFlag::Draft,
    ];

    pub fn to_imap_string(&self) -> String {
        match self {
            MessageFlag::Seen => "\\Seen".to_string(),
            MessageFlag::Answered => "\\Answered".to_string(),
            MessageFlag::Flagged => "\\Flagged".to_string(),
            MessageFlag::Deleted => "\\Deleted".to_string(),
            MessageFlag::Draft => "\\Draft".to_string(),
            MessageFlag::Recent => "\\Recent".to_string(),
            MessageFlag::Custom(s) => s.clone(),
        }
    }

    pub fn from_imap_string(s: &str) -> Self {
        match s {
            "\\Seen" => MessageFlag::Seen,
            "\\Answered" => MessageFlag::Answered,
            "\\Flagged" => MessageFlag::Flagged,
            "\\Deleted" => MessageFlag::Deleted,
            "\\Draft" => MessageFlag::Draft,
            "\\Recent" => MessageFlag::Recent,
            _ => MessageFlag::Custom(s.to_string()),
        }
    }
}

/// Render a flag list the way FLAGS responses carry it: `(\Seen \Draft)`.
pub fn flag_list(flags: &[MessageFlag]) -> String {
    let rendered: Vec<String> = flags.iter().map(MessageFlag::to_imap_string).collect();
    format!("({})", rendered.join(" "))
}

/// An RFC 5322 mailbox address, split the way ENVELOPE needs it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub name: Option<String>,
    pub mailbox: String,
    pub host: String,
}

impl Address {
    pub fn new(name: Option<&str>, mailbox: &str, host: &str) -> Self {
        Self {
            name: name.map(str::to_string),
            mailbox: mailbox.to_string(),
            host: host.to_string(),
        }
    }

    /// Parse an addr-spec `local@host`, with no display name.
    pub fn parse(addr: &str) -> Option<Self> {
        let (mailbox, host) = addr.trim().rsplit_once('@')?;
        let host = host.split_whitespace().next().unwrap_or("");
        if mailbox.is_empty() || host.is_empty() {
            return None;
        }
        Some(Self::new(None, mailbox, host))
    }

    fn from_single(info: &SingleInfo) -> Option<Self> {
        let mut addr = Self::parse(&info.addr)?;
        addr.name = info
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        Some(addr)
    }

    /// Parse one header mailbox: `Name <local@host>` or a bare `local@host`.
    pub fn parse_mailbox(value: &str) -> Option<Self> {
        Self::parse_list(value).into_iter().next()
    }

    /// Parse an address-list header value. Group members are flattened
    /// into the list and anything without a `local@host` is skipped.
    pub fn parse_list(value: &str) -> Vec<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Vec::new();
        }
        let parsed = match mailparse::addrparse(value) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::debug!("Unparseable address list {:?}: {}", value, e);
                return Vec::new();
            }
        };

        let mut addresses = Vec::new();
        for addr in parsed.iter() {
            match addr {
                MailAddr::Single(info) => addresses.extend(Self::from_single(info)),
                MailAddr::Group(group) => {
                    addresses.extend(group.addrs.iter().filter_map(Self::from_single))
                }
            }
        }
        addresses
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} <{}@{}>", name, self.mailbox, self.host),
            None => write!(f, "{}@{}", self.mailbox, self.host),
        }
    }
}

/// User credentials
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: Username,
    pub password: String,
}
