//! IMAP protocol handling

use crate::error::{Error, Result};
use std::fmt;

/// One client command line, split into its three parts
///
/// Only the tag and verb are interpreted here. The argument grammar differs
/// per verb, so `arguments` is left exactly as the client sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub tag: String,
    pub verb: String,
    pub arguments: String,
}

/// IMAP response to send to client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Ok { tag: Option<String>, message: String },
    No { tag: Option<String>, message: String },
    Bad { tag: Option<String>, message: String },
    Bye { message: String },
    Untagged { message: String },
}

impl Response {
    pub fn ok(tag: &str, message: impl Into<String>) -> Self {
        Response::Ok {
            tag: Some(tag.to_string()),
            message: message.into(),
        }
    }

    pub fn no(tag: &str, message: impl Into<String>) -> Self {
        Response::No {
            tag: Some(tag.to_string()),
            message: message.into(),
        }
    }

    pub fn bad(tag: &str, message: impl Into<String>) -> Self {
        Response::Bad {
            tag: Some(tag.to_string()),
            message: message.into(),
        }
    }

    pub fn untagged(message: impl Into<String>) -> Self {
        Response::Untagged {
            message: message.into(),
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ok { tag: Some(tag), message } => write!(f, "{} OK {}\r\n", tag, message),
            Response::Ok { tag: None, message } => write!(f, "* OK {}\r\n", message),
            Response::No { tag: Some(tag), message } => write!(f, "{} NO {}\r\n", tag, message),
            Response::No { tag: None, message } => write!(f, "* NO {}\r\n", message),
            Response::Bad { tag: Some(tag), message } => write!(f, "{} BAD {}\r\n", tag, message),
            Response::Bad { tag: None, message } => write!(f, "* BAD {}\r\n", message),
            Response::Bye { message } => write!(f, "* BYE {}\r\n", message),
            Response::Untagged { message } => write!(f, "* {}\r\n", message),
        }
    }
}

/// Parse an IMAP command line (without its CRLF) into tag, verb and arguments
pub fn parse_command(line: &str) -> Result<Command> {
    let (tag, rest) = line
        .split_once(' ')
        .ok_or_else(|| Error::MalformedCommand(format!("missing tag in command {:?}", line)))?;

    let (verb, arguments) = match rest.split_once(' ') {
        Some((verb, arguments)) => (verb, arguments),
        None => (rest, ""),
    };
    let verb = verb.trim().to_ascii_uppercase();
    if verb.is_empty() {
        return Err(Error::MalformedCommand(format!(
            "missing command after tag {:?}",
            tag
        )));
    }

    Ok(Command {
        tag: tag.to_string(),
        verb,
        arguments: arguments.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login() {
        let cmd = parse_command("A1 login foo bar").unwrap();
        assert_eq!(cmd.tag, "A1");
        assert_eq!(cmd.verb, "LOGIN");
        assert_eq!(cmd.arguments, "foo bar");
    }

    #[test]
    fn test_parse_verb_case_insensitive() {
        assert_eq!(parse_command("A1 NOOP").unwrap(), parse_command("A1 noop").unwrap());
        assert_eq!(parse_command("A1 Capability").unwrap().verb, "CAPABILITY");
    }

    #[test]
    fn test_parse_without_arguments() {
        let cmd = parse_command("a002 CAPABILITY").unwrap();
        assert_eq!(cmd.verb, "CAPABILITY");
        assert_eq!(cmd.arguments, "");
    }

    #[test]
    fn test_parse_keeps_raw_arguments() {
        let cmd = parse_command("A3 LIST \"\"  \"My Box\"").unwrap();
        assert_eq!(cmd.arguments, "\"\"  \"My Box\"");
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            parse_command("NOSPACE"),
            Err(Error::MalformedCommand(_))
        ));
        assert!(matches!(parse_command("A1 "), Err(Error::MalformedCommand(_))));
        assert!(matches!(parse_command(""), Err(Error::MalformedCommand(_))));
    }

    #[test]
    fn test_response_format() {
        let resp = Response::ok("A001", "CAPABILITY completed");
        assert_eq!(resp.to_string(), "A001 OK CAPABILITY completed\r\n");

        let resp = Response::untagged("3 EXISTS");
        assert_eq!(resp.to_string(), "* 3 EXISTS\r\n");

        let resp = Response::Bye {
            message: "localhost logging out".to_string(),
        };
        assert_eq!(resp.to_string(), "* BYE localhost logging out\r\n");
    }
}
