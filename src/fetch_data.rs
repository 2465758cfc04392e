//! Per-message FETCH response rendering
//!
//! Turns a `FetchOptions` and a stored message into the parenthesized data
//! list of one `* <seq> FETCH (...)` line. Content items travel as IMAP
//! literals, so the line is assembled as bytes rather than text.

use crate::grammar::{quote, remove_parentheses_strict, BodySection, FetchOptions};
use crate::headers;
use crate::storage::Message;
use crate::types::{flag_list, Address, SequenceNumber};

/// Format of INTERNALDATE, e.g. `17-Jul-1996 02:44:25 -0700`
pub const INTERNALDATE_FORMAT: &str = "%d-%b-%Y %H:%M:%S %z";

/// Accumulates data items for one message
struct ItemWriter {
    out: Vec<u8>,
    empty: bool,
}

impl ItemWriter {
    fn new(seq: SequenceNumber) -> Self {
        Self {
            out: format!("* {} FETCH (", seq).into_bytes(),
            empty: true,
        }
    }

    fn separator(&mut self) {
        if !self.empty {
            self.out.push(b' ');
        }
        self.empty = false;
    }

    fn text(&mut self, name: &str, value: &str) {
        self.separator();
        self.out.extend_from_slice(name.as_bytes());
        self.out.push(b' ');
        self.out.extend_from_slice(value.as_bytes());
    }

    fn literal(&mut self, name: &str, data: &[u8]) {
        self.separator();
        self.out
            .extend_from_slice(format!("{} {{{}}}\r\n", name, data.len()).as_bytes());
        self.out.extend_from_slice(data);
    }

    fn finish(mut self) -> Vec<u8> {
        self.out.extend_from_slice(b")\r\n");
        self.out
    }
}

/// Render the full FETCH response line for `message`.
///
/// `with_uid` forces the UID item in, as UID FETCH requires.
pub fn render(
    seq: SequenceNumber,
    message: &dyn Message,
    options: &FetchOptions,
    with_uid: bool,
) -> Vec<u8> {
    let mut w = ItemWriter::new(seq);

    if options.uid || with_uid {
        w.text("UID", &message.uid().to_string());
    }
    if options.flags {
        w.text("FLAGS", &flag_list(&message.flags()));
    }
    if options.internaldate {
        w.text(
            "INTERNALDATE",
            &quote(&message.date().format(INTERNALDATE_FORMAT).to_string()),
        );
    }
    if options.rfc822_size {
        w.text("RFC822.SIZE", &message.size().to_string());
    }
    if options.envelope {
        w.text("ENVELOPE", &envelope(message));
    }
    if options.body {
        w.text("BODY", &body_structure(message));
    }
    if options.bodystructure {
        w.text("BODYSTRUCTURE", &body_structure(message));
    }
    if options.rfc822 {
        w.literal("RFC822", &whole(message));
    }
    if options.rfc822_header {
        w.literal("RFC822.HEADER", message.header());
    }
    if options.rfc822_text {
        w.literal("RFC822.TEXT", message.text());
    }
    for section in &options.sections {
        match section_data(message, section) {
            Some(data) => w.literal(&section.response_name(), partial(&data, section.partial)),
            None => w.text(&section.response_name(), "NIL"),
        }
    }

    w.finish()
}

fn whole(message: &dyn Message) -> Vec<u8> {
    [message.header(), message.text()].concat()
}

/// The bytes a body section addresses, or `None` for sections a
/// single-part message does not have.
fn section_data(message: &dyn Message, section: &BodySection) -> Option<Vec<u8>> {
    let spec = section.section.as_str();
    match spec {
        "" => Some(whole(message)),
        "HEADER" => Some(message.header().to_vec()),
        "TEXT" | "1" => Some(message.text().to_vec()),
        "MIME" | "1.MIME" => {
            let names: Vec<String> = headers::fields(message.header())
                .into_iter()
                .filter(|f| f.name.to_ascii_uppercase().starts_with("CONTENT-"))
                .map(|f| f.name)
                .collect();
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            Some(headers::select(message.header(), &names, true))
        }
        _ => {
            let (list, include) = if let Some(rest) = spec.strip_prefix("HEADER.FIELDS.NOT") {
                (rest, false)
            } else if let Some(rest) = spec.strip_prefix("HEADER.FIELDS") {
                (rest, true)
            } else {
                return None;
            };
            let names: Vec<&str> = remove_parentheses_strict(list.trim())
                .ok()?
                .split_whitespace()
                .collect();
            Some(headers::select(message.header(), &names, include))
        }
    }
}

fn partial(data: &[u8], range: Option<(u32, u32)>) -> &[u8] {
    match range {
        Some((offset, length)) => {
            let start = (offset as usize).min(data.len());
            let end = start.saturating_add(length as usize).min(data.len());
            &data[start..end]
        }
        None => data,
    }
}

fn nstring(value: Option<String>) -> String {
    value.map(|v| quote(&v)).unwrap_or_else(|| "NIL".to_string())
}

fn address_list(addresses: &[Address]) -> String {
    if addresses.is_empty() {
        return "NIL".to_string();
    }
    let rendered: Vec<String> = addresses
        .iter()
        .map(|a| {
            format!(
                "({} NIL {} {})",
                nstring(a.name.clone()),
                quote(&a.mailbox),
                quote(&a.host)
            )
        })
        .collect();
    format!("({})", rendered.join(""))
}

/// `(date subject from sender reply-to to cc bcc in-reply-to message-id)`
fn envelope(message: &dyn Message) -> String {
    let header = message.header();
    let field = |name: &str| headers::value(header, name);
    let addresses = |name: &str| {
        field(name)
            .map(|v| Address::parse_list(&v))
            .unwrap_or_default()
    };

    let from: Vec<Address> = message.from().into_iter().collect();
    let sender = match addresses("Sender") {
        list if list.is_empty() => from.clone(),
        list => list,
    };
    let reply_to = match addresses("Reply-To") {
        list if list.is_empty() => from.clone(),
        list => list,
    };

    format!(
        "({} {} {} {} {} {} {} {} {} {})",
        nstring(field("Date")),
        nstring(field("Subject")),
        address_list(&from),
        address_list(&sender),
        address_list(&reply_to),
        address_list(&addresses("To")),
        address_list(&addresses("Cc")),
        address_list(&addresses("Bcc")),
        nstring(field("In-Reply-To")),
        nstring(field("Message-ID")),
    )
}

/// Every stored message is reported as a single text/plain part.
fn body_structure(message: &dyn Message) -> String {
    let lines = message.text().iter().filter(|&&b| b == b'\n').count();
    format!(
        "(\"TEXT\" \"PLAIN\" (\"CHARSET\" \"US-ASCII\") NIL NIL \"7BIT\" {} {})",
        message.body_size(),
        lines
    )
}
