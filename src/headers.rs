//! RFC 5322 header block helpers
//!
//! Messages expose their raw header bytes; ENVELOPE and the
//! `HEADER.FIELDS` sections need individual fields out of them.

use mailparse::MailHeader;

/// One header field as it appears on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    pub name: String,
    /// The complete field text, continuation lines and line ending included
    pub raw: String,
}

impl HeaderField {
    fn from_mail_header(header: &MailHeader<'_>) -> Self {
        let value = String::from_utf8_lossy(header.get_value_raw());
        Self {
            name: header.get_key(),
            raw: format!("{}: {}\r\n", header.get_key_ref(), value),
        }
    }

    /// The field body with folding removed. Encoded words are left as they
    /// are, which is what ENVELOPE carries.
    pub fn value(&self) -> String {
        let body = self.raw.split_once(':').map(|(_, v)| v).unwrap_or("");
        body.split(['\r', '\n'])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Split a header block into its fields, stopping at the blank line.
pub fn fields(header: &[u8]) -> Vec<HeaderField> {
    match mailparse::parse_headers(header) {
        Ok((headers, _)) => headers.iter().map(HeaderField::from_mail_header).collect(),
        Err(e) => {
            log::debug!("Unparseable header block: {}", e);
            Vec::new()
        }
    }
}

/// The unfolded value of the first field called `name`.
pub fn value(header: &[u8], name: &str) -> Option<String> {
    fields(header)
        .into_iter()
        .find(|field| field.name.eq_ignore_ascii_case(name))
        .map(|field| field.value())
}

/// Concatenate the fields whose inclusion in `names` equals `include`,
/// terminated by the blank line the way a header section is served.
pub fn select(header: &[u8], names: &[&str], include: bool) -> Vec<u8> {
    let mut out = String::new();
    for field in fields(header) {
        let listed = names.iter().any(|n| n.eq_ignore_ascii_case(&field.name));
        if listed == include {
            out.push_str(&field.raw);
        }
    }
    out.push_str("\r\n");
    out.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &[u8] = b"From: Alice <alice@example.com>\r\n\
Subject: A long\r\n\
\x20folded subject\r\n\
To: bob@example.com\r\n\
\r\n";

    #[test]
    fn test_fields_and_folding() {
        let fields = fields(HEADER);
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[1].name, "Subject");
        assert_eq!(fields[1].value(), "A long folded subject");
        assert_eq!(value(HEADER, "subject").as_deref(), Some("A long folded subject"));
        assert_eq!(value(HEADER, "Cc"), None);
    }

    #[test]
    fn test_select_fields() {
        assert_eq!(
            select(HEADER, &["TO"], true),
            b"To: bob@example.com\r\n\r\n".to_vec()
        );
        assert_eq!(
            select(HEADER, &["subject", "to"], false),
            b"From: Alice <alice@example.com>\r\n\r\n".to_vec()
        );
    }

    #[test]
    fn test_folded_field_kept_verbatim() {
        assert_eq!(
            select(HEADER, &["SUBJECT"], true),
            b"Subject: A long\r\n folded subject\r\n\r\n".to_vec()
        );
    }

    #[test]
    fn test_stops_at_body() {
        let message = b"Subject: hi\r\n\r\nX-Not-A-Header: body text\r\n";
        let names: Vec<String> = fields(message).into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["Subject"]);
    }
}
