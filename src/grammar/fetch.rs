//! FETCH data-item grammar
//!
//! An item list is a macro (`ALL`, `FAST`, `FULL`), a parenthesized list of
//! items, or a single bare item. Items are the fixed keywords plus the
//! bracketed `BODY[section]<offset.length>` and `BODY.PEEK[...]` forms.

use lazy_static::lazy_static;
use regex::Regex;

use super::{remove_parentheses_strict, split_list_items};
use crate::error::{Error, Result};

lazy_static! {
    static ref RX_BODY_SECTION: Regex =
        Regex::new(r"^(?i)BODY(\.PEEK)?\[([^\]]*)\](?:<([0-9]+)\.([0-9]+)>)?$").unwrap();
}

/// A requested body section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodySection {
    /// Section specifier between the brackets, upper-cased (`""` is the whole message)
    pub section: String,
    /// Partial fetch as `(offset, length)`
    pub partial: Option<(u32, u32)>,
    /// `BODY.PEEK[...]` rather than `BODY[...]`
    pub peek: bool,
}

impl BodySection {
    /// The item name echoed back in the FETCH response.
    ///
    /// PEEK is never echoed and a partial fetch reports only its origin.
    pub fn response_name(&self) -> String {
        match self.partial {
            Some((offset, _)) => format!("BODY[{}]<{}>", self.section, offset),
            None => format!("BODY[{}]", self.section),
        }
    }
}

/// The set of data items one FETCH asked for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    pub body: bool,
    pub bodystructure: bool,
    pub envelope: bool,
    pub flags: bool,
    pub internaldate: bool,
    pub rfc822: bool,
    pub rfc822_header: bool,
    pub rfc822_size: bool,
    pub rfc822_text: bool,
    pub uid: bool,
    pub sections: Vec<BodySection>,
}

impl FetchOptions {
    fn add_item(&mut self, item: &str) -> Result<()> {
        match item.to_ascii_uppercase().as_str() {
            "BODY" => self.body = true,
            "BODYSTRUCTURE" => self.bodystructure = true,
            "ENVELOPE" => self.envelope = true,
            "FLAGS" => self.flags = true,
            "INTERNALDATE" => self.internaldate = true,
            "RFC822" => self.rfc822 = true,
            "RFC822.HEADER" => self.rfc822_header = true,
            "RFC822.SIZE" => self.rfc822_size = true,
            "RFC822.TEXT" => self.rfc822_text = true,
            "UID" => self.uid = true,
            _ => {
                let section = parse_body_section(item)?;
                if !self.sections.contains(&section) {
                    self.sections.push(section);
                }
            }
        }
        Ok(())
    }
}

fn parse_body_section(item: &str) -> Result<BodySection> {
    let caps = RX_BODY_SECTION
        .captures(item)
        .ok_or_else(|| Error::InvalidFetchItem(item.to_string()))?;

    let partial = match (caps.get(3), caps.get(4)) {
        (Some(offset), Some(length)) => {
            let offset = offset
                .as_str()
                .parse()
                .map_err(|_| Error::InvalidFetchItem(item.to_string()))?;
            let length = length
                .as_str()
                .parse()
                .map_err(|_| Error::InvalidFetchItem(item.to_string()))?;
            Some((offset, length))
        }
        _ => None,
    };

    Ok(BodySection {
        section: caps[2].to_ascii_uppercase(),
        partial,
        peek: caps.get(1).is_some(),
    })
}

fn expand_macro(items: &str) -> &str {
    match items.to_ascii_uppercase().as_str() {
        "ALL" => "(FLAGS INTERNALDATE RFC822.SIZE ENVELOPE)",
        "FAST" => "(FLAGS INTERNALDATE RFC822.SIZE)",
        "FULL" => "(FLAGS INTERNALDATE RFC822.SIZE ENVELOPE BODY)",
        _ => items,
    }
}

/// Parse a FETCH item list into a fresh `FetchOptions`.
///
/// Any unknown item fails the whole list.
pub fn parse_fetch_items(items: &str) -> Result<FetchOptions> {
    let items = expand_macro(items.trim());
    let list = if items.starts_with('(') {
        remove_parentheses_strict(items)?
    } else {
        items
    };

    let parts = split_list_items(list)?;
    if parts.is_empty() {
        return Err(Error::GrammarError("empty fetch item list".to_string()));
    }
    if !items.starts_with('(') && parts.len() > 1 {
        return Err(Error::GrammarError(format!(
            "multiple fetch items must be parenthesized: {:?}",
            items
        )));
    }

    let mut options = FetchOptions::default();
    for part in parts {
        options.add_item(part)?;
    }
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macros_expand() {
        assert_eq!(
            parse_fetch_items("ALL").unwrap(),
            parse_fetch_items("(FLAGS INTERNALDATE RFC822.SIZE ENVELOPE)").unwrap()
        );
        assert_eq!(
            parse_fetch_items("fast").unwrap(),
            parse_fetch_items("(FLAGS INTERNALDATE RFC822.SIZE)").unwrap()
        );
        let full = parse_fetch_items("FULL").unwrap();
        assert!(full.body && full.envelope && full.flags);
        assert!(!full.bodystructure);
    }

    #[test]
    fn test_single_item() {
        let options = parse_fetch_items("(UID)").unwrap();
        assert!(options.uid);
        assert!(!options.flags);

        let bare = parse_fetch_items("FLAGS").unwrap();
        assert!(bare.flags && !bare.uid && bare.sections.is_empty());
    }

    #[test]
    fn test_keywords_case_insensitive() {
        let options = parse_fetch_items("(flags Rfc822.Size uid bodystructure)").unwrap();
        assert!(options.flags && options.rfc822_size && options.uid && options.bodystructure);
    }

    #[test]
    fn test_body_sections() {
        let options =
            parse_fetch_items("(BODY.PEEK[HEADER] BODY[TEXT]<0.100> body[])").unwrap();
        assert_eq!(
            options.sections,
            vec![
                BodySection {
                    section: "HEADER".to_string(),
                    partial: None,
                    peek: true
                },
                BodySection {
                    section: "TEXT".to_string(),
                    partial: Some((0, 100)),
                    peek: false
                },
                BodySection {
                    section: String::new(),
                    partial: None,
                    peek: false
                },
            ]
        );
        assert_eq!(options.sections[1].response_name(), "BODY[TEXT]<0>");
    }

    #[test]
    fn test_header_fields_section() {
        let options = parse_fetch_items("(UID BODY.PEEK[HEADER.FIELDS (From Subject)])").unwrap();
        assert_eq!(options.sections[0].section, "HEADER.FIELDS (FROM SUBJECT)");
        assert!(options.uid);
    }

    #[test]
    fn test_duplicate_sections_collapse() {
        let options = parse_fetch_items("(BODY[TEXT] BODY[TEXT])").unwrap();
        assert_eq!(options.sections.len(), 1);
    }

    #[test]
    fn test_unknown_item_fails_whole_list() {
        assert!(matches!(
            parse_fetch_items("(FLAGS BOGUS)"),
            Err(Error::InvalidFetchItem(_))
        ));
        assert!(parse_fetch_items("(BODY[TEXT]<1>)").is_err());
        assert!(parse_fetch_items("(BODY.PEEK)").is_err());
    }

    #[test]
    fn test_malformed_lists() {
        assert!(parse_fetch_items("(FLAGS").is_err());
        assert!(parse_fetch_items("FLAGS)").is_err());
        assert!(parse_fetch_items("()").is_err());
        assert!(parse_fetch_items("").is_err());
        assert!(parse_fetch_items("FLAGS UID").is_err());
    }
}
