//! Argument grammar shared by the command handlers
//!
//! The command parser leaves arguments untouched, so every handler pulls its
//! operands out with the helpers here: quoted strings, atoms, strict
//! parenthesized lists, sequence sets and FETCH item lists.

pub mod fetch;
pub mod sequence;

pub use fetch::{parse_fetch_items, BodySection, FetchOptions};
pub use sequence::{parse_sequence_set, parse_sequence_specifier, SequenceSpecifier};

use crate::error::{Error, Result};
use crate::types::HIERARCHY_DELIMITER;

/// Strip the outer parentheses from a list, failing unless both are present.
pub fn remove_parentheses_strict(s: &str) -> Result<&str> {
    if !s.starts_with('(') {
        return Err(Error::GrammarError(format!(
            "missing opening parenthesis in {:?}",
            s
        )));
    }
    if s.len() < 2 || !s.ends_with(')') {
        return Err(Error::GrammarError(format!(
            "missing matching trailing parenthesis in {:?}",
            s
        )));
    }
    Ok(&s[1..s.len() - 1])
}

/// Whether `s` is wrapped in double quotes.
pub fn is_quoted(s: &str) -> bool {
    s.len() >= 2 && s.starts_with('"') && s.ends_with('"')
}

/// Unquote a quoted string, resolving `\"` and `\\`. Atoms come back unchanged.
pub fn unquote(s: &str) -> String {
    if !is_quoted(s) {
        return s.to_string();
    }

    let inner = &s[1..s.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(escaped) => out.push(escaped),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Wrap `s` as a quoted string.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Whether `s` cannot travel as a bare atom.
pub fn needs_quoting(s: &str) -> bool {
    s.is_empty()
        || s.contains(HIERARCHY_DELIMITER)
        || s.chars().any(|c| {
            c.is_ascii_control()
                || matches!(c, ' ' | '"' | '\\' | '(' | ')' | '{' | '%' | '*' | ']')
        })
}

/// Render `s` as an atom when possible and as a quoted string otherwise.
pub fn astring(s: &str) -> String {
    if needs_quoting(s) {
        quote(s)
    } else {
        s.to_string()
    }
}

/// Split the next argument off `args`.
///
/// The token is either a quoted string (returned with its quotes, so the
/// caller can tell `""` from a missing argument) or an atom running to the
/// next space. The remainder has its leading spaces removed.
pub fn next_token(args: &str) -> Result<(&str, &str)> {
    let args = args.trim_start_matches(' ');
    if args.is_empty() {
        return Err(Error::BadArguments("missing argument".to_string()));
    }

    let end = if args.starts_with('"') {
        let mut escaped = false;
        let mut close = None;
        for (i, c) in args.char_indices().skip(1) {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => {
                    close = Some(i);
                    break;
                }
                _ => {}
            }
        }
        match close {
            Some(i) => i + 1,
            None => {
                return Err(Error::GrammarError(format!(
                    "unterminated quoted string in {:?}",
                    args
                )))
            }
        }
    } else {
        args.find(' ').unwrap_or(args.len())
    };

    Ok((&args[..end], args[end..].trim_start_matches(' ')))
}

/// Split a parenthesized list interior into its items.
///
/// Spaces inside brackets or nested parentheses do not separate items, so
/// `BODY[HEADER.FIELDS (From To)]` stays one item.
pub fn split_list_items(s: &str) -> Result<Vec<&str>> {
    let mut items = Vec::new();
    let mut depth_paren = 0usize;
    let mut depth_bracket = 0usize;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '(' => depth_paren += 1,
            ')' => {
                depth_paren = depth_paren.checked_sub(1).ok_or_else(|| {
                    Error::GrammarError(format!("unbalanced parenthesis in {:?}", s))
                })?
            }
            '[' => depth_bracket += 1,
            ']' => {
                depth_bracket = depth_bracket.checked_sub(1).ok_or_else(|| {
                    Error::GrammarError(format!("unbalanced bracket in {:?}", s))
                })?
            }
            ' ' if depth_paren == 0 && depth_bracket == 0 => {
                if i > start {
                    items.push(&s[start..i]);
                }
                start = i + 1;
            }
            _ => {}
        }
    }

    if depth_paren != 0 || depth_bracket != 0 {
        return Err(Error::GrammarError(format!("unbalanced list {:?}", s)));
    }
    if start < s.len() {
        items.push(&s[start..]);
    }
    Ok(items)
}
