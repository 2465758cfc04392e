//! Sequence-set grammar: `N`, `N:M`, `N:*`, `*`, and comma lists of those

use crate::error::{Error, Result};
use crate::types::Uid;

/// One element of a sequence set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceSpecifier {
    /// A single number
    Single(Uid),
    /// An inclusive range, always stored with `start <= end`
    Range(Uid, Uid),
    /// Everything from `start` up to the highest number in use
    RangeToEnd(Uid),
    /// `*` on its own
    All,
}

impl SequenceSpecifier {
    /// Whether `n` falls inside this specifier.
    pub fn contains(&self, n: Uid) -> bool {
        match *self {
            SequenceSpecifier::Single(x) => n == x,
            SequenceSpecifier::Range(start, end) => (start..=end).contains(&n),
            SequenceSpecifier::RangeToEnd(start) => n >= start,
            SequenceSpecifier::All => true,
        }
    }
}

fn parse_number(token: &str, whole: &str) -> Result<Uid> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidSequenceSet(whole.to_string()));
    }
    match token.parse::<Uid>() {
        Ok(0) | Err(_) => Err(Error::InvalidSequenceSet(whole.to_string())),
        Ok(n) => Ok(n),
    }
}

/// Classify a single sequence token.
pub fn parse_sequence_specifier(token: &str) -> Result<SequenceSpecifier> {
    match token.split_once(':') {
        Some((start, end)) => match (start, end) {
            ("*", "*") => Ok(SequenceSpecifier::All),
            ("*", n) | (n, "*") => Ok(SequenceSpecifier::RangeToEnd(parse_number(n, token)?)),
            (start, end) => {
                let start = parse_number(start, token)?;
                let end = parse_number(end, token)?;
                Ok(SequenceSpecifier::Range(start.min(end), start.max(end)))
            }
        },
        None if token == "*" => Ok(SequenceSpecifier::All),
        None => Ok(SequenceSpecifier::Single(parse_number(token, token)?)),
    }
}

/// Parse a full sequence set, which may be a comma-separated list.
pub fn parse_sequence_set(set: &str) -> Result<Vec<SequenceSpecifier>> {
    if set.is_empty() {
        return Err(Error::InvalidSequenceSet(set.to_string()));
    }
    set.split(',').map(parse_sequence_specifier).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_and_all() {
        assert_eq!(parse_sequence_specifier("7").unwrap(), SequenceSpecifier::Single(7));
        assert_eq!(parse_sequence_specifier("*").unwrap(), SequenceSpecifier::All);
        assert_eq!(parse_sequence_specifier("*:*").unwrap(), SequenceSpecifier::All);
    }

    #[test]
    fn test_ranges() {
        assert_eq!(
            parse_sequence_specifier("5:*").unwrap(),
            SequenceSpecifier::RangeToEnd(5)
        );
        assert_eq!(
            parse_sequence_specifier("*:5").unwrap(),
            SequenceSpecifier::RangeToEnd(5)
        );
        assert_eq!(
            parse_sequence_specifier("5:10").unwrap(),
            SequenceSpecifier::Range(5, 10)
        );
        assert_eq!(
            parse_sequence_specifier("10:5").unwrap(),
            SequenceSpecifier::Range(5, 10)
        );
    }

    #[test]
    fn test_invalid() {
        for bad in ["5:", ":5", ":", "", "abc", "0", "1:0", "-3", "1:2:3", "4x"] {
            assert!(
                matches!(parse_sequence_specifier(bad), Err(Error::InvalidSequenceSet(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_set_lists() {
        assert_eq!(
            parse_sequence_set("1,3:4,9:*").unwrap(),
            vec![
                SequenceSpecifier::Single(1),
                SequenceSpecifier::Range(3, 4),
                SequenceSpecifier::RangeToEnd(9),
            ]
        );
        assert!(parse_sequence_set("1,,2").is_err());
        assert!(parse_sequence_set("").is_err());
    }

    #[test]
    fn test_contains() {
        assert!(SequenceSpecifier::Range(2, 4).contains(3));
        assert!(!SequenceSpecifier::Range(2, 4).contains(5));
        assert!(SequenceSpecifier::RangeToEnd(2).contains(200));
        assert!(SequenceSpecifier::All.contains(1));
        assert!(!SequenceSpecifier::Single(1).contains(2));
    }
}
