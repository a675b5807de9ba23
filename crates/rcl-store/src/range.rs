use std::fmt;

use serde::{Deserialize, Serialize};

/// A half-open key interval `[start, end)`; `end == None` is unbounded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRange {
    pub start: String,
    pub end: Option<String>,
}

impl KeyRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: Some(end.into()),
        }
    }

    /// Every key that begins with `prefix`.
    pub fn prefix(prefix: &str) -> Self {
        Self {
            start: prefix.to_string(),
            end: prefix_successor(prefix),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        key >= self.start.as_str() && self.end.as_deref().map_or(true, |end| key < end)
    }

    /// Returns `true` if no key can fall inside the range.
    pub fn is_empty(&self) -> bool {
        self.end
            .as_deref()
            .is_some_and(|end| end <= self.start.as_str())
    }
}

impl fmt::Display for KeyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.end {
            Some(end) => write!(f, "[{:?}, {:?})", self.start, end),
            None => write!(f, "[{:?}, ..)", self.start),
        }
    }
}

/// Smallest string greater than every string starting with `prefix`.
fn prefix_successor(prefix: &str) -> Option<String> {
    let mut chars: Vec<char> = prefix.chars().collect();
    while let Some(last) = chars.pop() {
        let bumped = match last {
            '\u{D7FF}' => Some('\u{E000}'),
            c => char::from_u32(c as u32 + 1),
        };
        if let Some(c) = bumped {
            chars.push(c);
            return Some(chars.into_iter().collect());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_range_is_half_open() {
        let range = KeyRange::new("user0", "user99");
        assert!(range.contains("user0"));
        assert!(range.contains("user1"));
        assert!(range.contains("user10"));
        assert!(range.contains("user100"));
        assert!(range.contains("user98"));
        assert!(!range.contains("user99"));
        assert!(!range.contains("users"));
        assert!(!range.contains("order1"));
    }

    #[test]
    fn prefix_range_covers_all_extensions() {
        let range = KeyRange::prefix("rec");
        assert_eq!(range.end.as_deref(), Some("red"));
        assert!(range.contains("rec"));
        assert!(range.contains("rec1"));
        assert!(range.contains("rec99999"));
        assert!(!range.contains("red"));
        assert!(!range.contains("re"));
    }

    #[test]
    fn empty_prefix_is_unbounded() {
        let range = KeyRange::prefix("");
        assert_eq!(range.end, None);
        assert!(range.contains("anything"));
    }

    #[test]
    fn inverted_range_is_empty() {
        assert!(KeyRange::new("b", "a").is_empty());
        assert!(KeyRange::new("a", "a").is_empty());
        assert!(!KeyRange::new("a", "b").is_empty());
    }

    #[test]
    fn successor_skips_max_char() {
        let prefix = format!("a{}", char::MAX);
        assert_eq!(KeyRange::prefix(&prefix).end.as_deref(), Some("b"));
    }
}
