//! Finds the characters a uxntal program prints.

use std::collections::BTreeSet;

/// Characters that always get a glyph: ASCII space and the ideographic space.
pub const SENTINEL_CHARACTERS: [char; 2] = [' ', '\u{3000}'];

/// Concatenates the bodies of all string literals of a uxntal source.
///
/// uxntal strings are single whitespace separated tokens starting with `"`,
/// the quote itself is not part of the text.
pub fn string_literal_text(source: &str) -> String {
    source
        .split_whitespace()
        .filter_map(|token| token.strip_prefix('"'))
        .collect()
}

/// The set of characters that need a glyph, sorted by code point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedCharacterSet {
    chars: BTreeSet<char>,
}

impl UsedCharacterSet {
    /// Scans a uxntal source, the sentinel characters are always included.
    pub fn from_source(source: &str) -> Self {
        Self::from_text(&string_literal_text(source))
    }

    pub fn from_text(text: &str) -> Self {
        let chars = text.chars().chain(SENTINEL_CHARACTERS).collect();
        Self { chars }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn contains(&self, ch: char) -> bool {
        self.chars.contains(&ch)
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }

    /// Sorted, distinct prehash values of all characters.
    pub fn prehashes(&self) -> Vec<u16> {
        let keys: BTreeSet<u16> = self.iter().map(crate::prehash).collect();
        keys.into_iter().collect()
    }
}
