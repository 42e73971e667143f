//! Column addressing: spreadsheet letters and normalized column names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between the letter prefix and the caption of a normalized name.
pub const CAPTION_DELIMITER: &str = "} - ";

/// A spreadsheet column key (`A`, `B`, ..., `Z`, `AA`, ...).
///
/// The letters are a bijective base-26 encoding of a 1-based column
/// ordinal. Keys are always stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnKey(String);

impl ColumnKey {
    /// Build the key for a 1-based column ordinal. Returns `None` for 0.
    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        if ordinal == 0 {
            return None;
        }
        Some(Self(column_letters(ordinal)))
    }

    /// Parse column letters, ignoring case.
    ///
    /// Returns `None` when the text is empty, contains anything other than
    /// ASCII letters, or addresses a column beyond `usize`.
    pub fn parse(letters: &str) -> Option<Self> {
        letters_to_ordinal(letters)?;
        Some(Self(letters.to_ascii_uppercase()))
    }

    /// The 1-based column ordinal this key addresses.
    pub fn ordinal(&self) -> usize {
        // Construction guarantees the letters are valid.
        letters_to_ordinal(&self.0).unwrap_or(0)
    }

    /// The zero-based column index this key addresses.
    pub fn index(&self) -> usize {
        self.ordinal() - 1
    }

    /// The letters of this key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Convert a 1-based column ordinal into spreadsheet letters.
///
/// Returns an empty string for 0.
pub fn column_letters(ordinal: usize) -> String {
    let mut letters = Vec::new();
    let mut dividend = ordinal;

    while dividend > 0 {
        let modulo = (dividend - 1) % 26;
        letters.push(b'A' + modulo as u8);
        dividend = (dividend - modulo) / 26;
    }

    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Convert spreadsheet letters (any case) into a 1-based column ordinal.
pub fn letters_to_ordinal(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }

    letters.bytes().try_fold(0usize, |sum, byte| {
        if !byte.is_ascii_alphabetic() {
            return None;
        }
        let digit = (byte.to_ascii_uppercase() - b'A' + 1) as usize;
        sum.checked_mul(26)?.checked_add(digit)
    })
}

/// A normalized column name of the form `{<letters>} - <caption>`.
///
/// The letter prefix keeps columns with identical captions apart, so the
/// name is unique within a sheet and serves as the cross-workbook join key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnName(String);

impl ColumnName {
    /// Compose the normalized name for a column key and its header caption.
    pub fn new(key: &ColumnKey, caption: &str) -> Self {
        Self(format!("{{{}{}{}", key, CAPTION_DELIMITER, caption))
    }

    /// Wrap an already normalized name.
    pub fn from_raw(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The full normalized name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The letter fragment: between the leading `{` and the last delimiter.
    pub fn letter(&self) -> &str {
        match self.0.rfind(CAPTION_DELIMITER) {
            Some(idx) => {
                let head = &self.0[..idx];
                head.strip_prefix('{').unwrap_or(head)
            }
            None => "",
        }
    }

    /// The caption fragment: everything after the last delimiter.
    pub fn caption(&self) -> &str {
        match self.0.rfind(CAPTION_DELIMITER) {
            Some(idx) => &self.0[idx + CAPTION_DELIMITER.len()..],
            None => &self.0,
        }
    }
}

impl fmt::Display for ColumnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letters(1), "A");
        assert_eq!(column_letters(26), "Z");
        assert_eq!(column_letters(27), "AA");
        assert_eq!(column_letters(52), "AZ");
        assert_eq!(column_letters(702), "ZZ");
        assert_eq!(column_letters(703), "AAA");
        assert_eq!(column_letters(0), "");
    }

    #[test]
    fn test_letters_to_ordinal() {
        assert_eq!(letters_to_ordinal("A"), Some(1));
        assert_eq!(letters_to_ordinal("z"), Some(26));
        assert_eq!(letters_to_ordinal("AA"), Some(27));
        assert_eq!(letters_to_ordinal("ZZ"), Some(702));
        assert_eq!(letters_to_ordinal(""), None);
        assert_eq!(letters_to_ordinal("A1"), None);
        assert_eq!(letters_to_ordinal("A-"), None);
    }

    #[test]
    fn test_codec_roundtrip() {
        for ordinal in 1..=20_000 {
            let letters = column_letters(ordinal);
            assert_eq!(letters_to_ordinal(&letters), Some(ordinal), "{}", letters);
        }
    }

    #[test]
    fn test_letters_overflow() {
        let letters = "Z".repeat(64);
        assert_eq!(letters_to_ordinal(&letters), None);
        assert!(ColumnKey::parse(&letters).is_none());
    }

    #[test]
    fn test_column_key() {
        let key = ColumnKey::parse("ab").unwrap();
        assert_eq!(key.as_str(), "AB");
        assert_eq!(key.ordinal(), 28);
        assert_eq!(key.index(), 27);
        assert_eq!(ColumnKey::from_ordinal(28), Some(key));
        assert!(ColumnKey::from_ordinal(0).is_none());
    }

    #[test]
    fn test_column_name_parts() {
        let key = ColumnKey::parse("B").unwrap();
        let name = ColumnName::new(&key, "Revenue");
        assert_eq!(name.as_str(), "{B} - Revenue");
        assert_eq!(name.letter(), "B");
        assert_eq!(name.caption(), "Revenue");
    }

    #[test]
    fn test_column_name_empty_caption() {
        let name = ColumnName::new(&ColumnKey::parse("AC").unwrap(), "");
        assert_eq!(name.as_str(), "{AC} - ");
        assert_eq!(name.letter(), "AC");
        assert_eq!(name.caption(), "");
    }

    #[test]
    fn test_column_name_splits_at_last_delimiter() {
        let name = ColumnName::from_raw("{A} - x} - y");
        assert_eq!(name.letter(), "A} - x");
        assert_eq!(name.caption(), "y");
    }

    #[test]
    fn test_column_name_without_delimiter() {
        let name = ColumnName::from_raw("UNIQUE_IDENTIFIER");
        assert_eq!(name.letter(), "");
        assert_eq!(name.caption(), "UNIQUE_IDENTIFIER");
    }
}
