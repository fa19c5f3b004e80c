//! Typed identifier for catalog entries.
//!
//! Entry ids are assigned by the catalog store, increase monotonically, and
//! are never reused after a deletion. They order entries for neighbor
//! navigation; the file path, not the id, is the reconciliation key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Store-assigned identifier of a cataloged media entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(i64);

impl EntryId {
    /// Raw integer value, as stored in the database.
    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for EntryId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<EntryId> for i64 {
    fn from(id: EntryId) -> Self {
        id.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| crate::Error::invalid_input(format!("Invalid entry id: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_id_roundtrip() {
        let id = EntryId::from(12);
        let raw: i64 = id.into();
        assert_eq!(raw, 12);
        assert_eq!(id.get(), 12);
    }

    #[test]
    fn test_entry_id_parse() {
        assert_eq!("42".parse::<EntryId>().unwrap(), EntryId::from(42));
        assert_eq!(" 7 ".parse::<EntryId>().unwrap(), EntryId::from(7));

        let err = "abc".parse::<EntryId>().unwrap_err();
        assert!(matches!(err, crate::Error::InvalidInput(_)));
    }

    #[test]
    fn test_entry_id_serializes_as_integer() {
        let json = serde_json::to_string(&EntryId::from(5)).unwrap();
        assert_eq!(json, "5");
        let back: EntryId = serde_json::from_str("5").unwrap();
        assert_eq!(back, EntryId::from(5));
    }

    #[test]
    fn test_entry_id_ordering() {
        assert!(EntryId::from(1) < EntryId::from(2));
        assert_eq!(format!("{}", EntryId::from(9)), "9");
    }
}
