//! Identifier generation and boundary parsing.
//!
//! Records are keyed by UUIDv7, which embeds a millisecond timestamp so ids
//! sort by creation time. Identifiers cross the HTTP boundary as strings and
//! are validated here before any store lookup.

use uuid::Uuid;

use crate::error::{Error, Result};

/// Generate a new UUIDv7 identifier.
#[inline]
pub fn new_v7() -> Uuid {
    Uuid::now_v7()
}

/// Parse a caller-supplied user id.
pub fn parse_user_id(raw: &str) -> Result<Uuid> {
    parse_id(raw, "user")
}

/// Parse a caller-supplied note id.
pub fn parse_note_id(raw: &str) -> Result<Uuid> {
    parse_id(raw, "note")
}

fn parse_id(raw: &str, entity: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| Error::InvalidId(format!("Invalid {} ID format", entity)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_v7_is_version_7() {
        assert_eq!(new_v7().get_version_num(), 7);
    }

    #[test]
    fn test_new_v7_sorts_by_creation() {
        let a = new_v7();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = new_v7();
        assert!(a < b);
    }

    #[test]
    fn test_parse_valid_id() {
        let id = new_v7();
        assert_eq!(parse_note_id(&id.to_string()).unwrap(), id);
        assert_eq!(parse_user_id(&format!(" {} ", id)).unwrap(), id);
    }

    #[test]
    fn test_parse_invalid_user_id() {
        let err = parse_user_id("not-an-id").unwrap_err();
        match err {
            Error::InvalidId(msg) => assert_eq!(msg, "Invalid user ID format"),
            other => panic!("Expected InvalidId, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_invalid_note_id() {
        // 24-hex document-store ids are not accepted
        let err = parse_note_id("64b7f0c2e1d3a4b5c6d7e8f9").unwrap_err();
        assert!(matches!(err, Error::InvalidId(ref m) if m == "Invalid note ID format"));
    }

    #[test]
    fn test_parse_empty_id() {
        assert!(parse_note_id("").is_err());
    }
}
