//! UUID utilities

use uuid::Uuid;

/// Generate a new UUIDv4
pub fn generate() -> Uuid {
    Uuid::new_v4()
}

/// Parse UUID from string
pub fn parse(s: &str) -> Result<Uuid, uuid::Error> {
    Uuid::parse_str(s)
}

/// Parse a path id, mapping anything that isn't a UUID to `None`
///
/// Song ids are only ever UUIDs, so a malformed id can never match a record.
pub fn parse_id(s: &str) -> Option<Uuid> {
    parse(s).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_unique() {
        assert_ne!(generate(), generate());
    }

    #[test]
    fn test_parse_id() {
        let id = generate();
        assert_eq!(parse_id(&id.to_string()), Some(id));
        assert_eq!(parse_id("000"), None);
        assert_eq!(parse_id(""), None);
    }
}
