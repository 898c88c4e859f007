//! RoomNumber - Validated guest room identifier

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

const MAX_LEN: usize = 10;

/// A guest room identifier such as `101`, `1204` or `B-12`
///
/// Accepted after trimming when it is 1-10 characters of ASCII letters,
/// digits or `-` and contains at least one digit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomNumber(String);

impl RoomNumber {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(DomainError::validation("room number is empty"));
        }
        if trimmed.chars().count() > MAX_LEN {
            return Err(DomainError::validation(format!(
                "room number '{}' is longer than {} characters",
                trimmed, MAX_LEN
            )));
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(DomainError::validation(format!(
                "room number '{}' contains invalid characters",
                trimmed
            )));
        }
        if !trimmed.chars().any(|c| c.is_ascii_digit()) {
            return Err(DomainError::validation(format!(
                "room number '{}' has no digits",
                trimmed
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoomNumber {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RoomNumber> for String {
    fn from(room: RoomNumber) -> Self {
        room.0
    }
}

impl std::fmt::Display for RoomNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_numeric_rooms() {
        assert_eq!(RoomNumber::parse(" 1204 ").unwrap().as_str(), "1204");
        assert_eq!(RoomNumber::parse("B-12").unwrap().as_str(), "B-12");
    }

    #[test]
    fn test_rejects_malformed_rooms() {
        assert!(RoomNumber::parse("").is_err());
        assert!(RoomNumber::parse("   ").is_err());
        assert!(RoomNumber::parse("lobby").is_err());
        assert!(RoomNumber::parse("12 04").is_err());
        assert!(RoomNumber::parse("12345678901").is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let room: Result<RoomNumber, _> = serde_json::from_str("\"\"");
        assert!(room.is_err());
        let room: RoomNumber = serde_json::from_str("\"305\"").unwrap();
        assert_eq!(room.to_string(), "305");
    }
}
