//! Address values embedded in query filters.

use std::fmt;

use crate::query::QueryError;

/// A blockchain address or identifier used as a query filter value.
///
/// The value is embedded between double quotes in the query text, so
/// construction rejects anything that would terminate or escape that string:
/// double quotes, backslashes and control characters. Surrounding whitespace
/// is trimmed.
///
/// # Example
///
/// ```rust
/// use forge_data::query::FilterAddress;
///
/// let address = FilterAddress::new("  0xAbC  ").unwrap();
/// assert_eq!(address.as_ref(), "0xAbC");
///
/// assert!(FilterAddress::new(r#"0x" } }"#).is_err());
/// assert_eq!(FilterAddress::parse_optional("   ").unwrap(), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FilterAddress(String);

impl FilterAddress {
    /// Creates a new validated address.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::MalformedAddress`] if the address is blank or
    /// contains a double quote, a backslash or a control character.
    pub fn new(address: impl Into<String>) -> Result<Self, QueryError> {
        let address = address.into();
        let trimmed = address.trim();
        let is_valid = !trimmed.is_empty()
            && !trimmed
                .chars()
                .any(|c| c == '"' || c == '\\' || c.is_control());
        if !is_valid {
            return Err(QueryError::MalformedAddress { address });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Parses operator input, treating blank input as "no address".
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::MalformedAddress`] for non-blank input that
    /// [`FilterAddress::new`] rejects.
    pub fn parse_optional(input: &str) -> Result<Option<Self>, QueryError> {
        if input.trim().is_empty() {
            return Ok(None);
        }
        Self::new(input).map(Some)
    }
}

impl AsRef<str> for FilterAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilterAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_hex_addresses() {
        let address = FilterAddress::new("0x5f4ec3df9cbd43714fe2740f5e3616155c5b8419").unwrap();
        assert_eq!(address.as_ref(), "0x5f4ec3df9cbd43714fe2740f5e3616155c5b8419");
    }

    #[test]
    fn test_accepts_composite_identifiers() {
        // PoolDayData ids are "<pool>-<day>"
        assert!(FilterAddress::new("0xabc-19500").is_ok());
    }

    #[test]
    fn test_rejects_query_breaking_characters() {
        for raw in ["0x\"abc", "0x\\abc", "0xa\nbc", "0x\tabc", ""] {
            assert!(
                matches!(FilterAddress::new(raw), Err(QueryError::MalformedAddress { .. })),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_optional_blank_is_none() {
        assert_eq!(FilterAddress::parse_optional("").unwrap(), None);
        assert_eq!(FilterAddress::parse_optional(" \t ").unwrap(), None);
        assert!(FilterAddress::parse_optional("0x1").unwrap().is_some());
        assert!(FilterAddress::parse_optional("0x\"1").is_err());
    }
}
