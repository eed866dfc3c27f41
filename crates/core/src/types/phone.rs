//! Contact phone number type for order handoff.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneNumberError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains a non-digit character.
    #[error("phone number contains invalid character {character:?}")]
    InvalidCharacter {
        /// The offending character.
        character: char,
    },
    /// The digits do not form a Libyan mobile number.
    #[error("expected a Libyan mobile number such as 0912345678 or 218912345678")]
    NotLibyanMobile,
}

/// A shop's contact number for the messaging handoff.
///
/// Accepts Libyan mobile numbers with or without the `218` country code or
/// the `0` trunk prefix, ignoring internal whitespace, and stores the
/// canonical international form (`218` followed by the nine-digit mobile
/// number). The canonical form is what messaging deep links require.
///
/// ## Examples
///
/// ```
/// use souq_core::PhoneNumber;
///
/// let phone = PhoneNumber::parse("091 234 5678").unwrap();
/// assert_eq!(phone.as_str(), "218912345678");
///
/// assert_eq!(PhoneNumber::parse("218912345678").unwrap(), phone);
/// assert_eq!(PhoneNumber::parse("912345678").unwrap(), phone);
///
/// assert!(PhoneNumber::parse("0812345678").is_err()); // not a mobile prefix
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse and canonicalize a contact number.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains anything other than
    /// digits and whitespace, or does not reduce to a nine-digit Libyan
    /// mobile number starting with `9` (optionally prefixed by `218` or `0`).
    pub fn parse(s: &str) -> Result<Self, PhoneNumberError> {
        let cleaned: String = s.chars().filter(|c| !c.is_whitespace()).collect();

        if cleaned.is_empty() {
            return Err(PhoneNumberError::Empty);
        }

        if let Some(character) = cleaned.chars().find(|c| !c.is_ascii_digit()) {
            return Err(PhoneNumberError::InvalidCharacter { character });
        }

        let local = cleaned
            .strip_prefix("218")
            .or_else(|| cleaned.strip_prefix('0'))
            .unwrap_or(&cleaned);

        if local.len() != 9 || !local.starts_with('9') {
            return Err(PhoneNumberError::NotLibyanMobile);
        }

        Ok(Self(format!("218{local}")))
    }

    /// Returns the canonical international form, digits only.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `PhoneNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_trunk_prefix() {
        let phone = PhoneNumber::parse("0912345678").unwrap();
        assert_eq!(phone.as_str(), "218912345678");
    }

    #[test]
    fn test_parse_with_country_code() {
        let phone = PhoneNumber::parse("218912345678").unwrap();
        assert_eq!(phone.as_str(), "218912345678");
    }

    #[test]
    fn test_parse_bare_local_number() {
        let phone = PhoneNumber::parse("912345678").unwrap();
        assert_eq!(phone.as_str(), "218912345678");
    }

    #[test]
    fn test_parse_ignores_whitespace() {
        let phone = PhoneNumber::parse(" 091 234 5678 ").unwrap();
        assert_eq!(phone.as_str(), "218912345678");
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(
            PhoneNumber::parse("   "),
            Err(PhoneNumberError::Empty)
        ));
    }

    #[test]
    fn test_parse_rejects_non_digits() {
        assert!(matches!(
            PhoneNumber::parse("+218912345678"),
            Err(PhoneNumberError::InvalidCharacter { character: '+' })
        ));
        assert!(matches!(
            PhoneNumber::parse("091-234-5678"),
            Err(PhoneNumberError::InvalidCharacter { character: '-' })
        ));
    }

    #[test]
    fn test_parse_rejects_non_mobile_prefix() {
        assert!(matches!(
            PhoneNumber::parse("0812345678"),
            Err(PhoneNumberError::NotLibyanMobile)
        ));
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(matches!(
            PhoneNumber::parse("09123456"),
            Err(PhoneNumberError::NotLibyanMobile)
        ));
        assert!(matches!(
            PhoneNumber::parse("09123456789"),
            Err(PhoneNumberError::NotLibyanMobile)
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let phone = PhoneNumber::parse("0912345678").unwrap();
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"218912345678\"");
        assert_eq!(serde_json::from_str::<PhoneNumber>(&json).unwrap(), phone);
    }
}
