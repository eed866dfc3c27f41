//! URL slug type for shop addresses.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing or deriving a [`Slug`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// The input string is empty, or nothing usable survived normalization.
    #[error("slug cannot be empty")]
    Empty,
    /// The input string is too short.
    #[error("slug must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// The input string is too long.
    #[error("slug must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[a-z0-9-]`.
    #[error("slug contains invalid character {character:?}")]
    InvalidCharacter {
        /// The offending character.
        character: char,
    },
}

/// A shop's unique URL identifier.
///
/// Slugs address public shop pages (`/shop/<slug>`), so they are restricted
/// to lowercase ASCII letters, digits, and hyphens. A slug is either parsed
/// from an explicitly chosen value or derived from the shop's display name;
/// once assigned it never changes.
///
/// ## Constraints
///
/// - Length: 3-64 characters
/// - Alphabet: `[a-z0-9-]` (uppercase input is lowercased before validation)
///
/// ## Examples
///
/// ```
/// use souq_core::Slug;
///
/// // Explicit slugs are validated
/// assert!(Slug::parse("al-noor-store").is_ok());
/// assert!(Slug::parse("My-Shop").is_ok());      // lowercased
/// assert!(Slug::parse("my shop").is_err());     // spaces not allowed
///
/// // Derived slugs are normalized from display names
/// let slug = Slug::derive("Al Noor Store").unwrap();
/// assert_eq!(slug.as_str(), "al-noor-store");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Minimum length of a slug.
    pub const MIN_LENGTH: usize = 3;

    /// Maximum length of a slug, disambiguator included.
    pub const MAX_LENGTH: usize = 64;

    /// Derived bases are cut here so a `-<millis>` suffix still fits.
    const BASE_MAX: usize = 50;

    /// Parse an explicitly chosen slug.
    ///
    /// The input is lowercased, then validated against the slug alphabet and
    /// length bounds. Unlike [`Slug::derive`], nothing is stripped: an
    /// out-of-alphabet character is an error, not a removal.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, shorter than 3 or longer than
    /// 64 characters, or contains a character outside `[a-z0-9-]`.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }

        let normalized = s.to_lowercase();

        if normalized.len() > Self::MAX_LENGTH {
            return Err(SlugError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(character) = normalized
            .chars()
            .find(|c| !matches!(c, 'a'..='z' | '0'..='9' | '-'))
        {
            return Err(SlugError::InvalidCharacter { character });
        }

        if normalized.len() < Self::MIN_LENGTH {
            return Err(SlugError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        Ok(Self(normalized))
    }

    /// Derive a slug candidate from a shop display name.
    ///
    /// Lowercases the name, strips characters outside `[a-z0-9\s-]`,
    /// collapses runs of whitespace and hyphens into single hyphens, trims
    /// leading and trailing hyphens, and truncates the result to 50
    /// characters.
    ///
    /// # Errors
    ///
    /// Returns [`SlugError::Empty`] if no usable characters survive (for
    /// example a name written entirely in a non-Latin script), or
    /// [`SlugError::TooShort`] if fewer than 3 do.
    pub fn derive(name: &str) -> Result<Self, SlugError> {
        let lowered = name.to_lowercase();
        let mut candidate = String::with_capacity(lowered.len());
        let mut pending_hyphen = false;

        for ch in lowered.chars() {
            match ch {
                'a'..='z' | '0'..='9' => {
                    if pending_hyphen {
                        candidate.push('-');
                        pending_hyphen = false;
                    }
                    candidate.push(ch);
                }
                // Separators collapse into one hyphen; leading ones drop.
                '-' => pending_hyphen = !candidate.is_empty(),
                c if c.is_whitespace() => pending_hyphen = !candidate.is_empty(),
                _ => {}
            }
        }

        if candidate.is_empty() {
            return Err(SlugError::Empty);
        }

        // All survivors are ASCII, so the byte index is a char boundary.
        candidate.truncate(Self::BASE_MAX);
        let trimmed = candidate.trim_end_matches('-');

        if trimmed.len() < Self::MIN_LENGTH {
            return Err(SlugError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Append a deterministic collision suffix.
    ///
    /// The base is truncated to 50 characters first so the result always
    /// stays within [`Slug::MAX_LENGTH`]. The same slug and token always
    /// produce the same output.
    #[must_use]
    pub fn with_disambiguator(&self, token: i64) -> Self {
        let mut base = self.0.clone();
        base.truncate(Self::BASE_MAX);
        let trimmed = base.trim_end_matches('-');
        Self(format!("{trimmed}-{token}"))
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Slug` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
