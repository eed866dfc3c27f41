//! Rating score type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when validating a [`Score`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreError {
    /// The value is outside the 1-5 range.
    #[error("score must be an integer between 1 and 5, got {value}")]
    OutOfRange {
        /// The rejected value.
        value: u8,
    },
}

/// A single user's 1-5 star score for a product.
///
/// ## Examples
///
/// ```
/// use souq_core::Score;
///
/// assert!(Score::new(5).is_ok());
/// assert!(Score::new(0).is_err());
/// assert!(Score::new(6).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Score(u8);

impl Score {
    /// Lowest accepted score.
    pub const MIN: u8 = 1;

    /// Highest accepted score.
    pub const MAX: u8 = 5;

    /// Validate a raw score value.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::OutOfRange`] unless `1 <= value <= 5`.
    pub const fn new(value: u8) -> Result<Self, ScoreError> {
        if matches!(value, Self::MIN..=Self::MAX) {
            Ok(Self(value))
        } else {
            Err(ScoreError::OutOfRange { value })
        }
    }

    /// Get the raw score value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// The score as a float, for averaging.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_full_range() {
        for value in 1..=5 {
            assert_eq!(Score::new(value).unwrap().get(), value);
        }
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert_eq!(Score::new(0), Err(ScoreError::OutOfRange { value: 0 }));
        assert_eq!(Score::new(6), Err(ScoreError::OutOfRange { value: 6 }));
    }

    #[test]
    fn test_as_f64() {
        let score = Score::new(4).unwrap();
        assert!((score.as_f64() - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ordering() {
        assert!(Score::new(2).unwrap() < Score::new(5).unwrap());
    }

    #[test]
    fn test_serde_as_bare_number() {
        let score = Score::new(3).unwrap();
        let json = serde_json::to_string(&score).unwrap();
        assert_eq!(json, "3");
        assert_eq!(serde_json::from_str::<Score>(&json).unwrap(), score);
    }
}
