//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when validating a [`Price`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is zero or negative.
    #[error("price must be greater than zero")]
    NotPositive,
    /// The amount exceeds the listing cap.
    #[error("price must be at most {max}")]
    ExceedsMaximum {
        /// Maximum allowed amount.
        max: u32,
    },
}

/// A product listing price.
///
/// Amounts are decimal (never floating point), must be positive, and are
/// capped at 999 999 in the currency's standard unit. The marketplace is
/// single-currency in practice (Libyan dinar), but the code is carried on
/// the value for display.
///
/// ## Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use souq_core::Price;
///
/// let price = Price::lyd(Decimal::from(25_000u32)).unwrap();
/// assert_eq!(price.display(), "25,000 د.ل");
///
/// assert!(Price::lyd(Decimal::ZERO).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dinars, not dirhams).
    amount: Decimal,
    /// ISO 4217 currency code.
    currency_code: CurrencyCode,
}

impl Price {
    /// Maximum listable amount.
    pub const MAX_AMOUNT: u32 = 999_999;

    /// Validate a price.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not positive or exceeds
    /// [`Price::MAX_AMOUNT`].
    pub fn new(amount: Decimal, currency_code: CurrencyCode) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }

        if amount > Decimal::from(Self::MAX_AMOUNT) {
            return Err(PriceError::ExceedsMaximum {
                max: Self::MAX_AMOUNT,
            });
        }

        Ok(Self {
            amount,
            currency_code,
        })
    }

    /// Validate a price in Libyan dinars.
    ///
    /// # Errors
    ///
    /// Same as [`Price::new`].
    pub fn lyd(amount: Decimal) -> Result<Self, PriceError> {
        Self::new(amount, CurrencyCode::Lyd)
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// The currency code.
    #[must_use]
    pub const fn currency_code(&self) -> CurrencyCode {
        self.currency_code
    }

    /// Format for display: thousands-separated amount plus currency symbol,
    /// e.g. `25,000 د.ل`. Trailing fractional zeros are dropped.
    #[must_use]
    pub fn display(&self) -> String {
        format!(
            "{} {}",
            group_thousands(self.amount),
            self.currency_code.symbol()
        )
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    /// Libyan dinar.
    #[default]
    Lyd,
    /// United States dollar.
    Usd,
    /// Euro.
    Eur,
}

impl CurrencyCode {
    /// The ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Lyd => "LYD",
            Self::Usd => "USD",
            Self::Eur => "EUR",
        }
    }

    /// The display symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Lyd => "د.ل",
            Self::Usd => "$",
            Self::Eur => "€",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Group the integer digits of a positive decimal in threes.
fn group_thousands(amount: Decimal) -> String {
    let text = amount.normalize().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let digit_count = int_part.chars().count();
    let mut grouped = String::with_capacity(digit_count + digit_count / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digit_count - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{grouped}.{frac}"),
        None => grouped,
    }
}
