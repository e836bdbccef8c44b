//! Money type for prices and totals.
//!
//! Amounts are integers in the currency's minor unit, so `42.00 USD` is
//! `4200`. All arithmetic used by the bag is checked.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    JPY,
    CHF,
    AED,
}

impl Currency {
    /// Get the currency code (e.g., "USD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CHF => "CHF",
            Currency::AED => "AED",
        }
    }

    /// Get the currency symbol (e.g., "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::JPY => "\u{00a5}",
            Currency::CHF => "CHF ",
            Currency::AED => "AED ",
        }
    }

    /// Number of decimal places in the minor unit.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "JPY" => Some(Currency::JPY),
            "CHF" => Some(Currency::CHF),
            "AED" => Some(Currency::AED),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in the smallest currency unit (e.g., cents).
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a Money value from a decimal amount.
    ///
    /// Returns `None` for NaN, infinities and amounts outside the range of
    /// minor units.
    ///
    /// ```
    /// use ritual_bag::money::{Money, Currency};
    /// let price = Money::from_decimal(42.00, Currency::USD).unwrap();
    /// assert_eq!(price.amount_cents, 4200);
    /// assert_eq!(Money::from_decimal(f64::NAN, Currency::USD), None);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Option<Self> {
        let multiplier = 10_i64.pow(currency.decimal_places());
        let scaled = (amount * multiplier as f64).round();
        // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
        if !scaled.is_finite() || scaled < i64::MIN as f64 || scaled >= i64::MAX as f64 {
            return None;
        }
        Some(Self::new(scaled as i64, currency))
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_cents < 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        let divisor = 10_i64.pow(self.currency.decimal_places());
        self.amount_cents as f64 / divisor as f64
    }

    /// Format as a display string (e.g., "$42.00").
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.display_amount())
    }

    /// Format without symbol (e.g., "42.00").
    pub fn display_amount(&self) -> String {
        let places = self.currency.decimal_places() as usize;
        format!("{:.places$}", self.to_decimal())
    }

    /// Add another value; `None` on currency mismatch or overflow.
    pub fn checked_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_cents
            .checked_add(other.amount_cents)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Multiply by a quantity; `None` on overflow.
    pub fn checked_mul(&self, factor: i64) -> Option<Money> {
        self.amount_cents
            .checked_mul(factor)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Sum values of one currency; `None` on mismatch or overflow.
    pub fn checked_sum<'a>(
        iter: impl IntoIterator<Item = &'a Money>,
        currency: Currency,
    ) -> Option<Money> {
        iter.into_iter()
            .try_fold(Money::zero(currency), |acc, m| acc.checked_add(m))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_decimal() {
        let m = Money::from_decimal(49.99, Currency::USD).unwrap();
        assert_eq!(m.amount_cents, 4999);

        let m = Money::from_decimal(100.0, Currency::JPY).unwrap();
        assert_eq!(m.amount_cents, 100);

        let m = Money::from_decimal(-1.0, Currency::USD).unwrap();
        assert!(m.is_negative());
    }

    #[test]
    fn test_money_from_decimal_rejects_non_finite() {
        assert_eq!(Money::from_decimal(f64::NAN, Currency::USD), None);
        assert_eq!(Money::from_decimal(f64::INFINITY, Currency::USD), None);
        assert_eq!(Money::from_decimal(f64::NEG_INFINITY, Currency::EUR), None);
        assert_eq!(Money::from_decimal(1e17, Currency::USD), None);
        assert_eq!(Money::from_decimal(-1e17, Currency::USD), None);
        assert!(Money::from_decimal(1e15, Currency::USD).is_some());
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(4200, Currency::USD).display(), "$42.00");
        assert_eq!(Money::new(100, Currency::JPY).display(), "\u{00a5}100");
        assert_eq!(Money::new(15500, Currency::AED).display(), "AED 155.00");
    }

    #[test]
    fn test_checked_add_rejects_mixed_currency() {
        let usd = Money::new(1000, Currency::USD);
        let eur = Money::new(1000, Currency::EUR);
        assert_eq!(usd.checked_add(&eur), None);
        assert_eq!(usd.checked_add(&usd), Some(Money::new(2000, Currency::USD)));
    }

    #[test]
    fn test_checked_mul_overflow() {
        let m = Money::new(i64::MAX / 2 + 1, Currency::USD);
        assert_eq!(m.checked_mul(2), None);
        assert_eq!(
            Money::new(4200, Currency::USD).checked_mul(5),
            Some(Money::new(21000, Currency::USD))
        );
    }

    #[test]
    fn test_checked_sum() {
        let values = [
            Money::new(6000, Currency::USD),
            Money::new(9500, Currency::USD),
        ];
        assert_eq!(
            Money::checked_sum(&values, Currency::USD),
            Some(Money::new(15500, Currency::USD))
        );
        assert_eq!(
            Money::checked_sum(std::iter::empty(), Currency::EUR),
            Some(Money::zero(Currency::EUR))
        );
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("USD"), Some(Currency::USD));
        assert_eq!(Currency::from_code("eur"), Some(Currency::EUR));
        assert_eq!(Currency::from_code("INVALID"), None);
    }
}
