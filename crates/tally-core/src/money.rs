//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A ticket of 3 × $19.99 with 15% off, computed in floats, drifts by     │
//! │  fractions of a cent at every step: line, subtotal, discount, total.    │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Backend prices are parsed TEXTUALLY into cents on arrival,           │
//! │    every sum is exact, and only the discount step rounds (half-up).    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::money::Money;
//!
//! let price = Money::parse_decimal("19.99").unwrap();
//! assert_eq!(price.cents(), 1999);
//!
//! let line = price * 3;
//! assert_eq!(line.to_string(), "$59.97");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::validation::ValidationResult;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values (discounts, refunds)
/// - **Single field tuple struct**: Zero-cost abstraction over i64
///
/// ## Where Money is Used
/// ```text
/// ProductSnapshot.unit_price ──► TicketLine.unit_price ──► TicketLine.subtotal
///                                                               │
///                      Totals.subtotal ◄────────────────────────┘
///                           │
///                           ├──► Totals.discount_amount (rounded once)
///                           ▼
///                      Totals.total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Parses a decimal amount as sent by the backend ("12.5", "-3", "0.999").
    ///
    /// The string is parsed digit by digit, never through `f64`. Digits past
    /// the second decimal place are rounded half-up (away from zero).
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("12.5").unwrap().cents(), 1250);
    /// assert_eq!(Money::parse_decimal("0.125").unwrap().cents(), 13);
    /// assert!(Money::parse_decimal("12,50").is_err());
    /// ```
    pub fn parse_decimal(input: &str) -> ValidationResult<Money> {
        let text = input.trim();
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let (negative, unsigned) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            Some(_) => (false, text),
            None => {
                return Err(ValidationError::Required {
                    field: "amount".to_string(),
                })
            }
        };

        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("no digits"));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid("expected digits with an optional decimal point"));
        }

        let overflow = || ValidationError::OutOfRange {
            field: "amount".to_string(),
            min: i64::MIN,
            max: i64::MAX,
        };

        let mut cents: i64 = 0;
        for digit in whole.bytes() {
            cents = cents
                .checked_mul(10)
                .and_then(|c| c.checked_add(i64::from(digit - b'0')))
                .ok_or_else(overflow)?;
        }

        let mut fraction_digits = fraction.bytes();
        for _ in 0..2 {
            let digit = fraction_digits.next().map_or(0, |d| i64::from(d - b'0'));
            cents = cents
                .checked_mul(10)
                .and_then(|c| c.checked_add(digit))
                .ok_or_else(overflow)?;
        }
        if matches!(fraction_digits.next(), Some(d) if d >= b'5') {
            cents = cents.checked_add(1).ok_or_else(overflow)?;
        }

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// `self × qty`, or `None` if the product does not fit in i64 cents.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // $2.99
    /// assert_eq!(unit_price.checked_mul(3), Some(Money::from_cents(897)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_mul(2), None);
    /// ```
    #[inline]
    pub const fn checked_mul(&self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// `self + other`, or `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Returns `bps` basis points of this amount, rounded half-up.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`. The +5000 provides
    /// rounding (5000/10000 = 0.5). i128 keeps large tickets from overflowing.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// // $10.00 × 8.25% = $0.825 → $0.83
    /// assert_eq!(Money::from_cents(1000).percentage_of(825).cents(), 83);
    /// ```
    pub fn percentage_of(&self, bps: u32) -> Money {
        let cents = self.0 as i128 * bps as i128;
        let rounded = if cents < 0 {
            (cents - 5000) / 10000
        } else {
            (cents + 5000) / 10000
        };
        Money(rounded as i64)
    }

    /// Renders the amount as a plain decimal ("12.50", "-0.05").
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }

    /// Renders the amount with a currency symbol ("€12.50", "-$0.05").
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly display in dollars. The register formats with its own
/// configured symbol through [`Money::format_with_symbol`].
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol("$"))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Wire Format
// =============================================================================

/// Serde adapter for backend decimal amounts.
///
/// The backend sends prices either as JSON numbers (`12.5`) or as decimal
/// strings (`"12.50"`). Both are parsed through [`Money::parse_decimal`].
///
/// ```rust,ignore
/// #[derive(Deserialize)]
/// struct ProductDto {
///     #[serde(with = "tally_core::money::decimal")]
///     price: Money,
/// }
/// ```
pub mod decimal {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Money;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(serde_json::Number),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Money, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = match Amount::deserialize(deserializer)? {
            Amount::Number(n) => n.to_string(),
            Amount::Text(s) => s,
        };
        Money::parse_decimal(&text).map_err(D::Error::custom)
    }

    pub fn serialize<S>(money: &Money, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&money.to_decimal_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
        assert_eq!(Money::from_cents(-5).format_with_symbol("€"), "-€0.05");
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(Money::parse_decimal("12").unwrap().cents(), 1200);
        assert_eq!(Money::parse_decimal("12.5").unwrap().cents(), 1250);
        assert_eq!(Money::parse_decimal("12.50").unwrap().cents(), 1250);
        assert_eq!(Money::parse_decimal(".5").unwrap().cents(), 50);
        assert_eq!(Money::parse_decimal("19.99").unwrap().cents(), 1999);
        assert_eq!(Money::parse_decimal("-3.1").unwrap().cents(), -310);
        assert_eq!(Money::parse_decimal(" 7.00 ").unwrap().cents(), 700);
    }

    #[test]
    fn test_parse_decimal_rounds_third_place_half_up() {
        assert_eq!(Money::parse_decimal("0.125").unwrap().cents(), 13);
        assert_eq!(Money::parse_decimal("0.124").unwrap().cents(), 12);
        assert_eq!(Money::parse_decimal("-0.125").unwrap().cents(), -13);
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        assert!(Money::parse_decimal("").is_err());
        assert!(Money::parse_decimal("-").is_err());
        assert!(Money::parse_decimal(".").is_err());
        assert!(Money::parse_decimal("12,50").is_err());
        assert!(Money::parse_decimal("1e3").is_err());
        assert!(Money::parse_decimal("1.2.3").is_err());
        assert!(Money::parse_decimal("99999999999999999999").is_err());
    }

    #[test]
    fn test_decimal_wire_format_accepts_numbers_and_strings() {
        #[derive(Deserialize, Serialize)]
        struct Dto {
            #[serde(with = "decimal")]
            price: Money,
        }

        let from_number: Dto = serde_json::from_str(r#"{"price": 19.99}"#).unwrap();
        assert_eq!(from_number.price.cents(), 1999);

        let from_int: Dto = serde_json::from_str(r#"{"price": 100}"#).unwrap();
        assert_eq!(from_int.price.cents(), 10000);

        let from_text: Dto = serde_json::from_str(r#"{"price": "0.10"}"#).unwrap();
        assert_eq!(from_text.price.cents(), 10);

        assert!(serde_json::from_str::<Dto>(r#"{"price": "abc"}"#).is_err());

        let json = serde_json::to_string(&Dto {
            price: Money::from_cents(1250),
        })
        .unwrap();
        assert_eq!(json, r#"{"price":"12.50"}"#);
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
        assert_eq!([a, b, b].iter().sum::<Money>().cents(), 2000);
    }

    #[test]
    fn test_checked_arithmetic_reports_overflow() {
        let big = Money::parse_decimal("100000000000000").unwrap();
        assert_eq!(big.checked_mul(1000), None);
        assert_eq!(Money::from_cents(150).checked_mul(4), Some(Money::from_cents(600)));
        assert_eq!(big.checked_add(Money::from_cents(i64::MAX)), None);
        assert_eq!(
            Money::from_cents(1).checked_add(Money::from_cents(2)),
            Some(Money::from_cents(3))
        );
    }

    #[test]
    fn test_percentage_of_rounds_half_up() {
        assert_eq!(Money::from_cents(1000).percentage_of(1000).cents(), 100);
        assert_eq!(Money::from_cents(1000).percentage_of(825).cents(), 83);
        assert_eq!(Money::from_cents(35000).percentage_of(1000).cents(), 3500);
        assert_eq!(Money::from_cents(-1000).percentage_of(825).cents(), -83);
    }

    /// Float arithmetic would give 0.30000000000000004; cents do not drift.
    #[test]
    fn test_no_float_drift() {
        let a = Money::parse_decimal("0.1").unwrap();
        let b = Money::parse_decimal("0.2").unwrap();
        assert_eq!(a + b, Money::parse_decimal("0.3").unwrap());
    }
}
