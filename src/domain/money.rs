//! Integer minor-unit money type.
//!
//! Amounts are stored as whole cents so sums and splits never drift. Decimal
//! text and JSON numbers coming from the API are parsed through
//! `rust_decimal` and rounded to two places with banker's rounding.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::errors::{LedgerError, Result};

const MINOR_UNITS: u32 = 2;
const CENTS_PER_UNIT: i64 = 100;

/// Leads every amount failure raised while deserializing, so a JSON error
/// can be turned back into a field-level validation error.
pub(crate) const AMOUNT_ERROR_TAG: &str = "invalid amount: ";

/// A signed amount in minor units (cents).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    pub const fn from_units(units: i64) -> Self {
        Money(units * CENTS_PER_UNIT)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn abs(self) -> Self {
        Money(self.0.abs())
    }

    /// Parses decimal text such as `"12.34"` or `"-5"`.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let value = Decimal::from_str(trimmed).map_err(|_| {
            LedgerError::validation("amount", format!("`{trimmed}` is not a numeric amount"))
        })?;
        Self::from_decimal(value)
    }

    pub fn from_decimal(value: Decimal) -> Result<Self> {
        let mut rounded =
            value.round_dp_with_strategy(MINOR_UNITS, RoundingStrategy::MidpointNearestEven);
        rounded.rescale(MINOR_UNITS);
        i64::try_from(rounded.mantissa())
            .map(Money)
            .map_err(|_| LedgerError::validation("amount", format!("{value} is out of range")))
    }

    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, MINOR_UNITS)
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Exact sum, or a validation error when the total leaves the `i64`
    /// cent range.
    pub fn checked_sum<I: IntoIterator<Item = Money>>(amounts: I) -> Result<Money> {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, Money::checked_add)
            .ok_or_else(|| LedgerError::validation("amount", "total is out of range"))
    }

    /// Splits the amount into `parts` pieces that add back up to exactly
    /// `self`. Leftover cents go to the leading pieces, one each.
    pub fn split(self, parts: u32) -> Result<Vec<Money>> {
        if parts == 0 {
            return Err(LedgerError::validation(
                "installmentTotal",
                "cannot split an amount into zero parts",
            ));
        }
        let count = i64::from(parts);
        let base = self.0 / count;
        let remainder = self.0 % count;
        let step = remainder.signum();
        let extra = remainder.unsigned_abs();
        Ok((0..u64::from(parts))
            .map(|idx| {
                if idx < extra {
                    Money(base + step)
                } else {
                    Money(base)
                }
            })
            .collect())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(
            f,
            "{sign}{}.{:02}",
            abs / CENTS_PER_UNIT as u64,
            abs % CENTS_PER_UNIT as u64
        )
    }
}

impl FromStr for Money {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        Money::parse(s)
    }
}

// Operators saturate at the `i64` cent range; use `checked_add` and
// `checked_sum` where an out-of-range total must be reported.
impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(self.0.saturating_neg())
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a numeric amount or a decimal string")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<Money, E> {
        value
            .checked_mul(CENTS_PER_UNIT)
            .map(Money)
            .ok_or_else(|| amount_error(format!("{value} is out of range")))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<Money, E> {
        let signed = i64::try_from(value)
            .map_err(|_| amount_error::<E>(format!("{value} is out of range")))?;
        self.visit_i64(signed)
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> std::result::Result<Money, E> {
        let decimal = Decimal::try_from(value)
            .map_err(|_| amount_error::<E>(format!("{value} is not a finite number")))?;
        Money::from_decimal(decimal).map_err(|err| amount_error(reason(err)))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<Money, E> {
        Money::parse(value).map_err(|err| amount_error(reason(err)))
    }
}

fn amount_error<E: de::Error>(reason: impl fmt::Display) -> E {
    E::custom(format_args!("{AMOUNT_ERROR_TAG}{reason}"))
}

fn reason(err: LedgerError) -> String {
    match err {
        LedgerError::Validation { message, .. } => message,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rounds_half_to_even() {
        assert_eq!(Money::parse("10.005").unwrap(), Money::from_cents(1000));
        assert_eq!(Money::parse("10.015").unwrap(), Money::from_cents(1002));
        assert_eq!(Money::parse(" 42 ").unwrap(), Money::from_units(42));
    }

    #[test]
    fn parse_rejects_non_numeric_text() {
        let err = Money::parse("abc").expect_err("text is not an amount");
        assert_eq!(err.field(), Some("amount"));
    }

    #[test]
    fn split_keeps_every_cent() {
        let parts = Money::from_units(100).split(3).unwrap();
        assert_eq!(
            parts,
            vec![
                Money::from_cents(3334),
                Money::from_cents(3333),
                Money::from_cents(3333)
            ]
        );
        assert_eq!(parts.iter().sum::<Money>(), Money::from_units(100));
    }

    #[test]
    fn split_negative_amount_sums_back() {
        let parts = Money::from_cents(-1001).split(4).unwrap();
        assert_eq!(parts.iter().sum::<Money>(), Money::from_cents(-1001));
        assert_eq!(parts[0], Money::from_cents(-251));
    }

    #[test]
    fn display_pads_cents() {
        assert_eq!(Money::from_cents(-1205).to_string(), "-12.05");
        assert_eq!(Money::from_cents(7).to_string(), "0.07");
    }

    #[test]
    fn deserializes_numbers_and_strings() {
        let from_float: Money = serde_json::from_str("199.9").unwrap();
        let from_int: Money = serde_json::from_str("15").unwrap();
        let from_text: Money = serde_json::from_str("\"0.10\"").unwrap();
        assert_eq!(from_float, Money::from_cents(19990));
        assert_eq!(from_int, Money::from_units(15));
        assert_eq!(from_text, Money::from_cents(10));
        assert!(serde_json::from_str::<Money>("\"twelve\"").is_err());
    }

    #[test]
    fn serializes_as_exact_decimal_text() {
        let amount = Money::from_cents(-900_719_925_474_099_317);
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"-9007199254740993.17\"");
        assert_eq!(serde_json::from_str::<Money>(&json).unwrap(), amount);
        assert_eq!(amount.to_decimal().to_string(), "-9007199254740993.17");
    }

    #[test]
    fn zero_is_neither_sign() {
        assert!(Money::ZERO.is_zero());
        assert!(!Money::ZERO.is_positive() && !Money::ZERO.is_negative());
        assert!(!Money::from_cents(-1).is_zero());
    }

    #[test]
    fn overflowing_totals_are_reported_not_panicked() {
        let big = Money::from_cents(i64::MAX / 100 * 99);
        assert_eq!(big.checked_add(big), None);
        let err = Money::checked_sum([big, big]).expect_err("out of range");
        assert_eq!(err.field(), Some("amount"));
        assert_eq!(big + big, Money::from_cents(i64::MAX));
        assert_eq!(
            Money::checked_sum([Money::from_units(2), Money::from_cents(5)]).unwrap(),
            Money::from_cents(205)
        );
    }
}
