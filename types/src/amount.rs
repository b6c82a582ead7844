//! Token amount type.
//!
//! Amounts are non-negative integer counts of base units stored as `u128`.
//! A whole token is `10^decimals` base units; decimals only matter for
//! parsing and display. There are no operator impls: every addition the
//! ledger performs goes through `checked_add` so an overflow surfaces as an
//! error instead of wrapping.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An amount of base units.
///
/// Serialised as a decimal string so it survives TOML (64-bit integers) and
/// JSON consumers that read numbers as doubles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenAmount(u128);

impl TokenAmount {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(u128::MAX);

    pub const fn new(raw: u128) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// `units × 10^decimals`, or `None` on overflow.
    pub fn from_whole(units: u128, decimals: u8) -> Option<Self> {
        10u128
            .checked_pow(u32::from(decimals))?
            .checked_mul(units)
            .map(Self)
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Parse a decimal integer count of base units.
    pub fn parse_raw(s: &str) -> Result<Self, TypesError> {
        let s = s.trim();
        reject_negative(s)?;
        if !is_digits(s) {
            return Err(TypesError::InvalidAmount(s.to_string()));
        }
        parse_digits(s, s)
    }

    /// Parse token notation such as `"50"` or `"1.25"` into base units.
    pub fn parse_units(s: &str, decimals: u8) -> Result<Self, TypesError> {
        let s = s.trim();
        reject_negative(s)?;
        let (whole, frac) = match s.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (s, ""),
        };
        if !is_digits(whole) || (s.contains('.') && !is_digits(frac)) {
            return Err(TypesError::InvalidAmount(s.to_string()));
        }
        if frac.len() > usize::from(decimals) {
            return Err(TypesError::TooManyDecimals {
                given: frac.len(),
                decimals,
            });
        }
        let mut digits = String::with_capacity(whole.len() + usize::from(decimals));
        digits.push_str(whole);
        digits.push_str(frac);
        digits.extend(std::iter::repeat('0').take(usize::from(decimals) - frac.len()));
        parse_digits(&digits, s)
    }

    /// Render as token notation, dropping trailing fractional zeros.
    pub fn format_units(&self, decimals: u8) -> String {
        let decimals = usize::from(decimals);
        let raw = self.0.to_string();
        if decimals == 0 {
            return raw;
        }
        let padded = format!("{raw:0>width$}", width = decimals + 1);
        let (whole, frac) = padded.split_at(padded.len() - decimals);
        let frac = frac.trim_end_matches('0');
        if frac.is_empty() {
            whole.to_string()
        } else {
            format!("{whole}.{frac}")
        }
    }
}

fn reject_negative(s: &str) -> Result<(), TypesError> {
    if s.starts_with('-') {
        return Err(TypesError::NegativeAmount(s.to_string()));
    }
    Ok(())
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// `digits` is already validated as ASCII decimal; only overflow can fail.
fn parse_digits(digits: &str, original: &str) -> Result<TokenAmount, TypesError> {
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(TokenAmount::ZERO);
    }
    digits
        .parse::<u128>()
        .map(TokenAmount)
        .map_err(|_| TypesError::AmountOutOfRange(original.to_string()))
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TokenAmount {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse_raw(&s)
    }
}

impl From<TokenAmount> for String {
    fn from(amount: TokenAmount) -> Self {
        amount.0.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const E18: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn from_whole_scales_by_decimals() {
        assert_eq!(TokenAmount::from_whole(100, 18).unwrap().raw(), 100 * E18);
        assert_eq!(TokenAmount::from_whole(7, 0).unwrap().raw(), 7);
        assert!(TokenAmount::from_whole(u128::MAX, 1).is_none());
        assert!(TokenAmount::from_whole(1, 39).is_none());
    }

    #[test]
    fn checked_add_detects_overflow() {
        let a = TokenAmount::MAX;
        assert!(a.checked_add(TokenAmount::new(1)).is_none());
        assert_eq!(
            TokenAmount::new(2).checked_add(TokenAmount::new(3)),
            Some(TokenAmount::new(5))
        );
    }

    #[test]
    fn saturating_sub_floors_at_zero() {
        let cap = TokenAmount::new(1000);
        assert_eq!(cap.saturating_sub(TokenAmount::new(100)), TokenAmount::new(900));
        assert_eq!(cap.saturating_sub(TokenAmount::MAX), TokenAmount::ZERO);
    }

    #[test]
    fn parse_raw_accepts_large_values() {
        let amount = TokenAmount::parse_raw("1000000000000000000000").unwrap();
        assert_eq!(amount.raw(), 1000 * E18);
        assert_eq!(TokenAmount::parse_raw("  0 ").unwrap(), TokenAmount::ZERO);
    }

    #[test]
    fn parse_raw_rejects_negative() {
        let err = TokenAmount::parse_raw("-5").unwrap_err();
        assert!(matches!(err, TypesError::NegativeAmount(_)));
    }

    #[test]
    fn parse_raw_rejects_garbage() {
        for bad in ["", "abc", "1.5", "+3", "1e18", "12 34"] {
            assert!(
                matches!(TokenAmount::parse_raw(bad), Err(TypesError::InvalidAmount(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn parse_raw_rejects_values_above_u128() {
        let too_big = "340282366920938463463374607431768211456"; // u128::MAX + 1
        assert!(matches!(
            TokenAmount::parse_raw(too_big),
            Err(TypesError::AmountOutOfRange(_))
        ));
    }

    #[test]
    fn parse_units_handles_whole_and_fraction() {
        assert_eq!(TokenAmount::parse_units("50", 18).unwrap().raw(), 50 * E18);
        assert_eq!(
            TokenAmount::parse_units("1.25", 18).unwrap().raw(),
            E18 + E18 / 4
        );
        assert_eq!(TokenAmount::parse_units("0.000000000000000001", 18).unwrap().raw(), 1);
        assert_eq!(TokenAmount::parse_units("12", 0).unwrap().raw(), 12);
    }

    #[test]
    fn parse_units_rejects_excess_precision() {
        let err = TokenAmount::parse_units("1.0000000000000000001", 18).unwrap_err();
        assert_eq!(err, TypesError::TooManyDecimals { given: 19, decimals: 18 });
    }

    #[test]
    fn parse_units_rejects_negative_and_malformed() {
        assert!(matches!(
            TokenAmount::parse_units("-0.5", 18),
            Err(TypesError::NegativeAmount(_))
        ));
        for bad in ["1.", ".5", "1.2.3", "one"] {
            assert!(TokenAmount::parse_units(bad, 18).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn format_units_trims_trailing_zeros() {
        assert_eq!(TokenAmount::new(100 * E18).format_units(18), "100");
        assert_eq!(TokenAmount::new(E18 + E18 / 2).format_units(18), "1.5");
        assert_eq!(TokenAmount::new(1).format_units(18), "0.000000000000000001");
        assert_eq!(TokenAmount::ZERO.format_units(18), "0");
        assert_eq!(TokenAmount::new(42).format_units(0), "42");
    }

    #[test]
    fn serializes_as_decimal_string() {
        let amount = TokenAmount::new(1000 * E18);
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"1000000000000000000000\"");
        let back: TokenAmount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
        assert!(serde_json::from_str::<TokenAmount>("\"-1\"").is_err());
    }
}
