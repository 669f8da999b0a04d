//! Integer-only decimal helpers.
//!
//! Reward math never touches floating point. Values shown to humans are
//! produced here by scaling the numerator by [`DECIMAL_PRECISION`] before an
//! integer division, so a decimal always carries exactly six fractional
//! digits (truncated, never rounded up).

use std::fmt;

use crate::constants::{DECIMAL_PRECISION, DECIMAL_PRECISION_DIGITS};
use crate::error::{Result, StakingSdkError};

// Expanded apart from `crate::error::Result`, which the macro output would pick up.
mod u256 {
    uint::construct_uint! {
        /// 256-bit unsigned integer for intermediate products that exceed u128.
        pub struct U256(4);
    }
}

pub use u256::U256;

/// A non-negative decimal stored as an integer number of millionths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScaledDecimal {
    micros: u128,
}

impl ScaledDecimal {
    pub const ZERO: Self = Self { micros: 0 };

    pub const fn from_micros(micros: u128) -> Self {
        Self { micros }
    }

    pub const fn micros(&self) -> u128 {
        self.micros
    }

    pub const fn whole(&self) -> u128 {
        self.micros / DECIMAL_PRECISION
    }

    pub const fn fraction_micros(&self) -> u128 {
        self.micros % DECIMAL_PRECISION
    }
}

impl fmt::Display for ScaledDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:0width$}",
            self.whole(),
            self.fraction_micros(),
            width = DECIMAL_PRECISION_DIGITS as usize
        )
    }
}

/// `numerator * 10^6 / denominator`, as a six-digit decimal.
///
/// The product is formed in 256 bits so a full-width u128 accumulator can be
/// scaled without overflow. Callers must special-case zero denominators
/// (e.g. an empty staking vault) before calling.
pub fn scaled_divide(numerator: u128, denominator: u128) -> Result<ScaledDecimal> {
    if denominator == 0 {
        return Err(StakingSdkError::DivisionByZero);
    }

    let scaled = U256::from(numerator)
        .checked_mul(U256::from(DECIMAL_PRECISION))
        .ok_or(StakingSdkError::ArithmeticOverflow)?
        / U256::from(denominator);

    if scaled > U256::from(u128::MAX) {
        return Err(StakingSdkError::ArithmeticOverflow);
    }

    Ok(ScaledDecimal::from_micros(scaled.as_u128()))
}

/// Raw units per whole token for a mint with `decimals` decimals.
pub fn raw_scale(decimals: u8) -> Result<u128> {
    10u128
        .checked_pow(decimals as u32)
        .ok_or(StakingSdkError::ArithmeticOverflow)
}

/// Raw token amount → decimal token amount.
pub fn raw_to_ui(raw: u64, decimals: u8) -> Result<ScaledDecimal> {
    scaled_divide(raw as u128, raw_scale(decimals)?)
}

/// Parse a decimal string such as `"12.5"` into raw units.
///
/// Exact: more fractional digits than the mint supports is an error rather
/// than a silent truncation.
pub fn ui_amount_to_raw(text: &str, decimals: u8) -> Result<u64> {
    let text = text.trim();
    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) => (w, f),
        None => (text, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(StakingSdkError::InvalidAmount(text.to_string()));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(StakingSdkError::InvalidAmount(text.to_string()));
    }
    if fraction.len() > decimals as usize {
        return Err(StakingSdkError::InvalidAmount(format!(
            "{} has more than {} fractional digits",
            text, decimals
        )));
    }

    let scale = raw_scale(decimals)?;
    let whole_raw = parse_digits(whole)?
        .checked_mul(scale)
        .ok_or(StakingSdkError::ArithmeticOverflow)?;

    let fraction_scale = raw_scale(decimals - fraction.len() as u8)?;
    let fraction_raw = parse_digits(fraction)?
        .checked_mul(fraction_scale)
        .ok_or(StakingSdkError::ArithmeticOverflow)?;

    let total = whole_raw
        .checked_add(fraction_raw)
        .ok_or(StakingSdkError::ArithmeticOverflow)?;

    u64::try_from(total).map_err(|_| StakingSdkError::ArithmeticOverflow)
}

fn parse_digits(digits: &str) -> Result<u128> {
    digits.chars().try_fold(0u128, |acc, c| {
        let digit = c.to_digit(10).ok_or_else(|| StakingSdkError::InvalidAmount(digits.to_string()))?;
        acc.checked_mul(10)
            .and_then(|v| v.checked_add(digit as u128))
            .ok_or(StakingSdkError::ArithmeticOverflow)
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::REWARD_PRECISION;

    #[test]
    fn test_scaled_divide_truncates() {
        // 1_234_456_789 raw at 9 decimals = 1.234456789 → 1.234456
        let d = scaled_divide(1_234_456_789, 1_000_000_000).unwrap();
        assert_eq!(d.micros(), 1_234_456);
        assert_eq!(d.to_string(), "1.234456");
    }

    #[test]
    fn test_u256_generated_parsers() {
        // 2^128, one past u128::MAX
        let parsed = U256::from_dec_str("340282366920938463463374607431768211456").unwrap();
        assert_eq!(parsed, U256::from(u128::MAX) + U256::one());
        assert!(U256::from_dec_str("12x").is_err());
        assert_eq!(U256::from_str_radix("ff", 16).unwrap(), U256::from(255u64));
    }

    #[test]
    fn test_scaled_divide_by_zero() {
        assert_eq!(
            scaled_divide(1, 0).unwrap_err(),
            StakingSdkError::DivisionByZero
        );
    }

    #[test]
    fn test_scaled_divide_full_width_numerator() {
        // 7_212_589_757 * U64_MAX / (1e9 * U64_MAX) = 7.212589757 → 7.212589
        let numerator = 7_212_589_757u128 * REWARD_PRECISION;
        let denominator = 1_000_000_000u128 * REWARD_PRECISION;
        let d = scaled_divide(numerator, denominator).unwrap();
        assert_eq!(d.to_string(), "7.212589");
    }

    #[test]
    fn test_scaled_divide_result_overflow() {
        assert_eq!(
            scaled_divide(u128::MAX, 1).unwrap_err(),
            StakingSdkError::ArithmeticOverflow
        );
    }

    #[test]
    fn test_display_pads_fraction() {
        assert_eq!(ScaledDecimal::from_micros(5_000_001).to_string(), "5.000001");
        assert_eq!(ScaledDecimal::ZERO.to_string(), "0.000000");
    }

    #[test]
    fn test_ui_amount_to_raw() {
        assert_eq!(ui_amount_to_raw("100", 9).unwrap(), 100_000_000_000);
        assert_eq!(ui_amount_to_raw("12.5", 9).unwrap(), 12_500_000_000);
        assert_eq!(ui_amount_to_raw("0.000000001", 9).unwrap(), 1);
        assert_eq!(ui_amount_to_raw(".5", 2).unwrap(), 50);
    }

    #[test]
    fn test_ui_amount_to_raw_rejects_bad_input() {
        assert!(matches!(
            ui_amount_to_raw("1.0000000001", 9),
            Err(StakingSdkError::InvalidAmount(_))
        ));
        assert!(matches!(
            ui_amount_to_raw("-1", 9),
            Err(StakingSdkError::InvalidAmount(_))
        ));
        assert!(matches!(
            ui_amount_to_raw("", 9),
            Err(StakingSdkError::InvalidAmount(_))
        ));
        assert_eq!(
            ui_amount_to_raw("18446744074", 9).unwrap_err(),
            StakingSdkError::ArithmeticOverflow
        );
    }

    #[test]
    fn test_raw_to_ui() {
        assert_eq!(raw_to_ui(5_123_484_888, 9).unwrap().to_string(), "5.123484");
        assert_eq!(raw_to_ui(42, 0).unwrap().to_string(), "42.000000");
    }
}
