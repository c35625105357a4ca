//! Rounding and formatting helpers
//!
//! Percentages are computed at full `Decimal` precision and rounded only
//! when they are written into a score record. The formatting functions are
//! display-only and never feed back into arithmetic.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Tie-breaking rule applied when rounding percentages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rounding {
    /// Banker's rounding: ties go to the even digit
    #[default]
    HalfEven,
    /// Ties go away from zero
    HalfUp,
}

impl Rounding {
    fn strategy(self) -> RoundingStrategy {
        match self {
            Rounding::HalfEven => RoundingStrategy::MidpointNearestEven,
            Rounding::HalfUp => RoundingStrategy::MidpointAwayFromZero,
        }
    }
}

/// Output granularity for every percentage in a score record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Precision {
    pub decimals: u32,
    pub rounding: Rounding,
}

impl Precision {
    /// Largest scale a `Decimal` can carry
    pub const MAX_DECIMALS: u32 = 28;

    pub fn new(decimals: u32, rounding: Rounding) -> Self {
        Self { decimals, rounding }
    }

    pub fn round(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(self.decimals, self.rounding.strategy())
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self {
            decimals: 3,
            rounding: Rounding::HalfEven,
        }
    }
}

/// Percentage change from `from` to `to`, unrounded.
///
/// A zero starting value yields zero rather than an undefined ratio.
/// Returns `None` when the ratio does not fit in a `Decimal`.
///
/// # Examples
/// ```
/// use scorecard::utils::percent_change;
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(percent_change(dec!(500), dec!(400)), Some(dec!(-20)));
/// assert_eq!(percent_change(dec!(0), dec!(400)), Some(dec!(0)));
/// assert_eq!(percent_change(dec!(0.0000000001), Decimal::MAX), None);
/// ```
pub fn percent_change(from: Decimal, to: Decimal) -> Option<Decimal> {
    if from.is_zero() {
        return Some(Decimal::ZERO);
    }
    to.checked_sub(from)?
        .checked_div(from)?
        .checked_mul(Decimal::ONE_HUNDRED)
}

/// Percentage change rounded to the given precision
pub fn round_pct(from: Decimal, to: Decimal, precision: Precision) -> Option<Decimal> {
    percent_change(from, to).map(|pct| precision.round(pct))
}

/// Signed percentage for display: "+6.149%", "-20%", "0%"
///
/// # Examples
/// ```
/// use scorecard::utils::format_pct;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_pct(dec!(6.149)), "+6.149%");
/// assert_eq!(format_pct(dec!(-20.000)), "-20%");
/// assert_eq!(format_pct(dec!(0)), "0%");
/// ```
pub fn format_pct(value: Decimal) -> String {
    let normalized = value.normalize();
    if normalized > Decimal::ZERO {
        format!("+{}%", normalized)
    } else if normalized.is_zero() {
        "0%".to_string()
    } else {
        format!("{}%", normalized)
    }
}

/// Amount with thousands separators, right-aligned to `width` (0 for none).
///
/// The fractional part is kept as given, trailing zeros trimmed.
///
/// # Examples
/// ```
/// use scorecard::utils::format_amount;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_amount(dec!(1234567.50), 0), "1,234,567.5");
/// assert_eq!(format_amount(dec!(-500), 8), "    -500");
/// ```
pub fn format_amount(value: Decimal, width: usize) -> String {
    let is_negative = value.is_sign_negative() && !value.is_zero();
    let formatted = value.abs().normalize().to_string();
    let (integer_part, fraction) = match formatted.split_once('.') {
        Some((int, frac)) => (int.to_string(), Some(frac.to_string())),
        None => (formatted, None),
    };

    let digits: Vec<char> = integer_part.chars().collect();
    let mut with_separators = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            with_separators.push(',');
        }
        with_separators.push(*c);
    }

    let sign = if is_negative { "-" } else { "" };
    let result = match fraction {
        Some(frac) => format!("{}{}.{}", sign, with_separators, frac),
        None => format!("{}{}", sign, with_separators),
    };

    if width > 0 && result.len() < width {
        format!("{:>width$}", result, width = width)
    } else {
        result
    }
}
