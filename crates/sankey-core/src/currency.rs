//! Currency-style formatting for flow value labels.
//!
//! Values are rendered in the en-US style: a leading minus for negative
//! amounts, then the currency symbol, comma-grouped integer digits and a
//! fixed number of decimals (`-$1,234.50`).

use serde::Deserialize;

/// Symbol and precision used when formatting flow values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CurrencyFormat {
    symbol: String,
    decimals: u8,
}

impl CurrencyFormat {
    /// Largest supported number of decimals.
    pub const MAX_DECIMALS: u8 = 6;

    /// Creates a format; `decimals` is capped at [`Self::MAX_DECIMALS`].
    pub fn new(symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            symbol: symbol.into(),
            decimals: decimals.min(Self::MAX_DECIMALS),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.decimals.min(Self::MAX_DECIMALS)
    }

    /// Formats `value` as a currency amount.
    ///
    /// Never panics: `NaN` renders as `$NaN` and infinities as `$∞` / `-$∞`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sankey_core::currency::CurrencyFormat;
    ///
    /// let usd = CurrencyFormat::default();
    /// assert_eq!(usd.format(2500.0), "$2,500.00");
    /// assert_eq!(usd.format(-1234.5), "-$1,234.50");
    /// assert_eq!(usd.format(f64::NAN), "$NaN");
    /// ```
    pub fn format(&self, value: f64) -> String {
        if value.is_nan() {
            return format!("{}NaN", self.symbol);
        }

        let sign = if value.is_sign_negative() && value != 0.0 {
            "-"
        } else {
            ""
        };

        if value.is_infinite() {
            return format!("{sign}{}∞", self.symbol);
        }

        let decimals = usize::from(self.decimals());
        let fixed = format!("{:.*}", decimals, round_half_away(value.abs(), decimals));
        let (integer, fraction) = match fixed.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (fixed.as_str(), None),
        };

        // A value that rounds to zero has no sign.
        let sign = if fixed.bytes().all(|b| b == b'0' || b == b'.') {
            ""
        } else {
            sign
        };

        let mut out = String::with_capacity(fixed.len() + integer.len() / 3 + 2);
        out.push_str(sign);
        out.push_str(&self.symbol);
        out.push_str(&group_thousands(integer));
        if let Some(fraction) = fraction {
            out.push('.');
            out.push_str(fraction);
        }
        out
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::new("$", 2)
    }
}

/// Formats `value` with the default US dollar format.
pub fn format_currency(value: f64) -> String {
    CurrencyFormat::default().format(value)
}

/// Rounds half away from zero at `decimals` places, as `Intl.NumberFormat`
/// does, instead of the round-half-to-even of `format!`.
fn round_half_away(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_format_whole_amounts() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(7.0), "$7.00");
        assert_eq!(format_currency(420.0), "$420.00");
        assert_eq!(format_currency(2500.0), "$2,500.00");
        assert_eq!(format_currency(1_234_567.0), "$1,234,567.00");
    }

    #[test]
    fn test_format_fractions_round_half_away_from_zero() {
        assert_eq!(format_currency(0.125), "$0.13");
        assert_eq!(format_currency(2.5), "$2.50");
        assert_eq!(format_currency(999.999), "$1,000.00");
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(format_currency(-1234.5), "-$1,234.50");
        assert_eq!(format_currency(-0.001), "$0.00");
        assert_eq!(format_currency(-0.0), "$0.00");
    }

    #[test]
    fn test_format_non_finite() {
        assert_eq!(format_currency(f64::NAN), "$NaN");
        assert_eq!(format_currency(f64::INFINITY), "$∞");
        assert_eq!(format_currency(f64::NEG_INFINITY), "-$∞");
    }

    #[test]
    fn test_custom_symbol_and_precision() {
        let euro = CurrencyFormat::new("€", 0);
        assert_eq!(euro.format(1999.6), "€2,000");
        assert_eq!(euro.symbol(), "€");

        let precise = CurrencyFormat::new("", 3);
        assert_eq!(precise.format(1.0006), "1.001");
    }

    #[test]
    fn test_decimals_are_capped() {
        let format = CurrencyFormat::new("$", 40);
        assert_eq!(format.decimals(), CurrencyFormat::MAX_DECIMALS);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1,234");
        assert_eq!(group_thousands("123456"), "123,456");
    }

    // ===================
    // Property Checks
    // ===================

    fn check_format_is_total(value: f64) -> Result<(), TestCaseError> {
        let formatted = format_currency(value);
        prop_assert!(formatted.contains('$'), "missing symbol in {formatted}");
        Ok(())
    }

    fn check_grouping_round_trips(value: u32) -> Result<(), TestCaseError> {
        let formatted = format_currency(f64::from(value));
        let digits: String = formatted
            .trim_start_matches('$')
            .trim_end_matches(".00")
            .chars()
            .filter(|c| *c != ',')
            .collect();
        prop_assert_eq!(digits, value.to_string());
        Ok(())
    }

    proptest! {
        #[test]
        fn format_is_total(value in any::<f64>()) {
            check_format_is_total(value)?;
        }

        #[test]
        fn grouping_round_trips(value in any::<u32>()) {
            check_grouping_round_trips(value)?;
        }
    }
}
