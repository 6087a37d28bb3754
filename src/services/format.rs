//! Display formatting & validation capability
//!
//! Formatting operations never fail: an absent or non-finite value yields
//! the kind's fallback string instead of an error. Derived-field
//! construction (slug derivation) and CLI rendering both consume this
//! capability through the `ValueFormatter` trait.

use crate::types::{Result, StablewatchError};
use regex::Regex;
use std::str::FromStr;

/// Value categories with distinct fallback strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackKind {
    Number,
    Currency,
    Percentage,
}

/// Display formatting & validation operations.
///
/// Every implementation must provide the full set; there is no partial
/// default that fails at call time.
pub trait ValueFormatter: Send + Sync {
    fn format_number(&self, value: Option<f64>) -> String;
    fn format_currency(&self, amount: Option<f64>) -> String;
    fn format_percentage(&self, value: Option<f64>) -> String;
    fn slugify(&self, text: &str) -> String;
    fn is_valid_value(&self, value: Option<f64>) -> bool;
    fn default_fallback(&self, kind: FallbackKind) -> &'static str;
}

/// Formatter variants constructible through [`create_formatter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatterKind {
    /// Full-precision grouped digits ("1,234,567.89")
    Standard,
    /// Abbreviated magnitudes ("1.23M")
    Compact,
}

impl FromStr for FormatterKind {
    type Err = StablewatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(FormatterKind::Standard),
            "compact" => Ok(FormatterKind::Compact),
            other => Err(StablewatchError::Config(format!(
                "unknown formatter kind '{}'",
                other
            ))),
        }
    }
}

/// Build a formatter from its kind string.
///
/// Unknown kinds fail here, at construction time.
pub fn create_formatter(kind: &str) -> Result<Box<dyn ValueFormatter>> {
    match kind.parse::<FormatterKind>()? {
        FormatterKind::Standard => Ok(Box::new(StandardFormatter)),
        FormatterKind::Compact => Ok(Box::new(CompactFormatter)),
    }
}

fn is_usable(value: Option<f64>) -> bool {
    value.is_some_and(f64::is_finite)
}

fn slug_of(text: &str) -> String {
    let re = Regex::new(r"[^a-z0-9]+").expect("valid regex");
    let lowered = text.trim().to_lowercase();
    re.replace_all(&lowered, "-").trim_matches('-').to_string()
}

/// Insert thousands separators into a fixed two-decimal rendering
fn group_digits(value: f64) -> String {
    let negative = value < 0.0;
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Abbreviate a magnitude to K/M/B/T with two decimals
fn abbreviate(value: f64) -> String {
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1e12 {
        (value / 1e12, "T")
    } else if abs >= 1e9 {
        (value / 1e9, "B")
    } else if abs >= 1e6 {
        (value / 1e6, "M")
    } else if abs >= 1e3 {
        (value / 1e3, "K")
    } else {
        (value, "")
    };
    format!("{:.2}{}", scaled, suffix)
}

/// Grouped-digit formatter for detail views
pub struct StandardFormatter;

impl ValueFormatter for StandardFormatter {
    fn format_number(&self, value: Option<f64>) -> String {
        match value {
            Some(v) if v.is_finite() => group_digits(v),
            _ => self.default_fallback(FallbackKind::Number).to_string(),
        }
    }

    fn format_currency(&self, amount: Option<f64>) -> String {
        match amount {
            Some(v) if v.is_finite() => {
                if v < 0.0 {
                    format!("-${}", group_digits(-v))
                } else {
                    format!("${}", group_digits(v))
                }
            }
            _ => self.default_fallback(FallbackKind::Currency).to_string(),
        }
    }

    fn format_percentage(&self, value: Option<f64>) -> String {
        match value {
            Some(v) if v.is_finite() => format!("{:.2}%", v),
            _ => self.default_fallback(FallbackKind::Percentage).to_string(),
        }
    }

    fn slugify(&self, text: &str) -> String {
        slug_of(text)
    }

    fn is_valid_value(&self, value: Option<f64>) -> bool {
        is_usable(value)
    }

    fn default_fallback(&self, kind: FallbackKind) -> &'static str {
        match kind {
            FallbackKind::Number => "N/A",
            FallbackKind::Currency => "$0.00",
            FallbackKind::Percentage => "0.00%",
        }
    }
}

/// Abbreviated-magnitude formatter for summary views
pub struct CompactFormatter;

impl ValueFormatter for CompactFormatter {
    fn format_number(&self, value: Option<f64>) -> String {
        match value {
            Some(v) if v.is_finite() => abbreviate(v),
            _ => self.default_fallback(FallbackKind::Number).to_string(),
        }
    }

    fn format_currency(&self, amount: Option<f64>) -> String {
        match amount {
            Some(v) if v.is_finite() => {
                if v < 0.0 {
                    format!("-${}", abbreviate(-v))
                } else {
                    format!("${}", abbreviate(v))
                }
            }
            _ => self.default_fallback(FallbackKind::Currency).to_string(),
        }
    }

    fn format_percentage(&self, value: Option<f64>) -> String {
        match value {
            Some(v) if v.is_finite() => format!("{:.2}%", v),
            _ => self.default_fallback(FallbackKind::Percentage).to_string(),
        }
    }

    fn slugify(&self, text: &str) -> String {
        slug_of(text)
    }

    fn is_valid_value(&self, value: Option<f64>) -> bool {
        is_usable(value)
    }

    fn default_fallback(&self, kind: FallbackKind) -> &'static str {
        match kind {
            FallbackKind::Number => "N/A",
            FallbackKind::Currency => "$0.00",
            FallbackKind::Percentage => "0.00%",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== factory ==========

    #[test]
    fn test_create_formatter_standard() {
        let fmt = create_formatter("standard").unwrap();
        assert_eq!(fmt.format_number(Some(1234.5)), "1,234.50");
    }

    #[test]
    fn test_create_formatter_compact() {
        let fmt = create_formatter("compact").unwrap();
        assert_eq!(fmt.format_number(Some(1_500_000.0)), "1.50M");
    }

    #[test]
    fn test_create_formatter_case_insensitive() {
        assert!(create_formatter("Standard").is_ok());
        assert!(create_formatter("COMPACT").is_ok());
    }

    #[test]
    fn test_create_formatter_unknown_is_config_error() {
        let err = create_formatter("fancy").err().unwrap();
        assert!(matches!(err, StablewatchError::Config(_)));
        assert!(err.to_string().contains("fancy"));
    }

    // ========== number formatting ==========

    #[test]
    fn test_standard_number_grouping() {
        let fmt = StandardFormatter;
        assert_eq!(fmt.format_number(Some(0.0)), "0.00");
        assert_eq!(fmt.format_number(Some(999.0)), "999.00");
        assert_eq!(fmt.format_number(Some(1000.0)), "1,000.00");
        assert_eq!(fmt.format_number(Some(82_500_000_000.0)), "82,500,000,000.00");
    }

    #[test]
    fn test_standard_number_negative() {
        let fmt = StandardFormatter;
        assert_eq!(fmt.format_number(Some(-1234.5)), "-1,234.50");
    }

    #[test]
    fn test_compact_number_magnitudes() {
        let fmt = CompactFormatter;
        assert_eq!(fmt.format_number(Some(950.0)), "950.00");
        assert_eq!(fmt.format_number(Some(1_500.0)), "1.50K");
        assert_eq!(fmt.format_number(Some(2_300_000.0)), "2.30M");
        assert_eq!(fmt.format_number(Some(8e10)), "80.00B");
        assert_eq!(fmt.format_number(Some(1.2e12)), "1.20T");
    }

    // ========== fallback behavior (never fails) ==========

    #[test]
    fn test_number_fallback_on_none() {
        let fmt = StandardFormatter;
        assert_eq!(fmt.format_number(None), "N/A");
    }

    #[test]
    fn test_number_fallback_on_nan() {
        let fmt = StandardFormatter;
        assert_eq!(fmt.format_number(Some(f64::NAN)), "N/A");
        assert_eq!(fmt.format_number(Some(f64::INFINITY)), "N/A");
    }

    #[test]
    fn test_currency_fallback() {
        let fmt = CompactFormatter;
        assert_eq!(fmt.format_currency(None), "$0.00");
        assert_eq!(fmt.format_currency(Some(f64::NEG_INFINITY)), "$0.00");
    }

    #[test]
    fn test_percentage_fallback() {
        let fmt = StandardFormatter;
        assert_eq!(fmt.format_percentage(None), "0.00%");
        assert_eq!(fmt.format_percentage(Some(f64::NAN)), "0.00%");
    }

    // ========== currency / percentage ==========

    #[test]
    fn test_currency_standard() {
        let fmt = StandardFormatter;
        assert_eq!(fmt.format_currency(Some(80_000_000_000.0)), "$80,000,000,000.00");
        assert_eq!(fmt.format_currency(Some(-2.5)), "-$2.50");
    }

    #[test]
    fn test_currency_compact() {
        let fmt = CompactFormatter;
        assert_eq!(fmt.format_currency(Some(8e10)), "$80.00B");
    }

    #[test]
    fn test_percentage() {
        let fmt = StandardFormatter;
        assert_eq!(fmt.format_percentage(Some(0.02)), "0.02%");
        assert_eq!(fmt.format_percentage(Some(-1.5)), "-1.50%");
    }

    // ========== slugify ==========

    #[test]
    fn test_slugify_lowercases() {
        let fmt = StandardFormatter;
        assert_eq!(fmt.slugify("USDT"), "usdt");
    }

    #[test]
    fn test_slugify_replaces_separators() {
        let fmt = StandardFormatter;
        assert_eq!(fmt.slugify("USD Coin"), "usd-coin");
        assert_eq!(fmt.slugify("  First Digital USD  "), "first-digital-usd");
    }

    #[test]
    fn test_slugify_collapses_symbol_runs() {
        let fmt = StandardFormatter;
        assert_eq!(fmt.slugify("PayPal USD (PYUSD)"), "paypal-usd-pyusd");
    }

    #[test]
    fn test_slugify_empty() {
        let fmt = StandardFormatter;
        assert_eq!(fmt.slugify(""), "");
    }

    // ========== validity ==========

    #[test]
    fn test_is_valid_value() {
        let fmt = StandardFormatter;
        assert!(fmt.is_valid_value(Some(1.0)));
        assert!(fmt.is_valid_value(Some(0.0)));
        assert!(!fmt.is_valid_value(None));
        assert!(!fmt.is_valid_value(Some(f64::NAN)));
        assert!(!fmt.is_valid_value(Some(f64::INFINITY)));
    }

    #[test]
    fn test_default_fallbacks() {
        let fmt = StandardFormatter;
        assert_eq!(fmt.default_fallback(FallbackKind::Number), "N/A");
        assert_eq!(fmt.default_fallback(FallbackKind::Currency), "$0.00");
        assert_eq!(fmt.default_fallback(FallbackKind::Percentage), "0.00%");
    }
}
