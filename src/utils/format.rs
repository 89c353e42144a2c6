//! Display formatting for volumes and strengths.
//!
//! The engine never rounds; everything here is for output only.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum NumberStyle {
    /// `1,400.00`
    #[default]
    Standard,
    /// `1.400,00`, the convention used on the distillery floor.
    Localized,
}

impl NumberStyle {
    /// `(thousands, decimal)` separators.
    pub(crate) fn separators(self) -> (char, char) {
        match self {
            NumberStyle::Standard => (',', '.'),
            NumberStyle::Localized => ('.', ','),
        }
    }
}

fn group_thousands(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats `value` rounded to `decimals` places with thousands grouping.
pub fn format_number(value: f64, decimals: usize, style: NumberStyle) -> String {
    let (thousands, decimal) = style.separators();
    let rendered = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rendered.as_str(), None),
    };

    let mut out = String::new();
    // "-0.00" reads as noise on a report
    if value < 0.0 && rendered.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part, thousands));
    if let Some(frac) = frac_part {
        out.push(decimal);
        out.push_str(frac);
    }
    out
}

/// Whole liters, truncated toward zero, for the running totals line.
pub fn format_whole_liters(value: f64, style: NumberStyle) -> String {
    format_number(value.trunc(), 0, style)
}

pub fn format_liters(value: f64, style: NumberStyle) -> String {
    format!("{} L", format_number(value, 2, style))
}

pub fn format_degrees(value: f64, style: NumberStyle) -> String {
    format!("{} °GL", format_number(value, 2, style))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_grouping() {
        assert_eq!(format_number(1400.0, 2, NumberStyle::Standard), "1,400.00");
        assert_eq!(format_number(999.994, 2, NumberStyle::Standard), "999.99");
        assert_eq!(
            format_number(1234567.891, 2, NumberStyle::Standard),
            "1,234,567.89"
        );
        assert_eq!(format_number(0.0, 2, NumberStyle::Standard), "0.00");
    }

    #[test]
    fn test_localized_grouping() {
        assert_eq!(format_number(1400.0, 2, NumberStyle::Localized), "1.400,00");
        assert_eq!(format_number(2400.5, 1, NumberStyle::Localized), "2.400,5");
    }

    #[test]
    fn test_negative_values() {
        assert_eq!(format_number(-20.0, 2, NumberStyle::Standard), "-20.00");
        assert_eq!(format_number(-0.001, 2, NumberStyle::Standard), "0.00");
        assert_eq!(format_number(-1500.0, 0, NumberStyle::Localized), "-1.500");
    }

    #[test]
    fn test_whole_liters_truncate() {
        assert_eq!(format_whole_liters(1999.9, NumberStyle::Localized), "1.999");
        assert_eq!(format_whole_liters(960.0, NumberStyle::Standard), "960");
    }

    #[test]
    fn test_units() {
        assert_eq!(format_liters(1400.0, NumberStyle::Standard), "1,400.00 L");
        assert_eq!(format_degrees(48.0, NumberStyle::Localized), "48,00 °GL");
    }
}
