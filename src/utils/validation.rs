use crate::domain::model::{Component, RawComponent, MAX_VOLUME_LITERS};
use crate::utils::error::{BlendError, Result};
use crate::utils::format::NumberStyle;
use serde::{Deserialize, Serialize};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// What to do with a volume or strength outside its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ValidationPolicy {
    #[default]
    Reject,
    Clamp,
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(BlendError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(BlendError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BlendError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(BlendError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Target strength for a dilution must lie in (0, 100].
pub fn validate_target_strength(target: f64) -> Result<()> {
    if !target.is_finite() || target <= 0.0 {
        return Err(BlendError::NonPositiveTarget { target });
    }
    validate_range("target_strength", target, 0.0, 100.0)
}

/// Parses a volume or strength typed by an operator.
///
/// Accepts a plain decimal (`1000.5`), a decimal comma (`1000,5`) and either
/// grouping convention (`1.000,5`, `1,000.5`). When both separators appear the
/// last one is the decimal separator; a separator that repeats is grouping.
/// A single separator followed by exactly three digits (`1,000`, `1.000`) is
/// read the way `style` prints numbers; anything else is a decimal separator.
pub fn parse_quantity(field_name: &str, text: &str, style: NumberStyle) -> Result<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(BlendError::invalid_component(field_name, text, "value is empty"));
    }

    let has_dot = trimmed.contains('.');
    let has_comma = trimmed.contains(',');
    let normalized = match (has_dot, has_comma) {
        (true, true) => {
            // whichever comes last is the decimal separator
            let last_dot = trimmed.rfind('.').unwrap_or(0);
            let last_comma = trimmed.rfind(',').unwrap_or(0);
            if last_comma > last_dot {
                trimmed.replace('.', "").replace(',', ".")
            } else {
                trimmed.replace(',', "")
            }
        }
        (false, true) => normalize_single_separator(trimmed, ',', style),
        (true, false) => normalize_single_separator(trimmed, '.', style),
        (false, false) => trimmed.to_string(),
    };

    let value: f64 = normalized
        .parse()
        .map_err(|_| BlendError::invalid_component(field_name, text, "not a number"))?;
    if !value.is_finite() {
        return Err(BlendError::invalid_component(field_name, text, "not a finite number"));
    }
    Ok(value)
}

fn normalize_single_separator(text: &str, separator: char, style: NumberStyle) -> String {
    if text.matches(separator).count() > 1 {
        return text.replace(separator, "");
    }

    let (thousands, _) = style.separators();
    if separator == thousands && looks_grouped(text, separator) {
        text.replace(separator, "")
    } else {
        text.replace(separator, ".")
    }
}

/// `1,000` or `-12.500`: one to three leading digits, then exactly three.
fn looks_grouped(text: &str, separator: char) -> bool {
    let Some((int_part, frac_part)) = text.split_once(separator) else {
        return false;
    };
    let int_digits = int_part.trim_start_matches(|c| c == '-' || c == '+');
    (1..=3).contains(&int_digits.len())
        && !int_digits.starts_with('0')
        && int_digits.chars().all(|c| c.is_ascii_digit())
        && frac_part.len() == 3
        && frac_part.chars().all(|c| c.is_ascii_digit())
}

/// Brings a raw row into the `Component` shape.
///
/// NaN and infinities are always rejected. Out-of-range values are rejected
/// or clamped according to `policy`. A blank name becomes `Component <row>`.
pub fn normalize_component(
    raw: RawComponent,
    row: usize,
    policy: ValidationPolicy,
) -> Result<Component> {
    let RawComponent {
        name,
        mut volume,
        mut strength,
    } = raw;

    if !volume.is_finite() {
        return Err(BlendError::invalid_component("volume", volume, "not a finite number"));
    }
    if !strength.is_finite() {
        return Err(BlendError::invalid_component("strength", strength, "not a finite number"));
    }

    if policy == ValidationPolicy::Clamp {
        if volume < 0.0 {
            tracing::warn!(row, volume, "negative volume clamped to 0");
            volume = 0.0;
        }
        if volume > MAX_VOLUME_LITERS {
            tracing::warn!(row, volume, "volume clamped to the largest supported volume");
            volume = MAX_VOLUME_LITERS;
        }
        if !(0.0..=100.0).contains(&strength) {
            let clamped = strength.clamp(0.0, 100.0);
            tracing::warn!(row, strength, clamped, "strength clamped into 0..=100");
            strength = clamped;
        }
    }

    let name = match name.trim() {
        "" => format!("Component {}", row),
        trimmed => trimmed.to_string(),
    };

    Component::new(name, volume, strength)
}

/// Parses an operator-typed `name;volume;strength` row.
pub fn parse_component_row(
    text: &str,
    row: usize,
    policy: ValidationPolicy,
    style: NumberStyle,
) -> Result<Component> {
    let fields: Vec<&str> = text.split(';').collect();
    if fields.len() != 3 {
        return Err(BlendError::invalid_component(
            "row",
            text,
            "expected name;volume;strength",
        ));
    }

    let raw = RawComponent {
        name: fields[0].to_string(),
        volume: parse_quantity("volume", fields[1], style)?,
        strength: parse_quantity("strength", fields[2], style)?,
    };
    normalize_component(raw, row, policy)
}
