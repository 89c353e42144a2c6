use crate::domain::model::{Blend, RawComponent};
use crate::utils::error::Result;
use crate::utils::format::NumberStyle;
use crate::utils::validation::{normalize_component, parse_quantity, ValidationPolicy};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// A CSV row before number parsing, so decimal commas survive.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default, alias = "Componente", alias = "Tipo de Alcohol")]
    name: String,
    #[serde(alias = "Volumen (L)", alias = "Volumen (Lts)")]
    volume: String,
    #[serde(alias = "Grado (GL)", alias = "°GL")]
    strength: String,
}

/// Reads a `name,volume,strength` table. Blank lines are skipped.
///
/// Quantities are parsed with `style`, so `1.000` is a thousand liters in a
/// localized table and one liter in a standard one.
pub fn read_blend<R: Read>(
    reader: R,
    policy: ValidationPolicy,
    style: NumberStyle,
) -> Result<Blend> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut blend = Blend::new();
    for (i, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
        let row = row?;
        let raw = RawComponent {
            name: row.name,
            volume: parse_quantity("volume", &row.volume, style)?,
            strength: parse_quantity("strength", &row.strength, style)?,
        };
        blend.push(normalize_component(raw, i + 1, policy)?);
    }

    tracing::debug!("Read {} components from CSV", blend.len());
    Ok(blend)
}

pub fn read_blend_file<P: AsRef<Path>>(
    path: P,
    policy: ValidationPolicy,
    style: NumberStyle,
) -> Result<Blend> {
    let file = std::fs::File::open(path)?;
    read_blend(file, policy, style)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::BlendError;

    #[test]
    fn test_read_english_headers() {
        let data = "name,volume,strength\nBase alcohol,1000,96\nWater,400,0\n";
        let blend =
            read_blend(data.as_bytes(), ValidationPolicy::Reject, NumberStyle::Standard).unwrap();
        assert_eq!(blend.len(), 2);
        assert_eq!(blend.total_volume(), 1400.0);
        assert_eq!(blend.total_pure_alcohol(), 960.0);
    }

    #[test]
    fn test_read_spanish_headers_and_decimal_commas() {
        let data = "Componente,Volumen (L),Grado (GL)\nAlcohol Fino,\"1.000,5\",\"96,0\"\n";
        let blend =
            read_blend(data.as_bytes(), ValidationPolicy::Reject, NumberStyle::Standard).unwrap();
        assert_eq!(blend.components()[0].name(), "Alcohol Fino");
        assert_eq!(blend.components()[0].volume(), 1000.5);
        assert_eq!(blend.components()[0].strength(), 96.0);
    }

    #[test]
    fn test_out_of_range_row_rejected() {
        let data = "name,volume,strength\nA,10,120\n";
        assert!(matches!(
            read_blend(data.as_bytes(), ValidationPolicy::Reject, NumberStyle::Standard),
            Err(BlendError::InvalidComponent { .. })
        ));
        let blend =
            read_blend(data.as_bytes(), ValidationPolicy::Clamp, NumberStyle::Standard).unwrap();
        assert_eq!(blend.components()[0].strength(), 100.0);
    }

    #[test]
    fn test_missing_column_is_csv_error() {
        let data = "name,volume\nA,10\n";
        assert!(matches!(
            read_blend(data.as_bytes(), ValidationPolicy::Reject, NumberStyle::Standard),
            Err(BlendError::CsvError(_))
        ));
    }

    #[test]
    fn test_thousands_column_follows_number_style() {
        let data = "name,volume,strength\nBase alcohol,\"1,000\",96\n";
        let blend =
            read_blend(data.as_bytes(), ValidationPolicy::Reject, NumberStyle::Standard).unwrap();
        assert_eq!(blend.total_volume(), 1000.0);

        let data = "Componente,Volumen (L),Grado (GL)\nAlcohol base,1.000,\"96,5\"\n";
        let blend =
            read_blend(data.as_bytes(), ValidationPolicy::Reject, NumberStyle::Localized).unwrap();
        assert_eq!(blend.total_volume(), 1000.0);
        assert_eq!(blend.components()[0].strength(), 96.5);
    }
}
