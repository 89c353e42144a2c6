//! Printable blend summary: a fixed-layout text document plus CSV and JSON
//! exports, optionally bundled into a ZIP archive.

use crate::domain::model::{Blend, Calculation};
use crate::utils::error::{BlendError, Result};
use crate::utils::format::{format_degrees, format_liters, format_number, NumberStyle};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

const PAGE_WIDTH: usize = 78;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ReportFormat {
    Txt,
    Csv,
    Json,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Txt => "txt",
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }

    pub fn all() -> Vec<ReportFormat> {
        vec![ReportFormat::Txt, ReportFormat::Csv, ReportFormat::Json]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub name: String,
    pub volume_l: f64,
    pub strength_gl: f64,
    pub laa: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultEntry {
    pub label: String,
    pub value: String,
}

impl ResultEntry {
    fn new(label: &str, value: String) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub title: String,
    pub generated_at: DateTime<Local>,
    pub components: Vec<ReportRow>,
    pub results: Vec<ResultEntry>,
    pub calculation: Calculation,
    #[serde(skip)]
    style: NumberStyle,
}

/// Label/value pairs shown in the results section for a calculation.
pub fn result_entries(calculation: &Calculation, style: NumberStyle) -> Vec<ResultEntry> {
    match calculation {
        Calculation::Strength(r) => vec![
            ResultEntry::new("Total volume", format_liters(r.total_volume, style)),
            ResultEntry::new("Final strength", format_degrees(r.final_strength, style)),
            ResultEntry::new("Total LAA", format_number(r.total_pure_alcohol, 2, style)),
        ],
        Calculation::Dilution(r) => {
            let mut entries = vec![
                ResultEntry::new("Water to add", format_liters(r.water_to_add, style)),
                ResultEntry::new("Final volume", format_liters(r.final_volume_needed, style)),
                ResultEntry::new("Target strength", format_degrees(r.target_strength, style)),
                ResultEntry::new("Total LAA", format_number(r.total_pure_alcohol, 2, style)),
            ];
            if !r.is_reachable() {
                entries.push(ResultEntry::new(
                    "Advisory",
                    "blend is already at or below the target strength; \
                     only adding alcohol can reach it"
                        .to_string(),
                ));
            }
            entries
        }
    }
}

impl Report {
    pub fn new(
        title: impl Into<String>,
        blend: &Blend,
        calculation: Calculation,
        style: NumberStyle,
    ) -> Self {
        Self::with_timestamp(title, blend, calculation, style, Local::now())
    }

    pub fn with_timestamp(
        title: impl Into<String>,
        blend: &Blend,
        calculation: Calculation,
        style: NumberStyle,
        generated_at: DateTime<Local>,
    ) -> Self {
        let components = blend
            .components()
            .iter()
            .map(|c| ReportRow {
                name: c.name().to_string(),
                volume_l: c.volume(),
                strength_gl: c.strength(),
                laa: c.pure_alcohol_content(),
            })
            .collect();

        Self {
            title: title.into(),
            generated_at,
            components,
            results: result_entries(&calculation, style),
            calculation,
            style,
        }
    }

    pub fn render_text(&self) -> String {
        let style = self.style;
        let mut out = String::new();
        let rule = "-".repeat(PAGE_WIDTH);

        out.push_str(&format!("{:^width$}\n", self.title.to_uppercase(), width = PAGE_WIDTH));
        out.push_str(&format!(
            "{:>width$}\n\n",
            format!("Date: {}", self.generated_at.format("%d/%m/%Y %H:%M")),
            width = PAGE_WIDTH
        ));

        out.push_str("Components:\n");
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!(
            "{:<30}{:>16}{:>16}{:>16}\n",
            "Name", "Volume (L)", "Strength (°GL)", "LAA"
        ));
        out.push_str(&rule);
        out.push('\n');
        for row in &self.components {
            out.push_str(&format!(
                "{:<30}{:>16}{:>16}{:>16}\n",
                truncate(&row.name, 29),
                format_number(row.volume_l, 2, style),
                format_number(row.strength_gl, 2, style),
                format_number(row.laa, 2, style),
            ));
        }
        out.push_str(&rule);
        out.push_str("\n\n");

        out.push_str("RESULTS:\n");
        for entry in &self.results {
            out.push_str(&format!("  {}: {}\n", entry.label, entry.value));
        }
        out
    }

    /// Component table with full-precision numbers.
    pub fn render_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in &self.components {
            writer.serialize(row)?;
        }
        if self.components.is_empty() {
            writer.write_record(["name", "volume_l", "strength_gl", "laa"])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| BlendError::IoError(e.into_error()))?;
        String::from_utf8(bytes)
            .map_err(|e| BlendError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }

    pub fn render_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Txt => Ok(self.render_text()),
            ReportFormat::Csv => self.render_csv(),
            ReportFormat::Json => self.render_json(),
        }
    }

    /// One `(file name, contents)` pair per requested format.
    pub fn outputs(&self, stem: &str, formats: &[ReportFormat]) -> Result<Vec<(String, Vec<u8>)>> {
        formats
            .iter()
            .map(|format| {
                let name = format!("{}.{}", stem, format.extension());
                self.render(*format).map(|body| (name, body.into_bytes()))
            })
            .collect()
    }

    pub fn bundle(&self, stem: &str, formats: &[ReportFormat]) -> Result<Vec<u8>> {
        let files = self.outputs(stem, formats)?;
        tracing::debug!("Creating ZIP bundle with {} files", files.len());

        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        for (name, body) in files {
            zip.start_file::<_, ()>(name, FileOptions::default())?;
            zip.write_all(&body)?;
        }
        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max_chars - 1).collect();
        cut.push('…');
        cut
    }
}
