use crate::config::csv_table;
use crate::config::toml_config::{BlendFile, ReportConfig};
use crate::core::report::ReportFormat;
use crate::domain::model::{Blend, RawComponent};
use crate::domain::ports::ReportSettings;
use crate::utils::error::{BlendError, Result};
use crate::utils::format::NumberStyle;
use crate::utils::validation::{self, normalize_component, Validate, ValidationPolicy};
use std::path::Path;

pub const DEFAULT_TITLE: &str = "Blend report";
pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_FILE_STEM: &str = "blend_report";

#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub title: String,
    pub output_path: String,
    pub formats: Vec<ReportFormat>,
    pub compress: bool,
    pub file_stem: String,
    pub number_style: NumberStyle,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            formats: vec![ReportFormat::Txt],
            compress: false,
            file_stem: DEFAULT_FILE_STEM.to_string(),
            number_style: NumberStyle::default(),
        }
    }
}

impl ReportOptions {
    pub fn from_config(config: Option<&ReportConfig>) -> Self {
        let mut options = Self::default();
        let Some(config) = config else {
            return options;
        };

        if let Some(title) = &config.title {
            options.title = title.clone();
        }
        if let Some(path) = &config.output_path {
            options.output_path = path.clone();
        }
        if let Some(formats) = &config.formats {
            options.formats = formats.clone();
        }
        if let Some(compress) = config.compress {
            options.compress = compress;
        }
        if let Some(filename) = &config.filename {
            options.file_stem = filename.clone();
        }
        if let Some(style) = config.number_style {
            options.number_style = style;
        }
        options
    }
}

impl ReportSettings for ReportOptions {
    fn title(&self) -> &str {
        &self.title
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn formats(&self) -> &[ReportFormat] {
        &self.formats
    }

    fn compress(&self) -> bool {
        self.compress
    }

    fn file_stem(&self) -> &str {
        &self.file_stem
    }

    fn number_style(&self) -> NumberStyle {
        self.number_style
    }
}

impl Validate for ReportOptions {
    fn validate(&self) -> Result<()> {
        validation::validate_path("report.output_path", &self.output_path)?;
        validation::validate_non_empty_string("report.filename", &self.file_stem)?;
        if self.formats.is_empty() {
            return Err(BlendError::InvalidConfigValueError {
                field: "report.formats".to_string(),
                value: "[]".to_string(),
                reason: "At least one output format is required".to_string(),
            });
        }
        Ok(())
    }
}

/// Everything a one-shot calculation needs, merged from a blend file and
/// command-line rows.
#[derive(Debug, Clone)]
pub struct BlendJob {
    pub name: String,
    pub blend: Blend,
    pub target_strength: Option<f64>,
    pub policy: ValidationPolicy,
    pub report: ReportOptions,
}

impl BlendJob {
    /// Loads `input` (`.toml` or `.csv`) when given, otherwise starts an empty blend.
    /// `policy` overrides the file's validation policy and `style` its number
    /// style; CSV quantities are parsed with the resulting style.
    pub fn load(
        input: Option<&str>,
        policy: Option<ValidationPolicy>,
        style: Option<NumberStyle>,
    ) -> Result<Self> {
        let mut job = match input {
            Some(path) => Self::from_path(path, policy, style)?,
            None => Self {
                name: "Blend".to_string(),
                blend: Blend::new(),
                target_strength: None,
                policy: policy.unwrap_or_default(),
                report: ReportOptions::default(),
            },
        };
        if let Some(style) = style {
            job.report.number_style = style;
        }

        tracing::debug!(
            "Loaded blend '{}' with {} components",
            job.name,
            job.blend.len()
        );
        Ok(job)
    }

    /// Appends rows after the loaded ones, normalized with the job's policy.
    pub fn append_rows(&mut self, rows: &[RawComponent]) -> Result<()> {
        let offset = self.blend.len();
        for (i, raw) in rows.iter().enumerate() {
            self.blend
                .push(normalize_component(raw.clone(), offset + i + 1, self.policy)?);
        }
        Ok(())
    }

    fn from_path(
        path: &str,
        policy: Option<ValidationPolicy>,
        style: Option<NumberStyle>,
    ) -> Result<Self> {
        validation::validate_path("input", path)?;
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("toml") => {
                let file = BlendFile::from_file(path)?;
                file.validate()?;
                let policy = policy.unwrap_or_else(|| file.policy());
                Ok(Self {
                    name: file.blend.name.clone(),
                    blend: file.to_blend(policy)?,
                    target_strength: file.target_strength(),
                    policy,
                    report: ReportOptions::from_config(file.report.as_ref()),
                })
            }
            Some("csv") => {
                let policy = policy.unwrap_or_default();
                let name = Path::new(path)
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .unwrap_or("Blend")
                    .to_string();
                Ok(Self {
                    name,
                    blend: csv_table::read_blend_file(path, policy, style.unwrap_or_default())?,
                    target_strength: None,
                    policy,
                    report: ReportOptions::default(),
                })
            }
            _ => Err(BlendError::InvalidConfigValueError {
                field: "input".to_string(),
                value: path.to_string(),
                reason: "Unsupported file extension. Allowed extensions: toml, csv".to_string(),
            }),
        }
    }
}
