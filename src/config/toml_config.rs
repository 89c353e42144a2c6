use crate::core::report::ReportFormat;
use crate::domain::model::{Blend, RawComponent};
use crate::utils::error::{BlendError, Result};
use crate::utils::format::NumberStyle;
use crate::utils::validation::{self, normalize_component, Validate, ValidationPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A blend saved as TOML: the component table plus optional dilution,
/// report and validation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlendFile {
    pub blend: BlendInfo,
    #[serde(default)]
    pub components: Vec<RawComponent>,
    pub dilution: Option<DilutionConfig>,
    pub report: Option<ReportConfig>,
    pub validation: Option<ValidationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlendInfo {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DilutionConfig {
    pub target_strength: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    pub title: Option<String>,
    pub output_path: Option<String>,
    pub formats: Option<Vec<ReportFormat>>,
    pub compress: Option<bool>,
    pub filename: Option<String>,
    pub number_style: Option<NumberStyle>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    pub policy: Option<ValidationPolicy>,
}

impl BlendFile {
    /// Loads a blend file from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BlendError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BlendError::ConfigError {
            message: format!("invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("blend.name", &self.blend.name)?;

        if let Some(dilution) = &self.dilution {
            validation::validate_target_strength(dilution.target_strength)?;
        }

        if let Some(report) = &self.report {
            if let Some(path) = &report.output_path {
                validation::validate_path("report.output_path", path)?;
            }
            if let Some(filename) = &report.filename {
                validation::validate_non_empty_string("report.filename", filename)?;
            }
            if matches!(&report.formats, Some(formats) if formats.is_empty()) {
                return Err(BlendError::InvalidConfigValueError {
                    field: "report.formats".to_string(),
                    value: "[]".to_string(),
                    reason: "At least one output format is required".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.validation
            .as_ref()
            .and_then(|v| v.policy)
            .unwrap_or_default()
    }

    pub fn target_strength(&self) -> Option<f64> {
        self.dilution.as_ref().map(|d| d.target_strength)
    }

    /// Builds the blend, normalizing every row with `policy`.
    pub fn to_blend(&self, policy: ValidationPolicy) -> Result<Blend> {
        let mut blend = Blend::new();
        for (i, raw) in self.components.iter().enumerate() {
            blend.push(normalize_component(raw.clone(), i + 1, policy)?);
        }
        Ok(blend)
    }
}

impl Validate for BlendFile {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
