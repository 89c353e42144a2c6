use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlendError {
    #[error("No volume entered: the blend's total volume is zero")]
    ZeroVolumeBlend,

    #[error("Target strength must be greater than zero, got {target}")]
    NonPositiveTarget { target: f64 },

    #[error("Invalid component {field} '{value}': {reason}")]
    InvalidComponent {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Row {row} does not exist (blend has {len} rows)")]
    RowNotFound { row: usize, len: usize },

    #[error("Nothing has been calculated yet")]
    NoCalculation,

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for {field} '{value}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Calculation,
    Input,
    Configuration,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BlendError {
    pub fn invalid_component(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        BlendError::InvalidComponent {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            BlendError::ZeroVolumeBlend
            | BlendError::NonPositiveTarget { .. }
            | BlendError::NoCalculation => ErrorCategory::Calculation,
            BlendError::InvalidComponent { .. }
            | BlendError::RowNotFound { .. }
            | BlendError::CsvError(_) => ErrorCategory::Input,
            BlendError::ConfigError { .. }
            | BlendError::InvalidConfigValueError { .. }
            | BlendError::TomlError(_) => ErrorCategory::Configuration,
            BlendError::IoError(_)
            | BlendError::SerializationError(_)
            | BlendError::ZipError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // advisory states: the operator fixes the table and asks again
            BlendError::ZeroVolumeBlend | BlendError::NoCalculation => ErrorSeverity::Low,
            BlendError::NonPositiveTarget { .. }
            | BlendError::InvalidComponent { .. }
            | BlendError::RowNotFound { .. } => ErrorSeverity::Medium,
            BlendError::ConfigError { .. }
            | BlendError::InvalidConfigValueError { .. }
            | BlendError::TomlError(_)
            | BlendError::CsvError(_) => ErrorSeverity::High,
            BlendError::IoError(_)
            | BlendError::SerializationError(_)
            | BlendError::ZipError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            BlendError::ZeroVolumeBlend => {
                "Enter a volume greater than zero for at least one component".to_string()
            }
            BlendError::NonPositiveTarget { .. } => {
                "Choose a target strength between 0 (exclusive) and 100 °GL".to_string()
            }
            BlendError::InvalidComponent { field, .. } => match field.as_str() {
                "strength" => "Strength must be a number between 0 and 100 °GL".to_string(),
                "volume" => {
                    "Volume must be a non-negative number of liters, at most 1e12".to_string()
                }
                _ => "Check the component row and try again".to_string(),
            },
            BlendError::RowNotFound { len, .. } => {
                format!("Use a row number between 1 and {}", len)
            }
            BlendError::NoCalculation => {
                "Run a strength or dilution calculation before requesting a report".to_string()
            }
            BlendError::ConfigError { .. }
            | BlendError::InvalidConfigValueError { .. }
            | BlendError::TomlError(_) => {
                "Check the blend file against the documented TOML layout".to_string()
            }
            BlendError::CsvError(_) => {
                "Make sure the CSV has name, volume and strength columns".to_string()
            }
            BlendError::IoError(_) => {
                "Check that the path exists and is writable".to_string()
            }
            BlendError::SerializationError(_) | BlendError::ZipError(_) => {
                "Retry the export; if it keeps failing, choose another output format".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BlendError::ZeroVolumeBlend => "No volume entered".to_string(),
            BlendError::NonPositiveTarget { target } => {
                format!("Target strength {} °GL is not valid", target)
            }
            BlendError::RowNotFound { row, .. } => format!("There is no row {}", row),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BlendError>;
