use crate::config::job::ReportOptions;
use crate::core::report::ReportFormat;
use crate::domain::model::RawComponent;
use crate::utils::error::{BlendError, Result};
use crate::utils::format::NumberStyle;
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, parse_quantity, Validate, ValidationPolicy};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "blend-calc")]
#[command(about = "Alcohol blending and dilution calculator")]
pub struct CliConfig {
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value = "compact", global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Final strength (Cf) of a blend
    Strength(BlendArgs),
    /// Water (Va) needed to dilute a blend to a target strength
    Dilute(DiluteArgs),
    /// Edit a blend interactively
    Shell(ShellArgs),
}

#[derive(Debug, Clone, Args)]
pub struct BlendArgs {
    /// Blend file (.toml or .csv)
    #[arg(short, long)]
    pub input: Option<String>,

    /// Extra component as NAME:VOLUME:STRENGTH (repeatable)
    #[arg(short = 'c', long = "component", value_name = "NAME:VOLUME:STRENGTH")]
    pub components: Vec<String>,

    /// How to treat out-of-range volumes and strengths
    #[arg(long, value_enum)]
    pub policy: Option<ValidationPolicy>,

    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(Debug, Clone, Args)]
pub struct DiluteArgs {
    #[command(flatten)]
    pub blend: BlendArgs,

    /// Target strength in °GL (defaults to the file's, then 40)
    #[arg(short, long)]
    pub target: Option<f64>,
}

#[derive(Debug, Clone, Args)]
pub struct ShellArgs {
    /// Blend file to start from instead of the default seed rows
    #[arg(short, long)]
    pub input: Option<String>,

    #[arg(long, value_enum)]
    pub policy: Option<ValidationPolicy>,

    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ReportArgs {
    /// Write a report after calculating
    #[arg(long)]
    pub report: bool,

    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(long, value_enum, value_delimiter = ',')]
    pub formats: Vec<ReportFormat>,

    /// Bundle the report files into a ZIP archive
    #[arg(long)]
    pub zip: bool,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long, value_enum)]
    pub number_style: Option<NumberStyle>,
}

impl BlendArgs {
    /// Parses the `--component` rows; quantities are read with `style`.
    pub fn component_rows(&self, style: NumberStyle) -> Result<Vec<RawComponent>> {
        self.components
            .iter()
            .map(|text| parse_component_arg(text, style))
            .collect()
    }
}

impl ReportArgs {
    /// Command-line flags win over the blend file.
    pub fn apply(&self, options: &mut ReportOptions) {
        if let Some(path) = &self.output_path {
            options.output_path = path.clone();
        }
        if !self.formats.is_empty() {
            options.formats = self.formats.clone();
        }
        if self.zip {
            options.compress = true;
        }
        if let Some(title) = &self.title {
            options.title = title.clone();
        }
        if let Some(style) = self.number_style {
            options.number_style = style;
        }
    }
}

/// Parses `NAME:VOLUME:STRENGTH`; the name may itself contain colons.
pub fn parse_component_arg(text: &str, style: NumberStyle) -> Result<RawComponent> {
    let mut parts = text.rsplitn(3, ':');
    let (Some(strength), Some(volume), Some(name)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(BlendError::invalid_component(
            "component",
            text,
            "expected NAME:VOLUME:STRENGTH",
        ));
    };

    let volume = parse_quantity("volume", volume, style)?;
    let strength = parse_quantity("strength", strength, style)?;
    Ok(RawComponent {
        name: name.to_string(),
        volume,
        strength,
    })
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        let (input, report) = match &self.command {
            Command::Strength(args) => (&args.input, &args.report),
            Command::Dilute(args) => {
                if let Some(target) = args.target {
                    validation::validate_target_strength(target)?;
                }
                (&args.blend.input, &args.blend.report)
            }
            Command::Shell(args) => (&args.input, &args.report),
        };

        if let Some(path) = input {
            validation::validate_path("input", path)?;
        }
        if let Some(path) = &report.output_path {
            validation::validate_path("output_path", path)?;
        }

        if let Command::Strength(args) = &self.command {
            if args.input.is_none() && args.components.is_empty() {
                return Err(BlendError::ConfigError {
                    message: "Provide --input or at least one --component".to_string(),
                });
            }
        }
        if let Command::Dilute(args) = &self.command {
            if args.blend.input.is_none() && args.blend.components.is_empty() {
                return Err(BlendError::ConfigError {
                    message: "Provide --input or at least one --component".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_component_arg() {
        let standard = NumberStyle::Standard;
        let raw = parse_component_arg("Base alcohol:1000:96", standard).unwrap();
        assert_eq!(raw.name, "Base alcohol");
        assert_eq!(raw.volume, 1000.0);
        assert_eq!(raw.strength, 96.0);

        let raw = parse_component_arg("Tank 2: heads:250,5:70", standard).unwrap();
        assert_eq!(raw.name, "Tank 2: heads");
        assert_eq!(raw.volume, 250.5);

        assert!(parse_component_arg("1000:96", standard).is_err());
        assert!(parse_component_arg("A:x:96", standard).is_err());
    }

    #[test]
    fn test_component_rows_use_number_style() {
        let config = CliConfig::try_parse_from([
            "blend-calc",
            "strength",
            "-c",
            "Base alcohol:1,000:96",
            "-c",
            "Water:1.000:0",
        ])
        .unwrap();
        let Command::Strength(args) = &config.command else {
            panic!("expected strength");
        };

        let rows = args.component_rows(NumberStyle::Standard).unwrap();
        assert_eq!(rows[0].volume, 1000.0);
        assert_eq!(rows[1].volume, 1.0);

        let rows = args.component_rows(NumberStyle::Localized).unwrap();
        assert_eq!(rows[0].volume, 1.0);
        assert_eq!(rows[1].volume, 1000.0);
    }

    #[test]
    fn test_parse_dilute_command() {
        let config = CliConfig::try_parse_from([
            "blend-calc",
            "dilute",
            "-c",
            "Base alcohol:1000:96",
            "--target",
            "40",
            "--formats",
            "txt,json",
            "--zip",
        ])
        .unwrap();

        let Command::Dilute(args) = &config.command else {
            panic!("expected dilute");
        };
        assert_eq!(args.target, Some(40.0));
        assert_eq!(args.blend.components.len(), 1);
        assert_eq!(
            args.blend.report.formats,
            vec![ReportFormat::Txt, ReportFormat::Json]
        );
        assert!(config.validate().is_ok());

        let mut options = ReportOptions::default();
        args.blend.report.apply(&mut options);
        assert!(options.compress);
        assert_eq!(options.formats.len(), 2);
    }

    #[test]
    fn test_validation_rejects_bad_target_and_empty_blend() {
        let config =
            CliConfig::try_parse_from(["blend-calc", "dilute", "-c", "A:10:40", "--target", "0"])
                .unwrap();
        assert!(config.validate().is_err());

        let config = CliConfig::try_parse_from(["blend-calc", "strength"]).unwrap();
        assert!(config.validate().is_err());

        let config = CliConfig::try_parse_from(["blend-calc", "shell", "-v"]).unwrap();
        assert!(config.verbose);
        assert!(config.validate().is_ok());
    }
}
