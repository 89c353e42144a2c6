pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{BlendJob, LocalStorage, ReportOptions};

pub use crate::app::shell::BlendShell;
pub use crate::core::engine::{compute_final_strength, compute_water_to_add};
pub use crate::core::runner::{BlendRunner, CalculationRequest, RunOutcome};
pub use crate::core::session::BlendSession;
pub use domain::model::{Blend, Calculation, Component, DilutionResult, StrengthResult};
pub use utils::error::{BlendError, Result};
