pub mod engine;
pub mod report;
pub mod runner;
pub mod session;

pub use crate::domain::model::{Blend, Calculation, Component, DilutionResult, StrengthResult};
pub use crate::domain::ports::{ReportSettings, Storage};
pub use crate::utils::error::Result;
