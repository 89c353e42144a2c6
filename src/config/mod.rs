#[cfg(feature = "cli")]
pub mod cli;
pub mod csv_table;
pub mod job;
pub mod local_storage;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use job::{BlendJob, ReportOptions};
pub use local_storage::LocalStorage;
