pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use core::{engine::ClassifyEngine, pipeline::ClassifyPipeline};
pub use domain::fiscal::{FiscalCalendar, FiscalYear};
pub use utils::error::{ClassifyError, Result};
