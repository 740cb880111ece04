pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
#[cfg(feature = "cli")]
pub mod shell;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
#[cfg(feature = "cli")]
pub use shell::Shell;

pub use adapters::storage::LocalStorage;
pub use config::AppConfig;
pub use core::{engine::DocumentEngine, template::WELCOME_LETTER};
pub use domain::model::{ExportFormats, GenerationReport, Record, RecordFields};
pub use utils::error::{DocGenError, Result};
