use crate::config::toml_config::{AppConfig, DEFAULT_CONFIG_PATH};
use crate::utils::error::Result;
use crate::utils::validation::{validate_file_extensions, validate_path, Validate, INPUT_EXTENSIONS};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "welcome-docgen")]
#[command(about = "Generate personalized welcome letters (Word / PDF) from employee data")]
pub struct CliConfig {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Folder the documents are written to
    #[arg(long, global = true)]
    pub output_dir: Option<String>,

    /// Logo image embedded at the top of every document
    #[arg(long, global = true)]
    pub logo: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log process CPU and memory usage")]
    pub monitor: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Interactive session with upload and manual entry modes (default)
    Shell,

    /// Generate documents for every row of the given spreadsheets
    Generate {
        /// Spreadsheet files (.xlsx, .xls, .ods, .csv, ...)
        #[arg(required = true)]
        files: Vec<String>,

        /// Skip PDF output
        #[arg(long)]
        no_pdf: bool,

        /// Skip Word output
        #[arg(long)]
        no_word: bool,

        /// Print the generation report as JSON
        #[arg(long)]
        json: bool,
    },
}

impl CliConfig {
    /// Loads the config file and applies command-line overrides on top.
    ///
    /// An explicitly given `--config` must exist; the default path is optional.
    pub fn load_app_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::from_file_or_default(DEFAULT_CONFIG_PATH)?,
        };

        if let Some(output_dir) = &self.output_dir {
            config.output.directory = output_dir.clone();
        }
        if let Some(logo) = &self.logo {
            config.logo.path = PathBuf::from(logo);
        }
        if let Some(Command::Generate {
            no_pdf, no_word, ..
        }) = &self.command
        {
            if *no_pdf {
                config.output.export_pdf = false;
            }
            if *no_word {
                config.output.export_word = false;
            }
        }

        Ok(config)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(output_dir) = &self.output_dir {
            validate_path("--output-dir", output_dir)?;
        }
        if let Some(logo) = &self.logo {
            validate_path("--logo", logo)?;
        }
        if let Some(Command::Generate { files, .. }) = &self.command {
            validate_file_extensions("files", files, &INPUT_EXTENSIONS)?;
        }
        Ok(())
    }
}
