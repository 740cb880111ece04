use crate::core::ConfigProvider;
use crate::domain::model::{ExportFormats, LogoSettings};
use crate::utils::error::{DocGenError, Result};
use crate::utils::validation::{validate_path, validate_range, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "docgen.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub output: OutputConfig,
    pub logo: LogoSettings,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: String,
    pub export_pdf: bool,
    pub export_word: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "output".to_string(),
            export_pdf: true,
            export_word: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub json: bool,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Like [`AppConfig::from_file`], but a missing file yields the defaults.
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(
                "No config file at {}, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DocGenError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${LOGO_PATH})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DocGenError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("output.directory", &self.output.directory)?;
        validate_path("logo.path", &self.logo.path.to_string_lossy())?;
        validate_range("logo.word_width_inches", self.logo.word_width_inches, 0.1, 8.5)?;
        validate_range("logo.pdf_max_width", self.logo.pdf_max_width, 1.0, 512.0)?;
        validate_range("logo.pdf_max_height", self.logo.pdf_max_height, 1.0, 400.0)?;
        Ok(())
    }
}

impl ConfigProvider for AppConfig {
    fn output_dir(&self) -> &str {
        &self.output.directory
    }

    fn logo(&self) -> &LogoSettings {
        &self.logo
    }

    fn export_formats(&self) -> ExportFormats {
        ExportFormats {
            word: self.output.export_word,
            pdf: self.output.export_pdf,
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.output_dir(), "output");
        assert_eq!(config.logo().path, PathBuf::from("logo.png"));
        assert_eq!(config.export_formats(), ExportFormats::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[output]
directory = "./letters"
export_pdf = false

[logo]
path = "assets/brand.png"
word_width_inches = 1.5
pdf_max_width = 120.0

[logging]
json = true
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.output.directory, "./letters");
        assert!(!config.output.export_pdf);
        assert!(config.output.export_word);
        assert_eq!(config.logo.path, PathBuf::from("assets/brand.png"));
        assert_eq!(config.logo.word_width_inches, 1.5);
        assert_eq!(config.logo.pdf_max_width, 120.0);
        assert_eq!(config.logo.pdf_max_height, 100.0);
        assert!(config.logging.json);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("WELCOME_DOCGEN_TEST_OUTPUT", "/tmp/letters");

        let config = AppConfig::from_toml_str(
            r#"
[output]
directory = "${WELCOME_DOCGEN_TEST_OUTPUT}"
"#,
        )
        .unwrap();
        assert_eq!(config.output.directory, "/tmp/letters");

        std::env::remove_var("WELCOME_DOCGEN_TEST_OUTPUT");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml_str("[output\ndirectory = 1").unwrap_err();
        assert!(matches!(err, DocGenError::ConfigError { .. }));
    }

    #[test]
    fn test_config_validation() {
        let config = AppConfig::from_toml_str(
            r#"
[output]
directory = ""
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::from_toml_str(
            r#"
[logo]
word_width_inches = 0.0
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[output]\ndirectory = \"from-file\"\n")
            .unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output.directory, "from-file");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = AppConfig::from_file_or_default(temp_dir.path().join("docgen.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
