use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocGenError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Could not read spreadsheet: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Word document error: {message}")]
    DocxError { message: String },

    #[error("PDF document error: {message}")]
    PdfError { message: String },

    #[error("Spreadsheet must contain the columns: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("Spreadsheet '{source_name}' contains no worksheet")]
    EmptyWorkbook { source_name: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Generation,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DocGenError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DocGenError::SpreadsheetError(_)
            | DocGenError::CsvError(_)
            | DocGenError::MissingColumns { .. }
            | DocGenError::EmptyWorkbook { .. }
            | DocGenError::ValidationError { .. } => ErrorCategory::Input,
            DocGenError::DocxError { .. }
            | DocGenError::PdfError { .. }
            | DocGenError::ImageError(_) => ErrorCategory::Generation,
            DocGenError::ConfigError { .. }
            | DocGenError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            DocGenError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Generation => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DocGenError::MissingColumns { .. } | DocGenError::EmptyWorkbook { .. } => {
                self.to_string()
            }
            DocGenError::SpreadsheetError(_) | DocGenError::CsvError(_) => {
                format!("The input file could not be read ({})", self)
            }
            DocGenError::IoError(e) => format!("File system error: {}", e),
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DocGenError::MissingColumns { .. } => {
                "Add a header row with Name, Email, Company Name, Position and Joining Date"
            }
            DocGenError::SpreadsheetError(_) | DocGenError::EmptyWorkbook { .. } => {
                "Check that the file is a valid .xlsx/.xls/.ods workbook"
            }
            DocGenError::CsvError(_) => "Check that the CSV file is comma separated UTF-8",
            DocGenError::ImageError(_) => "Replace the logo with a valid PNG or JPEG image",
            DocGenError::IoError(_) => "Check that the output folder is writable",
            DocGenError::ConfigError { .. } | DocGenError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or flags"
            }
            _ => "Try again, and run with --verbose for details",
        }
    }
}

pub type Result<T> = std::result::Result<T, DocGenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_lists_columns() {
        let err = DocGenError::MissingColumns {
            missing: vec!["Email".to_string(), "Joining Date".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Spreadsheet must contain the columns: Email, Joining Date"
        );
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_io_error_is_critical() {
        let err = DocGenError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().contains("denied"));
    }
}
