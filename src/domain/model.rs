use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub const COLUMN_NAME: &str = "Name";
pub const COLUMN_EMAIL: &str = "Email";
pub const COLUMN_COMPANY: &str = "Company Name";
pub const COLUMN_POSITION: &str = "Position";
pub const COLUMN_JOINING_DATE: &str = "Joining Date";

/// Columns every uploaded spreadsheet must carry, in display order.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    COLUMN_NAME,
    COLUMN_EMAIL,
    COLUMN_COMPANY,
    COLUMN_POSITION,
    COLUMN_JOINING_DATE,
];

pub const DEFAULT_NAME: &str = "Employee";
pub const DEFAULT_EMAIL: &str = "";
pub const DEFAULT_COMPANY: &str = "our company";
pub const DEFAULT_POSITION: &str = "your position";
pub const DEFAULT_JOINING_DATE: &str = "TBA";

/// Joining dates taken from real date cells or the manual form use this layout.
pub const JOINING_DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw, possibly incomplete field values for one employee.
///
/// Blank values are treated the same as absent ones when resolved into a [`Record`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub joining_date: Option<String>,
}

/// One employee, with every field resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Company Name")]
    pub company: String,
    #[serde(rename = "Position")]
    pub position: String,
    #[serde(rename = "Joining Date")]
    pub joining_date: String,
}

impl Record {
    pub fn from_fields(fields: RecordFields) -> Self {
        Self {
            name: resolve(fields.name, DEFAULT_NAME),
            email: resolve(fields.email, DEFAULT_EMAIL),
            company: resolve(fields.company, DEFAULT_COMPANY),
            position: resolve(fields.position, DEFAULT_POSITION),
            joining_date: resolve(fields.joining_date, DEFAULT_JOINING_DATE),
        }
    }
}

impl From<RecordFields> for Record {
    fn from(fields: RecordFields) -> Self {
        Self::from_fields(fields)
    }
}

fn resolve(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

/// A welcome letter with every placeholder already substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Letter {
    pub heading: String,
    pub salutation: String,
    pub body: Vec<String>,
    pub closing: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Word,
    Pdf,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Word => "docx",
            OutputFormat::Pdf => "pdf",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OutputFormat::Word => "Word",
            OutputFormat::Pdf => "PDF",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which documents to produce for each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFormats {
    pub word: bool,
    pub pdf: bool,
}

impl ExportFormats {
    pub fn selected(&self) -> Vec<OutputFormat> {
        let mut formats = Vec::with_capacity(2);
        // Word 先於 PDF
        if self.word {
            formats.push(OutputFormat::Word);
        }
        if self.pdf {
            formats.push(OutputFormat::Pdf);
        }
        formats
    }

    pub fn is_empty(&self) -> bool {
        !self.word && !self.pdf
    }
}

impl Default for ExportFormats {
    fn default() -> Self {
        Self {
            word: true,
            pdf: true,
        }
    }
}

/// Where the optional company logo lives and how large it is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoSettings {
    pub path: PathBuf,
    pub word_width_inches: f32,
    /// Bounding box in points for the PDF logo.
    pub pdf_max_width: f32,
    pub pdf_max_height: f32,
}

impl Default for LogoSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("logo.png"),
            word_width_inches: 2.0,
            pdf_max_width: 150.0,
            pdf_max_height: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A user-visible message produced while generating documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icon = match self.level {
            NoticeLevel::Info => "ℹ️",
            NoticeLevel::Success => "✅",
            NoticeLevel::Warning => "⚠️",
            NoticeLevel::Error => "❌",
        };
        write!(f, "{} {}", icon, self.message)
    }
}

/// Outcome of one generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationReport {
    pub files: Vec<PathBuf>,
    pub notices: Vec<Notice>,
}

impl GenerationReport {
    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Notice> {
        self.notices
            .iter()
            .filter(|n| n.level == NoticeLevel::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Notice> {
        self.notices
            .iter()
            .filter(|n| n.level == NoticeLevel::Warning)
    }

    pub fn push(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}
