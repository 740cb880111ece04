use crate::core::Record;
use crate::domain::model::{ExportFormats, OutputFormat};
use clap::ValueEnum;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum InputMode {
    #[default]
    Upload,
    Manual,
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputMode::Upload => f.write_str("upload"),
            InputMode::Manual => f.write_str("manual"),
        }
    }
}

/// State of one interactive session.
///
/// Lives exactly as long as the shell that owns it; manual entries are only
/// ever removed by [`Session::clear_entries`].
#[derive(Debug, Clone, Default)]
pub struct Session {
    mode: InputMode,
    formats: ExportFormats,
    uploads: Vec<PathBuf>,
    entries: Vec<Record>,
}

impl Session {
    pub fn new(formats: ExportFormats) -> Self {
        Self {
            formats,
            ..Default::default()
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: InputMode) {
        self.mode = mode;
    }

    pub fn formats(&self) -> ExportFormats {
        self.formats
    }

    pub fn set_format(&mut self, format: OutputFormat, enabled: bool) {
        match format {
            OutputFormat::Word => self.formats.word = enabled,
            OutputFormat::Pdf => self.formats.pdf = enabled,
        }
    }

    /// Replaces the current file selection.
    pub fn select_uploads(&mut self, files: Vec<PathBuf>) {
        self.uploads = files;
    }

    pub fn uploads(&self) -> &[PathBuf] {
        &self.uploads
    }

    /// Appends an entry and returns how many entries there are now.
    pub fn add_entry(&mut self, record: Record) -> usize {
        self.entries.push(record);
        self.entries.len()
    }

    pub fn entries(&self) -> &[Record] {
        &self.entries
    }

    pub fn clear_entries(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::RecordFields;

    #[test]
    fn test_new_session_starts_in_upload_mode() {
        let session = Session::new(ExportFormats::default());
        assert_eq!(session.mode(), InputMode::Upload);
        assert!(session.entries().is_empty());
        assert!(session.uploads().is_empty());
    }

    #[test]
    fn test_entries_accumulate_and_clear() {
        let mut session = Session::new(ExportFormats::default());
        assert_eq!(session.add_entry(Record::from_fields(RecordFields::default())), 1);
        assert_eq!(session.add_entry(Record::from_fields(RecordFields::default())), 2);

        session.set_mode(InputMode::Upload);
        assert_eq!(session.entries().len(), 2);

        session.clear_entries();
        assert!(session.entries().is_empty());
    }

    #[test]
    fn test_toggle_formats() {
        let mut session = Session::new(ExportFormats::default());
        session.set_format(OutputFormat::Pdf, false);
        assert_eq!(
            session.formats(),
            ExportFormats {
                word: true,
                pdf: false
            }
        );
    }
}
