use crate::core::loader::load_records;
use crate::core::{Record, RecordSource};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// A spreadsheet on disk, read when the engine asks for it.
#[derive(Debug, Clone)]
pub struct SpreadsheetFile {
    path: PathBuf,
}

impl SpreadsheetFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RecordSource for SpreadsheetFile {
    fn label(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    async fn extract(&self) -> Result<Vec<Record>> {
        tracing::debug!("Reading spreadsheet {}", self.path.display());
        let bytes = tokio::fs::read(&self.path).await?;
        load_records(&self.label(), bytes)
    }
}

/// Spreadsheet bytes that were already uploaded into memory.
#[derive(Debug, Clone)]
pub struct UploadedSpreadsheet {
    name: String,
    bytes: Vec<u8>,
}

impl UploadedSpreadsheet {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

#[async_trait]
impl RecordSource for UploadedSpreadsheet {
    fn label(&self) -> String {
        self.name.clone()
    }

    async fn extract(&self) -> Result<Vec<Record>> {
        load_records(&self.name, self.bytes.clone())
    }
}

/// Records typed in through the manual entry form.
#[derive(Debug, Clone, Copy)]
pub struct ManualEntries<'a> {
    records: &'a [Record],
}

impl<'a> ManualEntries<'a> {
    pub fn new(records: &'a [Record]) -> Self {
        Self { records }
    }
}

#[async_trait]
impl<'a> RecordSource for ManualEntries<'a> {
    fn label(&self) -> String {
        "manual entries".to_string()
    }

    async fn extract(&self) -> Result<Vec<Record>> {
        Ok(self.records.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::RecordFields;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_spreadsheet_file_reads_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("staff.csv");
        std::fs::write(
            &path,
            "Name,Email,Company Name,Position,Joining Date\nJane Doe,j@a.test,Acme,Engineer,2024-01-10\n",
        )
        .unwrap();

        let source = SpreadsheetFile::new(&path);

        assert_eq!(source.label(), "staff.csv");
        let records = source.extract().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].company, "Acme");
    }

    #[tokio::test]
    async fn test_missing_spreadsheet_file_is_an_error() {
        let source = SpreadsheetFile::new("/definitely/not/here.xlsx");
        assert!(source.extract().await.is_err());
    }

    #[tokio::test]
    async fn test_manual_entries_preserve_order() {
        let records = vec![
            Record::from_fields(RecordFields {
                name: Some("A".to_string()),
                ..Default::default()
            }),
            Record::from_fields(RecordFields {
                name: Some("B".to_string()),
                ..Default::default()
            }),
        ];

        let extracted = ManualEntries::new(&records).extract().await.unwrap();
        assert_eq!(extracted, records);
    }
}
