use crate::core::Storage;
use crate::utils::error::Result;
use std::path::PathBuf;

/// Writes documents into a folder on the local file system.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, name: &str, data: &[u8]) -> Result<PathBuf> {
        let full_path = self.location(name);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&full_path, data).await?;
        Ok(full_path)
    }

    fn location(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_file_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().join("nested").join("output"));

        let path = storage.write_file("letter.pdf", b"%PDF").await.unwrap();

        assert_eq!(path, temp_dir.path().join("nested/output/letter.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF");
    }

    #[tokio::test]
    async fn test_write_file_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        storage.write_file("a.docx", b"first").await.unwrap();
        let path = storage.write_file("a.docx", b"second").await.unwrap();

        assert_eq!(std::fs::read(path).unwrap(), b"second");
    }
}
