use crate::domain::model::{ExportFormats, LogoSettings, Record};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// Destination for generated documents.
pub trait Storage: Send + Sync {
    /// Writes `data` under `name` and returns the location it was written to.
    fn write_file(
        &self,
        name: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<PathBuf>> + Send;

    fn location(&self, name: &str) -> PathBuf;
}

pub trait ConfigProvider: Send + Sync {
    fn output_dir(&self) -> &str;
    fn logo(&self) -> &LogoSettings;
    fn export_formats(&self) -> ExportFormats;
}

/// Anything that can hand the engine an ordered batch of records.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Short name used in user-visible messages, usually a file name.
    fn label(&self) -> String;

    async fn extract(&self) -> Result<Vec<Record>>;
}
