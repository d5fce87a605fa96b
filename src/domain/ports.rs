use crate::domain::model::{BatchReport, ExportFormat};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    /// Batch input, relative to the storage root.
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn export_format(&self) -> ExportFormat;
    fn sheet_name(&self) -> &str;
    fn placeholder(&self) -> &str;
    /// Export file name without extension.
    fn file_name(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<String>;
    async fn transform(&self, text: String) -> Result<BatchReport>;
    async fn load(&self, report: &BatchReport) -> Result<String>;
}
