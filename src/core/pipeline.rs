use crate::core::batch;
use crate::core::export::{self, Exporter};
use crate::core::{BatchReport, ConfigProvider, Pipeline, Storage};
use crate::utils::error::{ConverterError, Result};

/// Reads codes through `storage`, converts them and writes the export back.
pub struct BatchPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    input_text: Option<String>,
}

impl<S: Storage, C: ConfigProvider> BatchPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            input_text: None,
        }
    }

    /// Uses `text` as the batch input instead of reading `config.input_path()`.
    pub fn with_input_text(mut self, text: impl Into<String>) -> Self {
        self.input_text = Some(text.into());
        self
    }

    pub fn exporter(&self) -> Exporter {
        Exporter::new(self.config.sheet_name(), self.config.placeholder())
    }

    pub fn output_file(&self) -> String {
        export::output_file(
            self.config.output_path(),
            self.config.file_name(),
            self.config.export_format(),
        )
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for BatchPipeline<S, C> {
    async fn extract(&self) -> Result<String> {
        if let Some(text) = &self.input_text {
            tracing::debug!("Using {} bytes of inline input", text.len());
            return Ok(text.clone());
        }

        let path = self.config.input_path();
        tracing::debug!("Reading batch input from: {}", path);
        let bytes = self.storage.read_file(path).await?;

        String::from_utf8(bytes).map_err(|e| ConverterError::ConfigError {
            message: format!("input file {} is not valid UTF-8: {}", path, e),
        })
    }

    async fn transform(&self, text: String) -> Result<BatchReport> {
        let report = batch::convert_batch(&text);
        if report.is_empty() {
            return Err(ConverterError::EmptyBatch);
        }
        Ok(report)
    }

    async fn load(&self, report: &BatchReport) -> Result<String> {
        let format = self.config.export_format();
        let data = self.exporter().render(report, format)?;
        let output_file = self.output_file();

        tracing::debug!(
            "Writing {} export ({} bytes) to {}",
            format,
            data.len(),
            output_file
        );
        self.storage.write_file(&output_file, &data).await?;

        Ok(output_file)
    }
}
