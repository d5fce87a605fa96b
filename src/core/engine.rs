use crate::core::{BatchReport, Pipeline};
use crate::utils::error::Result;

/// What a batch run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: BatchReport,
    /// Export location, `None` when loading was skipped.
    pub output_path: Option<String>,
}

pub struct ConversionEngine<P: Pipeline> {
    pipeline: P,
    export: bool,
}

impl<P: Pipeline> ConversionEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            export: true,
        }
    }

    /// Stops after the transform step when `export` is false.
    pub fn with_export(mut self, export: bool) -> Self {
        self.export = export;
        self
    }

    pub async fn run(&self) -> Result<RunOutcome> {
        tracing::info!("Starting batch conversion");

        let text = self.pipeline.extract().await?;
        tracing::debug!("Read {} bytes of input", text.len());

        let report = self.pipeline.transform(text).await?;
        tracing::info!(
            "Converted {} codes: {} valid, {} invalid",
            report.len(),
            report.valid_count(),
            report.invalid_count()
        );

        let output_path = if self.export {
            let path = self.pipeline.load(&report).await?;
            tracing::info!("Export saved to: {}", path);
            Some(path)
        } else {
            tracing::debug!("Export skipped");
            None
        };

        Ok(RunOutcome {
            report,
            output_path,
        })
    }
}
