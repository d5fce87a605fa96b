pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::ExportSettings, BatchSettings};

pub use crate::core::codec::{convert, format, validate};
pub use crate::core::{engine::ConversionEngine, export::Exporter, pipeline::BatchPipeline};
pub use domain::model::{
    BatchReport, BatchRow, ConversionError, ErrorKind, ExportFormat, IButtonParts, MZoneCode,
    NormalizedCode, ValidationError,
};
pub use utils::error::{ConverterError, Result};
