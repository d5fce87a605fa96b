pub mod batch;
pub mod codec;
pub mod engine;
pub mod export;
pub mod pipeline;

pub use crate::domain::model::{BatchReport, BatchRow};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
