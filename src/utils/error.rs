use crate::domain::model::ConversionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConverterError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Batch input contains no iButton codes")]
    EmptyBatch,

    #[error("Conversion failed: {0}")]
    ConversionError(#[from] ConversionError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Storage,
    Export,
}

impl ConverterError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ConverterError::EmptyBatch | ConverterError::ConversionError(_) => {
                ErrorCategory::Input
            }
            ConverterError::ConfigError { .. }
            | ConverterError::InvalidConfigValueError { .. }
            | ConverterError::TomlError(_) => ErrorCategory::Configuration,
            ConverterError::IoError(_) => ErrorCategory::Storage,
            ConverterError::ZipError(_)
            | ConverterError::CsvError(_)
            | ConverterError::SerializationError(_) => ErrorCategory::Export,
        }
    }

    /// Process exit code used by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Input => 1,
            ErrorCategory::Configuration => 2,
            ErrorCategory::Storage | ErrorCategory::Export => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ConverterError::EmptyBatch => {
                "Please enter at least one iButton code (one per line).".to_string()
            }
            ConverterError::ConversionError(e) => e.user_message().to_string(),
            ConverterError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            ConverterError::ConfigError { message } => format!("Configuration problem: {}", message),
            ConverterError::TomlError(_) => "The configuration file is not valid TOML.".to_string(),
            ConverterError::IoError(e) => format!("Could not read or write a file: {}", e),
            ConverterError::ZipError(_)
            | ConverterError::CsvError(_)
            | ConverterError::SerializationError(_) => {
                "The export file could not be generated.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ConverterError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ValidationError;

    #[test]
    fn test_category_and_exit_code() {
        assert_eq!(ConverterError::EmptyBatch.category(), ErrorCategory::Input);
        assert_eq!(ConverterError::EmptyBatch.exit_code(), 1);

        let config = ConverterError::ConfigError {
            message: "bad".to_string(),
        };
        assert_eq!(config.category(), ErrorCategory::Configuration);
        assert_eq!(config.exit_code(), 2);

        let io = ConverterError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        assert_eq!(io.category(), ErrorCategory::Storage);
        assert_eq!(io.exit_code(), 3);
    }

    #[test]
    fn test_conversion_error_message_is_forwarded() {
        let err = ConverterError::from(ConversionError::InvalidFormat(
            ValidationError::WrongLength { length: 14 },
        ));
        assert!(err.user_friendly_message().contains("16"));
        assert!(err.to_string().contains("14"));
    }
}
