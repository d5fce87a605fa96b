use crate::core::export::{self, DEFAULT_FILE_NAME, DEFAULT_SHEET_NAME};
use crate::domain::model::{ExportFormat, INVALID_PLACEHOLDER};
use crate::utils::error::{ConverterError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_sheet_name, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional settings file, e.g.
///
/// ```toml
/// [export]
/// format = "csv"
/// output_path = "./exports"
/// placeholder = "INVALID"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub export: Option<ExportSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportSection {
    pub format: Option<ExportFormat>,
    pub output_path: Option<String>,
    pub file_name: Option<String>,
    pub sheet_name: Option<String>,
    pub placeholder: Option<String>,
}

/// Fully resolved export settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSettings {
    pub format: ExportFormat,
    pub output_path: String,
    pub file_name: String,
    pub sheet_name: String,
    pub placeholder: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            output_path: ".".to_string(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            placeholder: INVALID_PLACEHOLDER.to_string(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| ConverterError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Settings from this file layered over the defaults.
    pub fn export_settings(&self) -> ExportSettings {
        let mut settings = ExportSettings::default();
        if let Some(section) = &self.export {
            settings.apply(section.clone());
        }
        settings
    }
}

impl ExportSettings {
    /// Overwrites every field that `overrides` sets.
    pub fn apply(&mut self, overrides: ExportSection) {
        if let Some(format) = overrides.format {
            self.format = format;
        }
        if let Some(output_path) = overrides.output_path {
            self.output_path = output_path;
        }
        if let Some(file_name) = overrides.file_name {
            self.file_name = file_name;
        }
        if let Some(sheet_name) = overrides.sheet_name {
            self.sheet_name = sheet_name;
        }
        if let Some(placeholder) = overrides.placeholder {
            self.placeholder = placeholder;
        }
    }

    /// Output file path, e.g. `./conversao_ibutton.xlsx`.
    pub fn output_file(&self) -> String {
        export::output_file(&self.output_path, &self.file_name, self.format)
    }
}

impl Validate for ExportSettings {
    fn validate(&self) -> Result<()> {
        validate_path("export.output_path", &self.output_path)?;
        validate_non_empty_string("export.file_name", &self.file_name)?;
        if self.file_name.contains(['/', '\\']) {
            return Err(ConverterError::InvalidConfigValueError {
                field: "export.file_name".to_string(),
                value: self.file_name.clone(),
                reason: "File name must not contain path separators".to_string(),
            });
        }
        validate_sheet_name("export.sheet_name", &self.sheet_name)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_file() {
        let config = TomlConfig::from_toml_str(
            r#"
[export]
format = "csv"
output_path = "./exports/"
file_name = "mzone"
sheet_name = "Codes"
placeholder = "INVALID"
"#,
        )
        .unwrap();

        let settings = config.export_settings();
        assert_eq!(settings.format, ExportFormat::Csv);
        assert_eq!(settings.placeholder, "INVALID");
        assert_eq!(settings.output_file(), "./exports/mzone.csv");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = TomlConfig::from_toml_str("").unwrap().export_settings();
        assert_eq!(settings, ExportSettings::default());
        assert_eq!(settings.output_file(), "./conversao_ibutton.xlsx");
    }

    #[test]
    fn test_unknown_keys_and_formats_are_rejected() {
        assert!(matches!(
            TomlConfig::from_toml_str("[export]\nformat = \"pdf\"\n"),
            Err(ConverterError::TomlError(_))
        ));
        assert!(TomlConfig::from_toml_str("[export]\ncolour = \"red\"\n").is_err());
    }

    #[test]
    fn test_apply_only_overrides_set_fields() {
        let mut settings = ExportSettings::default();
        settings.apply(ExportSection {
            format: Some(ExportFormat::Tsv),
            ..Default::default()
        });
        assert_eq!(settings.format, ExportFormat::Tsv);
        assert_eq!(settings.sheet_name, DEFAULT_SHEET_NAME);
    }

    #[test]
    fn test_validation_failures() {
        let mut settings = ExportSettings::default();
        settings.sheet_name = "a/b".to_string();
        assert!(settings.validate().is_err());

        let mut settings = ExportSettings::default();
        settings.file_name = "  ".to_string();
        assert!(settings.validate().is_err());

        let mut settings = ExportSettings::default();
        settings.file_name = "dir/name".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_from_missing_file_is_config_error() {
        let err = TomlConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConverterError::ConfigError { .. }));
    }
}
