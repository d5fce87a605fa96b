pub mod cli;
pub mod toml_config;

use crate::domain::model::ExportFormat;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use serde::{Deserialize, Serialize};
use toml_config::ExportSettings;

/// Reads batch input from standard input instead of a file.
pub const STDIN_INPUT: &str = "-";

/// Settings for one batch run: where the codes come from and how to export them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSettings {
    pub input_path: String,
    pub export: ExportSettings,
}

impl BatchSettings {
    pub fn new(input_path: impl Into<String>, export: ExportSettings) -> Self {
        Self {
            input_path: input_path.into(),
            export,
        }
    }

    pub fn reads_stdin(&self) -> bool {
        self.input_path == STDIN_INPUT
    }
}

impl Validate for BatchSettings {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input_path)?;
        self.export.validate()
    }
}

impl ConfigProvider for BatchSettings {
    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn output_path(&self) -> &str {
        &self.export.output_path
    }

    fn export_format(&self) -> ExportFormat {
        self.export.format
    }

    fn sheet_name(&self) -> &str {
        &self.export.sheet_name
    }

    fn placeholder(&self) -> &str {
        &self.export.placeholder
    }

    fn file_name(&self) -> &str {
        &self.export.file_name
    }
}

#[cfg(feature = "cli")]
pub use args::{BatchArgs, CliConfig, Command, ConvertArgs};

#[cfg(feature = "cli")]
mod args {
    use super::toml_config::{ExportSection, TomlConfig};
    use super::{BatchSettings, STDIN_INPUT};
    use crate::domain::model::{ExportFormat, IButtonParts};
    use crate::utils::error::Result;
    use crate::utils::validation::Validate;
    use clap::{Args, Parser, Subcommand};
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "ibutton-mzone")]
    #[command(about = "Convert iButton tag codes into MZone codes")]
    pub struct CliConfig {
        #[arg(long, global = true, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, global = true, help = "Emit logs as JSON")]
        pub log_json: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Convert a single iButton code
        Convert(ConvertArgs),
        /// Convert one code per line and export the results
        Batch(BatchArgs),
    }

    #[derive(Debug, Clone, Args)]
    pub struct ConvertArgs {
        /// Full 16-digit code; omit to build it from --family/--serial/--check
        #[arg(conflicts_with_all = ["family", "serial", "check"])]
        pub code: Option<String>,

        #[arg(long, default_value = "", help = "First 2 digits (family byte)")]
        pub family: String,

        #[arg(long, default_value = "", help = "Middle 12 digits (serial)")]
        pub serial: String,

        #[arg(long, default_value = "", help = "Last 2 digits (check byte)")]
        pub check: String,
    }

    impl ConvertArgs {
        pub fn raw_code(&self) -> String {
            match &self.code {
                Some(code) => code.clone(),
                None => IButtonParts::new(&self.family, &self.serial, &self.check).assemble(),
            }
        }
    }

    #[derive(Debug, Clone, Args)]
    pub struct BatchArgs {
        /// File with one code per line, or '-' for stdin
        #[arg(long, short, default_value = STDIN_INPUT)]
        pub input: String,

        #[arg(long, help = "TOML settings file")]
        pub config: Option<PathBuf>,

        #[arg(long, short)]
        pub output_path: Option<String>,

        #[arg(long, short, value_enum)]
        pub format: Option<ExportFormat>,

        #[arg(long, help = "Export file name without extension")]
        pub file_name: Option<String>,

        #[arg(long)]
        pub sheet_name: Option<String>,

        #[arg(long, help = "Value written for codes that fail to convert")]
        pub placeholder: Option<String>,

        #[arg(long, help = "Print rows as JSON instead of text")]
        pub json: bool,

        #[arg(long, help = "Only print results, do not write an export file")]
        pub no_export: bool,
    }

    impl BatchArgs {
        /// Defaults, then the settings file, then command-line flags.
        pub fn resolve(&self) -> Result<BatchSettings> {
            let file_config = match &self.config {
                Some(path) => TomlConfig::from_file(path)?,
                None => TomlConfig::default(),
            };

            let mut export = file_config.export_settings();
            export.apply(ExportSection {
                format: self.format,
                output_path: self.output_path.clone(),
                file_name: self.file_name.clone(),
                sheet_name: self.sheet_name.clone(),
                placeholder: self.placeholder.clone(),
            });

            let settings = BatchSettings::new(self.input.clone(), export);
            settings.validate()?;
            Ok(settings)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::io::Write;
        use tempfile::NamedTempFile;

        #[test]
        fn test_convert_from_parts() {
            let config = CliConfig::parse_from([
                "ibutton-mzone",
                "convert",
                "--family",
                "0C",
                "--serial",
                "000001A00BC4",
                "--check",
                "01",
            ]);
            match config.command {
                Command::Convert(args) => assert_eq!(args.raw_code(), "0C000001A00BC401"),
                other => panic!("unexpected command: {:?}", other),
            }
        }

        #[test]
        fn test_convert_code_conflicts_with_parts() {
            let result = CliConfig::try_parse_from([
                "ibutton-mzone",
                "convert",
                "0C000001A00BC401",
                "--family",
                "0C",
            ]);
            assert!(result.is_err());
        }

        #[test]
        fn test_batch_flags_override_file() {
            let mut file = NamedTempFile::new().unwrap();
            writeln!(
                file,
                "[export]\nformat = \"csv\"\nplaceholder = \"BAD\"\noutput_path = \"from-file\""
            )
            .unwrap();

            let config = CliConfig::parse_from([
                "ibutton-mzone",
                "--verbose",
                "batch",
                "--input",
                "codes.txt",
                "--config",
                file.path().to_str().unwrap(),
                "--format",
                "tsv",
            ]);
            assert!(config.verbose);

            let Command::Batch(args) = config.command else {
                panic!("expected batch command");
            };
            let settings = args.resolve().unwrap();

            assert_eq!(settings.input_path, "codes.txt");
            assert_eq!(settings.export.format, ExportFormat::Tsv);
            assert_eq!(settings.export.placeholder, "BAD");
            assert_eq!(settings.export.output_path, "from-file");
            assert!(!settings.reads_stdin());
        }

        #[test]
        fn test_batch_defaults() {
            let config = CliConfig::parse_from(["ibutton-mzone", "batch"]);
            let Command::Batch(args) = config.command else {
                panic!("expected batch command");
            };
            let settings = args.resolve().unwrap();

            assert!(settings.reads_stdin());
            assert_eq!(settings.export.format, ExportFormat::Xlsx);
            assert_eq!(settings.export.output_file(), "./conversao_ibutton.xlsx");
        }

        #[test]
        fn test_batch_rejects_invalid_sheet_name() {
            let config =
                CliConfig::parse_from(["ibutton-mzone", "batch", "--sheet-name", "a[1]"]);
            let Command::Batch(args) = config.command else {
                panic!("expected batch command");
            };
            assert!(args.resolve().is_err());
        }
    }
}
