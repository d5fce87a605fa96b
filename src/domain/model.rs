use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Width of an iButton code in hex characters (family, serial, check).
pub const CODE_LENGTH: usize = 16;

/// Marker written in place of the MZone value for rows that failed to convert.
pub const INVALID_PLACEHOLDER: &str = "INVÁLIDO";

/// A trimmed, upper-cased iButton code of exactly 16 hex characters.
///
/// Only [`crate::core::codec::validate`] produces values of this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NormalizedCode(String);

impl NormalizedCode {
    pub(crate) fn from_validated(code: String) -> Self {
        debug_assert_eq!(code.len(), CODE_LENGTH);
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Family (device type) byte.
    pub fn family(&self) -> &str {
        &self.0[..2]
    }

    /// The 6-byte serial number the MZone code is derived from.
    pub fn serial(&self) -> &str {
        &self.0[2..14]
    }

    /// Trailing check byte.
    pub fn check(&self) -> &str {
        &self.0[14..]
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Decimal identifier used by the MZone platform. Serials are 48 bits wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MZoneCode(u64);

impl MZoneCode {
    pub const MAX: u64 = 0xFFFF_FFFF_FFFF;

    pub fn value(self) -> u64 {
        self.0
    }
}

impl From<MZoneCode> for u64 {
    fn from(code: MZoneCode) -> Self {
        code.0
    }
}

impl TryFrom<u64> for MZoneCode {
    type Error = u64;

    fn try_from(value: u64) -> std::result::Result<Self, Self::Error> {
        if value > Self::MAX {
            Err(value)
        } else {
            Ok(Self(value))
        }
    }
}

impl fmt::Display for MZoneCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a raw code was rejected. Checked in declaration order; the first hit wins.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("input is empty")]
    EmptyInput,

    #[error("expected {} characters, got {length}", CODE_LENGTH)]
    WrongLength { length: usize },

    #[error("invalid character '{character}' at position {position}")]
    InvalidCharacter { character: char, position: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("invalid iButton code: {0}")]
    InvalidFormat(#[from] ValidationError),

    #[error("serial field '{field}' is not a base-16 number")]
    Parse { field: String },
}

/// Flat error kind for callers that render one message per failure type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    EmptyInput,
    WrongLength,
    InvalidCharacter,
    ParseError,
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::EmptyInput => ErrorKind::EmptyInput,
            ValidationError::WrongLength { .. } => ErrorKind::WrongLength,
            ValidationError::InvalidCharacter { .. } => ErrorKind::InvalidCharacter,
        }
    }
}

impl ConversionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConversionError::InvalidFormat(reason) => reason.kind(),
            ConversionError::Parse { .. } => ErrorKind::ParseError,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::EmptyInput => "Please enter an iButton code.",
            ErrorKind::WrongLength => "An iButton code must have exactly 16 hexadecimal digits.",
            ErrorKind::InvalidCharacter => "An iButton code may only contain 0-9 and A-F.",
            ErrorKind::ParseError => "The iButton serial could not be read as a hexadecimal number.",
        }
    }
}

/// The three fragments of the single-entry form: family byte, serial, check byte.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IButtonParts {
    pub family: String,
    pub serial: String,
    pub check: String,
}

impl IButtonParts {
    pub fn new(
        family: impl Into<String>,
        serial: impl Into<String>,
        check: impl Into<String>,
    ) -> Self {
        Self {
            family: family.into(),
            serial: serial.into(),
            check: check.into(),
        }
    }

    /// Concatenates the fragments as typed; validation happens on conversion.
    pub fn assemble(&self) -> String {
        let mut code =
            String::with_capacity(self.family.len() + self.serial.len() + self.check.len());
        code.push_str(&self.family);
        code.push_str(&self.serial);
        code.push_str(&self.check);
        code
    }

    pub fn is_empty(&self) -> bool {
        self.assemble().trim().is_empty()
    }
}

/// One non-empty input line of a batch, with its conversion outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRow {
    /// 1-based line number in the submitted text.
    pub line: usize,
    pub original: String,
    pub normalized: String,
    pub outcome: std::result::Result<MZoneCode, ConversionError>,
}

impl BatchRow {
    pub fn is_valid(&self) -> bool {
        self.outcome.is_ok()
    }

    /// MZone value, or `placeholder` when the row did not convert.
    pub fn display_value(&self, placeholder: &str) -> String {
        match &self.outcome {
            Ok(code) => code.to_string(),
            Err(_) => placeholder.to_string(),
        }
    }

    pub fn summary(&self) -> RowSummary {
        let (result, error) = match &self.outcome {
            Ok(code) => (Some(code.to_string()), None),
            Err(e) => (None, Some(e.kind())),
        };
        RowSummary {
            line: self.line,
            original: self.original.clone(),
            normalized: self.normalized.clone(),
            mzone: result,
            error,
            reason: self.outcome.as_ref().err().map(|e| e.to_string()),
            valid: self.is_valid(),
        }
    }
}

/// Serializable view of a [`BatchRow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSummary {
    pub line: usize,
    pub original: String,
    pub normalized: String,
    pub mzone: Option<String>,
    pub error: Option<ErrorKind>,
    pub reason: Option<String>,
    pub valid: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    rows: Vec<BatchRow>,
}

impl BatchReport {
    pub fn new(rows: Vec<BatchRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[BatchRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn valid_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_valid()).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.len() - self.valid_count()
    }

    /// One-line outcome, e.g. `2 valid conversions, 1 invalid`.
    pub fn summary_line(&self) -> String {
        format!(
            "{} valid conversions, {} invalid",
            self.valid_count(),
            self.invalid_count()
        )
    }

    pub fn summaries(&self) -> Vec<RowSummary> {
        self.rows.iter().map(BatchRow::summary).collect()
    }
}

impl IntoIterator for BatchReport {
    type Item = BatchRow;
    type IntoIter = std::vec::IntoIter<BatchRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// Tabular container for batch exports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ExportFormat {
    Csv,
    Tsv,
    #[default]
    Xlsx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
