//! Error and warning types for beltcat.
//!
//! Provides [`CatalogError`] for fatal conditions that stop a profile's parse,
//! [`ParseWarning`] for data-quality issues that allow best-effort continuation,
//! and [`ParseResult`] for pairing a value with collected warnings.

use std::fmt;

use thiserror::Error;

use crate::rows::AlignmentReport;

/// Fatal error types for table reconstruction and dataset handling.
///
/// The two extraction failures ([`TableNotFound`](CatalogError::TableNotFound)
/// and [`HeaderNotTerminated`](CatalogError::HeaderNotTerminated)) carry the
/// profile and marker details needed to diagnose a catalog layout change.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// No start/end sentinel pair was found in the document text.
    #[error(
        "table not found for profile '{profile}': no '{start_marker}' ... '{end_marker}' pair in document"
    )]
    TableNotFound {
        /// Profile whose table was requested.
        profile: String,
        /// Start-of-table sentinel that was searched for.
        start_marker: String,
        /// End-of-table sentinel that was searched for.
        end_marker: String,
    },

    /// The header consumed the whole token stream without a speed boundary.
    #[error(
        "header not terminated for profile '{profile}': no integer token >= {min_speed} after {consumed} header tokens"
    )]
    HeaderNotTerminated {
        /// Profile being parsed.
        profile: String,
        /// Configured minimum plausible rotational speed.
        min_speed: u32,
        /// Number of tokens swallowed by the header.
        consumed: usize,
    },

    /// The very first token after the start sentinel already satisfied the
    /// speed boundary, leaving no diameters.
    #[error("empty axis header for profile '{profile}': first token '{token}' is already a speed")]
    EmptyHeader {
        /// Profile being parsed.
        profile: String,
        /// The boundary token that ended the (empty) header.
        token: String,
    },

    /// The data stream does not divide into whole rows, or a row was cut
    /// across a row boundary, and the profile asked to abort.
    #[error("misaligned data for profile '{profile}': {report}")]
    Misaligned {
        /// Profile being parsed.
        profile: String,
        /// Token accounting for the failed reconstruction.
        report: AlignmentReport,
    },

    /// A profile configuration is unusable.
    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    /// A profile id was requested that is not configured.
    #[error("unknown profile: {0}")]
    UnknownProfile(String),

    /// I/O error reading a document or dataset.
    #[error("I/O error: {0}")]
    Io(String),

    /// A dataset file could not be parsed.
    #[error("dataset error on line {line}: {message}")]
    Dataset {
        /// 1-based line number in the dataset text.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },
}

impl CatalogError {
    /// Returns true for the two fatal extraction conditions.
    pub fn is_extraction_failure(&self) -> bool {
        matches!(
            self,
            CatalogError::TableNotFound { .. }
                | CatalogError::HeaderNotTerminated { .. }
                | CatalogError::EmptyHeader { .. }
        )
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io(err.to_string())
    }
}

/// Machine-readable code for a non-fatal parse issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParseWarningCode {
    /// Data stream length is not a multiple of the row width.
    Misaligned,
    /// Trailing tokens shorter than a row were discarded.
    TrailingRemainder,
    /// A `(diameter, speed)` pair appeared more than once.
    DuplicateRecord,
    /// An extracted block produced no numeric tokens.
    EmptyBlock,
    /// A row could not be trusted and was skipped.
    DroppedRow,
    /// The axis header repeats a diameter value.
    DuplicateDiameter,
    /// An independent block failed to parse and was skipped.
    SkippedBlock,
}

impl ParseWarningCode {
    /// Returns the string tag for this warning code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseWarningCode::Misaligned => "MISALIGNED",
            ParseWarningCode::TrailingRemainder => "TRAILING_REMAINDER",
            ParseWarningCode::DuplicateRecord => "DUPLICATE_RECORD",
            ParseWarningCode::EmptyBlock => "EMPTY_BLOCK",
            ParseWarningCode::DroppedRow => "DROPPED_ROW",
            ParseWarningCode::DuplicateDiameter => "DUPLICATE_DIAMETER",
            ParseWarningCode::SkippedBlock => "SKIPPED_BLOCK",
        }
    }
}

impl fmt::Display for ParseWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal issue encountered while reconstructing a table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParseWarning {
    /// Machine-readable warning code.
    pub code: ParseWarningCode,
    /// Human-readable description of the warning.
    pub description: String,
    /// Index of the extracted block the warning refers to, if any.
    pub block: Option<usize>,
}

impl ParseWarning {
    /// Create a warning that is not tied to a particular block.
    pub fn new(code: ParseWarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            block: None,
        }
    }

    /// Create a warning attached to one extracted block.
    pub fn in_block(code: ParseWarningCode, description: impl Into<String>, block: usize) -> Self {
        Self {
            code,
            description: description.into(),
            block: Some(block),
        }
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(block) = self.block {
            write!(f, " (block {block})")?;
        }
        Ok(())
    }
}

/// Result wrapper that pairs a value with collected warnings.
#[derive(Debug, Clone)]
pub struct ParseResult<T> {
    /// The reconstructed value.
    pub value: T,
    /// Warnings collected along the way.
    pub warnings: Vec<ParseWarning>,
}

impl<T> ParseResult<T> {
    /// Create a result with no warnings.
    pub fn ok(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Create a result with warnings.
    pub fn with_warnings(value: T, warnings: Vec<ParseWarning>) -> Self {
        Self { value, warnings }
    }

    /// Returns true if there are no warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Returns true if any warning carries the given code.
    pub fn has_warning(&self, code: ParseWarningCode) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }

    /// Transform the value while preserving warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParseResult<U> {
        ParseResult {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}
