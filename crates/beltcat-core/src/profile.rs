//! Per-profile table configuration.
//!
//! A [`Profile`] names one catalog table: the sentinel phrases that bracket it,
//! the minimum plausible rotational speed that ends the diameter header, the
//! page range to read, and the recovery policies for imperfect data. New
//! catalog layouts are added by configuration rather than code.

use crate::error::CatalogError;

/// What to do when the data stream does not divide into whole rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum AlignmentPolicy {
    /// Keep the complete rows and drop the trailing remainder (default).
    #[default]
    Discard,
    /// Fail the parse with [`CatalogError::Misaligned`].
    Abort,
}

/// How multiple extracted blocks of one profile are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum BlockMode {
    /// Blocks are one table split across pages: a single header, one data stream.
    #[default]
    Concatenate,
    /// Every block is a complete table with its own header.
    Independent,
}

/// How the flat data stream is cut into rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum RowStrategy {
    /// Fixed-width chunks of `header_len + 1` tokens (default).
    #[default]
    Chunked,
    /// One row per source line; lines of the wrong width are dropped.
    LineAware,
}

/// Which record wins when a `(diameter, speed)` pair appears more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum DuplicatePolicy {
    /// The record seen first in document order is kept (default).
    #[default]
    FirstSeen,
    /// The record seen last in document order is kept.
    LastSeen,
}

/// Footnote markers stripped from tokens before numeric parsing.
pub const DEFAULT_FOOTNOTE_MARKERS: &[char] = &[
    '*', '†', '‡', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹', '⁰',
];

/// Configuration for one catalog table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Profile {
    /// Profile identifier (belt section, e.g. `"C"`).
    pub id: String,
    /// Start-of-table sentinel phrase.
    pub start_marker: String,
    /// End-of-table sentinel phrase.
    pub end_marker: String,
    /// Minimum plausible rotational speed. The first integer token at or above
    /// this value ends the diameter header. Must exceed the largest diameter.
    pub min_speed: u32,
    /// Page range to read, 1-based (e.g. `"24"` or `"23-25"`). `None` reads all pages.
    ///
    /// Left out of a profile file, this is `None` rather than the built-in page.
    #[cfg_attr(feature = "serde", serde(default))]
    pub pages: Option<String>,
    /// Recovery policy for a misaligned data stream.
    pub alignment: AlignmentPolicy,
    /// How repeated blocks are combined.
    pub blocks: BlockMode,
    /// How the data stream is cut into rows.
    pub rows: RowStrategy,
    /// Precedence for duplicate `(diameter, speed)` pairs.
    pub duplicates: DuplicatePolicy,
    /// Characters removed from tokens before numeric parsing.
    pub footnote_markers: Vec<char>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            id: "C".to_string(),
            start_marker: "Profile C".to_string(),
            end_marker: "Profile D".to_string(),
            min_speed: 500,
            pages: Some("24".to_string()),
            alignment: AlignmentPolicy::default(),
            blocks: BlockMode::default(),
            rows: RowStrategy::default(),
            duplicates: DuplicatePolicy::default(),
            footnote_markers: DEFAULT_FOOTNOTE_MARKERS.to_vec(),
        }
    }
}

impl Profile {
    /// Create a profile with the given sentinels and speed threshold.
    ///
    /// All other settings take their defaults and no page range is set.
    pub fn new(
        id: impl Into<String>,
        start_marker: impl Into<String>,
        end_marker: impl Into<String>,
        min_speed: u32,
    ) -> Self {
        Self {
            id: id.into(),
            start_marker: start_marker.into(),
            end_marker: end_marker.into(),
            min_speed,
            pages: None,
            ..Self::default()
        }
    }

    /// Set the page range (builder pattern).
    pub fn with_pages(mut self, pages: impl Into<String>) -> Self {
        self.pages = Some(pages.into());
        self
    }

    /// Set the alignment policy (builder pattern).
    pub fn with_alignment(mut self, alignment: AlignmentPolicy) -> Self {
        self.alignment = alignment;
        self
    }

    /// Set the block mode (builder pattern).
    pub fn with_blocks(mut self, blocks: BlockMode) -> Self {
        self.blocks = blocks;
        self
    }

    /// Set the row strategy (builder pattern).
    pub fn with_rows(mut self, rows: RowStrategy) -> Self {
        self.rows = rows;
        self
    }

    /// Set the duplicate precedence (builder pattern).
    pub fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }

    /// Check that the profile can drive a parse.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.id.trim().is_empty() {
            return Err(CatalogError::InvalidProfile(
                "profile id must not be empty".to_string(),
            ));
        }
        if self.start_marker.is_empty() {
            return Err(CatalogError::InvalidProfile(format!(
                "profile '{}': start marker must not be empty",
                self.id
            )));
        }
        if self.end_marker.is_empty() {
            return Err(CatalogError::InvalidProfile(format!(
                "profile '{}': end marker must not be empty",
                self.id
            )));
        }
        if self.min_speed == 0 {
            return Err(CatalogError::InvalidProfile(format!(
                "profile '{}': min_speed must be positive",
                self.id
            )));
        }
        if self
            .footnote_markers
            .iter()
            .any(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        {
            return Err(CatalogError::InvalidProfile(format!(
                "profile '{}': footnote markers must not include digits or separators",
                self.id
            )));
        }
        Ok(())
    }

    /// Look up a built-in profile by id.
    pub fn builtin(id: &str) -> Option<Profile> {
        builtins().into_iter().find(|p| p.id == id)
    }
}

/// Profiles shipped with the crate.
///
/// Catalog-specific installations override these through a profile file.
pub fn builtins() -> Vec<Profile> {
    vec![Profile::default()]
}
