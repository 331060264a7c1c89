//! Sentinel-delimited block extraction.
//!
//! A catalog table is located by two sentinel phrases: one that precedes it
//! and one that follows it. A document may hold several instances (one per
//! page for a table continued across pages); every matched pair yields one
//! [`RawTextBlock`].

use regex::Regex;
use tracing::debug;

use crate::error::CatalogError;
use crate::profile::Profile;

/// Text strictly between one start sentinel and the next end sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTextBlock<'a> {
    /// 0-based position of this block among the document's blocks.
    pub index: usize,
    /// The enclosed text.
    pub text: &'a str,
}

/// Compiled sentinel pair.
///
/// Whitespace inside a sentinel phrase matches any run of whitespace, so a
/// phrase broken across lines by text extraction is still found.
#[derive(Debug, Clone)]
pub struct Sentinels {
    start: Regex,
    end: Regex,
}

impl Sentinels {
    /// Compile a sentinel pair.
    pub fn new(start_marker: &str, end_marker: &str) -> Result<Self, CatalogError> {
        Ok(Self {
            start: compile_marker(start_marker)?,
            end: compile_marker(end_marker)?,
        })
    }

    /// Find every start/end pair in `text`, in document order.
    ///
    /// Each end sentinel closes the nearest start sentinel before it; a start
    /// with no end after it is ignored.
    pub fn blocks<'a>(&self, text: &'a str) -> Vec<RawTextBlock<'a>> {
        let mut blocks = Vec::new();
        let mut pos = 0;
        while let Some(mut start) = self.start.find_at(text, pos) {
            let Some(end) = self.end.find_at(text, start.end()) else {
                break;
            };
            while let Some(next) = self.start.find_at(text, start.end()) {
                if next.start() >= end.start() {
                    break;
                }
                start = next;
            }
            blocks.push(RawTextBlock {
                index: blocks.len(),
                text: &text[start.end()..end.start()],
            });
            pos = end.end();
        }
        blocks
    }
}

fn compile_marker(marker: &str) -> Result<Regex, CatalogError> {
    let words: Vec<String> = marker.split_whitespace().map(regex::escape).collect();
    if words.is_empty() {
        return Err(CatalogError::InvalidProfile(
            "sentinel marker must contain a non-whitespace character".to_string(),
        ));
    }
    Regex::new(&words.join(r"\s+"))
        .map_err(|e| CatalogError::InvalidProfile(format!("sentinel marker '{marker}': {e}")))
}

/// Extract the table blocks for `profile` from the full document text.
///
/// Returns [`CatalogError::TableNotFound`] when no sentinel pair exists.
pub fn extract_blocks<'a>(
    text: &'a str,
    profile: &Profile,
) -> Result<Vec<RawTextBlock<'a>>, CatalogError> {
    let sentinels = Sentinels::new(&profile.start_marker, &profile.end_marker)?;
    let blocks = sentinels.blocks(text);
    if blocks.is_empty() {
        return Err(CatalogError::TableNotFound {
            profile: profile.id.clone(),
            start_marker: profile.start_marker.clone(),
            end_marker: profile.end_marker.clone(),
        });
    }
    debug!(profile = %profile.id, blocks = blocks.len(), "extracted table blocks");
    Ok(blocks)
}
