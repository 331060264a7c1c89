//! End-to-end table reconstruction: document text to [`PowerTable`].
//!
//! text → blocks → tokens → header/data → rows → long records → table

use tracing::{debug, info, warn};

use crate::block::{RawTextBlock, extract_blocks};
use crate::classify::{AxisHeader, Classifier, classify};
use crate::dataset::PowerTable;
use crate::error::{CatalogError, ParseResult, ParseWarning, ParseWarningCode};
use crate::long_format::{LongRecord, assemble};
use crate::profile::{BlockMode, Profile};
use crate::rows::{AlignmentReport, reconstruct};
use crate::token::{Token, tokenize};

/// A reconstructed table with its intermediate accounting.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTable {
    /// The long-format table.
    pub table: PowerTable,
    /// Diameter header of each parsed table instance (one in concatenate mode).
    pub headers: Vec<AxisHeader>,
    /// Row accounting of each parsed table instance.
    pub reports: Vec<AlignmentReport>,
    /// Number of sentinel blocks found in the document.
    pub blocks: usize,
}

impl ParsedTable {
    /// Total complete rows across all table instances.
    pub fn rows(&self) -> usize {
        self.reports.iter().map(|r| r.rows).sum()
    }
}

/// Reconstruct `profile`'s table from the full document text.
///
/// Fails with [`CatalogError::TableNotFound`] when the sentinel pair is
/// absent, [`CatalogError::HeaderNotTerminated`] when no speed token ends the
/// header, and [`CatalogError::Misaligned`] when the profile aborts on
/// misalignment. Everything else is a warning.
pub fn parse_table(
    text: &str,
    profile: &Profile,
) -> Result<ParseResult<ParsedTable>, CatalogError> {
    profile.validate()?;
    let blocks = extract_blocks(text, profile)?;
    let mut warnings = Vec::new();

    let tokenized: Vec<(RawTextBlock<'_>, Vec<Token>)> = blocks
        .iter()
        .map(|block| {
            let tokens = tokenize(block.text, block.index, &profile.footnote_markers);
            if tokens.is_empty() {
                warnings.push(ParseWarning::in_block(
                    ParseWarningCode::EmptyBlock,
                    "block contains no numeric tokens",
                    block.index,
                ));
            }
            (*block, tokens)
        })
        .collect();

    let parsed = match profile.blocks {
        BlockMode::Concatenate => parse_concatenated(tokenized, profile)?,
        BlockMode::Independent => parse_independent(tokenized, profile)?,
    };
    let (headers, reports, records) = parsed.value;
    warnings.extend(parsed.warnings);

    let dedup = PowerTable::deduplicated(records, profile.duplicates);
    warnings.extend(dedup.warnings);

    info!(
        profile = %profile.id,
        blocks = blocks.len(),
        records = dedup.value.len(),
        warnings = warnings.len(),
        "table reconstructed"
    );
    Ok(ParseResult::with_warnings(
        ParsedTable {
            table: dedup.value,
            headers,
            reports,
            blocks: blocks.len(),
        },
        warnings,
    ))
}

type Instances = (Vec<AxisHeader>, Vec<AlignmentReport>, Vec<LongRecord>);

/// All blocks form one table: one header, one continuous data stream.
fn parse_concatenated(
    blocks: Vec<(RawTextBlock<'_>, Vec<Token>)>,
    profile: &Profile,
) -> Result<ParseResult<Instances>, CatalogError> {
    let mut classifier = Classifier::new(profile);
    for (_, tokens) in blocks {
        classifier.observe_start();
        classifier.extend(tokens);
    }
    let classified = classifier.finish()?;
    let mut warnings = classified.warnings;
    let rows = reconstruct(&classified.value, profile)?;
    warnings.extend(rows.warnings);
    let records = assemble(&classified.value.header, &rows.value.rows);
    debug!(profile = %profile.id, records = records.len(), "assembled long records");
    Ok(ParseResult::with_warnings(
        (
            vec![classified.value.header],
            vec![rows.value.report],
            records,
        ),
        warnings,
    ))
}

/// Every block is a complete table. Failing blocks are skipped; the parse
/// fails only if none succeeds.
fn parse_independent(
    blocks: Vec<(RawTextBlock<'_>, Vec<Token>)>,
    profile: &Profile,
) -> Result<ParseResult<Instances>, CatalogError> {
    let mut headers = Vec::new();
    let mut reports = Vec::new();
    let mut records = Vec::new();
    let mut warnings = Vec::new();
    let mut first_error = None;

    for (block, tokens) in blocks {
        let classified = match classify(tokens, profile) {
            Ok(c) => c,
            Err(e) => {
                warn!(profile = %profile.id, block = block.index, error = %e, "skipping block");
                warnings.push(ParseWarning::in_block(
                    ParseWarningCode::SkippedBlock,
                    e.to_string(),
                    block.index,
                ));
                first_error.get_or_insert(e);
                continue;
            }
        };
        warnings.extend(classified.warnings);
        let rows = reconstruct(&classified.value, profile)?;
        warnings.extend(rows.warnings);
        records.extend(assemble(&classified.value.header, &rows.value.rows));
        headers.push(classified.value.header);
        reports.push(rows.value.report);
    }

    if headers.is_empty() {
        if let Some(e) = first_error {
            return Err(e);
        }
    }
    Ok(ParseResult::with_warnings(
        (headers, reports, records),
        warnings,
    ))
}
