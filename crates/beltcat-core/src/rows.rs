//! Row reconstruction from the flat data stream.
//!
//! [`RowStrategy::Chunked`] cuts the stream into consecutive slices of
//! `row_width = D + 1` tokens. It is positional: one missing cell shifts every
//! later row. [`AlignmentReport`] makes that visible, and
//! [`RowStrategy::LineAware`] is the stricter alternative that never lets a
//! row cross a source line.

use std::fmt;

use tracing::{debug, warn};

use crate::classify::{AxisHeader, ClassifiedTable};
use crate::error::{CatalogError, ParseResult, ParseWarning, ParseWarningCode};
use crate::profile::{AlignmentPolicy, Profile, RowStrategy};
use crate::token::Token;

/// One reconstructed table row.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataRow {
    /// Rotational speed (first token of the row).
    pub speed: f64,
    /// One value per header diameter, positionally aligned.
    pub values: Vec<f64>,
    /// Block the row's speed token came from.
    pub block: usize,
    /// Line the row's speed token came from.
    pub line: usize,
}

/// Token accounting for one reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlignmentReport {
    /// Number of header diameters (`D`).
    pub header_len: usize,
    /// Number of tokens in the data stream.
    pub data_len: usize,
    /// Tokens per row (`D + 1`).
    pub row_width: usize,
    /// Number of complete rows kept.
    pub rows: usize,
    /// Trailing tokens that do not fill a row.
    pub remainder: usize,
    /// First chunk cut across a row boundary. Chunking stops there.
    pub shifted_row: Option<usize>,
}

impl AlignmentReport {
    /// Compute the accounting for a header of `header_len` diameters and a
    /// data stream of `data_len` tokens.
    pub fn new(header_len: usize, data_len: usize) -> Self {
        let row_width = header_len + 1;
        Self {
            header_len,
            data_len,
            row_width,
            rows: data_len / row_width,
            remainder: data_len % row_width,
            shifted_row: None,
        }
    }

    /// Returns true if the data stream divides exactly into rows that all
    /// start with a speed.
    pub fn is_aligned(&self) -> bool {
        self.remainder == 0 && self.shifted_row.is_none()
    }
}

impl fmt::Display for AlignmentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} data tokens over rows of {} ({} diameters + speed): {} complete rows, {} left over",
            self.data_len, self.row_width, self.header_len, self.rows, self.remainder
        )?;
        if let Some(row) = self.shifted_row {
            write!(f, ", rows from {row} on are shifted")?;
        }
        Ok(())
    }
}

/// Reconstructed rows with their accounting.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSet {
    /// Complete rows in document order.
    pub rows: Vec<DataRow>,
    /// Accounting for the chunked view of the data stream.
    pub report: AlignmentReport,
}

/// Reconstruct rows using the profile's [`RowStrategy`].
pub fn reconstruct(
    table: &ClassifiedTable,
    profile: &Profile,
) -> Result<ParseResult<RowSet>, CatalogError> {
    match profile.rows {
        RowStrategy::Chunked => reconstruct_chunked(&table.header, &table.data, profile),
        RowStrategy::LineAware => Ok(reconstruct_line_aware(
            &table.header,
            &table.data,
            profile,
        )),
    }
}

/// Cut the data stream into fixed-width rows.
///
/// A trailing partial row is discarded with a warning under
/// [`AlignmentPolicy::Discard`] and fails the parse with
/// [`CatalogError::Misaligned`] under [`AlignmentPolicy::Abort`].
///
/// A chunk that does not start with a speed, or that holds the next row's
/// speed in a cell, means a cell is missing and every later chunk is
/// shifted. Chunking stops at that chunk and the rest are dropped, or the
/// parse fails under [`AlignmentPolicy::Abort`].
pub fn reconstruct_chunked(
    header: &AxisHeader,
    data: &[Token],
    profile: &Profile,
) -> Result<ParseResult<RowSet>, CatalogError> {
    let mut report = AlignmentReport::new(header.len(), data.len());
    let mut warnings = Vec::new();

    if !report.is_aligned() {
        if profile.alignment == AlignmentPolicy::Abort {
            return Err(CatalogError::Misaligned {
                profile: profile.id.clone(),
                report,
            });
        }
        warn!(profile = %profile.id, %report, "data stream misaligned");
        warnings.push(ParseWarning::new(
            ParseWarningCode::Misaligned,
            report.to_string(),
        ));
        let tail = &data[data.len() - report.remainder..];
        let tail_text: Vec<&str> = tail.iter().map(|t| t.text.as_str()).collect();
        warnings.push(ParseWarning::in_block(
            ParseWarningCode::TrailingRemainder,
            format!(
                "discarded {} trailing tokens: {}",
                tail.len(),
                tail_text.join(" ")
            ),
            tail[0].block,
        ));
    }

    let mut rows = Vec::with_capacity(report.rows);
    for (i, chunk) in data.chunks_exact(report.row_width).enumerate() {
        if let Some(cause) = shift_cause(chunk, profile.min_speed) {
            let dropped = report.rows - i;
            report.rows = i;
            report.shifted_row = Some(i);
            if profile.alignment == AlignmentPolicy::Abort {
                return Err(CatalogError::Misaligned {
                    profile: profile.id.clone(),
                    report,
                });
            }
            warn!(profile = %profile.id, row = i, dropped, "shifted row, chunking stopped");
            warnings.push(ParseWarning::in_block(
                ParseWarningCode::Misaligned,
                format!("row {i} (line {}): {cause}", chunk[0].line),
                chunk[0].block,
            ));
            warnings.push(ParseWarning::in_block(
                ParseWarningCode::DroppedRow,
                format!("dropped {dropped} shifted rows from row {i} on"),
                chunk[0].block,
            ));
            break;
        }
        match build_row(chunk, profile.min_speed) {
            Some(row) => rows.push(row),
            None => warnings.push(ParseWarning::in_block(
                ParseWarningCode::DroppedRow,
                format!("row {i} has an unreadable cell"),
                chunk[0].block,
            )),
        }
    }

    debug!(profile = %profile.id, rows = rows.len(), "reconstructed rows (chunked)");
    Ok(ParseResult::with_warnings(RowSet { rows, report }, warnings))
}

/// Build rows from source lines.
///
/// A line becomes a row only if it starts with a speed and holds exactly
/// `row_width` tokens. Any other line is dropped with a
/// [`ParseWarningCode::DroppedRow`] warning and never shifts its neighbours.
pub fn reconstruct_line_aware(
    header: &AxisHeader,
    data: &[Token],
    profile: &Profile,
) -> ParseResult<RowSet> {
    let report = AlignmentReport::new(header.len(), data.len());
    let width = report.row_width;
    let mut rows = Vec::new();
    let mut warnings = Vec::new();

    for line in data.chunk_by(|a, b| a.block == b.block && a.line == b.line) {
        let first = &line[0];
        let row = if line.len() == width && first.is_speed(profile.min_speed) {
            build_row(line, profile.min_speed)
        } else {
            None
        };
        match row {
            Some(row) => rows.push(row),
            None => {
                warn!(
                    profile = %profile.id,
                    block = first.block,
                    line = first.line,
                    tokens = line.len(),
                    "dropping ragged line"
                );
                warnings.push(ParseWarning::in_block(
                    ParseWarningCode::DroppedRow,
                    format!(
                        "line {} has {} tokens starting with '{}', expected {} starting with a speed",
                        first.line,
                        line.len(),
                        first,
                        width
                    ),
                    first.block,
                ));
            }
        }
    }

    debug!(profile = %profile.id, rows = rows.len(), "reconstructed rows (line-aware)");
    ParseResult::with_warnings(RowSet { rows, report }, warnings)
}

/// Why `chunk` cannot be a row, if it was cut across a row boundary.
///
/// Either its first token is not a speed, or one of its cells is a plain
/// integer speed that belongs to the next row.
fn shift_cause(chunk: &[Token], min_speed: u32) -> Option<String> {
    let (first, rest) = chunk.split_first()?;
    if !first.is_speed(min_speed) {
        return Some(format!("starts with '{first}', which is not a speed"));
    }
    rest.iter()
        .find(|t| t.text.bytes().all(|b| b.is_ascii_digit()) && t.is_speed(min_speed))
        .map(|t| format!("cell '{t}' is a speed"))
}

fn build_row(tokens: &[Token], min_speed: u32) -> Option<DataRow> {
    let (first, rest) = tokens.split_first()?;
    let speed = first.axis_value(min_speed)?;
    let values = rest
        .iter()
        .map(Token::as_decimal)
        .collect::<Option<Vec<f64>>>()?;
    Some(DataRow {
        speed,
        values,
        block: first.block,
        line: first.line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile::new("C", "Profile C", "Profile D", 500)
    }

    fn header(values: &[f64]) -> AxisHeader {
        AxisHeader::new(values.to_vec())
    }

    fn stream(texts: &[&str]) -> Vec<Token> {
        texts.iter().map(|t| Token::new(*t, 0, 0)).collect()
    }

    fn lines(lines: &[&[&str]]) -> Vec<Token> {
        lines
            .iter()
            .enumerate()
            .flat_map(|(i, l)| l.iter().map(move |t| Token::new(*t, i, 0)))
            .collect()
    }

    #[test]
    fn report_accounting() {
        let r = AlignmentReport::new(2, 7);
        assert_eq!(r.row_width, 3);
        assert_eq!(r.rows, 2);
        assert_eq!(r.remainder, 1);
        assert!(!r.is_aligned());
        assert!(AlignmentReport::new(2, 6).is_aligned());
    }

    #[test]
    fn report_display() {
        let r = AlignmentReport::new(2, 7);
        assert_eq!(
            r.to_string(),
            "7 data tokens over rows of 3 (2 diameters + speed): 2 complete rows, 1 left over"
        );
    }

    #[test]
    fn chunks_single_row() {
        let result =
            reconstruct_chunked(&header(&[180.0, 200.0]), &stream(&["710", "1.2", "1.5"]), &profile())
                .unwrap();
        assert!(result.is_clean());
        assert_eq!(result.value.rows.len(), 1);
        assert_eq!(result.value.rows[0].speed, 710.0);
        assert_eq!(result.value.rows[0].values, vec![1.2, 1.5]);
    }

    #[test]
    fn speed_with_separator_dot_is_integer() {
        let result = reconstruct_chunked(
            &header(&[180.0]),
            &stream(&["950", "1.000", "1.450", "1.250"]),
            &profile(),
        )
        .unwrap();
        let rows = &result.value.rows;
        assert_eq!(rows[0].speed, 950.0);
        assert_eq!(rows[0].values, vec![1.0]);
        assert_eq!(rows[1].speed, 1450.0);
        assert_eq!(rows[1].values, vec![1.25]);
    }

    #[test]
    fn trailing_remainder_discarded() {
        let result = reconstruct_chunked(
            &header(&[180.0, 200.0]),
            &stream(&["710", "1.2", "1.5", "950", "1.6"]),
            &profile(),
        )
        .unwrap();
        assert_eq!(result.value.rows.len(), 1);
        assert_eq!(result.value.report.remainder, 2);
        assert!(result.has_warning(ParseWarningCode::Misaligned));
        assert!(result.has_warning(ParseWarningCode::TrailingRemainder));
        let tail = result
            .warnings
            .iter()
            .find(|w| w.code == ParseWarningCode::TrailingRemainder)
            .unwrap();
        assert!(tail.description.contains("950 1.6"));
    }

    #[test]
    fn abort_policy_fails() {
        let p = profile().with_alignment(AlignmentPolicy::Abort);
        let err = reconstruct_chunked(&header(&[180.0]), &stream(&["710", "1.2", "950"]), &p)
            .unwrap_err();
        match err {
            CatalogError::Misaligned { profile, report } => {
                assert_eq!(profile, "C");
                assert_eq!(report.remainder, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn abort_policy_accepts_aligned_stream() {
        let p = profile().with_alignment(AlignmentPolicy::Abort);
        let result = reconstruct_chunked(&header(&[180.0]), &stream(&["710", "1.2"]), &p).unwrap();
        assert_eq!(result.value.rows.len(), 1);
    }

    #[test]
    fn shifted_rows_are_dropped() {
        // A missing cell pulls a measurement into the speed position.
        let result = reconstruct_chunked(
            &header(&[180.0, 200.0]),
            &stream(&["710", "1.2", "1.5", "950", "1.6", "1.9", "2.0", "2.4", "3.1"]),
            &profile(),
        )
        .unwrap();
        let speeds: Vec<f64> = result.value.rows.iter().map(|r| r.speed).collect();
        assert_eq!(speeds, vec![710.0, 950.0]);
        assert_eq!(result.value.report.rows, 2);
        assert_eq!(result.value.report.shifted_row, Some(2));
        assert!(!result.value.report.is_aligned());
        assert!(result.warnings.iter().any(|w| {
            w.code == ParseWarningCode::Misaligned && w.description.contains("'2.0'")
        }));
        assert!(result.has_warning(ParseWarningCode::DroppedRow));
    }

    #[test]
    fn abort_policy_rejects_shifted_rows() {
        let p = profile().with_alignment(AlignmentPolicy::Abort);
        let err = reconstruct_chunked(
            &header(&[180.0, 200.0]),
            &stream(&["710", "1.2", "950", "1.6", "1.9", "1200"]),
            &p,
        )
        .unwrap_err();
        match err {
            CatalogError::Misaligned { report, .. } => {
                assert_eq!(report.remainder, 0);
                assert_eq!(report.shifted_row, Some(0));
                assert_eq!(report.rows, 0);
                assert!(report.to_string().contains("rows from 0 on are shifted"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn line_aware_drops_ragged_line() {
        let data = lines(&[
            &["710", "1.2", "1.5"],
            &["950", "1.6"],
            &["1200", "2.0", "2.4"],
        ]);
        let result = reconstruct_line_aware(&header(&[180.0, 200.0]), &data, &profile());
        let speeds: Vec<f64> = result.value.rows.iter().map(|r| r.speed).collect();
        assert_eq!(speeds, vec![710.0, 1200.0]);
        assert_eq!(result.value.rows[1].values, vec![2.0, 2.4]);
        assert!(result.has_warning(ParseWarningCode::DroppedRow));
        assert_eq!(result.value.rows[1].line, 2);
    }

    #[test]
    fn line_aware_requires_leading_speed() {
        let data = lines(&[&["1.2", "1.5", "1.7"]]);
        let result = reconstruct_line_aware(&header(&[180.0, 200.0]), &data, &profile());
        assert!(result.value.rows.is_empty());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn line_aware_separates_blocks() {
        let data = vec![
            Token::new("710", 0, 0),
            Token::new("1.2", 0, 0),
            Token::new("1.5", 0, 1),
        ];
        let result = reconstruct_line_aware(&header(&[180.0]), &data, &profile());
        assert_eq!(result.value.rows.len(), 1);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].block, Some(1));
    }

    #[test]
    fn dispatch_by_strategy() {
        let table = ClassifiedTable {
            header: header(&[180.0]),
            data: lines(&[&["710", "1.2", "9.9"], &["950", "1.6"]]),
        };
        let chunked = reconstruct(&table, &profile()).unwrap();
        assert_eq!(chunked.value.rows.len(), 1);
        assert_eq!(chunked.value.report.shifted_row, Some(1));
        let strict = reconstruct(&table, &profile().with_rows(RowStrategy::LineAware)).unwrap();
        assert_eq!(strict.value.rows.len(), 1);
        assert_eq!(strict.value.rows[0].speed, 950.0);
    }
}
