//! The long-format power table and its CSV forms.
//!
//! [`PowerTable`] is the only state that outlives a parse. It is read-only
//! once built; queries go through [`crate::interp`].
//!
//! Two text forms are understood:
//!
//! - long format, written and read: a `diameter,speed,power` header line
//!   followed by one record per line;
//! - wide format, read only: a grid whose first row is a label cell followed
//!   by diameters and whose later rows are a speed followed by one power value
//!   per diameter column. Cells may carry decimal commas, footnote asterisks
//!   and thousands-separator dots in the speed column.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};

use crate::error::{CatalogError, ParseResult, ParseWarning, ParseWarningCode};
use crate::long_format::LongRecord;
use crate::profile::DuplicatePolicy;

/// Column names of the long-format header line.
pub const CSV_HEADER: &str = "diameter,speed,power";

/// Hashable key for an exact `(diameter, speed)` pair.
pub(crate) fn pair_key(diameter: f64, speed: f64) -> (u64, u64) {
    // +0.0 and -0.0 compare equal and must share a key.
    let canon = |v: f64| if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() };
    (canon(diameter), canon(speed))
}

/// Long-format power table with an exact-pair index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PowerTable {
    records: Vec<LongRecord>,
    index: HashMap<(u64, u64), f64>,
}

impl PowerTable {
    /// Build a table from records as given.
    ///
    /// Duplicate pairs are kept in [`records`](Self::records); exact lookups
    /// see the first occurrence.
    pub fn new(records: Vec<LongRecord>) -> Self {
        let mut index = HashMap::with_capacity(records.len());
        for r in &records {
            index.entry(pair_key(r.diameter, r.speed)).or_insert(r.power);
        }
        Self { records, index }
    }

    /// Build a table keeping one record per `(diameter, speed)` pair.
    ///
    /// The surviving record follows `policy`; each discarded record is counted
    /// in a single [`ParseWarningCode::DuplicateRecord`] warning. Surviving
    /// records keep the position of the first occurrence of their pair.
    pub fn deduplicated(records: Vec<LongRecord>, policy: DuplicatePolicy) -> ParseResult<Self> {
        let mut slots: HashMap<(u64, u64), usize> = HashMap::with_capacity(records.len());
        let mut kept: Vec<LongRecord> = Vec::with_capacity(records.len());
        let mut conflicting = 0usize;
        let mut duplicates = 0usize;

        for record in records {
            match slots.entry(pair_key(record.diameter, record.speed)) {
                Entry::Vacant(slot) => {
                    slot.insert(kept.len());
                    kept.push(record);
                }
                Entry::Occupied(slot) => {
                    duplicates += 1;
                    let existing = &mut kept[*slot.get()];
                    if existing.power != record.power {
                        conflicting += 1;
                    }
                    if policy == DuplicatePolicy::LastSeen {
                        *existing = record;
                    }
                }
            }
        }

        let mut warnings = Vec::new();
        if duplicates > 0 {
            warn!(duplicates, conflicting, ?policy, "duplicate (diameter, speed) pairs");
            let winner = match policy {
                DuplicatePolicy::FirstSeen => "first",
                DuplicatePolicy::LastSeen => "last",
            };
            warnings.push(ParseWarning::new(
                ParseWarningCode::DuplicateRecord,
                format!(
                    "{duplicates} duplicate (diameter, speed) records dropped ({conflicting} with a different power), {winner} occurrence kept"
                ),
            ));
        }
        ParseResult::with_warnings(Self::new(kept), warnings)
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[LongRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Stored power for an exact `(diameter, speed)` pair.
    pub fn get(&self, diameter: f64, speed: f64) -> Option<f64> {
        self.index.get(&pair_key(diameter, speed)).copied()
    }

    /// Number of distinct `(diameter, speed)` pairs.
    pub fn distinct_pairs(&self) -> usize {
        self.index.len()
    }

    /// Write the table in long format, header line first.
    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> Result<(), CatalogError> {
        let mut out = csv::Writer::from_writer(writer);
        out.write_record(CSV_HEADER.split(',')).map_err(write_error)?;
        for r in &self.records {
            out.write_record([
                r.diameter.to_string(),
                r.speed.to_string(),
                r.power.to_string(),
            ])
            .map_err(write_error)?;
        }
        out.flush().map_err(|e| CatalogError::Io(e.to_string()))
    }

    /// Render the table in long format.
    pub fn to_csv(&self) -> Result<String, CatalogError> {
        let mut buf = Vec::with_capacity(CSV_HEADER.len() + 1 + self.records.len() * 16);
        self.write_csv(&mut buf)?;
        String::from_utf8(buf).map_err(|e| CatalogError::Io(e.to_string()))
    }

    /// Parse a long-format table.
    ///
    /// The first non-blank line must name the three columns. Blank lines are
    /// skipped; any other malformed line is a [`CatalogError::Dataset`] error.
    pub fn from_csv(text: &str) -> Result<Self, CatalogError> {
        let mut rows = csv_rows(text);

        let (line_no, header) = match rows.next() {
            Some(row) => row?,
            None => {
                return Err(CatalogError::Dataset {
                    line: 1,
                    message: "missing header line".to_string(),
                });
            }
        };
        let columns: Vec<String> = header
            .iter()
            .map(|c| c.trim_start_matches('\u{feff}').to_ascii_lowercase())
            .collect();
        if columns != ["diameter", "speed", "power"] {
            let found: Vec<&str> = header.iter().collect();
            return Err(CatalogError::Dataset {
                line: line_no,
                message: format!("expected header '{CSV_HEADER}', found '{}'", found.join(",")),
            });
        }

        let mut records = Vec::new();
        for row in rows {
            let (line_no, fields) = row?;
            if fields.len() != 3 {
                return Err(CatalogError::Dataset {
                    line: line_no,
                    message: format!("expected 3 fields, found {}", fields.len()),
                });
            }
            let mut values = [0.0f64; 3];
            for (slot, field) in values.iter_mut().zip(fields.iter()) {
                *slot = parse_finite(field).ok_or_else(|| CatalogError::Dataset {
                    line: line_no,
                    message: format!("'{field}' is not a finite number"),
                })?;
            }
            records.push(LongRecord::new(values[0], values[1], values[2]));
        }
        debug!(records = records.len(), "loaded long-format table");
        Ok(Self::new(records))
    }

    /// Convert a wide-format grid into a long-format table.
    ///
    /// Header cells that are not numbers leave their column unused. Rows whose
    /// first cell is not an integer speed are skipped with a
    /// [`ParseWarningCode::DroppedRow`] warning; empty or non-numeric power
    /// cells are skipped silently.
    pub fn from_wide_csv(text: &str) -> Result<ParseResult<Self>, CatalogError> {
        let mut rows = csv_rows(text);

        let (header_line, header) = match rows.next() {
            Some(row) => row?,
            None => {
                return Err(CatalogError::Dataset {
                    line: 1,
                    message: "missing diameter header row".to_string(),
                });
            }
        };
        let diameters: Vec<Option<f64>> = header
            .iter()
            .skip(1)
            .map(|cell| parse_finite(&cell.replace(',', ".")))
            .collect();
        if diameters.iter().all(Option::is_none) {
            return Err(CatalogError::Dataset {
                line: header_line,
                message: "header row has no numeric diameters".to_string(),
            });
        }

        let mut records = Vec::new();
        let mut warnings = Vec::new();
        for row in rows {
            let (line_no, cells) = row?;
            let speed_cell: String = cells
                .get(0)
                .map(|c| c.chars().filter(|ch| *ch != '.').collect())
                .unwrap_or_default();
            if speed_cell.is_empty() || !speed_cell.bytes().all(|b| b.is_ascii_digit()) {
                warnings.push(ParseWarning::new(
                    ParseWarningCode::DroppedRow,
                    format!("line {line_no}: first cell is not a speed"),
                ));
                continue;
            }
            let Some(speed) = parse_finite(&speed_cell) else {
                continue;
            };
            for (cell, diameter) in cells.iter().skip(1).zip(&diameters) {
                let Some(diameter) = diameter else {
                    continue;
                };
                let cleaned = cell.replace('*', "").replace(',', ".");
                if let Some(power) = parse_finite(&cleaned) {
                    records.push(LongRecord::new(*diameter, speed, power));
                }
            }
        }
        debug!(records = records.len(), "converted wide-format table");
        Ok(ParseResult::with_warnings(Self::new(records), warnings))
    }
}

/// Non-blank records of `text` with their 1-based line numbers.
///
/// Cells are trimmed and rows may differ in length; quoting follows RFC 4180.
fn csv_rows(text: &str) -> impl Iterator<Item = Result<(usize, StringRecord), CatalogError>> + '_ {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes())
        .into_records()
        .filter_map(|row| match row {
            Ok(record) if record.iter().all(str::is_empty) => None,
            Ok(record) => {
                let line = record.position().map_or(1, |p| p.line() as usize);
                Some(Ok((line, record)))
            }
            Err(e) => Some(Err(read_error(&e))),
        })
}

fn read_error(err: &csv::Error) -> CatalogError {
    CatalogError::Dataset {
        line: err.position().map_or(1, |p| p.line() as usize),
        message: err.to_string(),
    }
}

fn write_error(err: csv::Error) -> CatalogError {
    CatalogError::Io(err.to_string())
}

fn parse_finite(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}
