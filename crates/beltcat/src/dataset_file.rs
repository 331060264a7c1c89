//! Reading and writing dataset files.

use std::path::Path;

use beltcat_core::{CSV_HEADER, ParseResult, PowerTable};
use tracing::debug;

use crate::error::SourceError;

/// Layout of a dataset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    /// `diameter,speed,power`, one record per line.
    Long,
    /// A grid: diameters across the first row, one speed per later row.
    Wide,
}

impl DatasetFormat {
    /// Detect the layout from the first non-blank line.
    ///
    /// Only the exact long-format header (case-insensitive) selects
    /// [`DatasetFormat::Long`].
    pub fn detect(text: &str) -> Self {
        let header = text
            .lines()
            .map(|l| l.trim().trim_start_matches('\u{feff}'))
            .find(|l| !l.is_empty());
        match header {
            Some(h) if h.replace(' ', "").eq_ignore_ascii_case(CSV_HEADER) => DatasetFormat::Long,
            _ => DatasetFormat::Wide,
        }
    }
}

/// Parse dataset text in either layout.
pub fn parse_dataset(text: &str) -> Result<ParseResult<PowerTable>, SourceError> {
    let parsed = match DatasetFormat::detect(text) {
        DatasetFormat::Long => ParseResult::ok(PowerTable::from_csv(text)?),
        DatasetFormat::Wide => PowerTable::from_wide_csv(text)?,
    };
    Ok(parsed)
}

/// Read a dataset file in either layout.
pub fn read_dataset(path: impl AsRef<Path>) -> Result<ParseResult<PowerTable>, SourceError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let parsed = parse_dataset(&text)?;
    debug!(
        path = %path.display(),
        records = parsed.value.len(),
        warnings = parsed.warnings.len(),
        "read dataset"
    );
    Ok(parsed)
}

/// Write `table` in long format.
pub fn write_dataset(path: impl AsRef<Path>, table: &PowerTable) -> Result<(), SourceError> {
    let file = std::fs::File::create(path.as_ref())?;
    table.write_csv(std::io::BufWriter::new(file))?;
    Ok(())
}
