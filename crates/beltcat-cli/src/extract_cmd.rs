use std::path::Path;

use beltcat::{ParsedTable, write_dataset};

use crate::cli::{ProfileArgs, TableFormat};
use crate::shared::{fail, parse_catalog};

pub fn run(
    file: &Path,
    profile: &ProfileArgs,
    format: &TableFormat,
    output: Option<&Path>,
) -> Result<(), i32> {
    let parsed = parse_catalog(file, profile)?;

    if let (TableFormat::Csv, Some(path)) = (format, output) {
        return write_dataset(path, &parsed.table).map_err(fail);
    }

    let rendered = match format {
        TableFormat::Csv => parsed.table.to_csv().map_err(fail)?,
        TableFormat::Json => render_json(&profile.profile, &parsed)?,
        TableFormat::Text => render_text(&parsed),
    };

    match output {
        Some(path) => std::fs::write(path, rendered)
            .map_err(|e| fail(format!("failed to write {}: {e}", path.display()))),
        None => {
            print!("{rendered}");
            Ok(())
        }
    }
}

fn render_text(parsed: &ParsedTable) -> String {
    let mut out = String::from("diameter\tspeed\tpower\n");
    for r in parsed.table.records() {
        out.push_str(&format!("{}\t{}\t{}\n", r.diameter, r.speed, r.power));
    }
    out
}

fn render_json(profile: &str, parsed: &ParsedTable) -> Result<String, i32> {
    let headers: Vec<&[f64]> = parsed.headers.iter().map(|h| h.values()).collect();
    let value = serde_json::json!({
        "profile": profile,
        "blocks": parsed.blocks,
        "rows": parsed.rows(),
        "headers": headers,
        "alignment": parsed.reports,
        "records": parsed.table.records(),
    });
    serde_json::to_string_pretty(&value)
        .map(|s| s + "\n")
        .map_err(fail)
}
