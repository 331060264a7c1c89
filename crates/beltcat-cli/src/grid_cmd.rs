use beltcat::{InterpolationGrid, Interpolator, PowerTable, StrategyChoice};

use crate::cli::{InputArgs, ReportFormat};
use crate::shared::{fail, load_table};

/// Longest list of absent pairs printed in text output.
const MAX_LISTED_MISSING: usize = 20;

pub fn run(input: &InputArgs, format: &ReportFormat) -> Result<(), i32> {
    let table = load_table(input)?;
    let grid = InterpolationGrid::from_table(&table);
    let strategy = Interpolator::new(&table, StrategyChoice::Auto).kind();

    match format {
        ReportFormat::Text => print!("{}", render_text(&table, &grid, strategy)),
        ReportFormat::Json => {
            let missing: Vec<[f64; 2]> = grid
                .missing_pairs(&table)
                .into_iter()
                .map(|(d, n)| [d, n])
                .collect();
            let value = serde_json::json!({
                "records": table.len(),
                "distinct_pairs": table.distinct_pairs(),
                "diameters": grid.diameters(),
                "speeds": grid.speeds(),
                "complete": grid.is_complete(),
                "strategy": strategy,
                "missing": missing,
            });
            let json = serde_json::to_string_pretty(&value).map_err(fail)?;
            println!("{json}");
        }
    }
    Ok(())
}

fn join(values: &[f64]) -> String {
    values
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_text(table: &PowerTable, grid: &InterpolationGrid, strategy: &str) -> String {
    let mut out = format!(
        "records\t{}\ndiameters\t{}\nspeeds\t{}\ncomplete\t{}\nstrategy\t{strategy}\n",
        table.len(),
        join(grid.diameters()),
        join(grid.speeds()),
        grid.is_complete(),
    );
    let missing = grid.missing_pairs(table);
    if !missing.is_empty() {
        out.push_str(&format!("missing\t{}\n", missing.len()));
        for (d, n) in missing.iter().take(MAX_LISTED_MISSING) {
            out.push_str(&format!("\t{d}\t{n}\n"));
        }
        if missing.len() > MAX_LISTED_MISSING {
            out.push_str(&format!("\t... {} more\n", missing.len() - MAX_LISTED_MISSING));
        }
    }
    out
}
