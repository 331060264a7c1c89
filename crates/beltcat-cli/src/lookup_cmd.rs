use beltcat::{Lookup, LookupOptions, lookup_with};

use crate::cli::{InputArgs, MissingCornersArg, ReportFormat, StrategyArg};
use crate::shared::{fail, load_table};

pub fn run(
    input: &InputArgs,
    diameter: f64,
    speed: f64,
    strategy: &StrategyArg,
    missing_corners: &MissingCornersArg,
    format: &ReportFormat,
) -> Result<(), i32> {
    let table = load_table(input)?;
    let options = LookupOptions::default()
        .with_strategy(strategy.into())
        .with_missing_corners(missing_corners.into());
    let hit = lookup_with(&table, diameter, speed, options);

    if hit.is_no_data() {
        eprintln!("warning: no data for diameter {diameter}, speed {speed}");
    } else if hit.missing_corners > 0 {
        eprintln!(
            "warning: {} grid corner(s) absent around diameter {diameter}, speed {speed}",
            hit.missing_corners
        );
    }

    match format {
        ReportFormat::Text => print!("{}", render_text(diameter, speed, &hit)),
        ReportFormat::Json => {
            let value = serde_json::json!({
                "diameter": diameter,
                "speed": speed,
                "power": hit.power,
                "value": hit.value(),
                "flagged": hit.is_flagged(),
                "lookup": hit,
            });
            let json = serde_json::to_string_pretty(&value).map_err(fail)?;
            println!("{json}");
        }
    }
    Ok(())
}

fn render_text(diameter: f64, speed: f64, hit: &Lookup) -> String {
    let mut out = format!(
        "diameter\t{diameter}\nspeed\t{speed}\npower\t{}\nresolution\t{}\n",
        hit.power, hit.resolution
    );
    if hit.clamped_diameter || hit.clamped_speed {
        out.push_str(&format!(
            "clamped\tdiameter={} speed={}\n",
            hit.clamped_diameter, hit.clamped_speed
        ));
    }
    if let Some(c) = &hit.corners {
        out.push_str(&format!(
            "diameters\t{} {}\nspeeds\t{} {}\n",
            c.diameter.low, c.diameter.high, c.speed.low, c.speed.high
        ));
    }
    if hit.missing_corners > 0 {
        out.push_str(&format!("missing_corners\t{}\n", hit.missing_corners));
    }
    out
}
