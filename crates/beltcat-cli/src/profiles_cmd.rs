use std::path::Path;

use beltcat::ProfileSet;

use crate::cli::ReportFormat;
use crate::shared::{fail, load_profiles};

pub fn run(profiles: Option<&Path>, format: &ReportFormat) -> Result<(), i32> {
    let set = load_profiles(profiles)?;
    match format {
        ReportFormat::Text => print!("{}", render_text(&set)),
        ReportFormat::Json => println!("{}", set.to_json().map_err(fail)?),
    }
    Ok(())
}

fn render_text(set: &ProfileSet) -> String {
    let mut out = String::from("id\tstart\tend\tmin_speed\tpages\n");
    for p in set.profiles() {
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\n",
            p.id,
            p.start_marker,
            p.end_marker,
            p.min_speed,
            p.pages.as_deref().unwrap_or("all"),
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_listing() {
        let text = render_text(&ProfileSet::builtin());
        assert_eq!(
            text,
            "id\tstart\tend\tmin_speed\tpages\nC\tProfile C\tProfile D\t500\t24\n"
        );
    }
}
