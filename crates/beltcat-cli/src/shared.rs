use std::path::Path;

use beltcat::{
    Catalog, ParseWarning, ParsedTable, PowerTable, ProfileSet, open_source, read_dataset,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::{InputArgs, ProfileArgs};

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise warnings only, or debug with `--verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Print an error to stderr and return the failure exit code.
pub fn fail(err: impl std::fmt::Display) -> i32 {
    eprintln!("Error: {err}");
    1
}

/// Print parse warnings to stderr.
pub fn print_warnings(warnings: &[ParseWarning]) {
    for w in warnings {
        match w.block {
            Some(block) => eprintln!(
                "warning: [{}] block {block}: {}",
                w.code.as_str(),
                w.description
            ),
            None => eprintln!("warning: [{}] {}", w.code.as_str(), w.description),
        }
    }
}

/// Load the profile file if given, with built-in profiles filling gaps.
pub fn load_profiles(path: Option<&Path>) -> Result<ProfileSet, i32> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(fail(format!("profile file not found: {}", path.display())));
            }
            ProfileSet::load(path)
                .map(ProfileSet::with_builtins)
                .map_err(fail)
        }
        None => Ok(ProfileSet::builtin()),
    }
}

/// Open `file` as a catalog session for the selected profile.
///
/// `--pages` replaces the profile's own page range.
pub fn open_catalog(file: &Path, args: &ProfileArgs) -> Result<Catalog, i32> {
    if !file.exists() {
        return Err(fail(format!("file not found: {}", file.display())));
    }
    let profiles = load_profiles(args.profiles.as_deref())?;
    let mut profile = profiles.get(&args.profile).map_err(fail)?.clone();
    if let Some(pages) = &args.pages {
        profile.pages = Some(pages.clone());
    }
    let profiles = ProfileSet::new(vec![profile]).map_err(fail)?;
    let source = open_source(file).map_err(|e| fail(format!("failed to open catalog: {e}")))?;
    Ok(Catalog::new(source, profiles))
}

/// Reconstruct the selected profile's table from a catalog.
pub fn parse_catalog(file: &Path, args: &ProfileArgs) -> Result<ParsedTable, i32> {
    let catalog = open_catalog(file, args)?;
    let parsed = catalog.parse(&args.profile).map_err(fail)?;
    print_warnings(&parsed.warnings);
    debug!(
        profile = %args.profile,
        records = parsed.value.table.len(),
        "reconstructed table"
    );
    Ok(parsed.value)
}

/// Load the table named by `input`: a dataset file or a catalog profile.
pub fn load_table(input: &InputArgs) -> Result<PowerTable, i32> {
    match (&input.dataset, &input.file) {
        (Some(dataset), _) => {
            if !dataset.exists() {
                return Err(fail(format!("file not found: {}", dataset.display())));
            }
            let parsed = read_dataset(dataset).map_err(fail)?;
            print_warnings(&parsed.warnings);
            Ok(parsed.value)
        }
        (None, Some(file)) => Ok(parse_catalog(file, &input.profile)?.table),
        (None, None) => Err(fail("a catalog FILE or --dataset is required")),
    }
}
