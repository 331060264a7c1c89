mod cli;
mod extract_cmd;
mod grid_cmd;
mod lookup_cmd;
mod profiles_cmd;
mod shared;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    shared::init_logging(cli.verbose);

    let result = match cli.command {
        cli::Commands::Extract {
            ref file,
            ref profile,
            ref format,
            ref output,
        } => extract_cmd::run(file, profile, format, output.as_deref()),
        cli::Commands::Lookup {
            ref input,
            diameter,
            speed,
            ref strategy,
            ref missing_corners,
            ref format,
        } => lookup_cmd::run(input, diameter, speed, strategy, missing_corners, format),
        cli::Commands::Grid {
            ref input,
            ref format,
        } => grid_cmd::run(input, format),
        cli::Commands::Profiles {
            ref profiles,
            ref format,
        } => profiles_cmd::run(profiles.as_deref(), format),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
