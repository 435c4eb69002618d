//! eurofact CLI - Eurostat data preparation pipeline.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            data_dir,
            db,
            export_dir,
            config,
            reference_period,
            tolerance,
            report,
        } => commands::run::run(
            data_dir,
            db,
            export_dir,
            config,
            reference_period,
            tolerance,
            report,
            cli.verbose,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
