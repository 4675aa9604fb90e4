//! colmap CLI - suggestion-driven value mapping for CSV columns.

mod cli;
mod commands;
mod logging;
mod provider;
mod server;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init_logging(&logging::LogConfig::from_verbosity(cli.verbose));

    let result = match cli.command {
        Commands::Inspect { file } => commands::inspect::run(file, &cli.options),

        Commands::Map {
            file,
            columns,
            reject,
            choose,
            output,
        } => commands::map::run(file, columns, reject, choose, output, &cli.options),

        Commands::Serve { port } => commands::serve::run(port, &cli.options),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
