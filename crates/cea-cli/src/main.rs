use clap::Parser;
use tracing::error;
use tracing_subscriber::FmtSubscriber;

use cea_cli::cli::{Cli, Commands};

mod commands;

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {err}");
    }

    let result = match &cli.command {
        Commands::Network { command } => commands::network::handle(command),
        Commands::Catalog { command } => commands::catalog::handle(command),
        Commands::Storage { command } => commands::storage::handle(command),
        Commands::Dispatch { command } => commands::dispatch::handle(command),
    };

    if let Err(err) = result {
        error!("{err:#}");
        std::process::exit(1);
    }
}
