mod cli;
mod commands;
mod output;
mod state;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use output::OutputFormat;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so JSON output on stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("positionable=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::from(cli.format);

    match &cli.command {
        Commands::Insert(args) => commands::records::insert(&cli.state, args, format),
        Commands::Move(args) => commands::records::move_record(&cli.state, args, format),
        Commands::Remove(args) => commands::records::remove(&cli.state, args, format),
        Commands::List(args) => commands::scope::list(&cli.state, args, format),
        Commands::Check(args) => commands::scope::check(&cli.state, args, format),
        Commands::Renumber(args) => commands::scope::renumber(&cli.state, args, format),
        Commands::Plan(args) => commands::scope::plan(&cli.state, args, format),
    }
}
