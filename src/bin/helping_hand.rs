//! Helping Hand CLI - batch object tools for 3D scene documents
//!
//! Loads a scene document, runs one object tool against it and reports the
//! outcome as text, JSON or YAML.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::SelectSimilar(args) => cli::select_similar_command(args, config_path)?,
        Commands::Rename(args) => cli::rename_command(args, config_path)?,
        Commands::MoveToCollection(args) => cli::move_to_collection_command(args, config_path)?,
        Commands::LinkData(args) => cli::link_data_command(args, config_path)?,
        Commands::CheckVersion(args) => cli::check_version_command(args, config_path)?,
        Commands::PrintDefaultConfig => cli::print_default_config()?,
        Commands::InitConfig(args) => cli::init_config(args)?,
        Commands::ValidateConfig(args) => cli::validate_config(args)?,
    }

    Ok(())
}
