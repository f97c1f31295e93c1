//! Lamina - layered copy-on-write filesystems for bare metal
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use lamina::cli::{Cli, Commands};
use lamina::config::ConfigManager;
use lamina::error::LaminaResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> LaminaResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("lamina=warn"),
        1 => EnvFilter::new("lamina=info"),
        _ => EnvFilter::new("lamina=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    // Load configuration
    let config_manager = if let Some(path) = cli.config {
        ConfigManager::with_path(path)
    } else {
        ConfigManager::new()
    };
    let config = config_manager.load().await?;

    // Dispatch to command
    match cli.command {
        Commands::Create(args) => lamina::cli::commands::create(args, &config).await,
        Commands::Delete(args) => lamina::cli::commands::delete(args, &config).await,
        Commands::List => lamina::cli::commands::list(&config).await,
        Commands::Mount(args) => lamina::cli::commands::mount(args, &config).await,
        Commands::Unmount(args) => lamina::cli::commands::unmount(args, &config).await,
        Commands::Run(args) => lamina::cli::commands::run(args, &config).await,
    }
}
