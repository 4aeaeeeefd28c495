//! etch-sync - keep API reference pages in sync with declaration files
//!
//! Reads `etch.toml`, extracts the configured packages' type information,
//! and replaces the include markers of their reference pages.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod extract;
mod sync;

/// Keep API reference pages in sync with TypeScript declaration files
#[derive(Parser)]
#[command(name = "etch-sync")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Substitute include markers in every reference page
    Sync(sync::SyncArgs),
    /// Print the extracted modules of one package
    Extract(extract::ExtractArgs),
}

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

/// Log filter read from `ETCH_LOG`, defaulting to `info`
fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_env("ETCH_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sync(args) => {
            sync::run(args)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Extract(args) => {
            extract::run(args)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sync() {
        let cli = Cli::try_parse_from([
            "etch-sync", "sync", "--config", "site/etch.toml", "--package", "kit", "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Commands::Sync(args) => {
                assert_eq!(args.config, std::path::PathBuf::from("site/etch.toml"));
                assert_eq!(args.package, vec!["kit".to_string()]);
                assert!(args.dry_run);
            }
            Commands::Extract(_) => panic!("expected sync"),
        }
    }

    #[test]
    fn test_extract_requires_package() {
        assert!(Cli::try_parse_from(["etch-sync", "extract"]).is_err());
    }
}
