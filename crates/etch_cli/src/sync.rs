//! Substitute include markers in the configured reference pages.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use type_etch::{EtchConfig, Etcher, SyncReport, CONFIG_FILE};

/// Substitute include markers in every reference page
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Configuration file
    #[arg(short, long, value_name = "FILE", default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Only sync these packages (repeatable, all when omitted)
    #[arg(short, long, value_name = "NAME")]
    pub package: Vec<String>,

    /// Compute the pages without writing them
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: SyncArgs) -> Result<SyncReport> {
    let config = EtchConfig::from_file(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;

    let report = Etcher::new(config)
        .run(&args.package, args.dry_run)
        .context("reference sync failed")?;

    eprintln!(
        "{} {} of {} page(s) for {}",
        if report.dry_run { "Would update" } else { "Updated" },
        report.changed,
        report.pages,
        report.packages.join(", ")
    );

    Ok(report)
}
