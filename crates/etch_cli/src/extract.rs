//! Print the extracted modules of one package.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use type_etch::docgen::listing_json;
use type_etch::{EtchConfig, Etcher, ModulePrinter, CONFIG_FILE};

/// Print the extracted modules of one package
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Configuration file
    #[arg(short, long, value_name = "FILE", default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Package to extract
    #[arg(short, long, value_name = "NAME")]
    pub package: String,

    /// Write the JSON listing to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print a readable tree instead of JSON
    #[arg(long)]
    pub preview: bool,

    /// Disable colors in the preview
    #[arg(long)]
    pub no_color: bool,
}

pub fn run(args: ExtractArgs) -> Result<()> {
    let config = EtchConfig::from_file(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;

    let package = config
        .package(&args.package)
        .with_context(|| format!("unknown package `{}`", args.package))?
        .clone();

    let modules = Etcher::new(config)
        .modules(&package)
        .with_context(|| format!("failed to extract `{}`", package.name))?;

    if args.preview {
        ModulePrinter::new(&modules, !args.no_color).print_to_stdout();
        return Ok(());
    }

    let listing = listing_json(&modules).context("failed to serialize modules")?;
    match &args.output {
        Some(path) => fs::write(path, &listing)
            .with_context(|| format!("failed to write to {}", path.display()))?,
        None => io::stdout()
            .write_all(listing.as_bytes())
            .context("failed to write to stdout")?,
    }

    Ok(())
}
