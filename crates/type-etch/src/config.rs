//! Configuration parsing from etch.toml
//!
//! One `[[package]]` table per documented package. Relative paths are
//! resolved against the directory holding the configuration file.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::diagnostics::{EtchError, EtchResult};
use crate::docgen::assembler::{ConfigTypeNames, DeclarationSources};
use crate::docgen::generator::GeneratorConfig;
use crate::format::FormatOptions;

/// Default configuration file name
pub const CONFIG_FILE: &str = "etch.toml";

/// Full configuration
#[derive(Debug, Deserialize, Clone)]
pub struct EtchConfig {
    /// Documented packages, in file order
    #[serde(rename = "package", default)]
    pub packages: Vec<PackageConfig>,
    /// Snippet formatter settings
    #[serde(default)]
    pub format: FormatOptions,
}

/// One documented package
#[derive(Debug, Deserialize, Clone)]
pub struct PackageConfig {
    /// Package name used to select it on the command line
    pub name: String,
    /// Directory whose `.md` files carry include markers
    pub reference_dir: PathBuf,
    /// Move links to the old documentation site under the reference section
    #[serde(default)]
    pub rewrite_links: bool,
    /// External step producing type information
    pub generator: Option<GeneratorConfig>,
    /// Declaration files read directly
    pub declarations: Option<DeclarationSources>,
    /// Configuration types rendered on their own
    pub config_types: Option<ConfigTypeNames>,
}

impl PackageConfig {
    /// Whether modules come from the generator listing
    pub fn uses_listing(&self) -> bool {
        self.generator
            .as_ref()
            .is_some_and(|g| g.listing.is_some())
    }

    fn resolve_paths(&mut self, base: &Path) {
        self.reference_dir = resolve(base, &self.reference_dir);

        if let Some(generator) = &mut self.generator {
            generator.cwd = resolve(base, &generator.cwd);
        }

        if let Some(declarations) = &mut self.declarations {
            declarations.entry = resolve(base, &declarations.entry);
            declarations.private = declarations.private.as_deref().map(|p| resolve(base, p));
            declarations.synthetic = declarations.synthetic.as_deref().map(|p| resolve(base, p));
        }
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

impl EtchConfig {
    /// Parse configuration from a file path
    pub fn from_file(path: &Path) -> EtchResult<Self> {
        if !path.exists() {
            return Err(EtchError::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_toml_str(&content, base)
    }

    /// Parse configuration text, resolving paths against `base`
    pub fn from_toml_str(content: &str, base: &Path) -> EtchResult<Self> {
        let mut config: Self = toml::from_str(content)?;
        for package in &mut config.packages {
            package.resolve_paths(base);
        }
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot produce references
    pub fn validate(&self) -> EtchResult<()> {
        if self.packages.is_empty() {
            return Err(EtchError::config("no [[package]] tables configured"));
        }

        let mut seen = HashSet::new();
        for package in &self.packages {
            if !seen.insert(package.name.as_str()) {
                return Err(EtchError::config(format!(
                    "duplicate package name `{}`",
                    package.name
                )));
            }
            if package.declarations.is_none() && !package.uses_listing() {
                return Err(EtchError::config(format!(
                    "package `{}` needs [package.declarations] or a generator listing",
                    package.name
                )));
            }
        }

        Ok(())
    }

    /// Look up a package by name
    pub fn package(&self, name: &str) -> Option<&PackageConfig> {
        self.packages.iter().find(|p| p.name == name)
    }

    /// Packages named in `names`, or all packages when `names` is empty
    pub fn select(&self, names: &[String]) -> EtchResult<Vec<&PackageConfig>> {
        if names.is_empty() {
            return Ok(self.packages.iter().collect());
        }
        names
            .iter()
            .map(|name| {
                self.package(name)
                    .ok_or_else(|| EtchError::config(format!("unknown package `{}`", name)))
            })
            .collect()
    }
}
