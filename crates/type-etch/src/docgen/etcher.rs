//! Etcher - Main reference synchronization orchestrator
//!
//! This module provides the Etcher struct which coordinates the whole
//! pipeline for every configured package: module extraction, link rewriting,
//! configuration-type isolation, and placeholder substitution in the
//! package's reference pages.
//!
//! Substitution is planned for every page of every selected package before
//! anything is written, so a missing reference leaves all pages untouched.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::{EtchConfig, PackageConfig};
use crate::diagnostics::{EtchError, EtchResult};
use crate::docgen::assembler::{assemble_modules, isolate_config_types};
use crate::docgen::generator::{generate, run_generator};
use crate::docgen::include::ReferenceTable;
use crate::docgen::links::rewrite_module_links;
use crate::extracted::Module;

/// One reference page with its substituted content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedWrite {
    /// Page path
    pub path: PathBuf,
    /// Content after substitution
    pub content: String,
    /// Whether the content differs from the page on disk
    pub changed: bool,
}

/// Outcome of a sync run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Packages processed
    pub packages: Vec<String>,
    /// Reference pages scanned
    pub pages: usize,
    /// Pages whose content changed
    pub changed: usize,
    /// Whether writing was skipped
    pub dry_run: bool,
}

/// The reference synchronizer
///
/// Etcher coordinates the pipeline:
/// 1. Produce the package's modules (generator listing or declaration files)
/// 2. Rewrite documentation links
/// 3. Isolate the configuration types
/// 4. Substitute include markers in every reference page
/// 5. Write the pages once every marker has resolved
pub struct Etcher {
    /// Configuration
    config: EtchConfig,
}

impl Etcher {
    /// Create a new Etcher with the given configuration
    pub fn new(config: EtchConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &EtchConfig {
        &self.config
    }

    /// Produce the sorted modules of a package
    pub fn modules(&self, package: &PackageConfig) -> EtchResult<Vec<Module>> {
        let listed = match &package.generator {
            Some(generator) if generator.listing.is_some() => generate(generator)?,
            Some(generator) => {
                run_generator(generator)?;
                None
            }
            None => None,
        };

        let mut modules = match (listed, &package.declarations) {
            (Some(modules), _) => modules,
            (None, Some(declarations)) => assemble_modules(declarations, &self.config.format)?,
            (None, None) => {
                return Err(EtchError::config(format!(
                    "package `{}` has no module source",
                    package.name
                )))
            }
        };

        if package.rewrite_links {
            rewrite_module_links(&mut modules);
        }

        tracing::info!("{}: {} modules", package.name, modules.len());
        Ok(modules)
    }

    /// Build the reference table of a package
    pub fn reference_table(&self, package: &PackageConfig) -> EtchResult<ReferenceTable> {
        let mut modules = self.modules(package)?;

        let config = package
            .config_types
            .as_ref()
            .map(|names| isolate_config_types(&mut modules, names))
            .transpose()?;

        let table = ReferenceTable::new(modules);
        Ok(match config {
            Some(config) => table.with_config(config),
            None => table,
        })
    }

    /// Substitute every reference page of a package in memory
    pub fn plan_package(&self, package: &PackageConfig) -> EtchResult<Vec<PlannedWrite>> {
        let table = self.reference_table(package)?;
        let mut planned = Vec::new();

        for path in reference_pages(&package.reference_dir)? {
            let original = std::fs::read_to_string(&path)?;
            let content = table.substitute(&original)?;
            let changed = content != original;
            tracing::debug!("{} {}", if changed { "updated" } else { "unchanged" }, path.display());
            planned.push(PlannedWrite {
                path,
                content,
                changed,
            });
        }

        Ok(planned)
    }

    /// Plan the selected packages, all of them when `names` is empty
    pub fn plan(&self, names: &[String]) -> EtchResult<(Vec<String>, Vec<PlannedWrite>)> {
        let mut packages = Vec::new();
        let mut planned = Vec::new();

        for package in self.config.select(names)? {
            packages.push(package.name.clone());
            planned.extend(self.plan_package(package)?);
        }

        Ok((packages, planned))
    }

    /// Run the pipeline and write the changed pages unless `dry_run`
    pub fn run(&self, names: &[String], dry_run: bool) -> EtchResult<SyncReport> {
        let (packages, planned) = self.plan(names)?;
        let changed = planned.iter().filter(|w| w.changed).count();

        if !dry_run {
            commit(&planned)?;
        }

        tracing::info!(
            "{} of {} reference pages {}",
            changed,
            planned.len(),
            if dry_run { "would change" } else { "updated" }
        );

        Ok(SyncReport {
            packages,
            pages: planned.len(),
            changed,
            dry_run,
        })
    }
}

/// Write every changed page
pub fn commit(planned: &[PlannedWrite]) -> EtchResult<usize> {
    let mut written = 0;
    for write in planned.iter().filter(|w| w.changed) {
        std::fs::write(&write.path, &write.content)?;
        written += 1;
    }
    Ok(written)
}

/// The `.md` files directly inside `dir`, sorted by name
pub fn reference_pages(dir: &Path) -> EtchResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(EtchError::FileNotFound(dir.to_path_buf()));
    }

    let mut pages = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            EtchError::Io(std::io::Error::other(format!(
                "Failed to read {}: {}",
                dir.display(),
                e
            )))
        })?;
        if entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "md") {
            pages.push(entry.into_path());
        }
    }
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docgen::assembler::{ConfigTypeNames, DeclarationSources};
    use crate::docgen::include::has_markers;
    use crate::format::FormatOptions;
    use crate::test::write_declaration_tree;
    use std::fs;
    use tempfile::TempDir;

    fn kit_package(root: &Path) -> PackageConfig {
        let tree = write_declaration_tree(root);
        let reference_dir = root.join("reference");
        fs::create_dir_all(reference_dir.join("nested")).unwrap();

        PackageConfig {
            name: "kit".to_string(),
            reference_dir,
            rewrite_links: true,
            generator: None,
            declarations: Some(DeclarationSources {
                private: Some(tree.private),
                synthetic: Some(tree.synthetic),
                entry: tree.entry,
                origin: Some("https://kit.svelte.dev".to_string()),
            }),
            config_types: Some(ConfigTypeNames {
                module: "@sveltejs/kit".to_string(),
                collapsed: "Config".to_string(),
                expanded: "KitConfig".to_string(),
            }),
        }
    }

    fn etcher(package: PackageConfig) -> Etcher {
        Etcher::new(EtchConfig {
            packages: vec![package],
            format: FormatOptions::default(),
        })
    }

    #[test]
    fn test_sync_substitutes_all_pages() {
        let dir = TempDir::new().unwrap();
        let package = kit_package(dir.path());
        let pages = &package.reference_dir;
        fs::write(pages.join("10-configuration.md"), "# Config\n\n<!-- @include Config -->\n\n<!-- @include KitConfig -->\n").unwrap();
        fs::write(pages.join("20-paths.md"), "<!-- @include $app/paths -->\n").unwrap();
        fs::write(pages.join("30-plain.md"), "No markers.\n").unwrap();
        fs::write(pages.join("notes.txt"), "<!-- @include missing -->").unwrap();
        fs::write(pages.join("nested/deep.md"), "<!-- @include missing -->").unwrap();

        let report = etcher(package.clone()).run(&[], false).unwrap();
        assert_eq!(report.packages, vec!["kit".to_string()]);
        assert_eq!(report.pages, 3);
        assert_eq!(report.changed, 2);

        let config = fs::read_to_string(pages.join("10-configuration.md")).unwrap();
        assert!(!has_markers(&config));
        assert!(config.contains("interface Config {/*…*/}"));
        assert!(config.contains("## adapter"));
        assert!(config.contains("/docs/kit/reference/configuration"));

        let paths = fs::read_to_string(pages.join("20-paths.md")).unwrap();
        assert!(paths.contains("### resolveRoute"));
        assert!(paths.contains("/docs/kit/reference/$app-paths#base"));
    }

    #[test]
    fn test_config_types_leave_their_module() {
        let dir = TempDir::new().unwrap();
        let package = kit_package(dir.path());
        let table = etcher(package.clone()).reference_table(&package).unwrap();

        let kit = table.modules.iter().find(|m| m.name == "@sveltejs/kit").unwrap();
        let types: Vec<_> = kit.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(types, vec!["Adapter"]);
        assert!(table.config.is_some());
    }

    #[test]
    fn test_missing_reference_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let package = kit_package(dir.path());
        let pages = &package.reference_dir;
        fs::write(pages.join("10-good.md"), "<!-- @include $app/paths -->").unwrap();
        fs::write(pages.join("20-bad.md"), "<!-- @include $app/nowhere -->").unwrap();

        let err = etcher(package.clone()).run(&[], false).unwrap_err();
        assert!(matches!(err, EtchError::ReferenceNotFound(name) if name == "$app/nowhere"));

        let good = fs::read_to_string(pages.join("10-good.md")).unwrap();
        assert_eq!(good, "<!-- @include $app/paths -->");
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let dir = TempDir::new().unwrap();
        let package = kit_package(dir.path());
        let page = package.reference_dir.join("paths.md");
        fs::write(&page, "<!-- @include $app/paths -->").unwrap();

        let report = etcher(package.clone()).run(&[], true).unwrap();
        assert!(report.dry_run);
        assert_eq!(report.changed, 1);
        assert_eq!(fs::read_to_string(&page).unwrap(), "<!-- @include $app/paths -->");
    }

    #[test]
    fn test_sync_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let package = kit_package(dir.path());
        let page = package.reference_dir.join("paths.md");
        fs::write(&page, "<!-- @include $app/paths -->").unwrap();

        let etcher = etcher(package);
        etcher.run(&[], false).unwrap();
        let first = fs::read_to_string(&page).unwrap();
        let report = etcher.run(&[], false).unwrap();

        assert_eq!(report.changed, 0);
        assert_eq!(fs::read_to_string(&page).unwrap(), first);
    }

    #[test]
    fn test_unknown_package_is_rejected() {
        let dir = TempDir::new().unwrap();
        let err = etcher(kit_package(dir.path()))
            .run(&["svelte".to_string()], true)
            .unwrap_err();
        assert!(matches!(err, EtchError::Config(_)));
    }

    #[test]
    fn test_missing_reference_dir() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            reference_pages(&dir.path().join("absent")),
            Err(EtchError::FileNotFound(_))
        ));
    }
}
