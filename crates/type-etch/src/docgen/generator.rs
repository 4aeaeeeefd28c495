//! External generator step
//!
//! Some packages produce their type information with their own script. The
//! script is run to completion, then its JSON module listing is read.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{EtchError, EtchResult};
use crate::extracted::{sort_modules, Module};

/// How to run a package's generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Program to execute
    pub program: String,
    /// Arguments passed to the program
    #[serde(default)]
    pub args: Vec<String>,
    /// Working directory of the program
    pub cwd: PathBuf,
    /// Module listing written by the program, relative to `cwd`
    #[serde(default)]
    pub listing: Option<PathBuf>,
}

impl GeneratorConfig {
    /// Command line as shown in logs and errors
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Absolute location of the listing, if the generator writes one
    pub fn listing_path(&self) -> Option<PathBuf> {
        self.listing.as_ref().map(|listing| self.cwd.join(listing))
    }
}

/// Listing file shape: `{"modules": [...]}`
#[derive(Debug, Deserialize)]
struct Listing {
    modules: Vec<Module>,
}

#[derive(Serialize)]
struct ListingRef<'a> {
    modules: &'a [Module],
}

/// Run the generator and wait for it to exit
pub fn run_generator(config: &GeneratorConfig) -> EtchResult<()> {
    let command = config.command_line();
    tracing::info!("running generator `{}` in {}", command, config.cwd.display());

    let output = Command::new(&config.program)
        .args(&config.args)
        .current_dir(&config.cwd)
        .output()
        .map_err(|e| EtchError::subprocess(&command, e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(EtchError::subprocess(
            &command,
            format!("exited with {}: {}", output.status, stderr.trim()),
        ));
    }

    tracing::debug!("generator `{}` finished", command);
    Ok(())
}

/// Read the modules of a generator listing, sorted like assembled modules
pub fn read_listing(path: &Path, command: &str) -> EtchResult<Vec<Module>> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        EtchError::subprocess(command, format!("cannot read {}: {}", path.display(), e))
    })?;

    let listing: Listing = serde_json::from_str(&text).map_err(|e| {
        EtchError::subprocess(command, format!("invalid listing {}: {}", path.display(), e))
    })?;

    let mut modules = listing.modules;
    for module in &mut modules {
        module.sort();
    }
    sort_modules(&mut modules);
    Ok(modules)
}

/// Serialize modules as a pretty-printed listing, newline-terminated
pub fn listing_json(modules: &[Module]) -> EtchResult<String> {
    let mut json = serde_json::to_string_pretty(&ListingRef { modules })?;
    json.push('\n');
    Ok(json)
}

/// Run the generator, then read its listing if it has one
pub fn generate(config: &GeneratorConfig) -> EtchResult<Option<Vec<Module>>> {
    run_generator(config)?;
    config
        .listing_path()
        .map(|path| read_listing(&path, &config.command_line()))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn shell(dir: &Path, script: &str, listing: Option<&str>) -> GeneratorConfig {
        GeneratorConfig {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            cwd: dir.to_path_buf(),
            listing: listing.map(PathBuf::from),
        }
    }

    #[test]
    fn test_command_line() {
        let config = GeneratorConfig {
            program: "node".to_string(),
            args: vec!["scripts/types/index.js".to_string()],
            cwd: PathBuf::from("."),
            listing: None,
        };
        assert_eq!(config.command_line(), "node scripts/types/index.js");
        assert!(config.listing_path().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_generate_reads_listing() {
        let dir = TempDir::new().unwrap();
        let script = r#"mkdir -p out && printf '{"modules":[{"name":"svelte","comment":"","exports":[],"types":[]}]}' > out/type-info.json"#;
        let config = shell(dir.path(), script, Some("out/type-info.json"));

        let modules = generate(&config).unwrap().unwrap();
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].name, "svelte");
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_generator() {
        let dir = TempDir::new().unwrap();
        let config = shell(dir.path(), "echo broken >&2; exit 3", None);

        let err = generate(&config).unwrap_err();
        match err {
            EtchError::Subprocess { message, .. } => assert!(message.contains("broken")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_invalid_listing() {
        let dir = TempDir::new().unwrap();
        let config = shell(dir.path(), "echo 'not json' > listing.json", Some("listing.json"));

        let err = generate(&config).unwrap_err();
        assert!(matches!(err, EtchError::Subprocess { .. }));
    }

    #[test]
    fn test_listing_json_is_readable_listing() {
        let dir = TempDir::new().unwrap();
        let mut svelte = Module::new("svelte");
        svelte.comment = "Runtime".to_string();

        let json = listing_json(&[svelte.clone()]).unwrap();
        assert!(json.starts_with("{\n  \"modules\": ["));
        assert!(json.ends_with("}\n"));

        let path = dir.path().join("type-info.json");
        std::fs::write(&path, &json).unwrap();
        assert_eq!(read_listing(&path, "etch-sync extract").unwrap(), vec![svelte]);
    }

    #[test]
    fn test_listing_is_sorted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("type-info.json");
        std::fs::write(
            &path,
            r#"{"modules": [
                {"name": "svelte/store", "exports": [{"name": "writable"}, {"name": "derived"}]},
                {"name": "svelte", "types": [{"name": "Snippet"}, {"name": "Component"}]}
            ]}"#,
        )
        .unwrap();

        let modules = read_listing(&path, "node generate.js").unwrap();
        let names: Vec<_> = modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["svelte", "svelte/store"]);
        assert_eq!(modules[0].types[0].name, "Component");
        assert_eq!(modules[1].exports[0].name, "derived");
    }

    #[test]
    fn test_missing_program() {
        let dir = TempDir::new().unwrap();
        let config = GeneratorConfig {
            program: "definitely-not-a-real-program-etch".to_string(),
            args: vec![],
            cwd: dir.path().to_path_buf(),
            listing: None,
        };
        assert!(matches!(run_generator(&config), Err(EtchError::Subprocess { .. })));
    }
}
