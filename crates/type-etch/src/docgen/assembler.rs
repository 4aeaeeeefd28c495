//! Module assembly
//!
//! Builds the sorted module collection of a package from its declaration
//! sources: a private types file, a directory of synthetic markdown
//! fragments, and a public entry file of ambient `declare module` blocks.

use std::path::{Path, PathBuf};

use deno_ast::swc::ast as swc_ast;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::declaration::extract_declarations;
use crate::diagnostics::{EtchError, EtchResult};
use crate::extracted::{sort_modules, ConfigTypes, Module};
use crate::format::FormatOptions;
use crate::utils::swc::{module_name, namespace_items, parse_typescript_source, ParsedModule};

lazy_static! {
    /// A ```js fence inside a doc comment, with the gutter before it
    static ref JS_FENCE: Regex = Regex::new(r"(?s)(\s*\*\s*)```js(.+?)```").unwrap();
}

/// Name of the module assembled from the private types file
pub const PRIVATE_TYPES: &str = "Private types";

/// Where a package's declaration sources live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationSources {
    /// Private types file, documented as one module
    pub private: Option<PathBuf>,
    /// Directory of `*.md` fragments, one comment-only module each
    pub synthetic: Option<PathBuf>,
    /// Public entry file whose ambient modules are documented
    pub entry: PathBuf,
    /// Documentation origin removed from module comments
    #[serde(default)]
    pub origin: Option<String>,
}

/// The configuration types rendered separately from their module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigTypeNames {
    /// Module that declares both types
    pub module: String,
    /// Type rendered as one collapsed block
    pub collapsed: String,
    /// Type rendered with one section per member
    pub expanded: String,
}

/// Read a declaration file, marking `js` examples in doc comments.
///
/// Doc-comment examples cannot contain doc comments, so every ```js fence
/// gets a `/// errors: 7031` line that suppresses the resulting diagnostic.
pub fn read_declaration_file(path: &Path) -> EtchResult<String> {
    if !path.exists() {
        return Err(EtchError::FileNotFound(path.to_path_buf()));
    }
    let source = std::fs::read_to_string(path)?;
    Ok(prepare_declaration_source(&source))
}

/// Insert the `/// errors: 7031` marker after every ```js fence opening
pub fn prepare_declaration_source(source: &str) -> String {
    JS_FENCE
        .replace_all(source, |caps: &Captures| {
            let prefix = &caps[1];
            format!("{prefix}```js{prefix}/// errors: 7031{}```", &caps[2])
        })
        .into_owned()
}

/// Remove the documentation origin so links become root-relative
pub fn strip_origin(text: &str, origin: Option<&str>) -> String {
    match origin {
        Some(origin) if !origin.is_empty() => text.replace(origin, ""),
        _ => text.to_string(),
    }
}

/// Assemble every module of a package, sorted by name
pub fn assemble_modules(
    sources: &DeclarationSources,
    options: &FormatOptions,
) -> EtchResult<Vec<Module>> {
    let origin = sources.origin.as_deref();
    let mut modules = Vec::new();

    if let Some(private) = &sources.private {
        modules.push(read_private_module(private, options)?);
    }

    if let Some(synthetic) = &sources.synthetic {
        modules.extend(read_synthetic_modules(synthetic, origin)?);
    }

    modules.extend(read_entry_modules(&sources.entry, origin, options)?);

    sort_modules(&mut modules);
    tracing::debug!("assembled {} modules", modules.len());

    Ok(modules)
}

/// Document every export of the private types file as one module
pub fn read_private_module(path: &Path, options: &FormatOptions) -> EtchResult<Module> {
    let parsed = parse(path)?;
    let module = parsed.module()?;
    let extraction = extract_declarations(&parsed, &module.body, options)?;

    Ok(Module {
        name: PRIVATE_TYPES.to_string(),
        comment: String::new(),
        exports: extraction.exports,
        types: extraction.types,
        exempt: false,
    })
}

/// One comment-only module per `*.md` fragment directly inside `dir`.
///
/// A fragment named `$env+static+private.md` documents `$env/static/private`.
pub fn read_synthetic_modules(dir: &Path, origin: Option<&str>) -> EtchResult<Vec<Module>> {
    let mut modules = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            EtchError::Io(std::io::Error::other(format!(
                "Failed to read {}: {}",
                dir.display(),
                e
            )))
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "md") {
            continue;
        }

        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            return Err(EtchError::InvalidPath(path.display().to_string()));
        };

        let comment = strip_origin(&read_declaration_file(path)?, origin);
        modules.push(Module {
            name: stem.replace('+', "/"),
            comment,
            exempt: true,
            ..Default::default()
        });
    }

    Ok(modules)
}

/// One module per ambient module declared in the entry file
pub fn read_entry_modules(
    path: &Path,
    origin: Option<&str>,
    options: &FormatOptions,
) -> EtchResult<Vec<Module>> {
    let parsed = parse(path)?;
    let mut modules = Vec::new();

    for item in &parsed.module()?.body {
        let (decl, span) = match item {
            swc_ast::ModuleItem::Stmt(swc_ast::Stmt::Decl(swc_ast::Decl::TsModule(decl))) => {
                (decl, decl.span)
            }
            swc_ast::ModuleItem::ModuleDecl(swc_ast::ModuleDecl::ExportDecl(export)) => {
                match &export.decl {
                    swc_ast::Decl::TsModule(decl) => (decl, export.span),
                    _ => continue,
                }
            }
            _ => continue,
        };

        let items = decl.body.as_ref().map(namespace_items).unwrap_or_default();
        let extraction = extract_declarations(&parsed, items, options)?;
        let doc = parsed.doc_for_span(span);

        modules.push(Module {
            name: module_name(&decl.id),
            comment: strip_origin(&doc.description, origin),
            exports: extraction.exports,
            types: extraction.types,
            exempt: false,
        });
    }

    Ok(modules)
}

fn parse(path: &Path) -> EtchResult<ParsedModule> {
    let source = read_declaration_file(path)?;
    parse_typescript_source(path, source)
}

/// Remove the configuration types from their module.
///
/// Both types must exist; a missing module or type is an error.
pub fn isolate_config_types(
    modules: &mut [Module],
    names: &ConfigTypeNames,
) -> EtchResult<ConfigTypes> {
    let module = modules
        .iter_mut()
        .find(|m| m.name == names.module)
        .ok_or_else(|| EtchError::SymbolNotFound(names.module.clone()))?;

    // both are looked up before either is removed
    for name in [&names.collapsed, &names.expanded] {
        if module.find_type(name).is_none() {
            return Err(EtchError::SymbolNotFound(format!("{}#{}", names.module, name)));
        }
    }

    let missing = || EtchError::SymbolNotFound(names.module.clone());
    let collapsed = module.take_type(&names.collapsed).ok_or_else(missing)?;
    let expanded = module.take_type(&names.expanded).ok_or_else(missing)?;

    Ok(ConfigTypes {
        collapsed,
        expanded,
    })
}
