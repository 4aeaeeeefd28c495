//! type-etch: reference generator for TypeScript declaration files
//!
//! This crate keeps API reference pages in sync with a package's `.d.ts`
//! files by:
//! - Parsing declaration sources using deno_ast/SWC
//! - Extracting every exported declaration with its JSDoc, member by member
//! - Formatting signatures into compact snippets
//! - Rendering modules and types as reference markdown
//! - Replacing `<!-- @include Name -->` markers in the documentation
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐ ┌────────────────┐ ┌────────────┐
//! │ private.d.ts │ │ synthetic/*.md │ │ index.d.ts │
//! └──────┬───────┘ └───────┬────────┘ └─────┬──────┘
//!        └─────────────────┼────────────────┘
//!                          ▼
//!                   ┌─────────────┐      ┌───────────────────┐
//!                   │ Vec<Module> │ ◄─── │ generator listing │
//!                   └──────┬──────┘      └───────────────────┘
//!                          ▼
//!                 ┌─────────────────┐
//!                 │ reference pages │
//!                 └─────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//! use type_etch::{EtchConfig, Etcher};
//!
//! let config = EtchConfig::from_file(Path::new("etch.toml")).expect("invalid config");
//! let report = Etcher::new(config).run(&[], false).expect("sync failed");
//! println!("{} pages updated", report.changed);
//! ```

// Core types
pub mod extracted;
pub mod js_doc;

// Extraction
pub mod declaration;
pub mod format;
pub mod member;

// Configuration, errors and utilities
pub mod config;
pub mod diagnostics;
pub mod printer;
pub mod router;
pub mod utils;


// Submodules
pub mod docgen;

// Re-exports for convenience
pub use config::{EtchConfig, PackageConfig, CONFIG_FILE};
pub use declaration::{extract_declarations, DeclKind, Extraction};
pub use diagnostics::{EtchError, EtchResult};
pub use extracted::{ConfigTypes, Extracted, Module};
pub use format::{format_snippet, FormatOptions};
pub use js_doc::{EtchDoc, JsDocTag};
pub use member::{extract_member, Member};

// Terminal output
pub use printer::ModulePrinter;

// Routing
pub use router::{DocsIndex, PageRoute, Route};

// Reference generation
pub use docgen::{
    assemble_modules, ConfigTypeNames, DeclarationSources, Etcher, GeneratorConfig,
    MarkdownRenderer, ReferenceTable, SyncReport,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
