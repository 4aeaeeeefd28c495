//! Reference generation core
//!
//! This module provides the pipeline that turns declaration sources into
//! reference text: module assembly, link rewriting, markdown rendering,
//! placeholder substitution, and the orchestrating [`Etcher`].

pub mod assembler;
mod etcher;
pub mod generator;
pub mod include;
pub mod links;
mod markdown;

pub use assembler::{
    assemble_modules, isolate_config_types, prepare_declaration_source, strip_origin,
    ConfigTypeNames, DeclarationSources, PRIVATE_TYPES,
};
pub use etcher::{commit, reference_pages, Etcher, PlannedWrite, SyncReport};
pub use generator::{generate, listing_json, read_listing, run_generator, GeneratorConfig};
pub use include::{has_markers, ReferenceTable};
pub use links::{rewrite_links, rewrite_module_links, LinkRule};
pub use markdown::MarkdownRenderer;
