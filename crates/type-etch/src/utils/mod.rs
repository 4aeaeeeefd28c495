//! Utilities for type-etch
//!
//! This module provides utilities for:
//! - SWC/deno_ast TypeScript parsing
//! - Source position and comment lookup

pub mod swc;

pub use swc::{parse_typescript_source, ParsedModule};
