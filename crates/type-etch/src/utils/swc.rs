//! SWC/deno_ast TypeScript parsing utilities
//!
//! This module provides utilities for parsing declaration files using
//! deno_ast (which wraps SWC). It handles:
//! - Parsing `.d.ts` sources
//! - Mapping SWC positions to byte offsets in the source text
//! - Looking up the JSDoc comment attached to a node
//! - Declaration names

use crate::diagnostics::{EtchError, EtchResult};
use crate::js_doc::EtchDoc;
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::comments::{Comment, CommentKind};
use deno_ast::swc::common::{BytePos, Span};
use deno_ast::{MediaType, ParseParams, ParsedSource, SourcePos, StartSourcePos};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A parsed TypeScript module with its source text
#[derive(Debug)]
pub struct ParsedModule {
    /// The parsed source from deno_ast
    pub source: ParsedSource,
    /// The file path
    pub path: PathBuf,
    /// The source text
    pub text: Arc<str>,
}

impl ParsedModule {
    /// Get the module AST
    pub fn module(&self) -> EtchResult<&swc_ast::Module> {
        match self.source.program_ref() {
            deno_ast::ProgramRef::Module(m) => Ok(m),
            deno_ast::ProgramRef::Script(_) => Err(EtchError::TypeScriptParse(format!(
                "{} was parsed as a script, expected a module",
                self.path.display()
            ))),
        }
    }

    /// Get the source text
    pub fn source_text(&self) -> &str {
        &self.text
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Convert an SWC position to a byte offset into the source text
    pub fn byte_index(&self, pos: BytePos) -> usize {
        SourcePos::unsafely_from_byte_pos(pos).as_byte_index(StartSourcePos::START_SOURCE_POS)
    }

    /// Extract source text for a span
    pub fn text_for_span(&self, span: Span) -> &str {
        let start = self.byte_index(span.lo).min(self.text.len());
        let end = self.byte_index(span.hi).min(self.text.len());
        &self.text[start..end]
    }

    /// Get leading comments for a position
    pub fn leading_comments(&self, pos: BytePos) -> Vec<Comment> {
        let source_pos = SourcePos::unsafely_from_byte_pos(pos);
        self.source
            .comments()
            .get_leading(source_pos)
            .map(|v| v.to_vec())
            .unwrap_or_default()
    }

    /// Get JSDoc comment for a span (the last leading `/** */` block)
    pub fn jsdoc_for_span(&self, span: Span) -> Option<String> {
        self.leading_comments(span.lo)
            .iter()
            .rev()
            .find(|c| c.kind == CommentKind::Block && c.text.starts_with('*'))
            .map(|c| c.text.to_string())
    }

    /// Parsed JSDoc for a span, empty when there is none
    pub fn doc_for_span(&self, span: Span) -> EtchDoc {
        self.jsdoc_for_span(span)
            .map(|text| EtchDoc::parse(&text))
            .unwrap_or_default()
    }

    /// Byte offset where a node starts, including its leading comments
    pub fn full_start(&self, span: Span) -> usize {
        self.leading_comments(span.lo)
            .iter()
            .map(|c| self.byte_index(c.span.lo))
            .chain(std::iter::once(self.byte_index(span.lo)))
            .min()
            .unwrap_or_else(|| self.byte_index(span.lo))
    }
}

/// Parse TypeScript source code from a string
///
/// The media type is taken from the path, so `index.d.ts` parses as a
/// declaration file. Relative paths are made absolute first since deno_ast
/// needs a file URL specifier.
pub fn parse_typescript_source(
    path: impl AsRef<Path>,
    source: impl Into<Arc<str>>,
) -> EtchResult<ParsedModule> {
    let path = std::path::absolute(path.as_ref())?;
    let source: Arc<str> = source.into();

    let media_type = MediaType::from_path(&path);

    let specifier = deno_ast::ModuleSpecifier::from_file_path(&path)
        .map_err(|_| EtchError::InvalidPath(path.display().to_string()))?;

    let parsed = deno_ast::parse_module(ParseParams {
        specifier,
        text: source.clone(),
        media_type,
        capture_tokens: true,
        scope_analysis: false,
        maybe_syntax: None,
    })
    .map_err(|e| EtchError::TypeScriptParse(format!("{}: {}", path.display(), e)))?;

    Ok(ParsedModule {
        source: parsed,
        path,
        text: source,
    })
}

/// Helper to convert Wtf8Atom to String
fn wtf8_to_string(s: &swc_ast::Str) -> String {
    String::from_utf8_lossy(s.value.as_bytes()).into_owned()
}

/// Name of an ambient module or namespace
pub fn module_name(name: &swc_ast::TsModuleName) -> String {
    match name {
        swc_ast::TsModuleName::Ident(i) => i.sym.to_string(),
        swc_ast::TsModuleName::Str(s) => wtf8_to_string(s),
    }
}

/// Extract the identifier name from various declaration types
pub fn get_decl_name(decl: &swc_ast::Decl) -> Option<String> {
    match decl {
        swc_ast::Decl::Class(c) => Some(c.ident.sym.to_string()),
        swc_ast::Decl::Fn(f) => Some(f.ident.sym.to_string()),
        swc_ast::Decl::Var(v) => {
            // Get the first variable name
            v.decls.first().and_then(|d| match &d.name {
                swc_ast::Pat::Ident(i) => Some(i.sym.to_string()),
                _ => None,
            })
        }
        swc_ast::Decl::TsInterface(i) => Some(i.id.sym.to_string()),
        swc_ast::Decl::TsTypeAlias(t) => Some(t.id.sym.to_string()),
        swc_ast::Decl::TsEnum(e) => Some(e.id.sym.to_string()),
        swc_ast::Decl::TsModule(m) => Some(module_name(&m.id)),
        swc_ast::Decl::Using(_) => None,
    }
}

/// Module items inside a namespace body, following `namespace A.B {}` nesting
pub fn namespace_items(body: &swc_ast::TsNamespaceBody) -> &[swc_ast::ModuleItem] {
    match body {
        swc_ast::TsNamespaceBody::TsModuleBlock(block) => &block.body,
        swc_ast::TsNamespaceBody::TsNamespaceDecl(decl) => namespace_items(&decl.body),
    }
}

/// Get the name of a property key
pub fn prop_name_str(name: &swc_ast::PropName) -> Option<String> {
    match name {
        swc_ast::PropName::Ident(i) => Some(i.sym.to_string()),
        swc_ast::PropName::Str(s) => Some(wtf8_to_string(s)),
        swc_ast::PropName::Num(n) => Some(n.value.to_string()),
        swc_ast::PropName::BigInt(b) => Some(b.value.to_string()),
        swc_ast::PropName::Computed(_) => None, // Can't statically determine
    }
}
