//! Declaration extraction
//!
//! Walks the statements of a declaration file (or the body of an ambient
//! module) and turns every exported class, interface, type alias, namespace,
//! variable and function into an [`Extracted`] entry.
//!
//! Interface and class bodies are documented member by member, so their
//! snippet collapses the body to `{/*…*/}`. The body is located with a brace
//! scan from the first and last member, which assumes no stray `{` or `}` in
//! the trivia between the opening brace and the first member.

use crate::diagnostics::{EtchError, EtchResult};
use crate::extracted::{sort_by_name, Extracted};
use crate::format::{format_snippet, FormatOptions};
use crate::member::{extract_members, Member};
use crate::utils::swc::{get_decl_name, ParsedModule};
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::{Span, Spanned};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Whitespace around a collapsed body
    static ref COLLAPSED_BODY: Regex = Regex::new(r"\s*(/\*…\*/)\s*").unwrap();
}

/// Marker that replaces a collapsed body
pub const COLLAPSED: &str = "/*…*/";

/// Kinds of exported declarations that are documented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Class,
    Interface,
    TypeAlias,
    Namespace,
    Variable,
    Function,
}

impl DeclKind {
    /// Classify a declaration, `None` for kinds that are not documented
    pub fn of(decl: &swc_ast::Decl) -> Option<Self> {
        match decl {
            swc_ast::Decl::Class(_) => Some(DeclKind::Class),
            swc_ast::Decl::TsInterface(_) => Some(DeclKind::Interface),
            swc_ast::Decl::TsTypeAlias(_) => Some(DeclKind::TypeAlias),
            swc_ast::Decl::TsModule(_) => Some(DeclKind::Namespace),
            swc_ast::Decl::Var(_) => Some(DeclKind::Variable),
            swc_ast::Decl::Fn(_) => Some(DeclKind::Function),
            swc_ast::Decl::TsEnum(_) | swc_ast::Decl::Using(_) => None,
        }
    }

    /// Values and functions are exports, everything else is a type
    pub fn is_value(&self) -> bool {
        matches!(self, DeclKind::Variable | DeclKind::Function)
    }
}

/// Exported values and types of one module body, each sorted by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub exports: Vec<Extracted>,
    pub types: Vec<Extracted>,
}

/// Extract every documented export from a list of module items
pub fn extract_declarations(
    parsed: &ParsedModule,
    items: &[swc_ast::ModuleItem],
    options: &FormatOptions,
) -> EtchResult<Extraction> {
    let mut extraction = Extraction::default();

    for item in items {
        let swc_ast::ModuleItem::ModuleDecl(swc_ast::ModuleDecl::ExportDecl(export)) = item else {
            continue;
        };
        let Some(kind) = DeclKind::of(&export.decl) else {
            continue;
        };
        let Some(name) = get_decl_name(&export.decl) else {
            continue;
        };

        let extracted = extract_declaration(parsed, export, kind, name, options)?;
        if kind.is_value() {
            extraction.exports.push(extracted);
        } else {
            extraction.types.push(extracted);
        }
    }

    sort_by_name(&mut extraction.exports);
    sort_by_name(&mut extraction.types);

    Ok(extraction)
}

fn extract_declaration(
    parsed: &ParsedModule,
    export: &swc_ast::ExportDecl,
    kind: DeclKind,
    name: String,
    options: &FormatOptions,
) -> EtchResult<Extracted> {
    let text = parsed.source_text();
    let doc = parsed.doc_for_span(export.span);

    let statement_start = parsed.byte_index(export.span.lo).min(text.len());
    let end = parsed.byte_index(export.span.hi).min(text.len());
    let start = text[statement_start..]
        .find("export")
        .map(|i| statement_start + i + "export".len())
        .unwrap_or(statement_start)
        .min(end);

    let (children, unformatted) = match (&export.decl, kind) {
        (swc_ast::Decl::TsInterface(iface), DeclKind::Interface) => {
            let members = &iface.body.body;
            let children = extract_members(parsed, members.iter().map(Member::Type), 1);
            let spans: Vec<Span> = members.iter().map(|m| m.span()).collect();
            (children, collapse_body(parsed, &name, &spans, start, end)?)
        }
        (swc_ast::Decl::Class(class), DeclKind::Class) => {
            let members = &class.class.body;
            let children = extract_members(parsed, members.iter().map(Member::Class), 1);
            let spans: Vec<Span> = members.iter().map(|m| m.span()).collect();
            (children, collapse_body(parsed, &name, &spans, start, end)?)
        }
        _ => (Vec::new(), text[start..end].to_string()),
    };

    let formatted = format_snippet(unformatted.trim(), options);
    let snippet = COLLAPSED_BODY
        .replace_all(&formatted, COLLAPSED)
        .trim()
        .to_string();

    tracing::debug!("extracted {:?} `{}`", kind, name);

    Ok(Extracted {
        name,
        comment: doc.normalized_description(),
        snippet,
        deprecated: doc.deprecation_notice(),
        children,
        bullets: doc.bullets(),
    })
}

/// Replace the member body between `start` and `end` with `/*…*/`.
///
/// Declarations without members are returned unchanged.
fn collapse_body(
    parsed: &ParsedModule,
    name: &str,
    members: &[Span],
    start: usize,
    end: usize,
) -> EtchResult<String> {
    let text = parsed.source_text();
    let (Some(first), Some(last)) = (members.first(), members.last()) else {
        return Ok(text[start..end].to_string());
    };

    let boundary = || EtchError::CollapseBoundary {
        name: name.to_string(),
    };

    let first_start = parsed.full_start(*first).clamp(start, end);
    let open = text[start..first_start]
        .rfind('{')
        .map(|i| start + i)
        .ok_or_else(boundary)?;

    let last_end = parsed.byte_index(last.hi).clamp(first_start, end);
    let close = text[last_end..end]
        .find('}')
        .map(|i| last_end + i)
        .ok_or_else(boundary)?;

    Ok(format!(
        "{}{}{}",
        &text[start..=open],
        COLLAPSED,
        &text[close..end]
    ))
}
