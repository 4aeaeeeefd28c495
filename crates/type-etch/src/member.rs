//! Member extraction
//!
//! Turns one member of an interface, class, or object-type literal into an
//! [`Extracted`] entry. Property signatures whose type is an object literal
//! with documented members are collapsed to `{/*…*/}` and recursed into.

use crate::extracted::Extracted;
use crate::utils::swc::{prop_name_str, ParsedModule};
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::{Span, Spanned};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LEADING_TAB: Regex = Regex::new(r"(?m)^\t").unwrap();
}

/// A member node of a type body
#[derive(Debug, Clone, Copy)]
pub enum Member<'a> {
    /// Interface or object-type literal element
    Type(&'a swc_ast::TsTypeElement),
    /// Class body element
    Class(&'a swc_ast::ClassMember),
}

impl<'a> Member<'a> {
    /// Source span of the member
    pub fn span(&self) -> Span {
        match self {
            Member::Type(element) => element.span(),
            Member::Class(member) => member.span(),
        }
    }

    /// Member name: the identifier, else the key source, else `unknown`
    pub fn name(&self, parsed: &ParsedModule) -> String {
        let name = match self {
            Member::Type(element) => type_element_name(parsed, element),
            Member::Class(member) => class_member_name(parsed, member),
        };
        name.unwrap_or_else(|| "unknown".to_string())
    }

    /// The object-type literal declared as this member's type, if any
    fn type_literal(self) -> Option<&'a swc_ast::TsTypeLit> {
        let Member::Type(swc_ast::TsTypeElement::TsPropertySignature(prop)) = self else {
            return None;
        };
        match prop.type_ann.as_deref()?.type_ann.as_ref() {
            swc_ast::TsType::TsTypeLit(lit) => Some(lit),
            _ => None,
        }
    }

    /// Whether the member contributes nothing to documentation
    fn is_empty(&self) -> bool {
        matches!(
            self,
            Member::Class(swc_ast::ClassMember::Empty(_) | swc_ast::ClassMember::StaticBlock(_))
        )
    }
}

fn expr_name(parsed: &ParsedModule, key: &swc_ast::Expr) -> String {
    match key {
        swc_ast::Expr::Ident(i) => i.sym.to_string(),
        _ => parsed.text_for_span(key.span()).to_string(),
    }
}

fn type_element_name(parsed: &ParsedModule, element: &swc_ast::TsTypeElement) -> Option<String> {
    match element {
        swc_ast::TsTypeElement::TsPropertySignature(prop) => Some(expr_name(parsed, &prop.key)),
        swc_ast::TsTypeElement::TsMethodSignature(method) => Some(expr_name(parsed, &method.key)),
        swc_ast::TsTypeElement::TsGetterSignature(getter) => Some(expr_name(parsed, &getter.key)),
        swc_ast::TsTypeElement::TsSetterSignature(setter) => Some(expr_name(parsed, &setter.key)),
        swc_ast::TsTypeElement::TsCallSignatureDecl(_)
        | swc_ast::TsTypeElement::TsConstructSignatureDecl(_)
        | swc_ast::TsTypeElement::TsIndexSignature(_) => None,
    }
}

fn prop_name(parsed: &ParsedModule, key: &swc_ast::PropName) -> String {
    prop_name_str(key).unwrap_or_else(|| parsed.text_for_span(key.span()).to_string())
}

fn class_member_name(parsed: &ParsedModule, member: &swc_ast::ClassMember) -> Option<String> {
    match member {
        swc_ast::ClassMember::Constructor(_) => Some("constructor".to_string()),
        swc_ast::ClassMember::Method(method) => Some(prop_name(parsed, &method.key)),
        swc_ast::ClassMember::PrivateMethod(method) => Some(format!("#{}", method.key.name)),
        swc_ast::ClassMember::ClassProp(prop) => Some(prop_name(parsed, &prop.key)),
        swc_ast::ClassMember::PrivateProp(prop) => Some(format!("#{}", prop.key.name)),
        swc_ast::ClassMember::AutoAccessor(accessor) => match &accessor.key {
            swc_ast::Key::Private(private) => Some(format!("#{}", private.name)),
            swc_ast::Key::Public(key) => Some(prop_name(parsed, key)),
        },
        swc_ast::ClassMember::TsIndexSignature(_)
        | swc_ast::ClassMember::Empty(_)
        | swc_ast::ClassMember::StaticBlock(_) => None,
    }
}

/// Member source, extended over a directly following `;` or `,`
fn member_range(parsed: &ParsedModule, span: Span) -> (usize, usize) {
    let text = parsed.source_text();
    let start = parsed.byte_index(span.lo).min(text.len());
    let mut end = parsed.byte_index(span.hi).min(text.len());
    if matches!(text.as_bytes().get(end), Some(b';') | Some(b',')) && !text[start..end].ends_with(';') {
        end += 1;
    }
    (start, end)
}

/// Strip one leading tab from every line, `times` times
fn dedent(snippet: &str, times: usize) -> String {
    let mut out = snippet.to_string();
    for _ in 0..times {
        out = LEADING_TAB.replace_all(&out, "").into_owned();
    }
    out
}

/// Extract one member at the given nesting depth (1 for direct members).
///
/// Returns `None` for members marked as private api and for empty class
/// elements.
pub fn extract_member(parsed: &ParsedModule, member: Member<'_>, depth: usize) -> Option<Extracted> {
    if member.is_empty() {
        return None;
    }

    let doc = parsed.doc_for_span(member.span());
    let name = member.name(parsed);

    if doc.is_private_api() {
        tracing::debug!("skipping private api member `{}`", name);
        return None;
    }

    let text = parsed.source_text();
    let (start, end) = member_range(parsed, member.span());

    let mut children = Vec::new();
    let raw = match member.type_literal() {
        Some(lit) if has_documented_member(parsed, lit) => {
            children = lit
                .members
                .iter()
                .filter_map(|m| extract_member(parsed, Member::Type(m), depth + 1))
                .collect();

            let lit_start = parsed.byte_index(lit.span.lo).clamp(start, end);
            let lit_end = parsed.byte_index(lit.span.hi).clamp(lit_start, end);
            format!("{}{{/*…*/}}{}", &text[start..lit_start], &text[lit_end..end])
        }
        _ => text[start..end].to_string(),
    };

    Some(Extracted {
        name,
        comment: doc.normalized_description(),
        snippet: dedent(&raw, depth + 1),
        deprecated: doc.deprecation_notice(),
        children,
        bullets: doc.bullets(),
    })
}

/// Extract every member of a body, in order, dropping filtered ones
pub fn extract_members<'a>(
    parsed: &ParsedModule,
    members: impl IntoIterator<Item = Member<'a>>,
    depth: usize,
) -> Vec<Extracted> {
    members
        .into_iter()
        .filter_map(|m| extract_member(parsed, m, depth))
        .collect()
}

fn has_documented_member(parsed: &ParsedModule, lit: &swc_ast::TsTypeLit) -> bool {
    lit.members
        .iter()
        .any(|m| !parsed.doc_for_span(m.span()).description.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::swc::parse_typescript_source;
    use pretty_assertions::assert_eq;

    fn interface_members(parsed: &ParsedModule) -> Vec<Extracted> {
        let module = parsed.module().unwrap();
        for item in &module.body {
            if let swc_ast::ModuleItem::ModuleDecl(swc_ast::ModuleDecl::ExportDecl(export)) = item {
                if let swc_ast::Decl::TsInterface(iface) = &export.decl {
                    return extract_members(parsed, iface.body.body.iter().map(Member::Type), 1);
                }
            }
        }
        panic!("no exported interface");
    }

    #[test]
    fn test_property_with_default_bullet() {
        let source = r#"export interface Options {
	/**
	 * Port to listen on
	 * @default 3000
	 */
	port: number;
}
"#;
        let parsed = parse_typescript_source("/tmp/options.d.ts", source).unwrap();
        let members = interface_members(&parsed);

        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name, "port");
        assert_eq!(members[0].comment, "Port to listen on");
        assert_eq!(members[0].snippet, "port: number;");
        assert_eq!(
            members[0].bullets,
            vec!["- <span class=\"tag\">default</span> `3000`".to_string()]
        );
    }

    #[test]
    fn test_private_api_member_is_dropped() {
        let source = r#"export interface Server {
	/** Start listening */
	listen(): void;
	/** Private API, do not use */
	internal: unknown;
}
"#;
        let parsed = parse_typescript_source("/tmp/server.d.ts", source).unwrap();
        let members = interface_members(&parsed);

        let names: Vec<_> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["listen"]);
    }

    #[test]
    fn test_nested_literal_is_collapsed() {
        let source = r#"export interface KitConfig {
	/** Path options */
	paths?: {
		/** An absolute path */
		assets?: string;
		/** A root-relative path */
		base?: string;
	};
}
"#;
        let parsed = parse_typescript_source("/tmp/kit.d.ts", source).unwrap();
        let members = interface_members(&parsed);

        let paths = &members[0];
        assert_eq!(paths.name, "paths");
        assert_eq!(paths.snippet, "paths?: {/*…*/};");
        assert_eq!(paths.children.len(), 2);
        assert_eq!(paths.children[0].name, "assets");
        assert_eq!(paths.children[0].snippet, "assets?: string;");
        assert_eq!(paths.children[1].comment, "A root-relative path");
    }

    #[test]
    fn test_undocumented_literal_is_kept_inline() {
        let source = r#"export interface Shape {
	/** Dimensions */
	size: {
		width: number;
		height: number;
	};
}
"#;
        let parsed = parse_typescript_source("/tmp/shape.d.ts", source).unwrap();
        let members = interface_members(&parsed);

        assert!(members[0].children.is_empty());
        // depth + 1 tabs are stripped, one more than this fixture indents
        assert_eq!(
            members[0].snippet,
            "size: {\nwidth: number;\nheight: number;\n};"
        );
    }

    #[test]
    fn test_method_and_signature_names() {
        let source = r#"export interface Callable {
	(input: string): void;
	'quoted-key': number;
	run(): void;
}
"#;
        let parsed = parse_typescript_source("/tmp/callable.d.ts", source).unwrap();
        let members = interface_members(&parsed);

        let names: Vec<_> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["unknown", "'quoted-key'", "run"]);
    }

    #[test]
    fn test_deprecated_member() {
        let source = r#"export interface Legacy {
	/**
	 * Old option
	 * @deprecated use `modern` instead
	 */
	old: boolean;
}
"#;
        let parsed = parse_typescript_source("/tmp/legacy.d.ts", source).unwrap();
        let members = interface_members(&parsed);

        assert_eq!(members[0].deprecated.as_deref(), Some("use `modern` instead"));
        assert_eq!(
            members[0].bullets,
            vec!["- <span class=\"tag deprecated\">deprecated</span> use `modern` instead".to_string()]
        );
    }

    #[test]
    fn test_class_members() {
        let source = r#"export class Server {
	/** Create a server */
	constructor(manifest: string);
	/** Respond to a request */
	respond(request: Request): Promise<Response>;
	#secret: string;
}
"#;
        let parsed = parse_typescript_source("/tmp/class.d.ts", source).unwrap();
        let module = parsed.module().unwrap();
        let class = match &module.body[0] {
            swc_ast::ModuleItem::ModuleDecl(swc_ast::ModuleDecl::ExportDecl(export)) => {
                match &export.decl {
                    swc_ast::Decl::Class(c) => c,
                    _ => panic!("expected class"),
                }
            }
            _ => panic!("expected export"),
        };

        let members = extract_members(&parsed, class.class.body.iter().map(Member::Class), 1);
        let names: Vec<_> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["constructor", "respond", "#secret"]);
        assert_eq!(members[1].comment, "Respond to a request");
    }

    #[test]
    fn test_dedent() {
        assert_eq!(dedent("a: {\n\t\t\tb: string;\n\t\t}", 2), "a: {\n\tb: string;\n}");
    }
}
