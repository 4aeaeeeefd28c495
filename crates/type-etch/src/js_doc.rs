//! JSDoc parsing and interpretation
//!
//! This module turns the raw text of a `/** ... */` comment into an
//! [`EtchDoc`]: a free-text description plus the structured tags that follow
//! it. It also owns the rules that derive the documentation artifacts from a
//! comment:
//!
//! - the normalized description (`/// type:` and `/// errors:` markers,
//!   two-space indentation rewritten to tabs)
//! - one rendered bullet line per recognized tag
//! - the deprecation notice
//! - the `private api` marker that hides a member from its parent

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    /// Regex for {@link ...} references
    static ref LINK_REGEX: Regex = Regex::new(
        r"\{@(?:link|linkcode|linkplain)\s+([^\s|}]+)[^}]*\}"
    ).unwrap();

    /// `/// type: X` inside example code
    static ref TYPE_MARKER_REGEX: Regex = Regex::new(r"/// type: (.+)").unwrap();

    /// `/// errors: X` inside example code
    static ref ERRORS_MARKER_REGEX: Regex = Regex::new(r"/// errors: (.+)").unwrap();

    /// Leading two-space indentation, one or more levels
    static ref INDENT_REGEX: Regex = Regex::new(r"(?m)^(?:  )+").unwrap();

    static ref PRIVATE_API_REGEX: Regex = Regex::new(r"(?i)private api").unwrap();
}

/// Tags that may start in the middle of a line (after whitespace).
///
/// Any `@name` at the start of a line is a tag; mid-line only these are, so
/// prose such as "install with npm @latest" stays in the description.
const INLINE_TAGS: &[&str] = &[
    "param",
    "default",
    "returns",
    "deprecated",
    "private",
    "readonly",
    "example",
    "see",
    "since",
    "throws",
    "type",
    "template",
];

/// Parsed JSDoc documentation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EtchDoc {
    /// Main description text, with `{@link}` references resolved
    pub description: String,

    /// Parsed JSDoc tags, in source order
    pub tags: Vec<JsDocTag>,
}

impl EtchDoc {
    /// Parse JSDoc from a comment string
    ///
    /// Accepts either the full `/** ... */` text or the comment body as SWC
    /// reports it (starting with the second `*`).
    pub fn parse(comment: &str) -> Self {
        let cleaned = clean_jsdoc_comment(comment);
        let resolved = resolve_links(&cleaned);
        let (description, raw_tags) = split_tags(&resolved);

        let tags = raw_tags
            .iter()
            .map(|(name, content)| parse_single_tag(name, content))
            .collect();

        Self {
            description: description.trim().to_string(),
            tags,
        }
    }

    /// Whether the description marks the symbol as private api
    pub fn is_private_api(&self) -> bool {
        PRIVATE_API_REGEX.is_match(&self.description)
    }

    /// Get @deprecated tag
    pub fn deprecated(&self) -> Option<&JsDocTag> {
        self.tags
            .iter()
            .find(|t| matches!(t, JsDocTag::Deprecated { .. }))
    }

    /// Message of the first @deprecated tag, empty when the tag has no text
    pub fn deprecation_notice(&self) -> Option<String> {
        match self.deprecated()? {
            JsDocTag::Deprecated { doc } => Some(doc.clone().unwrap_or_default()),
            _ => None,
        }
    }

    /// The description with example-code markers and indentation normalized
    pub fn normalized_description(&self) -> String {
        normalize_description(&self.description)
    }

    /// Render one bullet line per recognized tag, in source order
    pub fn bullets(&self) -> Vec<String> {
        self.tags.iter().filter_map(JsDocTag::bullet).collect()
    }
}

/// JSDoc tag types
#[derive(Debug, Clone, PartialEq)]
pub enum JsDocTag {
    /// @param {type} name - description
    Param {
        name: String,
        type_ref: Option<String>,
        doc: Option<String>,
    },

    /// @returns {type} description
    Returns {
        type_ref: Option<String>,
        doc: Option<String>,
    },

    /// @default value
    Default { value: String },

    /// @deprecated message
    Deprecated { doc: Option<String> },

    /// @private
    Private { doc: Option<String> },

    /// @readonly
    Readonly { doc: Option<String> },

    /// Unknown/custom tag
    Unknown { tag: String, value: String },
}

impl JsDocTag {
    /// Render the tag as a markdown bullet.
    ///
    /// Unrecognized tags are logged and produce no bullet.
    pub fn bullet(&self) -> Option<String> {
        let line = match self {
            JsDocTag::Private { doc } => {
                format!("- <span class=\"tag\">private</span> {}", text(doc))
            }
            JsDocTag::Readonly { doc } => {
                format!("- <span class=\"tag\">readonly</span> {}", text(doc))
            }
            JsDocTag::Param { name, doc, .. } => format!("- `{}` {}", name, text(doc)),
            JsDocTag::Default { value } => {
                format!("- <span class=\"tag\">default</span> `{}`", value)
            }
            JsDocTag::Returns { doc, .. } => {
                format!("- <span class=\"tag\">returns</span> {}", text(doc))
            }
            JsDocTag::Deprecated { doc } => format!(
                "- <span class=\"tag deprecated\">deprecated</span> {}",
                text(doc)
            ),
            JsDocTag::Unknown { tag, .. } => {
                tracing::warn!("unhandled JSDoc tag: {}", tag);
                return None;
            }
        };

        Some(line.trim_end().to_string())
    }
}

fn text(doc: &Option<String>) -> &str {
    doc.as_deref().unwrap_or("")
}

/// Apply the example-code rewrites to a description.
///
/// Doc comments cannot be nested inside the code examples of other doc
/// comments, so examples spell them as `/// type: X` and `/// errors: X`.
pub fn normalize_description(description: &str) -> String {
    let typed = TYPE_MARKER_REGEX.replace_all(description, |caps: &Captures| {
        let ty = caps[1].trim_end();
        if ty.starts_with('{') && ty.ends_with('}') {
            format!("/** @type {} */", ty)
        } else {
            format!("/** @type {{{}}} */", ty)
        }
    });

    let errors = ERRORS_MARKER_REGEX.replace_all(&typed, "// @errors: $1");

    INDENT_REGEX
        .replace_all(&errors, |caps: &Captures| "\t".repeat(caps[0].len() / 2))
        .into_owned()
}

/// Remove comment delimiters and the `*` gutter, keeping indentation past it
fn clean_jsdoc_comment(comment: &str) -> String {
    let mut lines = Vec::new();

    for (i, line) in comment.lines().enumerate() {
        let mut content = line;

        if i == 0 {
            content = content.trim_start();
            content = content
                .strip_prefix("/**")
                .or_else(|| content.strip_prefix('*'))
                .unwrap_or(content);
            content = content.strip_prefix(' ').unwrap_or(content);
        } else {
            let trimmed = content.trim_start();
            if let Some(rest) = trimmed.strip_prefix('*').filter(|_| !trimmed.starts_with("*/")) {
                content = rest.strip_prefix(' ').unwrap_or(rest);
            } else {
                content = trimmed;
            }
        }

        if let Some(stripped) = content.trim_end().strip_suffix("*/") {
            content = stripped;
        }

        lines.push(content.trim_end());
    }

    while lines.first().is_some_and(|l| l.is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

/// Replace `{@link Name}` segments with the referenced name in inline code
fn resolve_links(text: &str) -> String {
    LINK_REGEX
        .replace_all(text, |caps: &Captures| {
            let target = &caps[1];
            if target.starts_with("http://") || target.starts_with("https://") {
                target.to_string()
            } else {
                format!("`{}`", target)
            }
        })
        .into_owned()
}

/// Split cleaned comment text into the description and `(tag, content)` pairs
fn split_tags(text: &str) -> (String, Vec<(String, String)>) {
    let mut description = String::new();
    let mut tags: Vec<(String, String)> = Vec::new();
    let mut in_fence = false;

    for (i, line) in text.lines().enumerate() {
        let target = match tags.last_mut() {
            Some((_, content)) => content,
            None => &mut description,
        };
        if i > 0 {
            target.push('\n');
        }

        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            target.push_str(line);
            continue;
        }

        if in_fence {
            target.push_str(line);
            continue;
        }

        let starts = tag_starts(line);
        let head_end = starts.first().map(|(pos, _)| *pos).unwrap_or(line.len());
        target.push_str(&line[..head_end]);

        for (idx, (pos, name)) in starts.iter().enumerate() {
            let content_start = pos + 1 + name.len();
            let content_end = starts
                .get(idx + 1)
                .map(|(next, _)| *next)
                .unwrap_or(line.len());
            let content = line[content_start..content_end].trim_start();
            tags.push((name.clone(), content.to_string()));
        }
    }

    (description, tags)
}

/// Byte offsets and names of the tags that start on this line
fn tag_starts(line: &str) -> Vec<(usize, String)> {
    let mut starts = Vec::new();
    let first_non_ws = line.len() - line.trim_start().len();
    let mut in_code = false;
    let mut prev: Option<char> = None;

    for (pos, c) in line.char_indices() {
        match c {
            '`' => in_code = !in_code,
            '@' if !in_code => {
                let name: String = line[pos + 1..]
                    .chars()
                    .take_while(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
                    .collect();
                let after = line[pos + 1 + name.len()..].chars().next();
                let well_formed = name.starts_with(|ch: char| ch.is_ascii_alphabetic())
                    && after.is_none_or(char::is_whitespace);

                let at_line_start = pos == first_non_ws;
                let after_space = prev.is_some_and(char::is_whitespace)
                    && INLINE_TAGS.contains(&name.as_str());

                if well_formed && (at_line_start || after_space) {
                    starts.push((pos, name));
                }
            }
            _ => {}
        }
        prev = Some(c);
    }

    starts
}

/// Parse a single JSDoc tag
fn parse_single_tag(tag_name: &str, content: &str) -> JsDocTag {
    let content = content.trim();

    match tag_name {
        "param" | "arg" | "argument" => parse_param_tag(content),
        "returns" | "return" => parse_returns_tag(content),
        "default" | "defaultvalue" => JsDocTag::Default {
            value: content.to_string(),
        },
        "deprecated" => JsDocTag::Deprecated {
            doc: non_empty(content),
        },
        "private" => JsDocTag::Private {
            doc: non_empty(content),
        },
        "readonly" => JsDocTag::Readonly {
            doc: non_empty(content),
        },
        _ => JsDocTag::Unknown {
            tag: tag_name.to_string(),
            value: content.to_string(),
        },
    }
}

fn non_empty(content: &str) -> Option<String> {
    if content.is_empty() {
        None
    } else {
        Some(content.to_string())
    }
}

/// Parse @param tag content
fn parse_param_tag(content: &str) -> JsDocTag {
    let (type_ref, rest) = extract_type_and_rest(content);

    // Optional `[name]` or `[name=default]` syntax
    let (name, doc) = if rest.starts_with('[') {
        if let Some(bracket_end) = rest.find(']') {
            let bracket_content = &rest[1..bracket_end];
            let name = bracket_content
                .split('=')
                .next()
                .unwrap_or(bracket_content)
                .trim()
                .to_string();
            let after = rest[bracket_end + 1..].trim().trim_start_matches('-').trim();
            (name, non_empty(after))
        } else {
            (rest.to_string(), None)
        }
    } else {
        split_name_and_doc(rest)
    };

    JsDocTag::Param {
        name,
        type_ref,
        doc,
    }
}

/// Parse @returns tag content
fn parse_returns_tag(content: &str) -> JsDocTag {
    let (type_ref, rest) = extract_type_and_rest(content);

    JsDocTag::Returns {
        type_ref,
        doc: non_empty(rest.trim_start_matches('-').trim()),
    }
}

/// Extract type from {type} at start of content
fn extract_type_and_rest(content: &str) -> (Option<String>, &str) {
    if content.starts_with('{') {
        if let Some(close_pos) = find_matching_brace(content) {
            let type_str = &content[1..close_pos];
            let rest = content[close_pos + 1..].trim();
            return (Some(type_str.to_string()), rest);
        }
    }
    (None, content)
}

/// Find matching closing brace, handling nested braces
fn find_matching_brace(s: &str) -> Option<usize> {
    let mut depth = 0;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split "name - description" or "name description"
fn split_name_and_doc(s: &str) -> (String, Option<String>) {
    let s = s.trim();

    if let Some(dash_pos) = s.find(" - ") {
        let name = s[..dash_pos].trim().to_string();
        return (name, non_empty(s[dash_pos + 3..].trim()));
    }

    match s.find(char::is_whitespace) {
        Some(space_pos) => (s[..space_pos].to_string(), non_empty(s[space_pos..].trim())),
        None => (s.to_string(), None),
    }
}
