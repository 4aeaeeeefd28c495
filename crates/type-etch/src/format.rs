//! Snippet formatting
//!
//! A small deterministic formatter for declaration snippets. It is not a
//! general-purpose pretty printer: input is always a single declaration
//! signature taken from `.d.ts` source, so it only normalizes what varies
//! between authors:
//!
//! - quote style of string literals
//! - indentation (re-derived from bracket depth)
//! - runs of spaces, blank lines and trailing commas
//! - spacing after `:` `,` `;`, around `=` and `=>`, inside `{ … }`
//! - the terminating semicolon
//! - lines wider than the print width (parameter lists and unions)

use serde::{Deserialize, Serialize};

/// Formatter settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Target line width; a tab counts as [`TAB_WIDTH`] columns
    pub print_width: usize,
    /// Indent with tabs instead of two spaces
    pub use_tabs: bool,
    /// Prefer single-quoted string literals
    pub single_quote: bool,
    /// Keep trailing commas before closing brackets
    pub trailing_comma: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            print_width: 60,
            use_tabs: true,
            single_quote: true,
            trailing_comma: false,
        }
    }
}

/// Display width of a tab
pub const TAB_WIDTH: usize = 2;

/// Declarations whose block body is not followed by a semicolon
const BLOCK_DECLARATIONS: &[&str] = &["interface", "class", "namespace", "module", "enum", "global"];

/// Leading modifiers skipped when classifying a declaration
const MODIFIERS: &[&str] = &["export", "declare", "abstract", "default", "async"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    Block,
    Template,
}

/// One scanned source line
#[derive(Debug)]
struct Line {
    text: String,
    /// Lexer state at the start of the line
    opens_in: State,
    /// Closing brackets before any other code on the line
    leading_closers: isize,
    /// Net bracket depth change across the line
    delta: isize,
}

/// Format a declaration snippet
pub fn format_snippet(source: &str, options: &FormatOptions) -> String {
    let lines = scan_lines(source, options);
    let mut lines = indent_lines(lines, options);

    if !options.trailing_comma {
        strip_dangling_commas(&mut lines);
    }

    let mut lines = collapse_blank_lines(lines);
    terminate_statement(&mut lines);

    lines
        .iter()
        .flat_map(|line| break_long_line(line, options))
        .collect::<Vec<_>>()
        .join("\n")
}

fn scan_lines(source: &str, options: &FormatOptions) -> Vec<Line> {
    let mut state = State::Code;
    let mut lines = Vec::new();

    for raw in source.lines() {
        let opens_in = state;
        let content = if opens_in == State::Template {
            raw
        } else {
            raw.trim()
        };

        let chars: Vec<char> = content.chars().collect();
        let mut out = String::new();
        let mut leading_closers = 0;
        let mut delta = 0;
        let mut seen_code = false;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            let next = chars.get(i + 1).copied();

            match state {
                State::Block => {
                    out.push(c);
                    if c == '*' && next == Some('/') {
                        out.push('/');
                        i += 1;
                        state = State::Code;
                    }
                }
                State::Template => {
                    out.push(c);
                    if c == '\\' {
                        if let Some(n) = next {
                            out.push(n);
                            i += 1;
                        }
                    } else if c == '`' {
                        state = State::Code;
                    }
                }
                State::Code => match c {
                    '/' if next == Some('/') => {
                        out.extend(&chars[i..]);
                        break;
                    }
                    '/' if next == Some('*') => {
                        out.push_str("/*");
                        i += 1;
                        state = State::Block;
                        seen_code = true;
                    }
                    '"' | '\'' => {
                        let end = string_end(&chars, i);
                        let literal: String = chars[i..end].iter().collect();
                        out.push_str(&requote(&literal, options));
                        i = end;
                        seen_code = true;
                        continue;
                    }
                    '`' => {
                        out.push(c);
                        state = State::Template;
                        seen_code = true;
                    }
                    ' ' | '\t' => {
                        if !out.is_empty() && !out.ends_with(' ') {
                            out.push(' ');
                        }
                    }
                    '{' => {
                        if out.ends_with(|p: char| p.is_alphanumeric() || matches!(p, '>' | ')' | ']')) {
                            out.push(' ');
                        }
                        out.push(c);
                        if next.is_some_and(|n| !n.is_whitespace() && !matches!(n, '}' | '/')) {
                            out.push(' ');
                        }
                        delta += 1;
                        seen_code = true;
                    }
                    '(' | '[' => {
                        out.push(c);
                        delta += 1;
                        seen_code = true;
                    }
                    '}' | ')' | ']' => {
                        if !options.trailing_comma {
                            let kept = out.trim_end().len();
                            if out[..kept].ends_with(',') {
                                out.truncate(kept - 1);
                                let kept = out.trim_end().len();
                                out.truncate(kept);
                            }
                        }
                        if !seen_code {
                            leading_closers += 1;
                        } else if c == '}' && !out.ends_with([' ', '{']) && !out.ends_with("*/") {
                            out.push(' ');
                        }
                        out.push(c);
                        delta -= 1;
                    }
                    '=' if next == Some('>') => {
                        pad(&mut out);
                        out.push_str("=>");
                        i += 1;
                        space_after(&mut out, chars.get(i + 1).copied());
                        seen_code = true;
                    }
                    '=' => {
                        let compound = next == Some('=') || out.ends_with(['=', '!', '<']);
                        if !compound {
                            pad(&mut out);
                        }
                        out.push(c);
                        if !compound {
                            space_after(&mut out, next);
                        }
                        seen_code = true;
                    }
                    ':' | ',' | ';' => {
                        out.push(c);
                        space_after(&mut out, next);
                        seen_code = true;
                    }
                    _ => {
                        out.push(c);
                        seen_code = true;
                    }
                },
            }

            i += 1;
        }

        let text = if opens_in == State::Template {
            out
        } else {
            out.trim_end().to_string()
        };

        lines.push(Line {
            text,
            opens_in,
            leading_closers,
            delta,
        });
    }

    lines
}

/// Separate the last token from the previous one
fn pad(out: &mut String) {
    if !out.is_empty() && !out.ends_with(' ') {
        out.push(' ');
    }
}

/// Space after a separator, unless the line or a bracket ends right there
fn space_after(out: &mut String, next: Option<char>) {
    if next.is_some_and(|n| !n.is_whitespace() && !matches!(n, '}' | ')' | ']' | ',' | ';')) {
        out.push(' ');
    }
}

/// Index one past the closing quote of the literal starting at `start`
fn string_end(chars: &[char], start: usize) -> usize {
    let quote = chars[start];
    let mut i = start + 1;

    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }

    chars.len()
}

/// Switch a string literal to the preferred quote when that needs no escapes
fn requote(literal: &str, options: &FormatOptions) -> String {
    let (from, to) = if options.single_quote {
        ('"', '\'')
    } else {
        ('\'', '"')
    };

    let closed = literal.len() >= 2 && literal.ends_with(from);
    if !literal.starts_with(from) || !closed {
        return literal.to_string();
    }

    let inner = &literal[1..literal.len() - 1];
    if inner.contains(to) {
        return literal.to_string();
    }

    let unescaped = inner.replace(&format!("\\{}", from), &from.to_string());
    format!("{}{}{}", to, unescaped, to)
}

fn indent_unit(options: &FormatOptions) -> &'static str {
    if options.use_tabs {
        "\t"
    } else {
        "  "
    }
}

fn indent_lines(lines: Vec<Line>, options: &FormatOptions) -> Vec<(String, State)> {
    let unit = indent_unit(options);
    let mut depth: isize = 0;
    let mut out = Vec::with_capacity(lines.len());

    for line in lines {
        let formatted = match line.opens_in {
            State::Template => line.text,
            _ if line.text.is_empty() => String::new(),
            State::Block => {
                let prefix = if line.text.starts_with('*') { " " } else { "" };
                format!("{}{}{}", unit.repeat(depth.max(0) as usize), prefix, line.text)
            }
            State::Code => {
                let level = (depth - line.leading_closers).max(0) as usize;
                format!("{}{}", unit.repeat(level), line.text)
            }
        };

        depth += line.delta;
        out.push((formatted, line.opens_in));
    }

    out
}

/// Remove a trailing comma when the next line closes the bracket
fn strip_dangling_commas(lines: &mut [(String, State)]) {
    for i in 0..lines.len() {
        let (text, state) = &lines[i];
        if *state != State::Code || !text.ends_with(',') || text.contains("//") {
            continue;
        }

        let closes = lines[i + 1..]
            .iter()
            .map(|(t, _)| t.trim())
            .find(|t| !t.is_empty())
            .is_some_and(|t| t.starts_with(['}', ')', ']']));

        if closes {
            lines[i].0.pop();
        }
    }
}

fn collapse_blank_lines(lines: Vec<(String, State)>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());

    for (text, _) in lines {
        if text.trim().is_empty() {
            if out.last().is_some_and(|l| !l.is_empty()) {
                out.push(String::new());
            }
        } else {
            out.push(text);
        }
    }

    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }

    out
}

/// Append the statement-terminating semicolon where one belongs
fn terminate_statement(lines: &mut [String]) {
    let Some(first) = lines.first() else {
        return;
    };

    let mut head = first.trim_start();
    loop {
        let stripped = MODIFIERS.iter().find_map(|m| {
            head.strip_prefix(*m)
                .filter(|rest| rest.starts_with(' '))
                .map(str::trim_start)
        });
        match stripped {
            Some(rest) => head = rest,
            None => break,
        }
    }
    let keyword = head
        .split(|c: char| !c.is_alphanumeric())
        .next()
        .unwrap_or("")
        .to_string();

    let Some(last) = lines.last_mut() else {
        return;
    };
    let end = last.trim_end();

    if end.ends_with(';') || end.contains("//") || end.ends_with("*/") {
        return;
    }
    if end.ends_with('}') && BLOCK_DECLARATIONS.contains(&keyword.as_str()) {
        return;
    }

    last.push(';');
}

/// Columns occupied by a line
pub fn display_width(line: &str) -> usize {
    line.chars()
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}

fn break_long_line(line: &str, options: &FormatOptions) -> Vec<String> {
    if display_width(line) <= options.print_width {
        return vec![line.to_string()];
    }

    let body = line.trim_start();
    let indent = &line[..line.len() - body.len()];

    break_union(indent, body, options)
        .or_else(|| break_parens(indent, body, options))
        .unwrap_or_else(|| vec![line.to_string()])
}

/// `type A = B | C | D` → one leading-`|` member per line
fn break_union(indent: &str, body: &str, options: &FormatOptions) -> Option<Vec<String>> {
    if !(body.starts_with("type ") || body.starts_with("declare type ")) {
        return None;
    }

    let eq = find_top_level(body, '=')?;
    let (lhs, rhs) = (body[..eq].trim_end(), body[eq + 1..].trim());
    let (rhs, semi) = match rhs.strip_suffix(';') {
        Some(rest) => (rest.trim_end(), ";"),
        None => (rhs, ""),
    };

    let parts: Vec<String> = split_top_level(rhs, '|')
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() < 2 {
        return None;
    }

    let unit = indent_unit(options);
    let mut out = vec![format!("{}{} =", indent, lhs)];
    let last = parts.len() - 1;
    for (i, part) in parts.iter().enumerate() {
        let end = if i == last { semi } else { "" };
        out.push(format!("{}{}| {}{}", indent, unit, part, end));
    }

    Some(out)
}

/// `f(a, b): T` → one parameter per line
fn break_parens(indent: &str, body: &str, options: &FormatOptions) -> Option<Vec<String>> {
    let open = find_top_level(body, '(')?;
    let close = matching_close(body, open)?;

    let inner = body[open + 1..close].trim();
    if inner.is_empty() {
        return None;
    }

    let unit = indent_unit(options);
    let items = split_top_level(inner, ',');
    let last = items.len() - 1;

    let mut out = vec![format!("{}{}", indent, &body[..=open])];
    for (i, item) in items.iter().enumerate() {
        let comma = if i < last || options.trailing_comma { "," } else { "" };
        out.push(format!("{}{}{}{}", indent, unit, item.trim(), comma));
    }
    out.push(format!("{}{}", indent, &body[close..]));

    Some(out)
}

/// Byte offset of the first `target` outside brackets and string literals
fn find_top_level(s: &str, target: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut prev = '\0';

    for (i, c) in s.char_indices() {
        if let Some(q) = quote {
            if c == q && prev != '\\' {
                quote = None;
            }
        } else if c == target && depth == 0 {
            // `=>` is never an assignment
            let arrow = target == '=' && s[i + 1..].starts_with('>');
            if !arrow {
                return Some(i);
            }
        } else {
            match c {
                '\'' | '"' | '`' => quote = Some(c),
                '(' | '[' | '{' | '<' => depth += 1,
                '>' if prev == '=' => {}
                ')' | ']' | '}' | '>' => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        prev = c;
    }

    None
}

/// Byte offset of the bracket closing the one at `open`
fn matching_close(s: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut prev = '\0';

    for (i, c) in s[open..].char_indices() {
        if let Some(q) = quote {
            if c == q && prev != '\\' {
                quote = None;
            }
        } else {
            match c {
                '\'' | '"' | '`' => quote = Some(c),
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(open + i);
                    }
                }
                _ => {}
            }
        }
        prev = c;
    }

    None
}

/// Split on `sep` where it is not nested in brackets or literals
fn split_top_level(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut prev = '\0';
    let mut start = 0;

    for (i, c) in s.char_indices() {
        if let Some(q) = quote {
            if c == q && prev != '\\' {
                quote = None;
            }
        } else if c == sep && depth == 0 {
            parts.push(&s[start..i]);
            start = i + c.len_utf8();
        } else {
            match c {
                '\'' | '"' | '`' => quote = Some(c),
                '(' | '[' | '{' | '<' => depth += 1,
                '>' if prev == '=' => {}
                ')' | ']' | '}' | '>' => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        prev = c;
    }

    parts.push(&s[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fmt(source: &str) -> String {
        format_snippet(source, &FormatOptions::default())
    }

    #[test]
    fn test_adds_semicolon() {
        assert_eq!(fmt("const port: number"), "const port: number;");
        assert_eq!(fmt("const port: number;"), "const port: number;");
    }

    #[test]
    fn test_block_declarations_keep_no_semicolon() {
        assert_eq!(fmt("interface Foo {/*…*/}"), "interface Foo {/*…*/}");
        assert_eq!(
            fmt("class Server<T> extends Base {/*…*/}"),
            "class Server<T> extends Base {/*…*/}"
        );
    }

    #[test]
    fn test_type_literal_alias_gets_semicolon() {
        assert_eq!(fmt("type A = { a: string }"), "type A = { a: string };");
    }

    #[test]
    fn test_single_quotes() {
        assert_eq!(
            fmt(r#"type Mode = "a" | "b";"#),
            "type Mode = 'a' | 'b';"
        );
        assert_eq!(
            fmt(r#"type Q = "it's";"#),
            r#"type Q = "it's";"#
        );
    }

    #[test]
    fn test_double_quotes_when_configured() {
        let options = FormatOptions {
            single_quote: false,
            ..FormatOptions::default()
        };
        assert_eq!(
            format_snippet("type Mode = 'a';", &options),
            r#"type Mode = "a";"#
        );
    }

    #[test]
    fn test_reindent_and_trailing_commas() {
        let source = "type X = {\n    a: string,\n    b: number,\n\n\n    c: {\n        d: boolean,\n    },\n}";
        assert_eq!(
            fmt(source),
            "type X = {\n\ta: string,\n\tb: number,\n\n\tc: {\n\t\td: boolean\n\t}\n};"
        );
    }

    #[test]
    fn test_inline_trailing_comma() {
        assert_eq!(fmt("function f(a: string,): void"), "function f(a: string): void;");
    }

    #[test]
    fn test_collapse_spaces() {
        assert_eq!(fmt("const   a:   'x  y'"), "const a: 'x  y';");
    }

    #[test]
    fn test_block_comment_continuation() {
        let source = "type X = {\n/**\n* Doc\n*/\nfoo: string;\n}";
        assert_eq!(fmt(source), "type X = {\n\t/**\n\t * Doc\n\t */\n\tfoo: string;\n};");
    }

    #[test]
    fn test_break_parameters() {
        let source = "function load(first_argument: string, second_argument: number): void;";
        assert_eq!(
            fmt(source),
            "function load(\n\tfirst_argument: string,\n\tsecond_argument: number\n): void;"
        );
    }

    #[test]
    fn test_break_union() {
        let source = "type Thing = 'aaaaaaaaaa' | 'bbbbbbbbbbbb' | 'cccccccccccc' | 'ddddddddddd';";
        assert_eq!(
            fmt(source),
            "type Thing =\n\t| 'aaaaaaaaaa'\n\t| 'bbbbbbbbbbbb'\n\t| 'cccccccccccc'\n\t| 'ddddddddddd';"
        );
    }

    #[test]
    fn test_generics_are_not_split() {
        assert_eq!(
            split_top_level("a: Record<string, number>, b: () => void", ','),
            vec!["a: Record<string, number>", " b: () => void"]
        );
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let source = "function load(first_argument: string, second_argument: number): void;";
        let once = fmt(source);
        assert_eq!(fmt(&once), once);
    }

    #[test]
    fn test_compact_signature_is_spaced() {
        assert_eq!(
            fmt("function f(a:string,b?:number):void;"),
            "function f(a: string, b?: number): void;"
        );
        assert_eq!(
            fmt("const cb:(req:Request)=>Promise<void>"),
            "const cb: (req: Request) => Promise<void>;"
        );
    }

    #[test]
    fn test_compact_type_literal_is_padded() {
        assert_eq!(
            fmt("type A={a:string,b:number};"),
            "type A = { a: string, b: number };"
        );
        assert_eq!(fmt("type E = {};"), "type E = {};");
    }

    #[test]
    fn test_compact_header_keeps_collapsed_body() {
        assert_eq!(
            fmt("interface I<T={}> extends Base<{x:1}>{/*…*/}"),
            "interface I<T = {}> extends Base<{ x: 1 }> {/*…*/}"
        );
    }

    #[test]
    fn test_spacing_is_idempotent() {
        let once = fmt("type A={a:string;b:(x:number)=>void};");
        assert_eq!(once, "type A = { a: string; b: (x: number) => void };");
        assert_eq!(fmt(&once), once);
    }

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("\t\tab"), 6);
    }
}
