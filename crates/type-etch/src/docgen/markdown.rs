//! Markdown rendering of extracted symbols
//!
//! Produces the reference markup spliced into the documentation: a `dts`
//! code block per symbol followed by nested property blocks with their
//! bullets and descriptions.

use crate::extracted::{Extracted, Module};

/// Markdown renderer for extracted modules and types
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    /// Fence language of type and property snippets
    pub code_lang: String,
    /// Fence language of the sections of an expanded type
    pub section_lang: String,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self {
            code_lang: "dts".to_string(),
            section_lang: "ts".to_string(),
        }
    }
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::default()
    }

    /// Render one type: deprecation, comment, snippet, bullets and property blocks
    pub fn render_type(&self, item: &Extracted) -> String {
        let mut md = String::new();

        if let Some(notice) = &item.deprecated {
            md.push_str(&format!(
                "<blockquote class=\"tag deprecated\">\n\n{}\n\n</blockquote>\n\n",
                notice
            ));
        }

        if !item.comment.is_empty() {
            md.push_str(&item.comment);
            md.push_str("\n\n");
        }

        md.push_str("<div class=\"ts-block\">\n\n");
        md.push_str(&self.fence(&self.code_lang, &item.snippet));
        if !item.bullets.is_empty() {
            md.push_str("\n\n");
            md.push_str(&self.render_bullets(&item.bullets));
        }
        for child in &item.children {
            md.push_str("\n\n");
            md.push_str(&self.render_property(child));
        }
        md.push_str("\n\n</div>");

        md
    }

    /// Render a type with one `##` section per member
    pub fn render_expanded_type(&self, item: &Extracted) -> String {
        let mut sections = Vec::new();
        if !item.comment.is_empty() {
            sections.push(item.comment.clone());
        }

        for child in &item.children {
            let mut section = format!("## {}", child.name);

            if !child.bullets.is_empty() {
                section.push_str("\n\n");
                section.push_str(&self.render_bullets(&child.bullets));
            }

            section.push_str("\n\n");
            section.push_str(&self.fence(&self.section_lang, &child.snippet));

            if !child.comment.is_empty() {
                section.push_str("\n\n");
                section.push_str(&child.comment);
            }

            if !child.children.is_empty() {
                section.push_str("\n\n");
                section.push_str(&self.render_children(&child.children));
            }

            sections.push(section);
        }

        sections.join("\n\n")
    }

    /// Render a module: comment, exports, then a `## Types` section
    pub fn render_module(&self, module: &Module) -> String {
        let mut parts = Vec::new();

        if !module.comment.is_empty() {
            parts.push(module.comment.trim().to_string());
        }

        for export in &module.exports {
            parts.push(format!("### {}\n\n{}", export.name, self.render_type(export)));
        }

        if !module.types.is_empty() {
            parts.push("## Types".to_string());
            for ty in &module.types {
                parts.push(format!("### {}\n\n{}", ty.name, self.render_type(ty)));
            }
        }

        parts.join("\n\n")
    }

    /// Render one property block, recursing into its children
    fn render_property(&self, member: &Extracted) -> String {
        let mut md = String::from("<div class=\"ts-block-property\">\n\n");
        md.push_str(&self.fence(&self.code_lang, &member.snippet));
        md.push_str("\n\n<div class=\"ts-block-property-details\">");

        if !member.bullets.is_empty() {
            md.push_str("\n\n");
            md.push_str(&self.render_bullets(&member.bullets));
        }

        if !member.comment.is_empty() {
            md.push_str("\n\n");
            md.push_str(&member.comment);
        }

        if !member.children.is_empty() {
            md.push_str("\n\n");
            md.push_str(&self.render_children(&member.children));
        }

        md.push_str("\n\n</div>\n</div>");
        md
    }

    fn render_bullets(&self, bullets: &[String]) -> String {
        format!(
            "<div class=\"ts-block-property-bullets\">\n\n{}\n\n</div>",
            bullets.join("\n")
        )
    }

    fn render_children(&self, children: &[Extracted]) -> String {
        let blocks: Vec<String> = children.iter().map(|c| self.render_property(c)).collect();
        format!(
            "<div class=\"ts-block-property-children\">\n\n{}\n\n</div>",
            blocks.join("\n\n")
        )
    }

    fn fence(&self, lang: &str, code: &str) -> String {
        format!("```{}\n{}\n```", lang, code)
    }
}
