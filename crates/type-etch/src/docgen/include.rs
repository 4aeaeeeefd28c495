//! Placeholder substitution
//!
//! Documentation pages embed generated reference text with
//! `<!-- @include Name -->` markers. Every marker must resolve: a missing
//! reference fails the whole run.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::diagnostics::{EtchError, EtchResult};
use crate::docgen::markdown::MarkdownRenderer;
use crate::extracted::{ConfigTypes, Module};

lazy_static! {
    /// `<!-- @include Name -->`
    pub static ref INCLUDE_MARKER: Regex = Regex::new(r"<!-- @include (.+?) -->").unwrap();
}

/// Everything a marker can reference
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    /// Modules, referenced by name
    pub modules: Vec<Module>,
    /// Configuration types, referenced by type name
    pub config: Option<ConfigTypes>,
    renderer: MarkdownRenderer,
}

impl ReferenceTable {
    /// Create a table of modules
    pub fn new(modules: Vec<Module>) -> Self {
        Self {
            modules,
            config: None,
            renderer: MarkdownRenderer::default(),
        }
    }

    /// Add the isolated configuration types
    pub fn with_config(mut self, config: ConfigTypes) -> Self {
        self.config = Some(config);
        self
    }

    /// Render the reference text for one marker name
    pub fn resolve(&self, name: &str) -> EtchResult<String> {
        if let Some(config) = &self.config {
            if name == config.collapsed.name {
                return Ok(self.renderer.render_type(&config.collapsed));
            }
            if name == config.expanded.name {
                return Ok(self.renderer.render_expanded_type(&config.expanded));
            }
        }

        self.modules
            .iter()
            .find(|m| m.name == name)
            .map(|m| self.renderer.render_module(m))
            .ok_or_else(|| EtchError::ReferenceNotFound(name.to_string()))
    }

    /// Replace every marker in `text`, failing on the first unknown name
    pub fn substitute(&self, text: &str) -> EtchResult<String> {
        let mut error = None;
        let replaced = INCLUDE_MARKER.replace_all(text, |caps: &Captures| {
            if error.is_some() {
                return String::new();
            }
            match self.resolve(&caps[1]) {
                Ok(rendered) => rendered,
                Err(e) => {
                    error = Some(e);
                    String::new()
                }
            }
        });

        match error {
            Some(e) => Err(e),
            None => Ok(replaced.into_owned()),
        }
    }
}

/// Whether the text still contains include markers
pub fn has_markers(text: &str) -> bool {
    INCLUDE_MARKER.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{mock_extracted, mock_extracted_with_children, mock_module};
    use pretty_assertions::assert_eq;

    fn table() -> ReferenceTable {
        let paths = mock_module(
            "$app/paths",
            vec![mock_extracted("base", "const base: string;")],
            vec![],
        );
        let config = ConfigTypes {
            collapsed: mock_extracted("Config", "interface Config {/*…*/}"),
            expanded: mock_extracted_with_children(
                "KitConfig",
                "interface KitConfig {/*…*/}",
                "",
                vec![mock_extracted("adapter", "adapter?: Adapter;")],
            ),
        };
        ReferenceTable::new(vec![paths]).with_config(config)
    }

    #[test]
    fn test_substitute_module() {
        let out = table()
            .substitute("# Paths\n\n<!-- @include $app/paths -->\n")
            .unwrap();
        assert!(out.starts_with("# Paths\n\n### base\n\n"));
        assert!(!has_markers(&out));
    }

    #[test]
    fn test_config_resolves_to_collapsed_type() {
        let out = table().substitute("<!-- @include Config -->").unwrap();
        assert_eq!(
            out,
            "<div class=\"ts-block\">\n\n```dts\ninterface Config {/*…*/}\n```\n\n</div>"
        );
    }

    #[test]
    fn test_expanded_config() {
        let out = table().substitute("<!-- @include KitConfig -->").unwrap();
        assert!(out.starts_with("## adapter\n\n```ts\nadapter?: Adapter;\n```"));
    }

    #[test]
    fn test_missing_reference_fails() {
        let err = table()
            .substitute("<!-- @include $app/paths -->\n<!-- @include $app/nowhere -->")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Reference not found in generated types: $app/nowhere"
        );
    }

    #[test]
    fn test_text_without_markers_is_unchanged() {
        let text = "---\ntitle: Types\n---\n\nNo markers here.\n";
        assert_eq!(table().substitute(text).unwrap(), text);
    }

    #[test]
    fn test_multiple_markers() {
        let out = table()
            .substitute("<!-- @include Config -->\n\n<!-- @include $app/paths -->")
            .unwrap();
        assert!(out.contains("interface Config"));
        assert!(out.contains("### base"));
        assert!(!has_markers(&out));
    }
}
