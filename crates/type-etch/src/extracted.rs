//! Extracted documentation model
//!
//! The output of extraction is a tree of [`Extracted`] symbols grouped into
//! [`Module`]s. Both serialize as camelCase JSON, the same shape the generator
//! subprocess writes as its type-info listing.

use serde::{Deserialize, Serialize};

/// One documented symbol: a declaration or one of its members
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extracted {
    /// Identifier, unique among siblings
    pub name: String,

    /// Normalized description
    #[serde(default)]
    pub comment: String,

    /// Formatted signature text, never starting with `export`
    #[serde(default)]
    pub snippet: String,

    /// Deprecation message, present when the symbol is deprecated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,

    /// Documented members, in declaration order
    #[serde(default)]
    pub children: Vec<Extracted>,

    /// Rendered tag lines, in tag order
    #[serde(default)]
    pub bullets: Vec<String>,
}

impl Extracted {
    /// Create a symbol with only a name and snippet
    pub fn new(name: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            snippet: snippet.into(),
            ..Default::default()
        }
    }

    /// Apply `f` to every string field of this symbol and its children
    pub fn map_strings<F>(&mut self, f: &F)
    where
        F: Fn(&str) -> String,
    {
        self.name = f(&self.name);
        self.comment = f(&self.comment);
        self.snippet = f(&self.snippet);
        if let Some(deprecated) = &mut self.deprecated {
            *deprecated = f(deprecated);
        }
        for bullet in &mut self.bullets {
            *bullet = f(bullet);
        }
        for child in &mut self.children {
            child.map_strings(f);
        }
    }
}

/// A named group of exported values and types
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    /// Module name, e.g. `@sveltejs/kit` or `Private types`
    pub name: String,

    /// Module-level description
    #[serde(default)]
    pub comment: String,

    /// Values and functions, sorted by name
    #[serde(default)]
    pub exports: Vec<Extracted>,

    /// Types, interfaces, classes and namespaces, sorted by name
    #[serde(default)]
    pub types: Vec<Extracted>,

    /// Comment-only module assembled from a markdown fragment
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub exempt: bool,
}

impl Module {
    /// Create an empty module
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Find a type by name
    pub fn find_type(&self, name: &str) -> Option<&Extracted> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Remove a type by name, returning it
    pub fn take_type(&mut self, name: &str) -> Option<Extracted> {
        let index = self.types.iter().position(|t| t.name == name)?;
        Some(self.types.remove(index))
    }

    /// Sort exports and types by name
    pub fn sort(&mut self) {
        sort_by_name(&mut self.exports);
        sort_by_name(&mut self.types);
    }

    /// Apply `f` to every string field of the module and its symbols
    pub fn map_strings<F>(&mut self, f: &F)
    where
        F: Fn(&str) -> String,
    {
        self.name = f(&self.name);
        self.comment = f(&self.comment);
        for item in self.exports.iter_mut().chain(self.types.iter_mut()) {
            item.map_strings(f);
        }
    }
}

/// The two configuration types rendered on their own
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigTypes {
    /// Rendered as a single collapsed type block
    pub collapsed: Extracted,

    /// Rendered with one section per member
    pub expanded: Extracted,
}

/// Stable, case-sensitive sort by name
pub fn sort_by_name(items: &mut [Extracted]) {
    items.sort_by(|a, b| a.name.cmp(&b.name));
}

/// Stable, case-sensitive sort of modules by name
pub fn sort_modules(modules: &mut [Module]) {
    modules.sort_by(|a, b| a.name.cmp(&b.name));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_serializes_camel_case() {
        let mut module = Module::new("$app/paths");
        module.exports.push(Extracted::new("base", "const base: string;"));

        let json = serde_json::to_value(&module).unwrap();
        assert_eq!(json["name"], "$app/paths");
        assert_eq!(json["exports"][0]["snippet"], "const base: string;");
        assert!(json.get("exempt").is_none());
        assert!(json["exports"][0].get("deprecated").is_none());
    }

    #[test]
    fn test_deserializes_listing_entry() {
        let json = r#"{
            "name": "svelte",
            "comment": "",
            "exports": [{"name": "mount", "snippet": "function mount(): void;", "children": [], "bullets": []}],
            "types": []
        }"#;
        let module: Module = serde_json::from_str(json).unwrap();
        assert_eq!(module.exports[0].name, "mount");
        assert!(!module.exempt);
    }

    #[test]
    fn test_sort_is_case_sensitive() {
        let mut items = vec![
            Extracted::new("b", ""),
            Extracted::new("B", ""),
            Extracted::new("a", ""),
        ];
        sort_by_name(&mut items);
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["B", "a", "b"]);
    }

    #[test]
    fn test_take_type() {
        let mut module = Module::new("@sveltejs/kit");
        module.types.push(Extracted::new("Config", "interface Config {/*…*/}"));
        module.types.push(Extracted::new("Handle", "type Handle = () => void;"));

        let config = module.take_type("Config").unwrap();
        assert_eq!(config.name, "Config");
        assert_eq!(module.types.len(), 1);
        assert!(module.take_type("Config").is_none());
    }

    #[test]
    fn test_map_strings_reaches_children() {
        let mut parent = Extracted::new("Outer", "interface Outer {/*…*/}");
        let mut child = Extracted::new("inner", "inner: string;");
        child.bullets.push("- see /docs/x".to_string());
        child.deprecated = Some("use /docs/y".to_string());
        parent.children.push(child);

        parent.map_strings(&|s| s.replace("/docs/", "/ref/"));
        assert_eq!(parent.children[0].bullets[0], "- see /ref/x");
        assert_eq!(parent.children[0].deprecated.as_deref(), Some("use /ref/y"));
    }
}
