//! Documentation link rewriting
//!
//! Declaration comments link to the package's old documentation site. These
//! rules move the links under `/docs/kit/reference`. Each rule is applied
//! once per string, in table order.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::extracted::Module;

/// Slugs that moved into the reference section
const REFERENCE_SLUGS: &[&str] = &["cli", "modules", "types", "configuration"];

/// A link pattern and the function producing its replacement
pub struct LinkRule {
    pub pattern: Regex,
    pub rewrite: fn(&Captures) -> String,
}

impl LinkRule {
    fn new(pattern: &str, rewrite: fn(&Captures) -> String) -> Self {
        Self {
            pattern: Regex::new(pattern).unwrap(),
            rewrite,
        }
    }

    /// Apply the rule to every match in `text`
    pub fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, |caps: &Captures| (self.rewrite)(caps))
            .into_owned()
    }
}

lazy_static! {
    /// Link rules, applied in order
    pub static ref LINK_RULES: Vec<LinkRule> = vec![
        LinkRule::new(r"(https://kit\.svelte\.dev)?/docs/([^#)]+)", rewrite_reference_slug),
        LinkRule::new(
            r"/docs/kit/reference/modules#([^-]+)-([^-]+)-([^-)]+)",
            rewrite_module_anchor
        ),
        LinkRule::new(r"/docs/cli", |_| "/docs/kit/reference/cli".to_string()),
    ];
}

fn rewrite_reference_slug(caps: &Captures) -> String {
    let slug = &caps[2];
    if REFERENCE_SLUGS.contains(&slug) {
        format!("/docs/kit/reference/{}", slug)
    } else {
        caps[0].to_string()
    }
}

fn rewrite_module_anchor(caps: &Captures) -> String {
    let (p1, p2, p3) = (&caps[1], &caps[2], &caps[3]);
    if p1 == "$env" {
        format!("/docs/kit/reference/$env-all#{}-{}-{}", p1, p2, p3)
    } else {
        let scope = if p1 == "sveltejs" { "@sveltejs" } else { p1 };
        format!("/docs/kit/reference/{}-{}#{}", scope, p2, p3)
    }
}

/// Rewrite the documentation links in one string
pub fn rewrite_links(text: &str) -> String {
    LINK_RULES
        .iter()
        .fold(text.to_string(), |acc, rule| rule.apply(&acc))
}

/// Rewrite links in every string field of every module
pub fn rewrite_module_links(modules: &mut [Module]) {
    for module in modules {
        module.map_strings(&rewrite_links);
    }
}
