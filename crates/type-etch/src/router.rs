//! Documentation route resolution
//!
//! Resolves `name/version/page` documentation paths against an index of
//! topics and pages. A bare `name` redirects to the latest version, a bare
//! `name/version` to the topic's first page.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Status used for every redirect
pub const REDIRECT_STATUS: u16 = 307;

/// A link to one page inside a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub slug: String,
    pub title: String,
}

/// A group of pages inside a topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub children: Vec<PageLink>,
}

/// One versioned documentation tree, e.g. `kit/v02`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Slug such as `docs/kit/v02`
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub children: Vec<Section>,
}

impl Topic {
    /// Slug of the first page of the first section
    pub fn first_page(&self) -> Option<&str> {
        self.children
            .first()
            .and_then(|s| s.children.first())
            .map(|p| p.slug.as_str())
    }
}

/// A rendered documentation page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub slug: String,
    pub title: String,
    pub body: String,
}

/// Topic layout returned for a full path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout<'a> {
    pub sections: &'a [Section],
    pub version: String,
    pub versions: Vec<String>,
}

/// Result of resolving a topic path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route<'a> {
    Redirect { location: String, status: u16 },
    Layout(Layout<'a>),
    NotFound,
}

/// Result of resolving a page path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRoute<'a> {
    Page(&'a Page),
    Redirect { location: String, status: u16 },
    NotFound,
}

/// Index of topics and pages, keyed by path, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocsIndex {
    /// Topics keyed by `name/version`
    pub topics: IndexMap<String, Topic>,
    /// Pages keyed by `name/version/page`
    pub pages: IndexMap<String, Page>,
}

fn redirect<'a>(slug: &str) -> Route<'a> {
    Route::Redirect {
        location: format!("/{}", slug),
        status: REDIRECT_STATUS,
    }
}

/// Whether `slug` ends with `{path}/v{digits}`
fn is_version_of(slug: &str, path: &str) -> bool {
    let digits = slug.trim_end_matches(|c: char| c.is_ascii_digit());
    if digits.len() == slug.len() {
        return false;
    }
    digits
        .strip_suffix("/v")
        .is_some_and(|rest| rest.ends_with(path))
}

impl DocsIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the topic layout for a documentation path
    pub fn resolve(&self, path: &str) -> Route<'_> {
        let mut parts = path.split('/');
        let name = parts.next().unwrap_or_default();
        let version = parts.next();
        let page = parts.next();

        let topic = version.and_then(|v| self.topics.get(&format!("{}/{}", name, v)));
        let Some(topic) = topic else {
            if version.is_none() {
                // topics are ordered, the last matching one is the latest
                let latest = self
                    .topics
                    .values()
                    .rev()
                    .find(|t| is_version_of(&t.slug, path))
                    .and_then(Topic::first_page);
                if let Some(first) = latest {
                    return redirect(first);
                }
            }
            return Route::NotFound;
        };

        if page.is_none() {
            return match topic.first_page() {
                Some(first) => redirect(first),
                None => Route::NotFound,
            };
        }

        let prefix = format!("{}/", name);
        let versions = self
            .topics
            .keys()
            .filter_map(|k| k.strip_prefix(&prefix))
            .map(|v| v.split('/').next().unwrap_or_default().to_string())
            .collect();

        Route::Layout(Layout {
            sections: &topic.children,
            version: version.unwrap_or_default().to_string(),
            versions,
        })
    }

    /// Look up a page, falling back to the layout's redirect
    pub fn page(&self, path: &str) -> PageRoute<'_> {
        if let Some(page) = self.pages.get(path) {
            return PageRoute::Page(page);
        }
        match self.resolve(path) {
            Route::Redirect { location, status } => PageRoute::Redirect { location, status },
            Route::Layout(_) | Route::NotFound => PageRoute::NotFound,
        }
    }
}
