//! # Document model
//!
//! ```text
//! Project ─┬─ pages: [Page] ── layout: Layout ── [Arc<Element>]
//!          ├─ activePageId
//!          └─ layout (legacy mirror of the active page)
//! ```
//!
//! Elements are shared behind `Arc` so that every layout edit produces a new
//! sequence while untouched elements stay pointer-equal to their previous
//! version.

use chrono::{DateTime, Utc};
use pagecraft_common::{route_for_name, HOME_PAGE_NAME};
use pagecraft_registry::{DataBag, SectionKind, DEFAULT_THEME};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Identity of an element within a layout
    ElementId
);
string_id!(
    /// Identity of a page within a project
    PageId
);
string_id!(
    /// Server-assigned identity of a stored project
    ProjectId
);

/// Id of the page every new project is seeded with
pub const HOME_PAGE_ID: &str = "home";

/// Default display name of a new project
pub const DEFAULT_PROJECT_NAME: &str = "Untitled Design";

/// A positioned section instance
///
/// Identity and type are fixed at creation; only the data bag is replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    id: ElementId,
    #[serde(rename = "type")]
    kind: SectionKind,
    #[serde(default)]
    data: DataBag,
}

impl Element {
    pub fn new(id: impl Into<ElementId>, kind: impl Into<SectionKind>, data: DataBag) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            data,
        }
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn kind(&self) -> &SectionKind {
        &self.kind
    }

    pub fn data(&self) -> &DataBag {
        &self.data
    }

    /// Same element with a different data bag
    pub fn with_data(&self, data: DataBag) -> Self {
        Self {
            id: self.id.clone(),
            kind: self.kind.clone(),
            data,
        }
    }

    /// Same type and data under a new identity
    pub fn cloned_as(&self, id: ElementId) -> Self {
        Self {
            id,
            kind: self.kind.clone(),
            data: self.data.clone(),
        }
    }
}

/// Ordered sequence of elements making up one page
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layout(Vec<Arc<Element>>);

impl Layout {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub(crate) fn from_shared(elements: Vec<Arc<Element>>) -> Self {
        Self(elements)
    }

    pub(crate) fn shared(&self) -> &[Arc<Element>] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.0.iter().map(|e| e.as_ref())
    }

    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.iter().find(|e| e.id() == id)
    }

    pub fn at(&self, index: usize) -> Option<&Element> {
        self.0.get(index).map(|e| e.as_ref())
    }

    pub fn position(&self, id: &ElementId) -> Option<usize> {
        self.0.iter().position(|e| e.id() == id)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.position(id).is_some()
    }

    pub fn ids(&self) -> Vec<&ElementId> {
        self.iter().map(Element::id).collect()
    }

    /// Whether the element at `index` is the same allocation in both layouts
    pub fn shares_element(&self, other: &Layout, index: usize) -> bool {
        match (self.0.get(index), other.0.get(index)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl FromIterator<Element> for Layout {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        Self(iter.into_iter().map(Arc::new).collect())
    }
}

/// One routable unit of a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub name: String,
    pub route: String,
    #[serde(default)]
    pub layout: Layout,
}

impl Page {
    /// Page whose route is derived from its name
    pub fn named(id: impl Into<PageId>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            route: route_for_name(&name),
            name,
            layout: Layout::new(),
        }
    }

    /// The page every project starts with
    pub fn home(layout: Layout) -> Self {
        Self {
            layout,
            ..Self::named(HOME_PAGE_ID, HOME_PAGE_NAME)
        }
    }
}

/// Project document as stored and exchanged with the persistence boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ProjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default = "default_project_name")]
    pub name: String,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub active_page_id: Option<PageId>,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_project_name() -> String {
    DEFAULT_PROJECT_NAME.to_string()
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

impl Project {
    /// Fresh project seeded with an empty "Home" page
    pub fn new(name: impl Into<String>) -> Self {
        let home = Page::home(Layout::new());
        Self {
            id: None,
            user_id: None,
            name: name.into(),
            layout: Layout::new(),
            active_page_id: Some(home.id.clone()),
            pages: vec![home],
            theme: default_theme(),
            is_public: false,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn page(&self, id: &PageId) -> Option<&Page> {
        self.pages.iter().find(|p| &p.id == id)
    }

    /// Active page, falling back to the first page for a stale pointer
    pub fn active_page(&self) -> Option<&Page> {
        self.active_page_id
            .as_ref()
            .and_then(|id| self.page(id))
            .or_else(|| self.pages.first())
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new(DEFAULT_PROJECT_NAME)
    }
}

/// Payload handed to the persistence boundary on save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    pub name: String,
    pub theme: String,
    pub layout: Layout,
    pub pages: Vec<Page>,
    pub active_page_id: PageId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_registry::SectionType;
    use serde_json::json;

    #[test]
    fn test_new_project_has_home_page() {
        let project = Project::new("Site");
        assert_eq!(project.pages.len(), 1);
        assert_eq!(project.pages[0].name, "Home");
        assert_eq!(project.pages[0].route, "/");
        assert_eq!(project.active_page().map(|p| p.id.as_str()), Some(HOME_PAGE_ID));
    }

    #[test]
    fn test_element_wire_shape() {
        let element = Element::new(
            "hero-1",
            SectionType::Hero,
            DataBag::new().with("heading", "Hi"),
        );
        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(json, json!({ "id": "hero-1", "type": "hero", "data": { "heading": "Hi" } }));
    }

    #[test]
    fn test_project_reads_mongo_style_document() {
        let doc = json!({
            "_id": "65f0",
            "userId": "u1",
            "name": "Legacy",
            "layout": [{ "id": "text-1", "type": "text", "data": {} }],
            "theme": "dark",
            "isPublic": true,
            "createdAt": "2024-03-01T10:00:00Z"
        });
        let project: Project = serde_json::from_value(doc).unwrap();
        assert_eq!(project.id, Some(ProjectId::new("65f0")));
        assert!(project.pages.is_empty());
        assert_eq!(project.layout.len(), 1);
        assert!(project.created_at.is_some());
    }

    #[test]
    fn test_stale_active_page_falls_back_to_first() {
        let mut project = Project::new("Site");
        project.active_page_id = Some(PageId::new("gone"));
        assert_eq!(project.active_page().map(|p| p.id.as_str()), Some(HOME_PAGE_ID));
    }
}
