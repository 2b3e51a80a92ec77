//! # Link resolution
//!
//! A link stored in element data is one of:
//!
//! - `{ "kind": "none" }`
//! - `{ "kind": "internal", "pageId": "..." }`, resolved to the target page's
//!   current route so renaming a page re-points every link to it
//! - `{ "kind": "external", "url": "..." }`, opened in a new context
//! - a bare string (older documents), kept as [`LinkRef::Legacy`] until
//!   normalized
//!
//! Reading never fails: anything unrecognized becomes [`LinkRef::None`].

use crate::model::{ElementId, Page, PageId};
use pagecraft_registry::{DataBag, LinkSlot, SectionKind};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt;

const EMPTY_HREF: &str = "#";

/// Target attribute for links that open a new browsing context
pub const NEW_TAB_TARGET: &str = "_blank";

/// Rel attribute paired with [`NEW_TAB_TARGET`]
pub const NEW_TAB_REL: &str = "noopener noreferrer";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LinkRef {
    #[default]
    None,
    Internal {
        page_id: PageId,
    },
    External {
        url: String,
    },
    Legacy(String),
}

impl LinkRef {
    pub fn internal(page_id: impl Into<PageId>) -> Self {
        LinkRef::Internal { page_id: page_id.into() }
    }

    pub fn external(url: impl Into<String>) -> Self {
        LinkRef::External { url: url.into() }
    }

    /// Read a link from raw element data
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => LinkRef::Legacy(s.clone()),
            Value::Object(map) => {
                let kind = map
                    .get("kind")
                    .or_else(|| map.get("type"))
                    .and_then(Value::as_str)
                    .unwrap_or("none");
                let text = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);

                match (kind, text("pageId"), text("url")) {
                    ("internal", Some(page_id), _) if !page_id.is_empty() => {
                        LinkRef::Internal { page_id: PageId::new(page_id) }
                    }
                    ("external", _, Some(url)) => LinkRef::External { url },
                    _ => LinkRef::None,
                }
            }
            _ => LinkRef::None,
        }
    }

    /// Typed form of this link; legacy strings become external links,
    /// except the empty and placeholder values which become `None`
    pub fn normalize(self) -> Self {
        match self {
            LinkRef::Legacy(s) if s.is_empty() || s == EMPTY_HREF => LinkRef::None,
            LinkRef::Legacy(url) => LinkRef::External { url },
            LinkRef::External { url } if url.is_empty() => LinkRef::None,
            other => other,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            LinkRef::None => json!({ "kind": "none" }),
            LinkRef::Internal { page_id } => json!({ "kind": "internal", "pageId": page_id }),
            LinkRef::External { url } => json!({ "kind": "external", "url": url }),
            LinkRef::Legacy(s) => Value::String(s.clone()),
        }
    }

    /// Target page of an internal link
    pub fn page_id(&self) -> Option<&PageId> {
        match self {
            LinkRef::Internal { page_id } => Some(page_id),
            _ => None,
        }
    }
}

impl Serialize for LinkRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LinkRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|v| LinkRef::from_value(&v))
    }
}

/// Route lookup used by the resolver
pub trait RouteLookup {
    fn route_of(&self, page_id: &PageId) -> Option<&str>;
}

impl RouteLookup for [Page] {
    fn route_of(&self, page_id: &PageId) -> Option<&str> {
        self.iter()
            .find(|p| &p.id == page_id)
            .map(|p| p.route.as_str())
    }
}

impl RouteLookup for Vec<Page> {
    fn route_of(&self, page_id: &PageId) -> Option<&str> {
        self.as_slice().route_of(page_id)
    }
}

/// Page id to route table, detached from the pages themselves
///
/// Code generation runs against this map so that it never needs the
/// editor's navigation callback.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteMap(BTreeMap<PageId, String>);

impl RouteMap {
    pub fn from_pages(pages: &[Page]) -> Self {
        Self(
            pages
                .iter()
                .map(|p| (p.id.clone(), p.route.clone()))
                .collect(),
        )
    }

    pub fn insert(&mut self, page_id: PageId, route: impl Into<String>) {
        self.0.insert(page_id, route.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PageId, &str)> {
        self.0.iter().map(|(id, route)| (id, route.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl RouteLookup for RouteMap {
    fn route_of(&self, page_id: &PageId) -> Option<&str> {
        self.0.get(page_id).map(String::as_str)
    }
}

/// What activating a resolved link does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Default navigation is suppressed and nothing happens
    Suppressed,
    /// Default navigation proceeds
    Follow,
    /// Default navigation is suppressed and the editor switches page
    SwitchPage(PageId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub href: String,
    pub is_external: bool,
    pub new_tab: bool,
    pub activation: Activation,
}

impl ResolvedLink {
    fn inert() -> Self {
        Self {
            href: EMPTY_HREF.to_string(),
            is_external: false,
            new_tab: false,
            activation: Activation::Suppressed,
        }
    }

    pub fn target(&self) -> Option<&'static str> {
        self.new_tab.then_some(NEW_TAB_TARGET)
    }

    pub fn rel(&self) -> Option<&'static str> {
        self.new_tab.then_some(NEW_TAB_REL)
    }

    /// Run the activation; `switch_page` is called only for internal links.
    /// Returns whether default navigation should proceed.
    pub fn activate(&self, switch_page: impl FnOnce(&PageId)) -> bool {
        match &self.activation {
            Activation::Suppressed => false,
            Activation::Follow => true,
            Activation::SwitchPage(page_id) => {
                switch_page(page_id);
                false
            }
        }
    }
}

/// Resolve `link` against the current routes
///
/// Total over its input: dangling internal links and malformed values
/// resolve to an inert `#`.
pub fn resolve<R>(link: &LinkRef, routes: &R) -> ResolvedLink
where
    R: RouteLookup + ?Sized,
{
    match link {
        LinkRef::None => ResolvedLink::inert(),
        LinkRef::Internal { page_id } => match routes.route_of(page_id) {
            Some(route) => ResolvedLink {
                href: route.to_string(),
                is_external: false,
                new_tab: false,
                activation: Activation::SwitchPage(page_id.clone()),
            },
            None => ResolvedLink::inert(),
        },
        LinkRef::External { url } if url.is_empty() => ResolvedLink::inert(),
        LinkRef::External { url } => ResolvedLink {
            href: url.clone(),
            is_external: true,
            new_tab: true,
            activation: Activation::Follow,
        },
        LinkRef::Legacy(s) if s.is_empty() || s == EMPTY_HREF => ResolvedLink::inert(),
        LinkRef::Legacy(s) => ResolvedLink {
            href: s.clone(),
            is_external: true,
            new_tab: false,
            activation: Activation::Follow,
        },
    }
}

/// Position of a link inside an element's data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkLocation {
    pub field: &'static str,
    pub list: Option<(&'static str, usize)>,
}

impl fmt::Display for LinkLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.list {
            Some((list, index)) => write!(f, "{}[{}].{}", list, index, self.field),
            None => f.write_str(self.field),
        }
    }
}

/// Every link stored in `data`, in slot order
pub fn links_in(kind: &SectionKind, data: &DataBag) -> Vec<(LinkLocation, LinkRef)> {
    let mut found = Vec::new();
    for slot in kind.link_slots() {
        match *slot {
            LinkSlot::Field(field) => {
                if let Some(value) = data.get(field) {
                    found.push((LinkLocation { field, list: None }, LinkRef::from_value(value)));
                }
            }
            LinkSlot::ItemField { list, field } => {
                let items = data.get_array(list).map(Vec::as_slice).unwrap_or_default();
                for (index, item) in items.iter().enumerate() {
                    if let Some(value) = item.get(field) {
                        found.push((
                            LinkLocation { field, list: Some((list, index)) },
                            LinkRef::from_value(value),
                        ));
                    }
                }
            }
        }
    }
    found
}

/// Copy of `data` with every link slot rewritten in typed form
pub fn normalize_links(kind: &SectionKind, data: &DataBag) -> DataBag {
    let mut next = data.clone();
    for slot in kind.link_slots() {
        match *slot {
            LinkSlot::Field(field) => {
                if let Some(value) = next.get_mut(field) {
                    *value = LinkRef::from_value(value).normalize().to_value();
                }
            }
            LinkSlot::ItemField { list, field } => {
                if let Some(Value::Array(items)) = next.get_mut(list) {
                    for item in items.iter_mut() {
                        if let Some(value) = item.get_mut(field) {
                            *value = LinkRef::from_value(value).normalize().to_value();
                        }
                    }
                }
            }
        }
    }
    next
}

/// Internal link whose target page no longer exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingLink {
    pub page_id: PageId,
    pub element_id: ElementId,
    pub location: LinkLocation,
    pub target: PageId,
}

/// Internal links across `pages` that point at missing pages
pub fn dangling_links(pages: &[Page]) -> Vec<DanglingLink> {
    let mut dangling = Vec::new();
    for page in pages {
        for element in page.layout.iter() {
            for (location, link) in links_in(element.kind(), element.data()) {
                if let LinkRef::Internal { page_id: target } = link {
                    if pages.route_of(&target).is_none() {
                        dangling.push(DanglingLink {
                            page_id: page.id.clone(),
                            element_id: element.id().clone(),
                            location,
                            target,
                        });
                    }
                }
            }
        }
    }
    dangling
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Element;
    use pagecraft_registry::{default_data, SectionType};

    fn pages() -> Vec<Page> {
        vec![Page::named("home", "Home"), Page::named("p2", "About")]
    }

    #[test]
    fn test_internal_link_resolves_to_route() {
        let resolved = resolve(&LinkRef::internal("p2"), &pages());
        assert_eq!(resolved.href, "/about");
        assert!(!resolved.is_external);
        assert_eq!(resolved.target(), None);
        assert_eq!(resolved.activation, Activation::SwitchPage(PageId::new("p2")));
    }

    #[test]
    fn test_internal_link_follows_rename() {
        let mut pages = pages();
        pages[1] = Page::named("p2", "Contact Us");
        assert_eq!(resolve(&LinkRef::internal("p2"), &pages).href, "/contact-us");
    }

    #[test]
    fn test_dangling_internal_link_is_inert() {
        let resolved = resolve(&LinkRef::internal("deleted"), &pages());
        assert_eq!(resolved.href, "#");
        assert_eq!(resolved.activation, Activation::Suppressed);
    }

    #[test]
    fn test_external_link_opens_new_tab() {
        let resolved = resolve(&LinkRef::external("https://x.io"), &pages());
        assert_eq!(resolved.href, "https://x.io");
        assert!(resolved.is_external);
        assert_eq!(resolved.target(), Some("_blank"));
        assert_eq!(resolved.rel(), Some("noopener noreferrer"));
    }

    #[test]
    fn test_legacy_strings() {
        for empty in ["", "#"] {
            let resolved = resolve(&LinkRef::Legacy(empty.into()), &pages());
            assert_eq!(resolved.href, "#");
            assert!(!resolved.is_external);
        }
        let resolved = resolve(&LinkRef::Legacy("https://old.site".into()), &pages());
        assert_eq!(resolved.href, "https://old.site");
        assert!(resolved.is_external);
    }

    #[test]
    fn test_route_map_resolves_without_pages() {
        let routes = RouteMap::from_pages(&pages());
        assert_eq!(resolve(&LinkRef::internal("home"), &routes).href, "/");
    }

    #[test]
    fn test_activation_only_switches_for_internal() {
        let mut switched = None;
        let proceed = resolve(&LinkRef::internal("p2"), &pages()).activate(|id| switched = Some(id.clone()));
        assert!(!proceed);
        assert_eq!(switched, Some(PageId::new("p2")));

        let mut called = false;
        assert!(resolve(&LinkRef::external("https://x.io"), &pages()).activate(|_| called = true));
        assert!(!resolve(&LinkRef::None, &pages()).activate(|_| called = true));
        assert!(!called);
    }

    #[test]
    fn test_reading_accepts_every_shape() {
        assert_eq!(LinkRef::from_value(&json!("#")), LinkRef::Legacy("#".into()));
        assert_eq!(
            LinkRef::from_value(&json!({ "type": "internal", "pageId": "p2" })),
            LinkRef::internal("p2")
        );
        assert_eq!(LinkRef::from_value(&json!({ "kind": "internal" })), LinkRef::None);
        assert_eq!(LinkRef::from_value(&json!(42)), LinkRef::None);
        assert_eq!(LinkRef::from_value(&Value::Null), LinkRef::None);
    }

    #[test]
    fn test_normalize_rewrites_every_slot() {
        let data = default_data(SectionType::Navbar);
        let kind = SectionKind::from(SectionType::Navbar);
        let normalized = normalize_links(&kind, &data);

        let links = links_in(&kind, &normalized);
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].1, LinkRef::None);
        assert_eq!(links[1].1, LinkRef::external("#features"));
        assert_eq!(links[1].0.to_string(), "links[1].href");
    }

    #[test]
    fn test_dangling_links_are_reported() {
        let mut pages = pages();
        let hero = Element::new(
            "hero-1",
            SectionType::Hero,
            default_data(SectionType::Hero).with("buttonHref", LinkRef::internal("gone").to_value()),
        );
        pages[0].layout = [hero].into_iter().collect();

        let dangling = dangling_links(&pages);
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].target, PageId::new("gone"));
        assert_eq!(dangling[0].location.to_string(), "buttonHref");
    }
}
