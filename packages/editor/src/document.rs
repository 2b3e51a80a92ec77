//! # Project document
//!
//! Editing-time state of one project: its pages, the active page pointer and
//! the working copy of the active page's layout.
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Normalize → Edit → Commit → Snapshot
//!   ↓        ↓         ↓       ↓         ↓
//! JSON   Home page   Layout  pages[i]  Save payload
//! ```
//!
//! Layout edits go to the working copy only. Every transition that leaves
//! the active page (switch, delete, save) first commits the working copy
//! back into its page entry, so edits are never lost on navigation.
//!
//! Transitions take `&self` and return the next document; the current one is
//! left as it was.

use crate::links::{normalize_links, RouteMap};
use crate::model::{Element, Layout, Page, PageId, Project, ProjectId, ProjectSnapshot};
use crate::mutations::{NoopReason, Outcome};
use crate::EditorError;
use chrono::{DateTime, Utc};
use pagecraft_common::{route_for_name, IdGenerator};
use std::path::Path;

/// Editable project
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Option<ProjectId>,
    pub owner: Option<String>,
    pub name: String,
    pub theme: String,
    pub is_public: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,

    /// Increments on every applied transition
    pub version: u64,

    pages: Vec<Page>,
    active_page_id: PageId,
    layout: Layout,
}

/// Result of a document transition
#[derive(Debug, Clone)]
pub struct Transition {
    pub document: Document,
    pub outcome: Outcome,
    /// Id of the page an `add_page` created
    pub new_page: Option<PageId>,
}

impl Transition {
    fn applied(document: Document) -> Self {
        Self { document, outcome: Outcome::Applied, new_page: None }
    }

    fn noop(document: &Document, reason: NoopReason) -> Self {
        Self { document: document.clone(), outcome: Outcome::Noop(reason), new_page: None }
    }

    pub fn is_applied(&self) -> bool {
        self.outcome.is_applied()
    }
}

fn normalize_layout(layout: &Layout) -> Layout {
    layout
        .iter()
        .map(|e| e.with_data(normalize_links(e.kind(), e.data())))
        .collect()
}

impl Document {
    /// Build a document from a stored project
    ///
    /// Documents without pages get a "Home" page holding their top-level
    /// layout, a stale active page pointer falls back to the first page and
    /// bare-string links are rewritten in typed form.
    pub fn from_project(project: Project) -> Self {
        let mut pages: Vec<Page> = project
            .pages
            .into_iter()
            .map(|page| Page { layout: normalize_layout(&page.layout), ..page })
            .collect();
        if pages.is_empty() {
            pages.push(Page::home(normalize_layout(&project.layout)));
        }

        let active = project
            .active_page_id
            .filter(|id| pages.iter().any(|p| &p.id == id))
            .unwrap_or_else(|| pages[0].id.clone());
        let layout = pages
            .iter()
            .find(|p| p.id == active)
            .map(|p| p.layout.clone())
            .unwrap_or_default();

        Self {
            id: project.id,
            owner: project.user_id,
            name: project.name,
            theme: project.theme,
            is_public: project.is_public,
            created_at: project.created_at,
            updated_at: project.updated_at,
            version: 0,
            pages,
            active_page_id: active,
            layout,
        }
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self::from_project(Project::new(name))
    }

    pub fn from_json(source: &str) -> Result<Self, EditorError> {
        let project: Project = serde_json::from_str(source)?;
        Ok(Self::from_project(project))
    }

    /// Load a project file from disk
    pub fn load(path: &Path) -> Result<Self, EditorError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json(&source)
    }

    /// Write the committed document to disk as pretty JSON
    pub fn save_to(&self, path: &Path) -> Result<(), EditorError> {
        let json = serde_json::to_string_pretty(&self.to_project())?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Stored form of the document, with the working layout committed
    pub fn to_project(&self) -> Project {
        let committed = self.committed();
        Project {
            id: committed.id.clone(),
            user_id: committed.owner.clone(),
            name: committed.name.clone(),
            layout: committed.layout.clone(),
            active_page_id: Some(committed.active_page_id.clone()),
            pages: committed.pages,
            theme: committed.theme,
            is_public: committed.is_public,
            created_at: committed.created_at,
            updated_at: committed.updated_at,
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, id: &PageId) -> Option<&Page> {
        self.pages.iter().find(|p| &p.id == id)
    }

    pub fn active_page_id(&self) -> &PageId {
        &self.active_page_id
    }

    /// Active page entry; its layout may lag the working copy until commit
    pub fn active_page(&self) -> Option<&Page> {
        self.page(&self.active_page_id)
    }

    /// Working copy of the active page's layout
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn element(&self, id: &crate::model::ElementId) -> Option<&Element> {
        self.layout.get(id)
    }

    /// Routes of the current pages
    pub fn route_map(&self) -> RouteMap {
        RouteMap::from_pages(&self.pages)
    }

    fn bumped(mut self) -> Self {
        self.version += 1;
        self
    }

    /// Copy with the working layout written back into the active page
    fn committed(&self) -> Document {
        let mut next = self.clone();
        if let Some(page) = next.pages.iter_mut().find(|p| p.id == next.active_page_id) {
            page.layout = next.layout.clone();
        }
        next
    }

    /// Replace the working layout
    pub fn with_layout(&self, layout: Layout) -> Document {
        Document { layout, ..self.clone() }.bumped()
    }

    /// Commit the working layout, then make `target` active
    pub fn switch_page(&self, target: &PageId) -> Transition {
        if target == &self.active_page_id {
            return Transition::noop(self, NoopReason::AlreadyActive);
        }
        let Some(layout) = self.page(target).map(|p| p.layout.clone()) else {
            return Transition::noop(self, NoopReason::PageNotFound(target.clone()));
        };

        let mut next = self.committed();
        next.active_page_id = target.clone();
        next.layout = layout;
        Transition::applied(next.bumped())
    }

    /// Append a page named "Page N" and switch to it
    pub fn add_page(&self, ids: &mut IdGenerator) -> Transition {
        let id = PageId::new(ids.next_unique_id("page", |candidate| {
            self.pages.iter().any(|p| p.id.as_str() == candidate)
        }));
        let number = self.pages.len() + 1;
        let page = Page {
            id: id.clone(),
            name: format!("Page {}", number),
            route: format!("/page-{}", number),
            layout: Layout::new(),
        };

        let mut next = self.committed();
        next.pages.push(page);
        next.active_page_id = id.clone();
        next.layout = Layout::new();

        Transition { new_page: Some(id), ..Transition::applied(next.bumped()) }
    }

    /// Remove a page; deleting the active page switches to another one first
    pub fn delete_page(&self, target: &PageId) -> Transition {
        if self.page(target).is_none() {
            return Transition::noop(self, NoopReason::PageNotFound(target.clone()));
        }
        if self.pages.len() <= 1 {
            return Transition::noop(self, NoopReason::LastPage);
        }

        let mut next = self.committed();
        if target == &self.active_page_id {
            let fallback = next
                .pages
                .iter()
                .find(|p| &p.id != target)
                .map(|p| (p.id.clone(), p.layout.clone()));
            if let Some((id, layout)) = fallback {
                next.active_page_id = id;
                next.layout = layout;
            }
        }
        next.pages.retain(|p| &p.id != target);
        Transition::applied(next.bumped())
    }

    /// Rename a page and recompute its route from the new name
    pub fn rename_page(&self, target: &PageId, name: &str) -> Transition {
        if name.trim().is_empty() {
            return Transition::noop(self, NoopReason::EmptyName);
        }
        let Some(index) = self.pages.iter().position(|p| &p.id == target) else {
            return Transition::noop(self, NoopReason::PageNotFound(target.clone()));
        };

        let mut next = self.clone();
        let page = &mut next.pages[index];
        page.name = name.to_string();
        page.route = route_for_name(name);
        Transition::applied(next.bumped())
    }

    pub fn rename_project(&self, name: &str) -> Transition {
        if name.trim().is_empty() {
            return Transition::noop(self, NoopReason::EmptyName);
        }
        Transition::applied(Document { name: name.to_string(), ..self.clone() }.bumped())
    }

    pub fn set_theme(&self, theme: &str) -> Transition {
        Transition::applied(Document { theme: theme.to_string(), ..self.clone() }.bumped())
    }

    /// Commit the working layout and build the save payload
    ///
    /// The payload's top-level `layout` mirrors the active page.
    pub fn prepare_save(&self) -> (Document, ProjectSnapshot) {
        let mut next = self.committed();
        if next.page(&next.active_page_id).is_none() {
            if let Some(first) = next.pages.first() {
                next.active_page_id = first.id.clone();
                next.layout = first.layout.clone();
            }
        }

        let snapshot = ProjectSnapshot {
            name: next.name.clone(),
            theme: next.theme.clone(),
            layout: next.layout.clone(),
            pages: next.pages.clone(),
            active_page_id: next.active_page_id.clone(),
        };
        (next, snapshot)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::from_project(Project::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::LinkRef;
    use crate::model::ElementId;
    use crate::mutations::add_element;
    use pagecraft_registry::{DataBag, SectionType};
    use serde_json::json;

    fn frozen() -> IdGenerator {
        IdGenerator::with_clock(|| 1_700_000_000_000)
    }

    fn with_hero(doc: &Document, ids: &mut IdGenerator) -> Document {
        let edit = add_element(doc.layout(), SectionType::Hero.into(), ids);
        doc.with_layout(edit.layout)
    }

    #[test]
    fn test_switch_commits_working_layout() {
        let mut ids = frozen();
        let doc = Document::new("Site");
        let doc = doc.add_page(&mut ids).document;
        let second = doc.active_page_id().clone();
        let doc = with_hero(&doc, &mut ids);

        let doc = doc.switch_page(&PageId::new("home")).document;
        assert!(doc.layout().is_empty());
        assert_eq!(doc.page(&second).unwrap().layout.len(), 1);

        let doc = doc.switch_page(&second).document;
        assert_eq!(doc.layout().len(), 1);
    }

    #[test]
    fn test_switch_to_missing_page_is_noop() {
        let doc = Document::new("Site");
        let t = doc.switch_page(&PageId::new("nope"));
        assert!(!t.is_applied());
        assert_eq!(t.document, doc);
    }

    #[test]
    fn test_add_page_names_and_switches() {
        let mut ids = frozen();
        let doc = Document::new("Site");
        let doc = with_hero(&doc, &mut ids);
        let t = doc.add_page(&mut ids);

        let page = t.document.active_page().unwrap();
        assert_eq!(page.name, "Page 2");
        assert_eq!(page.route, "/page-2");
        assert_eq!(t.new_page.as_ref(), Some(&page.id));
        assert!(page.id.as_str().starts_with("page-"));
        assert!(t.document.layout().is_empty());
        // the page we left keeps its edit
        assert_eq!(t.document.page(&PageId::new("home")).unwrap().layout.len(), 1);
    }

    #[test]
    fn test_delete_last_page_is_rejected() {
        let doc = Document::new("Site");
        let t = doc.delete_page(&PageId::new("home"));
        assert_eq!(t.outcome, Outcome::Noop(NoopReason::LastPage));
        assert_eq!(t.document.pages().len(), 1);
    }

    #[test]
    fn test_delete_active_page_switches_first() {
        let mut ids = frozen();
        let doc = Document::new("Site").add_page(&mut ids).document;
        let added = doc.active_page_id().clone();

        let t = doc.delete_page(&added);
        assert!(t.is_applied());
        assert_eq!(t.document.pages().len(), 1);
        assert_eq!(t.document.active_page_id().as_str(), "home");
    }

    #[test]
    fn test_rename_recomputes_route() {
        let mut ids = frozen();
        let doc = Document::new("Site").add_page(&mut ids).document;
        let id = doc.active_page_id().clone();

        let doc = doc.rename_page(&id, "Contact Us").document;
        assert_eq!(doc.page(&id).unwrap().route, "/contact-us");

        let doc = doc.rename_page(&id, " home ").document;
        assert_eq!(doc.page(&id).unwrap().route, "/");

        assert!(!doc.rename_page(&id, "   ").is_applied());
    }

    #[test]
    fn test_prepare_save_mirrors_active_page() {
        let mut ids = frozen();
        let doc = with_hero(&Document::new("Site"), &mut ids);
        let (committed, snapshot) = doc.prepare_save();

        assert_eq!(snapshot.layout.len(), 1);
        assert_eq!(snapshot.pages[0].layout, snapshot.layout);
        assert_eq!(snapshot.active_page_id.as_str(), "home");
        assert_eq!(committed.active_page().unwrap().layout, *committed.layout());
    }

    #[test]
    fn test_malformed_element_data_loads_as_empty() {
        let doc = Document::from_json(
            &json!({
                "name": "X",
                "layout": [
                    { "id": "a", "type": "hero", "data": null },
                    { "id": "b", "type": "text", "data": "oops" },
                    { "id": "c", "type": "cta" }
                ]
            })
            .to_string(),
        )
        .unwrap();

        assert_eq!(doc.layout().len(), 3);
        for id in ["a", "b", "c"] {
            assert!(doc.element(&ElementId::new(id)).unwrap().data().is_empty());
        }
    }

    #[test]
    fn test_legacy_document_gets_home_page() {
        let doc = Document::from_json(
            &json!({
                "name": "Old",
                "layout": [
                    { "id": "hero-1", "type": "hero", "data": { "buttonHref": "https://a.b" } },
                    { "id": "cta-1", "type": "cta", "data": { "buttonHref": "#" } }
                ]
            })
            .to_string(),
        )
        .unwrap();

        assert_eq!(doc.pages().len(), 1);
        assert_eq!(doc.active_page().unwrap().route, "/");
        assert_eq!(doc.layout().len(), 2);

        let hero = doc.element(&ElementId::new("hero-1")).unwrap();
        assert_eq!(
            LinkRef::from_value(hero.data().get("buttonHref").unwrap()),
            LinkRef::external("https://a.b")
        );
        let cta = doc.element(&ElementId::new("cta-1")).unwrap();
        assert_eq!(cta.data().get("buttonHref"), Some(&json!({ "kind": "none" })));
    }

    #[test]
    fn test_stale_active_pointer_is_repaired_on_load() {
        let mut project = Project::new("Site");
        project.active_page_id = Some(PageId::new("gone"));
        let doc = Document::from_project(project);
        assert_eq!(doc.active_page_id().as_str(), "home");
    }

    #[test]
    fn test_transitions_leave_input_untouched() {
        let doc = Document::new("Site");
        let before = doc.clone();
        let _ = doc.set_theme("dracula");
        let _ = doc.with_layout(
            [Element::new("x", SectionType::Text, DataBag::new())].into_iter().collect(),
        );
        assert_eq!(doc, before);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.json");

        let mut ids = frozen();
        let doc = with_hero(&Document::new("Site"), &mut ids);
        doc.save_to(&path).unwrap();

        let loaded = Document::load(&path).unwrap();
        assert_eq!(loaded.layout().len(), 1);
        assert_eq!(loaded.name, "Site");
    }
}
