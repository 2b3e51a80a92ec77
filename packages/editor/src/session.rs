//! # Edit session
//!
//! One user's view of a document: the document itself plus selection, zoom
//! and preview state. All edits a shell can trigger go through here so that
//! selection follows the layout (cleared when the selected element goes away,
//! moved to freshly added elements).

use crate::document::{Document, Transition};
use crate::links::{resolve, LinkRef, ResolvedLink};
use crate::model::{ElementId, PageId, Project, ProjectId, ProjectSnapshot};
use crate::mutations::{self, Edit, LayoutMutation, NoopReason, Outcome};
use pagecraft_common::IdGenerator;
use pagecraft_registry::{DataBag, SectionKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canvas zoom, held as an integer number of tenths
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u8")]
pub struct Zoom(u8);

impl Zoom {
    pub const MIN: Zoom = Zoom(5);
    pub const MAX: Zoom = Zoom(20);
    pub const DEFAULT: Zoom = Zoom(10);

    /// Closest zoom to `factor`, clamped to [0.5, 2.0]; NaN gives the default
    pub fn from_factor(factor: f64) -> Self {
        if factor.is_nan() {
            return Self::DEFAULT;
        }
        let tenths = (factor * 10.0).round().clamp(Self::MIN.0 as f64, Self::MAX.0 as f64);
        Zoom(tenths as u8)
    }

    pub fn factor(self) -> f64 {
        f64::from(self.0) / 10.0
    }

    pub fn zoom_in(self) -> Self {
        Zoom((self.0 + 1).min(Self::MAX.0))
    }

    pub fn zoom_out(self) -> Self {
        Zoom(self.0.saturating_sub(1).max(Self::MIN.0))
    }
}

impl From<u8> for Zoom {
    fn from(tenths: u8) -> Self {
        Zoom(tenths.clamp(Self::MIN.0, Self::MAX.0))
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Canvas presentation flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub zoom: Zoom,
    pub preview_mode: bool,
    pub mobile_view: bool,
}

/// Single-user edit session
#[derive(Debug, Clone)]
pub struct EditorSession {
    document: Document,
    ids: IdGenerator,
    selected: Option<ElementId>,
    view: ViewState,
}

impl EditorSession {
    pub fn new(document: Document) -> Self {
        Self::with_ids(document, IdGenerator::new())
    }

    /// Session whose new ids come from `ids`
    pub fn with_ids(document: Document, ids: IdGenerator) -> Self {
        Self {
            document,
            ids,
            selected: None,
            view: ViewState::default(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selected(&self) -> Option<&ElementId> {
        self.selected.as_ref()
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    fn take_edit(&mut self, edit: Edit) -> Outcome {
        match &edit.outcome {
            Outcome::Applied => {
                self.document = self.document.with_layout(edit.layout);
                if let Some(selected) = &self.selected {
                    if !self.document.layout().contains(selected) {
                        self.selected = None;
                    }
                }
                if edit.new_id.is_some() {
                    self.selected = edit.new_id;
                }
                tracing::debug!(
                    "[Session] layout v{} ({} elements)",
                    self.document.version,
                    self.document.layout().len()
                );
            }
            Outcome::Noop(reason) => tracing::debug!("[Session] layout unchanged: {}", reason),
        }
        edit.outcome
    }

    /// Adopt a document transition; page changes drop the selection
    fn take_transition(&mut self, transition: Transition, keep_selection: bool) -> Outcome {
        match &transition.outcome {
            Outcome::Applied => {
                self.document = transition.document;
                if !keep_selection {
                    self.selected = None;
                }
                tracing::debug!(
                    "[Session] document v{} active page {}",
                    self.document.version,
                    self.document.active_page_id()
                );
            }
            Outcome::Noop(reason) => tracing::debug!("[Session] document unchanged: {}", reason),
        }
        transition.outcome
    }

    /// Apply a layout mutation; adds and duplicates select the new element
    pub fn apply(&mut self, mutation: &LayoutMutation) -> Outcome {
        let edit = mutation.apply(self.document.layout(), &mut self.ids);
        self.take_edit(edit)
    }

    /// Append an element of `kind` and select it
    pub fn add_element(&mut self, kind: impl Into<SectionKind>) -> Option<ElementId> {
        let edit = mutations::add_element(self.document.layout(), kind.into(), &mut self.ids);
        let created = edit.new_id.clone();
        self.take_edit(edit);
        created
    }

    pub fn remove_element(&mut self, id: &ElementId) -> Outcome {
        self.take_edit(mutations::remove_element(self.document.layout(), id))
    }

    /// Replace the element's data bag
    pub fn update_element(&mut self, id: &ElementId, data: DataBag) -> Outcome {
        self.take_edit(mutations::update_element_data(self.document.layout(), id, data))
    }

    /// Set one field of the element's data, keeping the others
    pub fn set_element_field(
        &mut self,
        id: &ElementId,
        key: &str,
        value: impl Into<Value>,
    ) -> Outcome {
        let data = match self.document.layout().get(id) {
            Some(element) => element.data().clone().with(key, value),
            None => DataBag::new(),
        };
        self.update_element(id, data)
    }

    pub fn move_up(&mut self, id: &ElementId) -> Outcome {
        self.take_edit(mutations::move_up(self.document.layout(), id))
    }

    pub fn move_down(&mut self, id: &ElementId) -> Outcome {
        self.take_edit(mutations::move_down(self.document.layout(), id))
    }

    pub fn reorder(&mut self, from: &ElementId, to: &ElementId) -> Outcome {
        self.take_edit(mutations::reorder(self.document.layout(), from, to))
    }

    /// Duplicate the selected element and select the copy
    pub fn duplicate_selected(&mut self) -> Outcome {
        match self.selected.clone() {
            Some(id) => self.apply(&LayoutMutation::DuplicateElement { id }),
            None => Outcome::Noop(NoopReason::NothingSelected),
        }
    }

    /// Select an element; ignored in preview mode
    pub fn select(&mut self, id: &ElementId) -> Outcome {
        if self.view.preview_mode {
            return Outcome::Noop(NoopReason::PreviewMode);
        }
        if !self.document.layout().contains(id) {
            return Outcome::Noop(NoopReason::ElementNotFound(id.clone()));
        }
        self.selected = Some(id.clone());
        Outcome::Applied
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn switch_page(&mut self, id: &PageId) -> Outcome {
        self.take_transition(self.document.switch_page(id), false)
    }

    pub fn add_page(&mut self) -> Option<PageId> {
        let transition = self.document.add_page(&mut self.ids);
        let created = transition.new_page.clone();
        self.take_transition(transition, false);
        created
    }

    pub fn delete_page(&mut self, id: &PageId) -> Outcome {
        let keep = id != self.document.active_page_id();
        self.take_transition(self.document.delete_page(id), keep)
    }

    pub fn rename_page(&mut self, id: &PageId, name: &str) -> Outcome {
        self.take_transition(self.document.rename_page(id, name), true)
    }

    pub fn rename_project(&mut self, name: &str) -> Outcome {
        self.take_transition(self.document.rename_project(name), true)
    }

    pub fn set_theme(&mut self, theme: &str) -> Outcome {
        self.take_transition(self.document.set_theme(theme), true)
    }

    pub fn zoom_in(&mut self) -> Zoom {
        self.view.zoom = self.view.zoom.zoom_in();
        self.view.zoom
    }

    pub fn zoom_out(&mut self) -> Zoom {
        self.view.zoom = self.view.zoom.zoom_out();
        self.view.zoom
    }

    pub fn set_zoom(&mut self, factor: f64) -> Zoom {
        self.view.zoom = Zoom::from_factor(factor);
        self.view.zoom
    }

    /// Entering preview drops the selection
    pub fn set_preview_mode(&mut self, enabled: bool) {
        self.view.preview_mode = enabled;
        if enabled {
            self.selected = None;
        }
    }

    pub fn set_mobile_view(&mut self, enabled: bool) {
        self.view.mobile_view = enabled;
    }

    /// Resolve a link against the current pages
    pub fn resolve_link(&self, link: &LinkRef) -> ResolvedLink {
        resolve(link, self.document.pages())
    }

    /// Activate a link as the canvas would; internal links switch page.
    /// Returns whether default navigation should proceed.
    pub fn activate_link(&mut self, link: &LinkRef) -> bool {
        let resolved = self.resolve_link(link);
        let mut target = None;
        let proceed = resolved.activate(|page_id| target = Some(page_id.clone()));
        if let Some(page_id) = target {
            self.switch_page(&page_id);
        }
        proceed
    }

    /// Commit the working layout and build the save payload
    pub fn prepare_save(&mut self) -> ProjectSnapshot {
        let (document, snapshot) = self.document.prepare_save();
        self.document = document;
        snapshot
    }

    /// Attach a stored project id to a document that has none
    pub fn adopt_project_id(&mut self, id: &ProjectId) {
        if self.document.id.is_none() {
            self.document.id = Some(id.clone());
        }
    }

    /// Record the id and timestamps the store assigned on save
    pub fn mark_saved(&mut self, stored: &Project) {
        if self.document.id.is_none() {
            self.document.id = stored.id.clone();
        }
        self.document.owner = stored.user_id.clone().or(self.document.owner.take());
        self.document.created_at = stored.created_at.or(self.document.created_at);
        self.document.updated_at = stored.updated_at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_registry::SectionType;

    fn session() -> EditorSession {
        EditorSession::with_ids(Document::new("Site"), IdGenerator::with_clock(|| 1_700_000_000_000))
    }

    #[test]
    fn test_add_selects_new_element() {
        let mut s = session();
        let id = s.add_element(SectionType::Hero).unwrap();
        assert_eq!(s.selected(), Some(&id));
    }

    #[test]
    fn test_removing_selected_clears_selection() {
        let mut s = session();
        let a = s.add_element(SectionType::Hero).unwrap();
        let b = s.add_element(SectionType::Text).unwrap();
        s.select(&a);

        s.remove_element(&b);
        assert_eq!(s.selected(), Some(&a));

        s.remove_element(&a);
        assert_eq!(s.selected(), None);
    }

    #[test]
    fn test_preview_mode_blocks_selection() {
        let mut s = session();
        let id = s.add_element(SectionType::Hero).unwrap();
        s.set_preview_mode(true);
        assert_eq!(s.selected(), None);
        assert_eq!(s.select(&id), Outcome::Noop(NoopReason::PreviewMode));
        s.set_preview_mode(false);
        assert!(s.select(&id).is_applied());
    }

    #[test]
    fn test_duplicate_selected() {
        let mut s = session();
        assert!(!s.duplicate_selected().is_applied());

        let id = s.add_element(SectionType::Cta).unwrap();
        assert!(s.duplicate_selected().is_applied());
        assert_eq!(s.document().layout().len(), 2);
        assert_ne!(s.selected(), Some(&id));
    }

    #[test]
    fn test_zoom_clamps() {
        let mut s = session();
        for _ in 0..20 {
            s.zoom_in();
        }
        assert_eq!(s.view().zoom.factor(), 2.0);
        for _ in 0..30 {
            s.zoom_out();
        }
        assert_eq!(s.view().zoom.factor(), 0.5);
        assert_eq!(s.set_zoom(1.04), Zoom::DEFAULT);
        assert_eq!(s.set_zoom(9.0), Zoom::MAX);
    }

    #[test]
    fn test_zoom_from_non_finite_factor_stays_in_range() {
        let mut s = session();
        assert_eq!(s.set_zoom(f64::NAN), Zoom::DEFAULT);
        assert_eq!(s.set_zoom(f64::INFINITY), Zoom::MAX);
        assert_eq!(s.set_zoom(f64::NEG_INFINITY), Zoom::MIN);
        assert!(s.view().zoom.factor() >= 0.5);
    }

    #[test]
    fn test_stored_zoom_is_clamped() {
        let low: Zoom = serde_json::from_str("0").unwrap();
        let high: Zoom = serde_json::from_str("200").unwrap();
        assert_eq!(low, Zoom::MIN);
        assert_eq!(high, Zoom::MAX);
        assert_eq!(serde_json::to_string(&Zoom::DEFAULT).unwrap(), "10");
    }

    #[test]
    fn test_set_element_field_keeps_other_fields() {
        let mut s = session();
        let id = s.add_element(SectionType::Hero).unwrap();
        let before = s.document().element(&id).unwrap().data().clone();

        assert!(s.set_element_field(&id, "heading", "Welcome").is_applied());
        let data = s.document().element(&id).unwrap().data();
        assert_eq!(data.get_str("heading"), Some("Welcome"));
        assert_eq!(data.len(), before.len());

        assert!(s.update_element(&id, DataBag::new().with("heading", "Only")).is_applied());
        assert_eq!(s.document().element(&id).unwrap().data().len(), 1);

        let missing = s.set_element_field(&ElementId::new("nope"), "heading", "x");
        assert!(!missing.is_applied());
    }

    #[test]
    fn test_internal_link_activation_switches_page() {
        let mut s = session();
        let about = s.add_page().unwrap();
        s.rename_page(&about, "About");
        s.switch_page(&PageId::new("home"));

        let proceed = s.activate_link(&LinkRef::internal(about.clone()));
        assert!(!proceed);
        assert_eq!(s.document().active_page_id(), &about);

        assert!(s.activate_link(&LinkRef::external("https://x.io")));
        assert_eq!(s.document().active_page_id(), &about);
    }

    #[test]
    fn test_switching_page_clears_selection() {
        let mut s = session();
        s.add_element(SectionType::Hero);
        let page = s.add_page().unwrap();
        assert_eq!(s.selected(), None);
        assert_eq!(s.document().active_page_id(), &page);
    }
}
