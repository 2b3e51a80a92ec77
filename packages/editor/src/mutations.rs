//! # Layout mutations
//!
//! Pure operations over one page's element sequence. Each takes the current
//! [`Layout`] by reference and returns an [`Edit`] carrying the next layout;
//! the input is never modified. Elements that an operation does not touch are
//! shared with the input.
//!
//! ## Semantics
//!
//! - Unknown ids and moves past either end are no-ops, never errors
//! - `update_element_data` replaces the whole data bag; id and type stay
//! - `duplicate_element` inserts directly after the source with a fresh id
//! - Collection edits go through the registry so parallel arrays stay in step

use crate::links::normalize_links;
use crate::model::{Element, ElementId, Layout, PageId};
use pagecraft_common::IdGenerator;
use pagecraft_registry::{collections, default_data_for, CollectionError, DataBag, SectionKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Why an operation left its input unchanged
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NoopReason {
    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),

    #[error("Element is already at the edge of the layout")]
    AtBoundary,

    #[error("Source and target are the same element")]
    SameElement,

    #[error("Unknown section type: {0}")]
    UnknownSectionType(String),

    #[error(transparent)]
    Collection(#[from] CollectionError),

    #[error("Page not found: {0}")]
    PageNotFound(PageId),

    #[error("Page is already active")]
    AlreadyActive,

    #[error("A project must keep at least one page")]
    LastPage,

    #[error("Page name cannot be empty")]
    EmptyName,

    #[error("Selection is disabled in preview mode")]
    PreviewMode,

    #[error("Nothing is selected")]
    NothingSelected,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Applied,
    Noop(NoopReason),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }

    pub fn reason(&self) -> Option<&NoopReason> {
        match self {
            Outcome::Applied => None,
            Outcome::Noop(reason) => Some(reason),
        }
    }
}

/// Result of a layout operation
#[derive(Debug, Clone, PartialEq)]
pub struct Edit {
    pub layout: Layout,
    pub outcome: Outcome,
    /// Id of the element an add or duplicate created
    pub new_id: Option<ElementId>,
}

impl Edit {
    fn applied(layout: Layout) -> Self {
        Self { layout, outcome: Outcome::Applied, new_id: None }
    }

    fn created(layout: Layout, id: ElementId) -> Self {
        Self { layout, outcome: Outcome::Applied, new_id: Some(id) }
    }

    fn noop(layout: &Layout, reason: NoopReason) -> Self {
        Self { layout: layout.clone(), outcome: Outcome::Noop(reason), new_id: None }
    }

    pub fn is_applied(&self) -> bool {
        self.outcome.is_applied()
    }
}

fn fresh_element_id(layout: &Layout, kind: &SectionKind, ids: &mut IdGenerator) -> ElementId {
    ElementId::new(ids.next_unique_id(kind.tag(), |candidate| {
        layout.contains(&ElementId::new(candidate))
    }))
}

/// Append a new element of `kind` seeded with its default data
pub fn add_element(layout: &Layout, kind: SectionKind, ids: &mut IdGenerator) -> Edit {
    let id = fresh_element_id(layout, &kind, ids);
    let data = normalize_links(&kind, &default_data_for(&kind));

    let mut elements = layout.shared().to_vec();
    elements.push(Arc::new(Element::new(id.clone(), kind, data)));
    Edit::created(Layout::from_shared(elements), id)
}

pub fn remove_element(layout: &Layout, id: &ElementId) -> Edit {
    let Some(index) = layout.position(id) else {
        return Edit::noop(layout, NoopReason::ElementNotFound(id.clone()));
    };
    let mut elements = layout.shared().to_vec();
    elements.remove(index);
    Edit::applied(Layout::from_shared(elements))
}

/// Replace the element's data bag with `data`
pub fn update_element_data(layout: &Layout, id: &ElementId, data: DataBag) -> Edit {
    let Some(index) = layout.position(id) else {
        return Edit::noop(layout, NoopReason::ElementNotFound(id.clone()));
    };
    let current = &layout.shared()[index];
    let data = normalize_links(current.kind(), &data);
    replace_at(layout, index, current.with_data(data))
}

/// Insert a copy of the element directly after it
pub fn duplicate_element(layout: &Layout, id: &ElementId, ids: &mut IdGenerator) -> Edit {
    let Some(index) = layout.position(id) else {
        return Edit::noop(layout, NoopReason::ElementNotFound(id.clone()));
    };
    let source = &layout.shared()[index];
    let new_id = fresh_element_id(layout, source.kind(), ids);

    let mut elements = layout.shared().to_vec();
    elements.insert(index + 1, Arc::new(source.cloned_as(new_id.clone())));
    Edit::created(Layout::from_shared(elements), new_id)
}

pub fn move_up(layout: &Layout, id: &ElementId) -> Edit {
    match layout.position(id) {
        None => Edit::noop(layout, NoopReason::ElementNotFound(id.clone())),
        Some(0) => Edit::noop(layout, NoopReason::AtBoundary),
        Some(index) => swap(layout, index - 1, index),
    }
}

pub fn move_down(layout: &Layout, id: &ElementId) -> Edit {
    match layout.position(id) {
        None => Edit::noop(layout, NoopReason::ElementNotFound(id.clone())),
        Some(index) if index + 1 >= layout.len() => Edit::noop(layout, NoopReason::AtBoundary),
        Some(index) => swap(layout, index, index + 1),
    }
}

/// Drag-and-drop move: take `from` out and reinsert it at the position
/// `to` currently holds
pub fn reorder(layout: &Layout, from: &ElementId, to: &ElementId) -> Edit {
    if from == to {
        return Edit::noop(layout, NoopReason::SameElement);
    }
    let Some(source) = layout.position(from) else {
        return Edit::noop(layout, NoopReason::ElementNotFound(from.clone()));
    };
    let Some(target) = layout.position(to) else {
        return Edit::noop(layout, NoopReason::ElementNotFound(to.clone()));
    };
    let mut elements = layout.shared().to_vec();
    let moved = elements.remove(source);
    elements.insert(target, moved);
    Edit::applied(Layout::from_shared(elements))
}

fn swap(layout: &Layout, a: usize, b: usize) -> Edit {
    let mut elements = layout.shared().to_vec();
    elements.swap(a, b);
    Edit::applied(Layout::from_shared(elements))
}

fn replace_at(layout: &Layout, index: usize, element: Element) -> Edit {
    let mut elements = layout.shared().to_vec();
    elements[index] = Arc::new(element);
    Edit::applied(Layout::from_shared(elements))
}

/// Replace an element's data with the result of a collection edit
fn edit_collection<F>(layout: &Layout, id: &ElementId, edit: F) -> Edit
where
    F: FnOnce(pagecraft_registry::SectionType, &DataBag) -> Result<DataBag, CollectionError>,
{
    let Some(index) = layout.position(id) else {
        return Edit::noop(layout, NoopReason::ElementNotFound(id.clone()));
    };
    let current = &layout.shared()[index];
    let Some(section) = current.kind().known() else {
        return Edit::noop(layout, NoopReason::UnknownSectionType(current.kind().to_string()));
    };
    match edit(section, current.data()) {
        Ok(data) => replace_at(layout, index, current.with_data(normalize_links(current.kind(), &data))),
        Err(e) => Edit::noop(layout, e.into()),
    }
}

pub fn add_item(layout: &Layout, id: &ElementId) -> Edit {
    edit_collection(layout, id, collections::add_item)
}

pub fn remove_item(layout: &Layout, id: &ElementId, index: usize) -> Edit {
    edit_collection(layout, id, |section, data| collections::remove_item(section, data, index))
}

pub fn add_plan_feature(layout: &Layout, id: &ElementId, plan: usize, feature: &str) -> Edit {
    edit_collection(layout, id, |_, data| collections::add_plan_feature(data, plan, feature))
}

pub fn remove_plan_feature(layout: &Layout, id: &ElementId, plan: usize, index: usize) -> Edit {
    edit_collection(layout, id, |_, data| collections::remove_plan_feature(data, plan, index))
}

/// Serializable form of every layout operation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum LayoutMutation {
    AddElement {
        kind: SectionKind,
    },
    RemoveElement {
        id: ElementId,
    },
    UpdateElementData {
        id: ElementId,
        data: DataBag,
    },
    DuplicateElement {
        id: ElementId,
    },
    MoveUp {
        id: ElementId,
    },
    MoveDown {
        id: ElementId,
    },
    Reorder {
        from: ElementId,
        to: ElementId,
    },
    AddItem {
        id: ElementId,
    },
    RemoveItem {
        id: ElementId,
        index: usize,
    },
    AddPlanFeature {
        id: ElementId,
        plan: usize,
        feature: String,
    },
    RemovePlanFeature {
        id: ElementId,
        plan: usize,
        index: usize,
    },
}

impl LayoutMutation {
    pub fn apply(&self, layout: &Layout, ids: &mut IdGenerator) -> Edit {
        match self {
            LayoutMutation::AddElement { kind } => add_element(layout, kind.clone(), ids),
            LayoutMutation::RemoveElement { id } => remove_element(layout, id),
            LayoutMutation::UpdateElementData { id, data } => {
                update_element_data(layout, id, data.clone())
            }
            LayoutMutation::DuplicateElement { id } => duplicate_element(layout, id, ids),
            LayoutMutation::MoveUp { id } => move_up(layout, id),
            LayoutMutation::MoveDown { id } => move_down(layout, id),
            LayoutMutation::Reorder { from, to } => reorder(layout, from, to),
            LayoutMutation::AddItem { id } => add_item(layout, id),
            LayoutMutation::RemoveItem { id, index } => remove_item(layout, id, *index),
            LayoutMutation::AddPlanFeature { id, plan, feature } => {
                add_plan_feature(layout, id, *plan, feature)
            }
            LayoutMutation::RemovePlanFeature { id, plan, index } => {
                remove_plan_feature(layout, id, *plan, *index)
            }
        }
    }

    /// Element the mutation targets, if it names one
    pub fn target(&self) -> Option<&ElementId> {
        match self {
            LayoutMutation::AddElement { .. } | LayoutMutation::Reorder { .. } => None,
            LayoutMutation::RemoveElement { id }
            | LayoutMutation::UpdateElementData { id, .. }
            | LayoutMutation::DuplicateElement { id }
            | LayoutMutation::MoveUp { id }
            | LayoutMutation::MoveDown { id }
            | LayoutMutation::AddItem { id }
            | LayoutMutation::RemoveItem { id, .. }
            | LayoutMutation::AddPlanFeature { id, .. }
            | LayoutMutation::RemovePlanFeature { id, .. } => Some(id),
        }
    }
}
