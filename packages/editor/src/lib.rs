//! # Pagecraft Editor
//!
//! Core editing engine for Pagecraft projects.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ registry: section catalog + default data    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: project lifecycle + mutations       │
//! │  - Load legacy and multi-page documents     │
//! │  - Pure layout operations                   │
//! │  - Page state machine (switch/add/delete)   │
//! │  - Link resolution against page routes      │
//! │  - Async save/export via boundary traits    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ compiler-react / workspace: codegen, store  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Pages are source of truth**: the top-level layout only mirrors the
//!    active page for older readers
//! 2. **Links by identity**: internal links store a page id, never a route
//! 3. **Total operations**: bad ids and out-of-range moves are no-ops
//! 4. **Boundaries are traits**: storage, export and codegen are injected
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagecraft_editor::{Document, EditorSession, LinkRef};
//! use pagecraft_registry::SectionType;
//!
//! let mut session = EditorSession::new(Document::new("Portfolio"));
//! let hero = session.add_element(SectionType::Hero).unwrap();
//!
//! let about = session.add_page().unwrap();
//! session.rename_page(&about, "About");
//!
//! let link = LinkRef::internal(about.clone());
//! assert_eq!(session.resolve_link(&link).href, "/about");
//!
//! let snapshot = session.prepare_save();
//! ```

mod boundary;
mod controller;
mod document;
mod errors;
mod links;
mod model;
mod mutations;
mod session;

pub use boundary::{
    Credential, DownloadSink, ExportArchive, ExportError, ExportPayload, ExportService,
    GenerateError, PageGenerator, PageRequest, ProjectStore, StoreError,
};
pub use controller::{
    ControllerOptions, ExportOutcome, Notice, NoticeLevel, SaveOutcome, Services,
    SessionController,
};
pub use document::{Document, Transition};
pub use errors::EditorError;
pub use links::{
    dangling_links, links_in, normalize_links, resolve, Activation, DanglingLink, LinkLocation,
    LinkRef, ResolvedLink, RouteLookup, RouteMap, NEW_TAB_REL, NEW_TAB_TARGET,
};
pub use model::{
    Element, ElementId, Layout, Page, PageId, Project, ProjectId, ProjectSnapshot,
    DEFAULT_PROJECT_NAME, HOME_PAGE_ID,
};
pub use mutations::{
    add_element, add_item, add_plan_feature, duplicate_element, move_down, move_up,
    remove_element, remove_item, remove_plan_feature, reorder, update_element_data, Edit,
    LayoutMutation, NoopReason, Outcome,
};
pub use session::{EditorSession, ViewState, Zoom};
