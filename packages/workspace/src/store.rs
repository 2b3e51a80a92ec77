//! # In-memory project store
//!
//! Owner-scoped project storage with the same contract as the hosted
//! backend: bearer authentication, owner-or-public reads, and a defensive
//! merge on update so that a partial save never wipes stored pages.

use crate::auth::{authenticate, identify, TokenVerifier};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagecraft_common::IdGenerator;
use pagecraft_editor::{
    Credential, Layout, Page, PageId, Project, ProjectId, ProjectSnapshot, ProjectStore,
    StoreError,
};
use pagecraft_registry::DEFAULT_THEME;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct StoreState {
    projects: HashMap<ProjectId, Project>,
    ids: IdGenerator,
}

impl StoreState {
    /// Strictly increasing timestamp so `updatedAt` ordering is total
    fn now(&mut self) -> DateTime<Utc> {
        let stamp = self.ids.next_stamp();
        i64::try_from(stamp)
            .ok()
            .and_then(DateTime::from_timestamp_millis)
            .unwrap_or_else(Utc::now)
    }

    fn owned(&mut self, id: &ProjectId, uid: &str) -> Result<&mut Project, StoreError> {
        let project = self.projects.get_mut(id).ok_or(StoreError::NotFound)?;
        if project.user_id.as_deref() != Some(uid) {
            return Err(StoreError::Forbidden);
        }
        Ok(project)
    }
}

/// First candidate naming a page in `pages`, else the first page
fn pick_active<'a>(pages: &[Page], candidates: impl IntoIterator<Item = Option<&'a PageId>>) -> Option<PageId> {
    candidates
        .into_iter()
        .flatten()
        .find(|id| pages.iter().any(|p| &p.id == *id))
        .cloned()
        .or_else(|| pages.first().map(|p| p.id.clone()))
}

/// Legacy mirror of the active page's layout
fn active_layout(pages: &[Page], active: Option<&PageId>) -> Layout {
    active
        .and_then(|id| pages.iter().find(|p| &p.id == id))
        .map(|p| p.layout.clone())
        .unwrap_or_default()
}

fn newest_first(mut projects: Vec<Project>) -> Vec<Project> {
    projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    projects
}

pub struct MemoryProjectStore {
    state: Mutex<StoreState>,
    verifier: Arc<dyn TokenVerifier>,
}

impl MemoryProjectStore {
    pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self::with_ids(verifier, IdGenerator::new())
    }

    /// Store whose project ids and timestamps come from `ids`
    pub fn with_ids(verifier: Arc<dyn TokenVerifier>, ids: IdGenerator) -> Self {
        Self {
            state: Mutex::new(StoreState {
                projects: HashMap::new(),
                ids,
            }),
            verifier,
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a project owned by the caller
    pub fn create(
        &self,
        snapshot: &ProjectSnapshot,
        is_public: bool,
        credential: Option<&Credential>,
    ) -> Result<Project, StoreError> {
        let uid = authenticate(self.verifier.as_ref(), credential)?;
        if snapshot.name.trim().is_empty() {
            return Err(StoreError::Validation("name is required".to_string()));
        }

        let pages = if snapshot.pages.is_empty() {
            vec![Page::home(snapshot.layout.clone())]
        } else {
            snapshot.pages.clone()
        };
        let active = pick_active(&pages, [Some(&snapshot.active_page_id)]);

        let mut state = self.lock();
        let id = ProjectId::new(state.ids.next_id("project"));
        let now = state.now();
        let project = Project {
            id: Some(id.clone()),
            user_id: Some(uid),
            name: snapshot.name.clone(),
            layout: active_layout(&pages, active.as_ref()),
            pages,
            active_page_id: active,
            theme: if snapshot.theme.is_empty() {
                DEFAULT_THEME.to_string()
            } else {
                snapshot.theme.clone()
            },
            is_public,
            created_at: Some(now),
            updated_at: Some(now),
        };
        state.projects.insert(id.clone(), project.clone());

        tracing::info!("[Store] created project {}", id);
        Ok(project)
    }

    /// Fetch a project the caller owns, or any public one
    pub fn get(&self, id: &ProjectId, credential: Option<&Credential>) -> Result<Project, StoreError> {
        let viewer = identify(self.verifier.as_ref(), credential);
        let state = self.lock();
        let project = state.projects.get(id).ok_or(StoreError::NotFound)?;

        let is_owner = viewer.is_some() && project.user_id == viewer;
        if !is_owner && !project.is_public {
            return Err(StoreError::Forbidden);
        }
        Ok(project.clone())
    }

    /// The caller's projects, most recently updated first
    pub fn list(&self, credential: Option<&Credential>) -> Result<Vec<Project>, StoreError> {
        let uid = authenticate(self.verifier.as_ref(), credential)?;
        let state = self.lock();
        let mine = state
            .projects
            .values()
            .filter(|p| p.user_id.as_deref() == Some(uid.as_str()))
            .cloned()
            .collect();
        Ok(newest_first(mine))
    }

    /// Merge `snapshot` into a stored project
    ///
    /// Empty pages keep the stored pages; an empty name or theme keeps the
    /// stored value; the active page is the given one if it exists, else the
    /// stored one, else the first page. The legacy `layout` mirrors the
    /// active page.
    pub fn update(
        &self,
        id: &ProjectId,
        snapshot: &ProjectSnapshot,
        credential: Option<&Credential>,
    ) -> Result<Project, StoreError> {
        let uid = authenticate(self.verifier.as_ref(), credential)?;
        let mut state = self.lock();
        let now = state.now();
        let project = state.owned(id, &uid)?;

        if !snapshot.pages.is_empty() {
            project.pages = snapshot.pages.clone();
        } else {
            tracing::warn!("[Store] update of {} carried no pages, keeping stored pages", id);
        }
        let active = pick_active(
            &project.pages,
            [Some(&snapshot.active_page_id), project.active_page_id.as_ref()],
        );
        project.layout = active_layout(&project.pages, active.as_ref());
        project.active_page_id = active;
        if !snapshot.name.trim().is_empty() {
            project.name = snapshot.name.clone();
        }
        if !snapshot.theme.is_empty() {
            project.theme = snapshot.theme.clone();
        }
        project.updated_at = Some(now);

        tracing::info!("[Store] updated project {} ({} pages)", id, project.pages.len());
        Ok(project.clone())
    }

    pub fn delete(&self, id: &ProjectId, credential: Option<&Credential>) -> Result<(), StoreError> {
        let uid = authenticate(self.verifier.as_ref(), credential)?;
        let mut state = self.lock();
        state.owned(id, &uid)?;
        state.projects.remove(id);

        tracing::info!("[Store] deleted project {}", id);
        Ok(())
    }

    /// Private copy of an owned or public project, named "<name> (Copy)"
    pub fn clone_project(&self, id: &ProjectId, credential: Option<&Credential>) -> Result<Project, StoreError> {
        let uid = authenticate(self.verifier.as_ref(), credential)?;
        let mut state = self.lock();
        let source = state.projects.get(id).ok_or(StoreError::NotFound)?;
        if !source.is_public && source.user_id.as_deref() != Some(uid.as_str()) {
            return Err(StoreError::Forbidden);
        }
        let mut copy = source.clone();

        let new_id = ProjectId::new(state.ids.next_id("project"));
        let now = state.now();
        copy.id = Some(new_id.clone());
        copy.user_id = Some(uid);
        copy.name = format!("{} (Copy)", copy.name);
        copy.is_public = false;
        copy.created_at = Some(now);
        copy.updated_at = Some(now);
        state.projects.insert(new_id.clone(), copy.clone());

        tracing::info!("[Store] cloned project {} into {}", id, new_id);
        Ok(copy)
    }

    /// Flip the public flag; returns the updated project
    pub fn toggle_public(&self, id: &ProjectId, credential: Option<&Credential>) -> Result<Project, StoreError> {
        let uid = authenticate(self.verifier.as_ref(), credential)?;
        let mut state = self.lock();
        let now = state.now();
        let project = state.owned(id, &uid)?;
        project.is_public = !project.is_public;
        project.updated_at = Some(now);
        Ok(project.clone())
    }

    /// Every public project, most recently updated first
    pub fn templates(&self) -> Vec<Project> {
        let state = self.lock();
        newest_first(state.projects.values().filter(|p| p.is_public).cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.lock().projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn save(
        &self,
        id: Option<&ProjectId>,
        snapshot: &ProjectSnapshot,
        credential: Option<&Credential>,
    ) -> Result<Project, StoreError> {
        match id {
            Some(id) => self.update(id, snapshot, credential),
            None => self.create(snapshot, false, credential),
        }
    }
}
