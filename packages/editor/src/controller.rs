//! # Session controller
//!
//! Async shell around an [`EditorSession`]. Owns the boundary services and
//! runs save and export:
//!
//! ```text
//! save:   prepare_save → ProjectStore::save → mark_saved
//! export: save → ExportService::request_export → decode → DownloadSink
//! ```
//!
//! Each of save and export has an in-flight flag; a call made while the same
//! operation is running returns [`SaveOutcome::AlreadyInFlight`] /
//! [`ExportOutcome::AlreadyInFlight`] without touching any boundary. The
//! session lock is never held across an await, so edits stay possible while
//! a save is outstanding.
//!
//! Boundary failures leave the session unchanged and queue a [`Notice`].

use crate::boundary::{
    Credential, DownloadSink, ExportError, ExportService, ProjectStore, StoreError,
};
use crate::model::ProjectId;
use crate::session::EditorSession;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Message for the shell to show the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved(Option<ProjectId>),
    AlreadyInFlight,
    Failed(StoreError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    Delivered { filename: String },
    AlreadyInFlight,
    /// The pre-export save did not go through; nothing was generated
    NotSaved(SaveOutcome),
    Failed(ExportError),
}

/// Boundary services the controller talks to
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn ProjectStore>,
    pub exporter: Arc<dyn ExportService>,
    pub sink: Arc<dyn DownloadSink>,
}

#[derive(Debug, Clone, Default)]
pub struct ControllerOptions {
    /// Bearer credential supplied by the hosting shell
    pub credential: Option<Credential>,
    /// Stored project the session edits, when the document does not carry one
    pub project_id: Option<ProjectId>,
}

/// Clears its flag on drop
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct SessionController {
    session: Mutex<EditorSession>,
    services: Services,
    options: ControllerOptions,
    saving: AtomicBool,
    exporting: AtomicBool,
    notices: Mutex<Vec<Notice>>,
}

impl SessionController {
    pub fn new(mut session: EditorSession, services: Services, options: ControllerOptions) -> Self {
        if let Some(id) = &options.project_id {
            session.adopt_project_id(id);
        }
        Self {
            session: Mutex::new(session),
            services,
            options,
            saving: AtomicBool::new(false),
            exporting: AtomicBool::new(false),
            notices: Mutex::new(Vec::new()),
        }
    }

    /// Run a synchronous edit against the session
    pub fn edit<R>(&self, f: impl FnOnce(&mut EditorSession) -> R) -> R {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut session)
    }

    pub fn read<R>(&self, f: impl FnOnce(&EditorSession) -> R) -> R {
        let session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&session)
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting.load(Ordering::Acquire)
    }

    /// Drain queued notices
    pub fn take_notices(&self) -> Vec<Notice> {
        let mut notices = self.notices.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *notices)
    }

    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }

    /// Persist the current document
    pub async fn save(&self) -> SaveOutcome {
        let Some(_guard) = InFlight::acquire(&self.saving) else {
            tracing::debug!("[Save] already in flight, ignoring");
            return SaveOutcome::AlreadyInFlight;
        };

        let (id, snapshot) = self.edit(|s| (s.document().id.clone(), s.prepare_save()));
        tracing::info!(
            "[Save] project={:?} pages={} elements={}",
            id,
            snapshot.pages.len(),
            snapshot.layout.len()
        );

        match self
            .services
            .store
            .save(id.as_ref(), &snapshot, self.options.credential.as_ref())
            .await
        {
            Ok(stored) => {
                let saved_id = stored.id.clone();
                self.edit(|s| s.mark_saved(&stored));
                self.notify(Notice::info("Saved successfully!"));
                SaveOutcome::Saved(saved_id)
            }
            Err(e) => {
                tracing::warn!("[Save] failed: {}", e);
                self.notify(Notice::error(format!("Save failed: {}", e)));
                SaveOutcome::Failed(e)
            }
        }
    }

    /// Save, then generate and deliver the code archive
    pub async fn export(&self) -> ExportOutcome {
        let Some(_guard) = InFlight::acquire(&self.exporting) else {
            tracing::debug!("[Export] already in flight, ignoring");
            return ExportOutcome::AlreadyInFlight;
        };

        let id = match self.save().await {
            SaveOutcome::Saved(Some(id)) => id,
            SaveOutcome::Saved(None) => {
                self.notify(Notice::error(format!("Export failed: {}", ExportError::NotSaved)));
                return ExportOutcome::Failed(ExportError::NotSaved);
            }
            SaveOutcome::AlreadyInFlight => {
                self.notify(Notice::error("Export failed: a save is already in progress"));
                return ExportOutcome::NotSaved(SaveOutcome::AlreadyInFlight);
            }
            failed @ SaveOutcome::Failed(_) => return ExportOutcome::NotSaved(failed),
        };

        match self.generate_and_deliver(&id).await {
            Ok(filename) => {
                tracing::info!("[Export] delivered {}", filename);
                self.notify(Notice::info(format!("Exported {}", filename)));
                ExportOutcome::Delivered { filename }
            }
            Err(e) => {
                tracing::warn!("[Export] failed: {}", e);
                self.notify(Notice::error(format!("Export failed: {}", e)));
                ExportOutcome::Failed(e)
            }
        }
    }

    async fn generate_and_deliver(&self, id: &ProjectId) -> Result<String, ExportError> {
        let payload = self
            .services
            .exporter
            .request_export(id, self.options.credential.as_ref())
            .await?;
        let archive = payload.decode()?;
        let filename = archive.filename.clone();
        self.services.sink.deliver(archive)?;
        Ok(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::{ExportArchive, ExportPayload};
    use crate::document::Document;
    use crate::model::{Project, ProjectSnapshot};
    use async_trait::async_trait;
    use pagecraft_common::IdGenerator;
    use pagecraft_registry::SectionType;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingStore {
        fail: bool,
        calls: AtomicUsize,
        last: Mutex<Option<ProjectSnapshot>>,
    }

    #[async_trait]
    impl ProjectStore for RecordingStore {
        async fn save(
            &self,
            id: Option<&ProjectId>,
            snapshot: &ProjectSnapshot,
            _credential: Option<&Credential>,
        ) -> Result<Project, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            if self.fail {
                return Err(StoreError::Unavailable("offline".into()));
            }
            *self.last.lock().unwrap() = Some(snapshot.clone());
            Ok(Project {
                id: Some(id.cloned().unwrap_or_else(|| ProjectId::new("p1"))),
                name: snapshot.name.clone(),
                pages: snapshot.pages.clone(),
                ..Project::default()
            })
        }
    }

    #[derive(Default)]
    struct CountingExporter {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ExportService for CountingExporter {
        async fn request_export(
            &self,
            _id: &ProjectId,
            _credential: Option<&Credential>,
        ) -> Result<ExportPayload, ExportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ExportPayload::encode("site_project.tar", b"tar bytes"))
        }
    }

    #[derive(Default)]
    struct MemorySink(Mutex<Vec<ExportArchive>>);

    impl DownloadSink for MemorySink {
        fn deliver(&self, archive: ExportArchive) -> Result<(), ExportError> {
            self.0.lock().unwrap().push(archive);
            Ok(())
        }
    }

    struct Fixture {
        controller: SessionController,
        store: Arc<RecordingStore>,
        exporter: Arc<CountingExporter>,
        sink: Arc<MemorySink>,
    }

    fn fixture(fail_store: bool) -> Fixture {
        let store = Arc::new(RecordingStore { fail: fail_store, ..Default::default() });
        let exporter = Arc::new(CountingExporter::default());
        let sink = Arc::new(MemorySink::default());
        let session = EditorSession::with_ids(
            Document::new("Site"),
            IdGenerator::with_clock(|| 1_700_000_000_000),
        );
        let controller = SessionController::new(
            session,
            Services { store: store.clone(), exporter: exporter.clone(), sink: sink.clone() },
            ControllerOptions { credential: Some(Credential::bearer("token")), project_id: None },
        );
        Fixture { controller, store, exporter, sink }
    }

    #[tokio::test]
    async fn test_save_records_assigned_id() {
        let f = fixture(false);
        f.controller.edit(|s| s.add_element(SectionType::Hero));

        assert_eq!(f.controller.save().await, SaveOutcome::Saved(Some(ProjectId::new("p1"))));
        assert_eq!(f.controller.read(|s| s.document().id.clone()), Some(ProjectId::new("p1")));

        let snapshot = f.store.last.lock().unwrap().clone().unwrap();
        assert_eq!(snapshot.layout.len(), 1);
        assert_eq!(snapshot.pages[0].layout, snapshot.layout);
    }

    #[tokio::test]
    async fn test_overlapping_saves_are_suppressed() {
        let f = fixture(false);
        let (a, b) = tokio::join!(f.controller.save(), f.controller.save());

        assert!(matches!(a, SaveOutcome::Saved(_)));
        assert_eq!(b, SaveOutcome::AlreadyInFlight);
        assert_eq!(f.store.calls.load(Ordering::SeqCst), 1);
        assert!(!f.controller.is_saving());
    }

    #[tokio::test]
    async fn test_failed_save_keeps_state_and_notifies() {
        let f = fixture(true);
        f.controller.edit(|s| s.add_element(SectionType::Hero));
        let before = f.controller.read(|s| s.document().layout().clone());

        assert!(matches!(f.controller.save().await, SaveOutcome::Failed(_)));
        assert_eq!(f.controller.read(|s| s.document().layout().clone()), before);
        assert_eq!(f.controller.read(|s| s.document().id.clone()), None);

        let notices = f.controller.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn test_export_saves_then_delivers() {
        let f = fixture(false);
        let outcome = f.controller.export().await;

        assert_eq!(outcome, ExportOutcome::Delivered { filename: "site_project.tar".into() });
        assert_eq!(f.store.calls.load(Ordering::SeqCst), 1);
        assert_eq!(f.sink.0.lock().unwrap()[0].bytes, b"tar bytes");
    }

    #[tokio::test]
    async fn test_export_skips_generation_when_save_fails() {
        let f = fixture(true);
        let outcome = f.controller.export().await;

        assert!(matches!(outcome, ExportOutcome::NotSaved(SaveOutcome::Failed(_))));
        assert_eq!(f.exporter.calls.load(Ordering::SeqCst), 0);
        assert!(f.sink.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_overlapping_exports_are_suppressed() {
        let f = fixture(false);
        let (a, b) = tokio::join!(f.controller.export(), f.controller.export());

        assert!(matches!(a, ExportOutcome::Delivered { .. }));
        assert_eq!(b, ExportOutcome::AlreadyInFlight);
        assert_eq!(f.exporter.calls.load(Ordering::SeqCst), 1);
    }
}
