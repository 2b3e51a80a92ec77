//! # Service boundaries
//!
//! The editor core never talks to storage, export or code generation
//! directly. Each is a trait implemented elsewhere (the workspace crate ships
//! in-process implementations).

use crate::links::RouteMap;
use crate::model::{Page, Project, ProjectId, ProjectSnapshot};
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Opaque bearer credential attached to boundary calls
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Project not found")]
    NotFound,

    #[error("Not authorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Invalid project: {0}")]
    Validation(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    #[error("Project has not been saved yet")]
    NotSaved,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Code generation failed: {0}")]
    Generate(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Invalid export payload: {0}")]
    Decode(String),

    #[error("Download failed: {0}")]
    Download(String),
}

/// Persistence boundary
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Create (no id) or update the project; returns the stored document
    async fn save(
        &self,
        id: Option<&ProjectId>,
        snapshot: &ProjectSnapshot,
        credential: Option<&Credential>,
    ) -> Result<Project, StoreError>;
}

/// Archive as returned by the export boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportPayload {
    pub filename: String,
    /// Base64-encoded archive bytes
    pub data: String,
}

impl ExportPayload {
    pub fn encode(filename: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            filename: filename.into(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    pub fn decode(&self) -> Result<ExportArchive, ExportError> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(self.data.trim())
            .map_err(|e| ExportError::Decode(e.to_string()))?;
        Ok(ExportArchive { filename: self.filename.clone(), bytes })
    }
}

/// Decoded archive ready for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArchive {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Export boundary: generate code for a saved project and pack it
#[async_trait]
pub trait ExportService: Send + Sync {
    async fn request_export(
        &self,
        id: &ProjectId,
        credential: Option<&Credential>,
    ) -> Result<ExportPayload, ExportError>;
}

/// Hands the archive to the user (file save, browser download, ...)
pub trait DownloadSink: Send + Sync {
    fn deliver(&self, archive: ExportArchive) -> Result<(), ExportError>;
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Generation failed: {0}")]
pub struct GenerateError(pub String);

/// Input of one page generation
#[derive(Debug, Clone)]
pub struct PageRequest<'a> {
    pub page: &'a Page,
    pub theme: &'a str,
    pub routes: &'a RouteMap,
}

/// Code-generation boundary consumed by the export service
pub trait PageGenerator: Send + Sync {
    fn generate_page(&self, request: &PageRequest<'_>) -> Result<String, GenerateError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_decodes() {
        let payload = ExportPayload::encode("site_project.tar", b"archive");
        let archive = payload.decode().unwrap();
        assert_eq!(archive.filename, "site_project.tar");
        assert_eq!(archive.bytes, b"archive");
    }

    #[test]
    fn test_bad_payload() {
        let payload = ExportPayload { filename: "x".into(), data: "%%%".into() };
        assert!(matches!(payload.decode(), Err(ExportError::Decode(_))));
    }

    #[test]
    fn test_credential_is_not_logged() {
        let c = Credential::bearer("secret");
        assert_eq!(format!("{:?}", c), "Credential(***)");
    }
}
