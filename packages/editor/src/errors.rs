//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid project document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(#[from] crate::boundary::StoreError),

    #[error("Export error: {0}")]
    Export(#[from] crate::boundary::ExportError),
}
