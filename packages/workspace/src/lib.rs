//! In-process implementations of the editor's persistence and export
//! boundaries.

mod archive;
mod auth;
mod export;
mod store;

pub use archive::pack;
pub use auth::{authenticate, identify, StaticTokens, TokenVerifier};
pub use export::{archive_name, project_files, LocalExporter};
pub use store::MemoryProjectStore;
