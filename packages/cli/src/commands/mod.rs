pub mod compile;
pub mod export;
pub mod init;
pub mod lint;

pub use compile::{compile, CompileArgs};
pub use export::{export, ExportArgs};
pub use init::{init, InitArgs};
pub use lint::{lint, LintArgs};
