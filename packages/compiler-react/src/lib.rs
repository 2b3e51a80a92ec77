//! React/JSX code generation for pagecraft projects.
//!
//! [`compile_page`] turns one page into a component module, resolving
//! internal links through a route map into router `<Link>`s. [`compile_app`]
//! and [`scaffold_files`] produce the rest of a runnable Vite project.

mod app;
mod compiler;
mod context;
mod generator;
mod jsx;
mod sections;

pub use app::{compile_app, component_names, package_name, page_module_path, scaffold_files};
pub use compiler::{compile_page, CompileError};
pub use context::{CompileOptions, CompilerContext};
pub use generator::{fallback_source, generate_page_or_fallback, ReactGenerator};
pub use jsx::component_ident;
