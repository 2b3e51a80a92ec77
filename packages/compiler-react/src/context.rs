use pagecraft_editor::RouteMap;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Options for React compilation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    /// Render internal links as react-router `<Link>`; plain anchors otherwise
    pub use_router: bool,
    /// Emit a `{/* type */}` marker before every section
    pub section_comments: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            use_router: true,
            section_comments: true,
        }
    }
}

/// Compilation context for managing state during code generation
pub struct CompilerContext<'a> {
    buffer: Rc<RefCell<String>>,
    indent_level: Rc<Cell<usize>>,
    uses_link: Rc<Cell<bool>>,
    pub routes: &'a RouteMap,
    pub options: CompileOptions,
}

impl<'a> CompilerContext<'a> {
    pub fn new(routes: &'a RouteMap, options: CompileOptions) -> Self {
        Self {
            buffer: Rc::new(RefCell::new(String::new())),
            indent_level: Rc::new(Cell::new(0)),
            uses_link: Rc::new(Cell::new(false)),
            routes,
            options,
        }
    }

    pub fn add(&self, text: &str) {
        self.buffer.borrow_mut().push_str(text);
    }

    pub fn add_line(&self, text: &str) {
        self.add_indented(text);
        self.add("\n");
    }

    pub fn add_indented(&self, text: &str) {
        let indent = "  ".repeat(self.indent_level.get());
        let mut buffer = self.buffer.borrow_mut();
        buffer.push_str(&indent);
        buffer.push_str(text);
    }

    pub fn indent(&self) {
        self.indent_level.set(self.indent_level.get() + 1);
    }

    pub fn dedent(&self) {
        self.indent_level.set(self.indent_level.get().saturating_sub(1));
    }

    /// Record that the output needs the router `Link` import
    pub fn mark_link_used(&self) {
        self.uses_link.set(true);
    }

    pub fn uses_link(&self) -> bool {
        self.uses_link.get()
    }

    pub fn get_output(&self) -> String {
        self.buffer.borrow().clone()
    }

    /// Child context writing to its own buffer, sharing indentation and flags
    pub fn with_new_buffer(&self) -> Self {
        Self {
            buffer: Rc::new(RefCell::new(String::new())),
            indent_level: self.indent_level.clone(),
            uses_link: self.uses_link.clone(),
            routes: self.routes,
            options: self.options.clone(),
        }
    }

    pub fn merge_buffer(&self, other: &CompilerContext<'_>) {
        self.buffer.borrow_mut().push_str(&other.buffer.borrow());
    }
}
