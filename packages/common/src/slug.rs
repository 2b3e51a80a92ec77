//! Route and file-name slugs derived from human-edited names.

use regex::Regex;
use std::sync::OnceLock;

/// Name of the page that always lives at `/`
pub const HOME_PAGE_NAME: &str = "Home";

/// Route of the home page
pub const HOME_ROUTE: &str = "/";

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static whitespace pattern"))
}

/// Lowercase `name` and collapse every whitespace run into a single `-`
pub fn slugify(name: &str) -> String {
    whitespace_runs()
        .replace_all(name.trim(), "-")
        .to_lowercase()
}

/// Route for a page called `name`
///
/// A page named "Home" (any case) always maps to `/`.
pub fn route_for_name(name: &str) -> String {
    if name.trim().eq_ignore_ascii_case(HOME_PAGE_NAME) {
        return HOME_ROUTE.to_string();
    }
    format!("/{}", slugify(name))
}

/// React component identifier for a page name ("About Us" -> "AboutUs")
pub fn component_name(name: &str) -> String {
    whitespace_runs().replace_all(name.trim(), "").into_owned()
}
