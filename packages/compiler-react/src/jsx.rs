//! JSX literal helpers. Values from element data are arbitrary user text, so
//! anything that could break out of an attribute or text node is emitted as a
//! JS string expression instead.

use serde_json::Value;

/// Double-quoted JS string literal
pub fn js_str(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

fn is_plain_attr(s: &str) -> bool {
    !s.chars().any(|c| matches!(c, '"' | '\\' | '{' | '}' | '\n' | '\r'))
}

fn is_plain_text(s: &str) -> bool {
    !s.is_empty()
        && s.trim() == s
        && !s
            .chars()
            .any(|c| matches!(c, '{' | '}' | '<' | '>' | '&' | '"' | '\'' | '\\' | '\n' | '\r'))
}

/// `name="value"`, or `name={"value"}` when the value needs escaping
pub fn attr(name: &str, value: &str) -> String {
    if is_plain_attr(value) {
        format!("{}=\"{}\"", name, value)
    } else {
        format!("{}={{{}}}", name, js_str(value))
    }
}

/// Text child, wrapped in an expression when it needs escaping
pub fn text(value: &str) -> String {
    if is_plain_text(value) {
        value.to_string()
    } else {
        format!("{{{}}}", js_str(value))
    }
}

/// Space-joined class list without empty entries
pub fn classes<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Valid component identifier for a page name
///
/// Whitespace is dropped and any other character that cannot appear in a JS
/// identifier is removed; a leading digit or an empty result gets a `Page`
/// prefix.
pub fn component_ident(name: &str) -> String {
    let stripped = pagecraft_common::component_name(name);
    let ident: String = stripped
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '$')
        .collect();
    match ident.chars().next() {
        None => "Page".to_string(),
        Some(c) if c.is_ascii_digit() => format!("Page{}", ident),
        Some(c) if c.is_ascii_lowercase() => {
            let mut upper = c.to_ascii_uppercase().to_string();
            upper.push_str(&ident[1..]);
            upper
        }
        Some(_) => ident,
    }
}
