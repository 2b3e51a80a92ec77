use crate::commands::compile::load_project;
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_compiler_react::{compile_page, CompileOptions};
use pagecraft_editor::{dangling_links, Document, RouteMap};
use pagecraft_registry::collections::{item_count, parallel_arrays_consistent};
use pagecraft_registry::{Collection, SectionKind};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Args, Debug)]
pub struct LintArgs {
    /// Project file (overrides config)
    #[arg(short, long)]
    pub project: Option<String>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub severity: Severity,
    pub rule: &'static str,
    pub page: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    pub message: String,
}

/// All findings for `document`, page by page
pub fn lint_document(document: &Document) -> Vec<Diagnostic> {
    let project = document.to_project();
    let pages = project.pages.as_slice();
    let mut diagnostics = Vec::new();

    for link in dangling_links(pages) {
        tracing::warn!("[Lint] dangling link {} on {}", link.location, link.element_id);
        diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            rule: "dangling-link",
            page: link.page_id.to_string(),
            element: Some(link.element_id.to_string()),
            message: format!("{} points at deleted page '{}'", link.location, link.target),
        });
    }

    let mut by_route: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for page in pages {
        by_route.entry(page.route.as_str()).or_default().push(page.name.as_str());
    }
    for (route, names) in by_route.into_iter().filter(|(_, names)| names.len() > 1) {
        diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            rule: "duplicate-route",
            page: names.join(", "),
            element: None,
            message: format!("{} pages share route {}", names.len(), route),
        });
    }

    let routes = RouteMap::from_pages(pages);
    for page in pages {
        for element in page.layout.iter() {
            let located = |severity: Severity, rule: &'static str, message: String| Diagnostic {
                severity,
                rule,
                page: page.id.to_string(),
                element: Some(element.id().to_string()),
                message,
            };
            match element.kind() {
                SectionKind::Unknown(tag) => diagnostics.push(located(
                    Severity::Warning,
                    "unknown-section",
                    format!("unknown section type '{}' renders as a placeholder", tag),
                )),
                SectionKind::Known(section) => {
                    let parallel = matches!(section.spec().collection, Some(Collection::Parallel { .. }));
                    if parallel && !parallel_arrays_consistent(*section, element.data()) {
                        let detail = match item_count(*section, element.data()) {
                            Err(e) => e.to_string(),
                            Ok(len) => format!("count does not match {} items", len),
                        };
                        diagnostics.push(located(Severity::Error, "parallel-mismatch", detail));
                    }
                }
            }
        }

        if let Err(e) = compile_page(page, &document.theme, &routes, CompileOptions::default()) {
            diagnostics.push(Diagnostic {
                severity: Severity::Error,
                rule: "compile-error",
                page: page.id.to_string(),
                element: None,
                message: e.to_string(),
            });
        }
    }

    diagnostics
}

pub fn lint(args: LintArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let document = load_project(&config, cwd, args.project.as_deref())?;
    let diagnostics = lint_document(&document);

    let errors = diagnostics.iter().filter(|d| d.severity == Severity::Error).count();
    let warnings = diagnostics.len() - errors;

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&diagnostics)?);
    } else {
        println!("🔍 {} {}", "Linting".green().bold(), document.name);
        println!();
        for diagnostic in &diagnostics {
            let level = match diagnostic.severity {
                Severity::Error => "error".red().bold(),
                Severity::Warning => "warning".yellow().bold(),
            };
            let at = match &diagnostic.element {
                Some(element) => format!("{} / {}", diagnostic.page, element),
                None => diagnostic.page.clone(),
            };
            println!("  {} [{}] {}: {}", level, diagnostic.rule, at.dimmed(), diagnostic.message);
        }
        println!();
        println!("   Pages checked: {}", document.pages().len());
        if errors > 0 {
            println!("   {} {}", "Errors:".red(), errors);
        }
        if warnings > 0 {
            println!("   {} {}", "Warnings:".yellow(), warnings);
        }
        if diagnostics.is_empty() {
            println!("   {} No issues found!", "✓".green());
        }
    }

    if errors > 0 {
        return Err(anyhow!("{} lint errors", errors));
    }
    Ok(())
}
