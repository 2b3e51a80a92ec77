use crate::context::{CompileOptions, CompilerContext};
use crate::jsx::{attr, classes, component_ident};
use crate::sections::SectionWriter;
use pagecraft_editor::{Page, RouteMap};
use pagecraft_registry::{palette_or_default, Palette, SectionKind};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("Element {element}: field '{field}' should be an {expected}")]
    MalformedField {
        element: String,
        field: String,
        expected: &'static str,
    },
}

/// Depth of section markup inside `function` / `return (` / `<main>`
const BODY_DEPTH: usize = 3;

/// Compile one page to a standalone React component module
pub fn compile_page(
    page: &Page,
    theme: &str,
    routes: &RouteMap,
    options: CompileOptions,
) -> Result<String, CompileError> {
    let ctx = CompilerContext::new(routes, options);
    let palette = palette_or_default(theme);

    // Sections first: whether the Link import is needed is only known afterwards
    let body = ctx.with_new_buffer();
    for _ in 0..BODY_DEPTH {
        body.indent();
    }
    compile_sections(page, palette, &body)?;
    for _ in 0..BODY_DEPTH {
        body.dedent();
    }

    compile_imports(&ctx);

    ctx.add_line(&format!("export default function {}() {{", component_ident(&page.name)));
    ctx.indent();
    ctx.add_line("return (");
    ctx.indent();
    ctx.add_line(&format!(
        "<main {}>",
        attr("className", &classes(["min-h-screen", palette.bg, palette.text]))
    ));
    ctx.merge_buffer(&body);
    ctx.add_line("</main>");
    ctx.dedent();
    ctx.add_line(");");
    ctx.dedent();
    ctx.add_line("}");

    tracing::debug!(
        "[CompilerReact] page '{}' -> {} ({} sections)",
        page.name,
        component_ident(&page.name),
        page.layout.len()
    );

    Ok(ctx.get_output())
}

fn compile_imports(ctx: &CompilerContext) {
    ctx.add_line("import React from \"react\";");
    if ctx.uses_link() {
        ctx.add_line("import { Link } from \"react-router-dom\";");
    }
    ctx.add("\n");
}

fn compile_sections(page: &Page, palette: &'static Palette, ctx: &CompilerContext) -> Result<(), CompileError> {
    if page.layout.is_empty() {
        ctx.add_line(&format!(
            "<p {}>This page is empty.</p>",
            attr("className", &classes(["py-24 text-center", palette.muted]))
        ));
        return Ok(());
    }

    for element in page.layout.iter() {
        if ctx.options.section_comments {
            ctx.add_line(&format!("{{/* {} */}}", element.kind().tag().replace("*/", "")));
        }
        let writer = SectionWriter::new(ctx, element, palette);
        match element.kind() {
            SectionKind::Known(section) => writer.write(*section)?,
            SectionKind::Unknown(tag) => {
                tracing::warn!("[CompilerReact] no renderer for section type '{}'", tag);
                writer.placeholder();
            }
        }
    }
    Ok(())
}
