use crate::compiler::compile_page;
use crate::context::CompileOptions;
use crate::jsx::{component_ident, text};
use pagecraft_editor::{GenerateError, PageGenerator, PageRequest};

/// Deterministic [`PageGenerator`] backed by the JSX compiler
#[derive(Debug, Clone, Default)]
pub struct ReactGenerator {
    pub options: CompileOptions,
}

impl ReactGenerator {
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }
}

impl PageGenerator for ReactGenerator {
    fn generate_page(&self, request: &PageRequest<'_>) -> Result<String, GenerateError> {
        compile_page(request.page, request.theme, request.routes, self.options.clone())
            .map_err(|e| GenerateError(e.to_string()))
    }
}

/// Minimal valid component used when generation fails
pub fn fallback_source(page_name: &str, theme: &str) -> String {
    format!(
        r#"import {{ useState }} from 'react';

export default function {component}() {{
  return (
    <div className="min-h-screen bg-gray-100">
      <h1 className="text-4xl font-bold text-center py-8">
        {page}
      </h1>
      <p className="text-center text-gray-600">
        Theme: {theme}
      </p>
      <div className="max-w-6xl mx-auto p-4">
        <p className="text-sm text-gray-500">
          AI generation temporarily unavailable. Using fallback template.
        </p>
      </div>
    </div>
  );
}}
"#,
        component = component_ident(page_name),
        page = text(page_name),
        theme = text(theme),
    )
}

/// Run `generator`, substituting [`fallback_source`] on failure
pub fn generate_page_or_fallback(generator: &dyn PageGenerator, request: &PageRequest<'_>) -> String {
    match generator.generate_page(request) {
        Ok(source) => source,
        Err(e) => {
            tracing::warn!(
                "[CompilerReact] generation failed for page '{}', using fallback: {}",
                request.page.name,
                e
            );
            fallback_source(&request.page.name, request.theme)
        }
    }
}
