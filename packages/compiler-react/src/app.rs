//! Router entry point and the static files of a runnable Vite project.

use crate::context::{CompileOptions, CompilerContext};
use crate::jsx::{attr, component_ident, js_str};
use pagecraft_editor::{Page, RouteMap};
use serde_json::json;
use std::collections::HashSet;

/// Component name of every page, in page order
///
/// Two pages whose names reduce to the same identifier get numeric
/// suffixes (`About`, `About2`).
pub fn component_names(pages: &[Page]) -> Vec<String> {
    let mut taken = HashSet::new();
    pages
        .iter()
        .map(|page| {
            let base = component_ident(&page.name);
            let mut name = base.clone();
            let mut n = 2;
            while !taken.insert(name.clone()) {
                name = format!("{}{}", base, n);
                n += 1;
            }
            name
        })
        .collect()
}

/// Path of a page module inside the generated project
pub fn page_module_path(component: &str) -> String {
    format!("src/pages/{}.jsx", component)
}

/// `App.jsx`: one `<Route>` per page, keyed by the page route
pub fn compile_app(pages: &[Page]) -> String {
    let routes = RouteMap::default();
    let ctx = CompilerContext::new(&routes, CompileOptions::default());
    let names = component_names(pages);

    ctx.add_line("import React from \"react\";");
    ctx.add_line("import { Routes, Route } from \"react-router-dom\";");
    for name in &names {
        ctx.add_line(&format!("import {} from {};", name, js_str(&format!("./pages/{}.jsx", name))));
    }
    ctx.add("\n");

    ctx.add_line("export default function App() {");
    ctx.indent();
    ctx.add_line("return (");
    ctx.indent();
    ctx.add_line("<Routes>");
    ctx.indent();
    for (page, name) in pages.iter().zip(&names) {
        ctx.add_line(&format!("<Route {} element={{<{} />}} />", attr("path", &page.route), name));
    }
    ctx.dedent();
    ctx.add_line("</Routes>");
    ctx.dedent();
    ctx.add_line(");");
    ctx.dedent();
    ctx.add_line("}");

    ctx.get_output()
}

/// npm package name: lowercase, whitespace runs collapsed to `-`
pub fn package_name(project_name: &str) -> String {
    let name = project_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    if name.is_empty() {
        "pagecraft-site".to_string()
    } else {
        name
    }
}

/// Static project files (path, contents) surrounding the generated pages
pub fn scaffold_files(project_name: &str) -> Vec<(String, String)> {
    let package = json!({
        "name": package_name(project_name),
        "version": "1.0.0",
        "type": "module",
        "scripts": {
            "dev": "vite",
            "build": "vite build",
            "preview": "vite preview"
        },
        "dependencies": {
            "react": "^18.2.0",
            "react-dom": "^18.2.0",
            "react-router-dom": "^6.20.0",
            "lucide-react": "^0.294.0"
        },
        "devDependencies": {
            "@vitejs/plugin-react": "^4.2.0",
            "autoprefixer": "^10.4.16",
            "postcss": "^8.4.32",
            "tailwindcss": "^3.3.6",
            "vite": "^5.0.8"
        }
    });
    let package_json = serde_json::to_string_pretty(&package).unwrap_or_default();

    let vite_config = "\
import { defineConfig } from 'vite';
import react from '@vitejs/plugin-react';

export default defineConfig({
  plugins: [react()],
});
";

    let tailwind_config = "\
/** @type {import('tailwindcss').Config} */
export default {
  content: ['./index.html', './src/**/*.{js,jsx}'],
  theme: {
    extend: {},
  },
  plugins: [],
};
";

    let postcss_config = "\
export default {
  plugins: {
    tailwindcss: {},
    autoprefixer: {},
  },
};
";

    let index_html = format!(
        "<!doctype html>
<html lang=\"en\">
  <head>
    <meta charset=\"UTF-8\" />
    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\" />
    <title>{}</title>
  </head>
  <body>
    <div id=\"root\"></div>
    <script type=\"module\" src=\"/src/main.jsx\"></script>
  </body>
</html>
",
        escape_html(project_name)
    );

    let main_jsx = "\
import React from 'react';
import ReactDOM from 'react-dom/client';
import { BrowserRouter } from 'react-router-dom';
import App from './App.jsx';
import './index.css';

ReactDOM.createRoot(document.getElementById('root')).render(
  <React.StrictMode>
    <BrowserRouter>
      <App />
    </BrowserRouter>
  </React.StrictMode>
);
";

    let index_css = "\
@tailwind base;
@tailwind components;
@tailwind utilities;
";

    let gitignore = "node_modules\ndist\n.env\n";

    vec![
        ("package.json".to_string(), package_json),
        ("vite.config.js".to_string(), vite_config.to_string()),
        ("tailwind.config.js".to_string(), tailwind_config.to_string()),
        ("postcss.config.js".to_string(), postcss_config.to_string()),
        ("index.html".to_string(), index_html),
        ("src/main.jsx".to_string(), main_jsx.to_string()),
        ("src/index.css".to_string(), index_css.to_string()),
        (".gitignore".to_string(), gitignore.to_string()),
    ]
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
