use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_compiler_react::{
    compile_app, compile_page, component_names, page_module_path, scaffold_files,
};
use pagecraft_editor::{Document, Page};
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Project file (overrides config)
    #[arg(short, long)]
    pub project: Option<String>,

    /// Only compile the page with this id or name
    #[arg(long)]
    pub page: Option<String>,

    /// Theme to compile with (defaults to the project theme)
    #[arg(short, long)]
    pub theme: Option<String>,

    /// Output to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,

    /// Also write package.json, vite/tailwind config and entry files
    #[arg(long)]
    pub scaffold: bool,
}

pub fn load_project(config: &Config, cwd: &Path, over: Option<&str>) -> Result<Document> {
    let path = match over {
        Some(p) => cwd.join(p),
        None => config.project_path(cwd),
    };
    Document::load(&path).with_context(|| format!("Cannot load project {}", path.display()))
}

fn matches_page(page: &Page, filter: &str) -> bool {
    page.id.as_str() == filter || page.name.eq_ignore_ascii_case(filter)
}

fn write_file(out_dir: &Path, relative: &str, contents: &str) -> Result<()> {
    let path = out_dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, contents)?;
    Ok(())
}

pub fn compile(args: CompileArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let document = load_project(&config, cwd, args.project.as_deref())?;
    let out_dir = config.out_path(cwd, args.out_dir.as_deref());
    let theme = args.theme.clone().unwrap_or_else(|| document.theme.clone());

    let pages = document.pages();
    let routes = document.route_map();
    let names = component_names(pages);

    let selected: Vec<_> = pages
        .iter()
        .zip(&names)
        .filter(|(page, _)| args.page.as_deref().map_or(true, |f| matches_page(page, f)))
        .collect();
    if selected.is_empty() {
        return Err(anyhow!("No page matches '{}'", args.page.unwrap_or_default()));
    }

    if !args.stdout {
        println!("{}", "🔨 Compiling pages...".bright_blue().bold());
    }

    let mut success_count = 0;
    let mut error_count = 0;

    for (page, name) in selected {
        match compile_page(page, &theme, &routes, config.compiler_options.clone()) {
            Ok(output) if args.stdout => {
                success_count += 1;
                println!("{}", output);
            }
            Ok(output) => {
                let relative = page_module_path(name);
                write_file(&out_dir, &relative, &output)?;
                success_count += 1;
                println!("  {} {} ({}) → {}", "✓".green(), page.name, page.route, relative);
            }
            Err(e) => {
                error_count += 1;
                tracing::warn!("[Compile] page '{}' failed: {}", page.name, e);
                eprintln!("  {} {} - {}", "✗".red(), page.name, e.to_string().red());
            }
        }
    }

    if !args.stdout && args.page.is_none() {
        write_file(&out_dir, "src/App.jsx", &compile_app(pages))?;
        println!("  {} router → src/App.jsx", "✓".green());

        if args.scaffold {
            for (path, contents) in scaffold_files(&document.name) {
                write_file(&out_dir, &path, &contents)?;
            }
            println!("  {} project scaffold", "✓".green());
        }
    }

    if args.stdout {
        return if error_count == 0 {
            Ok(())
        } else {
            Err(anyhow!("{} pages failed to compile", error_count))
        };
    }

    println!();
    if error_count == 0 {
        println!("{} Compiled {} pages into {}", "✅".green(), success_count, out_dir.display());
        Ok(())
    } else {
        println!("{} Compiled {} pages, {} errors", "⚠️".yellow(), success_count, error_count);
        Err(anyhow!("{} pages failed to compile", error_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init::starter_document;
    use pagecraft_editor::EditorSession;

    fn args() -> CompileArgs {
        CompileArgs {
            project: None,
            page: None,
            theme: None,
            stdout: false,
            out_dir: None,
            scaffold: false,
        }
    }

    fn write_project(dir: &Path) {
        let mut session = EditorSession::new(starter_document("Demo", "light"));
        let about = session.add_page().unwrap();
        session.rename_page(&about, "About Us");
        session.document().save_to(&dir.join("project.json")).unwrap();
    }

    #[test]
    fn test_compile_writes_pages_and_router() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path());

        compile(args(), dir.path()).unwrap();

        let dist = dir.path().join("dist");
        assert!(dist.join("src/pages/Home.jsx").exists());
        assert!(dist.join("src/pages/AboutUs.jsx").exists());
        let app = fs::read_to_string(dist.join("src/App.jsx")).unwrap();
        assert!(app.contains("<Route path=\"/about-us\" element={<AboutUs />} />"));
        assert!(!dist.join("package.json").exists());
    }

    #[test]
    fn test_compile_single_page_skips_router() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path());

        let only_about = CompileArgs {
            page: Some("about us".to_string()),
            out_dir: Some("build".to_string()),
            scaffold: true,
            ..args()
        };
        compile(only_about, dir.path()).unwrap();

        let build = dir.path().join("build");
        assert!(build.join("src/pages/AboutUs.jsx").exists());
        assert!(!build.join("src/pages/Home.jsx").exists());
        assert!(!build.join("src/App.jsx").exists());
    }

    #[test]
    fn test_compile_with_scaffold() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path());

        compile(CompileArgs { scaffold: true, ..args() }, dir.path()).unwrap();
        assert!(dir.path().join("dist/package.json").exists());
        assert!(dir.path().join("dist/src/main.jsx").exists());
    }

    #[test]
    fn test_unknown_page_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path());

        let missing = CompileArgs {
            page: Some("pricing".to_string()),
            ..args()
        };
        assert!(compile(missing, dir.path()).is_err());
    }

    #[test]
    fn test_missing_project_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(compile(args(), dir.path()).is_err());
    }
}
