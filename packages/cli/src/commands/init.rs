use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_editor::{Document, EditorSession};
use pagecraft_registry::SectionType;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Project name
    #[arg(short, long, default_value = "My Site")]
    pub name: String,

    /// Theme of the new project (defaults to the configured theme)
    #[arg(short, long)]
    pub theme: Option<String>,

    /// Force overwrite existing files
    #[arg(short, long)]
    pub force: bool,
}

/// Starter document: a Home page with navbar, hero and footer
pub fn starter_document(name: &str, theme: &str) -> Document {
    let mut session = EditorSession::new(Document::new(name));
    session.set_theme(theme);
    for section in [SectionType::Navbar, SectionType::Hero, SectionType::Footer] {
        session.add_element(section);
    }
    let (document, _) = session.document().prepare_save();
    document
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let mut config = Config::load(cwd)?;
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);
    let project_path = config.project_path(cwd);

    if (config_path.exists() || project_path.exists()) && !args.force {
        let existing = if project_path.exists() {
            config.project_file.as_str()
        } else {
            DEFAULT_CONFIG_NAME
        };
        println!("{} {} already exists", "⚠️".yellow(), existing.bright_white());
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing pagecraft project...".bright_blue().bold());

    if let Some(theme) = &args.theme {
        config.default_theme = theme.clone();
    }
    config.save(cwd)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    let document = starter_document(&args.name, &config.default_theme);
    document.save_to(&project_path)?;
    println!("  {} Created {}", "✓".green(), config.project_file);

    tracing::info!("[Init] {} ({} theme)", args.name, config.default_theme);

    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}", config.project_file);
    println!("  2. Run: pagecraft compile");
    println!("  3. Check output in {}/", config.out_dir);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_config_and_project() {
        let dir = tempfile::tempdir().unwrap();
        let args = InitArgs {
            name: "Demo".to_string(),
            theme: Some("dark".to_string()),
            force: false,
        };
        init(args, dir.path()).unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.default_theme, "dark");

        let document = Document::load(&dir.path().join("project.json")).unwrap();
        assert_eq!(document.name, "Demo");
        assert_eq!(document.theme, "dark");
        assert_eq!(document.pages().len(), 1);
        assert_eq!(document.pages()[0].layout.len(), 3);
    }

    #[test]
    fn test_init_keeps_existing_project_without_force() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("project.json"), "{\"name\":\"Keep\"}").unwrap();

        let args = InitArgs {
            name: "Other".to_string(),
            theme: None,
            force: false,
        };
        init(args, dir.path()).unwrap();

        let kept = std::fs::read_to_string(dir.path().join("project.json")).unwrap();
        assert!(kept.contains("Keep"));
    }
}
