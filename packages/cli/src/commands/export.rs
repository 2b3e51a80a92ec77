use crate::commands::compile::load_project;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_compiler_react::ReactGenerator;
use pagecraft_editor::ExportPayload;
use pagecraft_workspace::{archive_name, pack, project_files};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Project file (overrides config)
    #[arg(short, long)]
    pub project: Option<String>,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,

    /// Write the base64 `{filename, data}` payload instead of the raw archive
    #[arg(long)]
    pub payload: bool,
}

/// Build the project archive; returns the written path
pub fn export(args: ExportArgs, cwd: &Path) -> Result<PathBuf> {
    let config = Config::load(cwd)?;
    let document = load_project(&config, cwd, args.project.as_deref())?;
    let out_dir = config.out_path(cwd, args.out_dir.as_deref());

    println!("{}", "📦 Exporting project...".bright_blue().bold());

    let generator = ReactGenerator::new(config.compiler_options.clone());
    let files = project_files(&document.to_project(), &generator);
    let bytes = pack(&files)?;
    let filename = archive_name(&document.name);
    fs::create_dir_all(&out_dir)?;

    let path = if args.payload {
        let path = out_dir.join(format!("{}.json", filename));
        let payload = ExportPayload::encode(filename, &bytes);
        fs::write(&path, serde_json::to_string_pretty(&payload)?)?;
        path
    } else {
        let path = out_dir.join(&filename);
        fs::write(&path, &bytes)?;
        path
    };

    tracing::info!("[Export] {} files, {} bytes", files.len(), bytes.len());
    println!("  {} {} files → {}", "✓".green(), files.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init::starter_document;

    fn write_project(dir: &Path) {
        starter_document("Demo Site", "ocean")
            .save_to(&dir.join("project.json"))
            .unwrap();
    }

    #[test]
    fn test_export_writes_tar() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path());

        let args = ExportArgs {
            project: None,
            out_dir: None,
            payload: false,
        };
        let path = export(args, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("dist/demo-site_project.tar"));

        let bytes = fs::read(&path).unwrap();
        let mut archive = tar::Archive::new(&bytes[..]);
        let names: Vec<String> = archive
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().to_string_lossy().to_string())
            .collect();
        assert!(names.contains(&"src/pages/Home.jsx".to_string()));
        assert!(names.contains(&"src/App.jsx".to_string()));
        assert!(names.contains(&"package.json".to_string()));
    }

    #[test]
    fn test_export_payload_decodes() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path());

        let args = ExportArgs {
            project: None,
            out_dir: Some("out".to_string()),
            payload: true,
        };
        let path = export(args, dir.path()).unwrap();

        let payload: ExportPayload = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(payload.filename, "demo-site_project.tar");
        assert!(!payload.decode().unwrap().bytes.is_empty());
    }
}
