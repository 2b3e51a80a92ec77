use pagecraft_common::CommonResult;
use pagecraft_compiler_react::CompileOptions;
use pagecraft_registry::DEFAULT_THEME;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "pagecraft.config.json";

/// Pagecraft configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Project document the commands operate on
    #[serde(default = "default_project_file")]
    pub project_file: String,

    /// Output directory for generated code and archives
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    /// Theme for projects created by `init`
    #[serde(default = "default_theme")]
    pub default_theme: String,

    /// React code generation options
    #[serde(default)]
    pub compiler_options: CompileOptions,
}

fn default_project_file() -> String {
    "project.json".to_string()
}

fn default_out_dir() -> String {
    "dist".to_string()
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

impl Config {
    /// Load config from a directory; a missing file yields defaults
    pub fn load(cwd: &Path) -> CommonResult<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, cwd: &Path) -> CommonResult<PathBuf> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);
        std::fs::write(&config_path, serde_json::to_string_pretty(self)?)?;
        Ok(config_path)
    }

    pub fn project_path(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.project_file)
    }

    /// Output directory, with an optional command-line override
    pub fn out_path(&self, cwd: &Path, over: Option<&str>) -> PathBuf {
        cwd.join(over.unwrap_or(&self.out_dir))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_file: default_project_file(),
            out_dir: default_out_dir(),
            default_theme: default_theme(),
            compiler_options: CompileOptions::default(),
        }
    }
}
