//! Configuration for rptok.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (RPTOK_TEMPLATE, RPTOK_OUTPUT_DIR)
//! 2. Project config file (.rptok/config.yaml in the current directory or a parent)
//! 3. User config file (~/.rptok/config.yaml)
//! 4. Defaults (embedded content template, current directory, compressed)
//!
//! Paths in a config file are relative to the directory containing `.rptok/`.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::{ContentRenderer, TokenWriter, DEFAULT_CONTENT_TEMPLATE};

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub template: TemplateConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateConfig {
    /// Content template path (relative to the project root)
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Directory for token files when no output path is given
    pub dir: Option<String>,
    /// DEFLATE archive entries (default true)
    pub compressed: Option<bool>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Custom content template, if any
    pub content_template: Option<PathBuf>,
    /// Where token files go by default
    pub output_dir: PathBuf,
    /// Whether archive entries are compressed
    pub compressed: bool,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Content template source: the configured file, or the embedded default
    pub fn template_source(&self) -> Result<String> {
        match self.content_template {
            Some(ref path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read content template: {}", path.display())),
            None => Ok(DEFAULT_CONTENT_TEMPLATE.to_string()),
        }
    }

    /// Token writer built from this configuration
    pub fn writer(&self) -> Result<TokenWriter> {
        let source = self.template_source()?;
        let renderer = ContentRenderer::new(&source).with_context(|| {
            match self.content_template {
                Some(ref path) => format!("Failed to compile content template: {}", path.display()),
                None => "Failed to compile built-in content template".to_string(),
            }
        })?;
        Ok(TokenWriter::new(renderer).compressed(self.compressed))
    }
}

/// Find config file by searching current directory and parents, then home
fn find_config_file() -> Option<PathBuf> {
    if let Ok(mut current) = std::env::current_dir() {
        loop {
            let config_path = current.join(".rptok").join("config.yaml");
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                break;
            }
        }
    }

    let user_config = dirs::home_dir()?.join(".rptok").join("config.yaml");
    user_config.exists().then_some(user_config)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's project root
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Merge a config file (if any) with env vars and defaults
fn resolve_config(config_file: Option<PathBuf>) -> Result<ResolvedConfig> {
    let (template, output_dir, compressed) = if let Some(ref config_path) = config_file {
        let config = load_config_file(config_path)?;

        // Base directory is the parent of .rptok/ (i.e., grandparent of config.yaml)
        let base_dir = config_path
            .parent()
            .and_then(|p| p.parent())
            .unwrap_or(Path::new("."));

        (
            config.template.content.map(|p| resolve_path(base_dir, &p)),
            config.output.dir.map(|p| resolve_path(base_dir, &p)),
            config.output.compressed.unwrap_or(true),
        )
    } else {
        (None, None, true)
    };

    let content_template = std::env::var("RPTOK_TEMPLATE")
        .map(PathBuf::from)
        .ok()
        .or(template);

    let output_dir = std::env::var("RPTOK_OUTPUT_DIR")
        .map(PathBuf::from)
        .ok()
        .or(output_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    Ok(ResolvedConfig {
        content_template,
        output_dir,
        compressed,
        config_file,
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    resolve_config(find_config_file())
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(temp: &TempDir, body: &str) -> PathBuf {
        let rptok_dir = temp.path().join(".rptok");
        std::fs::create_dir_all(&rptok_dir).unwrap();

        let config_path = rptok_dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "{}", body).unwrap();
        config_path
    }

    #[test]
    fn test_defaults_without_file() {
        let config = resolve_config(None).unwrap();

        assert!(config.config_file.is_none());
        assert!(config.compressed);
        if std::env::var("RPTOK_TEMPLATE").is_err() {
            assert!(config.content_template.is_none());
            assert_eq!(config.template_source().unwrap(), DEFAULT_CONTENT_TEMPLATE);
        }
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(
            &temp,
            r#"
version: "1.0"
template:
  content: templates/content.xml
output:
  dir: tokens
  compressed: false
"#,
        );

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.template.content, Some("templates/content.xml".to_string()));
        assert_eq!(config.output.dir, Some("tokens".to_string()));
        assert_eq!(config.output.compressed, Some(false));
    }

    #[test]
    fn test_paths_resolve_against_project_root() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(
            &temp,
            "version: \"1.0\"\ntemplate:\n  content: custom.xml\noutput:\n  compressed: false\n",
        );
        std::fs::write(temp.path().join("custom.xml"), "<t>{{name}}</t>").unwrap();

        let config = resolve_config(Some(config_path)).unwrap();
        assert!(!config.compressed);
        if std::env::var("RPTOK_TEMPLATE").is_err() {
            let template = config.content_template.clone().unwrap();
            assert!(template.ends_with("custom.xml"));
            assert_eq!(config.template_source().unwrap(), "<t>{{name}}</t>");
            assert!(config.writer().is_ok());
        }
    }

    #[test]
    fn test_missing_template_file() {
        let config = ResolvedConfig {
            content_template: Some(PathBuf::from("/nonexistent/content.xml")),
            output_dir: PathBuf::from("."),
            compressed: true,
            config_file: None,
        };
        assert!(config.template_source().is_err());
        assert!(config.writer().is_err());
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "./subdir"),
            PathBuf::from("/home/user/project/subdir")
        );
        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
    }
}
