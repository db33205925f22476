//! Command-line interface for rptok.
//!
//! Provides commands for building token files, listing sizes and
//! showing the resolved configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing::info;

use crate::config;
use crate::core::WriteMode;
use crate::domain::{PropertyValue, State, TokenManifest, TokenSize};

/// rptok - MapTool token file builder
#[derive(Parser, Debug)]
#[command(name = "rptok")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a token file from an image and optional manifest
    Build(BuildArgs),

    /// List token sizes and their encoded GUIDs
    Sizes,

    /// Show resolved configuration (debug)
    Config,
}

#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Token manifest (YAML); the flags below override it
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Token image (required unless the manifest names one)
    #[arg(short, long)]
    pub image: Option<PathBuf>,

    /// Portrait image
    #[arg(short, long)]
    pub portrait: Option<PathBuf>,

    /// Token name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Token size (Fine, Diminutive, Tiny, Small, Medium, Large, Huge, Gargantuan, Colossal)
    #[arg(short, long)]
    pub size: Option<String>,

    /// State override, e.g. Dead=boolean:true (repeatable)
    #[arg(long = "state", value_name = "NAME=TYPE:VALUE")]
    pub states: Vec<String>,

    /// Property override, e.g. MaxHP=7 (repeatable)
    #[arg(long = "property", value_name = "NAME=VALUE")]
    pub properties: Vec<String>,

    /// Owner player name (repeatable)
    #[arg(long = "owner")]
    pub owners: Vec<String>,

    /// Any other attribute; JSON values are parsed, anything else is a string
    #[arg(long = "attr", value_name = "KEY=VALUE")]
    pub attributes: Vec<String>,

    /// Skip the baseline states
    #[arg(long)]
    pub no_default_states: bool,

    /// Skip the baseline properties
    #[arg(long)]
    pub no_default_properties: bool,

    /// Skip the baseline macros
    #[arg(long)]
    pub no_default_macros: bool,

    /// Store archive entries uncompressed
    #[arg(long)]
    pub stored: bool,

    /// Overwrite an existing output file
    #[arg(short, long)]
    pub force: bool,

    /// Output file (defaults to <output dir>/<name>.rptok)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Build(args) => build_token(args).await,
            Commands::Sizes => {
                list_sizes();
                Ok(())
            }
            Commands::Config => show_config(),
        }
    }
}

/// Split `KEY=VALUE`
fn parse_pair(s: &str) -> Result<(String, String)> {
    let (key, value) = s
        .split_once('=')
        .with_context(|| format!("Expected KEY=VALUE, got: {}", s))?;
    if key.is_empty() {
        anyhow::bail!("Empty key in: {}", s);
    }
    Ok((key.to_string(), value.to_string()))
}

/// Parse an attribute value as JSON, falling back to a plain string
fn parse_attribute_value(value: &str) -> Value {
    serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()))
}

/// Fold command-line flags into a manifest. CLI paths are relative to `cwd`.
fn apply_args(mut manifest: TokenManifest, args: &BuildArgs, cwd: &Path) -> Result<TokenManifest> {
    if let Some(ref image) = args.image {
        manifest.image = cwd.join(image);
    }
    if let Some(ref portrait) = args.portrait {
        manifest.portrait = Some(cwd.join(portrait));
    }
    if let Some(ref size) = args.size {
        manifest.size = size.clone();
    }

    if args.no_default_states {
        manifest.defaults.states = false;
    }
    if args.no_default_properties {
        manifest.defaults.properties = false;
    }
    if args.no_default_macros {
        manifest.defaults.macros = false;
    }

    for raw in &args.states {
        let (name, state) = parse_pair(raw)?;
        let state: State = state
            .parse()
            .with_context(|| format!("Invalid state: {}", raw))?;
        manifest.states.insert(name, state);
    }

    for raw in &args.properties {
        let (name, value) = parse_pair(raw)?;
        manifest
            .properties
            .insert(name, PropertyValue::Text(value));
    }

    for raw in &args.attributes {
        let (key, value) = parse_pair(raw)?;
        manifest.attributes.insert(key, parse_attribute_value(&value));
    }

    if !args.owners.is_empty() {
        manifest
            .attributes
            .insert("owners".to_string(), args.owners.clone().into());
    }
    if let Some(ref name) = args.name {
        manifest
            .attributes
            .insert("name".to_string(), name.clone().into());
    }

    Ok(manifest)
}

/// Build a token and write it to disk
async fn build_token(args: BuildArgs) -> Result<()> {
    let cfg = config::config()?;
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;

    let (manifest, base_dir) = match args.manifest {
        Some(ref path) => {
            let manifest = TokenManifest::from_file(path)?;
            let base_dir = cwd.join(path.parent().unwrap_or(Path::new(".")));
            (manifest, base_dir)
        }
        None => {
            let image = args
                .image
                .clone()
                .context("No image provided. Use --image <file> or --manifest <file>")?;
            (TokenManifest::new(image), cwd.clone())
        }
    };
    let manifest = apply_args(manifest, &args, &cwd)?;

    let mode = if args.force {
        WriteMode::Overwrite
    } else {
        WriteMode::Create
    };
    let compressed = cfg.compressed && !args.stored;
    let output = args.output.map(|p| cwd.join(p));

    // Image decoding and zip writing are blocking
    let (name, path) = tokio::task::spawn_blocking(move || -> Result<(String, PathBuf)> {
        let token = manifest.into_builder(&base_dir)?.build()?;
        let path = output
            .unwrap_or_else(|| cfg.output_dir.join(token_file_name(token.name())));

        let writer = cfg.writer()?.compressed(compressed);
        writer
            .write_file(&token, &path, mode)
            .with_context(|| format!("Failed to write token: {}", path.display()))?;

        info!(token = %token.name(), size = %token.size(), "Built token");
        Ok((token.name().to_string(), path))
    })
    .await
    .context("Token build task failed")??;

    println!("{}", path.display());
    eprintln!("[Token '{}' written successfully]", name);
    Ok(())
}

/// File name for a token written to the output dir. Separators and a
/// leading dot are replaced so the name stays a single path component.
fn token_file_name(name: &str) -> String {
    let mut stem: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect();
    if stem.starts_with('.') || stem.trim().is_empty() {
        stem.insert(0, '_');
    }
    format!("{}.rptok", stem)
}

/// Print the size table
fn list_sizes() {
    for size in TokenSize::ALL {
        println!("{:<12} {}", size.name(), size.guid());
    }
}

/// Show the resolved configuration (for debugging)
fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("rptok configuration");
    println!();
    println!(
        "Config file:      {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!(
        "Content template: {}",
        cfg.content_template
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(built-in)".to_string())
    );
    println!("Output dir:       {}", cfg.output_dir.display());
    println!("Compressed:       {}", cfg.compressed);

    Ok(())
}
