//! Declarative token descriptions loaded from YAML.
//!
//! ```yaml
//! image: goblin.png
//! size: Small
//! attributes:
//!   name: Goblin
//!   owners: [gm]
//! states:
//!   Dead: { type: boolean, value: "false" }
//! properties:
//!   MaxHP: "7"
//! macros:
//!   - { label: bite, group: attacks, command: "Bite: [d20+4]" }
//! ```
//!
//! Image paths are resolved relative to the manifest's directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::asset::Asset;
use super::macros::Macro;
use super::size::TokenSize;
use super::token::{State, TokenBuilder};
use crate::error::TokenError;

/// Which baseline sets to include
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultSets {
    pub states: bool,
    pub properties: bool,
    pub macros: bool,
}

impl Default for DefaultSets {
    fn default() -> Self {
        Self {
            states: true,
            properties: true,
            macros: true,
        }
    }
}

/// A token described in YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenManifest {
    /// Main token image
    pub image: PathBuf,

    /// Optional portrait image
    #[serde(default)]
    pub portrait: Option<PathBuf>,

    /// Size name (Fine .. Colossal)
    #[serde(default = "default_size")]
    pub size: String,

    #[serde(default)]
    pub defaults: DefaultSets,

    /// Display attribute overrides (name, owners, pc, ...)
    #[serde(default)]
    pub attributes: Map<String, Value>,

    #[serde(default)]
    pub states: BTreeMap<String, State>,

    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,

    /// Each entry is a set of macro field overrides
    #[serde(default)]
    pub macros: Vec<Map<String, Value>>,
}

fn default_size() -> String {
    "Medium".to_string()
}

/// Property values may be written as YAML numbers or strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl std::fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::Text(s) => f.write_str(s),
            PropertyValue::Integer(n) => write!(f, "{}", n),
            PropertyValue::Float(n) => write!(f, "{}", n),
            PropertyValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl TokenManifest {
    /// Manifest for `image` with every other field defaulted
    pub fn new(image: impl Into<PathBuf>) -> Self {
        Self {
            image: image.into(),
            portrait: None,
            size: default_size(),
            defaults: DefaultSets::default(),
            attributes: Map::new(),
            states: BTreeMap::new(),
            properties: BTreeMap::new(),
            macros: Vec::new(),
        }
    }

    /// Load a manifest from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;

        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse manifest: {}", path.display()))
    }

    /// Parse a manifest from YAML content
    pub fn from_yaml(content: &str) -> Result<Self, TokenError> {
        serde_yaml::from_str(content).map_err(TokenError::Manifest)
    }

    /// Resolve an image path relative to `base_dir`
    fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Load the referenced images and turn the manifest into a builder
    pub fn into_builder(self, base_dir: &Path) -> Result<TokenBuilder> {
        let image = Asset::from_path(&Self::resolve(base_dir, &self.image))?;
        let mut builder = TokenBuilder::new(image);

        if let Some(ref portrait) = self.portrait {
            builder = builder.portrait(Asset::from_path(&Self::resolve(base_dir, portrait))?);
        }

        builder = builder
            .size(self.size.parse::<TokenSize>()?)
            .default_states(self.defaults.states)
            .default_properties(self.defaults.properties)
            .default_macros(self.defaults.macros)
            .states(self.states)
            .properties(
                self.properties
                    .into_iter()
                    .map(|(k, v)| (k, v.to_string())),
            );

        for (key, value) in self.attributes {
            builder = builder.attribute(key, value);
        }

        for overrides in self.macros {
            builder = builder.push_macro(Macro::from_overrides(overrides)?);
        }

        Ok(builder)
    }
}
