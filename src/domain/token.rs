//! The token model: one game piece with its image, size, state,
//! properties and macros.
//!
//! Tokens are assembled in one shot through [`TokenBuilder`]. Baseline
//! states, properties and macros are added first unless opted out, then the
//! caller's entries are merged on top: by key for states and properties
//! (caller wins), by append for macros (no dedup).

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::asset::Asset;
use super::macros::{baseline_macros, Macro};
use super::overrides::apply_overrides;
use super::size::TokenSize;
use crate::error::TokenError;

/// Value type of a token state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StateKind {
    /// On/off toggle
    Boolean,

    /// Numeric counter (e.g. a health bar fraction)
    BigDecimal,
}

impl StateKind {
    /// Element name used for the value in `content.xml`
    pub fn tag(self) -> &'static str {
        match self {
            StateKind::Boolean => "boolean",
            StateKind::BigDecimal => "big-decimal",
        }
    }
}

/// A typed state value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    #[serde(rename = "type")]
    pub kind: StateKind,
    pub value: String,
}

impl State {
    pub fn boolean(value: bool) -> Self {
        Self {
            kind: StateKind::Boolean,
            value: value.to_string(),
        }
    }

    pub fn decimal(value: impl Into<String>) -> Self {
        Self {
            kind: StateKind::BigDecimal,
            value: value.into(),
        }
    }
}

impl std::str::FromStr for State {
    type Err = anyhow::Error;

    /// Parse `boolean:true` or `big-decimal:0.5`
    fn from_str(s: &str) -> anyhow::Result<Self> {
        let (kind, value) = s
            .split_once(':')
            .ok_or_else(|| anyhow::anyhow!("Expected <type>:<value>, got: {}", s))?;
        match kind {
            "boolean" => match value {
                "true" => Ok(State::boolean(true)),
                "false" => Ok(State::boolean(false)),
                _ => anyhow::bail!("Boolean state must be true or false, got: {}", value),
            },
            "big-decimal" | "decimal" => Ok(State::decimal(value)),
            _ => anyhow::bail!("Unknown state type: {} (expected boolean or big-decimal)", kind),
        }
    }
}

/// Display and ownership attributes of a token.
///
/// Unknown keys supplied by the caller land in `extra` and are handed to the
/// content template alongside the documented fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenAttributes {
    pub is_visible: bool,
    pub name: String,
    pub label: String,
    pub gm_name: String,
    pub notes: String,
    pub gm_notes: String,
    pub owners: Vec<String>,
    /// Player character (as opposed to NPC)
    pub pc: bool,
    pub layer: String,
    /// ARGB color as a signed 32-bit int
    pub halo_color: i32,
    pub sight_type: String,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for TokenAttributes {
    fn default() -> Self {
        Self {
            is_visible: true,
            name: "Default Token".to_string(),
            label: String::new(),
            gm_name: String::new(),
            notes: String::new(),
            gm_notes: String::new(),
            owners: Vec::new(),
            pc: true,
            layer: "TOKEN".to_string(),
            halo_color: -256,
            sight_type: "Normal".to_string(),
            extra: BTreeMap::new(),
        }
    }
}

const BASELINE_TOGGLES: [&str; 11] = [
    "Other",
    "Other2",
    "Other3",
    "Other4",
    "Enlarged",
    "Dead",
    "Incapacitated",
    "BullStrength",
    "Prone",
    "Hidden",
    "Disabled",
];

/// Status toggles (all off) plus a full health bar
pub fn baseline_states() -> BTreeMap<String, State> {
    let mut states: BTreeMap<String, State> = BASELINE_TOGGLES
        .iter()
        .map(|name| (name.to_string(), State::boolean(false)))
        .collect();
    states.insert("Health".to_string(), State::decimal("1"));
    states
}

/// Derived-stat formulas. `{Name}` references another property and is
/// evaluated by the tabletop application.
pub fn baseline_properties() -> BTreeMap<String, String> {
    [
        ("HasInit", "1"),
        ("Fortitude", "{ConMod}"),
        ("Reflex", "{DexMod}"),
        ("Will", "{WisMod}"),
        ("HP", "{MaxHP}"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Fresh token identifier: base64 of 16 random bytes
pub fn new_token_id() -> String {
    STANDARD.encode(Uuid::new_v4().as_bytes())
}

/// A fully assembled token, ready to be written out
#[derive(Debug, Clone)]
pub struct Token {
    id: String,
    image: Asset,
    portrait_image: Option<Asset>,
    size: TokenSize,
    attributes: TokenAttributes,
    states: BTreeMap<String, State>,
    properties: BTreeMap<String, String>,
    macros: Vec<Macro>,
}

impl Token {
    /// Start building a token around its main image
    pub fn builder(image: Asset) -> TokenBuilder {
        TokenBuilder::new(image)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn image(&self) -> &Asset {
        &self.image
    }

    pub fn portrait_image(&self) -> Option<&Asset> {
        self.portrait_image.as_ref()
    }

    pub fn size(&self) -> TokenSize {
        self.size
    }

    /// Encoded size GUID
    pub fn size_id(&self) -> &'static str {
        self.size.guid()
    }

    pub fn attributes(&self) -> &TokenAttributes {
        &self.attributes
    }

    pub fn name(&self) -> &str {
        &self.attributes.name
    }

    pub fn states(&self) -> &BTreeMap<String, State> {
        &self.states
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn macros(&self) -> &[Macro] {
        &self.macros
    }

    /// Image first, then the portrait if present
    pub fn assets(&self) -> impl Iterator<Item = &Asset> {
        std::iter::once(&self.image).chain(self.portrait_image.as_ref())
    }
}

/// Collects token arguments; `build` applies defaults and overrides
#[derive(Debug, Clone)]
pub struct TokenBuilder {
    image: Asset,
    portrait_image: Option<Asset>,
    size: TokenSize,
    states: BTreeMap<String, State>,
    properties: BTreeMap<String, String>,
    macros: Vec<Macro>,
    default_states: bool,
    default_properties: bool,
    default_macros: bool,
    overrides: Map<String, Value>,
}

impl TokenBuilder {
    pub fn new(image: Asset) -> Self {
        Self {
            image,
            portrait_image: None,
            size: TokenSize::default(),
            states: BTreeMap::new(),
            properties: BTreeMap::new(),
            macros: Vec::new(),
            default_states: true,
            default_properties: true,
            default_macros: true,
            overrides: Map::new(),
        }
    }

    pub fn portrait(mut self, portrait: Asset) -> Self {
        self.portrait_image = Some(portrait);
        self
    }

    pub fn size(mut self, size: TokenSize) -> Self {
        self.size = size;
        self
    }

    pub fn state(mut self, name: impl Into<String>, state: State) -> Self {
        self.states.insert(name.into(), state);
        self
    }

    pub fn states(mut self, states: impl IntoIterator<Item = (String, State)>) -> Self {
        self.states.extend(states);
        self
    }

    pub fn property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn properties(mut self, properties: impl IntoIterator<Item = (String, String)>) -> Self {
        self.properties.extend(properties);
        self
    }

    pub fn push_macro(mut self, m: Macro) -> Self {
        self.macros.push(m);
        self
    }

    pub fn macros(mut self, macros: impl IntoIterator<Item = Macro>) -> Self {
        self.macros.extend(macros);
        self
    }

    pub fn default_states(mut self, enabled: bool) -> Self {
        self.default_states = enabled;
        self
    }

    pub fn default_properties(mut self, enabled: bool) -> Self {
        self.default_properties = enabled;
        self
    }

    pub fn default_macros(mut self, enabled: bool) -> Self {
        self.default_macros = enabled;
        self
    }

    /// Override a display attribute. Any key is accepted; documented keys
    /// must carry a value of the documented type.
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.overrides.insert(key.into(), value.into());
        self
    }

    /// Shorthand for `attribute("name", ..)`
    pub fn name(self, name: impl Into<String>) -> Self {
        self.attribute("name", name.into())
    }

    pub fn build(self) -> Result<Token, TokenError> {
        let attributes = apply_overrides(&TokenAttributes::default(), self.overrides)?;

        let mut states = if self.default_states {
            baseline_states()
        } else {
            BTreeMap::new()
        };
        states.extend(self.states);

        let mut properties = if self.default_properties {
            baseline_properties()
        } else {
            BTreeMap::new()
        };
        properties.extend(self.properties);

        let mut macros = if self.default_macros {
            baseline_macros()
        } else {
            Vec::new()
        };
        macros.extend(self.macros);

        Ok(Token {
            id: new_token_id(),
            image: self.image,
            portrait_image: self.portrait_image,
            size: self.size,
            attributes,
            states,
            properties,
            macros,
        })
    }
}
