//! Rendering of the token's `content.xml` document.
//!
//! The document layout lives in a handlebars template. The renderer is
//! built once from the template source (the embedded default, or a file
//! named in the config) and reused for every token.

use handlebars::Handlebars;
use serde::Serialize;

use crate::domain::{Asset, Macro, Token, TokenAttributes};
use crate::error::TokenError;

/// Template used when the config does not name one
pub const DEFAULT_CONTENT_TEMPLATE: &str = include_str!("../../templates/content.xml");

const CONTENT: &str = "content";

/// Renders tokens through a compiled content template
#[derive(Clone, Debug)]
pub struct ContentRenderer {
    registry: Handlebars<'static>,
}

impl ContentRenderer {
    /// Compile `template_source` into a renderer
    pub fn new(template_source: &str) -> Result<Self, TokenError> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(escape_xml);
        registry
            .register_template_string(CONTENT, template_source)
            .map_err(|e| TokenError::Template(Box::new(e)))?;
        Ok(Self { registry })
    }

    /// Renderer for the built-in MapTool 1.4 layout
    pub fn with_default_template() -> Result<Self, TokenError> {
        Self::new(DEFAULT_CONTENT_TEMPLATE)
    }

    /// Render the full token description
    pub fn render(&self, token: &Token) -> Result<String, TokenError> {
        self.registry
            .render(CONTENT, &ContentView::new(token))
            .map_err(|source| TokenError::Render {
                document: "content.xml",
                source,
            })
    }
}

/// Escape text for XML element content and attribute values
pub fn escape_xml(data: &str) -> String {
    let mut out = String::with_capacity(data.len());
    for c in data.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Template bindings for one token. Attributes (including caller extras)
/// and macro fields are flattened so templates can name them directly.
/// Flattened fields come first: later keys replace earlier ones in the
/// serialized map, so a caller extra can never shadow a computed binding.
#[derive(Serialize)]
struct ContentView<'a> {
    #[serde(flatten)]
    attributes: &'a TokenAttributes,
    id: &'a str,
    size_id: &'static str,
    token_type: &'static str,
    image: AssetView<'a>,
    portrait: Option<AssetView<'a>>,
    states: Vec<StateView<'a>>,
    properties: Vec<PropertyView<'a>>,
    macros: Vec<MacroView<'a>>,
}

#[derive(Serialize)]
struct AssetView<'a> {
    md5: &'a str,
    name: &'a str,
    ext: &'a str,
}

#[derive(Serialize)]
struct StateView<'a> {
    name: &'a str,
    tag: &'static str,
    value: &'a str,
}

#[derive(Serialize)]
struct PropertyView<'a> {
    key: &'a str,
    /// Lowercased key; the application stores properties case-insensitively
    folded_key: String,
    value: &'a str,
}

#[derive(Serialize)]
struct MacroView<'a> {
    #[serde(flatten)]
    fields: &'a Macro,
    /// 1-based button index
    index: usize,
}

impl<'a> AssetView<'a> {
    fn new(asset: &'a Asset) -> Self {
        Self {
            md5: &asset.md5,
            name: &asset.name,
            ext: &asset.ext,
        }
    }
}

impl<'a> ContentView<'a> {
    fn new(token: &'a Token) -> Self {
        let attributes = token.attributes();
        Self {
            attributes,
            id: token.id(),
            size_id: token.size_id(),
            token_type: if attributes.pc { "PC" } else { "NPC" },
            image: AssetView::new(token.image()),
            portrait: token.portrait_image().map(AssetView::new),
            states: token
                .states()
                .iter()
                .map(|(name, state)| StateView {
                    name,
                    tag: state.kind.tag(),
                    value: &state.value,
                })
                .collect(),
            properties: token
                .properties()
                .iter()
                .map(|(key, value)| PropertyView {
                    key,
                    folded_key: key.to_lowercase(),
                    value,
                })
                .collect(),
            macros: token
                .macros()
                .iter()
                .enumerate()
                .map(|(i, fields)| MacroView {
                    fields,
                    index: i + 1,
                })
                .collect(),
        }
    }
}
