//! Domain types for token files.
//!
//! This module contains the token model:
//! - Asset: content-addressed image bytes
//! - Macro: macro buttons with defaulted display fields
//! - TokenSize: the closed set of creature sizes
//! - Token: the assembled game piece
//! - TokenManifest: YAML description of a token

pub mod asset;
pub mod macros;
pub mod manifest;
mod overrides;
pub mod size;
pub mod token;

// Re-export commonly used types
pub use asset::{content_hash, Asset};
pub use macros::{baseline_macros, Macro};
pub use manifest::{DefaultSets, PropertyValue, TokenManifest};
pub use size::TokenSize;
pub use token::{
    baseline_properties, baseline_states, new_token_id, State, StateKind, Token,
    TokenAttributes, TokenBuilder,
};
