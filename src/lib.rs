//! rptok - MapTool token file builder
//!
//! Packs an image, display attributes, states, properties and macro
//! buttons into a `.rptok` archive the MapTool virtual tabletop can load.
//!
//! # Architecture
//!
//! The pipeline runs in one direction:
//! - Assets are hashed on construction; the MD5 is their identity
//! - A Token is assembled from baseline defaults plus caller overrides
//! - TokenWriter renders `content.xml`, derives a thumbnail and writes
//!   every entry into the archive in one pass
//!
//! # Modules
//!
//! - `domain`: Data structures (Asset, Macro, Token, TokenManifest)
//! - `core`: Serialization (ContentRenderer, thumbnail, TokenWriter)
//! - `config`: Template and output settings
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Build a token from an image
//! rptok build --image goblin.png --name Goblin --size Small
//!
//! # Build from a manifest
//! rptok build --manifest goblin.yaml -o goblin.rptok
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod error;

// Re-export main types at crate root for convenience
pub use crate::core::{ContentRenderer, TokenWriter, WriteMode};
pub use crate::domain::{Asset, Macro, State, StateKind, Token, TokenBuilder, TokenManifest, TokenSize};
pub use crate::error::TokenError;
