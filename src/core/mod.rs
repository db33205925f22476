//! Token serialization.
//!
//! This module contains:
//! - ContentRenderer: `content.xml` rendering through a handlebars template
//! - Thumbnail: the downscaled preview image
//! - TokenWriter: zip archive assembly

pub mod archive;
pub mod render;
pub mod thumbnail;

// Re-export commonly used types
pub use archive::{ArchiveEntry, TokenWriter, WriteMode, PROPERTIES_XML};
pub use render::{escape_xml, ContentRenderer, DEFAULT_CONTENT_TEMPLATE};
pub use thumbnail::{derive_thumbnail, THUMBNAIL_MAX};
