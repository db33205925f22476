//! Content-addressed assets packaged inside a token.
//!
//! An asset is stored twice in the archive: once as an identity record
//! (`assets/<md5>`) and once as raw bytes (`assets/<md5>.<ext>`). The MD5 of
//! the contents, not the name, is what the tabletop application keys on.

use std::path::Path;

use anyhow::{Context, Result};
use md5::{Digest, Md5};

/// Hash content the way the tabletop application keys its assets
/// (lowercase hex MD5, 32 chars)
pub fn content_hash(contents: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(contents);
    hex::encode(hasher.finalize())
}

/// An image (or other binary) stored with a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Display name, usually the file stem
    pub name: String,

    /// File extension without the dot
    pub ext: String,

    /// Raw bytes
    pub contents: Vec<u8>,

    /// Content hash, used as the asset's identity inside the archive
    pub md5: String,
}

impl Asset {
    /// Create an asset, hashing its contents
    pub fn new(name: impl Into<String>, ext: impl Into<String>, contents: Vec<u8>) -> Self {
        let md5 = content_hash(&contents);
        Self::with_md5(name, ext, contents, md5)
    }

    /// Create an asset with a precomputed hash. The hash is not checked.
    pub fn with_md5(
        name: impl Into<String>,
        ext: impl Into<String>,
        contents: Vec<u8>,
        md5: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ext: ext.into(),
            contents,
            md5: md5.into(),
        }
    }

    /// Load an asset from disk, taking name and extension from the path
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read(path)
            .with_context(|| format!("Failed to read asset: {}", path.display()))?;
        Ok(Self::from_file_parts(path, contents))
    }

    /// Build an asset from a path and bytes already read from it
    pub fn from_file_parts(path: &Path, contents: Vec<u8>) -> Self {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = path
            .extension()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        Self::new(name, ext, contents)
    }

    /// Archive entry holding the identity record
    pub fn record_path(&self) -> String {
        format!("assets/{}", self.md5)
    }

    /// Archive entry holding the raw bytes
    pub fn contents_path(&self) -> String {
        format!("assets/{}.{}", self.md5, self.ext)
    }

    /// XML record describing this asset. Values are inserted verbatim, so
    /// `name` and `ext` must not contain XML markup.
    pub fn identity_record(&self) -> String {
        format!(
            "<net.rptools.maptool.model.Asset>\n  \
             <id>\n    <id>{}</id>\n  </id>\n  \
             <name>{}</name>\n  \
             <extension>{}</extension>\n  \
             <image/>\n\
             </net.rptools.maptool.model.Asset>",
            self.md5, self.name, self.ext
        )
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<Asset {}.{}>", self.name, self.ext)
    }
}
