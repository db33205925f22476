//! Token archive writer.
//!
//! A token file is a zip archive with a fixed layout:
//!
//! ```text
//! content.xml            # token description (rendered template)
//! properties.xml         # format version
//! thumbnail              # PNG, fits in 50x50
//! assets/<md5>           # identity record for the image
//! assets/<md5>.<ext>     # image bytes
//! assets/<md5>           # ...and the same pair for the portrait, if any
//! assets/<md5>.<ext>
//! ```
//!
//! Every entry is derived before anything is written, so a bad image
//! aborts the write without touching the destination.

use std::borrow::Cow;
use std::io::{Seek, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::render::ContentRenderer;
use super::thumbnail::derive_thumbnail;
use crate::domain::{Asset, Token};
use crate::error::TokenError;

/// Static `properties.xml` document naming the token format version
pub const PROPERTIES_XML: &str = "<map>
  <entry>
    <string>version</string>
    <string>1.4.0.0
</string>
  </entry>
</map>";

/// What to do when the destination file already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Fail with [`TokenError::Exists`]
    Create,

    /// Replace the existing file
    #[default]
    Overwrite,
}

/// One named file inside the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry<'a> {
    pub name: String,
    pub data: Cow<'a, [u8]>,
}

impl<'a> ArchiveEntry<'a> {
    fn text(name: impl Into<String>, text: String) -> Self {
        Self::owned(name, text.into_bytes())
    }

    fn owned(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data: Cow::Owned(data),
        }
    }

    fn bytes(name: impl Into<String>, data: &'a [u8]) -> Self {
        Self {
            name: name.into(),
            data: Cow::Borrowed(data),
        }
    }
}

/// Serializes tokens into `.rptok` archives
#[derive(Clone)]
pub struct TokenWriter {
    renderer: ContentRenderer,
    compressed: bool,
}

impl TokenWriter {
    /// Create a writer using `renderer` for `content.xml`. Entries are
    /// DEFLATE-compressed unless [`compressed`](Self::compressed) says otherwise.
    pub fn new(renderer: ContentRenderer) -> Self {
        Self {
            renderer,
            compressed: true,
        }
    }

    /// Writer with the built-in content template
    pub fn with_default_template() -> Result<Self, TokenError> {
        Ok(Self::new(ContentRenderer::with_default_template()?))
    }

    /// Store entries uncompressed when `false`
    pub fn compressed(mut self, compressed: bool) -> Self {
        self.compressed = compressed;
        self
    }

    fn compression_method(&self) -> CompressionMethod {
        if self.compressed {
            CompressionMethod::Deflated
        } else {
            CompressionMethod::Stored
        }
    }

    /// Derive every archive entry for `token`, in write order
    pub fn entries<'a>(&self, token: &'a Token) -> Result<Vec<ArchiveEntry<'a>>, TokenError> {
        let mut entries = vec![
            ArchiveEntry::text("content.xml", self.renderer.render(token)?),
            ArchiveEntry::text("properties.xml", PROPERTIES_XML.to_string()),
            ArchiveEntry::owned("thumbnail", derive_thumbnail(&token.image().contents)?),
        ];

        for asset in token.assets() {
            entries.extend(asset_entries(asset));
        }

        Ok(entries)
    }

    /// Write `token` as a zip archive into `writer` and hand the writer back
    pub fn write_to<W: Write + Seek>(&self, token: &Token, writer: W) -> Result<W, TokenError> {
        let entries = self.entries(token)?;
        let options = FileOptions::default().compression_method(self.compression_method());

        let mut zip = ZipWriter::new(writer);
        for entry in &entries {
            debug!(entry = %entry.name, bytes = entry.data.len(), "Writing archive entry");
            zip.start_file(entry.name.as_str(), options)?;
            zip.write_all(&entry.data)?;
        }
        let writer = zip.finish()?;

        info!(
            token = %token.name(),
            id = %token.id(),
            entries = entries.len(),
            "Token archive written"
        );
        Ok(writer)
    }

    /// Write `token` to `path`.
    ///
    /// The archive is assembled in a temporary file beside `path` and moved
    /// into place only once complete; on failure the temporary file is
    /// removed and `path` is left as it was.
    pub fn write_file(&self, token: &Token, path: &Path, mode: WriteMode) -> Result<(), TokenError> {
        if mode == WriteMode::Create && path.exists() {
            return Err(TokenError::Exists(path.to_path_buf()));
        }

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let temp = NamedTempFile::new_in(dir)?;
        let temp = self.write_to(token, temp)?;
        temp.as_file().sync_all()?;

        let persisted = match mode {
            WriteMode::Create => temp.persist_noclobber(path),
            WriteMode::Overwrite => temp.persist(path),
        };
        persisted.map_err(|e| {
            if e.error.kind() == std::io::ErrorKind::AlreadyExists {
                TokenError::Exists(path.to_path_buf())
            } else {
                TokenError::Io(e.error)
            }
        })?;

        debug!(path = %path.display(), "Token file persisted");
        Ok(())
    }
}

/// Identity record and raw bytes for one asset
fn asset_entries(asset: &Asset) -> [ArchiveEntry<'_>; 2] {
    [
        ArchiveEntry::text(asset.record_path(), asset.identity_record()),
        ArchiveEntry::bytes(asset.contents_path(), &asset.contents),
    ]
}
