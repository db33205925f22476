//! Thumbnail derivation for the archive's `thumbnail` entry.

use std::io::Cursor;

use image::{GenericImageView, ImageFormat};
use tracing::debug;

use crate::error::TokenError;

/// Bounding box the thumbnail must fit in
pub const THUMBNAIL_MAX: u32 = 50;

/// Decode `contents`, shrink it to fit within 50x50 keeping the aspect
/// ratio, and re-encode as PNG. Images that already fit keep their size.
pub fn derive_thumbnail(contents: &[u8]) -> Result<Vec<u8>, TokenError> {
    let image = image::load_from_memory(contents).map_err(TokenError::Decode)?;
    let (width, height) = image.dimensions();

    let thumbnail = if width > THUMBNAIL_MAX || height > THUMBNAIL_MAX {
        image.thumbnail(THUMBNAIL_MAX, THUMBNAIL_MAX)
    } else {
        image
    };
    let (thumb_width, thumb_height) = thumbnail.dimensions();
    debug!(width, height, thumb_width, thumb_height, "Derived thumbnail");

    let mut out = Cursor::new(Vec::new());
    thumbnail
        .write_to(&mut out, ImageFormat::Png)
        .map_err(TokenError::Encode)?;
    Ok(out.into_inner())
}
