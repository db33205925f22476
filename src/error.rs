//! Error type shared by the token model and the archive writer.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or serializing a token
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Unknown token size: {0} (expected one of Fine, Diminutive, Tiny, Small, Medium, Large, Huge, Gargantuan, Colossal)")]
    UnknownSize(String),

    #[error("Invalid value for attribute '{key}': {source}")]
    Attribute {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode thumbnail: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Invalid content template: {0}")]
    Template(#[source] Box<handlebars::TemplateError>),

    #[error("Failed to render {document}: {source}")]
    Render {
        document: &'static str,
        #[source]
        source: handlebars::RenderError,
    },

    #[error("Failed to parse token manifest: {0}")]
    Manifest(#[source] serde_yaml::Error),

    #[error("Destination already exists: {}", .0.display())]
    Exists(PathBuf),

    #[error("Archive write failed: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = TokenError> = std::result::Result<T, E>;
