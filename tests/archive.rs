//! Token Archive Integration Tests
//!
//! Tests for the archive layout, compression and write modes.

use std::io::{Cursor, Read};

use image::{DynamicImage, GenericImageView, ImageFormat, Rgba, RgbaImage};
use rptok::core::{TokenWriter, WriteMode, PROPERTIES_XML};
use rptok::{Asset, Token, TokenError, TokenSize};
use tempfile::TempDir;
use zip::{CompressionMethod, ZipArchive};

/// Solid-color PNG of the given size
fn png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba(color));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

fn write_to_memory(writer: &TokenWriter, token: &Token) -> ZipArchive<Cursor<Vec<u8>>> {
    let buffer = writer.write_to(token, Cursor::new(Vec::new())).unwrap();
    ZipArchive::new(Cursor::new(buffer.into_inner())).unwrap()
}

fn read_entry(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> Vec<u8> {
    let mut file = archive.by_name(name).unwrap();
    let mut data = Vec::new();
    file.read_to_end(&mut data).unwrap();
    data
}

fn entry_names(archive: &ZipArchive<Cursor<Vec<u8>>>) -> Vec<String> {
    let mut names: Vec<String> = archive.file_names().map(String::from).collect();
    names.sort();
    names
}

#[test]
fn test_goblin_end_to_end() {
    let image_bytes = png(64, 64, [255, 0, 0, 255]);
    let image = Asset::new("Goblin", "png", image_bytes.clone());
    let md5 = image.md5.clone();

    let token = Token::builder(image)
        .name("Goblin")
        .size(TokenSize::Small)
        .build()
        .unwrap();

    let writer = TokenWriter::with_default_template().unwrap();
    let mut archive = write_to_memory(&writer, &token);

    let content = String::from_utf8(read_entry(&mut archive, "content.xml")).unwrap();
    assert!(content.contains("Goblin"));
    assert!(content.contains(TokenSize::Small.guid()));

    assert_eq!(read_entry(&mut archive, &format!("assets/{}.png", md5)), image_bytes);

    let thumbnail = read_entry(&mut archive, "thumbnail");
    let thumb = image::load_from_memory(&thumbnail).unwrap();
    let (width, height) = thumb.dimensions();
    assert!(width <= 50 && height <= 50);
}

#[test]
fn test_five_entries_without_portrait() {
    let image = Asset::new("goblin", "png", png(10, 10, [0, 255, 0, 255]));
    let md5 = image.md5.clone();
    let token = Token::builder(image).build().unwrap();

    let archive = write_to_memory(&TokenWriter::with_default_template().unwrap(), &token);

    let mut expected = vec![
        "content.xml".to_string(),
        "properties.xml".to_string(),
        "thumbnail".to_string(),
        format!("assets/{}", md5),
        format!("assets/{}.png", md5),
    ];
    expected.sort();
    assert_eq!(entry_names(&archive), expected);
}

#[test]
fn test_seven_entries_with_portrait() {
    let image = Asset::new("goblin", "png", png(10, 10, [0, 255, 0, 255]));
    let portrait = Asset::new("goblin-portrait", "png", png(80, 120, [0, 0, 255, 255]));
    let portrait_md5 = portrait.md5.clone();
    assert_ne!(image.md5, portrait_md5);

    let token = Token::builder(image).portrait(portrait).build().unwrap();
    let mut archive = write_to_memory(&TokenWriter::with_default_template().unwrap(), &token);

    assert_eq!(archive.len(), 7);

    let record = String::from_utf8(read_entry(&mut archive, &format!("assets/{}", portrait_md5))).unwrap();
    assert!(record.contains(&format!("<id>{}</id>", portrait_md5)));
    assert!(record.contains("<name>goblin-portrait</name>"));
    assert!(record.contains("<extension>png</extension>"));

    // Thumbnail comes from the token image, not the portrait
    let thumb = image::load_from_memory(&read_entry(&mut archive, "thumbnail")).unwrap();
    assert_eq!(thumb.dimensions(), (10, 10));
}

#[test]
fn test_properties_entry_is_static() {
    let token = Token::builder(Asset::new("goblin", "png", png(4, 4, [0, 0, 0, 255])))
        .build()
        .unwrap();
    let mut archive = write_to_memory(&TokenWriter::with_default_template().unwrap(), &token);

    let properties = read_entry(&mut archive, "properties.xml");
    assert_eq!(properties, PROPERTIES_XML.as_bytes());
}

#[test]
fn test_compression_modes() {
    let token = Token::builder(Asset::new("goblin", "png", png(16, 16, [9, 9, 9, 255])))
        .build()
        .unwrap();

    let deflated = TokenWriter::with_default_template().unwrap();
    let mut archive = write_to_memory(&deflated, &token);
    assert_eq!(
        archive.by_name("content.xml").unwrap().compression(),
        CompressionMethod::Deflated
    );

    let stored = TokenWriter::with_default_template().unwrap().compressed(false);
    let mut archive = write_to_memory(&stored, &token);
    assert_eq!(
        archive.by_name("content.xml").unwrap().compression(),
        CompressionMethod::Stored
    );
}

#[test]
fn test_write_file_modes() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("goblin.rptok");
    let token = Token::builder(Asset::new("goblin", "png", png(8, 8, [1, 2, 3, 255])))
        .build()
        .unwrap();
    let writer = TokenWriter::with_default_template().unwrap();

    writer.write_file(&token, &path, WriteMode::Create).unwrap();
    assert!(path.exists());

    // Create refuses to replace an existing file
    let err = writer.write_file(&token, &path, WriteMode::Create).unwrap_err();
    assert!(matches!(err, TokenError::Exists(_)));

    // Overwrite replaces it
    let other = Token::builder(Asset::new("goblin", "png", png(8, 8, [1, 2, 3, 255])))
        .name("Replaced")
        .build()
        .unwrap();
    writer.write_file(&other, &path, WriteMode::Overwrite).unwrap();

    let mut archive = ZipArchive::new(std::fs::File::open(&path).unwrap()).unwrap();
    let mut content = String::new();
    archive
        .by_name("content.xml")
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    assert!(content.contains("<name>Replaced</name>"));
}

#[test]
fn test_failed_write_leaves_no_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.rptok");
    let token = Token::builder(Asset::new("broken", "png", b"not a png".to_vec()))
        .build()
        .unwrap();

    let err = TokenWriter::with_default_template()
        .unwrap()
        .write_file(&token, &path, WriteMode::Overwrite)
        .unwrap_err();

    assert!(matches!(err, TokenError::Decode(_)));
    assert!(!path.exists());
    // No stray temp files either
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn test_failed_overwrite_keeps_previous_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("goblin.rptok");
    std::fs::write(&path, b"previous").unwrap();

    let token = Token::builder(Asset::new("broken", "png", b"not a png".to_vec()))
        .build()
        .unwrap();
    let result = TokenWriter::with_default_template()
        .unwrap()
        .write_file(&token, &path, WriteMode::Overwrite);

    assert!(result.is_err());
    assert_eq!(std::fs::read(&path).unwrap(), b"previous");
}

#[test]
fn test_missing_destination_directory() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("missing").join("goblin.rptok");
    let token = Token::builder(Asset::new("goblin", "png", png(8, 8, [1, 2, 3, 255])))
        .build()
        .unwrap();

    let err = TokenWriter::with_default_template()
        .unwrap()
        .write_file(&token, &path, WriteMode::Create)
        .unwrap_err();
    assert!(matches!(err, TokenError::Io(_)));
}
