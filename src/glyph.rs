use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::error::{Error, Result};

/// Extra advance range allowed above a glyph's own width when tuning
/// spacing; a front-end slider for character `c` ranges over
/// `0..=width(c) + SPACING_SLACK`.
pub const SPACING_SLACK: u32 = 20;

/// One character's decoded source image metrics.
///
/// Immutable once loaded; pixel data lives separately in [`LoadedGlyph`]
/// so that metrics can be passed around without dragging buffers along.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    pub character: char,
    pub source_path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Row index of the first row containing any pixel with non-zero
    /// alpha, scanning top to bottom. 0 for fully transparent images.
    pub baseline_offset_y: u32,
    /// Advance used when the caller supplies no override; equals `width`.
    pub default_spacing: u32,
}

impl Glyph {
    /// Largest advance a front-end should offer for this glyph.
    pub fn max_spacing(&self) -> u32 {
        self.width + SPACING_SLACK
    }
}

/// A glyph together with its decoded RGBA pixels.
#[derive(Debug, Clone)]
pub struct LoadedGlyph {
    pub glyph: Glyph,
    pub pixels: RgbaImage,
}

/// Loads one glyph image per requested character, in input order.
///
/// Duplicate characters are preserved and re-read, so the result always
/// lines up index-for-index with the input sequence. Any unreadable or
/// undecodable glyph fails the whole call; there is no partial success.
///
/// # Errors
/// [`Error::EmptyCharacterSet`] for an empty sequence,
/// [`Error::DirectoryNotFound`] if `directory` is not a directory,
/// [`Error::GlyphFileMissing`] / [`Error::GlyphDecodeFailed`] for the
/// first offending character.
pub fn load_glyphs(directory: &Path, characters: &str) -> Result<Vec<LoadedGlyph>> {
    if characters.is_empty() {
        return Err(Error::EmptyCharacterSet);
    }
    if !directory.is_dir() {
        return Err(Error::DirectoryNotFound(directory.to_path_buf()));
    }

    let mut glyphs = Vec::with_capacity(characters.chars().count());
    for character in characters.chars() {
        glyphs.push(load_glyph(directory, character)?);
    }
    Ok(glyphs)
}

fn load_glyph(directory: &Path, character: char) -> Result<LoadedGlyph> {
    let path = directory.join(format!("{character}.png"));
    if !path.is_file() {
        return Err(Error::GlyphFileMissing(character));
    }

    let decoded = image::open(&path).map_err(|e| Error::GlyphDecodeFailed {
        character,
        reason: e.to_string(),
    })?;
    let pixels = decoded.to_rgba8();
    let (width, height) = pixels.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::GlyphDecodeFailed {
            character,
            reason: "image has zero width or height".to_string(),
        });
    }

    log::debug!(
        "loaded glyph '{}' from {} ({}x{})",
        character,
        path.display(),
        width,
        height
    );

    Ok(LoadedGlyph {
        glyph: Glyph {
            character,
            source_path: path,
            width,
            height,
            baseline_offset_y: first_visible_row(&pixels),
            default_spacing: width,
        },
        pixels,
    })
}

/// Index of the first row containing any pixel with non-zero alpha.
fn first_visible_row(pixels: &RgbaImage) -> u32 {
    for y in 0..pixels.height() {
        for x in 0..pixels.width() {
            if pixels.get_pixel(x, y)[3] != 0 {
                return y;
            }
        }
    }
    0
}
