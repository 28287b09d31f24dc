use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use crate::error::{Error, Result};
use crate::glyph::LoadedGlyph;
use crate::layout::Layout;

/// Composes the atlas image: a fully transparent RGBA buffer of the
/// layout's dimensions with every glyph's pixels copied into its cell.
///
/// The destination starts transparent, so each blit is a straight pixel
/// copy rather than blended compositing; source alpha is preserved
/// byte-for-byte. A placement that would write outside the buffer is an
/// engine bug and fails with [`Error::InvariantViolation`].
pub fn compose(glyphs: &[LoadedGlyph], layout: &Layout) -> Result<RgbaImage> {
    if glyphs.len() != layout.placements.len() {
        return Err(Error::InvariantViolation(format!(
            "{} glyphs but {} placements",
            glyphs.len(),
            layout.placements.len()
        )));
    }

    let mut atlas = RgbaImage::new(layout.width, layout.height);
    for (loaded, placed) in glyphs.iter().zip(&layout.placements) {
        blit(&mut atlas, &loaded.pixels, placed.x, placed.y)?;
    }
    Ok(atlas)
}

fn blit(atlas: &mut RgbaImage, pixels: &RgbaImage, dst_x: u32, dst_y: u32) -> Result<()> {
    let (w, h) = pixels.dimensions();
    let fits = dst_x
        .checked_add(w)
        .is_some_and(|right| right <= atlas.width())
        && dst_y
            .checked_add(h)
            .is_some_and(|bottom| bottom <= atlas.height());
    if !fits {
        return Err(Error::InvariantViolation(format!(
            "cell {}x{} at ({}, {}) exceeds atlas {}x{}",
            w,
            h,
            dst_x,
            dst_y,
            atlas.width(),
            atlas.height()
        )));
    }

    for y in 0..h {
        for x in 0..w {
            atlas.put_pixel(dst_x + x, dst_y + y, *pixels.get_pixel(x, y));
        }
    }
    Ok(())
}

/// Losslessly encodes an atlas buffer as PNG bytes.
pub(crate) fn encode_png(atlas: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    atlas
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| Error::OutputWriteFailed(format!("png encode: {e}")))?;
    Ok(bytes)
}
