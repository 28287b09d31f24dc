use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::atlas;
use crate::error::Result;
use crate::glyph::{Glyph, LoadedGlyph};
use crate::layout::{self, LayoutConfig};

/// Inline-displayable rendering of the composed atlas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    /// `data:image/png;base64,…` payload, ready for direct embedding.
    pub data_uri: String,
    pub width: u32,
    pub height: u32,
}

/// Renders the atlas at full resolution and encodes it for inline
/// display. Any downscaling is a display-layer concern.
///
/// Safe to call repeatedly and rapidly; every call is an independent
/// computation over its inputs. When calls overlap across an async
/// boundary, completion order is not guaranteed to match request order;
/// the caller reconciles responses (see the sequence stamp on the
/// preview operation in [`crate::commands`]).
pub fn render_preview(glyphs: &[LoadedGlyph], config: &LayoutConfig) -> Result<Preview> {
    let metrics: Vec<Glyph> = glyphs.iter().map(|g| g.glyph.clone()).collect();
    let layout = layout::compute_layout(&metrics, config)?;
    let composed = atlas::compose(glyphs, &layout)?;
    let png = atlas::encode_png(&composed)?;

    Ok(Preview {
        data_uri: format!("data:image/png;base64,{}", STANDARD.encode(&png)),
        width: layout.width,
        height: layout.height,
    })
}
