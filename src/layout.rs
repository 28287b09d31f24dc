use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::glyph::Glyph;

/// Per-call layout inputs, owned by the caller.
///
/// Supplied fresh on every layout, preview, and export call; the engine
/// keeps no spacing or padding state between calls.
#[derive(Debug, Clone, Default)]
pub struct LayoutConfig {
    /// Advance overrides keyed by character. Keys that match no requested
    /// character are ignored; characters without an entry fall back to
    /// their `default_spacing`.
    pub spacing_overrides: HashMap<char, u32>,
    /// Extra rows reserved below all glyphs.
    pub bottom_padding: u32,
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spacing(mut self, character: char, spacing: u32) -> Self {
        self.spacing_overrides.insert(character, spacing);
        self
    }

    pub fn with_bottom_padding(mut self, bottom_padding: u32) -> Self {
        self.bottom_padding = bottom_padding;
        self
    }

    /// Advance to insert after `glyph`.
    pub fn advance_for(&self, glyph: &Glyph) -> u32 {
        self.spacing_overrides
            .get(&glyph.character)
            .copied()
            .unwrap_or(glyph.default_spacing)
    }
}

/// A glyph's final cell in the atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedGlyph {
    pub character: char,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Horizontal gap inserted after this glyph, before the next cell.
    pub advance: u32,
}

/// Computed single-strip layout for a glyph sequence.
///
/// Recomputed from scratch on every call; placements keep the glyph
/// input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub placements: Vec<PlacedGlyph>,
    pub width: u32,
    pub height: u32,
}

/// Places every glyph on a single left-to-right strip.
///
/// Horizontal: `x[0] = 0`, `x[i+1] = x[i] + width[i] + advance[i]`; the
/// strip width ends after the last glyph's own width, with no trailing
/// advance. Vertical: all baselines meet at `max(baseline_offset_y)`, so
/// `y + baseline_offset_y` is identical for every placement and no glyph
/// is ever clipped by the row itself. Total height is the tallest glyph
/// plus `bottom_padding`.
///
/// # Errors
/// [`Error::EmptyCharacterSet`] for zero glyphs;
/// [`Error::InvariantViolation`] if the accumulated width overflows.
pub fn compute_layout(glyphs: &[Glyph], config: &LayoutConfig) -> Result<Layout> {
    if glyphs.is_empty() {
        return Err(Error::EmptyCharacterSet);
    }

    let row_baseline = glyphs
        .iter()
        .map(|g| g.baseline_offset_y)
        .max()
        .unwrap_or(0);
    let max_height = glyphs.iter().map(|g| g.height).max().unwrap_or(0);

    let mut placements = Vec::with_capacity(glyphs.len());
    let mut x = 0u32;
    let mut width = 0u32;
    for glyph in glyphs {
        let advance = config.advance_for(glyph);
        placements.push(PlacedGlyph {
            character: glyph.character,
            x,
            y: row_baseline - glyph.baseline_offset_y,
            width: glyph.width,
            height: glyph.height,
            advance,
        });

        width = x
            .checked_add(glyph.width)
            .ok_or_else(|| Error::InvariantViolation("atlas width overflows u32".to_string()))?;
        x = width
            .checked_add(advance)
            .ok_or_else(|| Error::InvariantViolation("atlas width overflows u32".to_string()))?;
    }

    Ok(Layout {
        placements,
        width,
        height: max_height + config.bottom_padding,
    })
}
