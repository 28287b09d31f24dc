use crate::layout::PlacedGlyph;

/// Renders the metrics document consumed by the rendering runtime.
///
/// Format, one glyph line per placement in layout order:
///
/// ```text
/// width: <atlas width>
/// height: <atlas height>
/// <char> <x> <y> <width> <height> <advance>
/// ```
///
/// The field order and delimiter are consumed downstream and must stay
/// stable; identical inputs always serialize to byte-identical output.
pub fn serialize_metrics(atlas_width: u32, atlas_height: u32, placements: &[PlacedGlyph]) -> String {
    let mut out = String::new();
    out.push_str(&format!("width: {atlas_width}\n"));
    out.push_str(&format!("height: {atlas_height}\n"));
    for p in placements {
        out.push_str(&format!(
            "{} {} {} {} {} {}\n",
            p.character, p.x, p.y, p.width, p.height, p.advance
        ));
    }
    out
}
