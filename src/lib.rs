//! Sprite font atlas engine.
//!
//! Packs a directory of per-character glyph images (`A.png`, `0.png`,
//! `,.png`, …) into a single horizontal strip atlas and renders the
//! metrics document a game runtime needs to draw with it. The engine is
//! the invisible half of a sprite font editor: a front-end owns the
//! directory picker, spacing sliders and preview pane, and talks to this
//! crate through three request/response operations:
//! [`load_character_images`], [`generate_preview`] and
//! [`generate_sprite_font`].
//!
//! Every operation is stateless: glyphs are re-read from disk on each
//! call and all buffers are request-scoped, so each result always
//! reflects the current directory contents.
//!
//! # Example
//! ```no_run
//! use spritefont::{GenerateSpriteFontRequest, generate_sprite_font};
//!
//! # fn main() -> Result<(), spritefont::Error> {
//! let response = generate_sprite_font(&GenerateSpriteFontRequest {
//!     directory: "assets/glyphs".to_string(),
//!     characters: "0123456789.,".to_string(),
//!     spacing_config: Default::default(),
//!     bottom_padding: 4,
//!     output_path: "out/digits.png".to_string(),
//! })?;
//! println!("{}x{}", response.sprite_width, response.sprite_height);
//! # Ok(())
//! # }
//! ```

mod atlas;
mod commands;
mod error;
mod glyph;
mod layout;
mod metrics;
mod preview;

pub use atlas::compose;
pub use commands::{
    CharacterInfo, GenerateSpriteFontRequest, GenerateSpriteFontResponse, LoadImagesRequest,
    LoadImagesResponse, PreviewRequest, PreviewResponse, generate_preview, generate_sprite_font,
    load_character_images,
};
pub use error::{Error, Result};
pub use glyph::{Glyph, LoadedGlyph, SPACING_SLACK, load_glyphs};
pub use layout::{Layout, LayoutConfig, PlacedGlyph, compute_layout};
pub use metrics::serialize_metrics;
pub use preview::{Preview, render_preview};
