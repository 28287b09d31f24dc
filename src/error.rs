use std::path::PathBuf;

/// Errors produced by the sprite font engine.
///
/// Loader and export errors carry enough detail to identify the offending
/// character or file, so a front-end can point the user at the exact input
/// that failed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested glyph directory does not exist.
    #[error("glyph directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// No `<character>.png` file exists in the glyph directory.
    #[error("no image found for character '{0}'")]
    GlyphFileMissing(char),

    /// The glyph file exists but could not be decoded, or decoded to an
    /// unusable (zero-sized) image.
    #[error("failed to decode image for '{character}': {reason}")]
    GlyphDecodeFailed { character: char, reason: String },

    /// The character sequence was empty.
    #[error("character set is empty")]
    EmptyCharacterSet,

    /// Writing an output artifact failed. Export staging guarantees that
    /// no partially written atlas or config file is left behind.
    #[error("failed to write output: {0}")]
    OutputWriteFailed(String),

    /// Placement math produced coordinates outside the atlas. This is an
    /// engine bug, never a recoverable input error.
    #[error("atlas invariant violated: {0}")]
    InvariantViolation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
