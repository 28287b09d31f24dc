//! The three operations a front-end invokes, with their marshaled
//! request/response shapes.
//!
//! Every operation is a stateless computation over its request and the
//! filesystem: glyphs are re-read from disk on each call, nothing is
//! cached in between, and no operation retries on failure.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::atlas;
use crate::error::{Error, Result};
use crate::glyph::{self, Glyph};
use crate::layout::{self, LayoutConfig};
use crate::metrics;
use crate::preview::{self, Preview};

/// Metrics for one loaded character; pixel data stays engine-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterInfo {
    pub character: char,
    pub width: u32,
    pub height: u32,
    /// Initial advance value, equal to the glyph's width.
    pub spacing: u32,
    pub offset_y: u32,
    /// Upper bound a spacing control should offer for this character.
    pub max_spacing: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadImagesRequest {
    pub directory: String,
    pub characters: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadImagesResponse {
    /// One entry per requested character, in request order, duplicates
    /// included; the caller aligns spacing controls by index.
    pub characters: Vec<CharacterInfo>,
    pub max_width: u32,
    pub max_height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    pub directory: String,
    pub characters: String,
    pub spacing_config: HashMap<char, u32>,
    pub bottom_padding: u32,
    /// Caller-issued monotonic stamp, echoed in the response. Overlapping
    /// preview calls may complete out of order; the caller keeps the
    /// response whose stamp matches the latest request and discards the
    /// rest.
    #[serde(default)]
    pub sequence: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub success: bool,
    /// `data:image/png;base64,…` payload; empty when `success` is false.
    pub preview_base64: String,
    pub width: u32,
    pub height: u32,
    pub sequence: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSpriteFontRequest {
    pub directory: String,
    pub characters: String,
    pub spacing_config: HashMap<char, u32>,
    pub bottom_padding: u32,
    pub output_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSpriteFontResponse {
    pub success: bool,
    pub output_path: String,
    pub sprite_width: u32,
    pub sprite_height: u32,
    /// The metrics document that was written to `config.txt`.
    pub config_data: String,
}

/// Loads every requested glyph and reports its metrics, without pixels.
///
/// # Errors
/// Fails on the first unreadable or undecodable glyph, identifying the
/// character; the caller blocks dependent actions until a load succeeds.
pub fn load_character_images(request: &LoadImagesRequest) -> Result<LoadImagesResponse> {
    let glyphs = glyph::load_glyphs(Path::new(&request.directory), &request.characters)?;

    let mut max_width = 0;
    let mut max_height = 0;
    let characters = glyphs
        .iter()
        .map(|loaded| {
            let g = &loaded.glyph;
            max_width = max_width.max(g.width);
            max_height = max_height.max(g.height);
            CharacterInfo {
                character: g.character,
                width: g.width,
                height: g.height,
                spacing: g.default_spacing,
                offset_y: g.baseline_offset_y,
                max_spacing: g.max_spacing(),
            }
        })
        .collect();

    Ok(LoadImagesResponse {
        characters,
        max_width,
        max_height,
    })
}

/// Rebuilds the atlas from disk and returns it as an embeddable preview.
///
/// Preview generation is speculative and frequent, so failures are soft:
/// they are logged and reported as `success: false` rather than raised,
/// and the caller may keep showing the last good preview.
pub fn generate_preview(request: &PreviewRequest) -> PreviewResponse {
    match try_generate_preview(request) {
        Ok(preview) => PreviewResponse {
            success: true,
            preview_base64: preview.data_uri,
            width: preview.width,
            height: preview.height,
            sequence: request.sequence,
        },
        Err(err) => {
            log::warn!("preview generation failed: {err}");
            PreviewResponse {
                success: false,
                preview_base64: String::new(),
                width: 0,
                height: 0,
                sequence: request.sequence,
            }
        }
    }
}

fn try_generate_preview(request: &PreviewRequest) -> Result<Preview> {
    let glyphs = glyph::load_glyphs(Path::new(&request.directory), &request.characters)?;
    let config = layout_config(&request.spacing_config, request.bottom_padding);
    preview::render_preview(&glyphs, &config)
}

/// Rebuilds the atlas from disk and writes the two output artifacts: the
/// atlas PNG at `output_path` and the metrics document at a sibling
/// `config.txt`.
///
/// Both artifacts are staged as temporary files next to their
/// destinations and swapped in only once fully written, so a failure
/// leaves either the previous files or nothing, never a truncated
/// atlas silently treated as success.
pub fn generate_sprite_font(
    request: &GenerateSpriteFontRequest,
) -> Result<GenerateSpriteFontResponse> {
    let glyphs = glyph::load_glyphs(Path::new(&request.directory), &request.characters)?;
    let config = layout_config(&request.spacing_config, request.bottom_padding);

    let metrics_glyphs: Vec<Glyph> = glyphs.iter().map(|g| g.glyph.clone()).collect();
    let layout = layout::compute_layout(&metrics_glyphs, &config)?;
    let composed = atlas::compose(&glyphs, &layout)?;
    let png = atlas::encode_png(&composed)?;
    let config_data = metrics::serialize_metrics(layout.width, layout.height, &layout.placements);

    let output_path = PathBuf::from(&request.output_path);
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::OutputWriteFailed(format!("{}: {e}", parent.display())))?;
        }
    }
    let config_path = output_path.with_file_name("config.txt");
    write_outputs(&output_path, &png, &config_path, config_data.as_bytes())?;

    log::debug!(
        "wrote sprite font {} ({}x{}) and {}",
        output_path.display(),
        layout.width,
        layout.height,
        config_path.display()
    );

    Ok(GenerateSpriteFontResponse {
        success: true,
        output_path: output_path.to_string_lossy().into_owned(),
        sprite_width: layout.width,
        sprite_height: layout.height,
        config_data,
    })
}

fn layout_config(spacing: &HashMap<char, u32>, bottom_padding: u32) -> LayoutConfig {
    LayoutConfig {
        spacing_overrides: spacing.clone(),
        bottom_padding,
    }
}

/// Stages both artifacts fully, then swaps them into place.
fn write_outputs(
    atlas_path: &Path,
    atlas_bytes: &[u8],
    config_path: &Path,
    config_bytes: &[u8],
) -> Result<()> {
    let atlas_tmp = temp_sibling(atlas_path);
    let config_tmp = temp_sibling(config_path);

    let staged = fs::write(&atlas_tmp, atlas_bytes)
        .map_err(|e| Error::OutputWriteFailed(format!("{}: {e}", atlas_tmp.display())))
        .and_then(|()| {
            fs::write(&config_tmp, config_bytes)
                .map_err(|e| Error::OutputWriteFailed(format!("{}: {e}", config_tmp.display())))
        })
        .and_then(|()| {
            fs::rename(&atlas_tmp, atlas_path)
                .map_err(|e| Error::OutputWriteFailed(format!("{}: {e}", atlas_path.display())))
        })
        .and_then(|()| {
            fs::rename(&config_tmp, config_path)
                .map_err(|e| Error::OutputWriteFailed(format!("{}: {e}", config_path.display())))
        });

    if staged.is_err() {
        let _ = fs::remove_file(&atlas_tmp);
        let _ = fs::remove_file(&config_tmp);
    }
    staged
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "out".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_glyph_png(dir: &Path, character: char, width: u32, height: u32, opaque_from_row: u32) {
        let img = RgbaImage::from_fn(width, height, |_, y| {
            if y >= opaque_from_row {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        img.save(dir.join(format!("{character}.png"))).unwrap();
    }

    /// A.png 10x10 fully opaque, B.png 8x12 opaque in the bottom 10 rows.
    fn scenario_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write_glyph_png(dir.path(), 'A', 10, 10, 0);
        write_glyph_png(dir.path(), 'B', 8, 12, 2);
        dir
    }

    fn scenario_spacing() -> HashMap<char, u32> {
        HashMap::from([('A', 2), ('B', 0)])
    }

    #[test]
    fn load_reports_metrics_in_request_order() {
        let dir = scenario_dir();
        let response = load_character_images(&LoadImagesRequest {
            directory: dir.path().to_string_lossy().into_owned(),
            characters: "AB".to_string(),
        })
        .unwrap();

        assert_eq!(response.characters.len(), 2);
        let a = &response.characters[0];
        let b = &response.characters[1];
        assert_eq!((a.character, a.width, a.height, a.offset_y), ('A', 10, 10, 0));
        assert_eq!((b.character, b.width, b.height, b.offset_y), ('B', 8, 12, 2));
        assert_eq!(a.spacing, 10);
        assert_eq!(a.max_spacing, 30);
        assert_eq!(response.max_width, 10);
        assert_eq!(response.max_height, 12);
    }

    #[test]
    fn load_fails_on_empty_character_set() {
        let dir = scenario_dir();
        let err = load_character_images(&LoadImagesRequest {
            directory: dir.path().to_string_lossy().into_owned(),
            characters: String::new(),
        })
        .unwrap_err();
        assert!(matches!(err, Error::EmptyCharacterSet));
    }

    #[test]
    fn generate_writes_atlas_and_sibling_config() {
        let dir = scenario_dir();
        let out = tempfile::tempdir().unwrap();
        let output_path = out.path().join("fonts").join("digits.png");

        let response = generate_sprite_font(&GenerateSpriteFontRequest {
            directory: dir.path().to_string_lossy().into_owned(),
            characters: "AB".to_string(),
            spacing_config: scenario_spacing(),
            bottom_padding: 5,
            output_path: output_path.to_string_lossy().into_owned(),
        })
        .unwrap();

        assert!(response.success);
        assert_eq!(response.sprite_width, 20);
        assert_eq!(response.sprite_height, 17);
        assert_eq!(
            response.config_data,
            "width: 20\nheight: 17\nA 0 2 10 10 2\nB 12 0 8 12 0\n"
        );

        let config_path = output_path.with_file_name("config.txt");
        assert_eq!(fs::read_to_string(&config_path).unwrap(), response.config_data);

        let written = image::open(&output_path).unwrap().to_rgba8();
        assert_eq!((written.width(), written.height()), (20, 17));
        // A sits at y=2, so its cell's top rows stay transparent
        assert_eq!(written.get_pixel(0, 0)[3], 0);
        assert_eq!(written.get_pixel(0, 2)[3], 255);
        // B sits at y=0 with its first two source rows transparent
        assert_eq!(written.get_pixel(12, 0)[3], 0);
        assert_eq!(written.get_pixel(12, 2)[3], 255);
        // the advance gap after A is untouched
        assert_eq!(written.get_pixel(10, 5)[3], 0);
    }

    #[test]
    fn generate_is_deterministic_across_runs() {
        let dir = scenario_dir();
        let out = tempfile::tempdir().unwrap();
        let first = out.path().join("first.png");
        let second = out.path().join("second.png");

        for path in [&first, &second] {
            generate_sprite_font(&GenerateSpriteFontRequest {
                directory: dir.path().to_string_lossy().into_owned(),
                characters: "AB".to_string(),
                spacing_config: scenario_spacing(),
                bottom_padding: 5,
                output_path: path.to_string_lossy().into_owned(),
            })
            .unwrap();
        }

        assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
        assert_eq!(
            fs::read(first.with_file_name("config.txt")).unwrap(),
            fs::read(second.with_file_name("config.txt")).unwrap()
        );
    }

    #[test]
    fn generate_leaves_no_artifacts_for_missing_glyphs() {
        let dir = scenario_dir();
        let out = tempfile::tempdir().unwrap();
        let output_path = out.path().join("font.png");

        let err = generate_sprite_font(&GenerateSpriteFontRequest {
            directory: dir.path().to_string_lossy().into_owned(),
            characters: "ABX".to_string(),
            spacing_config: HashMap::new(),
            bottom_padding: 0,
            output_path: output_path.to_string_lossy().into_owned(),
        })
        .unwrap_err();

        assert!(matches!(err, Error::GlyphFileMissing('X')));
        assert!(!output_path.exists());
        assert!(!output_path.with_file_name("config.txt").exists());
    }

    #[test]
    fn preview_round_trips_through_base64() {
        use base64::Engine as _;
        use base64::engine::general_purpose::STANDARD;

        let dir = scenario_dir();
        let response = generate_preview(&PreviewRequest {
            directory: dir.path().to_string_lossy().into_owned(),
            characters: "AB".to_string(),
            spacing_config: scenario_spacing(),
            bottom_padding: 5,
            sequence: 7,
        });

        assert!(response.success);
        assert_eq!(response.sequence, 7);
        assert_eq!((response.width, response.height), (20, 17));

        let payload = response
            .preview_base64
            .strip_prefix("data:image/png;base64,")
            .expect("data uri prefix");
        let decoded = image::load_from_memory(&STANDARD.decode(payload).unwrap()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (20, 17));
    }

    #[test]
    fn preview_failure_is_soft_and_echoes_sequence() {
        let dir = scenario_dir();
        let response = generate_preview(&PreviewRequest {
            directory: dir.path().to_string_lossy().into_owned(),
            characters: "AQ".to_string(),
            spacing_config: HashMap::new(),
            bottom_padding: 0,
            sequence: 42,
        });

        assert!(!response.success);
        assert!(response.preview_base64.is_empty());
        assert_eq!((response.width, response.height), (0, 0));
        assert_eq!(response.sequence, 42);
    }

    #[test]
    fn preview_of_empty_character_set_is_soft_failure() {
        let dir = scenario_dir();
        let response = generate_preview(&PreviewRequest {
            directory: dir.path().to_string_lossy().into_owned(),
            characters: String::new(),
            spacing_config: HashMap::new(),
            bottom_padding: 0,
            sequence: 0,
        });
        assert!(!response.success);
    }

    #[test]
    fn unknown_spacing_keys_do_not_affect_output() {
        let dir = scenario_dir();
        let out = tempfile::tempdir().unwrap();

        let mut spacing = scenario_spacing();
        spacing.insert('Z', 99);

        let plain = generate_sprite_font(&GenerateSpriteFontRequest {
            directory: dir.path().to_string_lossy().into_owned(),
            characters: "AB".to_string(),
            spacing_config: scenario_spacing(),
            bottom_padding: 5,
            output_path: out.path().join("plain.png").to_string_lossy().into_owned(),
        })
        .unwrap();
        let strayed = generate_sprite_font(&GenerateSpriteFontRequest {
            directory: dir.path().to_string_lossy().into_owned(),
            characters: "AB".to_string(),
            spacing_config: spacing,
            bottom_padding: 5,
            output_path: out.path().join("stray.png").to_string_lossy().into_owned(),
        })
        .unwrap();

        assert_eq!(plain.config_data, strayed.config_data);
    }
}
