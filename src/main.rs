//! Command-line driver over the engine: pack a glyph directory into an
//! atlas without going through the graphical front-end.

use std::env;

use anyhow::{Context, Result, bail};
use spritefont::{GenerateSpriteFontRequest, generate_sprite_font};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (directory, characters, output_path, bottom_padding) = match args.as_slice() {
        [dir, chars, out] => (dir.clone(), chars.clone(), out.clone(), 0),
        [dir, chars, out, pad] => (
            dir.clone(),
            chars.clone(),
            out.clone(),
            pad.parse()
                .with_context(|| format!("invalid bottom padding '{pad}'"))?,
        ),
        _ => bail!("usage: spritefont <glyph-dir> <characters> <output.png> [bottom-padding]"),
    };

    let response = generate_sprite_font(&GenerateSpriteFontRequest {
        directory,
        characters,
        spacing_config: Default::default(),
        bottom_padding,
        output_path,
    })
    .context("sprite font generation failed")?;

    println!(
        "wrote {} ({}x{}) with sibling config.txt",
        response.output_path, response.sprite_width, response.sprite_height
    );
    Ok(())
}
