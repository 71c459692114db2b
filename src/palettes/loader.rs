//! Master palette loading.
//!
//! A palette source is either a built-in name or a path:
//! - `.pal`, `.lmp`: raw RGB triples (a `PLAYPAL` lump); the first 768 bytes are used
//! - `.hex`, `.txt`: one color per line in any [`parse_color`] syntax;
//!   blank lines and lines starting with `;` or `//` are skipped
//! - anything else: an image, whose first 256 pixels are read row-major

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::{builtin, MasterPalette, PALETTE_SIZE};
use crate::color::{parse_color, ColorError, PalEntry};

/// Error while loading a master palette.
#[derive(Debug, Error)]
pub enum PaletteLoadError {
    #[error("Failed to read palette '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode palette image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Raw palette '{path}' has {len} bytes, expected at least 768")]
    TooShort { path: PathBuf, len: usize },
    #[error("Palette '{path}' has more than 256 colors")]
    TooManyColors { path: PathBuf },
    #[error("Bad color on line {line}: {error}")]
    Color { line: usize, error: ColorError },
}

/// Load a master palette from a built-in name or a file path.
pub fn load_palette(source: &str) -> Result<MasterPalette, PaletteLoadError> {
    if let Some(pal) = builtin::get_builtin(source) {
        return Ok(pal);
    }
    load_palette_file(Path::new(source))
}

/// Load a master palette from a file, picking the format from the extension.
pub fn load_palette_file(path: &Path) -> Result<MasterPalette, PaletteLoadError> {
    let ext = path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("pal") | Some("lmp") => {
            let bytes = read(path)?;
            if bytes.len() < PALETTE_SIZE * 3 {
                return Err(PaletteLoadError::TooShort { path: path.to_path_buf(), len: bytes.len() });
            }
            Ok(MasterPalette::from_rgb_bytes(&bytes[..PALETTE_SIZE * 3]))
        }
        Some("hex") | Some("txt") => {
            let bytes = read(path)?;
            let text = String::from_utf8_lossy(&bytes);
            let colors = parse_color_list(&text)?;
            if colors.len() > PALETTE_SIZE {
                return Err(PaletteLoadError::TooManyColors { path: path.to_path_buf() });
            }
            Ok(MasterPalette::from_colors(&colors))
        }
        _ => {
            let img = image::open(path)?.to_rgba8();
            let colors: Vec<PalEntry> =
                img.pixels().take(PALETTE_SIZE).map(|p| PalEntry::from(*p)).collect();
            Ok(MasterPalette::from_colors(&colors))
        }
    }
}

fn read(path: &Path) -> Result<Vec<u8>, PaletteLoadError> {
    fs::read(path).map_err(|source| PaletteLoadError::Io { path: path.to_path_buf(), source })
}

/// Parse one color per line.
fn parse_color_list(text: &str) -> Result<Vec<PalEntry>, PaletteLoadError> {
    let mut colors = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with("//") {
            continue;
        }
        let rgba = parse_color(line).map_err(|error| PaletteLoadError::Color { line: i + 1, error })?;
        colors.push(PalEntry::from(rgba));
    }
    Ok(colors)
}
