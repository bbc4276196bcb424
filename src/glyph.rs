//! Glyph rasterization with an ordered font fallback chain.
//!
//! Fonts are looked up from a prioritized list of files. The first file that
//! parses as a TrueType/OpenType font is used through `rusttype`; when none
//! do, a tiny built-in bitmap font takes over so rendering never fails.

use rusttype::{point, Font, Scale};
use std::path::{Path, PathBuf};

/// System font files tried, in order, after any user-supplied font.
pub const DEFAULT_FONT_PATHS: &[&str] = &[
    "/System/Library/Fonts/Helvetica.ttc",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

const BITMAP_COLS: u32 = 5;
const BITMAP_ROWS: u32 = 7;

// 5x7 uppercase Latin; bit 4 is the leftmost column
const BITMAP_GLYPHS: [[u8; 7]; 26] = [
    [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11], // A
    [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E], // B
    [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E], // C
    [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E], // D
    [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F], // E
    [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10], // F
    [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F], // G
    [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11], // H
    [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E], // I
    [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C], // J
    [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11], // K
    [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F], // L
    [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11], // M
    [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11], // N
    [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E], // O
    [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10], // P
    [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D], // Q
    [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11], // R
    [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E], // S
    [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04], // T
    [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E], // U
    [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04], // V
    [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A], // W
    [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11], // X
    [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04], // Y
    [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F], // Z
];

const MISSING_GLYPH: [u8; 7] = [0x1F; 7];

/// Font used to draw the icon letter.
pub enum IconFont {
    /// A scalable font loaded from disk.
    Outline(Font<'static>),
    /// The built-in 5x7 bitmap font.
    Bitmap,
}

/// Coverage values for the ink bounding box of a single rendered character.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphMask {
    pub width: u32,
    pub height: u32,
    coverage: Vec<f32>,
}

impl GlyphMask {
    fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            coverage: vec![0.0; (width * height) as usize],
        }
    }

    /// Coverage in `[0, 1]` at `(x, y)` relative to the mask's top-left corner.
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.coverage[(y * self.width + x) as usize]
    }

    fn set(&mut self, x: u32, y: u32, value: f32) {
        let idx = (y * self.width + x) as usize;
        self.coverage[idx] = value;
    }

    pub fn is_empty(&self) -> bool {
        self.coverage.iter().all(|&v| v <= 0.0)
    }
}

/// Build the ordered candidate list, putting a user-supplied font first.
pub fn font_candidates(user_font: Option<&Path>) -> Vec<PathBuf> {
    user_font
        .map(Path::to_path_buf)
        .into_iter()
        .chain(DEFAULT_FONT_PATHS.iter().map(PathBuf::from))
        .collect()
}

/// Load the first usable font from `candidates`, falling back to the bitmap font.
pub fn load_font(candidates: &[PathBuf]) -> IconFont {
    candidates
        .iter()
        .find_map(|path| try_load_font(path))
        .map(IconFont::Outline)
        .unwrap_or(IconFont::Bitmap)
}

fn try_load_font(path: &Path) -> Option<Font<'static>> {
    let data = std::fs::read(path).ok()?;
    Font::try_from_vec(data)
}

impl IconFont {
    pub fn is_bitmap(&self) -> bool {
        matches!(self, IconFont::Bitmap)
    }

    /// Rasterize `ch` at roughly `pixel_size` pixels tall.
    pub fn rasterize(&self, ch: char, pixel_size: f32) -> GlyphMask {
        match self {
            IconFont::Outline(font) => rasterize_outline(font, ch, pixel_size),
            IconFont::Bitmap => rasterize_bitmap(ch, pixel_size),
        }
    }
}

fn rasterize_outline(font: &Font<'static>, ch: char, pixel_size: f32) -> GlyphMask {
    let glyph = font
        .glyph(ch)
        .scaled(Scale::uniform(pixel_size))
        .positioned(point(0.0, 0.0));

    // Whitespace and empty outlines have no bounding box
    let Some(bb) = glyph.pixel_bounding_box() else {
        return GlyphMask::blank(0, 0);
    };

    let width = (bb.max.x - bb.min.x) as u32;
    let height = (bb.max.y - bb.min.y) as u32;
    let mut mask = GlyphMask::blank(width, height);

    glyph.draw(|x, y, v| {
        if x < width && y < height {
            mask.set(x, y, v);
        }
    });

    mask
}

fn rasterize_bitmap(ch: char, pixel_size: f32) -> GlyphMask {
    let rows = bitmap_rows(ch);
    let block = ((pixel_size / BITMAP_ROWS as f32) as u32).max(1);

    let lit = |col: u32, row: u32| rows[row as usize] & (1 << (BITMAP_COLS - 1 - col)) != 0;

    // Trim to the lit cells so centering works on ink, like outline glyphs
    let cols: Vec<u32> = (0..BITMAP_COLS)
        .filter(|&c| (0..BITMAP_ROWS).any(|r| lit(c, r)))
        .collect();
    let lines: Vec<u32> = (0..BITMAP_ROWS)
        .filter(|&r| (0..BITMAP_COLS).any(|c| lit(c, r)))
        .collect();

    let (Some(&c0), Some(&c1), Some(&r0), Some(&r1)) =
        (cols.first(), cols.last(), lines.first(), lines.last())
    else {
        return GlyphMask::blank(0, 0);
    };

    let mut mask = GlyphMask::blank((c1 - c0 + 1) * block, (r1 - r0 + 1) * block);
    for y in 0..mask.height {
        for x in 0..mask.width {
            if lit(c0 + x / block, r0 + y / block) {
                mask.set(x, y, 1.0);
            }
        }
    }

    mask
}

fn bitmap_rows(ch: char) -> [u8; 7] {
    let upper = ch.to_ascii_uppercase();
    if upper.is_ascii_uppercase() {
        BITMAP_GLYPHS[(upper as u8 - b'A') as usize]
    } else {
        MISSING_GLYPH
    }
}
