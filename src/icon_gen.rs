use crate::glyph::{font_candidates, load_font, GlyphMask, IconFont};
use crate::shapes::{blend_pixel, draw_polyline, fill_circle, inside_rounded_square};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    ColorType, ImageEncoder, Rgba, RgbaImage,
};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

pub const DEFAULT_SIZES: [u32; 3] = [16, 48, 128];

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const SHADOW: Rgba<u8> = Rgba([0, 0, 0, 50]);

#[derive(Debug, Parser)]
#[clap(
    name = "icon-render",
    version,
    about = "Render gradient badge icons as PNG files"
)]
pub struct Args {
    /// Output directory. It must already exist.
    #[clap(short, long, value_name = "DIR", default_value = "icons")]
    pub output: PathBuf,

    /// Icon sizes to render, in order.
    #[clap(
        short,
        long,
        value_delimiter = ',',
        value_name = "SIZES",
        value_parser = clap::value_parser!(u32).range(1..),
        default_values_t = DEFAULT_SIZES.to_vec()
    )]
    pub png: Vec<u32>,

    /// Letter drawn in the middle of the icon
    #[clap(long, default_value_t = 'S')]
    pub glyph: char,

    /// Font file tried before the built-in system font list
    #[clap(long, value_name = "PATH")]
    pub font: Option<PathBuf>,

    /// Gradient color at the top-left corner (CSS color format)
    #[clap(long, default_value = "#667eea")]
    pub start_color: String,

    /// Gradient color at the bottom-right corner (CSS color format)
    #[clap(long, default_value = "#764ba2")]
    pub end_color: String,

    /// Fill color of the checkmark badge (CSS color format)
    #[clap(long, default_value = "#4ade80")]
    pub badge_color: String,
}

/// Colors used to paint an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub start: Rgba<u8>,
    pub end: Rgba<u8>,
    pub badge: Rgba<u8>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            start: Rgba([0x66, 0x7e, 0xea, 255]),
            end: Rgba([0x76, 0x4b, 0xa2, 255]),
            badge: Rgba([0x4a, 0xde, 0x80, 255]),
        }
    }
}

impl Palette {
    pub fn from_css(start: &str, end: &str, badge: &str) -> Result<Self> {
        Ok(Self {
            start: parse_color(start)?,
            end: parse_color(end)?,
            badge: parse_color(badge)?,
        })
    }

    /// Diagonal gradient color for pixel `(x, y)` of a `size`x`size` icon.
    pub fn gradient(&self, x: u32, y: u32, size: u32) -> Rgba<u8> {
        let ratio = (x + y) as f32 / (2 * size) as f32;
        let lerp = |c: usize| {
            let from = self.start[c] as f32;
            let to = self.end[c] as f32;
            (from + (to - from) * ratio) as u8
        };
        Rgba([lerp(0), lerp(1), lerp(2), 255])
    }
}

fn parse_color(value: &str) -> Result<Rgba<u8>> {
    let color = css_color::Srgb::from_str(value)
        .map_err(|_| anyhow!("Invalid CSS color: {}", value))?;
    let channel = |v: f32| (v * 255.).round().clamp(0., 255.) as u8;
    Ok(Rgba([
        channel(color.red),
        channel(color.green),
        channel(color.blue),
        255,
    ]))
}

/// Placement of the checkmark badge for a given icon size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub center: (i32, i32),
    pub radius: i32,
    pub stroke_width: u32,
    pub check: [(i32, i32); 3],
}

impl Badge {
    pub fn for_size(size: u32) -> Self {
        let s = size as i32;
        let radius = (size as f32 * 0.16) as i32;
        let inset = (size as f32 * 0.08) as i32;
        let c = s - radius - inset;

        let check_size = (radius as f32 * 0.8) as i32;
        let check = [
            (c - check_size / 3, c),
            (c - check_size / 6, c + check_size / 3),
            (c + check_size / 2, c - check_size / 3),
        ];

        Self {
            center: (c, c),
            radius,
            stroke_width: (size / 16).max(1),
            check,
        }
    }
}

/// Renders icons with a fixed font, palette and letter.
pub struct IconRenderer {
    font: IconFont,
    palette: Palette,
    glyph: char,
}

impl IconRenderer {
    pub fn new(font: IconFont, palette: Palette, glyph: char) -> Self {
        Self {
            font,
            palette,
            glyph,
        }
    }

    pub fn font(&self) -> &IconFont {
        &self.font
    }

    /// Render a `size`x`size` icon.
    pub fn render(&self, size: u32) -> RgbaImage {
        let mut img = RgbaImage::new(size, size);

        self.paint_background(&mut img);
        self.paint_glyph(&mut img);
        self.paint_badge(&mut img);

        img
    }

    fn paint_background(&self, img: &mut RgbaImage) {
        let size = img.width();
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            if inside_rounded_square(x, y, size) {
                *pixel = self.palette.gradient(x, y, size);
            }
        }
    }

    fn paint_glyph(&self, img: &mut RgbaImage) {
        let size = img.width() as i32;
        let font_size = (size as f32 * 0.55) as u32;
        let mask = self.font.rasterize(self.glyph, font_size as f32);
        if mask.is_empty() {
            return;
        }

        let x = (size - mask.width as i32) / 2;
        let y = (size - mask.height as i32) / 2 - (size as f32 * 0.05) as i32;
        let shadow_offset = (size / 32).max(1);

        draw_mask(img, &mask, x + shadow_offset, y + shadow_offset, SHADOW);
        draw_mask(img, &mask, x, y, WHITE);
    }

    fn paint_badge(&self, img: &mut RgbaImage) {
        let badge = Badge::for_size(img.width());
        let (cx, cy) = badge.center;

        fill_circle(img, cx, cy, badge.radius, self.palette.badge);
        draw_polyline(img, &badge.check, badge.stroke_width, WHITE);
    }
}

/// Composite a glyph mask onto the canvas with its top-left corner at `(x, y)`.
fn draw_mask(img: &mut RgbaImage, mask: &GlyphMask, x: i32, y: i32, color: Rgba<u8>) {
    for my in 0..mask.height {
        for mx in 0..mask.width {
            let px = x + mx as i32;
            let py = y + my as i32;
            if px < 0 || py < 0 || px >= img.width() as i32 || py >= img.height() as i32 {
                continue;
            }
            blend_pixel(img.get_pixel_mut(px as u32, py as u32), color, mask.get(mx, my));
        }
    }
}

pub fn generate_icons(args: Args) -> Result<()> {
    let palette = Palette::from_css(&args.start_color, &args.end_color, &args.badge_color)?;
    let font = load_font(&font_candidates(args.font.as_deref()));
    let renderer = IconRenderer::new(font, palette, args.glyph);

    for &size in &args.png {
        let output_path = icon_path(&args.output, size);
        save_icon(&renderer.render(size), &output_path)?;
        println!("Created {} ({size}x{size})", output_path.display());
    }

    println!("All icons generated successfully!");
    Ok(())
}

/// Conventional file name for an icon of the given size.
pub fn icon_path(out_dir: &Path, size: u32) -> PathBuf {
    out_dir.join(format!("icon{size}.png"))
}

fn save_icon(image: &RgbaImage, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create PNG file {}", path.display()))?;
    let mut out_file = BufWriter::new(file);
    write_png(image, &mut out_file)?;
    out_file
        .flush()
        .with_context(|| format!("Failed to write PNG file {}", path.display()))?;
    Ok(())
}

// Encode image data as PNG with compression
pub fn write_png<W: Write>(image: &RgbaImage, w: W) -> Result<()> {
    let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, PngFilterType::Adaptive);
    encoder
        .write_image(image.as_raw(), image.width(), image.height(), ColorType::Rgba8)
        .context("Failed to encode PNG")?;
    Ok(())
}
