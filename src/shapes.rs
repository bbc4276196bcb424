//! Pixel-level drawing primitives used by the icon renderer.
//!
//! Everything here operates directly on an [`RgbaImage`] with integer pixel
//! coordinates; shapes are clipped to the canvas.

use image::{Rgba, RgbaImage};

/// Returns true when `(x, y)` falls inside the rounded square of a `size`x`size` icon.
///
/// Only the four corner regions are tested; a pixel is dropped when it lies
/// in a corner region and outside that corner's quarter circle.
pub fn inside_rounded_square(x: u32, y: u32, size: u32) -> bool {
    let (x, y, size) = (x as i64, y as i64, size as i64);
    let r = size / 8;
    let far = size - r;
    let outside = |cx: i64, cy: i64| (x - cx).pow(2) + (y - cy).pow(2) > r * r;

    if x < r && y < r && outside(r, r) {
        return false;
    }
    if x > far && y < r && outside(far, r) {
        return false;
    }
    if x < r && y > far && outside(r, far) {
        return false;
    }
    if x > far && y > far && outside(far, far) {
        return false;
    }

    true
}

/// Composite `color` over `dst` with an extra coverage factor (source-over).
pub fn blend_pixel(dst: &mut Rgba<u8>, color: Rgba<u8>, coverage: f32) {
    let src_a = color[3] as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    if src_a <= 0.0 {
        return;
    }

    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);

    for c in 0..3 {
        let value = (color[c] as f32 * src_a + dst[c] as f32 * dst_a * (1.0 - src_a)) / out_a;
        dst[c] = value.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Fill a disc centered on `(cx, cy)`; a pixel is inside when `dx² + dy² <= radius²`.
pub fn fill_circle(img: &mut RgbaImage, cx: i32, cy: i32, radius: i32, color: Rgba<u8>) {
    let r2 = (radius as i64).pow(2);

    for y in (cy - radius).max(0)..=(cy + radius).min(img.height() as i32 - 1) {
        for x in (cx - radius).max(0)..=(cx + radius).min(img.width() as i32 - 1) {
            let dx = (x - cx) as i64;
            let dy = (y - cy) as i64;
            if dx * dx + dy * dy <= r2 {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Stroke an open polyline through `points` with the given width.
///
/// Each segment is rasterized as a capsule: every pixel whose distance to the
/// segment is at most half the width (never less than half a pixel) is painted.
pub fn draw_polyline(img: &mut RgbaImage, points: &[(i32, i32)], width: u32, color: Rgba<u8>) {
    let half = (width as f32 / 2.0).max(0.5);

    match points {
        [] => {}
        [only] => stroke_segment(img, *only, *only, half, color),
        _ => {
            for pair in points.windows(2) {
                stroke_segment(img, pair[0], pair[1], half, color);
            }
        }
    }
}

fn stroke_segment(img: &mut RgbaImage, a: (i32, i32), b: (i32, i32), half: f32, color: Rgba<u8>) {
    let reach = half.ceil() as i32;
    let x_min = (a.0.min(b.0) - reach).max(0);
    let x_max = (a.0.max(b.0) + reach).min(img.width() as i32 - 1);
    let y_min = (a.1.min(b.1) - reach).max(0);
    let y_max = (a.1.max(b.1) + reach).min(img.height() as i32 - 1);

    for y in y_min..=y_max {
        for x in x_min..=x_max {
            if distance_to_segment((x as f32, y as f32), a, b) <= half {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

fn distance_to_segment(p: (f32, f32), a: (i32, i32), b: (i32, i32)) -> f32 {
    let (ax, ay) = (a.0 as f32, a.1 as f32);
    let (bx, by) = (b.0 as f32, b.1 as f32);
    let (dx, dy) = (bx - ax, by - ay);
    let len2 = dx * dx + dy * dy;

    // Degenerate segment collapses to its start point
    let t = if len2 == 0.0 {
        0.0
    } else {
        (((p.0 - ax) * dx + (p.1 - ay) * dy) / len2).clamp(0.0, 1.0)
    };

    let (qx, qy) = (ax + t * dx, ay + t * dy);
    ((p.0 - qx).powi(2) + (p.1 - qy).powi(2)).sqrt()
}
