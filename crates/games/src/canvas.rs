//! Minimal software rasterizer for board images.
//!
//! Shapes are drawn by coverage tests against pixel centres and blended
//! with a constant alpha; there is no anti-aliasing.

use turnpost_codec::PixelBuffer;

pub type Rgb = [u8; 3];

pub const BLACK: Rgb = [0, 0, 0];

/// Fills the whole buffer with an opaque colour.
pub fn clear(pixels: &mut PixelBuffer, color: Rgb) {
    *pixels = PixelBuffer::filled(
        pixels.width(),
        pixels.height(),
        [color[0], color[1], color[2], 255],
    );
}

/// Blends an axis-aligned rectangle.
pub fn fill_rect(pixels: &mut PixelBuffer, x: i32, y: i32, w: i32, h: i32, color: Rgb, alpha: f32) {
    for py in y.max(0)..(y + h).max(0) {
        for px in x.max(0)..(x + w).max(0) {
            pixels.blend_pixel(px as u32, py as u32, color, alpha);
        }
    }
}

/// Blends a segment of the given stroke width with round caps.
pub fn line(
    pixels: &mut PixelBuffer,
    from: (f32, f32),
    to: (f32, f32),
    width: f32,
    color: Rgb,
    alpha: f32,
) {
    let half = width / 2.0;
    let (x0, y0) = from;
    let (x1, y1) = to;
    let (dx, dy) = (x1 - x0, y1 - y0);
    let len_sq = dx * dx + dy * dy;

    let min_x = (x0.min(x1) - half).floor().max(0.0) as u32;
    let max_x = (x0.max(x1) + half).ceil().max(0.0) as u32;
    let min_y = (y0.min(y1) - half).floor().max(0.0) as u32;
    let max_y = (y0.max(y1) + half).ceil().max(0.0) as u32;

    for py in min_y..=max_y.min(pixels.height().saturating_sub(1)) {
        for px in min_x..=max_x.min(pixels.width().saturating_sub(1)) {
            let (cx, cy) = (px as f32 + 0.5, py as f32 + 0.5);
            let t = if len_sq > 0.0 {
                (((cx - x0) * dx + (cy - y0) * dy) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let (nx, ny) = (x0 + t * dx, y0 + t * dy);
            let dist_sq = (cx - nx).powi(2) + (cy - ny).powi(2);
            if dist_sq <= half * half {
                pixels.blend_pixel(px, py, color, alpha);
            }
        }
    }
}

/// Blends a circle outline of radius `radius` and stroke `width`.
pub fn ring(
    pixels: &mut PixelBuffer,
    center: (f32, f32),
    radius: f32,
    width: f32,
    color: Rgb,
    alpha: f32,
) {
    let half = width / 2.0;
    let outer = radius + half;
    let (x0, y0) = center;

    let min_x = (x0 - outer).floor().max(0.0) as u32;
    let max_x = ((x0 + outer).ceil().max(0.0) as u32).min(pixels.width().saturating_sub(1));
    let min_y = (y0 - outer).floor().max(0.0) as u32;
    let max_y = ((y0 + outer).ceil().max(0.0) as u32).min(pixels.height().saturating_sub(1));

    for py in min_y..=max_y {
        for px in min_x..=max_x {
            let dist = ((px as f32 + 0.5 - x0).powi(2) + (py as f32 + 0.5 - y0).powi(2)).sqrt();
            if (dist - radius).abs() <= half {
                pixels.blend_pixel(px, py, color, alpha);
            }
        }
    }
}

// 3x5 glyphs for 0-9, one row per entry, bit 2 = left column.
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b010, 0b010, 0b010],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

/// Blends a single decimal digit centred on `center`, each glyph cell
/// `scale` pixels square.
pub fn digit(pixels: &mut PixelBuffer, value: u8, center: (i32, i32), scale: i32, color: Rgb, alpha: f32) {
    let Some(glyph) = DIGITS.get(value as usize) else {
        return;
    };
    let left = center.0 - 3 * scale / 2;
    let top = center.1 - 5 * scale / 2;
    for (row, bits) in glyph.iter().enumerate() {
        for col in 0..3 {
            if bits & (0b100 >> col) != 0 {
                fill_rect(
                    pixels,
                    left + col * scale,
                    top + row as i32 * scale,
                    scale,
                    scale,
                    color,
                    alpha,
                );
            }
        }
    }
}
