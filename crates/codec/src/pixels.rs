use std::fmt;

use crate::CodecError;

/// Owned 8-bit RGBA image, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl PixelBuffer {
    /// Fully transparent black buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = width as usize * height as usize;
        Self {
            width,
            height,
            data: rgba.repeat(pixels),
        }
    }

    /// Wraps raw RGBA bytes; the length must be `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CodecError> {
        if data.len() != width as usize * height as usize * 4 {
            return Err(CodecError::Dimensions {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let i = self.index(x, y)?;
        let p = &self.data[i..i + 4];
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Overwrites the pixel at `(x, y)`; out-of-bounds writes are dropped.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if let Some(i) = self.index(x, y) {
            self.data[i..i + 4].copy_from_slice(&rgba);
        }
    }

    /// Alpha-blends `rgb` over the pixel at `(x, y)` with `alpha` in `0.0..=1.0`.
    pub fn blend_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3], alpha: f32) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        let a = alpha.clamp(0.0, 1.0);
        let dst_a = self.data[i + 3] as f32 / 255.0;
        let out_a = a + dst_a * (1.0 - a);
        for c in 0..3 {
            let src = rgb[c] as f32;
            let dst = self.data[i + c] as f32;
            let value = if out_a > 0.0 {
                (src * a + dst * dst_a * (1.0 - a)) / out_a
            } else {
                0.0
            };
            self.data[i + c] = value.round().clamp(0.0, 255.0) as u8;
        }
        self.data[i + 3] = (out_a * 255.0).round() as u8;
    }

    /// Payload bytes (length prefix included) this buffer can carry:
    /// 3 samples × 2 bits per pixel.
    pub fn capacity(&self) -> usize {
        self.width as usize * self.height as usize * 3 * 2 / 8
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_buffer_has_expected_size() {
        let buf = PixelBuffer::filled(3, 2, [1, 2, 3, 4]);
        assert_eq!(buf.as_bytes().len(), 24);
        assert_eq!(buf.pixel(2, 1), Some([1, 2, 3, 4]));
        assert_eq!(buf.pixel(3, 0), None);
    }

    #[test]
    fn from_rgba_checks_length() {
        assert!(PixelBuffer::from_rgba(2, 2, vec![0; 16]).is_ok());
        let err = PixelBuffer::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, CodecError::Dimensions { len: 15, .. }));
    }

    #[test]
    fn set_pixel_ignores_out_of_bounds() {
        let mut buf = PixelBuffer::new(2, 2);
        buf.set_pixel(1, 1, [9, 9, 9, 255]);
        buf.set_pixel(5, 5, [1, 1, 1, 1]);
        assert_eq!(buf.pixel(1, 1), Some([9, 9, 9, 255]));
        assert_eq!(buf.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn blend_over_opaque() {
        let mut buf = PixelBuffer::filled(1, 1, [200, 200, 200, 255]);
        buf.blend_pixel(0, 0, [0, 0, 0], 0.5);
        assert_eq!(buf.pixel(0, 0), Some([100, 100, 100, 255]));

        buf.blend_pixel(0, 0, [0, 0, 0], 1.0);
        assert_eq!(buf.pixel(0, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn capacity_of_board_image() {
        let buf = PixelBuffer::new(640, 360);
        assert_eq!(buf.capacity(), 172_800);
    }
}
