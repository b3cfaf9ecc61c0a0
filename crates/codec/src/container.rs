//! PNG container for pixel buffers.

use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};

use crate::{CodecError, PixelBuffer};

/// Encodes an 8-bit RGBA PNG.
pub fn encode_png(pixels: &PixelBuffer) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    {
        let mut encoder = Encoder::new(&mut out, pixels.width(), pixels.height());
        encoder.set_color(ColorType::Rgba);
        encoder.set_depth(BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(pixels.as_bytes())?;
        writer.finish()?;
    }
    Ok(out)
}

/// Decodes any PNG into 8-bit RGBA.
///
/// The platform may re-encode an opaque RGBA upload as RGB, palette or
/// 16-bit; all of them are normalized here. Colour samples are preserved
/// exactly by the lossless conversions.
pub fn decode_png(bytes: &[u8]) -> Result<PixelBuffer, CodecError> {
    let mut decoder = Decoder::new(bytes);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    let rgba = match info.color_type {
        ColorType::Rgba => buf,
        ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        ColorType::Grayscale => buf.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        // EXPAND turns palette images into RGB(A).
        ColorType::Indexed => {
            return Err(CodecError::Dimensions {
                width: info.width,
                height: info.height,
                len: buf.len(),
            });
        }
    };

    PixelBuffer::from_rgba(info.width, info.height, rgba)
}
