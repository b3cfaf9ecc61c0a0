//! Low-bit embedding in the R, G and B samples.

use crate::{CodecError, PixelBuffer};

const LOW_BITS: u8 = 0b0000_0011;
const LENGTH_PREFIX: usize = 4;

/// Makes the rendered image opaque: fully transparent pixels become white
/// and every alpha sample becomes 255.
pub(crate) fn flatten_opaque(pixels: &mut PixelBuffer) {
    for px in pixels.data_mut().chunks_exact_mut(4) {
        if px[3] == 0 {
            px[..3].copy_from_slice(&[255, 255, 255]);
        }
        px[3] = 255;
    }
}

/// Writes `[len: u32 BE][payload]` into the low two bits of the colour
/// samples, most significant bit pair first.
pub(crate) fn embed(pixels: &mut PixelBuffer, payload: &[u8]) -> Result<(), CodecError> {
    let needed = LENGTH_PREFIX + payload.len();
    let available = pixels.capacity();
    if needed > available {
        return Err(CodecError::Capacity { needed, available });
    }
    let len = u32::try_from(payload.len()).map_err(|_| CodecError::Capacity { needed, available })?;

    let mut samples = pixels
        .data_mut()
        .chunks_exact_mut(4)
        .flat_map(|px| px[..3].iter_mut());

    for &byte in len.to_be_bytes().iter().chain(payload) {
        for shift in [6u8, 4, 2, 0] {
            // Capacity was checked above.
            let Some(sample) = samples.next() else {
                return Err(CodecError::Capacity { needed, available });
            };
            *sample = (*sample & !LOW_BITS) | ((byte >> shift) & LOW_BITS);
        }
    }
    Ok(())
}

/// Reads back the length-prefixed payload written by [`embed`].
pub(crate) fn extract(pixels: &PixelBuffer) -> Result<Vec<u8>, CodecError> {
    let available = pixels.capacity().saturating_sub(LENGTH_PREFIX);
    let mut samples = pixels
        .as_bytes()
        .chunks_exact(4)
        .flat_map(|px| px[..3].iter().copied());

    let mut read_byte = || -> Option<u8> {
        let mut value = 0u8;
        for _ in 0..4 {
            value = (value << 2) | (samples.next()? & LOW_BITS);
        }
        Some(value)
    };

    let mut prefix = [0u8; LENGTH_PREFIX];
    for b in prefix.iter_mut() {
        *b = read_byte().ok_or(CodecError::Length {
            declared: LENGTH_PREFIX,
            available,
        })?;
    }
    let declared = u32::from_be_bytes(prefix) as usize;
    if declared > available {
        return Err(CodecError::Length {
            declared,
            available,
        });
    }

    (0..declared)
        .map(|_| read_byte())
        .collect::<Option<Vec<u8>>>()
        .ok_or(CodecError::Length {
            declared,
            available,
        })
}
