//! Record ⇄ pixels ⇄ PNG composition.

use tracing::debug;

use crate::compress::{compress, decompress};
use crate::container::{decode_png, encode_png};
use crate::stego::{embed, extract, flatten_opaque};
use crate::{CodecError, GameRecord, PixelBuffer};

/// Embeds `record` into the rendered board.
///
/// The returned buffer is fully opaque (transparent pixels turned white)
/// and carries the compressed record in its colour low bits.
pub fn encode(mut pixels: PixelBuffer, record: &GameRecord) -> Result<PixelBuffer, CodecError> {
    let json = record.to_bytes()?;
    let payload = compress(&json)?;
    flatten_opaque(&mut pixels);
    embed(&mut pixels, &payload)?;
    debug!(
        json_bytes = json.len(),
        payload_bytes = payload.len(),
        "record embedded"
    );
    Ok(pixels)
}

/// Extracts a record, reporting why extraction failed.
pub fn try_decode(pixels: &PixelBuffer) -> Result<GameRecord, CodecError> {
    let payload = extract(pixels)?;
    let json = decompress(&payload)?;
    Ok(GameRecord::from_bytes(&json)?)
}

/// Extracts a record; `None` means the image is not one of ours or was
/// damaged in transit.
pub fn decode(pixels: &PixelBuffer) -> Option<GameRecord> {
    match try_decode(pixels) {
        Ok(record) => Some(record),
        Err(e) => {
            debug!(error = %e, "image carries no game record");
            None
        }
    }
}

/// [`encode`] followed by PNG encoding.
pub fn encode_image(pixels: PixelBuffer, record: &GameRecord) -> Result<Vec<u8>, CodecError> {
    encode_png(&encode(pixels, record)?)
}

/// PNG decoding followed by [`decode`].
pub fn decode_image(bytes: &[u8]) -> Option<GameRecord> {
    match decode_png(bytes) {
        Ok(pixels) => decode(&pixels),
        Err(e) => {
            debug!(error = %e, "attachment is not a readable PNG");
            None
        }
    }
}
