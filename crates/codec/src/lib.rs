//! Game state persistence inside images.
//!
//! A [`GameRecord`] is serialized to JSON, LZMA-compressed, prefixed with a
//! 4-byte big-endian length and bit-packed into the two low bits of every
//! R, G and B sample of a rendered [`PixelBuffer`]. The result is shipped as
//! a PNG; [`decode_image`] reverses the whole chain.
//!
//! # Bit layout
//!
//! ```text
//! samples:  R0 G0 B0 (A0 skipped) R1 G1 B1 (A1 skipped) ...   row-major
//! stream:   [len: u32 BE][lzma payload: len bytes]
//! per byte: bits 7-6 → sample n, 5-4 → n+1, 3-2 → n+2, 1-0 → n+3
//! ```
//!
//! The layout is the compatibility contract with images already posted;
//! changing channel order, the alpha skip or the length prefix breaks it.

mod codec;
mod compress;
mod container;
mod pixels;
mod record;
mod stego;

pub use codec::{decode, decode_image, encode, encode_image, try_decode};
pub use compress::{compress, decompress};
pub use container::{decode_png, encode_png};
pub use pixels::PixelBuffer;
pub use record::GameRecord;

/// Width of every board image.
pub const IMAGE_WIDTH: u32 = 640;

/// Height of every board image.
pub const IMAGE_HEIGHT: u32 = 360;

/// Errors produced while encoding or decoding a game image.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("LZMA error: {0}")]
    Lzma(#[from] xz2::stream::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encode error: {0}")]
    PngEncode(#[from] png::EncodingError),

    #[error("PNG decode error: {0}")]
    PngDecode(#[from] png::DecodingError),

    #[error("payload needs {needed} bytes but the image holds {available}")]
    Capacity { needed: usize, available: usize },

    #[error("declared payload length {declared} exceeds image capacity {available}")]
    Length { declared: usize, available: usize },

    #[error("{len} bytes is not a {width}x{height} RGBA buffer")]
    Dimensions { width: u32, height: u32, len: usize },
}
