//! LZMA ("LZMA alone" container) compression of record bytes.

use std::io::{Read, Write};

use xz2::read::XzDecoder;
use xz2::stream::{LzmaOptions, Stream};
use xz2::write::XzEncoder;

use crate::CodecError;

/// Maximum compression preset.
const PRESET: u32 = 9;

/// Records are a few hundred bytes; a 1 MiB window compresses them exactly
/// like the preset's 64 MiB one with a fraction of the memory.
const DICT_SIZE: u32 = 1 << 20;

/// Decoder memory limit; covers the dictionary of any preset.
const DECODER_MEMLIMIT: u64 = 256 << 20;

/// Upper bound on decompressed output.
const MAX_DECOMPRESSED: u64 = 16 << 20;

/// Compresses `data` at preset 9.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut options = LzmaOptions::new_preset(PRESET)?;
    options.dict_size(DICT_SIZE);
    let stream = Stream::new_lzma_encoder(&options)?;

    let mut encoder = XzEncoder::new_stream(Vec::new(), stream);
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Decompresses an LZMA-alone stream.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, CodecError> {
    let stream = Stream::new_lzma_decoder(DECODER_MEMLIMIT)?;
    let mut decoder = XzDecoder::new_stream(data, stream).take(MAX_DECOMPRESSED);

    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}
