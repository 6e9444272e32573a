//! Compression Module
//!
//! Threshold-gated gzip compression with magic-number sniffing on the read side.
//! Stored payloads carry no format flag, so values written uncompressed stay readable.

use std::io::{Read, Write};

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::{BackendError, Result};

// == Constants ==
/// Payloads at or above this size are gzip-compressed before storage.
/// The engine rejects values above 10 MB.
pub const COMPRESS_THRESHOLD: usize = 6 * 1024 * 1024;

/// Smallest possible gzip member header.
pub const GZIP_HEADER_LENGTH: usize = 10;

/// Leading bytes of every gzip stream.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

// == Compress ==
/// Gzip-compresses `data` if it is at least [`COMPRESS_THRESHOLD`] bytes long.
///
/// Smaller inputs are returned unchanged.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < COMPRESS_THRESHOLD {
        return Ok(data.to_vec());
    }

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| BackendError::Encode(format!("gzip write: {e}")))?;

    encoder
        .finish()
        .map_err(|e| BackendError::Encode(format!("gzip finish: {e}")))
}

// == Decompress ==
/// Decompresses `data` if it starts with the gzip magic number.
///
/// Anything shorter than a gzip header, or not starting with the magic number,
/// was stored as-is and is returned unchanged.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if !is_gzip(data) {
        return Ok(data.to_vec());
    }

    let mut decoder = MultiGzDecoder::new(data);
    let mut out = Vec::with_capacity(data.len() * 2);
    decoder
        .read_to_end(&mut out)
        .map_err(|e| BackendError::decode(format!("corrupt gzip stream: {e}"), data))?;

    Ok(out)
}

/// Returns true if `data` looks like a gzip stream.
pub fn is_gzip(data: &[u8]) -> bool {
    data.len() >= GZIP_HEADER_LENGTH && data[..2] == GZIP_MAGIC
}
