//! Codec Module
//!
//! Converts structured values to and from the payloads stored in the engine.

mod compress;
mod json;


// Re-export public types
pub use compress::{
    compress, decompress, is_gzip, COMPRESS_THRESHOLD, GZIP_HEADER_LENGTH, GZIP_MAGIC,
};
pub use json::{Codec, JsonCodec};
