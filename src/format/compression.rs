//! Gzip compression/decompression for the store file.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::types::VmemResult;

/// Gzip-compress a serialized store.
pub fn compress(bytes: &[u8]) -> VmemResult<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}

/// Decompress a gzip-compressed store file back to serialized bytes.
pub fn decompress(bytes: &[u8]) -> VmemResult<Vec<u8>> {
    let mut decoder = GzDecoder::new(bytes);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compress_roundtrip() {
        let payload = b"view state payload".repeat(64);
        let compressed = compress(&payload).unwrap();
        assert!(compressed.len() < payload.len());
        assert_eq!(decompress(&compressed).unwrap(), payload);
    }

    #[test]
    fn garbage_fails_to_decompress() {
        assert!(decompress(b"not a gzip stream").is_err());
    }
}
