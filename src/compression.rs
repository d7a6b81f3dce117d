// SPDX-License-Identifier: MIT
//! zlib compression for resource payloads
//!
//! Compressed entries store a complete zlib stream; the uncompressed length
//! lives in the resource value so readers can size their buffers up front.

use std::io::Read;
#[cfg(feature = "compression")]
use std::io::Cursor;

use bytes::Bytes;

/// Highest zlib level, used unless configured otherwise
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 9;

/// zlib compressor with a fixed level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compressor {
    level: u32,
}

impl Compressor {
    /// Create a compressor; levels above 9 are clamped.
    pub fn new(level: u32) -> Self {
        Self {
            level: level.min(9),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Compress `data` into a zlib stream
    #[cfg(feature = "compression")]
    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>, String> {
        use flate2::write::ZlibEncoder;
        use flate2::Compression;
        use std::io::Write;

        let estimated_size = data.len().saturating_mul(6) / 10;
        let mut encoder = ZlibEncoder::new(
            Vec::with_capacity(estimated_size.max(64)),
            Compression::new(self.level),
        );

        encoder
            .write_all(data)
            .map_err(|e| format!("Write failed: {}", e))?;

        encoder.finish().map_err(|e| format!("Finish failed: {}", e))
    }

    #[cfg(not(feature = "compression"))]
    pub fn compress(&self, _data: &[u8]) -> Result<Vec<u8>, String> {
        Err("built without the `compression` feature".to_string())
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new(DEFAULT_COMPRESSION_LEVEL)
    }
}

/// Inflate a zlib stream whose uncompressed size is known
#[cfg(feature = "compression")]
pub fn decompress(data: &[u8], expected_size: usize) -> Result<Vec<u8>, String> {
    use flate2::read::ZlibDecoder;

    // The declared size comes from the bundle and may be corrupt
    let mut decompressed = Vec::with_capacity(expected_size.min(data.len().saturating_mul(8)));
    ZlibDecoder::new(data)
        .take(expected_size as u64 + 1)
        .read_to_end(&mut decompressed)
        .map_err(|e| e.to_string())?;

    if decompressed.len() != expected_size {
        return Err(format!(
            "Decompressed {} bytes, expected {}",
            decompressed.len(),
            expected_size
        ));
    }

    Ok(decompressed)
}

#[cfg(not(feature = "compression"))]
pub fn decompress(_data: &[u8], _expected_size: usize) -> Result<Vec<u8>, String> {
    Err("built without the `compression` feature".to_string())
}

/// Streaming view over a zlib stream held in shared bytes
#[cfg(feature = "compression")]
pub fn decoder(data: Bytes) -> Result<Box<dyn Read + Send>, String> {
    Ok(Box::new(flate2::read::ZlibDecoder::new(Cursor::new(data))))
}

#[cfg(not(feature = "compression"))]
pub fn decoder(_data: Bytes) -> Result<Box<dyn Read + Send>, String> {
    Err("built without the `compression` feature".to_string())
}

#[cfg(all(test, feature = "compression"))]
mod tests {
    use super::*;

    #[test]
    fn test_compress_decompress() {
        let data = b"this is a test resource\n".repeat(32);
        let compressed = Compressor::default().compress(&data).unwrap();
        assert!(compressed.len() < data.len());
        // zlib header
        assert_eq!(compressed[0], 0x78);

        let restored = decompress(&compressed, data.len()).unwrap();
        assert_eq!(restored, data);
    }

    #[test]
    fn test_decompress_size_mismatch() {
        let compressed = Compressor::default().compress(b"abcdef").unwrap();
        assert!(decompress(&compressed, 3).is_err());
    }

    #[test]
    fn test_decompress_garbage() {
        assert!(decompress(b"not zlib at all", 10).is_err());
    }

    #[test]
    fn test_streaming_decoder() {
        let compressed = Compressor::new(1).compress(b"streamed").unwrap();
        let mut out = String::new();
        decoder(Bytes::from(compressed))
            .unwrap()
            .read_to_string(&mut out)
            .unwrap();
        assert_eq!(out, "streamed");
    }

    #[test]
    fn test_level_clamped() {
        assert_eq!(Compressor::new(42).level(), 9);
    }
}
