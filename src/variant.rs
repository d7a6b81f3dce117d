// SPDX-License-Identifier: MIT
//! Serialized resource values
//!
//! Every file entry stores a self-describing variant holding the tuple
//! `(size, flags, bytes)`:
//!
//! ```text
//! u32 size | u32 flags | content | 0x00 | "(uuay)"
//! ```
//!
//! `size` is always the uncompressed length. Uncompressed content carries a
//! trailing nul byte that is not counted in `size`.

use crate::format::{flags, RESOURCE_TYPE_STRING};

/// Fixed part of the tuple: size + flags
const TUPLE_HEADER_SIZE: usize = 8;

/// Borrowed view of a decoded resource value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceValue<'a> {
    /// Uncompressed size in bytes
    pub size: u32,

    /// Resource flags (see [`crate::format::flags`])
    pub flags: u32,

    /// Stored bytes, exactly as written
    pub content: &'a [u8],
}

impl<'a> ResourceValue<'a> {
    #[inline]
    pub fn is_compressed(&self) -> bool {
        self.flags & flags::COMPRESSED != 0
    }

    /// Stored bytes without the trailing nul of uncompressed content
    ///
    /// Compressed content is returned unchanged.
    pub fn payload(&self) -> Result<&'a [u8], String> {
        if self.is_compressed() {
            return Ok(self.content);
        }

        let size = self.size as usize;
        self.content.get(..size).ok_or_else(|| {
            format!(
                "Resource content is {} bytes but declares {}",
                self.content.len(),
                size
            )
        })
    }

    /// Decode a serialized value
    pub fn decode(bytes: &'a [u8]) -> Result<Self, String> {
        let separator = bytes
            .iter()
            .rposition(|&b| b == 0)
            .ok_or_else(|| "Variant has no type separator".to_string())?;

        let type_string = &bytes[separator + 1..];
        if type_string != RESOURCE_TYPE_STRING.as_bytes() {
            return Err(format!(
                "Unexpected value type: {}",
                String::from_utf8_lossy(type_string)
            ));
        }

        let tuple = &bytes[..separator];
        if tuple.len() < TUPLE_HEADER_SIZE {
            return Err(format!("Resource value too short: {} bytes", tuple.len()));
        }

        let size = u32::from_le_bytes([tuple[0], tuple[1], tuple[2], tuple[3]]);
        let flags = u32::from_le_bytes([tuple[4], tuple[5], tuple[6], tuple[7]]);

        Ok(Self {
            size,
            flags,
            content: &tuple[TUPLE_HEADER_SIZE..],
        })
    }

    /// Serialize into `buffer`
    pub fn encode_into(&self, buffer: &mut Vec<u8>) {
        buffer.reserve(encoded_len(self.content.len()));
        buffer.extend_from_slice(&self.size.to_le_bytes());
        buffer.extend_from_slice(&self.flags.to_le_bytes());
        buffer.extend_from_slice(self.content);
        buffer.push(0);
        buffer.extend_from_slice(RESOURCE_TYPE_STRING.as_bytes());
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(encoded_len(self.content.len()));
        self.encode_into(&mut buffer);
        buffer
    }
}

/// Serialized length of a value whose stored content is `content_len` bytes
#[inline]
pub fn encoded_len(content_len: usize) -> usize {
    TUPLE_HEADER_SIZE + content_len + 1 + RESOURCE_TYPE_STRING.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_uncompressed_layout() {
        let value = ResourceValue {
            size: 3,
            flags: flags::NONE,
            content: b"abc\0",
        };
        let bytes = value.encode();
        assert_eq!(
            bytes,
            [3, 0, 0, 0, 0, 0, 0, 0, b'a', b'b', b'c', 0, 0, b'(', b'u', b'u', b'a', b'y', b')']
        );
        assert_eq!(bytes.len(), encoded_len(4));
    }

    #[test]
    fn test_decode_strips_trailing_nul() {
        let encoded = ResourceValue {
            size: 24,
            flags: flags::NONE,
            content: b"this is a test resource\n\0",
        }
        .encode();

        let value = ResourceValue::decode(&encoded).unwrap();
        assert!(!value.is_compressed());
        assert_eq!(value.payload().unwrap(), b"this is a test resource\n");
    }

    #[test]
    fn test_decode_compressed_keeps_content() {
        let encoded = ResourceValue {
            size: 100,
            flags: flags::COMPRESSED,
            content: &[0x78, 0x9c, 0x01],
        }
        .encode();

        let value = ResourceValue::decode(&encoded).unwrap();
        assert!(value.is_compressed());
        assert_eq!(value.size, 100);
        assert_eq!(value.payload().unwrap(), &[0x78, 0x9c, 0x01]);
    }

    #[test]
    fn test_decode_rejects_wrong_type() {
        let mut encoded = ResourceValue {
            size: 0,
            flags: 0,
            content: b"\0",
        }
        .encode();
        let last = encoded.len() - 2;
        encoded[last] = b's';
        assert!(ResourceValue::decode(&encoded).is_err());
    }

    #[test]
    fn test_decode_rejects_short_tuple() {
        assert!(ResourceValue::decode(b"\x01\x02\0(uuay)").is_err());
        assert!(ResourceValue::decode(b"no separator").is_err());
    }

    #[test]
    fn test_payload_rejects_oversized_length() {
        let value = ResourceValue {
            size: 10,
            flags: flags::NONE,
            content: b"abc\0",
        };
        assert!(value.payload().is_err());
    }
}
