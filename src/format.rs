// SPDX-License-Identifier: MIT
//! Bundle on-disk format
//!
//! Defines the fixed-size structures of the hash-indexed bundle image and the
//! helpers shared by the writer and the reader.

/// Bundle magic bytes
pub const BUNDLE_MAGIC: &[u8; 8] = b"GVariant";

/// Bundle format version
pub const BUNDLE_VERSION: u32 = 0;

/// Header size in bytes
pub const BUNDLE_HEADER_SIZE: usize = 24;

/// Size of one hash item in the table
pub const HASH_ITEM_SIZE: usize = 24;

/// Size of the hash table preamble (bloom header + bucket count)
pub const HASH_TABLE_HEADER_SIZE: usize = 8;

/// Parent index used by items at the root of the key hierarchy
pub const NO_PARENT: u32 = u32::MAX;

/// Bloom shift written by the builder (no bloom words are emitted)
pub const DEFAULT_BLOOM_SHIFT: u32 = 5;

/// Type tag of a serialized resource value
pub const RESOURCE_TYPE_STRING: &str = "(uuay)";

/// Resource flags
pub mod flags {
    /// Stored as-is
    pub const NONE: u32 = 0x00000000;

    /// Stored as a zlib stream
    pub const COMPRESSED: u32 = 0x00000001;
}

/// Hash the full key of an item.
///
/// Bytes are sign-extended before being added, which only matters for
/// non-ASCII keys.
#[inline]
pub fn key_hash(key: &str) -> u32 {
    key.bytes().fold(5381u32, |hash, byte| {
        hash.wrapping_mul(33).wrapping_add(byte as i8 as i32 as u32)
    })
}

/// Round `offset` up to the next multiple of `alignment` (a power of two).
#[inline]
pub fn align_up(offset: usize, alignment: usize) -> usize {
    debug_assert!(alignment.is_power_of_two());
    (offset + alignment - 1) & !(alignment - 1)
}

#[inline]
pub(crate) fn read_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    let end = offset.checked_add(4)?;
    let raw = bytes.get(offset..end)?;
    Some(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

#[inline]
pub(crate) fn read_u16(bytes: &[u8], offset: usize) -> Option<u16> {
    let end = offset.checked_add(2)?;
    let raw = bytes.get(offset..end)?;
    Some(u16::from_le_bytes([raw[0], raw[1]]))
}

/// Byte range inside the bundle image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pointer {
    pub start: u32,
    pub end: u32,
}

impl Pointer {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    /// Number of bytes covered, zero for inverted ranges
    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve the pointer against the image, `None` when out of bounds.
    #[inline]
    pub fn slice<'a>(&self, data: &'a [u8]) -> Option<&'a [u8]> {
        if self.start > self.end {
            return None;
        }
        data.get(self.start as usize..self.end as usize)
    }

    pub(crate) fn read(bytes: &[u8], offset: usize) -> Option<Self> {
        Some(Self {
            start: read_u32(bytes, offset)?,
            end: read_u32(bytes, offset + 4)?,
        })
    }

    #[inline]
    pub(crate) fn write_to_buffer(&self, buffer: &mut [u8]) {
        buffer[0..4].copy_from_slice(&self.start.to_le_bytes());
        buffer[4..8].copy_from_slice(&self.end.to_le_bytes());
    }
}

/// Bundle file header (24 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleHeader {
    /// Magic bytes: "GVariant"
    pub magic: [u8; 8],

    /// Format version (currently 0)
    pub version: u32,

    /// Reserved option bits
    pub options: u32,

    /// Location of the root hash table
    pub root: Pointer,
}

impl BundleHeader {
    /// Create a header pointing at the given root table
    pub fn new(root: Pointer) -> Self {
        Self {
            magic: *BUNDLE_MAGIC,
            version: BUNDLE_VERSION,
            options: 0,
            root,
        }
    }

    /// Parse the header from the start of an image
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, String> {
        if bytes.len() < BUNDLE_HEADER_SIZE {
            return Err(format!(
                "Header must be {} bytes, got {}",
                BUNDLE_HEADER_SIZE,
                bytes.len()
            ));
        }

        let mut magic = [0u8; 8];
        magic.copy_from_slice(&bytes[0..8]);
        let version = read_u32(bytes, 8).unwrap_or_default();
        let options = read_u32(bytes, 12).unwrap_or_default();
        let root = Pointer::read(bytes, 16).unwrap_or_default();

        Ok(Self {
            magic,
            version,
            options,
            root,
        })
    }

    /// Validate magic and version
    pub fn validate(&self) -> Result<(), String> {
        if self.magic != *BUNDLE_MAGIC {
            return Err(format!(
                "Invalid magic bytes: expected {:?}, got {:?}",
                BUNDLE_MAGIC, self.magic
            ));
        }

        if self.version != BUNDLE_VERSION {
            return Err(format!(
                "Unsupported version: expected {}, got {}",
                BUNDLE_VERSION, self.version
            ));
        }

        Ok(())
    }

    /// Write the header into the first 24 bytes of `buffer`
    pub fn write_to_buffer(&self, buffer: &mut [u8]) {
        buffer[0..8].copy_from_slice(&self.magic);
        buffer[8..12].copy_from_slice(&self.version.to_le_bytes());
        buffer[12..16].copy_from_slice(&self.options.to_le_bytes());
        self.root.write_to_buffer(&mut buffer[16..24]);
    }

    pub fn to_bytes(&self) -> [u8; BUNDLE_HEADER_SIZE] {
        let mut bytes = [0u8; BUNDLE_HEADER_SIZE];
        self.write_to_buffer(&mut bytes);
        bytes
    }
}

/// What a hash item's value pointer refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    /// Serialized resource value
    Value,

    /// Nested hash table
    HashTable,

    /// List of child item indices (a directory)
    Children,
}

impl ItemType {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'v' => Some(ItemType::Value),
            b'H' => Some(ItemType::HashTable),
            b'L' => Some(ItemType::Children),
            _ => None,
        }
    }

    pub fn tag(&self) -> u8 {
        match self {
            ItemType::Value => b'v',
            ItemType::HashTable => b'H',
            ItemType::Children => b'L',
        }
    }

    /// Alignment of the value payload in the image
    pub fn alignment(&self) -> usize {
        match self {
            ItemType::Value => 8,
            ItemType::HashTable | ItemType::Children => 4,
        }
    }
}

/// One 24-byte entry of a hash table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashItem {
    pub hash_value: u32,
    pub parent: u32,
    pub key_start: u32,
    pub key_size: u16,
    pub item_type: u8,
    pub value: Pointer,
}

impl HashItem {
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < HASH_ITEM_SIZE {
            return None;
        }
        Some(Self {
            hash_value: read_u32(bytes, 0)?,
            parent: read_u32(bytes, 4)?,
            key_start: read_u32(bytes, 8)?,
            key_size: read_u16(bytes, 12)?,
            item_type: bytes[14],
            value: Pointer::read(bytes, 16)?,
        })
    }

    pub fn write_to_buffer(&self, buffer: &mut [u8]) {
        buffer[0..4].copy_from_slice(&self.hash_value.to_le_bytes());
        buffer[4..8].copy_from_slice(&self.parent.to_le_bytes());
        buffer[8..12].copy_from_slice(&self.key_start.to_le_bytes());
        buffer[12..14].copy_from_slice(&self.key_size.to_le_bytes());
        buffer[14] = self.item_type;
        buffer[15] = 0;
        self.value.write_to_buffer(&mut buffer[16..24]);
    }

    pub fn parent_index(&self) -> Option<u32> {
        (self.parent != NO_PARENT).then_some(self.parent)
    }

    pub fn kind(&self) -> Option<ItemType> {
        ItemType::from_tag(self.item_type)
    }

    pub fn key_pointer(&self) -> Pointer {
        Pointer {
            start: self.key_start,
            end: self.key_start.saturating_add(self.key_size as u32),
        }
    }
}

/// Split a bloom header word into `(bloom_shift, n_bloom_words)`
#[inline]
pub fn split_bloom_header(header: u32) -> (u32, u32) {
    (header >> 27, header & ((1 << 27) - 1))
}

#[inline]
pub fn bloom_header(bloom_shift: u32, n_bloom_words: u32) -> u32 {
    (bloom_shift << 27) | n_bloom_words
}
