// SPDX-License-Identifier: MIT
//! Parsed bundle image with zero-copy access to its hash table

use bytes::Bytes;

use crate::format::{
    key_hash, read_u32, split_bloom_header, BundleHeader, HashItem, ItemType, Pointer,
    BUNDLE_HEADER_SIZE, HASH_ITEM_SIZE, HASH_TABLE_HEADER_SIZE,
};

/// Absolute offsets of the root hash table regions
#[derive(Debug, Clone, Copy, Default)]
struct HashTable {
    bloom_shift: u32,
    bloom_start: usize,
    n_bloom_words: usize,
    buckets_start: usize,
    n_buckets: usize,
    items_start: usize,
    n_items: usize,
}

impl HashTable {
    fn parse(data: &[u8], root: Pointer) -> Result<Self, String> {
        let table = root
            .slice(data)
            .ok_or_else(|| format!("Root table {:?} is outside the bundle", root))?;
        if table.len() < HASH_TABLE_HEADER_SIZE {
            return Err(format!("Root table too small: {} bytes", table.len()));
        }

        let (bloom_shift, n_bloom_words) = split_bloom_header(read_u32(table, 0).unwrap_or(0));
        let n_buckets = read_u32(table, 4).unwrap_or(0) as usize;

        let bloom_start = root.start as usize + HASH_TABLE_HEADER_SIZE;
        let buckets_start = (n_bloom_words as usize)
            .checked_mul(4)
            .and_then(|len| bloom_start.checked_add(len))
            .ok_or_else(|| "Bloom filter size overflow".to_string())?;
        let items_start = n_buckets
            .checked_mul(4)
            .and_then(|len| buckets_start.checked_add(len))
            .ok_or_else(|| "Bucket array size overflow".to_string())?;

        let table_end = root.end as usize;
        if items_start > table_end {
            return Err(format!(
                "Hash table declares {} bloom words and {} buckets, which exceed its {} bytes",
                n_bloom_words,
                n_buckets,
                table.len()
            ));
        }

        Ok(Self {
            bloom_shift,
            bloom_start,
            n_bloom_words: n_bloom_words as usize,
            buckets_start,
            n_buckets,
            items_start,
            n_items: (table_end - items_start) / HASH_ITEM_SIZE,
        })
    }
}

/// A validated bundle image
///
/// The image is held as [`Bytes`] so static data embedded in a binary is
/// never copied and resource payloads can be handed out as cheap slices.
#[derive(Debug, Clone)]
pub struct ResourceBundle {
    data: Bytes,
    header: BundleHeader,
    table: HashTable,
}

impl ResourceBundle {
    /// Validate `data` and index its root table
    pub fn from_bytes(data: Bytes) -> Result<Self, String> {
        if data.len() < BUNDLE_HEADER_SIZE {
            return Err("Bundle too small".to_string());
        }

        let header = BundleHeader::from_bytes(&data[..BUNDLE_HEADER_SIZE])?;
        header.validate()?;
        let table = HashTable::parse(&data, header.root)?;

        Ok(Self {
            data,
            header,
            table,
        })
    }

    /// Create from owned data
    pub fn from_vec(data: Vec<u8>) -> Result<Self, String> {
        Self::from_bytes(Bytes::from(data))
    }

    /// Create from data embedded in the binary (zero-copy)
    pub fn from_static(data: &'static [u8]) -> Result<Self, String> {
        Self::from_bytes(Bytes::from_static(data))
    }

    pub fn header(&self) -> &BundleHeader {
        &self.header
    }

    /// The whole image
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Total size of the image in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn item_count(&self) -> usize {
        self.table.n_items
    }

    /// Size of the root hash table in bytes
    pub fn table_size(&self) -> usize {
        self.header.root.len()
    }

    /// Read the item at `index`
    pub fn item(&self, index: u32) -> Option<HashItem> {
        let index = index as usize;
        if index >= self.table.n_items {
            return None;
        }
        let start = self.table.items_start + index * HASH_ITEM_SIZE;
        HashItem::from_bytes(self.data.get(start..start + HASH_ITEM_SIZE)?)
    }

    /// All items with their indices, in table order
    pub fn items(&self) -> impl Iterator<Item = (u32, HashItem)> + '_ {
        (0..self.table.n_items as u32).filter_map(move |index| Some((index, self.item(index)?)))
    }

    /// Key bytes stored for `item`, relative to its parent
    pub fn key_segment(&self, item: &HashItem) -> Option<&[u8]> {
        item.key_pointer().slice(&self.data)
    }

    /// Full key of the item at `index`, rebuilt through its parents
    pub fn item_key(&self, index: u32) -> Option<String> {
        let mut segments = Vec::new();
        let mut current = self.item(index)?;
        // A well-formed chain is never longer than the table
        for _ in 0..=self.table.n_items {
            segments.push(self.key_segment(&current)?);
            match current.parent_index() {
                None => {
                    let key: Vec<u8> = segments.iter().rev().flat_map(|s| s.iter().copied()).collect();
                    return String::from_utf8(key).ok();
                }
                Some(parent) => current = self.item(parent)?,
            }
        }
        None
    }

    /// Raw value bytes of `item`
    pub fn value(&self, item: &HashItem) -> Option<&[u8]> {
        item.value.slice(&self.data)
    }

    /// Child item indices of a directory item
    pub fn child_indices(&self, item: &HashItem) -> Option<Vec<u32>> {
        if item.kind() != Some(ItemType::Children) {
            return None;
        }
        let list = self.value(item)?;
        if list.len() % 4 != 0 {
            return None;
        }
        Some(
            list.chunks_exact(4)
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        )
    }

    /// Find the item whose full key is exactly `key`
    pub fn find(&self, key: &str) -> Option<(u32, HashItem)> {
        if self.table.n_buckets == 0 || self.table.n_items == 0 {
            return None;
        }

        let hash = key_hash(key);
        if !self.bloom_filter_contains(hash) {
            return None;
        }

        let bucket = hash as usize % self.table.n_buckets;
        let first = self.bucket_start(bucket)?;
        let last = if bucket + 1 == self.table.n_buckets {
            self.table.n_items
        } else {
            (self.bucket_start(bucket + 1)? as usize).min(self.table.n_items)
        };

        (first..last as u32).find_map(|index| {
            let item = self.item(index)?;
            (item.hash_value == hash && self.key_matches(&item, key.as_bytes()))
                .then_some((index, item))
        })
    }

    fn bucket_start(&self, bucket: usize) -> Option<u32> {
        read_u32(&self.data, self.table.buckets_start + 4 * bucket)
    }

    fn bloom_filter_contains(&self, hash: u32) -> bool {
        if self.table.n_bloom_words == 0 {
            return true;
        }

        let word = (hash / 32) as usize % self.table.n_bloom_words;
        let mut mask = 1u32 << (hash & 31);
        mask |= 1u32 << ((hash >> (self.table.bloom_shift & 31)) & 31);

        read_u32(&self.data, self.table.bloom_start + 4 * word)
            .map_or(false, |bits| bits & mask == mask)
    }

    /// Walk the parent chain consuming `key` from the end
    fn key_matches(&self, item: &HashItem, key: &[u8]) -> bool {
        let mut remaining = key;
        let mut current = *item;

        for _ in 0..=self.table.n_items {
            let Some(segment) = self.key_segment(&current) else {
                return false;
            };
            if !remaining.ends_with(segment) {
                return false;
            }
            remaining = &remaining[..remaining.len() - segment.len()];

            match current.parent_index() {
                None => return remaining.is_empty(),
                Some(parent) => match self.item(parent) {
                    Some(parent) => current = parent,
                    None => return false,
                },
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::BundleWriter;

    fn canonical_bundle() -> ResourceBundle {
        let mut writer = BundleWriter::new();
        writer
            .add_resource("/assets/resource1.txt", b"this is a test resource\n".to_vec())
            .unwrap();
        writer
            .add_resource("/assets/resource2.txt", b"this is test resource #2\n".to_vec())
            .unwrap();
        ResourceBundle::from_vec(writer.finalize().unwrap()).unwrap()
    }

    #[test]
    fn test_bundle_too_small() {
        assert!(ResourceBundle::from_vec(vec![0; 16]).is_err());
    }

    #[test]
    fn test_bundle_bad_magic() {
        let mut data = BundleWriter::new().finalize().unwrap();
        data[0] = b'X';
        assert!(ResourceBundle::from_vec(data).is_err());
    }

    #[test]
    fn test_root_pointer_out_of_bounds() {
        let mut data = BundleWriter::new().finalize().unwrap();
        data[20..24].copy_from_slice(&1000u32.to_le_bytes());
        assert!(ResourceBundle::from_vec(data).is_err());
    }

    #[test]
    fn test_bucket_count_exceeds_table() {
        let mut data = BundleWriter::new().finalize().unwrap();
        data[28..32].copy_from_slice(&50u32.to_le_bytes());
        assert!(ResourceBundle::from_vec(data).is_err());
    }

    #[test]
    fn test_find_items() {
        let bundle = canonical_bundle();
        assert_eq!(bundle.item_count(), 4);

        let (index, item) = bundle.find("/").unwrap();
        assert_eq!(index, 0);
        assert_eq!(item.kind(), Some(ItemType::Children));

        let (index, item) = bundle.find("/assets/").unwrap();
        assert_eq!(index, 2);
        assert_eq!(bundle.key_segment(&item).unwrap(), b"assets/");
        assert_eq!(bundle.child_indices(&item).unwrap(), vec![1, 3]);

        let (_, item) = bundle.find("/assets/resource2.txt").unwrap();
        assert_eq!(item.kind(), Some(ItemType::Value));
        assert_eq!(item.parent_index(), Some(2));

        assert!(bundle.find("/assets").is_none());
        assert!(bundle.find("/missing.txt").is_none());
    }

    #[test]
    fn test_item_key_rebuilds_full_path() {
        let bundle = canonical_bundle();
        let keys: Vec<String> = bundle
            .items()
            .filter_map(|(index, _)| bundle.item_key(index))
            .collect();
        assert_eq!(
            keys,
            vec![
                "/",
                "/assets/resource1.txt",
                "/assets/",
                "/assets/resource2.txt"
            ]
        );
    }

    #[test]
    fn test_from_static_is_zero_copy() {
        static EMPTY: [u8; 32] = [
            b'G', b'V', b'a', b'r', b'i', b'a', b'n', b't', 0, 0, 0, 0, 0, 0, 0, 0, 24, 0, 0, 0,
            32, 0, 0, 0, 0, 0, 0, 0x28, 0, 0, 0, 0,
        ];
        let bundle = ResourceBundle::from_static(&EMPTY).unwrap();
        assert_eq!(bundle.data().as_ptr(), EMPTY.as_ptr());
        assert_eq!(bundle.item_count(), 0);
        assert!(bundle.find("/").is_none());
    }

    #[test]
    fn test_parent_cycle_does_not_hang() {
        let mut data = canonical_bundle().data().to_vec();
        // Point the root item's parent at itself
        let root_item = 48;
        data[root_item + 4..root_item + 8].copy_from_slice(&0u32.to_le_bytes());
        let bundle = ResourceBundle::from_vec(data).unwrap();
        assert!(bundle.find("/").is_none());
        assert!(bundle.item_key(0).is_none());
    }
}
