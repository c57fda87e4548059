//! Synthetic DBPF packages for tests.
//!
//! Layout produced by [`PackageBuilder::build`]: the 96-byte header, the
//! index table right after it, then the resource blobs in order.

use crate::validate::dbpf::{MAGIC, RESERVED_HEADER_SIZE};

#[derive(Debug, Clone)]
pub(crate) struct PackageBuilder {
    version: (u32, u32),
    header_flags: u32,
    index_minor_version: u32,
    index_flags: u32,
    compression: Option<u16>,
    resources: Vec<Vec<u8>>,
    entry_count: Option<u32>,
    index_size: Option<u32>,
    index_offset: Option<u64>,
    short_offset: bool,
    positions: Vec<(usize, u32)>,
    entry_compressions: Vec<(usize, u16)>,
}

impl PackageBuilder {
    pub(crate) fn new() -> Self {
        Self {
            version: (2, 1),
            header_flags: 0,
            index_minor_version: 3,
            index_flags: 0,
            compression: Some(0),
            resources: Vec::new(),
            entry_count: None,
            index_size: None,
            index_offset: None,
            short_offset: false,
            positions: Vec::new(),
            entry_compressions: Vec::new(),
        }
    }

    pub(crate) fn version(mut self, major: u32, minor: u32) -> Self {
        self.version = (major, minor);
        self
    }

    pub(crate) fn header_flags(mut self, flags: u32) -> Self {
        self.header_flags = flags;
        self
    }

    pub(crate) fn index_minor_version(mut self, version: u32) -> Self {
        self.index_minor_version = version;
        self
    }

    /// Bits 0..=2 mark type, group and instance-high as shared
    pub(crate) fn index_flags(mut self, flags: u32) -> Self {
        self.index_flags = flags;
        self
    }

    /// `None` writes entries without the extended compression tail
    pub(crate) fn compression(mut self, compression: Option<u16>) -> Self {
        self.compression = compression;
        self
    }

    pub(crate) fn resource(mut self, data: Vec<u8>) -> Self {
        self.resources.push(data);
        self
    }

    pub(crate) fn entry_count(mut self, count: u32) -> Self {
        self.entry_count = Some(count);
        self
    }

    pub(crate) fn index_size(mut self, size: u32) -> Self {
        self.index_size = Some(size);
        self
    }

    pub(crate) fn index_offset(mut self, offset: u64) -> Self {
        self.index_offset = Some(offset);
        self
    }

    /// Store the index offset in the legacy 32-bit field only
    pub(crate) fn short_offset(mut self) -> Self {
        self.short_offset = true;
        self
    }

    pub(crate) fn position_override(mut self, entry: usize, position: u32) -> Self {
        self.positions.push((entry, position));
        self
    }

    /// Forces an extended tail with `raw` compression on one entry
    pub(crate) fn entry_compression(mut self, entry: usize, raw: u16) -> Self {
        self.entry_compressions.push((entry, raw));
        self
    }

    fn shared_words(&self) -> Vec<u32> {
        [
            (0x1, 0x0333_406C),
            (0x2, 0x0000_0000),
            (0x4, 0x0000_0001),
        ]
        .iter()
        .filter(|(bit, _)| self.index_flags & bit != 0)
        .map(|&(_, word)| word)
        .collect()
    }

    fn entry_compression_for(&self, entry: usize) -> Option<u16> {
        self.entry_compressions
            .iter()
            .rev()
            .find(|(i, _)| *i == entry)
            .map(|&(_, raw)| raw)
            .or(self.compression)
    }

    fn index_len(&self) -> usize {
        let shared = self.shared_words().len();
        let base = 16 + 4 * (3 - shared);
        let entries: usize = (0..self.resources.len())
            .map(|i| base + if self.entry_compression_for(i).is_some() { 4 } else { 0 })
            .sum();
        4 + 4 * shared + entries
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let index_start = RESERVED_HEADER_SIZE as usize;
        let index_len = self.index_len();
        let data_start = index_start + index_len;

        let mut out = vec![0u8; index_start];
        let index_offset = self.index_offset.unwrap_or(index_start as u64);
        let put = |out: &mut Vec<u8>, at: usize, bytes: &[u8]| {
            out[at..at + bytes.len()].copy_from_slice(bytes);
        };

        put(&mut out, 0x00, &MAGIC);
        put(&mut out, 0x04, &self.version.0.to_le_bytes());
        put(&mut out, 0x08, &self.version.1.to_le_bytes());
        put(&mut out, 0x14, &self.header_flags.to_le_bytes());
        let count = self.entry_count.unwrap_or(self.resources.len() as u32);
        put(&mut out, 0x24, &count.to_le_bytes());
        let size = self.index_size.unwrap_or(index_len as u32);
        put(&mut out, 0x2C, &size.to_le_bytes());
        put(&mut out, 0x3C, &self.index_minor_version.to_le_bytes());
        if self.short_offset {
            put(&mut out, 0x28, &(index_offset as u32).to_le_bytes());
        } else {
            put(&mut out, 0x40, &index_offset.to_le_bytes());
        }

        let shared = self.shared_words();
        out.extend_from_slice(&self.index_flags.to_le_bytes());
        for word in &shared {
            out.extend_from_slice(&word.to_le_bytes());
        }

        let mut position = data_start as u32;
        for (i, resource) in self.resources.iter().enumerate() {
            let len = resource.len() as u32;
            let compression = self.entry_compression_for(i);
            let entry_position = self
                .positions
                .iter()
                .rev()
                .find(|(entry, _)| *entry == i)
                .map(|&(_, p)| p)
                .unwrap_or(position);

            let key = [0x0333_406Cu32, 0x0000_0000, 0x0000_0001];
            for (bit, word) in [0x1u32, 0x2, 0x4].iter().zip(key) {
                if self.index_flags & bit == 0 {
                    out.extend_from_slice(&word.to_le_bytes());
                }
            }
            out.extend_from_slice(&(i as u32).to_le_bytes());
            out.extend_from_slice(&entry_position.to_le_bytes());
            let raw_size = if compression.is_some() {
                len | 0x8000_0000
            } else {
                len
            };
            out.extend_from_slice(&raw_size.to_le_bytes());
            out.extend_from_slice(&len.to_le_bytes());
            if let Some(raw) = compression {
                out.extend_from_slice(&raw.to_le_bytes());
                out.extend_from_slice(&1u16.to_le_bytes());
            }

            position += len;
        }
        debug_assert_eq!(out.len(), data_start);

        for resource in &self.resources {
            out.extend_from_slice(resource);
        }
        out
    }
}

/// Deterministic pseudo-random bytes (64-bit LCG)
pub(crate) fn noise(seed: u64, len: usize) -> Vec<u8> {
    let mut state = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            (state >> 33) as u8
        })
        .collect()
}
