//! DBPF 2.x on-disk structures.
//!
//! ## Header layout (little-endian)
//!
//! | offset | field                                   |
//! |--------|-----------------------------------------|
//! | 0x00   | magic `DBPF`                            |
//! | 0x04   | major / minor format version            |
//! | 0x0C   | user version (unused)                   |
//! | 0x14   | flags, always 0                         |
//! | 0x18   | created / modified timestamps (unused)  |
//! | 0x20   | index major version (unused)            |
//! | 0x24   | index entry count                       |
//! | 0x28   | index offset, 32-bit (legacy)           |
//! | 0x2C   | index size in bytes                     |
//! | 0x30   | hole table (unused)                     |
//! | 0x3C   | index minor version, always 3           |
//! | 0x40   | index offset, 64-bit                    |
//! | 0x48   | reserved up to 0x60                     |
//!
//! ## Index table
//!
//! A flags word comes first. Bits 0, 1 and 2 say that the resource type,
//! group and high half of the instance are shared by every entry; each
//! shared value is stored once right after the flags. Every entry then
//! carries its remaining key words, the low instance word, the resource
//! position, the compressed size (bit 31 set marks an extended entry), the
//! uncompressed size and, for extended entries, a compression type and a
//! committed flag.

use crate::error::Result;
use crate::reader::ByteReader;
use crate::verdict::FailureReason;

/// File signature
pub const MAGIC: [u8; 4] = *b"DBPF";

/// Bytes needed to read every header field
pub const HEADER_SIZE: u64 = 0x48;

/// Full header including the reserved tail
pub const RESERVED_HEADER_SIZE: u64 = 0x60;

/// `(major, minor)` versions sharing the index layout above
pub const SUPPORTED_VERSIONS: &[(u32, u32)] = &[(2, 0), (2, 1)];

/// Expected value of the index minor version field
pub const INDEX_MINOR_VERSION: u32 = 3;

const FLAG_CONSTANT_TYPE: u32 = 0x1;
const FLAG_CONSTANT_GROUP: u32 = 0x2;
const FLAG_CONSTANT_INSTANCE: u32 = 0x4;

const EXTENDED_BIT: u32 = 0x8000_0000;

/// Entry size without optional key words and without the extended tail,
/// the smallest record any flags word allows
pub const BASE_RECORD_SIZE: u64 = 16;

/// Size of the flags word opening every index table
pub const INDEX_FLAGS_SIZE: u64 = 4;

/// Compression applied to a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum CompressionType {
    /// Stored as-is
    None = 0x0000,
    /// zlib stream
    Zlib = 0x5A42,
    /// Deleted record
    Deleted = 0xFFE0,
    /// Streamable compression
    Streamable = 0xFFFE,
    /// Internal compression
    Internal = 0xFFFF,
}

impl CompressionType {
    /// Decodes the raw field, `None` for unknown values
    pub fn from_raw(raw: u16) -> Option<Self> {
        match raw {
            0x0000 => Some(Self::None),
            0x5A42 => Some(Self::Zlib),
            0xFFE0 => Some(Self::Deleted),
            0xFFFE => Some(Self::Streamable),
            0xFFFF => Some(Self::Internal),
            _ => None,
        }
    }
}

/// The header fields the validator cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageHeader {
    /// Format major version
    pub major_version: u32,
    /// Format minor version
    pub minor_version: u32,
    /// Header flags at 0x14
    pub flags: u32,
    /// Number of index entries
    pub index_entry_count: u32,
    /// Index table size in bytes
    pub index_size: u32,
    /// Index minor version at 0x3C
    pub index_minor_version: u32,
    /// Effective index offset: the 64-bit field, or the legacy 32-bit one
    /// when the former is zero
    pub index_offset: u64,
}

impl PackageHeader {
    /// Parses the header, checking length and magic first.
    pub fn parse(reader: &ByteReader<'_>) -> std::result::Result<Self, FailureReason> {
        if (reader.len() as u64) < HEADER_SIZE {
            return Err(FailureReason::TooShortForHeader);
        }
        if reader.read_array::<4>(0)? != MAGIC {
            return Err(FailureReason::BadMagic);
        }

        let short_offset = reader.read_u32(0x28)?;
        let long_offset = reader.read_u64(0x40)?;

        Ok(Self {
            major_version: reader.read_u32(0x04)?,
            minor_version: reader.read_u32(0x08)?,
            flags: reader.read_u32(0x14)?,
            index_entry_count: reader.read_u32(0x24)?,
            index_size: reader.read_u32(0x2C)?,
            index_minor_version: reader.read_u32(0x3C)?,
            index_offset: if long_offset != 0 {
                long_offset
            } else {
                u64::from(short_offset)
            },
        })
    }

    /// Returns true if the version pair is one we understand
    pub fn is_supported_version(&self) -> bool {
        SUPPORTED_VERSIONS.contains(&(self.major_version, self.minor_version))
    }

    /// Returns true if the fixed-value fields hold their expected values
    pub fn has_expected_constants(&self) -> bool {
        self.flags == 0 && self.index_minor_version == INDEX_MINOR_VERSION
    }
}

/// Index flags word plus the shared key words it announces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexFlags {
    /// Shared resource type
    pub constant_type: Option<u32>,
    /// Shared resource group
    pub constant_group: Option<u32>,
    /// Shared high word of the instance id
    pub constant_instance_high: Option<u32>,
}

impl IndexFlags {
    /// Reads the flags and shared key words from the start of `index`
    pub fn parse(index: &ByteReader<'_>) -> Result<Self> {
        let raw = index.read_u32(0)?;
        let mut position = 4;
        let mut shared = |bit: u32| -> Result<Option<u32>> {
            if raw & bit == 0 {
                return Ok(None);
            }
            let value = index.read_u32(position)?;
            position += 4;
            Ok(Some(value))
        };

        Ok(Self {
            constant_type: shared(FLAG_CONSTANT_TYPE)?,
            constant_group: shared(FLAG_CONSTANT_GROUP)?,
            constant_instance_high: shared(FLAG_CONSTANT_INSTANCE)?,
        })
    }

    fn shared_count(&self) -> u64 {
        [
            self.constant_type,
            self.constant_group,
            self.constant_instance_high,
        ]
        .iter()
        .filter(|word| word.is_some())
        .count() as u64
    }

    /// Bytes taken by the flags word and shared key words
    pub fn encoded_len(&self) -> u64 {
        INDEX_FLAGS_SIZE + 4 * self.shared_count()
    }

    /// Size of one non-extended entry
    pub fn record_size(&self) -> u64 {
        BASE_RECORD_SIZE + 4 * (3 - self.shared_count())
    }
}

/// One resource descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    /// Resource type id
    pub type_id: u32,
    /// Resource group id
    pub group_id: u32,
    /// Resource instance id
    pub instance: u64,
    /// Offset of the resource data in the file
    pub position: u32,
    /// Bytes on disk
    pub compressed_size: u32,
    /// Bytes after decompression
    pub uncompressed_size: u32,
    /// Raw compression field, present on extended entries only
    pub compression: Option<u16>,
}

impl IndexEntry {
    /// Reads the entry starting at `offset` within `index`.
    ///
    /// Returns the entry and the number of bytes it occupies.
    pub fn read(index: &ByteReader<'_>, offset: u64, flags: &IndexFlags) -> Result<(Self, u64)> {
        let mut position = offset;
        let mut next_u32 = || -> Result<u32> {
            let value = index.read_u32(position)?;
            position += 4;
            Ok(value)
        };

        let type_id = match flags.constant_type {
            Some(value) => value,
            None => next_u32()?,
        };
        let group_id = match flags.constant_group {
            Some(value) => value,
            None => next_u32()?,
        };
        let instance_high = match flags.constant_instance_high {
            Some(value) => value,
            None => next_u32()?,
        };
        let instance_low = next_u32()?;
        let resource_position = next_u32()?;
        let raw_size = next_u32()?;
        let uncompressed_size = next_u32()?;

        let compression = if raw_size & EXTENDED_BIT != 0 {
            let compression = index.read_u16(position)?;
            let _committed = index.read_u16(position + 2)?;
            position += 4;
            Some(compression)
        } else {
            None
        };

        let entry = Self {
            type_id,
            group_id,
            instance: (u64::from(instance_high) << 32) | u64::from(instance_low),
            position: resource_position,
            compressed_size: raw_size & !EXTENDED_BIT,
            uncompressed_size,
            compression,
        };

        Ok((entry, position - offset))
    }

    /// Decoded compression type; `Ok(None)` for non-extended entries and
    /// `Err(raw)` for values outside the known set
    pub fn compression_type(&self) -> std::result::Result<Option<CompressionType>, u16> {
        match self.compression {
            None => Ok(None),
            Some(raw) => CompressionType::from_raw(raw).map(Some).ok_or(raw),
        }
    }
}
