//! DBPF `.package` validation.
//!
//! The checks run in a fixed order and stop at the first failure:
//!
//! 1. the file holds every header field, else `TooShortForHeader`
//! 2. the magic is `DBPF`, else `BadMagic`
//! 3. the version is supported, else `UnsupportedVersion`
//! 4. fixed header fields hold their expected values
//! 5. the index table lies inside the file, else `IndexOutOfBounds`, and
//!    its declared size can hold the declared entry count, else
//!    `InconsistentCount`
//! 6. every entry points inside the file and uses a known compression type
//!
//! Content of the resources themselves is not inspected.

use super::dbpf::{
    IndexEntry, IndexFlags, PackageHeader, BASE_RECORD_SIZE, HEADER_SIZE, INDEX_FLAGS_SIZE,
};
use super::FormatValidator;
use crate::asset::AssetFile;
use crate::kind::AssetKind;
use crate::reader::ByteReader;
use crate::verdict::FailureReason;
use tracing::trace;

/// Structural validator for DBPF packages
#[derive(Debug, Clone, Copy, Default)]
pub struct PackageValidator;

impl FormatValidator for PackageValidator {
    fn kind(&self) -> AssetKind {
        AssetKind::Package
    }

    fn check(&self, file: &AssetFile) -> Result<(), FailureReason> {
        check_package(&file.reader())
    }
}

fn check_package(reader: &ByteReader<'_>) -> Result<(), FailureReason> {
    let file_len = reader.len() as u64;

    let header = PackageHeader::parse(reader)?;
    trace!(?header, "parsed package header");

    if !header.is_supported_version() {
        return Err(FailureReason::UnsupportedVersion);
    }
    if !header.has_expected_constants() {
        return Err(FailureReason::UnexpectedHeaderConstant);
    }

    let index_offset = header.index_offset;
    if index_offset < HEADER_SIZE || index_offset > file_len {
        return Err(FailureReason::IndexOutOfBounds);
    }
    let index_end = index_offset
        .checked_add(u64::from(header.index_size))
        .filter(|&end| end <= file_len)
        .ok_or(FailureReason::IndexOutOfBounds)?;

    let entry_count = header.index_entry_count;
    if entry_count == 0 {
        return Ok(());
    }

    // Smallest table the count allows, before trusting the declared index size
    let min_table_end = u64::from(entry_count)
        .checked_mul(BASE_RECORD_SIZE)
        .and_then(|len| len.checked_add(INDEX_FLAGS_SIZE))
        .and_then(|len| len.checked_add(index_offset))
        .ok_or(FailureReason::IndexOutOfBounds)?;
    if min_table_end > file_len {
        return Err(FailureReason::IndexOutOfBounds);
    }

    let index = reader.sub_reader(index_offset, u64::from(header.index_size))?;
    let flags = IndexFlags::parse(&index).map_err(|_| FailureReason::InconsistentCount)?;

    let table_end = u64::from(entry_count)
        .checked_mul(flags.record_size())
        .and_then(|len| len.checked_add(flags.encoded_len()))
        .and_then(|len| len.checked_add(index_offset))
        .ok_or(FailureReason::IndexOutOfBounds)?;
    if table_end > file_len {
        return Err(FailureReason::IndexOutOfBounds);
    }
    if table_end > index_end {
        return Err(FailureReason::InconsistentCount);
    }

    let mut cursor = flags.encoded_len();
    for i in 0..entry_count {
        let (entry, len) = IndexEntry::read(&index, cursor, &flags)
            .map_err(|_| FailureReason::InconsistentCount)?;
        trace!(
            "entry {}: {:08X}:{:08X}:{:016X} at {} ({} bytes)",
            i,
            entry.type_id,
            entry.group_id,
            entry.instance,
            entry.position,
            entry.compressed_size
        );
        check_entry(&entry, file_len)?;
        cursor += len;
    }

    Ok(())
}

fn check_entry(entry: &IndexEntry, file_len: u64) -> Result<(), FailureReason> {
    // Offsets and sizes are signed 32-bit on disk
    if (entry.position as i32) < 0 || (entry.uncompressed_size as i32) < 0 {
        return Err(FailureReason::IndexEntryOutOfBounds);
    }

    let end = u64::from(entry.position) + u64::from(entry.compressed_size);
    if end > file_len {
        return Err(FailureReason::IndexEntryOutOfBounds);
    }

    entry
        .compression_type()
        .map(|_| ())
        .map_err(|_| FailureReason::UnknownCompression)
}
