//! Encounter table file format definitions
//!
//! A table file holds any number of encounter tables after a fixed header:
//!
//! ```text
//! header   32 bytes   magic, version, table count, entry count
//! table    16 bytes   table id u64, entry count u32, reserved u32
//!   entry  12 bytes   species u16, form u8, alpha u8, rate u32,
//!                     flawless u8, gender ratio u8, reserved u16
//! ```
//!
//! All integers are little-endian.

use crate::constants::{
    FILE_FORMAT_VERSION, FILE_HEADER_SIZE, TABLE_ENTRY_SIZE, TABLE_MAGIC,
    TABLE_RECORD_HEADER_SIZE,
};
use crate::domain::encounter::EncounterSlot;
use thiserror::Error;

/// Table file header
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableFileHeader {
    /// File format version
    pub version: u16,
    /// Number of tables in the file
    pub table_count: u32,
    /// Number of entries across all tables
    pub entry_count: u32,
}

impl TableFileHeader {
    pub fn new(table_count: u32, entry_count: u32) -> Self {
        Self {
            version: FILE_FORMAT_VERSION,
            table_count,
            entry_count,
        }
    }

    /// Serialize header to bytes (32 bytes)
    pub fn to_bytes(&self) -> [u8; FILE_HEADER_SIZE] {
        let mut buf = [0u8; FILE_HEADER_SIZE];

        buf[0..8].copy_from_slice(&TABLE_MAGIC);
        buf[8..10].copy_from_slice(&self.version.to_le_bytes());
        // 10..12 reserved
        buf[12..16].copy_from_slice(&self.table_count.to_le_bytes());
        buf[16..20].copy_from_slice(&self.entry_count.to_le_bytes());
        // 20..32 reserved

        buf
    }

    /// Deserialize header from bytes
    pub fn from_bytes(buf: &[u8; FILE_HEADER_SIZE]) -> Result<Self, TableFormatError> {
        if buf[0..8] != TABLE_MAGIC {
            return Err(TableFormatError::InvalidMagic);
        }

        let version = u16::from_le_bytes([buf[8], buf[9]]);
        if version != FILE_FORMAT_VERSION {
            return Err(TableFormatError::UnsupportedVersion(version));
        }

        Ok(Self {
            version,
            table_count: u32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]),
            entry_count: u32::from_le_bytes([buf[16], buf[17], buf[18], buf[19]]),
        })
    }

    /// File size implied by the header
    pub fn expected_file_size(&self) -> u64 {
        FILE_HEADER_SIZE as u64
            + self.table_count as u64 * TABLE_RECORD_HEADER_SIZE as u64
            + self.entry_count as u64 * TABLE_ENTRY_SIZE as u64
    }
}

/// Encode one table entry
pub fn encode_entry(entry: &EncounterSlot) -> [u8; TABLE_ENTRY_SIZE] {
    let mut buf = [0u8; TABLE_ENTRY_SIZE];
    buf[0..2].copy_from_slice(&entry.species.to_le_bytes());
    buf[2] = entry.form;
    buf[3] = entry.is_alpha as u8;
    buf[4..8].copy_from_slice(&entry.rate.to_le_bytes());
    buf[8] = entry.flawless_ivs;
    buf[9] = entry.gender_ratio;
    // 10..12 reserved
    buf
}

/// Decode one table entry
pub fn decode_entry(buf: &[u8; TABLE_ENTRY_SIZE]) -> Result<EncounterSlot, TableFormatError> {
    let is_alpha = match buf[3] {
        0 => false,
        1 => true,
        other => return Err(TableFormatError::InvalidEntry(format!("alpha flag {}", other))),
    };

    Ok(EncounterSlot {
        species: u16::from_le_bytes([buf[0], buf[1]]),
        form: buf[2],
        is_alpha,
        rate: u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
        flawless_ivs: buf[8],
        gender_ratio: buf[9],
    })
}

/// Table file format errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableFormatError {
    /// Invalid magic number (not a table file)
    #[error("invalid file format: not an encounter table file")]
    InvalidMagic,
    #[error("unsupported format version: {0}")]
    UnsupportedVersion(u16),
    /// File size does not match the header
    #[error("invalid file size: expected {expected} bytes, found {found} bytes")]
    InvalidFileSize { expected: u64, found: u64 },
    /// Entry counts in the table records do not add up to the header total
    #[error("entry count mismatch: header says {expected}, tables hold {found}")]
    EntryCountMismatch { expected: u32, found: u32 },
    #[error("invalid table entry: {0}")]
    InvalidEntry(String),
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for TableFormatError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
