//! Encounter table file I/O
//!
//! Reads and writes the table file format defined in `domain::table_format`.

use crate::constants::{FILE_HEADER_SIZE, TABLE_ENTRY_SIZE, TABLE_RECORD_HEADER_SIZE};
use crate::domain::encounter::{EncounterRegistry, EncounterTable, TableId};
use crate::domain::table_format::{
    decode_entry, encode_entry, TableFileHeader, TableFormatError,
};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

#[cfg(feature = "mmap")]
use memmap2::Mmap;

/// Save tables to a file
pub fn save_tables(path: impl AsRef<Path>, tables: &[EncounterTable]) -> Result<(), TableFormatError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_tables(&mut writer, tables)?;
    writer.flush()?;
    Ok(())
}

/// Serialize tables to any writer
pub fn write_tables(writer: &mut impl Write, tables: &[EncounterTable]) -> Result<(), TableFormatError> {
    let entry_count: usize = tables.iter().map(|t| t.entries.len()).sum();
    let header = TableFileHeader::new(tables.len() as u32, entry_count as u32);
    writer.write_all(&header.to_bytes())?;

    for table in tables {
        writer.write_u64::<LittleEndian>(table.id.0)?;
        writer.write_u32::<LittleEndian>(table.entries.len() as u32)?;
        writer.write_u32::<LittleEndian>(0)?;
        for entry in &table.entries {
            writer.write_all(&encode_entry(entry))?;
        }
    }

    Ok(())
}

/// Load tables from a file
pub fn load_tables(path: impl AsRef<Path>) -> Result<Vec<EncounterTable>, TableFormatError> {
    let file = File::open(path)?;
    let file_len = file.metadata()?.len();
    let mut reader = BufReader::new(file);

    let mut header_buf = [0u8; FILE_HEADER_SIZE];
    reader.read_exact(&mut header_buf)?;
    let header = TableFileHeader::from_bytes(&header_buf)?;
    check_file_size(&header, file_len)?;

    let mut tables = Vec::with_capacity(header.table_count as usize);
    let mut entries_seen = 0u32;
    for _ in 0..header.table_count {
        let id = TableId(reader.read_u64::<LittleEndian>()?);
        let count = reader.read_u32::<LittleEndian>()?;
        let _reserved = reader.read_u32::<LittleEndian>()?;

        entries_seen = entries_seen.saturating_add(count);
        if entries_seen > header.entry_count {
            return Err(TableFormatError::EntryCountMismatch {
                expected: header.entry_count,
                found: entries_seen,
            });
        }

        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let mut buf = [0u8; TABLE_ENTRY_SIZE];
            reader.read_exact(&mut buf)?;
            entries.push(decode_entry(&buf)?);
        }
        tables.push(EncounterTable::new(id, entries));
    }

    if entries_seen != header.entry_count {
        return Err(TableFormatError::EntryCountMismatch {
            expected: header.entry_count,
            found: entries_seen,
        });
    }

    log::info!(
        "Loaded {} encounter tables ({} entries)",
        tables.len(),
        entries_seen
    );
    Ok(tables)
}

/// Load a table file and merge it into a registry
///
/// Returns the number of tables added or replaced.
pub fn load_into_registry(
    path: impl AsRef<Path>,
    registry: &mut EncounterRegistry,
) -> Result<usize, TableFormatError> {
    let tables = load_tables(path)?;
    let count = tables.len();
    registry.extend(tables);
    Ok(count)
}

fn check_file_size(header: &TableFileHeader, found: u64) -> Result<(), TableFormatError> {
    let expected = header.expected_file_size();
    if expected != found {
        return Err(TableFormatError::InvalidFileSize { expected, found });
    }
    Ok(())
}

// =============================================================================
// Memory-mapped table I/O (mmap feature)
// =============================================================================

/// Memory-mapped table file
///
/// Validates the header and table records on open; tables are decoded on access.
#[cfg(feature = "mmap")]
pub struct MappedTableFile {
    mmap: Mmap,
    header: TableFileHeader,
    /// (table id, byte offset of the first entry, entry count)
    index: Vec<(TableId, usize, usize)>,
}

#[cfg(feature = "mmap")]
impl MappedTableFile {
    /// Open a table file as memory-mapped
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be mapped or its layout is inconsistent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TableFormatError> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        let header_bytes: &[u8; FILE_HEADER_SIZE] = mmap
            .get(..FILE_HEADER_SIZE)
            .and_then(|b| b.try_into().ok())
            .ok_or(TableFormatError::InvalidFileSize {
                expected: FILE_HEADER_SIZE as u64,
                found: mmap.len() as u64,
            })?;
        let header = TableFileHeader::from_bytes(header_bytes)?;
        check_file_size(&header, mmap.len() as u64)?;

        let mut index = Vec::with_capacity(header.table_count as usize);
        let mut offset = FILE_HEADER_SIZE;
        let mut entries_seen = 0u64;
        for _ in 0..header.table_count {
            let mut record = mmap
                .get(offset..offset + TABLE_RECORD_HEADER_SIZE)
                .ok_or(TableFormatError::EntryCountMismatch {
                    expected: header.entry_count,
                    found: entries_seen as u32,
                })?;
            let id = TableId(record.read_u64::<LittleEndian>()?);
            let count = record.read_u32::<LittleEndian>()? as usize;
            offset += TABLE_RECORD_HEADER_SIZE;

            index.push((id, offset, count));
            offset += count * TABLE_ENTRY_SIZE;
            entries_seen += count as u64;
        }

        if entries_seen != header.entry_count as u64 {
            return Err(TableFormatError::EntryCountMismatch {
                expected: header.entry_count,
                found: entries_seen as u32,
            });
        }

        Ok(Self {
            mmap,
            header,
            index,
        })
    }

    pub fn header(&self) -> &TableFileHeader {
        &self.header
    }

    /// Get the number of tables
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Ids of the tables in file order
    pub fn ids(&self) -> impl Iterator<Item = TableId> + '_ {
        self.index.iter().map(|(id, _, _)| *id)
    }

    /// Decode a table by position
    ///
    /// Returns `None` if the index is out of bounds.
    pub fn get(&self, index: usize) -> Option<Result<EncounterTable, TableFormatError>> {
        let &(id, offset, count) = self.index.get(index)?;
        Some(self.decode(id, offset, count))
    }

    /// Decode a table by id
    pub fn find(&self, id: TableId) -> Option<Result<EncounterTable, TableFormatError>> {
        let position = self.index.iter().position(|(t, _, _)| *t == id)?;
        self.get(position)
    }

    /// Decode every table
    pub fn tables(&self) -> Result<Vec<EncounterTable>, TableFormatError> {
        self.index
            .iter()
            .map(|&(id, offset, count)| self.decode(id, offset, count))
            .collect()
    }

    fn decode(&self, id: TableId, offset: usize, count: usize) -> Result<EncounterTable, TableFormatError> {
        let entries = self.mmap[offset..offset + count * TABLE_ENTRY_SIZE]
            .chunks_exact(TABLE_ENTRY_SIZE)
            .map(|chunk| {
                let buf: &[u8; TABLE_ENTRY_SIZE] = chunk
                    .try_into()
                    .map_err(|_| TableFormatError::InvalidEntry("short entry".into()))?;
                decode_entry(buf)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(EncounterTable::new(id, entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::encounter::EncounterSlot;
    use std::fs;
    use tempfile::tempdir;

    fn sample_tables() -> Vec<EncounterTable> {
        vec![
            EncounterTable::new(
                TableId(0x1111_2222_3333_4444),
                vec![
                    EncounterSlot::for_species(215, false, 100).unwrap(),
                    EncounterSlot::for_species(215, true, 1).unwrap(),
                ],
            ),
            EncounterTable::new(
                TableId(0xAB),
                vec![EncounterSlot::for_species(461, false, 7).unwrap()],
            ),
        ]
    }

    #[test]
    fn test_save_and_load_tables() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("tables.lat");

        let tables = sample_tables();
        save_tables(&path, &tables).expect("Failed to save");
        let loaded = load_tables(&path).expect("Failed to load");

        assert_eq!(tables, loaded);
        assert_eq!(fs::metadata(&path).unwrap().len(), 32 + 2 * 16 + 3 * 12);
    }

    #[test]
    fn test_save_empty_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("empty.lat");

        save_tables(&path, &[]).expect("Failed to save");
        assert!(load_tables(&path).expect("Failed to load").is_empty());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_tables("/nonexistent/path/file.lat");
        assert!(matches!(result, Err(TableFormatError::Io(_))));
    }

    #[test]
    fn test_truncated_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("truncated.lat");

        save_tables(&path, &sample_tables()).expect("Failed to save");
        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() - 5]).unwrap();

        assert!(matches!(
            load_tables(&path),
            Err(TableFormatError::InvalidFileSize { .. })
        ));
    }

    #[test]
    fn test_load_into_registry() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("tables.lat");
        save_tables(&path, &sample_tables()).expect("Failed to save");

        let mut registry = EncounterRegistry::with_builtin();
        let before = registry.len();
        assert_eq!(load_into_registry(&path, &mut registry).unwrap(), 2);
        assert_eq!(registry.len(), before + 2);
        assert_eq!(registry.total_rate(TableId(0xAB)).unwrap(), 7);
    }

    #[cfg(feature = "mmap")]
    #[test]
    fn test_mapped_file_matches_load_tables() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("mapped.lat");

        let tables = sample_tables();
        save_tables(&path, &tables).expect("Failed to save");

        let mapped = MappedTableFile::open(&path).expect("Failed to open");
        assert_eq!(mapped.len(), 2);
        assert_eq!(mapped.header().entry_count, 3);
        assert_eq!(mapped.tables().unwrap(), load_tables(&path).unwrap());
        assert_eq!(mapped.find(TableId(0xAB)).unwrap().unwrap(), tables[1]);
        assert!(mapped.get(2).is_none());
        assert_eq!(mapped.ids().collect::<Vec<_>>(), vec![tables[0].id, tables[1].id]);
    }

    #[cfg(feature = "mmap")]
    #[test]
    fn test_mapped_bad_magic() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("bad.lat");
        fs::write(&path, [0u8; 32]).unwrap();

        assert!(matches!(
            MappedTableFile::open(&path),
            Err(TableFormatError::InvalidMagic)
        ));
    }
}
