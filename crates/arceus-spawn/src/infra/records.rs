//! Outbreak record parsing
//!
//! Decodes the raw outbreak and massive-outbreak blocks read from game memory.

use crate::constants::{
    MMO_AREA_OFFSET, MMO_BLOCK_SIZE, MMO_BONUS_COUNT_OFFSET, MMO_BONUS_TABLE_OFFSET,
    MMO_COORDS_OFFSET, MMO_COUNT_OFFSET, MMO_GROUP_STRIDE, MMO_INACTIVE_AREAS, MMO_MAP_COUNT,
    MMO_MAP_STRIDE, MMO_SEED_OFFSET, MMO_SPECIES_OFFSET, MMO_TABLE_OFFSET, OUTBREAK_BLOCK_SIZE,
    OUTBREAK_COUNT_OFFSET, OUTBREAK_SEED_OFFSET, OUTBREAK_SLOT_COUNT, OUTBREAK_SPECIES_OFFSET,
    OUTBREAK_STRIDE, SPECIES_LIMIT,
};
use crate::domain::encounter::TableId;
use crate::domain::location::HisuiMap;
use crate::domain::walker::GroupSeed;
use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;

/// Record parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Block shorter than its fixed layout
    #[error("truncated {block} block: expected {expected} bytes, found {found}")]
    Truncated {
        block: &'static str,
        expected: usize,
        found: usize,
    },
    /// Active map block with an area id that matches no map
    #[error("unknown massive outbreak area id 0x{0:04X}")]
    UnknownArea(u16),
}

/// One active standalone outbreak
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutbreakRecord {
    /// Slot index in the block
    pub slot: usize,
    pub species: u16,
    pub group_seed: GroupSeed,
    pub spawn_count: u16,
}

/// One massive outbreak group
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MassiveOutbreakGroup {
    pub map: HisuiMap,
    /// Group index within the map
    pub group_id: usize,
    pub species: u16,
    pub coordinates: [f32; 3],
    pub table: TableId,
    pub bonus_table: TableId,
    pub group_seed: GroupSeed,
    pub spawn_count: u16,
    pub bonus_count: u16,
}

impl MassiveOutbreakGroup {
    /// Bonus round table, if the group has one
    pub fn bonus_table(&self) -> Option<TableId> {
        (self.bonus_table.0 != 0).then_some(self.bonus_table)
    }
}

fn check_len(block: &'static str, bytes: &[u8], expected: usize) -> Result<(), RecordError> {
    if bytes.len() < expected {
        return Err(RecordError::Truncated {
            block,
            expected,
            found: bytes.len(),
        });
    }
    Ok(())
}

/// Parse the standalone outbreak block
///
/// Slots with species 0 are inactive and skipped.
pub fn parse_outbreaks(bytes: &[u8]) -> Result<Vec<OutbreakRecord>, RecordError> {
    check_len("outbreak", bytes, OUTBREAK_BLOCK_SIZE)?;

    let records = (0..OUTBREAK_SLOT_COUNT)
        .filter_map(|slot| {
            let rec = &bytes[slot * OUTBREAK_STRIDE..(slot + 1) * OUTBREAK_STRIDE];
            let species = LittleEndian::read_u16(&rec[OUTBREAK_SPECIES_OFFSET..]);
            if species == 0 {
                return None;
            }
            Some(OutbreakRecord {
                slot,
                species,
                group_seed: GroupSeed::from_raw(LittleEndian::read_u64(
                    &rec[OUTBREAK_SEED_OFFSET..],
                )),
                spawn_count: LittleEndian::read_u16(&rec[OUTBREAK_COUNT_OFFSET..]),
            })
        })
        .collect();

    Ok(records)
}

/// Parse the massive outbreak block
///
/// Inactive maps are skipped. Within a map, groups are read until the species is 0,
/// the species is out of range, or the map block ends.
pub fn parse_massive_outbreaks(bytes: &[u8]) -> Result<Vec<MassiveOutbreakGroup>, RecordError> {
    check_len("massive outbreak", bytes, MMO_BLOCK_SIZE)?;

    let mut groups = Vec::new();
    for map_index in 0..MMO_MAP_COUNT {
        let block = &bytes[map_index * MMO_MAP_STRIDE..(map_index + 1) * MMO_MAP_STRIDE];
        let area_id = LittleEndian::read_u16(&block[MMO_AREA_OFFSET..]);
        if MMO_INACTIVE_AREAS.contains(&area_id) {
            continue;
        }
        let map = HisuiMap::from_area_id(area_id).ok_or(RecordError::UnknownArea(area_id))?;

        let mut group_id = 0;
        while (group_id + 1) * MMO_GROUP_STRIDE <= block.len() {
            let rec = &block[group_id * MMO_GROUP_STRIDE..(group_id + 1) * MMO_GROUP_STRIDE];
            let species = LittleEndian::read_u16(&rec[MMO_SPECIES_OFFSET..]);
            if species == 0 || species >= SPECIES_LIMIT {
                break;
            }

            let mut coordinates = [0f32; 3];
            LittleEndian::read_f32_into(
                &rec[MMO_COORDS_OFFSET..MMO_COORDS_OFFSET + 12],
                &mut coordinates,
            );

            groups.push(MassiveOutbreakGroup {
                map,
                group_id,
                species,
                coordinates,
                table: TableId(LittleEndian::read_u64(&rec[MMO_TABLE_OFFSET..])),
                bonus_table: TableId(LittleEndian::read_u64(&rec[MMO_BONUS_TABLE_OFFSET..])),
                group_seed: GroupSeed::from_raw(LittleEndian::read_u64(&rec[MMO_SEED_OFFSET..])),
                spawn_count: LittleEndian::read_u16(&rec[MMO_COUNT_OFFSET..]),
                bonus_count: LittleEndian::read_u16(&rec[MMO_BONUS_COUNT_OFFSET..]),
            });
            group_id += 1;
        }
        log::debug!("{}: {} massive outbreak groups", map, group_id);
    }

    Ok(groups)
}
