//! Encounter tables and slot resolution
//!
//! An encounter table is an ordered list of weighted entries. A 64-bit draw is scaled
//! into the table's total weight and resolved against the running cumulative weight.

use crate::constants::{
    ALPHA_FLAWLESS_IVS, DRAW_SCALE, OUTBREAK_ALPHA_RATE, OUTBREAK_REGULAR_RATE,
};
use crate::domain::species::species_info;
use crate::error::SpawnError;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::OnceLock;

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// Encounter table identifier
///
/// Massive outbreak tables use the 64-bit hash stored in the outbreak record.
/// Built-in tables hash a stable name with FNV-1a.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(pub u64);

impl TableId {
    /// Derive an id from a table name
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = FNV_OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}", self.0)
    }
}

/// One weighted table entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncounterSlot {
    pub species: u16,
    pub form: u8,
    pub is_alpha: bool,
    /// Weight, added to the running total during resolution
    pub rate: u32,
    /// Minimum number of flawless IVs
    pub flawless_ivs: u8,
    /// Gender-ratio threshold of the species/form
    pub gender_ratio: u8,
}

impl EncounterSlot {
    /// Build an entry for a catalogued species, form 0
    ///
    /// Alpha entries get the alpha flawless-IV floor. Species outside the Hisui dex
    /// have no known gender ratio and are rejected.
    pub fn for_species(species: u16, is_alpha: bool, rate: u32) -> Result<Self, SpawnError> {
        let info = species_info(species).ok_or_else(|| {
            SpawnError::unsupported(format!("species #{} is not in the Hisui dex", species))
        })?;

        Ok(Self {
            species,
            form: 0,
            is_alpha,
            rate,
            flawless_ivs: if is_alpha { ALPHA_FLAWLESS_IVS } else { 0 },
            gender_ratio: info.gender_ratio,
        })
    }
}

/// Result of resolving a slot value against a table
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution<'a> {
    /// Index of the matched entry
    pub index: usize,
    pub entry: &'a EncounterSlot,
    /// The value reached the table's total weight and was clamped to the last entry
    pub fallback: bool,
}

/// Ordered, weighted encounter table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncounterTable {
    pub id: TableId,
    pub entries: Vec<EncounterSlot>,
}

impl EncounterTable {
    pub fn new(id: TableId, entries: Vec<EncounterSlot>) -> Self {
        Self { id, entries }
    }

    /// Standalone outbreak table: the species at weight 100 and its alpha at weight 1
    pub fn outbreak(species: u16) -> Result<Self, SpawnError> {
        Ok(Self::new(
            TableId::from_name(&format!("outbreak/{}", species)),
            vec![
                EncounterSlot::for_species(species, false, OUTBREAK_REGULAR_RATE)?,
                EncounterSlot::for_species(species, true, OUTBREAK_ALPHA_RATE)?,
            ],
        ))
    }

    /// Sum of all entry weights
    pub fn total_rate(&self) -> u64 {
        self.entries.iter().map(|e| e.rate as u64).sum()
    }

    /// Scale a 64-bit draw into the table's weight domain
    #[inline]
    pub fn slot_value(&self, draw: u64) -> f64 {
        draw as f64 / DRAW_SCALE * self.total_rate() as f64
    }

    /// Resolve a slot value to an entry
    ///
    /// Values at or beyond the total weight resolve to the last entry.
    pub fn resolve(&self, value: f64) -> Result<Resolution<'_>, SpawnError> {
        if self.total_rate() == 0 {
            return Err(SpawnError::unsupported(format!(
                "encounter table {} has no weight",
                self.id
            )));
        }

        let mut running_total = 0u64;
        for (index, entry) in self.entries.iter().enumerate() {
            running_total += entry.rate as u64;
            if value < running_total as f64 {
                return Ok(Resolution {
                    index,
                    entry,
                    fallback: false,
                });
            }
        }

        let index = self.entries.len() - 1;
        log::warn!(
            "slot value {} reached total weight {} of table {}; using last entry",
            value,
            running_total,
            self.id
        );
        Ok(Resolution {
            index,
            entry: &self.entries[index],
            fallback: true,
        })
    }

    /// Scale and resolve a raw draw, returning the slot value with the resolution
    pub fn resolve_draw(&self, draw: u64) -> Result<(f64, Resolution<'_>), SpawnError> {
        let value = self.slot_value(draw);
        Ok((value, self.resolve(value)?))
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Table lookup by id
#[derive(Clone, Debug, Default)]
pub struct EncounterRegistry {
    tables: FxHashMap<TableId, EncounterTable>,
}

impl EncounterRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared registry holding the built-in tables
    pub fn builtin() -> &'static EncounterRegistry {
        static BUILTIN: OnceLock<EncounterRegistry> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let mut registry = EncounterRegistry::new();
            match builtin_tables() {
                Ok(tables) => registry.extend(tables),
                Err(e) => log::error!("built-in encounter tables unavailable: {}", e),
            }
            registry
        })
    }

    /// Owned copy of the built-in tables, for extending with loaded tables
    pub fn with_builtin() -> Self {
        Self::builtin().clone()
    }

    /// Register a table, returning any table it replaced
    pub fn insert(&mut self, table: EncounterTable) -> Option<EncounterTable> {
        self.tables.insert(table.id, table)
    }

    /// Register every table from an iterator
    pub fn extend(&mut self, tables: impl IntoIterator<Item = EncounterTable>) {
        for table in tables {
            self.insert(table);
        }
    }

    pub fn get(&self, id: TableId) -> Result<&EncounterTable, SpawnError> {
        self.tables.get(&id).ok_or(SpawnError::UnknownTable(id))
    }

    pub fn contains(&self, id: TableId) -> bool {
        self.tables.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Total weight of a registered table
    pub fn total_rate(&self, id: TableId) -> Result<u64, SpawnError> {
        Ok(self.get(id)?.total_rate())
    }

    /// Resolve a slot value against a registered table
    pub fn resolve(&self, id: TableId, value: f64) -> Result<Resolution<'_>, SpawnError> {
        self.get(id)?.resolve(value)
    }
}

// =============================================================================
// Built-in tables
// =============================================================================

pub const DISTORTION_OBSIDIAN: TableId = TableId::from_name("distortion/obsidian-fieldlands");
pub const DISTORTION_CRIMSON: TableId = TableId::from_name("distortion/crimson-mirelands");
pub const DISTORTION_CRIMSON_URSAS_RING: TableId =
    TableId::from_name("distortion/crimson-mirelands/ursas-ring");
pub const DISTORTION_COBALT: TableId = TableId::from_name("distortion/cobalt-coastlands");
pub const DISTORTION_CORONET: TableId = TableId::from_name("distortion/coronet-highlands");
pub const DISTORTION_ALABASTER: TableId = TableId::from_name("distortion/alabaster-icelands");

/// (species, regular weight); each species is followed by its alpha at weight 1
const OBSIDIAN_DISTORTION: &[(u16, u32)] = &[(215, 100), (461, 10)];
const URSAS_RING_DISTORTION: &[(u16, u32)] = &[(137, 100), (233, 10), (474, 5)];
const CRIMSON_DISTORTION: &[(u16, u32)] = &[
    (137, 100),
    (233, 10),
    (474, 5),
    (155, 100),
    (156, 50),
    (157, 5),
];
const COBALT_DISTORTION: &[(u16, u32)] = &[(81, 100), (82, 50), (462, 10)];
const CORONET_DISTORTION: &[(u16, u32)] = &[
    (408, 100),
    (409, 10),
    (410, 100),
    (411, 10),
    (722, 100),
    (723, 50),
    (724, 5),
];
const ALABASTER_DISTORTION: &[(u16, u32)] = &[(212, 100), (501, 100), (502, 50), (503, 5)];

fn paired_table(id: TableId, species: &[(u16, u32)]) -> Result<EncounterTable, SpawnError> {
    let mut entries = Vec::with_capacity(species.len() * 2);
    for &(s, rate) in species {
        entries.push(EncounterSlot::for_species(s, false, rate)?);
        entries.push(EncounterSlot::for_species(s, true, 1)?);
    }
    Ok(EncounterTable::new(id, entries))
}

fn builtin_tables() -> Result<Vec<EncounterTable>, SpawnError> {
    [
        (DISTORTION_OBSIDIAN, OBSIDIAN_DISTORTION),
        (DISTORTION_CRIMSON, CRIMSON_DISTORTION),
        (DISTORTION_CRIMSON_URSAS_RING, URSAS_RING_DISTORTION),
        (DISTORTION_COBALT, COBALT_DISTORTION),
        (DISTORTION_CORONET, CORONET_DISTORTION),
        (DISTORTION_ALABASTER, ALABASTER_DISTORTION),
    ]
    .into_iter()
    .map(|(id, species)| paired_table(id, species))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_entry_table() -> EncounterTable {
        EncounterTable::new(
            TableId(1),
            vec![
                EncounterSlot::for_species(215, false, 100).unwrap(),
                EncounterSlot::for_species(215, true, 1).unwrap(),
            ],
        )
    }

    #[test]
    fn test_resolve_regular_and_alpha() {
        let table = two_entry_table();

        let regular = table.resolve(50.0).unwrap();
        assert_eq!(regular.index, 0);
        assert!(!regular.entry.is_alpha);
        assert!(!regular.fallback);

        let alpha = table.resolve(100.5).unwrap();
        assert_eq!(alpha.index, 1);
        assert!(alpha.entry.is_alpha);
        assert!(!alpha.fallback);
    }

    #[test]
    fn test_resolve_boundary_is_exclusive() {
        let table = two_entry_table();
        assert_eq!(table.resolve(99.999).unwrap().index, 0);
        assert_eq!(table.resolve(100.0).unwrap().index, 1);
    }

    #[test]
    fn test_resolve_fallback_to_last_entry() {
        let table = two_entry_table();

        let at_total = table.resolve(101.0).unwrap();
        assert_eq!(at_total.index, 1);
        assert!(at_total.fallback);

        let beyond = table.resolve(1e9).unwrap();
        assert_eq!(beyond.index, 1);
        assert!(beyond.fallback);
    }

    #[test]
    fn test_resolve_empty_table_fails() {
        let table = EncounterTable::new(TableId(2), vec![]);
        assert!(matches!(
            table.resolve(0.0),
            Err(SpawnError::UnsupportedConfiguration(_))
        ));
    }

    #[test]
    fn test_slot_value_scaling() {
        let table = two_entry_table();
        assert_eq!(table.slot_value(0), 0.0);
        assert_eq!(table.slot_value(1 << 63), 50.5);
        assert!(table.slot_value(u64::MAX) <= 101.0);
    }

    #[test]
    fn test_max_draw_resolves_to_last_entry() {
        let table = two_entry_table();
        let (value, resolution) = table.resolve_draw(u64::MAX).unwrap();
        assert!(value >= 100.0);
        assert_eq!(resolution.index, 1);
    }

    #[test]
    fn test_outbreak_table() {
        let table = EncounterTable::outbreak(215).unwrap();
        assert_eq!(table.total_rate(), 101);
        assert!(!table.entries[0].is_alpha);
        assert!(table.entries[1].is_alpha);
        assert_eq!(table.entries[1].flawless_ivs, 3);
    }

    #[test]
    fn test_outbreak_unknown_species() {
        // Bulbasaur is not in the Hisui dex
        assert!(matches!(
            EncounterTable::outbreak(1),
            Err(SpawnError::UnsupportedConfiguration(_))
        ));
    }

    #[test]
    fn test_outbreak_table_for_any_hisui_species() {
        let table = EncounterTable::outbreak(399).unwrap();
        assert!(table.entries.iter().all(|e| e.species == 399 && e.gender_ratio == 127));

        let combee = EncounterTable::outbreak(415).unwrap();
        assert_eq!(combee.entries[0].gender_ratio, 31);
    }

    #[test]
    fn test_slot_for_unknown_species_fails() {
        assert!(matches!(
            EncounterSlot::for_species(0, false, 100),
            Err(SpawnError::UnsupportedConfiguration(_))
        ));
        assert!(EncounterSlot::for_species(906, true, 1).is_err());
    }

    #[test]
    fn test_builtin_distortion_weights() {
        let registry = EncounterRegistry::builtin();
        assert_eq!(registry.total_rate(DISTORTION_OBSIDIAN).unwrap(), 112);
        assert_eq!(registry.total_rate(DISTORTION_CRIMSON).unwrap(), 276);
        assert_eq!(registry.total_rate(DISTORTION_CRIMSON_URSAS_RING).unwrap(), 118);
        assert_eq!(registry.total_rate(DISTORTION_COBALT).unwrap(), 163);
        assert_eq!(registry.total_rate(DISTORTION_CORONET).unwrap(), 382);
        assert_eq!(registry.total_rate(DISTORTION_ALABASTER).unwrap(), 259);
    }

    #[test]
    fn test_builtin_species_are_catalogued() {
        for table in builtin_tables().unwrap() {
            for entry in &table.entries {
                assert!(species_info(entry.species).is_some(), "#{}", entry.species);
            }
        }
    }

    #[test]
    fn test_unknown_table() {
        let registry = EncounterRegistry::builtin();
        let id = TableId(0xDEAD);
        assert_eq!(registry.get(id).unwrap_err(), SpawnError::UnknownTable(id));
    }

    #[test]
    fn test_registry_extend() {
        let mut registry = EncounterRegistry::with_builtin();
        let before = registry.len();
        registry.insert(two_entry_table());
        assert_eq!(registry.len(), before + 1);
        assert!(registry.contains(TableId(1)));
    }

    #[test]
    fn test_table_id_from_name_is_stable() {
        assert_eq!(TableId::from_name(""), TableId(FNV_OFFSET_BASIS));
        assert_ne!(DISTORTION_CRIMSON, DISTORTION_CRIMSON_URSAS_RING);
    }
}
