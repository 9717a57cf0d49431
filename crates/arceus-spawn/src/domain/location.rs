//! Hisui maps and per-map spawner layouts
//!
//! Distortion layouts map a spawner group to its encounter table and place name.
//! Static layouts map a static alpha spawner id to its species.

use crate::domain::encounter::{
    TableId, DISTORTION_ALABASTER, DISTORTION_COBALT, DISTORTION_CORONET, DISTORTION_CRIMSON,
    DISTORTION_CRIMSON_URSAS_RING, DISTORTION_OBSIDIAN,
};
use crate::error::SpawnError;
use serde::Deserialize;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// The five explorable maps
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HisuiMap {
    Obsidian,
    Crimson,
    Cobalt,
    Coronet,
    Alabaster,
}

impl HisuiMap {
    pub const ALL: [HisuiMap; 5] = [
        HisuiMap::Obsidian,
        HisuiMap::Crimson,
        HisuiMap::Cobalt,
        HisuiMap::Coronet,
        HisuiMap::Alabaster,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Obsidian => "Obsidian Fieldlands",
            Self::Crimson => "Crimson Mirelands",
            Self::Cobalt => "Cobalt Coastlands",
            Self::Coronet => "Coronet Highlands",
            Self::Alabaster => "Alabaster Icelands",
        }
    }

    /// Area id stored at the head of a massive-outbreak map block
    pub fn area_id(&self) -> u16 {
        match self {
            Self::Obsidian => 0x5A1D,
            Self::Crimson => 0x5504,
            Self::Cobalt => 0x56B7,
            Self::Coronet => 0x519E,
            Self::Alabaster => 0x5351,
        }
    }

    pub fn from_area_id(area_id: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.area_id() == area_id)
    }

    pub fn distortion_layout(&self) -> &'static DistortionLayout {
        match self {
            Self::Obsidian => &OBSIDIAN_DISTORTIONS,
            Self::Crimson => &CRIMSON_DISTORTIONS,
            Self::Cobalt => &COBALT_DISTORTIONS,
            Self::Coronet => &CORONET_DISTORTIONS,
            Self::Alabaster => &ALABASTER_DISTORTIONS,
        }
    }

    pub fn static_layout(&self) -> &'static StaticLayout {
        match self {
            Self::Obsidian => &OBSIDIAN_STATICS,
            Self::Crimson => &CRIMSON_STATICS,
            Self::Cobalt => &COBALT_STATICS,
            Self::Coronet => &CORONET_STATICS,
            Self::Alabaster => &ALABASTER_STATICS,
        }
    }
}

impl fmt::Display for HisuiMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HisuiMap {
    type Err = SpawnError;

    /// Accepts the short name or the full name, case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', '_'], " ");
        Self::ALL
            .into_iter()
            .find(|m| {
                let full = m.name().to_lowercase();
                full == wanted || full.split(' ').next() == Some(wanted.as_str())
            })
            .ok_or_else(|| SpawnError::unsupported(format!("unknown map '{}'", s)))
    }
}

// =============================================================================
// Distortions
// =============================================================================

/// Why a distortion spawner is never simulated
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Exclusion {
    /// Shared spawner that does not use the distortion table
    CommonSpawner,
    /// Spawner whose place was never identified
    UnknownLocation,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CommonSpawner => write!(f, "common spawner"),
            Self::UnknownLocation => write!(f, "location unknown"),
        }
    }
}

/// Spawner ids shared by every map's distortion block
const COMMON_SPAWNERS: &[u8] = &[0, 4, 8, 12, 16, 20];

/// Group ids per place label
const GROUPS_PER_LABEL: u8 = 4;

/// Distortion spawners of one map
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistortionLayout {
    pub map: HisuiMap,
    pub group_count: u8,
    /// Offset of the map's group array in the distortion pointer chain
    pub pointer_base: i64,
    pub default_table: TableId,
    /// Groups that use another table
    pub table_overrides: &'static [(RangeInclusive<u8>, TableId)],
    /// Place names, four group ids each
    pub labels: &'static [&'static str],
    /// Groups whose place was never identified
    pub unknown_groups: Option<RangeInclusive<u8>>,
}

impl DistortionLayout {
    /// Group ids of this map
    pub fn groups(&self) -> std::ops::Range<u8> {
        0..self.group_count
    }

    fn check(&self, group_id: u8) -> Result<(), SpawnError> {
        if group_id < self.group_count {
            Ok(())
        } else {
            Err(SpawnError::unsupported(format!(
                "{} has {} distortion groups, got {}",
                self.map, self.group_count, group_id
            )))
        }
    }

    /// Encounter table for a group
    pub fn table_for(&self, group_id: u8) -> Result<TableId, SpawnError> {
        self.check(group_id)?;
        Ok(self
            .table_overrides
            .iter()
            .find(|(range, _)| range.contains(&group_id))
            .map(|(_, table)| *table)
            .unwrap_or(self.default_table))
    }

    /// Place name for a group
    pub fn label_for(&self, group_id: u8) -> Result<&'static str, SpawnError> {
        self.check(group_id)?;
        let index = (group_id.saturating_sub(1) / GROUPS_PER_LABEL) as usize;
        Ok(self.labels[index.min(self.labels.len() - 1)])
    }

    /// Exclusion reason, if the group is never simulated
    pub fn exclusion(&self, group_id: u8) -> Option<Exclusion> {
        if COMMON_SPAWNERS.contains(&group_id) {
            Some(Exclusion::CommonSpawner)
        } else if self
            .unknown_groups
            .as_ref()
            .is_some_and(|r| r.contains(&group_id))
        {
            Some(Exclusion::UnknownLocation)
        } else {
            None
        }
    }
}

static OBSIDIAN_DISTORTIONS: DistortionLayout = DistortionLayout {
    map: HisuiMap::Obsidian,
    group_count: 16,
    pointer_base: 0x990,
    default_table: DISTORTION_OBSIDIAN,
    table_overrides: &[],
    labels: &[
        "Horseshoe Plains",
        "Windswept Run",
        "Nature's Pantry",
        "Sandgem Flats",
    ],
    unknown_groups: None,
};

static CRIMSON_DISTORTIONS: DistortionLayout = DistortionLayout {
    map: HisuiMap::Crimson,
    group_count: 25,
    pointer_base: 0xC70,
    default_table: DISTORTION_CRIMSON,
    table_overrides: &[(13..=15, DISTORTION_CRIMSON_URSAS_RING)],
    labels: &[
        "Droning Meadow",
        "Holm of Trials",
        "Unknown",
        "Ursa's Ring",
        "Prairie",
        "Gapejaw Bog",
    ],
    unknown_groups: Some(9..=12),
};

static COBALT_DISTORTIONS: DistortionLayout = DistortionLayout {
    map: HisuiMap::Cobalt,
    group_count: 20,
    pointer_base: 0xCC0,
    default_table: DISTORTION_COBALT,
    table_overrides: &[],
    labels: &[
        "Ginko Landing",
        "Aipom Hill",
        "Deadwood Haunt",
        "Spring Path",
        "Windbreak Stand",
    ],
    unknown_groups: None,
};

static CORONET_DISTORTIONS: DistortionLayout = DistortionLayout {
    map: HisuiMap::Coronet,
    group_count: 20,
    pointer_base: 0x818,
    default_table: DISTORTION_CORONET,
    table_overrides: &[],
    labels: &[
        "Sonorous Path",
        "Ancient Quarry",
        "Celestica Ruins",
        "Primeval Grotto",
        "Boulderoll Ravine",
    ],
    unknown_groups: None,
};

static ALABASTER_DISTORTIONS: DistortionLayout = DistortionLayout {
    map: HisuiMap::Alabaster,
    group_count: 24,
    pointer_base: 0x948,
    default_table: DISTORTION_ALABASTER,
    table_overrides: &[],
    labels: &[
        "Bonechill Wastes North",
        "Avalugg's Legacy",
        "Bonechill Wastes South",
        "Southeast of Arena",
        "Heart's Crag",
        "Arena's Approach",
    ],
    unknown_groups: None,
};

// =============================================================================
// Static alpha spawners
// =============================================================================

/// Static alpha spawners of one map, indexed by spawner id
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticLayout {
    pub map: HisuiMap,
    pub species: &'static [u16],
}

impl StaticLayout {
    pub fn spawner_count(&self) -> usize {
        self.species.len()
    }

    pub fn species_for(&self, spawner_id: usize) -> Result<u16, SpawnError> {
        self.species.get(spawner_id).copied().ok_or_else(|| {
            SpawnError::unsupported(format!(
                "{} has {} static spawners, got {}",
                self.map,
                self.species.len(),
                spawner_id
            ))
        })
    }
}

static OBSIDIAN_STATICS: StaticLayout = StaticLayout {
    map: HisuiMap::Obsidian,
    species: &[
        78, 143, 404, 419, 397, 47, 402, 234, 400, 123, 428, 75, 242, 214, 129, 392, 65, 130,
    ],
};

static CRIMSON_STATICS: StaticLayout = StaticLayout {
    map: HisuiMap::Crimson,
    species: &[
        465, 450, 435, 95, 111, 430, 407, 463, 417, 455, 416, 469, 217, 454, 389, 705, 26, 217,
        340,
    ],
};

static COBALT_STATICS: StaticLayout = StaticLayout {
    map: HisuiMap::Cobalt,
    species: &[
        365, 452, 432, 424, 55, 477, 67, 224, 226, 73, 38, 113, 457, 130, 423, 211, 395, 414,
    ],
};

static CORONET_STATICS: StaticLayout = StaticLayout {
    map: HisuiMap::Coronet,
    species: &[
        414, 437, 455, 207, 444, 405, 466, 706, 208, 36, 76, 429, 464, 476, 472,
    ],
};

static ALABASTER_STATICS: StaticLayout = StaticLayout {
    map: HisuiMap::Alabaster,
    species: &[362, 460, 473, 282, 215, 358, 68, 220, 221, 448, 125, 478, 445],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::species::species_info;

    #[test]
    fn test_area_id_round_trip() {
        for map in HisuiMap::ALL {
            assert_eq!(HisuiMap::from_area_id(map.area_id()), Some(map));
        }
        assert_eq!(HisuiMap::from_area_id(0x2645), None);
        assert_eq!(HisuiMap::from_area_id(0), None);
    }

    #[test]
    fn test_parse_map_names() {
        assert_eq!("obsidian".parse::<HisuiMap>().unwrap(), HisuiMap::Obsidian);
        assert_eq!("Crimson Mirelands".parse::<HisuiMap>().unwrap(), HisuiMap::Crimson);
        assert_eq!("alabaster-icelands".parse::<HisuiMap>().unwrap(), HisuiMap::Alabaster);
        assert!("jubilife".parse::<HisuiMap>().is_err());
    }

    #[test]
    fn test_common_spawners_excluded() {
        for map in HisuiMap::ALL {
            let layout = map.distortion_layout();
            for group in layout.groups().filter(|g| COMMON_SPAWNERS.contains(g)) {
                assert_eq!(layout.exclusion(group), Some(Exclusion::CommonSpawner));
            }
        }
    }

    #[test]
    fn test_crimson_last_group_is_live() {
        let layout = HisuiMap::Crimson.distortion_layout();
        assert!(layout.groups().contains(&24));
        assert_eq!(layout.exclusion(24), None);
        assert_eq!(layout.table_for(24).unwrap(), DISTORTION_CRIMSON);
    }

    #[test]
    fn test_crimson_layout() {
        let layout = HisuiMap::Crimson.distortion_layout();
        for group in 9..=11 {
            assert_eq!(layout.exclusion(group), Some(Exclusion::UnknownLocation));
        }
        assert_eq!(layout.exclusion(12), Some(Exclusion::CommonSpawner));
        assert_eq!(layout.exclusion(13), None);

        assert_eq!(layout.table_for(14).unwrap(), DISTORTION_CRIMSON_URSAS_RING);
        assert_eq!(layout.table_for(17).unwrap(), DISTORTION_CRIMSON);
        assert_eq!(layout.label_for(14).unwrap(), "Ursa's Ring");
        assert_eq!(layout.label_for(24).unwrap(), "Gapejaw Bog");
    }

    #[test]
    fn test_labels_cover_every_group() {
        let layout = HisuiMap::Obsidian.distortion_layout();
        assert_eq!(layout.label_for(1).unwrap(), "Horseshoe Plains");
        assert_eq!(layout.label_for(4).unwrap(), "Horseshoe Plains");
        assert_eq!(layout.label_for(5).unwrap(), "Windswept Run");
        assert_eq!(layout.label_for(15).unwrap(), "Sandgem Flats");
        assert!(layout.label_for(16).is_err());
        assert!(layout.table_for(16).is_err());
    }

    #[test]
    fn test_static_species_are_catalogued() {
        for map in HisuiMap::ALL {
            for &species in map.static_layout().species {
                assert!(species_info(species).is_some(), "{} #{}", map, species);
            }
        }
    }

    #[test]
    fn test_static_spawner_out_of_range() {
        let layout = HisuiMap::Alabaster.static_layout();
        assert_eq!(layout.species_for(0).unwrap(), 362);
        assert!(matches!(
            layout.species_for(layout.spawner_count()),
            Err(SpawnError::UnsupportedConfiguration(_))
        ));
    }
}
