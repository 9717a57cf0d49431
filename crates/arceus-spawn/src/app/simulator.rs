//! Event simulators
//!
//! Drive the seed-derivation walk for one spawn batch, resolve every draw against
//! its encounter table and generate the individual stats.

use crate::app::hunt::{MatchPolicy, Unfiltered};
use crate::app::report::{BatchReport, SkipReason, SpawnRecord};
use crate::constants::ALPHA_FLAWLESS_IVS;
use crate::domain::encounter::{EncounterRegistry, EncounterTable, TableId};
use crate::domain::event::{EventSpec, SpawnBatchSpec};
use crate::domain::individual::{generate_individual, StatParams};
use crate::domain::location::HisuiMap;
use crate::domain::species::{species_info, species_name};
use crate::domain::walker::{
    walk_distortion, walk_massive_outbreak, walk_outbreak, Round, SpawnDraw, StaticSpawnerWalk,
};
use crate::error::SpawnError;

/// Simulates spawn batches against an encounter registry
#[derive(Clone, Copy, Debug)]
pub struct Simulator<'r> {
    registry: &'r EncounterRegistry,
}

impl Simulator<'static> {
    /// Simulator over the built-in tables only
    pub fn builtin() -> Self {
        Self::new(EncounterRegistry::builtin())
    }
}

impl<'r> Simulator<'r> {
    pub fn new(registry: &'r EncounterRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r EncounterRegistry {
        self.registry
    }

    /// Simulate a batch without a hunting policy
    pub fn simulate(&self, spec: &SpawnBatchSpec) -> Result<BatchReport, SpawnError> {
        self.simulate_with(spec, &Unfiltered)
    }

    /// Simulate a batch, flagging spawns accepted by `policy`
    ///
    /// Static alpha spawners stop once `policy.max_hits()` spawns matched. Outbreaks
    /// always return the full batch.
    pub fn simulate_with(
        &self,
        spec: &SpawnBatchSpec,
        policy: &dyn MatchPolicy,
    ) -> Result<BatchReport, SpawnError> {
        log::debug!(
            "simulating {} from group seed 0x{:016X}",
            spec.event.kind(),
            spec.group_seed.raw()
        );

        match &spec.event {
            EventSpec::StaticAlpha {
                map,
                spawner_id,
                initial_spawn,
                static_alpha,
                max_advances,
            } => self.static_alpha(
                spec,
                *map,
                *spawner_id,
                *initial_spawn,
                *static_alpha,
                *max_advances,
                policy,
            ),
            EventSpec::Outbreak { species, total } => {
                let table = EncounterTable::outbreak(*species)?;
                let label = format!("{} outbreak", species_name(*species));
                if spec.group_seed.is_inactive() {
                    return Ok(BatchReport::skipped(label, spec.group_seed, SkipReason::InactiveSeed));
                }
                let draws = walk_outbreak(spec.group_seed, *total);
                self.resolve_batch(spec, label, &draws, &table, None, policy)
            }
            EventSpec::MassiveOutbreak {
                map,
                group_id,
                table,
                bonus_table,
                total,
                bonus_total,
            } => self.massive_outbreak(
                spec,
                *map,
                *group_id,
                *table,
                *bonus_table,
                *total,
                *bonus_total,
                policy,
            ),
            EventSpec::Distortion { map, group_id } => {
                self.distortion(spec, *map, *group_id, policy)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn static_alpha(
        &self,
        spec: &SpawnBatchSpec,
        map: HisuiMap,
        spawner_id: usize,
        initial_spawn: bool,
        static_alpha: bool,
        max_advances: u32,
        policy: &dyn MatchPolicy,
    ) -> Result<BatchReport, SpawnError> {
        let species = map.static_layout().species_for(spawner_id)?;
        let info = species_info(species).ok_or_else(|| {
            SpawnError::unsupported(format!("static spawner species #{} is not catalogued", species))
        })?;
        let label = format!("{} (spawner {})", info.name, spawner_id);

        if spec.group_seed.is_inactive() {
            return Ok(BatchReport::skipped(label, spec.group_seed, SkipReason::InactiveSeed));
        }

        let floor = (if static_alpha { ALPHA_FLAWLESS_IVS } else { 0 }).max(spec.flawless_ivs);
        let params = StatParams {
            flawless_ivs: floor,
            shiny_rolls: spec.shiny_rolls,
            gender_ratio: info.gender_ratio,
            trainer: spec.trainer,
        };

        let mut report = BatchReport::new(label, spec.group_seed);
        let mut hits = 0;
        for draw in StaticSpawnerWalk::new(spec.group_seed, initial_spawn).take(max_advances as usize) {
            let mut record = SpawnRecord {
                round: draw.round,
                phase: draw.phase,
                index: report.spawns.len(),
                advance: draw.advance,
                slot_value: None,
                fallback: false,
                location: map.name().to_string(),
                species,
                form: 0,
                is_alpha: static_alpha,
                outcome: generate_individual(draw.individual_seed, &params),
                matched: false,
            };
            record.matched = policy.is_match(&record);
            log::trace!("advance {}: {}", draw.advance, record);

            if record.matched {
                hits += 1;
            }
            report.spawns.push(record);
            if hits >= policy.max_hits() {
                log::debug!("stopping after {} hits", hits);
                break;
            }
        }

        Ok(report)
    }

    #[allow(clippy::too_many_arguments)]
    fn massive_outbreak(
        &self,
        spec: &SpawnBatchSpec,
        map: HisuiMap,
        group_id: usize,
        table: TableId,
        bonus_table: Option<TableId>,
        total: usize,
        bonus_total: usize,
        policy: &dyn MatchPolicy,
    ) -> Result<BatchReport, SpawnError> {
        let main_table = self.registry.get(table)?;
        let bonus = match bonus_table {
            Some(id) => {
                let table = self.registry.get(id)?;
                (table.total_rate() > 0).then_some(table)
            }
            None => None,
        };

        let label = format!("{} massive outbreak group {}", map, group_id);
        if spec.group_seed.is_inactive() {
            return Ok(BatchReport::skipped(label, spec.group_seed, SkipReason::InactiveSeed));
        }

        let draws = walk_massive_outbreak(spec.group_seed, total, bonus.map(|_| bonus_total));
        self.resolve_batch(spec, label, &draws, main_table, bonus, policy)
    }

    fn distortion(
        &self,
        spec: &SpawnBatchSpec,
        map: HisuiMap,
        group_id: u8,
        policy: &dyn MatchPolicy,
    ) -> Result<BatchReport, SpawnError> {
        let layout = map.distortion_layout();
        let table = self.registry.get(layout.table_for(group_id)?)?;
        let place = layout.label_for(group_id)?;
        let label = format!("{} distortion {} ({})", map, group_id, place);

        if let Some(exclusion) = layout.exclusion(group_id) {
            log::info!("{}: skipped, {}", label, exclusion);
            return Ok(BatchReport::skipped(label, spec.group_seed, SkipReason::Excluded(exclusion)));
        }
        if spec.group_seed.is_inactive() {
            return Ok(BatchReport::skipped(label, spec.group_seed, SkipReason::InactiveSeed));
        }

        let draw = walk_distortion(spec.group_seed);
        let mut report = self.resolve_batch(spec, label, &[draw], table, None, policy)?;
        for record in &mut report.spawns {
            record.location = place.to_string();
        }
        Ok(report)
    }

    /// Resolve table-driven draws into spawn records
    fn resolve_batch(
        &self,
        spec: &SpawnBatchSpec,
        label: String,
        draws: &[SpawnDraw],
        table: &EncounterTable,
        bonus_table: Option<&EncounterTable>,
        policy: &dyn MatchPolicy,
    ) -> Result<BatchReport, SpawnError> {
        let location = label.clone();
        let mut report = BatchReport::new(label, spec.group_seed);
        report.spawns.reserve(draws.len());

        for (index, draw) in draws.iter().enumerate() {
            let table = match (draw.round, bonus_table) {
                (Round::Bonus, Some(bonus)) => bonus,
                _ => table,
            };
            let (value, resolution) = table.resolve_draw(draw.slot_draw)?;
            let entry = resolution.entry;

            let floor = entry
                .flawless_ivs
                .max(if entry.is_alpha { ALPHA_FLAWLESS_IVS } else { 0 })
                .max(spec.flawless_ivs);
            let params = StatParams {
                flawless_ivs: floor,
                shiny_rolls: spec.shiny_rolls,
                gender_ratio: entry.gender_ratio,
                trainer: spec.trainer,
            };

            let mut record = SpawnRecord {
                round: draw.round,
                phase: draw.phase,
                index,
                advance: draw.advance,
                slot_value: Some(value),
                fallback: resolution.fallback,
                location: location.clone(),
                species: entry.species,
                form: entry.form,
                is_alpha: entry.is_alpha,
                outcome: generate_individual(draw.individual_seed, &params),
                matched: false,
            };
            record.matched = policy.is_match(&record);
            log::trace!("#{} {:?}/{:?}: {}", index, draw.round, draw.phase, record);
            report.spawns.push(record);
        }

        Ok(report)
    }
}

/// Convenience: simulate with the built-in tables
pub fn simulate(spec: &SpawnBatchSpec) -> Result<BatchReport, SpawnError> {
    Simulator::builtin().simulate(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GROUP_SEED_BIAS;
    use crate::domain::encounter::{EncounterSlot, DISTORTION_COBALT};
    use crate::domain::location::Exclusion;
    use crate::domain::walker::{GroupSeed, Phase};

    fn batch(event: EventSpec, seed: u64) -> SpawnBatchSpec {
        SpawnBatchSpec::new(event, GroupSeed::from_normalized(seed), 1)
    }

    #[test]
    fn test_outbreak_of_six() {
        let spec = batch(EventSpec::Outbreak { species: 215, total: 6 }, 0x1234);
        let report = simulate(&spec).unwrap();

        assert_eq!(report.len(), 6);
        assert_eq!(
            report.spawns.iter().filter(|s| s.phase == Phase::Guaranteed).count(),
            4
        );
        assert_eq!(
            report.spawns.iter().filter(|s| s.phase == Phase::Respawn).count(),
            2
        );
        assert!(report.spawns.iter().all(|s| s.species == 215 && !s.matched));
    }

    #[test]
    fn test_outbreak_alpha_floor() {
        let spec = batch(EventSpec::Outbreak { species: 215, total: 200 }, 0xFACE);
        let report = simulate(&spec).unwrap();
        for spawn in report.spawns.iter().filter(|s| s.is_alpha) {
            assert!(spawn.outcome.perfect_iv_count() >= 3);
        }
    }

    #[test]
    fn test_inactive_seed_skipped() {
        let spec = SpawnBatchSpec::new(
            EventSpec::Outbreak { species: 215, total: 6 },
            GroupSeed::from_raw(GROUP_SEED_BIAS),
            1,
        );
        let report = simulate(&spec).unwrap();
        assert_eq!(report.skip, Some(SkipReason::InactiveSeed));
        assert!(report.is_empty());
    }

    #[test]
    fn test_massive_outbreak_unknown_table() {
        let spec = batch(
            EventSpec::MassiveOutbreak {
                map: HisuiMap::Obsidian,
                group_id: 0,
                table: TableId(0x1234),
                bonus_table: None,
                total: 8,
                bonus_total: 0,
            },
            1,
        );
        assert_eq!(
            simulate(&spec).unwrap_err(),
            SpawnError::UnknownTable(TableId(0x1234))
        );
    }

    #[test]
    fn test_massive_outbreak_bonus_round() {
        let mut registry = EncounterRegistry::new();
        registry.insert(EncounterTable::new(
            TableId(1),
            vec![
                EncounterSlot::for_species(215, false, 100).unwrap(),
                EncounterSlot::for_species(215, true, 1).unwrap(),
            ],
        ));
        registry.insert(EncounterTable::new(
            TableId(2),
            vec![EncounterSlot::for_species(461, false, 100).unwrap()],
        ));
        registry.insert(EncounterTable::new(TableId(3), vec![]));
        let simulator = Simulator::new(&registry);

        let event = |bonus| EventSpec::MassiveOutbreak {
            map: HisuiMap::Obsidian,
            group_id: 0,
            table: TableId(1),
            bonus_table: bonus,
            total: 10,
            bonus_total: 6,
        };

        let with_bonus = simulator.simulate(&batch(event(Some(TableId(2))), 99)).unwrap();
        assert_eq!(with_bonus.len(), 16);
        assert!(with_bonus.round(Round::Bonus).all(|s| s.species == 461));
        assert!(with_bonus.round(Round::Main).all(|s| s.species == 215));

        // zero-weight bonus table: no bonus round
        let empty_bonus = simulator.simulate(&batch(event(Some(TableId(3))), 99)).unwrap();
        assert_eq!(empty_bonus.len(), 10);
        assert_eq!(empty_bonus.spawns[..], with_bonus.spawns[..10]);
    }

    #[test]
    fn test_distortion_common_spawner_excluded() {
        let spec = batch(
            EventSpec::Distortion {
                map: HisuiMap::Cobalt,
                group_id: 8,
            },
            0x55,
        );
        let report = simulate(&spec).unwrap();
        assert_eq!(report.skip, Some(SkipReason::Excluded(Exclusion::CommonSpawner)));
    }

    #[test]
    fn test_distortion_gapejaw_bog_group_spawns() {
        let spec = batch(
            EventSpec::Distortion {
                map: HisuiMap::Crimson,
                group_id: 24,
            },
            0x55,
        );
        let report = simulate(&spec).unwrap();
        assert_eq!(report.skip, None);
        assert_eq!(report.len(), 1);
        assert_eq!(report.spawns[0].location, "Gapejaw Bog");
    }

    #[test]
    fn test_outbreak_of_species_outside_builtin_tables() {
        // Bidoof appears in no built-in table
        let spec = batch(EventSpec::Outbreak { species: 399, total: 8 }, 0xB1D0);
        let report = simulate(&spec).unwrap();
        assert_eq!(report.len(), 8);
        assert!(report.spawns.iter().all(|s| s.species == 399));
        assert!(report.label.contains("Bidoof"));
    }

    #[test]
    fn test_distortion_single_spawn() {
        let spec = batch(
            EventSpec::Distortion {
                map: HisuiMap::Cobalt,
                group_id: 6,
            },
            0x55,
        );
        let report = simulate(&spec).unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.spawns[0].location, "Aipom Hill");

        let table = EncounterRegistry::builtin().get(DISTORTION_COBALT).unwrap();
        assert!(table.entries.iter().any(|e| e.species == report.spawns[0].species));
    }

    #[test]
    fn test_distortion_group_out_of_range() {
        let spec = batch(
            EventSpec::Distortion {
                map: HisuiMap::Obsidian,
                group_id: 40,
            },
            0x55,
        );
        assert!(matches!(
            simulate(&spec),
            Err(SpawnError::UnsupportedConfiguration(_))
        ));
    }

    #[test]
    fn test_static_alpha_bounded_by_advances() {
        let spec = batch(
            EventSpec::StaticAlpha {
                map: HisuiMap::Obsidian,
                spawner_id: 1,
                initial_spawn: true,
                static_alpha: true,
                max_advances: 25,
            },
            0xABCDEF,
        );
        let report = simulate(&spec).unwrap();
        assert_eq!(report.len(), 25);
        assert!(report.spawns.iter().all(|s| s.species == 143 && s.is_alpha));
        assert!(report.spawns.iter().all(|s| s.outcome.perfect_iv_count() >= 3));
        assert!(report.label.starts_with("Snorlax"));
    }

    #[test]
    fn test_static_alpha_stops_at_max_hits() {
        let spec = batch(
            EventSpec::StaticAlpha {
                map: HisuiMap::Obsidian,
                spawner_id: 1,
                initial_spawn: true,
                static_alpha: true,
                max_advances: 100,
            },
            0xABCDEF,
        );
        let every_other = |r: &SpawnRecord| r.advance % 2 == 1;
        let report = Simulator::builtin().simulate_with(&spec, &every_other).unwrap();

        assert_eq!(report.hits().count(), 3);
        assert_eq!(report.len(), 6);
        assert!(report.spawns.last().unwrap().matched);
    }
}
