//! Memory scanners
//!
//! Read every active spawner or outbreak group through a `MemoryChannel`, build the
//! batch specs and simulate them. Memory reads are sequential; simulation runs in
//! parallel across batches.

use crate::app::hunt::MatchPolicy;
use crate::app::report::BatchReport;
use crate::app::simulator::Simulator;
use crate::config::HuntConfig;
use crate::domain::event::{EventSpec, SpawnBatchSpec};
use crate::domain::location::HisuiMap;
use crate::domain::species::species_name;
use crate::error::SpawnError;
use crate::infra::channel::{
    read_group_seed, read_massive_outbreak_block, read_outbreak_block, MemoryChannel,
    PointerChain,
};
use crate::infra::records::{parse_massive_outbreaks, parse_outbreaks};
use rayon::prelude::*;

/// Result of a scan over many batches
#[derive(Clone, Debug, Default)]
pub struct ScanReport {
    pub reports: Vec<BatchReport>,
    /// Batches that could not be simulated, with their label
    pub failures: Vec<(String, SpawnError)>,
}

impl ScanReport {
    /// Total matched spawns across all batches
    pub fn hit_count(&self) -> usize {
        self.reports.iter().map(|r| r.hits().count()).sum()
    }

    /// Reports with at least one matched spawn
    pub fn with_hits(&self) -> impl Iterator<Item = &BatchReport> {
        self.reports.iter().filter(|r| r.hits().next().is_some())
    }
}

/// Simulate labelled specs in parallel, keeping input order
fn simulate_all(
    simulator: &Simulator<'_>,
    specs: Vec<(String, SpawnBatchSpec)>,
    policy: &(dyn MatchPolicy + Sync),
) -> ScanReport {
    let results: Vec<(String, Result<BatchReport, SpawnError>)> = specs
        .into_par_iter()
        .map(|(label, spec)| {
            let result = simulator.simulate_with(&spec, policy);
            (label, result)
        })
        .collect();

    let mut scan = ScanReport::default();
    for (label, result) in results {
        match result {
            Ok(report) => scan.reports.push(report),
            Err(e) => {
                log::warn!("{}: {}", label, e);
                scan.failures.push((label, e));
            }
        }
    }
    log::info!(
        "Simulated {} batches ({} failed, {} hits)",
        scan.reports.len(),
        scan.failures.len(),
        scan.hit_count()
    );
    scan
}

/// Scan every static alpha spawner on the configured map
pub fn scan_static_spawners<C: MemoryChannel>(
    channel: &C,
    simulator: &Simulator<'_>,
    config: &HuntConfig,
    policy: &(dyn MatchPolicy + Sync),
) -> Result<ScanReport, SpawnError> {
    let settings = &config.static_alpha;
    let layout = settings.location.static_layout();
    log::info!(
        "Scanning {} static spawners in {}",
        layout.spawner_count(),
        settings.location
    );

    let mut specs = Vec::with_capacity(layout.spawner_count());
    for spawner_id in 0..layout.spawner_count() {
        let group_seed = read_group_seed(channel, &PointerChain::static_seed(spawner_id))?;
        let event = EventSpec::StaticAlpha {
            map: settings.location,
            spawner_id,
            initial_spawn: settings.initial_spawn,
            static_alpha: settings.static_alpha,
            max_advances: settings.max_advances,
        };
        let spec = SpawnBatchSpec::new(event, group_seed, settings.shiny_rolls)
            .with_trainer(config.trainer);
        specs.push((format!("static spawner {}", spawner_id), spec));
    }

    Ok(simulate_all(simulator, specs, policy))
}

/// Scan every distortion spawner group on the configured map
///
/// Stops reading further groups once the policy's hit budget is spent.
pub fn scan_distortions<C: MemoryChannel>(
    channel: &C,
    simulator: &Simulator<'_>,
    config: &HuntConfig,
    policy: &(dyn MatchPolicy + Sync),
) -> Result<ScanReport, SpawnError> {
    let settings = &config.distortion;
    let layout = settings.location.distortion_layout();
    log::info!("Scanning {} distortion groups in {}", layout.group_count, settings.location);

    let mut scan = ScanReport::default();
    let mut hits = 0;
    for group_id in layout.groups() {
        let label = format!("distortion group {}", group_id);
        let event = EventSpec::Distortion {
            map: settings.location,
            group_id,
        };
        if layout.exclusion(group_id).is_some() {
            // excluded spawners need no memory read
            let spec = SpawnBatchSpec::new(event, Default::default(), settings.shiny_rolls);
            scan.reports.push(simulator.simulate_with(&spec, policy)?);
            continue;
        }

        let group_seed =
            read_group_seed(channel, &PointerChain::distortion_seed(settings.location, group_id))?;
        let spec = SpawnBatchSpec::new(event, group_seed, settings.shiny_rolls)
            .with_trainer(config.trainer);
        match simulator.simulate_with(&spec, policy) {
            Ok(report) => {
                hits += report.hits().count();
                scan.reports.push(report);
            }
            Err(e) => {
                log::warn!("{}: {}", label, e);
                scan.failures.push((label, e));
            }
        }

        if hits >= policy.max_hits() {
            log::info!("Stopping distortion scan after {} hits", hits);
            break;
        }
    }

    Ok(scan)
}

/// Scan the standalone outbreak block
pub fn scan_outbreaks<C: MemoryChannel>(
    channel: &C,
    simulator: &Simulator<'_>,
    config: &HuntConfig,
    policy: &(dyn MatchPolicy + Sync),
) -> Result<ScanReport, SpawnError> {
    let block = read_outbreak_block(channel)?;
    let records = parse_outbreaks(&block)?;
    log::info!("Found {} active outbreaks", records.len());

    let specs = records
        .into_iter()
        .map(|record| {
            let event = EventSpec::Outbreak {
                species: record.species,
                total: record.spawn_count as usize,
            };
            let spec = SpawnBatchSpec::new(event, record.group_seed, config.outbreak.outbreak_rolls)
                .with_trainer(config.trainer);
            (
                format!("outbreak {} ({})", record.slot, species_name(record.species)),
                spec,
            )
        })
        .collect();

    Ok(simulate_all(simulator, specs, policy))
}

/// Scan the massive outbreak block, optionally restricted to one map
pub fn scan_massive_outbreaks<C: MemoryChannel>(
    channel: &C,
    simulator: &Simulator<'_>,
    config: &HuntConfig,
    map: Option<HisuiMap>,
    policy: &(dyn MatchPolicy + Sync),
) -> Result<ScanReport, SpawnError> {
    let block = read_massive_outbreak_block(channel)?;
    let groups = parse_massive_outbreaks(&block)?;

    let specs: Vec<_> = groups
        .into_iter()
        .filter(|g| map.is_none_or(|m| m == g.map))
        .map(|group| {
            let event = EventSpec::MassiveOutbreak {
                map: group.map,
                group_id: group.group_id,
                table: group.table,
                bonus_table: group.bonus_table(),
                total: group.spawn_count as usize,
                bonus_total: group.bonus_count as usize,
            };
            let spec = SpawnBatchSpec::new(event, group.group_seed, config.outbreak.massive_rolls)
                .with_trainer(config.trainer);
            (
                format!(
                    "{} group {} ({})",
                    group.map,
                    group.group_id,
                    species_name(group.species)
                ),
                spec,
            )
        })
        .collect();
    log::info!("Found {} massive outbreak groups", specs.len());

    Ok(simulate_all(simulator, specs, policy))
}
