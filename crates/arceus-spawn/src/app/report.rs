//! Batch simulation results

use crate::domain::individual::IndividualStats;
use crate::domain::location::Exclusion;
use crate::domain::species::species_name;
use crate::domain::walker::{GroupSeed, Phase, Round};
use std::fmt;

/// One predicted spawn
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnRecord {
    pub round: Round,
    pub phase: Phase,
    /// Position in the batch
    pub index: usize,
    /// Position in the round, or the advance count for static spawners
    pub advance: usize,
    /// Scaled slot value; `None` when the spawner has no encounter table
    pub slot_value: Option<f64>,
    /// Slot value reached the table's total weight and was clamped
    pub fallback: bool,
    pub location: String,
    pub species: u16,
    pub form: u8,
    pub is_alpha: bool,
    pub outcome: IndividualStats,
    pub matched: bool,
}

impl SpawnRecord {
    pub fn species_name(&self) -> String {
        species_name(self.species)
    }
}

impl fmt::Display for SpawnRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = &self.outcome;
        write!(
            f,
            "{}{}{} | {} | EC {:08X} PID {:08X} | IVs {}/{}/{}/{}/{}/{} | {} | {} | seed {:016X}",
            if self.is_alpha { "Alpha " } else { "" },
            self.species_name(),
            if self.form != 0 { format!("-{}", self.form) } else { String::new() },
            o.shiny,
            o.encryption_constant,
            o.pid,
            o.ivs[0],
            o.ivs[1],
            o.ivs[2],
            o.ivs[3],
            o.ivs[4],
            o.ivs[5],
            o.nature_name(),
            o.gender,
            o.seed,
        )
    }
}

/// Why a batch produced no spawns
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Group seed is the "no active group" sentinel
    InactiveSeed,
    /// Spawner is never simulated
    Excluded(Exclusion),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InactiveSeed => write!(f, "no active group"),
            Self::Excluded(reason) => write!(f, "excluded ({})", reason),
        }
    }
}

/// Predicted outcome of one spawn batch
#[derive(Clone, Debug, PartialEq)]
pub struct BatchReport {
    pub label: String,
    pub group_seed: GroupSeed,
    pub spawns: Vec<SpawnRecord>,
    pub skip: Option<SkipReason>,
}

impl BatchReport {
    pub fn new(label: impl Into<String>, group_seed: GroupSeed) -> Self {
        Self {
            label: label.into(),
            group_seed,
            spawns: Vec::new(),
            skip: None,
        }
    }

    pub fn skipped(label: impl Into<String>, group_seed: GroupSeed, reason: SkipReason) -> Self {
        Self {
            skip: Some(reason),
            ..Self::new(label, group_seed)
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.skip.is_some()
    }

    pub fn len(&self) -> usize {
        self.spawns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spawns.is_empty()
    }

    /// Spawns accepted by the match policy
    pub fn hits(&self) -> impl Iterator<Item = &SpawnRecord> {
        self.spawns.iter().filter(|s| s.matched)
    }

    pub fn shinies(&self) -> impl Iterator<Item = &SpawnRecord> {
        self.spawns.iter().filter(|s| s.outcome.shiny.is_shiny())
    }

    /// Spawns of one round
    pub fn round(&self, round: Round) -> impl Iterator<Item = &SpawnRecord> {
        self.spawns.iter().filter(move |s| s.round == round)
    }
}
