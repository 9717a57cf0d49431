//! Spawn batch descriptions

use crate::domain::encounter::TableId;
use crate::domain::individual::TrainerId;
use crate::domain::location::HisuiMap;
use crate::domain::walker::GroupSeed;

/// Event type with its location and table parameters
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventSpec {
    /// Fixed alpha spawner walked one respawn at a time
    StaticAlpha {
        map: HisuiMap,
        spawner_id: usize,
        /// Spawner has not respawned yet
        initial_spawn: bool,
        /// The spawn is the spawner's alpha (flawless floor 3)
        static_alpha: bool,
        max_advances: u32,
    },
    /// Standalone outbreak of one species
    Outbreak { species: u16, total: usize },
    /// Massive outbreak group with an optional bonus round
    MassiveOutbreak {
        map: HisuiMap,
        group_id: usize,
        table: TableId,
        bonus_table: Option<TableId>,
        total: usize,
        bonus_total: usize,
    },
    /// Space-time distortion spawner group
    Distortion { map: HisuiMap, group_id: u8 },
}

impl EventSpec {
    /// Short name of the event type
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StaticAlpha { .. } => "static alpha",
            Self::Outbreak { .. } => "outbreak",
            Self::MassiveOutbreak { .. } => "massive outbreak",
            Self::Distortion { .. } => "distortion",
        }
    }
}

/// Everything needed to simulate one spawn batch
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnBatchSpec {
    pub event: EventSpec,
    pub group_seed: GroupSeed,
    /// PID rolls per individual
    pub shiny_rolls: u32,
    /// Caller-imposed flawless IV floor, combined with the table floor
    pub flawless_ivs: u8,
    pub trainer: TrainerId,
}

impl SpawnBatchSpec {
    pub fn new(event: EventSpec, group_seed: GroupSeed, shiny_rolls: u32) -> Self {
        Self {
            event,
            group_seed,
            shiny_rolls,
            flawless_ivs: 0,
            trainer: TrainerId::default(),
        }
    }

    pub fn with_trainer(mut self, trainer: TrainerId) -> Self {
        self.trainer = trainer;
        self
    }

    pub fn with_flawless_ivs(mut self, flawless_ivs: u8) -> Self {
        self.flawless_ivs = flawless_ivs;
        self
    }
}
