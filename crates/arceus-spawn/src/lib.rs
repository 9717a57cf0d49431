//! arceus-spawn - Spawn prediction for Pokemon Legends: Arceus
//!
//! This crate provides functionality to:
//! - Reproduce the Xoroshiro128+ seed-derivation chain of every spawner type
//! - Resolve encounter slots against weighted tables
//! - Generate individual stats (shininess, IVs, nature, gender) from a seed
//! - Read spawner seeds and outbreak records through a memory channel

pub mod app;
pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod infra;

// Re-export commonly used types
pub use app::hunt::{HuntFilter, MatchPolicy};
pub use app::report::{BatchReport, SkipReason, SpawnRecord};
pub use app::simulator::Simulator;
pub use config::HuntConfig;
pub use constants::*;
pub use domain::encounter::{EncounterRegistry, EncounterSlot, EncounterTable, TableId};
pub use domain::event::{EventSpec, SpawnBatchSpec};
pub use domain::individual::{IndividualStats, ShinyKind, TrainerId};
pub use domain::location::HisuiMap;
pub use domain::walker::GroupSeed;
pub use domain::xoroshiro::Xoroshiro128Plus;
pub use error::SpawnError;
