//! Seed derivation walks
//!
//! Each event type walks the group → spawner → generator → individual chain in a
//! fixed pattern. Walkers only produce draws; table resolution and stat generation
//! happen in the simulators.

use crate::constants::{GROUP_SEED_BIAS, GUARANTEED_SLOTS};
use crate::domain::xoroshiro::Xoroshiro128Plus;
use crate::error::SpawnError;
use std::str::FromStr;

/// Normalized group seed
///
/// Built from the raw value read from memory by subtracting the bias once.
/// The default is the raw zero "no active group" sentinel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GroupSeed {
    raw: u64,
}

impl GroupSeed {
    /// Normalize a raw group seed
    pub fn from_raw(raw: u64) -> Self {
        Self { raw }
    }

    /// Build from an already-normalized seed
    pub fn from_normalized(seed: u64) -> Self {
        Self {
            raw: seed.wrapping_add(GROUP_SEED_BIAS),
        }
    }

    /// Seed the walker starts from
    pub fn value(&self) -> u64 {
        self.raw.wrapping_sub(GROUP_SEED_BIAS)
    }

    /// The value as stored in memory
    pub fn raw(&self) -> u64 {
        self.raw
    }

    /// Slot holds no active group
    pub fn is_inactive(&self) -> bool {
        self.raw == 0 || self.value() == 0
    }
}

impl FromStr for GroupSeed {
    type Err = SpawnError;

    /// Parse a raw seed as hexadecimal, with or without a `0x` prefix
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        u64::from_str_radix(digits, 16)
            .map(Self::from_raw)
            .map_err(|e| SpawnError::unsupported(format!("invalid seed '{}': {}", s, e)))
    }
}

/// Which round of a spawn group a draw belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Round {
    Main,
    Bonus,
}

/// Which sub-chain of a round a draw belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Initial spawns drawn directly from the group generator
    Guaranteed,
    /// Overflow spawns drawn from the respawn chain
    Respawn,
    /// Single-chain spawners (static alphas, distortions)
    Single,
}

/// One spawner draw: the encounter slot draw and the individual seed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnDraw {
    pub round: Round,
    pub phase: Phase,
    /// Position within the round (or advance count for static spawners)
    pub advance: usize,
    /// Raw draw used for the encounter slot
    pub slot_draw: u64,
    /// Seed handed to the stat generator
    pub individual_seed: u64,
}

/// Derive the slot draw and individual seed from a spawner seed
#[inline]
fn spawner_draw(spawner_seed: u64) -> (u64, u64) {
    let mut rng = Xoroshiro128Plus::new(spawner_seed);
    let slot_draw = rng.next();
    let individual_seed = rng.next();
    (slot_draw, individual_seed)
}

/// Walk one outbreak round
///
/// Returns the draws and the respawn generator left at the end of the round.
fn walk_round(
    seed: u64,
    count: usize,
    round: Round,
    draws: &mut Vec<SpawnDraw>,
) -> Xoroshiro128Plus {
    let mut main = Xoroshiro128Plus::new(seed);
    let guaranteed = count.min(GUARANTEED_SLOTS);

    // The group generator always cycles through every guaranteed slot, even when
    // the round holds fewer spawns; only the first `count` are emitted.
    for advance in 0..GUARANTEED_SLOTS {
        let spawner_seed = main.next();
        main.next();
        if advance >= guaranteed {
            continue;
        }
        let (slot_draw, individual_seed) = spawner_draw(spawner_seed);
        draws.push(SpawnDraw {
            round,
            phase: Phase::Guaranteed,
            advance,
            slot_draw,
            individual_seed,
        });
    }

    let mut respawn = Xoroshiro128Plus::new(main.next());
    for advance in guaranteed..count {
        let spawner_seed = respawn.next();
        respawn.next();
        respawn.reseed();
        let (slot_draw, individual_seed) = spawner_draw(spawner_seed);
        draws.push(SpawnDraw {
            round,
            phase: Phase::Respawn,
            advance,
            slot_draw,
            individual_seed,
        });
    }

    log::trace!(
        "{:?} round: {} guaranteed, {} respawn",
        round,
        guaranteed,
        count - guaranteed
    );
    respawn
}

/// Walk a standalone outbreak of `total` spawns
pub fn walk_outbreak(group: GroupSeed, total: usize) -> Vec<SpawnDraw> {
    let mut draws = Vec::with_capacity(total);
    walk_round(group.value(), total, Round::Main, &mut draws);
    draws
}

/// Walk a massive outbreak group
///
/// `bonus` is the size of the bonus round, or `None` when the bonus table carries no
/// weight. The bonus round is seeded from the last respawn generator, bias removed.
pub fn walk_massive_outbreak(
    group: GroupSeed,
    total: usize,
    bonus: Option<usize>,
) -> Vec<SpawnDraw> {
    let mut draws = Vec::with_capacity(total + bonus.unwrap_or(0));
    let mut respawn = walk_round(group.value(), total, Round::Main, &mut draws);

    if let Some(bonus_count) = bonus {
        let bonus_seed = respawn.next().wrapping_sub(GROUP_SEED_BIAS);
        log::debug!("bonus round seed 0x{:016X}, {} spawns", bonus_seed, bonus_count);
        walk_round(bonus_seed, bonus_count, Round::Bonus, &mut draws);
    }

    draws
}

/// Walk a distortion spawner: one draw chain per group
pub fn walk_distortion(group: GroupSeed) -> SpawnDraw {
    let mut main = Xoroshiro128Plus::new(group.value());
    let (slot_draw, individual_seed) = spawner_draw(main.next());
    SpawnDraw {
        round: Round::Main,
        phase: Phase::Single,
        advance: 0,
        slot_draw,
        individual_seed,
    }
}

/// Successive respawns of a static spawner, one per advance
///
/// Unbounded; callers bound it with `take` or an early-stop policy.
#[derive(Clone, Debug)]
pub struct StaticSpawnerWalk {
    main: Xoroshiro128Plus,
    advance: usize,
}

impl StaticSpawnerWalk {
    /// Start a walk
    ///
    /// A spawner that is not on its initial spawn has already consumed one
    /// respawn cycle: two draws are discarded and the generator is reseeded.
    pub fn new(group: GroupSeed, initial_spawn: bool) -> Self {
        let mut main = Xoroshiro128Plus::new(group.value());
        if !initial_spawn {
            main.next();
            main.next();
            main.reseed();
        }
        Self { main, advance: 0 }
    }
}

impl Iterator for StaticSpawnerWalk {
    type Item = SpawnDraw;

    fn next(&mut self) -> Option<SpawnDraw> {
        let generator_seed = self.main.next();
        self.main.next();
        let (slot_draw, individual_seed) = spawner_draw(generator_seed);
        self.main.reseed();

        let draw = SpawnDraw {
            round: Round::Main,
            phase: Phase::Single,
            advance: self.advance,
            slot_draw,
            individual_seed,
        };
        self.advance += 1;
        Some(draw)
    }
}
