//! Individual stat generation
//!
//! Turns one individual seed into encryption constant, PID, shininess, IVs,
//! nature and gender.

use crate::constants::{
    GENDER_DRAW_RANGE, IV_COUNT, MAX_IV, NATURE_COUNT, RATIO_FEMALE_ONLY, RATIO_GENDERLESS,
    RATIO_MALE_ONLY, SHINY_XOR_THRESHOLD,
};
use crate::domain::xoroshiro::Xoroshiro128Plus;
use serde::Deserialize;
use std::fmt;

/// Nature names, indexed by nature id
pub const NATURE_NAMES: [&str; 25] = [
    "Hardy", "Lonely", "Brave", "Adamant", "Naughty", "Bold", "Docile", "Relaxed", "Impish",
    "Lax", "Timid", "Hasty", "Serious", "Jolly", "Naive", "Modest", "Mild", "Quiet", "Bashful",
    "Rash", "Calm", "Gentle", "Sassy", "Careful", "Quirky",
];

/// Index of the speed IV in generation order (HP/Atk/Def/Spe/SpA/SpD)
const SPEED_GENERATION_INDEX: usize = 3;

/// Trainer identity that shininess is measured against
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct TrainerId {
    pub tid: u16,
    pub sid: u16,
}

impl TrainerId {
    pub fn new(tid: u16, sid: u16) -> Self {
        Self { tid, sid }
    }

    /// XOR distance between a PID and this trainer
    #[inline]
    pub fn shiny_xor(&self, pid: u32) -> u32 {
        (pid >> 16) ^ (pid & 0xFFFF) ^ self.tid as u32 ^ self.sid as u32
    }
}

/// Shiny classification
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ShinyKind {
    #[default]
    None,
    /// XOR distance 1-15
    Star,
    /// XOR distance 0
    Square,
}

impl ShinyKind {
    /// Classify an XOR distance
    pub fn from_xor(xor: u32) -> Self {
        if xor == 0 {
            Self::Square
        } else if xor < SHINY_XOR_THRESHOLD {
            Self::Star
        } else {
            Self::None
        }
    }

    pub fn is_shiny(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for ShinyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "Not shiny"),
            Self::Star => write!(f, "Star"),
            Self::Square => write!(f, "Square"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    Genderless,
}

impl Gender {
    /// Resolve gender from a ratio threshold, drawing only for mixed-gender species
    pub fn generate(rng: &mut Xoroshiro128Plus, ratio: u8) -> Self {
        match ratio {
            RATIO_GENDERLESS => Self::Genderless,
            RATIO_FEMALE_ONLY => Self::Female,
            RATIO_MALE_ONLY => Self::Male,
            _ => {
                if rng.next_below(GENDER_DRAW_RANGE) + 1 < ratio as u64 {
                    Self::Female
                } else {
                    Self::Male
                }
            }
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => write!(f, "M"),
            Self::Female => write!(f, "F"),
            Self::Genderless => write!(f, "-"),
        }
    }
}

/// Generation parameters for one individual
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatParams {
    /// Number of IVs forced to 31
    pub flawless_ivs: u8,
    /// Number of PID rolls (at least one is always made)
    pub shiny_rolls: u32,
    /// Gender-ratio threshold of the species
    pub gender_ratio: u8,
    pub trainer: TrainerId,
}

/// Stats derived from an individual seed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IndividualStats {
    /// The seed the stats were generated from
    pub seed: u64,
    pub encryption_constant: u32,
    pub pid: u32,
    pub shiny: ShinyKind,
    /// HP/Atk/Def/SpA/SpD/Spe
    pub ivs: [u8; IV_COUNT],
    pub nature: u8,
    pub gender: Gender,
}

impl IndividualStats {
    pub fn nature_name(&self) -> &'static str {
        NATURE_NAMES[self.nature as usize % NATURE_NAMES.len()]
    }

    /// Number of IVs equal to 31
    pub fn perfect_iv_count(&self) -> usize {
        self.ivs.iter().filter(|&&iv| iv == MAX_IV).count()
    }
}

/// Generate the stats for one individual seed
pub fn generate_individual(seed: u64, params: &StatParams) -> IndividualStats {
    let mut rng = Xoroshiro128Plus::new(seed);

    let encryption_constant = rng.next_u32();

    let mut pid = 0;
    let mut shiny = ShinyKind::None;
    for _ in 0..params.shiny_rolls.max(1) {
        pid = rng.next_u32();
        shiny = ShinyKind::from_xor(params.trainer.shiny_xor(pid));
        if shiny.is_shiny() {
            break;
        }
    }

    let ivs = reorder_speed_last(generate_ivs(&mut rng, params.flawless_ivs));
    let nature = rng.next_below(NATURE_COUNT) as u8;
    let gender = Gender::generate(&mut rng, params.gender_ratio);

    IndividualStats {
        seed,
        encryption_constant,
        pid,
        shiny,
        ivs,
        nature,
        gender,
    }
}

/// Draw IVs in generation order
///
/// `flawless` distinct slots are picked first by slot index only; the remaining
/// slots are filled in order.
fn generate_ivs(rng: &mut Xoroshiro128Plus, flawless: u8) -> [u8; IV_COUNT] {
    let mut ivs: [Option<u8>; IV_COUNT] = [None; IV_COUNT];

    let flawless = (flawless as usize).min(IV_COUNT);
    let mut assigned = 0;
    while assigned < flawless {
        let index = rng.next_below(IV_COUNT as u64) as usize;
        if ivs[index].is_none() {
            ivs[index] = Some(MAX_IV);
            assigned += 1;
        }
    }

    std::array::from_fn(|i| match ivs[i] {
        Some(iv) => iv,
        None => rng.next_below(MAX_IV as u64 + 1) as u8,
    })
}

/// Move speed from generation position to the end
pub fn reorder_speed_last(ivs: [u8; IV_COUNT]) -> [u8; IV_COUNT] {
    let mut out = ivs;
    out[SPEED_GENERATION_INDEX..].rotate_left(1);
    out
}
