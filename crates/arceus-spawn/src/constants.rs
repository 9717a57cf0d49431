//! Spawn generation constants
//!
//! Note: species and location data live in domain/species.rs and domain/location.rs.

// =============================================================================
// Seed derivation parameters
// =============================================================================

/// Bias between a stored group seed and the seed the walker starts from
///
/// Subtracted once from every raw group seed, and once more from the terminal
/// respawn draw before a bonus round.
pub const GROUP_SEED_BIAS: u64 = 0x82A2_B175_229D_6A5B;

/// Number of guaranteed slots at the head of an outbreak round
pub const GUARANTEED_SLOTS: usize = 4;

/// Scale factor turning a 64-bit draw into a fraction of 1.0
pub const DRAW_SCALE: f64 = 18_446_744_073_709_551_616.0; // 2^64

// =============================================================================
// Individual generation parameters
// =============================================================================

/// Number of individual values per Pokemon
pub const IV_COUNT: usize = 6;

/// Maximum individual value
pub const MAX_IV: u8 = 31;

/// Flawless IV floor applied to alpha spawns
pub const ALPHA_FLAWLESS_IVS: u8 = 3;

/// Number of natures
pub const NATURE_COUNT: u64 = 25;

/// Shiny XOR values below this threshold are shiny
pub const SHINY_XOR_THRESHOLD: u32 = 16;

/// Gender draw range (draw mod 252, plus one)
pub const GENDER_DRAW_RANGE: u64 = 252;

/// Gender ratio threshold: genderless species
pub const RATIO_GENDERLESS: u8 = 255;

/// Gender ratio threshold: female-only species
pub const RATIO_FEMALE_ONLY: u8 = 254;

/// Gender ratio threshold: male-only species
pub const RATIO_MALE_ONLY: u8 = 0;

// =============================================================================
// Outbreak tables
// =============================================================================

/// Weight of the regular entry in a standalone outbreak table
pub const OUTBREAK_REGULAR_RATE: u32 = 100;

/// Weight of the alpha entry in a standalone outbreak table
pub const OUTBREAK_ALPHA_RATE: u32 = 1;

// =============================================================================
// Hunting
// =============================================================================

/// Conventional number of hits after which a scan stops
pub const DEFAULT_MAX_HITS: usize = 3;

/// Default number of advances searched on a static spawner
pub const DEFAULT_MAX_ADVANCES: u32 = 50;

// =============================================================================
// Record layouts (little-endian, fixed by the game)
// =============================================================================

/// Number of standalone outbreak slots
pub const OUTBREAK_SLOT_COUNT: usize = 4;

/// Byte stride of one standalone outbreak slot
pub const OUTBREAK_STRIDE: usize = 80;

/// Size of the standalone outbreak block (0x190)
pub const OUTBREAK_BLOCK_SIZE: usize = OUTBREAK_SLOT_COUNT * OUTBREAK_STRIDE;

pub const OUTBREAK_SPECIES_OFFSET: usize = 0;
pub const OUTBREAK_SEED_OFFSET: usize = 56;
pub const OUTBREAK_COUNT_OFFSET: usize = 64;

/// Number of maps in the massive outbreak block
pub const MMO_MAP_COUNT: usize = 5;

/// Byte stride of one map in the massive outbreak block (0xB80)
pub const MMO_MAP_STRIDE: usize = 2944;

/// Size of the massive outbreak block
pub const MMO_BLOCK_SIZE: usize = MMO_MAP_COUNT * MMO_MAP_STRIDE;

/// Byte stride of one group inside a map
pub const MMO_GROUP_STRIDE: usize = 144;

pub const MMO_AREA_OFFSET: usize = 0;
pub const MMO_COORDS_OFFSET: usize = 16;
pub const MMO_SPECIES_OFFSET: usize = 36;
pub const MMO_TABLE_OFFSET: usize = 72;
pub const MMO_BONUS_TABLE_OFFSET: usize = 80;
pub const MMO_SEED_OFFSET: usize = 104;
pub const MMO_COUNT_OFFSET: usize = 112;
pub const MMO_BONUS_COUNT_OFFSET: usize = 132;

/// Area ids that mark an unused map in the massive outbreak block
pub const MMO_INACTIVE_AREAS: [u16; 2] = [0x0000, 0x2645];

/// Species ids at or above this value terminate a group list
pub const SPECIES_LIMIT: u16 = 906;

// =============================================================================
// File format
// =============================================================================

/// Magic number of an encounter table file
pub const TABLE_MAGIC: [u8; 8] = *b"LAENCTAB";

/// Encounter table file format version
pub const FILE_FORMAT_VERSION: u16 = 1;

/// Byte size of the file header
pub const FILE_HEADER_SIZE: usize = 32;

/// Byte size of a table header inside the file
pub const TABLE_RECORD_HEADER_SIZE: usize = 16;

/// Byte size of one encounter entry
pub const TABLE_ENTRY_SIZE: usize = 12;
