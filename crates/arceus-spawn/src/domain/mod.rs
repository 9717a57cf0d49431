//! Domain layer - Pure computational logic
//!
//! PRNG, seed-derivation walks, encounter tables and stat generation. No I/O.

pub mod encounter;
pub mod event;
pub mod individual;
pub mod location;
pub mod species;
pub mod table_format;
pub mod walker;
pub mod xoroshiro;
