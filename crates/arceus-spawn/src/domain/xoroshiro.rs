//! Xoroshiro128+ random number generator
//!
//! The generator used by every spawner in the game. A single seed always forms the
//! state `(seed, 0)`; re-seeding from a draw throws away the second word.

/// Xoroshiro128+ state pair
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Xoroshiro128Plus {
    s0: u64,
    s1: u64,
}

impl Xoroshiro128Plus {
    /// Create a generator from a single 64-bit seed
    pub fn new(seed: u64) -> Self {
        Self { s0: seed, s1: 0 }
    }

    /// Create a generator from an explicit state pair
    pub fn from_state(s0: u64, s1: u64) -> Self {
        Self { s0, s1 }
    }

    /// Current state pair
    pub fn state(&self) -> (u64, u64) {
        (self.s0, self.s1)
    }

    /// Generate the next 64-bit value
    #[inline]
    pub fn next(&mut self) -> u64 {
        let s0 = self.s0;
        let mut s1 = self.s1;
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.s0 = s0.rotate_left(24) ^ s1 ^ (s1 << 16);
        self.s1 = s1.rotate_left(37);

        result
    }

    /// Low 32 bits of the next draw
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.next() as u32
    }

    /// Next draw reduced modulo `bound`
    #[inline]
    pub fn next_below(&mut self, bound: u64) -> u64 {
        debug_assert!(bound > 0);
        self.next() % bound
    }

    /// Replace this generator with one seeded from its own next draw
    #[inline]
    pub fn reseed(&mut self) {
        *self = Self::new(self.next());
    }
}
