//! Deterministic battle randomness.
//!
//! A minimal 32-bit xorshift generator. Every random decision inside one
//! battle resolution flows through a single instance of this type, so a
//! fixed seed replays the exact same fight. The seeding rule maps 0 to 1
//! because an all-zero xorshift state never leaves zero.

/// Seedable xorshift32 generator owned by one battle resolution.
#[derive(Debug, Clone)]
pub struct BattleRng {
    state: u32,
}

impl BattleRng {
    pub fn new(seed: u32) -> Self {
        BattleRng {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform draw in `[0.0, 1.0]`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / f64::from(u32::MAX)
    }

    /// Uniform index into a non-empty slice of length `len`.
    pub fn pick_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        // next_f64 can return exactly 1.0; keep the index in bounds.
        ((self.next_f64() * len as f64) as usize).min(len.saturating_sub(1))
    }
}
