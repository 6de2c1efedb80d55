//! Random layer assignment for new points.

/// Hard cap on generated levels.
const MAX_LEVEL: u32 = 16;

/// Random level generator for HNSW.
///
/// Samples `floor(−ln(U) · ml)` with `U` uniform on `(0, 1]`, giving the
/// geometric layer distribution from the HNSW paper: most points land in
/// layer 0, each higher layer holds an exponentially shrinking share.
pub(crate) struct LevelGenerator {
    ml: f64,
    rng_state: u64,
}

impl LevelGenerator {
    #[allow(clippy::cast_possible_truncation)] // nanos truncation is fine for seeding
    pub(crate) fn new(ml: f64) -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(12345);
        Self::with_seed(ml, seed)
    }

    pub(crate) fn with_seed(ml: f64, seed: u64) -> Self {
        // xorshift64 requires a nonzero state
        Self { ml, rng_state: seed.max(1) }
    }

    /// Generate a random level for a new point.
    #[allow(clippy::cast_possible_truncation)] // level is bounded by MAX_LEVEL
    #[allow(clippy::cast_sign_loss)] // level is non-negative after floor
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn next_level(&mut self) -> u32 {
        // xorshift64 PRNG
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.rng_state = x;

        // Uniform on (0, 1]: 53 high bits, shifted into the half-open range
        let uniform = ((x >> 11) + 1) as f64 / (1u64 << 53) as f64;

        let level = (-uniform.ln() * self.ml).floor() as u32;
        level.min(MAX_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_bounded() {
        let mut gen = LevelGenerator::with_seed(1.0 / 2.0_f64.ln(), 7);
        for _ in 0..10_000 {
            assert!(gen.next_level() <= MAX_LEVEL);
        }
    }

    #[test]
    fn most_points_land_in_layer_zero() {
        let mut gen = LevelGenerator::with_seed(1.0 / 16.0_f64.ln(), 42);
        let levels: Vec<u32> = (0..1000).map(|_| gen.next_level()).collect();

        let at_zero = levels.iter().filter(|&&l| l == 0).count();
        let above = levels.len() - at_zero;

        // With ml = 1/ln(16), P(level >= 1) = 1/16
        assert!(at_zero > 800, "expected most levels at 0, got {at_zero}");
        assert!(above > 10, "expected some levels above 0, got {above}");
    }

    #[test]
    fn seeded_generators_are_deterministic() {
        let mut a = LevelGenerator::with_seed(0.5, 99);
        let mut b = LevelGenerator::with_seed(0.5, 99);
        for _ in 0..100 {
            assert_eq!(a.next_level(), b.next_level());
        }
    }

    #[test]
    fn zero_seed_is_fixed_up() {
        let mut gen = LevelGenerator::with_seed(0.5, 0);
        // A zero xorshift state would be stuck; the constructor avoids it
        let levels: Vec<u32> = (0..10).map(|_| gen.next_level()).collect();
        assert!(levels.len() == 10);
    }
}
