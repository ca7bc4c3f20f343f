//! RNG trait abstraction for placement and tick decisions
//!
//! Every algorithm takes its random source as a parameter, so callers decide:
//! - a seeded RNG for reproducible generation and tests
//! - a per-position RNG derived from the pass seed (see `TickPass`)
//! - the host's own generator on the world thread

/// Random number generator trait for placement and tick decisions
pub trait WorldRng {
    /// Generate random f32 in [0.0, 1.0)
    fn gen_f32(&mut self) -> f32;

    /// Generate random integer in [0, bound); 0 when `bound` is 0
    fn gen_index(&mut self, bound: u32) -> u32;

    /// Check if random value is less than probability threshold
    fn check_probability(&mut self, probability: f32) -> bool {
        self.gen_f32() < probability
    }

    /// Random offset in [-radius, radius], radius capped at `i32::MAX`
    fn gen_offset(&mut self, radius: u32) -> i32 {
        let radius = radius.min(i32::MAX as u32);
        (i64::from(self.gen_index(radius * 2 + 1)) - i64::from(radius)) as i32
    }
}

// Blanket implementation for any type implementing rand::Rng
impl<T: ?Sized + rand::Rng> WorldRng for T {
    fn gen_f32(&mut self) -> f32 {
        rand::Rng::r#gen(self)
    }

    fn gen_index(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        rand::Rng::gen_range(self, 0..bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn test_world_rng_gen_f32() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(12345);

        for _ in 0..100 {
            let val = rng.gen_f32();
            assert!(val >= 0.0);
            assert!(val < 1.0);
        }
    }

    #[test]
    fn test_world_rng_gen_index_in_bounds() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(12345);

        let mut seen = [false; 5];
        for _ in 0..200 {
            let val = rng.gen_index(5);
            assert!(val < 5);
            seen[val as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));

        assert_eq!(rng.gen_index(0), 0);
    }

    #[test]
    fn test_world_rng_gen_offset() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(7);

        let mut min = i32::MAX;
        let mut max = i32::MIN;
        for _ in 0..500 {
            let offset = rng.gen_offset(2);
            min = min.min(offset);
            max = max.max(offset);
        }
        assert_eq!((min, max), (-2, 2));
        assert_eq!(rng.gen_offset(0), 0);
    }

    #[test]
    fn test_world_rng_gen_offset_huge_radius() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(7);

        let mut saw_negative = false;
        let mut saw_positive = false;
        for _ in 0..100 {
            let offset = rng.gen_offset(u32::MAX);
            saw_negative |= offset < 0;
            saw_positive |= offset > 0;
            assert!(offset >= -i32::MAX);
        }
        assert!(saw_negative && saw_positive);
    }

    #[test]
    fn test_world_rng_check_probability_always_true() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(12345);

        // With probability 1.0, should always return true
        for _ in 0..100 {
            assert!(rng.check_probability(1.0));
        }
    }

    #[test]
    fn test_world_rng_check_probability_always_false() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(12345);

        // With probability 0.0, should always return false
        for _ in 0..100 {
            assert!(!rng.check_probability(0.0));
        }
    }

    #[test]
    fn test_world_rng_deterministic() {
        let mut rng1 = Xoshiro256StarStar::seed_from_u64(42);
        let mut rng2 = Xoshiro256StarStar::seed_from_u64(42);

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(rng1.gen_index(1000), rng2.gen_index(1000));
        }

        let mut rng3 = Xoshiro256StarStar::seed_from_u64(42);
        let mut rng4 = Xoshiro256StarStar::seed_from_u64(42);

        for _ in 0..100 {
            assert_eq!(rng3.gen_f32(), rng4.gen_f32());
        }
    }
}
