//! Climate-gated tick sampler
//!
//! Decides, once per candidate block per scheduling pass, whether the block
//! gets a state-evolution check at all. Spreads simulation cost over time:
//! a constant probability p gives a geometric wait with mean 1/p passes.

use glam::IVec3;
use serde::{Deserialize, Serialize};
use verdure_content::{ClimateMode, ClimateSample};

use crate::error::ConfigError;
use crate::world::{WorldRng, WorldView};

/// How the per-pass sampling probability is obtained
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ProbabilityPolicy {
    /// Same probability every pass
    Constant(f32),
    /// Probability rising with temperature and falling with rainfall:
    /// `clamp((T - base) / ((reference - base) + coefficient * rainfall), 0, 1)`
    ClimateDerived {
        base_temperature: f32,
        reference_temperature: f32,
        rainfall_coefficient: f32,
    },
}

impl ProbabilityPolicy {
    /// Melt/decay policy: nothing at 0.5 degrees, certain at 15 degrees when dry
    pub const MELT: ProbabilityPolicy = ProbabilityPolicy::ClimateDerived {
        base_temperature: 0.5,
        reference_temperature: 15.0,
        rainfall_coefficient: 10.0,
    };

    pub fn needs_climate(&self) -> bool {
        matches!(self, ProbabilityPolicy::ClimateDerived { .. })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            ProbabilityPolicy::Constant(p) => {
                if !(0.0..=1.0).contains(&p) {
                    return Err(ConfigError::InvalidProbability(p));
                }
            }
            ProbabilityPolicy::ClimateDerived {
                base_temperature,
                reference_temperature,
                rainfall_coefficient,
            } => {
                if !(reference_temperature > base_temperature) {
                    return Err(ConfigError::InvalidClimatePolicy {
                        base: base_temperature,
                        reference: reference_temperature,
                    });
                }
                if !rainfall_coefficient.is_finite() || rainfall_coefficient < 0.0 {
                    return Err(ConfigError::InvalidValue {
                        field: "rainfall_coefficient",
                        reason: format!("{} must be finite and non-negative", rainfall_coefficient),
                    });
                }
            }
        }
        Ok(())
    }

    /// Sampling probability, or `None` when climate is needed but unknown
    pub fn probability(&self, climate: Option<ClimateSample>) -> Option<f32> {
        match *self {
            ProbabilityPolicy::Constant(p) => Some(p),
            ProbabilityPolicy::ClimateDerived {
                base_temperature,
                reference_temperature,
                rainfall_coefficient,
            } => {
                let climate = climate?;
                if climate.temperature.is_nan() {
                    return None;
                }
                let span = (reference_temperature - base_temperature)
                    + rainfall_coefficient * climate.clamped_rainfall();
                let p = (climate.temperature - base_temperature) / span;
                Some(p.clamp(0.0, 1.0))
            }
        }
    }
}

/// Per-pass gate in front of a state machine
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TickSampler {
    pub policy: ProbabilityPolicy,
    /// Which climate reading the climate policy uses
    #[serde(default)]
    pub climate_mode: ClimateMode,
}

impl TickSampler {
    pub fn new(policy: ProbabilityPolicy, climate_mode: ClimateMode) -> Result<Self, ConfigError> {
        policy.validate()?;
        Ok(Self {
            policy,
            climate_mode,
        })
    }

    pub fn constant(probability: f32) -> Result<Self, ConfigError> {
        Self::new(ProbabilityPolicy::Constant(probability), ClimateMode::Current)
    }

    /// Melt policy on current weather
    pub fn melt() -> Self {
        Self {
            policy: ProbabilityPolicy::MELT,
            climate_mode: ClimateMode::Current,
        }
    }

    /// One sampling decision from an already fetched climate reading
    ///
    /// Consumes one draw from `rng` unless the climate is unavailable, in
    /// which case the block is skipped without drawing.
    pub fn should_sample<R: WorldRng + ?Sized>(
        &self,
        climate: Option<ClimateSample>,
        rng: &mut R,
    ) -> bool {
        match self.policy.probability(climate) {
            Some(p) => rng.check_probability(p),
            None => false,
        }
    }

    /// One sampling decision for `pos`, reading climate only when needed
    pub fn sample_at<W, R>(&self, world: &W, pos: IVec3, rng: &mut R) -> bool
    where
        W: WorldView + ?Sized,
        R: WorldRng + ?Sized,
    {
        let climate = if self.policy.needs_climate() {
            world.sample_climate(pos, self.climate_mode)
        } else {
            None
        };
        self.should_sample(climate, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::MemoryWorld;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    fn melt_p(temperature: f32, rainfall: f32) -> f32 {
        ProbabilityPolicy::MELT
            .probability(Some(ClimateSample::new(temperature, rainfall)))
            .unwrap()
    }

    #[test]
    fn test_melt_probability_anchors() {
        for rainfall in [0.0, 0.3, 1.0] {
            assert_eq!(melt_p(0.5, rainfall), 0.0);
        }
        assert_eq!(melt_p(15.0, 0.0), 1.0);
    }

    #[test]
    fn test_melt_probability_monotonic() {
        let temps: Vec<f32> = (0..60).map(|t| t as f32 * 0.5).collect();
        let rains: Vec<f32> = (0..=10).map(|r| r as f32 * 0.1).collect();

        for &rain in &rains {
            for pair in temps.windows(2) {
                assert!(melt_p(pair[1], rain) >= melt_p(pair[0], rain));
            }
        }
        for &temp in &temps {
            for pair in rains.windows(2) {
                assert!(melt_p(temp, pair[1]) <= melt_p(temp, pair[0]));
            }
        }
    }

    #[test]
    fn test_melt_probability_clamped() {
        assert_eq!(melt_p(-100.0, 0.5), 0.0);
        assert_eq!(melt_p(1000.0, 0.0), 1.0);
        let wet = melt_p(10.0, 5.0);
        assert!((0.0..=1.0).contains(&wet));
        assert_eq!(wet, melt_p(10.0, 1.0));
        assert_eq!(melt_p(10.0, -3.0), melt_p(10.0, 0.0));
    }

    #[test]
    fn test_missing_climate_skips() {
        assert_eq!(ProbabilityPolicy::MELT.probability(None), None);
        assert_eq!(
            ProbabilityPolicy::MELT.probability(Some(ClimateSample::new(f32::NAN, 0.0))),
            None
        );

        let sampler = TickSampler::melt();
        let mut rng = Xoshiro256StarStar::seed_from_u64(5);
        for _ in 0..100 {
            assert!(!sampler.should_sample(None, &mut rng));
        }
    }

    #[test]
    fn test_constant_policy_ignores_climate() {
        let always = TickSampler::constant(1.0).unwrap();
        let never = TickSampler::constant(0.0).unwrap();
        let mut rng = Xoshiro256StarStar::seed_from_u64(5);
        for _ in 0..100 {
            assert!(always.should_sample(None, &mut rng));
            assert!(!never.should_sample(None, &mut rng));
        }
    }

    #[test]
    fn test_constant_policy_rate() {
        let sampler = TickSampler::constant(0.1).unwrap();
        let mut rng = Xoshiro256StarStar::seed_from_u64(77);
        let hits = (0..10_000)
            .filter(|_| sampler.should_sample(None, &mut rng))
            .count();
        // Mean 1000, sigma 30
        assert!((850..=1150).contains(&hits), "hits = {}", hits);
    }

    #[test]
    fn test_sample_at_reads_configured_climate() {
        let mut world = MemoryWorld::new();
        world.set_climate(Some(ClimateSample::new(40.0, 0.0)));

        let mut rng = Xoshiro256StarStar::seed_from_u64(1);
        let current = TickSampler::melt();
        assert!(current.sample_at(&world, IVec3::ZERO, &mut rng));

        // Seasonal reading unavailable in this world
        let seasonal = TickSampler::new(ProbabilityPolicy::MELT, ClimateMode::SeasonalAverage)
            .unwrap();
        assert!(!seasonal.sample_at(&world, IVec3::ZERO, &mut rng));
    }

    #[test]
    fn test_invalid_policies_rejected() {
        assert!(matches!(
            TickSampler::constant(1.5),
            Err(ConfigError::InvalidProbability(_))
        ));
        assert!(TickSampler::constant(-0.1).is_err());
        assert!(TickSampler::constant(f32::NAN).is_err());

        let inverted = ProbabilityPolicy::ClimateDerived {
            base_temperature: 15.0,
            reference_temperature: 0.5,
            rainfall_coefficient: 10.0,
        };
        assert!(matches!(
            inverted.validate(),
            Err(ConfigError::InvalidClimatePolicy { .. })
        ));

        let negative_rain = ProbabilityPolicy::ClimateDerived {
            base_temperature: 0.5,
            reference_temperature: 15.0,
            rainfall_coefficient: -1.0,
        };
        assert!(negative_rain.validate().is_err());
    }
}
