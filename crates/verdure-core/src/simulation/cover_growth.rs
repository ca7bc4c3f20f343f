//! Growth and decay of placed cover
//!
//! A cover block's state is never stored separately: it is read back from
//! the visible variant every pass. Each pass has two halves:
//! - `plan` (read-only, may run on worker threads): sampler gate, then the
//!   machine's `decide`
//! - `apply` (authoritative thread): re-reads the block and writes the
//!   transition only if the block still shows the variant it was planned from

use glam::IVec3;
use verdure_content::catalog::soil;
use verdure_content::{ContentCatalog, VariantFamily, VariantKey};

use super::tick_sampler::TickSampler;
use crate::config::{CropConfig, SnowConfig, SoilConfig};
use crate::error::ConfigError;
use crate::world::{Variator, WorldMut, WorldRng, WorldView};

/// Lifecycle position derived from a member index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoverStage {
    Bare,
    Growing(u8),
    Mature,
    Dying,
    Dead,
}

/// Write a planned change will make
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Replace {
        expected: VariantKey,
        next: VariantKey,
    },
    Remove {
        expected: VariantKey,
    },
    /// Replace, then put `companion` at `companion_pos` if it is still empty
    ReplaceWithCompanion {
        expected: VariantKey,
        next: VariantKey,
        companion_pos: IVec3,
        companion: VariantKey,
    },
}

impl Transition {
    /// Variant the decision was derived from
    pub fn expected(&self) -> VariantKey {
        match *self {
            Transition::Replace { expected, .. }
            | Transition::Remove { expected }
            | Transition::ReplaceWithCompanion { expected, .. } => expected,
        }
    }
}

/// Result of planning one block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickState {
    Skip,
    Evolve(Transition),
}

/// A growth/decay state machine over one variant family
pub trait CoverMachine: Sync {
    fn family(&self) -> &VariantFamily;

    fn sampler(&self) -> &TickSampler;

    fn stage_of(&self, member: u8) -> CoverStage;

    /// Next write for a sampled block showing `current`, if any
    fn decide<W, R>(
        &self,
        world: &W,
        pos: IVec3,
        current: VariantKey,
        rng: &mut R,
    ) -> Option<Transition>
    where
        W: WorldView + ?Sized,
        R: WorldRng + ?Sized;

    /// Read-only phase: gate through the sampler, then decide
    fn plan<W, R>(&self, world: &W, pos: IVec3, rng: &mut R) -> TickState
    where
        W: WorldView + ?Sized,
        R: WorldRng + ?Sized,
    {
        let Some(current) = world.content_at(pos) else {
            return TickState::Skip;
        };
        if !self.family().contains(current) {
            return TickState::Skip;
        }
        if !self.sampler().sample_at(world, pos, rng) {
            return TickState::Skip;
        }

        match self.decide(world, pos, current, rng) {
            Some(transition) => TickState::Evolve(transition),
            None => TickState::Skip,
        }
    }

    /// Write phase; returns false when the block changed since planning
    fn apply<W: WorldMut + ?Sized>(&self, world: &mut W, pos: IVec3, transition: &Transition) -> bool {
        if world.content_at(pos) != Some(transition.expected()) {
            log::trace!("Dropping stale {:?} at {}", transition, pos);
            return false;
        }

        match *transition {
            Transition::Replace { next, .. } => world.set_content(pos, next),
            Transition::Remove { .. } => world.clear_content(pos),
            Transition::ReplaceWithCompanion {
                next,
                companion_pos,
                companion,
                ..
            } => {
                world.set_content(pos, next);
                if world.material(companion_pos).is_empty() {
                    world.set_content(companion_pos, companion);
                }
            }
        }
        true
    }
}

// ============================================================================
// Soil cover
// ============================================================================

/// Bare soil and grass: grass needs light and open air above it
///
/// Whether regrowing grass brings a tall-grass companion is drawn from the
/// pass RNG. Which tall-grass member it brings is not: the member comes from
/// hashing the companion's position, so a given spot always grows the same
/// kind of grass.
pub struct SoilCover<'a> {
    soil: &'a VariantFamily,
    tall_grass: &'a VariantFamily,
    config: &'a SoilConfig,
    companions: Variator,
}

impl<'a> SoilCover<'a> {
    pub fn new(catalog: &'a ContentCatalog, config: &'a SoilConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            soil: &catalog.soil,
            tall_grass: &catalog.tall_grass,
            config,
            companions: Variator::new(catalog.tall_grass.len() as u32)?,
        })
    }
}

impl CoverMachine for SoilCover<'_> {
    fn family(&self) -> &VariantFamily {
        self.soil
    }

    fn sampler(&self) -> &TickSampler {
        &self.config.sampler
    }

    fn stage_of(&self, member: u8) -> CoverStage {
        match member {
            soil::BARE => CoverStage::Bare,
            soil::GRASS => CoverStage::Mature,
            other => CoverStage::Growing(other),
        }
    }

    fn decide<W, R>(
        &self,
        world: &W,
        pos: IVec3,
        current: VariantKey,
        rng: &mut R,
    ) -> Option<Transition>
    where
        W: WorldView + ?Sized,
        R: WorldRng + ?Sized,
    {
        let above = pos + IVec3::Y;
        let smothered = world.material(above).is_smothering();
        let dark = world.light_level(above, self.config.light_mode) < self.config.min_light;

        match self.stage_of(current.member) {
            CoverStage::Mature if dark || smothered => Some(Transition::Replace {
                expected: current,
                next: self.soil.member(soil::BARE as usize)?,
            }),
            CoverStage::Bare if !dark && !smothered => {
                let next = self.soil.member(soil::GRASS as usize)?;
                if rng.check_probability(self.config.companion_chance)
                    && world.material(above).is_empty()
                {
                    let companion = self
                        .tall_grass
                        .member(self.companions.index(above) as usize)?;
                    Some(Transition::ReplaceWithCompanion {
                        expected: current,
                        next,
                        companion_pos: above,
                        companion,
                    })
                } else {
                    Some(Transition::Replace {
                        expected: current,
                        next,
                    })
                }
            }
            _ => None,
        }
    }
}

// ============================================================================
// Snow layers
// ============================================================================

/// Layered snow losing one layer per sampled pass
pub struct SnowLayers<'a> {
    snow: &'a VariantFamily,
    config: &'a SnowConfig,
}

impl<'a> SnowLayers<'a> {
    pub fn new(catalog: &'a ContentCatalog, config: &'a SnowConfig) -> Self {
        Self {
            snow: &catalog.snow,
            config,
        }
    }
}

impl CoverMachine for SnowLayers<'_> {
    fn family(&self) -> &VariantFamily {
        self.snow
    }

    fn sampler(&self) -> &TickSampler {
        &self.config.sampler
    }

    fn stage_of(&self, member: u8) -> CoverStage {
        if member == 0 {
            CoverStage::Dying
        } else {
            CoverStage::Mature
        }
    }

    fn decide<W, R>(
        &self,
        _world: &W,
        _pos: IVec3,
        current: VariantKey,
        _rng: &mut R,
    ) -> Option<Transition>
    where
        W: WorldView + ?Sized,
        R: WorldRng + ?Sized,
    {
        match current.member.checked_sub(1) {
            None => Some(Transition::Remove { expected: current }),
            Some(lower) => Some(Transition::Replace {
                expected: current,
                next: self.snow.member(lower as usize)?,
            }),
        }
    }
}

// ============================================================================
// Crops
// ============================================================================

/// Staged crop: grows one stage per sampled pass, dies when conditions fail
///
/// The family's last member is the dead crop, the one before it the mature
/// crop. Both are final.
pub struct CropGrowth<'a> {
    crop: &'a VariantFamily,
    config: &'a CropConfig,
}

impl<'a> CropGrowth<'a> {
    pub fn new(catalog: &'a ContentCatalog, config: &'a CropConfig) -> Self {
        Self {
            crop: &catalog.crop,
            config,
        }
    }

    fn dead_member(&self) -> u8 {
        (self.crop.len() - 1) as u8
    }
}

impl CoverMachine for CropGrowth<'_> {
    fn family(&self) -> &VariantFamily {
        self.crop
    }

    fn sampler(&self) -> &TickSampler {
        &self.config.sampler
    }

    fn stage_of(&self, member: u8) -> CoverStage {
        let dead = self.dead_member();
        if member >= dead {
            CoverStage::Dead
        } else if member + 1 == dead {
            CoverStage::Mature
        } else {
            CoverStage::Growing(member)
        }
    }

    fn decide<W, R>(
        &self,
        world: &W,
        pos: IVec3,
        current: VariantKey,
        _rng: &mut R,
    ) -> Option<Transition>
    where
        W: WorldView + ?Sized,
        R: WorldRng + ?Sized,
    {
        let CoverStage::Growing(stage) = self.stage_of(current.member) else {
            return None;
        };

        let below = pos - IVec3::Y;
        let supported =
            self.crop
                .support()
                .holds(world.material(below), world.content_at(below), self.crop.id());
        let smothered = world.material(pos + IVec3::Y).is_smothering();
        let dark = world.light_level(pos, self.config.light_mode) < self.config.min_light;

        let next = if dark || smothered || !supported {
            self.dead_member()
        } else {
            stage + 1
        };
        Some(Transition::Replace {
            expected: current,
            next: self.crop.member(next as usize)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::MemoryWorld;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;
    use verdure_content::{CROP_STAGES, ClimateSample, MaterialClass};

    fn always_soil() -> SoilConfig {
        SoilConfig {
            sampler: TickSampler::constant(1.0).unwrap(),
            companion_chance: 0.0,
            ..SoilConfig::default()
        }
    }

    fn always_crop() -> CropConfig {
        CropConfig {
            sampler: TickSampler::constant(1.0).unwrap(),
            ..CropConfig::default()
        }
    }

    fn rng() -> Xoshiro256StarStar {
        Xoshiro256StarStar::seed_from_u64(9)
    }

    fn plan_and_apply<M: CoverMachine>(machine: &M, world: &mut MemoryWorld, pos: IVec3) -> bool {
        match machine.plan(&*world, pos, &mut rng()) {
            TickState::Evolve(transition) => machine.apply(world, pos, &transition),
            TickState::Skip => false,
        }
    }

    #[test]
    fn test_dark_grass_turns_bare() {
        let catalog = ContentCatalog::builtin().unwrap();
        let config = always_soil();
        let machine = SoilCover::new(&catalog, &config).unwrap();
        let mut world = MemoryWorld::with_catalog(&catalog);
        let pos = IVec3::ZERO;
        world.place_variant(pos, catalog.soil.member(soil::GRASS as usize).unwrap());
        world.set_light(pos + IVec3::Y, 0);

        assert!(plan_and_apply(&machine, &mut world, pos));
        assert_eq!(world.content_at(pos), catalog.soil.member(soil::BARE as usize));
    }

    #[test]
    fn test_smothered_grass_turns_bare() {
        let catalog = ContentCatalog::builtin().unwrap();
        let config = always_soil();
        let machine = SoilCover::new(&catalog, &config).unwrap();
        let mut world = MemoryWorld::with_catalog(&catalog);
        let pos = IVec3::ZERO;
        world.place_variant(pos, catalog.soil.member(soil::GRASS as usize).unwrap());
        world.set_class(pos + IVec3::Y, MaterialClass::SolidOpaque);

        assert!(plan_and_apply(&machine, &mut world, pos));
        assert_eq!(world.content_at(pos), Some(catalog.soil.base()));
    }

    #[test]
    fn test_lit_bare_soil_grows_grass() {
        let catalog = ContentCatalog::builtin().unwrap();
        let config = always_soil();
        let machine = SoilCover::new(&catalog, &config).unwrap();
        let mut world = MemoryWorld::with_catalog(&catalog);
        let pos = IVec3::ZERO;
        world.place_variant(pos, catalog.soil.base());

        assert!(plan_and_apply(&machine, &mut world, pos));
        assert_eq!(world.content_at(pos), catalog.soil.member(soil::GRASS as usize));
        assert_eq!(world.content_at(pos + IVec3::Y), None);

        // Lit grass is stable
        assert_eq!(machine.plan(&world, pos, &mut rng()), TickState::Skip);
    }

    #[test]
    fn test_companion_is_stable_per_position() {
        let catalog = ContentCatalog::builtin().unwrap();
        let config = SoilConfig {
            companion_chance: 1.0,
            ..always_soil()
        };
        let machine = SoilCover::new(&catalog, &config).unwrap();
        let variator = Variator::new(catalog.tall_grass.len() as u32).unwrap();

        for x in 0..8 {
            let pos = IVec3::new(x, 0, 0);
            let above = pos + IVec3::Y;
            let mut world = MemoryWorld::with_catalog(&catalog);
            world.place_variant(pos, catalog.soil.base());

            let TickState::Evolve(transition) = machine.plan(&world, pos, &mut rng()) else {
                panic!("bare soil in light should evolve");
            };
            let expected = catalog.tall_grass.member(variator.index(above) as usize);
            assert!(matches!(
                transition,
                Transition::ReplaceWithCompanion { companion_pos, companion, .. }
                    if companion_pos == above && Some(companion) == expected
            ));

            assert!(machine.apply(&mut world, pos, &transition));
            assert_eq!(world.content_at(above), expected);
            assert_eq!(world.writes(), 2);
        }
    }

    #[test]
    fn test_companion_skipped_when_space_taken() {
        let catalog = ContentCatalog::builtin().unwrap();
        let config = SoilConfig {
            companion_chance: 1.0,
            ..always_soil()
        };
        let machine = SoilCover::new(&catalog, &config).unwrap();
        let mut world = MemoryWorld::with_catalog(&catalog);
        let pos = IVec3::ZERO;
        world.place_variant(pos, catalog.soil.base());
        world.place_variant(pos + IVec3::Y, catalog.flowers.base());

        assert!(plan_and_apply(&machine, &mut world, pos));
        assert_eq!(world.content_at(pos + IVec3::Y), Some(catalog.flowers.base()));
        assert_eq!(world.writes(), 1);
    }

    #[test]
    fn test_unsampled_block_left_untouched() {
        let catalog = ContentCatalog::builtin().unwrap();
        let config = SoilConfig {
            sampler: TickSampler::constant(0.0).unwrap(),
            ..SoilConfig::default()
        };
        let machine = SoilCover::new(&catalog, &config).unwrap();
        let mut world = MemoryWorld::with_catalog(&catalog);
        world.place_variant(IVec3::ZERO, catalog.soil.base());
        let before = world.clone();

        assert_eq!(machine.plan(&world, IVec3::ZERO, &mut rng()), TickState::Skip);
        assert_eq!(world, before);
    }

    #[test]
    fn test_stale_transition_dropped() {
        let catalog = ContentCatalog::builtin().unwrap();
        let config = always_soil();
        let machine = SoilCover::new(&catalog, &config).unwrap();
        let mut world = MemoryWorld::with_catalog(&catalog);
        let pos = IVec3::ZERO;
        world.place_variant(pos, catalog.soil.base());

        let TickState::Evolve(transition) = machine.plan(&world, pos, &mut rng()) else {
            panic!("bare soil in light should evolve");
        };
        world.set_class(pos, MaterialClass::SolidOpaque);

        assert!(!machine.apply(&mut world, pos, &transition));
        assert_eq!(world.writes(), 0);
        assert_eq!(world.material(pos), MaterialClass::SolidOpaque);
    }

    #[test]
    fn test_foreign_content_skipped() {
        let catalog = ContentCatalog::builtin().unwrap();
        let config = always_soil();
        let machine = SoilCover::new(&catalog, &config).unwrap();
        let mut world = MemoryWorld::with_catalog(&catalog);
        world.place_variant(IVec3::ZERO, catalog.kelp.base());

        assert_eq!(machine.plan(&world, IVec3::ZERO, &mut rng()), TickState::Skip);
        assert_eq!(machine.plan(&world, IVec3::ONE, &mut rng()), TickState::Skip);
    }

    #[test]
    fn test_snow_melts_one_layer() {
        let catalog = ContentCatalog::builtin().unwrap();
        let config = SnowConfig::default();
        let machine = SnowLayers::new(&catalog, &config);
        let mut world = MemoryWorld::with_catalog(&catalog);
        world.set_climate(Some(ClimateSample::new(30.0, 0.0)));

        let pos = IVec3::ZERO;
        world.place_variant(pos, catalog.snow.member(2).unwrap());
        assert!(plan_and_apply(&machine, &mut world, pos));
        assert_eq!(world.content_at(pos), catalog.snow.member(1));
        assert!(plan_and_apply(&machine, &mut world, pos));
        assert!(plan_and_apply(&machine, &mut world, pos));
        assert_eq!(world.content_at(pos), None);
        assert_eq!(world.material(pos), MaterialClass::Empty);

        // Nothing left to melt
        assert!(!plan_and_apply(&machine, &mut world, pos));
    }

    #[test]
    fn test_snow_stays_when_cold_or_unknown() {
        let catalog = ContentCatalog::builtin().unwrap();
        let config = SnowConfig::default();
        let machine = SnowLayers::new(&catalog, &config);
        let mut world = MemoryWorld::with_catalog(&catalog);
        let pos = IVec3::ZERO;
        world.place_variant(pos, catalog.snow.base());

        assert_eq!(machine.plan(&world, pos, &mut rng()), TickState::Skip);
        world.set_climate(Some(ClimateSample::new(-5.0, 0.5)));
        assert_eq!(machine.plan(&world, pos, &mut rng()), TickState::Skip);
        assert_eq!(machine.stage_of(0), CoverStage::Dying);
    }

    #[test]
    fn test_crop_grows_to_maturity() {
        let catalog = ContentCatalog::builtin().unwrap();
        let config = always_crop();
        let machine = CropGrowth::new(&catalog, &config);
        let mut world = MemoryWorld::with_catalog(&catalog);
        world.set_class(IVec3::ZERO, MaterialClass::Fertile { fertility: 2 });
        let pos = IVec3::Y;
        world.place_variant(pos, catalog.crop.base());

        for stage in 1..CROP_STAGES {
            assert!(plan_and_apply(&machine, &mut world, pos));
            assert_eq!(world.content_at(pos), catalog.crop.member(stage));
        }
        assert_eq!(machine.stage_of((CROP_STAGES - 1) as u8), CoverStage::Mature);
        assert!(!plan_and_apply(&machine, &mut world, pos));
    }

    #[test]
    fn test_crop_dies_in_bad_conditions() {
        let catalog = ContentCatalog::builtin().unwrap();
        let config = always_crop();
        let machine = CropGrowth::new(&catalog, &config);
        let dead = Some(catalog.crop.top());
        let pos = IVec3::Y;

        // Dark
        let mut world = MemoryWorld::with_catalog(&catalog);
        world.set_class(IVec3::ZERO, MaterialClass::Fertile { fertility: 2 });
        world.place_variant(pos, catalog.crop.base());
        world.set_light(pos, 2);
        assert!(plan_and_apply(&machine, &mut world, pos));
        assert_eq!(world.content_at(pos), dead);
        assert_eq!(machine.stage_of(catalog.crop.top().member), CoverStage::Dead);
        assert!(!plan_and_apply(&machine, &mut world, pos));

        // Unsupported
        let mut world = MemoryWorld::with_catalog(&catalog);
        world.set_class(IVec3::ZERO, MaterialClass::SolidOpaque);
        world.place_variant(pos, catalog.crop.base());
        assert!(plan_and_apply(&machine, &mut world, pos));
        assert_eq!(world.content_at(pos), dead);

        // Smothered
        let mut world = MemoryWorld::with_catalog(&catalog);
        world.set_class(IVec3::ZERO, MaterialClass::Fertile { fertility: 2 });
        world.set_class(pos + IVec3::Y, MaterialClass::SolidOpaque);
        world.place_variant(pos, catalog.crop.base());
        assert!(plan_and_apply(&machine, &mut world, pos));
        assert_eq!(world.content_at(pos), dead);
    }
}
