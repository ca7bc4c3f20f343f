//! Generation-time feature placement
//!
//! Entry points a world generator calls for each candidate position. They
//! combine the lower-level pieces (support checks, rarity draws, patch
//! scatter, column scans) with the catalog's families and the engine config.

use glam::IVec3;
use verdure_content::catalog::flowers;
use verdure_content::{ClimateMode, ContentCatalog};

use super::column_placement::{ColumnPlacer, PlacementOutcome, SkipReason};
use super::host::{WorldMut, WorldView};
use super::patch_placement::PatchPlacer;
use super::rarity::{PatchRarity, RarityLadder, resolve_patch_rarity};
use super::rng_trait::WorldRng;
use crate::config::EngineConfig;
use crate::error::ConfigError;

/// Places flowers, kelp and beach debris from one catalog and config
pub struct FeaturePlacer<'a> {
    catalog: &'a ContentCatalog,
    config: &'a EngineConfig,
    debris_ladder: RarityLadder,
}

impl<'a> FeaturePlacer<'a> {
    pub fn new(catalog: &'a ContentCatalog, config: &'a EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let debris_ladder = RarityLadder::from_family(&catalog.beach_debris, config.ladder_mode)?;
        Ok(Self {
            catalog,
            config,
            debris_ladder,
        })
    }

    /// Place a common flower at `pos`, sometimes ringed by a rarer patch
    ///
    /// Flowers follow the seasonal climate: without a seasonal reading at
    /// `pos` nothing is placed. Patch members additionally need the seasonal
    /// temperature at their own position to reach `min_patch_temperature`.
    pub fn place_flower<W, R>(&self, world: &mut W, pos: IVec3, rng: &mut R) -> PlacementOutcome
    where
        W: WorldMut + ?Sized,
        R: WorldRng + ?Sized,
    {
        let family = &self.catalog.flowers;

        if world
            .sample_climate(pos, ClimateMode::SeasonalAverage)
            .is_none()
        {
            return PlacementOutcome::Skipped(SkipReason::ClimateUnavailable);
        }
        if !world.material(pos).accepts_placement() {
            return PlacementOutcome::Skipped(SkipReason::Obstructed);
        }
        let below = pos - IVec3::Y;
        if !family
            .support()
            .holds(world.material(below), world.content_at(below), family.id())
        {
            return PlacementOutcome::Skipped(SkipReason::NoSupport);
        }

        let base = family.base();
        world.set_content(pos, base);

        let (member, size) = match resolve_patch_rarity(rng.gen_f32()) {
            PatchRarity::Common => return PlacementOutcome::Placed { height: 1, variant: base },
            PatchRarity::Uncommon => (flowers::UNCOMMON, self.config.flowers.uncommon_patch_size),
            PatchRarity::Rare => (flowers::RARE, self.config.flowers.rare_patch_size),
        };

        if let Some(variant) = family.member(member as usize) {
            let min_temperature = self.config.flowers.min_patch_temperature;
            let patch = PatchPlacer::scatter_patch(
                world,
                pos,
                size,
                variant,
                family,
                |world: &W, candidate| warm_enough(world, candidate, min_temperature),
                &self.config.patch,
                rng,
            );
            log::debug!(
                "Flower at {} spawned a {:?} patch ({} placed)",
                pos,
                variant,
                patch.placed
            );
        }

        PlacementOutcome::Placed {
            height: 1,
            variant: base,
        }
    }

    /// Grow a kelp column from `seed` down to the sea floor and back up
    pub fn place_kelp<W, R>(&self, world: &mut W, seed: IVec3, rng: &mut R) -> PlacementOutcome
    where
        W: WorldMut + ?Sized,
        R: WorldRng + ?Sized,
    {
        ColumnPlacer::grow_underwater(world, seed, &self.catalog.kelp, &self.config.column, rng)
    }

    /// Drop one piece of beach debris below `ceiling`, rarer pieces less often
    pub fn place_debris<W, R>(&self, world: &mut W, ceiling: IVec3, rng: &mut R) -> PlacementOutcome
    where
        W: WorldMut + ?Sized,
        R: WorldRng + ?Sized,
    {
        let family = &self.catalog.beach_debris;
        let tier = self.debris_ladder.resolve_tier(rng.gen_f32());
        let variant = family.member(tier).unwrap_or_else(|| family.base());
        ColumnPlacer::probe_surface(world, ceiling, variant, family, &self.config.probe)
    }
}

fn warm_enough<W: WorldView + ?Sized>(world: &W, pos: IVec3, min_temperature: f32) -> bool {
    world
        .sample_climate(pos, ClimateMode::SeasonalAverage)
        .is_some_and(|climate| climate.temperature >= min_temperature)
}
