//! Bounded rejection-sampling patch placer
//!
//! Scatters copies of one variant around a center: random offsets within a
//! square radius, dropped onto the terrain surface, kept only where the
//! occupancy, support and climate checks all pass. Each rejection spends one
//! try from a fixed budget, so a hostile neighbourhood costs bounded work
//! and a partial patch is a normal result.

use glam::IVec3;
use verdure_content::{VariantFamily, VariantKey};

use super::host::{WorldMut, WorldView};
use super::rng_trait::WorldRng;
use crate::config::PatchConfig;

/// Counts reported by one scatter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchOutcome {
    pub placed: u32,
    pub rejected: u32,
}

/// System for scattering patches of a single variant
pub struct PatchPlacer;

impl PatchPlacer {
    /// Scatter up to `target_count` copies of `variant` around `center`
    ///
    /// Ends when `target_count` members are placed or `config.try_budget`
    /// candidates have been rejected, whichever comes first.
    #[allow(clippy::too_many_arguments)]
    pub fn scatter_patch<W, F, R>(
        world: &mut W,
        center: IVec3,
        target_count: u32,
        variant: VariantKey,
        family: &VariantFamily,
        climate_ok: F,
        config: &PatchConfig,
        rng: &mut R,
    ) -> PatchOutcome
    where
        W: WorldMut + ?Sized,
        F: Fn(&W, IVec3) -> bool,
        R: WorldRng + ?Sized,
    {
        let mut remaining = target_count;
        let mut tries = config.try_budget;
        let mut outcome = PatchOutcome::default();

        while remaining > 0 && tries > 0 {
            let x = center.x + rng.gen_offset(config.radius);
            let z = center.z + rng.gen_offset(config.radius);

            let candidate = world
                .terrain_height(x, z)
                .map(|height| IVec3::new(x, height + 1, z))
                .filter(|&pos| Self::accepts(&*world, pos, family) && climate_ok(&*world, pos));

            match candidate {
                Some(pos) => {
                    world.set_content(pos, variant);
                    remaining -= 1;
                    outcome.placed += 1;
                }
                None => {
                    log::trace!("Patch candidate at ({}, {}) rejected", x, z);
                    tries -= 1;
                    outcome.rejected += 1;
                }
            }
        }

        log::debug!(
            "Patch of {:?} at {}: placed {}/{} ({} rejected)",
            variant,
            center,
            outcome.placed,
            target_count,
            outcome.rejected
        );
        outcome
    }

    /// Occupancy and support checks for one candidate
    fn accepts<W: WorldView + ?Sized>(world: &W, pos: IVec3, family: &VariantFamily) -> bool {
        let here = world.material(pos);
        let same_family = world
            .content_at(pos)
            .is_some_and(|key| key.family == family.id());
        if !here.accepts_placement() && !same_family {
            return false;
        }

        let below = pos - IVec3::Y;
        family
            .support()
            .holds(world.material(below), world.content_at(below), family.id())
    }
}
