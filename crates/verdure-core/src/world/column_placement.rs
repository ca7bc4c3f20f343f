//! Column search placement - vertical scans for a floor, then placement
//!
//! Two scans share this module:
//! - `grow_underwater` descends through a liquid to a fertile floor and grows
//!   a multi-cell column (segments topped by a cap) back up toward the surface
//! - `probe_surface` descends through air or shallow liquid to ground and
//!   drops a single piece on it
//!
//! Both are all-or-nothing: every target cell is re-checked before the first
//! write, so a refused placement leaves the world untouched.

use glam::IVec3;
use smallvec::SmallVec;
use verdure_content::{VariantFamily, VariantKey};

use super::host::{WorldMut, WorldView};
use super::rng_trait::WorldRng;
use crate::config::{ColumnConfig, ProbeConfig};

/// Why a placement call wrote nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The host could not report the climate the placement depends on
    ClimateUnavailable,
    /// Scan ran out of depth before finding a floor
    SearchExhausted,
    /// Found a floor, but the family cannot stand on it
    NoSupport,
    /// Something in the way along the scan
    Obstructed,
    /// Not enough room for even one piece
    NoRoom,
}

/// Result of a placement call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// `height` cells written; `variant` is the piece that defines the placement
    Placed { height: u32, variant: VariantKey },
    Skipped(SkipReason),
}

impl PlacementOutcome {
    pub fn is_placed(&self) -> bool {
        matches!(self, PlacementOutcome::Placed { .. })
    }
}

/// Cells of one column, bottom to top
type ColumnPlan = SmallVec<[(IVec3, VariantKey); 8]>;

/// System for column-scan placement
pub struct ColumnPlacer;

impl ColumnPlacer {
    /// Grow a column up from the floor below `seed` through `config.medium`
    ///
    /// The column starts one above the floor and stays at least one cell
    /// below the surface: height is `min(depth - 1, 1 + random(max_extra_height))`.
    /// The uppermost cell gets the family's top member, the rest its base.
    pub fn grow_underwater<W, R>(
        world: &mut W,
        seed: IVec3,
        family: &VariantFamily,
        config: &ColumnConfig,
        rng: &mut R,
    ) -> PlacementOutcome
    where
        W: WorldMut + ?Sized,
        R: WorldRng + ?Sized,
    {
        let Some((floor, depth)) = Self::find_floor(&*world, seed, config) else {
            log::trace!("No floor below {} within {}", seed, config.max_search_depth);
            return PlacementOutcome::Skipped(SkipReason::SearchExhausted);
        };

        let floor_class = world.material(floor);
        if floor_class.fertility() == 0
            || !family
                .support()
                .holds(floor_class, world.content_at(floor), family.id())
        {
            return PlacementOutcome::Skipped(SkipReason::NoSupport);
        }

        let height = depth
            .saturating_sub(1)
            .min(1 + rng.gen_index(config.max_extra_height));
        if height == 0 {
            return PlacementOutcome::Skipped(SkipReason::NoRoom);
        }

        let plan: ColumnPlan = (1..=height as i32)
            .map(|dy| {
                let member = if dy == height as i32 {
                    family.top()
                } else {
                    family.base()
                };
                (floor + IVec3::Y * dy, member)
            })
            .collect();

        // Re-check the whole column before writing any of it
        if !plan
            .iter()
            .all(|(pos, _)| world.material(*pos).is_liquid_of(config.medium))
        {
            return PlacementOutcome::Skipped(SkipReason::Obstructed);
        }

        for &(pos, member) in &plan {
            world.set_content(pos, member);
        }

        log::debug!("Grew {}-high {} column above {}", height, family.name(), floor);
        PlacementOutcome::Placed {
            height,
            variant: family.top(),
        }
    }

    /// Descend through the medium; returns the floor and the liquid cells crossed
    fn find_floor<W: WorldView + ?Sized>(
        world: &W,
        seed: IVec3,
        config: &ColumnConfig,
    ) -> Option<(IVec3, u32)> {
        let mut pos = seed;
        for depth in 0..=config.max_search_depth {
            if !world.material(pos).is_liquid_of(config.medium) {
                return Some((pos, depth));
            }
            pos -= IVec3::Y;
        }
        None
    }

    /// Drop `variant` onto the first ground below `ceiling`
    ///
    /// Scans down through air and liquid for at most `max_water_depth` steps.
    /// Any other content on the way (including another member of the same
    /// family) refuses the placement.
    pub fn probe_surface<W>(
        world: &mut W,
        ceiling: IVec3,
        variant: VariantKey,
        family: &VariantFamily,
        config: &ProbeConfig,
    ) -> PlacementOutcome
    where
        W: WorldMut + ?Sized,
    {
        let mut pos = ceiling;
        for _ in 0..=config.max_water_depth {
            let class = world.material(pos);

            if class.is_ground() {
                if !family
                    .support()
                    .holds(class, world.content_at(pos), family.id())
                {
                    return PlacementOutcome::Skipped(SkipReason::NoSupport);
                }

                let target = pos + IVec3::Y;
                let landing = world.material(target);
                if !(landing.is_empty() || landing.is_liquid()) {
                    return PlacementOutcome::Skipped(SkipReason::Obstructed);
                }

                world.set_content(target, variant);
                log::debug!("Dropped {:?} at {}", variant, target);
                return PlacementOutcome::Placed { height: 1, variant };
            }

            if !(class.is_empty() || class.is_liquid()) {
                let same_family = world
                    .content_at(pos)
                    .is_some_and(|key| key.family == family.id());
                log::trace!(
                    "Probe from {} blocked at {} (same family: {})",
                    ceiling,
                    pos,
                    same_family
                );
                return PlacementOutcome::Skipped(SkipReason::Obstructed);
            }

            pos -= IVec3::Y;
        }

        PlacementOutcome::Skipped(SkipReason::SearchExhausted)
    }
}
