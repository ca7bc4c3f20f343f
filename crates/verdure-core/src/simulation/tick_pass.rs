//! Two-phase tick pass over a set of candidate positions
//!
//! Phase 1 plans every candidate in parallel against a shared read-only view,
//! each with its own RNG derived from the pass seed and the position, so the
//! outcome does not depend on thread count or scheduling. Phase 2 applies the
//! planned transitions one by one on the caller's thread.

use glam::IVec3;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use rayon::prelude::*;

use super::cover_growth::{CoverMachine, TickState, Transition};
use super::stats::SimStats;
use crate::world::{WorldMut, WorldView, mix_seed};

/// What one pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Positions offered to the pass
    pub candidates: usize,
    /// Positions whose plan produced a transition
    pub planned: usize,
    /// Transitions written
    pub evolved: usize,
    /// Transitions dropped because the block changed after planning
    pub stale: usize,
}

pub struct TickPass;

impl TickPass {
    /// Plan `positions` in parallel; positions that stay put are dropped
    pub fn plan<W, M>(world: &W, machine: &M, positions: &[IVec3], pass_seed: u64) -> Vec<(IVec3, Transition)>
    where
        W: WorldView + Sync,
        M: CoverMachine,
    {
        positions
            .par_iter()
            .filter_map(|&pos| {
                let mut rng = Xoshiro256StarStar::seed_from_u64(mix_seed(pass_seed, pos));
                match machine.plan(world, pos, &mut rng) {
                    TickState::Evolve(transition) => Some((pos, transition)),
                    TickState::Skip => None,
                }
            })
            .collect()
    }

    /// Run one full pass: parallel planning, then sequential application
    pub fn run<W, M, S>(
        world: &mut W,
        machine: &M,
        positions: &[IVec3],
        pass_seed: u64,
        stats: &mut S,
    ) -> PassReport
    where
        W: WorldMut + Sync,
        M: CoverMachine,
        S: SimStats + ?Sized,
    {
        let planned = Self::plan(&*world, machine, positions, pass_seed);

        let mut report = PassReport {
            candidates: positions.len(),
            planned: planned.len(),
            ..PassReport::default()
        };
        for _ in planned.len()..positions.len() {
            stats.record_skip();
        }

        for (pos, transition) in &planned {
            if machine.apply(world, *pos, transition) {
                report.evolved += 1;
                stats.record_transition();
            } else {
                report.stale += 1;
                stats.record_stale();
            }
        }

        if report.stale > 0 {
            log::warn!(
                "{} pass dropped {} stale transitions",
                machine.family().name(),
                report.stale
            );
        }
        log::debug!(
            "{} pass: {} candidates, {} planned, {} evolved",
            machine.family().name(),
            report.candidates,
            report.planned,
            report.evolved
        );
        report
    }
}
