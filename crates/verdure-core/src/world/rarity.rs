//! Rarity tier resolution - one uniform draw to a discrete outcome tier

use serde::{Deserialize, Serialize};
use verdure_content::VariantFamily;

use crate::error::ConfigError;

/// How to treat the historic debris ladder quirks
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LadderMode {
    /// Each tier gets its stated share; the rarest tier also absorbs the
    /// part of the draw range the shares leave uncovered
    #[default]
    Corrected,
    /// Bit-for-bit legacy mapping: the third band and the uncovered
    /// remainder both resolve to the most common tier
    Legacy,
}

/// Outcome of the flower patch split
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PatchRarity {
    Common,
    Uncommon,
    Rare,
}

/// Chance that a flower spawns a rare-coloured patch
pub const RARE_PATCH_CHANCE: f32 = 1.0 / 300.0;

/// Cumulative bound below which a flower spawns an uncommon patch
pub const UNCOMMON_PATCH_BOUND: f32 = 1.0 / 120.0;

/// Ordered cumulative thresholds mapping a draw in [0, 1) to a tier
///
/// Entries are checked in order; the first bound greater than the draw wins.
/// Draws past the last bound resolve to `fallback`.
#[derive(Clone, Debug, PartialEq)]
pub struct RarityLadder {
    entries: Vec<(f32, usize)>,
    fallback: usize,
    tier_count: usize,
}

impl RarityLadder {
    pub fn new(
        entries: Vec<(f32, usize)>,
        fallback: usize,
        tier_count: usize,
    ) -> Result<Self, ConfigError> {
        if tier_count == 0 {
            return Err(ConfigError::InvalidLadder("no tiers".to_string()));
        }
        if fallback >= tier_count {
            return Err(ConfigError::InvalidLadder(format!(
                "fallback tier {} out of range (tiers: {})",
                fallback, tier_count
            )));
        }

        let mut previous = 0.0f32;
        for (i, &(bound, tier)) in entries.iter().enumerate() {
            if !(bound > previous && bound <= 1.0) {
                return Err(ConfigError::InvalidLadder(format!(
                    "bound {} at entry {} must be in ({}, 1]",
                    bound, i, previous
                )));
            }
            if tier >= tier_count {
                return Err(ConfigError::InvalidLadder(format!(
                    "tier {} at entry {} out of range (tiers: {})",
                    tier, i, tier_count
                )));
            }
            previous = bound;
        }

        Ok(Self {
            entries,
            fallback,
            tier_count,
        })
    }

    /// Halving ladder over `tiers` tiers: 1/2, 1/4, 1/8, ...
    pub fn geometric(tiers: usize, mode: LadderMode) -> Result<Self, ConfigError> {
        let shares: Vec<f32> = (0..tiers).map(|i| 0.5f32.powi(i as i32 + 1)).collect();
        Self::from_shares(&shares, mode)
    }

    /// Ladder whose tier shares are the family's member weights
    ///
    /// Weights are relative, so they are scaled to sum to one: the tiers
    /// cover the whole draw range and keep the family's ordering.
    pub fn from_family(family: &VariantFamily, mode: LadderMode) -> Result<Self, ConfigError> {
        let total: f32 = family.weights().iter().sum();
        if !(total.is_finite() && total > 0.0) {
            return Err(ConfigError::InvalidLadder(format!(
                "family '{}' has weight total {}",
                family.name(),
                total
            )));
        }
        let shares: Vec<f32> = family.weights().iter().map(|weight| weight / total).collect();
        Self::from_shares(&shares, mode)
    }

    fn from_shares(shares: &[f32], mode: LadderMode) -> Result<Self, ConfigError> {
        let tiers = shares.len();
        if tiers == 0 {
            return Err(ConfigError::InvalidLadder("no tiers".to_string()));
        }

        let mut cumulative = 0.0f32;
        let mut bounds = Vec::with_capacity(tiers);
        for &share in shares {
            cumulative += share;
            bounds.push(cumulative.min(1.0));
        }

        match mode {
            LadderMode::Corrected => {
                // Last tier has no bound of its own: it takes the remainder
                let entries = bounds[..tiers - 1]
                    .iter()
                    .enumerate()
                    .map(|(tier, &bound)| (bound, tier))
                    .collect();
                Self::new(entries, tiers - 1, tiers)
            }
            LadderMode::Legacy => {
                let entries = bounds
                    .iter()
                    .enumerate()
                    .map(|(tier, &bound)| (bound, if tier == 2 { 0 } else { tier }))
                    .collect();
                Self::new(entries, 0, tiers)
            }
        }
    }

    /// Split used for flower patches: rare below 1/300, uncommon below 1/120
    pub fn patch_split() -> Self {
        Self {
            entries: vec![
                (RARE_PATCH_CHANCE, PatchRarity::Rare as usize),
                (UNCOMMON_PATCH_BOUND, PatchRarity::Uncommon as usize),
            ],
            fallback: PatchRarity::Common as usize,
            tier_count: 3,
        }
    }

    /// Tier for one draw in [0, 1)
    pub fn resolve_tier(&self, draw: f32) -> usize {
        self.entries
            .iter()
            .find(|(bound, _)| draw < *bound)
            .map(|(_, tier)| *tier)
            .unwrap_or(self.fallback)
    }

    pub fn tier_count(&self) -> usize {
        self.tier_count
    }
}

impl PatchRarity {
    fn from_tier(tier: usize) -> Self {
        match tier {
            t if t == PatchRarity::Rare as usize => PatchRarity::Rare,
            t if t == PatchRarity::Uncommon as usize => PatchRarity::Uncommon,
            _ => PatchRarity::Common,
        }
    }
}

/// Patch rarity for one draw against the flower split
pub fn resolve_patch_rarity(draw: f32) -> PatchRarity {
    PatchRarity::from_tier(RarityLadder::patch_split().resolve_tier(draw))
}
