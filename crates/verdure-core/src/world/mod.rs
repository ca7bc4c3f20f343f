//! World-facing placement - host traits, randomness and placers

pub mod column_placement;
pub mod features;
mod host;
mod memory_world;
pub mod patch_placement;
pub mod rarity;
pub mod rng_trait;
pub mod variator;

pub use column_placement::{ColumnPlacer, PlacementOutcome, SkipReason};
pub use features::FeaturePlacer;
pub use host::{WorldMut, WorldView};
pub use memory_world::{MAX_LIGHT, MemoryWorld};
pub use patch_placement::{PatchOutcome, PatchPlacer};
pub use rarity::{
    LadderMode, PatchRarity, RARE_PATCH_CHANCE, RarityLadder, UNCOMMON_PATCH_BOUND,
    resolve_patch_rarity,
};
pub use rng_trait::WorldRng;
pub use variator::{Variator, hash_position, mix_seed, variant_index};
