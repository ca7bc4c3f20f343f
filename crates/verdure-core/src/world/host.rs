//! Host world capabilities consumed by placement and tick decisions
//!
//! The engine never owns block storage, lighting or climate. Hosts implement
//! these two traits over their own world; the split keeps decision code on
//! read-only access and confines writes to the world thread.

use glam::IVec3;
use verdure_content::{ClimateMode, ClimateSample, LightMode, MaterialClass, VariantKey};

/// Read-only queries, safe to run from worker threads when `Sync`
pub trait WorldView {
    /// Classification of whatever occupies `pos`
    fn material(&self, pos: IVec3) -> MaterialClass;

    /// Visible variant at `pos`, if it is a member of a known family
    fn content_at(&self, pos: IVec3) -> Option<VariantKey>;

    /// Y of the highest ground block in column (x, z), `None` if there is none
    fn terrain_height(&self, x: i32, z: i32) -> Option<i32>;

    /// Climate at `pos`; `None` when the host cannot tell
    fn sample_climate(&self, pos: IVec3, mode: ClimateMode) -> Option<ClimateSample>;

    /// Light level at `pos` (0-15)
    fn light_level(&self, pos: IVec3, mode: LightMode) -> u8;
}

/// Writes, applied only on the authoritative world thread
pub trait WorldMut: WorldView {
    /// Overwrite `pos` with `variant` (idempotent)
    fn set_content(&mut self, pos: IVec3, variant: VariantKey);

    /// Reset `pos` to empty
    fn clear_content(&mut self, pos: IVec3);
}
