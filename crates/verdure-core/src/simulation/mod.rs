//! Simulation systems - sampling, growth and decay, tick passes

pub mod cover_growth;
pub mod stats;
pub mod tick_pass;
pub mod tick_sampler;

pub use cover_growth::{
    CoverMachine, CoverStage, CropGrowth, SnowLayers, SoilCover, TickState, Transition,
};
pub use stats::{CountingStats, NoopStats, SimStats};
pub use tick_pass::{PassReport, TickPass};
pub use tick_sampler::{ProbabilityPolicy, TickSampler};
