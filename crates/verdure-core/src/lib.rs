//! Procedural placement and environmental tick engine
//!
//! Decides where generated content goes (flowers, kelp, debris, patches) and
//! how placed content changes over time (grass cover, snow, crops) under
//! temperature, rainfall, light and smothering. The host world is reached
//! only through the `WorldView`/`WorldMut` traits.

pub mod config;
pub mod error;
pub mod simulation;
pub mod world;

pub use config::EngineConfig;
pub use error::ConfigError;

// Re-export the content crate so hosts need only one dependency
pub use verdure_content as content;
