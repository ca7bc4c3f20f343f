//! Content data for the Verdure placement and tick engine
//!
//! This crate provides the foundational data types shared by the engine and
//! its hosts:
//! - Material classification (MaterialClass, LiquidKind, SupportRule)
//! - Variant families and typed keys (FamilyId, VariantKey, VariantFamily)
//! - Climate and light readings (ClimateSample, ClimateMode, LightMode)
//! - The content catalog resolved once at load time (ContentCatalog)

pub mod catalog;
mod climate;
mod family;
mod materials;

pub use catalog::{BuiltinFamily, CROP_STAGES, ContentCatalog, SNOW_MAX_LAYERS};
pub use climate::{ClimateMode, ClimateSample, LightMode};
pub use family::{FamilyError, FamilyId, MAX_FAMILY_MEMBERS, VariantFamily, VariantKey};
pub use materials::{LiquidKind, MAX_LIQUID_LEVEL, MaterialClass, SupportRule};
