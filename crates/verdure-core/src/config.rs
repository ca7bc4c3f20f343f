//! Engine configuration - serializable parameters for placement and ticking
//!
//! Every tunable the placers and cover machines read lives here, so hosts
//! can ship presets as RON files and tweak them without recompiling.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use verdure_content::{LightMode, LiquidKind};

use crate::error::ConfigError;
use crate::simulation::{ProbabilityPolicy, TickSampler};
use crate::world::{LadderMode, MAX_LIGHT};

/// Largest patch radius accepted by `validate`
const MAX_PATCH_RADIUS: u32 = 16;

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Display name for this configuration
    pub name: String,

    /// Rejection-sampling patch scatter
    pub patch: PatchConfig,

    /// Underwater column growth
    pub column: ColumnConfig,

    /// Shoreline surface probe
    pub probe: ProbeConfig,

    /// Debris ladder behaviour
    #[serde(default)]
    pub ladder_mode: LadderMode,

    /// Flower patches
    pub flowers: FlowerConfig,

    /// Soil cover growth and decay
    pub soil: SoilConfig,

    /// Snow layer melting
    pub snow: SnowConfig,

    /// Crop growth
    pub crop: CropConfig,
}

/// Patch placer parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatchConfig {
    /// Rejections allowed before the patch gives up (default: 30)
    pub try_budget: u32,
    /// Horizontal scatter radius around the center (default: 2)
    pub radius: u32,
}

/// Column placer parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// Deepest descent through the medium looking for a floor (default: 10)
    pub max_search_depth: u32,
    /// Column height is 1 + random(max_extra_height), capped by depth (default: 3)
    pub max_extra_height: u32,
    /// Liquid the column grows in (default: water)
    pub medium: LiquidKind,
}

/// Surface probe parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Deepest descent through liquid or air looking for ground (default: 5)
    pub max_water_depth: u32,
}

/// Flower patch parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowerConfig {
    /// Seasonal temperature a patch member needs (default: 5.0)
    pub min_patch_temperature: f32,
    /// Members placed around a rare flower (default: 3)
    pub rare_patch_size: u32,
    /// Members placed around an uncommon flower (default: 5)
    pub uncommon_patch_size: u32,
}

/// Soil cover parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilConfig {
    pub sampler: TickSampler,
    /// Light above the soil needed to keep or grow grass (default: 9)
    pub min_light: u8,
    pub light_mode: LightMode,
    /// Chance fresh grass also grows a tall grass companion (default: 0.1)
    pub companion_chance: f32,
}

/// Snow melting parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnowConfig {
    pub sampler: TickSampler,
}

/// Crop growth parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropConfig {
    pub sampler: TickSampler,
    /// Light at the crop needed to keep growing (default: 9)
    pub min_light: u8,
    pub light_mode: LightMode,
}

// ============================================================================
// Default implementations
// ============================================================================

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            patch: PatchConfig::default(),
            column: ColumnConfig::default(),
            probe: ProbeConfig::default(),
            ladder_mode: LadderMode::default(),
            flowers: FlowerConfig::default(),
            soil: SoilConfig::default(),
            snow: SnowConfig::default(),
            crop: CropConfig::default(),
        }
    }
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            try_budget: 30,
            radius: 2,
        }
    }
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            max_search_depth: 10,
            max_extra_height: 3,
            medium: LiquidKind::Water,
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { max_water_depth: 5 }
    }
}

impl Default for FlowerConfig {
    fn default() -> Self {
        Self {
            min_patch_temperature: 5.0,
            rare_patch_size: 3,
            uncommon_patch_size: 5,
        }
    }
}

impl Default for SoilConfig {
    fn default() -> Self {
        Self {
            sampler: TickSampler {
                policy: ProbabilityPolicy::Constant(0.1),
                climate_mode: Default::default(),
            },
            min_light: 9,
            light_mode: LightMode::Daylight,
            companion_chance: 0.1,
        }
    }
}

impl Default for SnowConfig {
    fn default() -> Self {
        Self {
            sampler: TickSampler::melt(),
        }
    }
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            sampler: TickSampler {
                policy: ProbabilityPolicy::Constant(0.1),
                climate_mode: Default::default(),
            },
            min_light: 9,
            light_mode: LightMode::Current,
        }
    }
}

// ============================================================================
// Validation and RON I/O
// ============================================================================

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.into(),
    }
}

fn check_light(field: &'static str, level: u8) -> Result<(), ConfigError> {
    if level > MAX_LIGHT {
        return Err(invalid(field, format!("{} exceeds {}", level, MAX_LIGHT)));
    }
    Ok(())
}

impl EngineConfig {
    /// Reject values the placers and machines cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.patch.try_budget == 0 {
            return Err(invalid("patch.try_budget", "must be at least 1"));
        }
        if self.patch.radius > MAX_PATCH_RADIUS {
            return Err(invalid(
                "patch.radius",
                format!("{} exceeds {}", self.patch.radius, MAX_PATCH_RADIUS),
            ));
        }
        if self.column.max_search_depth == 0 {
            return Err(invalid("column.max_search_depth", "must be at least 1"));
        }
        if self.probe.max_water_depth == 0 {
            return Err(invalid("probe.max_water_depth", "must be at least 1"));
        }
        if !self.flowers.min_patch_temperature.is_finite() {
            return Err(invalid("flowers.min_patch_temperature", "must be finite"));
        }

        self.soil.sampler.policy.validate()?;
        self.snow.sampler.policy.validate()?;
        self.crop.sampler.policy.validate()?;

        if !(0.0..=1.0).contains(&self.soil.companion_chance) {
            return Err(ConfigError::InvalidProbability(self.soil.companion_chance));
        }
        check_light("soil.min_light", self.soil.min_light)?;
        check_light("crop.min_light", self.crop.min_light)?;

        Ok(())
    }

    /// Parse and validate a RON document
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// Load a RON preset from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read engine config: {}", path.display()))?;
        let config = Self::from_ron_str(&content)
            .with_context(|| format!("Failed to parse engine config: {}", path.display()))?;
        log::debug!("Loaded engine config '{}' from {}", config.name, path.display());
        Ok(config)
    }

    /// Write this config as a RON preset
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = self
            .to_ron_string()
            .context("Failed to serialize engine config")?;
        std::fs::write(path.as_ref(), text).with_context(|| {
            format!("Failed to write engine config: {}", path.as_ref().display())
        })?;
        Ok(())
    }
}

// ============================================================================
// Preset helpers
// ============================================================================

impl EngineConfig {
    /// Create a preset where cover and crops change every few passes
    pub fn preset_fast_growth() -> Self {
        Self {
            name: "Fast Growth".to_string(),
            soil: SoilConfig {
                sampler: TickSampler {
                    policy: ProbabilityPolicy::Constant(0.5),
                    climate_mode: Default::default(),
                },
                companion_chance: 0.25,
                ..SoilConfig::default()
            },
            crop: CropConfig {
                sampler: TickSampler {
                    policy: ProbabilityPolicy::Constant(0.5),
                    climate_mode: Default::default(),
                },
                ..CropConfig::default()
            },
            ..Self::default()
        }
    }
}
