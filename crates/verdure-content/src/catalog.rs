//! Content catalog - every family the engine places or evolves, resolved once

use crate::family::{FamilyError, FamilyId, VariantFamily};
use crate::materials::{MaterialClass, SupportRule};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Built-in family ids
pub struct BuiltinFamily;

impl BuiltinFamily {
    pub const SOIL: FamilyId = FamilyId(1);
    pub const TALL_GRASS: FamilyId = FamilyId(2);
    pub const SNOW: FamilyId = FamilyId(3);
    pub const CROP: FamilyId = FamilyId(4);
    pub const KELP: FamilyId = FamilyId(5);
    pub const BEACH_DEBRIS: FamilyId = FamilyId(6);
    pub const FLOWERS: FamilyId = FamilyId(7);
}

/// Member layout of the soil family
pub mod soil {
    /// Bare soil
    pub const BARE: u8 = 0;
    /// Grass-covered soil
    pub const GRASS: u8 = 1;
}

/// Member layout of kelp-like column families
pub mod column {
    /// Stem section below the top
    pub const SEGMENT: u8 = 0;
    /// Uppermost piece of a column
    pub const TOP: u8 = 1;
}

/// Member layout of the flower family
pub mod flowers {
    pub const COMMON: u8 = 0;
    pub const UNCOMMON: u8 = 1;
    pub const RARE: u8 = 2;
}

/// Maximum snow layers in one cell (member index = layers - 1)
pub const SNOW_MAX_LAYERS: usize = 8;

/// Crop growth stages before maturity; the member after them is the dead crop
pub const CROP_STAGES: usize = 4;

/// Immutable set of families, built once at load time and passed by reference
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentCatalog {
    /// Soil cover: bare soil, grass
    pub soil: VariantFamily,
    /// Tall grass companions grown on fresh grass
    pub tall_grass: VariantFamily,
    /// Snow layers, one member per layer count
    pub snow: VariantFamily,
    /// Crop stages followed by the dead crop
    pub crop: VariantFamily,
    /// Underwater column growth: segment, top
    pub kelp: VariantFamily,
    /// Shoreline debris, increasingly rare
    pub beach_debris: VariantFamily,
    /// Flower colours: common, uncommon, rare
    pub flowers: VariantFamily,
}

impl ContentCatalog {
    /// The families shipped with the engine
    pub fn builtin() -> Result<Self, FamilyError> {
        let catalog = Self {
            soil: VariantFamily::geometric(
                BuiltinFamily::SOIL,
                "soil",
                MaterialClass::Fertile { fertility: 3 },
                SupportRule::Anything,
                2,
            )?,
            tall_grass: VariantFamily::geometric(
                BuiltinFamily::TALL_GRASS,
                "tall_grass",
                MaterialClass::Occupied { replaceable: true },
                SupportRule::Fertile {
                    min_fertility: 1,
                    self_support: false,
                },
                3,
            )?,
            snow: VariantFamily::geometric(
                BuiltinFamily::SNOW,
                "snow",
                MaterialClass::Occupied { replaceable: false },
                SupportRule::FertileOrSolid {
                    self_support: false,
                },
                SNOW_MAX_LAYERS,
            )?,
            crop: VariantFamily::geometric(
                BuiltinFamily::CROP,
                "crop",
                MaterialClass::Occupied { replaceable: false },
                SupportRule::Fertile {
                    min_fertility: 1,
                    self_support: false,
                },
                CROP_STAGES + 1,
            )?,
            kelp: VariantFamily::new(
                BuiltinFamily::KELP,
                "kelp",
                MaterialClass::Occupied { replaceable: false },
                SupportRule::Fertile {
                    min_fertility: 1,
                    self_support: false,
                },
                vec![0.9, 0.1],
            )?,
            beach_debris: VariantFamily::geometric(
                BuiltinFamily::BEACH_DEBRIS,
                "beach_debris",
                MaterialClass::Occupied { replaceable: true },
                SupportRule::FertileOrSolid {
                    self_support: false,
                },
                5,
            )?,
            flowers: VariantFamily::new(
                BuiltinFamily::FLOWERS,
                "flowers",
                MaterialClass::Occupied { replaceable: true },
                SupportRule::Fertile {
                    min_fertility: 1,
                    self_support: true,
                },
                vec![0.9875, 1.0 / 120.0, 1.0 / 300.0],
            )?,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// All families, in field order
    pub fn families(&self) -> [&VariantFamily; 7] {
        [
            &self.soil,
            &self.tall_grass,
            &self.snow,
            &self.crop,
            &self.kelp,
            &self.beach_debris,
            &self.flowers,
        ]
    }

    /// Check every family and the member counts each role relies on
    pub fn validate(&self) -> Result<(), FamilyError> {
        let mut seen = HashSet::new();
        for family in self.families() {
            family.validate()?;
            if !seen.insert(family.id()) {
                return Err(FamilyError::DuplicateId(family.id()));
            }
        }

        require_members(&self.soil, soil::GRASS as usize + 1)?;
        require_members(&self.kelp, column::TOP as usize + 1)?;
        require_members(&self.flowers, flowers::RARE as usize + 1)?;
        require_members(&self.crop, 2)?;

        log::debug!(
            "Content catalog validated ({} families)",
            self.families().len()
        );
        Ok(())
    }
}

fn require_members(family: &VariantFamily, needed: usize) -> Result<(), FamilyError> {
    if family.len() < needed {
        return Err(FamilyError::TooFewMembers {
            name: family.name().to_string(),
            needed,
            count: family.len(),
        });
    }
    Ok(())
}
