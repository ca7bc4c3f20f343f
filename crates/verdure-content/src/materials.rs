//! Material classification used by placement rules

use crate::family::{FamilyId, VariantKey};
use serde::{Deserialize, Serialize};

/// Highest liquid level a host can report (source blocks)
pub const MAX_LIQUID_LEVEL: u8 = 7;

/// Kind of liquid occupying a position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiquidKind {
    Water,
    Lava,
}

/// What occupies a position, as far as placement rules care
///
/// This is a classification, not a block identity. Hosts map their own
/// blocks onto it; the placement and tick algorithms only ever branch on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialClass {
    /// Air or anything a feature can freely occupy
    Empty,
    /// Soil plant life can root in (fertility > 0)
    Fertile { fertility: u8 },
    /// Flowing or source liquid (level 0..=7)
    Liquid { kind: LiquidKind, level: u8 },
    /// Solid, light-blocking ground or building material
    SolidOpaque,
    /// Anything else (plants, decorations, devices)
    Occupied { replaceable: bool },
}

impl MaterialClass {
    /// Fertile soil; `None` for zero fertility, which is not viable support
    pub fn fertile(fertility: u8) -> Option<Self> {
        (fertility > 0).then_some(MaterialClass::Fertile { fertility })
    }

    /// Liquid with the level clamped into the valid range
    pub fn liquid(kind: LiquidKind, level: u8) -> Self {
        MaterialClass::Liquid {
            kind,
            level: level.min(MAX_LIQUID_LEVEL),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, MaterialClass::Empty)
    }

    pub fn is_liquid(&self) -> bool {
        matches!(self, MaterialClass::Liquid { .. })
    }

    pub fn is_liquid_of(&self, wanted: LiquidKind) -> bool {
        matches!(self, MaterialClass::Liquid { kind, .. } if *kind == wanted)
    }

    /// Fertility of this material (0 for anything that isn't soil)
    pub fn fertility(&self) -> u8 {
        match self {
            MaterialClass::Fertile { fertility } => *fertility,
            _ => 0,
        }
    }

    /// Solid ground a feature can stand on
    pub fn is_ground(&self) -> bool {
        matches!(
            self,
            MaterialClass::Fertile { .. } | MaterialClass::SolidOpaque
        )
    }

    /// Blocks light and air from a cover block directly beneath it
    pub fn is_smothering(&self) -> bool {
        self.is_ground()
    }

    /// Generated content may be written here without destroying anything
    pub fn accepts_placement(&self) -> bool {
        matches!(
            self,
            MaterialClass::Empty | MaterialClass::Occupied { replaceable: true }
        )
    }
}

/// Requirement on the block directly below a placed member
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupportRule {
    /// Soil with at least this fertility
    Fertile { min_fertility: u8, self_support: bool },
    /// Soil or any solid ground (sand, gravel, stone)
    FertileOrSolid { self_support: bool },
    /// No requirement
    Anything,
}

impl SupportRule {
    /// Check the rule against the block below a candidate position
    ///
    /// `self_support` lets a member rest on another member of its own family,
    /// which is what allows patches to cluster on top of themselves.
    pub fn holds(
        &self,
        below: MaterialClass,
        below_content: Option<VariantKey>,
        family: FamilyId,
    ) -> bool {
        let own_family = below_content.is_some_and(|key| key.family == family);
        match *self {
            SupportRule::Fertile {
                min_fertility,
                self_support,
            } => {
                below.fertility() >= min_fertility.max(1) || (self_support && own_family)
            }
            SupportRule::FertileOrSolid { self_support } => {
                below.is_ground() || (self_support && own_family)
            }
            SupportRule::Anything => true,
        }
    }
}
