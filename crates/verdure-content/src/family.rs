//! Variant families - ordered sets of interchangeable generated content

use crate::materials::{MaterialClass, SupportRule};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum members in one family (member indices are `u8`)
pub const MAX_FAMILY_MEMBERS: usize = u8::MAX as usize + 1;

/// Identifier of one content family
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FamilyId(pub u16);

/// Typed key for one member of a family
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantKey {
    pub family: FamilyId,
    pub member: u8,
}

impl VariantKey {
    pub const fn new(family: FamilyId, member: u8) -> Self {
        Self { family, member }
    }
}

/// Family construction errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FamilyError {
    #[error("family '{0}' has no members")]
    Empty(String),

    #[error("family '{name}' has {count} members, at most {MAX_FAMILY_MEMBERS} are addressable")]
    TooManyMembers { name: String, count: usize },

    #[error("family '{name}' member {index} has invalid weight {weight}")]
    InvalidWeight {
        name: String,
        index: usize,
        weight: f32,
    },

    #[error("family '{name}' member {index} is not rarer than the member before it")]
    NotDecreasing { name: String, index: usize },

    #[error("family '{name}' cannot occupy an empty cell")]
    EmptyClass { name: String },

    #[error("family '{name}' needs at least {needed} members, has {count}")]
    TooFewMembers {
        name: String,
        needed: usize,
        count: usize,
    },

    #[error("family id {0:?} is used by more than one family")]
    DuplicateId(FamilyId),
}

/// Ordered set of variants for one generated feature
///
/// Member 0 is the base (common) member, every following member is strictly
/// rarer. Families are built once when content is loaded and then only read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariantFamily {
    id: FamilyId,
    name: String,
    /// Class a placed member occupies in the world
    class: MaterialClass,
    /// Requirement on the block below a placed member
    support: SupportRule,
    /// Rarity weight per member, strictly decreasing
    weights: Vec<f32>,
}

impl VariantFamily {
    pub fn new(
        id: FamilyId,
        name: impl Into<String>,
        class: MaterialClass,
        support: SupportRule,
        weights: Vec<f32>,
    ) -> Result<Self, FamilyError> {
        let family = Self {
            id,
            name: name.into(),
            class,
            support,
            weights,
        };
        family.validate()?;
        Ok(family)
    }

    /// Family whose weights halve along the ordering (1/2, 1/4, 1/8, ...)
    pub fn geometric(
        id: FamilyId,
        name: impl Into<String>,
        class: MaterialClass,
        support: SupportRule,
        count: usize,
    ) -> Result<Self, FamilyError> {
        let weights = (0..count.min(MAX_FAMILY_MEMBERS + 1))
            .map(|i| 0.5f32.powi(i as i32 + 1))
            .collect();
        Self::new(id, name, class, support, weights)
    }

    /// Check the member invariants (needed again after deserialization)
    pub fn validate(&self) -> Result<(), FamilyError> {
        if self.weights.is_empty() {
            return Err(FamilyError::Empty(self.name.clone()));
        }
        if self.weights.len() > MAX_FAMILY_MEMBERS {
            return Err(FamilyError::TooManyMembers {
                name: self.name.clone(),
                count: self.weights.len(),
            });
        }
        if self.class.is_empty() {
            return Err(FamilyError::EmptyClass {
                name: self.name.clone(),
            });
        }

        for (index, &weight) in self.weights.iter().enumerate() {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(FamilyError::InvalidWeight {
                    name: self.name.clone(),
                    index,
                    weight,
                });
            }
            if index > 0 && weight >= self.weights[index - 1] {
                return Err(FamilyError::NotDecreasing {
                    name: self.name.clone(),
                    index,
                });
            }
        }
        Ok(())
    }

    pub fn id(&self) -> FamilyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> MaterialClass {
        self.class
    }

    pub fn support(&self) -> SupportRule {
        self.support
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always false for a validated family
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn weight(&self, index: usize) -> Option<f32> {
        self.weights.get(index).copied()
    }

    /// Key of member `index`, if the family has that many members
    pub fn member(&self, index: usize) -> Option<VariantKey> {
        (index < self.weights.len()).then(|| VariantKey::new(self.id, index as u8))
    }

    /// The base (most common) member
    pub fn base(&self) -> VariantKey {
        VariantKey::new(self.id, 0)
    }

    /// The last (rarest) member
    pub fn top(&self) -> VariantKey {
        VariantKey::new(self.id, self.weights.len().saturating_sub(1) as u8)
    }

    /// Whether `key` names a member of this family
    pub fn contains(&self, key: VariantKey) -> bool {
        key.family == self.id && (key.member as usize) < self.weights.len()
    }
}
