//! Spatial hash variator - stable per-position variant selection
//!
//! Picks which of several visual/placement variants a position uses, without
//! storing anything per position. The result depends only on the coordinates
//! and the modulus: no world seed, no call order, no thread state.

use glam::IVec3;
use std::num::NonZeroU32;

use crate::error::ConfigError;

const C1: u64 = 0x87c3_7b91_1142_53d5;
const C2: u64 = 0x4cf5_ad43_2745_937f;

/// Murmur3 64-bit finalizer
#[inline]
fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51_afd7_ed55_8ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    k ^= k >> 33;
    k
}

/// Murmur3-style hash of three coordinates
#[inline]
pub fn hash_position(pos: IVec3) -> u64 {
    let mut h: u64 = 0;
    for coord in [pos.x, pos.y, pos.z] {
        let mut k = (coord as u32 as u64).wrapping_mul(C1);
        k = k.rotate_left(31).wrapping_mul(C2);
        h ^= k;
        h = h.rotate_left(27).wrapping_mul(5).wrapping_add(0x52dc_e729);
    }
    // Input length in bytes, as Murmur3 folds it in before finalizing
    h ^= 12;
    fmix64(h)
}

/// Stable variant index in [0, modulus) for a position
pub fn variant_index(pos: IVec3, modulus: NonZeroU32) -> u32 {
    (hash_position(pos) % modulus.get() as u64) as u32
}

/// Seed for a per-position RNG within one tick pass
///
/// Unlike `variant_index` this mixes in a caller seed, so different passes
/// draw different numbers at the same position.
pub fn mix_seed(seed: u64, pos: IVec3) -> u64 {
    fmix64(hash_position(pos) ^ fmix64(seed.wrapping_add(C1)))
}

/// Variant selector with a fixed modulus, validated once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variator {
    modulus: NonZeroU32,
}

impl Variator {
    pub fn new(modulus: u32) -> Result<Self, ConfigError> {
        NonZeroU32::new(modulus)
            .map(|modulus| Self { modulus })
            .ok_or(ConfigError::ZeroModulus)
    }

    pub fn modulus(&self) -> u32 {
        self.modulus.get()
    }

    pub fn index(&self, pos: IVec3) -> u32 {
        variant_index(pos, self.modulus)
    }
}
