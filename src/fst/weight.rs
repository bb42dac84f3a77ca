//! Tropical semiring weights.
//!
//! A weight is a cost: `times` adds costs along a path and `plus` keeps the
//! cheaper of two alternatives. `ONE` (0.0) is the cost of doing nothing and
//! `ZERO` (+inf) marks an impossible path.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weight(f32);

impl Weight {
    pub const ONE: Weight = Weight(0.0);
    pub const ZERO: Weight = Weight(f32::INFINITY);

    pub const fn new(value: f32) -> Self {
        Weight(value)
    }

    pub const fn value(self) -> f32 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == f32::INFINITY
    }

    /// Path extension: costs add, and an impossible prefix stays impossible.
    pub fn times(self, other: Weight) -> Weight {
        if self.is_zero() || other.is_zero() { Weight::ZERO } else { Weight(self.0 + other.0) }
    }

    /// Alternative paths: the cheaper one wins.
    pub fn plus(self, other: Weight) -> Weight {
        if other.0 < self.0 { other } else { self }
    }

    pub fn approx_eq(self, other: Weight, delta: f32) -> bool {
        if self.is_zero() || other.is_zero() {
            return self.is_zero() && other.is_zero();
        }
        (self.0 - other.0).abs() <= delta
    }

    /// Stable bit pattern, used when weights take part in a symbol encoding.
    pub(crate) fn bits(self) -> u32 {
        // -0.0 and 0.0 must encode the same way
        if self.0 == 0.0 { 0 } else { self.0.to_bits() }
    }
}

impl From<f32> for Weight {
    fn from(value: f32) -> Self {
        Weight(value)
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() { write!(f, "inf") } else { write!(f, "{}", self.0) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semiring_identities() {
        let w = Weight::new(1.5);
        assert_eq!(w.times(Weight::ONE), w);
        assert_eq!(w.plus(Weight::ZERO), w);
        assert!(w.times(Weight::ZERO).is_zero());
        assert_eq!(Weight::new(2.0).plus(Weight::new(-0.5)), Weight::new(-0.5));
    }

    #[test]
    fn negative_zero_encodes_like_zero() {
        assert_eq!(Weight::new(-0.0).bits(), Weight::ONE.bits());
    }
}
