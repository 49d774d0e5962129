//! Fixed-point scale factors.
//!
//! Digital zoom is expressed as a 16.16 fixed-point multiplier, where
//! `65536` means 1.0x (no zoom) and `524288` means 8.0x.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position into the ordered scale-factor table.
pub type ZoomIndex = usize;

/// A 16.16 fixed-point zoom multiplier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct ScaleFactor(u32);

impl ScaleFactor {
    /// Number of fractional bits.
    pub const FRACTION_BITS: u32 = 16;

    /// 1.0x, no zoom.
    pub const ONE: ScaleFactor = ScaleFactor(1 << Self::FRACTION_BITS);

    /// Wrap a raw 16.16 value.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw 16.16 value as written to the hardware.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Multiplier as a float.
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / Self::ONE.0 as f64
    }

    /// Returns true if this factor is exactly 1.0x.
    pub fn is_identity(self) -> bool {
        self == Self::ONE
    }
}

impl Default for ScaleFactor {
    fn default() -> Self {
        Self::ONE
    }
}

impl From<u32> for ScaleFactor {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ScaleFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}x", self.as_f64())
    }
}
