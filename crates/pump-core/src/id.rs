//! Discharge line identifiers
//!
//! Unlike the CAD entity ids this crate's sibling engines mint internally,
//! a [`DischargeId`] is always supplied by the caller: the hydraulics engine
//! has no RNG and no clock, so it never generates identifiers of its own. A
//! caller re-submitting the same `DischargeId` across calls is how per-line
//! output in `Derived` lines back up with per-line input in `SystemState`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A stable, caller-assigned identifier for a discharge line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DischargeId(pub u32);

impl DischargeId {
    /// Wrap a raw numeric id.
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the inner numeric value.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for DischargeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DischargeId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(DischargeId)
    }
}

impl From<u32> for DischargeId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}
