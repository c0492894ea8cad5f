//! # Unit Conversion for Pump Hydraulics
//!
//! The engine itself is unit-pure: pressure in psi, flow in gpm, length in
//! feet, diameter in inches, and it never mixes them (§3). This module only
//! exists for callers at the boundary who work in SI and need to convert a
//! value before it enters (or after it leaves) a `SystemState`/`Derived`.
//!
//! All internal engine calculations use psi, gpm, and feet as base units.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pressure unit types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PressureUnit {
    /// Pounds per square inch (base unit)
    #[default]
    Psi,
    /// Kilopascals
    Kpa,
    /// Bar
    Bar,
}

impl PressureUnit {
    /// Conversion factor to psi (base unit)
    pub fn to_psi_factor(&self) -> f64 {
        match self {
            PressureUnit::Psi => 1.0,
            PressureUnit::Kpa => 0.1450377,
            PressureUnit::Bar => 14.5037738,
        }
    }

    /// Convert a value from this unit to psi
    pub fn to_psi(&self, value: f64) -> f64 {
        value * self.to_psi_factor()
    }

    /// Convert a value from psi to this unit
    pub fn from_psi(&self, value: f64) -> f64 {
        value / self.to_psi_factor()
    }

    /// Get the unit abbreviation
    pub fn abbreviation(&self) -> &'static str {
        match self {
            PressureUnit::Psi => "psi",
            PressureUnit::Kpa => "kPa",
            PressureUnit::Bar => "bar",
        }
    }

    fn all() -> &'static [PressureUnit] {
        &[PressureUnit::Psi, PressureUnit::Kpa, PressureUnit::Bar]
    }

    fn all_abbreviations(&self) -> &'static [&'static str] {
        match self {
            PressureUnit::Psi => &["psi"],
            PressureUnit::Kpa => &["kpa", "kilopascal", "kilopascals"],
            PressureUnit::Bar => &["bar"],
        }
    }
}

impl fmt::Display for PressureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// Flow unit types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FlowUnit {
    /// Gallons per minute (base unit)
    #[default]
    Gpm,
    /// Liters per minute
    Lpm,
}

impl FlowUnit {
    /// Conversion factor to gpm (base unit)
    pub fn to_gpm_factor(&self) -> f64 {
        match self {
            FlowUnit::Gpm => 1.0,
            FlowUnit::Lpm => 0.2641721,
        }
    }

    /// Convert a value from this unit to gpm
    pub fn to_gpm(&self, value: f64) -> f64 {
        value * self.to_gpm_factor()
    }

    /// Convert a value from gpm to this unit
    pub fn from_gpm(&self, value: f64) -> f64 {
        value / self.to_gpm_factor()
    }

    /// Get the unit abbreviation
    pub fn abbreviation(&self) -> &'static str {
        match self {
            FlowUnit::Gpm => "gpm",
            FlowUnit::Lpm => "Lpm",
        }
    }

    fn all() -> &'static [FlowUnit] {
        &[FlowUnit::Gpm, FlowUnit::Lpm]
    }

    fn all_abbreviations(&self) -> &'static [&'static str] {
        match self {
            FlowUnit::Gpm => &["gpm"],
            FlowUnit::Lpm => &["lpm", "l/min", "liter per minute", "liters per minute"],
        }
    }
}

impl fmt::Display for FlowUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// Length unit types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// Feet (base unit)
    #[default]
    Foot,
    /// Inches
    Inch,
    /// Meters
    Meter,
    /// Millimeters
    Millimeter,
}

impl LengthUnit {
    /// Conversion factor to feet (base unit)
    pub fn to_ft_factor(&self) -> f64 {
        match self {
            LengthUnit::Foot => 1.0,
            LengthUnit::Inch => 1.0 / 12.0,
            LengthUnit::Meter => 3.2808399,
            LengthUnit::Millimeter => 0.0032808399,
        }
    }

    /// Convert a value from this unit to feet
    pub fn to_ft(&self, value: f64) -> f64 {
        value * self.to_ft_factor()
    }

    /// Convert a value from feet to this unit
    pub fn from_ft(&self, value: f64) -> f64 {
        value / self.to_ft_factor()
    }

    /// Get the unit abbreviation
    pub fn abbreviation(&self) -> &'static str {
        match self {
            LengthUnit::Foot => "ft",
            LengthUnit::Inch => "in",
            LengthUnit::Meter => "m",
            LengthUnit::Millimeter => "mm",
        }
    }

    fn all() -> &'static [LengthUnit] {
        &[
            LengthUnit::Foot,
            LengthUnit::Inch,
            LengthUnit::Meter,
            LengthUnit::Millimeter,
        ]
    }

    fn all_abbreviations(&self) -> &'static [&'static str] {
        match self {
            LengthUnit::Foot => &["ft", "foot", "feet", "'"],
            LengthUnit::Inch => &["in", "inch", "inches", "\""],
            LengthUnit::Meter => &["m", "meter", "meters"],
            LengthUnit::Millimeter => &["mm", "millimeter", "millimeters"],
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// Error type for unit parsing
#[derive(Debug, Clone, PartialEq)]
pub struct ParseUnitError {
    pub input: String,
    pub message: String,
}

impl fmt::Display for ParseUnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse '{}': {}", self.input, self.message)
    }
}

impl std::error::Error for ParseUnitError {}

/// Parse a unit abbreviation against a fixed set of known units.
fn parse_unit<U: Copy>(
    s: &str,
    all: &'static [U],
    abbrevs: impl Fn(&U) -> &'static [&'static str],
    valid_hint: &str,
) -> Result<U, ParseUnitError> {
    let needle = s.trim().to_lowercase();
    for unit in all {
        if abbrevs(unit).contains(&needle.as_str()) {
            return Ok(*unit);
        }
    }
    Err(ParseUnitError {
        input: s.to_string(),
        message: format!("unknown unit, expected one of: {}", valid_hint),
    })
}

impl FromStr for PressureUnit {
    type Err = ParseUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_unit(s, Self::all(), Self::all_abbreviations, "psi, kPa, bar")
    }
}

impl FromStr for FlowUnit {
    type Err = ParseUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_unit(s, Self::all(), Self::all_abbreviations, "gpm, Lpm")
    }
}

impl FromStr for LengthUnit {
    type Err = ParseUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_unit(s, Self::all(), Self::all_abbreviations, "ft, in, m, mm")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn psi_round_trips_through_kpa() {
        let psi = 100.0;
        let kpa = PressureUnit::Kpa.from_psi(psi);
        let back = PressureUnit::Kpa.to_psi(kpa);
        assert!((back - psi).abs() < 1e-6);
    }

    #[test]
    fn gpm_round_trips_through_lpm() {
        let gpm = 500.0;
        let lpm = FlowUnit::Lpm.from_gpm(gpm);
        let back = FlowUnit::Lpm.to_gpm(lpm);
        assert!((back - gpm).abs() < 1e-6);
    }

    #[test]
    fn feet_round_trips_through_meters() {
        let ft = 100.0;
        let m = LengthUnit::Meter.from_ft(ft);
        let back = LengthUnit::Meter.to_ft(m);
        assert!((back - ft).abs() < 1e-6);
    }

    #[test]
    fn inch_to_feet_twelve_to_one() {
        assert!((LengthUnit::Inch.to_ft(12.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn parse_pressure_unit_case_insensitive() {
        assert_eq!("PSI".parse::<PressureUnit>().unwrap(), PressureUnit::Psi);
        assert_eq!("kPa".parse::<PressureUnit>().unwrap(), PressureUnit::Kpa);
    }

    #[test]
    fn parse_unknown_unit_is_error() {
        assert!("furlongs".parse::<LengthUnit>().is_err());
    }
}
