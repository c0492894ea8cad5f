//! Coefficient & Appliance Data Tables (Stage A)
//!
//! Resolves numeric constants from domain-literal keys: the IFSTA friction
//! coefficient for a hose diameter, and the psi loss an appliance (gate
//! valve, adapter, wye, ...) imposes. Both tables are embedded JSON,
//! compiled into the binary, and parsed once behind a `OnceLock` — no
//! filesystem access, no runtime mutation, safe to race on first use.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

const FRICTION_COEFFS_JSON: &str = include_str!("data/friction_coeffs.json");
const APPLIANCES_JSON: &str = include_str!("data/appliances.json");

/// Safe mid-range fallback used when a hose diameter has no table entry.
pub const DEFAULT_FRICTION_COEFFICIENT: f64 = 2.0;

/// Fallback used when an appliance id has no table entry.
pub const DEFAULT_APPLIANCE_LOSS: f64 = 0.0;

fn friction_table() -> &'static HashMap<String, f64> {
    static TABLE: OnceLock<HashMap<String, f64>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let table: HashMap<String, f64> = serde_json::from_str(FRICTION_COEFFS_JSON)
            .expect("embedded friction_coeffs.json must parse");
        tracing::info!(entries = table.len(), "loaded friction coefficient table");
        table
    })
}

fn appliance_table() -> &'static HashMap<String, f64> {
    static TABLE: OnceLock<HashMap<String, f64>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let table: HashMap<String, f64> =
            serde_json::from_str(APPLIANCES_JSON).expect("embedded appliances.json must parse");
        tracing::info!(entries = table.len(), "loaded appliance loss table");
        table
    })
}

/// Canonicalize a hose diameter into the string key the JSON table uses.
/// Float equality on caller-supplied diameters is safe here because the
/// data model constrains `diameter_in` to this closed set (§3); anything
/// else is treated as an unknown key, not a parse error.
fn diameter_key(diameter_in: f64) -> Option<&'static str> {
    const EPSILON: f64 = 1e-6;
    const KNOWN: [(f64, &str); 5] = [
        (1.75, "1.75"),
        (2.5, "2.5"),
        (3.0, "3"),
        (4.0, "4"),
        (5.0, "5"),
    ];
    KNOWN
        .iter()
        .find(|(value, _)| (value - diameter_in).abs() < EPSILON)
        .map(|(_, key)| *key)
}

/// Outcome of a table lookup: either a table hit, or a fallback value with
/// a flag telling the caller an advisory should be raised.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lookup {
    pub value: f64,
    pub fell_back: bool,
}

/// Resolve the friction-loss coefficient for a hose diameter (lenient mode).
///
/// `FL = C · (Q/100)² · (L/100)`. Unknown diameters fall back to
/// [`DEFAULT_FRICTION_COEFFICIENT`] rather than panicking.
pub fn friction_coefficient(diameter_in: f64) -> Lookup {
    match diameter_key(diameter_in).and_then(|key| friction_table().get(key)) {
        Some(value) => Lookup {
            value: *value,
            fell_back: false,
        },
        None => {
            tracing::warn!(diameter_in, "unknown hose diameter, using default coefficient");
            Lookup {
                value: DEFAULT_FRICTION_COEFFICIENT,
                fell_back: true,
            }
        }
    }
}

/// Resolve the friction-loss coefficient for a hose diameter (strict mode).
pub fn friction_coefficient_strict(diameter_in: f64) -> Option<f64> {
    diameter_key(diameter_in).and_then(|key| friction_table().get(key)).copied()
}

/// Resolve the psi loss an appliance imposes (lenient mode).
pub fn appliance_loss(id: &str) -> Lookup {
    match appliance_table().get(id) {
        Some(value) => Lookup {
            value: *value,
            fell_back: false,
        },
        None => {
            tracing::warn!(appliance_id = id, "unknown appliance id, assuming zero loss");
            Lookup {
                value: DEFAULT_APPLIANCE_LOSS,
                fell_back: true,
            }
        }
    }
}

/// Resolve the psi loss an appliance imposes (strict mode).
pub fn appliance_loss_strict(id: &str) -> Option<f64> {
    appliance_table().get(id).copied()
}

/// A catalog entry for a named preset nozzle (§6 data-file layout, optional).
#[derive(Debug, Clone, Deserialize)]
pub struct NozzlePreset {
    pub id: String,
    pub rated_gpm: f64,
    pub nozzle_pressure_psi: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn friction_coefficient_canonical_table() {
        assert_eq!(friction_coefficient(1.75).value, 15.5);
        assert_eq!(friction_coefficient(2.5).value, 2.0);
        assert_eq!(friction_coefficient(3.0).value, 0.8);
        assert_eq!(friction_coefficient(4.0).value, 0.2);
        assert_eq!(friction_coefficient(5.0).value, 0.08);
        for d in [1.75, 2.5, 3.0, 4.0, 5.0] {
            assert!(!friction_coefficient(d).fell_back);
        }
    }

    #[test]
    fn friction_coefficient_unknown_diameter_falls_back() {
        let lookup = friction_coefficient(6.0);
        assert_eq!(lookup.value, DEFAULT_FRICTION_COEFFICIENT);
        assert!(lookup.fell_back);
    }

    #[test]
    fn friction_coefficient_strict_mode_reports_absence() {
        assert_eq!(friction_coefficient_strict(5.0), Some(0.08));
        assert_eq!(friction_coefficient_strict(6.0), None);
    }

    #[test]
    fn appliance_loss_known_ids() {
        assert_eq!(appliance_loss("gate_valve").value, 2.0);
        assert_eq!(appliance_loss("storz_adapter_side_5in").value, 3.0);
        assert_eq!(appliance_loss("hav_bypass").value, 4.0);
        assert_eq!(appliance_loss("wye").value, 10.0);
        assert_eq!(appliance_loss("master_stream_device").value, 25.0);
    }

    #[test]
    fn appliance_loss_unknown_id_falls_back_to_zero() {
        let lookup = appliance_loss("nonexistent_appliance");
        assert_eq!(lookup.value, 0.0);
        assert!(lookup.fell_back);
    }
}
