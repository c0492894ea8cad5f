//! The data model (§3): inputs (`SystemState`) and outputs (`Derived`).

use pump_core::{DischargeId, Port};
use serde::{Deserialize, Serialize};

/// A length of hose run between the pump (or hydrant) and the next fitting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoseSpec {
    /// Nominal diameter in inches; must key into the friction-coefficient
    /// table (§4.A) or fall back to a default with an advisory.
    pub diameter_in: f64,
    pub length_ft: f64,
    /// Caller-supplied coefficient that overrides the table lookup, e.g.
    /// for a field-calibrated value (see SPEC_FULL.md open question on 5in
    /// hose).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coefficient_override: Option<f64>,
}

impl HoseSpec {
    pub fn new(diameter_in: f64, length_ft: f64) -> Self {
        Self {
            diameter_in,
            length_ft,
            coefficient_override: None,
        }
    }

    pub fn with_coefficient_override(mut self, coefficient: f64) -> Self {
        self.coefficient_override = Some(coefficient);
        self
    }
}

/// A nozzle mounted at the end of a discharge line.
///
/// A closed sum type dispatched on `type` rather than a `kind` string field:
/// the compiler enforces every variant is handled at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NozzleSpec {
    SmoothBore {
        tip_in: f64,
        nozzle_pressure_psi: f64,
    },
    FogFixed {
        rated_gpm: f64,
        nozzle_pressure_psi: f64,
    },
    FogSelectable {
        rated_gpm: f64,
        nozzle_pressure_psi: f64,
    },
    FogAutomatic {
        rated_gpm: f64,
        nozzle_pressure_psi: f64,
    },
}

impl NozzleSpec {
    /// The nozzle pressure (NP) every variant is rated at.
    pub fn nozzle_pressure_psi(&self) -> f64 {
        match self {
            NozzleSpec::SmoothBore {
                nozzle_pressure_psi,
                ..
            }
            | NozzleSpec::FogFixed {
                nozzle_pressure_psi,
                ..
            }
            | NozzleSpec::FogSelectable {
                nozzle_pressure_psi,
                ..
            }
            | NozzleSpec::FogAutomatic {
                nozzle_pressure_psi,
                ..
            } => *nozzle_pressure_psi,
        }
    }

    /// `true` for every fog variant (constant-flow devices at/above rated NP).
    pub fn is_fog(&self) -> bool {
        !matches!(self, NozzleSpec::SmoothBore { .. })
    }
}

/// One of the two (optional) side supply intakes, or the steamer.
///
/// `gate_open` only has meaning for side legs: the steamer has no gate of
/// its own and is treated as open whenever it is connected (present in
/// [`Legs`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyLeg {
    pub size_in: f64,
    pub length_ft: f64,
    #[serde(default = "default_gate_open")]
    pub gate_open: bool,
}

fn default_gate_open() -> bool {
    true
}

impl SupplyLeg {
    pub fn new(size_in: f64, length_ft: f64) -> Self {
        Self {
            size_in,
            length_ft,
            gate_open: true,
        }
    }
}

/// The set of supply legs connected to the apparatus, keyed by port.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Legs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steamer: Option<SupplyLeg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_a: Option<SupplyLeg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_b: Option<SupplyLeg>,
}

impl Legs {
    pub fn get(&self, port: Port) -> Option<&SupplyLeg> {
        match port {
            Port::Steamer => self.steamer.as_ref(),
            Port::SideA => self.side_a.as_ref(),
            Port::SideB => self.side_b.as_ref(),
        }
    }

    pub fn set(&mut self, port: Port, leg: Option<SupplyLeg>) {
        match port {
            Port::Steamer => self.steamer = leg,
            Port::SideA => self.side_a = leg,
            Port::SideB => self.side_b = leg,
        }
    }

    /// A leg "carries flow" if connected, and (for sides) its gate is open.
    pub fn is_open(&self, port: Port) -> bool {
        match self.get(port) {
            None => false,
            Some(leg) => port == Port::Steamer || leg.gate_open,
        }
    }

    /// Open legs, in canonical port order.
    pub fn open_legs(&self) -> Vec<(Port, SupplyLeg)> {
        Port::ALL
            .iter()
            .filter(|p| self.is_open(**p))
            .map(|p| (*p, *self.get(*p).expect("is_open implies present")))
            .collect()
    }
}

/// Hydrant-assist valve mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HavMode {
    /// Passes flow through with a small fixed loss.
    Bypass,
    /// Adds head to the steamer leg's intake contribution.
    Boost,
}

/// Hydrant-assist valve configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hav {
    pub enabled: bool,
    pub mode: HavMode,
    pub outlets: u8,
    pub boost_psi: f64,
}

impl Default for Hav {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: HavMode::Bypass,
            outlets: 1,
            boost_psi: 0.0,
        }
    }
}

/// One discharge line: hose, nozzle, and the losses specific to that line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DischargeLine {
    pub id: DischargeId,
    pub hose: HoseSpec,
    pub nozzle: NozzleSpec,
    pub gate_open: bool,
    #[serde(default)]
    pub elevation_ft: f64,
    #[serde(default)]
    pub appliance_losses_psi: f64,
}

fn default_pump_rated_gpm() -> f64 {
    1500.0
}

fn default_pump_rated_pressure_psi() -> f64 {
    150.0
}

/// The complete input snapshot the engine is a pure function of.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemState {
    pub static_psi: f64,
    #[serde(default)]
    pub legs: Legs,
    #[serde(default)]
    pub hav: Hav,
    pub governor_psi: f64,
    pub pdp_psi: f64,
    #[serde(default)]
    pub discharges: Vec<DischargeLine>,
    #[serde(default = "default_pump_rated_gpm")]
    pub pump_rated_gpm: f64,
    #[serde(default = "default_pump_rated_pressure_psi")]
    pub pump_rated_pressure_psi: f64,
}

impl Default for SystemState {
    fn default() -> Self {
        Self {
            static_psi: 80.0,
            legs: Legs::default(),
            hav: Hav::default(),
            governor_psi: 150.0,
            pdp_psi: 150.0,
            discharges: Vec::new(),
            pump_rated_gpm: default_pump_rated_gpm(),
            pump_rated_pressure_psi: default_pump_rated_pressure_psi(),
        }
    }
}

/// Per-leg supply flow (gpm), in the same fixed shape as [`Legs`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerLegFlow {
    pub steamer: f64,
    pub side_a: f64,
    pub side_b: f64,
}

impl PerLegFlow {
    pub fn get(&self, port: Port) -> f64 {
        match port {
            Port::Steamer => self.steamer,
            Port::SideA => self.side_a,
            Port::SideB => self.side_b,
        }
    }

    pub fn set(&mut self, port: Port, value: f64) {
        match port {
            Port::Steamer => self.steamer = value,
            Port::SideA => self.side_a = value,
            Port::SideB => self.side_b = value,
        }
    }

    pub fn total(&self) -> f64 {
        self.steamer + self.side_a + self.side_b
    }
}

/// The derived projection of a single discharge line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DischargeResult {
    pub id: DischargeId,
    pub required_gpm: f64,
    pub actual_gpm: f64,
    pub friction_loss_psi: f64,
    pub required_pdp_psi: f64,
}

/// Advisory severity, fixed per code (§4.E).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warn,
    Info,
    Success,
}

/// A structured, renderable advisory message.
///
/// `code` is the stable identifier a host keys its own i18n/templates off
/// of; `rendered_text` is a default English template already filled with
/// the triggering values, for convenience only — it is not part of the
/// semantic contract (§4.E).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advisory {
    pub severity: Severity,
    pub code: String,
    pub rendered_text: String,
}

/// The complete output snapshot (§3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Derived {
    pub engine_intake_psi: f64,
    pub total_inflow_gpm: f64,
    pub hydrant_residual_psi: f64,
    pub per_leg_gpm: PerLegFlow,
    pub total_discharge_demand_gpm: f64,
    pub total_discharge_flow_gpm: f64,
    pub per_discharge: Vec<DischargeResult>,
    pub cavitating: bool,
    pub governor_limited: bool,
    pub advisories: Vec<Advisory>,
}
