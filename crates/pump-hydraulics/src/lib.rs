//! Pump Hydraulics - fire-service pump panel hydraulics engine
//!
//! A pure function from one snapshot of apparatus/hose-layout state to
//! its derived hydraulic picture: supply-side network equilibrium across
//! the steamer and side intakes (Stage C), per-discharge-line flow and
//! required pump discharge pressure against the apparatus's own
//! performance curve (Stage D), and the advisories that explain *why*
//! a number came out the way it did (Stage E). [`recompute`] never
//! fails; [`recompute_strict`] surfaces invalid input and a
//! nonconvergent supply solve as [`HydraulicError`] instead of an
//! advisory.

pub mod advisory;
pub mod config;
pub mod discharge;
pub mod engine;
pub mod error;
pub mod model;
pub mod nozzle;
pub mod supply;
pub mod tables;

pub use config::SolverConfig;
pub use discharge::{
    friction_loss, pump_curve_max_gpm, pump_curve_pressure_at, required_pdp, DischargeEvaluation,
};
pub use engine::{
    hydrant_flow_at_residual, recompute, recompute_strict, recompute_strict_with_config,
    recompute_with_config,
};
pub use error::{HydraulicError, Result};
pub use model::{
    Advisory, DischargeLine, DischargeResult, Derived, Hav, HavMode, HoseSpec, Legs, NozzleSpec,
    PerLegFlow, Severity, SupplyLeg, SystemState,
};
pub use nozzle::{nozzle_flow, validate_strict as validate_nozzle_strict, FREEMAN_COEFFICIENT};
pub use supply::{solve_supply, SupplyResult};
pub use tables::{
    appliance_loss, appliance_loss_strict, friction_coefficient, friction_coefficient_strict,
    Lookup, NozzlePreset, DEFAULT_APPLIANCE_LOSS, DEFAULT_FRICTION_COEFFICIENT,
};
