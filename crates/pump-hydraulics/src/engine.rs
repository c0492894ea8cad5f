//! Top-level entry points (§6, §7): wires stages A–E together.
//!
//! `recompute` is the lenient default: unknown table keys and a
//! nonconvergent supply solve fall back to a safe value and an advisory.
//! `recompute_strict` raises [`crate::HydraulicError`] instead, for
//! callers (CLI `--strict`, the `PUMP_HYDRAULICS_STRICT` env var) who
//! would rather fail than silently approximate.

use crate::advisory;
use crate::config::SolverConfig;
use crate::discharge::{self, DischargeEvaluation};
use crate::error::{HydraulicError, Result};
use crate::model::{Derived, SystemState};
use crate::nozzle;
use crate::supply::{self, SupplyResult};

fn run_stages(state: &SystemState, config: &SolverConfig) -> (SupplyResult, DischargeEvaluation) {
    let supply = supply::solve_supply(
        state.static_psi,
        &state.legs,
        state.hav,
        state.governor_psi,
        state.pump_rated_gpm,
        state.pump_rated_pressure_psi,
        config,
    );
    let discharge = discharge::evaluate_discharges(
        &state.discharges,
        supply.total_inflow_gpm,
        supply.engine_intake_psi,
        state.pdp_psi,
        state.governor_psi,
        state.pump_rated_gpm,
        state.pump_rated_pressure_psi,
        config,
    );
    (supply, discharge)
}

fn assemble(
    state: &SystemState,
    supply: SupplyResult,
    discharge: DischargeEvaluation,
    config: &SolverConfig,
    strict: bool,
) -> Derived {
    let advisories = advisory::derive(state, &supply, &discharge, config, strict);
    Derived {
        engine_intake_psi: supply.engine_intake_psi,
        total_inflow_gpm: supply.total_inflow_gpm,
        hydrant_residual_psi: supply.hydrant_residual_psi,
        per_leg_gpm: supply.per_leg_gpm,
        total_discharge_demand_gpm: discharge.total_discharge_demand_gpm,
        total_discharge_flow_gpm: discharge.total_discharge_flow_gpm,
        per_discharge: discharge.per_discharge,
        cavitating: discharge.cavitating,
        governor_limited: discharge.governor_limited,
        advisories,
    }
}

/// Recompute the full hydraulic picture from a system snapshot, using the
/// default solver tuning. Never fails: unknown table keys and supply
/// nonconvergence surface as advisories in [`Derived::advisories`].
pub fn recompute(state: &SystemState) -> Derived {
    recompute_with_config(state, &SolverConfig::default())
}

/// As [`recompute`], with an explicit [`SolverConfig`].
pub fn recompute_with_config(state: &SystemState, config: &SolverConfig) -> Derived {
    let span = tracing::info_span!("recompute", static_psi = state.static_psi, pdp_psi = state.pdp_psi);
    let _enter = span.enter();
    let (supply, discharge) = run_stages(state, config);
    tracing::info!(
        engine_intake_psi = supply.engine_intake_psi,
        total_inflow_gpm = supply.total_inflow_gpm,
        cavitating = discharge.cavitating,
        "recompute complete"
    );
    assemble(state, supply, discharge, config, false)
}

/// Validate every discharge line's nozzle before running the solve.
fn validate_strict(state: &SystemState) -> Result<()> {
    for line in &state.discharges {
        nozzle::validate_strict(&line.nozzle)?;
        if line.hose.diameter_in <= 0.0 {
            return Err(HydraulicError::InvalidHose(format!(
                "hose diameter must be positive, got {}",
                line.hose.diameter_in
            )));
        }
        if line.hose.length_ft < 0.0 {
            return Err(HydraulicError::InvalidHose(format!(
                "hose length cannot be negative, got {}",
                line.hose.length_ft
            )));
        }
    }
    if state.static_psi < 0.0 {
        return Err(HydraulicError::InvalidState(format!(
            "static pressure cannot be negative, got {}",
            state.static_psi
        )));
    }
    if state.pump_rated_gpm <= 0.0 || state.pump_rated_pressure_psi <= 0.0 {
        return Err(HydraulicError::InvalidState(
            "pump rated flow and pressure must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Strict-mode recompute: raises [`HydraulicError`] on invalid input or on
/// a nonconvergent supply solve, rather than degrading to an advisory.
pub fn recompute_strict(state: &SystemState) -> Result<Derived> {
    recompute_strict_with_config(state, &SolverConfig::default())
}

/// As [`recompute_strict`], with an explicit [`SolverConfig`].
pub fn recompute_strict_with_config(state: &SystemState, config: &SolverConfig) -> Result<Derived> {
    let span = tracing::info_span!("recompute_strict", static_psi = state.static_psi, pdp_psi = state.pdp_psi);
    let _enter = span.enter();

    validate_strict(state)?;

    let (supply, discharge) = run_stages(state, config);
    if !supply.converged {
        tracing::warn!(iterations = supply.iterations, "strict recompute rejecting nonconvergent supply solve");
        return Err(HydraulicError::SolverNonConvergent {
            iterations: supply.iterations,
            residual_error: config.residual_floor_psi - supply.hydrant_residual_psi,
        });
    }

    tracing::info!(
        engine_intake_psi = supply.engine_intake_psi,
        total_inflow_gpm = supply.total_inflow_gpm,
        cavitating = discharge.cavitating,
        "recompute_strict complete"
    );
    Ok(assemble(state, supply, discharge, config, true))
}

/// NFPA 291 hydrant flow-test formula: available flow at `target_residual_psi`
/// given a test flow/pressure-drop pair, assuming the classic orifice-law
/// exponent. `Q_target = Q_test · √((P_static − P_target) / (P_static − P_test))`.
pub fn hydrant_flow_at_residual(
    static_psi: f64,
    test_residual_psi: f64,
    test_flow_gpm: f64,
    target_residual_psi: f64,
) -> f64 {
    let test_drop = static_psi - test_residual_psi;
    if test_drop <= 0.0 {
        return test_flow_gpm;
    }
    let target_drop = (static_psi - target_residual_psi).max(0.0);
    test_flow_gpm * (target_drop / test_drop).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DischargeLine, HoseSpec, Legs, NozzleSpec, SupplyLeg};
    use pump_core::{DischargeId, Port};

    fn scenario() -> SystemState {
        let mut legs = Legs::default();
        legs.set(Port::Steamer, Some(SupplyLeg::new(5.0, 100.0)));
        SystemState {
            static_psi: 80.0,
            legs,
            hav: Default::default(),
            governor_psi: 250.0,
            pdp_psi: 150.0,
            discharges: vec![DischargeLine {
                id: DischargeId::new(1),
                hose: HoseSpec::new(1.75, 200.0),
                nozzle: NozzleSpec::SmoothBore {
                    tip_in: 1.0,
                    nozzle_pressure_psi: 50.0,
                },
                gate_open: true,
                elevation_ft: 0.0,
                appliance_losses_psi: 0.0,
            }],
            pump_rated_gpm: 1500.0,
            pump_rated_pressure_psi: 150.0,
        }
    }

    #[test]
    fn recompute_is_deterministic() {
        let state = scenario();
        let a = recompute(&state);
        let b = recompute(&state);
        assert_eq!(a, b);
    }

    #[test]
    fn recompute_meets_demand_in_a_healthy_scenario() {
        let state = scenario();
        let derived = recompute(&state);
        assert!(!derived.cavitating);
        assert!(derived.per_discharge[0].actual_gpm > 0.0);
    }

    #[test]
    fn recompute_strict_rejects_invalid_nozzle() {
        let mut state = scenario();
        state.discharges[0].nozzle = NozzleSpec::SmoothBore {
            tip_in: 0.0,
            nozzle_pressure_psi: 50.0,
        };
        assert!(matches!(
            recompute_strict(&state),
            Err(HydraulicError::InvalidNozzle(_))
        ));
    }

    #[test]
    fn recompute_strict_accepts_a_healthy_scenario() {
        let state = scenario();
        assert!(recompute_strict(&state).is_ok());
    }

    #[test]
    fn hydrant_flow_at_residual_matches_nfpa_291_formula() {
        // classic textbook example: 1000gpm test flow drops a 80psi main to 40psi;
        // what flow is available at the 20psi floor?
        let q20 = hydrant_flow_at_residual(80.0, 40.0, 1000.0, 20.0);
        let expected = 1000.0 * ((80.0 - 20.0) / (80.0 - 40.0f64)).sqrt();
        assert!((q20 - expected).abs() < 1e-9);
    }
}
