//! Advisory derivation (Stage E, §4.E)
//!
//! Advisories never change a computed number — they annotate one.
//! `code` is the stable identifier; `rendered_text` is a default English
//! rendering a host may display as-is or replace with its own template.
//! A few codes (`unknown_hose_coeff`, `unknown_appliance`,
//! `supply_nonconverged`) only ever appear out of the lenient path: the
//! strict path raises a [`crate::HydraulicError`] in those situations
//! instead of annotating a result.

use crate::config::SolverConfig;
use crate::discharge::DischargeEvaluation;
use crate::model::{Advisory, DischargeLine, HavMode, Legs, Severity, SystemState};
use crate::supply::SupplyResult;
use crate::tables;
use pump_core::Port;

fn warn(code: &'static str, rendered_text: String) -> Advisory {
    Advisory {
        severity: Severity::Warn,
        code: code.to_string(),
        rendered_text,
    }
}

fn info(code: &'static str, rendered_text: String) -> Advisory {
    Advisory {
        severity: Severity::Info,
        code: code.to_string(),
        rendered_text,
    }
}

fn success(code: &'static str, rendered_text: String) -> Advisory {
    Advisory {
        severity: Severity::Success,
        code: code.to_string(),
        rendered_text,
    }
}

fn unknown_hose_diameters(legs: &Legs, discharges: &[DischargeLine]) -> Vec<f64> {
    let mut seen = Vec::new();
    for (_, leg) in legs.open_legs() {
        if tables::friction_coefficient_strict(leg.size_in).is_none() && !seen.contains(&leg.size_in) {
            seen.push(leg.size_in);
        }
    }
    for line in discharges.iter().filter(|d| d.gate_open) {
        if line.hose.coefficient_override.is_none()
            && tables::friction_coefficient_strict(line.hose.diameter_in).is_none()
            && !seen.contains(&line.hose.diameter_in)
        {
            seen.push(line.hose.diameter_in);
        }
    }
    seen
}

/// Derive the full advisory catalog for one recompute pass. `strict`
/// suppresses the three lenient-only fallback codes, which a strict
/// caller never sees because it fails outright instead.
pub fn derive(
    state: &SystemState,
    supply: &SupplyResult,
    discharge: &DischargeEvaluation,
    config: &SolverConfig,
    strict: bool,
) -> Vec<Advisory> {
    let mut advisories = Vec::new();

    if !strict {
        for diameter_in in unknown_hose_diameters(&state.legs, &state.discharges) {
            advisories.push(warn(
                "unknown_hose_coeff",
                format!(
                    "no friction coefficient on file for {diameter_in:.2}in hose; using the default coefficient"
                ),
            ));
        }

        if state.hav.enabled
            && state.hav.mode == HavMode::Bypass
            && state.legs.is_open(Port::Steamer)
            && tables::appliance_loss("hav_bypass").fell_back
        {
            advisories.push(warn(
                "unknown_appliance",
                "no psi-loss entry on file for the hydrant-assist valve bypass; assuming zero loss".to_string(),
            ));
        }

        if !supply.converged {
            advisories.push(warn(
                "supply_nonconverged",
                format!(
                    "supply-side solver did not converge after {} iterations; reporting its best estimate",
                    supply.iterations
                ),
            ));
        }
    }

    if supply.hydrant_residual_psi < config.residual_floor_psi {
        advisories.push(warn(
            "residual_below_floor",
            format!(
                "hydrant residual {:.1} psi is below the {:.0} psi floor",
                supply.hydrant_residual_psi, config.residual_floor_psi
            ),
        ));
    } else if supply.hydrant_residual_psi < 25.0 {
        advisories.push(warn(
            "residual_marginal",
            format!("hydrant residual {:.1} psi is only marginally above the floor", supply.hydrant_residual_psi),
        ));
    } else if supply.hydrant_residual_psi >= 40.0 {
        advisories.push(success(
            "residual_excellent",
            format!("hydrant residual {:.1} psi leaves ample reserve capacity", supply.hydrant_residual_psi),
        ));
    }

    if supply.engine_intake_psi < 25.0 {
        advisories.push(warn(
            "intake_low",
            format!("engine intake pressure {:.1} psi is low", supply.engine_intake_psi),
        ));
    }

    if discharge.cavitating {
        advisories.push(warn(
            "cavitation_risk",
            "engine intake pressure is below the cavitation guard for the current discharge pressure".to_string(),
        ));
    }

    if discharge.governor_limited {
        advisories.push(warn(
            "governor_limited",
            format!(
                "requested pump discharge pressure exceeds what the {:.0} psi governor ceiling can sustain at this flow",
                state.governor_psi
            ),
        ));
    }

    let open_leg_count = state.legs.open_legs().len();
    if open_leg_count == 1 && supply.total_inflow_gpm > 1000.0 {
        advisories.push(info(
            "single_leg_high_flow",
            format!("a single supply leg is carrying {:.0} gpm", supply.total_inflow_gpm),
        ));
    }
    if open_leg_count == 2 {
        advisories.push(success(
            "double_tap",
            "two supply legs are connected and open".to_string(),
        ));
    }
    if open_leg_count == 3 {
        advisories.push(info(
            "triple_tap",
            "all three supply legs are connected and open".to_string(),
        ));
    }

    if state.hav.enabled {
        match state.hav.mode {
            HavMode::Boost => advisories.push(info(
                "hav_boost_active",
                format!("hydrant-assist valve is boosting the steamer intake by {:.0} psi", state.hav.boost_psi),
            )),
            HavMode::Bypass => advisories.push(info(
                "hav_bypass_active",
                "hydrant-assist valve is in bypass on the steamer intake".to_string(),
            )),
        }
    }

    let small_hose_high_flow = state
        .legs
        .open_legs()
        .iter()
        .any(|(_, leg)| (leg.size_in - 3.0).abs() < 1e-6)
        && supply.total_inflow_gpm > 500.0;
    if small_hose_high_flow {
        advisories.push(warn(
            "small_hose_high_flow",
            format!("a 3in supply leg is in service at {:.0} gpm total inflow", supply.total_inflow_gpm),
        ));
    }

    advisories
}
