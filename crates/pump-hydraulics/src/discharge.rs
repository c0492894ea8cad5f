//! Discharge-side evaluation (Stage D, §4.D)
//!
//! Each line has a nominal required flow and required pump discharge
//! pressure (PDP). What the apparatus can actually deliver is capped by
//! the supply the network can provide (Stage C), the governor's flow
//! ceiling at its pressure setpoint, and cavitation. When demand exceeds
//! what's deliverable, flow is distributed proportionally across lines,
//! then smooth-bore lines are refined against the true orifice law
//! rather than left on the linear approximation.

use crate::config::SolverConfig;
use crate::model::{DischargeLine, DischargeResult, NozzleSpec};
use crate::nozzle;
use crate::tables;

const PSI_PER_FOOT_ELEVATION: f64 = 0.434;

fn hose_coefficient(hose: &crate::model::HoseSpec) -> f64 {
    hose.coefficient_override
        .unwrap_or_else(|| tables::friction_coefficient(hose.diameter_in).value)
}

/// Friction loss in a hose run at a given flow: `FL = C·(Q/100)²·(L/100)`.
pub fn friction_loss(gpm: f64, hose: &crate::model::HoseSpec) -> f64 {
    hose_coefficient(hose) * (gpm / 100.0).powi(2) * (hose.length_ft / 100.0)
}

/// Required pump discharge pressure for a line at its nominal required flow.
pub fn required_pdp(line: &DischargeLine) -> f64 {
    let gpm = nozzle::nozzle_flow(&line.nozzle);
    line.nozzle.nozzle_pressure_psi()
        + friction_loss(gpm, &line.hose)
        + line.appliance_losses_psi
        + line.elevation_ft * PSI_PER_FOOT_ELEVATION
}

/// The NFPA 1901 pump curve knots, as (pressure fraction of rated,
/// capacity fraction of rated) pairs.
const CURVE_KNOTS: [(f64, f64); 3] = [(0.5, 1.10), (1.0, 1.0), (1.5, 0.65)];

/// Maximum sustainable total flow at `operating_psi`, per the apparatus's
/// piecewise-linear NFPA 1901 performance curve. Flat beyond the end
/// knots: at or below 50% of rated pressure the curve flattens at 110%
/// of rated capacity; at or above 150% it flattens at 65%.
pub fn pump_curve_max_gpm(rated_gpm: f64, rated_pressure_psi: f64, operating_psi: f64) -> f64 {
    if rated_pressure_psi <= 0.0 {
        return rated_gpm;
    }
    let fraction = operating_psi / rated_pressure_psi;
    curve_lookup(fraction) * rated_gpm
}

fn curve_lookup(fraction: f64) -> f64 {
    if fraction <= CURVE_KNOTS[0].0 {
        return CURVE_KNOTS[0].1;
    }
    if fraction >= CURVE_KNOTS[2].0 {
        return CURVE_KNOTS[2].1;
    }
    for window in CURVE_KNOTS.windows(2) {
        let (x0, y0) = window[0];
        let (x1, y1) = window[1];
        if fraction >= x0 && fraction <= x1 {
            let t = (fraction - x0) / (x1 - x0);
            return y0 + t * (y1 - y0);
        }
    }
    unreachable!("fraction bounds are checked above")
}

/// Inverse of [`pump_curve_max_gpm`]: the operating pressure at which the
/// curve would sustain exactly `flow_gpm`. The curve is monotonically
/// decreasing in pressure, so this is well-defined; flows at or above
/// the low-pressure plateau (110% of rated) map to `0.5·rated_pressure`,
/// and flows at or below the high-pressure plateau (65%) map to
/// `1.5·rated_pressure`.
pub fn pump_curve_pressure_at(rated_gpm: f64, rated_pressure_psi: f64, flow_gpm: f64) -> f64 {
    if rated_gpm <= 0.0 {
        return rated_pressure_psi;
    }
    let target = flow_gpm / rated_gpm;
    if target >= CURVE_KNOTS[0].1 {
        return CURVE_KNOTS[0].0 * rated_pressure_psi;
    }
    if target <= CURVE_KNOTS[2].1 {
        return CURVE_KNOTS[2].0 * rated_pressure_psi;
    }
    for window in CURVE_KNOTS.windows(2) {
        let (x0, y0) = window[0];
        let (x1, y1) = window[1];
        // y is decreasing as x increases, so y1 <= target <= y0 here.
        if target <= y0 && target >= y1 {
            let t = (y0 - target) / (y0 - y1);
            return (x0 + t * (x1 - x0)) * rated_pressure_psi;
        }
    }
    unreachable!("fraction bounds are checked above")
}

/// Minimum engine intake pressure below which cavitation sets in, scaled
/// with the pump discharge pressure being demanded.
fn cavitation_floor_psi(pdp_psi: f64) -> f64 {
    if pdp_psi > 200.0 {
        15.0
    } else if pdp_psi > 150.0 {
        10.0
    } else {
        5.0
    }
}

/// Newton-refine a smooth-bore line's achievable flow against the true
/// orifice law, rather than the linear proportional approximation, when
/// the line is pressure-starved. Converges in a handful of steps because
/// the residual is smooth and nearly quadratic in `q`.
fn refine_smoothbore_flow(
    tip_in: f64,
    hose: &crate::model::HoseSpec,
    appliance_losses_psi: f64,
    elevation_ft: f64,
    available_pdp_psi: f64,
    initial_guess_gpm: f64,
) -> f64 {
    let coefficient = hose_coefficient(hose);
    let freeman_denominator = nozzle::FREEMAN_COEFFICIENT * tip_in.powi(2);
    if freeman_denominator <= 0.0 || available_pdp_psi <= 0.0 {
        return 0.0;
    }
    let fixed = appliance_losses_psi + elevation_ft * PSI_PER_FOOT_ELEVATION;

    let residual = |q: f64| -> f64 {
        let np = (q / freeman_denominator).powi(2);
        let fl = coefficient * (q / 100.0).powi(2) * (hose.length_ft / 100.0);
        np + fl + fixed - available_pdp_psi
    };
    let residual_derivative = |q: f64| -> f64 {
        2.0 * q / freeman_denominator.powi(2) + 2.0 * coefficient * q / 10_000.0 * (hose.length_ft / 100.0)
    };

    let mut q = initial_guess_gpm.max(1.0);
    for _ in 0..5 {
        let r = residual(q);
        let d = residual_derivative(q);
        if d.abs() < 1e-9 {
            break;
        }
        let next = q - r / d;
        if !next.is_finite() || next < 0.0 {
            return 0.0;
        }
        if (next - q).abs() < 1e-3 {
            q = next;
            break;
        }
        q = next;
    }
    q.max(0.0)
}

/// A fog nozzle is constant-flow at its rated gpm as long as the line
/// receives at least its required pressure, and zero otherwise — it has
/// no throttled-in-between state.
fn fog_flow_at(line: &DischargeLine, rated_gpm: f64, available_pdp_psi: f64) -> f64 {
    if available_pdp_psi + 1e-9 >= required_pdp(line) {
        rated_gpm
    } else {
        0.0
    }
}

/// Result of evaluating every discharge line against the flow the pump
/// can actually deliver.
#[derive(Debug, Clone, PartialEq)]
pub struct DischargeEvaluation {
    pub per_discharge: Vec<DischargeResult>,
    pub total_discharge_demand_gpm: f64,
    pub total_discharge_flow_gpm: f64,
    pub cavitating: bool,
    pub governor_limited: bool,
}

/// Evaluate all discharge lines against the pump's capability (§4.D).
///
/// `supply_gpm` is Stage C's computed supply capacity, independent of
/// what the discharges actually demand; `engine_intake_psi` and
/// `pdp_psi` are likewise Stage C's and the caller's setpoint.
#[allow(clippy::too_many_arguments)]
pub fn evaluate_discharges(
    discharges: &[DischargeLine],
    supply_gpm: f64,
    engine_intake_psi: f64,
    pdp_psi: f64,
    governor_psi: f64,
    pump_rated_gpm: f64,
    pump_rated_pressure_psi: f64,
    config: &SolverConfig,
) -> DischargeEvaluation {
    let open: Vec<&DischargeLine> = discharges.iter().filter(|d| d.gate_open).collect();

    let demands: Vec<f64> = open.iter().map(|d| nozzle::nozzle_flow(&d.nozzle)).collect();
    let total_demand: f64 = demands.iter().sum();

    let cavitating = engine_intake_psi < cavitation_floor_psi(pdp_psi);
    let governor_limited = if total_demand > 0.0 {
        pdp_psi > pump_curve_pressure_at(pump_rated_gpm, pump_rated_pressure_psi, total_demand)
    } else {
        false
    };

    let gov_cap = pump_curve_max_gpm(pump_rated_gpm, pump_rated_pressure_psi, governor_psi);
    let mut deliverable_total = total_demand.min(supply_gpm).min(gov_cap).max(0.0);
    if cavitating {
        deliverable_total = deliverable_total.min(0.5 * supply_gpm);
    }

    let scale = if total_demand > 0.0 {
        deliverable_total / total_demand
    } else {
        0.0
    };

    let mut per_discharge = Vec::with_capacity(discharges.len());
    for line in discharges.iter() {
        if !line.gate_open {
            per_discharge.push(DischargeResult {
                id: line.id,
                required_gpm: nozzle::nozzle_flow(&line.nozzle),
                actual_gpm: 0.0,
                friction_loss_psi: 0.0,
                required_pdp_psi: required_pdp(line),
            });
            continue;
        }
        let required_gpm = &nozzle::nozzle_flow(&line.nozzle);
        let proportional_gpm = required_gpm * scale;
        let starved = proportional_gpm + 1e-6 < *required_gpm;

        let actual_gpm = if starved && config.refine_pressure_starved_smoothbore {
            match line.nozzle {
                NozzleSpec::SmoothBore { tip_in, .. } => refine_smoothbore_flow(
                    tip_in,
                    &line.hose,
                    line.appliance_losses_psi,
                    line.elevation_ft,
                    pdp_psi,
                    proportional_gpm,
                ),
                _ => fog_flow_at(line, *required_gpm, pdp_psi).min(proportional_gpm.max(0.0)).max(0.0),
            }
        } else {
            proportional_gpm
        };

        per_discharge.push(DischargeResult {
            id: line.id,
            required_gpm: *required_gpm,
            actual_gpm: actual_gpm.round(),
            friction_loss_psi: friction_loss(actual_gpm, &line.hose),
            required_pdp_psi: required_pdp(line),
        });
    }

    let total_discharge_flow_gpm = per_discharge.iter().map(|d| d.actual_gpm).sum();

    DischargeEvaluation {
        per_discharge,
        total_discharge_demand_gpm: total_demand,
        total_discharge_flow_gpm,
        cavitating,
        governor_limited,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HoseSpec;
    use pump_core::DischargeId;

    fn smoothbore_line(id: u32, tip_in: f64, np: f64) -> DischargeLine {
        DischargeLine {
            id: DischargeId::new(id),
            hose: HoseSpec::new(1.75, 200.0),
            nozzle: NozzleSpec::SmoothBore {
                tip_in,
                nozzle_pressure_psi: np,
            },
            gate_open: true,
            elevation_ft: 0.0,
            appliance_losses_psi: 0.0,
        }
    }

    #[test]
    fn pump_curve_matches_rated_knots() {
        assert_eq!(pump_curve_max_gpm(1500.0, 150.0, 75.0), 1650.0);
        assert_eq!(pump_curve_max_gpm(1500.0, 150.0, 150.0), 1500.0);
        assert!((pump_curve_max_gpm(1500.0, 150.0, 225.0) - 975.0).abs() < 1e-9);
    }

    #[test]
    fn pump_curve_flat_beyond_knots() {
        assert_eq!(pump_curve_max_gpm(1500.0, 150.0, 10.0), 1650.0);
        assert_eq!(pump_curve_max_gpm(1500.0, 150.0, 400.0), 975.0);
    }

    #[test]
    fn pump_curve_pressure_at_is_consistent_with_forward_curve() {
        let pressure = pump_curve_pressure_at(1500.0, 150.0, 1200.0);
        let flow = pump_curve_max_gpm(1500.0, 150.0, pressure);
        assert!((flow - 1200.0).abs() < 1e-6);
    }

    #[test]
    fn full_capacity_serves_demand_unscaled() {
        let lines = vec![smoothbore_line(1, 0.9375, 50.0)];
        let config = SolverConfig::default();
        let eval = evaluate_discharges(&lines, 5000.0, 60.0, 150.0, 150.0, 1500.0, 150.0, &config);
        assert!(!eval.cavitating);
        assert!((eval.per_discharge[0].actual_gpm - eval.per_discharge[0].required_gpm).abs() < 1.0);
    }

    #[test]
    fn low_intake_pressure_flags_cavitation() {
        let lines = vec![smoothbore_line(1, 0.9375, 50.0)];
        let config = SolverConfig::default();
        let eval = evaluate_discharges(&lines, 5000.0, 3.0, 150.0, 150.0, 1500.0, 150.0, &config);
        assert!(eval.cavitating);
    }

    #[test]
    fn cavitation_derates_to_half_of_supply() {
        let lines = vec![smoothbore_line(1, 2.0, 50.0), smoothbore_line(2, 2.0, 50.0)];
        let config = SolverConfig::default();
        let eval = evaluate_discharges(&lines, 400.0, 3.0, 150.0, 150.0, 1500.0, 150.0, &config);
        assert!(eval.cavitating);
        assert!(eval.total_discharge_flow_gpm <= 200.0 + 1.0);
    }

    #[test]
    fn closed_gate_lines_report_zero_flow_but_stay_in_output() {
        let mut line = smoothbore_line(1, 0.9375, 50.0);
        line.gate_open = false;
        let config = SolverConfig::default();
        let eval = evaluate_discharges(&[line], 5000.0, 60.0, 150.0, 150.0, 1500.0, 150.0, &config);
        assert_eq!(eval.per_discharge.len(), 1);
        assert_eq!(eval.per_discharge[0].actual_gpm, 0.0);
        assert_eq!(eval.per_discharge[0].friction_loss_psi, 0.0);
        assert_eq!(eval.total_discharge_demand_gpm, 0.0);
    }

    #[test]
    fn overwhelmed_supply_scales_lines_proportionally() {
        let lines = vec![smoothbore_line(1, 2.0, 50.0), smoothbore_line(2, 2.0, 50.0)];
        let config = SolverConfig::default();
        let eval = evaluate_discharges(&lines, 100.0, 60.0, 150.0, 150.0, 200.0, 150.0, &config);
        assert!(eval.total_discharge_flow_gpm < eval.total_discharge_demand_gpm);
        for d in &eval.per_discharge {
            assert!(d.actual_gpm <= d.required_gpm);
        }
    }
}
