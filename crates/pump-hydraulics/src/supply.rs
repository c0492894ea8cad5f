//! Supply-side network equilibrium (Stage C, §4.C)
//!
//! The steamer and the two side intakes draw, in parallel, from the same
//! hydrant main. This stage is a pure function of the main and the legs
//! connected to it — it has no notion of what the discharge side is
//! asking for; that coupling only happens through the governor ceiling,
//! which bounds how much of this capacity the pump will actually use.
//!
//! Each open leg shares one unknown, the pressure at the pump intake
//! (`P_intake`): the flow a leg carries is whatever friction loss from
//! the static main pressure down to that shared intake pressure implies.
//! The solver is a damped fixed point on `P_intake`, re-checked on every
//! iteration against the hydrant main's own capacity curve (a hard
//! ceiling on total draw) and a running residual-pressure estimate kept
//! above the NFPA 291 floor by a backoff step.

use crate::config::SolverConfig;
use crate::discharge::pump_curve_max_gpm;
use crate::model::{Hav, HavMode, Legs, PerLegFlow};
use crate::tables;
use pump_core::Port;

/// Result of the supply-side solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupplyResult {
    /// Pressure available at the pump intake, psi.
    pub engine_intake_psi: f64,
    /// Total flow actually delivered across all open legs, gpm.
    pub total_inflow_gpm: f64,
    /// Residual pressure remaining in the hydrant main at that draw, psi.
    pub hydrant_residual_psi: f64,
    /// Per-leg share of `total_inflow_gpm`.
    pub per_leg_gpm: PerLegFlow,
    /// Iterations consumed (for diagnostics/tracing).
    pub iterations: u32,
    /// `false` if the solver exhausted `max_iter` without settling
    /// `P_intake` to within tolerance; callers should raise
    /// `supply_nonconverged` in that case.
    pub converged: bool,
}

struct OpenLeg {
    port: Port,
    coefficient: f64,
    length_ft: f64,
    appliance_loss_psi: f64,
    boost_psi: f64,
}

fn friction_loss(coefficient: f64, length_ft: f64, gpm: f64) -> f64 {
    coefficient * (gpm / 100.0).powi(2) * (length_ft / 100.0)
}

fn open_legs_with_hav(legs: &Legs, hav: Hav) -> Vec<OpenLeg> {
    legs.open_legs()
        .into_iter()
        .map(|(port, leg)| {
            let is_steamer = port == Port::Steamer;
            let (appliance_loss_psi, boost_psi) = if is_steamer && hav.enabled {
                match hav.mode {
                    HavMode::Bypass => (tables::appliance_loss("hav_bypass").value, 0.0),
                    HavMode::Boost => (0.0, hav.boost_psi),
                }
            } else {
                (0.0, 0.0)
            };
            OpenLeg {
                port,
                coefficient: tables::friction_coefficient(leg.size_in).value,
                length_ft: leg.length_ft,
                appliance_loss_psi,
                boost_psi,
            }
        })
        .collect()
}

/// Flow each leg carries given a shared `static_psi` source head and a
/// candidate pump intake pressure.
fn leg_flows(open: &[OpenLeg], static_psi: f64, p_intake: f64) -> Vec<f64> {
    open.iter()
        .map(|leg| {
            let r = leg.coefficient * leg.length_ft / 100.0;
            let head = static_psi - p_intake - leg.appliance_loss_psi + leg.boost_psi;
            if head <= 0.0 || r <= 0.0 {
                0.0
            } else {
                100.0 * (head / r).sqrt()
            }
        })
        .collect()
}

fn scale_to_total(flows: &mut [f64], target_total: f64) {
    let current: f64 = flows.iter().sum();
    if current <= 0.0 {
        return;
    }
    let factor = target_total / current;
    for q in flows.iter_mut() {
        *q *= factor;
    }
}

fn to_per_leg(open: &[OpenLeg], flows: &[f64]) -> PerLegFlow {
    let mut result = PerLegFlow::default();
    for (leg, q) in open.iter().zip(flows.iter()) {
        result.set(leg.port, *q);
    }
    result
}

/// Margin the step-d residual estimate must clear above the floor before
/// the solver accepts the current draw instead of backing off (§4.C step d).
const RESIDUAL_FLOOR_MARGIN_PSI: f64 = 1.0;

/// The hydrant main's residual pressure estimate at the current per-leg
/// draw (§4.C step d): `static_psi − 0.4·(flow-weighted friction loss)`.
/// This is a running estimate used only to decide whether to back off,
/// distinct from the capacity-ceiling formula (`Q_max_hyd = K·√(static−floor)`)
/// which only ever bounds total draw, never estimates residual at an
/// arbitrary flow.
fn flow_weighted_residual(static_psi: f64, open: &[OpenLeg], flows: &[f64]) -> f64 {
    let total: f64 = flows.iter().sum();
    if total <= 0.0 {
        return static_psi;
    }
    let weighted_loss: f64 = open
        .iter()
        .zip(flows.iter())
        .map(|(leg, q)| friction_loss(leg.coefficient, leg.length_ft, *q) * q)
        .sum::<f64>()
        / total;
    static_psi - 0.4 * weighted_loss
}

/// Solve the supply-side network (§4.C): a damped fixed point on the
/// engine intake pressure, capped by the hydrant main's own capacity
/// curve, the NFPA 291 residual floor, and the governor's flow ceiling.
pub fn solve_supply(
    static_psi: f64,
    legs: &Legs,
    hav: Hav,
    governor_psi: f64,
    pump_rated_gpm: f64,
    pump_rated_pressure_psi: f64,
    config: &SolverConfig,
) -> SupplyResult {
    let open = open_legs_with_hav(legs, hav);
    if open.is_empty() {
        tracing::debug!("no open supply legs, trivial supply result");
        return SupplyResult {
            engine_intake_psi: 0.0,
            total_inflow_gpm: 0.0,
            hydrant_residual_psi: static_psi,
            per_leg_gpm: PerLegFlow::default(),
            iterations: 0,
            converged: true,
        };
    }

    let span = tracing::debug_span!("solve_supply", static_psi, governor_psi);
    let _enter = span.enter();

    let q_max_hyd = config.hydrant_capacity_k * (static_psi - config.residual_floor_psi).max(0.0).sqrt();

    let mut p_intake = 0.3 * static_psi;
    let mut flows = leg_flows(&open, static_psi, p_intake);
    let mut converged = false;
    let mut iterations = 0;

    for iter in 1..=config.max_iter {
        iterations = iter;
        flows = leg_flows(&open, static_psi, p_intake);
        let mut total = flows.iter().sum::<f64>();

        if total > q_max_hyd && total > 0.0 {
            scale_to_total(&mut flows, q_max_hyd);
            total = q_max_hyd;
        }

        let residual_estimate = flow_weighted_residual(static_psi, &open, &flows);
        if residual_estimate < config.residual_floor_psi + RESIDUAL_FLOOR_MARGIN_PSI {
            p_intake *= config.residual_backoff;
            tracing::debug!(iter, total, residual_estimate, p_intake, "backing off toward residual floor");
            continue;
        }

        let implied: Vec<f64> = open
            .iter()
            .zip(flows.iter())
            .map(|(leg, q)| static_psi - friction_loss(leg.coefficient, leg.length_ft, *q) - leg.appliance_loss_psi + leg.boost_psi)
            .collect();
        let new_intake = implied.iter().sum::<f64>() / implied.len() as f64;

        if (new_intake - p_intake).abs() < config.intake_tolerance_psi {
            p_intake = new_intake;
            converged = true;
            tracing::debug!(iter, p_intake, total, "supply intake converged");
            break;
        }
        p_intake = config.damping * new_intake + (1.0 - config.damping) * p_intake;
    }

    if !converged {
        tracing::warn!(iterations, "supply solver did not converge within max_iter");
    }

    let mut total = flows.iter().sum::<f64>();
    let q_max_gov = pump_curve_max_gpm(pump_rated_gpm, pump_rated_pressure_psi, governor_psi);
    if total > q_max_gov && total > 0.0 {
        scale_to_total(&mut flows, q_max_gov);
        total = q_max_gov;
    }

    let residual = flow_weighted_residual(static_psi, &open, &flows);
    let intake = p_intake.max(0.0);

    let per_leg_gpm = to_per_leg(&open, &flows);
    let per_leg_gpm = PerLegFlow {
        steamer: per_leg_gpm.steamer.round(),
        side_a: per_leg_gpm.side_a.round(),
        side_b: per_leg_gpm.side_b.round(),
    };

    SupplyResult {
        engine_intake_psi: (intake * 10.0).round() / 10.0,
        total_inflow_gpm: total.round(),
        hydrant_residual_psi: (residual * 10.0).round() / 10.0,
        per_leg_gpm,
        iterations,
        converged,
    }
}
