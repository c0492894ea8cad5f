//! End-to-end recompute scenarios.

use pump_core::{DischargeId, Port};
use pump_hydraulics::{
    recompute, recompute_strict, DischargeLine, Hav, HavMode, HoseSpec, Legs, NozzleSpec,
    SupplyLeg, SystemState,
};

fn single_steamer_state(size_in: f64, length_ft: f64) -> SystemState {
    let mut legs = Legs::default();
    legs.set(Port::Steamer, Some(SupplyLeg::new(size_in, length_ft)));
    SystemState {
        static_psi: 80.0,
        legs,
        hav: Hav::default(),
        governor_psi: 250.0,
        pdp_psi: 150.0,
        discharges: Vec::new(),
        pump_rated_gpm: 1500.0,
        pump_rated_pressure_psi: 150.0,
    }
}

fn smoothbore(id: u32, tip_in: f64, np: f64, hose_diameter: f64, hose_length: f64) -> DischargeLine {
    DischargeLine {
        id: DischargeId::new(id),
        hose: HoseSpec::new(hose_diameter, hose_length),
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
fn single_handline_healthy_supply_meets_demand() {
    let mut state = single_steamer_state(5.0, 100.0);
    state.discharges.push(smoothbore(1, 0.875, 50.0, 1.75, 200.0));

    let derived = recompute(&state);
    assert!(!derived.governor_limited);
    let line = &derived.per_discharge[0];
    assert!(line.actual_gpm > 0.0);
    assert!(line.actual_gpm <= line.required_gpm + 1.0);
}

#[test]
fn no_supply_connected_starves_every_line() {
    let mut state = single_steamer_state(5.0, 100.0);
    state.legs = Legs::default();
    state.discharges.push(smoothbore(1, 0.875, 50.0, 1.75, 200.0));

    let derived = recompute(&state);
    assert_eq!(derived.total_inflow_gpm, 0.0);
    assert_eq!(derived.engine_intake_psi, 0.0);
    assert_eq!(derived.per_discharge[0].actual_gpm, 0.0);
}

#[test]
fn two_handlines_split_demand_across_steamer_and_side() {
    let mut legs = Legs::default();
    legs.set(Port::Steamer, Some(SupplyLeg::new(5.0, 100.0)));
    legs.set(Port::SideA, Some(SupplyLeg::new(3.0, 200.0)));
    let mut state = single_steamer_state(5.0, 100.0);
    state.legs = legs;
    state.discharges.push(smoothbore(1, 0.875, 50.0, 1.75, 200.0));
    state.discharges.push(smoothbore(2, 0.875, 50.0, 1.75, 200.0));

    let derived = recompute(&state);
    assert_eq!(derived.per_discharge.len(), 2);
    assert!(derived.per_leg_gpm.steamer > 0.0);
    assert!(derived.per_leg_gpm.side_a > 0.0);
}

#[test]
fn closed_discharge_gate_does_not_draw_supply() {
    let mut state = single_steamer_state(5.0, 100.0);
    let mut closed = smoothbore(1, 0.875, 50.0, 1.75, 200.0);
    closed.gate_open = false;
    state.discharges.push(closed);

    let derived = recompute(&state);
    assert_eq!(derived.total_discharge_demand_gpm, 0.0);
    assert_eq!(derived.per_discharge.len(), 1);
    assert_eq!(derived.per_discharge[0].actual_gpm, 0.0);
}

#[test]
fn governor_below_required_pdp_flags_governor_limited() {
    let mut state = single_steamer_state(5.0, 100.0);
    state.governor_psi = 60.0;
    state.pdp_psi = 150.0;
    state.discharges.push(smoothbore(1, 0.875, 50.0, 1.75, 200.0));

    let derived = recompute(&state);
    assert!(derived.governor_limited);
}

#[test]
fn hav_boost_mode_raises_engine_intake_over_bypass() {
    let mut bypass_state = single_steamer_state(5.0, 100.0);
    bypass_state.hav = Hav {
        enabled: true,
        mode: HavMode::Bypass,
        outlets: 1,
        boost_psi: 0.0,
    };
    bypass_state
        .discharges
        .push(smoothbore(1, 0.875, 50.0, 1.75, 200.0));

    let mut boost_state = bypass_state.clone();
    boost_state.hav = Hav {
        enabled: true,
        mode: HavMode::Boost,
        outlets: 1,
        boost_psi: 20.0,
    };

    let bypass = recompute(&bypass_state);
    let boost = recompute(&boost_state);
    assert!(boost.engine_intake_psi >= bypass.engine_intake_psi);
}

#[test]
fn unknown_hose_diameter_falls_back_with_advisory_in_lenient_mode() {
    let mut state = single_steamer_state(5.0, 100.0);
    state.discharges.push(smoothbore(1, 0.875, 50.0, 6.0, 200.0));

    let derived = recompute(&state);
    assert!(derived.advisories.iter().any(|a| a.code == "unknown_hose_coeff"));
}

#[test]
fn recompute_strict_rejects_negative_static_pressure() {
    let mut state = single_steamer_state(5.0, 100.0);
    state.static_psi = -1.0;
    assert!(recompute_strict(&state).is_err());
}

#[test]
fn recompute_and_recompute_strict_agree_on_a_healthy_scenario() {
    let mut state = single_steamer_state(5.0, 100.0);
    state.discharges.push(smoothbore(1, 0.875, 50.0, 1.75, 200.0));

    let lenient = recompute(&state);
    let strict = recompute_strict(&state).expect("healthy scenario must be strict-valid");
    assert_eq!(lenient.engine_intake_psi, strict.engine_intake_psi);
    assert_eq!(lenient.total_inflow_gpm, strict.total_inflow_gpm);
}

#[test]
fn more_supply_legs_never_reduce_total_inflow() {
    let one_leg = single_steamer_state(5.0, 100.0);
    let mut two_legs = one_leg.clone();
    two_legs.legs.set(Port::SideA, Some(SupplyLeg::new(3.0, 150.0)));

    let one = recompute(&one_leg);
    let two = recompute(&two_legs);
    assert!(two.total_inflow_gpm >= one.total_inflow_gpm - 1.0);
}

#[test]
fn smooth_bore_freeman_formula_drives_required_flow() {
    let mut state = single_steamer_state(5.0, 100.0);
    state.discharges.push(smoothbore(1, 0.9375, 50.0, 1.75, 200.0));
    let derived = recompute(&state);
    let expected = 29.7 * 0.9375_f64.powi(2) * 50.0_f64.sqrt();
    assert!((derived.per_discharge[0].required_gpm - expected).abs() < 1e-6);
}
