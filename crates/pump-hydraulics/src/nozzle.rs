//! Nozzle flow law (Stage B, §4.B)
//!
//! Computes the flow a nozzle draws at its own rated nozzle pressure.
//! Smooth-bore tips follow the Freeman discharge formula; fog nozzles are
//! constant-flow devices at or above their rated pressure. What happens
//! when a line can't actually get its rated pressure is the discharge
//! evaluator's concern (§4.D), not this module's.

use crate::error::{HydraulicError, Result};
use crate::model::NozzleSpec;

/// Freeman smooth-bore discharge coefficient: `Q = 29.7 · d² · √NP`.
pub const FREEMAN_COEFFICIENT: f64 = 29.7;

/// The nominal flow (gpm) a nozzle delivers at its own rated nozzle pressure.
pub fn nozzle_flow(nozzle: &NozzleSpec) -> f64 {
    match nozzle {
        NozzleSpec::SmoothBore {
            tip_in,
            nozzle_pressure_psi,
        } => FREEMAN_COEFFICIENT * tip_in.powi(2) * nozzle_pressure_psi.max(0.0).sqrt(),
        NozzleSpec::FogFixed { rated_gpm, .. }
        | NozzleSpec::FogSelectable { rated_gpm, .. }
        | NozzleSpec::FogAutomatic { rated_gpm, .. } => *rated_gpm,
    }
}

/// Validate a nozzle spec for strict-mode callers (§4.B, §7): a
/// smooth-bore tip must be positive, and nozzle pressure must fall
/// within `[0, 500]` psi.
pub fn validate_strict(nozzle: &NozzleSpec) -> Result<()> {
    let np = nozzle.nozzle_pressure_psi();
    if !(0.0..=500.0).contains(&np) {
        return Err(HydraulicError::InvalidNozzle(format!(
            "nozzle pressure must be within [0, 500] psi, got {np}"
        )));
    }
    if let NozzleSpec::SmoothBore { tip_in, .. } = nozzle {
        if *tip_in <= 0.0 {
            return Err(HydraulicError::InvalidNozzle(format!(
                "smooth-bore tip diameter must be positive, got {tip_in}"
            )));
        }
    }
    Ok(())
}
