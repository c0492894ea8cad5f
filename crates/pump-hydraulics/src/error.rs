//! Error taxonomy (§7)
//!
//! All lenient-mode paths fall back to a safe default and an advisory
//! instead of raising. These variants only surface when a caller opts into
//! strict mode (`recompute_strict`, or the strict table/solver helpers).

use thiserror::Error;

/// Errors surfaced by the strict-mode API.
#[derive(Debug, Error, PartialEq)]
pub enum HydraulicError {
    #[error("invalid hose: {0}")]
    InvalidHose(String),

    #[error("invalid nozzle: {0}")]
    InvalidNozzle(String),

    #[error("invalid system state: {0}")]
    InvalidState(String),

    #[error("supply-side solver did not converge after {iterations} iterations (residual error {residual_error:.2} psi)")]
    SolverNonConvergent { iterations: u32, residual_error: f64 },
}

pub type Result<T> = std::result::Result<T, HydraulicError>;
