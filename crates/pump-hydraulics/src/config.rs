//! Tunable numeric constants for the supply-side solver and discharge
//! evaluator. Gathering them here, instead of as literals scattered
//! through [`crate::supply`] and [`crate::discharge`], keeps the solver's
//! tuning explicit and testable: [`SolverConfig::default`] doubles as a
//! pinned-value regression test below.

/// Tuning knobs for the supply-side solver and discharge evaluator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Maximum fixed-point iterations before the solver retains its
    /// best-so-far iterate (§4.C step 3).
    pub max_iter: u32,
    /// Convergence tolerance on `P_intake`, in psi (§4.C step 3f).
    pub intake_tolerance_psi: f64,
    /// Damping factor applied to successive `P_intake` estimates (§4.C step 3g).
    pub damping: f64,
    /// Back-off multiplier applied to `P_intake` when the residual floor
    /// would be violated (§4.C step 3d).
    pub residual_backoff: f64,
    /// Hydrant main capacity constant `K` in `Q_max_hyd = K·√(static_psi−20)`.
    pub hydrant_capacity_k: f64,
    /// NFPA 291 main-residual floor, in psi.
    pub residual_floor_psi: f64,
    /// Whether the discharge evaluator refines smooth-bore flow by Newton
    /// iteration when the line is pressure-starved (§4.D).
    pub refine_pressure_starved_smoothbore: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iter: 20,
            intake_tolerance_psi: 2.0,
            damping: 0.5,
            residual_backoff: 0.85,
            hydrant_capacity_k: 348.0,
            residual_floor_psi: 20.0,
            refine_pressure_starved_smoothbore: true,
        }
    }
}
