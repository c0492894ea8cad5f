//! Pump Hydraulics Core
//!
//! Shared, kernel-agnostic types used by the hydraulics calculation engine:
//!
//! - [`id`] - stable, caller-supplied identifiers for discharge lines
//! - [`port`] - the fixed set of supply-intake ports on a pumping apparatus
//! - [`units`] - unit conversion support (pressure/flow/length) for callers
//!   working outside the engine's native psi/gpm/ft system

pub mod id;
pub mod port;
pub mod units;

pub use id::DischargeId;
pub use port::Port;
pub use units::*;
