//! Supply-intake ports on a pumping apparatus

use serde::{Deserialize, Serialize};

/// One of the fixed supply-intake ports a pump apparatus exposes.
///
/// There are always exactly three: one steamer (the large front intake,
/// conventionally 4.5in or larger) and two sides. The steamer has no gate
/// valve of its own (it is open whenever connected); the sides do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Port {
    Steamer,
    SideA,
    SideB,
}

impl Port {
    /// All ports, in a fixed canonical order.
    pub const ALL: [Port; 3] = [Port::Steamer, Port::SideA, Port::SideB];

    /// The port this one is mirrored with for the side-swap symmetry
    /// property (`§8`): steamer has no mirror.
    pub fn mirror(&self) -> Option<Port> {
        match self {
            Port::Steamer => None,
            Port::SideA => Some(Port::SideB),
            Port::SideB => Some(Port::SideA),
        }
    }
}

impl std::fmt::Display for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Port::Steamer => write!(f, "steamer"),
            Port::SideA => write!(f, "side A"),
            Port::SideB => write!(f, "side B"),
        }
    }
}
