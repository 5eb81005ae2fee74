use thiserror::Error;

use crate::ntk::gate::{GateId, GateKind};
use crate::ntk::stage::Stage;

pub type Result<T> = std::result::Result<T, NtkError>;

/// Typed errors for netlist operations.
///
/// Every variant is detectable at the call site and leaves the netlist
/// unchanged. `CyclicGraph` is the one condition that signals a violated
/// construction invariant rather than ordinary misuse; hosts may treat it
/// as non-recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NtkError {
    #[error("gate {0} not found")]
    UnknownGate(GateId),

    #[error("fanin slot {slot} out of range for {kind} gate {id}")]
    SlotOutOfRange {
        id: GateId,
        kind: GateKind,
        slot: usize,
    },

    #[error("gate {id} is still referenced by {fanout} gate(s)")]
    GateInUse { id: GateId, fanout: usize },

    #[error("fanin graph is cyclic ({unleveled} gate(s) could not be leveled)")]
    CyclicGraph { unleveled: usize },

    #[error("traversal depth must be non-negative, got {0}")]
    NegativeDepth(i32),

    #[error("gate {0} appears in more than one equivalence class")]
    OverlappingClass(GateId),

    #[error("netlist is at stage {current}, operation requires {required}")]
    NetlistNotReady { required: Stage, current: Stage },

    #[error("gate id {0} is already defined")]
    DuplicateGate(GateId),
}
