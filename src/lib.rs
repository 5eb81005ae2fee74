pub mod error;
pub mod fec;
pub mod front;
pub mod ntk;
pub mod query;

pub use error::{NtkError, Result};
pub use ntk::gate::{Edge, Gate, GateId, GateKind};
pub use ntk::stage::Stage;
pub use ntk::{Netlist, Summary};
