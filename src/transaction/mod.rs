//! Transaction lifecycle
//!
//! - Status state machine
//! - Tracker driving a submission through its collaborators
//! - Simulated network for demos
//! - Priority fee / slippage settings

mod settings;
mod simulated;
mod status;
mod tracker;

pub use settings::*;
pub use simulated::*;
pub use status::*;
pub use tracker::*;
