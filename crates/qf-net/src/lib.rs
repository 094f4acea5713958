#![deny(missing_docs)]
#![doc = "Coupled multi-actor \"power field\" network with scheduled forcing and anchors."]

pub mod config;
pub mod kernel;
pub mod schedule;

pub use config::{ActorConfig, Anchor, Forcing, NetworkConfig};
pub use kernel::{simulate, NetworkRun, NetworkSummary, PeakPower};
pub use schedule::{Schedule, Segment};
