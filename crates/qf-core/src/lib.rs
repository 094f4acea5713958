#![deny(missing_docs)]
#![doc = "Core error, grid and seeding types shared by the qfield crates."]

pub mod errors;
pub mod grid;
pub mod provenance;
pub mod rng;

pub use errors::{ErrorInfo, QfError};
pub use grid::{Grid, GridSpec};
pub use provenance::{RunProvenance, SchemaVersion};
pub use rng::{derive_substream_seed, RngHandle};
