#![deny(missing_docs)]

//! Scalar fields on a periodic one-dimensional lattice and the explicit
//! integrators that advance them.

/// Time-dependent coefficients and external drives.
pub mod coefficient;
/// Inter-field interaction terms.
pub mod coupling;
/// Initial profiles.
pub mod initial;
/// Time stepping schemes.
pub mod integrator;
/// Immutable model parameters and force evaluation.
pub mod model;
/// On-site potentials.
pub mod potential;
/// Field and momentum containers.
pub mod state;
/// Periodic finite-difference stencils.
pub mod stencil;

pub use coefficient::{Coefficient, Drive};
pub use coupling::{Coupling, CouplingForm};
pub use initial::{InitialCondition, Profile};
pub use integrator::{step, Integrator, Scheme};
pub use model::FieldModel;
pub use potential::{Potential, SelfInteraction, SelfPotential};
pub use state::{Component, LatticeState};
pub use stencil::{gradient, laplacian};
