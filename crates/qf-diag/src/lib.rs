#![deny(missing_docs)]
#![doc = "Scalar diagnostics derived from lattice states: energies and correlations."]

pub mod correl;
pub mod energy;
pub mod stats;

pub use correl::{
    correlation_profile, default_profile_distances, pearson, profile_distance_fits,
    spatial_correlation, spatial_correlation_profile, validate_window, windowed_correlation,
    windowed_mutual_correlation, Correlation, ProfilePoint, WindowedCorrelation, DEGENERATE_STD,
};
pub use energy::{energy_breakdown, local_energy_density, total_energy, EnergyBreakdown};
