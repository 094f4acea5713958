//! Pearson correlations over field values and energy-density windows.
//!
//! Every correlation goes through [`pearson`], which reports a zero-variance
//! input as [`Correlation::Degenerate`] instead of producing `NaN`. Series
//! recorders read degenerate values as `0.0` via [`Correlation::value`].

use qf_core::errors::{ErrorInfo, QfError};
use qf_lattice::Potential;
use serde::{Deserialize, Serialize};

use crate::energy::local_energy_density;
use crate::stats;

/// Standard deviation at or below which an input counts as constant.
///
/// Applies to every correlation here, the nearest-neighbour one included, so
/// a field that is constant up to rounding noise reads as uncorrelated rather
/// than as a coefficient computed from `1e-16` residues.
pub const DEGENERATE_STD: f64 = 1e-10;

fn diag_error(code: &str, message: impl Into<String>) -> QfError {
    QfError::Diagnostics(ErrorInfo::new(code, message))
}

/// Outcome of a Pearson correlation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum Correlation {
    /// Well-defined coefficient in `[-1, 1]`.
    Defined(f64),
    /// One of the inputs had (numerically) zero variance or fewer than two
    /// samples.
    Degenerate,
}

impl Correlation {
    /// Coefficient, with degenerate inputs mapped to `0.0`.
    pub fn value(self) -> f64 {
        match self {
            Correlation::Defined(r) => r,
            Correlation::Degenerate => 0.0,
        }
    }

    /// Whether the inputs were degenerate.
    pub fn is_degenerate(self) -> bool {
        matches!(self, Correlation::Degenerate)
    }
}

/// Pearson correlation of two equally long samples.
pub fn pearson(a: &[f64], b: &[f64]) -> Correlation {
    let len = a.len().min(b.len());
    if len < 2 {
        return Correlation::Degenerate;
    }
    let (a, b) = (&a[..len], &b[..len]);
    let std_a = stats::std_dev(a);
    let std_b = stats::std_dev(b);
    if !(std_a > DEGENERATE_STD && std_b > DEGENERATE_STD) {
        return Correlation::Degenerate;
    }
    let mean_a = stats::mean(a);
    let mean_b = stats::mean(b);
    let covariance = a
        .iter()
        .zip(b)
        .map(|(x, y)| (x - mean_a) * (y - mean_b))
        .sum::<f64>()
        / len as f64;
    let r = covariance / (std_a * std_b);
    if r.is_finite() {
        Correlation::Defined(r.clamp(-1.0, 1.0))
    } else {
        Correlation::Degenerate
    }
}

/// Nearest-neighbour correlation of `field[..N-1]` against `field[1..]`.
pub fn spatial_correlation(field: &[f64]) -> Correlation {
    if field.len() < 3 {
        return Correlation::Degenerate;
    }
    pearson(&field[..field.len() - 1], &field[1..])
}

/// Per-offset correlations of adjacent sliding windows and their mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowedCorrelation {
    /// Correlation of windows `[i, i+w)` and `[i+1, i+1+w)` for every offset `i`.
    pub offsets: Vec<f64>,
    /// Mean of `offsets`, zero when there are none.
    pub mean: f64,
}

/// Rejects windows that cannot slide over a grid of `points` sites.
pub fn validate_window(points: usize, window: usize) -> Result<(), QfError> {
    if window < 2 {
        return Err(QfError::Diagnostics(
            ErrorInfo::new("window-too-small", "correlation window needs two sites")
                .with_context("window", window),
        ));
    }
    if window >= points {
        return Err(QfError::Diagnostics(
            ErrorInfo::new("window-too-large", "correlation window must be shorter than the grid")
                .with_context("window", window)
                .with_context("points", points)
                .with_hint("choose a window below the number of grid points"),
        ));
    }
    Ok(())
}

/// Sliding-window correlation over a precomputed density.
///
/// Yields exactly `len - window` offsets; none when `window >= len`.
pub fn windowed_correlation(density: &[f64], window: usize) -> WindowedCorrelation {
    let count = density.len().saturating_sub(window);
    let offsets: Vec<f64> = (0..count)
        .map(|i| pearson(&density[i..i + window], &density[i + 1..i + 1 + window]).value())
        .collect();
    let mean = stats::mean(&offsets);
    WindowedCorrelation { offsets, mean }
}

/// Windowed mutual correlation of the local energy density, the
/// "entanglement" proxy.
///
/// The density is evaluated on each window slice on its own, so the central
/// difference wraps inside the window rather than reaching the sites beyond
/// its edges.
pub fn windowed_mutual_correlation<P: Potential>(
    field: &[f64],
    momentum: &[f64],
    dx: f64,
    t: f64,
    potential: &P,
    window: usize,
) -> WindowedCorrelation {
    let points = field.len().min(momentum.len());
    let count = points.saturating_sub(window);
    if count == 0 {
        return WindowedCorrelation {
            offsets: Vec::new(),
            mean: 0.0,
        };
    }
    // Window `i + 1` is both the second half of offset `i` and the first of `i + 1`.
    let densities: Vec<Vec<f64>> = (0..=count)
        .map(|start| window_density(field, momentum, dx, t, potential, start, window))
        .collect();
    let offsets: Vec<f64> = densities
        .windows(2)
        .map(|pair| pearson(&pair[0], &pair[1]).value())
        .collect();
    let mean = stats::mean(&offsets);
    WindowedCorrelation { offsets, mean }
}

fn window_density<P: Potential>(
    field: &[f64],
    momentum: &[f64],
    dx: f64,
    t: f64,
    potential: &P,
    start: usize,
    window: usize,
) -> Vec<f64> {
    let range = start..start + window;
    local_energy_density(&field[range.clone()], &momentum[range], dx, t, potential)
}

/// Correlation between the reference window `[0, w)` and the window
/// `[d, d+w)` of the density.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    /// Offset `d` of the compared window.
    pub distance: usize,
    /// Correlation coefficient, zero when degenerate.
    pub correlation: f64,
}

/// Whether the window `[distance, distance + window)` lies inside `points`
/// sites. Never overflows, whatever the distance.
pub fn profile_distance_fits(points: usize, window: usize, distance: usize) -> bool {
    distance
        .checked_add(window)
        .is_some_and(|end| end <= points)
}

fn check_profile(points: usize, window: usize, distances: &[usize]) -> Result<(), QfError> {
    if window < 2 || window > points {
        return Err(QfError::Diagnostics(
            ErrorInfo::new("invalid-profile-window", "profile window does not fit the grid")
                .with_context("window", window)
                .with_context("points", points),
        ));
    }
    if let Some(&distance) = distances
        .iter()
        .find(|&&d| !profile_distance_fits(points, window, d))
    {
        return Err(QfError::Diagnostics(
            ErrorInfo::new(
                "profile-out-of-range",
                "profile distance plus window exceeds the grid",
            )
            .with_context("distance", distance)
            .with_context("window", window)
            .with_context("points", points),
        ));
    }
    Ok(())
}

/// Profile over a precomputed density. Any `d + window > len` is an error.
pub fn correlation_profile(
    density: &[f64],
    window: usize,
    distances: &[usize],
) -> Result<Vec<ProfilePoint>, QfError> {
    check_profile(density.len(), window, distances)?;
    let reference = &density[..window];
    Ok(distances
        .iter()
        .map(|&distance| ProfilePoint {
            distance,
            correlation: pearson(reference, &density[distance..distance + window]).value(),
        })
        .collect())
}

/// Spatial correlation profile of the local energy density of one field.
///
/// Like [`windowed_mutual_correlation`], the density is evaluated on each
/// window slice separately.
pub fn spatial_correlation_profile<P: Potential>(
    field: &[f64],
    momentum: &[f64],
    dx: f64,
    t: f64,
    potential: &P,
    window: usize,
    distances: &[usize],
) -> Result<Vec<ProfilePoint>, QfError> {
    if field.len() != momentum.len() {
        return Err(diag_error(
            "length-mismatch",
            "field and momentum lengths differ",
        ));
    }
    check_profile(field.len(), window, distances)?;
    let reference = window_density(field, momentum, dx, t, potential, 0, window);
    Ok(distances
        .iter()
        .map(|&distance| {
            let compared = window_density(field, momentum, dx, t, potential, distance, window);
            ProfilePoint {
                distance,
                correlation: pearson(&reference, &compared).value(),
            }
        })
        .collect())
}

/// Distances `1, 1 + stride, ...` up to `points - window`.
pub fn default_profile_distances(points: usize, window: usize, stride: usize) -> Vec<usize> {
    if window >= points {
        return Vec::new();
    }
    (1..=points - window).step_by(stride.max(1)).collect()
}
