//! Uniform periodic grid shared by the integrator and the diagnostics.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, QfError};

/// Smallest grid on which a periodic second difference touches three
/// distinct sites.
pub const MIN_POINTS: usize = 3;

/// Uniform one-dimensional periodic grid of `points` sites over `[0, length)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridSpec", into = "GridSpec")]
pub struct Grid {
    points: usize,
    length: f64,
}

/// Raw serialized form of a [`Grid`], validated on conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of grid sites `N`.
    pub points: usize,
    /// Domain length `L`.
    pub length: f64,
}

impl Grid {
    /// Creates a grid, rejecting fewer than [`MIN_POINTS`] sites or a
    /// non-positive length.
    pub fn new(points: usize, length: f64) -> Result<Self, QfError> {
        if points < MIN_POINTS {
            return Err(QfError::Grid(
                ErrorInfo::new("too-few-points", "periodic grid needs at least three sites")
                    .with_context("points", points),
            ));
        }
        if !(length.is_finite() && length > 0.0) {
            return Err(QfError::Grid(
                ErrorInfo::new("invalid-length", "domain length must be positive and finite")
                    .with_context("length", length),
            ));
        }
        Ok(Self { points, length })
    }

    /// Number of sites `N`.
    pub fn points(&self) -> usize {
        self.points
    }

    /// Domain length `L`.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Grid spacing `dx = L / N`.
    pub fn spacing(&self) -> f64 {
        self.length / self.points as f64
    }

    /// Site coordinates `x_i = i * dx` (the right endpoint is excluded).
    pub fn coordinates(&self) -> Vec<f64> {
        let dx = self.spacing();
        (0..self.points).map(|i| i as f64 * dx).collect()
    }
}

impl TryFrom<GridSpec> for Grid {
    type Error = QfError;

    fn try_from(spec: GridSpec) -> Result<Self, Self::Error> {
        Grid::new(spec.points, spec.length)
    }
}

impl From<Grid> for GridSpec {
    fn from(grid: Grid) -> Self {
        GridSpec {
            points: grid.points,
            length: grid.length,
        }
    }
}
