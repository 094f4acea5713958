//! Initial field and momentum profiles.

use std::f64::consts::PI;

use qf_core::errors::{ErrorInfo, QfError};
use qf_core::{Grid, RngHandle};
use serde::{Deserialize, Serialize};

use crate::state::Component;

fn default_gaussian_width() -> f64 {
    0.5
}

fn default_modes() -> f64 {
    1.0
}

/// Deterministic profile sampled on the grid sites.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Profile {
    /// Identically zero.
    #[default]
    Zero,
    /// Uniform value.
    Constant {
        /// Value at every site.
        value: f64,
    },
    /// `amplitude * exp(-(x - center)^2 / width)`.
    Gaussian {
        /// Peak height.
        amplitude: f64,
        /// Peak position; defaults to the domain midpoint.
        #[serde(default)]
        center: Option<f64>,
        /// Denominator of the exponent.
        #[serde(default = "default_gaussian_width")]
        width: f64,
    },
    /// `amplitude * sin(2 pi modes x / L)`.
    Sine {
        /// Wave amplitude.
        amplitude: f64,
        /// Number of wavelengths across the domain.
        #[serde(default = "default_modes")]
        modes: f64,
    },
    /// `value` on the sites `N/2 - half_width .. N/2 + half_width`, zero elsewhere.
    Plateau {
        /// Height of the plateau.
        value: f64,
        /// Number of sites on each side of the midpoint.
        half_width: usize,
    },
}

impl Profile {
    /// Gaussian bump centred on the domain midpoint.
    pub fn centered_gaussian(amplitude: f64, width: f64) -> Self {
        Profile::Gaussian {
            amplitude,
            center: None,
            width,
        }
    }

    /// Samples the profile on every site of `grid`.
    pub fn sample(&self, grid: &Grid) -> Result<Vec<f64>, QfError> {
        let points = grid.points();
        let length = grid.length();
        let xs = grid.coordinates();
        let values = match *self {
            Profile::Zero => vec![0.0; points],
            Profile::Constant { value } => vec![value; points],
            Profile::Gaussian {
                amplitude,
                center,
                width,
            } => {
                if !(width.is_finite() && width > 0.0) {
                    return Err(QfError::Model(
                        ErrorInfo::new("invalid-width", "gaussian width must be positive")
                            .with_context("width", width),
                    ));
                }
                let center = center.unwrap_or(0.5 * length);
                xs.iter()
                    .map(|&x| amplitude * (-(x - center).powi(2) / width).exp())
                    .collect()
            }
            Profile::Sine { amplitude, modes } => xs
                .iter()
                .map(|&x| amplitude * (2.0 * PI * modes * x / length).sin())
                .collect(),
            Profile::Plateau { value, half_width } => {
                let mid = points / 2;
                if half_width > mid || mid + half_width > points {
                    return Err(QfError::Model(
                        ErrorInfo::new("plateau-too-wide", "plateau exceeds the grid")
                            .with_context("half_width", half_width)
                            .with_context("points", points),
                    ));
                }
                let mut values = vec![0.0; points];
                for slot in &mut values[mid - half_width..mid + half_width] {
                    *slot = value;
                }
                values
            }
        };
        Ok(values)
    }
}

/// Initial condition for one component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct InitialCondition {
    /// Field profile.
    #[serde(default)]
    pub field: Profile,
    /// Momentum profile.
    #[serde(default)]
    pub momentum: Profile,
    /// Amplitude of uniform jitter added to the field, drawn from the
    /// component's seeded substream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise: Option<f64>,
}

impl InitialCondition {
    /// Field profile at rest, no jitter.
    pub fn at_rest(field: Profile) -> Self {
        Self {
            field,
            momentum: Profile::Zero,
            noise: None,
        }
    }

    /// Builds the component, drawing jitter from `rng` only when requested.
    pub fn build(&self, grid: &Grid, rng: &mut RngHandle) -> Result<Component, QfError> {
        let mut field = self.field.sample(grid)?;
        let momentum = self.momentum.sample(grid)?;
        if let Some(amplitude) = self.noise {
            for value in &mut field {
                *value += amplitude * rng.symmetric_unit();
            }
        }
        Component::new(field, momentum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gaussian_peaks_at_midpoint() {
        let grid = Grid::new(100, 10.0).unwrap();
        let values = Profile::centered_gaussian(1.0, 0.5).sample(&grid).unwrap();
        let (argmax, _) = values
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |best, (i, &v)| if v > best.1 { (i, v) } else { best });
        assert_eq!(argmax, 50);
        assert!((values[50] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn plateau_covers_central_sites() {
        let grid = Grid::new(100, 100.0).unwrap();
        let values = Profile::Plateau {
            value: 1.5,
            half_width: 5,
        }
        .sample(&grid)
        .unwrap();
        assert_eq!(values.iter().filter(|&&v| v == 1.5).count(), 10);
        assert_eq!(values[45], 1.5);
        assert_eq!(values[55], 0.0);
    }

    #[test]
    fn plateau_wider_than_grid_is_rejected() {
        let grid = Grid::new(10, 1.0).unwrap();
        let err = Profile::Plateau {
            value: 1.0,
            half_width: 6,
        }
        .sample(&grid)
        .unwrap_err();
        assert_eq!(err.code(), "plateau-too-wide");
    }

    #[test]
    fn noise_is_seeded() {
        let grid = Grid::new(32, 3.2).unwrap();
        let condition = InitialCondition {
            noise: Some(0.01),
            ..InitialCondition::at_rest(Profile::Zero)
        };
        let a = condition.build(&grid, &mut RngHandle::from_seed(5)).unwrap();
        let b = condition.build(&grid, &mut RngHandle::from_seed(5)).unwrap();
        let c = condition.build(&grid, &mut RngHandle::from_seed(6)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.field.iter().all(|v| v.abs() <= 0.01));
    }
}
