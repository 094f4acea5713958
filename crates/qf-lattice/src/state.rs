//! Field and momentum arrays owned by a run.

use qf_core::errors::{ErrorInfo, QfError};
use serde::{Deserialize, Serialize};

/// One field together with its conjugate momentum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Field value per grid site.
    pub field: Vec<f64>,
    /// Conjugate momentum (time derivative of the field) per grid site.
    pub momentum: Vec<f64>,
}

impl Component {
    /// Creates a component, rejecting mismatched array lengths.
    pub fn new(field: Vec<f64>, momentum: Vec<f64>) -> Result<Self, QfError> {
        if field.len() != momentum.len() {
            return Err(QfError::Model(
                ErrorInfo::new("length-mismatch", "field and momentum lengths differ")
                    .with_context("field", field.len())
                    .with_context("momentum", momentum.len()),
            ));
        }
        Ok(Self { field, momentum })
    }

    /// Component at rest with the given field profile.
    pub fn at_rest(field: Vec<f64>) -> Self {
        let momentum = vec![0.0; field.len()];
        Self { field, momentum }
    }

    /// Number of grid sites.
    pub fn len(&self) -> usize {
        self.field.len()
    }

    /// Whether the component holds no sites.
    pub fn is_empty(&self) -> bool {
        self.field.is_empty()
    }

    /// Spatial mean of the field (the vacuum expectation value).
    pub fn mean(&self) -> f64 {
        if self.field.is_empty() {
            return 0.0;
        }
        self.field.iter().sum::<f64>() / self.field.len() as f64
    }
}

/// Complete dynamical state of a run: one or two coupled components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatticeState {
    /// Components in model order (`phi` first, then `psi`).
    pub components: Vec<Component>,
}

impl LatticeState {
    /// Creates a state, rejecting empty component lists and ragged lengths.
    pub fn new(components: Vec<Component>) -> Result<Self, QfError> {
        let Some(first) = components.first() else {
            return Err(QfError::Model(ErrorInfo::new(
                "no-components",
                "a lattice state needs at least one field",
            )));
        };
        let points = first.len();
        for (index, component) in components.iter().enumerate() {
            if component.len() != points || component.momentum.len() != points {
                return Err(QfError::Model(
                    ErrorInfo::new("ragged-components", "all components must share one grid")
                        .with_context("component", index)
                        .with_context("expected", points)
                        .with_context("found", component.len()),
                ));
            }
        }
        Ok(Self { components })
    }

    /// Number of grid sites.
    pub fn points(&self) -> usize {
        self.components.first().map(Component::len).unwrap_or(0)
    }

    /// Whether every field and momentum value is finite.
    pub fn is_finite(&self) -> bool {
        self.components.iter().all(|component| {
            component
                .field
                .iter()
                .chain(component.momentum.iter())
                .all(|value| value.is_finite())
        })
    }

    /// Field values of every component at one site.
    pub(crate) fn site_values(&self, site: usize, out: &mut [f64]) {
        for (slot, component) in out.iter_mut().zip(&self.components) {
            *slot = component.field[site];
        }
    }
}
