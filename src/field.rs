use ndarray::{Array, Dimension, Ix2, Ix3, Zip};

use crate::error::{GvfError, Result};

/// Magnitudes below this are treated as zero vectors by [`VectorField::normalized`].
pub const UNIT_EPSILON: f64 = 1e-12;

/// One scalar component per spatial axis, all of the same shape.
///
/// Component `k` holds the axis-`k` part of the flow vector at each cell.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorField<D: Dimension> {
    components: Vec<Array<f64, D>>,
}

pub type VectorField2 = VectorField<Ix2>;
pub type VectorField3 = VectorField<Ix3>;

impl<D: Dimension> VectorField<D> {
    pub fn new(components: Vec<Array<f64, D>>) -> Result<Self> {
        let first = match components.first() {
            Some(first) => first,
            None => {
                return Err(GvfError::InvalidParameters(
                    "vector field needs at least one component".into(),
                ))
            }
        };
        if components.len() != first.ndim() {
            return Err(GvfError::InvalidParameters(format!(
                "expected {} components for a {}-dimensional field, got {}",
                first.ndim(),
                first.ndim(),
                components.len()
            )));
        }
        for component in &components[1..] {
            if component.shape() != first.shape() {
                return Err(GvfError::ShapeMismatch {
                    left: first.shape().to_vec(),
                    right: component.shape().to_vec(),
                });
            }
        }
        Ok(Self { components })
    }

    pub fn zeros(dim: D) -> Self {
        let components = (0..dim.ndim()).map(|_| Array::zeros(dim.clone())).collect();
        Self { components }
    }

    pub fn dim(&self) -> D {
        self.components[0].raw_dim()
    }

    pub fn shape(&self) -> &[usize] {
        self.components[0].shape()
    }

    pub fn components(&self) -> &[Array<f64, D>] {
        &self.components
    }

    pub fn component(&self, axis: usize) -> Option<&Array<f64, D>> {
        self.components.get(axis)
    }

    pub fn into_components(self) -> Vec<Array<f64, D>> {
        self.components
    }

    /// |v| at every cell
    pub fn magnitude(&self) -> Array<f64, D> {
        let mut mag = Array::zeros(self.dim());
        for component in &self.components {
            Zip::from(&mut mag).and(component).for_each(|m, &c| *m += c * c);
        }
        mag.mapv_inplace(f64::sqrt);
        mag
    }

    /// Unit vectors pointing along the field; zero where the field vanishes.
    pub fn normalized(&self) -> Self {
        let mag = self.magnitude();
        let components = self
            .components
            .iter()
            .map(|component| {
                let mut unit = component.clone();
                Zip::from(&mut unit).and(&mag).for_each(|c, &m| {
                    *c = if m > UNIT_EPSILON { *c / m } else { 0.0 };
                });
                unit
            })
            .collect();
        Self { components }
    }

    /// Largest absolute componentwise difference between two fields.
    pub fn max_abs_diff(&self, other: &Self) -> Result<f64> {
        if self.shape() != other.shape() {
            return Err(GvfError::ShapeMismatch {
                left: self.shape().to_vec(),
                right: other.shape().to_vec(),
            });
        }
        let mut max = 0.0_f64;
        for (a, b) in self.components.iter().zip(&other.components) {
            Zip::from(a).and(b).for_each(|&x, &y| max = max.max((x - y).abs()));
        }
        Ok(max)
    }

    pub fn is_finite(&self) -> bool {
        self.components.iter().all(|c| c.iter().all(|v| v.is_finite()))
    }
}

impl VectorField<Ix2> {
    pub fn u(&self) -> &Array<f64, Ix2> {
        &self.components[0]
    }

    pub fn v(&self) -> &Array<f64, Ix2> {
        &self.components[1]
    }
}

impl VectorField<Ix3> {
    pub fn u(&self) -> &Array<f64, Ix3> {
        &self.components[0]
    }

    pub fn v(&self) -> &Array<f64, Ix3> {
        &self.components[1]
    }

    pub fn w(&self) -> &Array<f64, Ix3> {
        &self.components[2]
    }
}
