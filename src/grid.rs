use ndarray::{Array, ArrayBase, Data, Dimension};

use crate::error::{GvfError, Result};

/// Shortest axis the mirror boundary can handle (it reaches two cells inward).
pub const MIRROR_MIN_EXTENT: usize = 3;

/// Shortest axis the gradient operator can handle.
pub const GRADIENT_MIN_EXTENT: usize = 2;

/// Shape of the scalar field a solver works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    shape: Vec<usize>,
}

impl Grid {
    pub fn new(shape: &[usize]) -> Result<Self> {
        check_min_extent(shape, MIRROR_MIN_EXTENT)?;
        Ok(Self {
            shape: shape.to_vec(),
        })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shape after padding one cell on every side
    pub fn padded_shape(&self) -> Vec<usize> {
        self.shape.iter().map(|&n| n + 2).collect()
    }

    pub fn in_bounds(&self, index: &[usize]) -> bool {
        index.len() == self.shape.len() && index.iter().zip(&self.shape).all(|(&i, &n)| i < n)
    }

    /// Neighbour pairs per cell of the discrete Laplacian: 4 in 2D, 6 in 3D.
    pub fn diffusion_scale(&self) -> f64 {
        (2 * self.ndim()) as f64
    }

    /// Largest mu for which the explicit diffusion term alone stays stable.
    ///
    /// The Laplacian's most negative eigenvalue is `-4N`, so the update
    /// `mu * 2N * lap` needs `mu * 2N * 4N <= 2`.
    pub fn stable_mu(&self) -> f64 {
        let n = self.ndim() as f64;
        1.0 / (4.0 * n * n)
    }
}

pub fn check_min_extent(shape: &[usize], min_extent: usize) -> Result<()> {
    if shape.is_empty() || shape.iter().any(|&n| n < min_extent) {
        return Err(GvfError::InvalidShape {
            shape: shape.to_vec(),
            min_extent,
        });
    }
    Ok(())
}

/// Minimum and maximum of a field, rejecting NaN and infinities.
pub fn value_range<S, D>(field: &ArrayBase<S, D>) -> Result<(f64, f64)>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &value in field.iter() {
        if !value.is_finite() {
            return Err(GvfError::NonFiniteInput);
        }
        min = min.min(value);
        max = max.max(value);
    }
    Ok((min, max))
}

/// Rescale a field so its minimum maps to 0 and its maximum to 1.
pub fn normalize<S, D>(field: &ArrayBase<S, D>) -> Result<Array<f64, D>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    if field.is_empty() {
        return Err(GvfError::InvalidShape {
            shape: field.shape().to_vec(),
            min_extent: 1,
        });
    }
    let (min, max) = value_range(field)?;
    let span = max - min;
    if span == 0.0 {
        return Err(GvfError::DegenerateInput { value: min });
    }
    Ok(field.mapv(|value| (value - min) / span))
}
