//! Finite-difference operators on scalar fields of any dimension.

use ndarray::{Array, ArrayBase, Axis, Data, DataMut, Dimension, Slice, Zip};

use crate::error::{GvfError, Result};
use crate::grid::{check_min_extent, GRADIENT_MIN_EXTENT};

/// Gradient along every axis, in axis order.
///
/// Interior cells use central differences `(f[i+1] - f[i-1]) / 2`, the first
/// and last cell along an axis use one-sided differences.
pub fn gradient<S, D>(field: &ArrayBase<S, D>) -> Result<Vec<Array<f64, D>>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    check_min_extent(field.shape(), GRADIENT_MIN_EXTENT)?;
    Ok((0..field.ndim())
        .map(|axis| partial_derivative(field, Axis(axis)))
        .collect())
}

fn partial_derivative<S, D>(field: &ArrayBase<S, D>, axis: Axis) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let n = field.len_of(axis);
    let mut derivative = Array::zeros(field.raw_dim());

    Zip::from(derivative.slice_axis_mut(axis, Slice::from(1..n - 1)))
        .and(field.slice_axis(axis, Slice::from(2..n)))
        .and(field.slice_axis(axis, Slice::from(0..n - 2)))
        .for_each(|d, &next, &prev| *d = 0.5 * (next - prev));

    Zip::from(derivative.slice_axis_mut(axis, Slice::from(0..1)))
        .and(field.slice_axis(axis, Slice::from(1..2)))
        .and(field.slice_axis(axis, Slice::from(0..1)))
        .for_each(|d, &next, &here| *d = next - here);

    Zip::from(derivative.slice_axis_mut(axis, Slice::from(n - 1..n)))
        .and(field.slice_axis(axis, Slice::from(n - 1..n)))
        .and(field.slice_axis(axis, Slice::from(n - 2..n - 1)))
        .for_each(|d, &here, &prev| *d = here - prev);

    derivative
}

/// Discrete Laplacian: the sum over axes of `f[i+1] - 2 f[i] + f[i-1]`.
///
/// A neighbour missing at the edge is taken as the edge cell itself
/// (reflection about the half-sample), so a constant field maps to zero.
pub fn laplacian<S, D>(field: &ArrayBase<S, D>) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let mut out = Array::zeros(field.raw_dim());
    accumulate_second_differences(field, &mut out);
    out
}

/// Write the Laplacian of `field` into a pre-allocated buffer of equal shape.
pub fn laplacian_into<S, T, D>(field: &ArrayBase<S, D>, out: &mut ArrayBase<T, D>) -> Result<()>
where
    S: Data<Elem = f64>,
    T: DataMut<Elem = f64>,
    D: Dimension,
{
    if field.shape() != out.shape() {
        return Err(GvfError::ShapeMismatch {
            left: field.shape().to_vec(),
            right: out.shape().to_vec(),
        });
    }
    out.fill(0.0);
    accumulate_second_differences(field, out);
    Ok(())
}

fn accumulate_second_differences<S, T, D>(field: &ArrayBase<S, D>, out: &mut ArrayBase<T, D>)
where
    S: Data<Elem = f64>,
    T: DataMut<Elem = f64>,
    D: Dimension,
{
    for axis in (0..field.ndim()).map(Axis) {
        let n = field.len_of(axis);
        if n < 2 {
            continue;
        }

        Zip::from(out.slice_axis_mut(axis, Slice::from(1..n - 1)))
            .and(field.slice_axis(axis, Slice::from(2..n)))
            .and(field.slice_axis(axis, Slice::from(1..n - 1)))
            .and(field.slice_axis(axis, Slice::from(0..n - 2)))
            .for_each(|acc, &next, &here, &prev| *acc += next - 2.0 * here + prev);

        Zip::from(out.slice_axis_mut(axis, Slice::from(0..1)))
            .and(field.slice_axis(axis, Slice::from(1..2)))
            .and(field.slice_axis(axis, Slice::from(0..1)))
            .for_each(|acc, &next, &here| *acc += next - here);

        Zip::from(out.slice_axis_mut(axis, Slice::from(n - 1..n)))
            .and(field.slice_axis(axis, Slice::from(n - 1..n)))
            .and(field.slice_axis(axis, Slice::from(n - 2..n - 1)))
            .for_each(|acc, &here, &prev| *acc += prev - here);
    }
}

/// Pointwise sum of squares of the components.
pub fn squared_magnitude<D>(components: &[Array<f64, D>]) -> Array<f64, D>
where
    D: Dimension,
{
    let mut total = match components.first() {
        Some(first) => Array::zeros(first.raw_dim()),
        None => return Array::zeros(D::zeros(D::NDIM.unwrap_or(0))),
    };
    for component in components {
        Zip::from(&mut total)
            .and(component)
            .for_each(|t, &c| *t += c * c);
    }
    total
}
