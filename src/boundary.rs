//! Mirror boundary conditions.
//!
//! A boundary cell takes the value found two cells inward along every axis on
//! which it sits at the edge. Corners, edges and faces are all reached by
//! mirroring full slices one axis at a time, each pass reading from a snapshot
//! of its source slices, so every boundary cell ends up holding the original
//! value at its diagonal mirror position.

use ndarray::{Array, Array2, Array3, ArrayBase, Axis, Data, DataMut, Dimension, RemoveAxis, Slice};

use crate::error::Result;
use crate::grid::{check_min_extent, MIRROR_MIN_EXTENT};

/// Every index along an axis except the first and last.
pub(crate) fn inner() -> Slice {
    Slice::new(1, Some(-1), 1)
}

/// Overwrite the outermost layer of `grid` with its mirror image, in place.
pub fn enforce_mirror<S, D>(grid: &mut ArrayBase<S, D>) -> Result<()>
where
    S: DataMut<Elem = f64>,
    D: Dimension + RemoveAxis,
{
    check_min_extent(grid.shape(), MIRROR_MIN_EXTENT)?;
    for axis in 0..grid.ndim() {
        mirror_axis(grid, Axis(axis));
    }
    Ok(())
}

/// Copy slice 2 onto slice 0 and slice `last - 2` onto slice `last`.
fn mirror_axis<S, D>(grid: &mut ArrayBase<S, D>, axis: Axis)
where
    S: DataMut<Elem = f64>,
    D: Dimension + RemoveAxis,
{
    let last = grid.len_of(axis) - 1;
    // With an extent of 3 the two boundary slices feed each other.
    let low = grid.index_axis(axis, 2).to_owned();
    let high = grid.index_axis(axis, last - 2).to_owned();
    grid.index_axis_mut(axis, 0).assign(&low);
    grid.index_axis_mut(axis, last).assign(&high);
}

/// Pad `grid` by one cell on every side and fill the pad by mirroring.
pub fn expand<S, D>(grid: &ArrayBase<S, D>) -> Result<Array<f64, D>>
where
    S: Data<Elem = f64>,
    D: Dimension + RemoveAxis,
{
    check_min_extent(grid.shape(), MIRROR_MIN_EXTENT)?;
    let mut padded_dim = grid.raw_dim();
    for extent in padded_dim.slice_mut() {
        *extent += 2;
    }
    let mut padded = Array::zeros(padded_dim);
    padded.slice_each_axis_mut(|_| inner()).assign(grid);
    enforce_mirror(&mut padded)?;
    Ok(padded)
}

/// Drop the one-cell pad added by [`expand`].
pub fn shrink<S, D>(grid: &ArrayBase<S, D>) -> Result<Array<f64, D>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    check_min_extent(grid.shape(), MIRROR_MIN_EXTENT)?;
    Ok(grid.slice_each_axis(|_| inner()).to_owned())
}

/// Index whose pre-mirror value `enforce_mirror` writes at `index`.
///
/// Interior coordinates map to themselves, so for an interior cell this is
/// the cell itself.
pub fn mirror_source(index: &[usize], shape: &[usize]) -> Vec<usize> {
    index
        .iter()
        .zip(shape)
        .map(|(&i, &n)| match i {
            0 => 2,
            i if i + 1 == n => n - 3,
            i => i,
        })
        .collect()
}

pub fn enforce_mirror_2d(grid: &mut Array2<f64>) -> Result<()> {
    enforce_mirror(grid)
}

pub fn expand_2d(grid: &Array2<f64>) -> Result<Array2<f64>> {
    expand(grid)
}

pub fn shrink_2d(grid: &Array2<f64>) -> Result<Array2<f64>> {
    shrink(grid)
}

pub fn enforce_mirror_3d(grid: &mut Array3<f64>) -> Result<()> {
    enforce_mirror(grid)
}

pub fn expand_3d(grid: &Array3<f64>) -> Result<Array3<f64>> {
    expand(grid)
}

pub fn shrink_3d(grid: &Array3<f64>) -> Result<Array3<f64>> {
    shrink(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GvfError;
    use ndarray::array;

    fn sample_3d(shape: (usize, usize, usize)) -> Array3<f64> {
        Array3::from_shape_fn(shape, |(i, j, k)| (100 * i + 10 * j + k) as f64)
    }

    #[test]
    fn expand_matches_worked_example() {
        let grid = array![[1.0, 2.0, 3.0, 11.0], [4.0, 5.0, 6.0, 12.0], [7.0, 8.0, 9.0, 13.0]];
        let expected = array![
            [5.0, 4.0, 5.0, 6.0, 12.0, 6.0],
            [2.0, 1.0, 2.0, 3.0, 11.0, 3.0],
            [5.0, 4.0, 5.0, 6.0, 12.0, 6.0],
            [8.0, 7.0, 8.0, 9.0, 13.0, 9.0],
            [5.0, 4.0, 5.0, 6.0, 12.0, 6.0],
        ];
        let padded = expand_2d(&grid).unwrap();
        assert_eq!(padded, expected);
        assert_eq!(shrink_2d(&padded).unwrap(), grid);
    }

    #[test]
    fn enforce_mirror_ignores_previous_border() {
        let mut grid = array![
            [-1.0, -1.0, -1.0, -1.0, -1.0, -1.0],
            [-1.0, 1.0, 2.0, 3.0, 11.0, -1.0],
            [-1.0, 4.0, 5.0, 6.0, 12.0, -1.0],
            [-1.0, 7.0, 8.0, 9.0, 13.0, -1.0],
            [-1.0, -1.0, -1.0, -1.0, -1.0, -1.0],
        ];
        enforce_mirror_2d(&mut grid).unwrap();
        let expected = array![
            [5.0, 4.0, 5.0, 6.0, 12.0, 6.0],
            [2.0, 1.0, 2.0, 3.0, 11.0, 3.0],
            [5.0, 4.0, 5.0, 6.0, 12.0, 6.0],
            [8.0, 7.0, 8.0, 9.0, 13.0, 9.0],
            [5.0, 4.0, 5.0, 6.0, 12.0, 6.0],
        ];
        assert_eq!(grid, expected);
    }

    #[test]
    fn enforce_mirror_is_idempotent() {
        let mut once = sample_3d((4, 5, 6));
        enforce_mirror_3d(&mut once).unwrap();
        let mut twice = once.clone();
        enforce_mirror_3d(&mut twice).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn round_trip_restores_grid() {
        for shape in [(3, 3, 3), (3, 4, 5), (6, 3, 4)] {
            let grid = sample_3d(shape);
            let padded = expand_3d(&grid).unwrap();
            assert_eq!(padded.dim(), (shape.0 + 2, shape.1 + 2, shape.2 + 2));
            assert_eq!(shrink_3d(&padded).unwrap(), grid);
        }
    }

    #[test]
    fn corners_edges_and_faces_come_from_original_interior() {
        let original = sample_3d((5, 6, 7));
        let mut mirrored = original.clone();
        enforce_mirror_3d(&mut mirrored).unwrap();
        let shape = original.shape().to_vec();
        for ((i, j, k), &value) in mirrored.indexed_iter() {
            let source = mirror_source(&[i, j, k], &shape);
            assert_eq!(
                value,
                original[[source[0], source[1], source[2]]],
                "cell ({}, {}, {})",
                i,
                j,
                k
            );
        }
        // Corner (0,0,0) takes the diagonal mirror (2,2,2).
        assert_eq!(mirrored[[0, 0, 0]], 222.0);
        // Edge cell on axes 0 and 2, interior on axis 1.
        assert_eq!(mirrored[[4, 3, 0]], original[[2, 3, 2]]);
    }

    #[test]
    fn extent_three_swaps_boundary_slices() {
        let mut grid = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        enforce_mirror_2d(&mut grid).unwrap();
        assert_eq!(grid, array![[9.0, 8.0, 7.0], [6.0, 5.0, 4.0], [3.0, 2.0, 1.0]]);
    }

    #[test]
    fn mirror_source_maps_only_boundary_coordinates() {
        assert_eq!(mirror_source(&[0, 3, 6], &[5, 6, 7]), vec![2, 3, 4]);
        assert_eq!(mirror_source(&[4, 5, 1], &[5, 6, 7]), vec![2, 3, 1]);
    }

    #[test]
    fn short_axes_are_rejected() {
        let mut grid = Array2::<f64>::zeros((2, 5));
        assert!(matches!(
            enforce_mirror_2d(&mut grid),
            Err(GvfError::InvalidShape { min_extent: 3, .. })
        ));
        assert!(expand_2d(&grid).is_err());
        assert!(shrink_3d(&Array3::zeros((3, 3, 1))).is_err());
    }
}
