//! Synthetic binary edge maps.

use ndarray::{Array2, Array3};

/// 0 left of `edge_col`, 1 from `edge_col` on.
pub fn step_edge_2d(rows: usize, cols: usize, edge_col: usize) -> Array2<f64> {
    Array2::from_shape_fn((rows, cols), |(_, j)| if j >= edge_col { 1.0 } else { 0.0 })
}

/// Filled disk centred in the image.
pub fn disk_2d(rows: usize, cols: usize, radius: f64) -> Array2<f64> {
    let ci = (rows as f64 - 1.0) / 2.0;
    let cj = (cols as f64 - 1.0) / 2.0;
    Array2::from_shape_fn((rows, cols), |(i, j)| {
        let di = i as f64 - ci;
        let dj = j as f64 - cj;
        if di * di + dj * dj <= radius * radius {
            1.0
        } else {
            0.0
        }
    })
}

/// Volume split by the plane `col == edge_col` (normal along the last axis).
pub fn planar_edge_3d(depth: usize, rows: usize, cols: usize, edge_col: usize) -> Array3<f64> {
    Array3::from_shape_fn((depth, rows, cols), |(_, _, k)| {
        if k >= edge_col {
            1.0
        } else {
            0.0
        }
    })
}

/// Filled ball centred in an `n`-cube.
pub fn sphere_3d(n: usize, radius: f64) -> Array3<f64> {
    let c = (n as f64 - 1.0) / 2.0;
    Array3::from_shape_fn((n, n, n), |(i, j, k)| {
        let (di, dj, dk) = (i as f64 - c, j as f64 - c, k as f64 - c);
        if di * di + dj * dj + dk * dk <= radius * radius {
            1.0
        } else {
            0.0
        }
    })
}
