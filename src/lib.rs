//! Gradient Vector Flow (GVF) external force fields for 2D images and 3D
//! volumes.
//!
//! The GVF of an edge map is its gradient, diffused into flat regions while
//! staying anchored to the original gradient near edges. It is the usual
//! external force for snakes and deformable surfaces.
//!
//! ```no_run
//! use gvf::{phantom, solve_2d};
//!
//! let image = phantom::disk_2d(64, 64, 16.0);
//! let flow = solve_2d(&image, 0.05, 200)?;
//! println!("u at the centre: {}", flow.u()[[32, 32]]);
//! # Ok::<(), gvf::GvfError>(())
//! ```

pub mod boundary;
pub mod config;
pub mod error;
pub mod field;
pub mod grid;
pub mod logging;
pub mod operators;
pub mod phantom;
pub mod solver;

pub use error::{GvfError, Result};
pub use field::{VectorField, VectorField2, VectorField3};
pub use grid::Grid;
pub use solver::{gvf, gvf_2d, gvf_3d, solve_2d, solve_3d, GvfParams, GvfSolver};
