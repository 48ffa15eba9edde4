//! Gradient Vector Flow solver.
//!
//! The flow `(u, v[, w])` starts at the gradient `F` of the normalized edge
//! map and is advanced with the explicit diffusion-reaction update
//!
//! ```text
//! u <- u + mu * 2N * lap(u) - |F|^2 * (u - Fx)
//! ```
//!
//! on a grid padded by one mirrored cell on every side. `N` is the number of
//! spatial axes.

use ndarray::{Array, Array2, Array3, ArrayBase, Data, Dimension, RemoveAxis, Zip};
use rayon::prelude::*;

use crate::boundary::{enforce_mirror, expand, inner, shrink};
use crate::error::{GvfError, Result};
use crate::field::{VectorField, VectorField2, VectorField3};
use crate::grid::{normalize, Grid};
use crate::operators::{gradient, laplacian_into, squared_magnitude};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GvfParams {
    pub mu: f64,              // Regularization coefficient
    pub iterations: usize,    // Number of update steps
    pub verbose: bool,        // Log progress at info level
    pub report_period: usize, // How many times to report progress
    pub parallel: bool,       // Update components on the rayon pool
}

impl GvfParams {
    pub fn new(mu: f64, iterations: usize) -> Self {
        Self {
            mu,
            iterations,
            verbose: false,
            report_period: 10,
            parallel: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn report_period(mut self, report_period: usize) -> Self {
        self.report_period = report_period;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.mu.is_finite() || self.mu < 0.0 {
            return Err(GvfError::InvalidParameters(format!(
                "mu must be finite and non-negative, got {}",
                self.mu
            )));
        }
        if self.iterations == 0 {
            return Err(GvfError::InvalidParameters(
                "iterations must be positive".into(),
            ));
        }
        if self.report_period == 0 {
            return Err(GvfError::InvalidParameters(
                "report_period must be positive".into(),
            ));
        }
        Ok(())
    }
}

pub struct GvfSolver<D: Dimension> {
    grid: Grid,
    params: GvfParams,
    diffusion: f64,
    // Working arrays are all on the padded grid.
    flow: Vec<Array<f64, D>>,
    gradient: Vec<Array<f64, D>>,
    edge_mag_sq: Array<f64, D>,
    scratch: Vec<Array<f64, D>>,
    current_iteration: usize,
}

impl<D> GvfSolver<D>
where
    D: Dimension + RemoveAxis,
{
    /// Normalize and pad `image`, and start the flow at its gradient.
    pub fn new<S>(image: &ArrayBase<S, D>, params: GvfParams) -> Result<Self>
    where
        S: Data<Elem = f64>,
    {
        params.validate()?;
        let grid = Grid::new(image.shape())?;
        if params.mu > grid.stable_mu() {
            log::warn!(
                "mu={} exceeds the explicit stability limit {:.4} for a {}D grid, the flow may diverge",
                params.mu,
                grid.stable_mu(),
                grid.ndim()
            );
        }

        let padded = expand(&normalize(image)?)?;
        let gradient = gradient(&padded)?;
        let edge_mag_sq = squared_magnitude(&gradient);
        let flow = gradient.clone();
        let scratch = gradient
            .iter()
            .map(|g| Array::zeros(g.raw_dim()))
            .collect();
        let diffusion = params.mu * grid.diffusion_scale();

        log::debug!(
            "GVF solver ready: shape {:?}, mu={}, iterations={}",
            grid.shape(),
            params.mu,
            params.iterations
        );

        Ok(Self {
            grid,
            params,
            diffusion,
            flow,
            gradient,
            edge_mag_sq,
            scratch,
            current_iteration: 0,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn params(&self) -> &GvfParams {
        &self.params
    }

    pub fn current_iteration(&self) -> usize {
        self.current_iteration
    }

    pub fn is_finished(&self) -> bool {
        self.current_iteration >= self.params.iterations
    }

    /// Current flow with the padding removed.
    pub fn field(&self) -> Result<VectorField<D>> {
        unpad(&self.flow)
    }

    /// Gradient of the normalized edge map the flow is anchored to.
    pub fn initial_gradient(&self) -> Result<VectorField<D>> {
        unpad(&self.gradient)
    }

    /// |F|^2 of the normalized edge map, padding removed.
    pub fn edge_map(&self) -> Result<Array<f64, D>> {
        shrink(&self.edge_mag_sq)
    }

    /// Advance one iteration and return the largest change of the flow.
    pub fn step(&mut self) -> Result<f64> {
        if self.params.parallel {
            self.step_parallel()
        } else {
            self.step_serial()
        }
    }

    pub fn step_serial(&mut self) -> Result<f64> {
        let mut change = 0.0_f64;
        for ((component, scratch), anchor) in self
            .flow
            .iter_mut()
            .zip(self.scratch.iter_mut())
            .zip(&self.gradient)
        {
            let delta = update_component(
                component,
                scratch,
                anchor,
                &self.edge_mag_sq,
                self.diffusion,
                false,
            )?;
            change = change.max(delta);
        }
        self.finish_step(change)
    }

    pub fn step_parallel(&mut self) -> Result<f64> {
        let edge_mag_sq = &self.edge_mag_sq;
        let diffusion = self.diffusion;
        let changes = self
            .flow
            .par_iter_mut()
            .zip(self.scratch.par_iter_mut())
            .zip(self.gradient.par_iter())
            .map(|((component, scratch), anchor)| {
                update_component(component, scratch, anchor, edge_mag_sq, diffusion, true)
            })
            .collect::<Result<Vec<f64>>>()?;
        let change = changes.into_iter().fold(0.0_f64, f64::max);
        self.finish_step(change)
    }

    fn finish_step(&mut self, change: f64) -> Result<f64> {
        self.current_iteration += 1;
        if !change.is_finite() {
            log::error!("GVF diverged at iteration {}", self.current_iteration);
            return Err(GvfError::Diverged {
                iteration: self.current_iteration,
            });
        }
        Ok(change)
    }

    /// Step until the configured iteration count is reached.
    pub fn run(&mut self) -> Result<()> {
        let total = self.params.iterations;
        let report_every = (total / self.params.report_period).max(1);
        if self.params.verbose {
            log::info!(
                "Computing GVF on {:?} grid: mu={}, iterations={}",
                self.grid.shape(),
                self.params.mu,
                total
            );
        }

        while !self.is_finished() {
            let change = self.step()?;

            if self.current_iteration % report_every == 0 || self.is_finished() {
                if self.params.verbose {
                    log::info!(
                        "GVF iter: {}/{} (max change {:.3e})",
                        self.current_iteration,
                        total,
                        change
                    );
                } else {
                    log::trace!("GVF iter: {}/{}", self.current_iteration, total);
                }
            }
        }
        Ok(())
    }

    /// Run any remaining iterations and return the unpadded flow.
    pub fn into_field(mut self) -> Result<VectorField<D>> {
        self.run()?;
        unpad(&self.flow)
    }
}

/// Mirror, diffuse and pull one component back toward its anchor.
///
/// `scratch` first receives the Laplacian, then the update, so the component
/// is only written once every term has been read. Returns the largest change
/// over the unpadded region, or infinity if any change is not finite.
fn update_component<D>(
    component: &mut Array<f64, D>,
    scratch: &mut Array<f64, D>,
    anchor: &Array<f64, D>,
    edge_mag_sq: &Array<f64, D>,
    diffusion: f64,
    parallel: bool,
) -> Result<f64>
where
    D: Dimension + RemoveAxis,
{
    enforce_mirror(component)?;
    laplacian_into(component, scratch)?;

    let kernel = |delta: &mut f64, &value: &f64, &target: &f64, &mag_sq: &f64| {
        *delta = diffusion * *delta - mag_sq * (value - target);
    };
    let update = Zip::from(&mut *scratch)
        .and(&*component)
        .and(anchor)
        .and(edge_mag_sq);
    if parallel {
        update.par_for_each(kernel);
    } else {
        update.for_each(kernel);
    }

    Zip::from(&mut *component)
        .and(&*scratch)
        .for_each(|value, &delta| *value += delta);

    Ok(scratch
        .slice_each_axis(|_| inner())
        .fold(0.0_f64, |max, &delta| {
            if delta.is_finite() {
                max.max(delta.abs())
            } else {
                f64::INFINITY
            }
        }))
}

fn unpad<D>(components: &[Array<f64, D>]) -> Result<VectorField<D>>
where
    D: Dimension,
{
    let components = components
        .iter()
        .map(shrink)
        .collect::<Result<Vec<_>>>()?;
    VectorField::new(components)
}

/// GVF of an image of any dimension.
pub fn gvf<S, D>(image: &ArrayBase<S, D>, params: &GvfParams) -> Result<VectorField<D>>
where
    S: Data<Elem = f64>,
    D: Dimension + RemoveAxis,
{
    GvfSolver::new(image, *params)?.into_field()
}

pub fn gvf_2d(image: &Array2<f64>, params: &GvfParams) -> Result<VectorField2> {
    gvf(image, params)
}

pub fn gvf_3d(volume: &Array3<f64>, params: &GvfParams) -> Result<VectorField3> {
    gvf(volume, params)
}

/// `(u, v)` after `iterations` updates with regularization `mu`.
pub fn solve_2d(image: &Array2<f64>, mu: f64, iterations: usize) -> Result<VectorField2> {
    gvf_2d(image, &GvfParams::new(mu, iterations))
}

/// `(u, v, w)` after `iterations` updates, logging progress when `verbose`.
pub fn solve_3d(
    volume: &Array3<f64>,
    mu: f64,
    iterations: usize,
    verbose: bool,
) -> Result<VectorField3> {
    gvf_3d(volume, &GvfParams::new(mu, iterations).verbose(verbose))
}
