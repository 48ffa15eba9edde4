use anyhow::{Context, Result};
use ndarray::{Array, Dimension, RemoveAxis};

use gvf::config::{Config, PhantomImage};
use gvf::logging::init_logging;
use gvf::{GvfParams, GvfSolver, VectorField};

fn main() -> Result<()> {
    // Optional TOML config path, otherwise a disk phantom
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(&path)?,
        None => Config::default(),
    };
    init_logging(Some(&config.logging.level));
    config.log_summary();

    let params = config.solver.params();
    match config.phantom.build() {
        PhantomImage::Image(image) => run(&image, params),
        PhantomImage::Volume(volume) => run(&volume, params),
    }
}

fn run<D>(image: &Array<f64, D>, params: GvfParams) -> Result<()>
where
    D: Dimension + RemoveAxis,
{
    let solver = GvfSolver::new(image, params).context("Failed to set up GVF solver")?;
    let initial = solver.initial_gradient()?;
    let flow = solver.into_field().context("GVF iteration failed")?;
    summarise(&initial, &flow)
}

fn summarise<D: Dimension>(initial: &VectorField<D>, flow: &VectorField<D>) -> Result<()> {
    let magnitude = flow.magnitude();
    let covered = magnitude.iter().filter(|&&m| m > 1e-3).count();
    let initial_covered = initial.magnitude().iter().filter(|&&m| m > 1e-3).count();
    let max = magnitude.iter().copied().fold(0.0_f64, f64::max);

    log::info!("Field shape: {:?}", flow.shape());
    log::info!("Max |v|: {:.4e}", max);
    log::info!(
        "Cells with |v| > 1e-3: {} of {} (gradient alone: {})",
        covered,
        magnitude.len(),
        initial_covered
    );
    log::info!(
        "Max change from initial gradient: {:.4e}",
        flow.max_abs_diff(initial)?
    );
    Ok(())
}
