use anyhow::{anyhow, Result};
use ndarray::{Array2, Array3};
use serde::{Deserialize, Serialize};
use std::fs;

use crate::grid::MIRROR_MIN_EXTENT;
use crate::phantom;
use crate::solver::GvfParams;

/// Solver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    pub mu: f64,
    pub iterations: usize,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default = "default_report_period")]
    pub report_period: usize,
    #[serde(default)]
    pub parallel: bool,
}

fn default_report_period() -> usize {
    10
}

impl SolverConfig {
    fn validate(&self) -> Result<()> {
        if !self.mu.is_finite() || self.mu < 0.0 {
            return Err(anyhow!("mu must be finite and non-negative, got {}", self.mu));
        }
        if self.iterations == 0 {
            return Err(anyhow!("iterations must be positive"));
        }
        if self.report_period == 0 {
            return Err(anyhow!("report_period must be positive"));
        }
        Ok(())
    }

    pub fn params(&self) -> GvfParams {
        GvfParams::new(self.mu, self.iterations)
            .verbose(self.verbose)
            .report_period(self.report_period)
            .parallel(self.parallel)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhantomKind {
    StepEdge,
    Disk,
    PlanarEdge,
    Sphere,
}

impl PhantomKind {
    pub fn ndim(&self) -> usize {
        match self {
            PhantomKind::StepEdge | PhantomKind::Disk => 2,
            PhantomKind::PlanarEdge | PhantomKind::Sphere => 3,
        }
    }
}

/// Synthetic input image configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhantomConfig {
    pub kind: PhantomKind,
    pub shape: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>, // Disk / sphere radius, defaults to a quarter of the smallest axis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge: Option<usize>, // Edge column, defaults to the middle of the last axis
}

impl PhantomConfig {
    fn validate(&self) -> Result<()> {
        let ndim = self.kind.ndim();
        if self.shape.len() != ndim {
            return Err(anyhow!(
                "Phantom '{:?}' needs a {}D shape, got {:?}",
                self.kind,
                ndim,
                self.shape
            ));
        }
        if self.shape.iter().any(|&n| n < MIRROR_MIN_EXTENT) {
            return Err(anyhow!(
                "Every axis must have at least {} samples, got {:?}",
                MIRROR_MIN_EXTENT,
                self.shape
            ));
        }
        if self.kind == PhantomKind::Sphere && self.shape.iter().any(|&n| n != self.shape[0]) {
            return Err(anyhow!("Sphere phantom needs a cubic shape, got {:?}", self.shape));
        }
        if let Some(radius) = self.radius {
            if radius <= 0.0 {
                return Err(anyhow!("radius must be positive, got {}", radius));
            }
        }
        if let Some(edge) = self.edge {
            let last = self.shape[ndim - 1];
            if edge == 0 || edge >= last {
                return Err(anyhow!(
                    "edge must lie strictly inside the last axis (1..{}), got {}",
                    last,
                    edge
                ));
            }
        }
        Ok(())
    }

    fn radius_or_default(&self) -> f64 {
        self.radius.unwrap_or_else(|| {
            self.shape.iter().copied().min().unwrap_or(0) as f64 / 4.0
        })
    }

    fn edge_or_default(&self) -> usize {
        self.edge.unwrap_or(self.shape[self.shape.len() - 1] / 2)
    }

    pub fn build(&self) -> PhantomImage {
        let s = &self.shape;
        match self.kind {
            PhantomKind::StepEdge => {
                PhantomImage::Image(phantom::step_edge_2d(s[0], s[1], self.edge_or_default()))
            }
            PhantomKind::Disk => {
                PhantomImage::Image(phantom::disk_2d(s[0], s[1], self.radius_or_default()))
            }
            PhantomKind::PlanarEdge => PhantomImage::Volume(phantom::planar_edge_3d(
                s[0],
                s[1],
                s[2],
                self.edge_or_default(),
            )),
            PhantomKind::Sphere => {
                PhantomImage::Volume(phantom::sphere_3d(s[0], self.radius_or_default()))
            }
        }
    }
}

pub enum PhantomImage {
    Image(Array2<f64>),
    Volume(Array3<f64>),
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<()> {
        let valid_levels = ["off", "error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.level.to_lowercase().as_str()) {
            return Err(anyhow!(
                "Invalid log level '{}'. Must be one of: {:?}",
                self.level,
                valid_levels
            ));
        }
        Ok(())
    }
}

/// Complete run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub solver: SolverConfig,
    pub phantom: PhantomConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            solver: SolverConfig {
                mu: 0.05,
                iterations: 200,
                verbose: true,
                report_period: default_report_period(),
                parallel: false,
            },
            phantom: PhantomConfig {
                kind: PhantomKind::Disk,
                shape: vec![64, 64],
                radius: None,
                edge: None,
            },
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file '{}': {}", path, e))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| anyhow!("Failed to parse TOML config: {}", e))?;

        // Validate before returning
        config.validate()?;

        Ok(config)
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<()> {
        self.solver.validate()?;
        self.phantom.validate()?;
        self.logging.validate()?;

        let ndim = self.phantom.kind.ndim() as f64;
        let stable_mu = 1.0 / (4.0 * ndim * ndim);
        if self.solver.mu > stable_mu {
            log::warn!(
                "mu={} is above the stability limit {:.4}, the run may diverge",
                self.solver.mu,
                stable_mu
            );
        }

        Ok(())
    }

    /// Log configuration summary
    pub fn log_summary(&self) {
        log::info!("=== GVF Configuration ===");
        log::info!("Phantom: {:?} {:?}", self.phantom.kind, self.phantom.shape);
        log::info!(
            "Solver: mu={}, iterations={}, parallel={}",
            self.solver.mu,
            self.solver.iterations,
            self.solver.parallel
        );
        log::info!("=========================");
    }
}
