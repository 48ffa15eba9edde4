use thiserror::Error;

pub type Result<T> = std::result::Result<T, GvfError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GvfError {
    /// An axis is too short for the stencil that was asked for
    #[error("grid shape {shape:?} has an axis shorter than {min_extent}")]
    InvalidShape {
        shape: Vec<usize>,
        min_extent: usize,
    },

    /// The image has zero dynamic range and cannot be normalized
    #[error("input image is constant (every sample is {value}), cannot normalize")]
    DegenerateInput { value: f64 },

    #[error("input image contains NaN or infinite samples")]
    NonFiniteInput,

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Non-finite values appeared while iterating
    #[error("field diverged at iteration {iteration}, try a smaller mu")]
    Diverged { iteration: usize },

    #[error("shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch {
        left: Vec<usize>,
        right: Vec<usize>,
    },
}
