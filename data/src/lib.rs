//! Data format used by the 1D diffusion simulation

pub mod concentration;
pub mod grid;
#[cfg(feature = "hdf5")]
pub mod hdf5;
pub mod parameters;

use thiserror::Error;

/// Computation precision
pub type Precision = f64;

/// Things that can go wrong when setting up a diffusion problem
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    /// Zero diffusivity on a non-degenerate grid has no diffusive time scale
    #[error("cannot derive a stable time step from a zero diffusivity (grid spacing {grid_spacing})")]
    DivisionByZero {
        /// Grid spacing that was requested
        grid_spacing: Precision,
    },

    /// A physical parameter is out of its admissible range
    #[error("invalid {name} {value}: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter
        name: &'static str,

        /// Value that was provided
        value: Precision,

        /// Admissible range
        reason: &'static str,
    },

    /// The spatial grid cannot be built
    #[error("invalid grid of length {length} and spacing {spacing}")]
    InvalidGrid {
        /// Domain length
        length: Precision,

        /// Grid spacing
        spacing: Precision,
    },

    /// A concentration field does not match the grid it is used with
    #[error("concentration field has {actual} values but the grid has {expected} points")]
    LengthMismatch {
        /// Number of grid points
        expected: usize,

        /// Number of concentration values
        actual: usize,
    },
}

/// Result type used throughout this crate
pub type Result<T> = std::result::Result<T, Error>;
