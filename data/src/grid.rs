//! Uniform 1D spatial grid

use crate::{Error, Precision, Result};
use log::debug;
use ndarray::{Array1, ArrayView1};

/// Uniformly spaced positions covering `[0, length)`
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    /// Length of the simulation domain
    length: Precision,

    /// Distance between two consecutive grid points
    spacing: Precision,

    /// Position of each grid point
    positions: Array1<Precision>,
}
//
impl Grid {
    /// Set up a grid with positions `0, spacing, 2*spacing, ...` below `length`
    pub fn new(length: Precision, spacing: Precision) -> Result<Self> {
        if !(length.is_finite() && length >= 0.0 && spacing.is_finite() && spacing > 0.0) {
            return Err(Error::InvalidGrid { length, spacing });
        }
        let positions = Array1::range(0.0, length, spacing);
        debug!(
            "Created a grid of {} points over [0, {length}) with spacing {spacing}",
            positions.len()
        );
        Ok(Self {
            length,
            spacing,
            positions,
        })
    }

    /// Number of grid points
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Truth that the grid has no point at all
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Distance between two consecutive grid points
    pub fn spacing(&self) -> Precision {
        self.spacing
    }

    /// Length of the simulation domain
    pub fn length(&self) -> Precision {
        self.length
    }

    /// Middle of the simulation domain
    pub fn midpoint(&self) -> Precision {
        self.length / 2.0
    }

    /// Position of each grid point
    pub fn positions(&self) -> ArrayView1<'_, Precision> {
        self.positions.view()
    }
}
