//! Computation parameters

use crate::{Error, Precision, Result};

/// Computation parameters
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Parameters {
    /// Diffusivity of the transported scalar
    pub diffusivity: Precision,

    /// Length of the simulation domain
    pub domain_length: Precision,

    /// Distance between two consecutive grid points
    pub grid_spacing: Precision,

    /// Time step (must stay below the stable time step)
    pub time_step: Precision,

    /// Initial concentration profile
    pub profile: StepProfile,
}
//
impl Default for Parameters {
    fn default() -> Self {
        let diffusivity = 100.0;
        let domain_length = 300.0;
        let grid_spacing = 0.5;
        Self {
            diffusivity,
            domain_length,
            grid_spacing,
            // Same as stable_time_step(grid_spacing, diffusivity)
            time_step: 0.5 * grid_spacing.powi(2) / diffusivity,
            profile: StepProfile {
                split: Some(domain_length / 2.0),
                ..Default::default()
            },
        }
    }
}
//
impl Parameters {
    /// Dimensionless FTCS coefficient `D * dt / dx²`
    ///
    /// The explicit scheme is only stable when this is at most 0.5.
    pub fn diffusion_number(&self) -> Precision {
        self.diffusivity * self.time_step / self.grid_spacing.powi(2)
    }

    /// Check that the parameters describe a meaningful simulation
    pub fn validate(&self) -> Result<()> {
        check_finite("diffusivity", self.diffusivity)?;
        if self.diffusivity < 0.0 {
            return Err(Error::InvalidParameter {
                name: "diffusivity",
                value: self.diffusivity,
                reason: "must not be negative",
            });
        }
        check_finite("domain length", self.domain_length)?;
        check_finite("grid spacing", self.grid_spacing)?;
        if self.grid_spacing <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "grid spacing",
                value: self.grid_spacing,
                reason: "must be positive",
            });
        }
        check_finite("time step", self.time_step)?;
        if self.time_step < 0.0 {
            return Err(Error::InvalidParameter {
                name: "time step",
                value: self.time_step,
                reason: "must not be negative",
            });
        }
        Ok(())
    }
}

/// Two-level step function used as the initial concentration
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepProfile {
    /// Concentration at and below the split position
    pub left: Precision,

    /// Concentration above the split position
    pub right: Precision,

    /// Split position, defaults to the middle of the domain
    pub split: Option<Precision>,
}
//
impl Default for StepProfile {
    fn default() -> Self {
        Self {
            left: 500.0,
            right: 0.0,
            split: None,
        }
    }
}

/// Largest time step for which the explicit FTCS scheme stays stable
///
/// Follows the von Neumann criterion `dt = 0.5 * dx² / D`. A zero grid spacing
/// is a degenerate but well-defined case which yields a zero time step,
/// whatever the diffusivity.
pub fn stable_time_step(grid_spacing: Precision, diffusivity: Precision) -> Result<Precision> {
    check_finite("grid spacing", grid_spacing)?;
    if grid_spacing == 0.0 {
        return Ok(0.0);
    }
    if diffusivity.is_nan() || diffusivity < 0.0 {
        return Err(Error::InvalidParameter {
            name: "diffusivity",
            value: diffusivity,
            reason: "must be positive",
        });
    }
    if diffusivity == 0.0 {
        return Err(Error::DivisionByZero { grid_spacing });
    }
    Ok(0.5 * grid_spacing.powi(2) / diffusivity)
}

/// Reject NaNs and infinities
fn check_finite(name: &'static str, value: Precision) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        })
    }
}
