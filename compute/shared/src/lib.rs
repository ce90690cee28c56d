//! Common facilities shared by all compute backends

#[cfg(feature = "criterion")]
pub mod benchmark;
#[cfg(feature = "cpu")]
pub mod cpu;

use clap::Args;
use data::{
    concentration::{step_like, Evolving},
    grid::Grid,
    parameters::Parameters,
};
use std::{error::Error, fmt::Debug};

#[cfg(feature = "cpu")]
pub use cpu::SimulateStep;

/// Commonalities between all ways to set up a simulation
pub trait SimulateBase: Sized {
    /// Supplementary CLI arguments allowing fine-tuning of this backend
    ///
    /// To honor the principle of least surprise and make criterion
    /// microbenchmarks work smoothly, any argument you add must have a default
    /// value and should also be configurable through environment variables.
    type CliArgs: Args + Debug;

    /// Things that can go wrong when setting up or running the simulation
    type Error: Error + From<data::Error> + Send + Sync + 'static;

    /// Set up concentration storage for a grid, using the initial step profile
    /// of the simulation parameters
    fn make_field(&self, grid: &Grid) -> Result<Evolving, Self::Error>;
}

/// Simulation backends that can be set up from parameters and CLI arguments
pub trait SimulateCreate: SimulateBase {
    /// Set up the simulation
    ///
    /// The parameters are validated once here, and any derived quantity (like
    /// the FTCS coefficient) is computed once up front.
    fn new(params: Parameters, args: Self::CliArgs) -> Result<Self, Self::Error>;
}

/// Simulation compute backend interface expected by the binaries
pub trait Simulate: SimulateBase {
    /// Perform `steps` simulation time steps on the specified field
    ///
    /// Always performs exactly `steps` steps. At the end, the latest
    /// concentration can be read out with `Evolving::current()`.
    fn perform_steps(&self, field: &mut Evolving, steps: usize) -> Result<(), Self::Error>;
}

/// Set up a step-profile concentration field on a grid
///
/// Shared implementation of [`SimulateBase::make_field()`] for backends which
/// store their field on the CPU.
pub fn make_step_field(params: &Parameters, grid: &Grid) -> Result<Evolving, data::Error> {
    let initial = step_like(&grid.positions(), params.profile);
    Evolving::for_grid(grid, initial)
}

/// Dummy command line arguments for backends that do not have any
#[derive(Args, Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct NoArgs {}

/// Macro that generates a complete criterion benchmark harness for you
#[macro_export]
#[cfg(feature = "criterion")]
macro_rules! criterion_benchmark {
    ($backend:ident) => {
        fn criterion_benchmark(c: &mut $crate::benchmark::criterion::Criterion) {
            $crate::benchmark::criterion_benchmark::<$backend::Simulation>(
                c,
                stringify!($backend),
                $crate::benchmark::compute_workload,
                "compute",
            );
        }
        $crate::benchmark::criterion::criterion_group!(benches, criterion_benchmark);
        $crate::benchmark::criterion::criterion_main!(benches);
    };
}
