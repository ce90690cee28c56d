//! Parallel implementation of the explicit diffusion step
//!
//! The interior sweep of each time step is embarrassingly parallel: every new
//! value only depends on values from the previous step. This crate splits the
//! sweep into independent chunks with fork-join parallelism, and waits for all
//! chunks to be done before the next step starts.

mod args;

pub use args::ParallelArgs;

use compute::{
    cpu::{CpuGrid, SimulateCpu},
    SimulateBase, SimulateCreate,
};
use data::{concentration::Evolving, grid::Grid, parameters::Parameters, Precision};
use log::debug;
use rayon::{prelude::*, ThreadPoolBuildError, ThreadPoolBuilder};
use thiserror::Error;

/// Explicit 1D diffusion simulation
pub type Simulation = ParallelSimulation<compute_naive::Simulation>;

/// Default number of processed bytes per parallel task
const DEFAULT_SEQ_BLOCK_SIZE: usize = 16 * 1024;

/// Simulation wrapper that enforces parallel iteration
pub struct ParallelSimulation<Backend: SimulateCpu + Sync> {
    /// Number of concentration values below which parallelism is not
    /// considered worthwhile
    sequential_len_threshold: usize,

    /// Underlying sequential compute backend
    backend: Backend,
}
//
impl<Backend: SimulateCpu + Sync> SimulateBase for ParallelSimulation<Backend> {
    type CliArgs = ParallelArgs<Backend::CliArgs>;

    type Error = Error<Backend::Error>;

    fn make_field(&self, grid: &Grid) -> Result<Evolving, Self::Error> {
        self.backend.make_field(grid).map_err(Error::Backend)
    }
}
//
impl<Backend: SimulateCpu + SimulateCreate + Sync> SimulateCreate for ParallelSimulation<Backend> {
    fn new(params: Parameters, args: Self::CliArgs) -> Result<Self, Self::Error> {
        if let Some(num_threads) = args.num_threads {
            ThreadPoolBuilder::new()
                .num_threads(num_threads.into())
                .build_global()
                .map_err(Error::ThreadPool)?;
        }

        let seq_block_size = args
            .seq_block_size
            .map_or(DEFAULT_SEQ_BLOCK_SIZE, usize::from);
        let sequential_len_threshold = seq_block_size / std::mem::size_of::<Precision>();
        debug!(
            "Parallel sweeps will run sequentially below {sequential_len_threshold} values, \
            over {} threads",
            rayon::current_num_threads()
        );

        Ok(Self {
            sequential_len_threshold,
            backend: Backend::new(params, args.backend).map_err(Error::Backend)?,
        })
    }
}
//
impl<Backend: SimulateCpu + Sync> SimulateCpu for ParallelSimulation<Backend> {
    fn unchecked_step_impl(&self, grid: CpuGrid<'_, '_>) {
        rayon::iter::split(grid, |subgrid| {
            // Grids with a single output value cannot be split any further
            let sequential = Self::grid_len(&subgrid) <= self.sequential_len_threshold
                || subgrid.1.len() < 2;
            if sequential {
                (subgrid, None)
            } else {
                let [half1, half2] = Self::split_grid(subgrid);
                (half1, Some(half2))
            }
        })
        .for_each(|subgrid| {
            self.backend.step_impl(subgrid);
        });
    }
}

/// Things that can go wrong when performing parallel simulation
#[derive(Debug, Error)]
pub enum Error<BackendError: std::error::Error> {
    /// Error from the underlying compute backend
    #[error(transparent)]
    Backend(BackendError),

    /// Failed to configure thread pool
    #[error("failed to configure thread pool")]
    ThreadPool(ThreadPoolBuildError),

    /// Invalid simulation setup
    ///
    /// In an ideal world, this error kind wouldn't be needed, as Backend can
    /// cover this case. But Rust is not yet smart enough to treat From as
    /// a transitive operation (if `T: From<U>` and `U: From<V>`, we do not yet
    /// get `T: From<V>` for free).
    #[doc(hidden)]
    #[error(transparent)]
    Data(#[from] data::Error),
}
