//! CLI arguments

use clap::Args;
use std::num::NonZeroUsize;

/// CLI parameters of the parallel diffusion backend
#[derive(Args, Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct ParallelArgs<BackendArgs: Args> {
    /// Number of threads sharing each time step
    ///
    /// Defaults to the rayon default, i.e. one thread per logical CPU.
    #[arg(short = 'j', long, env)]
    pub(crate) num_threads: Option<NonZeroUsize>,

    /// Size in bytes of the concentration slice below which a step's interior
    /// sweep is no longer split across threads
    ///
    /// Defaults to 16 KiB, i.e. 2048 grid points.
    #[arg(long, env)]
    pub(crate) seq_block_size: Option<NonZeroUsize>,

    /// Arguments of the sequential backend that runs each chunk
    #[command(flatten)]
    pub(crate) backend: BackendArgs,
}
