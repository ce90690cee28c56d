//! This crate collects the command-line plumbing of the simulation programs:
//! shared CLI arguments, logging and progress reporting.

#[cfg(feature = "simulation")]
use clap::Args;
#[cfg(feature = "simulation")]
use compute::SimulateBase;
#[cfg(feature = "simulation")]
use data::parameters::{stable_time_step, Parameters, StepProfile};
use data::Precision;
#[cfg(feature = "tui")]
use indicatif::{ProgressBar, ProgressFinish, ProgressStyle};
#[cfg(feature = "tui")]
use log::LevelFilter;
use std::path::PathBuf;
#[cfg(feature = "tui")]
use std::{borrow::Cow, time::Duration};

/// CLI arguments describing the diffusion problem
#[cfg(feature = "simulation")]
#[derive(Args)]
pub struct SharedArgs<Simulation: SimulateBase> {
    /// Diffusivity of the transported scalar
    #[arg(short = 'D', long, default_value_t = Parameters::default().diffusivity)]
    pub diffusivity: Precision,

    /// Length of the simulation domain
    #[arg(short, long, default_value_t = Parameters::default().domain_length)]
    pub length: Precision,

    /// Distance between two consecutive grid points
    #[arg(short = 'x', long, default_value_t = Parameters::default().grid_spacing)]
    pub spacing: Precision,

    /// Simulated time interval on each simulation step
    ///
    /// Defaults to the largest stable time step.
    #[arg(short = 't', long)]
    pub deltat: Option<Precision>,

    /// Initial concentration at and below the step position
    #[arg(long, allow_negative_numbers = true, default_value_t = StepProfile::default().left)]
    pub left: Precision,

    /// Initial concentration above the step position
    #[arg(long, allow_negative_numbers = true, default_value_t = StepProfile::default().right)]
    pub right: Precision,

    /// Position of the initial concentration step
    ///
    /// Defaults to the middle of the simulation domain.
    #[arg(long, allow_negative_numbers = true)]
    pub split: Option<Precision>,

    /// Number of simulation steps to perform between snapshots
    #[arg(short = 'e', long, default_value_t = 5000)]
    pub nbextrastep: usize,

    /// Backend-specific CLI arguments
    #[command(flatten)]
    pub backend: Simulation::CliArgs,
}

/// Simulation parameters from CLI arguments, including the defaults that clap
/// can't handle
#[cfg(feature = "simulation")]
pub fn parameters(args: &SharedArgs<impl SimulateBase>) -> Result<Parameters, data::Error> {
    let time_step = match args.deltat {
        Some(time_step) => time_step,
        None => stable_time_step(args.spacing, args.diffusivity)?,
    };
    Ok(Parameters {
        diffusivity: args.diffusivity,
        domain_length: args.length,
        grid_spacing: args.spacing,
        time_step,
        profile: StepProfile {
            left: args.left,
            right: args.right,
            split: Some(args.split.unwrap_or(args.length / 2.0)),
        },
    })
}

/// Log to syslog, or to stderr if no syslog daemon can be reached
#[cfg(feature = "tui")]
pub fn init_logging() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(error) = syslog::init(syslog::Facility::default(), level, None) {
        env_logger::Builder::new()
            .filter_level(level)
            .parse_default_env()
            .init();
        log::warn!("Failed to initialize syslog ({error}), logging to stderr instead");
    }
}

/// Set up a progress bar for a certain number of iterations
#[cfg(feature = "tui")]
pub fn init_progress_reporting(
    message: impl Into<Cow<'static, str>>,
    num_iterations: usize,
) -> ProgressBar {
    let progress = ProgressBar::new(num_iterations as u64)
        .with_message(message)
        .with_style(
            ProgressStyle::with_template("{msg} {pos}/{len} {wide_bar} {elapsed}/~{duration}")
                .expect("Failed to parse style"),
        )
        .with_finish(ProgressFinish::AndClear);
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

/// Path to the simulation output, with its default value
pub fn simulation_output_path(output: Option<PathBuf>) -> PathBuf {
    output.unwrap_or_else(|| DEFAULT_OUTPUT.into())
}

/// Default name of the simulation output file
#[cfg(feature = "hdf5")]
const DEFAULT_OUTPUT: &str = "output.h5";
#[cfg(not(feature = "hdf5"))]
const DEFAULT_OUTPUT: &str = "output.txt";

/// Largest FTCS coefficient for which the explicit scheme is stable
pub const MAX_STABLE_DIFFUSION_NUMBER: Precision = 0.5;

#[cfg(all(test, feature = "simulation"))]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestArgs {
        #[command(flatten)]
        shared: SharedArgs<compute_naive::Simulation>,
    }

    #[test]
    fn default_parameters() {
        let args = TestArgs::try_parse_from(["simulate"]).unwrap();
        assert_eq!(parameters(&args.shared).unwrap(), Parameters::default());
        assert_eq!(args.shared.nbextrastep, 5000);
    }

    #[test]
    fn explicit_parameters() {
        let args = TestArgs::try_parse_from([
            "simulate", "-D", "2", "-l", "10", "-x", "1", "--split", "3", "--left", "1",
            "--right", "-1",
        ])
        .unwrap();
        let params = parameters(&args.shared).unwrap();
        assert_eq!(params.time_step, 0.25);
        assert_eq!(
            params.profile,
            StepProfile {
                left: 1.0,
                right: -1.0,
                split: Some(3.0),
            }
        );

        let args = TestArgs::try_parse_from(["simulate", "-t", "0.1"]).unwrap();
        assert_eq!(parameters(&args.shared).unwrap().time_step, 0.1);
    }

    #[test]
    fn zero_diffusivity_needs_time_step() {
        let args = TestArgs::try_parse_from(["simulate", "-D", "0"]).unwrap();
        assert!(matches!(
            parameters(&args.shared),
            Err(data::Error::DivisionByZero { .. })
        ));
    }
}
