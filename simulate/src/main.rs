mod output;

use clap::Parser;
use compute::{Simulate, SimulateBase, SimulateCreate};
use compute_selector::Simulation;
use data::{concentration::ConcentrationField, grid::Grid};
use eyre::{eyre, Result};
use log::{info, warn};
use output::Recorder;
use std::{num::NonZeroUsize, path::PathBuf, sync::mpsc};
use ui::SharedArgs;

/// Simulate 1D diffusion of a step-shaped concentration profile
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CLI arguments describing the diffusion problem
    #[command(flatten)]
    shared: SharedArgs<Simulation>,

    /// Number of concentration snapshots to be recorded after the initial one
    #[arg(short, long, default_value_t = 1)]
    nbsnapshot: usize,

    /// Path to the results output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Size of the snapshot buffer between the compute and I/O thread
    #[arg(long, default_value_t = NonZeroUsize::new(2).unwrap())]
    output_buffer: NonZeroUsize,
}

fn main() -> Result<()> {
    ui::init_logging();

    // Parse CLI arguments and handle clap-incompatible defaults
    let args = Args::parse();
    let params = ui::parameters(&args.shared)?;
    let steps_per_snapshot = args.shared.nbextrastep;
    let file_name = ui::simulation_output_path(args.output);

    // Set up the simulation domain
    let grid = Grid::new(params.domain_length, params.grid_spacing)?;
    let diffusion_number = params.diffusion_number();
    info!(
        "Simulating {} grid points with time step {} (FTCS coefficient {diffusion_number})",
        grid.len(),
        params.time_step
    );
    if diffusion_number > ui::MAX_STABLE_DIFFUSION_NUMBER {
        warn!(
            "FTCS coefficient {diffusion_number} exceeds {}, the simulation will be unstable",
            ui::MAX_STABLE_DIFFUSION_NUMBER
        );
    }

    // Set up the simulation and the initial step profile
    let simulation = Simulation::new(params, args.shared.backend)?;
    let mut field = simulation.make_field(&grid)?;
    let mut recorder = Recorder::create(&file_name, &grid, args.nbsnapshot + 1)?;
    recorder.record(field.current())?;

    // Set up progress reporting
    let progress = ui::init_progress_reporting("Running simulation step", args.nbsnapshot);

    // Record snapshots on a separate thread
    std::thread::scope(|s| {
        let (sender, receiver) =
            mpsc::sync_channel::<ConcentrationField>(args.output_buffer.into());
        let recorder = &mut recorder;
        let progress = &progress;
        let output = s.spawn(move || {
            for profile in receiver {
                recorder.record(profile.view())?;
                progress.inc(1);
            }
            Ok::<_, eyre::Report>(())
        });

        // Run the simulation on the main thread
        for _ in 0..args.nbsnapshot {
            simulation.perform_steps(&mut field, steps_per_snapshot)?;

            // If the output thread is gone, its error is reported below
            if sender.send(field.current().to_owned()).is_err() {
                break;
            }
        }
        drop(sender);
        output
            .join()
            .map_err(|_| eyre!("Output thread panicked"))?
    })?;
    progress.finish();

    // Make sure output data is written correctly
    recorder.close()?;
    info!(
        "Simulated {} time steps, output written to {}",
        args.nbsnapshot * steps_per_snapshot,
        file_name.display()
    );
    Ok(())
}
