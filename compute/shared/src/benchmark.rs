//! Benchmarking utilities
//!
//! Please consider using the macros provided by this crate instead of calling
//! these implementation details directly.

use crate::{Simulate, SimulateCreate};
use clap::{Args, Command, FromArgMatches};
use criterion::{BenchmarkId, Criterion, Throughput};
use data::{concentration::Evolving, grid::Grid, parameters::Parameters};
use std::{hint::black_box, sync::Once};

/// Re-export criterion for the criterion_benchmark macro
pub use criterion;

// Make sure env_logger is only initialized once
fn init_logger() {
    static INIT_LOGGER: Once = Once::new();
    INIT_LOGGER.call_once(env_logger::init);
}

/// Common criterion benchmark for all diffusion computations
/// Use via the criterion_benchmark macro
pub fn criterion_benchmark<Simulation: Simulate + SimulateCreate>(
    c: &mut Criterion,
    backend_name: &str,
    mut workload: impl FnMut(&Simulation, &mut Evolving, usize),
    workload_name: &str,
) {
    init_logger();

    let args = Simulation::CliArgs::from_arg_matches(
        &Simulation::CliArgs::augment_args(Command::default().no_binary_name(true))
            .get_matches_from(None::<&str>),
    )
    .expect("Failed to parse arguments from defaults & environment");

    let parameter_base = if workload_name.is_empty() {
        String::new()
    } else {
        format!("{workload_name},")
    };

    let params = Parameters::default();
    let sim = Simulation::new(black_box(params), black_box(args)).unwrap();
    let mut group = c.benchmark_group(backend_name.to_owned());
    for num_steps_pow2 in 0..=8 {
        let num_steps = 2u64.pow(num_steps_pow2);
        for size_pow2 in 6..=20 {
            let num_elems = 2u64.pow(size_pow2);
            let grid = Grid::new(num_elems as f64 * params.grid_spacing, params.grid_spacing)
                .expect("Failed to set up grid");
            let mut field = sim.make_field(black_box(&grid)).unwrap();

            group.throughput(Throughput::Elements(num_elems * num_steps));
            group.bench_function(
                BenchmarkId::from_parameter(format!(
                    "{parameter_base}{num_elems}elems,{num_steps}steps"
                )),
                |b| {
                    b.iter(|| workload(&sim, &mut field, num_steps as usize));
                },
            );
            black_box(field);
        }
    }
    group.finish();
}

// Workload for performing a few simulation steps
pub fn compute_workload<Simulation: Simulate>(
    sim: &Simulation,
    field: &mut Evolving,
    num_steps: usize,
) {
    sim.perform_steps(field, num_steps).unwrap();
}
