//! Straightforward implementation of the explicit diffusion step
//!
//! Every interior point is updated with the forward-time centered-space (FTCS)
//! formula, reading neighbors from the input buffer and writing to the output
//! buffer, so that no update ever observes a value from the current step.

use compute::{
    cpu::{CpuGrid, SimulateCpu, STENCIL_OFFSET, STENCIL_SHAPE},
    NoArgs, SimulateBase, SimulateCreate,
};
use data::{
    concentration::{ConcentrationField, Evolving},
    grid::Grid,
    parameters::Parameters,
    Precision,
};
use log::debug;
use ndarray::{s, ArrayView1, ArrayViewMut1};

/// Explicit 1D diffusion simulation
#[derive(Debug)]
pub struct Simulation {
    /// Simulation parameters
    params: Parameters,

    /// FTCS coefficient `D * dt / dx²`
    coefficient: Precision,
}
//
impl SimulateBase for Simulation {
    type CliArgs = NoArgs;

    type Error = data::Error;

    fn make_field(&self, grid: &Grid) -> Result<Evolving, data::Error> {
        compute::make_step_field(&self.params, grid)
    }
}
//
impl SimulateCreate for Simulation {
    fn new(params: Parameters, _args: NoArgs) -> Result<Self, data::Error> {
        params.validate()?;
        let coefficient = params.diffusion_number();
        debug!("Set up sequential diffusion with FTCS coefficient {coefficient}");
        Ok(Self {
            params,
            coefficient,
        })
    }
}
//
impl SimulateCpu for Simulation {
    fn unchecked_step_impl(&self, (input, output_center): CpuGrid<'_, '_>) {
        step_interior(input, output_center, self.coefficient);
    }
}

/// Advance a concentration field by one explicit time step, in place
///
/// The first and last values are left untouched, and fields with fewer than 3
/// points are not modified at all. Stability requires
/// `diffusivity * time_step / grid_spacing²` to be at most 0.5, which is not
/// checked here.
pub fn diffusion_step(
    field: &mut ConcentrationField,
    diffusivity: Precision,
    time_step: Precision,
    grid_spacing: Precision,
) {
    let len = field.len();
    if len < STENCIL_SHAPE {
        return;
    }
    let coefficient = diffusivity * time_step / grid_spacing.powi(2);
    let old = field.clone();
    step_interior(
        old.view(),
        field.slice_mut(s![STENCIL_OFFSET..len - STENCIL_OFFSET]),
        coefficient,
    );
}

/// Compute new interior values from old values with the FTCS stencil
///
/// `input` must have `2 * STENCIL_OFFSET` more points than `output_center`,
/// and must not alias it.
#[inline]
fn step_interior(
    input: ArrayView1<'_, Precision>,
    mut output_center: ArrayViewMut1<'_, Precision>,
    coefficient: Precision,
) {
    ndarray::azip!((out in &mut output_center, win in input.windows(STENCIL_SHAPE)) {
        let (left, center, right) = (win[0], win[1], win[2]);
        *out = center + coefficient * (left - 2.0 * center + right);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use compute::Simulate;
    use data::parameters::StepProfile;
    use ndarray::{array, Array1};
    use std::sync::Once;

    fn init_logger() {
        static INIT_LOGGER: Once = Once::new();
        INIT_LOGGER.call_once(|| env_logger::init());
    }

    fn simulation(diffusivity: Precision, time_step: Precision, grid_spacing: Precision) -> Simulation {
        init_logger();
        Simulation::new(
            Parameters {
                diffusivity,
                time_step,
                grid_spacing,
                ..Default::default()
            },
            NoArgs::default(),
        )
        .unwrap()
    }

    /// Reference FTCS step, computed from a copy of the old values
    fn reference_step(old: &ConcentrationField, coefficient: Precision) -> ConcentrationField {
        let mut new = old.clone();
        for i in 1..old.len().saturating_sub(1) {
            new[i] = old[i] + coefficient * (old[i - 1] - 2.0 * old[i] + old[i + 1]);
        }
        new
    }

    #[test]
    fn uses_pre_step_values() {
        let sim = simulation(1.0, 0.5, 1.0);
        let mut field = Evolving::new(array![0.0, 0.0, 1.0, 0.0, 0.0]);
        sim.perform_steps(&mut field, 1).unwrap();

        // A left-to-right in-place sweep would have produced 0.25 at the center
        assert_eq!(field.current(), array![0.0, 0.5, 0.0, 0.5, 0.0]);
    }

    #[test]
    fn matches_formula() {
        let sim = simulation(2.0, 0.1, 0.9);
        let coefficient = 2.0 * 0.1 / 0.9f64.powi(2);
        let initial = array![3.0, -1.5, 8.25, 0.0, 4.0, 4.0, -2.0, 7.5];
        let mut field = Evolving::new(initial.clone());
        sim.perform_steps(&mut field, 1).unwrap();
        let expected = reference_step(&initial, coefficient);
        assert_eq!(field.current(), expected);
        assert_eq!(field.current()[0], initial[0]);
        assert_eq!(field.current()[initial.len() - 1], initial[initial.len() - 1]);

        let mut in_place = initial.clone();
        diffusion_step(&mut in_place, 2.0, 0.1, 0.9);
        assert_eq!(in_place, expected);
    }

    #[test]
    fn runs_exact_step_count() {
        let sim = simulation(1.0, 0.3, 1.0);
        let initial = Array1::range(0.0, 20.0, 1.0).mapv(|x: Precision| (x * 0.7).sin());
        let mut field = Evolving::new(initial.clone());
        sim.perform_steps(&mut field, 17).unwrap();

        let mut expected = initial;
        for _ in 0..17 {
            diffusion_step(&mut expected, 1.0, 0.3, 1.0);
        }
        assert_eq!(field.into_current(), expected);
    }

    #[test]
    fn short_fields_are_left_alone() {
        let sim = simulation(1.0, 0.5, 1.0);
        for initial in [array![], array![4.0], array![4.0, -3.0]] {
            let mut field = Evolving::new(initial.clone());
            sim.perform_steps(&mut field, 3).unwrap();
            assert_eq!(field.current(), initial);

            let mut in_place = initial.clone();
            diffusion_step(&mut in_place, 1.0, 0.5, 1.0);
            assert_eq!(in_place, initial);
        }
    }

    #[test]
    fn zero_diffusivity() {
        let sim = simulation(0.0, 0.5, 1.0);
        let initial = array![1.0, 5.0, -2.0, 3.0, 3.0, 0.5];
        let mut field = Evolving::new(initial.clone());
        sim.perform_steps(&mut field, 100).unwrap();
        assert_eq!(field.current(), initial);
    }

    #[test]
    fn bad_parameters() {
        let result = Simulation::new(
            Parameters {
                grid_spacing: 0.0,
                ..Default::default()
            },
            NoArgs::default(),
        );
        assert!(matches!(result, Err(data::Error::InvalidParameter { .. })));
    }

    #[test]
    fn smooths_step_profile() {
        init_logger();
        let params = Parameters::default();
        let grid = Grid::new(params.domain_length, params.grid_spacing).unwrap();
        assert_eq!(grid.len(), 600);
        let sim = Simulation::new(params, NoArgs::default()).unwrap();
        let mut field = sim.make_field(&grid).unwrap();
        let initial = field.current().to_owned();
        assert_eq!(
            initial,
            data::concentration::step_like(
                &grid.positions(),
                StepProfile {
                    split: Some(150.0),
                    ..Default::default()
                }
            )
        );

        // Maximum principle and monotonicity hold at every step
        let tolerance = 1e-9;
        for _ in 0..5000 {
            sim.perform_steps(&mut field, 1).unwrap();
            let current = field.current();
            assert!(current
                .iter()
                .all(|&c| (-tolerance..=500.0 + tolerance).contains(&c)));
            assert!(current
                .windows(2)
                .into_iter()
                .all(|pair| pair[0] + tolerance >= pair[1]));
        }

        // Boundaries are fixed, and the step has been smoothed out
        let last = field.current();
        assert_eq!(last[0], 500.0);
        assert_eq!(last[last.len() - 1], 0.0);
        let split = grid.positions().iter().position(|&x| x > 150.0).unwrap();
        assert!(last[split - 1] < 500.0);
        assert!(last[split] > 0.0);
    }
}
