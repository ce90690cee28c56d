//! Pick the best compute backend allowed by enabled crate features, expose it
//! as a Simulation typedef.

cfg_if::cfg_if! {
    if #[cfg(feature = "compute_parallel")] {
        pub type Simulation = compute_parallel::Simulation;
    } else if #[cfg(any(feature = "compute_naive", test))] {
        pub type Simulation = compute_naive::Simulation;
    } else {
        // If no backend was specified, use a backend skeleton that throws a
        // minimal number of compiler errors.
        use compute::{NoArgs, SimulateBase, SimulateCreate, Simulate};
        use data::{concentration::Evolving, grid::Grid, parameters::Parameters};
        //
        pub struct Simulation;
        //
        impl SimulateBase for Simulation {
            type CliArgs = NoArgs;

            type Error = data::Error;

            fn make_field(&self, grid: &Grid) -> Result<Evolving, data::Error> {
                compute::make_step_field(&Parameters::default(), grid)
            }
        }
        //
        impl SimulateCreate for Simulation {
            fn new(_params: Parameters, _args: NoArgs) -> Result<Self, data::Error> {
                std::compile_error!("Please enable at least one compute backend via crate features")
            }
        }
        //
        impl Simulate for Simulation {
            fn perform_steps(
                &self,
                _field: &mut Evolving,
                _steps: usize
            ) -> Result<(), data::Error> {
                Ok(())
            }
        }
    }
}
