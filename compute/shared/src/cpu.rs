//! Facilities that are specific to CPU implementations

use crate::{Simulate, SimulateBase};
use data::{concentration::Evolving, Precision};
use ndarray::{s, ArrayView1, ArrayViewMut1, Axis};

/// Number of points in the FTCS stencil
pub const STENCIL_SHAPE: usize = 3;

/// Offset from the start of the stencil to its center
pub const STENCIL_OFFSET: usize = STENCIL_SHAPE / 2;

/// Simplified version of Simulate that simulates a single time step at a time
///
/// If you implement this, then a [`Simulate`] implementation that loops while
/// flipping the concentration buffers will be automatically provided.
pub trait SimulateStep: SimulateBase {
    /// Perform a single simulation time step
    ///
    /// At the end of the step, the output concentration of `field` will contain
    /// the new values. It is the job of the caller to flip the buffers if they
    /// want the result to be their input.
    fn perform_step(&self, field: &mut Evolving) -> Result<(), Self::Error>;
}
//
impl<T: SimulateStep> Simulate for T {
    fn perform_steps(&self, field: &mut Evolving, steps: usize) -> Result<(), Self::Error> {
        for _ in 0..steps {
            self.perform_step(field)?;
            field.flip();
        }
        Ok(())
    }
}

/// Lower-level grid-based interface to a CPU compute backend
///
/// This is used by the parallel backend to slice the interior sweep into
/// smaller sub-sweeps that can be processed independently.
///
/// If you implement this, then `Simulate` will be implemented automatically
pub trait SimulateCpu: SimulateBase {
    /// Perform one simulation time step on the full grid or a subset thereof
    ///
    /// This method does not check the grid for consistency, but is used to
    /// implement `step_impl` that does perform some sanity checks.
    fn unchecked_step_impl(&self, grid: CpuGrid<'_, '_>);

    /// Check that the CpuGrid seems correct
    ///
    /// Full correctness checking would involve making sure that the input and
    /// output views point to the same region of the field, which cannot be
    /// done. Therefore, this is only a partial sanity check.
    fn check_grid((input, output_center): &CpuGrid<'_, '_>) {
        debug_assert_eq!(input.len(), output_center.len() + 2 * STENCIL_OFFSET);
    }

    /// Like `unchecked_step_impl()`, but with some sanity checks
    #[inline]
    fn step_impl(&self, grid: CpuGrid<'_, '_>) {
        Self::check_grid(&grid);
        self.unchecked_step_impl(grid);
    }

    /// Count the total number of values which `step_impl()` would manipulate
    #[inline]
    fn grid_len(grid: &CpuGrid<'_, '_>) -> usize {
        Self::check_grid(grid);
        let (input, output_center) = grid;
        input.len() + output_center.len()
    }

    /// Split the grid on which `step_impl()` operates into two parts
    #[inline]
    fn split_grid<'input, 'output>(
        grid: CpuGrid<'input, 'output>,
    ) -> [CpuGrid<'input, 'output>; 2] {
        Self::check_grid(&grid);
        split_grid(grid)
    }
}
//
/// Low-level representation of the simulation grid used by SimulateCpu
///
/// Composed of the input and output concentrations. The input includes a
/// neighborhood of [`STENCIL_OFFSET`] points on each side of the output
/// region, which does not include the fixed boundaries.
pub type CpuGrid<'input, 'output> = (
    ArrayView1<'input, Precision>,
    ArrayViewMut1<'output, Precision>,
);
//
impl<T: SimulateCpu> SimulateStep for T {
    fn perform_step(&self, field: &mut Evolving) -> Result<(), Self::Error> {
        // Fields without interior points have nothing to update
        if field.len() < STENCIL_SHAPE {
            return Ok(());
        }
        self.step_impl(extract_grid(field));
        Ok(())
    }
}

/// Extract a view of the full grid from the concentration buffers
///
/// The field must have at least [`STENCIL_SHAPE`] points.
pub fn extract_grid(field: &mut Evolving) -> CpuGrid<'_, '_> {
    let (input, output) = field.in_out();
    let len = output.len();
    (
        input.view(),
        output.slice_mut(s![STENCIL_OFFSET..len - STENCIL_OFFSET]),
    )
}

/// Split a grid into two halves of its output region, each half keeping the
/// input neighborhood that it needs
pub fn split_grid<'input, 'output>(
    (input, output_center): CpuGrid<'input, 'output>,
) -> [CpuGrid<'input, 'output>; 2] {
    // Splitting the output slice is easy
    let out_split_point = output_center.len() / 2;
    let (out_1, out_2) = output_center.split_at(Axis(0), out_split_point);

    // On the input side, we must mind the edge elements
    let in_split_point = out_split_point + STENCIL_OFFSET;
    //
    let in_end_1 = in_split_point + STENCIL_OFFSET;
    let in_1 = input.split_at(Axis(0), in_end_1).0;
    //
    let in_start_2 = in_split_point - STENCIL_OFFSET;
    let in_2 = input.split_at(Axis(0), in_start_2).1;
    //
    [(in_1, out_1), (in_2, out_2)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    #[test]
    fn full_grid() {
        let mut field = Evolving::new(array![0.0, 1.0, 2.0, 3.0, 4.0]);
        let (input, output) = extract_grid(&mut field);
        assert_eq!(input, array![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(output, array![1.0, 2.0, 3.0]);
    }

    #[test]
    fn minimal_grid() {
        let mut field = Evolving::new(array![0.0, 1.0, 2.0]);
        let (input, output) = extract_grid(&mut field);
        assert_eq!(input.len(), 3);
        assert_eq!(output, array![1.0]);
    }

    #[test]
    fn split_halves() {
        let mut field = Evolving::new(Array1::range(0.0, 10.0, 1.0));
        let [(in_1, out_1), (in_2, out_2)] = split_grid(extract_grid(&mut field));

        // Each half must see the input values around its own output region
        assert_eq!(out_1, array![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(in_1, array![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(out_2, array![5.0, 6.0, 7.0, 8.0]);
        assert_eq!(in_2, array![4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn split_short() {
        let mut field = Evolving::new(Array1::range(0.0, 6.0, 1.0));
        let [(in_1, out_1), (in_2, out_2)] = split_grid(extract_grid(&mut field));
        assert_eq!(out_1, array![1.0, 2.0]);
        assert_eq!(in_1, array![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(out_2, array![3.0, 4.0]);
        assert_eq!(in_2, array![2.0, 3.0, 4.0, 5.0]);
    }
}
