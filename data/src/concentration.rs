//! Concentration of the diffusing scalar

use crate::{grid::Grid, parameters::StepProfile, Error, Precision, Result};
use ndarray::{Array1, ArrayBase, ArrayView1, Data, Ix1};

/// Concentration at each point of the grid
pub type ConcentrationField = Array1<Precision>;

/// Build a step-like concentration field matching some reference positions
///
/// Positions at or below the split take the left value, positions above it
/// take the right value. The reference is only read.
///
/// Without an explicit split, the step sits in the middle of the domain that
/// the reference positions sample. Uniformly spaced positions `0, dx, ...`
/// cover `[first, last + dx)`, so this is `(first + last + dx) / 2`.
pub fn step_like<S>(reference: &ArrayBase<S, Ix1>, profile: StepProfile) -> ConcentrationField
where
    S: Data<Elem = Precision>,
{
    let split = profile
        .split
        .unwrap_or_else(|| domain_midpoint(reference.view()));
    reference.mapv(|position| {
        if position <= split {
            profile.left
        } else {
            profile.right
        }
    })
}

/// Middle of the domain sampled by uniformly spaced positions
fn domain_midpoint(positions: ArrayView1<'_, Precision>) -> Precision {
    match positions.len() {
        0 => 0.0,
        1 => positions[0],
        len => {
            let spacing = positions[1] - positions[0];
            (positions[0] + positions[len - 1] + spacing) / 2.0
        }
    }
}

/// Pair of concentration fields where one acts as an input and the other as an
/// output of the current time step
///
/// Both fields start out identical and steppers only ever write to the interior
/// of the output, so the boundary values of the two fields always agree. This
/// is what keeps the fixed-value boundaries fixed across [`flip()`](Self::flip).
#[derive(Clone, Debug, PartialEq)]
pub struct Evolving([ConcentrationField; 2]);
//
impl Evolving {
    /// Start evolving from some initial concentration
    pub fn new(initial: ConcentrationField) -> Self {
        Self([initial.clone(), initial])
    }

    /// Like `new()`, but check that the concentration matches a grid
    pub fn for_grid(grid: &Grid, initial: ConcentrationField) -> Result<Self> {
        if initial.len() != grid.len() {
            return Err(Error::LengthMismatch {
                expected: grid.len(),
                actual: initial.len(),
            });
        }
        Ok(Self::new(initial))
    }

    /// Access the input and output concentration
    pub fn in_out(&mut self) -> (&ConcentrationField, &mut ConcentrationField) {
        let [input, output] = &mut self.0;
        (input, output)
    }

    /// Latest concentration, as of the last `flip()`
    pub fn current(&self) -> ArrayView1<'_, Precision> {
        self.0[0].view()
    }

    /// Number of grid points
    pub fn len(&self) -> usize {
        self.0[0].len()
    }

    /// Truth that there is no grid point
    pub fn is_empty(&self) -> bool {
        self.0[0].is_empty()
    }

    /// Make the output concentration become the input one
    pub fn flip(&mut self) {
        let [input, output] = &mut self.0;
        std::mem::swap(input, output);
    }

    /// Extract the latest concentration
    pub fn into_current(self) -> ConcentrationField {
        let [input, _output] = self.0;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn step_like_length() {
        let z = step_like(&Array1::range(0.0, 100.0, 1.0), StepProfile::default());
        assert_eq!(z.len(), 100);
    }

    #[test]
    fn step_like_leaves_reference_alone() {
        let reference = Array1::range(0.0, 10.0, 0.5);
        let before = reference.clone();
        let _ = step_like(&reference.view(), StepProfile::default());
        assert_eq!(reference, before);
    }

    #[test]
    fn step_like_split() {
        let reference = array![0.0, 1.0, 2.0, 3.0, 4.0];
        let profile = StepProfile {
            left: 2.0,
            right: -1.0,
            split: Some(2.0),
        };
        assert_eq!(
            step_like(&reference, profile),
            array![2.0, 2.0, 2.0, -1.0, -1.0]
        );

        // Default split is the middle of the sampled domain [0, 4)
        let profile = StepProfile {
            split: None,
            ..profile
        };
        assert_eq!(
            step_like(&array![0.0, 1.0, 2.0, 3.0], profile),
            array![2.0, 2.0, 2.0, -1.0]
        );
        assert_eq!(step_like(&array![7.0], profile), array![2.0]);
        assert!(step_like(&Array1::<Precision>::zeros(0), profile).is_empty());
    }

    #[test]
    fn initial_model_profile() {
        let grid = Grid::new(300.0, 0.5).unwrap();
        let positions = grid.positions();
        let explicit = StepProfile {
            split: Some(grid.midpoint()),
            ..Default::default()
        };
        for profile in [explicit, StepProfile::default()] {
            let c = step_like(&positions, profile);
            let (left, right): (Vec<_>, Vec<_>) = positions
                .iter()
                .zip(&c)
                .partition(|&(&x, _)| x <= 150.0);
            assert_eq!(left.len(), 301);
            assert_eq!(right.len(), 299);
            assert!(left.iter().all(|&(_, &c)| c == 500.0));
            assert!(right.iter().all(|&(_, &c)| c == 0.0));
            assert_eq!(c[300], 500.0);
        }
    }

    #[test]
    fn length_mismatch() {
        let grid = Grid::new(10.0, 1.0).unwrap();
        assert_eq!(
            Evolving::for_grid(&grid, Array1::zeros(9)),
            Err(Error::LengthMismatch {
                expected: 10,
                actual: 9
            })
        );
        let field = Evolving::for_grid(&grid, Array1::ones(10)).unwrap();
        assert_eq!(field.len(), 10);
    }

    #[test]
    fn flip() {
        let mut field = Evolving::new(array![1.0, 2.0, 3.0]);
        {
            let (input, output) = field.in_out();
            assert_eq!(input, &*output);
            output[1] = 42.0;
        }
        assert_eq!(field.current(), array![1.0, 2.0, 3.0]);
        field.flip();
        assert_eq!(field.current(), array![1.0, 42.0, 3.0]);
        assert_eq!(field.into_current(), array![1.0, 42.0, 3.0]);
    }
}
