//! Moving concentration profiles to and from HDF5 files

use crate::{concentration::ConcentrationField, grid::Grid, Precision};
use hdf5::{Dataset, File};
use ndarray::{Array1, ArrayView1};
use std::path::Path;

pub use hdf5::Result;

/// Name of the dataset holding the grid positions
const POSITIONS_DATASET: &str = "x";

/// Common configuration for reading and writing to HDF5 files
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Config<'dsname, FileName: AsRef<Path>> {
    /// Name of the HDF5 file to be accessed
    pub file_name: FileName,

    /// Name of the concentration dataset within the file
    pub dataset_name: Option<&'dsname str>,
}
//
impl<'dsname, FileName: AsRef<Path>> Config<'dsname, FileName> {
    fn dataset_name(&self) -> &'dsname str {
        self.dataset_name.unwrap_or("concentration")
    }
}

/// Mechanism to write concentration profiles into an HDF5 file
pub struct Writer(State);
//
impl Writer {
    /// Create or truncate a file
    ///
    /// The grid positions are stored right away, and the file is dimensioned
    /// to store a certain amount of concentration profiles.
    pub fn create(
        config: Config<'_, impl AsRef<Path>>,
        grid: &Grid,
        num_profiles: usize,
    ) -> Result<Self> {
        let dataset_name = config.dataset_name();
        let file = File::create(config.file_name)?;
        file.new_dataset_builder()
            .with_data(grid.positions())
            .create(POSITIONS_DATASET)?;
        let mut builder = file.new_dataset::<Precision>();
        if !grid.is_empty() {
            // One chunk per profile, HDF5 rejects chunks larger than the data
            builder = builder.chunk([1, grid.len()]);
        }
        let dataset = builder
            .shape([num_profiles, grid.len()])
            .create(dataset_name)?;
        Ok(Self(State {
            file,
            dataset,
            position: 0,
        }))
    }

    /// Write a new concentration profile to the file
    pub fn write(&mut self, profile: ArrayView1<'_, Precision>) -> Result<()> {
        self.0.dataset.write_slice(profile, (self.0.position, ..))?;
        self.0.position += 1;
        Ok(())
    }

    /// Flush the file to the underlying storage medium and close it
    ///
    /// This should automatically happen on Drop, but doing it manually allows
    /// you to catch and handle errors, instead of letting them lead to panics.
    pub fn close(self) -> Result<()> {
        self.0.file.close()
    }
}

/// Mechanism to read concentration profiles back from an HDF5 file
pub struct Reader {
    /// Common HDF5 I/O state
    state: State,

    /// Number of concentration profiles to be read
    num_profiles: usize,
}
//
impl Reader {
    /// Open an existing file
    pub fn open(config: Config<'_, impl AsRef<Path>>) -> Result<Self> {
        let dataset_name = config.dataset_name();
        let file = File::open(config.file_name)?;
        let dataset = file.dataset(dataset_name)?;
        let num_profiles = dataset.shape().first().copied().unwrap_or(0);
        Ok(Self {
            state: State {
                file,
                dataset,
                position: 0,
            },
            num_profiles,
        })
    }

    /// Grid positions associated with the concentration profiles
    pub fn positions(&self) -> Result<Array1<Precision>> {
        self.state.file.dataset(POSITIONS_DATASET)?.read_1d()
    }

    /// Number of profiles to be read out
    pub fn num_profiles(&self) -> usize {
        self.num_profiles
    }

    /// Read the next concentration profile, if any
    ///
    /// You can equivalently treat this reader as an iterator of profiles.
    pub fn read(&mut self) -> Option<Result<ConcentrationField>> {
        (self.state.position < self.num_profiles).then(|| {
            let result = self
                .state
                .dataset
                .read_slice_1d((self.state.position, ..))?;
            self.state.position += 1;
            Ok(result)
        })
    }
}
//
impl Iterator for Reader {
    type Item = Result<ConcentrationField>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read()
    }
}

/// HDF5 file and dataset handle
struct State {
    /// File handle
    file: File,

    /// Concentration dataset
    dataset: Dataset,

    /// Number of profiles that were read or written so far
    position: usize,
}
