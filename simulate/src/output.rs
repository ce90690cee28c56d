//! Recording of concentration profiles

use data::{grid::Grid, Precision};
use eyre::Result;
use ndarray::ArrayView1;
use std::path::Path;

/// Destination of the concentration profiles produced by the simulation
#[cfg(feature = "hdf5")]
pub struct Recorder(data::hdf5::Writer);
//
#[cfg(feature = "hdf5")]
impl Recorder {
    /// Prepare to record `num_profiles` profiles at a certain location
    pub fn create(path: &Path, grid: &Grid, num_profiles: usize) -> Result<Self> {
        let writer = data::hdf5::Writer::create(
            data::hdf5::Config {
                file_name: path,
                dataset_name: None,
            },
            grid,
            num_profiles,
        )?;
        Ok(Self(writer))
    }

    /// Record a new concentration profile
    pub fn record(&mut self, profile: ArrayView1<'_, Precision>) -> Result<()> {
        self.0.write(profile)?;
        Ok(())
    }

    /// Make sure that all profiles have been written down
    pub fn close(self) -> Result<()> {
        self.0.close()?;
        Ok(())
    }
}

/// Destination of the concentration profiles produced by the simulation
///
/// Profiles are written as a whitespace-separated table, with one row per grid
/// point and one column per profile after the grid position.
#[cfg(not(feature = "hdf5"))]
pub struct Recorder {
    /// Output file
    file: std::io::BufWriter<std::fs::File>,

    /// Grid positions
    positions: data::concentration::ConcentrationField,

    /// Profiles recorded so far
    profiles: Vec<data::concentration::ConcentrationField>,
}
//
#[cfg(not(feature = "hdf5"))]
impl Recorder {
    /// Prepare to record `num_profiles` profiles at a certain location
    pub fn create(path: &Path, grid: &Grid, num_profiles: usize) -> Result<Self> {
        Ok(Self {
            file: std::io::BufWriter::new(std::fs::File::create(path)?),
            positions: grid.positions().to_owned(),
            profiles: Vec::with_capacity(num_profiles),
        })
    }

    /// Record a new concentration profile
    pub fn record(&mut self, profile: ArrayView1<'_, Precision>) -> Result<()> {
        eyre::ensure!(
            profile.len() == self.positions.len(),
            "Profile has {} values but the grid has {} points",
            profile.len(),
            self.positions.len()
        );
        self.profiles.push(profile.to_owned());
        Ok(())
    }

    /// Write down the table
    pub fn close(mut self) -> Result<()> {
        use std::io::Write;
        write!(self.file, "# x")?;
        for idx in 0..self.profiles.len() {
            write!(self.file, " C_{idx}")?;
        }
        writeln!(self.file)?;
        for (point, x) in self.positions.iter().enumerate() {
            write!(self.file, "{x}")?;
            for profile in &self.profiles {
                write!(self.file, " {}", profile[point])?;
            }
            writeln!(self.file)?;
        }
        self.file.flush()?;
        Ok(())
    }
}
