// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Interfaces to the files that supply (and receive) data: the visibility
//! table and the tile-layout metadata.
//!
//! The correction code only ever talks to the [`VisTable`] and [`TileLayout`]
//! traits, so that it can be exercised without any files on disk.

mod error;
mod metafits;
mod ms;

pub use error::{TileLayoutError, VisTableError};
pub use metafits::MetafitsLayout;
pub use ms::MsTable;

use marlu::{c32, RADec, XyzGeocentric};
use ndarray::prelude::*;
use vec1::Vec1;

use crate::{constants::VEL_C, coord::TileOffsets};

/// Metadata describing the array and spectral setup of a visibility table.
#[derive(Debug, Clone)]
pub struct ArrayMetadata {
    /// The names of the antennas, indexed by antenna number.
    pub tile_names: Vec1<String>,

    /// The geocentric positions of the antennas, indexed by antenna number.
    pub tile_positions: Vec1<XyzGeocentric>,

    /// The centre frequency of each channel \[Hz\].
    pub freqs_hz: Vec1<f64>,

    /// The phase centre the visibilities were phased to.
    pub phase_centre: RADec,
}

impl ArrayMetadata {
    /// The wavelength of each channel \[metres\].
    pub fn wavelengths(&self) -> Vec<f64> {
        self.freqs_hz.iter().map(|f| VEL_C / f).collect()
    }
}

/// Visibilities and their per-row metadata. Each row is one baseline at one
/// time.
#[derive(Debug, Clone, PartialEq)]
pub struct VisData {
    /// casacore times (MJD seconds, UTC) of each row.
    pub times: Vec<f64>,

    pub antenna1: Vec<i32>,

    pub antenna2: Vec<i32>,

    /// UVWs \[metres\]. The first dimension is row, the second is u, v, w.
    pub uvws: Array2<f64>,

    /// Visibilities. The dimensions are row, channel, polarisation.
    pub data: Array3<c32>,
}

impl VisData {
    pub fn num_rows(&self) -> usize {
        self.times.len()
    }
}

/// A table of visibilities, e.g. a measurement set.
pub trait VisTable {
    /// Read the antenna names and positions, channel frequencies and phase
    /// centre.
    fn read_metadata(&mut self) -> Result<ArrayMetadata, VisTableError>;

    /// Read every row of the table. The UVWs should be the original far-field
    /// UVWs if the table has them.
    fn read_vis(&mut self) -> Result<VisData, VisTableError>;

    /// Persist the results of a correction: all visibilities in `vis` go to
    /// the output data column, the far-field UVWs are stored (only if they
    /// haven't been stored before), and the UVWs of `corrected_rows` are
    /// updated.
    fn write_corrected(
        &mut self,
        vis: &VisData,
        far_field_uvws: ArrayView2<f64>,
        corrected_rows: &[usize],
    ) -> Result<(), VisTableError>;
}

/// A source of each tile's physical layout, e.g. a metafits file.
pub trait TileLayout {
    fn read_tile_offsets(&self) -> Result<Vec<TileOffsets>, TileLayoutError>;
}
