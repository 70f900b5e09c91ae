// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Coordinate handling: the Earth-fixed location of the array, the direction
//! of the phase centre as seen from it, and the local frame in which tiles and
//! the focal point are placed.

mod focal;
mod frame;
mod geodetic;

pub use focal::focal_point;
pub use frame::{AntennaFrame, LocalXyz, TileOffsets};
pub use geodetic::{geocentric_to_geodetic, mean_geocentric, resolve_alt_az};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoordError {
    #[error("Antenna '{name}' was not found in the tile layout metadata")]
    AntennaNotFound { name: String },

    #[error("The tile layout metadata contains no antennas")]
    NoAntennas,

    #[error("No antenna positions were available to locate the array")]
    NoPositions,

    #[error("Antenna number {antenna} is invalid; there are only {num_antennas} antennas")]
    BadAntennaNumber { antenna: i32, num_antennas: usize },
}
