// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all near-field-related errors. This should be the *only*
//! error enum that is publicly visible.

use thiserror::Error;

use super::near_field::NearFieldArgsError;
use crate::{
    coord::CoordError,
    io::{TileLayoutError, VisTableError},
    params::NearFieldParamsError,
    time::TimeError,
};

/// The *only* publicly visible error from this crate.
#[derive(Error, Debug)]
pub enum NearFieldError {
    /// A required argument is missing or an argument has an invalid value.
    #[error("{0}\n\nSee --help for the available arguments.")]
    Args(String),

    /// An error related to argument files.
    #[error("{0}")]
    ArgFile(String),

    /// An error related to the requested observation time.
    #[error("{0}")]
    Time(String),

    /// An error relating the visibility table's antennas to the tile layout.
    #[error("{0}\n\nThe measurement set's ANTENNA table and the metafits file must describe the same tiles.")]
    Antenna(String),

    /// An error related to reading visibilities.
    #[error("{0}")]
    VisRead(String),

    /// An error related to writing visibilities. The correction is applied
    /// in memory before anything is written, but a failure here may leave a
    /// table partially written.
    #[error("{0}\n\nThe measurement set may have been partially written; the far-field UVWs are kept in the UVW_FARFIELD column.")]
    VisWrite(String),

    /// An error related to metafits files.
    #[error("{0}")]
    Metafits(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

impl From<NearFieldArgsError> for NearFieldError {
    fn from(e: NearFieldArgsError) -> Self {
        match e {
            NearFieldArgsError::NoMs
            | NearFieldArgsError::NoTime
            | NearFieldArgsError::NoDistance
            | NearFieldArgsError::NoMetafits
            | NearFieldArgsError::InvalidFocalDistance(_)
            | NearFieldArgsError::InvalidTimeTolerance(_)
            | NearFieldArgsError::InvalidDut1(_) => Self::Args(e.to_string()),
            NearFieldArgsError::Time(e) => Self::from(e),
            NearFieldArgsError::VisTable(e) => Self::from(e),
            NearFieldArgsError::TileLayout(e) => Self::from(e),
        }
    }
}

impl From<NearFieldParamsError> for NearFieldError {
    fn from(e: NearFieldParamsError) -> Self {
        match e {
            NearFieldParamsError::ChannelMismatch { .. } => Self::VisRead(e.to_string()),
            NearFieldParamsError::VisTable(e) => Self::from(e),
            NearFieldParamsError::TileLayout(e) => Self::from(e),
            NearFieldParamsError::Coord(e) => Self::from(e),
        }
    }
}

impl From<TimeError> for NearFieldError {
    fn from(e: TimeError) -> Self {
        Self::Time(e.to_string())
    }
}

impl From<CoordError> for NearFieldError {
    fn from(e: CoordError) -> Self {
        let s = e.to_string();
        match e {
            CoordError::AntennaNotFound { .. } | CoordError::BadAntennaNumber { .. } => {
                Self::Antenna(s)
            }
            CoordError::NoAntennas => Self::Metafits(s),
            CoordError::NoPositions => Self::VisRead(s),
        }
    }
}

impl From<VisTableError> for NearFieldError {
    fn from(e: VisTableError) -> Self {
        let s = e.to_string();
        match e {
            VisTableError::Write { .. } => Self::VisWrite(s),
            VisTableError::BadFile(_)
            | VisTableError::MainTableEmpty
            | VisTableError::SubtableEmpty { .. }
            | VisTableError::NoDataCol { .. }
            | VisTableError::MismatchNumNamesNumPositions { .. }
            | VisTableError::BadCellShape { .. }
            | VisTableError::Read { .. }
            | VisTableError::Open { .. } => Self::VisRead(s),
        }
    }
}

impl From<TileLayoutError> for NearFieldError {
    fn from(e: TileLayoutError) -> Self {
        Self::Metafits(e.to_string())
    }
}

impl From<std::io::Error> for NearFieldError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
