// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Near-field phase correction of visibilities for the Murchison Widefield
//! Array (MWA) radio telescope.
//!
//! Visibilities that have been calibrated (and phased) for a source at
//! infinite distance are rotated so that they are instead phased toward a
//! focal point at a finite distance from the array, e.g. a satellite in low
//! Earth orbit.

mod cli;
mod constants;
mod context;
mod coord;
mod delay;
mod io;
mod params;
mod time;
mod vis;

#[cfg(test)]
mod tests;

use crossbeam_utils::atomic::AtomicCell;

// Re-exports.
pub use cli::{NearField, NearFieldError};
pub use context::NearFieldContext;
pub use coord::{
    geocentric_to_geodetic, resolve_alt_az, AntennaFrame, CoordError, LocalXyz, TileOffsets,
};
pub use delay::{near_field_correction, phase_factor};
pub use io::{
    ArrayMetadata, MetafitsLayout, MsTable, TileLayout, TileLayoutError, VisData, VisTable,
    VisTableError,
};
pub use time::{parse_requested_time, RequestedTime, TimeError, TimeMatch};
pub use vis::{correct_rows, select_rows};

/// Should progress bars be drawn? This is set by the CLI.
pub(crate) static PROGRESS_BARS: AtomicCell<bool> = AtomicCell::new(false);
