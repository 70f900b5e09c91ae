// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision. Geometry is always computed in
double precision and only converted to single precision when applied to
visibilities.
 */

pub(crate) use std::f64::consts::{PI, TAU};

pub(crate) use marlu::constants::VEL_C;

/// The number of seconds between the MJD epoch (1858-11-17) and the Unix epoch
/// (1970-01-01). casacore stores times as MJD seconds.
pub(crate) const MJD_TO_UNIX_SECONDS: f64 = 40587.0 * 86400.0;

/// The default column of the main table to read visibilities from.
pub(crate) const DEFAULT_DATA_COLUMN: &str = "DATA";

/// The default column of the main table to write corrected visibilities to.
pub(crate) const DEFAULT_OUTPUT_DATA_COLUMN: &str = "CORRECTED_DATA";

/// The main-table column holding the untouched far-field UVWs.
pub(crate) const FAR_FIELD_UVW_COLUMN: &str = "UVW_FARFIELD";

/// The standard main-table UVW column.
pub(crate) const UVW_COLUMN: &str = "UVW";
