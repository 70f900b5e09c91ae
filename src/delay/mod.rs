// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The near-field delay model.
//!
//! For a source at infinite distance, the w term of a baseline is the
//! projection of the baseline onto the line of sight. For a source at a finite
//! distance, the relevant quantity is instead the difference between the
//! distances from each tile to the source.


use marlu::c64;

use crate::{constants::TAU, coord::LocalXyz};

/// Get the near-field phase correction for the baseline `tile1`-`tile2` toward
/// `focal`, given the baseline's existing (far-field) w term. All positions
/// are in the local frame; all units are metres.
///
/// Returns `(phi, new_w)`: `new_w` is the near-field w term (the range
/// difference to the focal point), and `phi` is the difference between the
/// near-field and existing w terms.
pub fn near_field_correction(
    tile1: LocalXyz,
    tile2: LocalXyz,
    focal: LocalXyz,
    existing_w: f64,
) -> (f64, f64) {
    let r1 = (tile1 - focal).norm();
    let r2 = (tile2 - focal).norm();
    let new_w = r2 - r1;
    (new_w - existing_w, new_w)
}

/// The unit-modulus factor that rotates a visibility by the path difference
/// `phi` at `wavelength` (both in metres), i.e. exp(-2πi phi / wavelength).
#[inline]
pub fn phase_factor(phi: f64, wavelength: f64) -> c64 {
    let (im, re) = (-TAU * phi / wavelength).sin_cos();
    c64::new(re, im)
}
