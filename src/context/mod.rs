// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
The state shared by every row's correction.

Everything here is computed once, before any visibilities are touched, and is
not modified afterwards; it is safe to share between threads.
 */

#[cfg(test)]
mod tests;

use hifitime::Duration;
use log::{debug, info};
use marlu::RADec;

use crate::{
    coord::{focal_point, mean_geocentric, resolve_alt_az, AntennaFrame, CoordError, LocalXyz},
    io::ArrayMetadata,
    time::RequestedTime,
    TileOffsets,
};

/// Precomputed geometry for a near-field correction.
#[derive(Debug, Clone)]
pub struct NearFieldContext {
    /// Every tile in the layout metadata, in the local frame.
    pub(crate) frame: AntennaFrame,

    /// The names of the visibility table's antennas, indexed by antenna
    /// number.
    pub(crate) tile_names: Vec<String>,

    /// The focal point in the local frame \[metres\].
    pub(crate) focal: LocalXyz,

    /// The wavelength of each channel \[metres\].
    pub(crate) wavelengths: Vec<f64>,

    pub(crate) phase_centre: RADec,

    /// The altitude and azimuth of the phase centre from the array centroid at
    /// the requested time \[degrees\].
    pub(crate) alt_az: (f64, f64),

    /// \[kilometres\]
    pub(crate) distance_km: f64,
}

impl NearFieldContext {
    /// Build the context. The direction of the phase centre is resolved once,
    /// from the mean position of all of the visibility table's antennas at the
    /// requested time, and the focal point is placed `distance_km` along it.
    pub fn new(
        metadata: &ArrayMetadata,
        offsets: &[TileOffsets],
        time: &RequestedTime,
        distance_km: f64,
        dut1: Duration,
    ) -> Result<NearFieldContext, CoordError> {
        let frame = AntennaFrame::new(offsets)?;
        debug!("Built the local frame from {} tiles", frame.len());

        let centroid = mean_geocentric(&metadata.tile_positions)?;
        let (alt, az) = resolve_alt_az(metadata.phase_centre, centroid, time.to_epoch(), dut1);
        info!("Phase centre at {time}: altitude {alt:.4}°, azimuth {az:.4}°");
        let focal = focal_point(distance_km, alt, az);
        debug!(
            "Focal point: ({:.3}, {:.3}, {:.3}) m",
            focal.x, focal.y, focal.z
        );

        Ok(NearFieldContext {
            frame,
            tile_names: metadata.tile_names.to_vec(),
            focal,
            wavelengths: metadata.wavelengths(),
            phase_centre: metadata.phase_centre,
            alt_az: (alt, az),
            distance_km,
        })
    }

    /// Get the local position of the visibility table's antenna number
    /// `antenna`.
    pub fn position(&self, antenna: i32) -> Result<LocalXyz, CoordError> {
        let name = usize::try_from(antenna)
            .ok()
            .and_then(|i| self.tile_names.get(i))
            .ok_or(CoordError::BadAntennaNumber {
                antenna,
                num_antennas: self.tile_names.len(),
            })?;
        self.frame.get(name)
    }

    pub fn focal(&self) -> LocalXyz {
        self.focal
    }

    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    pub fn phase_centre(&self) -> RADec {
        self.phase_centre
    }

    /// \[degrees\]
    pub fn alt_az(&self) -> (f64, f64) {
        self.alt_az
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }
}
