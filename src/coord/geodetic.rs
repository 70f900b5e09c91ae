// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Locating the array on the Earth and working out where the phase centre is
//! in its sky.

use hifitime::{Duration, Epoch};
use log::debug;
use marlu::{precession::precess_time, LatLngHeight, RADec, XyzGeocentric};

use super::CoordError;

/// Convert geocentric (Earth-centred, Earth-fixed) coordinates to geodetic
/// longitude, latitude and height on the WGS84 ellipsoid.
pub fn geocentric_to_geodetic(xyz: XyzGeocentric) -> LatLngHeight {
    xyz.to_earth_wgs84()
}

/// The mean of some geocentric positions, e.g. all of an array's tiles.
pub fn mean_geocentric(positions: &[XyzGeocentric]) -> Result<XyzGeocentric, CoordError> {
    if positions.is_empty() {
        return Err(CoordError::NoPositions);
    }
    let mut average_xyz = XyzGeocentric::default();
    for xyz in positions {
        average_xyz.x += xyz.x;
        average_xyz.y += xyz.y;
        average_xyz.z += xyz.z;
    }
    average_xyz.x /= positions.len() as f64;
    average_xyz.y /= positions.len() as f64;
    average_xyz.z /= positions.len() as f64;
    Ok(average_xyz)
}

/// Get the altitude and azimuth of `phase_centre` \[degrees\] as seen from
/// `location` at the UTC instant `time`. The (J2000) phase centre is compared
/// against the array's LMST and latitude precessed back to J2000. Azimuth is
/// measured from north through east.
pub fn resolve_alt_az(
    phase_centre: RADec,
    location: XyzGeocentric,
    time: Epoch,
    dut1: Duration,
) -> (f64, f64) {
    let earth_pos = geocentric_to_geodetic(location);
    debug!(
        "Array centroid: longitude {:.6}°, latitude {:.6}°, height {:.3}m",
        earth_pos.longitude_rad.to_degrees(),
        earth_pos.latitude_rad.to_degrees(),
        earth_pos.height_metres
    );

    let precession_info = precess_time(
        earth_pos.longitude_rad,
        earth_pos.latitude_rad,
        phase_centre,
        time,
        dut1,
    );
    debug!(
        "LMST {}°, J2000 LMST {}°, J2000 latitude {}°",
        precession_info.lmst.to_degrees(),
        precession_info.lmst_j2000.to_degrees(),
        precession_info.array_latitude_j2000.to_degrees()
    );
    let azel = phase_centre
        .to_hadec(precession_info.lmst_j2000)
        .to_azel(precession_info.array_latitude_j2000);
    (azel.el.to_degrees(), azel.az.to_degrees())
}
