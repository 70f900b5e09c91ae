// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::LocalXyz;

/// Place the focal point `distance_km` kilometres from the array centroid in
/// the direction (`alt_deg`, `az_deg`), in the same local frame as the tiles.
pub fn focal_point(distance_km: f64, alt_deg: f64, az_deg: f64) -> LocalXyz {
    let d = distance_km * 1000.0;
    let (s_alt, c_alt) = alt_deg.to_radians().sin_cos();
    let (s_az, c_az) = az_deg.to_radians().sin_cos();
    LocalXyz {
        x: d * c_alt * s_az,
        y: d * s_alt,
        z: d * c_alt * c_az,
    }
}
