// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;
use hifitime::Duration;

use super::*;
use crate::{constants::VEL_C, tests::*, time::parse_requested_time};

fn get_context(distance_km: f64) -> NearFieldContext {
    let time = parse_requested_time(OBS_TIME).unwrap();
    NearFieldContext::new(
        &array_metadata(),
        &tile_offsets(),
        &time,
        distance_km,
        Duration::from_seconds(0.0),
    )
    .unwrap()
}

#[test]
fn test_focal_point_distance() {
    for distance_km in [0.5, 20.0, 1000.0] {
        let context = get_context(distance_km);
        assert_abs_diff_eq!(
            context.focal().norm(),
            distance_km * 1000.0,
            epsilon = 1e-9 * distance_km * 1000.0
        );
        assert_abs_diff_eq!(context.distance_km(), distance_km);
    }
}

#[test]
fn test_focal_point_direction_is_independent_of_distance() {
    let near = get_context(1.0);
    let far = get_context(1000.0);
    assert_abs_diff_eq!(near.alt_az().0, far.alt_az().0);
    assert_abs_diff_eq!(near.alt_az().1, far.alt_az().1);
    assert_abs_diff_eq!(near.focal() / 1.0, far.focal() / 1000.0, epsilon = 1e-9);
}

#[test]
fn test_wavelengths() {
    let context = get_context(100.0);
    let metadata = array_metadata();
    assert_eq!(context.wavelengths().len(), metadata.freqs_hz.len());
    for (&w, &f) in context.wavelengths().iter().zip(metadata.freqs_hz.iter()) {
        assert_abs_diff_eq!(w, VEL_C / f);
    }
    assert_abs_diff_eq!(context.wavelengths()[0], 1.99861639, epsilon = 1e-8);
}

#[test]
fn test_positions_use_table_antenna_numbers() {
    let context = get_context(100.0);
    for (i, name) in array_metadata().tile_names.iter().enumerate() {
        assert_eq!(
            context.position(i as i32).unwrap(),
            context.frame.get(name).unwrap()
        );
    }
    assert!(matches!(
        context.position(-1),
        Err(CoordError::BadAntennaNumber { antenna: -1, .. })
    ));
    assert!(matches!(
        context.position(4),
        Err(CoordError::BadAntennaNumber { antenna: 4, .. })
    ));
}

#[test]
fn test_no_tiles_in_layout() {
    let time = parse_requested_time(OBS_TIME).unwrap();
    let result = NearFieldContext::new(
        &array_metadata(),
        &[],
        &time,
        100.0,
        Duration::from_seconds(0.0),
    );
    assert!(matches!(result, Err(CoordError::NoAntennas)));
}
