// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Helpful functions and in-memory stand-ins for files, for tests.

use marlu::{c32, LatLngHeight, RADec, XyzGeocentric};
use ndarray::prelude::*;
use vec1::vec1;

use crate::{
    io::{ArrayMetadata, TileLayout, TileLayoutError, VisData, VisTable, VisTableError},
    TileOffsets,
};

/// The time used by the test data, as a user would write it.
pub(crate) const OBS_TIME: &str = "2023-05-01T12:00:03";

/// [`OBS_TIME`] as casacore MJD seconds.
pub(crate) const OBS_TIME_MJD_S: f64 = 60065.0 * 86400.0 + 12.0 * 3600.0 + 3.0;

pub(crate) const NUM_TILES: usize = 4;
pub(crate) const NUM_CHANS: usize = 3;
pub(crate) const NUM_POLS: usize = 4;

/// The layout of the test tiles. There is one more tile here than in the
/// visibility data, like a metafits file listing a tile that was dropped.
pub(crate) fn tile_offsets() -> Vec<TileOffsets> {
    [
        ("Tile011", 0.0, 0.0, 0.0),
        ("Tile012", 100.0, 20.0, 1.0),
        ("Tile013", -50.0, 150.0, -0.5),
        ("Tile014", 30.0, -120.0, 0.5),
        ("Tile015", 500.0, 480.0, 2.0),
    ]
    .into_iter()
    .map(|(name, east, north, height)| TileOffsets {
        name: name.to_string(),
        east,
        north,
        height,
    })
    .collect()
}

pub(crate) fn array_metadata() -> ArrayMetadata {
    let mwa = XyzGeocentric::get_geocentric_vector(LatLngHeight::mwa());
    let tile_positions = vec1![
        mwa,
        XyzGeocentric {
            x: mwa.x + 10.0,
            ..mwa
        },
        XyzGeocentric {
            y: mwa.y - 20.0,
            ..mwa
        },
        XyzGeocentric {
            z: mwa.z + 15.0,
            ..mwa
        },
    ];
    ArrayMetadata {
        tile_names: vec1![
            "Tile011".to_string(),
            "Tile012".to_string(),
            "Tile013".to_string(),
            "Tile014".to_string()
        ],
        tile_positions,
        freqs_hz: vec1![150e6, 151.28e6, 180e6],
        phase_centre: RADec::from_degrees(0.0, -27.0),
    }
}

/// Visibilities for all baselines (including autos) at two times:
/// [`OBS_TIME`] and two seconds after it.
pub(crate) fn vis_data() -> VisData {
    let mut times = vec![];
    let mut antenna1 = vec![];
    let mut antenna2 = vec![];
    for time in [OBS_TIME_MJD_S, OBS_TIME_MJD_S + 2.0] {
        for ant1 in 0..NUM_TILES as i32 {
            for ant2 in ant1..NUM_TILES as i32 {
                times.push(time);
                antenna1.push(ant1);
                antenna2.push(ant2);
            }
        }
    }
    let num_rows = times.len();
    let uvws = Array2::from_shape_fn((num_rows, 3), |(i_row, i_uvw)| {
        (i_row as f64 + 1.0) * (i_uvw as f64 - 1.0) * 1.5
    });
    let data = Array3::from_shape_fn((num_rows, NUM_CHANS, NUM_POLS), |(r, c, p)| {
        c32::new(
            1.0 + r as f32 + 0.1 * c as f32,
            -0.5 + 0.25 * p as f32 - 0.01 * r as f32,
        )
    });
    VisData {
        times,
        antenna1,
        antenna2,
        uvws,
        data,
    }
}

/// A visibility table that lives in memory and behaves like a measurement set:
/// the input and output data columns are distinct, and the far-field UVWs are
/// saved the first time corrected data are written.
#[derive(Debug, Clone)]
pub(crate) struct MemoryTable {
    pub(crate) metadata: ArrayMetadata,

    /// The input column. This is never written to.
    pub(crate) vis: VisData,

    pub(crate) output_data: Option<Array3<c32>>,

    pub(crate) far_field_uvws: Option<Array2<f64>>,

    pub(crate) num_writes: usize,
}

impl MemoryTable {
    pub(crate) fn new() -> MemoryTable {
        MemoryTable {
            metadata: array_metadata(),
            vis: vis_data(),
            output_data: None,
            far_field_uvws: None,
            num_writes: 0,
        }
    }
}

impl VisTable for MemoryTable {
    fn read_metadata(&mut self) -> Result<ArrayMetadata, VisTableError> {
        Ok(self.metadata.clone())
    }

    fn read_vis(&mut self) -> Result<VisData, VisTableError> {
        let mut vis = self.vis.clone();
        if let Some(far_field_uvws) = &self.far_field_uvws {
            vis.uvws.assign(far_field_uvws);
        }
        Ok(vis)
    }

    fn write_corrected(
        &mut self,
        vis: &VisData,
        far_field_uvws: ArrayView2<f64>,
        corrected_rows: &[usize],
    ) -> Result<(), VisTableError> {
        if self.far_field_uvws.is_none() {
            self.far_field_uvws = Some(far_field_uvws.to_owned());
        }
        self.output_data = Some(vis.data.clone());
        for &i_row in corrected_rows {
            self.vis.uvws.row_mut(i_row).assign(&vis.uvws.row(i_row));
        }
        self.num_writes += 1;
        Ok(())
    }
}

pub(crate) struct MemoryLayout(pub(crate) Vec<TileOffsets>);

impl TileLayout for MemoryLayout {
    fn read_tile_offsets(&self) -> Result<Vec<TileOffsets>, TileLayoutError> {
        Ok(self.0.clone())
    }
}
