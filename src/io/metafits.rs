// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tile layouts from MWA metafits files.

use std::path::{Path, PathBuf};

use log::debug;
use mwalib::{MetafitsContext, Pol};

use super::{TileLayout, TileLayoutError};
use crate::coord::TileOffsets;

pub struct MetafitsLayout {
    metafits: PathBuf,
}

impl MetafitsLayout {
    pub fn new<P: AsRef<Path>>(metafits: P) -> Result<MetafitsLayout, TileLayoutError> {
        let metafits = metafits.as_ref();
        if !metafits.exists() {
            return Err(TileLayoutError::BadFile(metafits.to_path_buf()));
        }
        Ok(MetafitsLayout {
            metafits: metafits.to_path_buf(),
        })
    }
}

impl TileLayout for MetafitsLayout {
    /// Get the east, north and height offsets of every tile listed in the
    /// metafits file.
    fn read_tile_offsets(&self) -> Result<Vec<TileOffsets>, TileLayoutError> {
        debug!("Reading tile layout from {}", self.metafits.display());
        // TODO: Let the user supply the MWA version
        let context = MetafitsContext::new(&self.metafits, None)?;

        // There is an RF input for both tile polarisations, and the positions
        // are the same for both. Ignore the Y inputs.
        let offsets: Vec<TileOffsets> = context
            .rf_inputs
            .iter()
            .filter(|rf| rf.pol == Pol::X)
            .map(|rf| TileOffsets {
                name: rf.tile_name.clone(),
                east: rf.east_m,
                north: rf.north_m,
                height: rf.height_m,
            })
            .collect();
        if offsets.is_empty() {
            return Err(TileLayoutError::NoTiles(self.metafits.clone()));
        }
        debug!("Metafits lists {} tiles", offsets.len());
        Ok(offsets)
    }
}
