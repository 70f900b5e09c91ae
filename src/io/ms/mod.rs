// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to interface with CASA measurement sets.
//!
//! More info: https://casa.nrao.edu/Memos/229.html#SECTION00060000000000000000

use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

use log::{debug, trace};
use marlu::{c32, rubbl_casatables, RADec, XyzGeocentric};
use ndarray::prelude::*;
use rubbl_casatables::{GlueDataType, Table, TableOpenMode};
use vec1::Vec1;

use super::{ArrayMetadata, VisData, VisTable, VisTableError};
use crate::constants::{
    DEFAULT_DATA_COLUMN, DEFAULT_OUTPUT_DATA_COLUMN, FAR_FIELD_UVW_COLUMN, UVW_COLUMN,
};

#[cfg(test)]
mod tests;

/// Produce a closure that wraps a casacore error with the table and column it
/// came from.
fn read_err<E: Display>(table: &'static str, column: &str) -> impl FnOnce(E) -> VisTableError {
    let column = column.to_string();
    move |e| VisTableError::Read {
        table,
        column,
        err: e.to_string(),
    }
}

fn write_err<E: Display>(column: &str) -> impl FnOnce(E) -> VisTableError {
    let column = column.to_string();
    move |e| VisTableError::Write {
        column,
        err: e.to_string(),
    }
}

/// Open a measurement set table. If `table` is `None`, then open the base
/// table.
fn open_table(ms: &Path, table: Option<&str>, mode: TableOpenMode) -> Result<Table, VisTableError> {
    let path = format!("{}/{}", ms.display(), table.unwrap_or(""));
    Table::open(&path, mode).map_err(|e| VisTableError::Open {
        table: path,
        err: e.to_string(),
    })
}

pub struct MsTable {
    /// The path to the measurement set on disk.
    ms: PathBuf,

    /// The name of the main-table column to read visibilities from.
    data_col_name: String,

    /// The name of the main-table column to write corrected visibilities to.
    output_data_col_name: String,
}

impl MsTable {
    /// Check that `ms` looks like a measurement set and get ready to read it.
    /// If the column names aren't specified, "DATA" is read and
    /// "CORRECTED_DATA" is written.
    pub fn new<P: AsRef<Path>>(
        ms: P,
        data_col_name: Option<String>,
        output_data_col_name: Option<String>,
    ) -> Result<MsTable, VisTableError> {
        let ms = ms.as_ref();
        debug!("Using measurement set: {}", ms.display());
        if !ms.exists() {
            return Err(VisTableError::BadFile(ms.to_path_buf()));
        }

        let data_col_name = data_col_name.unwrap_or_else(|| DEFAULT_DATA_COLUMN.to_string());
        let output_data_col_name =
            output_data_col_name.unwrap_or_else(|| DEFAULT_OUTPUT_DATA_COLUMN.to_string());

        let mut main_table = open_table(ms, None, TableOpenMode::Read)?;
        if main_table.n_rows() == 0 {
            return Err(VisTableError::MainTableEmpty);
        }
        let col_names = main_table
            .column_names()
            .map_err(read_err("main", "<column names>"))?;
        if !col_names.contains(&data_col_name) {
            return Err(VisTableError::NoDataCol { col: data_col_name });
        }

        Ok(MsTable {
            ms: ms.to_path_buf(),
            data_col_name,
            output_data_col_name,
        })
    }
}

impl VisTable for MsTable {
    fn read_metadata(&mut self) -> Result<ArrayMetadata, VisTableError> {
        // Get the tile names and XYZ positions.
        let mut antenna_table = open_table(&self.ms, Some("ANTENNA"), TableOpenMode::Read)?;
        let tile_names: Vec<String> = antenna_table
            .get_col_as_vec("NAME")
            .map_err(read_err("ANTENNA", "NAME"))?;
        trace!("There are {} tile names", tile_names.len());
        let tile_names = Vec1::try_from_vec(tile_names)
            .map_err(|_| VisTableError::SubtableEmpty { table: "ANTENNA" })?;

        let mut tile_positions = Vec::with_capacity(tile_names.len());
        for i_row in 0..antenna_table.n_rows() {
            let pos: Vec<f64> = antenna_table
                .get_cell_as_vec("POSITION", i_row)
                .map_err(read_err("ANTENNA", "POSITION"))?;
            if pos.len() != 3 {
                return Err(VisTableError::BadCellShape {
                    column: "POSITION".to_string(),
                    row: i_row as usize,
                    expected: vec![3],
                    got: vec![pos.len()],
                });
            }
            tile_positions.push(XyzGeocentric {
                x: pos[0],
                y: pos[1],
                z: pos[2],
            });
        }
        if tile_positions.len() != tile_names.len() {
            return Err(VisTableError::MismatchNumNamesNumPositions {
                names: tile_names.len(),
                positions: tile_positions.len(),
            });
        }
        let tile_positions = Vec1::try_from_vec(tile_positions)
            .map_err(|_| VisTableError::SubtableEmpty { table: "ANTENNA" })?;

        // Get the frequency information.
        let freqs_hz = {
            let mut spectral_window_table =
                open_table(&self.ms, Some("SPECTRAL_WINDOW"), TableOpenMode::Read)?;
            let freqs_hz: Vec<f64> = spectral_window_table
                .get_cell_as_vec("CHAN_FREQ", 0)
                .map_err(read_err("SPECTRAL_WINDOW", "CHAN_FREQ"))?;
            Vec1::try_from_vec(freqs_hz).map_err(|_| VisTableError::SubtableEmpty {
                table: "SPECTRAL_WINDOW",
            })?
        };
        debug!(
            "{} channels, {:.3} MHz to {:.3} MHz",
            freqs_hz.len(),
            freqs_hz.first() / 1e6,
            freqs_hz.last() / 1e6
        );

        // Get the observation phase centre.
        let phase_centre = {
            let mut field_table = open_table(&self.ms, Some("FIELD"), TableOpenMode::Read)?;
            let phase_vec: Vec<f64> = field_table
                .get_cell_as_vec("PHASE_DIR", 0)
                .map_err(read_err("FIELD", "PHASE_DIR"))?;
            if phase_vec.len() < 2 {
                return Err(VisTableError::BadCellShape {
                    column: "PHASE_DIR".to_string(),
                    row: 0,
                    expected: vec![1, 2],
                    got: vec![phase_vec.len()],
                });
            }
            RADec::from_radians(phase_vec[0], phase_vec[1])
        };
        debug!("Phase centre: {phase_centre}");

        Ok(ArrayMetadata {
            tile_names,
            tile_positions,
            freqs_hz,
            phase_centre,
        })
    }

    fn read_vis(&mut self) -> Result<VisData, VisTableError> {
        let mut main_table = open_table(&self.ms, None, TableOpenMode::Read)?;
        let num_rows = main_table.n_rows() as usize;

        let times: Vec<f64> = main_table
            .get_col_as_vec("TIME")
            .map_err(read_err("main", "TIME"))?;
        let antenna1: Vec<i32> = main_table
            .get_col_as_vec("ANTENNA1")
            .map_err(read_err("main", "ANTENNA1"))?;
        let antenna2: Vec<i32> = main_table
            .get_col_as_vec("ANTENNA2")
            .map_err(read_err("main", "ANTENNA2"))?;

        // If this measurement set has been corrected before, the original
        // UVWs were saved and these should be used instead of the (already
        // modified) UVW column.
        let col_names = main_table
            .column_names()
            .map_err(read_err("main", "<column names>"))?;
        let uvw_col_name = if col_names.iter().any(|c| c == FAR_FIELD_UVW_COLUMN) {
            debug!("Reading far-field UVWs from {FAR_FIELD_UVW_COLUMN}");
            FAR_FIELD_UVW_COLUMN
        } else {
            UVW_COLUMN
        };
        let mut uvws = Array2::zeros((num_rows, 3));
        for (i_row, mut uvw_row) in uvws.outer_iter_mut().enumerate() {
            let uvw: Vec<f64> = main_table
                .get_cell_as_vec(uvw_col_name, i_row as u64)
                .map_err(read_err("main", uvw_col_name))?;
            if uvw.len() != 3 {
                return Err(VisTableError::BadCellShape {
                    column: uvw_col_name.to_string(),
                    row: i_row,
                    expected: vec![3],
                    got: vec![uvw.len()],
                });
            }
            uvw_row.assign(&ArrayView1::from(&uvw));
        }

        // Use the first row to get the shape of the data.
        let first: Array2<c32> = main_table
            .get_cell(&self.data_col_name, 0)
            .map_err(read_err("main", &self.data_col_name))?;
        let (num_chans, num_pols) = first.dim();
        trace!("{num_rows} rows, {num_chans} channels, {num_pols} polarisations");
        let mut data = Array3::zeros((num_rows, num_chans, num_pols));
        data.slice_mut(s![0, .., ..]).assign(&first);
        for i_row in 1..num_rows {
            let row_data: Array2<c32> = main_table
                .get_cell(&self.data_col_name, i_row as u64)
                .map_err(read_err("main", &self.data_col_name))?;
            if row_data.dim() != (num_chans, num_pols) {
                return Err(VisTableError::BadCellShape {
                    column: self.data_col_name.clone(),
                    row: i_row,
                    expected: vec![num_chans, num_pols],
                    got: row_data.shape().to_vec(),
                });
            }
            data.slice_mut(s![i_row, .., ..]).assign(&row_data);
        }

        Ok(VisData {
            times,
            antenna1,
            antenna2,
            uvws,
            data,
        })
    }

    fn write_corrected(
        &mut self,
        vis: &VisData,
        far_field_uvws: ArrayView2<f64>,
        corrected_rows: &[usize],
    ) -> Result<(), VisTableError> {
        let comment = format!(
            "added by {} {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        );
        let mut main_table = open_table(&self.ms, None, TableOpenMode::ReadWrite)?;
        let col_names = main_table
            .column_names()
            .map_err(read_err("main", "<column names>"))?;

        // Save the far-field UVWs, but only once; after the first correction,
        // the UVW column no longer holds them.
        if !col_names.iter().any(|c| c == FAR_FIELD_UVW_COLUMN) {
            debug!("Creating column {FAR_FIELD_UVW_COLUMN}");
            main_table
                .add_array_column(
                    GlueDataType::TpDouble,
                    FAR_FIELD_UVW_COLUMN,
                    Some(comment.as_str()),
                    Some(&[3]),
                    false,
                    false,
                )
                .map_err(write_err(FAR_FIELD_UVW_COLUMN))?;
            for (i_row, uvw) in far_field_uvws.outer_iter().enumerate() {
                main_table
                    .put_cell(FAR_FIELD_UVW_COLUMN, i_row as u64, &uvw.to_vec())
                    .map_err(write_err(FAR_FIELD_UVW_COLUMN))?;
            }
        }

        let (_, num_chans, num_pols) = vis.data.dim();
        if !col_names.contains(&self.output_data_col_name) {
            debug!("Creating column {}", self.output_data_col_name);
            main_table
                .add_array_column(
                    GlueDataType::TpComplex,
                    &self.output_data_col_name,
                    Some(comment.as_str()),
                    Some(&[num_chans as u64, num_pols as u64]),
                    false,
                    false,
                )
                .map_err(write_err(&self.output_data_col_name))?;
        }
        for (i_row, row_data) in vis.data.outer_iter().enumerate() {
            main_table
                .put_cell(&self.output_data_col_name, i_row as u64, &row_data.to_owned())
                .map_err(write_err(&self.output_data_col_name))?;
        }

        for &i_row in corrected_rows {
            let uvw = vis.uvws.row(i_row).to_vec();
            main_table
                .put_cell(UVW_COLUMN, i_row as u64, &uvw)
                .map_err(write_err(UVW_COLUMN))?;
        }
        debug!(
            "Wrote {} rows to {} and updated {} UVWs",
            vis.num_rows(),
            self.output_data_col_name,
            corrected_rows.len()
        );

        Ok(())
    }
}
