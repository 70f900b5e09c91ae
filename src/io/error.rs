// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisTableError {
    #[error("Supplied file path {0} does not exist or is not readable!")]
    BadFile(PathBuf),

    #[error("The main table of the measurement set contains no rows!")]
    MainTableEmpty,

    #[error("The {table} table of the measurement set contains no rows!")]
    SubtableEmpty { table: &'static str },

    #[error("The measurement set has no '{col}' column")]
    NoDataCol { col: String },

    #[error("There were {names} antenna names and {positions} antenna positions; there must be an equal number of both")]
    MismatchNumNamesNumPositions { names: usize, positions: usize },

    #[error("Column '{column}' row {row} had shape {got:?}, but {expected:?} was expected")]
    BadCellShape {
        column: String,
        row: usize,
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("Couldn't read column '{column}' of the {table} table: {err}")]
    Read {
        table: &'static str,
        column: String,
        err: String,
    },

    #[error("Couldn't write column '{column}': {err}")]
    Write { column: String, err: String },

    #[error("Couldn't open table {table}: {err}")]
    Open { table: String, err: String },
}

#[derive(Error, Debug)]
pub enum TileLayoutError {
    #[error("Supplied file path {0} does not exist or is not readable!")]
    BadFile(PathBuf),

    #[error("The tile layout in {0} lists no tiles")]
    NoTiles(PathBuf),

    #[error(transparent)]
    Mwalib(#[from] mwalib::MwalibError),
}
