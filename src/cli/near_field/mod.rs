// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.


use std::{borrow::Cow, path::PathBuf};

use clap::Parser;
use hifitime::Duration;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::common::{display_warnings, InfoPrinter, Warn, ARG_FILE_HELP};
use crate::{
    constants::{DEFAULT_DATA_COLUMN, DEFAULT_OUTPUT_DATA_COLUMN},
    io::{MetafitsLayout, MsTable, TileLayoutError, VisTableError},
    params::{NearFieldOutcome, NearFieldParams},
    time::{parse_requested_time, TimeError, TimeMatch},
    NearFieldError,
};

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct NearFieldArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    /// Path to the measurement set to correct.
    #[clap(short = 'm', long, parse(from_os_str), help_heading = "INPUT FILES")]
    pub(super) ms: Option<PathBuf>,

    /// Path to the metafits file describing the tile layout.
    #[clap(long, parse(from_os_str), help_heading = "INPUT FILES")]
    pub(super) metafits: Option<PathBuf>,

    /// The UTC time of the rows to correct, e.g. 2023-05-01T12:00:03 or
    /// 2023-05-01T12:00:03.5.
    #[clap(short, long, help_heading = "CORRECTION")]
    pub(super) time: Option<String>,

    /// The distance from the array centre to the focal point [km].
    #[clap(short, long, help_heading = "CORRECTION")]
    pub(super) distance: Option<f64>,

    /// Rows within this many seconds of the requested time are corrected. If
    /// not given, a row's time must be identical to the requested time at the
    /// precision it was written with.
    #[clap(long, help_heading = "CORRECTION")]
    pub(super) time_tolerance: Option<f64>,

    /// UT1 - UTC [seconds]. Default: 0
    #[clap(long, help_heading = "CORRECTION")]
    pub(super) dut1: Option<f64>,

    /// The column of the measurement set to read visibilities from. Default:
    /// DATA
    #[clap(long, help_heading = "MEASUREMENT SET COLUMNS")]
    pub(super) data_column: Option<String>,

    /// The column of the measurement set to write corrected visibilities to.
    /// It is created if it doesn't exist. Default: CORRECTED_DATA
    #[clap(long, help_heading = "MEASUREMENT SET COLUMNS")]
    pub(super) output_data_column: Option<String>,
}

impl NearFieldArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<NearFieldArgs, NearFieldError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Read in the file arguments. Ensure all of the file args are
            // accounted for by pattern matching.
            let NearFieldArgs {
                args_file: _,
                ms,
                metafits,
                time,
                distance,
                time_tolerance,
                dut1,
                data_column,
                output_data_column,
            } = unpack_arg_file!(arg_file);

            // Merge all the arguments, preferring the CLI args when available.
            Ok(NearFieldArgs {
                args_file: None,
                ms: cli_args.ms.or(ms),
                metafits: cli_args.metafits.or(metafits),
                time: cli_args.time.or(time),
                distance: cli_args.distance.or(distance),
                time_tolerance: cli_args.time_tolerance.or(time_tolerance),
                dut1: cli_args.dut1.or(dut1),
                data_column: cli_args.data_column.or(data_column),
                output_data_column: cli_args.output_data_column.or(output_data_column),
            })
        } else {
            Ok(cli_args)
        }
    }

    /// Check the arguments and open the files. Everything that can be checked
    /// without the files is checked first.
    pub(super) fn parse(self) -> Result<NearFieldParams<MsTable, MetafitsLayout>, NearFieldError> {
        debug!("{:#?}", self);

        let Self {
            args_file: _,
            ms,
            metafits,
            time,
            distance,
            time_tolerance,
            dut1,
            data_column,
            output_data_column,
        } = self;

        let ms = ms.ok_or(NearFieldArgsError::NoMs)?;
        let metafits = metafits.ok_or(NearFieldArgsError::NoMetafits)?;
        let time = parse_requested_time(&time.ok_or(NearFieldArgsError::NoTime)?)
            .map_err(NearFieldArgsError::from)?;
        let distance_km = match distance {
            None => return Err(NearFieldArgsError::NoDistance.into()),
            Some(d) if !d.is_finite() || d <= 0.0 => {
                return Err(NearFieldArgsError::InvalidFocalDistance(d).into())
            }
            Some(d) => d,
        };
        let time_match = match time_tolerance {
            None => TimeMatch::Exact,
            Some(t) if !t.is_finite() || t < 0.0 => {
                return Err(NearFieldArgsError::InvalidTimeTolerance(t).into())
            }
            Some(t) => {
                if t > 60.0 {
                    format!("A time tolerance of {t}s may select rows from many timesteps").warn();
                }
                TimeMatch::Tolerance(t)
            }
        };
        let dut1 = match dut1 {
            None => Duration::from_seconds(0.0),
            Some(d) if !d.is_finite() || d.abs() > 1.0 => {
                return Err(NearFieldArgsError::InvalidDut1(d).into())
            }
            Some(d) => Duration::from_seconds(d),
        };

        let data_column = data_column.unwrap_or_else(|| DEFAULT_DATA_COLUMN.to_string());
        let output_data_column =
            output_data_column.unwrap_or_else(|| DEFAULT_OUTPUT_DATA_COLUMN.to_string());
        if data_column == output_data_column {
            let block: Vec<Cow<'static, str>> = vec![
                format!("The output column '{output_data_column}' is the input column").into(),
                "Running again will apply the correction twice".into(),
            ];
            block.warn();
        }

        let mut printer = InfoPrinter::new("Near-field correction".into());
        printer.push_block(vec![
            format!("Measurement set: {}", ms.display()).into(),
            format!("Metafits:        {}", metafits.display()).into(),
        ]);
        printer.push_block(vec![
            format!("Reading from:    {data_column}").into(),
            format!("Writing to:      {output_data_column}").into(),
        ]);
        printer.push_line(format!("Time matching:   {time} ({time_match})").into());
        printer.display();

        let vis_table = MsTable::new(&ms, Some(data_column), Some(output_data_column))
            .map_err(NearFieldArgsError::from)?;
        let tile_layout = MetafitsLayout::new(&metafits).map_err(NearFieldArgsError::from)?;

        display_warnings();

        Ok(NearFieldParams {
            vis_table,
            tile_layout,
            time,
            time_match,
            distance_km,
            dut1,
        })
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), NearFieldError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let mut params = self.parse()?;

        match params.run(dry_run)? {
            NearFieldOutcome::NoMatchingRows => {
                info!("No rows were at the requested time; the measurement set is unchanged")
            }
            NearFieldOutcome::DryRun { num_selected_rows } => {
                info!("{num_selected_rows} rows would have been corrected")
            }
            NearFieldOutcome::Corrected { .. } => (),
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub(super) enum NearFieldArgsError {
    #[error("No measurement set was specified")]
    NoMs,

    #[error("No observation time was specified")]
    NoTime,

    #[error("No focal distance was specified")]
    NoDistance,

    #[error("No metafits file was specified")]
    NoMetafits,

    #[error("The focal distance must be a positive number of kilometres; got {0}")]
    InvalidFocalDistance(f64),

    #[error("The time tolerance must be a non-negative number of seconds; got {0}")]
    InvalidTimeTolerance(f64),

    #[error("DUT1 must be between -1 and 1 seconds; got {0}")]
    InvalidDut1(f64),

    #[error(transparent)]
    Time(#[from] TimeError),

    #[error(transparent)]
    VisTable(#[from] VisTableError),

    #[error(transparent)]
    TileLayout(#[from] TileLayoutError),
}
