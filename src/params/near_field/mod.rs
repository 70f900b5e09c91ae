// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.


use console::style;
use hifitime::Duration;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, info};
use thiserror::Error;

use crate::{
    cli::InfoPrinter,
    context::NearFieldContext,
    coord::CoordError,
    io::{TileLayout, TileLayoutError, VisTable, VisTableError},
    time::{RequestedTime, TimeMatch},
    vis::{correct_rows, select_rows},
    PROGRESS_BARS,
};

/// What happened when the correction was run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NearFieldOutcome {
    /// No rows were at the requested time; nothing was written.
    NoMatchingRows,

    /// Rows were selected, but this was a dry run; nothing was written.
    DryRun { num_selected_rows: usize },

    /// Corrected data were written.
    Corrected {
        num_selected_rows: usize,
        num_corrected_rows: usize,
    },
}

pub(crate) struct NearFieldParams<T: VisTable, L: TileLayout> {
    pub(crate) vis_table: T,
    pub(crate) tile_layout: L,
    pub(crate) time: RequestedTime,
    pub(crate) time_match: TimeMatch,

    /// The distance from the array centroid to the focal point \[kilometres\].
    pub(crate) distance_km: f64,

    /// UT1 - UTC.
    pub(crate) dut1: Duration,
}

impl<T: VisTable, L: TileLayout> NearFieldParams<T, L> {
    /// Read everything needed, correct the rows at the requested time in
    /// memory, and then (if this isn't a dry run) write the results. Nothing is
    /// written unless every selected row was corrected.
    pub(crate) fn run(&mut self, dry_run: bool) -> Result<NearFieldOutcome, NearFieldParamsError> {
        // Load.
        let metadata = self.vis_table.read_metadata()?;
        let offsets = self.tile_layout.read_tile_offsets()?;
        let mut vis = self.vis_table.read_vis()?;
        let num_chans = vis.data.len_of(ndarray::Axis(1));
        if num_chans != metadata.freqs_hz.len() {
            return Err(NearFieldParamsError::ChannelMismatch {
                freqs: metadata.freqs_hz.len(),
                chans: num_chans,
            });
        }

        // Precompute.
        let context =
            NearFieldContext::new(&metadata, &offsets, &self.time, self.distance_km, self.dut1)?;
        self.print_geometry(&context);

        // Select.
        let rows = select_rows(&vis.times, &self.time, self.time_match);
        if rows.is_empty() {
            info!(
                "No rows match the requested time {} ({}); nothing to do",
                self.time, self.time_match
            );
            return Ok(NearFieldOutcome::NoMatchingRows);
        }
        info!("{} rows match the requested time", rows.len());
        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(NearFieldOutcome::DryRun {
                num_selected_rows: rows.len(),
            });
        }

        // Correct. The far-field UVWs are kept aside before anything changes.
        let far_field_uvws = vis.uvws.clone();
        let num_cross_rows = rows
            .iter()
            .filter(|&&i| vis.antenna1[i] != vis.antenna2[i])
            .count();
        let pb = ProgressBar::with_draw_target(
            Some(num_cross_rows as _),
            if PROGRESS_BARS.load() {
                ProgressDrawTarget::stdout()
            } else {
                ProgressDrawTarget::hidden()
            },
        )
        .with_style(
            ProgressStyle::default_bar()
                .template("{msg:18}: [{wide_bar:.blue}] {pos:4}/{len:4} rows ({elapsed_precise}<{eta_precise})")
                .unwrap()
                .progress_chars("=> "),
        )
        .with_position(0)
        .with_message("Correcting");
        let corrected_rows = correct_rows(&mut vis, &rows, &context, Some(&pb))?;
        pb.abandon_with_message("Finished correcting");

        // Persist.
        debug!("Writing corrected visibilities");
        self.vis_table
            .write_corrected(&vis, far_field_uvws.view(), &corrected_rows)?;
        info!(
            "Corrected {} cross-correlation rows ({} rows selected)",
            corrected_rows.len(),
            rows.len()
        );

        Ok(NearFieldOutcome::Corrected {
            num_selected_rows: rows.len(),
            num_corrected_rows: corrected_rows.len(),
        })
    }

    fn print_geometry(&self, context: &NearFieldContext) {
        let mut printer = InfoPrinter::new("Near-field geometry".into());
        let phase_centre = context.phase_centre();
        let (alt, az) = context.alt_az();
        printer.push_block(vec![
            style("                   RA        Dec")
                .bold()
                .to_string()
                .into(),
            format!(
                "Phase centre:      {:>8.4}° {:>8.4}°",
                phase_centre.ra.to_degrees(),
                phase_centre.dec.to_degrees()
            )
            .into(),
        ]);
        printer.push_block(vec![
            format!("Requested time:    {} ({})", self.time, self.time_match).into(),
            format!("Altitude, azimuth: {alt:>8.4}° {az:>8.4}°").into(),
        ]);
        let focal = context.focal();
        printer.push_block(vec![
            format!("Focal distance:    {} km", context.distance_km()).into(),
            format!(
                "Focal point:       ({:.3}, {:.3}, {:.3}) m",
                focal.x, focal.y, focal.z
            )
            .into(),
        ]);
        printer.display();
    }
}

#[derive(Error, Debug)]
pub(crate) enum NearFieldParamsError {
    #[error("The visibilities have {chans} channels, but {freqs} channel frequencies were listed")]
    ChannelMismatch { freqs: usize, chans: usize },

    #[error(transparent)]
    VisTable(#[from] VisTableError),

    #[error(transparent)]
    TileLayout(#[from] TileLayoutError),

    #[error(transparent)]
    Coord(#[from] CoordError),
}
