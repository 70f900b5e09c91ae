// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use indicatif::ProgressBar;
use log::debug;
use marlu::c32;
use ndarray::prelude::*;
use rayon::prelude::*;

use crate::{
    context::NearFieldContext,
    coord::{CoordError, LocalXyz},
    delay::{near_field_correction, phase_factor},
    io::VisData,
};

/// Rotate the visibilities of the selected `rows` so that they are phased
/// toward the context's focal point, and replace their w terms with the
/// near-field w terms. The existing UVWs in `vis` are taken to be the
/// far-field UVWs.
///
/// Auto-correlations are never touched. The indices of the rows that were
/// corrected (i.e. the selected cross-correlations) are returned in ascending
/// order.
///
/// Every antenna referenced by a selected cross-correlation is looked up
/// before any row is modified; if any lookup fails, `vis` is unchanged.
pub fn correct_rows(
    vis: &mut VisData,
    rows: &[usize],
    context: &NearFieldContext,
    progress: Option<&ProgressBar>,
) -> Result<Vec<usize>, CoordError> {
    let num_rows = vis.num_rows();
    let mut plan: Vec<Option<(LocalXyz, LocalXyz)>> = vec![None; num_rows];
    let mut corrected_rows = Vec::with_capacity(rows.len());
    let mut num_autos = 0;
    for &i_row in rows {
        let (ant1, ant2) = (vis.antenna1[i_row], vis.antenna2[i_row]);
        if ant1 == ant2 {
            num_autos += 1;
            continue;
        }
        plan[i_row] = Some((context.position(ant1)?, context.position(ant2)?));
        corrected_rows.push(i_row);
    }
    corrected_rows.sort_unstable();
    corrected_rows.dedup();
    debug!(
        "Correcting {} cross-correlation rows; skipping {num_autos} auto-correlation rows",
        corrected_rows.len()
    );

    let focal = context.focal();
    let wavelengths = context.wavelengths();
    vis.data
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .zip(vis.uvws.axis_iter_mut(Axis(0)))
        .zip(plan.par_iter())
        .for_each(|((mut row_data, mut uvw), plan)| {
            let (tile1, tile2) = match plan {
                Some(p) => *p,
                None => return,
            };
            let (phi, new_w) = near_field_correction(tile1, tile2, focal, uvw[2]);
            uvw[2] = new_w;

            // One phasor per channel, applied to every polarisation.
            let phasors: Array1<c32> = wavelengths
                .iter()
                .map(|&wavelength| {
                    let f = phase_factor(phi, wavelength);
                    c32::new(f.re as f32, f.im as f32)
                })
                .collect();
            row_data *= &phasors.insert_axis(Axis(1));

            if let Some(pb) = progress {
                pb.inc(1);
            }
        });

    Ok(corrected_rows)
}
