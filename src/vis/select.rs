// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use log::{debug, trace};

use crate::time::{RequestedTime, TimeMatch};

/// Get the indices of the rows whose times (casacore MJD seconds) match the
/// requested time under `policy`. The indices are in ascending order.
pub fn select_rows(times: &[f64], requested: &RequestedTime, policy: TimeMatch) -> Vec<usize> {
    let rows: Vec<usize> = times
        .iter()
        .enumerate()
        .filter(|(_, &t)| policy.matches(requested, t))
        .map(|(i, _)| i)
        .collect();
    debug!(
        "{} of {} rows match {requested} ({policy})",
        rows.len(),
        times.len()
    );
    if let (Some(first), Some(last)) = (rows.first(), rows.last()) {
        trace!("Selected rows span {first}..={last}");
    }
    rows
}
