// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Choosing which visibility rows to correct, and correcting them.

mod correct;
mod select;

pub use correct::correct_rows;
pub use select::select_rows;
