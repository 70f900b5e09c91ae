// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Helper functions around time.
//!
//! The user requests a single observation instant as an ISO-8601 string, and
//! the rows of a measurement set carry their times as MJD seconds (UTC). The
//! comparison between the two is controlled by [`TimeMatch`].

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike};
use hifitime::Epoch;
use thiserror::Error;

use crate::constants::MJD_TO_UNIX_SECONDS;

const FORMAT_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";
const FORMAT_FRACTIONAL: &str = "%Y-%m-%dT%H:%M:%S%.f";
const RENDER_FRACTIONAL: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// How precisely was a time specified?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimePrecision {
    /// Whole seconds, e.g. "2023-05-01T12:00:03".
    Seconds,

    /// Fractional seconds, e.g. "2023-05-01T12:00:03.5". Comparisons happen at
    /// microsecond precision.
    Fractional,
}

/// The observation instant requested by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedTime {
    pub(crate) datetime: NaiveDateTime,
    pub(crate) precision: TimePrecision,
}

impl RequestedTime {
    /// The requested instant as a UTC [`Epoch`].
    pub fn to_epoch(&self) -> Epoch {
        let dt = &self.datetime;
        Epoch::from_gregorian_utc(
            dt.year(),
            dt.month() as u8,
            dt.day() as u8,
            dt.hour() as u8,
            dt.minute() as u8,
            dt.second() as u8,
            dt.nanosecond(),
        )
    }

    /// Render a calendar instant at the same precision this time was
    /// requested with.
    pub(crate) fn render(&self, dt: &NaiveDateTime) -> String {
        match self.precision {
            TimePrecision::Seconds => dt.format(FORMAT_SECONDS).to_string(),
            TimePrecision::Fractional => dt.format(RENDER_FRACTIONAL).to_string(),
        }
    }

    /// Seconds since the Unix epoch.
    fn unix_seconds(&self) -> f64 {
        let utc = self.datetime.and_utc();
        utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) / 1e9
    }
}

impl std::fmt::Display for RequestedTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render(&self.datetime))
    }
}

/// Parse a user-supplied observation time. Two formats are accepted:
/// "%Y-%m-%dT%H:%M:%S" and the same with fractional seconds.
pub fn parse_requested_time(s: &str) -> Result<RequestedTime, TimeError> {
    let s = s.trim();
    if let Ok(datetime) = NaiveDateTime::parse_from_str(s, FORMAT_SECONDS) {
        return Ok(RequestedTime {
            datetime,
            precision: TimePrecision::Seconds,
        });
    }
    match NaiveDateTime::parse_from_str(s, FORMAT_FRACTIONAL) {
        Ok(datetime) => Ok(RequestedTime {
            datetime,
            precision: TimePrecision::Fractional,
        }),
        Err(_) => Err(TimeError::MalformedTimestamp {
            input: s.to_string(),
        }),
    }
}

/// Convert a casacore time (MJD seconds, UTC) to a calendar instant, rounded
/// to the nearest microsecond. An f64 holding MJD seconds can't resolve much
/// better than that, and without rounding e.g. 12:00:03.2 renders as
/// 12:00:03.199999. `None` is returned if the value isn't representable.
pub(crate) fn mjd_seconds_to_datetime(mjd_seconds: f64) -> Option<NaiveDateTime> {
    if !mjd_seconds.is_finite() {
        return None;
    }
    let unix = mjd_seconds - MJD_TO_UNIX_SECONDS;
    let whole = unix.floor();
    let mut secs = whole as i64;
    let mut micros = ((unix - whole) * 1e6).round() as u32;
    if micros >= 1_000_000 {
        secs += 1;
        micros -= 1_000_000;
    }
    DateTime::from_timestamp(secs, micros * 1000).map(|dt| dt.naive_utc())
}

/// The policy used to decide if a row's time is the requested time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TimeMatch {
    /// The row's time, rendered at the precision of the request, must be
    /// textually identical to the request.
    #[default]
    Exact,

    /// The row's time must be within this many seconds of the request.
    Tolerance(f64),
}

impl TimeMatch {
    /// Does a row with time `mjd_seconds` match the request?
    pub(crate) fn matches(&self, requested: &RequestedTime, mjd_seconds: f64) -> bool {
        match self {
            TimeMatch::Exact => match mjd_seconds_to_datetime(mjd_seconds) {
                Some(dt) => requested.render(&dt) == requested.render(&requested.datetime),
                None => false,
            },
            TimeMatch::Tolerance(tol) => {
                let unix = mjd_seconds - MJD_TO_UNIX_SECONDS;
                (unix - requested.unix_seconds()).abs() <= *tol
            }
        }
    }
}

impl std::fmt::Display for TimeMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeMatch::Exact => write!(f, "exact"),
            TimeMatch::Tolerance(tol) => write!(f, "within {tol}s"),
        }
    }
}

#[derive(Error, Debug)]
pub enum TimeError {
    #[error("Couldn't parse '{input}' as a timestamp; expected e.g. 2023-05-01T12:00:03 or 2023-05-01T12:00:03.5")]
    MalformedTimestamp { input: String },
}
