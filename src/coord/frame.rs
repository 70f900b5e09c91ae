// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The local frame that tiles and the focal point live in.
//!
//! The axes are: x is west (negated east), y is up (height), z is north. The
//! origin is the centroid of all tiles in the layout metadata.

use std::collections::HashMap;

use log::{trace, warn};
use serde::{Deserialize, Serialize};

use super::CoordError;

/// A position in the local frame. All units are in metres.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalXyz {
    /// Negated east offset \[metres\]
    pub x: f64,
    /// Height \[metres\]
    pub y: f64,
    /// North offset \[metres\]
    pub z: f64,
}

impl LocalXyz {
    /// Map an (east, north, height) offset onto the local axes. This is the
    /// only place the axis convention is defined; everything else that needs
    /// local tile coordinates must go through here.
    pub fn from_enh(east: f64, north: f64, height: f64) -> LocalXyz {
        LocalXyz {
            x: -east,
            y: height,
            z: north,
        }
    }

    /// The Euclidean length of this vector.
    pub fn norm(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl std::ops::Add for LocalXyz {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        LocalXyz {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl std::ops::Sub for LocalXyz {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        LocalXyz {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl std::ops::Div<f64> for LocalXyz {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        LocalXyz {
            x: self.x / rhs,
            y: self.y / rhs,
            z: self.z / rhs,
        }
    }
}

#[cfg(test)]
impl approx::AbsDiffEq for LocalXyz {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        f64::abs_diff_eq(&self.x, &other.x, epsilon)
            && f64::abs_diff_eq(&self.y, &other.y, epsilon)
            && f64::abs_diff_eq(&self.z, &other.z, epsilon)
    }
}

/// A tile's physical offsets from the array centre, as listed by the layout
/// metadata (e.g. a metafits file).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileOffsets {
    pub name: String,

    /// \[metres\]
    pub east: f64,

    /// \[metres\]
    pub north: f64,

    /// \[metres\]
    pub height: f64,
}

/// Every tile's position in the local frame, keyed by tile name. The positions
/// are computed once, when the frame is built, so looking a tile up is cheap.
#[derive(Debug, Clone)]
pub struct AntennaFrame {
    positions: HashMap<String, LocalXyz>,
}

impl AntennaFrame {
    /// Build the frame from all tiles in the layout metadata. The centroid of
    /// the uniquely named tiles is subtracted so that the array centre sits at
    /// the origin.
    pub fn new(offsets: &[TileOffsets]) -> Result<AntennaFrame, CoordError> {
        if offsets.is_empty() {
            return Err(CoordError::NoAntennas);
        }

        // Duplicated names keep their first entry; the others are not part of
        // the centroid.
        let mut unique: Vec<(&str, LocalXyz)> = Vec::with_capacity(offsets.len());
        for o in offsets {
            if unique.iter().any(|(name, _)| *name == o.name) {
                warn!(
                    "Tile '{}' appears more than once in the layout metadata; using its first entry",
                    o.name
                );
                continue;
            }
            unique.push((&o.name, LocalXyz::from_enh(o.east, o.north, o.height)));
        }
        let centroid = unique
            .iter()
            .fold(LocalXyz::default(), |acc, &(_, xyz)| acc + xyz)
            / unique.len() as f64;
        trace!("Raw tile centroid: {centroid:?}");

        let positions = unique
            .into_iter()
            .map(|(name, xyz)| (name.to_string(), xyz - centroid))
            .collect();

        Ok(AntennaFrame { positions })
    }

    /// Get the local position of the named tile.
    pub fn get(&self, name: &str) -> Result<LocalXyz, CoordError> {
        self.positions
            .get(name)
            .copied()
            .ok_or_else(|| CoordError::AntennaNotFound {
                name: name.to_string(),
            })
    }

    /// The number of uniquely named tiles in the frame.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// The mean position of all (uniquely named) tiles. This should always be
    /// very close to the origin.
    pub fn centroid(&self) -> LocalXyz {
        self.positions
            .values()
            .fold(LocalXyz::default(), |acc, &xyz| acc + xyz)
            / self.positions.len() as f64
    }
}
