//! Array element geometry and slowness-vector helpers

use serde::{Deserialize, Serialize};

/// Displacement of a channel from the array reference point, in km
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RelativePosition {
    pub east_displacement_km: f64,
    pub north_displacement_km: f64,
    pub vertical_displacement_km: f64,
}

impl RelativePosition {
    pub fn new(east_km: f64, north_km: f64, vertical_km: f64) -> Self {
        Self {
            east_displacement_km: east_km,
            north_displacement_km: north_km,
            vertical_displacement_km: vertical_km,
        }
    }

    /// Plane-wave arrival delay at this element for the given slowness (s)
    pub fn delay(&self, slow_east: f64, slow_north: f64, slow_vertical: f64) -> f64 {
        self.east_displacement_km * slow_east
            + self.north_displacement_km * slow_north
            + self.vertical_displacement_km * slow_vertical
    }
}

/// Magnitude of the horizontal slowness vector (s/km)
pub fn horizontal_slowness(slow_east: f64, slow_north: f64) -> f64 {
    slow_east.hypot(slow_north)
}

/// Azimuth from the receiver back toward the source, degrees clockwise from
/// north in `[0, 360)`.
///
/// The slowness vector points along the propagation direction, so the source
/// lies opposite to it.
pub fn receiver_to_source_azimuth_deg(slow_east: f64, slow_north: f64) -> f64 {
    let azimuth = (-slow_east).atan2(-slow_north).to_degrees();
    let wrapped = azimuth.rem_euclid(360.0);
    // rem_euclid may round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
