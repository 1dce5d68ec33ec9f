//! Latitude/longitude value type

use serde::{Deserialize, Serialize};

use crate::distance::distance_meters;

/// A geographic position in decimal degrees.
///
/// Used both for listener positions attached to movement updates and for the
/// recorded position of an audio clip. Positions are plain values; a missing
/// position is modelled as `Option<GeoPosition>` at the call sites that allow
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    /// Latitude in decimal degrees, positive north.
    pub latitude: f64,
    /// Longitude in decimal degrees, positive east.
    pub longitude: f64,
}

impl GeoPosition {
    /// Creates a position from decimal-degree coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to another position, in meters.
    pub fn distance_to(&self, other: &GeoPosition) -> f64 {
        distance_meters(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}
