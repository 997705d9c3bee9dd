// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geographic value types
//!
//! Plain, freely copyable coordinate records. Ranges are not enforced:
//! out-of-range longitudes/latitudes produce meaningless but finite output.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Position in meters relative to an origin: +X east, +Y up, +Z south
pub type LocalPoint = [f64; 3];

/// Geographic coordinate (WGS84 degrees, altitude in meters)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
    /// Height above sea level; `None` means 0
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub altitude: Option<f64>,
}

impl GeoPoint {
    /// Create a point at sea level
    #[inline]
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            altitude: None,
        }
    }

    /// Create a point with an explicit altitude
    #[inline]
    pub fn with_altitude(longitude: f64, latitude: f64, altitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            altitude: Some(altitude),
        }
    }

    /// Altitude with the sea-level default applied
    #[inline]
    pub fn altitude_or_zero(&self) -> f64 {
        self.altitude.unwrap_or(0.0)
    }

    #[inline]
    pub fn to_vertex(&self) -> GeoVertex {
        GeoVertex::new(self.longitude, self.latitude, self.altitude_or_zero())
    }
}

/// Geographic vertex of a surface; altitude is always present
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoVertex {
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: f64,
}

impl GeoVertex {
    #[inline]
    pub fn new(longitude: f64, latitude: f64, altitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            altitude,
        }
    }

    /// Component-wise comparison with an absolute tolerance
    #[inline]
    pub fn approx_eq(&self, other: &GeoVertex, tolerance: f64) -> bool {
        (self.longitude - other.longitude).abs() <= tolerance
            && (self.latitude - other.latitude).abs() <= tolerance
            && (self.altitude - other.altitude).abs() <= tolerance
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite() && self.altitude.is_finite()
    }
}

impl From<GeoVertex> for GeoPoint {
    fn from(v: GeoVertex) -> Self {
        GeoPoint::with_altitude(v.longitude, v.latitude, v.altitude)
    }
}

impl From<GeoPoint> for GeoVertex {
    fn from(p: GeoPoint) -> Self {
        p.to_vertex()
    }
}

impl std::fmt::Display for GeoVertex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.longitude, self.latitude, self.altitude)
    }
}

/// One face of a polyhedral surface. Vertex order is kept as given.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoTriangle {
    pub v0: GeoVertex,
    pub v1: GeoVertex,
    pub v2: GeoVertex,
}

impl GeoTriangle {
    #[inline]
    pub fn new(v0: GeoVertex, v1: GeoVertex, v2: GeoVertex) -> Self {
        Self { v0, v1, v2 }
    }

    #[inline]
    pub fn vertices(&self) -> [GeoVertex; 3] {
        [self.v0, self.v1, self.v2]
    }
}
