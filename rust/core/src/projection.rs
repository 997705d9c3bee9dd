// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geographic <-> local frame conversion
//!
//! Maps WGS84 coordinates to meters around an explicit origin (+X east,
//! +Y up, +Z south) and back.
//!
//! ## Precision
//!
//! [`to_local`] corrects the north-south axis with the Mercator scale
//! averaged over the latitude span between origin and point. [`to_geo`]
//! only uses the origin's scale, so `to_geo(to_local(p))` is approximate:
//! the error grows with distance from the origin. It is negligible at city
//! scale and noticeable at country scale. Stored surfaces and containment
//! tests are calibrated against this behaviour, so do not "fix" one side
//! without the other.

use std::sync::RwLock;

use rustc_hash::FxHashMap;

use crate::geo::{GeoPoint, LocalPoint};

/// Mean Earth radius in meters (IUGG)
pub const EARTH_RADIUS: f64 = 6_371_008.8;

pub const DEG2RAD: f64 = std::f64::consts::PI / 180.0;
pub const RAD2DEG: f64 = 180.0 / std::f64::consts::PI;

/// Latitudes are bucketed to this many steps per degree (3 decimals)
const SCALE_BUCKETS_PER_DEGREE: f64 = 1000.0;

#[inline]
fn scale_bucket(latitude: f64) -> f64 {
    (latitude * SCALE_BUCKETS_PER_DEGREE).round()
}

/// Mercator distortion `1 / cos(lat)` at `latitude` rounded to 3 decimals
#[inline]
pub fn mercator_scale(latitude: f64) -> f64 {
    let rounded = scale_bucket(latitude) / SCALE_BUCKETS_PER_DEGREE;
    1.0 / (rounded * DEG2RAD).cos()
}

/// Memo of [`mercator_scale`] keyed by rounded latitude.
///
/// Insert-once / read-many. Concurrent first insertions of the same key
/// compute the same value, so racing writers are harmless. Share it by
/// reference between threads.
#[derive(Debug, Default)]
pub struct MercatorScaleCache {
    scales: RwLock<FxHashMap<i64, f64>>,
}

impl MercatorScaleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached equivalent of [`mercator_scale`]
    pub fn scale(&self, latitude: f64) -> f64 {
        if !latitude.is_finite() {
            return mercator_scale(latitude);
        }
        let key = scale_bucket(latitude) as i64;

        if let Some(&scale) = self
            .scales
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&key)
        {
            return scale;
        }

        let scale = mercator_scale(latitude);
        self.scales
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entry(key)
            .or_insert(scale);
        scale
    }

    /// Number of distinct latitude buckets computed so far
    pub fn len(&self) -> usize {
        self.scales
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.scales
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

/// Sampling intervals for a full pole-to-pole span
pub const MAX_AVERAGING_STEPS: usize = 18_001;

/// Mean Mercator scale sampled between two latitudes.
///
/// Uses `floor(|Δlat| * 100) + 1` intervals, endpoints included, capped at
/// [`MAX_AVERAGING_STEPS`] so out-of-range latitudes stay cheap.
pub fn average_mercator_scale(from_lat: f64, to_lat: f64, scale: impl Fn(f64) -> f64) -> f64 {
    let span = to_lat - from_lat;
    if !span.is_finite() {
        return f64::NAN;
    }

    let steps = ((span.abs() * 100.0).floor() as usize)
        .saturating_add(1)
        .min(MAX_AVERAGING_STEPS);
    let sum: f64 = (0..=steps)
        .map(|i| scale(from_lat + span * i as f64 / steps as f64))
        .sum();
    sum / (steps + 1) as f64
}

fn to_local_impl(point: &GeoPoint, origin: &GeoPoint, scale: impl Fn(f64) -> f64) -> LocalPoint {
    let origin_lat_rad = origin.latitude * DEG2RAD;

    let x = (point.longitude - origin.longitude) * DEG2RAD * EARTH_RADIUS * origin_lat_rad.cos();
    let y = point.altitude_or_zero() - origin.altitude_or_zero();

    let avg_scale = average_mercator_scale(origin.latitude, point.latitude, &scale);
    let d_lat_rad = (point.latitude - origin.latitude) * DEG2RAD;
    let z = -d_lat_rad * EARTH_RADIUS / scale(origin.latitude) * avg_scale;

    [x, y, z]
}

/// Convert a geographic point to meters relative to `origin`
pub fn to_local(point: &GeoPoint, origin: &GeoPoint) -> LocalPoint {
    to_local_impl(point, origin, mercator_scale)
}

/// [`to_local`] reading Mercator scales through `cache`
pub fn to_local_with_cache(
    point: &GeoPoint,
    origin: &GeoPoint,
    cache: &MercatorScaleCache,
) -> LocalPoint {
    to_local_impl(point, origin, |lat| cache.scale(lat))
}

/// Convert local meters back to geographic coordinates.
///
/// Uses only the origin's Mercator scale; see the module docs for the
/// resulting round-trip error.
pub fn to_geo(local: &LocalPoint, origin: &GeoPoint) -> GeoPoint {
    let [x, y, z] = *local;
    let origin_lat_rad = origin.latitude * DEG2RAD;

    let latitude = origin.latitude + (-z / EARTH_RADIUS) * RAD2DEG;
    let longitude = origin.longitude + (x / EARTH_RADIUS) * RAD2DEG / origin_lat_rad.cos();
    let altitude = origin.altitude_or_zero() + y;

    GeoPoint::with_altitude(longitude, latitude, altitude)
}
