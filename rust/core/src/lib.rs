// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Geofence-Lite Core
//!
//! Geographic value types, local-frame projection and the
//! `POLYHEDRALSURFACE` text format (parsed with [nom](https://docs.rs/nom))
//! used to store 3D geofence volumes in a spatial database.
//!
//! ## Overview
//!
//! - **Coordinates**: [`GeoPoint`], [`GeoVertex`], [`GeoTriangle`] and
//!   [`LocalPoint`] (meters, +X east, +Y up, +Z south)
//! - **Projection**: [`to_local`] / [`to_geo`] around an explicit origin,
//!   with an injectable [`MercatorScaleCache`]
//! - **Surface text**: [`parse_polyhedral_surface`] and
//!   [`write_polyhedral_surface`]
//!
//! ## Quick Start
//!
//! ```rust
//! use geofence_core::{to_local, to_geo, GeoPoint};
//!
//! let origin = GeoPoint::new(-0.1278, 51.5074);
//! let local = to_local(&GeoPoint::with_altitude(-0.1270, 51.5080, 15.0), &origin);
//! let back = to_geo(&local, &origin);
//! assert!((back.longitude - -0.1270).abs() < 1e-9);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Serialize/deserialize the coordinate types (JSON triangle lists)

pub mod error;
pub mod geo;
pub mod projection;
pub mod wkt;

pub use error::{Error, Result};
pub use geo::{GeoPoint, GeoTriangle, GeoVertex, LocalPoint};
pub use projection::{
    average_mercator_scale, mercator_scale, to_geo, to_local, to_local_with_cache,
    MercatorScaleCache, DEG2RAD, EARTH_RADIUS, MAX_AVERAGING_STEPS, RAD2DEG,
};
pub use wkt::{
    parse_polyhedral_surface, write_polyhedral_surface, Dimension, PolyhedralSurface,
    DEFAULT_PRECISION, MAX_PRECISION, MIN_RING_TOKENS, RING_CLOSURE_TOLERANCE,
};
