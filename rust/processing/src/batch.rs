// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parallel batch operations over many volumes or many points.

use std::time::Instant;

use rayon::prelude::*;

use geofence_core::{to_local_with_cache, GeoPoint, GeoTriangle, LocalPoint, MercatorScaleCache};
use geofence_geometry::{
    encode, validate, Containment, ContainmentOptions, LocalVolume, TriangleMesh,
    ValidationReport,
};

use crate::{Config, Error, Result};

/// Runs geofence operations on a dedicated worker pool
pub struct BatchProcessor {
    config: Config,
    pool: rayon::ThreadPool,
    scale_cache: MercatorScaleCache,
}

impl BatchProcessor {
    pub fn new(config: Config) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .thread_name(|i| format!("geofence-worker-{}", i))
            .build()?;

        tracing::debug!(worker_threads = config.worker_threads, "Batch worker pool ready");

        Ok(Self {
            config,
            pool,
            scale_cache: MercatorScaleCache::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mercator scales memoized by coordinate batches so far
    pub fn scale_cache(&self) -> &MercatorScaleCache {
        &self.scale_cache
    }

    fn containment_options(&self) -> ContainmentOptions {
        ContainmentOptions {
            boundary_tolerance: self.config.boundary_tolerance,
            ..Default::default()
        }
    }

    /// Validate every mesh; reports keep input order
    pub fn validate_all<M: TriangleMesh + Sync>(&self, meshes: &[M]) -> Vec<ValidationReport> {
        let start = Instant::now();
        tracing::info!(count = meshes.len(), "Validating meshes");

        let tolerance = self.config.validation_tolerance;
        let reports: Vec<ValidationReport> = self.pool.install(|| {
            meshes
                .par_iter()
                .enumerate()
                .map(|(i, mesh)| {
                    let report = validate(mesh, tolerance);
                    if !report.is_valid {
                        tracing::debug!(
                            index = i,
                            errors = report.errors.len(),
                            "Mesh failed validation"
                        );
                    }
                    report
                })
                .collect()
        });

        let invalid = reports.iter().filter(|r| !r.is_valid).count();
        tracing::info!(
            count = reports.len(),
            invalid,
            elapsed_ms = start.elapsed().as_millis(),
            "Validation complete"
        );
        reports
    }

    /// Classify local-space points against one volume
    pub fn classify_points(&self, volume: &LocalVolume, points: &[LocalPoint]) -> Vec<Containment> {
        let start = Instant::now();
        let options = self.containment_options();

        let results: Vec<Containment> = self.pool.install(|| {
            points
                .par_iter()
                .map(|point| volume.classify_with(point, &options))
                .collect()
        });

        tracing::info!(
            count = results.len(),
            inside = results.iter().filter(|c| c.inside).count(),
            elapsed_ms = start.elapsed().as_millis(),
            "Classified points"
        );
        results
    }

    /// Classify geographic coordinates against a volume placed at `origin`.
    ///
    /// Workers share the processor's Mercator scale cache.
    pub fn classify_coords(
        &self,
        volume: &LocalVolume,
        coords: &[GeoPoint],
        origin: &GeoPoint,
    ) -> Vec<Containment> {
        let start = Instant::now();
        let options = self.containment_options();
        let cache = &self.scale_cache;

        let results: Vec<Containment> = self.pool.install(|| {
            coords
                .par_iter()
                .map(|coord| {
                    let local = to_local_with_cache(coord, origin, cache);
                    volume.classify_with(&local, &options)
                })
                .collect()
        });

        tracing::info!(
            count = results.len(),
            inside = results.iter().filter(|c| c.inside).count(),
            cached_scales = cache.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Classified coordinates"
        );
        results
    }

    /// Encode each triangle list with the configured precision
    pub fn encode_all(&self, surfaces: &[Vec<GeoTriangle>]) -> Vec<Result<String>> {
        let start = Instant::now();
        let precision = self.config.precision;

        let encoded: Vec<Result<String>> = self.pool.install(|| {
            surfaces
                .par_iter()
                .enumerate()
                .map(|(i, triangles)| {
                    let result = encode(triangles, precision).map_err(Error::from);
                    if let Err(e) = &result {
                        tracing::debug!(index = i, error = %e, "Surface encoding failed");
                    }
                    result
                })
                .collect()
        });

        tracing::info!(
            count = encoded.len(),
            failed = encoded.iter().filter(|r| r.is_err()).count(),
            elapsed_ms = start.elapsed().as_millis(),
            "Encoded surfaces"
        );
        encoded
    }
}
