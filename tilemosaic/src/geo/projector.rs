//! Extent projection into a schema's native spatial reference.
//!
//! Projection mathematics live behind the [`Reprojector`] trait; the host
//! supplies an implementation backed by whatever reprojection engine it
//! has. [`ExtentProjector`] adds the cheap short-circuit for identical
//! references and input validation, so the engine is only consulted when a
//! real transformation is needed.

use super::{Extent, SpatialRef};
use thiserror::Error;

/// Errors raised while projecting a view extent.
///
/// Any of these is fatal to the whole render call: without a correctly
/// projected extent no tile can be placed.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// The input extent has zero or negative span on an axis.
    #[error("extent {0} is degenerate (min must be < max on both axes)")]
    DegenerateExtent(Extent),

    /// The reprojection engine does not understand one of the references.
    #[error("unsupported spatial reference: {code}")]
    Unsupported { code: String },

    /// The reprojection engine failed for a supported reference pair.
    #[error("reprojection from {source_ref} to {target_ref} failed: {reason}")]
    EngineFailure {
        source_ref: String,
        target_ref: String,
        reason: String,
    },
}

/// External reprojection capability.
///
/// Implementations transform geometry between spatial references. The
/// library never implements projection math itself; hosts wire in a real
/// engine (or a restricted one that only knows the pairs they need).
pub trait Reprojector: Send + Sync {
    /// Project `extent` from `source` into `target`.
    ///
    /// Called only when `source` and `target` differ; implementations do
    /// not need to handle the identity case.
    fn project_extent(
        &self,
        extent: &Extent,
        source: &SpatialRef,
        target: &SpatialRef,
    ) -> Result<Extent, ProjectionError>;
}

/// Projects view extents into a schema's native reference.
pub struct ExtentProjector<R> {
    reprojector: R,
}

impl<R: Reprojector> ExtentProjector<R> {
    /// Create a projector delegating to the given reprojection engine.
    pub fn new(reprojector: R) -> Self {
        Self { reprojector }
    }

    /// Project `extent` from `source` into `target`.
    ///
    /// Identical reference codes return the input unchanged without
    /// consulting the engine.
    ///
    /// # Errors
    ///
    /// [`ProjectionError::DegenerateExtent`] for empty input,
    /// [`ProjectionError::Unsupported`] / [`ProjectionError::EngineFailure`]
    /// when the engine rejects the pair.
    pub fn project(
        &self,
        extent: &Extent,
        source: &SpatialRef,
        target: &SpatialRef,
    ) -> Result<Extent, ProjectionError> {
        if extent.is_degenerate() {
            return Err(ProjectionError::DegenerateExtent(*extent));
        }

        if source == target {
            return Ok(*extent);
        }

        self.reprojector.project_extent(extent, source, target)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Reprojector that counts invocations and shifts x by a fixed amount.
    pub struct ShiftReprojector {
        pub shift_x: f64,
        pub calls: AtomicUsize,
    }

    impl ShiftReprojector {
        pub fn new(shift_x: f64) -> Self {
            Self {
                shift_x,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Reprojector for ShiftReprojector {
        fn project_extent(
            &self,
            extent: &Extent,
            _source: &SpatialRef,
            _target: &SpatialRef,
        ) -> Result<Extent, ProjectionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Extent::new(
                extent.min_x() + self.shift_x,
                extent.min_y(),
                extent.max_x() + self.shift_x,
                extent.max_y(),
            ))
        }
    }

    /// Reprojector that rejects everything.
    pub struct RejectingReprojector;

    impl Reprojector for RejectingReprojector {
        fn project_extent(
            &self,
            _extent: &Extent,
            source: &SpatialRef,
            _target: &SpatialRef,
        ) -> Result<Extent, ProjectionError> {
            Err(ProjectionError::Unsupported {
                code: source.code().to_string(),
            })
        }
    }

    #[test]
    fn test_identical_refs_short_circuit() {
        let projector = ExtentProjector::new(ShiftReprojector::new(100.0));
        let extent = Extent::new(0.0, 0.0, 10.0, 10.0);

        let result = projector
            .project(&extent, &SpatialRef::web_mercator(), &SpatialRef::web_mercator())
            .unwrap();

        assert_eq!(result, extent);
        assert_eq!(projector.reprojector.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_differing_refs_delegate() {
        let projector = ExtentProjector::new(ShiftReprojector::new(100.0));
        let extent = Extent::new(0.0, 0.0, 10.0, 10.0);

        let result = projector
            .project(&extent, &SpatialRef::wgs84(), &SpatialRef::web_mercator())
            .unwrap();

        assert_eq!(result.min_x(), 100.0);
        assert_eq!(result.max_x(), 110.0);
        assert_eq!(projector.reprojector.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_degenerate_extent_rejected() {
        let projector = ExtentProjector::new(ShiftReprojector::new(0.0));
        let extent = Extent::new(10.0, 0.0, 10.0, 10.0);

        let result = projector.project(&extent, &SpatialRef::wgs84(), &SpatialRef::web_mercator());
        assert!(matches!(result, Err(ProjectionError::DegenerateExtent(_))));
    }

    #[test]
    fn test_unsupported_reference_surfaces() {
        let projector = ExtentProjector::new(RejectingReprojector);
        let extent = Extent::new(0.0, 0.0, 10.0, 10.0);

        let result = projector.project(
            &extent,
            &SpatialRef::new("EPSG:99999"),
            &SpatialRef::web_mercator(),
        );

        match result {
            Err(ProjectionError::Unsupported { code }) => assert_eq!(code, "EPSG:99999"),
            other => panic!("expected Unsupported, got {:?}", other),
        }
    }

    #[test]
    fn test_legacy_mercator_is_distinct() {
        // The legacy ESRI code must not short-circuit against EPSG:3857;
        // whether they are interchangeable is the engine's call.
        let projector = ExtentProjector::new(ShiftReprojector::new(0.0));
        let extent = Extent::new(0.0, 0.0, 1.0, 1.0);

        projector
            .project(
                &extent,
                &SpatialRef::web_mercator_legacy(),
                &SpatialRef::web_mercator(),
            )
            .unwrap();

        assert_eq!(projector.reprojector.calls.load(Ordering::SeqCst), 1);
    }
}
