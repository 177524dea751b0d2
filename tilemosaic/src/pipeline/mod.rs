//! The render pipeline.
//!
//! One [`Pipeline::render`] call runs the full extent-to-mosaic sequence:
//!
//! 1. **Resolve** the layer into its schema and request builder, and root
//!    the file cache at the layer's subdirectory.
//! 2. **Project** the view extent into the schema's native reference and
//!    record, once, whether presentation needs display reprojection.
//! 3. **Plan** the ground resolution, the nearest level and the row-major
//!    tile set.
//! 4. **Acquire** every planned tile: cache hit, or fetch, cache, and
//!    georeference. Acquisitions for independent tiles run concurrently
//!    under a bounded limit.
//! 5. **Present** ready tiles to the rendering collaborator strictly in
//!    enumeration order, buffering out-of-order completions, so
//!    overlapping tile edges composite deterministically.
//!
//! Tile-scoped failures degrade the call to a partial mosaic and are
//! reported, never raised; only projection and schema failures abort.
//!
//! All per-call state lives in a session value owned by the call itself,
//! so concurrent renders (same layer or not) share nothing but the cache
//! directory.

mod report;

pub use report::{RenderReport, SkipReason, SkippedTile};

use crate::cache::FileCache;
use crate::fetch::{FetchError, RetryPolicy, TileFetcher};
use crate::geo::{
    ground_resolution, Extent, ExtentProjector, ProjectionError, Reprojector, SpatialRef,
    ViewTransform,
};
use crate::georef;
use crate::provider::{LayerConfig, RequestBuilder, SchemaProvider};
use crate::schema::{select_level, SchemaError, TiePolicy, TilingSchema};
use crate::tile::{tiles_in_view, TileInfo, TileKey};

use bytes::Bytes;
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Default bound on concurrent tile acquisitions.
const DEFAULT_CONCURRENCY: usize = 8;

/// Fatal errors for a render call.
///
/// Everything here invalidates the whole view: tiles cannot be placed
/// without a projected extent, and a broken schema has no usable levels.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("projection failed: {0}")]
    Projection(#[from] ProjectionError),

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("view has zero pixel dimensions ({width}x{height})")]
    EmptyView { width: u32, height: u32 },
}

/// The rendering collaborator refused a tile.
#[derive(Debug, Error)]
#[error("rendering surface rejected tile: {0}")]
pub struct SurfaceError(pub String);

/// A cached, georeferenced tile ready for compositing.
#[derive(Debug, Clone)]
pub struct ReadyTile {
    pub key: TileKey,
    /// Path of the cached raster; sidecars sit next to it.
    pub path: PathBuf,
    /// The raster's native spatial reference.
    pub native_ref: SpatialRef,
    /// The view's display spatial reference.
    pub display_ref: SpatialRef,
    /// True when the collaborator must reproject before painting.
    /// Derived once per render call, not per tile.
    pub needs_reproject: bool,
    /// True when the tile came straight from the disk cache.
    pub from_cache: bool,
}

/// External rendering collaborator.
///
/// Receives ready tiles strictly in enumeration order. When
/// `needs_reproject` is set the collaborator resamples the raster into
/// the display reference before painting; that machinery lives with the
/// host, not here.
pub trait RasterRenderer {
    /// Composite one ready tile onto the display surface.
    fn draw_raster(&mut self, tile: &ReadyTile) -> Result<(), SurfaceError>;
}

/// Tuning for a pipeline instance.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root directory under which each layer gets its cache subdirectory.
    pub cache_root: PathBuf,
    /// Bound on concurrent tile acquisitions.
    pub concurrency: usize,
    /// Retry policy for transient fetch failures, applied per tile.
    pub retry: RetryPolicy,
    /// Tie-break direction for nearest-level selection.
    pub tie_policy: TiePolicy,
}

impl PipelineConfig {
    /// Config with defaults, caching under `cache_root`.
    pub fn new(cache_root: impl Into<PathBuf>) -> Self {
        Self {
            cache_root: cache_root.into(),
            concurrency: DEFAULT_CONCURRENCY,
            retry: RetryPolicy::default(),
            tie_policy: TiePolicy::default(),
        }
    }

    /// Set the acquisition concurrency bound.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the per-tile retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the level-selection tie policy.
    pub fn with_tie_policy(mut self, tie_policy: TiePolicy) -> Self {
        self.tie_policy = tie_policy;
        self
    }
}

/// One requested view of a layer.
#[derive(Debug, Clone)]
pub struct ViewRequest {
    /// Layer identifier, resolved through the schema provider.
    pub layer: String,
    /// Requested ground extent, in the display reference.
    pub extent: Extent,
    /// The view's working spatial reference.
    pub display_ref: SpatialRef,
    /// View width in pixels.
    pub width_px: u32,
    /// View height in pixels.
    pub height_px: u32,
}

/// Per-call state: resolved schema, cache handle, and the reprojection
/// flag. Owned by the render call, discarded when it returns.
struct RenderSession {
    schema: TilingSchema,
    request_builder: Arc<dyn RequestBuilder>,
    cache: FileCache,
    display_ref: SpatialRef,
    needs_reproject: bool,
}

struct Acquired {
    path: PathBuf,
    from_cache: bool,
}

struct TileOutcome {
    key: TileKey,
    result: Result<Acquired, SkipReason>,
}

/// Composes schema resolution, projection, planning, acquisition and
/// presentation into single render calls.
///
/// A pipeline holds only collaborators and tuning; every render call
/// builds its own session, so one pipeline value can serve concurrent
/// calls.
pub struct Pipeline<P, R, F> {
    provider: P,
    projector: ExtentProjector<R>,
    fetcher: F,
    config: PipelineConfig,
}

impl<P, R, F> Pipeline<P, R, F>
where
    P: SchemaProvider,
    R: Reprojector,
    F: TileFetcher,
{
    /// Create a pipeline from its collaborators.
    pub fn new(provider: P, reprojector: R, fetcher: F, config: PipelineConfig) -> Self {
        Self {
            provider,
            projector: ExtentProjector::new(reprojector),
            fetcher,
            config,
        }
    }

    /// Render `view`, presenting ready tiles to `renderer`.
    pub async fn render(
        &self,
        view: &ViewRequest,
        renderer: &mut impl RasterRenderer,
    ) -> Result<RenderReport, RenderError> {
        self.render_with_cancel(view, renderer, &CancellationToken::new())
            .await
    }

    /// Render `view` under a cancellation token.
    ///
    /// Once `cancel` fires, no new fetches are issued; tiles not yet
    /// acquired are reported skipped, while in-flight work completes or
    /// is dropped without blocking shutdown.
    ///
    /// # Errors
    ///
    /// Only extent- or schema-level failures abort the call. Per-tile
    /// failures degrade the result to a partial mosaic, recorded in the
    /// returned [`RenderReport`].
    pub async fn render_with_cancel(
        &self,
        view: &ViewRequest,
        renderer: &mut impl RasterRenderer,
        cancel: &CancellationToken,
    ) -> Result<RenderReport, RenderError> {
        // Resolve
        let LayerConfig {
            schema,
            request_builder,
        } = self.provider.layer_config(&view.layer)?;
        let cache = FileCache::new(self.config.cache_root.join(&view.layer), schema.format());

        // Project
        let needs_reproject = view.display_ref != *schema.srs();
        let projected =
            self.projector
                .project(&view.extent, &view.display_ref, schema.srs())?;

        // Plan
        if view.width_px == 0 || view.height_px == 0 {
            return Err(RenderError::EmptyView {
                width: view.width_px,
                height: view.height_px,
            });
        }
        let resolution = ground_resolution(&projected, view.width_px);
        let transform =
            ViewTransform::new(projected.center(), resolution, view.width_px, view.height_px);
        let level = select_level(schema.resolutions(), transform.resolution(), self.config.tie_policy)?;
        let plan = tiles_in_view(&schema, &transform.extent(), level)?;

        info!(
            layer = %view.layer,
            level,
            tiles = plan.len(),
            needs_reproject,
            resolution,
            "render plan ready"
        );

        let session = RenderSession {
            schema,
            request_builder,
            cache,
            display_ref: view.display_ref.clone(),
            needs_reproject,
        };

        let mut report = RenderReport::new(plan.len(), level, needs_reproject);

        // Acquire concurrently; drain in enumeration order. `buffered`
        // holds out-of-order completions back until their predecessors
        // are ready, which is exactly the presentation contract.
        let session = &session;
        let mut outcomes = stream::iter(plan)
            .map(|tile| self.acquire(session, tile, cancel))
            .buffered(self.config.concurrency.max(1));

        while let Some(outcome) = outcomes.next().await {
            match outcome.result {
                Ok(acquired) => {
                    if acquired.from_cache {
                        report.cache_hits += 1;
                    } else {
                        report.fetched += 1;
                    }
                    let ready = ReadyTile {
                        key: outcome.key,
                        path: acquired.path,
                        native_ref: session.schema.srs().clone(),
                        display_ref: session.display_ref.clone(),
                        needs_reproject: session.needs_reproject,
                        from_cache: acquired.from_cache,
                    };
                    if let Err(e) = renderer.draw_raster(&ready) {
                        warn!(tile = %ready.key, error = %e, "renderer rejected tile");
                        report.draw_failures += 1;
                    }
                }
                Err(reason) => {
                    warn!(tile = %outcome.key, reason = %reason, "tile skipped");
                    report.skipped.push(SkippedTile {
                        key: outcome.key,
                        reason,
                    });
                }
            }
        }

        info!(layer = %view.layer, %report, "render complete");
        Ok(report)
    }

    /// Bring one tile to the Ready state: cache hit, or fetch + cache +
    /// georeference.
    async fn acquire(
        &self,
        session: &RenderSession,
        tile: TileInfo,
        cancel: &CancellationToken,
    ) -> TileOutcome {
        let key = tile.key;

        if cancel.is_cancelled() {
            return TileOutcome {
                key,
                result: Err(SkipReason::Cancelled),
            };
        }

        if session.cache.exists(&key) {
            let path = session.cache.file_name(&key);
            // A previous session may have crashed between the byte-write
            // and the sidecar-writes; re-check independently of the hit.
            if let Err(e) = georef::ensure_sidecars(&path, &tile.extent, &session.schema) {
                warn!(tile = %key, error = %e, "could not heal sidecars for cached tile");
            }
            debug!(tile = %key, "cache hit");
            return TileOutcome {
                key,
                result: Ok(Acquired {
                    path,
                    from_cache: true,
                }),
            };
        }

        let address = session.request_builder.address(&tile);
        let bytes = match self.fetch_with_retry(&address, &key, cancel).await {
            Ok(bytes) => bytes,
            Err(e) => {
                return TileOutcome {
                    key,
                    result: Err(SkipReason::Fetch(e)),
                }
            }
        };

        let path = match session.cache.add(&key, &bytes) {
            Ok(path) => path,
            Err(e) => {
                return TileOutcome {
                    key,
                    result: Err(SkipReason::CacheWrite(e)),
                }
            }
        };

        // Sidecars come after the bytes so a crash never leaves a
        // half-written entry; a missing sidecar heals on the next render.
        if let Err(e) = georef::write_world_file(&path, &tile.extent, &session.schema) {
            warn!(tile = %key, error = %e, "world file write failed");
        }
        if let Err(e) = georef::write_srs_sidecar(&path, session.schema.srs()) {
            warn!(tile = %key, error = %e, "spatial reference sidecar write failed");
        }

        debug!(tile = %key, bytes = bytes.len(), "tile fetched and cached");
        TileOutcome {
            key,
            result: Ok(Acquired {
                path,
                from_cache: false,
            }),
        }
    }

    /// Fetch with bounded retries for transient failures.
    async fn fetch_with_retry(
        &self,
        address: &str,
        key: &TileKey,
        cancel: &CancellationToken,
    ) -> Result<Bytes, FetchError> {
        let mut attempt = 1u32;
        loop {
            match self.fetcher.fetch(address).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) if e.is_transient() => {
                    let Some(delay) = self.config.retry.delay_for_attempt(attempt) else {
                        return Err(e);
                    };
                    if cancel.is_cancelled() {
                        return Err(e);
                    }
                    debug!(
                        tile = %key,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "transient fetch failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ImageFormat;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// 512x512 ground units in Web Mercator codes, 256px png tiles,
    /// levels 2.0 and 1.0.
    fn test_schema() -> TilingSchema {
        TilingSchema::new(
            vec![2.0, 1.0],
            256,
            256,
            ImageFormat::Png,
            SpatialRef::web_mercator(),
            Extent::new(0.0, 0.0, 512.0, 512.0),
        )
        .unwrap()
    }

    struct TemplateProvider;

    impl SchemaProvider for TemplateProvider {
        fn layer_config(&self, layer: &str) -> Result<LayerConfig, SchemaError> {
            if layer != "test" {
                return Err(SchemaError::UnknownLayer(layer.to_string()));
            }
            Ok(LayerConfig {
                schema: test_schema(),
                request_builder: Arc::new(crate::provider::UrlTemplateBuilder::new(
                    "tile://{z}/{y}/{x}",
                )),
            })
        }
    }

    /// Reprojector the pipeline must never call in same-reference tests.
    struct UnsupportedReprojector;

    impl Reprojector for UnsupportedReprojector {
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

    /// Scripted fetcher: pops one response per call, per address.
    struct ScriptedFetcher {
        responses: Mutex<VecDeque<Result<Vec<u8>, FetchError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedFetcher {
        fn new(responses: Vec<Result<Vec<u8>, FetchError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
            }
        }

        fn always_ok() -> Self {
            Self {
                responses: Mutex::new(VecDeque::new()),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TileFetcher for ScriptedFetcher {
        async fn fetch(&self, address: &str) -> Result<Bytes, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let scripted = self.responses.lock().unwrap().pop_front();
            match scripted {
                Some(result) => result.map(Bytes::from),
                None => Ok(Bytes::from(format!("payload:{}", address).into_bytes())),
            }
        }
    }

    /// Renderer collecting presentation order.
    #[derive(Default)]
    struct CollectingRenderer {
        drawn: Vec<TileKey>,
        fail_on: Option<TileKey>,
    }

    impl RasterRenderer for CollectingRenderer {
        fn draw_raster(&mut self, tile: &ReadyTile) -> Result<(), SurfaceError> {
            if self.fail_on == Some(tile.key) {
                return Err(SurfaceError("surface full".to_string()));
            }
            self.drawn.push(tile.key);
            Ok(())
        }
    }

    fn full_view() -> ViewRequest {
        ViewRequest {
            layer: "test".to_string(),
            extent: Extent::new(0.0, 0.0, 512.0, 512.0),
            display_ref: SpatialRef::web_mercator(),
            width_px: 512,
            height_px: 512,
        }
    }

    fn pipeline_in(
        dir: &TempDir,
        fetcher: ScriptedFetcher,
    ) -> Pipeline<TemplateProvider, UnsupportedReprojector, ScriptedFetcher> {
        Pipeline::new(
            TemplateProvider,
            UnsupportedReprojector,
            fetcher,
            PipelineConfig::new(dir.path()).with_retry(RetryPolicy::None),
        )
    }

    #[tokio::test]
    async fn test_render_presents_in_enumeration_order() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline_in(&dir, ScriptedFetcher::always_ok());
        let mut renderer = CollectingRenderer::default();

        let report = pipeline.render(&full_view(), &mut renderer).await.unwrap();

        assert_eq!(report.planned, 4);
        assert_eq!(report.fetched, 4);
        assert!(report.is_complete());
        // Row-major over the 2x2 grid at level 1.
        assert_eq!(
            renderer.drawn,
            vec![
                TileKey::new(1, 0, 0),
                TileKey::new(1, 0, 1),
                TileKey::new(1, 1, 0),
                TileKey::new(1, 1, 1),
            ]
        );
    }

    #[tokio::test]
    async fn test_render_writes_cache_and_sidecars() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline_in(&dir, ScriptedFetcher::always_ok());
        let mut renderer = CollectingRenderer::default();

        pipeline.render(&full_view(), &mut renderer).await.unwrap();

        let tile = dir.path().join("test/1/0/1_0_0.png");
        assert!(tile.is_file());
        assert!(tile.with_extension("pgw").is_file());
        assert!(dir.path().join("test/1/0/1_0_0.png.aux.xml").is_file());
    }

    #[tokio::test]
    async fn test_second_render_hits_cache() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline_in(&dir, ScriptedFetcher::always_ok());
        let mut renderer = CollectingRenderer::default();

        let first = pipeline.render(&full_view(), &mut renderer).await.unwrap();
        assert_eq!(first.fetched, 4);
        let calls_after_first = pipeline.fetcher.call_count();

        let second = pipeline.render(&full_view(), &mut renderer).await.unwrap();
        assert_eq!(second.cache_hits, 4);
        assert_eq!(second.fetched, 0);
        assert_eq!(pipeline.fetcher.call_count(), calls_after_first);
    }

    #[tokio::test]
    async fn test_permanent_failure_skips_only_that_tile() {
        let dir = TempDir::new().unwrap();
        // First fetched tile fails permanently, the rest succeed.
        let fetcher = ScriptedFetcher::new(vec![Err(FetchError::permanent(
            "tile://1/0/0",
            "HTTP 404",
        ))]);
        let pipeline = Pipeline::new(
            TemplateProvider,
            UnsupportedReprojector,
            fetcher,
            PipelineConfig::new(dir.path())
                .with_concurrency(1)
                .with_retry(RetryPolicy::None),
        );
        let mut renderer = CollectingRenderer::default();

        let report = pipeline.render(&full_view(), &mut renderer).await.unwrap();

        assert_eq!(report.planned, 4);
        assert_eq!(report.ready(), 3);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].key, TileKey::new(1, 0, 0));
        assert!(matches!(
            report.skipped[0].reason,
            SkipReason::Fetch(FetchError::Permanent { .. })
        ));
        assert_eq!(renderer.drawn.len(), 3);
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried() {
        let dir = TempDir::new().unwrap();
        let fetcher = ScriptedFetcher::new(vec![
            Err(FetchError::transient("tile://1/0/0", "timeout")),
            Ok(b"recovered".to_vec()),
        ]);
        let pipeline = Pipeline::new(
            TemplateProvider,
            UnsupportedReprojector,
            fetcher,
            PipelineConfig::new(dir.path())
                .with_concurrency(1)
                .with_retry(RetryPolicy::fixed(2, std::time::Duration::from_millis(1))),
        );
        let mut renderer = CollectingRenderer::default();

        let report = pipeline.render(&full_view(), &mut renderer).await.unwrap();

        assert!(report.is_complete());
        // 1 failed attempt + 1 retry + 3 remaining tiles.
        assert_eq!(pipeline.fetcher.call_count(), 5);
    }

    #[tokio::test]
    async fn test_retry_budget_exhaustion_skips() {
        let dir = TempDir::new().unwrap();
        let fetcher = ScriptedFetcher::new(vec![
            Err(FetchError::transient("tile://1/0/0", "timeout")),
            Err(FetchError::transient("tile://1/0/0", "timeout")),
        ]);
        let pipeline = Pipeline::new(
            TemplateProvider,
            UnsupportedReprojector,
            fetcher,
            PipelineConfig::new(dir.path())
                .with_concurrency(1)
                .with_retry(RetryPolicy::fixed(2, std::time::Duration::from_millis(1))),
        );
        let mut renderer = CollectingRenderer::default();

        let report = pipeline.render(&full_view(), &mut renderer).await.unwrap();

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.ready(), 3);
    }

    #[tokio::test]
    async fn test_cancelled_token_skips_everything() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline_in(&dir, ScriptedFetcher::always_ok());
        let mut renderer = CollectingRenderer::default();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let report = pipeline
            .render_with_cancel(&full_view(), &mut renderer, &cancel)
            .await
            .unwrap();

        assert_eq!(report.ready(), 0);
        assert_eq!(report.skipped.len(), 4);
        assert!(report
            .skipped
            .iter()
            .all(|s| matches!(s.reason, SkipReason::Cancelled)));
        assert_eq!(pipeline.fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_layer_aborts() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline_in(&dir, ScriptedFetcher::always_ok());
        let mut renderer = CollectingRenderer::default();

        let mut view = full_view();
        view.layer = "nope".to_string();

        let result = pipeline.render(&view, &mut renderer).await;
        assert!(matches!(
            result,
            Err(RenderError::Schema(SchemaError::UnknownLayer(_)))
        ));
    }

    #[tokio::test]
    async fn test_degenerate_extent_aborts() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline_in(&dir, ScriptedFetcher::always_ok());
        let mut renderer = CollectingRenderer::default();

        let mut view = full_view();
        view.extent = Extent::new(10.0, 0.0, 10.0, 512.0);

        let result = pipeline.render(&view, &mut renderer).await;
        assert!(matches!(
            result,
            Err(RenderError::Projection(ProjectionError::DegenerateExtent(_)))
        ));
    }

    #[tokio::test]
    async fn test_draw_failure_is_tile_scoped() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline_in(&dir, ScriptedFetcher::always_ok());
        let mut renderer = CollectingRenderer {
            fail_on: Some(TileKey::new(1, 0, 1)),
            ..Default::default()
        };

        let report = pipeline.render(&full_view(), &mut renderer).await.unwrap();

        assert_eq!(report.draw_failures, 1);
        assert_eq!(renderer.drawn.len(), 3);
        assert_eq!(report.ready(), 4);
    }

    #[tokio::test]
    async fn test_same_reference_never_touches_reprojector() {
        // UnsupportedReprojector errors on any call; identical display and
        // native references must short-circuit around it.
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline_in(&dir, ScriptedFetcher::always_ok());
        let mut renderer = CollectingRenderer::default();

        let report = pipeline.render(&full_view(), &mut renderer).await.unwrap();
        assert!(!report.needs_reproject);
    }

    #[tokio::test]
    async fn test_differing_reference_sets_flag_or_aborts() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline_in(&dir, ScriptedFetcher::always_ok());
        let mut renderer = CollectingRenderer::default();

        let mut view = full_view();
        view.display_ref = SpatialRef::wgs84();

        // The test reprojector supports nothing, so this surfaces as a
        // fatal projection error, as the contract requires.
        let result = pipeline.render(&view, &mut renderer).await;
        assert!(matches!(
            result,
            Err(RenderError::Projection(ProjectionError::Unsupported { .. }))
        ));
    }
}
