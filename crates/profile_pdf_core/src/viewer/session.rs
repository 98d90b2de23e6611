//! crates/profile_pdf_core/src/viewer/session.rs
//!
//! The render session: one open viewer instance. Owns the decoded document,
//! the current page/zoom, the interaction guard, and the single-flight render
//! invariant. The original shipped two near-identical viewers; this is the
//! unified abstraction, configured through `ViewerOptions`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use image::{Rgba, RgbaImage};
use lopdf::{Document, Object};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::ports::AssetSource;

use super::guard::{InteractionGuard, SuppressionRegistry};
use super::keymap::{command_for, NavKey, ViewerCommand};
use super::watermark::{self, WatermarkOptions};

/// Fallback page size in PDF points when a page carries no MediaBox.
const LETTER_POINTS: (f64, f64) = (612.0, 792.0);
/// Rows filled per cooperative cancellation check during surface rendering.
const RENDER_BAND_ROWS: u32 = 64;
/// How far up the page tree to look for an inherited MediaBox.
const MEDIA_BOX_SEARCH_DEPTH: usize = 16;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

//=========================================================================================
// Errors and State
//=========================================================================================

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// The availability gate said no; the admin has not uploaded a document.
    #[error("document is not available: {0}")]
    Unavailable(String),

    /// The initial load exceeded its bound. Per-page renders are not timed;
    /// they are bounded naturally by cancellation on the next navigation.
    #[error("timed out loading the document")]
    Timeout,

    #[error("failed to load document: {0}")]
    Load(String),

    #[error("failed to render page: {0}")]
    Render(String),

    /// A newer render superseded this one. Internal; never shown to the user.
    #[error("render cancelled")]
    Cancelled,

    #[error("viewer is closed")]
    Closed,
}

impl ViewerError {
    /// Cancellations are swallowed; everything else reaches the error state.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ViewerError::Cancelled)
    }
}

/// Session lifecycle. `Error` is terminal until an explicit retry via
/// [`RenderSession::open`]; `Closed` is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerState {
    Idle,
    Loading,
    Ready,
    Rendering,
    Error(String),
    Closed,
}

/// Behavioral knobs distinguishing viewer variants.
#[derive(Debug, Clone)]
pub struct ViewerOptions {
    /// Bound on the initial document load.
    pub load_timeout: Duration,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub zoom_step: f32,
    pub watermark: WatermarkOptions,
    /// The plain viewer closes on a background click; the flipbook variant
    /// stays open.
    pub close_on_background_click: bool,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            load_timeout: Duration::from_secs(30),
            min_zoom: 0.5,
            max_zoom: 3.0,
            zoom_step: 0.2,
            watermark: WatermarkOptions::default(),
            close_on_background_click: true,
        }
    }
}

/// One fully rendered page surface.
pub struct PageRender {
    pub page: u32,
    pub zoom: f32,
    pub image: RgbaImage,
    /// Zero when the viewer is running in the degraded no-watermark mode.
    pub watermark_tiles: u32,
}

//=========================================================================================
// RenderSession
//=========================================================================================

pub struct RenderSession {
    source: Arc<dyn AssetSource>,
    options: ViewerOptions,
    registry: SuppressionRegistry,
    state: ViewerState,
    document: Option<Arc<Document>>,
    watermark: Option<Arc<RgbaImage>>,
    page_count: u32,
    current_page: u32,
    zoom: f32,
    /// Token of the in-flight render, if any. Replacing it cancels the old
    /// render; there is never more than one outstanding per session.
    active_render: Option<CancellationToken>,
    /// Monotonic id of the most recently started render. A finished task may
    /// only commit state when its id still matches; anything older lost the
    /// race to a newer navigation, even if it ran to completion first.
    render_generation: u64,
    guard: Option<InteractionGuard>,
}

impl RenderSession {
    pub fn new(
        source: Arc<dyn AssetSource>,
        registry: SuppressionRegistry,
        options: ViewerOptions,
    ) -> Self {
        Self {
            source,
            options,
            registry,
            state: ViewerState::Idle,
            document: None,
            watermark: None,
            page_count: 0,
            current_page: 1,
            zoom: 1.0,
            active_render: None,
            render_generation: 0,
            guard: None,
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Loads the document and transitions `Idle`/`Error` -> `Loading` ->
    /// `Ready`. Calling this from the `Error` state is the retry affordance.
    pub async fn open(&mut self) -> Result<(), ViewerError> {
        if self.state == ViewerState::Closed {
            return Err(ViewerError::Closed);
        }
        self.state = ViewerState::Loading;
        match self.load().await {
            Ok(()) => {
                self.guard = Some(InteractionGuard::engage(&self.registry));
                self.state = ViewerState::Ready;
                Ok(())
            }
            Err(e) => {
                self.state = ViewerState::Error(e.to_string());
                Err(e)
            }
        }
    }

    async fn load(&mut self) -> Result<(), ViewerError> {
        let status = self
            .source
            .simple_status()
            .await
            .map_err(|e| ViewerError::Load(e.to_string()))?;
        if !status.available {
            return Err(ViewerError::Unavailable(
                status
                    .error
                    .unwrap_or_else(|| "the document has not been uploaded".to_string()),
            ));
        }

        // Cache-busting token so a just-replaced document is never served stale.
        let cache_bust = Utc::now().timestamp_millis() as u64;
        let bytes = tokio::time::timeout(
            self.options.load_timeout,
            self.source.fetch_document(cache_bust),
        )
        .await
        .map_err(|_| ViewerError::Timeout)?
        .map_err(|e| ViewerError::Load(e.to_string()))?;

        let document = Document::load_mem(&bytes)
            .map_err(|e| ViewerError::Load(format!("could not decode PDF: {e}")))?;
        let page_count = document.get_pages().len() as u32;
        if page_count == 0 {
            return Err(ViewerError::Load("document has no pages".to_string()));
        }

        // Watermark absence or an undecodable payload degrades silently to
        // rendering without an overlay.
        self.watermark = match self.source.fetch_watermark().await {
            Ok(Some(bytes)) => match image::load_from_memory(&bytes) {
                Ok(decoded) => Some(Arc::new(decoded.to_rgba8())),
                Err(e) => {
                    debug!("watermark not decodable, rendering without overlay: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("watermark fetch failed, rendering without overlay: {e}");
                None
            }
        };

        self.document = Some(Arc::new(document));
        self.page_count = page_count;
        self.current_page = 1;
        Ok(())
    }

    /// Navigates to `page`. Out-of-range values are ignored, not clamped and
    /// not an error.
    pub fn go_to_page(&mut self, page: u32) {
        if page >= 1 && page <= self.page_count {
            self.current_page = page;
        }
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.current_page.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.go_to_page(self.current_page.saturating_sub(1));
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(self.options.min_zoom, self.options.max_zoom);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + self.options.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - self.options.zoom_step);
    }

    /// Applies a key press. Bindings are only live while the session is open.
    pub fn handle_key(&mut self, key: NavKey) {
        if matches!(self.state, ViewerState::Idle | ViewerState::Closed) {
            return;
        }
        match command_for(key) {
            ViewerCommand::PreviousPage => self.previous_page(),
            ViewerCommand::NextPage => self.next_page(),
            ViewerCommand::FirstPage => self.go_to_page(1),
            ViewerCommand::LastPage => self.go_to_page(self.page_count),
            ViewerCommand::Close => self.close(),
        }
    }

    /// A click outside the viewer surface; closes the plain variant only.
    pub fn background_clicked(&mut self) {
        if self.options.close_on_background_click {
            self.close();
        }
    }

    /// Starts rendering the current page at the current zoom, cancelling any
    /// in-flight render. The returned task runs independently so a newer
    /// navigation always wins instead of queueing.
    pub fn begin_render(&mut self) -> Result<RenderTask, ViewerError> {
        if self.state == ViewerState::Closed {
            return Err(ViewerError::Closed);
        }
        let document = self
            .document
            .clone()
            .ok_or_else(|| ViewerError::Render("no document loaded".to_string()))?;

        if let Some(previous) = self.active_render.take() {
            previous.cancel();
        }
        let token = CancellationToken::new();
        self.active_render = Some(token.clone());
        self.render_generation += 1;
        self.state = ViewerState::Rendering;

        Ok(RenderTask {
            document,
            watermark: self.watermark.clone(),
            page: self.current_page,
            zoom: self.zoom,
            watermark_options: self.options.watermark.clone(),
            generation: self.render_generation,
            token,
        })
    }

    /// Commits a finished render's outcome, identified by the task's
    /// generation. Superseded results are dropped whether they were cancelled
    /// in flight or completed before the newer render started; a closed
    /// session ignores everything.
    pub fn finish_render(&mut self, generation: u64, result: &Result<PageRender, ViewerError>) {
        if self.state == ViewerState::Closed {
            return;
        }
        if generation != self.render_generation {
            return;
        }
        match result {
            Ok(_) => {
                self.active_render = None;
                self.state = ViewerState::Ready;
            }
            Err(e) if e.is_cancellation() => {}
            Err(e) => {
                self.active_render = None;
                self.state = ViewerState::Error(e.to_string());
            }
        }
    }

    /// Convenience: render the current page to completion and commit.
    pub async fn render_current(&mut self) -> Result<PageRender, ViewerError> {
        let task = self.begin_render()?;
        let generation = task.generation();
        let result = task.run().await;
        self.finish_render(generation, &result);
        result
    }

    /// Tears the session down: cancels any in-flight render, releases the
    /// document handle, the decoded watermark, and the interaction guard.
    pub fn close(&mut self) {
        if let Some(active) = self.active_render.take() {
            active.cancel();
        }
        self.document = None;
        self.watermark = None;
        self.guard = None;
        self.state = ViewerState::Closed;
    }
}

impl Drop for RenderSession {
    /// Unmount is an implicit close; in-flight work observes the cancelled
    /// token and never commits to a destroyed session.
    fn drop(&mut self) {
        self.close();
    }
}

//=========================================================================================
// RenderTask
//=========================================================================================

/// One in-flight page render. Holds everything it needs by value or `Arc`, so
/// the session stays free to accept new navigation while this runs.
pub struct RenderTask {
    document: Arc<Document>,
    watermark: Option<Arc<RgbaImage>>,
    page: u32,
    zoom: f32,
    watermark_options: WatermarkOptions,
    generation: u64,
    token: CancellationToken,
}

impl RenderTask {
    pub fn page(&self) -> u32 {
        self.page
    }

    /// The identity to pass back to [`RenderSession::finish_render`].
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Renders the page surface and applies the watermark overlay.
    ///
    /// Cancellation is cooperative: the fill loop checks the token between
    /// row bands and yields, so a superseding render stops this one promptly
    /// and nothing is drawn after the cancellation point.
    pub async fn run(self) -> Result<PageRender, ViewerError> {
        let (width_pt, height_pt) = page_size(&self.document, self.page)?;
        let width = ((width_pt * self.zoom as f64).round() as u32).max(1);
        let height = ((height_pt * self.zoom as f64).round() as u32).max(1);

        let mut surface = RgbaImage::new(width, height);
        let mut row = 0;
        while row < height {
            if self.token.is_cancelled() {
                return Err(ViewerError::Cancelled);
            }
            let band_end = (row + RENDER_BAND_ROWS).min(height);
            for y in row..band_end {
                for x in 0..width {
                    surface.put_pixel(x, y, WHITE);
                }
            }
            row = band_end;
            tokio::task::yield_now().await;
        }

        if self.token.is_cancelled() {
            return Err(ViewerError::Cancelled);
        }
        let watermark_tiles = match &self.watermark {
            Some(watermark) => watermark::overlay(&mut surface, watermark, &self.watermark_options),
            None => 0,
        };
        if self.token.is_cancelled() {
            return Err(ViewerError::Cancelled);
        }

        Ok(PageRender {
            page: self.page,
            zoom: self.zoom,
            image: surface,
            watermark_tiles,
        })
    }
}

/// Page dimensions in PDF points, from the page's MediaBox or the nearest
/// ancestor carrying one; Letter when the tree has none.
fn page_size(document: &Document, page: u32) -> Result<(f64, f64), ViewerError> {
    let pages = document.get_pages();
    let page_id = pages
        .get(&page)
        .copied()
        .ok_or_else(|| ViewerError::Render(format!("page {page} is out of range")))?;

    let mut node_id = page_id;
    for _ in 0..MEDIA_BOX_SEARCH_DEPTH {
        let dict = document
            .get_object(node_id)
            .and_then(Object::as_dict)
            .map_err(|e| ViewerError::Render(format!("unreadable page object: {e}")))?;

        if let Ok(media_box) = dict.get(b"MediaBox") {
            let media_box = resolve(document, media_box);
            if let Some(size) = media_box_size(media_box) {
                return Ok(size);
            }
        }

        match dict.get(b"Parent") {
            Ok(Object::Reference(parent_id)) => node_id = *parent_id,
            _ => break,
        }
    }
    Ok(LETTER_POINTS)
}

fn media_box_size(object: &Object) -> Option<(f64, f64)> {
    let values = object.as_array().ok()?;
    if values.len() != 4 {
        return None;
    }
    let corners: Vec<f64> = values.iter().filter_map(number).collect();
    if corners.len() != 4 {
        return None;
    }
    let width = (corners[2] - corners[0]).abs();
    let height = (corners[3] - corners[1]).abs();
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    Some((width, height))
}

fn number(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(value) => Some(*value as f64),
        Object::Real(value) => Some(*value as f64),
        _ => None,
    }
}

fn resolve<'a>(document: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => document.get_object(*id).unwrap_or(object),
        _ => object,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SimpleStatus;
    use crate::ports::{AssetSource, PortResult};
    use super::super::guard::Interaction;
    use async_trait::async_trait;
    use bytes::Bytes;
    use lopdf::{dictionary, Stream};

    /// Builds a real multi-page PDF in memory.
    fn sample_pdf(pages: usize) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut kids: Vec<Object> = Vec::new();
        for _ in 0..pages {
            let content_id = doc.add_object(Stream::new(dictionary! {}, b"BT ET".to_vec()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(page_id.into());
        }
        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("in-memory PDF save");
        bytes
    }

    fn png_watermark() -> Vec<u8> {
        let image = RgbaImage::from_pixel(64, 32, Rgba([0, 0, 128, 255]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut bytes, image::ImageFormat::Png)
            .expect("png encode");
        bytes.into_inner()
    }

    struct FakeSource {
        document: Option<Vec<u8>>,
        watermark: Option<Vec<u8>>,
        fetch_delay: Option<Duration>,
    }

    impl FakeSource {
        fn with_pages(pages: usize) -> Self {
            Self {
                document: Some(sample_pdf(pages)),
                watermark: None,
                fetch_delay: None,
            }
        }
    }

    #[async_trait]
    impl AssetSource for FakeSource {
        async fn simple_status(&self) -> PortResult<SimpleStatus> {
            Ok(match &self.document {
                Some(_) => SimpleStatus {
                    available: true,
                    error: None,
                },
                None => SimpleStatus {
                    available: false,
                    error: None,
                },
            })
        }

        async fn fetch_document(&self, _cache_bust: u64) -> PortResult<Bytes> {
            if let Some(delay) = self.fetch_delay {
                tokio::time::sleep(delay).await;
            }
            self.document
                .clone()
                .map(Bytes::from)
                .ok_or_else(|| crate::ports::PortError::NotFound("document".to_string()))
        }

        async fn fetch_watermark(&self) -> PortResult<Option<Bytes>> {
            Ok(self.watermark.clone().map(Bytes::from))
        }
    }

    fn session_over(source: FakeSource, options: ViewerOptions) -> RenderSession {
        RenderSession::new(Arc::new(source), SuppressionRegistry::new(), options)
    }

    #[tokio::test]
    async fn open_loads_document_and_engages_guard() {
        let registry = SuppressionRegistry::new();
        let mut session = RenderSession::new(
            Arc::new(FakeSource::with_pages(3)),
            registry.clone(),
            ViewerOptions::default(),
        );
        session.open().await.unwrap();

        assert_eq!(session.state(), &ViewerState::Ready);
        assert_eq!(session.page_count(), 3);
        assert_eq!(session.current_page(), 1);
        assert!(registry.is_suppressed(Interaction::ContextMenu));
    }

    #[tokio::test]
    async fn open_is_gated_by_availability() {
        let source = FakeSource {
            document: None,
            watermark: None,
            fetch_delay: None,
        };
        let mut session = session_over(source, ViewerOptions::default());
        let err = session.open().await.unwrap_err();
        assert!(matches!(err, ViewerError::Unavailable(_)));
        assert!(matches!(session.state(), ViewerState::Error(_)));
    }

    #[tokio::test]
    async fn slow_load_times_out() {
        let source = FakeSource {
            fetch_delay: Some(Duration::from_secs(5)),
            ..FakeSource::with_pages(1)
        };
        let options = ViewerOptions {
            load_timeout: Duration::from_millis(20),
            ..ViewerOptions::default()
        };
        let mut session = session_over(source, options);
        let err = session.open().await.unwrap_err();
        assert!(matches!(err, ViewerError::Timeout));
        assert!(matches!(session.state(), ViewerState::Error(_)));
    }

    #[tokio::test]
    async fn error_state_allows_retry() {
        let source = FakeSource {
            document: None,
            watermark: None,
            fetch_delay: None,
        };
        let mut session = session_over(source, ViewerOptions::default());
        assert!(session.open().await.is_err());
        // A retry from the error state goes through the full load again.
        assert!(session.open().await.is_err());
        assert!(matches!(session.state(), ViewerState::Error(_)));
    }

    #[tokio::test]
    async fn out_of_range_navigation_is_ignored() {
        let mut session = session_over(FakeSource::with_pages(3), ViewerOptions::default());
        session.open().await.unwrap();

        session.go_to_page(99);
        assert_eq!(session.current_page(), 1);
        session.go_to_page(0);
        assert_eq!(session.current_page(), 1);

        session.previous_page();
        assert_eq!(session.current_page(), 1);
        session.next_page();
        assert_eq!(session.current_page(), 2);
    }

    #[tokio::test]
    async fn zoom_is_clamped_to_bounds() {
        let mut session = session_over(FakeSource::with_pages(1), ViewerOptions::default());
        session.open().await.unwrap();

        session.set_zoom(10.0);
        assert_eq!(session.zoom(), 3.0);
        session.set_zoom(0.01);
        assert_eq!(session.zoom(), 0.5);
        session.zoom_in();
        assert!((session.zoom() - 0.7).abs() < 1e-6);
    }

    #[tokio::test]
    async fn renders_surface_at_mediabox_times_zoom() {
        let mut session = session_over(FakeSource::with_pages(1), ViewerOptions::default());
        session.open().await.unwrap();
        session.set_zoom(2.0);

        let render = session.render_current().await.unwrap();
        assert_eq!(render.image.width(), 1224);
        assert_eq!(render.image.height(), 1584);
        assert_eq!(render.watermark_tiles, 0, "no watermark means no overlay");
        assert_eq!(session.state(), &ViewerState::Ready);
    }

    #[tokio::test]
    async fn renders_with_watermark_overlay() {
        let source = FakeSource {
            watermark: Some(png_watermark()),
            ..FakeSource::with_pages(1)
        };
        let mut session = session_over(source, ViewerOptions::default());
        session.open().await.unwrap();

        let render = session.render_current().await.unwrap();
        assert!(render.watermark_tiles > 0);
    }

    #[tokio::test]
    async fn newer_render_cancels_older_one() {
        let mut session = session_over(FakeSource::with_pages(3), ViewerOptions::default());
        session.open().await.unwrap();

        session.go_to_page(2);
        let older = session.begin_render().unwrap();
        let older_generation = older.generation();
        session.go_to_page(3);
        let newer = session.begin_render().unwrap();
        let newer_generation = newer.generation();

        let (older_result, newer_result) = futures::join!(older.run(), newer.run());
        assert!(
            matches!(older_result, Err(ViewerError::Cancelled)),
            "superseded render must report cancellation, not an error"
        );
        let page = newer_result.unwrap();
        assert_eq!(page.page, 3);

        session.finish_render(older_generation, &older_result);
        assert_eq!(
            session.state(),
            &ViewerState::Rendering,
            "a cancellation must not disturb the winning render"
        );
        session.finish_render(newer_generation, &Ok(page));
        assert_eq!(session.state(), &ViewerState::Ready);
    }

    #[tokio::test]
    async fn completed_render_is_ignored_once_superseded() {
        let mut session = session_over(FakeSource::with_pages(3), ViewerOptions::default());
        session.open().await.unwrap();

        // The first render finishes cleanly before any newer navigation.
        let older = session.begin_render().unwrap();
        let older_generation = older.generation();
        let older_result = older.run().await;
        assert!(older_result.is_ok());

        session.go_to_page(2);
        let newer = session.begin_render().unwrap();
        let newer_generation = newer.generation();

        // Committing the stale success must not flip the session to Ready
        // under the newer render's feet.
        session.finish_render(older_generation, &older_result);
        assert_eq!(session.state(), &ViewerState::Rendering);

        let newer_result = newer.run().await;
        session.finish_render(newer_generation, &newer_result);
        assert_eq!(session.state(), &ViewerState::Ready);
        assert_eq!(newer_result.unwrap().page, 2);
    }

    #[tokio::test]
    async fn cancelled_render_never_reaches_error_state() {
        let mut session = session_over(FakeSource::with_pages(2), ViewerOptions::default());
        session.open().await.unwrap();

        let task = session.begin_render().unwrap();
        let generation = task.generation();
        session.close();
        let result = task.run().await;
        assert!(matches!(result, Err(ViewerError::Cancelled)));
        session.finish_render(generation, &result);
        assert_eq!(session.state(), &ViewerState::Closed);
    }

    #[tokio::test]
    async fn escape_closes_and_releases_guard() {
        let registry = SuppressionRegistry::new();
        let mut session = RenderSession::new(
            Arc::new(FakeSource::with_pages(2)),
            registry.clone(),
            ViewerOptions::default(),
        );
        session.open().await.unwrap();
        assert!(registry.is_suppressed(Interaction::PrintShortcut));

        session.handle_key(NavKey::Escape);
        assert_eq!(session.state(), &ViewerState::Closed);
        assert!(!registry.is_suppressed(Interaction::PrintShortcut));
        assert!(matches!(
            session.begin_render(),
            Err(ViewerError::Closed)
        ));
    }

    #[tokio::test]
    async fn background_click_closes_only_the_plain_variant() {
        let mut plain = session_over(FakeSource::with_pages(1), ViewerOptions::default());
        plain.open().await.unwrap();
        plain.background_clicked();
        assert_eq!(plain.state(), &ViewerState::Closed);

        let options = ViewerOptions {
            close_on_background_click: false,
            ..ViewerOptions::default()
        };
        let mut flipbook = session_over(FakeSource::with_pages(1), options);
        flipbook.open().await.unwrap();
        flipbook.background_clicked();
        assert_eq!(flipbook.state(), &ViewerState::Ready);
    }

    #[tokio::test]
    async fn dropping_the_session_releases_the_guard() {
        let registry = SuppressionRegistry::new();
        {
            let mut session = RenderSession::new(
                Arc::new(FakeSource::with_pages(1)),
                registry.clone(),
                ViewerOptions::default(),
            );
            session.open().await.unwrap();
            assert!(registry.is_suppressed(Interaction::DragStart));
        }
        assert!(!registry.is_suppressed(Interaction::DragStart));
    }

    #[tokio::test]
    async fn keyboard_navigation_walks_pages() {
        let mut session = session_over(FakeSource::with_pages(5), ViewerOptions::default());
        session.open().await.unwrap();

        session.handle_key(NavKey::End);
        assert_eq!(session.current_page(), 5);
        session.handle_key(NavKey::ArrowLeft);
        assert_eq!(session.current_page(), 4);
        session.handle_key(NavKey::Home);
        assert_eq!(session.current_page(), 1);
        session.handle_key(NavKey::PageDown);
        assert_eq!(session.current_page(), 2);
    }
}
