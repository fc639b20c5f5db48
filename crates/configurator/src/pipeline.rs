//! Commit pipeline: model -> geometry -> bounds -> framer -> viewport.
//!
//! Commits are queued and processed in order on `flush`. Every queued commit
//! goes through the framer, but the viewport only receives the latest solid
//! and the latest new camera configuration of a flush.

use std::collections::VecDeque;

use serde::Serialize;
use shared::{DimensionName, DimensionResult, DimensionSnapshot, DividerAxis, DividerLayout, SegmentKey, ShapeFamily};

use crate::bounds::{extents_of, footprint_of, BoundingExtent};
use crate::camera::{CameraConfig, CameraFramer, FramerState, FramingDecision, FramingPolicy, TopView, TopWorldPoint};
use crate::edit::{EditSession, InlineEdit};
use crate::geometry::{GeometryFactory, SolidDescription};
use crate::model::DimensionModel;
use crate::settings::AppSettings;
use crate::ConfiguratorError;

/// Receiver of pipeline output (the rendering side)
pub trait Viewport {
    fn on_solid_updated(&mut self, solid: &SolidDescription);
    fn on_camera_updated(&mut self, config: &CameraConfig);
}

/// Viewport that discards everything (headless runs)
#[derive(Debug, Default)]
pub struct NullViewport;

impl Viewport for NullViewport {
    fn on_solid_updated(&mut self, _solid: &SolidDescription) {}
    fn on_camera_updated(&mut self, _config: &CameraConfig) {}
}

/// What a flush did
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlushReport {
    /// Commits taken from the queue
    pub processed: usize,
    /// Whether a solid was handed to the viewport
    pub solid_emitted: bool,
    /// Camera handed to the viewport, if any commit re-framed
    pub camera: Option<CameraConfig>,
}

#[derive(Debug, Clone)]
struct PendingCommit {
    snapshot: DimensionSnapshot,
    layout: DividerLayout,
}

/// The configurator session
pub struct Configurator<V: Viewport> {
    model: DimensionModel,
    layout: DividerLayout,
    factory: GeometryFactory,
    framer: CameraFramer,
    edit: InlineEdit,
    queue: VecDeque<PendingCommit>,
    solid: SolidDescription,
    extent: BoundingExtent,
    top_viewport: [f64; 2],
    /// Vertical size of the top view; refit on re-frame or when the footprint outgrows it
    top_frustum_size: f64,
    hit_margin: f64,
    viewport: V,
}

impl<V: Viewport> Configurator<V> {
    /// Start a session at the configured defaults; the first frame is emitted immediately
    pub fn new(settings: &AppSettings, viewport: V) -> Result<Self, ConfiguratorError> {
        settings.validate().map_err(ConfiguratorError::Settings)?;
        let model = DimensionModel::new(settings.defaults)?;
        Ok(Self::with_model(model, settings, viewport))
    }

    /// Session with built-in settings
    pub fn with_default_settings(viewport: V) -> Self {
        Self::with_model(DimensionModel::default(), &AppSettings::default(), viewport)
    }

    fn with_model(model: DimensionModel, settings: &AppSettings, viewport: V) -> Self {
        let factory = GeometryFactory::new(settings.geometry.clone());
        let mut framer = CameraFramer::new(FramingPolicy::from_settings(&settings.framing, 1.0));

        let layout = DividerLayout::default();
        let solid = factory.build_with_layout(&model.snapshot(), &layout);
        let extent = extents_of(&solid);
        let config = framer.reframe(&extent);

        let mut configurator = Self {
            model,
            layout,
            factory,
            framer,
            edit: InlineEdit::default(),
            queue: VecDeque::new(),
            solid,
            extent,
            top_viewport: [400.0, 400.0],
            top_frustum_size: 0.0,
            hit_margin: settings.geometry.hit_margin,
            viewport,
        };
        configurator.fit_top_view();
        configurator.viewport.on_solid_updated(&configurator.solid);
        configurator.viewport.on_camera_updated(&config);
        configurator
    }

    // ── Queries ──────────────────────────────────────────────

    pub fn snapshot(&self) -> DimensionSnapshot {
        self.model.snapshot()
    }

    pub fn layout(&self) -> &DividerLayout {
        &self.layout
    }

    /// Solid last handed to the viewport
    pub fn solid(&self) -> &SolidDescription {
        &self.solid
    }

    pub fn extent(&self) -> BoundingExtent {
        self.extent
    }

    pub fn framer_state(&self) -> Option<FramerState> {
        self.framer.state()
    }

    pub fn camera(&self) -> Option<CameraConfig> {
        self.framer.current()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    pub fn into_viewport(self) -> V {
        self.viewport
    }

    // ── Commit entry points ──────────────────────────────────

    /// Validate and queue a confirmed snapshot without processing it
    pub fn submit(&mut self, snapshot: DimensionSnapshot) -> Result<(), ConfiguratorError> {
        let snapshot = accepted(self.model.replace(snapshot))?;
        self.enqueue(snapshot);
        Ok(())
    }

    /// A confirmed edit arrived: queue it and process the queue
    pub fn on_dimension_committed(&mut self, snapshot: DimensionSnapshot) -> Result<FlushReport, ConfiguratorError> {
        self.submit(snapshot)?;
        self.flush()
    }

    pub fn commit(&mut self, name: DimensionName, value: f64) -> Result<FlushReport, ConfiguratorError> {
        let snapshot = accepted(self.model.set(name, value))?;
        self.enqueue(snapshot);
        self.flush()
    }

    /// Commit user text (number or formula over the current dimensions)
    pub fn commit_text(&mut self, name: DimensionName, text: &str) -> Result<FlushReport, ConfiguratorError> {
        let snapshot = accepted(self.model.set_text(name, text))?;
        self.enqueue(snapshot);
        self.flush()
    }

    pub fn set_family(&mut self, family: ShapeFamily) -> Result<FlushReport, ConfiguratorError> {
        let snapshot = accepted(self.model.set_family(family))?;
        self.enqueue(snapshot);
        self.flush()
    }

    pub fn set_floor(&mut self, has_floor: bool) -> Result<FlushReport, ConfiguratorError> {
        let snapshot = accepted(self.model.set_floor(has_floor))?;
        self.enqueue(snapshot);
        self.flush()
    }

    /// Back to the default dimensions with no dividers
    pub fn reset(&mut self) -> Result<FlushReport, ConfiguratorError> {
        self.edit.cancel();
        self.layout.clear();
        let snapshot = self.model.reset();
        self.enqueue(snapshot);
        self.flush()
    }

    fn enqueue(&mut self, snapshot: DimensionSnapshot) {
        if snapshot.family == ShapeFamily::Box {
            self.prune_dividers(&snapshot);
        }
        tracing::debug!(?snapshot, queued = self.queue.len() + 1, "Commit queued");
        self.queue.push_back(PendingCommit {
            snapshot,
            layout: self.layout.clone(),
        });
    }

    /// Process all queued commits in order
    pub fn flush(&mut self) -> Result<FlushReport, ConfiguratorError> {
        let mut report = FlushReport::default();
        let mut latest = None;

        while let Some(pending) = self.queue.pop_front() {
            let solid = self.factory.build_with_layout(&pending.snapshot, &pending.layout);
            let extent = extents_of(&solid);
            if let FramingDecision::Reframe(config) = self.framer.decide(&extent)? {
                report.camera = Some(config);
            }
            report.processed += 1;
            self.extent = extent;
            latest = Some(solid);
        }

        if let Some(solid) = latest {
            self.viewport.on_solid_updated(&solid);
            self.solid = solid;
            report.solid_emitted = true;
        }
        if let Some(config) = &report.camera {
            self.viewport.on_camera_updated(config);
        }
        if report.solid_emitted {
            let [length, width] = footprint_of(&self.solid);
            if report.camera.is_some() || !self.top_view().contains_footprint(length, width) {
                self.fit_top_view();
            }
        }

        if report.processed > 0 {
            tracing::debug!(
                processed = report.processed,
                reframed = report.camera.is_some(),
                "Flushed commits"
            );
        }
        Ok(report)
    }

    // ── Inline editing ───────────────────────────────────────

    pub fn begin_edit(&mut self, name: DimensionName) {
        let current = self.model.snapshot().get(name);
        self.edit.begin(name, current);
    }

    /// Keystroke-level input; never reaches the model
    pub fn edit_input(&mut self, text: &str) -> bool {
        self.edit.input(text)
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.session()
    }

    /// Commit the edited text (Enter or focus loss). `Ok(None)` when nothing was being edited.
    pub fn finish_edit(&mut self) -> Result<Option<FlushReport>, ConfiguratorError> {
        match self.edit.finish() {
            Some(session) => self.commit_text(session.name, &session.buffer).map(Some),
            None => Ok(None),
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit.cancel();
    }

    // ── Dividers ─────────────────────────────────────────────

    fn require_box(&self) -> Result<DimensionSnapshot, ConfiguratorError> {
        let snapshot = self.model.snapshot();
        match snapshot.family {
            ShapeFamily::Box => Ok(snapshot),
            ShapeFamily::Cylinder => Err(ConfiguratorError::Layout(
                "dividers are only available for the box family".to_string(),
            )),
        }
    }

    /// Drop dividers the (possibly shrunk) cavity no longer has room for
    fn prune_dividers(&mut self, snapshot: &DimensionSnapshot) {
        for axis in [DividerAxis::X, DividerAxis::Z] {
            let limit = self.factory.divider_limit(snapshot, axis);
            let removed = self.layout.retain_within(axis, limit);
            if removed > 0 {
                tracing::debug!(?axis, removed, limit, "Dividers outside the cavity dropped");
            }
        }
    }

    fn layout_changed(&mut self) -> Result<FlushReport, ConfiguratorError> {
        let snapshot = self.model.snapshot();
        self.enqueue(snapshot);
        self.flush()
    }

    /// Add a divider at `pos` (clamped to the cavity); returns its index
    pub fn add_divider(&mut self, axis: DividerAxis, pos: f64) -> Result<usize, ConfiguratorError> {
        let snapshot = self.require_box()?;
        let limit = self.factory.divider_limit(&snapshot, axis);
        let index = self.layout.add(axis, pos, limit);
        self.layout_changed()?;
        Ok(index)
    }

    /// Move a divider; the position is clamped between its neighbours
    pub fn move_divider(&mut self, axis: DividerAxis, index: usize, pos: f64) -> Result<f64, ConfiguratorError> {
        let snapshot = self.require_box()?;
        let limit = self.factory.divider_limit(&snapshot, axis);
        let placed = self
            .layout
            .move_to(axis, index, pos, limit)
            .ok_or_else(|| ConfiguratorError::Layout(format!("no divider {:?} #{}", axis, index)))?;
        self.layout_changed()?;
        Ok(placed)
    }

    pub fn remove_divider(&mut self, axis: DividerAxis, index: usize) -> Result<f64, ConfiguratorError> {
        self.require_box()?;
        let removed = self
            .layout
            .remove(axis, index)
            .ok_or_else(|| ConfiguratorError::Layout(format!("no divider {:?} #{}", axis, index)))?;
        self.layout_changed()?;
        Ok(removed)
    }

    /// Hide one divider segment, merging the compartments on both sides
    pub fn hide_segment(&mut self, key: SegmentKey) -> Result<FlushReport, ConfiguratorError> {
        self.require_box()?;
        if !self.layout.hide_segment(key) {
            return Err(ConfiguratorError::Layout(format!(
                "no segment {:?} #{}/{}",
                key.axis, key.line, key.segment
            )));
        }
        self.layout_changed()
    }

    /// Hide the divider segment under a top-view pixel
    pub fn hide_segment_at(&mut self, px: f64, py: f64) -> Result<SegmentKey, ConfiguratorError> {
        let snapshot = self.require_box()?;
        let point = self.screen_to_top_world(px, py);
        let key = if point.inside {
            self.layout
                .hit_test(point.x, point.z, snapshot.cavity_half_extents(), self.hit_margin)
        } else {
            None
        };
        let key = key.ok_or_else(|| {
            ConfiguratorError::Layout(format!("no divider near ({:.1}, {:.1})", point.x, point.z))
        })?;
        self.hide_segment(key)?;
        Ok(key)
    }

    pub fn clear_dividers(&mut self) -> Result<FlushReport, ConfiguratorError> {
        self.layout.clear();
        self.layout_changed()
    }

    // ── Viewports ────────────────────────────────────────────

    /// The 3D viewport changed size: re-frame for the new aspect
    pub fn resize(&mut self, width: f64, height: f64) -> CameraConfig {
        self.framer.set_aspect(width / height);
        let config = self.framer.reframe(&self.extent);
        self.fit_top_view();
        self.viewport.on_camera_updated(&config);
        config
    }

    /// The top viewport changed size: refit the top view for the new aspect
    pub fn resize_top(&mut self, width: f64, height: f64) {
        self.top_viewport = [width, height];
        self.fit_top_view();
    }

    fn fit_top_view(&mut self) {
        let [length, width] = footprint_of(&self.solid);
        let [w, h] = self.top_viewport;
        self.top_frustum_size = self.framer.policy().top_frustum_size(length, width, w / h);
    }

    /// Orthographic bounds of the top view
    pub fn top_view(&self) -> TopView {
        let [w, h] = self.top_viewport;
        TopView::new(self.top_frustum_size, w / h)
    }

    pub fn screen_to_top_world(&self, px: f64, py: f64) -> TopWorldPoint {
        let [w, h] = self.top_viewport;
        self.top_view().screen_to_world(px, py, w, h)
    }
}

fn accepted<T>(result: DimensionResult<T>) -> Result<T, ConfiguratorError> {
    result.map_err(|e| {
        tracing::warn!("Rejected edit: {e}");
        ConfiguratorError::from(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counting {
        solids: usize,
        cameras: usize,
    }

    impl Viewport for Counting {
        fn on_solid_updated(&mut self, _solid: &SolidDescription) {
            self.solids += 1;
        }
        fn on_camera_updated(&mut self, _config: &CameraConfig) {
            self.cameras += 1;
        }
    }

    fn session() -> Configurator<Counting> {
        Configurator::new(&AppSettings::default(), Counting::default()).unwrap()
    }

    #[test]
    fn test_startup_emits_first_frame() {
        let c = session();
        assert_eq!(c.viewport().solids, 1);
        assert_eq!(c.viewport().cameras, 1);
        assert_eq!(c.framer_state().unwrap().last_framed_max_dim, 120.0);
    }

    #[test]
    fn test_rejected_commit_emits_nothing() {
        let mut c = session();
        let before = c.snapshot();
        assert!(c.commit(DimensionName::Length, 0.0).is_err());
        assert_eq!(c.snapshot(), before);
        assert_eq!(c.viewport().solids, 1);
        assert_eq!(c.pending(), 0);
    }

    #[test]
    fn test_flush_coalesces_output() {
        let mut c = session();
        let base = c.snapshot();
        c.submit(base.with(DimensionName::Length, 200.0)).unwrap();
        c.submit(base.with(DimensionName::Length, 205.0)).unwrap();
        c.submit(base.with(DimensionName::Length, 300.0)).unwrap();
        assert_eq!(c.pending(), 3);

        let report = c.flush().unwrap();
        assert_eq!(report.processed, 3);
        assert_eq!(c.viewport().solids, 2);
        assert_eq!(c.viewport().cameras, 2);
        assert_eq!(report.camera.unwrap().framed_max_dim, 300.0);
        assert_eq!(c.framer_state().unwrap().last_framed_max_dim, 300.0);
    }

    #[test]
    fn test_layout_edit_keeps_camera() {
        let mut c = session();
        c.add_divider(DividerAxis::X, 10.0).unwrap();
        assert_eq!(c.viewport().solids, 2);
        assert_eq!(c.viewport().cameras, 1);
    }

    #[test]
    fn test_dividers_rejected_for_cylinder() {
        let mut c = session();
        c.set_family(ShapeFamily::Cylinder).unwrap();
        assert!(matches!(
            c.add_divider(DividerAxis::X, 0.0),
            Err(ConfiguratorError::Layout(_))
        ));
    }

    #[test]
    fn test_hide_segment_at_pixel() {
        let mut c = session();
        c.add_divider(DividerAxis::X, 0.0).unwrap();
        c.resize_top(400.0, 400.0);
        // pixel column 200 is world x = 0, row 150 is world z < 0
        let key = c.hide_segment_at(200.0, 150.0).unwrap();
        assert_eq!(key, SegmentKey::new(DividerAxis::X, 0, 0));
        // the only segment was hidden, so the divider is gone
        assert!(c.layout().x.is_empty());
    }

    #[test]
    fn test_top_view_fits_long_box_in_portrait_viewport() {
        let mut c = session();
        c.commit(DimensionName::Width, 100.0).unwrap();
        c.commit(DimensionName::Length, 300.0).unwrap();
        c.resize_top(200.0, 400.0);

        let view = c.top_view();
        assert!(view.right > 150.0, "right {}", view.right);
        assert!(view.top > 50.0);
    }

    #[test]
    fn test_top_view_refits_when_footprint_outgrows_it() {
        let mut c = session();
        c.commit(DimensionName::Height, 400.0).unwrap();
        // max_dim stays within the hysteresis band, the footprint does not
        let report = c.commit(DimensionName::Length, 450.0).unwrap();
        assert!(report.camera.is_none());
        assert!(c.top_view().contains_footprint(450.0, 120.0));
    }

    #[test]
    fn test_shrinking_cavity_drops_outside_dividers() {
        let mut c = session();
        c.add_divider(DividerAxis::X, 55.0).unwrap();
        c.add_divider(DividerAxis::Z, 0.0).unwrap();
        c.commit(DimensionName::Length, 80.0).unwrap();

        assert!(c.layout().x.is_empty());
        assert_eq!(c.layout().z, vec![0.0]);
        let SolidDescription::Box(b) = c.solid() else {
            panic!("expected box");
        };
        assert_eq!(b.corner_radius, 8.0);
        assert_eq!(b.compartments.len(), 2);
        assert!(b.dividers.iter().all(|d| d.center[0].abs() < b.cavity_half_extents[0]));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut settings = AppSettings::default();
        settings.framing.fov_degrees = 0.0;
        assert!(matches!(
            Configurator::new(&settings, Counting::default()),
            Err(ConfiguratorError::Settings(_))
        ));
    }

    #[test]
    fn test_resize_reframes() {
        let mut c = session();
        let before = c.camera().unwrap().distance();
        let config = c.resize(400.0, 800.0);
        assert!(config.distance() > before);
        assert_eq!(c.viewport().cameras, 2);
    }
}
