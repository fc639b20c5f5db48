//! Headless test harness: a configurator session wired to a recording viewport.

use shared::{DimensionName, DimensionSnapshot, DividerAxis, ShapeFamily};

use crate::camera::{CameraConfig, FramerState};
use crate::geometry::SolidDescription;
use crate::mesh::{tessellate, MeshData};
use crate::pipeline::{Configurator, FlushReport, Viewport};
use crate::settings::AppSettings;
use crate::validation::MeshValidator;
use crate::ConfiguratorError;

/// Viewport that keeps everything it receives and tessellates every solid
#[derive(Debug, Default)]
pub struct RecordingViewport {
    pub solids: Vec<SolidDescription>,
    pub cameras: Vec<CameraConfig>,
    pub mesh: Option<MeshData>,
}

impl Viewport for RecordingViewport {
    fn on_solid_updated(&mut self, solid: &SolidDescription) {
        self.mesh = Some(tessellate(solid));
        self.solids.push(solid.clone());
    }

    fn on_camera_updated(&mut self, config: &CameraConfig) {
        self.cameras.push(*config);
    }
}

/// Headless session for tests and the command protocol
pub struct TestHarness {
    pub session: Configurator<RecordingViewport>,
}

impl TestHarness {
    /// Session with default settings
    pub fn new() -> Self {
        Self {
            session: Configurator::with_default_settings(RecordingViewport::default()),
        }
    }

    pub fn with_settings(settings: &AppSettings) -> Result<Self, ConfiguratorError> {
        Ok(Self {
            session: Configurator::new(settings, RecordingViewport::default())?,
        })
    }

    // ── Editing ───────────────────────────────────────────────

    pub fn set(&mut self, name: DimensionName, value: f64) -> Result<FlushReport, ConfiguratorError> {
        self.session.commit(name, value)
    }

    /// Simulate typing `text` into the inline editor and pressing Enter
    pub fn type_and_commit(&mut self, name: DimensionName, text: &str) -> Result<FlushReport, ConfiguratorError> {
        self.session.begin_edit(name);
        self.session.edit_input(text);
        self.session
            .finish_edit()
            .map(|report| report.unwrap_or_default())
    }

    pub fn set_family(&mut self, family: ShapeFamily) -> Result<FlushReport, ConfiguratorError> {
        self.session.set_family(family)
    }

    pub fn add_divider(&mut self, axis: DividerAxis, pos: f64) -> Result<usize, ConfiguratorError> {
        self.session.add_divider(axis, pos)
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn snapshot(&self) -> DimensionSnapshot {
        self.session.snapshot()
    }

    pub fn framer_state(&self) -> Option<FramerState> {
        self.session.framer_state()
    }

    /// Number of solids the viewport received
    pub fn solid_updates(&self) -> usize {
        self.session.viewport().solids.len()
    }

    /// Number of camera configurations the viewport received
    pub fn camera_updates(&self) -> usize {
        self.session.viewport().cameras.len()
    }

    pub fn last_solid(&self) -> Option<&SolidDescription> {
        self.session.viewport().solids.last()
    }

    pub fn last_camera(&self) -> Option<&CameraConfig> {
        self.session.viewport().cameras.last()
    }

    pub fn mesh(&self) -> Option<&MeshData> {
        self.session.viewport().mesh.as_ref()
    }

    /// Validator for the mesh of the last solid
    pub fn validate_mesh(&self) -> Option<MeshValidator<'_>> {
        self.mesh().map(MeshValidator::new)
    }

    pub fn export_solid_json(&self) -> String {
        serde_json::to_string_pretty(self.session.solid()).unwrap_or_default()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_harness_framed() {
        let h = TestHarness::new();
        assert_eq!(h.solid_updates(), 1);
        assert_eq!(h.camera_updates(), 1);
        assert!(h.mesh().is_some());
    }

    #[test]
    fn test_typing_does_not_commit() {
        let mut h = TestHarness::new();
        h.session.begin_edit(DimensionName::Length);
        h.session.edit_input("2");
        h.session.edit_input("25");
        assert_eq!(h.snapshot().length, 120.0);
        assert_eq!(h.solid_updates(), 1);

        h.session.finish_edit().unwrap();
        assert_eq!(h.snapshot().length, 25.0);
        assert_eq!(h.solid_updates(), 2);
    }

    #[test]
    fn test_escape_keeps_dimensions() {
        let mut h = TestHarness::new();
        h.session.begin_edit(DimensionName::Height);
        h.session.edit_input("90");
        h.session.cancel_edit();
        assert_eq!(h.session.finish_edit().unwrap(), None);
        assert_eq!(h.snapshot().height, 40.0);
    }

    #[test]
    fn test_type_formula() {
        let mut h = TestHarness::new();
        h.type_and_commit(DimensionName::Width, "l / 2").unwrap();
        assert_eq!(h.snapshot().width, 60.0);
    }

    #[test]
    fn test_validate_mesh() {
        let mut h = TestHarness::new();
        h.add_divider(DividerAxis::Z, 5.0).unwrap();
        let v = h.validate_mesh().unwrap();
        assert!(v.vertex_count() > 0);
        assert!(v.validate_all().is_empty(), "{:?}", v.validate_all());
    }

    #[test]
    fn test_export_solid_json() {
        let h = TestHarness::new();
        let json = h.export_solid_json();
        assert!(json.contains("\"type\": \"box\""));
    }
}
