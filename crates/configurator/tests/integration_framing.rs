//! Integration tests for camera framing through the full commit pipeline.
//!
//! Tests end-to-end: commit -> solid -> extent -> framer -> viewport callbacks.

use configurator_lib::camera::{CameraFramer, FramerError, FramingPolicy};
use configurator_lib::bounds::BoundingExtent;
use configurator_lib::fixtures::*;
use configurator_lib::harness::TestHarness;
use shared::{DimensionName, ShapeFamily};

#[test]
fn test_small_edit_keeps_camera_then_large_edit_reframes() {
    let mut h = TestHarness::new();
    assert_eq!(h.framer_state().unwrap().last_framed_max_dim, 120.0);
    let cameras = h.camera_updates();

    let report = h.set(DimensionName::Length, 130.0).unwrap();
    assert!(report.camera.is_none());
    assert_eq!(h.camera_updates(), cameras);
    assert_eq!(h.framer_state().unwrap().last_framed_max_dim, 120.0);
    // the solid itself is always updated
    assert_eq!(h.solid_updates(), 2);

    let report = h.set(DimensionName::Length, 150.0).unwrap();
    assert!(report.camera.is_some());
    assert_eq!(h.camera_updates(), cameras + 1);
    assert_eq!(h.framer_state().unwrap().last_framed_max_dim, 150.0);
}

#[test]
fn test_frustum_grows_linearly() {
    let mut h = TestHarness::new();
    let f120 = h.framer_state().unwrap().current_frustum_size;
    assert!((228.0..=260.0).contains(&f120), "frustum {f120}");

    h.set(DimensionName::Length, 280.0).unwrap();
    let f280 = h.framer_state().unwrap().current_frustum_size;
    assert!(f280 > 350.0, "frustum {f280}");

    h.set(DimensionName::Length, 440.0).unwrap();
    let f440 = h.framer_state().unwrap().current_frustum_size;
    assert!(((f440 - f280) - (f280 - f120)).abs() < 1e-9);
}

#[test]
fn test_height_counts_towards_max_dim() {
    let mut h = TestHarness::new();
    h.set(DimensionName::Height, 200.0).unwrap();
    assert_eq!(h.framer_state().unwrap().last_framed_max_dim, 200.0);
}

#[test]
fn test_cumulative_small_edits_eventually_reframe() {
    let mut h = TestHarness::new();
    let mut reframes = 0;
    for length in [125.0, 130.0, 135.0, 140.0, 145.0] {
        if h.set(DimensionName::Length, length).unwrap().camera.is_some() {
            reframes += 1;
        }
    }
    // 145 is the first step 20% past the 120 baseline
    assert_eq!(reframes, 1);
    assert_eq!(h.framer_state().unwrap().last_framed_max_dim, 145.0);
}

#[test]
fn test_rejected_edit_leaves_framing_alone() {
    let mut h = TestHarness::new();
    let state = h.framer_state();
    assert!(h.set(DimensionName::WallThickness, 70.0).is_err());
    assert_eq!(h.framer_state(), state);
    assert_eq!(h.camera_updates(), 1);
    assert_eq!(h.solid_updates(), 1);
}

#[test]
fn test_family_switch_reframes_when_size_changes() {
    let mut h = TestHarness::new();
    // 8 mm inner radius -> 20 mm outer diameter, height 40
    let report = h.set_family(ShapeFamily::Cylinder).unwrap();
    assert!(report.camera.is_some());
    assert_eq!(h.framer_state().unwrap().last_framed_max_dim, 40.0);
}

#[test]
fn test_zero_threshold_reframes_every_change() {
    let mut h = TestHarness::with_settings(&eager_framing_settings()).unwrap();
    h.set(DimensionName::Length, 121.0).unwrap();
    h.set(DimensionName::Length, 122.0).unwrap();
    assert_eq!(h.camera_updates(), 3);
}

#[test]
fn test_queued_commits_emit_latest_only() {
    let mut h = TestHarness::new();
    h.session.submit(box_with_max_dim(300.0)).unwrap();
    h.session.submit(box_with_max_dim(310.0)).unwrap();
    h.session.submit(box_with_max_dim(130.0)).unwrap();
    let report = h.session.flush().unwrap();

    assert_eq!(report.processed, 3);
    // 300 re-framed, 310 kept, 130 re-framed against the 300 baseline
    assert_eq!(h.camera_updates(), 2);
    assert_eq!(h.last_camera().unwrap().framed_max_dim, 130.0);
    assert_eq!(h.solid_updates(), 2);
    assert_eq!(h.session.extent().max_dim(), 130.0);
}

#[test]
fn test_unseeded_framer_errors() {
    let mut framer = CameraFramer::new(FramingPolicy::default());
    let result = framer.decide(&BoundingExtent::new(100.0, 40.0));
    assert_eq!(result, Err(FramerError::UninitializedFramer));
}
