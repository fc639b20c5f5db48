//! Factory functions for test data.
//!
//! Snapshots, layouts and settings used by tests and scripted sessions.

use shared::{DimensionSnapshot, DividerAxis, DividerLayout, SegmentKey};

use crate::settings::AppSettings;

// ── Snapshots ──────────────────────────────────────────────────

/// Default 120 x 120 x 40 box
pub fn default_box() -> DimensionSnapshot {
    DimensionSnapshot::default()
}

/// Box with the given outer size and wall, default corner radius
pub fn box_snapshot(length: f64, width: f64, height: f64, wall: f64) -> DimensionSnapshot {
    DimensionSnapshot::rect(length, width, height, wall)
}

/// Box without a floor slab
pub fn open_box(length: f64, width: f64, height: f64, wall: f64) -> DimensionSnapshot {
    DimensionSnapshot {
        has_floor: false,
        ..box_snapshot(length, width, height, wall)
    }
}

/// Cylinder by inner radius
pub fn cylinder_snapshot(inner_radius: f64, height: f64, wall: f64) -> DimensionSnapshot {
    DimensionSnapshot::cylinder(inner_radius, height, wall)
}

/// Cube-like box whose largest dimension is `max_dim`
pub fn box_with_max_dim(max_dim: f64) -> DimensionSnapshot {
    DimensionSnapshot {
        length: max_dim,
        ..DimensionSnapshot::default()
    }
}

// ── Layouts ────────────────────────────────────────────────────

/// Evenly spaced dividers: `nx` across x, `nz` across z, over a cavity of `cavity_half`
pub fn grid_layout(nx: usize, nz: usize, cavity_half: [f64; 2]) -> DividerLayout {
    let mut layout = DividerLayout::default();
    for (axis, count, half) in [(DividerAxis::X, nx, cavity_half[0]), (DividerAxis::Z, nz, cavity_half[1])] {
        let step = 2.0 * half / (count + 1) as f64;
        for k in 1..=count {
            layout.add(axis, -half + step * k as f64, half);
        }
    }
    layout
}

/// 2 x 2 grid with the left half of the x divider hidden (three compartments)
pub fn l_shaped_layout() -> DividerLayout {
    let mut layout = DividerLayout::default();
    layout.add(DividerAxis::X, 0.0, 50.0);
    layout.add(DividerAxis::Z, 0.0, 50.0);
    layout.hide_segment(SegmentKey::new(DividerAxis::X, 0, 0));
    layout
}

// ── Settings ───────────────────────────────────────────────────

/// Settings whose framing reacts to any change
pub fn eager_framing_settings() -> AppSettings {
    let mut settings = AppSettings::default();
    settings.framing.reframe_threshold = 0.0;
    settings
}

/// Settings starting from other default dimensions
pub fn settings_with_defaults(defaults: DimensionSnapshot) -> AppSettings {
    AppSettings {
        defaults,
        ..AppSettings::default()
    }
}
