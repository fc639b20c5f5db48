//! JSON command protocol for scripted sessions.
//!
//! Each command maps onto one configurator operation; responses carry the
//! outcome plus whatever the operation produced.

use serde::{Deserialize, Serialize};
use shared::{DimensionName, DimensionSnapshot, DividerAxis, SegmentKey, ShapeFamily};

use crate::geometry::top_view_outline;
use crate::harness::TestHarness;
use crate::pipeline::FlushReport;
use crate::ConfiguratorError;

/// Which viewport a resize applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    #[default]
    Perspective,
    Top,
}

/// A command for the configurator session.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    /// Commit a numeric dimension
    SetDimension { name: DimensionName, value: f64 },
    /// Commit text as if typed into the inline editor (numbers or formulas)
    EditDimension { name: DimensionName, text: String },
    /// Commit a complete snapshot
    Commit { snapshot: DimensionSnapshot },
    SetFamily { family: ShapeFamily },
    SetFloor { has_floor: bool },
    AddDivider { axis: DividerAxis, position: f64 },
    MoveDivider {
        axis: DividerAxis,
        index: usize,
        position: f64,
    },
    RemoveDivider { axis: DividerAxis, index: usize },
    /// Hide a divider segment by key
    HideSegment {
        axis: DividerAxis,
        line: usize,
        segment: usize,
    },
    /// Hide the divider segment under a top-view pixel
    HideSegmentAt { x: f64, y: f64 },
    ClearDividers,
    Resize {
        #[serde(default)]
        view: ViewKind,
        width: f64,
        height: f64,
    },
    /// Back to default dimensions
    Reset,
    /// Current dimensions, extent and framing state
    Inspect,
    /// Current solid as JSON
    ExportSolid,
    /// Top view of the current solid as SVG
    TopViewSvg,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

fn from_flush(result: Result<FlushReport, ConfiguratorError>) -> CommandResponse {
    match result {
        Ok(report) => CommandResponse::ok_with_data(serde_json::json!({
            "processed": report.processed,
            "reframed": report.camera.is_some(),
            "camera": report.camera,
        })),
        Err(e) => CommandResponse::err(e.to_string()),
    }
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TestHarness, cmd: AgentCommand) -> CommandResponse {
    let session = &mut harness.session;
    match cmd {
        AgentCommand::SetDimension { name, value } => from_flush(session.commit(name, value)),

        AgentCommand::EditDimension { name, text } => from_flush(session.commit_text(name, &text)),

        AgentCommand::Commit { snapshot } => from_flush(session.on_dimension_committed(snapshot)),

        AgentCommand::SetFamily { family } => from_flush(session.set_family(family)),

        AgentCommand::SetFloor { has_floor } => from_flush(session.set_floor(has_floor)),

        AgentCommand::AddDivider { axis, position } => match session.add_divider(axis, position) {
            Ok(index) => CommandResponse::ok_with_data(serde_json::json!({ "index": index })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        AgentCommand::MoveDivider { axis, index, position } => {
            match session.move_divider(axis, index, position) {
                Ok(placed) => CommandResponse::ok_with_data(serde_json::json!({ "position": placed })),
                Err(e) => CommandResponse::err(e.to_string()),
            }
        }

        AgentCommand::RemoveDivider { axis, index } => match session.remove_divider(axis, index) {
            Ok(removed) => CommandResponse::ok_with_data(serde_json::json!({ "position": removed })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        AgentCommand::HideSegment { axis, line, segment } => {
            from_flush(session.hide_segment(SegmentKey::new(axis, line, segment)))
        }

        AgentCommand::HideSegmentAt { x, y } => match session.hide_segment_at(x, y) {
            Ok(key) => CommandResponse::ok_with_data(serde_json::json!({ "segment": key })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        AgentCommand::ClearDividers => from_flush(session.clear_dividers()),

        AgentCommand::Resize { view, width, height } => {
            if !(width > 0.0 && height > 0.0) {
                return CommandResponse::err(format!("Invalid viewport size {width}x{height}"));
            }
            match view {
                ViewKind::Perspective => {
                    let camera = session.resize(width, height);
                    CommandResponse::ok_with_data(serde_json::json!({ "camera": camera }))
                }
                ViewKind::Top => {
                    session.resize_top(width, height);
                    CommandResponse::ok()
                }
            }
        }

        AgentCommand::Reset => from_flush(session.reset()),

        AgentCommand::Inspect => {
            let extent = session.extent();
            CommandResponse::ok_with_data(serde_json::json!({
                "dimensions": session.snapshot(),
                "dividers": session.layout(),
                "extent": extent,
                "max_dim": extent.max_dim(),
                "framer": session.framer_state(),
                "top_view": session.top_view(),
            }))
        }

        AgentCommand::ExportSolid => match serde_json::to_value(session.solid()) {
            Ok(solid) => CommandResponse::ok_with_data(serde_json::json!({ "solid": solid })),
            Err(e) => CommandResponse::err(format!("Failed to serialize solid: {e}")),
        },

        AgentCommand::TopViewSvg => {
            let svg = top_view_outline(session.solid()).to_svg();
            CommandResponse::ok_with_data(serde_json::json!({ "svg": svg }))
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut TestHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: AgentCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut TestHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<AgentCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}
