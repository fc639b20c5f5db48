// Library crate: the configurator pipeline, headless harness and command protocol.
// The binary only wires settings, logging and a JSON script to it.

pub mod bounds;
pub mod camera;
pub mod command;
pub mod edit;
pub mod fixtures;
pub mod geometry;
pub mod harness;
pub mod mesh;
pub mod model;
pub mod pipeline;
pub mod settings;
pub mod validation;

use shared::DimensionError;

use crate::camera::FramerError;

/// Errors surfaced by the configurator session
#[derive(Debug, Clone, PartialEq)]
pub enum ConfiguratorError {
    /// Rejected dimension edit; the previous snapshot is still in effect
    Dimension(DimensionError),
    Framer(FramerError),
    /// Divider operation that does not apply to the current state
    Layout(String),
    /// Settings the pipeline cannot work with
    Settings(String),
}

impl std::fmt::Display for ConfiguratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfiguratorError::Dimension(e) => write!(f, "{}", e),
            ConfiguratorError::Framer(e) => write!(f, "{}", e),
            ConfiguratorError::Layout(msg) => write!(f, "Divider error: {}", msg),
            ConfiguratorError::Settings(msg) => write!(f, "Invalid settings: {}", msg),
        }
    }
}

impl std::error::Error for ConfiguratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfiguratorError::Dimension(e) => Some(e),
            ConfiguratorError::Framer(e) => Some(e),
            ConfiguratorError::Layout(_) | ConfiguratorError::Settings(_) => None,
        }
    }
}

impl From<DimensionError> for ConfiguratorError {
    fn from(e: DimensionError) -> Self {
        ConfiguratorError::Dimension(e)
    }
}

impl From<FramerError> for ConfiguratorError {
    fn from(e: FramerError) -> Self {
        ConfiguratorError::Framer(e)
    }
}
