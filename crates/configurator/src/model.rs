//! Dimension model: the single owner of the committed dimensions.
//!
//! Every mutation builds a candidate snapshot, validates it, and only then
//! replaces the current one, so a rejected edit leaves nothing half-applied.

use shared::{evaluate_input, DimensionName, DimensionResult, DimensionSnapshot, ShapeFamily};

/// Committed dimensions of the configured container
#[derive(Debug, Clone)]
pub struct DimensionModel {
    current: DimensionSnapshot,
    defaults: DimensionSnapshot,
}

impl DimensionModel {
    /// Create a model starting at `defaults` (which must be valid)
    pub fn new(defaults: DimensionSnapshot) -> DimensionResult<Self> {
        defaults.validate()?;
        Ok(Self {
            current: defaults,
            defaults,
        })
    }

    /// Current immutable snapshot
    pub fn snapshot(&self) -> DimensionSnapshot {
        self.current
    }

    /// Set a single dimension
    pub fn set(&mut self, name: DimensionName, value: f64) -> DimensionResult<DimensionSnapshot> {
        self.replace(self.current.with(name, value))
    }

    /// Set a dimension from user-entered text (number or formula)
    pub fn set_text(&mut self, name: DimensionName, text: &str) -> DimensionResult<DimensionSnapshot> {
        let value = evaluate_input(name, text, &self.current)?;
        self.set(name, value)
    }

    /// Switch the shape family
    pub fn set_family(&mut self, family: ShapeFamily) -> DimensionResult<DimensionSnapshot> {
        self.replace(DimensionSnapshot {
            family,
            ..self.current
        })
    }

    /// Toggle the floor slab
    pub fn set_floor(&mut self, has_floor: bool) -> DimensionResult<DimensionSnapshot> {
        self.replace(DimensionSnapshot {
            has_floor,
            ..self.current
        })
    }

    /// Adopt a complete snapshot after validating it
    pub fn replace(&mut self, candidate: DimensionSnapshot) -> DimensionResult<DimensionSnapshot> {
        candidate.validate()?;
        self.current = candidate;
        Ok(candidate)
    }

    /// Return to the session defaults
    pub fn reset(&mut self) -> DimensionSnapshot {
        self.current = self.defaults;
        self.current
    }
}

impl Default for DimensionModel {
    fn default() -> Self {
        Self {
            current: DimensionSnapshot::default(),
            defaults: DimensionSnapshot::default(),
        }
    }
}
