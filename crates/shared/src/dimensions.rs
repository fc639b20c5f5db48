use crate::{DimensionName, DimensionSnapshot, ShapeFamily};

/// Результат проверки размеров
pub type DimensionResult<T> = Result<T, DimensionError>;

/// Ошибки ввода размеров
#[derive(Debug, Clone, PartialEq)]
pub enum DimensionError {
    /// Значение нарушает инварианты модели (не число, ≤ 0, слишком толстая стенка)
    InvalidDimension { name: String, reason: String },
    /// Неизвестное семейство формы
    UnsupportedShapeFamily(String),
}

impl DimensionError {
    pub(crate) fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        DimensionError::InvalidDimension {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for DimensionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DimensionError::InvalidDimension { name, reason } => {
                write!(f, "Invalid dimension '{}': {}", name, reason)
            }
            DimensionError::UnsupportedShapeFamily(family) => {
                write!(f, "Unsupported shape family '{}'", family)
            }
        }
    }
}

impl std::error::Error for DimensionError {}

impl DimensionSnapshot {
    /// Проверить все инварианты снимка
    pub fn validate(&self) -> DimensionResult<()> {
        for &name in DimensionName::all() {
            let value = self.get(name);
            if !value.is_finite() {
                return Err(DimensionError::invalid(name.as_str(), "value is not a number"));
            }
            if value <= 0.0 {
                return Err(DimensionError::invalid(
                    name.as_str(),
                    format!("must be greater than zero, got {}", value),
                ));
            }
        }

        let wall = self.wall_thickness;
        match self.family {
            ShapeFamily::Box => {
                let limit = self.length.min(self.width) / 2.0;
                if wall >= limit {
                    return Err(DimensionError::invalid(
                        DimensionName::WallThickness.as_str(),
                        format!("wall {} must be less than half the smallest span ({})", wall, limit),
                    ));
                }
            }
            ShapeFamily::Cylinder => {
                if wall >= self.radius {
                    return Err(DimensionError::invalid(
                        DimensionName::WallThickness.as_str(),
                        format!("wall {} must be less than the inner radius ({})", wall, self.radius),
                    ));
                }
            }
        }

        if self.has_floor && wall >= self.height {
            return Err(DimensionError::invalid(
                DimensionName::WallThickness.as_str(),
                format!("floor of {} leaves no cavity in height {}", wall, self.height),
            ));
        }

        Ok(())
    }

    /// Внешний радиус цилиндра: внутренний радиус плюс стенка
    pub fn outer_radius(&self) -> f64 {
        self.radius + self.wall_thickness
    }

    /// Внешний радиус угла короба: радиус полости плюс стенка
    pub fn outer_corner_radius(&self) -> f64 {
        self.radius + self.wall_thickness
    }

    /// Внешний габарит по X
    pub fn outer_length(&self) -> f64 {
        match self.family {
            ShapeFamily::Box => self.length,
            ShapeFamily::Cylinder => 2.0 * self.outer_radius(),
        }
    }

    /// Внешний габарит по Z
    pub fn outer_width(&self) -> f64 {
        match self.family {
            ShapeFamily::Box => self.width,
            ShapeFamily::Cylinder => 2.0 * self.outer_radius(),
        }
    }

    /// Полуразмеры полости по X и Z (внешний полуразмер минус стенка)
    pub fn cavity_half_extents(&self) -> [f64; 2] {
        match self.family {
            ShapeFamily::Box => [
                self.length / 2.0 - self.wall_thickness,
                self.width / 2.0 - self.wall_thickness,
            ],
            ShapeFamily::Cylinder => [self.radius, self.radius],
        }
    }

    /// Толщина дна (0, если дна нет)
    pub fn floor_thickness(&self) -> f64 {
        if self.has_floor {
            self.wall_thickness
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snapshot_is_valid() {
        assert_eq!(DimensionSnapshot::default().validate(), Ok(()));
    }

    #[test]
    fn test_non_positive_rejected() {
        let s = DimensionSnapshot::default().with(DimensionName::Height, 0.0);
        assert!(matches!(
            s.validate(),
            Err(DimensionError::InvalidDimension { ref name, .. }) if name == "height"
        ));

        let s = DimensionSnapshot::default().with(DimensionName::Length, -5.0);
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        let s = DimensionSnapshot::default().with(DimensionName::Width, f64::NAN);
        assert!(s.validate().is_err());
        let s = DimensionSnapshot::default().with(DimensionName::Width, f64::INFINITY);
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_box_wall_limit() {
        let s = DimensionSnapshot::rect(100.0, 60.0, 40.0, 29.9);
        assert!(s.validate().is_ok());
        let s = DimensionSnapshot::rect(100.0, 60.0, 40.0, 30.0);
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_cylinder_wall_must_stay_below_inner_radius() {
        assert!(DimensionSnapshot::cylinder(10.0, 50.0, 9.0).validate().is_ok());
        assert!(DimensionSnapshot::cylinder(10.0, 50.0, 10.0).validate().is_err());
        assert!(DimensionSnapshot::cylinder(10.0, 50.0, 12.0).validate().is_err());
    }

    #[test]
    fn test_floor_requires_height() {
        let mut s = DimensionSnapshot::rect(200.0, 200.0, 5.0, 6.0);
        assert!(s.validate().is_err());
        s.has_floor = false;
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_outer_radius_is_inner_plus_wall() {
        let s = DimensionSnapshot::cylinder(2.0, 30.0, 1.5);
        assert!((s.outer_radius() - 3.5).abs() < 1e-12);
        assert!((s.outer_length() - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_cavity_half_extents_exact() {
        let s = DimensionSnapshot::rect(100.0, 80.0, 40.0, 10.0);
        assert_eq!(s.cavity_half_extents(), [40.0, 30.0]);
    }

    #[test]
    fn test_error_display() {
        let e = DimensionError::invalid("length", "must be greater than zero, got 0");
        assert_eq!(
            e.to_string(),
            "Invalid dimension 'length': must be greater than zero, got 0"
        );
        let e = DimensionError::UnsupportedShapeFamily("cone".to_string());
        assert_eq!(e.to_string(), "Unsupported shape family 'cone'");
    }
}
