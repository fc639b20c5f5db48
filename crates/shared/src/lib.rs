use serde::{Deserialize, Serialize};

mod dimensions;
mod expression;
mod layout;

pub use dimensions::{DimensionError, DimensionResult};
pub use expression::evaluate_input;
pub use layout::{DividerAxis, DividerLayout, SegmentKey};

/// Семейство формы изделия (закрытый набор)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ShapeFamily {
    /// Прямоугольный короб со стенками
    #[default]
    Box,
    /// Цилиндрическая оболочка
    Cylinder,
}

impl ShapeFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeFamily::Box => "box",
            ShapeFamily::Cylinder => "cylinder",
        }
    }

    /// Все поддерживаемые семейства
    pub fn all() -> &'static [ShapeFamily] {
        &[ShapeFamily::Box, ShapeFamily::Cylinder]
    }
}

impl std::str::FromStr for ShapeFamily {
    type Err = DimensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "box" | "rect" | "rectangular" => Ok(ShapeFamily::Box),
            "cylinder" | "round" | "cylindrical" => Ok(ShapeFamily::Cylinder),
            other => Err(DimensionError::UnsupportedShapeFamily(other.to_string())),
        }
    }
}

impl TryFrom<String> for ShapeFamily {
    type Error = DimensionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ShapeFamily> for String {
    fn from(family: ShapeFamily) -> Self {
        family.as_str().to_string()
    }
}

impl std::fmt::Display for ShapeFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Имя редактируемого размера
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionName {
    /// Длина по оси X
    Length,
    /// Ширина по оси Z
    Width,
    /// Высота по оси Y
    Height,
    /// Внутренний радиус (угла полости или цилиндра)
    Radius,
    /// Толщина стенки
    WallThickness,
}

impl DimensionName {
    pub fn as_str(&self) -> &'static str {
        match self {
            DimensionName::Length => "length",
            DimensionName::Width => "width",
            DimensionName::Height => "height",
            DimensionName::Radius => "radius",
            DimensionName::WallThickness => "wall_thickness",
        }
    }

    /// Короткое имя переменной для формул ввода
    pub fn variable(&self) -> &'static str {
        match self {
            DimensionName::Length => "l",
            DimensionName::Width => "w",
            DimensionName::Height => "h",
            DimensionName::Radius => "r",
            DimensionName::WallThickness => "wall",
        }
    }

    pub fn all() -> &'static [DimensionName] {
        &[
            DimensionName::Length,
            DimensionName::Width,
            DimensionName::Height,
            DimensionName::Radius,
            DimensionName::WallThickness,
        ]
    }
}

impl std::str::FromStr for DimensionName {
    type Err = DimensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "length" => Ok(DimensionName::Length),
            "w" | "width" | "depth" => Ok(DimensionName::Width),
            "h" | "height" => Ok(DimensionName::Height),
            "r" | "radius" => Ok(DimensionName::Radius),
            "wall" | "wall_thickness" | "wall-thickness" | "thickness" => {
                Ok(DimensionName::WallThickness)
            }
            other => Err(DimensionError::InvalidDimension {
                name: other.to_string(),
                reason: "unknown dimension".to_string(),
            }),
        }
    }
}

impl std::fmt::Display for DimensionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_true() -> bool {
    true
}

/// Неизменяемый снимок размеров изделия (все величины в миллиметрах)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionSnapshot {
    /// Семейство формы
    #[serde(default)]
    pub family: ShapeFamily,
    /// Внешняя длина (X), только для короба
    pub length: f64,
    /// Внешняя ширина (Z), только для короба
    pub width: f64,
    /// Внешняя высота (Y)
    pub height: f64,
    /// Внутренний радиус: угол полости короба или ёмкость цилиндра
    pub radius: f64,
    /// Толщина стенки
    pub wall_thickness: f64,
    /// Есть ли дно (уменьшает глубину полости на толщину стенки)
    #[serde(default = "default_true")]
    pub has_floor: bool,
}

impl Default for DimensionSnapshot {
    fn default() -> Self {
        Self {
            family: ShapeFamily::Box,
            length: 120.0,
            width: 120.0,
            height: 40.0,
            radius: 8.0,
            wall_thickness: 2.0,
            has_floor: true,
        }
    }
}

impl DimensionSnapshot {
    /// Создать короб с заданными внешними размерами
    pub fn rect(length: f64, width: f64, height: f64, wall_thickness: f64) -> Self {
        Self {
            family: ShapeFamily::Box,
            length,
            width,
            height,
            wall_thickness,
            ..Self::default()
        }
    }

    /// Создать цилиндр по внутреннему радиусу
    pub fn cylinder(inner_radius: f64, height: f64, wall_thickness: f64) -> Self {
        Self {
            family: ShapeFamily::Cylinder,
            radius: inner_radius,
            height,
            wall_thickness,
            ..Self::default()
        }
    }

    /// Получить значение размера по имени
    pub fn get(&self, name: DimensionName) -> f64 {
        match name {
            DimensionName::Length => self.length,
            DimensionName::Width => self.width,
            DimensionName::Height => self.height,
            DimensionName::Radius => self.radius,
            DimensionName::WallThickness => self.wall_thickness,
        }
    }

    /// Копия снимка с заменённым размером (без проверки)
    pub fn with(&self, name: DimensionName, value: f64) -> Self {
        let mut next = *self;
        match name {
            DimensionName::Length => next.length = value,
            DimensionName::Width => next.width = value,
            DimensionName::Height => next.height = value,
            DimensionName::Radius => next.radius = value,
            DimensionName::WallThickness => next.wall_thickness = value,
        }
        next
    }
}
