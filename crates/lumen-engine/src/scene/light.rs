use glam::Vec3;

use crate::coords::Color;

/// Light source. Point lights take their position from the owning object's transform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Light {
    Ambient { color: Color, intensity: f32 },
    Directional { color: Color, intensity: f32, direction: Vec3 },
    Point { color: Color, intensity: f32, range: f32 },
}

impl Light {
    pub fn ambient(color: Color, intensity: f32) -> Self {
        Light::Ambient { color, intensity }
    }

    /// `direction` points from the light toward the scene; it is normalized here.
    pub fn directional(color: Color, intensity: f32, direction: Vec3) -> Self {
        Light::Directional {
            color,
            intensity,
            direction: direction.normalize_or(Vec3::NEG_Y),
        }
    }

    pub fn point(color: Color, intensity: f32, range: f32) -> Self {
        Light::Point { color, intensity, range }
    }

    pub fn color(&self) -> Color {
        match self {
            Light::Ambient { color, .. }
            | Light::Directional { color, .. }
            | Light::Point { color, .. } => *color,
        }
    }
}
