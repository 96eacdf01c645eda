use std::fmt;
use std::str::FromStr;

use crate::coords::Color;

/// Surface look of a mesh.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum MaterialVariant {
    #[default]
    Solid,
    Wireframe,
    Metallic,
    Glass,
}

impl MaterialVariant {
    pub const ALL: [MaterialVariant; 4] = [
        MaterialVariant::Solid,
        MaterialVariant::Wireframe,
        MaterialVariant::Metallic,
        MaterialVariant::Glass,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MaterialVariant::Solid => "solid",
            MaterialVariant::Wireframe => "wireframe",
            MaterialVariant::Metallic => "metallic",
            MaterialVariant::Glass => "glass",
        }
    }
}

impl fmt::Display for MaterialVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaterialVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MaterialVariant::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| s.to_string())
    }
}

/// Per-object material. Mutated in place by incremental reconfiguration.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    pub color: Color,
    pub variant: MaterialVariant,
    /// Self-illumination in `[0, 1]`; neon trims and signs use this.
    pub emissive: f32,
}

impl Material {
    pub fn solid(color: Color) -> Self {
        Self { color, variant: MaterialVariant::Solid, emissive: 0.0 }
    }

    pub fn with_variant(mut self, variant: MaterialVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_emissive(mut self, emissive: f32) -> Self {
        self.emissive = emissive.clamp(0.0, 1.0);
        self
    }

    pub fn metalness(&self) -> f32 {
        match self.variant {
            MaterialVariant::Metallic => 0.9,
            _ => 0.1,
        }
    }

    pub fn roughness(&self) -> f32 {
        match self.variant {
            MaterialVariant::Metallic => 0.1,
            MaterialVariant::Glass => 0.05,
            _ => 0.5,
        }
    }

    pub fn opacity(&self) -> f32 {
        match self.variant {
            MaterialVariant::Glass => 0.35 * self.color.a,
            _ => self.color.a,
        }
    }

    /// Drawn after opaque geometry with blending and no depth writes.
    pub fn is_translucent(&self) -> bool {
        self.opacity() < 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_names_round_trip() {
        for v in MaterialVariant::ALL {
            assert_eq!(v.as_str().parse::<MaterialVariant>().unwrap(), v);
        }
        assert_eq!(" Glass ".parse::<MaterialVariant>().unwrap(), MaterialVariant::Glass);
        assert!("chrome".parse::<MaterialVariant>().is_err());
    }

    #[test]
    fn glass_is_translucent() {
        let m = Material::solid(Color::white()).with_variant(MaterialVariant::Glass);
        assert!(m.is_translucent());
        assert!(!Material::solid(Color::white()).is_translucent());
    }
}
