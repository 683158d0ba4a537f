use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Parallel light shining from the owning node's position towards the origin.
    Directional,
    /// Uniform, directionless fill light.
    Ambient,
}

/// Light component in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub color: Vec3,
    pub intensity: f32,
    pub kind: LightKind,
}

impl Light {
    #[must_use]
    pub fn new_directional(color: Vec3, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Directional,
        }
    }

    #[must_use]
    pub fn new_ambient(color: Vec3, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Ambient,
        }
    }
}

/// Converts a packed `0xRRGGBB` colour to linear-ish `[0, 1]` components.
#[must_use]
pub fn color_from_hex(hex: u32) -> Vec3 {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    Vec3::new(r, g, b)
}
