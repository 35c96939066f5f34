//! Phong surface materials
//!
//! Furniture parts carry a flat colour plus the four Phong coefficients the
//! shaded pass uses. Materials are plain values; the GPU engine packs them
//! per instance.

/// Surface description for the shaded pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Linear RGBA colour
    pub color: [f32; 4],
    /// Fraction of the colour that shows without any light
    pub ambient: f32,
    pub diffusivity: f32,
    pub specularity: f32,
    /// Specular exponent
    pub smoothness: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: [0.8, 0.8, 0.8, 1.0],
            ambient: 0.2,
            diffusivity: 0.8,
            specularity: 0.1,
            smoothness: 40.0,
        }
    }
}

impl Material {
    /// Creates a material from a `0xRRGGBB` colour with default coefficients.
    pub fn from_hex(rgb: u32) -> Self {
        Self::default().with_hex(rgb)
    }

    /// Builder pattern: Set base color from RGB values
    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.color = [r, g, b, self.color[3]];
        self
    }

    /// Builder pattern: Set base color from a `0xRRGGBB` value
    pub fn with_hex(self, rgb: u32) -> Self {
        let channel = |shift: u32| ((rgb >> shift) & 0xFF) as f32 / 255.0;
        self.with_color(channel(16), channel(8), channel(0))
    }

    pub fn with_ambient(mut self, ambient: f32) -> Self {
        self.ambient = ambient.clamp(0.0, 1.0);
        self
    }

    pub fn with_diffusivity(mut self, diffusivity: f32) -> Self {
        self.diffusivity = diffusivity.max(0.0);
        self
    }

    pub fn with_specularity(mut self, specularity: f32) -> Self {
        self.specularity = specularity.max(0.0);
        self
    }

    pub fn with_smoothness(mut self, smoothness: f32) -> Self {
        self.smoothness = smoothness.max(1.0);
        self
    }

    /// Coefficients packed as `[ambient, diffusivity, specularity, smoothness]`.
    pub fn params(&self) -> [f32; 4] {
        [
            self.ambient,
            self.diffusivity,
            self.specularity,
            self.smoothness,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color() {
        let material = Material::from_hex(0xd9be7e);
        assert!((material.color[0] - 217.0 / 255.0).abs() < 1e-6);
        assert!((material.color[1] - 190.0 / 255.0).abs() < 1e-6);
        assert!((material.color[2] - 126.0 / 255.0).abs() < 1e-6);
        assert_eq!(material.color[3], 1.0);
    }

    #[test]
    fn test_builder_clamps() {
        let material = Material::default()
            .with_ambient(1.5)
            .with_diffusivity(-1.0)
            .with_smoothness(0.0);
        assert_eq!(material.ambient, 1.0);
        assert_eq!(material.diffusivity, 0.0);
        assert_eq!(material.smoothness, 1.0);
        assert_eq!(material.params(), [1.0, 0.0, 0.1, 1.0]);
    }
}
