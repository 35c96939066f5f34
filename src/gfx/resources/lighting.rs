//! Point lights and the per-frame light buffer
//!
//! Lights are gathered fresh every frame: the room pushes its global light,
//! then every object adds whatever it emits at its current animation
//! progress. The buffer is handed to the backend with the camera in
//! [`FrameGlobals`](crate::gfx::backend::FrameGlobals).

use cgmath::Point3;

/// Upper bound on lights the shaded pass evaluates.
pub const MAX_LIGHTS: usize = 8;

/// Point light with inverse-square falloff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Point3<f32>,
    pub color: [f32; 3],
    /// Distance² at which the light has dropped to half strength.
    pub size: f32,
}

impl Light {
    pub fn new(position: Point3<f32>, color: [f32; 3], size: f32) -> Self {
        Self {
            position,
            color,
            size,
        }
    }

    /// `1 / (1 + d² / size)`.
    pub fn attenuation(&self, distance_squared: f32) -> f32 {
        if self.size <= 0.0 {
            return 0.0;
        }
        1.0 / (1.0 + distance_squared / self.size)
    }

    pub fn is_dark(&self) -> bool {
        self.size <= 0.0 || self.color.iter().all(|&c| c <= 0.0)
    }
}

/// GPU layout of one light.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightRaw {
    pub position: [f32; 4],
    pub color: [f32; 4],
    /// `x` holds `1 / size`; the rest is padding.
    pub falloff: [f32; 4],
}

impl From<&Light> for LightRaw {
    fn from(light: &Light) -> Self {
        Self {
            position: [light.position.x, light.position.y, light.position.z, 1.0],
            color: [light.color[0], light.color[1], light.color[2], 1.0],
            falloff: [1.0 / light.size, 0.0, 0.0, 0.0],
        }
    }
}

/// Lights contributing to one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightBuffer {
    lights: Vec<Light>,
    dropped: usize,
}

impl LightBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a light. Dark lights are skipped and anything past
    /// [`MAX_LIGHTS`] is dropped.
    pub fn push(&mut self, light: Light) {
        if light.is_dark() {
            return;
        }
        if self.lights.len() >= MAX_LIGHTS {
            if self.dropped == 0 {
                log::warn!("light buffer full, dropping lights past {}", MAX_LIGHTS);
            }
            self.dropped += 1;
            return;
        }
        self.lights.push(light);
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Fixed-size GPU array plus the number of live entries.
    pub fn to_raw(&self) -> ([LightRaw; MAX_LIGHTS], u32) {
        let mut raw = [LightRaw::default(); MAX_LIGHTS];
        for (slot, light) in raw.iter_mut().zip(&self.lights) {
            *slot = light.into();
        }
        (raw, self.lights.len() as u32)
    }
}
