use glam::{Mat4, Vec2, Vec3, Vec4};
use rasterizer::DepthMap;

use crate::texture::Texture;

mod depth;
mod scene;

pub use depth::DepthVertexShader;
pub use scene::{SceneData, SceneFragmentShader, SceneVertexShader};

// Texture-unit protocol shared by the draw routine and the shaders. The
// numbers are part of the contract; don't reorder them.
pub const ALBEDO_UNIT: usize = 0;
pub const NORMAL_UNIT: usize = 1;
pub const METALLIC_UNIT: usize = 2;
pub const ROUGHNESS_UNIT: usize = 3;
pub const AO_UNIT: usize = 4;
pub const SHADOW_UNIT: usize = 5;
pub const TEXTURE_UNIT_COUNT: usize = 6;

#[derive(Copy, Clone)]
pub enum TextureBinding<'a> {
    Image(&'a Texture),
    Depth(DepthMap<'a>),
}

/// Fixed-slot binding table. The fragment shaders sample through it; the
/// draw routine rebinds slots between the model and ground draws.
#[derive(Copy, Clone)]
pub struct TextureUnits<'a> {
    slots: [Option<TextureBinding<'a>>; TEXTURE_UNIT_COUNT],
}

impl<'a> TextureUnits<'a> {
    pub fn new() -> Self {
        Self {
            slots: [None; TEXTURE_UNIT_COUNT],
        }
    }

    pub fn bind_image(&mut self, unit: usize, texture: &'a Texture) {
        self.slots[unit] = Some(TextureBinding::Image(texture));
    }

    pub fn bind_depth(&mut self, unit: usize, map: DepthMap<'a>) {
        self.slots[unit] = Some(TextureBinding::Depth(map));
    }

    pub fn unbind(&mut self, unit: usize) {
        self.slots[unit] = None;
    }

    pub fn is_bound(&self, unit: usize) -> bool {
        self.slots[unit].is_some()
    }

    pub fn image(&self, unit: usize) -> Option<&'a Texture> {
        match self.slots[unit] {
            Some(TextureBinding::Image(texture)) => Some(texture),
            _ => None,
        }
    }

    pub fn depth(&self, unit: usize) -> Option<DepthMap<'a>> {
        match self.slots[unit] {
            Some(TextureBinding::Depth(map)) => Some(map),
            _ => None,
        }
    }

    /// Sample whatever is bound at `unit`; `None` when the slot is empty.
    /// Depth maps sample into the red channel.
    pub fn sample(&self, unit: usize, uv: Vec2) -> Option<Vec4> {
        if let Some(texture) = self.image(unit) {
            return Some(texture.sample(uv));
        }
        self.depth(unit)
            .map(|map| Vec4::new(map.sample(uv), 0.0, 0.0, 1.0))
    }
}

impl<'a> Default for TextureUnits<'a> {
    fn default() -> Self {
        Self::new()
    }
}

/// Uniforms for the full material program.
pub struct SceneUniform<'a> {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub light_space: Mat4,
    pub light_pos: Vec3,
    pub light_dir: Vec3,
    pub cam_pos: Vec3,
    pub shadow_intensity: f32,
    pub units: TextureUnits<'a>,
}

/// Uniforms for the depth-only program.
pub struct DepthUniform {
    pub light_space: Mat4,
    pub model: Mat4,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_start_unbound() {
        let units = TextureUnits::new();
        for unit in 0..TEXTURE_UNIT_COUNT {
            assert!(!units.is_bound(unit));
            assert!(units.sample(unit, Vec2::ZERO).is_none());
        }
    }

    #[test]
    fn bind_and_unbind_images() {
        let texture = Texture::empty();
        let mut units = TextureUnits::new();

        units.bind_image(ALBEDO_UNIT, &texture);
        assert!(units.is_bound(ALBEDO_UNIT));
        assert!(std::ptr::eq(units.image(ALBEDO_UNIT).unwrap(), &texture));
        assert_eq!(
            units.sample(ALBEDO_UNIT, Vec2::ZERO),
            Some(Vec4::new(0.0, 0.0, 0.0, 1.0))
        );

        units.unbind(ALBEDO_UNIT);
        assert!(!units.is_bound(ALBEDO_UNIT));
        assert!(units.image(ALBEDO_UNIT).is_none());
    }

    #[test]
    fn depth_bindings_are_not_images() {
        let raster = rasterizer::Rasterizer::new(2, 2);
        let mut units = TextureUnits::new();
        units.bind_depth(SHADOW_UNIT, raster.framebuffer().depth_map());

        assert!(units.is_bound(SHADOW_UNIT));
        assert!(units.image(SHADOW_UNIT).is_none());
        assert!(units.depth(SHADOW_UNIT).is_some());
        // Freshly cleared depth samples at the far plane.
        assert_eq!(
            units.sample(SHADOW_UNIT, Vec2::new(0.5, 0.5)),
            Some(Vec4::new(1.0, 0.0, 0.0, 1.0))
        );
    }
}
