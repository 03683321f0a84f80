use glam::{Mat4, Vec3};
use rasterizer::{DepthMap, Rasterizer};

use crate::shader::SHADOW_UNIT;

use super::draw::{draw_scene, DepthPass};
use super::orientation::ObjectOrientation;
use super::SceneAssets;

pub const SHADOW_MAP_SIZE: u32 = 1024;

// The position the shading light sits at and the position the depth pass
// views the scene from are distinct; both carry over from the scene's
// original tuning.
pub const LIGHT_POSITION: Vec3 = Vec3::new(-20.0, 6.0, -5.0);
pub const LIGHT_TARGET: Vec3 = Vec3::ZERO;
pub const LIGHT_UP: Vec3 = Vec3::Y;
pub const SHADOW_INTENSITY: f32 = 3.5;
const SHADOW_VIEW_POSITION: Vec3 = Vec3::new(-2.0, 4.0, -1.0);

// Orthographic light frustum, sized to the scene.
const FRUSTUM_EXTENT: f32 = 10.0;
const FRUSTUM_NEAR: f32 = 1.0;
const FRUSTUM_FAR: f32 = 7.5;

/// Light projection × view. Computed once per frame and handed unmodified
/// to both render passes; they must agree bit-for-bit.
pub fn light_space_transform() -> Mat4 {
    let projection = Mat4::orthographic_rh(
        -FRUSTUM_EXTENT,
        FRUSTUM_EXTENT,
        -FRUSTUM_EXTENT,
        FRUSTUM_EXTENT,
        FRUSTUM_NEAR,
        FRUSTUM_FAR,
    );
    let view = Mat4::look_at_rh(SHADOW_VIEW_POSITION, LIGHT_TARGET, LIGHT_UP);
    projection * view
}

/// Owns the fixed-resolution depth target and renders the scene into it
/// from the light's point of view.
pub struct ShadowPass {
    target: Rasterizer,
}

impl ShadowPass {
    pub fn new() -> Self {
        Self {
            target: Rasterizer::new(SHADOW_MAP_SIZE, SHADOW_MAP_SIZE),
        }
    }

    /// Depth-only render of the whole scene. Clears nothing but depth; the
    /// target has no color worth keeping.
    pub fn render(
        &mut self,
        assets: &SceneAssets,
        orientation: &ObjectOrientation,
        light_space: Mat4,
    ) {
        self.target.clear_depth();
        let mut pass = DepthPass::new(&mut self.target, light_space);
        draw_scene(&mut pass, assets, orientation);
        // The depth pass only ever sees material bindings.
        debug_assert!(!pass.units().is_bound(SHADOW_UNIT));
    }

    /// The depth plane the color pass binds to the shadow unit.
    pub fn depth_map(&self) -> DepthMap<'_> {
        self.target.framebuffer().depth_map()
    }
}

impl Default for ShadowPass {
    fn default() -> Self {
        Self::new()
    }
}
