use glam::{Mat4, Vec3};
use rasterizer::Rasterizer;

use crate::model::Mesh;
use crate::shader::{
    DepthUniform, DepthVertexShader, SceneFragmentShader, SceneUniform, SceneVertexShader,
    TextureUnits, ALBEDO_UNIT, AO_UNIT, METALLIC_UNIT, NORMAL_UNIT, ROUGHNESS_UNIT,
};
use crate::texture::Texture;

use super::orientation::ObjectOrientation;
use super::SceneAssets;

/// The ground never moves.
pub const GROUND_TRANSFORM: Mat4 = Mat4::IDENTITY;

/// What the shared draw routine needs from a render pass: set the model
/// transform, adjust texture bindings, draw a mesh. Both passes implement
/// it so the scene is drawn by exactly one piece of code.
pub trait ScenePass<'a> {
    fn set_model(&mut self, model: Mat4);
    fn bind_texture(&mut self, unit: usize, texture: &'a Texture);
    fn unbind_texture(&mut self, unit: usize);
    fn draw(&mut self, mesh: &Mesh);
}

/// Model transform from the accumulated orientation, ending in the fixed
/// axis correction for the z-up asset.
pub fn model_transform(orientation: &ObjectOrientation) -> Mat4 {
    Mat4::from_translation(Vec3::ZERO)
        * Mat4::from_rotation_x(orientation.pitch)
        * Mat4::from_rotation_y(orientation.yaw)
        * Mat4::from_rotation_x((-90.0f32).to_radians())
}

/// Draws the model, then the ground. The order is load-bearing: the ground
/// rebinds unit 0 and unbinds units 1-4, leaving the unit table clean for
/// whatever binds next.
pub fn draw_scene<'a, P: ScenePass<'a>>(
    pass: &mut P,
    assets: &'a SceneAssets,
    orientation: &ObjectOrientation,
) {
    pass.set_model(model_transform(orientation));
    pass.bind_texture(ALBEDO_UNIT, &assets.materials.albedo);
    pass.bind_texture(NORMAL_UNIT, &assets.materials.normal);
    pass.bind_texture(METALLIC_UNIT, &assets.materials.metallic);
    pass.bind_texture(ROUGHNESS_UNIT, &assets.materials.roughness);
    pass.bind_texture(AO_UNIT, &assets.materials.ambient_occlusion);
    pass.draw(&assets.model);

    pass.set_model(GROUND_TRANSFORM);
    pass.bind_texture(ALBEDO_UNIT, &assets.ground_texture);
    for unit in NORMAL_UNIT..=AO_UNIT {
        pass.unbind_texture(unit);
    }
    pass.draw(&assets.ground);
}

/// Depth-only pass into the shadow target. Bindings are tracked but never
/// sampled; the depth pipeline has no fragment stage.
pub struct DepthPass<'a> {
    target: &'a mut Rasterizer,
    uniform: DepthUniform,
    units: TextureUnits<'a>,
}

impl<'a> DepthPass<'a> {
    pub fn new(target: &'a mut Rasterizer, light_space: Mat4) -> Self {
        Self {
            target,
            uniform: DepthUniform {
                light_space,
                model: Mat4::IDENTITY,
            },
            units: TextureUnits::new(),
        }
    }

    pub fn units(&self) -> &TextureUnits<'a> {
        &self.units
    }
}

impl<'a> ScenePass<'a> for DepthPass<'a> {
    fn set_model(&mut self, model: Mat4) {
        self.uniform.model = model;
    }

    fn bind_texture(&mut self, unit: usize, texture: &'a Texture) {
        self.units.bind_image(unit, texture);
    }

    fn unbind_texture(&mut self, unit: usize) {
        self.units.unbind(unit);
    }

    fn draw(&mut self, mesh: &Mesh) {
        self.target.render_mesh_depth(
            &mesh.vertices,
            &mesh.indices,
            &DepthVertexShader,
            &self.uniform,
        );
    }
}

/// Full material pass into the window-resolution target.
pub struct ColorPass<'a> {
    target: &'a mut Rasterizer,
    uniform: SceneUniform<'a>,
}

impl<'a> ColorPass<'a> {
    pub fn new(target: &'a mut Rasterizer, uniform: SceneUniform<'a>) -> Self {
        Self { target, uniform }
    }

    pub fn units(&self) -> &TextureUnits<'a> {
        &self.uniform.units
    }
}

impl<'a> ScenePass<'a> for ColorPass<'a> {
    fn set_model(&mut self, model: Mat4) {
        self.uniform.model = model;
    }

    fn bind_texture(&mut self, unit: usize, texture: &'a Texture) {
        self.uniform.units.bind_image(unit, texture);
    }

    fn unbind_texture(&mut self, unit: usize) {
        self.uniform.units.unbind(unit);
    }

    fn draw(&mut self, mesh: &Mesh) {
        self.target.render_mesh(
            &mesh.vertices,
            &mesh.indices,
            &SceneVertexShader,
            &SceneFragmentShader,
            &self.uniform,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::test_assets;
    use crate::shader::SHADOW_UNIT;
    use approx::assert_relative_eq;

    fn assert_mat4_eq(actual: Mat4, expected: Mat4) {
        for (a, b) in actual
            .to_cols_array()
            .iter()
            .zip(expected.to_cols_array().iter())
        {
            assert_relative_eq!(a, b, epsilon = 1e-6);
        }
    }

    #[test]
    fn model_transform_composes_in_fixed_order() {
        for (pitch, yaw) in [(0.0, 0.0), (0.7, -1.3), (-2.0, 4.5)] {
            let mut orientation = ObjectOrientation::default();
            orientation.pitch = pitch;
            orientation.yaw = yaw;
            let expected = Mat4::from_translation(Vec3::ZERO)
                * Mat4::from_rotation_x(pitch)
                * Mat4::from_rotation_y(yaw)
                * Mat4::from_rotation_x((-90.0f32).to_radians());
            assert_mat4_eq(model_transform(&orientation), expected);
        }
    }

    #[test]
    fn at_rest_only_the_axis_correction_applies() {
        let transform = model_transform(&ObjectOrientation::default());
        // Rotating -90 degrees around X maps +Z up.
        let up = transform.transform_vector3(Vec3::Z);
        assert_relative_eq!(up.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(up.y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(up.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn ground_transform_is_identity() {
        assert_eq!(GROUND_TRANSFORM, Mat4::IDENTITY);
    }

    #[test]
    fn ground_draw_leaves_only_unit_zero_bound() {
        let assets = test_assets();
        let mut target = Rasterizer::new(8, 8);
        let mut pass = DepthPass::new(&mut target, Mat4::IDENTITY);

        draw_scene(&mut pass, &assets, &ObjectOrientation::default());

        let units = pass.units();
        assert!(std::ptr::eq(
            units.image(ALBEDO_UNIT).unwrap(),
            &assets.ground_texture
        ));
        for unit in NORMAL_UNIT..=AO_UNIT {
            assert!(!units.is_bound(unit), "unit {unit} still bound");
        }
        assert!(!units.is_bound(SHADOW_UNIT));
    }

    #[test]
    fn scene_draws_model_before_ground() {
        #[derive(Default)]
        struct RecordingPass {
            ops: Vec<String>,
        }

        impl<'a> ScenePass<'a> for RecordingPass {
            fn set_model(&mut self, model: Mat4) {
                if model == GROUND_TRANSFORM {
                    self.ops.push("model:identity".into());
                } else {
                    self.ops.push("model:oriented".into());
                }
            }

            fn bind_texture(&mut self, unit: usize, _texture: &'a Texture) {
                self.ops.push(format!("bind:{unit}"));
            }

            fn unbind_texture(&mut self, unit: usize) {
                self.ops.push(format!("unbind:{unit}"));
            }

            fn draw(&mut self, _mesh: &Mesh) {
                self.ops.push("draw".into());
            }
        }

        let assets = test_assets();
        let mut orientation = ObjectOrientation::default();
        orientation.pitch = 0.4;
        orientation.yaw = 1.1;
        let mut pass = RecordingPass::default();
        draw_scene(&mut pass, &assets, &orientation);

        assert_eq!(
            pass.ops,
            vec![
                "model:oriented",
                "bind:0",
                "bind:1",
                "bind:2",
                "bind:3",
                "bind:4",
                "draw",
                "model:identity",
                "bind:0",
                "unbind:1",
                "unbind:2",
                "unbind:3",
                "unbind:4",
                "draw",
            ]
        );
    }
}
