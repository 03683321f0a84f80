use glam::{Mat4, Vec3};
use rasterizer::{DepthMap, Rasterizer};

use crate::shader::{SceneUniform, TextureUnits, SHADOW_UNIT};

use super::camera::Camera;
use super::draw::{draw_scene, ColorPass};
use super::orientation::ObjectOrientation;
use super::shadow::{LIGHT_POSITION, LIGHT_TARGET, SHADOW_INTENSITY};
use super::SceneAssets;

const BACKGROUND: Vec3 = Vec3::ZERO;

/// Color pass over the full scene. Must run after the shadow pass has
/// filled `shadow_map` for the same `light_space` value; with a stale or
/// unwritten map the shadows are garbage.
pub fn render<'a>(
    target: &'a mut Rasterizer,
    camera: &Camera,
    aspect: f32,
    assets: &'a SceneAssets,
    orientation: &ObjectOrientation,
    shadow_map: DepthMap<'a>,
    light_space: Mat4,
) {
    target.clear(BACKGROUND);

    let mut units = TextureUnits::new();
    units.bind_depth(SHADOW_UNIT, shadow_map);

    let uniform = SceneUniform {
        model: Mat4::IDENTITY,
        view: camera.view_matrix(),
        projection: camera.projection_matrix(aspect),
        light_space,
        light_pos: LIGHT_POSITION,
        light_dir: (LIGHT_TARGET - LIGHT_POSITION).normalize(),
        cam_pos: camera.position,
        shadow_intensity: SHADOW_INTENSITY,
        units,
    };

    let mut pass = ColorPass::new(target, uniform);
    draw_scene(&mut pass, assets, orientation);
    // The ground's unbind sequence must not touch the shadow unit.
    debug_assert!(pass.units().is_bound(SHADOW_UNIT));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::shadow::{light_space_transform, ShadowPass};
    use crate::scene::test_assets;
    use crate::texture::Texture;
    use image::{DynamicImage, Rgb, RgbImage};

    #[test]
    fn two_pass_frame_shades_visible_fragments() {
        let mut assets = test_assets();
        // A white ground so lit fragments are clearly non-background.
        assets.ground_texture = Texture::decode(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            2,
            2,
            Rgb([255, 255, 255]),
        )))
        .unwrap();

        let orientation = ObjectOrientation::default();
        let light_space = light_space_transform();

        let mut shadow = ShadowPass::new();
        shadow.render(&assets, &orientation, light_space);

        let camera = Camera::default();
        let mut target = Rasterizer::new(64, 48);
        render(
            &mut target,
            &camera,
            64.0 / 48.0,
            &assets,
            &orientation,
            shadow.depth_map(),
            light_space,
        );

        // The ground fills the lower half of the default view.
        let shaded = target
            .framebuffer()
            .color()
            .filter(|(_, _, c)| **c != BACKGROUND)
            .count();
        assert!(shaded > 0);
    }
}
