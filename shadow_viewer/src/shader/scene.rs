use glam::{Mat3, Vec2, Vec3, Vec4, Vec4Swizzles as _};
use rasterizer::{FragmentShader, Interpolate, VertexShader};

use crate::model::MeshVertex;

use super::{
    SceneUniform, ALBEDO_UNIT, AO_UNIT, METALLIC_UNIT, NORMAL_UNIT, ROUGHNESS_UNIT, SHADOW_UNIT,
};

#[derive(Clone, Interpolate)]
pub struct SceneData {
    // world position
    pub position: Vec3,
    pub normal: Vec3,
    pub texcoord: Vec2,
    pub tangent: Vec3,
    pub bitangent: Vec3,
    pub light_space_position: Vec4,
}

pub struct SceneVertexShader;

impl<'a> VertexShader<SceneUniform<'a>> for SceneVertexShader {
    type VertexData = MeshVertex;
    type SharedData = SceneData;

    fn vertex(&self, vertex: &MeshVertex, uniform: &SceneUniform<'a>) -> (Vec4, SceneData) {
        let world = uniform.model * vertex.position.extend(1.0);
        let clip = uniform.projection * uniform.view * world;

        // The model matrix carries no scale, so its linear part moves
        // normals directly.
        let rotation = Mat3::from_mat4(uniform.model);
        let data = SceneData {
            position: world.xyz(),
            normal: rotation * vertex.normal,
            texcoord: vertex.texcoord,
            tangent: rotation * vertex.tangent,
            bitangent: rotation * vertex.bitangent,
            light_space_position: uniform.light_space * world,
        };
        (clip, data)
    }
}

pub struct SceneFragmentShader;

impl SceneFragmentShader {
    fn normal_dist_ggx(normal: Vec3, halfway: Vec3, roughness: f32) -> f32 {
        let a2 = roughness * roughness;
        let ndot_h = normal.dot(halfway).max(0.0);
        let ndot_h2 = ndot_h * ndot_h;

        let mut denom = ndot_h2 * (a2 - 1.0) + 1.0;
        denom = std::f32::consts::PI * denom * denom;

        a2 / denom
    }

    fn geometry_schlick_ggx(n_dot_v: f32, roughness: f32) -> f32 {
        n_dot_v / (n_dot_v * (1.0 - roughness) + roughness)
    }

    fn geometry_smith(normal: Vec3, view: Vec3, light: Vec3, roughness: f32) -> f32 {
        let n_dot_v = normal.dot(view).max(0.0);
        let n_dot_l = normal.dot(light).max(0.0);
        let ggx1 = Self::geometry_schlick_ggx(n_dot_v, roughness);
        let ggx2 = Self::geometry_schlick_ggx(n_dot_l, roughness);
        ggx1 * ggx2
    }

    fn fresnel_schlick(cos_theta: f32, f0: Vec3) -> Vec3 {
        f0 + (1.0 - f0) * (1.0 - cos_theta).powi(5)
    }

    /// 1.0 when the fragment is occluded in light space, 0.0 otherwise.
    fn shadow_factor(uniform: &SceneUniform, shared: &SceneData, normal: Vec3) -> f32 {
        let map = match uniform.units.depth(SHADOW_UNIT) {
            Some(map) => map,
            None => return 0.0,
        };
        let ndc = shared.light_space_position.xyz() / shared.light_space_position.w;
        if ndc.z > 1.0 {
            return 0.0;
        }
        let uv = Vec2::new(ndc.x, ndc.y) * 0.5 + Vec2::splat(0.5);
        let closest = map.sample(uv);
        // Slope-scaled bias against shadow acne on surfaces facing away
        // from the light.
        let bias = (0.05 * (1.0 - normal.dot(-uniform.light_dir))).max(0.005);
        if ndc.z - bias > closest {
            1.0
        } else {
            0.0
        }
    }
}

impl<'a> FragmentShader<SceneUniform<'a>> for SceneFragmentShader {
    type SharedData = SceneData;

    #[allow(non_snake_case)]
    fn fragment(&self, shared: &SceneData, uniform: &SceneUniform<'a>) -> Vec4 {
        const PI: f32 = std::f32::consts::PI;
        let units = &uniform.units;
        let uv = shared.texcoord;

        let albedo = units
            .sample(ALBEDO_UNIT, uv)
            .map(|s| s.xyz())
            .unwrap_or(Vec3::ZERO);
        // The ground's single-texture path has no normal map bound; shade
        // it with the geometric normal and scalar defaults.
        let normal = match units.sample(NORMAL_UNIT, uv) {
            Some(sample) => {
                let tangent_normal = (sample.xyz() - 0.5) * 2.0;
                let tbn = Mat3::from_cols(
                    shared.tangent.normalize(),
                    shared.bitangent.normalize(),
                    shared.normal.normalize(),
                );
                (tbn * tangent_normal).normalize()
            }
            None => shared.normal.normalize(),
        };
        let metallic = units.sample(METALLIC_UNIT, uv).map_or(0.0, |s| s.x);
        let roughness = units.sample(ROUGHNESS_UNIT, uv).map_or(1.0, |s| s.x);
        let ao = units.sample(AO_UNIT, uv).map_or(1.0, |s| s.x);

        let N = normal;
        let V = (uniform.cam_pos - shared.position).normalize();
        let L = -uniform.light_dir;
        let H = (V + L).normalize();
        let radiance = Vec3::ONE;

        let F0 = Vec3::splat(0.04) * (1.0 - metallic) + albedo * metallic;

        // cook-torrance brdf
        let NDF = Self::normal_dist_ggx(N, H, roughness);
        let G = Self::geometry_smith(N, V, L, roughness);
        let F = Self::fresnel_schlick(H.dot(V).max(0.0), F0);

        let kS = F;
        let kD = (Vec3::ONE - kS) * (1.0 - metallic);

        let numerator = NDF * G * F;
        let denominator = 4.0 * N.dot(V).max(0.0) * N.dot(L).max(0.0);
        let specular = numerator / denominator.max(0.001);

        let NdotL = N.dot(L).max(0.0);
        let Lo = (kD * albedo / PI + specular) * radiance * NdotL;

        let shadow = Self::shadow_factor(uniform, shared, N);
        // The intensity exceeds 1 on purpose and drives shadowed radiance
        // negative; floor at black before tone mapping.
        let lit = 1.0 - shadow * uniform.shadow_intensity;

        let ambient = Vec3::splat(0.3) * albedo * ao;
        let mut color = (ambient + Lo * lit).max(Vec3::ZERO);

        color = color / (color + Vec3::ONE);
        color = color.powf(1.0 / 2.2);

        color.extend(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::TextureUnits;
    use glam::Mat4;

    fn test_uniform<'a>(units: TextureUnits<'a>) -> SceneUniform<'a> {
        SceneUniform {
            model: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            light_space: Mat4::IDENTITY,
            light_pos: Vec3::new(0.0, 5.0, 0.0),
            light_dir: Vec3::new(0.0, -1.0, 0.0),
            cam_pos: Vec3::new(0.0, 1.0, 3.0),
            shadow_intensity: 3.5,
            units,
        }
    }

    fn test_data() -> SceneData {
        SceneData {
            position: Vec3::ZERO,
            normal: Vec3::Y,
            texcoord: Vec2::ZERO,
            tangent: Vec3::X,
            bitangent: Vec3::Z,
            light_space_position: Vec4::new(0.0, 0.0, 0.5, 1.0),
        }
    }

    #[test]
    fn unshadowed_without_a_depth_binding() {
        let uniform = test_uniform(TextureUnits::new());
        let shadow = SceneFragmentShader::shadow_factor(&uniform, &test_data(), Vec3::Y);
        assert_eq!(shadow, 0.0);
    }

    #[test]
    fn occluded_fragment_is_shadowed() {
        use crate::model::MeshVertex;
        use crate::shader::{DepthUniform, DepthVertexShader};

        // Record an occluder at z=0.2 over the whole map through the real
        // depth program (identity transforms: positions are already NDC).
        let occluder = [
            Vec3::new(-1.0, -1.0, 0.2),
            Vec3::new(3.0, -1.0, 0.2),
            Vec3::new(-1.0, 3.0, 0.2),
        ]
        .map(|position| MeshVertex {
            position,
            normal: Vec3::Y,
            texcoord: Vec2::ZERO,
            tangent: Vec3::X,
            bitangent: Vec3::Z,
        });
        let mut raster = rasterizer::Rasterizer::new(8, 8);
        raster.clear_depth();
        raster.render_mesh_depth(
            &occluder,
            &[0, 1, 2],
            &DepthVertexShader,
            &DepthUniform {
                light_space: Mat4::IDENTITY,
                model: Mat4::IDENTITY,
            },
        );

        let mut units = TextureUnits::new();
        units.bind_depth(SHADOW_UNIT, raster.framebuffer().depth_map());
        let uniform = test_uniform(units);
        let mut data = test_data();

        // Fragment at z=0.5 sits behind the occluder.
        assert_eq!(
            SceneFragmentShader::shadow_factor(&uniform, &data, Vec3::Y),
            1.0
        );

        // Fragment in front of the occluder is lit.
        data.light_space_position = Vec4::new(0.0, 0.0, 0.1, 1.0);
        assert_eq!(
            SceneFragmentShader::shadow_factor(&uniform, &data, Vec3::Y),
            0.0
        );

        // Beyond the light's far plane: never shadowed.
        data.light_space_position = Vec4::new(0.0, 0.0, 1.5, 1.0);
        assert_eq!(
            SceneFragmentShader::shadow_factor(&uniform, &data, Vec3::Y),
            0.0
        );
    }

    #[test]
    fn fragment_color_stays_in_range_without_bindings() {
        let uniform = test_uniform(TextureUnits::new());
        let color = SceneFragmentShader.fragment(&test_data(), &uniform);
        assert!(color.x >= 0.0 && color.x <= 1.0);
        assert!(color.y >= 0.0 && color.y <= 1.0);
        assert!(color.z >= 0.0 && color.z <= 1.0);
    }
}
