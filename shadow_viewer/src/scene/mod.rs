pub mod camera;
pub mod draw;
pub mod orientation;
pub mod renderer;
pub mod shadow;

pub use camera::Camera;
pub use orientation::ObjectOrientation;
pub use shadow::ShadowPass;

use std::time::Instant;

use rasterizer::Rasterizer;

use crate::material::MaterialTextures;
use crate::model::{ground_plane, Mesh};
use crate::obj::{self, ModelError};
use crate::texture::Texture;

const MODEL_PATH: &str = "assets/stove/stove.obj";
const GROUND_TEXTURE_PATH: &str = "assets/textures/wood.png";

/// Everything the scene draws, loaded once at startup.
pub struct SceneAssets {
    pub model: Mesh,
    pub materials: MaterialTextures,
    pub ground: Mesh,
    pub ground_texture: Texture,
}

impl SceneAssets {
    /// A missing model is fatal; broken textures degrade to placeholders.
    pub fn load() -> Result<Self, ModelError> {
        let model = obj::read_model(MODEL_PATH)?;
        log::info!(
            "loaded model {} ({} vertices)",
            MODEL_PATH,
            model.vertices.len()
        );
        Ok(Self {
            model,
            materials: MaterialTextures::load(),
            ground: ground_plane(),
            ground_texture: Texture::load_or_empty(GROUND_TEXTURE_PATH),
        })
    }
}

/// Delta-time source for the frame loop; ticked once at the top of every
/// iteration.
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn start() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Seconds elapsed since the previous tick.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = (now - self.last).as_secs_f32();
        self.last = now;
        delta
    }
}

/// The frame loop's mutable state, passed by reference into input and
/// render code. One writer per frame; nothing here is global.
pub struct FrameContext {
    pub camera: Camera,
    pub orientation: ObjectOrientation,
    pub clock: FrameClock,
    pub rasterizer: Rasterizer,
}

impl FrameContext {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            camera: Camera::default(),
            orientation: ObjectOrientation::default(),
            clock: FrameClock::start(),
            rasterizer: Rasterizer::new(width, height),
        }
    }

    /// Rebuilds the render target at the new window size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.rasterizer = Rasterizer::new(width, height);
    }

    pub fn aspect(&self) -> f32 {
        self.rasterizer.width() as f32 / self.rasterizer.height() as f32
    }
}

#[cfg(test)]
pub(crate) fn test_assets() -> SceneAssets {
    use crate::model::MeshVertex;
    use glam::{Vec2, Vec3};

    // A single triangle standing at the origin in place of the real model.
    let vertices = vec![
        MeshVertex {
            position: Vec3::new(-0.5, 0.0, 0.0),
            normal: Vec3::Z,
            texcoord: Vec2::new(0.0, 0.0),
            tangent: Vec3::X,
            bitangent: Vec3::Y,
        },
        MeshVertex {
            position: Vec3::new(0.5, 0.0, 0.0),
            normal: Vec3::Z,
            texcoord: Vec2::new(1.0, 0.0),
            tangent: Vec3::X,
            bitangent: Vec3::Y,
        },
        MeshVertex {
            position: Vec3::new(0.0, 1.0, 0.0),
            normal: Vec3::Z,
            texcoord: Vec2::new(0.5, 1.0),
            tangent: Vec3::X,
            bitangent: Vec3::Y,
        },
    ];
    let model = Mesh {
        vertices,
        indices: vec![0, 1, 2],
    };

    SceneAssets {
        model,
        materials: MaterialTextures {
            albedo: Texture::empty(),
            normal: Texture::empty(),
            metallic: Texture::empty(),
            roughness: Texture::empty(),
            ambient_occlusion: Texture::empty(),
        },
        ground: ground_plane(),
        ground_texture: Texture::empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_updates_viewport_and_aspect() {
        let mut ctx = FrameContext::new(1600, 1200);
        assert_eq!(ctx.rasterizer.width(), 1600);

        ctx.resize(800, 600);
        assert_eq!(ctx.rasterizer.width(), 800);
        assert_eq!(ctx.rasterizer.height(), 600);
        assert_eq!(ctx.aspect(), 800.0 / 600.0);
    }
}
