use crate::texture::Texture;

const ALBEDO_PATH: &str = "assets/stove/textures/albedo.png";
const NORMAL_PATH: &str = "assets/stove/textures/normal.png";
const METALLIC_PATH: &str = "assets/stove/textures/metallic.png";
const ROUGHNESS_PATH: &str = "assets/stove/textures/roughness.png";
const AO_PATH: &str = "assets/stove/textures/ao.png";

/// The five material maps bound to texture units 0-4 while the model
/// draws. Loaded once at startup; a broken map degrades to an empty
/// texture rather than aborting.
pub struct MaterialTextures {
    pub albedo: Texture,
    pub normal: Texture,
    pub metallic: Texture,
    pub roughness: Texture,
    pub ambient_occlusion: Texture,
}

impl MaterialTextures {
    pub fn load() -> Self {
        Self {
            albedo: Texture::load_or_empty(ALBEDO_PATH),
            normal: Texture::load_or_empty(NORMAL_PATH),
            metallic: Texture::load_or_empty(METALLIC_PATH),
            roughness: Texture::load_or_empty(ROUGHNESS_PATH),
            ambient_occlusion: Texture::load_or_empty(AO_PATH),
        }
    }
}
