use std::path::Path;

use image::DynamicImage;
use rasterizer::math_prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error(transparent)]
    Decode(#[from] image::ImageError),
    #[error("unsupported channel count: {0}")]
    UnsupportedChannels(u8),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextureFormat {
    Luma,
    Rgb,
    Rgba,
}

enum Texels {
    Luma(Vec<f32>),
    Rgb(Vec<Vec3>),
    Rgba(Vec<Vec4>),
}

/// A decoded image sampled by the fragment shaders. Texel storage follows
/// the source channel count: 1, 3 and 4 channels are supported, anything
/// else is a load error.
pub struct Texture {
    width: usize,
    height: usize,
    texels: Texels,
}

impl Texture {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Texture, TextureError> {
        Self::decode(image::open(path)?)
    }

    pub fn decode(image: DynamicImage) -> Result<Texture, TextureError> {
        let width = image.width() as usize;
        let height = image.height() as usize;
        let texels = match image.color().channel_count() {
            1 => Texels::Luma(
                image
                    .to_luma8()
                    .pixels()
                    .map(|p| p[0] as f32 / 255.0)
                    .collect(),
            ),
            3 => Texels::Rgb(
                image
                    .to_rgb8()
                    .pixels()
                    .map(|p| Vec3::new(p[0] as f32, p[1] as f32, p[2] as f32) / 255.0)
                    .collect(),
            ),
            4 => Texels::Rgba(
                image
                    .to_rgba8()
                    .pixels()
                    .map(|p| {
                        Vec4::new(p[0] as f32, p[1] as f32, p[2] as f32, p[3] as f32) / 255.0
                    })
                    .collect(),
            ),
            channels => return Err(TextureError::UnsupportedChannels(channels)),
        };
        Ok(Self {
            width,
            height,
            texels,
        })
    }

    /// Stand-in for a texture that failed to load; samples black.
    pub fn empty() -> Texture {
        Self {
            width: 1,
            height: 1,
            texels: Texels::Rgb(vec![Vec3::ZERO]),
        }
    }

    /// Load a texture, degrading to [`Texture::empty`] on failure so the
    /// viewer keeps running with a hole in its materials.
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Texture {
        let path = path.as_ref();
        match Self::open(path) {
            Ok(texture) => {
                log::debug!(
                    "loaded texture {} ({}x{}, {:?})",
                    path.display(),
                    texture.width(),
                    texture.height(),
                    texture.format()
                );
                texture
            }
            Err(e) => {
                log::error!("failed to load texture {}: {}", path.display(), e);
                Texture::empty()
            }
        }
    }

    pub fn format(&self) -> TextureFormat {
        match self.texels {
            Texels::Luma(_) => TextureFormat::Luma,
            Texels::Rgb(_) => TextureFormat::Rgb,
            Texels::Rgba(_) => TextureFormat::Rgba,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Nearest-texel sample with repeat wrapping on both axes.
    pub fn sample(&self, uv: Vec2) -> Vec4 {
        let x = (uv.x * self.width as f32).floor() as i64;
        let y = ((1.0 - uv.y) * self.height as f32).floor() as i64;
        let x = x.rem_euclid(self.width as i64) as usize;
        let y = y.rem_euclid(self.height as i64) as usize;
        self.texel(x, y)
    }

    fn texel(&self, x: usize, y: usize) -> Vec4 {
        let index = x + y * self.width;
        match &self.texels {
            Texels::Luma(texels) => Vec4::new(texels[index], 0.0, 0.0, 1.0),
            Texels::Rgb(texels) => texels[index].extend(1.0),
            Texels::Rgba(texels) => texels[index],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayAlphaImage, GrayImage, Luma, LumaA, Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn channel_count_selects_storage_format() {
        let luma = DynamicImage::ImageLuma8(GrayImage::from_pixel(2, 2, Luma([128])));
        assert_eq!(Texture::decode(luma).unwrap().format(), TextureFormat::Luma);

        let rgb = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([10, 20, 30])));
        assert_eq!(Texture::decode(rgb).unwrap().format(), TextureFormat::Rgb);

        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 40])));
        assert_eq!(Texture::decode(rgba).unwrap().format(), TextureFormat::Rgba);
    }

    #[test]
    fn two_channel_images_are_rejected() {
        let luma_alpha =
            DynamicImage::ImageLumaA8(GrayAlphaImage::from_pixel(2, 2, LumaA([128, 255])));
        assert!(matches!(
            Texture::decode(luma_alpha),
            Err(TextureError::UnsupportedChannels(2))
        ));
    }

    #[test]
    fn luma_samples_into_the_red_channel() {
        let luma = DynamicImage::ImageLuma8(GrayImage::from_pixel(1, 1, Luma([255])));
        let texture = Texture::decode(luma).unwrap();
        assert_eq!(
            texture.sample(Vec2::new(0.5, 0.5)),
            Vec4::new(1.0, 0.0, 0.0, 1.0)
        );
    }

    #[test]
    fn sampling_wraps_past_the_edge() {
        let mut img = RgbImage::from_pixel(2, 1, Rgb([0, 0, 0]));
        img.put_pixel(1, 0, Rgb([255, 255, 255]));
        let texture = Texture::decode(DynamicImage::ImageRgb8(img)).unwrap();

        let white = Vec4::ONE;
        assert_eq!(texture.sample(Vec2::new(0.75, 0.5)), white);
        // One full tile to the right lands on the same texel.
        assert_eq!(texture.sample(Vec2::new(1.75, 0.5)), white);
        assert_eq!(texture.sample(Vec2::new(-0.25, 0.5)), white);
    }

    #[test]
    fn empty_texture_samples_black() {
        let texture = Texture::empty();
        assert_eq!(
            texture.sample(Vec2::new(0.3, 0.8)),
            Vec4::new(0.0, 0.0, 0.0, 1.0)
        );
    }
}
