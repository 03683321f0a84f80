use crate::math_prelude::*;

pub trait Interpolate {
    fn interpolate(v0: &Self, v1: &Self, v2: &Self, r0: f32, r1: f32, r2: f32) -> Self;
}

// Clone is needed because near-plane clipping re-uses a vertex's data in
// more than one output triangle.
pub trait ShaderData: Interpolate + Clone + Send + Sync {}
impl<T: Interpolate + Clone + Send + Sync> ShaderData for T {}

/// The uniform is a free type parameter rather than an associated type so
/// that uniforms may borrow per-frame state (texture bindings, depth-map
/// views) without the shader type itself carrying a lifetime.
pub trait VertexShader<U>: Send + Sync {
    type VertexData: Send + Sync;
    type SharedData: ShaderData;

    fn vertex(&self, vertex: &Self::VertexData, uniform: &U) -> (Vec4, Self::SharedData);
}

pub trait FragmentShader<U>: Send + Sync {
    type SharedData: ShaderData;

    fn fragment(&self, shared: &Self::SharedData, uniform: &U) -> Vec4;
}

macro_rules! impl_interpolate {
    ($ty:ident) => {
        impl Interpolate for $ty {
            fn interpolate(v0: &Self, v1: &Self, v2: &Self, r0: f32, r1: f32, r2: f32) -> Self {
                *v0 * r0 + *v1 * r1 + *v2 * r2
            }
        }
    };
}

impl_interpolate!(f32);
impl_interpolate!(Vec2);
impl_interpolate!(Vec3);
impl_interpolate!(Vec4);

impl Interpolate for f64 {
    fn interpolate(v0: &Self, v1: &Self, v2: &Self, r0: f32, r1: f32, r2: f32) -> Self {
        v0 * r0 as f64 + v1 * r1 as f64 + v2 * r2 as f64
    }
}

// Depth-only passes carry no per-vertex data.
impl Interpolate for () {
    fn interpolate(_: &Self, _: &Self, _: &Self, _: f32, _: f32, _: f32) -> Self {}
}
