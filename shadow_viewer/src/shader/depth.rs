use glam::Vec4;
use rasterizer::VertexShader;

use crate::model::MeshVertex;

use super::DepthUniform;

/// Vertex-only program for the shadow pass; positions everything in light
/// space and emits no per-vertex data.
pub struct DepthVertexShader;

impl VertexShader<DepthUniform> for DepthVertexShader {
    type VertexData = MeshVertex;
    type SharedData = ();

    fn vertex(&self, vertex: &MeshVertex, uniform: &DepthUniform) -> (Vec4, ()) {
        let position = vertex.position.extend(1.0);
        (uniform.light_space * uniform.model * position, ())
    }
}
