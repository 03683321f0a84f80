use rasterizer::math_prelude::*;

use crate::obj::calc_tangent_bitangent;

#[derive(Debug, Clone)]
pub struct MeshVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub texcoord: Vec2,
    pub tangent: Vec3,
    pub bitangent: Vec3,
}

pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

pub const GROUND_EXTENT: f32 = 25.0;
pub const GROUND_HEIGHT: f32 = -0.1;
// The ground texture repeats once per world unit.
const GROUND_UV_TILES: f32 = 25.0;

/// The static ground quad: two triangles just below the origin, facing up.
pub fn ground_plane() -> Mesh {
    let e = GROUND_EXTENT;
    let y = GROUND_HEIGHT;
    let t = GROUND_UV_TILES;

    let corners = [
        (Vec3::new(e, y, e), Vec2::new(t, 0.0)),
        (Vec3::new(-e, y, e), Vec2::new(0.0, 0.0)),
        (Vec3::new(-e, y, -e), Vec2::new(0.0, t)),
        (Vec3::new(e, y, e), Vec2::new(t, 0.0)),
        (Vec3::new(-e, y, -e), Vec2::new(0.0, t)),
        (Vec3::new(e, y, -e), Vec2::new(t, t)),
    ];

    let mut vertices = Vec::with_capacity(corners.len());
    let mut indices = Vec::with_capacity(corners.len());
    for triangle in corners.chunks_exact(3) {
        let positions = [triangle[0].0, triangle[1].0, triangle[2].0];
        let texcoords = [triangle[0].1, triangle[1].1, triangle[2].1];
        let (tangent, bitangent) = calc_tangent_bitangent(&positions, &texcoords);
        for (position, texcoord) in triangle {
            indices.push(vertices.len() as u32);
            vertices.push(MeshVertex {
                position: *position,
                normal: Vec3::Y,
                texcoord: *texcoord,
                tangent,
                bitangent,
            });
        }
    }

    Mesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_plane_is_two_up_facing_triangles() {
        let ground = ground_plane();
        assert_eq!(ground.vertices.len(), 6);
        assert_eq!(ground.indices, vec![0, 1, 2, 3, 4, 5]);
        assert!(ground.vertices.iter().all(|v| v.normal == Vec3::Y));
        assert!(ground
            .vertices
            .iter()
            .all(|v| v.position.y == GROUND_HEIGHT));
    }

    #[test]
    fn ground_texcoords_tile_across_the_quad() {
        let ground = ground_plane();
        let max_u = ground
            .vertices
            .iter()
            .map(|v| v.texcoord.x)
            .fold(0.0f32, f32::max);
        let max_v = ground
            .vertices
            .iter()
            .map(|v| v.texcoord.y)
            .fold(0.0f32, f32::max);
        assert_eq!(max_u, 25.0);
        assert_eq!(max_v, 25.0);
    }

    #[test]
    fn ground_tangents_are_finite() {
        let ground = ground_plane();
        assert!(ground
            .vertices
            .iter()
            .all(|v| v.tangent.is_finite() && v.bitangent.is_finite()));
    }
}
