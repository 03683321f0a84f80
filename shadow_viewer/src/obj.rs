use std::path::Path;
use std::str::SplitWhitespace;

use rasterizer::math_prelude::*;
use thiserror::Error;

use crate::model::{Mesh, MeshVertex};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed {directive} directive on line {line}")]
    Malformed {
        directive: &'static str,
        line: usize,
    },
    #[error("face on line {line} references an out-of-range index")]
    IndexOutOfRange { line: usize },
}

struct ObjModel {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    texcoords: Vec<Vec2>,
    faces: Vec<ObjFace>,
}

struct ObjFace {
    line: usize,
    positions: [usize; 3],
    texcoords: Option<[usize; 3]>,
    normals: Option<[usize; 3]>,
}

fn read_f32(
    words: &mut SplitWhitespace,
    directive: &'static str,
    line: usize,
) -> Result<f32, ModelError> {
    words
        .next()
        .and_then(|w| w.parse().ok())
        .ok_or(ModelError::Malformed { directive, line })
}

// One corner of a face: `v`, `v/vt`, `v//vn` or `v/vt/vn`, 1-based.
fn read_corner(
    word: &str,
    line: usize,
) -> Result<(usize, Option<usize>, Option<usize>), ModelError> {
    let malformed = || ModelError::Malformed {
        directive: "f",
        line,
    };
    let mut parts = word.split('/');
    let position = parts
        .next()
        .and_then(|p| p.parse::<usize>().ok())
        .ok_or_else(malformed)?
        - 1;
    let mut optional = |part: Option<&str>| -> Result<Option<usize>, ModelError> {
        match part.filter(|p| !p.is_empty()) {
            Some(p) => p
                .parse::<usize>()
                .map(|index| Some(index - 1))
                .map_err(|_| malformed()),
            None => Ok(None),
        }
    };
    let texcoord = optional(parts.next())?;
    let normal = optional(parts.next())?;
    Ok((position, texcoord, normal))
}

fn parse_obj(source: &str) -> Result<ObjModel, ModelError> {
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut texcoords = Vec::new();
    let mut faces = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut words = trimmed.split_whitespace();
        match words.next() {
            Some("v") => {
                let x = read_f32(&mut words, "v", line)?;
                let y = read_f32(&mut words, "v", line)?;
                let z = read_f32(&mut words, "v", line)?;
                positions.push(Vec3::new(x, y, z));
            }
            Some("vn") => {
                let x = read_f32(&mut words, "vn", line)?;
                let y = read_f32(&mut words, "vn", line)?;
                let z = read_f32(&mut words, "vn", line)?;
                normals.push(Vec3::new(x, y, z));
            }
            Some("vt") => {
                let u = read_f32(&mut words, "vt", line)?;
                let v = read_f32(&mut words, "vt", line)?;
                texcoords.push(Vec2::new(u, v));
            }
            Some("f") => {
                let mut corners = [(0, None, None); 3];
                for corner in corners.iter_mut() {
                    let word = words.next().ok_or(ModelError::Malformed {
                        directive: "f",
                        line,
                    })?;
                    *corner = read_corner(word, line)?;
                }
                let texcoord_indices = match corners {
                    [(_, Some(a), _), (_, Some(b), _), (_, Some(c), _)] => Some([a, b, c]),
                    _ => None,
                };
                let normal_indices = match corners {
                    [(_, _, Some(a)), (_, _, Some(b)), (_, _, Some(c))] => Some([a, b, c]),
                    _ => None,
                };
                faces.push(ObjFace {
                    line,
                    positions: [corners[0].0, corners[1].0, corners[2].0],
                    texcoords: texcoord_indices,
                    normals: normal_indices,
                });
            }
            _ => continue,
        }
    }

    Ok(ObjModel {
        positions,
        normals,
        texcoords,
        faces,
    })
}

/// Reads a triangulated OBJ file into a de-indexed mesh, computing a
/// tangent basis per face.
pub fn read_model<P: AsRef<Path>>(path: P) -> Result<Mesh, ModelError> {
    let contents = std::fs::read_to_string(path)?;
    mesh_from_source(&contents)
}

pub fn mesh_from_source(source: &str) -> Result<Mesh, ModelError> {
    let obj = parse_obj(source)?;

    let mut vertices = Vec::with_capacity(obj.faces.len() * 3);
    let mut indices = Vec::with_capacity(obj.faces.len() * 3);

    for face in &obj.faces {
        let out_of_range = || ModelError::IndexOutOfRange { line: face.line };

        let mut corner_positions = [Vec3::ZERO; 3];
        for (slot, index) in corner_positions.iter_mut().zip(face.positions) {
            *slot = *obj.positions.get(index).ok_or_else(out_of_range)?;
        }

        let mut corner_texcoords = [Vec2::ZERO; 3];
        if let Some(texcoord_indices) = face.texcoords {
            for (slot, index) in corner_texcoords.iter_mut().zip(texcoord_indices) {
                *slot = *obj.texcoords.get(index).ok_or_else(out_of_range)?;
            }
        }

        let mut corner_normals = [Vec3::ZERO; 3];
        if let Some(normal_indices) = face.normals {
            for (slot, index) in corner_normals.iter_mut().zip(normal_indices) {
                *slot = *obj.normals.get(index).ok_or_else(out_of_range)?;
            }
        }

        let (tangent, bitangent) = calc_tangent_bitangent(&corner_positions, &corner_texcoords);
        for corner in 0..3 {
            indices.push(vertices.len() as u32);
            vertices.push(MeshVertex {
                position: corner_positions[corner],
                normal: corner_normals[corner],
                texcoord: corner_texcoords[corner],
                tangent,
                bitangent,
            });
        }
    }

    Ok(Mesh { vertices, indices })
}

pub fn calc_tangent_bitangent(positions: &[Vec3; 3], uvs: &[Vec2; 3]) -> (Vec3, Vec3) {
    let delta_uv1 = uvs[1] - uvs[0];
    let delta_uv2 = uvs[2] - uvs[0];
    let edge1 = positions[1] - positions[0];
    let edge2 = positions[2] - positions[0];

    let f = 1.0 / (delta_uv1.x * delta_uv2.y - delta_uv2.x * delta_uv1.y);

    let tangent = Vec3::new(
        f * (delta_uv2.y * edge1.x - delta_uv1.y * edge2.x),
        f * (delta_uv2.y * edge1.y - delta_uv1.y * edge2.y),
        f * (delta_uv2.y * edge1.z - delta_uv1.y * edge2.z),
    );
    let bitangent = Vec3::new(
        f * (-delta_uv2.x * edge1.x + delta_uv1.x * edge2.x),
        f * (-delta_uv2.x * edge1.y + delta_uv1.x * edge2.y),
        f * (-delta_uv2.x * edge1.z + delta_uv1.x * edge2.z),
    );

    (tangent, bitangent)
}
