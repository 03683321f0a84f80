mod bounding_box;
mod framebuffer;
mod frametime;
mod shader;

use bounding_box::BoundingBox;

pub use framebuffer::{DepthMap, Framebuffer, CLEAR_DEPTH};
pub use frametime::FrameTime;
pub use shader::{FragmentShader, Interpolate, ShaderData, VertexShader};

use crate::math_prelude::*;
use itertools::Itertools;
use rayon::prelude::*;

#[derive(Debug, Clone)]
struct Fragment {
    depth: f32,
    // Index into the current draw's processed faces.
    face: usize,
    vertex0_ratio: f32,
    vertex1_ratio: f32,
    vertex2_ratio: f32,
}

impl Fragment {
    const INVALID_FACE_INDEX: usize = usize::MAX;

    fn is_valid(&self) -> bool {
        self.face != Self::INVALID_FACE_INDEX
    }
}

impl Default for Fragment {
    fn default() -> Self {
        Self {
            depth: CLEAR_DEPTH,
            face: Self::INVALID_FACE_INDEX,
            vertex0_ratio: 0.0,
            vertex1_ratio: 0.0,
            vertex2_ratio: 0.0,
        }
    }
}

struct FrameBlock {
    // The region of the target this block covers.
    bounding_box: BoundingBox,
    // Indices into the current draw's processed faces.
    face_indices: Vec<usize>,
    fragments: Vec<Fragment>,
}

impl FrameBlock {
    fn new(bounding_box: BoundingBox) -> Self {
        let size = bounding_box.width() * bounding_box.height();
        Self {
            bounding_box,
            face_indices: Vec::with_capacity(128),
            fragments: vec![Fragment::default(); size as usize],
        }
    }

    // Face markers are per draw call; depth persists until the next clear
    // so later draws in the same frame depth-test against earlier ones.
    fn begin_draw(&mut self) {
        self.face_indices.clear();
        self.fragments
            .iter_mut()
            .for_each(|f| f.face = Fragment::INVALID_FACE_INDEX);
    }

    fn clear(&mut self) {
        self.face_indices.clear();
        self.fragments.iter_mut().for_each(|f| {
            f.depth = CLEAR_DEPTH;
            f.face = Fragment::INVALID_FACE_INDEX;
        });
    }
}

struct TriangleInteriorChecker {
    vertex0: Vec3,
    inv_col1: Vec2,
    inv_col2: Vec2,
}

impl TriangleInteriorChecker {
    fn new(v0: &Vec3, v1: &Vec3, v2: &Vec3) -> Self {
        let col1 = *v1 - *v0;
        let col2 = *v2 - *v0;
        let inv_det = 1.0 / (col1.x * col2.y - col2.x * col1.y);
        Self {
            vertex0: *v0,
            inv_col1: Vec2::new(col2.y, -col1.y) * inv_det,
            inv_col2: Vec2::new(-col2.x, col1.x) * inv_det,
        }
    }

    fn to_triangle_coords(&self, point: &Vec2) -> Vec2 {
        let target_x = point.x - self.vertex0.x;
        let target_y = point.y - self.vertex0.y;
        Vec2::new(
            self.inv_col1.x * target_x + self.inv_col2.x * target_y,
            self.inv_col1.y * target_x + self.inv_col2.y * target_y,
        )
    }

    // Point must already be in triangle coords.
    fn is_point_in_triangle(&self, triangle_point: &Vec2) -> bool {
        0.0 <= triangle_point.x
            && 0.0 <= triangle_point.y
            && (triangle_point.x + triangle_point.y) <= 1.0
    }
}

struct ProcessedFace<DataType> {
    vertex0: Vec3,
    vertex0_data: DataType,
    vertex1: Vec3,
    vertex1_data: DataType,
    vertex2: Vec3,
    vertex2_data: DataType,
    bounding_box: BoundingBox,
}

// Clip-space output of the vertex shader, before the perspective divide.
#[derive(Clone)]
struct ClipVertex<DataType> {
    clip: Vec4,
    data: DataType,
}

// Vertices closer than this are clipped rather than divided through.
const MIN_CLIP_W: f32 = 1e-5;

fn lerp_toward_near_plane<SD: ShaderData>(
    inside: &ClipVertex<SD>,
    outside: &ClipVertex<SD>,
) -> ClipVertex<SD> {
    let t = (MIN_CLIP_W - inside.clip.w) / (outside.clip.w - inside.clip.w);
    ClipVertex {
        clip: inside.clip + (outside.clip - inside.clip) * t,
        data: SD::interpolate(&inside.data, &outside.data, &inside.data, 1.0 - t, t, 0.0),
    }
}

// Clips a triangle against the near plane, yielding zero, one or two
// triangles whose vertices all have a usable w.
fn clip_near<SD: ShaderData>(
    triangle: [ClipVertex<SD>; 3],
) -> [Option<[ClipVertex<SD>; 3]>; 2] {
    let mut inside = [0usize; 3];
    let mut outside = [0usize; 3];
    let (mut inside_count, mut outside_count) = (0, 0);
    for (index, vertex) in triangle.iter().enumerate() {
        if vertex.clip.w >= MIN_CLIP_W {
            inside[inside_count] = index;
            inside_count += 1;
        } else {
            outside[outside_count] = index;
            outside_count += 1;
        }
    }

    match inside_count {
        3 => [Some(triangle), None],
        2 => {
            let (a, b) = (&triangle[inside[0]], &triangle[inside[1]]);
            let c = &triangle[outside[0]];
            let ac = lerp_toward_near_plane(a, c);
            let bc = lerp_toward_near_plane(b, c);
            [
                Some([a.clone(), b.clone(), bc.clone()]),
                Some([a.clone(), bc, ac]),
            ]
        }
        1 => {
            let a = &triangle[inside[0]];
            let ab = lerp_toward_near_plane(a, &triangle[outside[0]]);
            let ac = lerp_toward_near_plane(a, &triangle[outside[1]]);
            [Some([a.clone(), ab, ac]), None]
        }
        _ => [None, None],
    }
}

pub struct Rasterizer {
    framebuffer: Framebuffer,
    frame_blocks: Option<Vec<FrameBlock>>,
    frame_time: FrameTime,
    frame_block_count: usize,
}

impl Rasterizer {
    const NORMALIZED_COORDS_MIN: f32 = -1.0;
    const NORMALIZED_COORDS_MAX: f32 = 1.0;
    const BLOCK_SIZE: u32 = 64;

    pub fn new(width: u32, height: u32) -> Self {
        let framebuffer = Framebuffer::new(width, height);
        let mut frame_blocks = Vec::new();

        for y in (0..height).step_by(Self::BLOCK_SIZE as usize) {
            for x in (0..width).step_by(Self::BLOCK_SIZE as usize) {
                let w = Self::BLOCK_SIZE.min(width - x);
                let h = Self::BLOCK_SIZE.min(height - y);
                frame_blocks.push(FrameBlock::new(BoundingBox::new(x, y, w, h)));
            }
        }
        let block_count = frame_blocks.len();
        Self {
            framebuffer,
            frame_blocks: Some(frame_blocks),
            frame_time: FrameTime::zero(),
            frame_block_count: block_count,
        }
    }

    /// Full pipeline: vertex stage, rasterization with depth testing, then
    /// fragment shading into the color plane.
    pub fn render_mesh<VS, FS, U, V, SD>(
        &mut self,
        vertices: &[V],
        indices: &[u32],
        vertex_shader: &VS,
        fragment_shader: &FS,
        uniform: &U,
    ) where
        V: Send + Sync,
        U: Send + Sync,
        SD: ShaderData,
        VS: VertexShader<U, VertexData = V, SharedData = SD>,
        FS: FragmentShader<U, SharedData = SD>,
    {
        let mut frame_blocks = self.frame_blocks.take().expect("frame blocks present");
        frame_blocks.par_iter_mut().for_each(FrameBlock::begin_draw);

        let start = std::time::Instant::now();
        let faces = self.process_vertices(vertices, indices, vertex_shader, uniform);
        self.bin_faces(&faces, &mut frame_blocks);
        let vertex_duration = start.elapsed();

        let start = std::time::Instant::now();
        self.rasterize(&faces, &mut frame_blocks);
        self.sync_depth(&frame_blocks);
        let raster_duration = start.elapsed();

        let start = std::time::Instant::now();
        self.shade(&faces, &frame_blocks, fragment_shader, uniform);
        let fragment_duration = start.elapsed();

        self.frame_time = FrameTime::new(vertex_duration, raster_duration, fragment_duration);
        self.frame_blocks = Some(frame_blocks);
    }

    /// Depth-only pipeline: identical vertex and raster stages, no fragment
    /// shading. The color plane is left untouched.
    pub fn render_mesh_depth<VS, U, V, SD>(
        &mut self,
        vertices: &[V],
        indices: &[u32],
        vertex_shader: &VS,
        uniform: &U,
    ) where
        V: Send + Sync,
        U: Send + Sync,
        SD: ShaderData,
        VS: VertexShader<U, VertexData = V, SharedData = SD>,
    {
        let mut frame_blocks = self.frame_blocks.take().expect("frame blocks present");
        frame_blocks.par_iter_mut().for_each(FrameBlock::begin_draw);

        let start = std::time::Instant::now();
        let faces = self.process_vertices(vertices, indices, vertex_shader, uniform);
        self.bin_faces(&faces, &mut frame_blocks);
        let vertex_duration = start.elapsed();

        let start = std::time::Instant::now();
        self.rasterize(&faces, &mut frame_blocks);
        self.sync_depth(&frame_blocks);
        let raster_duration = start.elapsed();

        self.frame_time =
            FrameTime::new(vertex_duration, raster_duration, std::time::Duration::ZERO);
        self.frame_blocks = Some(frame_blocks);
    }

    pub fn width(&self) -> u32 {
        self.framebuffer.width()
    }

    pub fn height(&self) -> u32 {
        self.framebuffer.height()
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn frametime(&self) -> &FrameTime {
        &self.frame_time
    }

    /// Clears both planes and the per-block depth state.
    pub fn clear(&mut self, color: Vec3) {
        self.frame_blocks
            .as_mut()
            .expect("frame blocks present")
            .par_iter_mut()
            .for_each(FrameBlock::clear);
        self.framebuffer.color.fill(color);
        self.framebuffer.depth.fill(CLEAR_DEPTH);
    }

    /// Clears only the depth state; colors keep their previous contents.
    pub fn clear_depth(&mut self) {
        self.frame_blocks
            .as_mut()
            .expect("frame blocks present")
            .par_iter_mut()
            .for_each(FrameBlock::clear);
        self.framebuffer.depth.fill(CLEAR_DEPTH);
    }

    fn process_vertices<VS, U, V, SD>(
        &self,
        vertices: &[V],
        indices: &[u32],
        vertex_shader: &VS,
        uniform: &U,
    ) -> Vec<ProcessedFace<SD>>
    where
        V: Send + Sync,
        U: Send + Sync,
        SD: ShaderData,
        VS: VertexShader<U, VertexData = V, SharedData = SD>,
    {
        (0..indices.len() / 3)
            .into_par_iter()
            .flat_map_iter(|triangle_index| {
                let base_index = triangle_index * 3;
                let corner = |offset: usize| {
                    let vertex = &vertices[indices[base_index + offset] as usize];
                    let (clip, data) = vertex_shader.vertex(vertex, uniform);
                    ClipVertex { clip, data }
                };
                clip_near([corner(0), corner(1), corner(2)])
                    .into_iter()
                    .flatten()
                    .map(|[c0, c1, c2]| {
                        let vertex0 = c0.clip.xyz() / c0.clip.w;
                        let vertex1 = c1.clip.xyz() / c1.clip.w;
                        let vertex2 = c2.clip.xyz() / c2.clip.w;
                        let bounding_box =
                            self.bounding_box_from_vertices(&vertex0, &vertex1, &vertex2);
                        ProcessedFace {
                            vertex0,
                            vertex0_data: c0.data,
                            vertex1,
                            vertex1_data: c1.data,
                            vertex2,
                            vertex2_data: c2.data,
                            bounding_box,
                        }
                    })
            })
            .collect()
    }

    fn bin_faces<SD>(&self, faces: &[ProcessedFace<SD>], frame_blocks: &mut [FrameBlock]) {
        for (face_index, face) in faces.iter().enumerate() {
            if !Self::is_face_outside_view(face) {
                for block_index in self.frame_blocks_in_bounding_box(&face.bounding_box) {
                    frame_blocks[block_index].face_indices.push(face_index);
                }
            }
        }
    }

    fn rasterize<SD>(&self, faces: &[ProcessedFace<SD>], frame_blocks: &mut [FrameBlock])
    where
        SD: ShaderData,
    {
        let width = self.width();
        let height = self.height();
        frame_blocks.par_iter_mut().for_each(|block| {
            for (face_index, face) in block
                .face_indices
                .iter()
                .map(|index| (*index, &faces[*index]))
            {
                let rasterize_box = match block.bounding_box.overlap(&face.bounding_box) {
                    Some(overlap) => overlap,
                    None => continue,
                };
                let triangle_checker =
                    TriangleInteriorChecker::new(&face.vertex0, &face.vertex1, &face.vertex2);

                let y_iter = rasterize_box.y()..(rasterize_box.y() + rasterize_box.height());
                let x_iter = rasterize_box.x()..(rasterize_box.x() + rasterize_box.width());

                for (y, x) in y_iter.cartesian_product(x_iter) {
                    let (nx, ny) = screen_to_normalized(x, y, width, height);
                    let triangle_point = triangle_checker.to_triangle_coords(&Vec2::new(nx, ny));
                    if !triangle_checker.is_point_in_triangle(&triangle_point) {
                        continue;
                    }
                    let ratio_1 = triangle_point.x;
                    let ratio_2 = triangle_point.y;
                    let ratio_0 = 1.0 - ratio_1 - ratio_2;
                    let fragment_depth = ratio_0 * face.vertex0.z
                        + ratio_1 * face.vertex1.z
                        + ratio_2 * face.vertex2.z;
                    if fragment_depth < 0.0 {
                        continue;
                    }
                    let fragment_index = {
                        let fragment_x = x - block.bounding_box.x();
                        let fragment_y = y - block.bounding_box.y();
                        (fragment_x + fragment_y * block.bounding_box.width()) as usize
                    };

                    let fragment = &mut block.fragments[fragment_index];
                    if fragment.depth > fragment_depth {
                        fragment.depth = fragment_depth;
                        fragment.face = face_index;
                        fragment.vertex0_ratio = ratio_0;
                        fragment.vertex1_ratio = ratio_1;
                        fragment.vertex2_ratio = ratio_2;
                    }
                }
            }
        });
    }

    // Flattens the per-block depth state into the framebuffer's depth plane
    // so it can be read back or sampled as a depth map.
    fn sync_depth(&mut self, frame_blocks: &[FrameBlock]) {
        let width = self.framebuffer.width() as usize;
        let blocks_width = self.frame_blocks_width() as usize;
        self.framebuffer
            .depth
            .par_iter_mut()
            .enumerate()
            .for_each(|(index, depth)| {
                let x = index % width;
                let y = index / width;
                let block_index =
                    x / Self::BLOCK_SIZE as usize + (y / Self::BLOCK_SIZE as usize) * blocks_width;
                let block = &frame_blocks[block_index];
                let fragment_x = x - block.bounding_box.x() as usize;
                let fragment_y = y - block.bounding_box.y() as usize;
                let fragment_index =
                    fragment_x + fragment_y * block.bounding_box.width() as usize;
                *depth = block.fragments[fragment_index].depth;
            });
    }

    fn shade<FS, U, SD>(
        &mut self,
        faces: &[ProcessedFace<SD>],
        frame_blocks: &[FrameBlock],
        fragment_shader: &FS,
        uniform: &U,
    ) where
        U: Send + Sync,
        SD: ShaderData,
        FS: FragmentShader<U, SharedData = SD>,
    {
        let width = self.framebuffer.width() as usize;
        let blocks_width = self.frame_blocks_width() as usize;
        self.framebuffer
            .color
            .par_iter_mut()
            .enumerate()
            .for_each(|(index, color)| {
                let x = index % width;
                let y = index / width;
                let block_index =
                    x / Self::BLOCK_SIZE as usize + (y / Self::BLOCK_SIZE as usize) * blocks_width;
                let block = &frame_blocks[block_index];
                let fragment_x = x - block.bounding_box.x() as usize;
                let fragment_y = y - block.bounding_box.y() as usize;
                let fragment_index =
                    fragment_x + fragment_y * block.bounding_box.width() as usize;
                let fragment = &block.fragments[fragment_index];
                if fragment.is_valid() {
                    let face = &faces[fragment.face];
                    let interpolated = SD::interpolate(
                        &face.vertex0_data,
                        &face.vertex1_data,
                        &face.vertex2_data,
                        fragment.vertex0_ratio,
                        fragment.vertex1_ratio,
                        fragment.vertex2_ratio,
                    );
                    *color = fragment_shader.fragment(&interpolated, uniform).xyz();
                }
            });
    }

    // Conservative reject in normalized device coords (x and y in [-1, 1],
    // depth in [0, 1]): only faces wholly beyond a single boundary are
    // dropped. A face larger than the viewport keeps rasterizing even when
    // none of its vertices land inside.
    fn is_face_outside_view<D>(face: &ProcessedFace<D>) -> bool {
        let (v0, v1, v2) = (&face.vertex0, &face.vertex1, &face.vertex2);
        let all = |pred: fn(&Vec3) -> bool| pred(v0) && pred(v1) && pred(v2);
        all(|v| v.x < Self::NORMALIZED_COORDS_MIN)
            || all(|v| v.x > Self::NORMALIZED_COORDS_MAX)
            || all(|v| v.y < Self::NORMALIZED_COORDS_MIN)
            || all(|v| v.y > Self::NORMALIZED_COORDS_MAX)
            || all(|v| v.z < 0.0)
            || all(|v| v.z > CLEAR_DEPTH)
    }

    fn bounding_box_from_vertices(&self, v0: &Vec3, v1: &Vec3, v2: &Vec3) -> BoundingBox {
        let min_x = v0.x.min(v1.x.min(v2.x));
        let min_y = v0.y.min(v1.y.min(v2.y));
        let max_x = v0.x.max(v1.x.max(v2.x));
        let max_y = v0.y.max(v1.y.max(v2.y));

        let (tlx, tly) = normalized_to_screen(min_x, max_y, self.width(), self.height());
        let (brx, bry) = normalized_to_screen(max_x, min_y, self.width(), self.height());

        // Round up by one so the box fully covers the triangle's edges.
        BoundingBox::new(tlx, tly, brx - tlx + 1, bry - tly + 1)
    }

    // Number of frame blocks per row.
    fn frame_blocks_width(&self) -> u32 {
        self.width() / Self::BLOCK_SIZE + (self.width() % Self::BLOCK_SIZE).min(1)
    }

    fn frame_blocks_in_bounding_box(
        &self,
        bounding_box: &BoundingBox,
    ) -> impl Iterator<Item = usize> {
        let left_block = bounding_box.x() / Self::BLOCK_SIZE;
        let right_block =
            (bounding_box.x() + bounding_box.width()).min(self.width()) / Self::BLOCK_SIZE;
        let top_block = bounding_box.y() / Self::BLOCK_SIZE;
        let bot_block =
            (bounding_box.y() + bounding_box.height()).min(self.height()) / Self::BLOCK_SIZE;
        let blocks_width = self.frame_blocks_width();

        let block_count = self.frame_block_count;
        (top_block..=bot_block)
            .cartesian_product(left_block..=right_block)
            .map(move |(y, x)| ((x + y * blocks_width) as usize).min(block_count - 1))
    }
}

fn normalized_to_screen(mut x: f32, mut y: f32, width: u32, height: u32) -> (u32, u32) {
    x = (x + 1.0) / 2.0;
    y = (-y + 1.0) / 2.0;
    let screen_x = ((x * width as f32) as u32).min(width - 1);
    let screen_y = ((y * height as f32) as u32).min(height - 1);
    (screen_x, screen_y)
}

fn screen_to_normalized(x: u32, y: u32, width: u32, height: u32) -> (f32, f32) {
    let normalized_x = (x as f32 / width as f32) * 2.0 - 1.0;
    let normalized_y = -((y as f32 / height as f32) * 2.0 - 1.0);
    (normalized_x, normalized_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct FlatUniform {
        z: f32,
        color: Vec3,
    }

    struct FlatVertexShader;
    impl VertexShader<FlatUniform> for FlatVertexShader {
        type VertexData = Vec2;
        type SharedData = ();

        fn vertex(&self, vertex: &Vec2, uniform: &FlatUniform) -> (Vec4, ()) {
            (Vec4::new(vertex.x, vertex.y, uniform.z, 1.0), ())
        }
    }

    struct FlatFragmentShader;
    impl FragmentShader<FlatUniform> for FlatFragmentShader {
        type SharedData = ();

        fn fragment(&self, _shared: &(), uniform: &FlatUniform) -> Vec4 {
            uniform.color.extend(1.0)
        }
    }

    // Single triangle covering the whole viewport.
    fn fullscreen_triangle() -> (Vec<Vec2>, Vec<u32>) {
        let vertices = vec![
            Vec2::new(-1.0, -1.0),
            Vec2::new(3.0, -1.0),
            Vec2::new(-1.0, 3.0),
        ];
        (vertices, vec![0, 1, 2])
    }

    fn draw_flat(raster: &mut Rasterizer, z: f32, color: Vec3) {
        let (vertices, indices) = fullscreen_triangle();
        let uniform = FlatUniform { z, color };
        raster.render_mesh(
            &vertices,
            &indices,
            &FlatVertexShader,
            &FlatFragmentShader,
            &uniform,
        );
    }

    #[test]
    fn depth_test_persists_across_draws() {
        let red = Vec3::new(1.0, 0.0, 0.0);
        let green = Vec3::new(0.0, 1.0, 0.0);
        let blue = Vec3::new(0.0, 0.0, 1.0);

        let mut raster = Rasterizer::new(4, 4);
        raster.clear(Vec3::ZERO);

        draw_flat(&mut raster, 0.5, red);
        assert_eq!(*raster.framebuffer().get_color(1, 1).unwrap(), red);

        // A farther draw later in the frame must lose the depth test.
        draw_flat(&mut raster, 0.8, blue);
        assert_eq!(*raster.framebuffer().get_color(1, 1).unwrap(), red);
        assert_relative_eq!(
            *raster.framebuffer().get_depth(1, 1).unwrap(),
            0.5,
            epsilon = 1e-6
        );

        draw_flat(&mut raster, 0.2, green);
        assert_eq!(*raster.framebuffer().get_color(1, 1).unwrap(), green);
        assert_relative_eq!(
            *raster.framebuffer().get_depth(1, 1).unwrap(),
            0.2,
            epsilon = 1e-6
        );
    }

    #[test]
    fn depth_only_pass_leaves_color_untouched() {
        let mut raster = Rasterizer::new(4, 4);
        raster.clear(Vec3::ZERO);

        let (vertices, indices) = fullscreen_triangle();
        let uniform = FlatUniform {
            z: 0.3,
            color: Vec3::ONE,
        };
        raster.render_mesh_depth(&vertices, &indices, &FlatVertexShader, &uniform);

        assert!(raster.framebuffer().color().all(|(_, _, c)| *c == Vec3::ZERO));
        assert_relative_eq!(
            *raster.framebuffer().get_depth(1, 1).unwrap(),
            0.3,
            epsilon = 1e-6
        );
        assert_relative_eq!(
            raster.framebuffer().depth_map().sample(Vec2::new(0.4, 0.4)),
            0.3,
            epsilon = 1e-6
        );
    }

    #[test]
    fn clear_depth_keeps_color() {
        let red = Vec3::new(1.0, 0.0, 0.0);
        let blue = Vec3::new(0.0, 0.0, 1.0);

        let mut raster = Rasterizer::new(4, 4);
        raster.clear(Vec3::ZERO);
        draw_flat(&mut raster, 0.5, red);

        raster.clear_depth();
        assert_eq!(*raster.framebuffer().get_color(1, 1).unwrap(), red);
        assert_eq!(*raster.framebuffer().get_depth(1, 1).unwrap(), CLEAR_DEPTH);

        // With depth cleared a farther draw wins again.
        draw_flat(&mut raster, 0.9, blue);
        assert_eq!(*raster.framebuffer().get_color(1, 1).unwrap(), blue);
    }

    #[test]
    fn faces_behind_the_eye_are_dropped() {
        let mut raster = Rasterizer::new(4, 4);
        raster.clear(Vec3::ZERO);

        struct BehindVertexShader;
        impl VertexShader<FlatUniform> for BehindVertexShader {
            type VertexData = Vec2;
            type SharedData = ();

            fn vertex(&self, vertex: &Vec2, uniform: &FlatUniform) -> (Vec4, ()) {
                (Vec4::new(vertex.x, vertex.y, uniform.z, -1.0), ())
            }
        }

        let (vertices, indices) = fullscreen_triangle();
        let uniform = FlatUniform {
            z: 0.5,
            color: Vec3::ONE,
        };
        raster.render_mesh(
            &vertices,
            &indices,
            &BehindVertexShader,
            &FlatFragmentShader,
            &uniform,
        );
        assert!(raster.framebuffer().color().all(|(_, _, c)| *c == Vec3::ZERO));
    }
}
