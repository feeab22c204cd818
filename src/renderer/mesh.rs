use gl::types::*;
use glam::{Mat4, Vec3};
use std::f32::consts::PI;
use std::mem;
use std::ptr;

/// Floats per vertex: position then normal.
const STRIDE: usize = 6;

/// CPU-side geometry. Uploaded for drawing and reused for collision meshes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / STRIDE
    }

    pub fn positions(&self) -> Vec<Vec3> {
        self.vertices
            .chunks_exact(STRIDE)
            .map(|v| Vec3::new(v[0], v[1], v[2]))
            .collect()
    }

    fn push_vertex(&mut self, p: Vec3, n: Vec3) {
        self.vertices.extend_from_slice(&[p.x, p.y, p.z, n.x, n.y, n.z]);
    }

    fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        let base = self.vertex_count() as u32;
        for c in corners {
            self.push_vertex(c, normal);
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    fn push_triangle(&mut self, corners: [Vec3; 3]) {
        let normal = (corners[1] - corners[0]).cross(corners[2] - corners[0]).normalize_or(Vec3::Y);
        let base = self.vertex_count() as u32;
        for c in corners {
            self.push_vertex(c, normal);
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    /// Merge `other` into this mesh, placed by `transform`.
    pub fn append(&mut self, other: &MeshData, transform: Mat4) {
        let base = self.vertex_count() as u32;
        for v in other.vertices.chunks_exact(STRIDE) {
            let p = transform.transform_point3(Vec3::new(v[0], v[1], v[2]));
            let n = transform.transform_vector3(Vec3::new(v[3], v[4], v[5])).normalize_or(Vec3::Y);
            self.push_vertex(p, n);
        }
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }
}

// ---------------------------------------------------------------------------
// GPU mesh
// ---------------------------------------------------------------------------

pub struct Mesh {
    vao: GLuint,
    vbo: GLuint,
    ebo: GLuint,
    pub index_count: i32,
}

impl Mesh {
    pub fn upload(data: &MeshData) -> Self {
        let mut vao = 0;
        let mut vbo = 0;
        let mut ebo = 0;

        unsafe {
            gl::GenVertexArrays(1, &mut vao);
            gl::GenBuffers(1, &mut vbo);
            gl::GenBuffers(1, &mut ebo);

            gl::BindVertexArray(vao);

            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                (data.vertices.len() * mem::size_of::<f32>()) as GLsizeiptr,
                data.vertices.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo);
            gl::BufferData(
                gl::ELEMENT_ARRAY_BUFFER,
                (data.indices.len() * mem::size_of::<u32>()) as GLsizeiptr,
                data.indices.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            let stride = (STRIDE * mem::size_of::<f32>()) as GLsizei;

            // position attribute (location 0)
            gl::VertexAttribPointer(0, 3, gl::FLOAT, gl::FALSE, stride, ptr::null());
            gl::EnableVertexAttribArray(0);

            // normal attribute (location 1)
            gl::VertexAttribPointer(
                1,
                3,
                gl::FLOAT,
                gl::FALSE,
                stride,
                (3 * mem::size_of::<f32>()) as *const _,
            );
            gl::EnableVertexAttribArray(1);

            gl::BindVertexArray(0);
        }

        Mesh {
            vao,
            vbo,
            ebo,
            index_count: data.indices.len() as i32,
        }
    }

    pub fn draw(&self) {
        unsafe {
            gl::BindVertexArray(self.vao);
            gl::DrawElements(gl::TRIANGLES, self.index_count, gl::UNSIGNED_INT, ptr::null());
            gl::BindVertexArray(0);
        }
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.vao);
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteBuffers(1, &self.ebo);
        }
    }
}

// ---------------------------------------------------------------------------
// Primitive builders
// ---------------------------------------------------------------------------

pub fn sphere(radius: f32, stacks: u32, sectors: u32) -> MeshData {
    let mut mesh = MeshData::default();

    for i in 0..=stacks {
        let stack_angle = PI / 2.0 - (i as f32) * PI / (stacks as f32);
        let ring = stack_angle.cos();
        let y = stack_angle.sin();

        for j in 0..=sectors {
            let sector_angle = 2.0 * PI * (j as f32) / (sectors as f32);
            let normal = Vec3::new(ring * sector_angle.cos(), y, ring * sector_angle.sin());
            mesh.push_vertex(normal * radius, normal);
        }
    }

    for i in 0..stacks {
        for j in 0..sectors {
            let first = i * (sectors + 1) + j;
            let second = first + sectors + 1;
            mesh.indices.extend_from_slice(&[first, second, first + 1, first + 1, second, second + 1]);
        }
    }
    mesh
}

/// Axis-aligned box centred on the origin.
pub fn cuboid(width: f32, height: f32, depth: f32) -> MeshData {
    tapered_box(width, depth, width, depth, height)
}

/// Box whose top face (`top_w × top_d`) may differ from its bottom face.
/// Side normals follow the slant.
pub fn tapered_box(top_w: f32, top_d: f32, bot_w: f32, bot_d: f32, height: f32) -> MeshData {
    let hh = height * 0.5;
    let (htw, htd) = (top_w * 0.5, top_d * 0.5);
    let (hbw, hbd) = (bot_w * 0.5, bot_d * 0.5);

    let c = [
        Vec3::new(-htw, hh, htd),  // 0: top-left-front
        Vec3::new(htw, hh, htd),   // 1: top-right-front
        Vec3::new(htw, hh, -htd),  // 2: top-right-back
        Vec3::new(-htw, hh, -htd), // 3: top-left-back
        Vec3::new(-hbw, -hh, hbd), // 4: bot-left-front
        Vec3::new(hbw, -hh, hbd),  // 5: bot-right-front
        Vec3::new(hbw, -hh, -hbd), // 6: bot-right-back
        Vec3::new(-hbw, -hh, -hbd), // 7: bot-left-back
    ];
    let normal = |a: Vec3, b: Vec3, d: Vec3| (b - a).cross(d - a).normalize_or(Vec3::Y);

    let mut mesh = MeshData::default();
    mesh.push_quad([c[0], c[1], c[2], c[3]], Vec3::Y);
    mesh.push_quad([c[7], c[6], c[5], c[4]], Vec3::NEG_Y);
    mesh.push_quad([c[0], c[4], c[5], c[1]], normal(c[0], c[4], c[1]));
    mesh.push_quad([c[2], c[6], c[7], c[3]], normal(c[2], c[6], c[3]));
    mesh.push_quad([c[1], c[5], c[6], c[2]], normal(c[1], c[5], c[2]));
    mesh.push_quad([c[3], c[7], c[4], c[0]], normal(c[3], c[7], c[0]));
    mesh
}

pub fn cylinder(radius: f32, height: f32, segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    let half_h = height * 0.5;
    let ring = |i: u32| {
        let angle = 2.0 * PI * (i as f32) / (segments as f32);
        Vec3::new(angle.cos(), 0.0, angle.sin())
    };

    for i in 0..=segments {
        let n = ring(i);
        mesh.push_vertex(n * radius - Vec3::Y * half_h, n);
        mesh.push_vertex(n * radius + Vec3::Y * half_h, n);
    }
    for i in 0..segments {
        let bot = i * 2;
        mesh.indices.extend_from_slice(&[bot, bot + 2, bot + 1, bot + 1, bot + 2, bot + 3]);
    }

    for (y, n) in [(half_h, Vec3::Y), (-half_h, Vec3::NEG_Y)] {
        let center = mesh.vertex_count() as u32;
        mesh.push_vertex(Vec3::Y * y, n);
        let start = mesh.vertex_count() as u32;
        for i in 0..=segments {
            mesh.push_vertex(ring(i) * radius + Vec3::Y * y, n);
        }
        for i in 0..segments {
            if y > 0.0 {
                mesh.indices.extend_from_slice(&[center, start + i, start + i + 1]);
            } else {
                mesh.indices.extend_from_slice(&[center, start + i + 1, start + i]);
            }
        }
    }
    mesh
}

/// Flat ground quad at y = 0 facing up.
pub fn plane(width: f32, depth: f32) -> MeshData {
    let (hw, hd) = (width * 0.5, depth * 0.5);
    let mut mesh = MeshData::default();
    mesh.push_quad(
        [
            Vec3::new(-hw, 0.0, hd),
            Vec3::new(hw, 0.0, hd),
            Vec3::new(hw, 0.0, -hd),
            Vec3::new(-hw, 0.0, -hd),
        ],
        Vec3::Y,
    );
    mesh
}

// ---------------------------------------------------------------------------
// Props
// ---------------------------------------------------------------------------

/// Folded paper dart, nose along +Z, `length` long.
pub fn paper_plane(length: f32) -> MeshData {
    let nose = Vec3::new(0.0, 0.0, 0.5);
    let tail = Vec3::new(0.0, 0.0, -0.5);
    let keel = Vec3::new(0.0, -0.15, -0.5);
    let left = Vec3::new(0.35, 0.02, -0.5);
    let right = Vec3::new(-0.35, 0.02, -0.5);

    let mut mesh = MeshData::default();
    mesh.push_triangle([nose, left, tail].map(|v| v * length));
    mesh.push_triangle([nose, tail, right].map(|v| v * length));
    mesh.push_triangle([nose, keel, tail].map(|v| v * length));
    mesh
}

/// Small log cabin, one unit wide, origin at the floor centre.
pub fn cabin() -> MeshData {
    let mut mesh = MeshData::default();
    mesh.append(&cuboid(1.0, 0.7, 0.8), Mat4::from_translation(Vec3::new(0.0, 0.35, 0.0)));
    mesh.append(
        &tapered_box(0.05, 0.95, 1.2, 0.95, 0.4),
        Mat4::from_translation(Vec3::new(0.0, 0.9, 0.0)),
    );
    mesh.append(&cuboid(0.12, 0.35, 0.12), Mat4::from_translation(Vec3::new(0.3, 1.0, -0.2)));
    mesh.append(&cuboid(0.2, 0.4, 0.02), Mat4::from_translation(Vec3::new(0.0, 0.2, 0.41)));
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuboid_has_six_quads() {
        let mesh = cuboid(2.0, 1.0, 3.0);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.indices.len(), 36);
        let max = mesh.positions().into_iter().fold(Vec3::NEG_INFINITY, Vec3::max);
        assert_eq!(max, Vec3::new(1.0, 0.5, 1.5));
    }

    #[test]
    fn append_offsets_indices_and_positions() {
        let mut mesh = plane(2.0, 2.0);
        mesh.append(&plane(2.0, 2.0), Mat4::from_translation(Vec3::Y * 3.0));
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(&mesh.indices[6..], &[4, 5, 6, 4, 6, 7]);
        assert!(mesh.positions()[4..].iter().all(|p| p.y == 3.0));
    }

    #[test]
    fn every_index_is_in_range() {
        for mesh in [sphere(1.0, 8, 12), cylinder(0.5, 1.0, 10), paper_plane(2.0), cabin()] {
            let count = mesh.vertex_count() as u32;
            assert!(mesh.indices.iter().all(|&i| i < count));
            assert_eq!(mesh.indices.len() % 3, 0);
        }
    }
}
