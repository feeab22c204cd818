use glam::{Mat4, Vec3};

/// Static triangle soup in world space, hit by the grounding and obstacle
/// probes. Built once when a scene spawns its map.
#[derive(Debug, Clone)]
pub struct CollisionMesh {
    pub triangles: Vec<[Vec3; 3]>,
    pub min: Vec3,
    pub max: Vec3,
}

impl CollisionMesh {
    /// Build from indexed local-space positions placed by `transform`.
    pub fn from_indexed(positions: &[Vec3], indices: &[u32], transform: Mat4) -> Self {
        let world: Vec<Vec3> = positions
            .iter()
            .map(|p| transform.transform_point3(*p))
            .collect();
        let triangles = indices
            .chunks_exact(3)
            .map(|t| [world[t[0] as usize], world[t[1] as usize], world[t[2] as usize]])
            .collect();
        Self::from_triangles(triangles)
    }

    pub fn from_triangles(triangles: Vec<[Vec3; 3]>) -> Self {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for tri in &triangles {
            for v in tri {
                min = min.min(*v);
                max = max.max(*v);
            }
        }
        Self { triangles, min, max }
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}
