use glam::Vec3;
use hecs::World;

use crate::components::CollisionMesh;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub distance: f32,
    pub point: Vec3,
}

/// Cast a ray against every static collision mesh, returning the nearest hit
/// within `max_distance`.
pub fn raycast_static(
    world: &World,
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
) -> Option<RaycastHit> {
    let dir = direction.normalize();
    let mut best: Option<f32> = None;

    for (_, mesh) in world.query::<&CollisionMesh>().iter() {
        if let Some(t) = raycast_mesh(mesh, origin, dir, max_distance) {
            if best.map_or(true, |b| t < b) {
                best = Some(t);
            }
        }
    }

    best.map(|t| RaycastHit {
        distance: t,
        point: origin + dir * t,
    })
}

/// Nearest hit distance against one mesh. `dir` must be normalised.
pub fn raycast_mesh(mesh: &CollisionMesh, origin: Vec3, dir: Vec3, max_distance: f32) -> Option<f32> {
    if mesh.is_empty() {
        return None;
    }
    // Broad phase: skip the triangle loop when the bounds are missed.
    match ray_aabb_intersection(origin, dir, mesh.min, mesh.max) {
        Some(t) if t <= max_distance => {}
        _ => return None,
    }

    mesh.triangles
        .iter()
        .filter_map(|tri| ray_triangle_intersection(origin, dir, tri))
        .filter(|t| *t <= max_distance)
        .reduce(f32::min)
}

/// Möller–Trumbore, two-sided. Returns the distance along `dir` for hits in
/// front of the origin.
fn ray_triangle_intersection(origin: Vec3, dir: Vec3, tri: &[Vec3; 3]) -> Option<f32> {
    const EPSILON: f32 = 1e-7;
    let edge1 = tri[1] - tri[0];
    let edge2 = tri[2] - tri[0];
    let p = dir.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = origin - tri[0];
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(edge1);
    let v = dir.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(q) * inv_det;
    (t > EPSILON).then_some(t)
}

/// Entry distance into the box, or 0.0 when the origin is inside it.
fn ray_aabb_intersection(origin: Vec3, dir: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    // Pad so flat boxes (a floor quad) still have volume.
    let min = min - Vec3::splat(1e-4);
    let max = max + Vec3::splat(1e-4);
    let inv_dir = dir.recip();

    let t1 = (min - origin) * inv_dir;
    let t2 = (max - origin) * inv_dir;

    let tmin = t1.min(t2).max_element();
    let tmax = t1.max(t2).min_element();

    if tmax < 0.0 || tmin > tmax {
        return None;
    }
    Some(tmin.max(0.0))
}
