use std::collections::VecDeque;

use glam::Mat4;
use hecs::{Entity, World};

use crate::components::{Children, GlobalTransform, LocalTransform, Parent};

/// Propagates LocalTransform down the hierarchy via BFS.
/// Roots (entities with LocalTransform but no Parent) compute GlobalTransform
/// from their own LocalTransform. Children inherit the parent's
/// GlobalTransform multiplied by their own LocalTransform.
pub fn transform_propagation_system(world: &mut World) {
    let mut queue: VecDeque<(Entity, Mat4)> = VecDeque::new();

    let roots: Vec<(Entity, Mat4)> = world
        .query::<&LocalTransform>()
        .without::<&Parent>()
        .iter()
        .map(|(entity, local)| (entity, local.matrix()))
        .collect();

    for (entity, global) in roots {
        if let Ok(mut gt) = world.get::<&mut GlobalTransform>(entity) {
            gt.0 = global;
        }
        if let Ok(children) = world.get::<&Children>(entity) {
            queue.extend(children.0.iter().map(|&child| (child, global)));
        }
    }

    while let Some((entity, parent_global)) = queue.pop_front() {
        let global = match world.get::<&LocalTransform>(entity) {
            Ok(local) => parent_global * local.matrix(),
            Err(_) => parent_global,
        };

        if let Ok(mut gt) = world.get::<&mut GlobalTransform>(entity) {
            gt.0 = global;
        }
        if let Ok(children) = world.get::<&Children>(entity) {
            queue.extend(children.0.iter().map(|&child| (child, global)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::add_child;
    use glam::{Quat, Vec3};

    #[test]
    fn children_inherit_parent_transform() {
        let mut world = World::new();
        let parent = world.spawn((
            LocalTransform::new(Vec3::new(10.0, 0.0, 0.0))
                .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)),
            GlobalTransform::default(),
        ));
        let child = world.spawn((LocalTransform::new(Vec3::new(0.0, 0.0, 2.0)), GlobalTransform::default()));
        let grandchild = world.spawn((LocalTransform::new(Vec3::new(0.0, 1.0, 0.0)), GlobalTransform::default()));
        add_child(&mut world, parent, child).unwrap();
        add_child(&mut world, child, grandchild).unwrap();

        transform_propagation_system(&mut world);

        let at = |e| world.get::<&GlobalTransform>(e).unwrap().0.transform_point3(Vec3::ZERO);
        assert!((at(parent) - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-4);
        // Local +Z turned 90° about Y points along world +X.
        assert!((at(child) - Vec3::new(12.0, 0.0, 0.0)).length() < 1e-4);
        assert!((at(grandchild) - Vec3::new(12.0, 1.0, 0.0)).length() < 1e-4);
    }
}
