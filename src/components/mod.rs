mod character;
mod physics;

pub use character::*;
pub use physics::*;

use glam::{Mat4, Quat, Vec3};
use hecs::{Entity, World};

/// Spatial transform with position, rotation, and scale (local space).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl LocalTransform {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// World-space direction of the local +Z axis.
    pub fn forward(&self) -> Vec3 {
        (self.rotation * Vec3::Z).normalize()
    }
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

/// Computed world-space transform matrix, updated by the propagation system.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalTransform(pub Mat4);

/// Points to the parent entity in the transform hierarchy.
pub struct Parent(pub Entity);

/// Lists child entities in the transform hierarchy.
pub struct Children(pub Vec<Entity>);

/// Attach `child` under `parent` in the transform hierarchy.
pub fn add_child(world: &mut World, parent: Entity, child: Entity) -> Result<(), hecs::NoSuchEntity> {
    let attached = match world.get::<&mut Children>(parent) {
        Ok(mut children) => {
            if !children.0.contains(&child) {
                children.0.push(child);
            }
            true
        }
        Err(_) => false,
    };
    if !attached {
        world.insert_one(parent, Children(vec![child]))?;
    }
    world.insert_one(child, Parent(parent))
}

/// Despawn `root` and everything below it in the hierarchy.
pub fn despawn_recursive(world: &mut World, root: Entity) {
    let mut stack = vec![root];
    while let Some(entity) = stack.pop() {
        if let Ok(children) = world.get::<&Children>(entity) {
            stack.extend(children.0.iter().copied());
        }
        let _ = world.despawn(entity);
    }
}

/// Index into the MeshStore resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshHandle(pub usize);

/// RGB color applied to an entity for rendering.
pub struct Color(pub Vec3);

/// Idle rocking about the local X axis on top of a fixed base orientation.
#[derive(Debug, Clone, Copy)]
pub struct Rock {
    pub base: Quat,
    /// Peak angle in radians.
    pub amplitude: f32,
    /// Radians of phase per second.
    pub rate: f32,
    pub phase: f32,
}

/// Marker: this entity is the player character.
pub struct Player;
