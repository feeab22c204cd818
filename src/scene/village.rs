//! Walkable village around the cabin. WASD/arrows move, Shift sprints,
//! R swaps the follow camera for a free orbit camera and back.

use glam::{Mat4, Vec3};
use hecs::World;
use sdl2::keyboard::Scancode;

use super::prefabs::{spawn_ground, spawn_player, spawn_prop, spawn_static, spawn_tree};
use super::{CameraRig, SceneContext, SceneId};
use crate::camera::{Camera, OrbitCamera, ThirdPersonCamera};
use crate::components::LocalTransform;
use crate::config::GameConfig;
use crate::engine::input::InputState;
use crate::error::SceneError;
use crate::renderer::mesh::{self, MeshData};
use crate::renderer::MeshStore;

const GROUND_HALF_EXTENT: f32 = 200.0;
const GRASS: Vec3 = Vec3::new(0.42, 0.66, 0.36);
const WALL: Vec3 = Vec3::new(0.9, 0.85, 0.75);
const ROOF: Vec3 = Vec3::new(0.7, 0.3, 0.25);
const WOOD: Vec3 = Vec3::new(0.6, 0.4, 0.25);
const STONE: Vec3 = Vec3::new(0.65, 0.65, 0.7);

/// (centre on the ground, footprint width, wall height, footprint depth)
const HOUSES: [(Vec3, f32, f32, f32); 4] = [
    (Vec3::new(-30.0, 0.0, 10.0), 8.0, 6.0, 8.0),
    (Vec3::new(30.0, 0.0, 25.0), 10.0, 7.0, 8.0),
    (Vec3::new(-35.0, 0.0, -30.0), 8.0, 5.0, 10.0),
    (Vec3::new(40.0, 0.0, -25.0), 9.0, 6.0, 9.0),
];

const TREES: [Vec3; 8] = [
    Vec3::new(-12.0, 0.0, 35.0),
    Vec3::new(14.0, 0.0, 40.0),
    Vec3::new(-50.0, 0.0, 5.0),
    Vec3::new(55.0, 0.0, 5.0),
    Vec3::new(-20.0, 0.0, -45.0),
    Vec3::new(22.0, 0.0, -50.0),
    Vec3::new(-60.0, 0.0, 45.0),
    Vec3::new(60.0, 0.0, 50.0),
];

fn spawn_house(world: &mut World, meshes: &mut MeshStore, at: Vec3, width: f32, height: f32, depth: f32) {
    let mut walls = MeshData::default();
    walls.append(
        &mesh::cuboid(width, height, depth),
        Mat4::from_translation(Vec3::Y * height / 2.0),
    );
    spawn_static(world, meshes, walls, LocalTransform::new(at), WALL);

    let roof_height = height * 0.5;
    let mut roof = MeshData::default();
    roof.append(
        &mesh::tapered_box(0.2, depth + 1.0, width + 1.0, depth + 1.0, roof_height),
        Mat4::from_translation(Vec3::Y * (height + roof_height / 2.0)),
    );
    spawn_prop(world, meshes, roof, LocalTransform::new(at), ROOF);
}

fn spawn_map(world: &mut World, meshes: &mut MeshStore) {
    spawn_ground(world, meshes, GROUND_HALF_EXTENT, GRASS);

    // The cabin from the globe, full size, facing the spawn point.
    spawn_static(
        world,
        meshes,
        mesh::cabin(),
        LocalTransform::new(Vec3::new(0.0, 0.0, -25.0)).with_scale(Vec3::splat(10.0)),
        WOOD,
    );

    for (at, width, height, depth) in HOUSES {
        spawn_house(world, meshes, at, width, height, depth);
    }

    // Low stone platform the character can step up onto.
    spawn_static(
        world,
        meshes,
        mesh::cuboid(10.0, 0.5, 10.0),
        LocalTransform::new(Vec3::new(18.0, 0.25, -8.0)),
        STONE,
    );

    // Garden wall closing off the far side of the square.
    spawn_static(
        world,
        meshes,
        mesh::cuboid(60.0, 3.0, 1.0),
        LocalTransform::new(Vec3::new(0.0, 1.5, 70.0)),
        STONE,
    );

    for at in TREES {
        spawn_tree(world, meshes, LocalTransform::new(at).with_scale(Vec3::splat(3.0)));
    }
}

pub(super) fn build(config: &GameConfig) -> Result<SceneContext, SceneError> {
    let mut world = World::new();
    let mut meshes = MeshStore::new();

    spawn_map(&mut world, &mut meshes);
    let player = spawn_player(&mut world, &mut meshes, config)?;

    let rig = CameraRig::Follow {
        third_person: ThirdPersonCamera::new(&config.camera),
        orbit: OrbitCamera::new(&config.camera),
    };
    let mut scene = SceneContext::new(SceneId::Village, world, meshes, Camera::new(&config.camera), rig, config);
    scene.player = Some(player);
    Ok(scene)
}

pub(super) fn on_input(scene: &mut SceneContext, input: &InputState) {
    if input.pressed(Scancode::R) {
        scene.toggle_camera();
    }
}
