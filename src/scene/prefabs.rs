use glam::{Mat4, Quat, Vec3};
use hecs::{Entity, World};

use crate::animation::AnimationMixer;
use crate::components::*;
use crate::config::GameConfig;
use crate::error::SceneError;
use crate::renderer::mesh::{self, MeshData};
use crate::renderer::MeshStore;
use crate::systems::{character_fsm, rest_pose};

// ---------------------------------------------------------------------------
// CharacterRig: proportions table for spawn_player
// ---------------------------------------------------------------------------

/// Body proportions and joint offsets, relative to the character origin.
/// The origin sits at hip height; legs hang one `leg_length` below it.
struct CharacterRig {
    torso_top_w: f32,
    torso_top_d: f32,
    torso_bot_w: f32,
    torso_bot_d: f32,
    torso_height: f32,

    head_radius: f32,

    limb_radius: f32,
    arm_length: f32,
    leg_length: f32,

    shoulder_x: f32,
    shoulder_y: f32,
    hip_x: f32,

    body_color: Vec3,
    head_color: Vec3,
    limb_color: Vec3,
}

impl CharacterRig {
    fn head_y(&self) -> f32 {
        self.torso_height + self.head_radius * 0.9
    }

    /// Limb cylinder with its pivot at the top end so it swings from the joint.
    fn limb(&self, length: f32) -> MeshData {
        let mut data = MeshData::default();
        data.append(
            &mesh::cylinder(self.limb_radius, length, 10),
            Mat4::from_translation(Vec3::new(0.0, -length / 2.0, 0.0)),
        );
        data
    }
}

fn default_rig(leg_length: f32) -> CharacterRig {
    CharacterRig {
        torso_top_w: 0.9,
        torso_top_d: 0.5,
        torso_bot_w: 0.6,
        torso_bot_d: 0.4,
        torso_height: 1.2,

        head_radius: 0.38,

        limb_radius: 0.14,
        arm_length: 0.95,
        leg_length,

        shoulder_x: 0.56,
        shoulder_y: 1.1,
        hip_x: 0.2,

        body_color: Vec3::new(0.95, 0.55, 0.35),
        head_color: Vec3::new(0.98, 0.85, 0.72),
        limb_color: Vec3::new(0.35, 0.45, 0.7),
    }
}

fn spawn_limb(
    world: &mut World,
    parent: Entity,
    handle: MeshHandle,
    color: Vec3,
    local: LocalTransform,
) -> Result<Entity, SceneError> {
    let limb = world.spawn((local, GlobalTransform::default(), handle, Color(color)));
    add_child(world, parent, limb)?;
    Ok(limb)
}

// ---------------------------------------------------------------------------
// Public prefab factories
// ---------------------------------------------------------------------------

/// Static map geometry: rendered, and hit by the grounding/obstacle probes.
pub fn spawn_static(
    world: &mut World,
    meshes: &mut MeshStore,
    data: MeshData,
    local: LocalTransform,
    color: Vec3,
) -> Entity {
    let collision = CollisionMesh::from_indexed(&data.positions(), &data.indices, local.matrix());
    let handle = meshes.add(data);
    world.spawn((local, GlobalTransform::default(), handle, Color(color), collision))
}

/// Render-only prop.
pub fn spawn_prop(
    world: &mut World,
    meshes: &mut MeshStore,
    data: MeshData,
    local: LocalTransform,
    color: Vec3,
) -> Entity {
    let handle = meshes.add(data);
    world.spawn((local, GlobalTransform::default(), handle, Color(color)))
}

/// Flat ground quad centred on the origin with its top at y = 0.
pub fn spawn_ground(world: &mut World, meshes: &mut MeshStore, half_extent: f32, color: Vec3) -> Entity {
    let size = half_extent * 2.0;
    spawn_static(world, meshes, mesh::plane(size, size), LocalTransform::default(), color)
}

/// Spawn the player character: torso on the root, head and limbs as children.
///
/// The FSM is entered in `idle` immediately; with no clips configured the
/// states stay inert but the controller still runs.
pub fn spawn_player(world: &mut World, meshes: &mut MeshStore, config: &GameConfig) -> Result<Entity, SceneError> {
    let controller = &config.controller;
    let rig = default_rig(config.probe.ground_min_distance);

    let torso_handle = meshes.add({
        let mut torso = MeshData::default();
        torso.append(
            &mesh::tapered_box(rig.torso_top_w, rig.torso_top_d, rig.torso_bot_w, rig.torso_bot_d, rig.torso_height),
            Mat4::from_translation(Vec3::Y * rig.torso_height / 2.0),
        );
        torso
    });
    let head_handle = meshes.add(mesh::sphere(rig.head_radius, 10, 16));
    let arm_handle = meshes.add(rig.limb(rig.arm_length));
    let leg_handle = meshes.add(rig.limb(rig.leg_length));

    let mut anim = CharacterAnimation::new(AnimationMixer::new(&config.clips), controller);
    let mut fsm = character_fsm()?;
    fsm.set_state(StateId::Idle, &mut anim)?;

    let player = world.spawn((
        LocalTransform::new(controller.spawn),
        GlobalTransform::default(),
        torso_handle,
        Color(rig.body_color),
        Player,
        fsm,
        anim,
        CharacterMotion::new(controller),
        ProbeState::default(),
    ));

    let rest = rest_pose();
    let head = spawn_limb(
        world,
        player,
        head_handle,
        rig.head_color,
        LocalTransform::new(Vec3::new(0.0, rig.head_y(), 0.0)),
    )?;
    // +X is the character's left when facing +Z.
    let left_arm = spawn_limb(
        world,
        player,
        arm_handle,
        rig.limb_color,
        LocalTransform::new(Vec3::new(rig.shoulder_x, rig.shoulder_y, 0.0)).with_rotation(rest.left_arm),
    )?;
    let right_arm = spawn_limb(
        world,
        player,
        arm_handle,
        rig.limb_color,
        LocalTransform::new(Vec3::new(-rig.shoulder_x, rig.shoulder_y, 0.0)).with_rotation(rest.right_arm),
    )?;
    let left_leg = spawn_limb(
        world,
        player,
        leg_handle,
        rig.limb_color,
        LocalTransform::new(Vec3::new(rig.hip_x, 0.0, 0.0)),
    )?;
    let right_leg = spawn_limb(
        world,
        player,
        leg_handle,
        rig.limb_color,
        LocalTransform::new(Vec3::new(-rig.hip_x, 0.0, 0.0)),
    )?;

    world.insert_one(player, CharacterBody { head, left_arm, right_arm, left_leg, right_leg })?;
    log::info!("player spawned at {}", controller.spawn);
    Ok(player)
}

/// Folded paper dart.
pub fn spawn_paper_plane(world: &mut World, meshes: &mut MeshStore, local: LocalTransform) -> Entity {
    spawn_prop(world, meshes, mesh::paper_plane(3.0), local, Vec3::new(0.97, 0.97, 0.95))
}

/// Glass-ball diorama: a grassy disc with a cabin and two trees, scaled as one.
pub fn spawn_globe(world: &mut World, meshes: &mut MeshStore, local: LocalTransform) -> Result<Entity, SceneError> {
    let base = spawn_prop(world, meshes, mesh::cylinder(1.0, 0.25, 32), local, Vec3::new(0.45, 0.7, 0.35));

    let cabin = spawn_prop(
        world,
        meshes,
        mesh::cabin(),
        LocalTransform::new(Vec3::new(0.0, 0.125, 0.0)).with_scale(Vec3::splat(0.6)),
        Vec3::new(0.6, 0.4, 0.25),
    );
    add_child(world, base, cabin)?;

    for x in [-0.6_f32, 0.65] {
        let tree = spawn_tree(world, meshes, LocalTransform::new(Vec3::new(x, 0.125, -0.3)).with_scale(Vec3::splat(0.25)));
        add_child(world, base, tree)?;
    }
    Ok(base)
}

/// Trunk and canopy as one mesh, origin at the foot of the trunk.
pub fn spawn_tree(world: &mut World, meshes: &mut MeshStore, local: LocalTransform) -> Entity {
    let mut tree = MeshData::default();
    tree.append(&mesh::cylinder(0.2, 1.2, 8), Mat4::from_translation(Vec3::Y * 0.6));
    tree.append(&mesh::sphere(0.8, 8, 12), Mat4::from_translation(Vec3::Y * 1.7));
    spawn_prop(world, meshes, tree, local, Vec3::new(0.3, 0.55, 0.3))
}

/// Rock the entity gently about its local X axis.
pub fn add_rocking(world: &mut World, entity: Entity, amplitude: f32, rate: f32) -> Result<(), SceneError> {
    let base = world
        .get::<&LocalTransform>(entity)
        .map(|t| t.rotation)
        .unwrap_or(Quat::IDENTITY);
    world.insert_one(entity, Rock { base, amplitude, rate, phase: 0.0 })?;
    Ok(())
}
