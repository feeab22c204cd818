use glam::{Quat, Vec3};
use hecs::World;

use crate::components::{
    CharacterAnimation, CharacterFsm, CharacterMotion, LocalTransform, ProbeState, StateId,
};
use crate::engine::input::DirectionalInput;

/// Turn rate in radians per second per unit of `acceleration.y`.
const TURN_RATE: f32 = 4.0 * std::f32::consts::PI;

/// One tick of velocity integration for a character.
///
/// `velocity` lives in the character's local frame: `z` is forward, `x` is
/// sideways. Decay never flips the sign of `velocity.z`. When `blocked`, the
/// forward part of this tick's displacement is dropped; velocity is kept.
/// Backing up is a negative `velocity.z` along the same axis, so a character
/// facing an obstacle cannot reverse away from it either; it has to turn.
pub fn integrate(
    motion: &mut CharacterMotion,
    local: &mut LocalTransform,
    input: &DirectionalInput,
    blocked: bool,
    dt: f32,
) {
    let velocity = motion.velocity;
    let mut decay = velocity * motion.deceleration * dt;
    decay.z = decay.z.signum() * decay.z.abs().min(velocity.z.abs());
    motion.velocity += decay;

    let mut acc = motion.acceleration;
    if input.run {
        acc *= motion.sprint_multiplier;
    }
    if input.forward {
        motion.velocity.z += acc.z * dt;
    }
    if input.backward {
        motion.velocity.z -= acc.z * dt;
    }

    // Turning uses the base rate; sprint only scales translation.
    let turn = TURN_RATE * motion.acceleration.y * dt;
    if input.left {
        local.rotation = (local.rotation * Quat::from_rotation_y(turn)).normalize();
    }
    if input.right {
        local.rotation = (local.rotation * Quat::from_rotation_y(-turn)).normalize();
    }

    let forward = (local.rotation * Vec3::Z).normalize();
    let sideways = (local.rotation * Vec3::X).normalize();

    let mut delta = sideways * motion.velocity.x * dt;
    if !blocked {
        delta += forward * motion.velocity.z * dt;
    }
    local.position += delta;
}

/// Drive every character: FSM first, then movement, then the mixer.
///
/// Runs **after** `probe_system` so `ProbeState::blocked` is fresh. A
/// character whose FSM has no current state yet is skipped entirely.
pub fn character_controller_system(world: &mut World, input: &DirectionalInput, dt: f32) {
    for (entity, (fsm, anim, motion, local, probe)) in world.query_mut::<(
        &mut CharacterFsm,
        &mut CharacterAnimation,
        &mut CharacterMotion,
        &mut LocalTransform,
        Option<&ProbeState>,
    )>() {
        if fsm.current().is_none() {
            continue;
        }

        fsm.tick(dt);
        if let Err(err) = fsm.update(dt, input, anim) {
            log::error!("character {entity:?}: {err}");
        }
        if fsm.just_entered() {
            if let Some(id) = fsm.current_id() {
                log::debug!("character {entity:?} -> {id}");
            }
        }

        if fsm.current_id().is_some_and(StateId::is_locomotion) {
            let blocked = probe.is_some_and(|p| p.blocked);
            integrate(motion, local, input, blocked, dt);
        }
        anim.mixer.update(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationMixer;
    use crate::config::GameConfig;
    use crate::systems::states::character_fsm;

    fn forward() -> DirectionalInput {
        DirectionalInput { forward: true, ..Default::default() }
    }

    fn spawn_character(world: &mut World, enter: bool) -> hecs::Entity {
        let cfg = GameConfig::default();
        let mut anim = CharacterAnimation::new(AnimationMixer::new(&cfg.clips), &cfg.controller);
        let mut fsm = character_fsm().unwrap();
        if enter {
            fsm.set_state(StateId::Idle, &mut anim).unwrap();
        }
        world.spawn((
            fsm,
            anim,
            CharacterMotion::new(&cfg.controller),
            LocalTransform::default(),
            ProbeState::default(),
        ))
    }

    #[test]
    fn forward_from_idle_walks_and_accelerates() {
        let mut world = World::new();
        let player = spawn_character(&mut world, true);

        character_controller_system(&mut world, &forward(), 0.016);

        let fsm = world.get::<&CharacterFsm>(player).unwrap();
        assert_eq!(fsm.current_id(), Some(StateId::Walk));
        let motion = world.get::<&CharacterMotion>(player).unwrap();
        assert!(motion.velocity.z > 0.0);
        let local = world.get::<&LocalTransform>(player).unwrap();
        assert!(local.position.z > 0.0);
    }

    #[test]
    fn controller_is_inert_without_a_state() {
        let mut world = World::new();
        let player = spawn_character(&mut world, false);

        character_controller_system(&mut world, &forward(), 0.016);

        assert!(world.get::<&CharacterFsm>(player).unwrap().current().is_none());
        assert_eq!(world.get::<&CharacterMotion>(player).unwrap().velocity, Vec3::ZERO);
        assert_eq!(world.get::<&LocalTransform>(player).unwrap().position, Vec3::ZERO);
    }

    #[test]
    fn decay_never_flips_forward_velocity() {
        let mut motion = CharacterMotion::default();
        let mut local = LocalTransform::default();
        motion.velocity.z = 1.0;
        // 1.0 * -5.0 * 1.0 would overshoot to -4 without the clamp.
        integrate(&mut motion, &mut local, &DirectionalInput::default(), false, 1.0);
        assert_eq!(motion.velocity.z, 0.0);

        motion.velocity.z = -2.0;
        integrate(&mut motion, &mut local, &DirectionalInput::default(), false, 0.05);
        assert!(motion.velocity.z < 0.0 && motion.velocity.z > -2.0);
    }

    #[test]
    fn holding_left_turns_at_the_base_rate() {
        let mut motion = CharacterMotion::default();
        let mut local = LocalTransform::default();
        let left = DirectionalInput { left: true, run: true, ..Default::default() };
        for _ in 0..5 {
            integrate(&mut motion, &mut local, &left, false, 0.1);
        }
        // 4π * 0.25 * 0.5 s = π/2: +Z now faces +X.
        assert!((local.forward() - Vec3::X).length() < 1e-4);
        assert_eq!(local.position, Vec3::ZERO);
        assert_eq!(motion.velocity, Vec3::ZERO);
    }

    #[test]
    fn sprint_doubles_forward_acceleration() {
        let mut walk = CharacterMotion::default();
        let mut run = CharacterMotion::default();
        let mut local = LocalTransform::default();
        integrate(&mut walk, &mut local, &forward(), false, 0.016);
        let sprint = DirectionalInput { run: true, ..forward() };
        integrate(&mut run, &mut local, &sprint, false, 0.016);
        assert!((run.velocity.z - 2.0 * walk.velocity.z).abs() < 1e-5);
    }

    #[test]
    fn blocked_drops_forward_displacement_only() {
        let mut motion = CharacterMotion::default();
        let mut local = LocalTransform::default();
        motion.velocity = Vec3::new(0.0, 0.0, 10.0);

        integrate(&mut motion, &mut local, &forward(), true, 0.016);

        assert_eq!(local.position, Vec3::ZERO);
        assert!(motion.velocity.z > 10.0 - 1.0);
    }

    #[test]
    fn blocked_character_cannot_back_away_without_turning() {
        let mut motion = CharacterMotion::default();
        let mut local = LocalTransform::default();
        let backward = DirectionalInput { backward: true, ..Default::default() };

        for _ in 0..10 {
            integrate(&mut motion, &mut local, &backward, true, 0.016);
        }

        assert!(motion.velocity.z < 0.0);
        assert_eq!(local.position, Vec3::ZERO);
    }

    #[test]
    fn blocked_probe_stops_the_player_in_place() {
        let mut world = World::new();
        let player = spawn_character(&mut world, true);
        world.get::<&mut ProbeState>(player).unwrap().blocked = true;

        for _ in 0..10 {
            character_controller_system(&mut world, &forward(), 0.016);
        }

        assert!(world.get::<&CharacterMotion>(player).unwrap().velocity.z > 0.0);
        assert_eq!(world.get::<&LocalTransform>(player).unwrap().position, Vec3::ZERO);
    }

    #[test]
    fn mixer_advances_with_the_tick() {
        let mut world = World::new();
        let player = spawn_character(&mut world, true);
        character_controller_system(&mut world, &DirectionalInput::default(), 0.25);
        let anim = world.get::<&CharacterAnimation>(player).unwrap();
        let idle = anim.mixer.action("idle").unwrap();
        assert!((idle.time - 0.25).abs() < 1e-6);
    }
}
