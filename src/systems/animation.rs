use std::f32::consts::TAU;

use glam::Quat;
use hecs::World;

use crate::animation::AnimationAction;
use crate::components::{CharacterAnimation, CharacterBody, LocalTransform};

// ---------------------------------------------------------------------------
// Limb poses
// ---------------------------------------------------------------------------

/// Radians the arms hang away from the torso at rest.
const SHOULDER_ANGLE: f32 = 0.14;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimbPose {
    pub head: Quat,
    pub left_arm: Quat,
    pub right_arm: Quat,
    pub left_leg: Quat,
    pub right_leg: Quat,
}

pub fn rest_pose() -> LimbPose {
    LimbPose {
        head: Quat::IDENTITY,
        left_arm: Quat::from_rotation_z(SHOULDER_ANGLE),
        right_arm: Quat::from_rotation_z(-SHOULDER_ANGLE),
        left_leg: Quat::IDENTITY,
        right_leg: Quat::IDENTITY,
    }
}

/// `phase` is the clip position in radians (one cycle per clip loop).
fn pose_idle(phase: f32) -> LimbPose {
    let rest = rest_pose();
    let sway = phase.sin() * 0.04;
    LimbPose {
        head: Quat::from_rotation_x(phase.sin() * 0.02),
        left_arm: rest.left_arm * Quat::from_rotation_x(-sway),
        right_arm: rest.right_arm * Quat::from_rotation_x(sway),
        ..rest
    }
}

fn pose_walk(phase: f32) -> LimbPose {
    let rest = rest_pose();
    const LEG_AMP: f32 = 0.45;
    const ARM_AMP: f32 = LEG_AMP * 0.45;
    let s = phase.sin();
    LimbPose {
        head: Quat::from_rotation_z(phase.cos() * 0.025),
        left_arm: rest.left_arm * Quat::from_rotation_x(-ARM_AMP * s),
        right_arm: rest.right_arm * Quat::from_rotation_x(ARM_AMP * s),
        left_leg: Quat::from_rotation_x(LEG_AMP * s),
        right_leg: Quat::from_rotation_x(-LEG_AMP * s),
    }
}

fn slerp_pose(a: &LimbPose, b: &LimbPose, t: f32) -> LimbPose {
    LimbPose {
        head: a.head.slerp(b.head, t),
        left_arm: a.left_arm.slerp(b.left_arm, t),
        right_arm: a.right_arm.slerp(b.right_arm, t),
        left_leg: a.left_leg.slerp(b.left_leg, t),
        right_leg: a.right_leg.slerp(b.right_leg, t),
    }
}

fn phase(action: Option<&AnimationAction>) -> f32 {
    action.map_or(0.0, |a| a.progress() * TAU)
}

/// Blend the idle and walk poses by their mixer weights. Whatever weight is
/// missing from a full 1.0 is filled with the rest pose, so an empty mixer
/// leaves the character standing at rest.
pub fn blended_pose(anim: &CharacterAnimation) -> LimbPose {
    let idle = anim.mixer.action(&anim.idle_clip);
    let walk = anim.mixer.action(&anim.walk_clip);
    let w_idle = idle.map_or(0.0, AnimationAction::effective_weight);
    let w_walk = walk.map_or(0.0, AnimationAction::effective_weight);
    let total = w_idle + w_walk;

    let rest = rest_pose();
    if total <= f32::EPSILON {
        return rest;
    }
    let moving = slerp_pose(&pose_idle(phase(idle)), &pose_walk(phase(walk)), w_walk / total);
    if total < 1.0 {
        slerp_pose(&rest, &moving, total)
    } else {
        moving
    }
}

fn apply_pose(world: &mut World, body: &CharacterBody, pose: &LimbPose) {
    let limbs = [
        (body.head, pose.head),
        (body.left_arm, pose.left_arm),
        (body.right_arm, pose.right_arm),
        (body.left_leg, pose.left_leg),
        (body.right_leg, pose.right_leg),
    ];
    for (entity, rotation) in limbs {
        if let Ok(mut lt) = world.get::<&mut LocalTransform>(entity) {
            lt.rotation = rotation;
        }
    }
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

/// Reads each character's mixer and writes limb rotations. Runs after the
/// controller (which advances the mixer) and before transform propagation.
pub fn pose_system(world: &mut World) {
    // Collect first: limbs are separate entities and need their own borrows.
    let poses: Vec<(CharacterBody, LimbPose)> = world
        .query::<(&CharacterAnimation, &CharacterBody)>()
        .iter()
        .map(|(_, (anim, body))| (*body, blended_pose(anim)))
        .collect();

    for (body, pose) in poses {
        apply_pose(world, &body, &pose);
    }
}
