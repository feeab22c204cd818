//! The cabin inside its glass ball, with the plane rocking overhead.
//! Double click to dive in: the camera sinks toward the globe as it rolls
//! forward, then the village loads.

use std::f32::consts::FRAC_PI_2;

use glam::{EulerRot, Quat, Vec3};
use hecs::World;

use super::prefabs::{add_rocking, spawn_globe, spawn_paper_plane};
use super::{page_atmosphere, page_camera, CameraRig, SceneContext, SceneId};
use crate::components::LocalTransform;
use crate::config::GameConfig;
use crate::engine::input::{InputEvent, InputState};
use crate::error::SceneError;
use crate::renderer::MeshStore;
use crate::timeline::{Axis, Bound, Cue, Step, Timeline, Until};

const CAMERA_START: Vec3 = Vec3::new(0.0, 10.0, 10.0);
const DIVE_VELOCITY: Vec3 = Vec3::new(0.0, -20.625, -7.5);
const DIVE_FLOOR: f32 = -7.0;
/// Globe roll about X during the dive, radians per second.
const ROLL_RATE: f32 = 2.25;
const ROCK_AMPLITUDE: f32 = 0.4;
const ROCK_RATE: f32 = 2.7;

fn dive() -> Timeline {
    Timeline::new([Step::move_until(
        DIVE_VELOCITY,
        Until::Crosses { axis: Axis::Y, bound: Bound::AtMost(DIVE_FLOOR) },
    )])
}

/// Roll lasts as long as the camera takes to sink 17 units.
fn roll() -> Timeline {
    Timeline::new([Step::spin_for(Vec3::X * ROLL_RATE, 17.0 / -DIVE_VELOCITY.y)])
}

pub(super) fn build(config: &GameConfig) -> Result<SceneContext, SceneError> {
    let mut world = World::new();
    let mut meshes = MeshStore::new();

    let globe = spawn_globe(
        &mut world,
        &mut meshes,
        LocalTransform::new(Vec3::new(0.0, -2.0, 0.0)).with_scale(Vec3::splat(7.0)),
    )?;

    let plane = spawn_paper_plane(
        &mut world,
        &mut meshes,
        LocalTransform::new(Vec3::new(0.0, 4.0, 0.0)).with_rotation(Quat::from_euler(EulerRot::XYZ, 0.0, -FRAC_PI_2, 0.3)),
    );
    add_rocking(&mut world, plane, ROCK_AMPLITUDE, ROCK_RATE)?;

    let anchor = world.spawn((LocalTransform::new(CAMERA_START),));
    let rig = CameraRig::Anchored { anchor, look_at: Vec3::ZERO };

    let mut scene = SceneContext::new(SceneId::Globe, world, meshes, page_camera(CAMERA_START), rig, config);
    scene.focus = Some(globe);
    scene.atmosphere = page_atmosphere();
    Ok(scene)
}

pub(super) fn on_input(scene: &mut SceneContext, input: &InputState) {
    if scene.triggered || !input.has_event(InputEvent::DoubleClick) {
        return;
    }
    let (Some(globe), CameraRig::Anchored { anchor, .. }) = (scene.focus, &scene.rig) else {
        return;
    };
    let anchor = *anchor;

    scene.triggered = true;
    log::info!("diving into the globe");
    if let Err(err) = scene.play(anchor, dive()).and_then(|()| scene.play(globe, roll())) {
        log::error!("globe: {err}");
    }
    scene.spawn_director([Step::Wait(1.0), Step::Cue(Cue::GoTo(SceneId::Village))]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dive_stops_at_the_floor() {
        let mut anchor = LocalTransform::new(CAMERA_START);
        let mut timeline = dive();
        timeline.advance(&mut anchor, 2.0);
        assert!(timeline.is_finished());
        assert!((anchor.position.y - DIVE_FLOOR).abs() < 1e-4);
        assert!((anchor.position.z - (10.0 - 7.5 * 17.0 / 20.625)).abs() < 1e-4);
    }

    #[test]
    fn roll_matches_the_dive_length() {
        let mut globe = LocalTransform::default();
        let mut timeline = roll();
        timeline.advance(&mut globe, 2.0);
        assert!(timeline.is_finished());
        let expected = ROLL_RATE * 17.0 / 20.625;
        assert!((globe.rotation.angle_between(Quat::IDENTITY) - expected).abs() < 1e-4);
    }
}
