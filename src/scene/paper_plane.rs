//! Landing scene: drag anywhere to throw the paper plane. It darts off to
//! the left, loops back in from behind the camera and leaves to the right;
//! a click afterwards continues to the cabin.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{EulerRot, Quat, Vec3};
use hecs::World;

use super::prefabs::spawn_paper_plane;
use super::{page_atmosphere, page_camera, CameraRig, SceneContext, SceneId};
use crate::components::LocalTransform;
use crate::config::GameConfig;
use crate::engine::input::InputState;
use crate::error::SceneError;
use crate::renderer::MeshStore;
use crate::timeline::{Axis, Bound, Cue, Step, Timeline, Until};

/// Flight speed along x, units per second.
const SPEED: f32 = 1.5 / 0.023;
const FIRST_LEG_END_X: f32 = -37.0;
const SECOND_LEG_END_X: f32 = 120.0;
/// Where the plane re-enters, relative to its launch point.
const RE_ENTRY_OFFSET: Vec3 = Vec3::new(0.0, -3.0, 15.0);
const RE_ENTRY_X: f32 = -27.0;
const CAMERA_START: Vec3 = Vec3::new(0.0, 10.0, 10.0);
const CAMERA_FLIGHT: Vec3 = Vec3::new(0.0, 12.0, 13.0);

fn launch_rotation() -> Quat {
    Quat::from_euler(EulerRot::XYZ, 1.1, -FRAC_PI_2, PI / 2.5)
}

fn return_rotation() -> Quat {
    Quat::from_euler(EulerRot::XYZ, 1.1, PI / 1.7, -PI / 2.5)
}

/// Seconds the first leg takes from a launch at `start_x`.
fn first_leg_duration(start_x: f32) -> f32 {
    ((start_x - FIRST_LEG_END_X) / SPEED).max(0.0)
}

/// Both legs of the throw, starting from `start`.
pub(super) fn flight(start: Vec3) -> Timeline {
    let first_leg = first_leg_duration(start.x);
    let mut re_entry = start + RE_ENTRY_OFFSET;
    re_entry.x = RE_ENTRY_X;

    Timeline::new([
        Step::Cue(Cue::Swoosh),
        Step::move_until(
            Vec3::new(-SPEED, 0.0, 0.0),
            Until::Crosses { axis: Axis::X, bound: Bound::AtMost(FIRST_LEG_END_X) },
        ),
        Step::Wait(first_leg + 1.0),
        Step::Place { position: re_entry, rotation: return_rotation() },
        Step::Cue(Cue::Swoosh),
        Step::move_until(
            Vec3::new(1.5, 0.1, -1.0) / 0.023,
            Until::Crosses { axis: Axis::X, bound: Bound::AtLeast(SECOND_LEG_END_X) },
        ),
        Step::Cue(Cue::ArmClick(SceneId::CabinArrival)),
    ])
}

/// Pull the camera back while the plane is out of frame.
pub(super) fn camera_pullback(start_x: f32) -> Timeline {
    Timeline::new([
        Step::Wait(2.0 * first_leg_duration(start_x) + 1.0),
        Step::Place { position: CAMERA_FLIGHT, rotation: Quat::IDENTITY },
    ])
}

pub(super) fn build(config: &GameConfig) -> Result<SceneContext, SceneError> {
    let mut world = World::new();
    let mut meshes = MeshStore::new();

    let plane = spawn_paper_plane(
        &mut world,
        &mut meshes,
        LocalTransform::default().with_rotation(launch_rotation()),
    );
    let anchor = world.spawn((LocalTransform::new(CAMERA_START),));

    let rig = CameraRig::Anchored { anchor, look_at: Vec3::ZERO };
    let mut scene = SceneContext::new(SceneId::PaperPlane, world, meshes, page_camera(CAMERA_START), rig, config);
    scene.focus = Some(plane);
    scene.atmosphere = page_atmosphere();
    Ok(scene)
}

pub(super) fn on_input(scene: &mut SceneContext, input: &InputState) {
    if scene.triggered || !input.dragged() {
        return;
    }
    let (Some(plane), CameraRig::Anchored { anchor, .. }) = (scene.focus, &scene.rig) else {
        return;
    };
    let anchor = *anchor;
    let start = match scene.world.get::<&LocalTransform>(plane) {
        Ok(local) => local.position,
        Err(_) => return,
    };

    scene.triggered = true;
    log::info!("paper plane launched");
    if let Err(err) = scene
        .play(plane, flight(start))
        .and_then(|()| scene.play(anchor, camera_pullback(start.x)))
    {
        log::error!("paper plane: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_leg_from_the_origin() {
        let d = first_leg_duration(0.0);
        assert!((d - 37.0 / SPEED).abs() < 1e-6);
        assert!((d - 0.567).abs() < 1e-3);
    }

    #[test]
    fn flight_ends_past_the_right_edge_and_arms_the_click() {
        let mut plane = LocalTransform::default();
        let mut timeline = flight(Vec3::ZERO);
        let mut cues = Vec::new();
        for _ in 0..400 {
            cues.extend(timeline.advance(&mut plane, 1.0 / 60.0));
        }
        assert!(timeline.is_finished());
        assert_eq!(
            cues,
            vec![Cue::Swoosh, Cue::Swoosh, Cue::ArmClick(SceneId::CabinArrival)]
        );
        assert!((plane.position.x - SECOND_LEG_END_X).abs() < 1e-3);
        assert!(plane.position.z < RE_ENTRY_OFFSET.z);
    }

    #[test]
    fn camera_pulls_back_after_the_plane_returns() {
        let mut anchor = LocalTransform::new(CAMERA_START);
        let mut timeline = camera_pullback(0.0);
        timeline.advance(&mut anchor, 2.0 * first_leg_duration(0.0) + 0.9);
        assert_eq!(anchor.position, CAMERA_START);
        timeline.advance(&mut anchor, 0.2);
        assert_eq!(anchor.position, CAMERA_FLIGHT);
        assert!(timeline.is_finished());
    }
}
