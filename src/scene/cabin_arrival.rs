//! A plane glides down past the cabin globe and vanishes. Drag to look
//! around; a click moves on to the globe after a beat.

use std::f32::consts::PI;

use glam::{EulerRot, Quat, Vec3};
use hecs::World;

use super::prefabs::{spawn_globe, spawn_paper_plane};
use super::{page_atmosphere, page_camera, CameraRig, SceneContext, SceneId};
use crate::camera::OrbitCamera;
use crate::components::LocalTransform;
use crate::config::GameConfig;
use crate::engine::input::{InputEvent, InputState};
use crate::error::SceneError;
use crate::renderer::MeshStore;
use crate::timeline::{Axis, Bound, Cue, Step, Timeline, Until};

const CAMERA_START: Vec3 = Vec3::new(0.0, 12.0, 13.0);
const PLANE_START: Vec3 = Vec3::new(30.0, 10.0, 15.0);
const GLOBE_SCALE: f32 = 7.0;
/// Pause between the click and the next scene.
const EXIT_DELAY: f32 = 1.0;

fn glide() -> Timeline {
    Timeline::new([
        Step::move_until(
            Vec3::new(-0.5, -1.0, -1.0) / 0.028,
            Until::Crosses { axis: Axis::X, bound: Bound::AtMost(0.0) },
        ),
        Step::Cue(Cue::Despawn),
    ])
}

pub(super) fn build(config: &GameConfig) -> Result<SceneContext, SceneError> {
    let mut world = World::new();
    let mut meshes = MeshStore::new();

    let globe = spawn_globe(
        &mut world,
        &mut meshes,
        LocalTransform::new(Vec3::new(0.0, -5.0, 0.0))
            .with_rotation(Quat::from_rotation_x(-0.5))
            .with_scale(Vec3::splat(GLOBE_SCALE)),
    )?;

    let plane = spawn_paper_plane(
        &mut world,
        &mut meshes,
        LocalTransform::new(PLANE_START).with_rotation(Quat::from_euler(EulerRot::XYZ, -36.0, -PI / 2.6, PI / 3.5)),
    );
    world.insert_one(plane, glide())?;

    let camera = page_camera(CAMERA_START);
    let mut orbit = OrbitCamera::new(&config.camera);
    orbit.target = Vec3::ZERO;
    orbit.zoom_enabled = false;
    orbit.sync_from(&camera);

    let mut scene = SceneContext::new(SceneId::CabinArrival, world, meshes, camera, CameraRig::Orbit(orbit), config);
    scene.focus = Some(globe);
    scene.atmosphere = page_atmosphere();
    Ok(scene)
}

pub(super) fn on_input(scene: &mut SceneContext, input: &InputState) {
    if scene.triggered || !input.has_event(InputEvent::Click) {
        return;
    }
    scene.triggered = true;
    scene.spawn_director([Step::Wait(EXIT_DELAY), Step::Cue(Cue::GoTo(SceneId::Globe))]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glide_despawns_at_the_globe() {
        let mut plane = LocalTransform::new(PLANE_START);
        let mut timeline = glide();
        let mut cues = Vec::new();
        for _ in 0..120 {
            cues.extend(timeline.advance(&mut plane, 1.0 / 60.0));
        }
        assert_eq!(cues, vec![Cue::Despawn]);
        assert!(plane.position.x.abs() < 1e-3);
        assert!((plane.position.y - (PLANE_START.y - 60.0)).abs() < 1e-2);
    }
}
