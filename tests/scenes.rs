//! Scene flow and character scenarios, run headless against the library.

use cabin::components::{CharacterFsm, LocalTransform, Player, StateId};
use cabin::config::GameConfig;
use cabin::engine::input::{InputEvent, InputState};
use cabin::scene::{CameraRig, SceneContext, SceneId};
use cabin::timeline::Timeline;
use glam::Vec3;
use sdl2::keyboard::Scancode;

const DT: f32 = 1.0 / 60.0;

fn scene(id: SceneId) -> SceneContext {
    SceneContext::build(id, &GameConfig::default()).unwrap()
}

fn with_event(event: InputEvent) -> InputState {
    let mut input = InputState::new();
    input.events.push(event);
    input
}

/// Step with no input; returns the first scene switch requested.
fn run_frames(scene: &mut SceneContext, frames: usize) -> Option<SceneId> {
    let idle = InputState::new();
    let mut next = None;
    for _ in 0..frames {
        next = next.or(scene.update(&idle, DT));
    }
    next
}

fn run_for(scene: &mut SceneContext, seconds: f32) -> Option<SceneId> {
    run_frames(scene, (seconds / DT).ceil() as usize)
}

fn player_position(scene: &SceneContext) -> Vec3 {
    scene.world.get::<&LocalTransform>(scene.player.unwrap()).unwrap().position
}

fn place_player(scene: &mut SceneContext, position: Vec3) {
    scene.world.get::<&mut LocalTransform>(scene.player.unwrap()).unwrap().position = position;
}

#[test]
fn every_scene_builds_without_a_gl_context() {
    for id in [SceneId::PaperPlane, SceneId::CabinArrival, SceneId::Globe, SceneId::Village] {
        let scene = scene(id);
        assert_eq!(scene.id, id);
        assert!(!scene.meshes.is_empty());
    }
}

#[test]
fn village_forward_walks_and_camera_follows() {
    let mut village = scene(SceneId::Village);
    let mut input = InputState::new();
    input.press(Scancode::W);

    for _ in 0..30 {
        assert_eq!(village.update(&input, DT), None);
    }

    let player = village.player.unwrap();
    assert!(village.world.get::<&Player>(player).is_ok());
    let state = village.world.get::<&CharacterFsm>(player).unwrap().current_id();
    assert_eq!(state, Some(StateId::Walk));

    let position = player_position(&village);
    assert!(position.z > 0.0);
    assert!((position.y - 1.0).abs() < 1e-4);
    assert!((village.camera.position - (position + Vec3::new(0.0, 10.0, -25.0))).length() < 1e-3);
}

#[test]
fn village_releasing_keys_returns_to_idle() {
    let mut village = scene(SceneId::Village);
    let mut input = InputState::new();
    input.press(Scancode::W);
    village.update(&input, DT);
    input.release(Scancode::W);
    village.update(&input, DT);

    let state = village.world.get::<&CharacterFsm>(village.player.unwrap()).unwrap().current_id();
    assert_eq!(state, Some(StateId::Idle));
}

#[test]
fn off_the_map_the_player_drifts_up() {
    let mut village = scene(SceneId::Village);
    place_player(&mut village, Vec3::new(500.0, 1.0, 0.0));

    run_frames(&mut village, 3);

    assert!((player_position(&village).y - 1.3).abs() < 1e-4);
}

#[test]
fn the_garden_wall_stops_forward_motion() {
    let mut village = scene(SceneId::Village);
    let start = Vec3::new(0.0, 1.0, 69.2);
    place_player(&mut village, start);
    let mut input = InputState::new();
    input.press(Scancode::W);

    for _ in 0..10 {
        village.update(&input, DT);
    }

    assert!((player_position(&village) - start).length() < 1e-4);
}

#[test]
fn r_toggles_the_village_camera() {
    let mut village = scene(SceneId::Village);
    village.update(&with_event(InputEvent::KeyPressed(Scancode::R)), DT);
    let CameraRig::Follow { third_person, .. } = &village.rig else {
        panic!("village uses the follow rig");
    };
    assert!(!third_person.is_enabled());

    village.update(&with_event(InputEvent::KeyPressed(Scancode::R)), DT);
    let CameraRig::Follow { third_person, .. } = &village.rig else {
        panic!("village uses the follow rig");
    };
    assert!(third_person.is_enabled());
}

#[test]
fn orbit_takes_over_around_the_player_without_a_jump() {
    let mut village = scene(SceneId::Village);
    let at = Vec3::new(120.0, 1.0, 120.0);
    place_player(&mut village, at);
    run_frames(&mut village, 1);
    let before = village.camera.position;
    assert!((before - Vec3::new(120.0, 11.0, 95.0)).length() < 1e-3);

    village.update(&with_event(InputEvent::KeyPressed(Scancode::R)), DT);

    let CameraRig::Follow { orbit, .. } = &village.rig else {
        panic!("village uses the follow rig");
    };
    assert!((orbit.target - player_position(&village)).length() < 1e-3);
    assert!((village.camera.position - before).length() < 1.0);
}

#[test]
fn paper_plane_flight_then_click_opens_the_cabin() {
    let mut page = scene(SceneId::PaperPlane);

    // Clicking before the flight does nothing.
    assert_eq!(page.update(&with_event(InputEvent::Click), DT), None);

    page.update(&with_event(InputEvent::Drag { dx: 5.0, dy: 0.0 }), DT);
    assert!(page.triggered);
    assert_eq!(run_for(&mut page, 5.0), None);
    assert_eq!(page.click_target, Some(SceneId::CabinArrival));
    assert!((page.camera.position - Vec3::new(0.0, 12.0, 13.0)).length() < 1e-4);

    assert_eq!(page.update(&with_event(InputEvent::Click), DT), Some(SceneId::CabinArrival));
}

#[test]
fn cabin_click_waits_a_beat_before_the_globe() {
    let mut cabin = scene(SceneId::CabinArrival);
    let before = cabin.world.len();
    assert_eq!(run_for(&mut cabin, 2.0), None);
    assert_eq!(cabin.world.len(), before - 1, "plane despawned at the globe");

    assert_eq!(cabin.update(&with_event(InputEvent::Click), DT), None);
    assert_eq!(cabin.update(&with_event(InputEvent::Click), DT), None);
    assert_eq!(run_for(&mut cabin, 0.5), None);
    assert_eq!(run_for(&mut cabin, 0.6), Some(SceneId::Globe));
    // The second click did not queue another switch.
    assert_eq!(run_for(&mut cabin, 2.0), None);
}

#[test]
fn globe_double_click_dives_into_the_village() {
    let mut globe = scene(SceneId::Globe);
    assert_eq!(globe.update(&with_event(InputEvent::Click), DT), None);
    assert!(!globe.triggered);

    globe.update(&with_event(InputEvent::DoubleClick), DT);
    assert!(globe.triggered);
    let next = run_for(&mut globe, 1.1);
    assert_eq!(next, Some(SceneId::Village));
    assert!((globe.camera.position.y + 7.0).abs() < 1e-3);
}

#[test]
fn switching_scenes_drops_pending_timelines() {
    let mut page = scene(SceneId::PaperPlane);
    page.update(&with_event(InputEvent::Drag { dx: 1.0, dy: 1.0 }), DT);
    assert!(page.world.query_mut::<&Timeline>().into_iter().count() > 0);

    page = scene(SceneId::CabinArrival);
    assert_eq!(run_for(&mut page, 5.0), None);
    assert_eq!(page.click_target, None);
}
