//! Scene context, camera rigs and scene switching.
//!
//! Each scene owns a fresh `hecs::World`. Switching scenes drops the old
//! [`SceneContext`], which drops every pending [`Timeline`] with it.

mod cabin_arrival;
mod globe;
mod paper_plane;
pub mod prefabs;
mod village;

use std::fmt;

use clap::ValueEnum;
use glam::Vec3;
use hecs::{Entity, World};

use crate::camera::{Camera, OrbitCamera, ThirdPersonCamera};
use crate::components::{despawn_recursive, LocalTransform};
use crate::config::{GameConfig, ProbeConfig};
use crate::engine::input::{InputEvent, InputState};
use crate::error::SceneError;
use crate::renderer::{Atmosphere, MeshStore};
use crate::systems::{
    character_controller_system, pose_system, probe_system, rock_system, timeline_system,
    transform_propagation_system,
};
use crate::timeline::{Cue, Step, Timeline};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum SceneId {
    /// Drag to launch a paper plane across the screen.
    PaperPlane,
    /// A plane glides in toward the cabin globe.
    CabinArrival,
    /// Double click to dive into the glass ball.
    Globe,
    /// Walk the character around the village.
    Village,
}

impl SceneId {
    pub fn name(self) -> &'static str {
        match self {
            SceneId::PaperPlane => "paper-plane",
            SceneId::CabinArrival => "cabin-arrival",
            SceneId::Globe => "globe",
            SceneId::Village => "village",
        }
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the scene camera is driven each frame.
pub enum CameraRig {
    /// Third-person follow of the player; the orbit camera takes over while
    /// the follow camera is disabled.
    Follow {
        third_person: ThirdPersonCamera,
        orbit: OrbitCamera,
    },
    Orbit(OrbitCamera),
    /// Camera sits on `anchor` (usually moved by a timeline) and looks at a
    /// fixed point.
    Anchored { anchor: Entity, look_at: Vec3 },
}

/// Everything one scene owns.
pub struct SceneContext {
    pub id: SceneId,
    pub world: World,
    pub meshes: MeshStore,
    pub camera: Camera,
    pub rig: CameraRig,
    pub atmosphere: Atmosphere,
    pub player: Option<Entity>,
    /// The scene's centrepiece (the paper plane, the globe).
    pub focus: Option<Entity>,
    /// Set by [`Cue::ArmClick`]: the next click opens this scene.
    pub click_target: Option<SceneId>,
    /// The scene's one-shot trigger (launch, descent, ...) already fired.
    pub triggered: bool,
    probe: ProbeConfig,
}

impl SceneContext {
    pub fn build(id: SceneId, config: &GameConfig) -> Result<Self, SceneError> {
        let scene = match id {
            SceneId::PaperPlane => paper_plane::build(config)?,
            SceneId::CabinArrival => cabin_arrival::build(config)?,
            SceneId::Globe => globe::build(config)?,
            SceneId::Village => village::build(config)?,
        };
        log::info!(
            "scene {id}: {} entities, {} meshes",
            scene.world.len(),
            scene.meshes.len()
        );
        Ok(scene)
    }

    fn new(
        id: SceneId,
        world: World,
        meshes: MeshStore,
        camera: Camera,
        rig: CameraRig,
        config: &GameConfig,
    ) -> Self {
        Self {
            id,
            world,
            meshes,
            camera,
            rig,
            atmosphere: Atmosphere::default(),
            player: None,
            focus: None,
            click_target: None,
            triggered: false,
            probe: config.probe.clone(),
        }
    }

    /// One simulation frame. Returns the scene to switch to, if any.
    pub fn update(&mut self, input: &InputState, dt: f32) -> Option<SceneId> {
        let mut next = self.handle_input(input);

        probe_system(&mut self.world, &self.probe);
        character_controller_system(&mut self.world, &input.directional(), dt);
        pose_system(&mut self.world);
        rock_system(&mut self.world, dt);

        for (entity, cue) in timeline_system(&mut self.world, dt) {
            if let Some(scene) = self.apply_cue(entity, cue) {
                next.get_or_insert(scene);
            }
        }

        self.update_camera(input);
        transform_propagation_system(&mut self.world);
        next
    }

    fn handle_input(&mut self, input: &InputState) -> Option<SceneId> {
        if input.has_event(InputEvent::Click) {
            if let Some(target) = self.click_target.take() {
                log::info!("scene {}: click, continuing to {target}", self.id);
                return Some(target);
            }
        }
        match self.id {
            SceneId::PaperPlane => paper_plane::on_input(self, input),
            SceneId::CabinArrival => cabin_arrival::on_input(self, input),
            SceneId::Globe => globe::on_input(self, input),
            SceneId::Village => village::on_input(self, input),
        }
        None
    }

    fn apply_cue(&mut self, entity: Entity, cue: Cue) -> Option<SceneId> {
        match cue {
            Cue::Swoosh => log::info!("cue: swoosh"),
            Cue::Despawn => {
                despawn_recursive(&mut self.world, entity);
                if self.focus == Some(entity) {
                    self.focus = None;
                }
            }
            Cue::ArmClick(target) => {
                log::info!("scene {}: click to continue to {target}", self.id);
                self.click_target = Some(target);
            }
            Cue::GoTo(target) => return Some(target),
        }
        None
    }

    /// Spawn a transform-less timeline that only sequences cues.
    fn spawn_director(&mut self, steps: impl IntoIterator<Item = Step>) -> Entity {
        self.world.spawn((LocalTransform::default(), Timeline::new(steps)))
    }

    /// Attach `timeline` to `entity`, replacing any running one.
    fn play(&mut self, entity: Entity, timeline: Timeline) -> Result<(), SceneError> {
        self.world.insert_one(entity, timeline)?;
        Ok(())
    }

    /// Switch between the follow camera and the orbit camera. The orbit takes
    /// over centred on the player, from where the camera already is.
    pub fn toggle_camera(&mut self) {
        if let CameraRig::Follow { third_person, orbit } = &mut self.rig {
            if third_person.is_enabled() {
                third_person.disable();
                let player = self
                    .player
                    .and_then(|p| self.world.get::<&LocalTransform>(p).ok().map(|t| t.position));
                if let Some(position) = player {
                    orbit.target = position;
                }
                orbit.sync_from(&self.camera);
                log::info!("camera: orbit");
            } else {
                third_person.enable();
                log::info!("camera: third person");
            }
        }
    }

    fn update_camera(&mut self, input: &InputState) {
        match &mut self.rig {
            CameraRig::Follow { third_person, orbit } => {
                if third_person.is_enabled() {
                    let target = self
                        .player
                        .and_then(|p| self.world.get::<&LocalTransform>(p).ok().map(|t| *t));
                    if let Some(target) = target {
                        third_person.update(&mut self.camera, &target);
                    }
                } else {
                    drive_orbit(orbit, input);
                    orbit.update(&mut self.camera);
                }
            }
            CameraRig::Orbit(orbit) => {
                drive_orbit(orbit, input);
                orbit.update(&mut self.camera);
            }
            CameraRig::Anchored { anchor, look_at } => {
                if let Ok(t) = self.world.get::<&LocalTransform>(*anchor) {
                    self.camera.position = t.position;
                }
                self.camera.target = *look_at;
            }
        }
    }
}

fn drive_orbit(orbit: &mut OrbitCamera, input: &InputState) {
    for event in &input.events {
        if let InputEvent::Drag { dx, dy } = *event {
            orbit.rotate(dx, dy);
        }
    }
    if input.scroll_dy != 0.0 {
        orbit.zoom(input.scroll_dy);
    }
}

/// Perspective of the cutscene scenes: wide lens, close near plane.
fn page_camera(position: Vec3) -> Camera {
    Camera {
        position,
        target: Vec3::ZERO,
        fov: 75.0,
        near: 0.1,
        far: 1000.0,
    }
}

/// Pale lavender backdrop shared by the cutscene scenes.
fn page_atmosphere() -> Atmosphere {
    Atmosphere {
        sky: Vec3::new(0.93, 0.89, 1.0),
        fog_start: 200.0,
        fog_end: 1000.0,
    }
}

