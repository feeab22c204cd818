use std::fmt;

use glam::Vec3;
use hecs::Entity;

use crate::animation::AnimationMixer;
use crate::config::ControllerConfig;
use crate::fsm::StateMachine;

// ---------------------------------------------------------------------------
// Character state machine
// ---------------------------------------------------------------------------

/// Closed set of animation states a character can be in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateId {
    Idle,
    Walk,
}

impl StateId {
    pub fn name(self) -> &'static str {
        match self {
            StateId::Idle => "idle",
            StateId::Walk => "walk",
        }
    }

    /// States in which the controller integrates movement.
    pub fn is_locomotion(self) -> bool {
        matches!(self, StateId::Idle | StateId::Walk)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Standing still. `clip` is filled in on enter when the library has one.
#[derive(Debug, Default)]
pub struct IdleState {
    pub clip: Option<String>,
}

/// Moving forward or backward.
#[derive(Debug, Default)]
pub struct WalkState {
    pub clip: Option<String>,
}

/// Transition and crossfade logic lives in `src/systems/states.rs`.
#[derive(Debug)]
pub enum CharacterState {
    Idle(IdleState),
    Walk(WalkState),
}

impl CharacterState {
    /// Clip this state is playing, if any.
    pub fn clip(&self) -> Option<&str> {
        match self {
            CharacterState::Idle(s) => s.clip.as_deref(),
            CharacterState::Walk(s) => s.clip.as_deref(),
        }
    }
}

/// FSM component attached to character entities.
pub type CharacterFsm = StateMachine<CharacterState>;

/// Shared animation data handed to states on enter/exit.
pub struct CharacterAnimation {
    pub mixer: AnimationMixer,
    /// Seconds for the fade-out of the old clip and the fade-in of the new one.
    pub crossfade: f32,
    pub idle_clip: String,
    pub walk_clip: String,
}

impl CharacterAnimation {
    pub fn new(mixer: AnimationMixer, config: &ControllerConfig) -> Self {
        Self {
            mixer,
            crossfade: config.crossfade,
            idle_clip: config.idle_clip.clone(),
            walk_clip: config.walk_clip.clone(),
        }
    }

    pub fn clip_for(&self, id: StateId) -> &str {
        match id {
            StateId::Idle => &self.idle_clip,
            StateId::Walk => &self.walk_clip,
        }
    }
}

// ---------------------------------------------------------------------------
// Movement
// ---------------------------------------------------------------------------

/// Character-local velocity (x: sideways, z: forward) and its tuning.
#[derive(Debug, Clone, Copy)]
pub struct CharacterMotion {
    pub velocity: Vec3,
    pub acceleration: Vec3,
    pub deceleration: Vec3,
    pub sprint_multiplier: f32,
}

impl CharacterMotion {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            velocity: Vec3::ZERO,
            acceleration: config.acceleration,
            deceleration: config.deceleration,
            sprint_multiplier: config.sprint_multiplier,
        }
    }
}

impl Default for CharacterMotion {
    fn default() -> Self {
        Self::new(&ControllerConfig::default())
    }
}

/// Results of the scene's raycast probes, written before the controller runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProbeState {
    /// Something sits closer than the obstacle threshold straight ahead.
    pub blocked: bool,
    /// The down ray hit walkable geometry on the last probe.
    pub grounded: bool,
}

// ---------------------------------------------------------------------------
// Body
// ---------------------------------------------------------------------------

/// Limb entities of the character body, posed by the animation system.
#[derive(Debug, Clone, Copy)]
pub struct CharacterBody {
    pub head: Entity,
    pub left_arm: Entity,
    pub right_arm: Entity,
    pub left_leg: Entity,
    pub right_leg: Entity,
}
