use crate::components::{
    CharacterAnimation, CharacterFsm, CharacterState, IdleState, StateId, WalkState,
};
use crate::engine::input::DirectionalInput;
use crate::error::FsmError;
use crate::fsm::State;

// ---------------------------------------------------------------------------
// CharacterState behaviour
// ---------------------------------------------------------------------------

impl State for CharacterState {
    type Id = StateId;
    type Input = DirectionalInput;
    type Context = CharacterAnimation;

    fn id(&self) -> StateId {
        match self {
            CharacterState::Idle(_) => StateId::Idle,
            CharacterState::Walk(_) => StateId::Walk,
        }
    }

    /// The incoming state owns the crossfade: it fades the previous clip out
    /// and its own clip in. `exit` therefore does nothing.
    fn enter(&mut self, previous: Option<&Self>, anim: &mut CharacterAnimation) {
        let id = self.id();
        let clip = anim.clip_for(id).to_owned();
        if anim.mixer.action(&clip).is_none() {
            log::warn!("state {id}: no `{clip}` clip loaded, animation stays inert");
            return;
        }

        match previous {
            None => {
                if let Some(action) = anim.mixer.action_mut(&clip) {
                    action.play();
                }
            }
            Some(prev) => crossfade(anim, prev.clip(), &clip),
        }

        match self {
            CharacterState::Idle(IdleState { clip: slot }) | CharacterState::Walk(WalkState { clip: slot }) => {
                *slot = Some(clip)
            }
        }
    }

    fn update(&mut self, _dt: f32, input: &DirectionalInput) -> Option<StateId> {
        match self {
            CharacterState::Idle(_) if input.is_moving() => Some(StateId::Walk),
            CharacterState::Walk(_) if !input.is_moving() => Some(StateId::Idle),
            _ => None,
        }
    }
}

fn crossfade(anim: &mut CharacterAnimation, from: Option<&str>, to: &str) {
    if from == Some(to) {
        return;
    }
    let duration = anim.crossfade;
    if let Some(action) = from.and_then(|c| anim.mixer.action_mut(c)) {
        action.fade_out(duration);
    }
    if let Some(action) = anim.mixer.action_mut(to) {
        action.reset().fade_in(duration).play();
    }
}

/// Build the character FSM with both states registered. No state is entered
/// yet; the scene does that once the character's clips are in place.
pub fn character_fsm() -> Result<CharacterFsm, FsmError> {
    let mut fsm = CharacterFsm::new();
    fsm.add_state(StateId::Idle, || CharacterState::Idle(IdleState::default()))?;
    fsm.add_state(StateId::Walk, || CharacterState::Walk(WalkState::default()))?;
    Ok(fsm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationMixer;
    use crate::config::{ControllerConfig, GameConfig};

    fn animation() -> CharacterAnimation {
        let cfg = GameConfig::default();
        CharacterAnimation::new(AnimationMixer::new(&cfg.clips), &cfg.controller)
    }

    fn forward() -> DirectionalInput {
        DirectionalInput { forward: true, ..Default::default() }
    }

    #[test]
    fn first_entry_plays_without_fade() {
        let mut anim = animation();
        let mut fsm = character_fsm().unwrap();
        fsm.set_state(StateId::Idle, &mut anim).unwrap();

        let idle = anim.mixer.action("idle").unwrap();
        assert!(idle.playing);
        assert_eq!(idle.weight, 1.0);
        assert!(idle.fade().is_none());
        assert_eq!(fsm.current().and_then(CharacterState::clip), Some("idle"));
    }

    #[test]
    fn idle_to_walk_on_forward_or_backward() {
        for input in [forward(), DirectionalInput { backward: true, ..Default::default() }] {
            let mut anim = animation();
            let mut fsm = character_fsm().unwrap();
            fsm.set_state(StateId::Idle, &mut anim).unwrap();
            fsm.update(0.016, &input, &mut anim).unwrap();
            assert_eq!(fsm.current_id(), Some(StateId::Walk));
        }
    }

    #[test]
    fn walk_to_idle_when_released() {
        let mut anim = animation();
        let mut fsm = character_fsm().unwrap();
        fsm.set_state(StateId::Walk, &mut anim).unwrap();
        fsm.update(0.016, &DirectionalInput::default(), &mut anim).unwrap();
        assert_eq!(fsm.current_id(), Some(StateId::Idle));
    }

    #[test]
    fn turning_keeps_idle() {
        let mut anim = animation();
        let mut fsm = character_fsm().unwrap();
        fsm.set_state(StateId::Idle, &mut anim).unwrap();
        let turn = DirectionalInput { left: true, ..Default::default() };
        fsm.update(0.016, &turn, &mut anim).unwrap();
        assert_eq!(fsm.current_id(), Some(StateId::Idle));
    }

    #[test]
    fn crossfade_uses_configured_duration_and_rewinds() {
        let mut anim = animation();
        let mut fsm = character_fsm().unwrap();
        fsm.set_state(StateId::Idle, &mut anim).unwrap();
        // Let the walk clip drift away from zero so the rewind is visible.
        anim.mixer.action_mut("walk").unwrap().time = 0.7;

        fsm.update(0.016, &forward(), &mut anim).unwrap();

        let idle_fade = anim.mixer.action("idle").unwrap().fade().unwrap();
        assert_eq!(idle_fade.duration, 0.5);
        assert_eq!(idle_fade.to, 0.0);

        let walk = anim.mixer.action("walk").unwrap();
        let walk_fade = walk.fade().unwrap();
        assert_eq!(walk_fade.duration, 0.5);
        assert_eq!(walk_fade.to, 1.0);
        assert_eq!(walk.time, 0.0);
        assert!(walk.playing);
    }

    #[test]
    fn previous_clip_is_fully_out_after_the_crossfade() {
        let mut anim = animation();
        let mut fsm = character_fsm().unwrap();
        fsm.set_state(StateId::Idle, &mut anim).unwrap();
        fsm.update(0.016, &forward(), &mut anim).unwrap();

        anim.mixer.update(0.25);
        assert!(anim.mixer.weight("idle") > 0.0);
        anim.mixer.update(0.3);
        assert_eq!(anim.mixer.weight("idle"), 0.0);
        assert_eq!(anim.mixer.weight("walk"), 1.0);
    }

    #[test]
    fn missing_clips_leave_states_inert() {
        let mut anim = CharacterAnimation::new(AnimationMixer::new(&[]), &ControllerConfig::default());
        let mut fsm = character_fsm().unwrap();
        fsm.set_state(StateId::Idle, &mut anim).unwrap();
        fsm.update(0.016, &forward(), &mut anim).unwrap();
        assert_eq!(fsm.current_id(), Some(StateId::Walk));
        assert_eq!(fsm.current().and_then(CharacterState::clip), None);
    }

    #[test]
    fn registering_twice_is_rejected() {
        let mut fsm = character_fsm().unwrap();
        let err = fsm
            .add_state(StateId::Walk, || CharacterState::Walk(WalkState::default()))
            .unwrap_err();
        assert_eq!(err, FsmError::DuplicateState("walk".into()));
    }
}
