//! Clip playback and weight fading for character animation.
//!
//! The mixer owns one [`AnimationAction`] per clip in the library. Actions are
//! looked up by clip name, mirroring how character states pick their clip.

use std::collections::HashMap;

use crate::config::ClipSpec;

/// A weight ramp in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    pub from: f32,
    pub to: f32,
    pub duration: f32,
    pub elapsed: f32,
}

impl Fade {
    fn weight(&self) -> f32 {
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }

    fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Playback state of one clip.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    pub clip: String,
    pub duration: f32,
    /// Local clip time in seconds, looping over `duration`.
    pub time: f32,
    pub weight: f32,
    pub playing: bool,
    fade: Option<Fade>,
}

impl AnimationAction {
    fn new(spec: &ClipSpec) -> Self {
        Self {
            clip: spec.name.clone(),
            duration: spec.duration,
            time: 0.0,
            weight: 0.0,
            playing: false,
            fade: None,
        }
    }

    /// Rewind to the start and cancel any fade.
    pub fn reset(&mut self) -> &mut Self {
        self.time = 0.0;
        self.weight = 1.0;
        self.fade = None;
        self
    }

    pub fn fade_in(&mut self, duration: f32) -> &mut Self {
        self.weight = 0.0;
        self.fade = Some(Fade { from: 0.0, to: 1.0, duration, elapsed: 0.0 });
        self
    }

    /// Ramp from the current weight to zero. The action stops once the
    /// ramp completes.
    pub fn fade_out(&mut self, duration: f32) -> &mut Self {
        self.fade = Some(Fade { from: self.weight, to: 0.0, duration, elapsed: 0.0 });
        self
    }

    pub fn play(&mut self) -> &mut Self {
        if !self.playing && self.fade.is_none() {
            self.weight = 1.0;
        }
        self.playing = true;
        self
    }

    pub fn stop(&mut self) {
        self.playing = false;
        self.weight = 0.0;
        self.fade = None;
    }

    pub fn fade(&self) -> Option<Fade> {
        self.fade
    }

    /// Weight that actually contributes to the blended pose.
    pub fn effective_weight(&self) -> f32 {
        if self.playing {
            self.weight
        } else {
            0.0
        }
    }

    /// Normalised position in the clip, 0..1.
    pub fn progress(&self) -> f32 {
        self.time / self.duration
    }

    fn update(&mut self, dt: f32) {
        if !self.playing {
            return;
        }
        self.time = (self.time + dt).rem_euclid(self.duration);
        if let Some(mut fade) = self.fade {
            fade.elapsed += dt;
            self.weight = fade.weight();
            if fade.finished() {
                self.fade = None;
                if fade.to == 0.0 {
                    self.stop();
                }
            } else {
                self.fade = Some(fade);
            }
        }
    }
}

/// Owns every action of one character.
#[derive(Debug, Clone, Default)]
pub struct AnimationMixer {
    actions: Vec<AnimationAction>,
    by_name: HashMap<String, usize>,
}

impl AnimationMixer {
    pub fn new(clips: &[ClipSpec]) -> Self {
        let mut mixer = Self::default();
        for spec in clips {
            if let Some(&index) = mixer.by_name.get(&spec.name) {
                mixer.actions[index] = AnimationAction::new(spec);
            } else {
                mixer.by_name.insert(spec.name.clone(), mixer.actions.len());
                mixer.actions.push(AnimationAction::new(spec));
            }
        }
        mixer
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn action(&self, clip: &str) -> Option<&AnimationAction> {
        self.by_name.get(clip).map(|&i| &self.actions[i])
    }

    pub fn action_mut(&mut self, clip: &str) -> Option<&mut AnimationAction> {
        self.by_name.get(clip).map(|&i| &mut self.actions[i])
    }

    pub fn weight(&self, clip: &str) -> f32 {
        self.action(clip).map_or(0.0, AnimationAction::effective_weight)
    }

    pub fn update(&mut self, dt: f32) {
        for action in &mut self.actions {
            action.update(dt);
        }
    }
}
