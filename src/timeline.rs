//! Frame-driven cutscene steps.
//!
//! A [`Timeline`] is a component: it advances with the frame `dt` and is
//! dropped together with its entity, so nothing scheduled by a scene can fire
//! after that scene's world is gone.

use std::collections::VecDeque;

use glam::{Quat, Vec3};

use crate::components::LocalTransform;
use crate::scene::SceneId;

/// Events a timeline hands back to the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Flight sound. Logged; there is no audio output.
    Swoosh,
    /// Remove the timeline's entity from the world.
    Despawn,
    /// The next click anywhere leads to this scene.
    ArmClick(SceneId),
    GoTo(SceneId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn of(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    AtMost(f32),
    AtLeast(f32),
}

impl Bound {
    pub fn reached(self, value: f32) -> bool {
        match self {
            Bound::AtMost(b) => value <= b,
            Bound::AtLeast(b) => value >= b,
        }
    }

    /// Seconds until `value`, moving at `rate` per second, reaches the bound.
    /// `None` when it is moving away or standing still.
    fn time_to_reach(self, value: f32, rate: f32) -> Option<f32> {
        if self.reached(value) {
            return Some(0.0);
        }
        let (gap, toward) = match self {
            Bound::AtMost(b) => (value - b, -rate),
            Bound::AtLeast(b) => (b - value, rate),
        };
        (toward > 0.0).then(|| gap / toward)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Until {
    Crosses { axis: Axis, bound: Bound },
    Elapsed(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Translate at `velocity` units/s and rotate at `spin` rad/s (scaled
    /// axis, local frame) until the condition holds.
    MoveUntil { velocity: Vec3, spin: Vec3, until: Until },
    Wait(f32),
    Place { position: Vec3, rotation: Quat },
    Cue(Cue),
}

impl Step {
    pub fn move_until(velocity: Vec3, until: Until) -> Self {
        Step::MoveUntil { velocity, spin: Vec3::ZERO, until }
    }

    pub fn spin_for(spin: Vec3, seconds: f32) -> Self {
        Step::MoveUntil { velocity: Vec3::ZERO, spin, until: Until::Elapsed(seconds) }
    }
}

/// Ordered steps, consumed from the front.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    steps: VecDeque<Step>,
    /// Seconds spent in the front step.
    step_elapsed: f32,
}

impl Timeline {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            step_elapsed: 0.0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn remaining_steps(&self) -> usize {
        self.steps.len()
    }

    /// Advance by `dt`, applying steps to `local` and returning the cues fired
    /// along the way in order. Time left over when a step finishes carries
    /// into the next one.
    pub fn advance(&mut self, local: &mut LocalTransform, dt: f32) -> Vec<Cue> {
        let mut cues = Vec::new();
        let mut remaining = dt.max(0.0);

        while let Some(&step) = self.steps.front() {
            let done = match step {
                Step::Cue(cue) => {
                    cues.push(cue);
                    true
                }
                Step::Place { position, rotation } => {
                    local.position = position;
                    local.rotation = rotation;
                    true
                }
                Step::Wait(seconds) => {
                    let needed = (seconds - self.step_elapsed).max(0.0);
                    let used = needed.min(remaining);
                    self.step_elapsed += used;
                    remaining -= used;
                    needed <= used
                }
                Step::MoveUntil { velocity, spin, until } => {
                    let needed = match until {
                        Until::Elapsed(seconds) => Some((seconds - self.step_elapsed).max(0.0)),
                        Until::Crosses { axis, bound } => {
                            bound.time_to_reach(axis.of(local.position), axis.of(velocity))
                        }
                    };
                    let used = needed.map_or(remaining, |t| t.min(remaining));
                    local.position += velocity * used;
                    if spin != Vec3::ZERO {
                        local.rotation = (local.rotation * Quat::from_scaled_axis(spin * used)).normalize();
                    }
                    self.step_elapsed += used;
                    remaining -= used;
                    needed.is_some_and(|t| t <= used)
                }
            };

            if !done {
                break;
            }
            self.steps.pop_front();
            self.step_elapsed = 0.0;
        }
        cues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn steps_complete_in_order_and_carry_leftover_time() {
        let mut local = LocalTransform::default();
        let mut timeline = Timeline::new([
            Step::move_until(Vec3::X * 10.0, Until::Crosses { axis: Axis::X, bound: Bound::AtLeast(5.0) }),
            Step::move_until(Vec3::Y * 2.0, Until::Elapsed(1.0)),
        ]);

        // 0.5 s reaches x = 5; the other 0.25 s goes to the second leg.
        let cues = timeline.advance(&mut local, 0.75);
        assert!(cues.is_empty());
        assert!(close(local.position, Vec3::new(5.0, 0.5, 0.0)));
        assert_eq!(timeline.remaining_steps(), 1);

        timeline.advance(&mut local, 2.0);
        assert!(close(local.position, Vec3::new(5.0, 2.0, 0.0)));
        assert!(timeline.is_finished());
    }

    #[test]
    fn cues_fire_once_at_their_position() {
        let mut local = LocalTransform::default();
        let mut timeline = Timeline::new([
            Step::Cue(Cue::Swoosh),
            Step::Wait(1.0),
            Step::Cue(Cue::GoTo(SceneId::Village)),
        ]);

        assert_eq!(timeline.advance(&mut local, 0.4), vec![Cue::Swoosh]);
        assert!(timeline.advance(&mut local, 0.4).is_empty());
        assert_eq!(timeline.advance(&mut local, 0.4), vec![Cue::GoTo(SceneId::Village)]);
        assert!(timeline.advance(&mut local, 10.0).is_empty());
    }

    #[test]
    fn place_snaps_the_transform() {
        let mut local = LocalTransform::new(Vec3::splat(3.0));
        let rotation = Quat::from_rotation_y(1.0);
        let mut timeline = Timeline::new([Step::Place { position: Vec3::ONE, rotation }]);
        timeline.advance(&mut local, 0.0);
        assert_eq!(local.position, Vec3::ONE);
        assert_eq!(local.rotation, rotation);
        assert!(timeline.is_finished());
    }

    #[test]
    fn start_past_the_bound_finishes_immediately() {
        let mut local = LocalTransform::new(Vec3::new(-50.0, 0.0, 0.0));
        let mut timeline = Timeline::new([
            Step::move_until(Vec3::X * -5.0, Until::Crosses { axis: Axis::X, bound: Bound::AtMost(-37.0) }),
            Step::Cue(Cue::Despawn),
        ]);
        assert_eq!(timeline.advance(&mut local, 0.016), vec![Cue::Despawn]);
        assert_eq!(local.position.x, -50.0);
    }

    #[test]
    fn moving_away_from_the_bound_never_finishes() {
        let mut local = LocalTransform::default();
        let mut timeline = Timeline::new([Step::move_until(
            Vec3::NEG_Y,
            Until::Crosses { axis: Axis::Y, bound: Bound::AtLeast(1.0) },
        )]);
        for _ in 0..10 {
            timeline.advance(&mut local, 0.1);
        }
        assert!(!timeline.is_finished());
        assert!((local.position.y + 1.0).abs() < 1e-4);
    }

    #[test]
    fn spin_rotates_in_the_local_frame() {
        let mut local = LocalTransform::default();
        let mut timeline = Timeline::new([Step::spin_for(Vec3::X * std::f32::consts::PI, 0.5)]);
        timeline.advance(&mut local, 1.0);
        // Half a second at π rad/s about X: +Z turns to -Y.
        assert!(close(local.forward(), Vec3::NEG_Y));
        assert!(timeline.is_finished());
    }
}
