use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::error::FsmError;

/// One behaviour mode of a [`StateMachine`].
///
/// States never switch the machine themselves: `update` returns the id of the
/// state it wants next and the machine performs the transition.
pub trait State: Sized {
    type Id: Copy + Eq + Hash + fmt::Display;
    /// Per-tick input snapshot.
    type Input;
    /// Shared data handed to `enter`/`exit` (e.g. the animation mixer).
    type Context;

    fn id(&self) -> Self::Id;

    /// `previous` is `None` only on the very first entry.
    fn enter(&mut self, previous: Option<&Self>, ctx: &mut Self::Context);

    fn exit(&mut self, _ctx: &mut Self::Context) {}

    fn update(&mut self, dt: f32, input: &Self::Input) -> Option<Self::Id>;
}

/// Registration-then-lookup finite-state machine.
///
/// States are registered once with [`add_state`](Self::add_state) and built on
/// demand by [`set_state`](Self::set_state). The machine also tracks how long
/// it has been in the current state and whether a transition happened this
/// tick.
///
/// # Usage
/// ```ignore
/// let mut fsm = StateMachine::new();
/// fsm.add_state(MyId::Idle, || MyState::Idle)?;
/// fsm.set_state(MyId::Idle, &mut ctx)?;
/// // Each frame:
/// fsm.tick(dt);
/// fsm.update(dt, &input, &mut ctx)?;
/// ```
pub struct StateMachine<S: State> {
    factories: HashMap<S::Id, fn() -> S>,
    current: Option<S>,
    /// Seconds spent in the current state. Reset to 0.0 on each transition.
    pub elapsed: f32,
    entered_this_frame: bool,
}

impl<S: State> StateMachine<S> {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            current: None,
            elapsed: 0.0,
            entered_this_frame: false,
        }
    }

    /// Register `ctor` under `id`. A second registration of the same id is
    /// rejected and the first one is kept.
    pub fn add_state(&mut self, id: S::Id, ctor: fn() -> S) -> Result<(), FsmError> {
        if self.factories.contains_key(&id) {
            return Err(FsmError::DuplicateState(id.to_string()));
        }
        self.factories.insert(id, ctor);
        Ok(())
    }

    /// Switch to `id`. Returns `Ok(false)` when `id` is already current, in
    /// which case neither `exit` nor `enter` runs.
    ///
    /// On failure the current state is left untouched.
    pub fn set_state(&mut self, id: S::Id, ctx: &mut S::Context) -> Result<bool, FsmError> {
        if self.current_id() == Some(id) {
            return Ok(false);
        }
        let ctor = *self
            .factories
            .get(&id)
            .ok_or_else(|| FsmError::UnknownState(id.to_string()))?;

        let mut previous = self.current.take();
        if let Some(prev) = previous.as_mut() {
            prev.exit(ctx);
        }

        let mut next = ctor();
        next.enter(previous.as_ref(), ctx);
        self.current = Some(next);
        self.elapsed = 0.0;
        self.entered_this_frame = true;
        Ok(true)
    }

    /// Run the current state's update and apply the transition it asks for.
    /// Does nothing before the first `set_state`.
    pub fn update(
        &mut self,
        dt: f32,
        input: &S::Input,
        ctx: &mut S::Context,
    ) -> Result<(), FsmError> {
        let Some(current) = self.current.as_mut() else {
            return Ok(());
        };
        if let Some(next) = current.update(dt, input) {
            self.set_state(next, ctx)?;
        }
        Ok(())
    }

    /// Advance the elapsed-in-state timer by `dt` seconds and clear the
    /// `just_entered` flag. Call once per frame **before** `update`.
    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
        self.entered_this_frame = false;
    }

    /// Returns `true` only on the tick a transition happened.
    pub fn just_entered(&self) -> bool {
        self.entered_this_frame
    }

    pub fn current(&self) -> Option<&S> {
        self.current.as_ref()
    }

    pub fn current_id(&self) -> Option<S::Id> {
        self.current.as_ref().map(S::id)
    }

    pub fn is_registered(&self, id: S::Id) -> bool {
        self.factories.contains_key(&id)
    }
}

impl<S: State> Default for StateMachine<S> {
    fn default() -> Self {
        Self::new()
    }
}
