use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Scancode;
use sdl2::mouse::MouseButton;
use sdl2::EventPump;
use std::collections::HashSet;

/// One-shot events collected during a frame's poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyPressed(Scancode),
    /// Left button released over the window.
    Click,
    DoubleClick,
    /// Mouse moved while the left button was held.
    Drag { dx: f32, dy: f32 },
    Resized { width: u32, height: u32 },
}

/// Snapshot of the movement keys the character controller reads.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DirectionalInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    /// Shift. Scales acceleration; never drives a state change.
    pub run: bool,
}

impl DirectionalInput {
    pub fn from_keys(keys: &HashSet<Scancode>) -> Self {
        let held = |a: Scancode, b: Scancode| keys.contains(&a) || keys.contains(&b);
        Self {
            forward: held(Scancode::W, Scancode::Up),
            backward: held(Scancode::S, Scancode::Down),
            left: held(Scancode::A, Scancode::Left),
            right: held(Scancode::D, Scancode::Right),
            run: held(Scancode::LShift, Scancode::RShift),
        }
    }

    /// Forward or backward held: the keys that move the character.
    pub fn is_moving(&self) -> bool {
        self.forward || self.backward
    }
}

pub struct InputState {
    pub keys: HashSet<Scancode>,
    pub events: Vec<InputEvent>,
    pub scroll_dy: f32,
    quit: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys: HashSet::new(),
            events: Vec::new(),
            scroll_dy: 0.0,
            quit: false,
        }
    }

    pub fn update(&mut self, event_pump: &mut EventPump) {
        self.events.clear();
        self.scroll_dy = 0.0;

        for event in event_pump.poll_iter() {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Quit { .. } => self.quit = true,
            Event::KeyDown {
                scancode: Some(Scancode::Escape),
                ..
            } => self.quit = true,
            Event::KeyDown {
                scancode: Some(sc),
                repeat,
                ..
            } => {
                if !repeat {
                    self.events.push(InputEvent::KeyPressed(sc));
                }
                self.press(sc);
            }
            Event::KeyUp {
                scancode: Some(sc), ..
            } => self.release(sc),
            Event::MouseMotion {
                mousestate,
                xrel,
                yrel,
                ..
            } => {
                if mousestate.left() {
                    self.events.push(InputEvent::Drag {
                        dx: xrel as f32,
                        dy: yrel as f32,
                    });
                }
            }
            Event::MouseButtonUp {
                mouse_btn: MouseButton::Left,
                clicks,
                ..
            } => {
                self.events.push(InputEvent::Click);
                if clicks >= 2 {
                    self.events.push(InputEvent::DoubleClick);
                }
            }
            Event::MouseWheel { y, .. } => self.scroll_dy += y as f32,
            Event::Window {
                win_event: WindowEvent::SizeChanged(w, h),
                ..
            } => self.events.push(InputEvent::Resized {
                width: w.max(1) as u32,
                height: h.max(1) as u32,
            }),
            _ => {}
        }
    }

    pub fn press(&mut self, sc: Scancode) {
        self.keys.insert(sc);
    }

    pub fn release(&mut self, sc: Scancode) {
        self.keys.remove(&sc);
    }

    pub fn directional(&self) -> DirectionalInput {
        DirectionalInput::from_keys(&self.keys)
    }

    pub fn pressed(&self, sc: Scancode) -> bool {
        self.events.contains(&InputEvent::KeyPressed(sc))
    }

    pub fn has_event(&self, event: InputEvent) -> bool {
        self.events.contains(&event)
    }

    pub fn dragged(&self) -> bool {
        self.events.iter().any(|e| matches!(e, InputEvent::Drag { .. }))
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_and_arrows_map_to_directions() {
        let mut input = InputState::new();
        input.press(Scancode::W);
        input.press(Scancode::Left);
        let dir = input.directional();
        assert!(dir.forward && dir.left);
        assert!(!dir.backward && !dir.right && !dir.run);
        assert!(dir.is_moving());
    }

    #[test]
    fn release_clears_the_flag() {
        let mut input = InputState::new();
        input.press(Scancode::S);
        input.release(Scancode::S);
        assert_eq!(input.directional(), DirectionalInput::default());
    }

    #[test]
    fn turning_alone_is_not_moving() {
        let dir = DirectionalInput { left: true, right: true, ..Default::default() };
        assert!(!dir.is_moving());
    }
}
