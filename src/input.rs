//! Input mapping for the viewer.
//!
//! Raw window events are folded into a small set of [`Action`]s: pointer
//! clicks and moves for the engine, and key-bound toggles for the host.
//! Key presses fire once per physical press; auto-repeat is ignored.
//!
//! | Key | Action |
//! |-----|--------|
//! | Space | toggle mouse ripples |
//! | S | toggle stats overlay |
//! | P | toggle pause |
//! | R | randomize settings |
//! | W | start a storm |
//! | M | cycle performance mode |
//! | F12 | save a PNG |
//! | Escape | exit |

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, MouseButton as WinitMouseButton, TouchPhase, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl From<WinitMouseButton> for MouseButton {
    fn from(btn: WinitMouseButton) -> Self {
        match btn {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Left,
        }
    }
}

/// Keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Space,
    S,
    P,
    R,
    W,
    M,
    F12,
    Escape,
    Other(u32),
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::Space => KeyCode::Space,
            WinitKeyCode::KeyS => KeyCode::S,
            WinitKeyCode::KeyP => KeyCode::P,
            WinitKeyCode::KeyR => KeyCode::R,
            WinitKeyCode::KeyW => KeyCode::W,
            WinitKeyCode::KeyM => KeyCode::M,
            WinitKeyCode::F12 => KeyCode::F12,
            WinitKeyCode::Escape => KeyCode::Escape,
            _ => KeyCode::Other(key as u32),
        }
    }
}

/// Something the host should do in response to input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Click(Vec2),
    PointerMove(Vec2),
    ToggleRipples,
    ToggleStats,
    TogglePause,
    Randomize,
    StartStorm,
    CyclePerformance,
    Screenshot,
    Exit,
}

impl Action {
    /// The action bound to a key, if any.
    pub fn for_key(key: KeyCode) -> Option<Action> {
        match key {
            KeyCode::Space => Some(Action::ToggleRipples),
            KeyCode::S => Some(Action::ToggleStats),
            KeyCode::P => Some(Action::TogglePause),
            KeyCode::R => Some(Action::Randomize),
            KeyCode::W => Some(Action::StartStorm),
            KeyCode::M => Some(Action::CyclePerformance),
            KeyCode::F12 => Some(Action::Screenshot),
            KeyCode::Escape => Some(Action::Exit),
            KeyCode::Other(_) => None,
        }
    }
}

/// Pointer and key state.
#[derive(Debug, Default)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    cursor: Vec2,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known pointer position in pixels.
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Translate a window event.
    pub fn handle_event(&mut self, event: &WindowEvent) -> Option<Action> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return None;
                };
                let key = KeyCode::from(code);
                match event.state {
                    ElementState::Pressed => self.key_down(key),
                    ElementState::Released => {
                        self.key_up(key);
                        None
                    }
                }
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button,
                ..
            } => self.mouse_down(MouseButton::from(*button)),

            WindowEvent::CursorMoved { position, .. } => {
                Some(self.pointer_moved(Vec2::new(position.x as f32, position.y as f32)))
            }

            WindowEvent::Touch(touch) => {
                let position = Vec2::new(touch.location.x as f32, touch.location.y as f32);
                match touch.phase {
                    TouchPhase::Moved => Some(self.pointer_moved(position)),
                    TouchPhase::Started => {
                        self.cursor = position;
                        None
                    }
                    TouchPhase::Ended | TouchPhase::Cancelled => None,
                }
            }

            _ => None,
        }
    }

    /// A key went down. Repeats while held yield nothing.
    pub fn key_down(&mut self, key: KeyCode) -> Option<Action> {
        if !self.keys_held.insert(key) {
            return None;
        }
        Action::for_key(key)
    }

    pub fn key_up(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
    }

    /// Only the left button clicks.
    pub fn mouse_down(&mut self, button: MouseButton) -> Option<Action> {
        (button == MouseButton::Left).then_some(Action::Click(self.cursor))
    }

    pub fn pointer_moved(&mut self, position: Vec2) -> Action {
        self.cursor = position;
        Action::PointerMove(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert_eq!(Action::for_key(KeyCode::Space), Some(Action::ToggleRipples));
        assert_eq!(Action::for_key(KeyCode::W), Some(Action::StartStorm));
        assert_eq!(Action::for_key(KeyCode::M), Some(Action::CyclePerformance));
        assert_eq!(Action::for_key(KeyCode::F12), Some(Action::Screenshot));
        assert_eq!(Action::for_key(KeyCode::Other(7)), None);
    }

    #[test]
    fn test_key_repeat_ignored() {
        let mut input = Input::new();
        assert_eq!(input.key_down(KeyCode::P), Some(Action::TogglePause));
        assert_eq!(input.key_down(KeyCode::P), None);
        input.key_up(KeyCode::P);
        assert_eq!(input.key_down(KeyCode::P), Some(Action::TogglePause));
    }

    #[test]
    fn test_click_uses_last_cursor() {
        let mut input = Input::new();
        input.pointer_moved(Vec2::new(120.0, 45.0));
        assert_eq!(input.mouse_down(MouseButton::Left), Some(Action::Click(Vec2::new(120.0, 45.0))));
        assert_eq!(input.mouse_down(MouseButton::Right), None);
    }

    #[test]
    fn test_winit_key_mapping() {
        assert_eq!(KeyCode::from(WinitKeyCode::KeyS), KeyCode::S);
        assert_eq!(KeyCode::from(WinitKeyCode::KeyM), KeyCode::M);
        assert_eq!(KeyCode::from(WinitKeyCode::Escape), KeyCode::Escape);
        assert!(matches!(KeyCode::from(WinitKeyCode::KeyQ), KeyCode::Other(_)));
    }
}
