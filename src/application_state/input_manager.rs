//! # Input Manager
//!
//! This module handles input processing for the application, including:
//! - Keyboard input state tracking
//! - Mouse button and cursor tracking
//! - Frame-to-frame transition detection (pressed, held, released)
//!
//! Presses that start and end between two frames are latched, so a quick tap of
//! Q or a fast click still shows up as `Pressed` in the next snapshot.

use std::collections::{HashMap, HashSet};

use winit::{
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::input_state::{MouseInput, ProcessedInputState, RawInputState};

const KEY_CODES: [KeyCode; 18] = [
    KeyCode::KeyW,
    KeyCode::KeyS,
    KeyCode::KeyA,
    KeyCode::KeyD,
    KeyCode::ShiftLeft,
    KeyCode::ControlLeft,
    KeyCode::KeyQ,
    KeyCode::KeyE,
    KeyCode::KeyX,
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

const MOUSE_BUTTONS: [MouseButton; 2] = [MouseButton::Left, MouseButton::Right];

/// Manages the state of all input devices and processes input events.
///
/// This struct maintains the current state of keyboard and mouse inputs
/// and provides methods to process input events from the windowing system.
pub struct InputManager {
    /// Previous state of all tracked keyboard keys
    pub keyboard_inputs_old: HashMap<KeyCode, bool>,
    /// Current state of all tracked keyboard keys
    pub keyboard_inputs_new: HashMap<KeyCode, bool>,
    /// Keys pressed since the last snapshot, even if already released
    pub keyboard_presses: HashSet<KeyCode>,

    /// Current state of mouse inputs
    pub mouse_inputs: MouseInput,
    /// Buttons pressed since the last snapshot, even if already released
    pub mouse_button_presses: HashSet<MouseButton>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    /// Creates a new InputManager with every tracked key and button released.
    pub fn new() -> Self {
        let keyboard_inputs_old: HashMap<_, _> = KEY_CODES.iter().map(|key| (*key, false)).collect();
        let keyboard_inputs_new = keyboard_inputs_old.clone();

        let mouse_button_inputs_old: HashMap<_, _> =
            MOUSE_BUTTONS.iter().map(|button| (*button, false)).collect();
        let mouse_button_inputs_new = mouse_button_inputs_old.clone();

        let mouse_inputs = MouseInput {
            mouse_button_inputs_old,
            mouse_button_inputs_new,
            cursor_position: None,
        };

        Self {
            keyboard_inputs_old,
            keyboard_inputs_new,
            keyboard_presses: HashSet::new(),
            mouse_inputs,
            mouse_button_presses: HashSet::new(),
        }
    }

    /// Updates the old state with the current state to prepare for the next frame.
    pub fn move_old_states(&mut self) {
        for (key, new_state) in self.keyboard_inputs_new.iter() {
            if let Some(old_state) = self.keyboard_inputs_old.get_mut(key) {
                *old_state = *new_state;
            }
        }

        for (button, new_state) in self.mouse_inputs.mouse_button_inputs_new.iter() {
            if let Some(old_state) = self.mouse_inputs.mouse_button_inputs_old.get_mut(button) {
                *old_state = *new_state;
            }
        }

        self.keyboard_presses.clear();
        self.mouse_button_presses.clear();
    }

    /// Processes a window event and updates internal input state.
    ///
    /// # Arguments
    /// * `event` - The window event to process
    pub fn intake_input(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key: PhysicalKey::Code(key),
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.set_key_state(*key, *state == ElementState::Pressed);
            }
            WindowEvent::MouseInput { button, state, .. } => {
                self.set_mouse_button_state(*button, *state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.set_cursor_position(Some((position.x, position.y)));
            }
            WindowEvent::CursorLeft { .. } => {
                self.set_cursor_position(None);
            }
            _ => {}
        }
    }

    /// Records a key going up or down. Untracked keys are ignored.
    pub fn set_key_state(&mut self, key: KeyCode, pressed: bool) {
        if let Some(key_state) = self.keyboard_inputs_new.get_mut(&key) {
            *key_state = pressed;
            if pressed {
                self.keyboard_presses.insert(key);
            }
        }
    }

    /// Records a mouse button going up or down. Untracked buttons are ignored.
    pub fn set_mouse_button_state(&mut self, button: MouseButton, pressed: bool) {
        if let Some(button_state) = self.mouse_inputs.mouse_button_inputs_new.get_mut(&button) {
            *button_state = pressed;
            if pressed {
                self.mouse_button_presses.insert(button);
            }
        }
    }

    /// Records the cursor position in physical pixels.
    pub fn set_cursor_position(&mut self, position: Option<(f64, f64)>) {
        self.mouse_inputs.cursor_position = position;
    }

    /// Creates a processed input state from the current raw boolean states.
    ///
    /// This translates the raw boolean states into RawInputState enum values
    /// that represent the state transitions (pressed, held, released, not pressed).
    pub fn create_processed_input_state(&self) -> ProcessedInputState {
        let keyboard_states = self
            .keyboard_inputs_new
            .iter()
            .map(|(key, &new_state)| {
                let old_state = self.keyboard_inputs_old.get(key).copied().unwrap_or(false);
                let latched = self.keyboard_presses.contains(key);
                (*key, transition(old_state, new_state, latched))
            })
            .collect();

        let mouse_button_states = self
            .mouse_inputs
            .mouse_button_inputs_new
            .iter()
            .map(|(button, &new_state)| {
                let old_state = self
                    .mouse_inputs
                    .mouse_button_inputs_old
                    .get(button)
                    .copied()
                    .unwrap_or(false);
                let latched = self.mouse_button_presses.contains(button);
                (*button, transition(old_state, new_state, latched))
            })
            .collect();

        ProcessedInputState {
            keyboard_states,
            mouse_button_states,
            cursor_position: self.mouse_inputs.cursor_position,
        }
    }

    /// Returns the processed input state and prepares for the next frame.
    pub fn get_and_reset_processed_input(&mut self) -> ProcessedInputState {
        let processed_input = self.create_processed_input_state();
        self.move_old_states();
        processed_input
    }

    /// Releases every key and button.
    ///
    /// This is called when the window loses focus, since release events for
    /// keys held at that moment are never delivered.
    pub fn reset_inputs(&mut self) {
        self.keyboard_inputs_new.values_mut().for_each(|state| *state = false);
        self.mouse_inputs
            .mouse_button_inputs_new
            .values_mut()
            .for_each(|state| *state = false);
        self.keyboard_presses.clear();
        self.mouse_button_presses.clear();
    }
}

/// A press that was released again before the snapshot still counts as a press.
fn transition(old_state: bool, new_state: bool, latched: bool) -> RawInputState {
    if latched && !old_state {
        RawInputState::Pressed
    } else {
        RawInputState::from_raw_states(old_state, new_state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_key_goes_pressed_then_held_then_released() {
        let mut input = InputManager::new();
        input.set_key_state(KeyCode::KeyW, true);
        assert_eq!(
            input.get_and_reset_processed_input().get_key_state(KeyCode::KeyW),
            RawInputState::Pressed
        );
        assert_eq!(
            input.get_and_reset_processed_input().get_key_state(KeyCode::KeyW),
            RawInputState::Held
        );
        input.set_key_state(KeyCode::KeyW, false);
        assert_eq!(
            input.get_and_reset_processed_input().get_key_state(KeyCode::KeyW),
            RawInputState::Released
        );
        assert_eq!(
            input.get_and_reset_processed_input().get_key_state(KeyCode::KeyW),
            RawInputState::NotPressed
        );
    }

    #[test]
    fn tap_between_frames_is_not_lost() {
        let mut input = InputManager::new();
        input.set_mouse_button_state(MouseButton::Left, true);
        input.set_mouse_button_state(MouseButton::Left, false);
        let state = input.get_and_reset_processed_input();
        assert!(state
            .get_mouse_button_state(MouseButton::Left)
            .is_just_pressed());
        let state = input.get_and_reset_processed_input();
        assert_eq!(
            state.get_mouse_button_state(MouseButton::Left),
            RawInputState::NotPressed
        );
    }

    #[test]
    fn untracked_keys_are_ignored() {
        let mut input = InputManager::new();
        input.set_key_state(KeyCode::KeyZ, true);
        assert!(!input.keyboard_inputs_new.contains_key(&KeyCode::KeyZ));
        assert!(input.keyboard_presses.is_empty());
    }

    #[test]
    fn reset_releases_everything() {
        let mut input = InputManager::new();
        input.set_key_state(KeyCode::ShiftLeft, true);
        input.set_mouse_button_state(MouseButton::Right, true);
        input.get_and_reset_processed_input();

        input.reset_inputs();
        let state = input.get_and_reset_processed_input();
        assert_eq!(state.get_key_state(KeyCode::ShiftLeft), RawInputState::Released);
        assert_eq!(
            state.get_mouse_button_state(MouseButton::Right),
            RawInputState::Released
        );
    }

    #[test]
    fn cursor_position_is_carried_into_snapshot() {
        let mut input = InputManager::new();
        input.set_cursor_position(Some((12.5, 40.0)));
        assert_eq!(
            input.get_and_reset_processed_input().get_cursor_position(),
            Some((12.5, 40.0))
        );
        input.set_cursor_position(None);
        assert_eq!(input.get_and_reset_processed_input().get_cursor_position(), None);
    }
}
