//! Keyboard input state.
//!
//! [`Input`] tracks which keys are currently held and which transitioned
//! from up to down since the last fixed update tick. The window event
//! handler records transitions; the game loop clears the edge-triggered
//! set once per tick, so `just_pressed` ("clicked") is true for exactly
//! one update call.

use std::collections::HashSet;
use std::hash::Hash;

pub use winit::keyboard::KeyCode;

/// Tracks the state of a set of inputs.
///
/// - `pressed`: currently held down
/// - `just_pressed`: transitioned up→down since the last tick
pub struct Input<T: Eq + Hash + Copy> {
    pressed: HashSet<T>,
    just_pressed: HashSet<T>,
}

impl<T: Eq + Hash + Copy> Input<T> {
    pub fn new() -> Self {
        Self {
            pressed: HashSet::new(),
            just_pressed: HashSet::new(),
        }
    }

    /// Returns `true` while the input is held down.
    pub fn pressed(&self, input: T) -> bool {
        self.pressed.contains(&input)
    }

    /// Returns `true` on the single tick the input went down.
    pub fn just_pressed(&self, input: T) -> bool {
        self.just_pressed.contains(&input)
    }

    /// Record a press (from the event handler). Key repeat does not
    /// re-trigger the edge.
    pub(crate) fn press(&mut self, input: T) {
        if self.pressed.insert(input) {
            self.just_pressed.insert(input);
        }
    }

    /// Record a release (from the event handler).
    pub(crate) fn release(&mut self, input: T) {
        self.pressed.remove(&input);
    }

    /// Clear edge-triggered state. Called once per fixed update tick.
    pub(crate) fn end_tick(&mut self) {
        self.just_pressed.clear();
    }
}

impl<T: Eq + Hash + Copy> Default for Input<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_trigger_lasts_one_tick() {
        let mut input: Input<u8> = Input::new();
        input.press(7);
        assert!(input.pressed(7));
        assert!(input.just_pressed(7));

        input.end_tick();
        assert!(input.pressed(7));
        assert!(!input.just_pressed(7));
    }

    #[test]
    fn repeat_does_not_retrigger() {
        let mut input: Input<u8> = Input::new();
        input.press(1);
        input.end_tick();
        input.press(1); // OS key repeat while held
        assert!(!input.just_pressed(1));

        input.release(1);
        input.press(1);
        assert!(input.just_pressed(1));
    }

    #[test]
    fn release_clears_held_state() {
        let mut input: Input<u8> = Input::new();
        input.press(3);
        input.release(3);
        assert!(!input.pressed(3));
    }
}
