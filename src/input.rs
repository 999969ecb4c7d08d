//! Input snapshots
//!
//! The host samples keyboard/gamepad once per frame and hands the level
//! something that answers "is this button down?".

use serde::{Deserialize, Serialize};

/// Logical buttons the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    Left,
    Right,
    Jump,
    Fire,
    /// Respawn / next level / retry
    Continue,
}

/// Discrete down-state queries
pub trait InputSource {
    fn is_down(&self, button: Button) -> bool;
}

/// Plain per-frame button state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub fire: bool,
    pub continue_pressed: bool,
}

impl InputSnapshot {
    pub fn with(mut self, button: Button) -> Self {
        match button {
            Button::Left => self.left = true,
            Button::Right => self.right = true,
            Button::Jump => self.jump = true,
            Button::Fire => self.fire = true,
            Button::Continue => self.continue_pressed = true,
        }
        self
    }
}

impl InputSource for InputSnapshot {
    fn is_down(&self, button: Button) -> bool {
        match button {
            Button::Left => self.left,
            Button::Right => self.right,
            Button::Jump => self.jump,
            Button::Fire => self.fire,
            Button::Continue => self.continue_pressed,
        }
    }
}

/// Horizontal axis from left/right buttons: -1, 0 or 1
pub fn horizontal_axis(input: &impl InputSource) -> f32 {
    match (input.is_down(Button::Left), input.is_down(Button::Right)) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    }
}
