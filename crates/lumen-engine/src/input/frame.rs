use std::collections::HashSet;

use glam::Vec2;

use super::types::{InputEvent, Key, MouseButton};

/// Input transitions collected since the previous frame.
///
/// `InputState` holds what is currently down; `InputFrame` holds what changed.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,

    pub keys_pressed: HashSet<Key>,
    pub keys_released: HashSet<Key>,
    pub buttons_pressed: HashSet<MouseButton>,
    pub buttons_released: HashSet<MouseButton>,

    /// Every cursor position reported this frame, in order.
    pub pointer_positions: Vec<Vec2>,

    /// Summed raw mouse motion in device units.
    pub mouse_motion: Vec2,

    /// Summed wheel movement in lines. Positive `y` scrolls up.
    pub wheel_lines: Vec2,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.pointer_positions.clear();
        self.mouse_motion = Vec2::ZERO;
        self.wheel_lines = Vec2::ZERO;
    }

    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn key_released(&self, key: Key) -> bool {
        self.keys_released.contains(&key)
    }
}
