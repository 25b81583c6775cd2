use std::fmt;

use glam::Vec2;

/// Keyboard key, by physical position.
///
/// Only keys the demos bind are named; everything else arrives as
/// `Key::Unknown` with the platform key code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Space,
    Tab,

    Shift,
    Control,
    Alt,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    W,
    A,
    S,
    D,
    Q,
    E,
    F,
    P,

    Digit1,
    Digit2,
    Digit3,
    Digit4,

    F1,

    Unknown(u32),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Press state shared by keys and mouse buttons.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonState {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Mouse wheel delta. `Line` is notched wheels, `Pixel` is touchpads.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseWheelDelta {
    Line(Vec2),
    Pixel(Vec2),
}

impl MouseWheelDelta {
    /// Pixel deltas per wheel line when normalizing touchpad scrolling.
    pub const PIXELS_PER_LINE: f32 = 20.0;

    pub fn as_lines(self) -> Vec2 {
        match self {
            MouseWheelDelta::Line(lines) => lines,
            MouseWheelDelta::Pixel(pixels) => pixels / Self::PIXELS_PER_LINE,
        }
    }
}

/// Platform-agnostic input events produced by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),

    Key {
        key: Key,
        state: ButtonState,
        repeat: bool,
    },

    /// Cursor position in logical pixels, origin top-left.
    PointerMoved(Vec2),
    PointerLeft,

    PointerButton {
        button: MouseButton,
        state: ButtonState,
    },

    MouseWheel(MouseWheelDelta),

    /// Raw device motion, unaffected by cursor capture or screen edges.
    MouseMotion(Vec2),

    Focused(bool),
}
