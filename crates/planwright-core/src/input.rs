//! Input feed consumed by the editor: held keys, pointer position and
//! discrete events.

use crate::camera::ScrollDirection;
use crate::tools::ToolKind;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Shift,
    Ctrl,
    Tab,
    Escape,
    Enter,
    Delete,
    Up,
    Down,
    Left,
    Right,
    A,
    D,
    E,
    G,
    M,
    R,
    S,
    T,
    W,
    Y,
    Z,
    Keypad0,
    Keypad1,
}

/// Keys currently held plus the pointer position in screen coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyState {
    pressed: HashSet<Key>,
    /// Current pointer position in screen coordinates.
    pub pointer: Point,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key state with the pointer at `pointer` and nothing held.
    pub fn at(pointer: Point) -> Self {
        Self {
            pointer,
            ..Self::default()
        }
    }

    /// Builder-style variant of [`press`](Self::press).
    pub fn with(mut self, key: Key) -> Self {
        self.press(key);
        self
    }

    pub fn press(&mut self, key: Key) {
        self.pressed.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.pressed.remove(&key);
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn shift(&self) -> bool {
        self.is_down(Key::Shift)
    }

    pub fn ctrl(&self) -> bool {
        self.is_down(Key::Ctrl)
    }

    /// Directions requested by the WASD and arrow keys.
    pub fn scroll_direction(&self) -> ScrollDirection {
        ScrollDirection {
            up: self.is_down(Key::W) || self.is_down(Key::Up),
            down: self.is_down(Key::S) || self.is_down(Key::Down),
            left: self.is_down(Key::A) || self.is_down(Key::Left),
            right: self.is_down(Key::D) || self.is_down(Key::Right),
        }
    }
}

/// One discrete input event delivered by the shell per tick.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { position: Point, button: MouseButton },
    PointerUp { position: Point, button: MouseButton },
    PointerMove { position: Point },
    /// Wheel notches; positive zooms in.
    Wheel { delta_y: f64 },
    /// Committed text, usually a single character.
    Text(String),
    KeyDown(Key),
    Resize(Size),
    /// A button on the tool palette was pressed.
    Tool(ToolKind),
    /// A plan file was dropped on the window.
    FileDropped(PathBuf),
    Quit,
    /// Nothing happened this tick.
    Tick,
}

impl InputEvent {
    /// Pointer position carried by the event, if any.
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::PointerDown { position, .. }
            | InputEvent::PointerUp { position, .. }
            | InputEvent::PointerMove { position } => Some(*position),
            _ => None,
        }
    }

    /// True for a left-button press, the committing input of every gesture.
    pub fn is_commit(&self) -> bool {
        matches!(
            self,
            InputEvent::PointerDown {
                button: MouseButton::Left,
                ..
            }
        )
    }
}
