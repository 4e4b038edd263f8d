//! Input state management for pointer and keyboard events.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::timer::{Duration, Instant};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    /// Ctrl or Shift, the modifiers that extend a selection.
    pub fn extends_selection(&self) -> bool {
        self.ctrl || self.shift
    }
}

/// Pointer event in widget pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    Scroll {
        position: Point,
        delta: Vec2,
    },
}

/// Keys the container handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Escape,
    /// Rename.
    F2,
    Space,
    Return,
}

/// Longest gap between the presses of a double click.
pub const DOUBLE_CLICK_TIME: Duration = Duration::from_millis(400);
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Tracks the pointer, pressed buttons, modifiers and click counts.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current pointer position in widget coordinates.
    pub pointer_position: Point,
    pressed_buttons: HashSet<MouseButton>,
    pub modifiers: Modifiers,
    last_click: Option<(Instant, Point, MouseButton)>,
    click_count: u32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a pointer event. Returns the click count for presses:
    /// 1 for a single click, 2 for a double click.
    pub fn handle_pointer_event(&mut self, event: PointerEvent, now: Instant) -> u32 {
        match event {
            PointerEvent::Down { position, button } => {
                self.pointer_position = position;
                self.pressed_buttons.insert(button);
                self.click_count = match self.last_click {
                    Some((time, last_position, last_button))
                        if last_button == button
                            && self.click_count == 1
                            && now.duration_since(time) < DOUBLE_CLICK_TIME
                            && (position - last_position).hypot() < DOUBLE_CLICK_DISTANCE =>
                    {
                        2
                    }
                    _ => 1,
                };
                self.last_click = Some((now, position, button));
                self.click_count
            }
            PointerEvent::Up { position, button } => {
                self.pointer_position = position;
                self.pressed_buttons.remove(&button);
                0
            }
            PointerEvent::Move { position } | PointerEvent::Scroll { position, .. } => {
                self.pointer_position = position;
                0
            }
        }
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    /// Whether the last press was a double click.
    pub fn is_double_click(&self) -> bool {
        self.click_count == 2
    }

    /// Forget the pressed buttons, e.g. when a grab is broken.
    pub fn release_all(&mut self) {
        self.pressed_buttons.clear();
    }
}
