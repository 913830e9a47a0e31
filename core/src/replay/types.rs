//! Core types for the replay system
//!
//! Buttons, edges, controller state and recording sessions shared by the
//! schedule, injector, recorder and text codec.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Digital pad button
///
/// Discriminants are bit positions in the 16-bit digital pad word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    Select = 0,
    L3 = 1,
    R3 = 2,
    Start = 3,
    Up = 4,
    Right = 5,
    Down = 6,
    Left = 7,
    L2 = 8,
    R2 = 9,
    L1 = 10,
    R1 = 11,
    Triangle = 12,
    Circle = 13,
    Cross = 14,
    Square = 15,
}

/// Alternate spellings accepted by the text format. Canonical names are added
/// to the lookup table separately.
const ALIASES: &[(&str, Button)] = &[
    ("x", Button::Cross),
    ("o", Button::Circle),
    ("sq", Button::Square),
    ("tri", Button::Triangle),
    ("sel", Button::Select),
    ("l", Button::L1),
    ("r", Button::R1),
    ("dpad_up", Button::Up),
    ("dpad_down", Button::Down),
    ("dpad_left", Button::Left),
    ("dpad_right", Button::Right),
];

static LOOKUP: LazyLock<HashMap<&'static str, Button>> = LazyLock::new(|| {
    let mut table = HashMap::with_capacity(Button::ALL.len() + ALIASES.len());
    for button in Button::ALL {
        table.insert(button.name(), button);
    }
    for &(alias, button) in ALIASES {
        table.insert(alias, button);
    }
    table
});

impl Button {
    /// Every button, in canonical enumeration order.
    pub const ALL: [Button; 16] = [
        Button::Cross,
        Button::Circle,
        Button::Square,
        Button::Triangle,
        Button::Start,
        Button::Select,
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::L1,
        Button::L2,
        Button::L3,
        Button::R1,
        Button::R2,
        Button::R3,
    ];

    /// Canonical lowercase name, as written by the serializer
    pub const fn name(self) -> &'static str {
        match self {
            Button::Cross => "cross",
            Button::Circle => "circle",
            Button::Square => "square",
            Button::Triangle => "triangle",
            Button::Start => "start",
            Button::Select => "select",
            Button::Up => "up",
            Button::Down => "down",
            Button::Left => "left",
            Button::Right => "right",
            Button::L1 => "l1",
            Button::L2 => "l2",
            Button::L3 => "l3",
            Button::R1 => "r1",
            Button::R2 => "r2",
            Button::R3 => "r3",
        }
    }

    /// Resolve a canonical name or alias, ignoring ASCII case and surrounding
    /// whitespace.
    pub fn from_token(token: &str) -> Option<Button> {
        LOOKUP
            .get(token.trim().to_ascii_lowercase().as_str())
            .copied()
    }

    /// Bit position in the digital pad word
    pub const fn bit(self) -> u8 {
        self as u8
    }

    /// Mask with only this button set
    pub const fn mask(self) -> ButtonMask {
        ButtonMask::from_bits_retain(1 << self.bit())
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a token is not a known button or alias
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown button '{0}'")]
pub struct UnknownButton(pub String);

impl FromStr for Button {
    type Err = UnknownButton;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Button::from_token(s).ok_or_else(|| UnknownButton(s.to_string()))
    }
}

bitflags::bitflags! {
    /// Set of pressed buttons, one bit per pad word position
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ButtonMask: u16 {
        const SELECT = 1 << 0;
        const L3 = 1 << 1;
        const R3 = 1 << 2;
        const START = 1 << 3;
        const UP = 1 << 4;
        const RIGHT = 1 << 5;
        const DOWN = 1 << 6;
        const LEFT = 1 << 7;
        const L2 = 1 << 8;
        const R2 = 1 << 9;
        const L1 = 1 << 10;
        const R1 = 1 << 11;
        const TRIANGLE = 1 << 12;
        const CIRCLE = 1 << 13;
        const CROSS = 1 << 14;
        const SQUARE = 1 << 15;
    }
}

/// Direction of a button transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeAction {
    Press,
    Release,
}

impl EdgeAction {
    /// Whether the button is held after this action is applied
    pub fn is_press(self) -> bool {
        matches!(self, EdgeAction::Press)
    }
}

/// A single press or release of one button at a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub frame: u64,
    pub button: Button,
    pub action: EdgeAction,
}

impl Edge {
    pub fn press(frame: u64, button: Button) -> Self {
        Self {
            frame,
            button,
            action: EdgeAction::Press,
        }
    }

    pub fn release(frame: u64, button: Button) -> Self {
        Self {
            frame,
            button,
            action: EdgeAction::Release,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action {
            EdgeAction::Press => write!(f, "{}:{}", self.frame, self.button),
            EdgeAction::Release => write!(f, "{}:{}:release", self.frame, self.button),
        }
    }
}

/// Virtual controller state
///
/// Owned by the frame loop and lent to the injector, recorder and host for
/// the duration of a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerState {
    pressed: ButtonMask,
}

impl ControllerState {
    /// All buttons released
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        self.pressed.contains(button.mask())
    }

    pub fn set(&mut self, button: Button, pressed: bool) {
        self.pressed.set(button.mask(), pressed);
    }

    /// Apply an edge. Repeating the same action is a no-op.
    pub fn apply(&mut self, edge: &Edge) {
        self.set(edge.button, edge.action.is_press());
    }

    pub fn mask(&self) -> ButtonMask {
        self.pressed
    }

    /// Digital pad word as the console reads it (active low)
    pub fn pad_word(&self) -> u16 {
        !self.pressed.bits()
    }

    pub fn pressed_buttons(&self) -> impl Iterator<Item = Button> + '_ {
        Button::ALL
            .into_iter()
            .filter(move |&button| self.is_pressed(button))
    }

    /// Transitions needed to go from `previous` to `self`, in canonical
    /// button order
    pub fn transitions_from(
        &self,
        previous: &ControllerState,
    ) -> impl Iterator<Item = (Button, EdgeAction)> + '_ {
        let changed = self.pressed ^ previous.pressed;
        Button::ALL
            .into_iter()
            .filter(move |button| changed.contains(button.mask()))
            .map(move |button| {
                let action = if self.is_pressed(button) {
                    EdgeAction::Press
                } else {
                    EdgeAction::Release
                };
                (button, action)
            })
    }
}

/// What runs alongside input recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingMode {
    /// Inputs only
    #[default]
    Basic,
    /// Inputs plus RAM snapshots at the configured cadence
    #[serde(rename = "snapshots")]
    WithSnapshots,
    /// Snapshots plus host screenshots at the same cadence
    Full,
}

impl RecordingMode {
    pub fn captures_snapshots(self) -> bool {
        !matches!(self, RecordingMode::Basic)
    }

    pub fn captures_screenshots(self) -> bool {
        matches!(self, RecordingMode::Full)
    }
}

impl FromStr for RecordingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(RecordingMode::Basic),
            "snapshots" | "with_snapshots" => Ok(RecordingMode::WithSnapshots),
            "full" => Ok(RecordingMode::Full),
            other => Err(format!("unknown recording mode: {}", other)),
        }
    }
}

/// Recorded input log plus the context it was captured in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingSession {
    pub edges: Vec<Edge>,
    pub start_frame: u64,
    pub mode: RecordingMode,
}
