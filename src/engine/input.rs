//! Per-frame input snapshot.
//!
//! The embedding loop samples its devices once per frame and hands the engine
//! an [`InputState`].  Every component updated during that frame reads the
//! same snapshot, so nobody "eats" a press before a sibling sees it.

use std::collections::HashSet;

/// Logical inputs the toolkit understands.  Backends map physical keys or
/// gamepad buttons onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    /// Jump a page towards the start of a list.
    JumpUp,
    /// Jump a page towards the end of a list.
    JumpDown,
    Submit,
    Cancel,
    Backspace,
    /// Auxiliary button, free for application use.
    Menu,
}

impl Button {
    pub const ALL: &[Button] = &[
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::JumpUp,
        Button::JumpDown,
        Button::Submit,
        Button::Cancel,
        Button::Backspace,
        Button::Menu,
    ];

    /// Key used in config files.
    pub fn config_key(self) -> &'static str {
        match self {
            Button::Up => "up",
            Button::Down => "down",
            Button::Left => "left",
            Button::Right => "right",
            Button::JumpUp => "jump_up",
            Button::JumpDown => "jump_down",
            Button::Submit => "submit",
            Button::Cancel => "cancel",
            Button::Backspace => "backspace",
            Button::Menu => "menu",
        }
    }

    pub fn from_config_key(s: &str) -> Option<Self> {
        Button::ALL.iter().copied().find(|b| b.config_key() == s)
    }
}

/// Edge-triggered and level-triggered button state for one frame, plus the
/// text typed during it.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pressed: HashSet<Button>,
    held: HashSet<Button>,
    typed: String,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Was `button` newly pressed this frame?
    pub fn pressed(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }

    /// Is `button` currently down?  A newly pressed button counts as held.
    pub fn held(&self, button: Button) -> bool {
        self.held.contains(&button) || self.pressed.contains(&button)
    }

    /// Characters typed this frame, in order.
    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn is_idle(&self) -> bool {
        self.pressed.is_empty() && self.typed.is_empty()
    }

    pub fn press(&mut self, button: Button) {
        self.pressed.insert(button);
    }

    pub fn hold(&mut self, button: Button) {
        self.held.insert(button);
    }

    pub fn release(&mut self, button: Button) {
        self.held.remove(&button);
    }

    pub fn type_char(&mut self, c: char) {
        self.typed.push(c);
    }

    /// Builder form of [`press`](Self::press), handy for scripted frames.
    pub fn with_pressed(mut self, button: Button) -> Self {
        self.press(button);
        self
    }

    pub fn with_typed(mut self, text: &str) -> Self {
        self.typed.push_str(text);
        self
    }

    /// Start the next frame: edge state and typed text are dropped, held
    /// buttons carry over.
    pub fn next_frame(&mut self) {
        self.pressed.clear();
        self.typed.clear();
    }
}
