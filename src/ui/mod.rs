//! Terminal backend: everything that touches ratatui or crossterm.
//!
//! The engine only sees traits; this layer supplies a [`DrawSink`] over a
//! ratatui buffer, turns crossterm key events into an [`InputState`], and
//! defines the default terminal theme.
//!
//! [`DrawSink`]: crate::engine::render::DrawSink
//! [`InputState`]: crate::engine::input::InputState

pub mod keys;
pub mod sink;
pub mod theme;

pub use keys::{KeyBind, KeyMap};
pub use sink::{term_color, BufferSink};
pub use theme::Theme;
