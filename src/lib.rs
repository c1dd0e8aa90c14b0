//! stackui: a retained-mode widget toolkit with a modal control stack and a
//! popup queue, plus a ratatui backend.

pub mod engine;
pub mod ui;
pub mod widgets;

pub use engine::*;
