//! Widget lifecycle, layout and scheduling engine.
//!
//! Nothing in here knows about terminals or pixels: drawing, text metrics
//! and off-screen surfaces come in through the traits in [`render`], and
//! input arrives as a per-frame [`input::InputState`] snapshot.

pub mod component;
pub mod error;
pub mod events;
pub mod geometry;
pub mod input;
pub mod manager;
pub mod render;
pub mod selection;
pub mod style;

pub use component::{
    AttachContext, Component, ComponentBase, ComponentEvent, ComponentId, Control, FrameContext,
    Lifecycle, ManagerId, PopUp, PopupMode,
};
pub use error::{Rejected, Result, UiError};
pub use geometry::{Rect, Size};
pub use input::{Button, InputState};
pub use manager::{Found, Manager};
pub use render::{DrawSink, MonospaceMeasure, Surface, SurfacePool, SurfaceProvider, TextMeasure};
pub use selection::{Arrangement, Columns, OptionItem, SelectionContainer, SelectionEvent};
pub use style::{Color, Padding, Spacing, StyleBundle, StyleValues};
