//! Concrete widgets built on the engine.
//!
//! These stay thin: a minimum-size policy, a few hooks and a straightforward
//! draw routine each.  Everything interesting happens in [`crate::engine`].

pub mod button;
pub mod dialog;
pub mod notification;
pub mod progress;
pub mod text_entry;
pub mod text_option;

pub use button::PushButton;
pub use dialog::{Dialog, DialogEvent};
pub use notification::Notification;
pub use progress::ProgressBar;
pub use text_entry::{TextEntry, TextEntryEvent};
pub use text_option::TextOption;

use crate::engine::geometry::{Rect, Size};
use crate::engine::render::{DrawSink, TextMeasure};
use crate::engine::style::{Color, FontStyle, StyleValues};

/// Draw `text` aligned inside `area` using the style's alignment.
pub(crate) fn draw_aligned(
    sink: &mut dyn DrawSink,
    measure: &dyn TextMeasure,
    area: Rect,
    text: &str,
    font: &FontStyle,
    color: Color,
    style: &StyleValues,
) -> Size {
    let size = measure.measure(&font.font, text);
    let (x, y) = crate::engine::style::align_in(area, size, style.h_align, style.v_align);
    sink.draw_text(x, y, text, &font.font, color);
    size
}
