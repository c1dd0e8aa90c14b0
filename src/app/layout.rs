//! Layout helpers: split the terminal area and place widgets in it.

use ratatui::layout::{Constraint, Direction, Layout, Rect as TermRect};
use stackui::{Rect, Size};

/// Primary screen layout: widget area plus a bottom status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub main_area: Rect,
    pub status_area: TermRect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: TermRect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // widgets
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            main_area: to_engine(chunks[0]),
            status_area: chunks[1],
        }
    }

    /// `size` centred in the main area, shrunk to fit.
    pub fn centered(&self, size: Size) -> Rect {
        let area = self.main_area;
        let w = size.width.min(area.width);
        let h = size.height.min(area.height);
        Rect::new(
            area.x + (area.width - w) / 2,
            area.y + (area.height - h) / 2,
            w,
            h,
        )
    }

    /// Slot for the `index`-th notification, stacked upwards from the
    /// bottom-right corner of the main area.
    pub fn notice_slot(&self, index: usize, size: Size) -> Rect {
        let area = self.main_area;
        let w = size.width.min(area.width);
        let y = area.bottom() - size.height * (index as i32 + 1);
        Rect::new(area.right() - w, y.max(area.y), w, size.height)
    }
}

fn to_engine(r: TermRect) -> Rect {
    Rect::new(
        i32::from(r.x),
        i32::from(r.y),
        i32::from(r.width),
        i32::from(r.height),
    )
}
