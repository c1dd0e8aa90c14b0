//! [`DrawSink`] over a ratatui [`Buffer`].
//!
//! One engine unit is one terminal cell.  Font sizes are ignored, images are
//! drawn as shaded placeholders, and translucent fills dim whatever is
//! already in the cells instead of painting over it.

use ratatui::buffer::Buffer;
use ratatui::style::{Color as TermColor, Modifier, Style};

use crate::engine::geometry::{Rect, Size};
use crate::engine::render::DrawSink;
use crate::engine::style::{nine_slice_targets, BorderStyle, Color, Font, ImageRef};

const SINGLE: [&str; 9] = ["┌", "─", "┐", "│", "", "│", "└", "─", "┘"];
const DOUBLE: [&str; 9] = ["╔", "═", "╗", "║", "", "║", "╚", "═", "╝"];
const IMAGE_FILL: &str = "░";

/// Terminal colour for an engine colour.  Fully transparent maps to `Reset`.
pub fn term_color(color: Color) -> TermColor {
    if color.a == 0 {
        TermColor::Reset
    } else {
        TermColor::Rgb(color.r, color.g, color.b)
    }
}

pub struct BufferSink<'a> {
    buf: &'a mut Buffer,
    clip: Option<Rect>,
}

impl<'a> BufferSink<'a> {
    pub fn new(buf: &'a mut Buffer) -> Self {
        Self { buf, clip: None }
    }

    fn area(&self) -> Rect {
        let a = self.buf.area;
        Rect::new(
            i32::from(a.x),
            i32::from(a.y),
            i32::from(a.width),
            i32::from(a.height),
        )
    }

    /// The part of `rect` that is both on screen and inside the clip.
    fn visible(&self, rect: Rect) -> Option<Rect> {
        let on_screen = rect.intersect(self.area())?;
        match self.clip {
            Some(clip) => on_screen.intersect(clip),
            None => Some(on_screen),
        }
    }

    fn for_each_cell(&mut self, rect: Rect, mut f: impl FnMut(&mut ratatui::buffer::Cell)) {
        let Some(r) = self.visible(rect) else {
            return;
        };
        for y in r.top()..r.bottom() {
            for x in r.left()..r.right() {
                // visible() keeps both coordinates inside the u16 buffer area
                if let Some(cell) = self.buf.cell_mut((x as u16, y as u16)) {
                    f(cell);
                }
            }
        }
    }
}

impl DrawSink for BufferSink<'_> {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        match color.a {
            0 => {}
            255 => self.for_each_cell(rect, |cell| {
                cell.reset();
                cell.set_bg(term_color(color));
            }),
            _ => self.for_each_cell(rect, |cell| {
                cell.set_style(Style::new().add_modifier(Modifier::DIM));
            }),
        }
    }

    fn draw_border(&mut self, rect: Rect, border: &BorderStyle) {
        let glyphs = if border.image().is_some() { &DOUBLE } else { &SINGLE };
        let fg = term_color(border.edge_color);
        let pieces = nine_slice_targets(rect, Size::new(1, 1));
        for (piece, glyph) in pieces.into_iter().zip(glyphs) {
            if glyph.is_empty() {
                continue;
            }
            self.for_each_cell(piece, |cell| {
                cell.set_symbol(glyph).set_fg(fg);
            });
        }
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, _font: &Font, color: Color) {
        let fg = term_color(color);
        for (row, line) in text.lines().enumerate() {
            for (col, c) in line.chars().enumerate() {
                let cell = Rect::new(x + col as i32, y + row as i32, 1, 1);
                self.for_each_cell(cell, |cell| {
                    cell.set_char(c).set_fg(fg);
                });
            }
        }
    }

    fn draw_image(&mut self, image: ImageRef, _source: Rect, dest: Rect) {
        tracing::trace!(image = image.id, "image drawn as placeholder");
        self.for_each_cell(dest, |cell| {
            cell.set_symbol(IMAGE_FILL).set_fg(TermColor::DarkGray);
        });
    }

    fn clip(&self) -> Option<Rect> {
        self.clip
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        self.clip = clip;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::render::{SurfacePool, SurfaceProvider};
    use ratatui::layout::Rect as TermRect;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn text_is_clipped_to_buffer_and_clip() {
        let mut buf = Buffer::empty(TermRect::new(0, 0, 8, 2));
        let mut sink = BufferSink::new(&mut buf);
        sink.draw_text(-2, 0, "hello", &Font::default(), Color::WHITE);
        sink.set_clip(Some(Rect::new(0, 1, 3, 1)));
        sink.draw_text(0, 1, "world", &Font::default(), Color::WHITE);
        assert_eq!(row(&buf, 0), "llo     ");
        assert_eq!(row(&buf, 1), "wor     ");
    }

    #[test]
    fn border_uses_box_glyphs() {
        let mut buf = Buffer::empty(TermRect::new(0, 0, 4, 3));
        let mut sink = BufferSink::new(&mut buf);
        sink.draw_border(Rect::new(0, 0, 4, 3), &BorderStyle::default());
        assert_eq!(row(&buf, 0), "┌──┐");
        assert_eq!(row(&buf, 1), "│  │");
        assert_eq!(row(&buf, 2), "└──┘");
    }

    #[test]
    fn translucent_fill_dims_without_erasing() {
        let mut buf = Buffer::empty(TermRect::new(0, 0, 3, 1));
        let mut sink = BufferSink::new(&mut buf);
        sink.draw_text(0, 0, "abc", &Font::default(), Color::WHITE);
        sink.fill_rect(Rect::new(0, 0, 2, 1), Color::rgba(0, 0, 0, 128));
        assert_eq!(row(&buf, 0), "abc");
        assert!(buf[(0, 0)].modifier.contains(Modifier::DIM));
        assert!(!buf[(2, 0)].modifier.contains(Modifier::DIM));
    }

    #[test]
    fn presented_surface_lands_translated() {
        let mut pool = SurfacePool::new();
        let mut panel = pool.create_surface(Size::new(4, 1));
        panel.draw_text(0, 0, "abcdef", &Font::default(), Color::WHITE);

        let mut buf = Buffer::empty(TermRect::new(0, 0, 8, 1));
        let mut sink = BufferSink::new(&mut buf);
        sink.present(&panel, Rect::new(2, 0, 4, 1));
        assert_eq!(sink.clip(), None);
        assert_eq!(row(&buf, 0), "  abcd  ");
    }
}
