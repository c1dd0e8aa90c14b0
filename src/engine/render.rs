//! Collaborator interfaces for drawing and text measurement.
//!
//! The engine never touches pixels or terminal cells.  It issues commands to a
//! [`DrawSink`], asks a [`TextMeasure`] how big strings are, and gets
//! off-screen [`Surface`]s from a [`SurfaceProvider`].

use super::geometry::{Rect, Size};
use super::style::{BorderStyle, Color, Font, ImageRef, StyleBundle};

// ───────────────────────────────────────── text ──────────────

/// Font-metrics capability supplied by the embedding application.
pub trait TextMeasure {
    /// Rendered size of `text` in `font`.
    fn measure(&self, font: &Font, text: &str) -> Size;
}

/// Fixed-advance measurement: one unit per char and one row per line, both
/// scaled by the font size.  Matches a terminal grid at size 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonospaceMeasure;

impl TextMeasure for MonospaceMeasure {
    fn measure(&self, font: &Font, text: &str) -> Size {
        if text.is_empty() {
            return Size::new(0, i32::from(font.size));
        }
        let scale = i32::from(font.size);
        let (mut lines, mut widest) = (0, 0);
        for line in text.lines() {
            lines += 1;
            widest = widest.max(line.chars().count() as i32);
        }
        Size::new(widest * scale, lines.max(1) * scale)
    }
}

// ───────────────────────────────────────── draw sink ─────────

/// Receives draw commands.  Backends translate these into real rendering.
pub trait DrawSink {
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Bordered rectangle; backends with images use the nine source regions.
    fn draw_border(&mut self, rect: Rect, border: &BorderStyle);

    fn draw_text(&mut self, x: i32, y: i32, text: &str, font: &Font, color: Color);

    fn draw_image(&mut self, image: ImageRef, source: Rect, dest: Rect);

    /// Current clip rectangle, `None` for unclipped.
    fn clip(&self) -> Option<Rect>;

    fn set_clip(&mut self, clip: Option<Rect>);

    /// Blit an off-screen surface with its origin at `dest`, clipped to
    /// `dest` (and to whatever clip is already active).
    fn present(&mut self, surface: &Surface, dest: Rect) {
        let outer = self.clip();
        let clip = match outer {
            Some(c) => c.intersect(dest).unwrap_or(Rect::new(dest.x, dest.y, 0, 0)),
            None => dest,
        };
        self.set_clip(Some(clip));
        surface.replay(self, dest.x, dest.y, clip);
        self.set_clip(outer);
    }
}

/// Fill the background and border described by `style` over `bounds`.
pub fn draw_frame(sink: &mut dyn DrawSink, bounds: Rect, style: &StyleBundle) {
    if style.background_color.a > 0 {
        sink.fill_rect(bounds, style.background_color);
    }
    if let Some(image) = style.background_image {
        sink.draw_image(
            image,
            Rect::new(0, 0, image.width, image.height),
            bounds,
        );
    }
    if style.border.image().is_some() || style.border.edge_color.a > 0 {
        sink.draw_border(bounds, &style.border);
    }
}

// ───────────────────────────────────────── surfaces ──────────

/// Identifies a surface within its provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u32);

/// A recorded draw command, in surface-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Fill {
        rect: Rect,
        color: Color,
    },
    Border {
        rect: Rect,
        border: BorderStyle,
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        font: Font,
        color: Color,
    },
    Image {
        image: ImageRef,
        source: Rect,
        dest: Rect,
    },
    Clip(Option<Rect>),
}

/// Off-screen drawable target.  Records commands; presenting it replays them
/// translated into the destination sink.
#[derive(Debug, Clone)]
pub struct Surface {
    id: SurfaceId,
    size: Size,
    clip: Option<Rect>,
    commands: Vec<DrawCommand>,
}

impl Surface {
    pub fn new(id: SurfaceId, size: Size) -> Self {
        Self {
            id,
            size,
            clip: None,
            commands: Vec::new(),
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drop everything recorded so far.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.clip = None;
    }

    /// Replay into `sink` with the origin moved to `(dx, dy)`.  Clip commands
    /// recorded on the surface are narrowed to `base_clip`.
    pub fn replay<S: DrawSink + ?Sized>(&self, sink: &mut S, dx: i32, dy: i32, base_clip: Rect) {
        for cmd in &self.commands {
            match cmd {
                DrawCommand::Fill { rect, color } => sink.fill_rect(rect.translate(dx, dy), *color),
                DrawCommand::Border { rect, border } => {
                    sink.draw_border(rect.translate(dx, dy), border)
                }
                DrawCommand::Text {
                    x,
                    y,
                    text,
                    font,
                    color,
                } => sink.draw_text(x + dx, y + dy, text, font, *color),
                DrawCommand::Image {
                    image,
                    source,
                    dest,
                } => sink.draw_image(*image, *source, dest.translate(dx, dy)),
                DrawCommand::Clip(Some(r)) => {
                    let narrowed = r
                        .translate(dx, dy)
                        .intersect(base_clip)
                        .unwrap_or(Rect::new(base_clip.x, base_clip.y, 0, 0));
                    sink.set_clip(Some(narrowed));
                }
                DrawCommand::Clip(None) => sink.set_clip(Some(base_clip)),
            }
        }
    }
}

impl DrawSink for Surface {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Fill { rect, color });
    }

    fn draw_border(&mut self, rect: Rect, border: &BorderStyle) {
        self.commands.push(DrawCommand::Border {
            rect,
            border: border.clone(),
        });
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, font: &Font, color: Color) {
        self.commands.push(DrawCommand::Text {
            x,
            y,
            text: text.to_string(),
            font: font.clone(),
            color,
        });
    }

    fn draw_image(&mut self, image: ImageRef, source: Rect, dest: Rect) {
        self.commands.push(DrawCommand::Image {
            image,
            source,
            dest,
        });
    }

    fn clip(&self) -> Option<Rect> {
        self.clip
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        self.clip = clip;
        self.commands.push(DrawCommand::Clip(clip));
    }
}

/// Allocates off-screen surfaces.  Only a manager hands this capability to
/// components, during attachment and frame updates.
pub trait SurfaceProvider {
    fn create_surface(&mut self, size: Size) -> Surface;
}

/// Default provider: hands out recording surfaces with sequential ids.
#[derive(Debug, Default)]
pub struct SurfacePool {
    next_id: u32,
}

impl SurfacePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of surfaces allocated so far.
    pub fn allocated(&self) -> u32 {
        self.next_id
    }
}

impl SurfaceProvider for SurfacePool {
    fn create_surface(&mut self, size: Size) -> Surface {
        let id = SurfaceId(self.next_id);
        self.next_id += 1;
        tracing::debug!(id = id.0, width = size.width, height = size.height, "surface allocated");
        Surface::new(id, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monospace_measures_chars_and_lines() {
        let m = MonospaceMeasure;
        let font = Font::new("mono", 1);
        assert_eq!(m.measure(&font, "hello"), Size::new(5, 1));
        assert_eq!(m.measure(&font, "ab\nlonger"), Size::new(6, 2));
        assert_eq!(m.measure(&Font::new("mono", 2), "abc"), Size::new(6, 2));
        assert_eq!(m.measure(&font, ""), Size::new(0, 1));
    }

    #[test]
    fn present_translates_and_clips_once() {
        let mut pool = SurfacePool::new();
        let mut panel = pool.create_surface(Size::new(10, 4));
        panel.fill_rect(Rect::new(0, 0, 10, 1), Color::WHITE);
        panel.draw_text(1, 2, "hi", &Font::default(), Color::BLACK);

        let mut screen = pool.create_surface(Size::new(80, 24));
        screen.present(&panel, Rect::new(5, 5, 10, 4));

        assert_eq!(pool.allocated(), 2);
        assert_eq!(
            screen.commands(),
            &[
                DrawCommand::Clip(Some(Rect::new(5, 5, 10, 4))),
                DrawCommand::Fill {
                    rect: Rect::new(5, 5, 10, 1),
                    color: Color::WHITE
                },
                DrawCommand::Text {
                    x: 6,
                    y: 7,
                    text: "hi".into(),
                    font: Font::default(),
                    color: Color::BLACK
                },
                DrawCommand::Clip(None),
            ]
        );
        assert_eq!(screen.clip(), None);
    }

    #[test]
    fn nested_present_narrows_to_outer_clip() {
        let mut pool = SurfacePool::new();
        let mut screen = pool.create_surface(Size::new(80, 24));
        screen.set_clip(Some(Rect::new(0, 0, 6, 6)));
        let panel = pool.create_surface(Size::new(10, 10));
        screen.present(&panel, Rect::new(4, 4, 10, 10));
        assert_eq!(screen.clip(), Some(Rect::new(0, 0, 6, 6)));
        assert!(screen
            .commands()
            .contains(&DrawCommand::Clip(Some(Rect::new(4, 4, 2, 2)))));
    }
}
