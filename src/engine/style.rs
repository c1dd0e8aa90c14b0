//! Style bundles and the cascade protocol.
//!
//! A [`StyleBundle`] is a plain value.  Components always store their own
//! copy, so mutating one component's style never shows up on another.  The
//! bundle carries a dirty flag so holders can batch-recompute cached metrics
//! only when something actually changed.

use std::ops::Deref;

use super::error::{Result, UiError};
use super::geometry::{Rect, Size};
use super::input::Button;

// ───────────────────────────────────────── colours & images ──

/// 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// Opaque handle to an image owned by the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageRef {
    pub id: u32,
    pub width: i32,
    pub height: i32,
}

// ───────────────────────────────────────── border ────────────

/// Border image plus its nine precomputed source regions.
///
/// Regions are stored row-major: top-left, top, top-right, left, centre,
/// right, bottom-left, bottom, bottom-right.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BorderStyle {
    image: Option<ImageRef>,
    regions: [Rect; 9],
    pub edge_color: Color,
}

impl BorderStyle {
    pub fn image(&self) -> Option<ImageRef> {
        self.image
    }

    pub fn regions(&self) -> &[Rect; 9] {
        &self.regions
    }

    /// Size of one slice, i.e. the corner size.
    pub fn slice_size(&self) -> Size {
        self.regions[0].size()
    }

    /// Swap the border image and recompute the source regions.
    pub fn set_image(&mut self, image: Option<ImageRef>) {
        self.image = image;
        self.regions = match image {
            Some(img) => {
                if img.width % 3 != 0 || img.height % 3 != 0 {
                    tracing::warn!(
                        id = img.id,
                        width = img.width,
                        height = img.height,
                        "border image dimensions not divisible by 3"
                    );
                }
                nine_slice_sources(Size::new(img.width, img.height))
            }
            None => [Rect::default(); 9],
        };
    }
}

/// Nine equal source cells of `(width / 3, height / 3)` over an image.
pub fn nine_slice_sources(image: Size) -> [Rect; 9] {
    let cw = image.width / 3;
    let ch = image.height / 3;
    let mut out = [Rect::default(); 9];
    for (i, cell) in out.iter_mut().enumerate() {
        let col = (i % 3) as i32;
        let row = (i / 3) as i32;
        *cell = Rect::new(col * cw, row * ch, cw, ch);
    }
    out
}

/// Destination pieces for drawing a nine-slice border into `dest`.
///
/// Corners keep `corner` size, edges stretch along one axis, the centre
/// takes what is left.
pub fn nine_slice_targets(dest: Rect, corner: Size) -> [Rect; 9] {
    let cw = corner.width.min(dest.width / 2).max(0);
    let ch = corner.height.min(dest.height / 2).max(0);
    let mid_w = (dest.width - 2 * cw).max(0);
    let mid_h = (dest.height - 2 * ch).max(0);
    let xs = [dest.x, dest.x + cw, dest.right() - cw];
    let ys = [dest.y, dest.y + ch, dest.bottom() - ch];
    let ws = [cw, mid_w, cw];
    let hs = [ch, mid_h, ch];
    let mut out = [Rect::default(); 9];
    for (i, piece) in out.iter_mut().enumerate() {
        let (col, row) = (i % 3, i / 3);
        *piece = Rect::new(xs[col], ys[row], ws[col], hs[row]);
    }
    out
}

// ───────────────────────────────────────── fonts ─────────────

/// The three text roles a style carries fonts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontRole {
    Header,
    Body,
    Footer,
}

/// Font face identifier understood by the text-measurement collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Font {
    pub family: String,
    pub size: u16,
}

impl Font {
    pub fn new(family: impl Into<String>, size: u16) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Font::new("default", 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FontStyle {
    pub font: Font,
    pub color: Color,
}

// ───────────────────────────────────────── alignment ─────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Top-left origin for `content` placed inside `area` with the given
/// alignment.
pub fn align_in(area: Rect, content: Size, h: HAlign, v: VAlign) -> (i32, i32) {
    let x = match h {
        HAlign::Left => area.x,
        HAlign::Center => area.x + (area.width - content.width) / 2,
        HAlign::Right => area.right() - content.width,
    };
    let y = match v {
        VAlign::Top => area.y,
        VAlign::Middle => area.y + (area.height - content.height) / 2,
        VAlign::Bottom => area.bottom() - content.height,
    };
    (x, y)
}

// ───────────────────────────────────────── box model ─────────

/// Per-side inner padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Padding {
    pub const fn uniform(v: i32) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    /// CSS-style shorthand:
    /// `[a]` all sides, `[v, h]`, `[top, h, bottom]`, `[top, right, bottom, left]`.
    pub fn from_shorthand(values: &[i32]) -> Result<Self> {
        match *values {
            [a] => Ok(Self::uniform(a)),
            [v, h] => Ok(Self {
                top: v,
                right: h,
                bottom: v,
                left: h,
            }),
            [top, h, bottom] => Ok(Self {
                top,
                right: h,
                bottom,
                left: h,
            }),
            [top, right, bottom, left] => Ok(Self {
                top,
                right,
                bottom,
                left,
            }),
            _ => Err(UiError::Shorthand {
                len: values.len(),
                max: 4,
            }),
        }
    }

    pub fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> i32 {
        self.top + self.bottom
    }

    pub fn shrink(&self, rect: Rect) -> Rect {
        rect.inset(self.top, self.right, self.bottom, self.left)
    }

    pub fn grow(&self, size: Size) -> Size {
        Size::new(size.width + self.horizontal(), size.height + self.vertical())
    }
}

/// Gap between laid-out children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Spacing {
    pub vertical: i32,
    pub horizontal: i32,
}

impl Spacing {
    /// Same element order as [`Padding::from_shorthand`]: the top slot is
    /// the vertical gap and the right slot the horizontal one.  With three
    /// or four values the bottom and left slots are ignored.
    pub fn from_shorthand(values: &[i32]) -> Result<Self> {
        match *values {
            [a] => Ok(Self {
                vertical: a,
                horizontal: a,
            }),
            [vertical, horizontal] | [vertical, horizontal, _] | [vertical, horizontal, _, _] => {
                Ok(Self {
                    vertical,
                    horizontal,
                })
            }
            _ => Err(UiError::Shorthand {
                len: values.len(),
                max: 4,
            }),
        }
    }
}

// ───────────────────────────────────────── bundle ────────────

/// Every value a style carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleValues {
    pub background_color: Color,
    pub background_image: Option<ImageRef>,
    pub border: BorderStyle,
    pub header: FontStyle,
    pub body: FontStyle,
    pub footer: FontStyle,
    pub selected_text: Color,
    pub unselected_text: Color,
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub padding: Padding,
    pub spacing: Spacing,
    pub submit: Button,
    pub cancel: Button,
    pub close_on_cancel: bool,
}

impl Default for StyleValues {
    fn default() -> Self {
        Self {
            background_color: Color::BLACK,
            background_image: None,
            border: BorderStyle::default(),
            header: FontStyle {
                font: Font::default(),
                color: Color::WHITE,
            },
            body: FontStyle {
                font: Font::default(),
                color: Color::WHITE,
            },
            footer: FontStyle {
                font: Font::default(),
                color: Color::WHITE,
            },
            selected_text: Color::rgb(255, 255, 0),
            unselected_text: Color::WHITE,
            h_align: HAlign::Left,
            v_align: VAlign::Top,
            padding: Padding::default(),
            spacing: Spacing::default(),
            submit: Button::Submit,
            cancel: Button::Cancel,
            close_on_cancel: false,
        }
    }
}

impl StyleValues {
    pub fn font(&self, role: FontRole) -> &FontStyle {
        match role {
            FontRole::Header => &self.header,
            FontRole::Body => &self.body,
            FontRole::Footer => &self.footer,
        }
    }
}

/// A style value with change tracking.
///
/// Reads go through `Deref` to [`StyleValues`]; every write path marks the
/// bundle changed.
#[derive(Debug, PartialEq, Eq, Default)]
pub struct StyleBundle {
    values: StyleValues,
    changed: bool,
}

impl Clone for StyleBundle {
    /// Independent copy with the dirty flag cleared.
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
            changed: false,
        }
    }
}

impl Deref for StyleBundle {
    type Target = StyleValues;

    fn deref(&self) -> &StyleValues {
        &self.values
    }
}

impl From<StyleValues> for StyleBundle {
    fn from(values: StyleValues) -> Self {
        Self {
            values,
            changed: false,
        }
    }
}

impl StyleBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn mark_changed(&mut self) {
        self.changed = true;
    }

    pub fn accept_changes(&mut self) {
        self.changed = false;
    }

    /// Mutable access to every value; marks the bundle changed.
    pub fn edit(&mut self) -> &mut StyleValues {
        self.changed = true;
        &mut self.values
    }

    pub fn set_padding(&mut self, shorthand: &[i32]) -> Result<()> {
        let padding = Padding::from_shorthand(shorthand)?;
        self.edit().padding = padding;
        Ok(())
    }

    pub fn set_spacing(&mut self, shorthand: &[i32]) -> Result<()> {
        let spacing = Spacing::from_shorthand(shorthand)?;
        self.edit().spacing = spacing;
        Ok(())
    }

    pub fn set_border_image(&mut self, image: Option<ImageRef>) {
        self.edit().border.set_image(image);
    }

    /// Builder form of [`edit`](Self::edit) for constructing themes.
    pub fn with(mut self, f: impl FnOnce(&mut StyleValues)) -> Self {
        f(&mut self.values);
        self
    }
}
