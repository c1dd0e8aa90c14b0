//! Screen-space geometry with minimum-size enforcement.
//!
//! Every component owns one [`Geometry`].  Assignments are clamped up to the
//! component's current minimum size and diffed against the previous rectangle
//! so the caller knows which notifications to dispatch.

// ───────────────────────────────────────── primitives ────────

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const ZERO: Size = Size { width: 0, height: 0 };

    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Component-wise maximum.
    pub fn max(self, other: Size) -> Size {
        Size::new(self.width.max(other.width), self.height.max(other.height))
    }
}

/// An axis-aligned rectangle.  `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.right() && y < self.bottom()
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Returns the overlapping region, if any.
    pub fn intersect(&self, other: Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }

    /// Shrinks the rectangle by per-side insets.  Never goes below zero size.
    pub fn inset(&self, top: i32, right: i32, bottom: i32, left: i32) -> Rect {
        Rect::new(
            self.x + left,
            self.y + top,
            (self.width - left - right).max(0),
            (self.height - top - bottom).max(0),
        )
    }
}

// ───────────────────────────────────────── change set ────────

/// Which aspects of a rectangle changed in one assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeometryChange {
    pub moved: bool,
    pub resized: bool,
}

impl GeometryChange {
    pub fn is_empty(&self) -> bool {
        !self.moved && !self.resized
    }
}

// ───────────────────────────────────────── geometry ──────────

/// Position and size of a single component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    bounds: Rect,
}

impl Geometry {
    pub fn new(bounds: Rect) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Store `requested`, clamped so that `width >= min.width` and
    /// `height >= min.height`, and report what changed.
    ///
    /// This only mutates the rectangle.  Dispatching the resulting
    /// notifications is the caller's job, in the fixed order Resize, Move.
    pub fn assign(&mut self, requested: Rect, min: Size) -> GeometryChange {
        let next = Rect::new(
            requested.x,
            requested.y,
            requested.width.max(min.width).max(0),
            requested.height.max(min.height).max(0),
        );
        let prev = std::mem::replace(&mut self.bounds, next);
        GeometryChange {
            moved: prev.x != next.x || prev.y != next.y,
            resized: prev.width != next.width || prev.height != next.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_clamps_to_minimum() {
        let mut g = Geometry::default();
        g.assign(Rect::new(3, 4, 1, 1), Size::new(10, 2));
        assert_eq!(g.bounds(), Rect::new(3, 4, 10, 2));
    }

    #[test]
    fn assign_reports_move_and_resize_separately() {
        let mut g = Geometry::new(Rect::new(0, 0, 5, 5));

        let moved = g.assign(Rect::new(1, 0, 5, 5), Size::ZERO);
        assert!(moved.moved && !moved.resized);

        let resized = g.assign(Rect::new(1, 0, 6, 5), Size::ZERO);
        assert!(!resized.moved && resized.resized);

        let both = g.assign(Rect::new(2, 2, 7, 7), Size::ZERO);
        assert!(both.moved && both.resized);

        let none = g.assign(Rect::new(2, 2, 7, 7), Size::ZERO);
        assert!(none.is_empty());
    }

    #[test]
    fn clamped_request_matching_current_is_not_a_change() {
        let mut g = Geometry::new(Rect::new(0, 0, 10, 3));
        let change = g.assign(Rect::new(0, 0, 2, 1), Size::new(10, 3));
        assert!(change.is_empty());
    }

    #[test]
    fn minimum_holds_when_minimum_grows_mid_sequence() {
        let mut g = Geometry::default();
        let mut min = Size::new(4, 1);
        for step in 0..20 {
            if step % 5 == 0 {
                min = Size::new(min.width + 3, min.height + 1);
            }
            g.assign(Rect::new(step, step, step % 7, step % 3), min);
            let b = g.bounds();
            assert!(b.width >= min.width && b.height >= min.height);
        }
    }

    #[test]
    fn intersect_and_inset() {
        let a = Rect::new(0, 0, 10, 10);
        assert_eq!(a.intersect(Rect::new(5, 5, 10, 10)), Some(Rect::new(5, 5, 5, 5)));
        assert_eq!(a.intersect(Rect::new(10, 0, 3, 3)), None);
        assert_eq!(a.inset(1, 2, 3, 4), Rect::new(4, 1, 4, 6));
        assert_eq!(a.inset(8, 0, 8, 0).height, 0);
    }
}
