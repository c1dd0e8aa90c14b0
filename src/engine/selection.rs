//! Selection containers: List and Gallery.
//!
//! A [`SelectionContainer`] owns an ordered sequence of options (insertion
//! order is visual order), keeps exactly one of them selected while it is
//! non-empty, and scrolls them inside a clipped viewport.
//!
//! Options are laid out in viewport-local coordinates and drawn into an
//! off-screen panel the size of the viewport, which is then presented once.
//! The panel comes from the manager, so it only exists after the container
//! has been opened.

use std::collections::HashSet;

use super::component::{
    AttachContext, Component, ComponentBase, ComponentId, Control, FrameContext,
};
use super::error::{Result, UiError};
use super::events::{Observers, SubscriptionId};
use super::geometry::{Rect, Size};
use super::input::{Button, InputState};
use super::render::{draw_frame, DrawSink, Surface, SurfaceProvider, TextMeasure};
use crate::component_base;

/// Distance covered by one jump input in a list.
pub const JUMP_STRIDE: usize = 8;

/// A component that can live inside a selection container.
pub trait OptionItem: Component {
    fn is_selected(&self) -> bool;
    fn set_selected(&mut self, selected: bool);
}

/// Gallery column policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Columns {
    Fixed(usize),
    /// As many columns as fit the viewport, sized by the widest option.
    Wrap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrangement {
    /// Single column; vertical moves wrap, jumps clamp.
    List,
    /// Grid; horizontal moves wrap, vertical moves stop at the edges.
    Gallery(Columns),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    Selected(usize),
    Unselected(usize),
    Submitted(usize),
    Cancelled,
    /// The last option was removed.
    Emptied,
}

pub struct SelectionContainer {
    base: ComponentBase,
    arrangement: Arrangement,
    title: Option<String>,
    options: Vec<Box<dyn OptionItem>>,
    /// Options whose style came from this container rather than their own.
    inherited: HashSet<ComponentId>,
    selected: usize,
    scroll: i32,
    panel: Option<Surface>,
    events: Observers<SelectionEvent>,
}

impl SelectionContainer {
    pub fn new(arrangement: Arrangement) -> Self {
        Self {
            base: ComponentBase::new(),
            arrangement,
            title: None,
            options: Vec::new(),
            inherited: HashSet::new(),
            selected: 0,
            scroll: 0,
            panel: None,
            events: Observers::new(),
        }
    }

    pub fn list() -> Self {
        Self::new(Arrangement::List)
    }

    pub fn gallery(columns: Columns) -> Self {
        Self::new(Arrangement::Gallery(columns))
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.base.set_name(Some(name.into()));
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    // ── accessors ────────────────────────────────────────────

    pub fn arrangement(&self) -> Arrangement {
        self.arrangement
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// `None` while the container is empty.
    pub fn selected_index(&self) -> Option<usize> {
        (!self.options.is_empty()).then_some(self.selected)
    }

    pub fn selected_option(&self) -> Option<&dyn OptionItem> {
        self.options.get(self.selected).map(|o| o.as_ref())
    }

    pub fn option(&self, index: usize) -> Option<&dyn OptionItem> {
        self.options.get(index).map(|o| o.as_ref())
    }

    pub fn options(&self) -> impl Iterator<Item = &dyn OptionItem> {
        self.options.iter().map(|o| o.as_ref())
    }

    /// Uniform vertical offset currently applied to every option.
    pub fn scroll_offset(&self) -> i32 {
        self.scroll
    }

    pub fn panel(&self) -> Option<&Surface> {
        self.panel.as_ref()
    }

    pub fn subscribe<F: FnMut(&SelectionEvent) + 'static>(&mut self, f: F) -> SubscriptionId {
        self.events.subscribe(f)
    }

    // ── geometry ─────────────────────────────────────────────

    fn header_height(&self, measure: &dyn TextMeasure) -> i32 {
        match &self.title {
            Some(title) => {
                let style = self.base.style();
                measure.measure(&style.header.font, title).height + style.spacing.vertical
            }
            None => 0,
        }
    }

    /// Screen-space rectangle the options are visible through.
    pub fn viewport(&self, measure: &dyn TextMeasure) -> Rect {
        let inner = self.base.style().padding.shrink(self.bounds());
        let header = self.header_height(measure).min(inner.height);
        Rect::new(inner.x, inner.y + header, inner.width, inner.height - header)
    }

    fn column_count(&self, measure: &dyn TextMeasure) -> usize {
        match self.arrangement {
            Arrangement::List => 1,
            Arrangement::Gallery(Columns::Fixed(n)) => n.max(1),
            Arrangement::Gallery(Columns::Wrap) => {
                let gap = self.base.style().spacing.horizontal;
                let widest = self
                    .options
                    .iter()
                    .map(|o| o.min_size(measure).width)
                    .max()
                    .unwrap_or(1)
                    .max(1);
                let view = self.viewport(measure).width;
                ((view + gap) / (widest + gap).max(1)).max(1) as usize
            }
        }
    }

    /// Recompute every option's viewport-local rectangle, keeping the current
    /// scroll offset.
    pub fn layout_options(&mut self, measure: &dyn TextMeasure) {
        let view = self.viewport(measure).size();
        let spacing = self.base.style().spacing;
        match self.arrangement {
            Arrangement::List => {
                let mut y = self.scroll;
                for option in self.options.iter_mut() {
                    let h = option.min_size(measure).height;
                    option.set_bounds(Rect::new(0, y, view.width, h), measure);
                    y = option.bounds().bottom() + spacing.vertical;
                }
            }
            Arrangement::Gallery(_) => {
                let cols = self.column_count(measure) as i32;
                let cell_w = ((view.width - (cols - 1) * spacing.horizontal) / cols).max(0);
                let cell_h = self
                    .options
                    .iter()
                    .map(|o| o.min_size(measure).height)
                    .max()
                    .unwrap_or(0);
                for (i, option) in self.options.iter_mut().enumerate() {
                    let (row, col) = (i as i32 / cols, i as i32 % cols);
                    let x = col * (cell_w + spacing.horizontal);
                    let y = self.scroll + row * (cell_h + spacing.vertical);
                    option.set_bounds(Rect::new(x, y, cell_w, cell_h), measure);
                }
            }
        }
    }

    /// One damped scroll-follow correction.  If the selected option sticks
    /// out of the viewport, every option shifts by half the overflow plus
    /// one, never past the point where its top reaches the viewport top.
    /// An option at least as tall as the viewport only has its top aligned.
    /// Returns the shift applied.
    pub fn scroll_options(&mut self, measure: &dyn TextMeasure) -> i32 {
        let Some(selected) = self.options.get(self.selected) else {
            return 0;
        };
        let b = selected.bounds();
        let view_h = self.viewport(measure).height;
        let shift = if b.top() < 0 {
            (-b.top()) / 2 + 1
        } else if b.height >= view_h {
            -(b.top() / 2 + 1).min(b.top())
        } else if b.bottom() > view_h {
            -((b.bottom() - view_h) / 2 + 1).min(b.top())
        } else {
            0
        };
        if shift != 0 {
            self.scroll += shift;
            for option in self.options.iter_mut() {
                let r = option.bounds();
                option.set_position(r.x, r.y + shift, measure);
            }
            tracing::trace!(container = %self.base.id(), shift, scroll = self.scroll, "scroll follow");
        }
        shift
    }

    // ── selection ────────────────────────────────────────────

    /// Select `index`, unselecting the previous option first.  Out-of-range
    /// indices and re-selecting the current option change nothing.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.options.len() {
            return false;
        }
        if index == self.selected && self.options[index].is_selected() {
            return false;
        }
        let prev = self.selected;
        if let Some(option) = self.options.get_mut(prev) {
            if option.is_selected() {
                option.set_selected(false);
                self.events.emit(&SelectionEvent::Unselected(prev));
            }
        }
        self.selected = index;
        self.options[index].set_selected(true);
        self.events.emit(&SelectionEvent::Selected(index));
        tracing::trace!(container = %self.base.id(), from = prev, to = index, "selection moved");
        true
    }

    /// Make option flags agree with `selected`, emitting events for each flip.
    fn resync_selection(&mut self) {
        for (i, option) in self.options.iter_mut().enumerate() {
            let want = i == self.selected;
            if option.is_selected() != want {
                option.set_selected(want);
                let event = if want {
                    SelectionEvent::Selected(i)
                } else {
                    SelectionEvent::Unselected(i)
                };
                self.events.emit(&event);
            }
        }
    }

    /// Target index for this frame's directional input, if any.
    fn target_index(&self, input: &InputState, columns: usize) -> Option<usize> {
        let n = self.options.len();
        if n == 0 {
            return None;
        }
        let i = self.selected;
        let forward = (i + 1) % n;
        let backward = (i + n - 1) % n;
        match self.arrangement {
            Arrangement::List => {
                if input.pressed(Button::Up) {
                    Some(backward)
                } else if input.pressed(Button::Down) {
                    Some(forward)
                } else if input.pressed(Button::JumpUp) {
                    Some(i.saturating_sub(JUMP_STRIDE))
                } else if input.pressed(Button::JumpDown) {
                    Some((i + JUMP_STRIDE).min(n - 1))
                } else {
                    None
                }
            }
            Arrangement::Gallery(_) => {
                if input.pressed(Button::Left) {
                    Some(backward)
                } else if input.pressed(Button::Right) {
                    Some(forward)
                } else if input.pressed(Button::Up) {
                    i.checked_sub(columns)
                } else if input.pressed(Button::Down) {
                    Some(i + columns).filter(|&t| t < n)
                } else {
                    None
                }
            }
        }
    }

    /// Apply directional input.  Returns `true` if the selection moved.
    pub fn handle_input(&mut self, input: &InputState, measure: &dyn TextMeasure) -> bool {
        let columns = self.column_count(measure);
        match self.target_index(input, columns) {
            Some(target) => self.select(target),
            None => false,
        }
    }

    // ── option management ────────────────────────────────────

    /// Append an option.  The first option added becomes selected.
    pub fn add_option(&mut self, mut option: Box<dyn OptionItem>, measure: &dyn TextMeasure) {
        if self.base.has_style() && !option.base().has_style() {
            option.set_style(self.base.style(), measure);
            self.inherited.insert(option.id());
        }
        if option.is_selected() {
            option.set_selected(false);
        }
        self.options.push(option);
        if self.options.len() == 1 {
            self.selected = 0;
            self.select(0);
        }
        self.layout_options(measure);
    }

    /// Remove the option with `id`.  Removing the selected option moves the
    /// selection to the preceding one.
    pub fn remove_option(
        &mut self,
        id: ComponentId,
        measure: &dyn TextMeasure,
    ) -> Option<Box<dyn OptionItem>> {
        let pos = self.options.iter().position(|o| o.id() == id)?;
        self.remove_option_at(pos, measure)
    }

    pub fn remove_option_at(
        &mut self,
        pos: usize,
        measure: &dyn TextMeasure,
    ) -> Option<Box<dyn OptionItem>> {
        if pos >= self.options.len() {
            return None;
        }
        if self.options[pos].is_selected() {
            self.options[pos].set_selected(false);
            self.events.emit(&SelectionEvent::Unselected(pos));
        }
        let removed = self.options.remove(pos);
        self.inherited.remove(&removed.id());

        if self.options.is_empty() {
            self.selected = 0;
            self.scroll = 0;
            self.events.emit(&SelectionEvent::Emptied);
            return Some(removed);
        }
        if pos == self.selected {
            self.selected = self.selected.saturating_sub(1);
        }
        self.selected = self.selected.min(self.options.len() - 1);
        self.resync_selection();
        self.layout_options(measure);
        Some(removed)
    }

    /// Push this container's style onto its options.  Without `force`, only
    /// options lacking their own style (or holding an earlier cascade) change.
    pub fn cascade_style(&mut self, force: bool, measure: &dyn TextMeasure) {
        if !self.base.has_style() {
            return;
        }
        let style = self.base.style().clone();
        for option in self.options.iter_mut() {
            let id = option.id();
            if force || !option.base().has_style() || self.inherited.contains(&id) {
                option.set_style(&style, measure);
                self.inherited.insert(id);
            }
        }
    }

    // ── panel ────────────────────────────────────────────────

    /// Allocate the off-screen option panel at the viewport size.
    ///
    /// Calling this before the container is registered with a manager is a
    /// sequencing bug and fails with [`UiError::NotAttached`].
    pub fn create_option_panel(
        &mut self,
        surfaces: &mut dyn SurfaceProvider,
        measure: &dyn TextMeasure,
    ) -> Result<()> {
        if !self.base.is_attached() {
            return Err(UiError::NotAttached {
                component: self.base.id(),
                operation: "create option panel",
            });
        }
        let size = self.viewport(measure).size();
        self.panel = Some(surfaces.create_surface(size));
        Ok(())
    }

    fn panel_is_stale(&self, measure: &dyn TextMeasure) -> bool {
        let view: Size = self.viewport(measure).size();
        self.panel.as_ref().map_or(true, |p| p.size() != view)
    }
}

impl Component for SelectionContainer {
    component_base!(base);

    fn min_size(&self, measure: &dyn TextMeasure) -> Size {
        let style = self.base.style();
        let header = match &self.title {
            Some(title) => {
                let t = measure.measure(&style.header.font, title);
                Size::new(t.width, t.height + style.spacing.vertical)
            }
            None => Size::ZERO,
        };
        style.padding.grow(header)
    }

    fn on_opened(&mut self, cx: &mut AttachContext<'_>) -> Result<()> {
        self.layout_options(cx.measure);
        self.create_option_panel(cx.surfaces, cx.measure)
    }

    fn on_style_set(&mut self, measure: &dyn TextMeasure) {
        self.cascade_style(false, measure);
        self.layout_options(measure);
    }

    fn on_resized(&mut self, measure: &dyn TextMeasure) {
        self.layout_options(measure);
    }

    fn update(&mut self, cx: &mut FrameContext<'_>) {
        let measure = cx.measure;
        if self.base.is_attached() && self.panel_is_stale(measure) {
            if let Err(err) = self.create_option_panel(cx.surfaces(), measure) {
                tracing::error!(%err, "option panel reallocation failed");
            }
        }
        if self.options.is_empty() {
            return;
        }
        self.handle_input(cx.input, measure);
        self.scroll_options(measure);
    }

    fn draw(&mut self, sink: &mut dyn DrawSink, measure: &dyn TextMeasure) {
        let bounds = self.bounds();
        let viewport = self.viewport(measure);
        let style = self.base.style();
        draw_frame(sink, bounds, style);
        if let Some(title) = &self.title {
            let inner = style.padding.shrink(bounds);
            let size = measure.measure(&style.header.font, title);
            let (x, _) = super::style::align_in(inner, size, style.h_align, style.v_align);
            sink.draw_text(x, inner.y, title, &style.header.font, style.header.color);
        }

        let Self { panel, options, .. } = self;
        let Some(panel) = panel.as_mut() else {
            return;
        };
        panel.clear();
        let local = Rect::from_size(panel.size());
        for option in options.iter_mut() {
            if option.bounds().intersect(local).is_some() {
                option.draw(&mut *panel, measure);
            }
        }
        sink.present(&*panel, viewport);
    }
}

impl Control for SelectionContainer {
    fn on_submit(&mut self, _cx: &mut FrameContext<'_>) {
        if let Some(index) = self.selected_index() {
            self.events.emit(&SelectionEvent::Submitted(index));
        }
    }

    fn on_cancel(&mut self, _cx: &mut FrameContext<'_>) {
        self.events.emit(&SelectionEvent::Cancelled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::component::ManagerId;
    use crate::engine::render::{MonospaceMeasure, SurfacePool};
    use crate::engine::style::{Padding, StyleBundle};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Item {
        base: ComponentBase,
        selected: bool,
        min: Size,
    }

    impl Item {
        fn boxed(height: i32) -> Box<dyn OptionItem> {
            Box::new(Item {
                base: ComponentBase::new(),
                selected: false,
                min: Size::new(3, height),
            })
        }
    }

    impl Component for Item {
        component_base!(base);
        fn min_size(&self, _m: &dyn TextMeasure) -> Size {
            self.base.style().padding.grow(self.min)
        }
        fn draw(&mut self, _s: &mut dyn DrawSink, _m: &dyn TextMeasure) {}
    }

    impl OptionItem for Item {
        fn is_selected(&self) -> bool {
            self.selected
        }
        fn set_selected(&mut self, selected: bool) {
            self.selected = selected;
        }
    }

    const M: MonospaceMeasure = MonospaceMeasure;

    fn list_of(n: usize, height: i32, view_h: i32) -> SelectionContainer {
        let mut list = SelectionContainer::list();
        list.set_bounds(Rect::new(0, 0, 20, view_h), &M);
        for _ in 0..n {
            list.add_option(Item::boxed(height), &M);
        }
        list
    }

    fn selected_count(c: &SelectionContainer) -> usize {
        c.options().filter(|o| o.is_selected()).count()
    }

    fn press(b: Button) -> InputState {
        InputState::new().with_pressed(b)
    }

    #[test]
    fn first_option_is_selected_on_add() {
        let list = list_of(3, 1, 10);
        assert_eq!(list.selected_index(), Some(0));
        assert_eq!(selected_count(&list), 1);
        let ys: Vec<i32> = list.options().map(|o| o.bounds().y).collect();
        assert_eq!(ys, vec![0, 1, 2]);
    }

    #[test]
    fn list_moves_wrap_and_jumps_clamp() {
        let mut list = list_of(10, 1, 20);
        list.handle_input(&press(Button::Up), &M);
        assert_eq!(list.selected_index(), Some(9));
        list.handle_input(&press(Button::Down), &M);
        assert_eq!(list.selected_index(), Some(0));

        list.handle_input(&press(Button::JumpUp), &M);
        assert_eq!(list.selected_index(), Some(0));
        list.handle_input(&press(Button::JumpDown), &M);
        assert_eq!(list.selected_index(), Some(8));
        list.handle_input(&press(Button::JumpDown), &M);
        assert_eq!(list.selected_index(), Some(9));
        list.handle_input(&press(Button::JumpUp), &M);
        assert_eq!(list.selected_index(), Some(1));
        assert_eq!(selected_count(&list), 1);
    }

    #[test]
    fn select_emits_unselect_before_select() {
        let mut list = list_of(3, 1, 10);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        list.subscribe(move |e| s.borrow_mut().push(*e));
        assert!(list.select(2));
        assert!(!list.select(2));
        assert!(!list.select(7));
        assert_eq!(
            *seen.borrow(),
            vec![SelectionEvent::Unselected(0), SelectionEvent::Selected(2)]
        );
    }

    #[test]
    fn removing_selected_lands_on_previous() {
        let mut list = list_of(4, 1, 10);
        list.select(2);
        let id = list.option(2).unwrap().id();
        list.remove_option(id, &M).unwrap();
        assert_eq!(list.selected_index(), Some(1));
        assert!(list.option(1).unwrap().is_selected());
        assert_eq!(selected_count(&list), 1);

        list.select(0);
        let first = list.option(0).unwrap().id();
        list.remove_option(first, &M);
        assert_eq!(list.selected_index(), Some(0));
        assert_eq!(selected_count(&list), 1);
    }

    #[test]
    fn removing_earlier_option_keeps_index_value() {
        let mut list = list_of(4, 1, 10);
        list.select(2);
        let third = list.option(3).unwrap().id();
        list.remove_option_at(0, &M);
        assert_eq!(list.selected_index(), Some(2));
        assert_eq!(list.option(2).unwrap().id(), third);
        assert_eq!(selected_count(&list), 1);
    }

    #[test]
    fn removing_last_option_empties() {
        let mut list = list_of(1, 1, 10);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        list.subscribe(move |e| s.borrow_mut().push(*e));
        list.remove_option_at(0, &M);
        assert!(list.is_empty());
        assert_eq!(list.selected_index(), None);
        assert_eq!(seen.borrow().last(), Some(&SelectionEvent::Emptied));
        assert!(!list.handle_input(&press(Button::Down), &M));
    }

    #[test]
    fn gallery_vertical_moves_do_not_wrap() {
        let mut gallery = SelectionContainer::gallery(Columns::Fixed(3));
        gallery.set_bounds(Rect::new(0, 0, 30, 30), &M);
        for _ in 0..10 {
            gallery.add_option(Item::boxed(2), &M);
        }
        gallery.select(8);
        let seen = Rc::new(RefCell::new(0));
        let s = Rc::clone(&seen);
        gallery.subscribe(move |_| *s.borrow_mut() += 1);

        assert!(!gallery.handle_input(&press(Button::Down), &M));
        assert_eq!(gallery.selected_index(), Some(8));
        assert_eq!(*seen.borrow(), 0);

        assert!(gallery.handle_input(&press(Button::Up), &M));
        assert_eq!(gallery.selected_index(), Some(5));
        gallery.select(9);
        gallery.handle_input(&press(Button::Right), &M);
        assert_eq!(gallery.selected_index(), Some(0));
        gallery.handle_input(&press(Button::Left), &M);
        assert_eq!(gallery.selected_index(), Some(9));
    }

    #[test]
    fn gallery_places_cells_in_rows() {
        let mut gallery = SelectionContainer::gallery(Columns::Fixed(3));
        gallery.set_bounds(Rect::new(0, 0, 30, 30), &M);
        for _ in 0..4 {
            gallery.add_option(Item::boxed(2), &M);
        }
        let cells: Vec<Rect> = gallery.options().map(|o| o.bounds()).collect();
        assert_eq!(cells[0], Rect::new(0, 0, 10, 2));
        assert_eq!(cells[2], Rect::new(20, 0, 10, 2));
        assert_eq!(cells[3], Rect::new(0, 2, 10, 2));
    }

    #[test]
    fn wrapped_gallery_fits_columns_to_viewport() {
        let mut gallery = SelectionContainer::gallery(Columns::Wrap);
        gallery.set_bounds(Rect::new(0, 0, 10, 10), &M);
        for _ in 0..5 {
            gallery.add_option(Item::boxed(1), &M);
        }
        // options are 3 wide: three fit in 10
        assert_eq!(gallery.option(3).unwrap().bounds().y, 1);
    }

    #[test]
    fn scroll_follow_is_damped_and_converges() {
        let mut list = list_of(20, 1, 5);
        list.select(19);
        let mut prev = list.selected_option().unwrap().bounds().bottom() - 5;
        assert!(prev > 0);
        let mut frames = 0;
        while prev > 0 {
            list.scroll_options(&M);
            let overflow = list.selected_option().unwrap().bounds().bottom() - 5;
            assert!(overflow < prev);
            prev = overflow;
            frames += 1;
        }
        assert!(frames > 1);
        assert_eq!(list.scroll_options(&M), 0);
    }

    #[test]
    fn scroll_follow_upwards_shifts_down() {
        let mut list = list_of(20, 1, 5);
        list.select(19);
        for _ in 0..10 {
            list.scroll_options(&M);
        }
        list.select(0);
        let shift = list.scroll_options(&M);
        assert!(shift > 0);
        assert_eq!(list.scroll_offset(), list.option(0).unwrap().bounds().y);
    }

    #[test]
    fn restyle_relays_out_options() {
        let mut list = list_of(3, 1, 12);
        list.set_style(
            &StyleBundle::new().with(|v| v.padding = Padding::uniform(1)),
            &M,
        );
        let view = list.viewport(&M);
        assert_eq!(view, Rect::new(1, 1, 18, 10));
        let rects: Vec<Rect> = list.options().map(|o| o.bounds()).collect();
        assert_eq!(rects[0], Rect::new(0, 0, 18, 3));
        for pair in rects.windows(2) {
            assert!(pair[0].bottom() <= pair[1].top(), "{pair:?}");
        }
        assert!(rects.iter().all(|r| r.width == view.width));
    }

    #[test]
    fn restyled_wrap_gallery_recounts_columns() {
        let mut gallery = SelectionContainer::gallery(Columns::Wrap);
        gallery.set_bounds(Rect::new(0, 0, 10, 10), &M);
        for _ in 0..5 {
            gallery.add_option(Item::boxed(1), &M);
        }
        assert_eq!(gallery.option(3).unwrap().bounds().y, 1);
        gallery.set_style(
            &StyleBundle::new().with(|v| v.spacing.horizontal = 1),
            &M,
        );
        // 3 wide plus a gap of 1: only two fit in 10
        assert_eq!(gallery.option(2).unwrap().bounds().y, 1);
    }

    #[test]
    fn negative_gap_cannot_zero_the_column_divisor() {
        let mut gallery = SelectionContainer::gallery(Columns::Wrap);
        gallery.set_bounds(Rect::new(0, 0, 10, 10), &M);
        for _ in 0..5 {
            gallery.add_option(Item::boxed(1), &M);
        }
        gallery.set_style(
            &StyleBundle::new().with(|v| v.spacing.horizontal = -3),
            &M,
        );
        assert!(gallery.handle_input(&press(Button::Right), &M));
        assert_eq!(gallery.selected_index(), Some(1));
        assert!(gallery.options().all(|o| o.bounds().width >= 0));
    }

    #[test]
    fn scroll_follow_settles_in_a_zero_height_viewport() {
        let mut list = list_of(1, 1, 0);
        let shifts: Vec<i32> = (0..6).map(|_| list.scroll_options(&M)).collect();
        assert_eq!(shifts, vec![0; 6]);
        assert_eq!(list.option(0).unwrap().bounds().y, 0);
    }

    #[test]
    fn scroll_follow_top_aligns_options_taller_than_the_viewport() {
        let mut list = list_of(3, 3, 2);
        list.select(1);
        let shifts: Vec<i32> = (0..6).map(|_| list.scroll_options(&M)).collect();
        assert_eq!(shifts, vec![-2, -1, 0, 0, 0, 0]);
        assert_eq!(list.selected_option().unwrap().bounds().y, 0);

        list.select(0);
        let shifts: Vec<i32> = (0..6).map(|_| list.scroll_options(&M)).collect();
        assert!(shifts.iter().all(|&s| s >= 0));
        assert_eq!(list.selected_option().unwrap().bounds().y, 0);
        assert_eq!(list.scroll_options(&M), 0);
    }

    #[test]
    fn panel_requires_attachment() {
        let mut list = list_of(2, 1, 5);
        let mut pool = SurfacePool::new();
        let err = list.create_option_panel(&mut pool, &M).unwrap_err();
        assert!(matches!(err, UiError::NotAttached { .. }));
        assert!(list.panel().is_none());

        list.base_mut().attach(ManagerId::next()).unwrap();
        list.create_option_panel(&mut pool, &M).unwrap();
        assert_eq!(list.panel().unwrap().size(), Size::new(20, 5));
    }

    #[test]
    fn cascade_respects_own_styles_unless_forced() {
        let mut list = SelectionContainer::list();
        list.set_style(&StyleBundle::new(), &M);
        list.add_option(Item::boxed(1), &M);

        let mut own = Item::boxed(1);
        let custom = StyleBundle::new().with(|v| v.close_on_cancel = true);
        own.set_style(&custom, &M);
        list.add_option(own, &M);

        let restyled = StyleBundle::new().with(|v| v.spacing.vertical = 2);
        list.set_style(&restyled, &M);
        assert_eq!(list.option(0).unwrap().base().style().spacing.vertical, 2);
        assert_eq!(list.option(1).unwrap().base().style().spacing.vertical, 0);
        assert!(list.option(1).unwrap().base().style().close_on_cancel);

        list.cascade_style(true, &M);
        assert_eq!(list.option(1).unwrap().base().style().spacing.vertical, 2);
    }
}
