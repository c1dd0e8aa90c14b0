//! Header / body / footer message box.

use crate::component_base;
use crate::engine::component::{Component, ComponentBase, Control, FrameContext};
use crate::engine::events::{Observers, SubscriptionId};
use crate::engine::geometry::{Rect, Size};
use crate::engine::render::{draw_frame, DrawSink, TextMeasure};
use crate::engine::style::FontRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogEvent {
    Accepted,
    Dismissed,
}

/// A modal message.  Submit accepts and closes it; cancel dismisses it and
/// closes it too when the style asks for close-on-cancel.
pub struct Dialog {
    base: ComponentBase,
    header: String,
    body: String,
    footer: String,
    events: Observers<DialogEvent>,
}

impl Dialog {
    pub fn new(header: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            base: ComponentBase::new(),
            header: header.into(),
            body: body.into(),
            footer: String::new(),
            events: Observers::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.base.set_name(Some(name.into()));
        self
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = footer.into();
        self
    }

    pub fn text(&self, role: FontRole) -> &str {
        match role {
            FontRole::Header => &self.header,
            FontRole::Body => &self.body,
            FontRole::Footer => &self.footer,
        }
    }

    pub fn set_text(&mut self, role: FontRole, text: impl Into<String>, measure: &dyn TextMeasure) {
        let slot = match role {
            FontRole::Header => &mut self.header,
            FontRole::Body => &mut self.body,
            FontRole::Footer => &mut self.footer,
        };
        *slot = text.into();
        self.refresh_bounds(measure);
    }

    pub fn subscribe<F: FnMut(&DialogEvent) + 'static>(&mut self, f: F) -> SubscriptionId {
        self.events.subscribe(f)
    }

    /// Non-empty sections with their measured sizes, top to bottom.
    fn sections(&self, measure: &dyn TextMeasure) -> Vec<(FontRole, Size)> {
        let style = self.base.style();
        [FontRole::Header, FontRole::Body, FontRole::Footer]
            .into_iter()
            .filter(|role| !self.text(*role).is_empty())
            .map(|role| (role, measure.measure(&style.font(role).font, self.text(role))))
            .collect()
    }
}

impl Component for Dialog {
    component_base!(base);

    fn min_size(&self, measure: &dyn TextMeasure) -> Size {
        let style = self.base.style();
        let sections = self.sections(measure);
        let gaps = sections.len().saturating_sub(1) as i32 * style.spacing.vertical;
        let content = sections.iter().fold(Size::new(0, gaps), |acc, (_, s)| {
            Size::new(acc.width.max(s.width), acc.height + s.height)
        });
        style.padding.grow(content)
    }

    fn draw(&mut self, sink: &mut dyn DrawSink, measure: &dyn TextMeasure) {
        let style = self.base.style();
        let bounds = self.bounds();
        draw_frame(sink, bounds, style);
        let inner = style.padding.shrink(bounds);
        let mut y = inner.y;
        for (role, size) in self.sections(measure) {
            let row = Rect::new(inner.x, y, inner.width, size.height);
            let font = style.font(role);
            super::draw_aligned(sink, measure, row, self.text(role), font, font.color, style);
            y += size.height + style.spacing.vertical;
        }
    }
}

impl Control for Dialog {
    fn on_submit(&mut self, cx: &mut FrameContext<'_>) {
        self.events.emit(&DialogEvent::Accepted);
        cx.close();
    }

    fn on_cancel(&mut self, _cx: &mut FrameContext<'_>) {
        self.events.emit(&DialogEvent::Dismissed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::{Button, InputState};
    use crate::engine::manager::Manager;
    use crate::engine::render::MonospaceMeasure;
    use crate::engine::style::{Padding, Spacing, StyleBundle};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn minimum_stacks_sections_with_spacing() {
        let mut d = Dialog::new("Title", "a longer body").with_footer("ok");
        let style = StyleBundle::new().with(|v| {
            v.padding = Padding::uniform(1);
            v.spacing = Spacing {
                vertical: 1,
                horizontal: 0,
            };
        });
        d.set_style(&style, &MonospaceMeasure);
        assert_eq!(d.bounds().size(), Size::new(15, 7));
    }

    #[test]
    fn submit_accepts_and_closes() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let mut d = Dialog::new("Quit?", "Unsaved work will be lost");
        d.subscribe(move |e| s.borrow_mut().push(*e));

        let mut m = Manager::default();
        m.open_control(Box::new(d)).unwrap();
        m.update(&InputState::new().with_pressed(Button::Cancel)).unwrap();
        assert_eq!(m.control_count(), 1);
        m.update(&InputState::new().with_pressed(Button::Submit)).unwrap();
        assert_eq!(m.control_count(), 0);
        assert_eq!(
            *seen.borrow(),
            vec![DialogEvent::Dismissed, DialogEvent::Accepted]
        );
    }
}
