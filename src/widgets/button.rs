//! Labelled push button.

use crate::component_base;
use crate::engine::component::{Component, ComponentBase, Control, FrameContext};
use crate::engine::events::{Observers, SubscriptionId};
use crate::engine::geometry::Size;
use crate::engine::render::{draw_frame, DrawSink, TextMeasure};

pub struct PushButton {
    base: ComponentBase,
    label: String,
    pressed: Observers<()>,
}

impl PushButton {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            base: ComponentBase::new(),
            label: label.into(),
            pressed: Observers::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.base.set_name(Some(name.into()));
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Change the label.  The minimum size follows the new text.
    pub fn set_label(&mut self, label: impl Into<String>, measure: &dyn TextMeasure) {
        self.label = label.into();
        self.refresh_bounds(measure);
    }

    /// Called every time the button is submitted.
    pub fn on_press<F: FnMut() + 'static>(&mut self, mut f: F) -> SubscriptionId {
        self.pressed.subscribe(move |_| f())
    }
}

impl Component for PushButton {
    component_base!(base);

    fn min_size(&self, measure: &dyn TextMeasure) -> Size {
        let style = self.base.style();
        style.padding.grow(measure.measure(&style.body.font, &self.label))
    }

    fn draw(&mut self, sink: &mut dyn DrawSink, measure: &dyn TextMeasure) {
        let style = self.base.style();
        let bounds = self.bounds();
        draw_frame(sink, bounds, style);
        super::draw_aligned(
            sink,
            measure,
            style.padding.shrink(bounds),
            &self.label,
            &style.body,
            style.body.color,
            style,
        );
    }
}

impl Control for PushButton {
    fn on_submit(&mut self, _cx: &mut FrameContext<'_>) {
        tracing::debug!(button = %self.id(), label = %self.label, "pressed");
        self.pressed.emit(&());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::{Button, InputState};
    use crate::engine::manager::Manager;
    use crate::engine::render::MonospaceMeasure;
    use crate::engine::style::{Padding, StyleBundle};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn minimum_follows_label_and_padding() {
        let mut b = PushButton::new("ok");
        b.set_style(
            &StyleBundle::new().with(|v| v.padding = Padding::uniform(1)),
            &MonospaceMeasure,
        );
        assert_eq!(b.bounds().size(), Size::new(4, 3));
        b.set_label("cancel", &MonospaceMeasure);
        assert_eq!(b.bounds().size(), Size::new(8, 3));
    }

    #[test]
    fn submit_fires_press_callbacks() {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let mut b = PushButton::new("go");
        b.on_press(move || c.set(c.get() + 1));

        let mut m = Manager::default();
        m.open_control(Box::new(b)).unwrap();
        m.update(&InputState::new().with_pressed(Button::Submit)).unwrap();
        m.update(&InputState::new()).unwrap();
        assert_eq!(count.get(), 1);
    }
}
