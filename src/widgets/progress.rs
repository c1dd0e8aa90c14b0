//! Horizontal progress bar.

use crate::component_base;
use crate::engine::component::{Component, ComponentBase, Control};
use crate::engine::geometry::{Rect, Size};
use crate::engine::render::{draw_frame, DrawSink, TextMeasure};

pub struct ProgressBar {
    base: ComponentBase,
    value: u64,
    maximum: u64,
}

impl ProgressBar {
    pub fn new(maximum: u64) -> Self {
        Self {
            base: ComponentBase::new(),
            value: 0,
            maximum,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.base.set_name(Some(name.into()));
        self
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn maximum(&self) -> u64 {
        self.maximum
    }

    pub fn set_value(&mut self, value: u64) {
        self.value = value.min(self.maximum);
    }

    pub fn set_maximum(&mut self, maximum: u64) {
        self.maximum = maximum;
        self.value = self.value.min(maximum);
    }

    /// Completion in `[0, 1]`.  An empty range counts as complete.
    pub fn fraction(&self) -> f64 {
        if self.maximum == 0 {
            return 1.0;
        }
        (self.value as f64 / self.maximum as f64).clamp(0.0, 1.0)
    }

    fn label(&self) -> String {
        format!("{:>3}%", (self.fraction() * 100.0).round() as u32)
    }
}

impl Component for ProgressBar {
    component_base!(base);

    fn min_size(&self, measure: &dyn TextMeasure) -> Size {
        let style = self.base.style();
        style.padding.grow(measure.measure(&style.body.font, &self.label()))
    }

    fn draw(&mut self, sink: &mut dyn DrawSink, measure: &dyn TextMeasure) {
        let style = self.base.style();
        let bounds = self.bounds();
        draw_frame(sink, bounds, style);
        let inner = style.padding.shrink(bounds);
        let filled = (f64::from(inner.width) * self.fraction()).round() as i32;
        if filled > 0 {
            sink.fill_rect(
                Rect::new(inner.x, inner.y, filled, inner.height),
                style.selected_text,
            );
        }
        super::draw_aligned(
            sink,
            measure,
            inner,
            &self.label(),
            &style.body,
            style.body.color,
            style,
        );
    }
}

impl Control for ProgressBar {}
