//! Plain text entry for lists and galleries.

use crate::component_base;
use crate::engine::component::{Component, ComponentBase};
use crate::engine::geometry::Size;
use crate::engine::render::{DrawSink, TextMeasure};
use crate::engine::selection::OptionItem;

pub struct TextOption {
    base: ComponentBase,
    label: String,
    selected: bool,
}

impl TextOption {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            base: ComponentBase::new(),
            label: label.into(),
            selected: false,
        }
    }

    pub fn boxed(label: impl Into<String>) -> Box<dyn OptionItem> {
        Box::new(Self::new(label))
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Component for TextOption {
    component_base!(base);

    fn min_size(&self, measure: &dyn TextMeasure) -> Size {
        let style = self.base.style();
        style.padding.grow(measure.measure(&style.body.font, &self.label))
    }

    fn draw(&mut self, sink: &mut dyn DrawSink, measure: &dyn TextMeasure) {
        let style = self.base.style();
        let color = if self.selected {
            style.selected_text
        } else {
            style.unselected_text
        };
        super::draw_aligned(
            sink,
            measure,
            style.padding.shrink(self.bounds()),
            &self.label,
            &style.body,
            color,
            style,
        );
    }
}

impl OptionItem for TextOption {
    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}
