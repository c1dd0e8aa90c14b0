//! Single-line editable text.

use crate::component_base;
use crate::engine::component::{Component, ComponentBase, Control, FrameContext};
use crate::engine::events::{Observers, SubscriptionId};
use crate::engine::geometry::Size;
use crate::engine::input::Button;
use crate::engine::render::{draw_frame, DrawSink, TextMeasure};

const CURSOR: char = '_';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextEntryEvent {
    Changed(String),
    Submitted(String),
}

pub struct TextEntry {
    base: ComponentBase,
    prompt: String,
    text: String,
    max_len: usize,
    events: Observers<TextEntryEvent>,
}

impl TextEntry {
    pub fn new(max_len: usize) -> Self {
        Self {
            base: ComponentBase::new(),
            prompt: String::new(),
            text: String::new(),
            max_len,
            events: Observers::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.base.set_name(Some(name.into()));
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Replace the contents, truncated to the maximum length.
    pub fn set_text(&mut self, text: &str, measure: &dyn TextMeasure) {
        self.text = text.chars().take(self.max_len).collect();
        self.refresh_bounds(measure);
    }

    pub fn subscribe<F: FnMut(&TextEntryEvent) + 'static>(&mut self, f: F) -> SubscriptionId {
        self.events.subscribe(f)
    }

    fn line(&self) -> String {
        let mut line = String::with_capacity(self.prompt.len() + self.text.len() + 1);
        line.push_str(&self.prompt);
        line.push_str(&self.text);
        line.push(CURSOR);
        line
    }

    /// Apply typed characters and backspace.  Returns whether the text changed.
    fn edit(&mut self, typed: &str, backspace: bool) -> bool {
        let before = self.text.chars().count();
        let mut changed = false;
        if backspace {
            changed |= self.text.pop().is_some();
        }
        let room = self.max_len.saturating_sub(before - usize::from(changed));
        for c in typed.chars().filter(|c| !c.is_control()).take(room) {
            self.text.push(c);
            changed = true;
        }
        changed
    }
}

impl Component for TextEntry {
    component_base!(base);

    fn min_size(&self, measure: &dyn TextMeasure) -> Size {
        let style = self.base.style();
        style.padding.grow(measure.measure(&style.body.font, &self.line()))
    }

    fn update(&mut self, cx: &mut FrameContext<'_>) {
        if self.edit(cx.input.typed(), cx.input.pressed(Button::Backspace)) {
            self.refresh_bounds(cx.measure);
            self.events.emit(&TextEntryEvent::Changed(self.text.clone()));
        }
    }

    fn draw(&mut self, sink: &mut dyn DrawSink, measure: &dyn TextMeasure) {
        let style = self.base.style();
        let bounds = self.bounds();
        draw_frame(sink, bounds, style);
        super::draw_aligned(
            sink,
            measure,
            style.padding.shrink(bounds),
            &self.line(),
            &style.body,
            style.selected_text,
            style,
        );
    }
}

impl Control for TextEntry {
    fn on_submit(&mut self, _cx: &mut FrameContext<'_>) {
        self.events.emit(&TextEntryEvent::Submitted(self.text.clone()));
    }
}
