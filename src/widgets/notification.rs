//! Transient message popup.

use crate::component_base;
use crate::engine::component::{Component, ComponentBase, FrameContext, PopUp};
use crate::engine::geometry::Size;
use crate::engine::render::{DrawSink, TextMeasure};
use crate::engine::style::Color;

/// Frames over which a notification fades out before closing.
pub const DEFAULT_FADE_FRAMES: i32 = 10;

/// Shows a message for a number of frames, fades over the last few and
/// closes itself when the countdown reaches zero.
pub struct Notification {
    base: ComponentBase,
    message: String,
    timeout: i32,
    fade_frames: i32,
}

impl Notification {
    pub fn new(message: impl Into<String>, frames: i32) -> Self {
        Self {
            base: ComponentBase::new(),
            message: message.into(),
            timeout: frames.max(0),
            fade_frames: DEFAULT_FADE_FRAMES,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.base.set_name(Some(name.into()));
        self
    }

    pub fn with_fade(mut self, frames: i32) -> Self {
        self.fade_frames = frames.max(0);
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Opacity for this frame, 255 until the fade window starts.
    pub fn opacity(&self) -> u8 {
        if self.fade_frames == 0 || self.timeout >= self.fade_frames {
            return 255;
        }
        (255 * self.timeout.max(0) / self.fade_frames) as u8
    }
}

impl Component for Notification {
    component_base!(base);

    fn min_size(&self, measure: &dyn TextMeasure) -> Size {
        let style = self.base.style();
        style.padding.grow(measure.measure(&style.body.font, &self.message))
    }

    fn update(&mut self, cx: &mut FrameContext<'_>) {
        if cx.popup_counts_itself() {
            self.tick_timeout();
        }
        if self.timeout == 0 {
            cx.close();
        }
    }

    fn draw(&mut self, sink: &mut dyn DrawSink, measure: &dyn TextMeasure) {
        let style = self.base.style();
        let bounds = self.bounds();
        let alpha = self.opacity();
        let fade = |c: Color| c.with_alpha((u16::from(c.a) * u16::from(alpha) / 255) as u8);
        sink.fill_rect(bounds, fade(style.background_color));
        super::draw_aligned(
            sink,
            measure,
            style.padding.shrink(bounds),
            &self.message,
            &style.body,
            fade(style.body.color),
            style,
        );
    }
}

impl PopUp for Notification {
    fn timeout(&self) -> i32 {
        self.timeout
    }

    fn set_timeout(&mut self, frames: i32) {
        self.timeout = frames;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::InputState;
    use crate::engine::manager::Manager;

    #[test]
    fn closes_itself_when_focused_countdown_ends() {
        let mut m = Manager::default();
        m.open_popup(Box::new(Notification::new("saved", 3))).unwrap();
        m.update(&InputState::new()).unwrap();
        m.update(&InputState::new()).unwrap();
        assert_eq!(m.popup_count(), 1);
        m.update(&InputState::new()).unwrap();
        assert_eq!(m.popup_count(), 0);
    }

    #[test]
    fn run_all_lets_the_scheduler_count() {
        let mut m = Manager::default();
        m.set_run_all_popups(true);
        m.open_popup(Box::new(Notification::new("a", 1).named("a"))).unwrap();
        m.open_popup(Box::new(Notification::new("b", 4).named("b"))).unwrap();
        m.update(&InputState::new()).unwrap();
        assert_eq!(m.find_by_name_as::<Notification>("b").unwrap().timeout(), 3);
        m.update(&InputState::new()).unwrap();
        assert!(m.find_by_name("a").is_none());
        assert_eq!(m.popup_count(), 1);
    }

    #[test]
    fn fades_over_the_last_frames() {
        let mut n = Notification::new("x", 20).with_fade(4);
        assert_eq!(n.opacity(), 255);
        n.set_timeout(2);
        assert_eq!(n.opacity(), 127);
        n.set_timeout(0);
        assert_eq!(n.opacity(), 0);
    }

    #[test]
    fn overdue_timeout_stays_transparent() {
        let mut n = Notification::new("x", 20).with_fade(4);
        n.set_timeout(-3);
        assert_eq!(n.timeout(), -3);
        assert_eq!(n.opacity(), 0);
    }
}
