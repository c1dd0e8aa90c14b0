//! The manager: modal stack plus popup queue.
//!
//! A [`Manager`] owns every open component.  Controls sit on a LIFO stack and
//! only the top one updates; popups sit in a FIFO queue and only the front one
//! runs unless run-all mode is on.
//!
//! Components never mutate these collections directly.  Closing or opening
//! from inside an update is recorded on the [`FrameContext`] and applied once
//! the pass is over, so nothing is removed from under the iteration.

use std::collections::VecDeque;

use super::component::{
    close_component, open_component, AttachContext, Component, ComponentId, Control,
    FrameContext, ManagerId, PopUp, PopupMode, Request,
};
use super::error::{Rejected, Result, UiError};
use super::input::InputState;
use super::render::{DrawSink, MonospaceMeasure, SurfacePool, SurfaceProvider, TextMeasure};
use super::style::{Color, StyleBundle};

/// Result of a name lookup.
pub enum Found<'a> {
    Control(&'a dyn Control),
    PopUp(&'a dyn PopUp),
}

impl Found<'_> {
    pub fn id(&self) -> ComponentId {
        match self {
            Found::Control(c) => c.id(),
            Found::PopUp(p) => p.id(),
        }
    }

    pub fn as_any(&self) -> &dyn std::any::Any {
        match self {
            Found::Control(c) => c.as_any(),
            Found::PopUp(p) => p.as_any(),
        }
    }
}

pub struct Manager {
    id: ManagerId,
    /// Bottom first, top last.
    controls: Vec<Box<dyn Control>>,
    /// Front first.
    popups: VecDeque<Box<dyn PopUp>>,
    global_style: StyleBundle,
    measure: Box<dyn TextMeasure>,
    surfaces: Box<dyn SurfaceProvider>,
    draw_all: bool,
    popup_mode: PopupMode,
    mask: Color,
}

impl Default for Manager {
    fn default() -> Self {
        Self::new(Box::new(MonospaceMeasure), Box::new(SurfacePool::new()))
    }
}

impl Manager {
    pub fn new(measure: Box<dyn TextMeasure>, surfaces: Box<dyn SurfaceProvider>) -> Self {
        Self {
            id: ManagerId::next(),
            controls: Vec::new(),
            popups: VecDeque::new(),
            global_style: StyleBundle::default(),
            measure,
            surfaces,
            draw_all: false,
            popup_mode: PopupMode::Focused,
            mask: Color::rgba(0, 0, 0, 160),
        }
    }

    // ── configuration ────────────────────────────────────────

    pub fn id(&self) -> ManagerId {
        self.id
    }

    pub fn measure(&self) -> &dyn TextMeasure {
        &*self.measure
    }

    pub fn global_style(&self) -> &StyleBundle {
        &self.global_style
    }

    /// Replace the default style given to components that open without one.
    /// Components already open keep the copy they got.
    pub fn set_global_style(&mut self, style: &StyleBundle) {
        self.global_style = style.clone();
    }

    pub fn draw_all(&self) -> bool {
        self.draw_all
    }

    /// Draw every stacked control, masking all but the top.  Only the top
    /// control updates either way.
    pub fn set_draw_all(&mut self, on: bool) {
        self.draw_all = on;
    }

    pub fn popup_mode(&self) -> PopupMode {
        self.popup_mode
    }

    pub fn set_run_all_popups(&mut self, on: bool) {
        self.popup_mode = if on {
            PopupMode::RunAll
        } else {
            PopupMode::Focused
        };
    }

    pub fn set_mask_color(&mut self, color: Color) {
        self.mask = color;
    }

    // ── registration ─────────────────────────────────────────

    /// Take ownership of `control` and push it on the modal stack.
    pub fn open_control(
        &mut self,
        mut control: Box<dyn Control>,
    ) -> std::result::Result<ComponentId, Rejected<dyn Control>> {
        let mut cx = AttachContext {
            manager: self.id,
            measure: &*self.measure,
            surfaces: &mut *self.surfaces,
        };
        if let Err(error) = open_component(&mut *control, &mut cx, &self.global_style) {
            return Err(Rejected {
                error,
                component: control,
            });
        }
        let id = control.id();
        tracing::debug!(component = %id, name = ?control.name(), depth = self.controls.len() + 1, "control opened");
        self.controls.push(control);
        Ok(id)
    }

    /// Take ownership of `popup` and enqueue it at the back.
    pub fn open_popup(
        &mut self,
        mut popup: Box<dyn PopUp>,
    ) -> std::result::Result<ComponentId, Rejected<dyn PopUp>> {
        let mut cx = AttachContext {
            manager: self.id,
            measure: &*self.measure,
            surfaces: &mut *self.surfaces,
        };
        if let Err(error) = open_component(&mut *popup, &mut cx, &self.global_style) {
            return Err(Rejected {
                error,
                component: popup,
            });
        }
        let id = popup.id();
        tracing::debug!(component = %id, name = ?popup.name(), queued = self.popups.len() + 1, "popup opened");
        self.popups.push_back(popup);
        Ok(id)
    }

    /// Remove a control from anywhere in the stack, keeping the others in
    /// order: pop down to it, then push the rest back.
    pub fn close_control(&mut self, id: ComponentId) -> Option<Box<dyn Control>> {
        let mut unwound = Vec::new();
        let mut found = None;
        while let Some(control) = self.controls.pop() {
            if control.id() == id {
                found = Some(control);
                break;
            }
            unwound.push(control);
        }
        while let Some(control) = unwound.pop() {
            self.controls.push(control);
        }
        let mut control = found?;
        close_component(&mut *control);
        tracing::debug!(component = %id, depth = self.controls.len(), "control closed");
        Some(control)
    }

    /// Remove a popup from the queue: one drain, re-enqueueing every other
    /// popup in order.
    pub fn close_popup(&mut self, id: ComponentId) -> Option<Box<dyn PopUp>> {
        let mut found = None;
        for popup in std::mem::take(&mut self.popups) {
            if found.is_none() && popup.id() == id {
                found = Some(popup);
            } else {
                self.popups.push_back(popup);
            }
        }
        let mut popup = found?;
        close_component(&mut *popup);
        tracing::debug!(component = %id, queued = self.popups.len(), "popup closed");
        Some(popup)
    }

    /// Close whichever control or popup has `id`.  Unknown or already closed
    /// ids are a no-op.
    pub fn close(&mut self, id: ComponentId) -> bool {
        if self.close_control(id).is_some() {
            return true;
        }
        self.close_popup(id).is_some()
    }

    fn apply(&mut self, requests: Vec<Request>) -> Result<()> {
        let mut first_error: Option<UiError> = None;
        for request in requests {
            let outcome = match request {
                Request::Close(id) => {
                    self.close(id);
                    Ok(())
                }
                Request::OpenControl(control) => self.open_control(control).map(|_| ()).map_err(UiError::from),
                Request::OpenPopup(popup) => self.open_popup(popup).map(|_| ()).map_err(UiError::from),
            };
            if let Err(err) = outcome {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    // ── frame ────────────────────────────────────────────────

    /// Run one frame's update pass: the top control, then the popups.
    pub fn update(&mut self, input: &InputState) -> Result<()> {
        let controls = self.update_controls(input);
        let popups = self.update_popups(input);
        controls.and(popups)
    }

    /// Update the top of the modal stack only.
    pub fn update_controls(&mut self, input: &InputState) -> Result<()> {
        let mut cx = FrameContext::new(input, &*self.measure, &mut *self.surfaces)
            .with_popup_mode(self.popup_mode);
        if let Some(top) = self.controls.last_mut() {
            cx.set_current(Some(top.id()));
            top.sync_style(cx.measure);
            top.base_mut().activate();
            top.step(&mut cx);
        }
        let requests = cx.take_requests();
        self.apply(requests)
    }

    /// Update the front popup, or in run-all mode every live popup.
    pub fn update_popups(&mut self, input: &InputState) -> Result<()> {
        let requests = match self.popup_mode {
            PopupMode::Focused => {
                let mut cx = FrameContext::new(input, &*self.measure, &mut *self.surfaces)
                    .with_popup_mode(PopupMode::Focused);
                if let Some(front) = self.popups.front_mut() {
                    cx.set_current(Some(front.id()));
                    front.sync_style(cx.measure);
                    front.base_mut().activate();
                    front.update(&mut cx);
                }
                cx.take_requests()
            }
            PopupMode::RunAll => {
                let mut cx = FrameContext::new(input, &*self.measure, &mut *self.surfaces)
                    .with_popup_mode(PopupMode::RunAll);
                let pending = std::mem::take(&mut self.popups);
                for mut popup in pending {
                    if popup.timeout() <= 0 {
                        close_component(&mut *popup);
                        tracing::debug!(component = %popup.id(), "expired popup culled");
                        continue;
                    }
                    cx.set_current(Some(popup.id()));
                    popup.sync_style(cx.measure);
                    popup.base_mut().activate();
                    popup.update(&mut cx);
                    popup.tick_timeout();
                    if cx.close_requested(popup.id()) {
                        close_component(&mut *popup);
                        tracing::debug!(component = %popup.id(), "popup closed");
                    } else {
                        self.popups.push_back(popup);
                    }
                }
                cx.take_requests()
            }
        };
        self.apply(requests)
    }

    /// Draw controls then popups.
    pub fn draw(&mut self, sink: &mut dyn DrawSink) {
        self.draw_controls(sink);
        self.draw_popups(sink);
    }

    /// The top control, or in draw-all mode every control bottom to top with
    /// a translucent mask over all but the top.
    pub fn draw_controls(&mut self, sink: &mut dyn DrawSink) {
        let measure = &*self.measure;
        if !self.draw_all {
            if let Some(top) = self.controls.last_mut() {
                top.draw(sink, measure);
            }
            return;
        }
        let top = self.controls.len().saturating_sub(1);
        for (i, control) in self.controls.iter_mut().enumerate() {
            control.draw(sink, measure);
            if i != top {
                sink.fill_rect(control.bounds(), self.mask);
            }
        }
    }

    /// The front popup, or in run-all mode every popup front to back.
    pub fn draw_popups(&mut self, sink: &mut dyn DrawSink) {
        let measure = &*self.measure;
        match self.popup_mode {
            PopupMode::Focused => {
                if let Some(front) = self.popups.front_mut() {
                    front.draw(sink, measure);
                }
            }
            PopupMode::RunAll => {
                for popup in self.popups.iter_mut() {
                    popup.draw(sink, measure);
                }
            }
        }
    }

    // ── queries ──────────────────────────────────────────────

    pub fn control_count(&self) -> usize {
        self.controls.len()
    }

    pub fn popup_count(&self) -> usize {
        self.popups.len()
    }

    pub fn is_idle(&self) -> bool {
        self.controls.is_empty() && self.popups.is_empty()
    }

    /// Stack contents, bottom to top.
    pub fn control_ids(&self) -> Vec<ComponentId> {
        self.controls.iter().map(|c| c.id()).collect()
    }

    /// Queue contents, front to back.
    pub fn popup_ids(&self) -> Vec<ComponentId> {
        self.popups.iter().map(|p| p.id()).collect()
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.controls.iter().any(|c| c.id() == id) || self.popups.iter().any(|p| p.id() == id)
    }

    pub fn top_control(&self) -> Option<&dyn Control> {
        self.controls.last().map(|c| c.as_ref())
    }

    pub fn front_popup(&self) -> Option<&dyn PopUp> {
        self.popups.front().map(|p| p.as_ref())
    }

    /// Visit every stacked control, bottom to top.  For relayout after the
    /// screen changes; structural changes are not possible from here.
    pub fn each_control_mut(&mut self, mut f: impl FnMut(&mut dyn Control, &dyn TextMeasure)) {
        let measure = &*self.measure;
        for control in self.controls.iter_mut() {
            f(&mut **control, measure);
        }
    }

    /// Visit every queued popup, front to back.
    pub fn each_popup_mut(&mut self, mut f: impl FnMut(&mut dyn PopUp, &dyn TextMeasure)) {
        let measure = &*self.measure;
        for popup in self.popups.iter_mut() {
            f(&mut **popup, measure);
        }
    }

    /// First component called `name`: the stack from the top down, then the
    /// queue from the front.
    pub fn find_by_name(&self, name: &str) -> Option<Found<'_>> {
        if let Some(c) = self.controls.iter().rev().find(|c| c.name() == Some(name)) {
            return Some(Found::Control(c.as_ref()));
        }
        self.popups
            .iter()
            .find(|p| p.name() == Some(name))
            .map(|p| Found::PopUp(p.as_ref()))
    }

    /// [`find_by_name`](Self::find_by_name), downcast to a concrete type.
    pub fn find_by_name_as<T: Component>(&self, name: &str) -> Option<&T> {
        match self.find_by_name(name)? {
            Found::Control(c) => c.as_any().downcast_ref(),
            Found::PopUp(p) => p.as_any().downcast_ref(),
        }
    }

    pub fn find_by_name_as_mut<T: Component>(&mut self, name: &str) -> Option<&mut T> {
        if let Some(c) = self.controls.iter_mut().rev().find(|c| c.name() == Some(name)) {
            return c.as_any_mut().downcast_mut();
        }
        self.popups
            .iter_mut()
            .find(|p| p.name() == Some(name))
            .and_then(|p| p.as_any_mut().downcast_mut())
    }
}
