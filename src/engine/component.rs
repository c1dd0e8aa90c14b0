//! Component / Control / PopUp taxonomy and lifecycle.
//!
//! Lifecycle: `Unattached → Opened → Active → Closed`.  A component is
//! registered with at most one manager for its lifetime; the manager owns it
//! through its stack or queue and the component only keeps a [`ManagerId`]
//! back-reference.
//!
//! Hooks (`on_opened`, `on_style_set`, `on_resized`, `on_moved`,
//! `on_closed`) are trait methods with empty defaults.  External observers
//! subscribe to [`ComponentEvent`]s on the [`ComponentBase`].

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use super::error::{Result, UiError};
use super::events::{Observers, SubscriptionId};
use super::geometry::{Geometry, GeometryChange, Rect, Size};
use super::input::InputState;
use super::render::{DrawSink, SurfaceProvider, TextMeasure};
use super::style::StyleBundle;

// ───────────────────────────────────────── identity ──────────

static NEXT_COMPONENT_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_MANAGER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique component identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u64);

impl ComponentId {
    pub fn next() -> Self {
        Self(NEXT_COMPONENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Non-owning handle to a manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ManagerId(u64);

impl ManagerId {
    pub fn next() -> Self {
        Self(NEXT_MANAGER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ManagerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

// ───────────────────────────────────────── lifecycle ─────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Unattached,
    Opened,
    Active,
    Closed,
}

/// Notifications raised on a component, in the order they happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentEvent {
    Opened,
    StyleSet,
    Resized(Rect),
    Moved(Rect),
    Closed,
}

// ───────────────────────────────────────── base ──────────────

fn fallback_style() -> &'static StyleBundle {
    static FALLBACK: OnceLock<StyleBundle> = OnceLock::new();
    FALLBACK.get_or_init(StyleBundle::default)
}

/// State shared by every component: identity, owner handle, geometry, style
/// and observers.
#[derive(Debug)]
pub struct ComponentBase {
    id: ComponentId,
    name: Option<String>,
    owner: Option<ManagerId>,
    lifecycle: Lifecycle,
    geometry: Geometry,
    style: Option<StyleBundle>,
    events: Observers<ComponentEvent>,
}

impl Default for ComponentBase {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentBase {
    pub fn new() -> Self {
        Self {
            id: ComponentId::next(),
            name: None,
            owner: None,
            lifecycle: Lifecycle::Unattached,
            geometry: Geometry::default(),
            style: None,
            events: Observers::new(),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        let mut base = Self::new();
        base.name = Some(name.into());
        base
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn owner(&self) -> Option<ManagerId> {
        self.owner
    }

    pub fn is_attached(&self) -> bool {
        self.owner.is_some()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn bounds(&self) -> Rect {
        self.geometry.bounds()
    }

    pub fn has_style(&self) -> bool {
        self.style.is_some()
    }

    /// The component's own style, or the library default when none has been
    /// assigned yet.
    pub fn style(&self) -> &StyleBundle {
        self.style.as_ref().unwrap_or_else(|| fallback_style())
    }

    /// Mutable access to the component's own style.  Edits mark it changed;
    /// the change is picked up by [`Component::sync_style`].
    pub fn style_mut(&mut self) -> Option<&mut StyleBundle> {
        self.style.as_mut()
    }

    pub fn subscribe<F: FnMut(&ComponentEvent) + 'static>(&mut self, f: F) -> SubscriptionId {
        self.events.subscribe(f)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    pub(crate) fn emit(&mut self, event: ComponentEvent) {
        self.events.emit(&event);
    }

    /// Returns whether the style changed since last asked, and clears the flag.
    fn take_style_change(&mut self) -> bool {
        match self.style.as_mut() {
            Some(style) if style.is_changed() => {
                style.accept_changes();
                true
            }
            _ => false,
        }
    }

    /// Bind to `manager`.  Fails without touching the owner if another
    /// manager already owns this component.
    pub(crate) fn attach(&mut self, manager: ManagerId) -> Result<()> {
        if let Some(owner) = self.owner {
            if owner != manager {
                tracing::warn!(component = %self.id, %owner, requested = %manager, "ownership conflict");
                return Err(UiError::OwnershipConflict {
                    component: self.id,
                    owner,
                    requested: manager,
                });
            }
        }
        if self.lifecycle == Lifecycle::Closed {
            return Err(UiError::AlreadyClosed { component: self.id });
        }
        self.owner = Some(manager);
        self.lifecycle = Lifecycle::Opened;
        Ok(())
    }

    /// Undo an [`attach`](Self::attach) whose opening did not complete.
    pub(crate) fn detach(&mut self) {
        self.owner = None;
        self.lifecycle = Lifecycle::Unattached;
    }

    pub(crate) fn activate(&mut self) {
        if self.lifecycle == Lifecycle::Opened {
            self.lifecycle = Lifecycle::Active;
        }
    }

    pub(crate) fn mark_closed(&mut self) {
        self.lifecycle = Lifecycle::Closed;
    }
}

// ───────────────────────────────────────── contexts ──────────

/// How popup countdowns are driven this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopupMode {
    /// Only the front popup runs and it counts its own timeout down.
    #[default]
    Focused,
    /// Every live popup runs and the scheduler counts timeouts down.
    RunAll,
}

/// Structural change requested during an update pass.  Applied by the manager
/// once the pass is over.
pub(crate) enum Request {
    Close(ComponentId),
    OpenControl(Box<dyn Control>),
    OpenPopup(Box<dyn PopUp>),
}

/// Everything a component sees while it updates.
pub struct FrameContext<'a> {
    pub input: &'a InputState,
    pub measure: &'a dyn TextMeasure,
    surfaces: &'a mut dyn SurfaceProvider,
    popup_mode: PopupMode,
    current: Option<ComponentId>,
    requests: Vec<Request>,
}

impl<'a> FrameContext<'a> {
    pub fn new(
        input: &'a InputState,
        measure: &'a dyn TextMeasure,
        surfaces: &'a mut dyn SurfaceProvider,
    ) -> Self {
        Self {
            input,
            measure,
            surfaces,
            popup_mode: PopupMode::Focused,
            current: None,
            requests: Vec::new(),
        }
    }

    pub(crate) fn with_popup_mode(mut self, mode: PopupMode) -> Self {
        self.popup_mode = mode;
        self
    }

    pub fn surfaces(&mut self) -> &mut dyn SurfaceProvider {
        &mut *self.surfaces
    }

    /// `true` when a popup must count its own timeout down this frame.
    pub fn popup_counts_itself(&self) -> bool {
        self.popup_mode == PopupMode::Focused
    }

    /// Ask the owning manager to close the component currently updating.
    /// Repeated requests in one pass collapse into one.
    pub fn close(&mut self) {
        if let Some(id) = self.current {
            self.close_component(id);
        }
    }

    pub fn close_component(&mut self, id: ComponentId) {
        let already = self
            .requests
            .iter()
            .any(|r| matches!(r, Request::Close(existing) if *existing == id));
        if !already {
            self.requests.push(Request::Close(id));
        }
    }

    pub fn open_control(&mut self, control: Box<dyn Control>) {
        self.requests.push(Request::OpenControl(control));
    }

    pub fn open_popup(&mut self, popup: Box<dyn PopUp>) {
        self.requests.push(Request::OpenPopup(popup));
    }

    /// Whether a close has been requested for `id` during this pass.
    pub fn close_requested(&self, id: ComponentId) -> bool {
        self.requests
            .iter()
            .any(|r| matches!(r, Request::Close(existing) if *existing == id))
    }

    pub(crate) fn set_current(&mut self, id: Option<ComponentId>) {
        self.current = id;
    }

    pub(crate) fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.requests)
    }
}

/// Manager-dependent capabilities handed to `on_opened`.
pub struct AttachContext<'a> {
    pub manager: ManagerId,
    pub measure: &'a dyn TextMeasure,
    pub surfaces: &'a mut dyn SurfaceProvider,
}

// ───────────────────────────────────────── traits ────────────

/// Implements the identity accessors of [`Component`] for a struct that
/// stores its [`ComponentBase`] in `$field`.
#[macro_export]
macro_rules! component_base {
    ($field:ident) => {
        fn base(&self) -> &$crate::engine::component::ComponentBase {
            &self.$field
        }
        fn base_mut(&mut self) -> &mut $crate::engine::component::ComponentBase {
            &mut self.$field
        }
        fn as_any(&self) -> &dyn ::std::any::Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
            self
        }
    };
}

/// A single visual element with geometry and style.
pub trait Component: Any {
    fn base(&self) -> &ComponentBase;
    fn base_mut(&mut self) -> &mut ComponentBase;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Smallest size this component accepts right now.  May depend on
    /// content, so it is asked on every assignment rather than cached.
    fn min_size(&self, _measure: &dyn TextMeasure) -> Size {
        Size::ZERO
    }

    /// First-time setup that needs the manager (e.g. off-screen surfaces).
    fn on_opened(&mut self, _cx: &mut AttachContext<'_>) -> Result<()> {
        Ok(())
    }

    fn on_style_set(&mut self, _measure: &dyn TextMeasure) {}

    /// Size changed.  Must only touch derived state or children, never its
    /// own geometry.
    fn on_resized(&mut self, _measure: &dyn TextMeasure) {}

    /// Position changed.  Same restriction as `on_resized`.
    fn on_moved(&mut self, _measure: &dyn TextMeasure) {}

    fn on_closed(&mut self) {}

    fn update(&mut self, _cx: &mut FrameContext<'_>) {}

    fn draw(&mut self, sink: &mut dyn DrawSink, measure: &dyn TextMeasure);

    // ── provided ─────────────────────────────────────────────

    fn id(&self) -> ComponentId {
        self.base().id()
    }

    fn name(&self) -> Option<&str> {
        self.base().name()
    }

    fn bounds(&self) -> Rect {
        self.base().bounds()
    }

    /// Assign geometry, clamped to [`min_size`](Self::min_size), then
    /// dispatch Resize before Move.
    fn set_bounds(&mut self, rect: Rect, measure: &dyn TextMeasure) -> GeometryChange {
        let min = self.min_size(measure);
        let change = self.base_mut().geometry.assign(rect, min);
        if change.resized {
            self.on_resized(measure);
            let b = self.bounds();
            self.base_mut().emit(ComponentEvent::Resized(b));
        }
        if change.moved {
            self.on_moved(measure);
            let b = self.bounds();
            self.base_mut().emit(ComponentEvent::Moved(b));
        }
        change
    }

    fn set_position(&mut self, x: i32, y: i32, measure: &dyn TextMeasure) -> GeometryChange {
        let b = self.bounds();
        self.set_bounds(Rect::new(x, y, b.width, b.height), measure)
    }

    fn set_size(&mut self, width: i32, height: i32, measure: &dyn TextMeasure) -> GeometryChange {
        let b = self.bounds();
        self.set_bounds(Rect::new(b.x, b.y, width, height), measure)
    }

    /// Re-apply the current rectangle so a grown minimum takes effect.
    fn refresh_bounds(&mut self, measure: &dyn TextMeasure) -> GeometryChange {
        let b = self.bounds();
        self.set_bounds(b, measure)
    }

    /// Store a copy of `style`, never the original.
    fn set_style(&mut self, style: &StyleBundle, measure: &dyn TextMeasure) {
        self.base_mut().style = Some(style.clone());
        self.on_style_set(measure);
        self.base_mut().emit(ComponentEvent::StyleSet);
        self.refresh_bounds(measure);
    }

    /// Run the style hook if the stored style was edited since the last sync.
    fn sync_style(&mut self, measure: &dyn TextMeasure) -> bool {
        if !self.base_mut().take_style_change() {
            return false;
        }
        self.on_style_set(measure);
        self.base_mut().emit(ComponentEvent::StyleSet);
        self.refresh_bounds(measure);
        true
    }
}

/// A component that can hold focus and lives on the modal stack.
pub trait Control: Component {
    fn on_submit(&mut self, _cx: &mut FrameContext<'_>) {}

    fn on_cancel(&mut self, _cx: &mut FrameContext<'_>) {}

    /// One frame: `update`, then the submit/cancel bindings from the style.
    /// Cancel also closes when the style sets `close_on_cancel`.
    fn step(&mut self, cx: &mut FrameContext<'_>) {
        self.update(cx);
        let (submit, cancel, close_on_cancel) = {
            let s = self.base().style();
            (s.submit, s.cancel, s.close_on_cancel)
        };
        if cx.input.pressed(submit) {
            self.on_submit(cx);
        }
        if cx.input.pressed(cancel) {
            self.on_cancel(cx);
            if close_on_cancel {
                cx.close();
            }
        }
    }
}

/// A transient overlay with a frame countdown, kept in the popup queue.
///
/// Reaching zero is only a trigger: each popup decides whether that means
/// closing itself or just finishing a fade.
pub trait PopUp: Component {
    fn timeout(&self) -> i32;

    fn set_timeout(&mut self, frames: i32);

    /// Count down by one frame, never below zero.  Returns the new value.
    fn tick_timeout(&mut self) -> i32 {
        let next = (self.timeout() - 1).max(0);
        self.set_timeout(next);
        next
    }
}

/// Attach `component` to `manager`, default its style, and fire the opened
/// hook.  Shared by control and popup registration.
pub(crate) fn open_component<C: Component + ?Sized>(
    component: &mut C,
    cx: &mut AttachContext<'_>,
    global_style: &StyleBundle,
) -> Result<()> {
    component.base_mut().attach(cx.manager)?;
    if !component.base().has_style() {
        component.set_style(global_style, cx.measure);
    }
    if let Err(err) = component.on_opened(cx) {
        component.base_mut().detach();
        return Err(err);
    }
    component.base_mut().emit(ComponentEvent::Opened);
    Ok(())
}

/// Mark closed and fire the closed hook.
pub(crate) fn close_component<C: Component + ?Sized>(component: &mut C) {
    component.base_mut().mark_closed();
    component.on_closed();
    component.base_mut().emit(ComponentEvent::Closed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::render::{MonospaceMeasure, SurfacePool};
    use crate::engine::style::Padding;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        base: ComponentBase,
        min: Size,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Recorder {
        fn new(min: Size) -> (Self, Rc<RefCell<Vec<&'static str>>>) {
            let log = Rc::new(RefCell::new(Vec::new()));
            let recorder = Self {
                base: ComponentBase::named("recorder"),
                min,
                log: Rc::clone(&log),
            };
            (recorder, log)
        }
    }

    impl Component for Recorder {
        component_base!(base);

        fn min_size(&self, _m: &dyn TextMeasure) -> Size {
            self.min
        }
        fn on_style_set(&mut self, _m: &dyn TextMeasure) {
            self.log.borrow_mut().push("style");
        }
        fn on_resized(&mut self, _m: &dyn TextMeasure) {
            self.log.borrow_mut().push("resized");
        }
        fn on_moved(&mut self, _m: &dyn TextMeasure) {
            self.log.borrow_mut().push("moved");
        }
        fn draw(&mut self, _sink: &mut dyn DrawSink, _m: &dyn TextMeasure) {}
    }

    #[test]
    fn resize_fires_before_move() {
        let (mut p, log) = Recorder::new(Size::ZERO);
        let change = p.set_bounds(Rect::new(1, 1, 4, 4), &MonospaceMeasure);
        assert!(change.moved && change.resized);
        assert_eq!(*log.borrow(), vec!["resized", "moved"]);
    }

    #[test]
    fn observers_see_resize_then_move() {
        let (mut p, _) = Recorder::new(Size::new(3, 3));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        p.base_mut().subscribe(move |e| s.borrow_mut().push(*e));
        p.set_bounds(Rect::new(2, 0, 1, 1), &MonospaceMeasure);
        assert_eq!(
            *seen.borrow(),
            vec![
                ComponentEvent::Resized(Rect::new(2, 0, 3, 3)),
                ComponentEvent::Moved(Rect::new(2, 0, 3, 3)),
            ]
        );
    }

    #[test]
    fn grown_minimum_applies_on_refresh() {
        let (mut p, _) = Recorder::new(Size::new(2, 1));
        p.set_bounds(Rect::new(0, 0, 2, 1), &MonospaceMeasure);
        p.min = Size::new(8, 2);
        p.refresh_bounds(&MonospaceMeasure);
        assert_eq!(p.bounds(), Rect::new(0, 0, 8, 2));
    }

    #[test]
    fn set_style_stores_a_copy() {
        let (mut a, _) = Recorder::new(Size::ZERO);
        let (mut b, _) = Recorder::new(Size::ZERO);
        let shared = StyleBundle::new();
        a.set_style(&shared, &MonospaceMeasure);
        b.set_style(&shared, &MonospaceMeasure);

        a.base_mut().style_mut().unwrap().edit().padding = Padding::uniform(5);
        assert_eq!(a.base().style().padding, Padding::uniform(5));
        assert_eq!(b.base().style().padding, Padding::default());
        assert_eq!(shared.padding, Padding::default());
    }

    #[test]
    fn sync_style_runs_hook_only_after_edits() {
        let (mut p, log) = Recorder::new(Size::ZERO);
        p.set_style(&StyleBundle::new(), &MonospaceMeasure);
        log.borrow_mut().clear();

        assert!(!p.sync_style(&MonospaceMeasure));
        p.base_mut().style_mut().unwrap().edit().close_on_cancel = true;
        assert!(p.sync_style(&MonospaceMeasure));
        assert!(!p.sync_style(&MonospaceMeasure));
        assert_eq!(*log.borrow(), vec!["style"]);
    }

    #[test]
    fn attach_rejects_second_manager_and_keeps_owner() {
        let (mut p, _) = Recorder::new(Size::ZERO);
        let first = ManagerId::next();
        let second = ManagerId::next();
        p.base_mut().attach(first).unwrap();
        let err = p.base_mut().attach(second).unwrap_err();
        assert!(matches!(err, UiError::OwnershipConflict { owner, requested, .. }
            if owner == first && requested == second));
        assert_eq!(p.base().owner(), Some(first));
    }

    struct FailsToOpen {
        base: ComponentBase,
    }

    impl Component for FailsToOpen {
        component_base!(base);

        fn min_size(&self, _m: &dyn TextMeasure) -> Size {
            Size::ZERO
        }
        fn on_opened(&mut self, _cx: &mut AttachContext<'_>) -> Result<()> {
            Err(UiError::NotAttached {
                component: self.base.id(),
                operation: "open",
            })
        }
        fn draw(&mut self, _sink: &mut dyn DrawSink, _m: &dyn TextMeasure) {}
    }

    #[test]
    fn failed_open_leaves_component_unattached() {
        let mut c = FailsToOpen {
            base: ComponentBase::new(),
        };
        let mut pool = SurfacePool::new();
        let mut cx = AttachContext {
            manager: ManagerId::next(),
            measure: &MonospaceMeasure,
            surfaces: &mut pool,
        };
        let err = open_component(&mut c, &mut cx, &StyleBundle::new()).unwrap_err();
        assert!(matches!(err, UiError::NotAttached { .. }));
        assert_eq!(c.base().owner(), None);
        assert_eq!(c.base().lifecycle(), Lifecycle::Unattached);

        // Another manager can still take it.
        assert!(c.base_mut().attach(ManagerId::next()).is_ok());
        assert_eq!(c.base().lifecycle(), Lifecycle::Opened);
    }

    #[test]
    fn close_requests_collapse() {
        let input = InputState::new();
        let mut pool = SurfacePool::new();
        let mut cx = FrameContext::new(&input, &MonospaceMeasure, &mut pool);
        let id = ComponentId::next();
        cx.set_current(Some(id));
        cx.close();
        cx.close();
        assert!(cx.close_requested(id));
        assert_eq!(cx.take_requests().len(), 1);
    }
}
