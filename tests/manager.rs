//! Modal stack, popup queue and ownership behaviour through the public API.

use stackui::widgets::{Dialog, Notification, PushButton};
use stackui::{
    Component, ComponentEvent, InputState, Lifecycle, Manager, UiError,
};

use std::cell::RefCell;
use std::rc::Rc;

fn button(name: &str) -> Box<PushButton> {
    Box::new(PushButton::new(name).named(name))
}

#[test]
fn closing_middle_control_keeps_stack_order() {
    let mut m = Manager::default();
    let a = m.open_control(button("a")).unwrap();
    let b = m.open_control(button("b")).unwrap();
    let c = m.open_control(button("c")).unwrap();

    let closed = m.close_control(b).unwrap();
    assert_eq!(closed.base().lifecycle(), Lifecycle::Closed);
    assert_eq!(m.control_ids(), vec![a, c]);
    assert_eq!(m.top_control().unwrap().id(), c);

    m.close(c);
    m.close(a);
    assert!(m.is_idle());
}

#[test]
fn closing_middle_popup_keeps_queue_order() {
    let mut m = Manager::default();
    let a = m.open_popup(Box::new(Notification::new("a", 10))).unwrap();
    let b = m.open_popup(Box::new(Notification::new("b", 10))).unwrap();
    let c = m.open_popup(Box::new(Notification::new("c", 10))).unwrap();

    assert!(m.close(b));
    assert_eq!(m.popup_ids(), vec![a, c]);
}

#[test]
fn second_manager_is_rejected_and_owner_kept() {
    let mut first = Manager::default();
    let mut second = Manager::default();

    let id = first.open_control(button("x")).unwrap();
    let released = first.close_control(id).unwrap();

    let rejected = second.open_control(released).unwrap_err();
    match rejected.error {
        UiError::OwnershipConflict {
            component,
            owner,
            requested,
        } => {
            assert_eq!(component, id);
            assert_eq!(owner, first.id());
            assert_eq!(requested, second.id());
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(rejected.component.base().owner(), Some(first.id()));
    assert_eq!(second.control_count(), 0);
}

#[test]
fn reopening_a_closed_component_fails() {
    let mut m = Manager::default();
    let id = m.open_control(button("x")).unwrap();
    let closed = m.close_control(id).unwrap();
    let rejected = m.open_control(closed).unwrap_err();
    assert_eq!(rejected.error, UiError::AlreadyClosed { component: id });
}

#[test]
fn lifecycle_events_reach_observers_in_order() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = Rc::clone(&seen);
    let mut dialog = Dialog::new("Title", "Body");
    dialog.base_mut().subscribe(move |e| s.borrow_mut().push(*e));

    let mut m = Manager::default();
    let id = m.open_control(Box::new(dialog)).unwrap();
    m.update(&InputState::new()).unwrap();
    m.close(id);

    let seen = seen.borrow();
    assert_eq!(seen.first(), Some(&ComponentEvent::StyleSet));
    assert!(matches!(seen[1], ComponentEvent::Resized(_)));
    assert_eq!(seen[seen.len() - 2], ComponentEvent::Opened);
    assert_eq!(seen.last(), Some(&ComponentEvent::Closed));
}

#[test]
fn only_front_popup_runs_in_focused_mode() {
    let mut m = Manager::default();
    m.open_popup(Box::new(Notification::new("a", 2).named("a")))
        .unwrap();
    m.open_popup(Box::new(Notification::new("b", 2).named("b")))
        .unwrap();

    m.update(&InputState::new()).unwrap();
    let b = m.find_by_name_as::<Notification>("b").unwrap();
    assert_eq!(stackui::PopUp::timeout(b), 2);

    m.update(&InputState::new()).unwrap();
    assert!(m.find_by_name("a").is_none());
    m.update(&InputState::new()).unwrap();
    m.update(&InputState::new()).unwrap();
    assert!(m.is_idle());
}

#[test]
fn components_opened_during_update_join_after_the_pass() {
    use stackui::{Control, FrameContext};

    struct Opener {
        base: stackui::ComponentBase,
    }

    impl Component for Opener {
        stackui::component_base!(base);
        fn draw(&mut self, _s: &mut dyn stackui::DrawSink, _m: &dyn stackui::TextMeasure) {}
    }

    impl Control for Opener {
        fn on_submit(&mut self, cx: &mut FrameContext<'_>) {
            cx.open_control(Box::new(PushButton::new("child").named("child")));
            cx.open_popup(Box::new(Notification::new("opened", 5)));
        }
    }

    let mut m = Manager::default();
    m.open_control(Box::new(Opener {
        base: stackui::ComponentBase::named("opener"),
    }))
    .unwrap();
    m.update(&InputState::new().with_pressed(stackui::Button::Submit))
        .unwrap();
    assert_eq!(m.control_count(), 2);
    assert_eq!(m.top_control().unwrap().name(), Some("child"));
    assert_eq!(m.popup_count(), 1);
}
