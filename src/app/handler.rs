//! Input handling and per-frame orchestration.
//!
//! Keys only accumulate into the pending [`InputState`]; nothing reacts to
//! them until the next tick runs a frame.

use anyhow::Context;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect as TermRect;

use stackui::ui::Theme;
use stackui::widgets::{
    Dialog, DialogEvent, Notification, ProgressBar, PushButton, TextEntry, TextEntryEvent,
    TextOption,
};
use stackui::{Button, Columns, Component, Control, SelectionContainer, SelectionEvent, Size};

use super::layout::AppLayout;
use super::state::{AppMessage, AppState, MenuAction};

/// Frames a notification stays up.
const NOTICE_FRAMES: i32 = 60;
const PROGRESS_STEPS: u64 = 120;
const GALLERY_ITEMS: usize = 40;

const MENU_NAME: &str = "main-menu";
const ENTRY_NAME: &str = "entry";
const PROGRESS_NAME: &str = "progress";
const BUTTON_NAME: &str = "button";

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits, whatever is open.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }
    state.config.keymap.apply(&key, &mut state.input);
}

/// Recompute the layout and re-centre every open widget.
pub fn handle_resize(state: &mut AppState, width: u16, height: u16) {
    state.layout = AppLayout::from_area(TermRect::new(0, 0, width, height));
    let layout = state.layout;
    state.manager.each_control_mut(|control, measure| {
        let rect = layout.centered(control.bounds().size());
        control.set_bounds(rect, measure);
    });
    stack_notices(state);
}

/// One frame: update the manager with the input gathered since the last
/// tick, then react to whatever the widgets reported.
pub fn run_frame(state: &mut AppState) -> anyhow::Result<()> {
    if state.input.pressed(Button::Menu) {
        back_to_menu(state);
    }
    state
        .manager
        .update(&state.input)
        .with_context(|| format!("frame {} update", state.frame))?;
    state.input.next_frame();
    state.frame += 1;

    for message in state.inbox.take() {
        dispatch(state, message)?;
    }
    advance_progress(state);
    stack_notices(state);

    if state.manager.control_count() == 0 {
        tracing::debug!("modal stack empty, quitting");
        state.should_quit = true;
    }
    Ok(())
}

/// Close everything stacked above the main menu.
fn back_to_menu(state: &mut AppState) {
    let Some(menu) = state.manager.find_by_name(MENU_NAME).map(|f| f.id()) else {
        return;
    };
    let above: Vec<_> = state
        .manager
        .control_ids()
        .into_iter()
        .skip_while(|&id| id != menu)
        .skip(1)
        .collect();
    for id in above.into_iter().rev() {
        state.manager.close(id);
    }
}

/// Status-bar hint for whatever is on top of the stack.
pub fn status_hint(state: &AppState) -> String {
    let top = state.manager.top_control().and_then(|c| c.name());
    let keys = match top {
        Some(MENU_NAME) => "↑/↓: move | Enter: choose | Esc: quit",
        Some(BUTTON_NAME) => "Enter: press | Esc: back",
        Some(ENTRY_NAME) => "type | Enter: greet | Esc: back",
        Some("gallery") => "arrows: move | PgUp/PgDn: jump | Enter: pick | Esc: back",
        _ => "Enter: confirm | Esc: back | Tab: menu",
    };
    format!(
        "{keys} | frame {} | popups {}",
        state.frame,
        state.manager.popup_count()
    )
}

// ── widgets ─────────────────────────────────────────────────────

pub fn open_main_menu(state: &mut AppState) -> anyhow::Result<()> {
    let mut menu = SelectionContainer::list()
        .named(MENU_NAME)
        .with_title("stackui");
    menu.set_style(&Theme::menu(), state.manager.measure());
    for &action in MenuAction::ALL {
        let mut option = TextOption::new(action.label());
        option.set_style(&Theme::option(), state.manager.measure());
        menu.add_option(Box::new(option), state.manager.measure());
    }
    let inbox = state.inbox.clone();
    menu.subscribe(move |event| {
        if let SelectionEvent::Submitted(i) = *event {
            if let Some(&action) = MenuAction::ALL.get(i) {
                inbox.post(AppMessage::Menu(action));
            }
        }
    });

    let widest = MenuAction::ALL
        .iter()
        .map(|a| a.label().chars().count() as i32)
        .max()
        .unwrap_or(0);
    let size = Theme::menu()
        .padding
        .grow(Size::new(widest, MenuAction::ALL.len() as i32 + 1));
    open_centered(state, Box::new(menu), size)
}

fn open_centered(
    state: &mut AppState,
    mut control: Box<dyn Control>,
    size: Size,
) -> anyhow::Result<()> {
    let rect = state.layout.centered(size);
    control.set_bounds(rect, state.manager.measure());
    state.manager.open_control(control).map_err(|r| r.error)?;
    Ok(())
}

fn notify(state: &mut AppState, message: impl Into<String>) -> anyhow::Result<()> {
    let mut notice = Notification::new(message, NOTICE_FRAMES);
    notice.set_style(&Theme::notification(), state.manager.measure());
    let index = state.manager.popup_count();
    let rect = state.layout.notice_slot(index, notice.bounds().size());
    notice.set_bounds(rect, state.manager.measure());
    state
        .manager
        .open_popup(Box::new(notice))
        .map_err(|r| r.error)?;
    Ok(())
}

/// Keep queued notifications stacked from the bottom-right corner.
fn stack_notices(state: &mut AppState) {
    let layout = state.layout;
    let mut index = 0;
    state.manager.each_popup_mut(|popup, measure| {
        let rect = layout.notice_slot(index, popup.bounds().size());
        popup.set_bounds(rect, measure);
        index += 1;
    });
}

fn dispatch(state: &mut AppState, message: AppMessage) -> anyhow::Result<()> {
    tracing::debug!(?message, "dispatch");
    match message {
        AppMessage::Menu(action) => run_menu_action(state, action),
        AppMessage::GalleryPicked(i) => notify(state, format!("Picked item #{:02}", i + 1)),
        AppMessage::TextSubmitted(text) => {
            if let Some(found) = state.manager.find_by_name(ENTRY_NAME) {
                let id = found.id();
                state.manager.close(id);
            }
            let name = if text.trim().is_empty() { "stranger" } else { text.trim() };
            notify(state, format!("Hello, {name}!"))
        }
        AppMessage::ButtonPressed(n) => {
            let times = if n == 1 { "once".to_string() } else { format!("{n} times") };
            notify(state, format!("Pressed {times}"))
        }
        AppMessage::QuitConfirmed => {
            state.should_quit = true;
            Ok(())
        }
    }
}

fn run_menu_action(state: &mut AppState, action: MenuAction) -> anyhow::Result<()> {
    match action {
        MenuAction::ShowDialog => {
            let dialog = Dialog::new("About", "A modal stack and a popup queue.")
                .with_footer("Enter or Esc to close");
            let mut dialog = Box::new(dialog);
            dialog.set_style(&Theme::dialog(), state.manager.measure());
            let size = dialog.bounds().size();
            open_centered(state, dialog, size)
        }
        MenuAction::EnterText => {
            let mut entry = TextEntry::new(24).named(ENTRY_NAME).with_prompt("Name: ");
            let inbox = state.inbox.clone();
            entry.subscribe(move |event| {
                if let TextEntryEvent::Submitted(text) = event {
                    inbox.post(AppMessage::TextSubmitted(text.clone()));
                }
            });
            open_centered(state, Box::new(entry), Size::new(36, 3))
        }
        MenuAction::Progress => {
            if state.manager.find_by_name(PROGRESS_NAME).is_some() {
                return notify(state, "A task is already running");
            }
            let bar = ProgressBar::new(PROGRESS_STEPS).named(PROGRESS_NAME);
            open_centered(state, Box::new(bar), Size::new(40, 3))
        }
        MenuAction::Gallery => {
            let mut gallery = SelectionContainer::gallery(Columns::Wrap)
                .named("gallery")
                .with_title("Gallery");
            gallery.set_style(&Theme::menu(), state.manager.measure());
            for i in 1..=GALLERY_ITEMS {
                let mut option = TextOption::new(format!("#{i:02}"));
                option.set_style(&Theme::option(), state.manager.measure());
                gallery.add_option(Box::new(option), state.manager.measure());
            }
            let inbox = state.inbox.clone();
            gallery.subscribe(move |event| {
                if let SelectionEvent::Submitted(i) = *event {
                    inbox.post(AppMessage::GalleryPicked(i));
                }
            });
            open_centered(state, Box::new(gallery), Size::new(34, 10))
        }
        MenuAction::PressButton => {
            let mut button = PushButton::new("Press me").named(BUTTON_NAME);
            button.set_style(&Theme::dialog(), state.manager.measure());
            let inbox = state.inbox.clone();
            let mut presses = 0;
            button.on_press(move || {
                presses += 1;
                inbox.post(AppMessage::ButtonPressed(presses));
            });
            let size = button.bounds().size();
            open_centered(state, Box::new(button), size)
        }
        MenuAction::ToggleDrawAll => {
            state.config.draw_all = !state.config.draw_all;
            state.manager.set_draw_all(state.config.draw_all);
            notify(state, format!("draw-all: {}", on_off(state.config.draw_all)))
        }
        MenuAction::ToggleRunAllPopups => {
            state.config.run_all_popups = !state.config.run_all_popups;
            state.manager.set_run_all_popups(state.config.run_all_popups);
            notify(
                state,
                format!("run-all popups: {}", on_off(state.config.run_all_popups)),
            )
        }
        MenuAction::SaveSettings => match state.config.save() {
            Ok(path) => notify(state, format!("Saved {}", path.display())),
            Err(err) => {
                tracing::warn!(%err, "saving config failed");
                notify(state, format!("Save failed: {err}"))
            }
        },
        MenuAction::Quit => {
            let mut dialog = Dialog::new("Quit?", "Leave the demo.")
                .with_footer("Enter: quit | Esc: back");
            let inbox = state.inbox.clone();
            dialog.subscribe(move |event| {
                if *event == DialogEvent::Accepted {
                    inbox.post(AppMessage::QuitConfirmed);
                }
            });
            let mut dialog = Box::new(dialog);
            dialog.set_style(&Theme::dialog(), state.manager.measure());
            let size = dialog.bounds().size();
            open_centered(state, dialog, size)
        }
    }
}

/// Step the running task, if any.  A finished task closes and reports.
fn advance_progress(state: &mut AppState) {
    let Some(bar) = state.manager.find_by_name_as_mut::<ProgressBar>(PROGRESS_NAME) else {
        return;
    };
    bar.set_value(bar.value() + 1);
    if bar.value() < bar.maximum() {
        return;
    }
    let id = bar.id();
    state.manager.close(id);
    if let Err(err) = notify(state, "Task complete") {
        tracing::warn!(%err, "could not post completion notice");
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}
