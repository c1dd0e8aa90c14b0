//! Central application state.
//!
//! The manager owns every open widget.  Widgets report back through observer
//! callbacks that push [`AppMessage`]s into a shared inbox; the handler drains
//! it once per frame, after the manager has finished its update pass.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use stackui::ui::Theme;
use stackui::{InputState, Manager};

use super::layout::AppLayout;
use crate::config::AppConfig;

/// Entries of the main menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ShowDialog,
    EnterText,
    Progress,
    Gallery,
    PressButton,
    ToggleDrawAll,
    ToggleRunAllPopups,
    SaveSettings,
    Quit,
}

impl MenuAction {
    pub const ALL: &[MenuAction] = &[
        MenuAction::ShowDialog,
        MenuAction::EnterText,
        MenuAction::Progress,
        MenuAction::Gallery,
        MenuAction::PressButton,
        MenuAction::ToggleDrawAll,
        MenuAction::ToggleRunAllPopups,
        MenuAction::SaveSettings,
        MenuAction::Quit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::ShowDialog => "Show a dialog",
            MenuAction::EnterText => "Enter some text",
            MenuAction::Progress => "Run a task",
            MenuAction::Gallery => "Browse the gallery",
            MenuAction::PressButton => "Press a button",
            MenuAction::ToggleDrawAll => "Toggle draw-all",
            MenuAction::ToggleRunAllPopups => "Toggle run-all popups",
            MenuAction::SaveSettings => "Save settings",
            MenuAction::Quit => "Quit",
        }
    }
}

/// Something a widget reported during the last update pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMessage {
    Menu(MenuAction),
    GalleryPicked(usize),
    TextSubmitted(String),
    ButtonPressed(u32),
    QuitConfirmed,
}

/// Shared queue the widget callbacks write to.
#[derive(Debug, Clone, Default)]
pub struct Inbox(Rc<RefCell<VecDeque<AppMessage>>>);

impl Inbox {
    pub fn post(&self, message: AppMessage) {
        self.0.borrow_mut().push_back(message);
    }

    pub fn take(&self) -> Vec<AppMessage> {
        self.0.borrow_mut().drain(..).collect()
    }
}

/// Top-level application state.
pub struct AppState {
    pub manager: Manager,
    pub config: AppConfig,
    /// Input gathered since the last frame.
    pub input: InputState,
    pub inbox: Inbox,
    pub layout: AppLayout,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// Frames run so far.
    pub frame: u64,
}

impl AppState {
    pub fn new(config: AppConfig, layout: AppLayout) -> Self {
        let mut manager = Manager::default();
        manager.set_global_style(&Theme::base());
        manager.set_mask_color(Theme::MASK);
        manager.set_draw_all(config.draw_all);
        manager.set_run_all_popups(config.run_all_popups);
        Self {
            manager,
            config,
            input: InputState::new(),
            inbox: Inbox::default(),
            layout,
            should_quit: false,
            frame: 0,
        }
    }
}
