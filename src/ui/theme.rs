//! Terminal colour palette and the default styles built from it.

use crate::engine::style::{Color, HAlign, Padding, Spacing, StyleBundle, VAlign};

/// Central theme: change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    pub const BACKGROUND: Color = Color::rgb(24, 24, 32);
    pub const BORDER: Color = Color::rgb(128, 128, 128);
    pub const TITLE: Color = Color::rgb(96, 200, 96);
    pub const TEXT: Color = Color::rgb(230, 230, 230);
    pub const MUTED: Color = Color::rgb(140, 140, 140);
    pub const HIGHLIGHT: Color = Color::rgb(240, 200, 60);
    pub const MASK: Color = Color::rgba(0, 0, 0, 160);

    /// Global default for every component opened without a style.
    pub fn base() -> StyleBundle {
        StyleBundle::new().with(|v| {
            v.background_color = Self::BACKGROUND;
            v.border.edge_color = Self::BORDER;
            v.header.color = Self::TITLE;
            v.body.color = Self::TEXT;
            v.footer.color = Self::MUTED;
            v.selected_text = Self::HIGHLIGHT;
            v.unselected_text = Self::TEXT;
            v.padding = Padding::uniform(1);
            v.close_on_cancel = true;
        })
    }

    /// Menus: a little wider horizontally, one blank row under the title.
    pub fn menu() -> StyleBundle {
        Self::base().with(|v| {
            v.padding = Padding {
                top: 1,
                right: 2,
                bottom: 1,
                left: 2,
            };
            v.spacing = Spacing {
                vertical: 0,
                horizontal: 2,
            };
            v.h_align = HAlign::Left;
        })
    }

    /// Options inside menus: no frame of their own.
    pub fn option() -> StyleBundle {
        Self::menu().with(|v| {
            v.background_color = Color::TRANSPARENT;
            v.border.edge_color = Color::TRANSPARENT;
            v.padding = Padding::default();
        })
    }

    pub fn dialog() -> StyleBundle {
        Self::base().with(|v| {
            v.h_align = HAlign::Center;
            v.spacing.vertical = 1;
        })
    }

    /// Notifications: borderless bar, text centred.
    pub fn notification() -> StyleBundle {
        Self::base().with(|v| {
            v.background_color = Color::rgb(40, 70, 40);
            v.border.edge_color = Color::TRANSPARENT;
            v.padding = Padding {
                top: 0,
                right: 1,
                bottom: 0,
                left: 1,
            };
            v.h_align = HAlign::Center;
            v.v_align = VAlign::Middle;
        })
    }
}
