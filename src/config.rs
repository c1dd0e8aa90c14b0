//! User configuration: key bindings, frame rate and manager modes.
//!
//! Stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/stackui/config.toml` (default `~/.config/stackui/config.toml`).
//! Unknown keys and unparsable values are ignored and fall back to defaults.

use std::path::PathBuf;

use stackui::ui::{KeyBind, KeyMap};
use stackui::Button;

pub const DEFAULT_TICK_MS: u64 = 50;
const TICK_RANGE: std::ops::RangeInclusive<u64> = 10..=1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub keymap: KeyMap,
    /// Frame period.
    pub tick_ms: u64,
    /// Draw every stacked control, masking all but the top.
    pub draw_all: bool,
    /// Run every queued popup instead of only the front one.
    pub run_all_popups: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            keymap: KeyMap::default(),
            tick_ms: DEFAULT_TICK_MS,
            draw_all: false,
            run_all_popups: false,
        }
    }
}

impl AppConfig {
    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents),
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "no config file, using defaults");
                Self::default()
            }
        }
    }

    /// Persist current config to disk.  Returns the path written.
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(path)
    }

    fn parse(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());

            match key {
                "tick_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.tick_ms = v.clamp(*TICK_RANGE.start(), *TICK_RANGE.end());
                    }
                    continue;
                }
                "draw_all" => {
                    config.draw_all = value == "true";
                    continue;
                }
                "run_all_popups" => {
                    config.run_all_popups = value == "true";
                    continue;
                }
                _ => {}
            }

            let Some(button) = Button::from_config_key(key) else {
                tracing::warn!(key, "unknown config key");
                continue;
            };
            let binds: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                .collect();
            if !binds.is_empty() {
                config.keymap.bind(button, binds);
            }
        }

        config
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# stackui configuration".to_string(),
            String::new(),
            "# Frame loop".to_string(),
            format!("tick_ms = {}", self.tick_ms),
            format!("draw_all = {}", self.draw_all),
            format!("run_all_popups = {}", self.run_all_popups),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: button = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab,".to_string(),
            "#   Backspace, Delete, Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
            String::new(),
        ];

        for &button in Button::ALL {
            let keys: Vec<String> = self
                .keymap
                .bindings(button)
                .iter()
                .map(KeyBind::to_config_string)
                .collect();
            if !keys.is_empty() {
                lines.push(format!("{} = {}", button.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/stackui/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("stackui").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;

    #[test]
    fn serialised_config_parses_back() {
        let mut config = AppConfig {
            tick_ms: 33,
            draw_all: true,
            ..AppConfig::default()
        };
        config
            .keymap
            .bind(Button::Submit, vec![KeyBind::plain(KeyCode::Char(' '))]);
        assert_eq!(AppConfig::parse(&config.serialise()), config);
    }

    #[test]
    fn bad_entries_fall_back_to_defaults() {
        let config = AppConfig::parse(
            "tick_ms = fast\n\
             draw_all = yes\n\
             warp = Ctrl+w\n\
             submit = NotAKey\n\
             cancel = q, Esc\n\
             [section]\n",
        );
        assert_eq!(config.tick_ms, DEFAULT_TICK_MS);
        assert!(!config.draw_all);
        assert_eq!(
            config.keymap.bindings(Button::Submit),
            KeyMap::default().bindings(Button::Submit)
        );
        assert_eq!(
            config.keymap.bindings(Button::Cancel),
            &[
                KeyBind::plain(KeyCode::Char('q')),
                KeyBind::plain(KeyCode::Esc)
            ]
        );
    }

    #[test]
    fn tick_is_clamped() {
        assert_eq!(AppConfig::parse("tick_ms = 1").tick_ms, 10);
        assert_eq!(AppConfig::parse("tick_ms = 99999").tick_ms, 1000);
    }
}
