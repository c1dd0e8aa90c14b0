//! Physical key bindings and their translation into [`InputState`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::engine::input::{Button, InputState};

const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

// ───────────────────────────────────────── key bind ──────────

/// A single key binding: key code plus modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    /// Only CTRL/ALT/SHIFT are compared.  Shifted characters arrive already
    /// upper-cased, so SHIFT is ignored for `Char` codes.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let mask = match self.code {
            KeyCode::Char(_) => MODIFIER_MASK.difference(KeyModifiers::SHIFT),
            _ => MODIFIER_MASK,
        };
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// Config-file form, e.g. `"Ctrl+c"`, `"PageDown"`, `"j"`.
    pub fn to_config_string(&self) -> String {
        let mut s = String::new();
        for (flag, prefix) in [
            (KeyModifiers::CONTROL, "Ctrl+"),
            (KeyModifiers::ALT, "Alt+"),
            (KeyModifiers::SHIFT, "Shift+"),
        ] {
            if self.modifiers.contains(flag) {
                s.push_str(prefix);
            }
        }
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        });
        s
    }

    /// Parse `"Ctrl+c"`, `"Alt+Up"`, `"q"`, `"Enter"` and friends.
    pub fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let (prefixes, key) = match s.rsplit_once('+') {
            // trailing "+" is the plus key itself
            Some((p, "")) => (p.strip_suffix('+').unwrap_or(p), "+"),
            Some((p, k)) => (p, k),
            None => ("", s),
        };
        for part in prefixes.split('+').filter(|p| !p.is_empty()) {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" | "bksp" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            lower if lower.starts_with('f') && lower.len() > 1 => KeyCode::F(lower[1..].parse().ok()?),
            _ if key.chars().count() == 1 => KeyCode::Char(key.chars().next()?),
            _ => return None,
        };
        Some(Self { code, modifiers })
    }
}

// ───────────────────────────────────────── key map ───────────

/// Which physical keys drive which toolkit buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    bindings: Vec<(Button, Vec<KeyBind>)>,
}

impl Default for KeyMap {
    fn default() -> Self {
        use KeyCode::*;
        let p = KeyBind::plain;
        Self {
            bindings: vec![
                (Button::Up, vec![p(Up), p(Char('k'))]),
                (Button::Down, vec![p(Down), p(Char('j'))]),
                (Button::Left, vec![p(Left), p(Char('h'))]),
                (Button::Right, vec![p(Right), p(Char('l'))]),
                (Button::JumpUp, vec![p(PageUp)]),
                (Button::JumpDown, vec![p(PageDown)]),
                (Button::Submit, vec![p(Enter)]),
                (Button::Cancel, vec![p(Esc)]),
                (Button::Backspace, vec![p(Backspace)]),
                (Button::Menu, vec![p(Tab)]),
            ],
        }
    }
}

impl KeyMap {
    pub fn bindings(&self, button: Button) -> &[KeyBind] {
        self.bindings
            .iter()
            .find(|(b, _)| *b == button)
            .map(|(_, binds)| binds.as_slice())
            .unwrap_or_default()
    }

    /// Replace every binding for `button`.  Keys are taken away from any
    /// other button first so one key never drives two buttons.
    pub fn bind(&mut self, button: Button, binds: Vec<KeyBind>) {
        for (_, existing) in self.bindings.iter_mut() {
            existing.retain(|k| !binds.contains(k));
        }
        match self.bindings.iter_mut().find(|(b, _)| *b == button) {
            Some((_, slot)) => *slot = binds,
            None => self.bindings.push((button, binds)),
        }
    }

    /// Button bound to this key.  The binding with the most modifiers wins.
    pub fn lookup(&self, event: &KeyEvent) -> Option<Button> {
        self.bindings
            .iter()
            .flat_map(|(button, binds)| binds.iter().map(move |k| (*button, k)))
            .filter(|(_, k)| k.matches(event))
            .max_by_key(|(_, k)| k.modifiers.bits().count_ones())
            .map(|(button, _)| button)
    }

    /// Fold one terminal key event into the frame being accumulated.
    ///
    /// Plain printable characters are always recorded as typed text, even
    /// when they also drive a button.
    pub fn apply(&self, event: &KeyEvent, input: &mut InputState) {
        let button = self.lookup(event);
        match event.kind {
            KeyEventKind::Release => {
                if let Some(b) = button {
                    input.release(b);
                }
                return;
            }
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if let Some(b) = button {
                    input.press(b);
                }
            }
        }
        if let KeyCode::Char(c) = event.code {
            if !event
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
            {
                input.type_char(c);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn parse_round_trips_config_strings() {
        for s in ["Ctrl+c", "Alt+Up", "q", "Enter", "PageDown", "F5", "Space", "+"] {
            let bind = KeyBind::parse(s).unwrap();
            assert_eq!(KeyBind::parse(&bind.to_config_string()), Some(bind), "{s}");
        }
        assert_eq!(
            KeyBind::parse("ctrl+shift+x"),
            Some(KeyBind::new(
                KeyCode::Char('x'),
                KeyModifiers::CONTROL | KeyModifiers::SHIFT
            ))
        );
        assert_eq!(KeyBind::parse("Hyper+x"), None);
        assert_eq!(KeyBind::parse("nonsense"), None);
    }

    #[test]
    fn chars_type_and_press() {
        let map = KeyMap::default();
        let mut input = InputState::new();
        map.apply(&key(KeyCode::Char('j'), KeyModifiers::NONE), &mut input);
        map.apply(&key(KeyCode::Char('x'), KeyModifiers::NONE), &mut input);
        map.apply(&key(KeyCode::Char('c'), KeyModifiers::CONTROL), &mut input);
        map.apply(&key(KeyCode::Enter, KeyModifiers::NONE), &mut input);
        assert!(input.pressed(Button::Down));
        assert!(input.pressed(Button::Submit));
        assert_eq!(input.typed(), "jx");
    }

    #[test]
    fn rebinding_steals_the_key() {
        let mut map = KeyMap::default();
        map.bind(Button::Menu, vec![KeyBind::plain(KeyCode::Char('j'))]);
        assert_eq!(
            map.lookup(&key(KeyCode::Char('j'), KeyModifiers::NONE)),
            Some(Button::Menu)
        );
        assert_eq!(map.bindings(Button::Down), &[KeyBind::plain(KeyCode::Down)]);
    }
}
