// Key bindings: one lookup from key event to action.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::layout::PanelKind;
use crate::sort_policy::SortMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Sort(SortMode),
    Toggle(PanelKind),
    ToggleHelp,
    Quit,
}

/// Map a key press to its action; `None` for keys without a binding and
/// for release/repeat events.
pub fn action_for(key: &KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('a') => Some(Action::Sort(SortMode::Automatic)),
        KeyCode::Char('c') => Some(Action::Sort(SortMode::ByCpu)),
        KeyCode::Char('m') => Some(Action::Sort(SortMode::BySize)),
        KeyCode::Char('d') => Some(Action::Toggle(PanelKind::DiskIo)),
        KeyCode::Char('f') => Some(Action::Toggle(PanelKind::FileSystem)),
        KeyCode::Char('n') => Some(Action::Toggle(PanelKind::Network)),
        KeyCode::Char('l') => Some(Action::Toggle(PanelKind::Log)),
        KeyCode::Char('h') => Some(Action::ToggleHelp),
        _ => None,
    }
}

/// (key, description) pairs shown in the help overlay and `--help` output.
pub const KEY_HELP: [(&str, &str); 8] = [
    ("a", "to sort processes automatically"),
    ("c", "to sort processes by CPU consumption"),
    ("d", "to disable|enable the disk IO stats"),
    ("f", "to disable|enable the file system stats"),
    ("l", "to display|hide the logs messages"),
    ("m", "to sort processes by process size"),
    ("n", "to disable|enable the network interfaces stats"),
    ("q", "to exit Glances"),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn every_binding_maps_to_a_distinct_action() {
        let keys = ['a', 'c', 'm', 'd', 'f', 'n', 'l', 'h', 'q'];
        let actions: Vec<Action> = keys
            .iter()
            .filter_map(|&c| action_for(&press(KeyCode::Char(c))))
            .collect();
        assert_eq!(actions.len(), keys.len());
        for (i, a) in actions.iter().enumerate() {
            assert!(!actions[i + 1..].contains(a), "duplicate action {a:?}");
        }
    }

    #[test]
    fn unbound_keys_are_ignored() {
        assert_eq!(action_for(&press(KeyCode::Char('z'))), None);
        assert_eq!(action_for(&press(KeyCode::Enter)), None);
    }

    #[test]
    fn ctrl_c_and_esc_quit() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(action_for(&ctrl_c), Some(Action::Quit));
        assert_eq!(action_for(&press(KeyCode::Esc)), Some(Action::Quit));
    }
}
