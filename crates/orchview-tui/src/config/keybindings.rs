use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use orchview_logs::ExportFormat;

use crate::app::Action;

/// A key combination
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn shift(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::SHIFT,
        }
    }

    pub fn from_event(event: &KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// Context for keybindings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyContext {
    Global,
    LogViewer,
    FilterInput,
}

/// Keybinding configuration
pub struct KeyBindings {
    bindings: HashMap<KeyContext, HashMap<KeyBinding, Action>>,
}

impl KeyBindings {
    pub fn new() -> Self {
        let mut bindings = HashMap::new();

        // Global bindings
        let mut global = HashMap::new();
        global.insert(KeyBinding::new(KeyCode::Char('?')), Action::ToggleHelp);
        global.insert(KeyBinding::new(KeyCode::Esc), Action::GoBack);
        global.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        global.insert(KeyBinding::new(KeyCode::Char('q')), Action::Quit);
        bindings.insert(KeyContext::Global, global);

        let mut log_viewer = HashMap::new();
        // Pages
        log_viewer.insert(KeyBinding::new(KeyCode::Char('n')), Action::NextPage);
        log_viewer.insert(KeyBinding::new(KeyCode::Right), Action::NextPage);
        log_viewer.insert(KeyBinding::new(KeyCode::PageDown), Action::NextPage);
        log_viewer.insert(KeyBinding::new(KeyCode::Char('p')), Action::PreviousPage);
        log_viewer.insert(KeyBinding::new(KeyCode::Left), Action::PreviousPage);
        log_viewer.insert(KeyBinding::new(KeyCode::PageUp), Action::PreviousPage);
        log_viewer.insert(KeyBinding::new(KeyCode::Char('z')), Action::CyclePageSize);
        log_viewer.insert(KeyBinding::new(KeyCode::Char('m')), Action::LoadMore);
        // Scrolling
        log_viewer.insert(KeyBinding::new(KeyCode::Char('j')), Action::ScrollDown(1));
        log_viewer.insert(KeyBinding::new(KeyCode::Down), Action::ScrollDown(1));
        log_viewer.insert(KeyBinding::new(KeyCode::Char('k')), Action::ScrollUp(1));
        log_viewer.insert(KeyBinding::new(KeyCode::Up), Action::ScrollUp(1));
        log_viewer.insert(KeyBinding::ctrl(KeyCode::Char('d')), Action::ScrollDown(10));
        log_viewer.insert(KeyBinding::ctrl(KeyCode::Char('u')), Action::ScrollUp(10));
        log_viewer.insert(KeyBinding::new(KeyCode::Char('g')), Action::ScrollToTop);
        log_viewer.insert(KeyBinding::new(KeyCode::Home), Action::ScrollToTop);
        log_viewer.insert(KeyBinding::shift(KeyCode::Char('G')), Action::ScrollToBottom);
        log_viewer.insert(KeyBinding::new(KeyCode::End), Action::ScrollToBottom);
        // Filters
        log_viewer.insert(KeyBinding::new(KeyCode::Char('l')), Action::CycleLevel);
        log_viewer.insert(KeyBinding::shift(KeyCode::Char('L')), Action::CycleLevelBack);
        log_viewer.insert(KeyBinding::new(KeyCode::Tab), Action::SwitchView);
        log_viewer.insert(KeyBinding::new(KeyCode::Char('/')), Action::OpenSearch);
        log_viewer.insert(KeyBinding::new(KeyCode::Char('x')), Action::ClearFilter);
        log_viewer.insert(KeyBinding::new(KeyCode::Char('i')), Action::ToggleCaseSensitive);
        // Display and data
        log_viewer.insert(KeyBinding::new(KeyCode::Char('s')), Action::ToggleStats);
        log_viewer.insert(KeyBinding::new(KeyCode::Char('r')), Action::Refresh);
        log_viewer.insert(
            KeyBinding::new(KeyCode::Char('1')),
            Action::Export(ExportFormat::Text),
        );
        log_viewer.insert(
            KeyBinding::new(KeyCode::Char('2')),
            Action::Export(ExportFormat::Csv),
        );
        log_viewer.insert(
            KeyBinding::new(KeyCode::Char('3')),
            Action::Export(ExportFormat::Xlsx),
        );
        bindings.insert(KeyContext::LogViewer, log_viewer);

        // Filter input bindings (when search bar is active)
        let mut filter_input = HashMap::new();
        filter_input.insert(KeyBinding::new(KeyCode::Enter), Action::ApplyFilter);
        filter_input.insert(KeyBinding::new(KeyCode::Esc), Action::CloseSearch);
        filter_input.insert(KeyBinding::new(KeyCode::Backspace), Action::SearchBackspace);
        filter_input.insert(KeyBinding::ctrl(KeyCode::Char('u')), Action::SearchClear);
        filter_input.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::CloseSearch);
        bindings.insert(KeyContext::FilterInput, filter_input);

        Self { bindings }
    }

    /// Look up action for key event in given context
    pub fn get_action(&self, context: KeyContext, key: &KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(key);

        // First check context-specific bindings
        if let Some(action) = self
            .bindings
            .get(&context)
            .and_then(|bindings| bindings.get(&binding))
        {
            return Some(action.clone());
        }

        // Fall back to global bindings
        self.bindings
            .get(&KeyContext::Global)?
            .get(&binding)
            .cloned()
    }

    /// Handle key event in filter input mode
    /// Returns Some(Action) for special keys, None for anything else
    pub fn get_filter_input_action(&self, key: &KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(key);

        if let Some(action) = self
            .bindings
            .get(&KeyContext::FilterInput)
            .and_then(|bindings| bindings.get(&binding))
        {
            return Some(action.clone());
        }

        // For regular characters, return SearchInput action
        if let KeyCode::Char(c) = key.code
            && (key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT)
        {
            return Some(Action::SearchInput(c));
        }

        None
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_viewer_keys() {
        let bindings = KeyBindings::new();
        let get = |code| bindings.get_action(KeyContext::LogViewer, &key(code, KeyModifiers::NONE));

        assert_eq!(get(KeyCode::Char('n')), Some(Action::NextPage));
        assert_eq!(get(KeyCode::Left), Some(Action::PreviousPage));
        assert_eq!(get(KeyCode::Tab), Some(Action::SwitchView));
        assert_eq!(get(KeyCode::Char('j')), Some(Action::ScrollDown(1)));
        assert_eq!(get(KeyCode::Up), Some(Action::ScrollUp(1)));
        assert_eq!(get(KeyCode::End), Some(Action::ScrollToBottom));
        assert_eq!(
            get(KeyCode::Char('3')),
            Some(Action::Export(ExportFormat::Xlsx))
        );
    }

    #[test]
    fn test_shifted_level_cycles_back() {
        let bindings = KeyBindings::new();
        let action = bindings.get_action(
            KeyContext::LogViewer,
            &key(KeyCode::Char('L'), KeyModifiers::SHIFT),
        );
        assert_eq!(action, Some(Action::CycleLevelBack));
    }

    #[test]
    fn test_falls_back_to_global() {
        let bindings = KeyBindings::new();
        let quit = bindings.get_action(
            KeyContext::LogViewer,
            &key(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert_eq!(quit, Some(Action::Quit));
        assert_eq!(
            bindings.get_action(KeyContext::LogViewer, &key(KeyCode::Char('w'), KeyModifiers::NONE)),
            None
        );
    }

    #[test]
    fn test_filter_input_takes_characters() {
        let bindings = KeyBindings::new();
        assert_eq!(
            bindings.get_filter_input_action(&key(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(Action::SearchInput('q'))
        );
        assert_eq!(
            bindings.get_filter_input_action(&key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(Action::ApplyFilter)
        );
        assert_eq!(
            bindings.get_filter_input_action(&key(KeyCode::Char('a'), KeyModifiers::ALT)),
            None
        );
    }
}
