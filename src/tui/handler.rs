use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    NextTab,
    ShowGenerate,
    ShowHistory,
    MoveUp,
    MoveDown,
    MoveToTop,
    MoveToBottom,
    Select,
    OpenInBrowser,
    ReloadHistory,
    CloseDetails,
    ShowHelp,
    HideHelp,
    // URL input actions
    EditUrl,
    UrlInputChar(char),
    UrlInputBackspace,
    UrlInputConfirm,
    UrlInputCancel,
}

/// Which keymap applies, from most to least modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Help,
    Details,
    UrlInput,
    Normal,
}

pub fn handle_key_event(key: KeyEvent, mode: InputMode) -> Option<AppAction> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(AppAction::Quit);
    }

    match mode {
        // If help is showing, any key closes it
        InputMode::Help => Some(AppAction::HideHelp),

        InputMode::Details => match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Some(AppAction::CloseDetails),
            KeyCode::Char('j') | KeyCode::Down => Some(AppAction::MoveDown),
            KeyCode::Char('k') | KeyCode::Up => Some(AppAction::MoveUp),
            KeyCode::Char('<') | KeyCode::Home => Some(AppAction::MoveToTop),
            KeyCode::Char('o') => Some(AppAction::OpenInBrowser),
            _ => None,
        },

        InputMode::UrlInput => match key.code {
            KeyCode::Enter => Some(AppAction::UrlInputConfirm),
            KeyCode::Esc => Some(AppAction::UrlInputCancel),
            KeyCode::Backspace => Some(AppAction::UrlInputBackspace),
            KeyCode::Tab => Some(AppAction::NextTab),
            KeyCode::Char(c) => Some(AppAction::UrlInputChar(c)),
            _ => None,
        },

        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(AppAction::Quit),

            KeyCode::Tab | KeyCode::BackTab => Some(AppAction::NextTab),
            KeyCode::Char('1') => Some(AppAction::ShowGenerate),
            KeyCode::Char('2') => Some(AppAction::ShowHistory),

            KeyCode::Char('j') | KeyCode::Down => Some(AppAction::MoveDown),
            KeyCode::Char('k') | KeyCode::Up => Some(AppAction::MoveUp),
            KeyCode::Char('<') | KeyCode::Home => Some(AppAction::MoveToTop),
            KeyCode::Char('>') | KeyCode::End => Some(AppAction::MoveToBottom),

            KeyCode::Enter => Some(AppAction::Select),
            KeyCode::Char('i') | KeyCode::Char('/') => Some(AppAction::EditUrl),
            KeyCode::Char('o') => Some(AppAction::OpenInBrowser),
            KeyCode::Char('r') => Some(AppAction::ReloadHistory),

            KeyCode::Char('?') => Some(AppAction::ShowHelp),

            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_ctrl_c_quits_in_every_mode() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for mode in [
            InputMode::Help,
            InputMode::Details,
            InputMode::UrlInput,
            InputMode::Normal,
        ] {
            assert_eq!(handle_key_event(ctrl_c, mode), Some(AppAction::Quit));
        }
    }

    #[test]
    fn test_url_input_captures_letters() {
        assert_eq!(
            handle_key_event(press(KeyCode::Char('q')), InputMode::UrlInput),
            Some(AppAction::UrlInputChar('q'))
        );
        assert_eq!(
            handle_key_event(press(KeyCode::Enter), InputMode::UrlInput),
            Some(AppAction::UrlInputConfirm)
        );
        assert_eq!(
            handle_key_event(press(KeyCode::Esc), InputMode::UrlInput),
            Some(AppAction::UrlInputCancel)
        );
    }

    #[test]
    fn test_normal_mode_keys() {
        assert_eq!(
            handle_key_event(press(KeyCode::Char('q')), InputMode::Normal),
            Some(AppAction::Quit)
        );
        assert_eq!(
            handle_key_event(press(KeyCode::Tab), InputMode::Normal),
            Some(AppAction::NextTab)
        );
        assert_eq!(
            handle_key_event(press(KeyCode::Char('2')), InputMode::Normal),
            Some(AppAction::ShowHistory)
        );
        assert_eq!(
            handle_key_event(press(KeyCode::Enter), InputMode::Normal),
            Some(AppAction::Select)
        );
        assert_eq!(handle_key_event(press(KeyCode::Char('z')), InputMode::Normal), None);
    }

    #[test]
    fn test_details_and_help() {
        assert_eq!(
            handle_key_event(press(KeyCode::Esc), InputMode::Details),
            Some(AppAction::CloseDetails)
        );
        assert_eq!(
            handle_key_event(press(KeyCode::Char('j')), InputMode::Details),
            Some(AppAction::MoveDown)
        );
        assert_eq!(
            handle_key_event(press(KeyCode::Char('x')), InputMode::Help),
            Some(AppAction::HideHelp)
        );
    }
}
