use super::state::Movement;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Which part of the screen receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Tree,
    Search,
    /// The GitHub token prompt
    Token,
}

/// Everything a key press can ask the viewer to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Move(Movement),
    /// Enter/Space: toggle the selected directory
    Toggle,
    /// Right: expand, or step into an open directory
    Expand,
    /// Left: collapse, or go to the parent
    Collapse,
    /// Flip expand-all/collapse-all
    ToggleAll,
    CopyPath,
    /// Refetch, bypassing the cache
    Refresh,
    FocusSearch,
    /// Leave the search bar, keeping the query
    FocusTree,
    SearchInsert(char),
    SearchBackspace,
    /// Empty the query
    SearchClear,
    /// Open the token prompt
    FocusToken,
    TokenInsert(char),
    TokenBackspace,
    /// Store the typed token and retry the current repository
    SaveToken,
    /// Close the prompt, discarding what was typed
    CancelToken,
    /// Delete the stored token and go back to anonymous requests
    ForgetToken,
    Quit,
}

/// Map a key press to a command for the focused area
pub fn command_for_key(key: KeyEvent, focus: Focus) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => Some(Command::Quit),
            KeyCode::Char('u') if focus == Focus::Search => Some(Command::SearchClear),
            KeyCode::Char('d') if focus == Focus::Token => Some(Command::ForgetToken),
            _ => None,
        };
    }

    match focus {
        Focus::Tree => tree_command(key.code),
        Focus::Search => search_command(key.code),
        Focus::Token => token_command(key.code),
    }
}

fn tree_command(code: KeyCode) -> Option<Command> {
    let command = match code {
        KeyCode::Up | KeyCode::Char('k') => Command::Move(Movement::Up),
        KeyCode::Down | KeyCode::Char('j') => Command::Move(Movement::Down),
        KeyCode::PageUp => Command::Move(Movement::PageUp),
        KeyCode::PageDown => Command::Move(Movement::PageDown),
        KeyCode::Home | KeyCode::Char('g') => Command::Move(Movement::First),
        KeyCode::End | KeyCode::Char('G') => Command::Move(Movement::Last),
        KeyCode::Enter | KeyCode::Char(' ') => Command::Toggle,
        KeyCode::Right | KeyCode::Char('l') => Command::Expand,
        KeyCode::Left | KeyCode::Char('h') => Command::Collapse,
        KeyCode::Char('e') => Command::ToggleAll,
        KeyCode::Char('c') | KeyCode::Char('y') => Command::CopyPath,
        KeyCode::Char('r') => Command::Refresh,
        KeyCode::Char('/') => Command::FocusSearch,
        KeyCode::Char('t') => Command::FocusToken,
        KeyCode::Esc => Command::SearchClear,
        KeyCode::Char('q') => Command::Quit,
        _ => return None,
    };
    Some(command)
}

fn search_command(code: KeyCode) -> Option<Command> {
    let command = match code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Tab => Command::FocusTree,
        KeyCode::Up => Command::Move(Movement::Up),
        KeyCode::Down => Command::Move(Movement::Down),
        KeyCode::Backspace => Command::SearchBackspace,
        KeyCode::Char(c) => Command::SearchInsert(c),
        _ => return None,
    };
    Some(command)
}

fn token_command(code: KeyCode) -> Option<Command> {
    let command = match code {
        KeyCode::Enter => Command::SaveToken,
        KeyCode::Esc => Command::CancelToken,
        KeyCode::Backspace => Command::TokenBackspace,
        KeyCode::Char(c) => Command::TokenInsert(c),
        _ => return None,
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_tree_keys() {
        assert_eq!(
            command_for_key(key(KeyCode::Char('j')), Focus::Tree),
            Some(Command::Move(Movement::Down))
        );
        assert_eq!(
            command_for_key(key(KeyCode::Char('e')), Focus::Tree),
            Some(Command::ToggleAll)
        );
        assert_eq!(
            command_for_key(key(KeyCode::Char('/')), Focus::Tree),
            Some(Command::FocusSearch)
        );
        assert_eq!(command_for_key(key(KeyCode::F(5)), Focus::Tree), None);
    }

    #[test]
    fn test_search_keys_type_text() {
        assert_eq!(
            command_for_key(key(KeyCode::Char('q')), Focus::Search),
            Some(Command::SearchInsert('q'))
        );
        assert_eq!(
            command_for_key(key(KeyCode::Esc), Focus::Search),
            Some(Command::FocusTree)
        );
    }

    #[test]
    fn test_token_prompt_keys() {
        assert_eq!(
            command_for_key(key(KeyCode::Char('t')), Focus::Tree),
            Some(Command::FocusToken)
        );
        assert_eq!(
            command_for_key(key(KeyCode::Char('q')), Focus::Token),
            Some(Command::TokenInsert('q'))
        );
        assert_eq!(
            command_for_key(key(KeyCode::Enter), Focus::Token),
            Some(Command::SaveToken)
        );
        assert_eq!(
            command_for_key(key(KeyCode::Esc), Focus::Token),
            Some(Command::CancelToken)
        );
        let ctrl_d = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert_eq!(command_for_key(ctrl_d, Focus::Token), Some(Command::ForgetToken));
        assert_eq!(command_for_key(ctrl_d, Focus::Tree), None);
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(command_for_key(ctrl_c, Focus::Tree), Some(Command::Quit));
        assert_eq!(command_for_key(ctrl_c, Focus::Search), Some(Command::Quit));
        assert_eq!(command_for_key(ctrl_c, Focus::Token), Some(Command::Quit));
    }
}
