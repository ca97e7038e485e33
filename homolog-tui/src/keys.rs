//! Keybinding definitions for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    OpenHelp,
    Cancel,
    MoveUp,
    MoveDown,
    NextPage,
    PrevPage,
    CyclePageSize,
    /// Preview the highlighted row.
    Select,
    /// Navigate to the previewed record's detail route.
    OpenDetail,
    ToggleFilters,
    NextFilter,
    PrevFilter,
    LowerDown,
    LowerUp,
    UpperDown,
    UpperUp,
    ClearFilter,
    ResetFilters,
    OpenSearch,
    ScrollLeft,
    ScrollRight,
    Refresh,
}

/// Keys while the search box has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchInput {
    Insert(char),
    Backspace,
    Clear,
    Submit,
    Cancel,
}

pub fn map_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent {
        code, modifiers, ..
    } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        };
    }

    if modifiers.contains(KeyModifiers::SHIFT) {
        match code {
            KeyCode::Left => return Some(Action::UpperDown),
            KeyCode::Right => return Some(Action::UpperUp),
            _ => {}
        }
    }

    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::OpenHelp),
        KeyCode::Char('/') => Some(Action::OpenSearch),
        KeyCode::Char('f') => Some(Action::ToggleFilters),
        KeyCode::Char('o') => Some(Action::OpenDetail),
        KeyCode::Char('c') => Some(Action::ClearFilter),
        KeyCode::Char('x') => Some(Action::ResetFilters),
        KeyCode::Char('s') => Some(Action::CyclePageSize),
        KeyCode::Char('[') => Some(Action::ScrollLeft),
        KeyCode::Char(']') => Some(Action::ScrollRight),
        KeyCode::Char('n') | KeyCode::PageDown => Some(Action::NextPage),
        KeyCode::Char('p') | KeyCode::PageUp => Some(Action::PrevPage),
        KeyCode::Enter => Some(Action::Select),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Tab => Some(Action::NextFilter),
        KeyCode::BackTab => Some(Action::PrevFilter),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::LowerDown),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::LowerUp),
        KeyCode::Char('H') => Some(Action::UpperDown),
        KeyCode::Char('L') => Some(Action::UpperUp),
        _ => None,
    }
}

pub fn map_search_key(event: KeyEvent) -> Option<SearchInput> {
    let KeyEvent {
        code, modifiers, ..
    } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('u') => Some(SearchInput::Clear),
            KeyCode::Char('c') => Some(SearchInput::Cancel),
            _ => None,
        };
    }

    match code {
        KeyCode::Char(c) => Some(SearchInput::Insert(c)),
        KeyCode::Backspace => Some(SearchInput::Backspace),
        KeyCode::Enter => Some(SearchInput::Submit),
        KeyCode::Esc => Some(SearchInput::Cancel),
        _ => None,
    }
}

/// One-line help shown in the footer.
pub const FOOTER_HELP: &str =
    "j/k move • Enter preview • o details • n/p page • s size • / search • f filters • ? help • q quit";

/// Full key reference for the help overlay.
pub const HELP_LINES: &[(&str, &str)] = &[
    ("j / k, Up / Down", "Move the row highlight"),
    ("Enter", "Preview the highlighted row"),
    ("o", "Open the previewed record's detail view"),
    ("Esc", "Close help, preview, or detail view"),
    ("n / p, PgDn / PgUp", "Next or previous page"),
    ("s", "Cycle page size (25, 50, 100)"),
    ("[ / ]", "Scroll grid columns"),
    ("/", "Edit the search term"),
    ("f", "Show or hide the filters panel"),
    ("Tab / Shift-Tab", "Focus next or previous filter"),
    ("h / l, Left / Right", "Move the focused filter's lower bound"),
    ("H / L, Shift-Left / Shift-Right", "Move the focused filter's upper bound"),
    ("c", "Clear the focused filter"),
    ("x", "Reset all filters"),
    ("Ctrl-r", "Reload data"),
    ("q, Ctrl-c", "Quit"),
];
