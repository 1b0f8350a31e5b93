use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

/// Pointer input feeding the pull-to-refresh gesture, in terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pointer {
    Press { column: u16, row: u16 },
    Drag { row: u16 },
    Release,
}

/// User actions from keyboard and mouse events
#[derive(Debug, PartialEq)]
pub enum Action {
    Quit,
    ClearSearch,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    Submit,
    CopyUrl,
    CopyCloneUrl,
    Export,
    ToggleMode,
    NextPanel,
    Refresh,
    DeleteHistoryEntry,
    ClearHistory,
    UpdateSearch(char),
    DeleteChar,
    Pointer(Pointer),
    None,
}

/// Poll for terminal events and convert to actions
pub fn poll_event(timeout: Duration) -> anyhow::Result<Action> {
    if event::poll(timeout)? {
        return Ok(match event::read()? {
            Event::Key(key) => key_to_action(key),
            Event::Mouse(mouse) => mouse_to_action(mouse),
            _ => Action::None,
        });
    }
    Ok(Action::None)
}

fn key_to_action(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Esc, _) => Action::ClearSearch,

        // Navigation (Vim/Emacs style)
        (KeyCode::Char('p'), KeyModifiers::CONTROL) => Action::MoveUp,
        (KeyCode::Char('n'), KeyModifiers::CONTROL) => Action::MoveDown,
        (KeyCode::Up, _) => Action::MoveUp,
        (KeyCode::Down, _) => Action::MoveDown,
        (KeyCode::PageUp, _) => Action::PageUp,
        (KeyCode::PageDown, _) => Action::PageDown,

        // Actions
        (KeyCode::Enter, _) => Action::Submit,
        (KeyCode::Char('y'), KeyModifiers::CONTROL) => Action::CopyUrl,
        (KeyCode::Char('k'), KeyModifiers::CONTROL) => Action::CopyCloneUrl,
        (KeyCode::Char('e'), KeyModifiers::CONTROL) => Action::Export,
        (KeyCode::Char('t'), KeyModifiers::CONTROL) => Action::ToggleMode,
        (KeyCode::Tab, _) => Action::NextPanel,
        (KeyCode::Char('r'), KeyModifiers::CONTROL) => Action::Refresh,
        (KeyCode::Delete, _) => Action::DeleteHistoryEntry,
        (KeyCode::Char('d'), KeyModifiers::CONTROL) => Action::ClearHistory,

        // Search input
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            Action::UpdateSearch(c)
        }
        (KeyCode::Backspace, _) => Action::DeleteChar,

        _ => Action::None,
    }
}

fn mouse_to_action(mouse: MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            Action::Pointer(Pointer::Press { column: mouse.column, row: mouse.row })
        }
        MouseEventKind::Drag(MouseButton::Left) => Action::Pointer(Pointer::Drag { row: mouse.row }),
        MouseEventKind::Up(MouseButton::Left) => Action::Pointer(Pointer::Release),
        MouseEventKind::ScrollUp => Action::MoveUp,
        MouseEventKind::ScrollDown => Action::MoveDown,
        _ => Action::None,
    }
}
