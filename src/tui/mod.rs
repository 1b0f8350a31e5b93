// Interactive search panel
mod app;
mod events;
mod layout;
mod rendering;
mod terminal;
mod timestamps;

use std::path::PathBuf;

use anyhow::Result;
pub use app::App;

use self::terminal::TerminalManager;
use crate::search::SearchSession;

/// Run the interactive TUI until the user quits.
///
/// `export_dir` receives JSON exports (Ctrl+E).
pub fn run_interactive(session: SearchSession, export_dir: PathBuf) -> Result<()> {
    let mut manager = TerminalManager::new()?;
    let mut app = App::new(session, export_dir);

    let res = app.run(manager.terminal_mut());

    manager.restore()?;
    res
}
