use std::{path::Path, sync::Arc};

use ratatui::crossterm::{
    execute,
    terminal::{LeaveAlternateScreen, disable_raw_mode},
};

/// Cheaply clonable, immutable string shared between actors.
pub type ArcStr = Arc<str>;

/// Cheaply clonable, immutable path shared between actors.
pub type ArcPath = Arc<Path>;

/// Cheaply clonable, immutable slice shared between actors.
pub type ArcSlice<T> = Arc<[T]>;

/// Installs a panic hook that gives the terminal back to the user before the
/// default hook prints the panic message.
///
/// Without it a panic while the TUI owns the terminal leaves the shell in raw
/// mode on the alternate screen.
pub fn install_panic_hook() -> anyhow::Result<()> {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(std::io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));
    Ok(())
}

/// Builds an [`ArcPath`] out of anything that can be seen as a path.
pub fn arc_path<P: AsRef<Path>>(path: P) -> ArcPath {
    ArcPath::from(path.as_ref())
}
