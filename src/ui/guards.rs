use anyhow::Result;
use crossterm::{
    cursor::{Hide, Show},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io;

fn restore_terminal() {
    let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen, Show);
    let _ = disable_raw_mode();
}

/// Puts the terminal in raw mode on the alternate screen and undoes it on drop.
///
/// A panic hook restores the terminal too, so a panic message is readable
/// instead of being swallowed by the alternate screen.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn new() -> Result<Self> {
        let previous_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_terminal();
            previous_hook(info);
        }));

        enable_raw_mode()?;
        crossterm::execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
        // Hand panics back to the default reporter; take_hook itself panics mid-unwind
        if !std::thread::panicking() {
            let _ = std::panic::take_hook();
        }
    }
}
